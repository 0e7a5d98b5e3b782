use crate::error::Result;
use crate::model::api::{
    auth::{
        FaceVerifyRequest, FaceVerifyResponse, VoterLoginRequest, VoterLoginResponse,
        VoterOtpRequest, VoterOtpResponse, VoterProfileResponse,
    },
    voting::{CandidatesResponse, CastVoteResponse, ElectionInfoResponse},
};
use crate::model::ballot::VotePayload;

use super::{Api, ApiRequest, BearerSource, Transport};

impl<T: Transport> Api<T> {
    pub async fn voter_login_initiate(
        &self,
        credentials: &VoterLoginRequest,
    ) -> Result<VoterLoginResponse> {
        self.send(ApiRequest::post("/voter/login/initiate", credentials)?)
            .await
    }

    pub async fn voter_verify_otp(&self, payload: &VoterOtpRequest) -> Result<VoterOtpResponse> {
        self.send(ApiRequest::post("/voter/verify/otp", payload)?)
            .await
    }

    pub async fn voter_verify_face(
        &self,
        payload: &FaceVerifyRequest,
    ) -> Result<FaceVerifyResponse> {
        self.send(ApiRequest::post("/voter/verify/face", payload)?)
            .await
    }

    pub async fn voter_profile(
        &self,
        auth: &(impl BearerSource + ?Sized),
    ) -> Result<VoterProfileResponse> {
        self.send(ApiRequest::get("/voter/profile").authenticated(auth))
            .await
    }

    pub async fn election_info(
        &self,
        auth: &(impl BearerSource + ?Sized),
        election_id: &str,
    ) -> Result<ElectionInfoResponse> {
        let path = format!("/voter/elections/{election_id}");
        self.send(ApiRequest::get(path).authenticated(auth)).await
    }

    /// Candidates grouped by position, optionally narrowed to one position.
    pub async fn election_candidates(
        &self,
        auth: &(impl BearerSource + ?Sized),
        election_id: &str,
        position: Option<&str>,
    ) -> Result<CandidatesResponse> {
        let mut request = ApiRequest::get(format!("/voter/elections/{election_id}/candidates"));
        if let Some(position) = position {
            request = request.query("position", position);
        }
        self.send(request.authenticated(auth)).await
    }

    pub async fn cast_vote(
        &self,
        auth: &(impl BearerSource + ?Sized),
        election_id: &str,
        votes: &VotePayload,
    ) -> Result<CastVoteResponse> {
        let path = format!("/voter/elections/{election_id}/vote");
        self.send(ApiRequest::post(path, votes)?.authenticated(auth))
            .await
    }
}
