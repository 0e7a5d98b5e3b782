use crate::error::Result;
use crate::model::api::{
    admin::{
        AdminCandidatesResponse, AdminVotersResponse, ElectionDetailsResponse,
        ElectionListResponse, StatisticsResponse, UpdateStatusRequest, UpdateStatusResponse,
    },
    auth::{AdminLoginRequest, AdminLoginResponse, AdminOtpRequest, AdminOtpResponse},
};
use crate::model::election::{CreateElectionRequest, CreateElectionResponse, ElectionStatus};

use super::{Api, ApiRequest, BearerSource, Transport};

impl<T: Transport> Api<T> {
    pub async fn admin_login(&self, credentials: &AdminLoginRequest) -> Result<AdminLoginResponse> {
        self.send(ApiRequest::post("/admin/login", credentials)?)
            .await
    }

    pub async fn admin_verify_otp(&self, payload: &AdminOtpRequest) -> Result<AdminOtpResponse> {
        self.send(ApiRequest::post("/admin/verify-otp", payload)?)
            .await
    }

    pub async fn admin_elections(
        &self,
        auth: &(impl BearerSource + ?Sized),
    ) -> Result<ElectionListResponse> {
        self.send(ApiRequest::get("/admin/elections").authenticated(auth))
            .await
    }

    pub async fn create_election(
        &self,
        auth: &(impl BearerSource + ?Sized),
        election: &CreateElectionRequest,
    ) -> Result<CreateElectionResponse> {
        self.send(ApiRequest::post("/admin/elections", election)?.authenticated(auth))
            .await
    }

    pub async fn election_details(
        &self,
        auth: &(impl BearerSource + ?Sized),
        election_id: &str,
    ) -> Result<ElectionDetailsResponse> {
        let path = format!("/admin/elections/{election_id}");
        self.send(ApiRequest::get(path).authenticated(auth)).await
    }

    pub async fn election_statistics(
        &self,
        auth: &(impl BearerSource + ?Sized),
        election_id: &str,
    ) -> Result<StatisticsResponse> {
        let path = format!("/admin/elections/{election_id}/statistics");
        self.send(ApiRequest::get(path).authenticated(auth)).await
    }

    /// Request a lifecycle change. The server is the authority on whether the
    /// transition is allowed.
    pub async fn update_election_status(
        &self,
        auth: &(impl BearerSource + ?Sized),
        election_id: &str,
        status: ElectionStatus,
    ) -> Result<UpdateStatusResponse> {
        let path = format!("/admin/elections/{election_id}/status");
        let body = UpdateStatusRequest { status };
        self.send(ApiRequest::patch(path, &body)?.authenticated(auth))
            .await
    }

    pub async fn admin_candidates(
        &self,
        auth: &(impl BearerSource + ?Sized),
    ) -> Result<AdminCandidatesResponse> {
        self.send(ApiRequest::get("/admin/candidates").authenticated(auth))
            .await
    }

    pub async fn admin_voters(
        &self,
        auth: &(impl BearerSource + ?Sized),
    ) -> Result<AdminVotersResponse> {
        self.send(ApiRequest::get("/admin/voters").authenticated(auth))
            .await
    }
}
