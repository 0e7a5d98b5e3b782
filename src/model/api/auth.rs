use serde::{Deserialize, Serialize};

use crate::model::{
    auth::{Admin, AuthTokens, Voter},
    election::{ElectionId, VoterElection},
    otp::Code,
};

/// `POST /voter/login/initiate`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VoterLoginRequest {
    pub voter_id: String,
    pub email: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VoterLoginResponse {
    #[serde(default)]
    pub message: String,
    #[serde(default)]
    pub voter_id: Option<String>,
    #[serde(default)]
    pub election_id: Option<ElectionId>,
    /// OTP validity in seconds, when the server states it.
    #[serde(default)]
    pub expires_in: Option<u32>,
}

/// `POST /voter/verify/otp`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VoterOtpRequest {
    pub voter_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub election_id: Option<ElectionId>,
    pub otp: Code,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VoterOtpResponse {
    #[serde(default)]
    pub message: String,
    #[serde(default)]
    pub face_verification_required: bool,
    #[serde(default)]
    pub face_verification_token: Option<String>,
    #[serde(default)]
    pub access_token: Option<String>,
    #[serde(default)]
    pub refresh_token: Option<String>,
    #[serde(default)]
    pub voter: Option<Voter>,
    #[serde(default)]
    pub election: Option<VoterElection>,
}

/// `POST /voter/verify/face`.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FaceVerifyRequest {
    /// Base64-encoded captured image.
    pub face_image: String,
    pub face_verification_token: String,
}

impl std::fmt::Debug for FaceVerifyRequest {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FaceVerifyRequest")
            .field("face_image", &format_args!("<{} bytes>", self.face_image.len()))
            .field("face_verification_token", &"<redacted>")
            .finish()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FaceVerifyResponse {
    #[serde(default)]
    pub message: String,
    pub access_token: String,
    #[serde(default)]
    pub refresh_token: Option<String>,
    pub voter: Voter,
    #[serde(default)]
    pub similarity: Option<f64>,
}

impl FaceVerifyResponse {
    pub fn tokens(&self) -> AuthTokens {
        AuthTokens::new(self.access_token.clone(), self.refresh_token.clone())
    }
}

/// `POST /admin/login`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AdminLoginRequest {
    pub username_or_email: String,
    pub password: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AdminLoginResponse {
    #[serde(default)]
    pub message: String,
    /// Session token handed to the OTP step.
    pub token: String,
    #[serde(default)]
    pub expires_in: Option<u32>,
}

/// `POST /admin/verify-otp`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AdminOtpRequest {
    pub session_token: String,
    pub otp: Code,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AdminOtpResponse {
    pub access_token: String,
    #[serde(default)]
    pub refresh_token: Option<String>,
    pub admin: Admin,
}

impl AdminOtpResponse {
    pub fn tokens(&self) -> AuthTokens {
        AuthTokens::new(self.access_token.clone(), self.refresh_token.clone())
    }
}

/// `GET /voter/profile`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VoterProfileResponse {
    pub voter: Voter,
    #[serde(default)]
    pub election: Option<VoterElection>,
}
