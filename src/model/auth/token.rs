use chrono::{DateTime, TimeZone, Utc};
use jsonwebtoken::{Algorithm, DecodingKey, TokenData, Validation};
use serde::{Deserialize, Serialize};

/// The credentials of an established session.
///
/// Persisted under camelCase keys for compatibility with existing stores.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthTokens {
    pub access_token: String,
    #[serde(default)]
    pub refresh_token: Option<String>,
}

impl AuthTokens {
    pub fn new(access_token: impl Into<String>, refresh_token: Option<String>) -> Self {
        Self {
            access_token: access_token.into(),
            refresh_token,
        }
    }

    /// The expiry claimed by the access token, if it is a JWT carrying `exp`.
    ///
    /// The signature is not checked: only the server can do that, and the
    /// result is used purely to discard sessions that are certainly stale.
    pub fn access_expiry(&self) -> Option<DateTime<Utc>> {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.insecure_disable_signature_validation();
        validation.validate_exp = false;
        validation.required_spec_claims.clear();

        jsonwebtoken::decode(
            &self.access_token,
            &DecodingKey::from_secret(&[]),
            &validation,
        )
        .ok()
        .and_then(|data: TokenData<ExpiryClaim>| data.claims.exp)
        .and_then(|exp| Utc.timestamp_opt(exp, 0).single())
    }

    /// True only if the access token provably expired before `now`.
    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        self.access_expiry().map_or(false, |exp| exp <= now)
    }
}

impl std::fmt::Debug for AuthTokens {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuthTokens")
            .field("access_token", &"<redacted>")
            .field(
                "refresh_token",
                &self.refresh_token.as_ref().map(|_| "<redacted>"),
            )
            .finish()
    }
}

#[derive(Deserialize)]
struct ExpiryClaim {
    exp: Option<i64>,
}
