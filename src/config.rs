use std::path::{Path, PathBuf};
use std::time::Duration as StdDuration;

use chrono::Duration;
use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};
use serde::{Deserialize, Serialize};

use crate::error::Result;

/// Default deployment of the VoteXpert API.
pub const DEFAULT_API_BASE_URL: &str =
    "https://1j0xg3xwse.execute-api.eu-north-1.amazonaws.com/prod";

/// Name of the optional configuration file.
pub const CONFIG_FILE: &str = "Votexpert.toml";

/// Prefix of the environment variables that override the configuration file.
pub const ENV_PREFIX: &str = "VOTEXPERT_";

/// Client configuration, derived from compiled defaults, `Votexpert.toml`,
/// and `VOTEXPERT_*` environment variables, in increasing precedence.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    api_base_url: String,
    request_timeout: u32,
    otp_ttl: u32,
    statistics_refresh: u32,
    face_similarity_threshold: u8,
    storage_dir: PathBuf,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_base_url: DEFAULT_API_BASE_URL.to_string(),
            request_timeout: 30,
            otp_ttl: 300,
            statistics_refresh: 30,
            face_similarity_threshold: 80,
            storage_dir: PathBuf::from(".votexpert"),
        }
    }
}

impl Config {
    /// Load from the working directory's `Votexpert.toml` and the environment.
    pub fn load() -> Result<Self> {
        Self::figment(CONFIG_FILE).extract().map_err(Into::into)
    }

    /// Load from an explicit configuration file and the environment.
    pub fn load_from(path: impl AsRef<Path>) -> Result<Self> {
        Self::figment(path).extract().map_err(Into::into)
    }

    fn figment(path: impl AsRef<Path>) -> Figment {
        Figment::from(Serialized::defaults(Config::default()))
            .merge(Toml::file(path))
            .merge(Env::prefixed(ENV_PREFIX))
    }

    /// Root URL all endpoint paths are appended to.
    pub fn api_base_url(&self) -> &str {
        &self.api_base_url
    }

    /// Client-side timeout applied to every request.
    pub fn request_timeout(&self) -> StdDuration {
        StdDuration::from_secs(self.request_timeout.into())
    }

    /// Valid lifetime of an OTP when the server does not say otherwise.
    pub fn otp_ttl(&self) -> Duration {
        Duration::seconds(self.otp_ttl.into())
    }

    /// How often live statistics are refetched.
    pub fn statistics_refresh(&self) -> StdDuration {
        StdDuration::from_secs(self.statistics_refresh.into())
    }

    /// Minimum face similarity percentage considered a match.
    pub fn face_similarity_threshold(&self) -> u8 {
        self.face_similarity_threshold
    }

    /// Directory holding the persisted session.
    pub fn storage_dir(&self) -> &Path {
        &self.storage_dir
    }

    pub fn with_api_base_url(mut self, url: impl Into<String>) -> Self {
        self.api_base_url = url.into();
        self
    }

    pub fn with_storage_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.storage_dir = dir.into();
        self
    }
}
