//! Typed access to the VoteXpert REST API.
//!
//! Endpoint methods live on [`Api`], split by audience: voter, admin, and
//! public. Every method returns the decoded payload or one normalised
//! [`Error`](crate::error::Error).

use serde::de::DeserializeOwned;

use crate::config::Config;
use crate::error::Result;

mod admin;
mod client;
mod public;
mod voter;

pub use client::{
    normalize, Access, ApiRequest, BearerSource, HttpTransport, RawResponse, Transport,
};

pub struct Api<T = HttpTransport> {
    transport: T,
}

impl Api<HttpTransport> {
    pub fn from_config(config: &Config) -> Result<Self> {
        Ok(Self::new(HttpTransport::from_config(config)?))
    }
}

impl<T: Transport> Api<T> {
    pub fn new(transport: T) -> Self {
        Self { transport }
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    async fn send<R: DeserializeOwned>(&self, request: ApiRequest) -> Result<R> {
        let access = request.access;
        let response = self.transport.execute(request).await?;
        normalize(response, access)
    }
}
