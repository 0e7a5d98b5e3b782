use crate::error::Result;
use crate::model::results::ElectionResults;

use super::{Api, ApiRequest, Transport};

impl<T: Transport> Api<T> {
    /// Published results. Needs no session.
    pub async fn election_results(&self, election_id: &str) -> Result<ElectionResults> {
        self.send(ApiRequest::get(format!("/elections/{election_id}/results")))
            .await
    }
}
