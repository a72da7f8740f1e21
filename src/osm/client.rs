use tracing::debug;

use crate::error::FetchError;
use crate::types::EntityRef;

use super::{EntitySource, OsmClient, RawResponse};

impl OsmClient {
    /// Sends one GET for the entity. Redirects are followed; any status that
    /// makes it back is returned together with its body.
    pub fn send_entity_request(&self, entity: &EntityRef) -> Result<RawResponse, FetchError> {
        let url = self.entity_url(entity);
        debug!(%entity, %url, "requesting entity");

        let mut response = self
            .agent
            .get(&url)
            .header("User-Agent", self.user_agent.as_str())
            .call()
            .map_err(|source| FetchError::Transport { entity: *entity, source })?;

        let status = response.status().as_u16();
        let body = response
            .body_mut()
            .read_to_string()
            .map_err(|source| FetchError::Transport { entity: *entity, source })?;
        debug!(%entity, status, bytes = body.len(), "response received");

        Ok(RawResponse { status, body })
    }
}

impl EntitySource for OsmClient {
    fn fetch_raw(&self, entity: &EntityRef) -> Result<RawResponse, FetchError> {
        self.send_entity_request(entity)
    }
}
