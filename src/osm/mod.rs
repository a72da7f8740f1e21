mod client;

use std::time::Duration;

use ureq::Agent;

use crate::error::FetchError;
use crate::settings::FetchSettings;
use crate::types::EntityRef;

pub const DEFAULT_API_URL: &str = "https://www.openstreetmap.org";
pub const API_PATH: &str = "api/0.6";

/// Status and body of one entity request, exactly as the service sent them.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RawResponse {
    pub status: u16,
    pub body: String,
}

impl RawResponse {
    pub fn ok(body: impl Into<String>) -> Self {
        RawResponse {
            status: 200,
            body: body.into(),
        }
    }

    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Anything that can hand out the raw document of an entity.
pub trait EntitySource {
    fn fetch_raw(&self, entity: &EntityRef) -> Result<RawResponse, FetchError>;
}

impl<T: EntitySource + ?Sized> EntitySource for &T {
    fn fetch_raw(&self, entity: &EntityRef) -> Result<RawResponse, FetchError> {
        (**self).fetch_raw(entity)
    }
}

/// Blocking client for the OSM editing API (`/api/0.6/{kind}/{id}`).
#[derive(Clone)]
pub struct OsmClient {
    url: String,
    pub agent: Agent,
    pub user_agent: String,
}

impl Default for OsmClient {
    fn default() -> Self {
        OsmClient::from_settings(&FetchSettings::default())
    }
}

impl OsmClient {
    pub fn new(url: &str, timeout: Option<Duration>, user_agent: &str) -> Self {
        // Error statuses come back as responses; the caller decides what they mean.
        let config = Agent::config_builder()
            .timeout_global(timeout)
            .http_status_as_error(false)
            .build();
        let agent: Agent = config.into();
        OsmClient {
            agent,
            url: url.trim_end_matches('/').to_string(),
            user_agent: user_agent.to_string(),
        }
    }

    pub fn from_settings(settings: &FetchSettings) -> Self {
        OsmClient::new(&settings.base_url, settings.timeout(), &settings.user_agent)
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    pub fn set_url(&mut self, url: &str) {
        self.url = url.trim_end_matches('/').to_string();
    }

    pub fn entity_url(&self, entity: &EntityRef) -> String {
        format!("{}/{}/{}", self.url, API_PATH, entity.api_path())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Kind;

    #[test]
    fn entity_url_follows_api_template() {
        let client = OsmClient::default();
        assert_eq!(
            client.entity_url(&EntityRef::new(Kind::Way, 5)),
            "https://www.openstreetmap.org/api/0.6/way/5"
        );
    }

    #[test]
    fn trailing_slash_on_base_url_is_ignored() {
        let mut client = OsmClient::new("http://localhost:3000/", None, "test");
        assert_eq!(client.url(), "http://localhost:3000");
        assert_eq!(
            client.entity_url(&EntityRef::node(12)),
            "http://localhost:3000/api/0.6/node/12"
        );
        client.set_url("https://api06.dev.openstreetmap.org//");
        assert_eq!(
            client.entity_url(&EntityRef::new(Kind::Relation, 3)),
            "https://api06.dev.openstreetmap.org/api/0.6/relation/3"
        );
    }

    #[test]
    fn only_2xx_counts_as_success() {
        assert!(RawResponse::ok("").is_success());
        assert!(RawResponse { status: 204, body: String::new() }.is_success());
        assert!(!RawResponse { status: 404, body: String::new() }.is_success());
        assert!(!RawResponse { status: 410, body: String::new() }.is_success());
        assert!(!RawResponse { status: 500, body: String::new() }.is_success());
    }
}
