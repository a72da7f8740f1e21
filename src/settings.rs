use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::SettingsError;
use crate::osm::DEFAULT_API_URL;

/// Everything a fixture run can be tuned with. Missing fields in a settings
/// file fall back to the defaults.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FetchSettings {
    pub base_url: String,
    pub output_dir: PathBuf,
    pub recursive: bool,
    pub follow_members: bool,
    pub reject_error_status: bool,
    pub timeout_secs: Option<u64>,
    pub user_agent: String,
}

impl Default for FetchSettings {
    fn default() -> Self {
        FetchSettings {
            base_url: DEFAULT_API_URL.to_string(),
            output_dir: PathBuf::from("."),
            recursive: true,
            follow_members: false,
            reject_error_status: false,
            timeout_secs: None,
            user_agent: concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION")).to_string(),
        }
    }
}

impl FetchSettings {
    pub fn from_json_file(path: &Path) -> Result<Self, SettingsError> {
        let text = fs::read_to_string(path).map_err(|source| SettingsError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json_str(&text).map_err(|source| SettingsError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    pub fn from_json_str(text: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(text)
    }

    pub fn timeout(&self) -> Option<Duration> {
        self.timeout_secs.map(Duration::from_secs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_legacy_behaviour() {
        let settings = FetchSettings::default();
        assert_eq!(settings.base_url, "https://www.openstreetmap.org");
        assert_eq!(settings.output_dir, PathBuf::from("."));
        assert!(settings.recursive);
        assert!(!settings.follow_members);
        assert!(!settings.reject_error_status);
        assert_eq!(settings.timeout(), None);
        assert!(settings.user_agent.starts_with("osm-fixtures/"));
    }

    #[test]
    fn partial_json_keeps_defaults() {
        let json = r#"{ "output_dir": "fixtures", "timeout_secs": 30 }"#;
        let settings = FetchSettings::from_json_str(json).unwrap();
        assert_eq!(settings.output_dir, PathBuf::from("fixtures"));
        assert_eq!(settings.timeout(), Some(Duration::from_secs(30)));
        assert!(settings.recursive);
        assert_eq!(settings.base_url, DEFAULT_API_URL);
    }

    #[test]
    fn unreadable_file_reports_its_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("missing.json");
        let err = FetchSettings::from_json_file(&path).unwrap_err();
        assert!(matches!(err, SettingsError::Read { path: ref p, .. } if p == &path));
    }

    #[test]
    fn invalid_json_is_a_parse_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("settings.json");
        fs::write(&path, "{ recursive: yes }").unwrap();
        assert!(matches!(
            FetchSettings::from_json_file(&path),
            Err(SettingsError::Parse { .. })
        ));
    }
}
