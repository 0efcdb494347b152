//! Editor configuration.

use crate::client::DEFAULT_API_BASE_URL;
use crate::input::{CONTEXT_MENU_DELAY, DRAG_THRESHOLD};
use crate::layout::{ContainerKind, ContainerPolicy};
use crate::reorder::ACTIVATION_DISTANCE;
use crate::store::{DEFAULT_CATEGORIES, DEFAULT_USER_ID};
use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;

/// Errors loading a configuration file.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config: {0}")]
    Io(#[from] std::io::Error),
    #[error("Invalid config: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Tunables for the editor. Every field has a default, so a partial JSON
/// object is a valid configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct EditorConfig {
    /// Pixels a press may travel before it counts as a drag.
    pub drag_threshold: f64,
    pub context_menu_delay_ms: u64,
    /// Pixels a press must travel before a reorder drag starts.
    pub sortable_activation_distance: f64,
    /// Lifetime of status messages.
    pub status_ttl_ms: u64,
    pub user_id: String,
    pub api_base_url: String,
    pub categories: Vec<String>,
    /// Viewport height used to resolve section heights.
    pub viewport_height: f64,
    pub image_policy: ContainerPolicy,
    pub video_policy: ContainerPolicy,
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            drag_threshold: DRAG_THRESHOLD,
            context_menu_delay_ms: CONTEXT_MENU_DELAY.as_millis() as u64,
            sortable_activation_distance: ACTIVATION_DISTANCE,
            status_ttl_ms: 3000,
            user_id: DEFAULT_USER_ID.to_string(),
            api_base_url: DEFAULT_API_BASE_URL.to_string(),
            categories: DEFAULT_CATEGORIES.iter().map(|c| c.to_string()).collect(),
            viewport_height: 900.0,
            image_policy: ContainerPolicy::for_kind(ContainerKind::Image),
            video_policy: ContainerPolicy::for_kind(ContainerKind::Video),
        }
    }
}

impl EditorConfig {
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json(&json)
    }

    pub fn policy(&self, kind: ContainerKind) -> ContainerPolicy {
        match kind {
            ContainerKind::Image => self.image_policy,
            ContainerKind::Video => self.video_policy,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::snap::SnapMode;
    use std::io::Write;

    #[test]
    fn test_partial_json_keeps_defaults() {
        let config = EditorConfig::from_json(r#"{"userId":"alice","statusTtlMs":500}"#).unwrap();
        assert_eq!(config.user_id, "alice");
        assert_eq!(config.status_ttl_ms, 500);
        assert_eq!(config.drag_threshold, 5.0);
        assert_eq!(config.context_menu_delay_ms, 100);
        assert_eq!(config.api_base_url, "http://localhost:8000");
    }

    #[test]
    fn test_policy_override() {
        let config = EditorConfig::from_json(
            r#"{"videoPolicy":{"snap":{"mode":"grid","size":10},"minSize":40}}"#,
        )
        .unwrap();
        let policy = config.policy(ContainerKind::Video);
        assert_eq!(policy.snap, SnapMode::Grid { size: 10.0 });
        assert_eq!(policy.min_size, 40.0);
        assert_eq!(config.policy(ContainerKind::Image).min_size, 60.0);
    }

    #[test]
    fn test_from_path() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{"viewportHeight": 720}}"#).unwrap();
        let config = EditorConfig::from_path(file.path()).unwrap();
        assert_eq!(config.viewport_height, 720.0);
    }

    #[test]
    fn test_errors() {
        assert!(matches!(EditorConfig::from_json("{"), Err(ConfigError::Parse(_))));
        assert!(matches!(
            EditorConfig::from_path("/definitely/not/here.json"),
            Err(ConfigError::Io(_))
        ));
    }
}
