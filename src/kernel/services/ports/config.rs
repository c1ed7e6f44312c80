use std::time::Duration;

use serde::{Deserialize, Serialize};

pub const DEFAULT_IGNORED_NAMES: &[&str] = &[
    ".DS_Store",
    ".Spotlight-V100",
    ".Trashes",
    ".fseventsd",
    ".TemporaryItems",
    "Thumbs.db",
    "desktop.ini",
    ".git",
    "node_modules",
];

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct WorkspaceConfig {
    #[serde(alias = "debounceMs")]
    pub debounce_ms: u64,
    #[serde(alias = "workspaceLabel", skip_serializing_if = "Option::is_none")]
    pub workspace_label: Option<String>,
    #[serde(alias = "maxNotices")]
    pub max_notices: usize,
    #[serde(alias = "ignoredNames")]
    pub ignored_names: Vec<String>,
    #[serde(alias = "readFileContents")]
    pub read_file_contents: bool,
}

impl Default for WorkspaceConfig {
    fn default() -> Self {
        Self {
            debounce_ms: 500,
            workspace_label: None,
            max_notices: 200,
            ignored_names: DEFAULT_IGNORED_NAMES.iter().map(|s| s.to_string()).collect(),
            read_file_contents: true,
        }
    }
}

impl WorkspaceConfig {
    pub fn debounce_window(&self) -> Duration {
        Duration::from_millis(self.debounce_ms)
    }

    pub fn should_ignore(&self, name: &str) -> bool {
        self.ignored_names.iter().any(|n| n == name)
    }
}
