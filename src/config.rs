use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::autosave::DEFAULT_AUTOSAVE_DELAY_MS;
use crate::element::Position;
use crate::error::EditorResult;

/// Tunables for an editing session.
///
/// Every field has a default, so a partial JSON object is a valid config.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct EditorConfig {
    /// Quiet period after the last change before autosave runs
    pub autosave_delay_ms: u64,
    /// Maximum undo depth; unbounded when absent
    pub history_limit: Option<usize>,
    /// Offset applied to duplicated elements
    pub duplicate_offset: Position,
    /// Substitute the default deck when a generation yields no slides
    pub generation_fallback: bool,
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            autosave_delay_ms: DEFAULT_AUTOSAVE_DELAY_MS,
            history_limit: None,
            duplicate_offset: Position::new(20.0, 20.0),
            generation_fallback: true,
        }
    }
}

impl EditorConfig {
    pub fn from_json(json: &str) -> EditorResult<Self> {
        let config = serde_json::from_str(json)?;
        log::debug!("loaded editor config: {:?}", config);
        Ok(config)
    }

    pub fn autosave_delay(&self) -> Duration {
        Duration::from_millis(self.autosave_delay_ms)
    }
}
