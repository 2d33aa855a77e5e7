//! Editor tuning knobs.

use serde::{Deserialize, Serialize};

// ─── Config ───────────────────────────────────────────────────────────────

/// Configuration for an [`Editor`](crate::editor::Editor) session.
///
/// Hosts may ship it as JSON; missing keys fall back to the defaults,
/// unknown keys are rejected so typos surface early.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields, rename_all = "camelCase")]
pub struct EditorConfig {
    /// Arrow-key nudge distance in slide units. Default: **4**.
    pub nudge_step: f32,

    /// Maximum number of undo entries kept. Default: **50**.
    pub history_depth: usize,

    /// Smallest width/height a shape, image, text box or icon can be
    /// resized to. Default: **20 × 20**.
    pub min_element_width: f32,
    pub min_element_height: f32,

    /// Smallest size of a whole table under corner resize. Default: **100 × 60**.
    pub min_table_width: f32,
    pub min_table_height: f32,

    /// Offset applied to each successive paste. Default: **20**.
    pub paste_offset: f32,

    /// Offset of a duplicate relative to its source. Default: **20**.
    pub duplicate_offset: f32,

    /// Marquee drags smaller than this on both axes count as a click on
    /// empty canvas. Default: **2**.
    pub min_marquee_extent: f32,

    /// Pointer distance within which a resize handle is grabbed. Default: **6**.
    pub handle_tolerance: f32,
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            nudge_step: 4.0,
            history_depth: 50,
            min_element_width: 20.0,
            min_element_height: 20.0,
            min_table_width: 100.0,
            min_table_height: 60.0,
            paste_offset: 20.0,
            duplicate_offset: 20.0,
            min_marquee_extent: 2.0,
            handle_tolerance: 6.0,
        }
    }
}

impl EditorConfig {
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_json_keeps_defaults() {
        let config = EditorConfig::from_json(r#"{"nudgeStep": 10, "historyDepth": 5}"#).unwrap();
        assert_eq!(config.nudge_step, 10.0);
        assert_eq!(config.history_depth, 5);
        assert_eq!(config.min_table_width, 100.0);
    }

    #[test]
    fn unknown_keys_are_rejected() {
        assert!(EditorConfig::from_json(r#"{"nudge": 1}"#).is_err());
    }
}
