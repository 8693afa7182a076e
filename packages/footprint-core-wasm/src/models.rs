// This is the models module containing shared data structures
use serde::{Deserialize, Serialize};

use crate::selection::{Export, SelectionState};

/// Snapshot of the current selection for the coordinates panel.
#[derive(Serialize, Deserialize)]
pub struct SelectionSnapshot {
    pub wkt: String,
    pub raw: Vec<[f64; 2]>,
    pub vertex_count: usize,
    pub show_raw: bool,
    pub display_text: String,
    pub export: Option<Export>,
}

impl From<&SelectionState> for SelectionSnapshot {
    fn from(state: &SelectionState) -> Self {
        SelectionSnapshot {
            wkt: state.wkt().to_string(),
            raw: crate::ring_codec::to_raw_list(state.ring()),
            vertex_count: state.ring().len(),
            show_raw: state.show_raw(),
            display_text: state.display_text(),
            export: state.export(),
        }
    }
}

/// Result of a building lookup, ready to hand to the map as a source.
#[derive(Serialize, Deserialize)]
pub struct BuildingsResult {
    pub count: usize,
    pub feature_collection: serde_json::Value,
}
