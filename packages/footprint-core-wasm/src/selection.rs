use std::sync::{Arc, Mutex};

use lazy_static::lazy_static;
use serde::{Deserialize, Serialize};

use crate::ring_codec::{self, Point};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExportFormat {
    Wkt,
    Raw,
}

/// Text ready for the clipboard and the format it was written in.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Export {
    pub format: ExportFormat,
    pub text: String,
}

/// The ring currently drawn or picked on the map and its WKT.
///
/// Draw create/update and building picks call `set_ring`; draw delete and
/// clear-all call `clear`. The WKT is recomputed on every change so the two
/// never disagree.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SelectionState {
    ring: Vec<Point>,
    wkt: String,
    show_raw: bool,
}

impl SelectionState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_ring(&mut self, ring: Vec<Point>) {
        self.wkt = ring_codec::to_wkt(&ring);
        self.ring = ring;
    }

    /// Empties the selection; returns `false` when nothing was selected.
    pub fn clear(&mut self) -> bool {
        let had_ring = !self.ring.is_empty();
        self.ring.clear();
        self.wkt.clear();
        had_ring
    }

    pub fn set_show_raw(&mut self, show_raw: bool) {
        self.show_raw = show_raw;
    }

    pub fn ring(&self) -> &[Point] {
        &self.ring
    }

    pub fn wkt(&self) -> &str {
        &self.wkt
    }

    pub fn show_raw(&self) -> bool {
        self.show_raw
    }

    pub fn is_empty(&self) -> bool {
        self.ring.is_empty()
    }

    /// Ring as indented `[[x, y], ...]` JSON, exactly as drawn.
    pub fn raw_text(&self) -> String {
        serde_json::to_string_pretty(&ring_codec::to_raw_list(&self.ring))
            .unwrap_or_else(|_| "[]".to_string())
    }

    /// What the coordinates panel shows for the current toggle.
    pub fn display_text(&self) -> String {
        if self.show_raw {
            self.raw_text()
        } else {
            self.wkt.clone()
        }
    }

    /// Clipboard payload: WKT when available, else the raw list.
    ///
    /// `set_ring` keeps `wkt` non-empty whenever the ring is, so the raw
    /// branch does not fire today; it is the copy button's fallback order.
    pub fn export(&self) -> Option<Export> {
        if !self.wkt.is_empty() {
            Some(Export {
                format: ExportFormat::Wkt,
                text: self.wkt.clone(),
            })
        } else if !self.ring.is_empty() {
            Some(Export {
                format: ExportFormat::Raw,
                text: self.raw_text(),
            })
        } else {
            None
        }
    }
}

lazy_static! {
    static ref GLOBAL_SELECTION: Arc<Mutex<SelectionState>> =
        Arc::new(Mutex::new(SelectionState::new()));
}

/// Runs `f` against the page-wide selection.
///
/// A poisoned lock is recovered: the state is plain data and stays consistent
/// after any panic inside `f`.
pub fn with_selection<R>(f: impl FnOnce(&mut SelectionState) -> R) -> R {
    let mut guard = GLOBAL_SELECTION
        .lock()
        .unwrap_or_else(|poisoned| poisoned.into_inner());
    f(&mut guard)
}
