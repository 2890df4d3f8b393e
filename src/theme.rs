//! Colour palettes that rotate as the score climbs

use serde::Serialize;

use crate::consts::LEVEL_THRESHOLD;

/// Hex colours for one palette
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Theme {
    pub background: &'static str,
    pub tile_top: &'static str,
    pub tile_side: &'static str,
    pub ball: &'static str,
    pub diamond: &'static str,
    pub ui: &'static str,
}

impl Theme {
    pub const ALL: [Theme; 4] = [
        Theme {
            background: "#c0392b",
            tile_top: "#ecf0f1",
            tile_side: "#7f8c8d",
            ball: "#2c3e50",
            diamond: "#f1c40f",
            ui: "#fff",
        },
        Theme {
            background: "#2980b9",
            tile_top: "#d6eaf8",
            tile_side: "#1a5276",
            ball: "#111",
            diamond: "#f39c12",
            ui: "#fff",
        },
        Theme {
            background: "#27ae60",
            tile_top: "#abebc6",
            tile_side: "#145a32",
            ball: "#fff",
            diamond: "#8e44ad",
            ui: "#222",
        },
        Theme {
            background: "#4a235a",
            tile_top: "#e8daef",
            tile_side: "#2e0b3c",
            ball: "#00f3ff",
            diamond: "#00ff00",
            ui: "#fff",
        },
    ];

    /// A new palette every `LEVEL_THRESHOLD` points, wrapping around
    pub fn index_for_score(score: u32) -> usize {
        (score / LEVEL_THRESHOLD) as usize % Self::ALL.len()
    }

    pub fn for_score(score: u32) -> &'static Theme {
        &Self::ALL[Self::index_for_score(score)]
    }
}
