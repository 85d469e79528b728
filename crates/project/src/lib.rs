//! Track presets and demo sessions for the editor.
//!
//! A library is a flat document of clip specs plus the tint palette new clips
//! are coloured from. Files are read as JSON first, then as MessagePack.

mod load;

pub use load::{load_library, load_library_or_builtin};

use isound_transport::ClipSpec;
use serde::{Deserialize, Serialize};

const BUILTIN: &str = include_str!("../presets.json");

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PresetLibrary {
    /// Colours handed out to demo and dropped clips.
    #[serde(default)]
    pub tints: Vec<String>,
    /// Palette entries the user can add to the timeline.
    #[serde(default)]
    pub tracks: Vec<ClipSpec>,
    #[serde(default)]
    pub demo_tracks: Vec<ClipSpec>,
}

#[derive(Debug, thiserror::Error)]
pub enum LibraryError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Deserialization error: {0}")]
    Deserialize(#[from] rmp_serde::decode::Error),
}

impl PresetLibrary {
    /// The library bundled with the crate.
    pub fn builtin() -> Result<Self, LibraryError> {
        Ok(serde_json::from_str(BUILTIN)?)
    }

    /// Picks a tint uniformly from the palette, or `None` when it is empty.
    pub fn random_tint(&self) -> Option<&str> {
        if self.tints.is_empty() {
            return None;
        }
        Some(self.tints[fastrand::usize(..self.tints.len())].as_str())
    }

    /// Demo tracks in load order, each freshly tinted.
    pub fn demo_specs(&self) -> Vec<ClipSpec> {
        self.demo_tracks
            .iter()
            .map(|spec| self.tinted(spec.clone()))
            .collect()
    }

    /// Replaces the spec's colour with a random tint when the palette has one.
    pub fn tinted(&self, spec: ClipSpec) -> ClipSpec {
        match self.random_tint() {
            Some(tint) => spec.with_color(tint),
            None => spec,
        }
    }
}
