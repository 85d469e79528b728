use crate::{LibraryError, PresetLibrary};
use std::fs::File;
use std::io::BufReader;
use std::path::Path;

/// Reads a preset library from disk.
pub fn load_library(path: &Path) -> Result<PresetLibrary, LibraryError> {
    let file = File::open(path)?;
    let reader = BufReader::new(file);

    // Try JSON first, fall back to MessagePack
    serde_json::from_reader(reader).or_else(|_| {
        let file = File::open(path)?;
        let reader = BufReader::new(file);
        rmp_serde::decode::from_read(reader).map_err(LibraryError::from)
    })
}

/// Loads `path` when given, falling back to the bundled library on any error.
pub fn load_library_or_builtin(path: Option<&Path>) -> Result<PresetLibrary, LibraryError> {
    if let Some(path) = path {
        match load_library(path) {
            Ok(library) => {
                log::info!(
                    "Loaded {} presets and {} demo tracks from {}",
                    library.tracks.len(),
                    library.demo_tracks.len(),
                    path.display()
                );
                return Ok(library);
            }
            Err(e) => log::warn!("Failed to load presets from {}: {}", path.display(), e),
        }
    }
    PresetLibrary::builtin()
}
