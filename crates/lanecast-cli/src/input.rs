//! Loading beatmaps from disk.
//!
//! Beatmaps are JSON documents. The loader reads the file, hashes the raw
//! bytes for provenance and parses the beatmap.

use lanecast_chart::{source_hash, Beatmap};
use std::path::{Path, PathBuf};

/// Recognized beatmap extensions.
pub const JSON_EXTENSIONS: &[&str] = &["json"];

/// Result of loading a beatmap.
#[derive(Debug)]
pub struct LoadResult {
    /// The parsed beatmap.
    pub beatmap: Beatmap,
    /// BLAKE3 hash of the file content (hex string).
    pub source_hash: String,
}

/// Errors that can occur while loading a beatmap.
#[derive(Debug)]
pub enum InputError {
    /// File could not be read.
    FileRead {
        path: PathBuf,
        source: std::io::Error,
    },

    /// Unknown file extension.
    UnknownExtension { extension: Option<String> },

    /// JSON parsing failed.
    JsonParse { message: String },
}

impl std::fmt::Display for InputError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            InputError::FileRead { path, source } => {
                write!(f, "failed to read file '{}': {}", path.display(), source)
            }
            InputError::UnknownExtension { extension } => match extension {
                Some(ext) => write!(f, "unknown file extension '.{}' (expected .json)", ext),
                None => write!(f, "file has no extension (expected .json)"),
            },
            InputError::JsonParse { message } => write!(f, "JSON parse error: {}", message),
        }
    }
}

impl std::error::Error for InputError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            InputError::FileRead { source, .. } => Some(source),
            _ => None,
        }
    }
}

/// Loads a beatmap from a JSON file.
///
/// # Example
/// ```no_run
/// use std::path::Path;
/// use lanecast_cli::input::load_beatmap;
///
/// let result = load_beatmap(Path::new("map.json")).unwrap();
/// println!("{} objects", result.beatmap.objects.len());
/// ```
pub fn load_beatmap(path: &Path) -> Result<LoadResult, InputError> {
    let extension = path
        .extension()
        .and_then(|e| e.to_str())
        .map(|s| s.to_lowercase());

    match extension.as_deref() {
        Some(ext) if JSON_EXTENSIONS.contains(&ext) => {}
        _ => return Err(InputError::UnknownExtension { extension }),
    }

    let content = std::fs::read_to_string(path).map_err(|e| InputError::FileRead {
        path: path.to_path_buf(),
        source: e,
    })?;

    let beatmap = Beatmap::from_json(&content).map_err(|e| InputError::JsonParse {
        message: e.to_string(),
    })?;

    Ok(LoadResult {
        beatmap,
        source_hash: source_hash(content.as_bytes()),
    })
}
