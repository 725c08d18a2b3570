//! Form file reading
//!
//! Reads a template fully, then joins its lines without separators. Handles:
//! - Non-UTF-8 files (lossy or strict)
//! - Oversized files

use serde::{Deserialize, Serialize};
use std::fs;
use std::io::Read;
use std::path::Path;

use crate::core::error::FormDataError;

/// Default maximum file size in bytes (16 MB)
pub const DEFAULT_MAX_FILE_SIZE: u64 = 16 * 1024 * 1024;

/// Strategy for handling non-UTF-8 content
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EncodingStrategy {
    /// Replace invalid bytes with U+FFFD
    #[default]
    Lossy,
    /// Fail the file
    Strict,
}

impl std::str::FromStr for EncodingStrategy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "lossy" => Ok(EncodingStrategy::Lossy),
            "strict" => Ok(EncodingStrategy::Strict),
            _ => Err(format!("Unknown encoding strategy: {}. Available: lossy, strict", s)),
        }
    }
}

/// Configuration for file reading
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileReadConfig {
    /// Maximum file size to load (bytes)
    pub max_file_size: u64,

    /// How to handle non-UTF-8 content
    pub encoding_strategy: EncodingStrategy,
}

impl Default for FileReadConfig {
    fn default() -> Self {
        Self {
            max_file_size: DEFAULT_MAX_FILE_SIZE,
            encoding_strategy: EncodingStrategy::Lossy,
        }
    }
}

/// Content of a successfully read form file
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormContent {
    pub text: String,

    /// Whether lossy conversion was used
    pub lossy: bool,
}

/// Read a form file and join its lines
pub fn read_form_file(path: &Path, config: &FileReadConfig) -> Result<FormContent, FormDataError> {
    let file = fs::File::open(path).map_err(|e| FormDataError::from_io(path.to_path_buf(), e))?;
    let size = file
        .metadata()
        .map_err(|e| FormDataError::from_io(path.to_path_buf(), e))?
        .len();

    if size > config.max_file_size {
        return Err(FormDataError::TooLarge {
            path: path.to_path_buf(),
            size,
            limit: config.max_file_size,
        });
    }

    let mut reader = std::io::BufReader::new(file);
    let mut buffer = Vec::with_capacity(size as usize);
    // The file may grow between metadata and read
    reader
        .by_ref()
        .take(config.max_file_size.saturating_add(1))
        .read_to_end(&mut buffer)
        .map_err(|e| FormDataError::from_io(path.to_path_buf(), e))?;
    if buffer.len() as u64 > config.max_file_size {
        return Err(FormDataError::TooLarge {
            path: path.to_path_buf(),
            size: buffer.len() as u64,
            limit: config.max_file_size,
        });
    }

    let (text, lossy) = match String::from_utf8(buffer) {
        Ok(text) => (text, false),
        Err(err) => match config.encoding_strategy {
            EncodingStrategy::Strict => {
                return Err(FormDataError::InvalidEncoding {
                    path: path.to_path_buf(),
                })
            }
            EncodingStrategy::Lossy => {
                (String::from_utf8_lossy(err.as_bytes()).into_owned(), true)
            }
        },
    };

    Ok(FormContent {
        text: join_lines(&text),
        lossy,
    })
}

/// Concatenate lines without separators.
///
/// Recognizes `\n`, `\r\n` and a lone `\r` as line terminators.
pub fn join_lines(text: &str) -> String {
    text.chars().filter(|c| *c != '\n' && *c != '\r').collect()
}
