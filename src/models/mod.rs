use crate::utils::validation::{sanitize_filename, split_extension};
use serde::{Deserialize, Serialize};
use std::fmt;
use utoipa::ToSchema;

/// Shared identifier linking a CSV upload to its PDF counterpart.
///
/// Always a fixed point of [`sanitize_filename`], so it is safe to use as a
/// path component in the upload folder.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct BaseName(String);

impl BaseName {
    /// Accepts an already-clean base name, e.g. one taken from a URL path
    pub fn parse(raw: &str) -> Option<Self> {
        if raw.is_empty() || sanitize_filename(raw) != raw {
            return None;
        }
        Some(Self(raw.to_string()))
    }

    /// Derives the base name from a filename by dropping its last extension.
    /// The stem is sanitized again since trimming the extension can expose a trailing `_` or `.`.
    pub fn from_filename(filename: &str) -> Option<Self> {
        let (stem, _) = split_extension(filename);
        Self::parse(&sanitize_filename(stem))
    }

    /// `<base>.<ext>`
    pub fn file_name(&self, extension: &str) -> String {
        format!("{}.{}", self.0, extension)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for BaseName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct VerifiedPair {
    pub csv_file_name: String,
    pub pdf_file_name: String,
}
