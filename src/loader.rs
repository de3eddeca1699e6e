//! Input loading
//!
//! Reads SPDX 3 documents from local files, HTTP(S) URLs or memory and
//! hands the text to the JSON-LD reader.

use std::path::PathBuf;

use crate::error::MergeError;
use crate::jsonld::deserialize;
use crate::objset::ObjectSet;

/// Source from which to load an SPDX 3 document
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InputSource {
    /// Local JSON-LD file
    File(PathBuf),
    /// Remote document fetched over HTTP(S)
    Url(String),
    /// Document text already in memory
    Memory { name: String, content: String },
}

impl InputSource {
    /// Interpret a command line value: http(s) URLs are fetched, anything
    /// else is a path
    pub fn parse(source: &str) -> Self {
        if is_url(source) {
            InputSource::Url(source.to_string())
        } else {
            InputSource::File(PathBuf::from(source))
        }
    }

    pub fn memory(name: impl Into<String>, content: impl Into<String>) -> Self {
        InputSource::Memory {
            name: name.into(),
            content: content.into(),
        }
    }

    /// Human readable name used in errors and logs
    pub fn name(&self) -> String {
        match self {
            InputSource::File(p) => p.display().to_string(),
            InputSource::Url(u) => u.clone(),
            InputSource::Memory { name, .. } => name.clone(),
        }
    }
}

/// Check if a source string is an http(s) URL
fn is_url(source: &str) -> bool {
    match url::Url::parse(source) {
        Ok(u) => u.scheme() == "http" || u.scheme() == "https",
        Err(_) => false,
    }
}

/// Read the raw text of a source
pub fn read_source(source: &InputSource) -> Result<String, MergeError> {
    match source {
        InputSource::File(path) => {
            std::fs::read_to_string(path).map_err(|e| MergeError::LoadError {
                path: path.display().to_string(),
                reason: e.to_string(),
            })
        }
        InputSource::Url(url) => fetch_url(url),
        InputSource::Memory { content, .. } => Ok(content.clone()),
    }
}

/// Simple URL fetch
fn fetch_url(url: &str) -> Result<String, MergeError> {
    let response = reqwest::blocking::get(url).map_err(|e| MergeError::LoadError {
        path: url.to_string(),
        reason: format!("HTTP request failed: {}", e),
    })?;

    let status = response.status();
    if !status.is_success() {
        return Err(MergeError::LoadError {
            path: url.to_string(),
            reason: format!("HTTP status {}", status),
        });
    }

    response.text().map_err(|e| MergeError::LoadError {
        path: url.to_string(),
        reason: format!("Failed to read response: {}", e),
    })
}

/// Load a source into a fresh collection
pub fn load(source: &InputSource) -> Result<ObjectSet, MergeError> {
    let content = read_source(source)?;
    deserialize(&content, &source.name())
}
