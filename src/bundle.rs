//! Media bundling.
//!
//! Components never embed media URLs directly. Each URL is handed to a
//! [`MediaBundler`], which returns the reference written into the document,
//! and is recorded in the export's [`Bundles`] so the caller can package the
//! files.

use percent_encoding::percent_decode_str;

use crate::error::{Error, Result};

/// Maps a media URL to the reference used in the document.
pub trait MediaBundler {
    fn bundle(&self, url: &str) -> Result<String>;
}

/// References media by file name: `https://x/a/photo%201.jpg?w=2` becomes
/// `bundle://photo 1.jpg`.
#[derive(Debug, Clone, Copy, Default)]
pub struct FilenameBundler;

impl MediaBundler for FilenameBundler {
    fn bundle(&self, url: &str) -> Result<String> {
        let name = file_name(url).ok_or_else(|| Error::Bundle {
            url: url.to_string(),
            reason: "URL has no file name".to_string(),
        })?;
        Ok(format!("bundle://{name}"))
    }
}

/// Decoded last path segment of `url`, ignoring query and fragment.
pub fn file_name(url: &str) -> Option<String> {
    let path = url.split(['?', '#']).next().unwrap_or_default();
    let segment = path.rsplit('/').next().filter(|s| !s.is_empty())?;
    let decoded = percent_decode_str(segment).decode_utf8_lossy();
    (!decoded.trim().is_empty()).then(|| decoded.into_owned())
}

/// Media URLs referenced by one export, in first-seen order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Bundles {
    urls: Vec<String>,
}

impl Bundles {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record `url`. Returns false if it was already present.
    pub fn insert(&mut self, url: &str) -> bool {
        if self.contains(url) {
            return false;
        }
        self.urls.push(url.to_string());
        true
    }

    pub fn contains(&self, url: &str) -> bool {
        self.urls.iter().any(|u| u == url)
    }

    pub fn len(&self) -> usize {
        self.urls.len()
    }

    pub fn is_empty(&self) -> bool {
        self.urls.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.urls.iter().map(String::as_str)
    }

    pub fn into_vec(self) -> Vec<String> {
        self.urls
    }
}
