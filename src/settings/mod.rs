//! Export settings.
//!
//! Settings are the export-level switches; everything visual lives on the
//! [`Theme`](crate::theme::Theme). Like themes they load from TOML with
//! every key optional:
//!
//! ```toml
//! use_remote_images = true
//! html_support = true
//! ```

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::Result;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Settings {
    /// Reference media by their original URL instead of bundling them.
    pub use_remote_images: bool,
    /// Emit body text as HTML rather than Markdown, and allow HTML tables.
    pub html_support: bool,
    /// Let photos span the full page width instead of the body column.
    pub full_bleed_images: bool,
    /// Keep advertisement placeholders.
    pub enable_advertisement: bool,
    /// Document language code.
    pub language: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            use_remote_images: false,
            html_support: false,
            full_bleed_images: false,
            enable_advertisement: true,
            language: "en".to_string(),
        }
    }
}

impl Settings {
    pub fn from_toml_str(content: &str) -> Result<Self> {
        Ok(toml::from_str(content)?)
    }

    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }
}

#[cfg(test)]
mod tests {
    use tempfile::TempDir;

    use super::*;
    use crate::error::Error;

    #[test]
    fn test_empty_document_gives_defaults() {
        assert_eq!(Settings::from_toml_str("").unwrap(), Settings::default());
    }

    #[test]
    fn test_partial_settings() {
        let settings = Settings::from_toml_str("html_support = true\nlanguage = \"fr\"\n").unwrap();
        assert!(settings.html_support);
        assert_eq!(settings.language, "fr");
        assert!(!settings.use_remote_images);
        assert!(settings.enable_advertisement);
    }

    #[test]
    fn test_unknown_key_rejected() {
        let err = Settings::from_toml_str("remote_images = true\n").unwrap_err();
        assert!(matches!(err, Error::Config(_)));
    }

    #[test]
    fn test_load_from_file() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("settings.toml");
        std::fs::write(&path, "use_remote_images = true\n").unwrap();
        assert!(Settings::load(&path).unwrap().use_remote_images);

        let missing = Settings::load(&tmp.path().join("nope.toml")).unwrap_err();
        assert!(matches!(missing, Error::Io(_)));
    }
}
