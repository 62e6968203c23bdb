//! The content item being exported and its metadata store.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::error::Result;

/// Where a pull quote is inserted into the article.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PullquotePosition {
    Top,
    Middle,
    Bottom,
}

impl PullquotePosition {
    /// Index in a list of `len` components at which insertion starts.
    pub fn start_index(self, len: usize) -> usize {
        match self {
            PullquotePosition::Top => 0,
            PullquotePosition::Middle => len / 2,
            PullquotePosition::Bottom => 3 * len / 4,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CoverImage {
    pub url: String,
    pub caption: Option<String>,
}

/// One item of editor content.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Content {
    /// Identifier of the item, used for metadata lookups.
    pub id: String,
    pub title: Option<String>,
    /// Body HTML as produced by the editor.
    pub html: String,
    pub cover: Option<CoverImage>,
    pub author: Option<String>,
    pub date: Option<String>,
    /// Pre-formatted byline; takes precedence over author and date.
    pub byline: Option<String>,
    /// Short summary, shown by the intro component.
    pub excerpt: Option<String>,
    pub pullquote: Option<String>,
    pub pullquote_position: Option<PullquotePosition>,
}

impl Content {
    pub fn new(id: &str, html: &str) -> Self {
        Self {
            id: id.to_string(),
            html: html.to_string(),
            ..Self::default()
        }
    }

    pub fn with_title(mut self, title: &str) -> Self {
        self.title = Some(title.to_string());
        self
    }

    pub fn with_cover(mut self, url: &str) -> Self {
        self.cover = Some(CoverImage {
            url: url.to_string(),
            caption: None,
        });
        self
    }

    pub fn with_pullquote(mut self, text: &str, position: PullquotePosition) -> Self {
        self.pullquote = Some(text.to_string());
        self.pullquote_position = Some(position);
        self
    }
}

/// Per-item metadata backing `#postmeta.*#` tokens.
pub trait MetadataStore {
    /// Value of `key` for the item `context_id`, or `None` if unset.
    fn get_metadata(&self, context_id: &str, key: &str) -> Result<Option<String>>;
}

/// [`MetadataStore`] backed by a map.
#[derive(Debug, Clone, Default)]
pub struct InMemoryMetadata {
    values: BTreeMap<(String, String), String>,
}

impl InMemoryMetadata {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, context_id: &str, key: &str, value: &str) {
        self.values
            .insert((context_id.to_string(), key.to_string()), value.to_string());
    }
}

impl MetadataStore for InMemoryMetadata {
    fn get_metadata(&self, context_id: &str, key: &str) -> Result<Option<String>> {
        Ok(self
            .values
            .get(&(context_id.to_string(), key.to_string()))
            .cloned())
    }
}
