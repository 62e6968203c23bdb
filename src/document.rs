//! The article document handed to the publishing API.

use serde::Serialize;
use serde_json::{Map, Value};

use crate::error::Result;

/// Format version of the generated document.
pub const DOCUMENT_VERSION: &str = "1.7";

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Document {
    pub version: String,
    pub identifier: String,
    pub language: String,
    pub title: String,
    pub layout: DocumentLayout,
    pub document_style: DocumentStyle,
    pub metadata: DocumentMetadata,
    pub components: Vec<Value>,
    pub component_layouts: Map<String, Value>,
    pub component_styles: Map<String, Value>,
    pub component_text_styles: Map<String, Value>,
}

impl Document {
    pub fn to_json(&self) -> Result<Value> {
        Ok(serde_json::to_value(self)?)
    }

    pub fn to_json_string(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct DocumentLayout {
    pub columns: u32,
    pub width: u32,
    pub margin: u32,
    pub gutter: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DocumentStyle {
    pub background_color: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct DocumentMetadata {
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub authors: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub excerpt: Option<String>,
    #[serde(rename = "thumbnailURL", skip_serializing_if = "Option::is_none")]
    pub thumbnail_url: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_document_field_names() {
        let document = Document {
            version: DOCUMENT_VERSION.to_string(),
            identifier: "42".to_string(),
            language: "en".to_string(),
            title: "Hi".to_string(),
            layout: DocumentLayout {
                columns: 7,
                width: 1024,
                margin: 100,
                gutter: 20,
            },
            document_style: DocumentStyle {
                background_color: "#fafafa".to_string(),
            },
            metadata: DocumentMetadata {
                thumbnail_url: Some("bundle://a.jpg".to_string()),
                ..DocumentMetadata::default()
            },
            components: Vec::new(),
            component_layouts: Map::new(),
            component_styles: Map::new(),
            component_text_styles: Map::new(),
        };

        let value = document.to_json().unwrap();
        assert_eq!(value["documentStyle"], json!({"backgroundColor": "#fafafa"}));
        assert_eq!(value["metadata"], json!({"thumbnailURL": "bundle://a.jpg"}));
        assert_eq!(value["componentTextStyles"], json!({}));
        assert_eq!(value["layout"]["columns"], 7);
    }
}
