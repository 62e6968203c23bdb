//! Assembling the article document.
//!
//! The [`Exporter`] parses an item's HTML into components and then runs the
//! builder passes over the result, in this order:
//!
//! 1. meta components (cover, title, byline, intro) are prepended;
//! 2. floating components are anchored to neighbouring body text;
//! 3. the item's pull quote is inserted;
//! 4. body text runs are merged;
//! 5. everything after the cover header is wrapped in a container.
//!
//! Nested exports (asides, footnotes) run only anchoring and grouping.
//!
//! ```
//! use folio::{Content, Exporter, FilenameBundler, Settings, Theme, ThemeLibrary};
//!
//! let settings = Settings::default();
//! let themes = ThemeLibrary::with_theme(Theme::default());
//! let exporter = Exporter::new(&settings, &themes, &FilenameBundler);
//!
//! let export = exporter.export(&Content::new("1", "<p>Hello</p>")).unwrap();
//! assert_eq!(export.document.components.len(), 1);
//! ```

mod anchoring;
mod grouping;
mod meta;
mod pullquote;
mod regroup;

use serde::Serialize;
use serde_json::Value;
use tracing::info;

use crate::bundle::MediaBundler;
use crate::component::{Component, ComponentRegistry};
use crate::content::{Content, MetadataStore};
use crate::context::{Diagnostic, DiagnosticKind, ExportContext};
use crate::document::{DOCUMENT_VERSION, Document, DocumentLayout, DocumentMetadata, DocumentStyle};
use crate::error::{Error, Result};
use crate::parser::ContentParser;
use crate::settings::Settings;
use crate::spec::SpecCatalog;
use crate::theme::{Theme, ThemeStore};

/// Outcome of one export.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Export {
    pub document: Document,
    /// Media URLs the document references, in first-use order.
    pub bundles: Vec<String>,
    pub diagnostics: Vec<Diagnostic>,
}

/// Exports content items with fixed settings and collaborators.
///
/// All per-export state lives in the [`ExportContext`] created by each call,
/// so one exporter can serve any number of exports, also from several
/// threads.
pub struct Exporter<'a> {
    settings: &'a Settings,
    themes: &'a (dyn ThemeStore + Sync),
    bundler: &'a (dyn MediaBundler + Sync),
    metadata: Option<&'a (dyn MetadataStore + Sync)>,
    components: ComponentRegistry,
    catalog: SpecCatalog,
}

impl<'a> Exporter<'a> {
    pub fn new(
        settings: &'a Settings,
        themes: &'a (dyn ThemeStore + Sync),
        bundler: &'a (dyn MediaBundler + Sync),
    ) -> Self {
        let components = ComponentRegistry::new();
        let catalog = components.catalog();
        Self {
            settings,
            themes,
            bundler,
            metadata: None,
            components,
            catalog,
        }
    }

    pub fn with_metadata(mut self, metadata: &'a (dyn MetadataStore + Sync)) -> Self {
        self.metadata = Some(metadata);
        self
    }

    /// Use a custom component registry; the template catalog follows it.
    pub fn with_components(mut self, components: ComponentRegistry) -> Self {
        self.catalog = components.catalog();
        self.components = components;
        self
    }

    pub fn catalog(&self) -> &SpecCatalog {
        &self.catalog
    }

    pub fn components(&self) -> &ComponentRegistry {
        &self.components
    }

    /// Export `content` with the active theme.
    pub fn export(&self, content: &Content) -> Result<Export> {
        self.export_with_theme(content, None)
    }

    /// Export `content` with the named theme, or the active one.
    ///
    /// Fails only when the theme cannot be resolved; every other problem
    /// is reported in [`Export::diagnostics`].
    pub fn export_with_theme(&self, content: &Content, theme: Option<&str>) -> Result<Export> {
        let theme = match theme {
            Some(name) => self
                .themes
                .theme(name)
                .ok_or_else(|| Error::ThemeNotFound(name.to_string()))?,
            None => self.themes.active()?,
        };

        let mut ctx = ExportContext::new(self.settings, theme, &self.catalog, &self.components, self.bundler);
        if let Some(metadata) = self.metadata {
            ctx = ctx.with_metadata(metadata, &content.id);
        }

        let components = build_components(&mut ctx, content);
        let mut rendered = Vec::with_capacity(components.len());
        for component in &components {
            match component.to_json() {
                Some(value) => rendered.push(value),
                None => ctx.log_error(
                    DiagnosticKind::InvalidComponent,
                    format!("omitted {} component", component.kind.name()),
                ),
            }
        }
        let thumbnail_url = thumbnail(&components);

        let parts = ctx.into_parts();
        info!(
            target: "folio::builder",
            id = %content.id,
            components = rendered.len(),
            bundles = parts.bundles.len(),
            diagnostics = parts.diagnostics.len(),
            "exported content"
        );

        let document = Document {
            version: DOCUMENT_VERSION.to_string(),
            identifier: content.id.clone(),
            language: self.settings.language.clone(),
            title: content.title.clone().unwrap_or_default(),
            layout: document_layout(theme),
            document_style: DocumentStyle {
                background_color: theme.body.background_color.clone(),
            },
            metadata: DocumentMetadata {
                authors: content.author.iter().cloned().collect(),
                excerpt: content.excerpt.clone(),
                thumbnail_url,
            },
            components: rendered,
            component_layouts: parts.layouts.into_map(),
            component_styles: parts.styles.into_map(),
            component_text_styles: parts.text_styles.into_map(),
        };
        Ok(Export {
            document,
            bundles: parts.bundles.into_vec(),
            diagnostics: parts.diagnostics,
        })
    }
}

fn document_layout(theme: &Theme) -> DocumentLayout {
    DocumentLayout {
        columns: theme.layout_columns(),
        width: theme.layout.width,
        margin: theme.layout.margin,
        gutter: theme.layout.gutter,
    }
}

/// Photo URL of the cover header, if there is one.
fn thumbnail(components: &[Component]) -> Option<String> {
    components
        .iter()
        .find(|c| c.role == "header")
        .and_then(|header| header.children.iter().find(|c| c.role == "photo"))
        .and_then(|photo| photo.json.get("URL"))
        .and_then(Value::as_str)
        .map(str::to_string)
}

/// Parse `content` and run every builder pass.
pub(crate) fn build_components(ctx: &mut ExportContext<'_>, content: &Content) -> Vec<Component> {
    let mut components = ContentParser::new().parse(&content.html, ctx);
    meta::inject_meta(ctx, content, &mut components);
    anchoring::anchor_components(ctx, &mut components);
    pullquote::insert_pullquote(ctx, content, &mut components);
    let components = grouping::group_body(ctx, components);
    regroup::regroup_after_cover(ctx, components)
}

/// Components for an HTML fragment nested inside another component.
pub(crate) fn build_nested(ctx: &mut ExportContext<'_>, html: &str) -> Vec<Component> {
    ctx.enter_nested();
    let mut components = ContentParser::new().parse(html, ctx);
    anchoring::anchor_components(ctx, &mut components);
    let components = grouping::group_body(ctx, components);
    ctx.exit_nested();
    components
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bundle::FilenameBundler;
    use crate::theme::ThemeLibrary;

    #[test]
    fn test_unknown_theme_is_fatal() {
        let settings = Settings::default();
        let themes = ThemeLibrary::with_theme(Theme::default());
        let exporter = Exporter::new(&settings, &themes, &FilenameBundler);

        let err = exporter
            .export_with_theme(&Content::new("1", "<p>x</p>"), Some("Missing"))
            .unwrap_err();
        assert!(matches!(err, Error::ThemeNotFound(ref name) if name == "Missing"));
        assert!(err.is_fatal());
    }

    #[test]
    fn test_nested_export_skips_top_level_passes() {
        let settings = Settings::default();
        let theme = Theme::default();
        let registry = ComponentRegistry::new();
        let catalog = registry.catalog();
        let mut ctx = ExportContext::new(&settings, &theme, &catalog, &registry, &FilenameBundler);

        let components = build_nested(&mut ctx, "<p>a</p><p>b</p>");
        assert_eq!(components.len(), 1);
        assert_eq!(components[0].text(), Some("a\n\nb"));
        assert!(!ctx.is_nested());
    }

    #[test]
    fn test_thumbnail_from_cover() {
        let settings = Settings::default();
        let themes = ThemeLibrary::with_theme(Theme::default());
        let exporter = Exporter::new(&settings, &themes, &FilenameBundler);

        let content = Content::new("1", "<p>Body</p>").with_cover("https://x.test/img/cover%20one.jpg");
        let export = exporter.export(&content).unwrap();
        assert_eq!(
            export.document.metadata.thumbnail_url.as_deref(),
            Some("bundle://cover one.jpg")
        );
        assert_eq!(export.bundles, vec!["https://x.test/img/cover%20one.jpg".to_string()]);
    }
}
