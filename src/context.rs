//! Per-export state.
//!
//! An [`ExportContext`] is created for each export and threaded through the
//! parser, the component builders and the builder passes. It borrows the
//! read-only collaborators and owns everything the export accumulates:
//! registries, bundles, diagnostics and the identifier counter.

use serde::Serialize;
use serde_json::{Map, Value};
use tracing::warn;

use crate::bundle::{Bundles, MediaBundler};
use crate::component::{ComponentRegistry, StyleRef};
use crate::content::MetadataStore;
use crate::registry::Registry;
use crate::settings::Settings;
use crate::spec::{SpecCatalog, Substitution, TokenValues};
use crate::theme::Theme;

/// Category of a recoverable problem.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DiagnosticKind {
    /// An element no component kind handles.
    UnsupportedElement,
    /// A component that was matched but had nothing valid to emit.
    InvalidComponent,
    Metadata,
    Bundle,
}

impl DiagnosticKind {
    pub fn as_str(self) -> &'static str {
        match self {
            DiagnosticKind::UnsupportedElement => "unsupported_element",
            DiagnosticKind::InvalidComponent => "invalid_component",
            DiagnosticKind::Metadata => "metadata",
            DiagnosticKind::Bundle => "bundle",
        }
    }
}

/// A recoverable problem met during an export.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Diagnostic {
    pub kind: DiagnosticKind,
    pub message: String,
}

/// Collaborators and accumulated state of one export.
pub struct ExportContext<'a> {
    pub settings: &'a Settings,
    pub theme: &'a Theme,
    pub catalog: &'a SpecCatalog,
    pub components: &'a ComponentRegistry,
    metadata: Option<&'a dyn MetadataStore>,
    bundler: &'a dyn MediaBundler,
    content_id: String,
    theme_values: TokenValues,

    pub layouts: Registry,
    pub styles: Registry,
    pub text_styles: Registry,
    pub bundles: Bundles,
    diagnostics: Vec<Diagnostic>,
    next_uid: usize,
    dropcap_applied: bool,
    depth: usize,
}

impl<'a> ExportContext<'a> {
    pub fn new(
        settings: &'a Settings,
        theme: &'a Theme,
        catalog: &'a SpecCatalog,
        components: &'a ComponentRegistry,
        bundler: &'a dyn MediaBundler,
    ) -> Self {
        Self {
            settings,
            theme,
            catalog,
            components,
            metadata: None,
            bundler,
            content_id: String::new(),
            theme_values: theme_values(theme),
            layouts: Registry::new(),
            styles: Registry::new(),
            text_styles: Registry::new(),
            bundles: Bundles::new(),
            diagnostics: Vec::new(),
            next_uid: 0,
            dropcap_applied: false,
            depth: 0,
        }
    }

    pub fn with_metadata(mut self, metadata: &'a dyn MetadataStore, content_id: &str) -> Self {
        self.metadata = Some(metadata);
        self.content_id = content_id.to_string();
        self
    }

    pub fn content_id(&self) -> &str {
        &self.content_id
    }

    /// Token values derived from the theme, to be extended per component.
    pub fn values(&self) -> TokenValues {
        self.theme_values.clone()
    }

    /// Record a recoverable problem.
    pub fn log_error(&mut self, kind: DiagnosticKind, message: impl Into<String>) {
        let message = message.into();
        warn!(target: "folio::export", kind = kind.as_str(), "{message}");
        self.diagnostics.push(Diagnostic { kind, message });
    }

    pub fn diagnostics(&self) -> &[Diagnostic] {
        &self.diagnostics
    }

    /// A fresh identifier, unique within this export.
    pub fn next_identifier(&mut self, prefix: &str) -> String {
        self.next_uid += 1;
        format!("{prefix}-{}", self.next_uid)
    }

    /// Whether a nested export (aside, footnotes) is running.
    pub fn is_nested(&self) -> bool {
        self.depth > 0
    }

    pub(crate) fn enter_nested(&mut self) {
        self.depth += 1;
    }

    pub(crate) fn exit_nested(&mut self) {
        self.depth = self.depth.saturating_sub(1);
    }

    /// True exactly once per export, for the first top-level body text,
    /// when the theme enables drop caps.
    pub fn take_dropcap(&mut self) -> bool {
        if !self.theme.dropcap.enabled || self.dropcap_applied || self.is_nested() {
            return false;
        }
        self.dropcap_applied = true;
        true
    }

    /// Substitute the template in effect for `component`/`name`.
    ///
    /// Unknown specs render as `Null` with a diagnostic; metadata failures
    /// remove the affected value and are reported.
    pub fn render_spec(&mut self, component: &str, name: &str, values: &TokenValues) -> Value {
        let catalog = self.catalog;
        let Some(spec) = catalog.get(component, name) else {
            self.log_error(
                DiagnosticKind::InvalidComponent,
                format!("no spec {component}/{name} is registered"),
            );
            return Value::Null;
        };
        let template = spec.resolve(self.theme);

        let mut substitution = Substitution::new(values);
        if let Some(metadata) = self.metadata {
            substitution = substitution.with_metadata(metadata, &self.content_id);
        }
        let rendered = substitution.apply(template);
        let errors = substitution.into_errors();
        for err in errors {
            self.log_error(DiagnosticKind::Metadata, err.to_string());
        }
        rendered
    }

    /// Like [`render_spec`](Self::render_spec), as an object.
    pub fn render_object(&mut self, component: &str, name: &str, values: &TokenValues) -> Map<String, Value> {
        match self.render_spec(component, name, values) {
            Value::Object(map) => map,
            _ => Map::new(),
        }
    }

    /// Render a layout spec and register it under its spec name.
    pub fn register_layout(&mut self, component: &str, name: &str, values: &TokenValues) -> StyleRef {
        let definition = self.render_spec(component, name, values);
        self.layouts.register(name, definition);
        StyleRef::Named(name.to_string())
    }

    pub fn register_style(&mut self, component: &str, name: &str, values: &TokenValues) -> StyleRef {
        let definition = self.render_spec(component, name, values);
        self.styles.register(name, definition);
        StyleRef::Named(name.to_string())
    }

    pub fn register_text_style(&mut self, component: &str, name: &str, values: &TokenValues) -> StyleRef {
        let definition = self.render_spec(component, name, values);
        self.text_styles.register(name, definition);
        StyleRef::Named(name.to_string())
    }

    /// Reference for a media URL.
    ///
    /// With remote images enabled the URL is used as is. Otherwise it is
    /// bundled; on failure the problem is logged and `None` returned.
    pub fn bundle(&mut self, url: &str) -> Option<String> {
        if self.settings.use_remote_images {
            return Some(url.to_string());
        }
        match self.bundler.bundle(url) {
            Ok(reference) => {
                self.bundles.insert(url);
                Some(reference)
            }
            Err(err) => {
                self.log_error(DiagnosticKind::Bundle, err.to_string());
                None
            }
        }
    }

    pub(crate) fn into_parts(self) -> ExportParts {
        ExportParts {
            layouts: self.layouts,
            styles: self.styles,
            text_styles: self.text_styles,
            bundles: self.bundles,
            diagnostics: self.diagnostics,
        }
    }
}

/// What an export accumulated besides its components.
pub(crate) struct ExportParts {
    pub layouts: Registry,
    pub styles: Registry,
    pub text_styles: Registry,
    pub bundles: Bundles,
    pub diagnostics: Vec<Diagnostic>,
}

fn theme_values(theme: &Theme) -> TokenValues {
    let mut values = TokenValues::new()
        .with("layout_columns", theme.layout_columns())
        .with("body_column_span", theme.body_column_span())
        .with("body_offset", theme.body_offset())
        .with("alignment_offset", theme.alignment_offset())
        .with("anchored_column_span", theme.anchored_column_span())
        .with("layout_width", theme.layout.width)
        .with("layout_margin", theme.layout.margin)
        .with("layout_gutter", theme.layout.gutter)
        .with("body_font", theme.body.font.as_str())
        .with("body_size", theme.body.size)
        .with("body_color", theme.body.color.as_str())
        .with("body_link_color", theme.body.link_color.as_str())
        .with("body_line_height", theme.body.line_height)
        .with("body_tracking", theme.body.tracking)
        .with("body_background_color", theme.body.background_color.as_str())
        .with("body_orientation", theme.body.orientation.as_str())
        .with("dropcap_font", theme.dropcap.font.as_str())
        .with("dropcap_color", theme.dropcap.color.as_str())
        .with("dropcap_number_of_lines", theme.dropcap.number_of_lines)
        .with("heading_font", theme.heading.font.as_str())
        .with("heading_color", theme.heading.color.as_str())
        .with("heading_tracking", theme.heading.tracking)
        .with("pullquote_font", theme.pullquote.font.as_str())
        .with("pullquote_size", theme.pullquote.size)
        .with("pullquote_color", theme.pullquote.color.as_str())
        .with("pullquote_line_height", theme.pullquote.line_height)
        .with("pullquote_border_color", theme.pullquote.border_color.as_str())
        .with("pullquote_transform", theme.pullquote.transform.as_str())
        .with("blockquote_font", theme.blockquote.font.as_str())
        .with("blockquote_size", theme.blockquote.size)
        .with("blockquote_color", theme.blockquote.color.as_str())
        .with("blockquote_line_height", theme.blockquote.line_height)
        .with("blockquote_background_color", theme.blockquote.background_color.as_str())
        .with("blockquote_border_color", theme.blockquote.border_color.as_str());

    for level in 1..=6 {
        let (size, line_height) = theme.heading.metrics(level);
        values.insert(&format!("heading{level}_size"), size);
        values.insert(&format!("heading{level}_line_height"), line_height);
    }

    for (prefix, text) in [
        ("title", &theme.title),
        ("byline", &theme.byline),
        ("intro", &theme.intro),
        ("caption", &theme.caption),
        ("monospace", &theme.monospace),
    ] {
        values.insert(&format!("{prefix}_font"), text.font.as_str());
        values.insert(&format!("{prefix}_size"), text.size);
        values.insert(&format!("{prefix}_color"), text.color.as_str());
        values.insert(&format!("{prefix}_line_height"), text.line_height);
    }

    values
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::bundle::FilenameBundler;
    use crate::content::InMemoryMetadata;
    use crate::spec::ComponentSpec;

    struct Fixture {
        settings: Settings,
        theme: Theme,
        catalog: SpecCatalog,
        components: ComponentRegistry,
    }

    impl Fixture {
        fn new() -> Self {
            let mut catalog = SpecCatalog::new();
            catalog.register(ComponentSpec::new(
                "body",
                "body-layout",
                "Layout",
                json!({"columnStart": "#body_offset#", "columnSpan": "#body_column_span#"}),
            ));
            catalog.register(ComponentSpec::new(
                "body",
                "json",
                "JSON",
                json!({"text": "#text#", "subtitle": "#postmeta.subtitle#"}),
            ));
            Self {
                settings: Settings::default(),
                theme: Theme::default(),
                catalog,
                components: ComponentRegistry::new(),
            }
        }

        fn context(&self) -> ExportContext<'_> {
            ExportContext::new(&self.settings, &self.theme, &self.catalog, &self.components, &FilenameBundler)
        }
    }

    #[test]
    fn test_register_layout_uses_theme_values() {
        let fixture = Fixture::new();
        let mut ctx = fixture.context();
        let values = ctx.values();
        let layout = ctx.register_layout("body", "body-layout", &values);

        assert_eq!(layout, StyleRef::Named("body-layout".to_string()));
        assert_eq!(
            ctx.layouts.get("body-layout"),
            Some(&json!({"columnStart": 0, "columnSpan": 5}))
        );
    }

    #[test]
    fn test_render_spec_with_metadata() {
        let fixture = Fixture::new();
        let mut meta = InMemoryMetadata::new();
        meta.insert("9", "subtitle", "Sub");
        let mut ctx = fixture.context().with_metadata(&meta, "9");

        let values = ctx.values().with("text", "Hi");
        assert_eq!(
            ctx.render_spec("body", "json", &values),
            json!({"text": "Hi", "subtitle": "Sub"})
        );
    }

    #[test]
    fn test_unknown_spec_is_diagnosed() {
        let fixture = Fixture::new();
        let mut ctx = fixture.context();
        let values = ctx.values();
        assert_eq!(ctx.render_spec("body", "missing", &values), Value::Null);
        assert_eq!(ctx.diagnostics()[0].kind, DiagnosticKind::InvalidComponent);
    }

    #[test]
    fn test_bundle_records_url() {
        let fixture = Fixture::new();
        let mut ctx = fixture.context();
        assert_eq!(ctx.bundle("https://x.test/a.jpg").as_deref(), Some("bundle://a.jpg"));
        assert_eq!(ctx.bundle("https://x.test/a.jpg").as_deref(), Some("bundle://a.jpg"));
        assert_eq!(ctx.bundles.len(), 1);

        assert_eq!(ctx.bundle("https://x.test/"), None);
        assert_eq!(ctx.diagnostics()[0].kind, DiagnosticKind::Bundle);
    }

    #[test]
    fn test_remote_images_pass_through() {
        let mut fixture = Fixture::new();
        fixture.settings.use_remote_images = true;
        let mut ctx = fixture.context();
        assert_eq!(ctx.bundle("https://x.test/a.jpg").as_deref(), Some("https://x.test/a.jpg"));
        assert!(ctx.bundles.is_empty());
    }

    #[test]
    fn test_dropcap_taken_once_at_top_level() {
        let mut fixture = Fixture::new();
        fixture.theme.dropcap.enabled = true;
        let mut ctx = fixture.context();

        ctx.enter_nested();
        assert!(!ctx.take_dropcap());
        ctx.exit_nested();

        assert!(ctx.take_dropcap());
        assert!(!ctx.take_dropcap());
    }

    #[test]
    fn test_identifiers_are_sequential() {
        let fixture = Fixture::new();
        let mut ctx = fixture.context();
        assert_eq!(ctx.next_identifier("body"), "body-1");
        assert_eq!(ctx.next_identifier("photo"), "photo-2");
    }
}
