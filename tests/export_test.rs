//! End-to-end exports through the public API.

use serde_json::{Value, json};

use folio::content::PullquotePosition;
use folio::{
    ComponentRegistry, Content, DiagnosticKind, Export, Exporter, FilenameBundler, InMemoryMetadata, Settings, Theme,
    ThemeLibrary,
};

fn export_with(settings: &Settings, theme: Theme, content: &Content) -> Export {
    let themes = ThemeLibrary::with_theme(theme);
    let exporter = Exporter::new(settings, &themes, &FilenameBundler);
    exporter.export(content).expect("export should succeed")
}

fn export(html: &str) -> Export {
    export_with(&Settings::default(), Theme::default(), &Content::new("1", html))
}

fn roles(components: &[Value]) -> Vec<&str> {
    components.iter().map(|c| c["role"].as_str().unwrap_or_default()).collect()
}

// ============================================================================
// Basic documents
// ============================================================================

#[test]
fn test_single_paragraph() {
    let export = export("<p>Hello</p>");
    let document = &export.document;

    assert_eq!(
        document.components,
        vec![json!({
            "role": "body",
            "text": "Hello",
            "format": "markdown",
            "layout": "body-layout-last",
            "textStyle": "default-body",
        })]
    );
    assert_eq!(
        document.component_layouts["body-layout-last"],
        json!({"columnStart": 0, "columnSpan": 5, "margin": {"top": 12, "bottom": 30}})
    );
    assert_eq!(document.component_text_styles["default-body"]["fontName"], "AvenirNext-Regular");
    assert_eq!(document.component_text_styles["default-body"]["tracking"], 0);
    assert!(export.bundles.is_empty());
    assert!(export.diagnostics.is_empty());
}

#[test]
fn test_heading_and_body() {
    let export = export("<h1>Title</h1><p>Body text</p>");
    let components = &export.document.components;

    assert_eq!(roles(components), vec!["heading1", "body"]);
    assert_eq!(components[0]["text"], "Title");
    assert_eq!(components[0]["layout"], "heading-layout");
    assert_eq!(components[0]["textStyle"], "default-heading-1");
    assert_eq!(components[1]["text"], "Body text");
    assert_eq!(components[1]["layout"], "body-layout-last");
    assert_eq!(
        export.document.component_text_styles["default-heading-1"]["fontSize"],
        48
    );
}

#[test]
fn test_document_envelope() {
    let mut content = Content::new("post-9", "<p>Text</p>").with_title("Headline");
    content.author = Some("Ada Lovelace".to_string());
    content.excerpt = Some("Short".to_string());
    let export = export_with(&Settings::default(), Theme::default(), &content);

    let value = export.document.to_json().unwrap();
    assert_eq!(value["version"], "1.7");
    assert_eq!(value["identifier"], "post-9");
    assert_eq!(value["language"], "en");
    assert_eq!(value["title"], "Headline");
    assert_eq!(value["layout"], json!({"columns": 7, "width": 1024, "margin": 100, "gutter": 20}));
    assert_eq!(value["documentStyle"], json!({"backgroundColor": "#fafafa"}));
    assert_eq!(value["metadata"], json!({"authors": ["Ada Lovelace"], "excerpt": "Short"}));
    assert_eq!(
        roles(&export.document.components),
        vec!["title", "byline", "body"]
    );
    assert_eq!(export.document.components[1]["text"], "by Ada Lovelace");
}

#[test]
fn test_html_support_keeps_markup() {
    let settings = Settings {
        html_support: true,
        ..Settings::default()
    };
    let export = export_with(&settings, Theme::default(), &Content::new("1", "<p>Hello <b>x</b></p>"));
    let body = &export.document.components[0];
    assert_eq!(body["format"], "html");
    assert_eq!(body["text"], "<p>Hello <b>x</b></p>");
}

// ============================================================================
// Builder passes
// ============================================================================

#[test]
fn test_pullquote_at_top() {
    let content = Content::new("1", "<p>A</p><p>B</p>").with_pullquote("Quoted", PullquotePosition::Top);
    let export = export_with(&Settings::default(), Theme::default(), &content);
    let components = &export.document.components;

    assert_eq!(roles(components), vec!["pullquote", "body"]);
    assert_eq!(components[0]["text"], "Quoted");
    assert_eq!(components[0]["layout"], "anchor-layout-right");
    assert_eq!(components[0]["textStyle"], "default-pullquote");
    assert_eq!(
        components[0]["anchor"],
        json!({
            "targetComponentIdentifier": "body-1",
            "targetAnchorPosition": "center",
            "rangeStart": 0,
            "rangeLength": 1,
        })
    );
    assert_eq!(components[1]["identifier"], "body-1");
    assert_eq!(components[1]["text"], "A\n\nB");
    assert_eq!(
        export.document.component_text_styles["default-pullquote"]["textTransform"],
        "uppercase"
    );
}

#[test]
fn test_floated_image_anchors_to_text() {
    let html = r#"<p>Before</p><img class="alignleft" src="https://x.test/a.jpg"><p>After</p>"#;
    let export = export(html);
    let components = &export.document.components;

    assert_eq!(roles(components), vec!["photo", "body"]);
    assert_eq!(components[0]["URL"], "bundle://a.jpg");
    assert_eq!(components[0]["layout"], "anchor-layout-left");
    assert_eq!(components[0]["anchor"]["targetComponentIdentifier"], "body-1");
    assert_eq!(components[1]["text"], "Before\n\nAfter");
    assert_eq!(export.bundles, vec!["https://x.test/a.jpg".to_string()]);
}

#[test]
fn test_cover_wraps_following_content() {
    let content = Content::new("1", "<p>Body</p>")
        .with_title("Headline")
        .with_cover("https://x.test/cover.jpg");
    let export = export_with(&Settings::default(), Theme::default(), &content);
    let components = &export.document.components;

    assert_eq!(roles(components), vec!["header", "container"]);
    assert_eq!(components[0]["layout"], "headerPhotoLayout");
    assert_eq!(components[0]["components"][0]["URL"], "bundle://cover.jpg");
    assert_eq!(components[1]["style"], json!({"backgroundColor": "#fafafa"}));
    assert_eq!(roles(components[1]["components"].as_array().unwrap()), vec!["title", "body"]);
    assert_eq!(
        export.document.metadata.thumbnail_url.as_deref(),
        Some("bundle://cover.jpg")
    );
}

#[test]
fn test_aside_is_exported_nested() {
    let html = "<p>Intro</p><aside><h3>Note</h3><p>One</p><p>Two</p></aside>";
    let export = export(html);
    let components = &export.document.components;

    assert_eq!(roles(components), vec!["body", "aside"]);
    let children = components[1]["components"].as_array().unwrap();
    assert_eq!(roles(children), vec!["heading3", "body"]);
    assert_eq!(children[1]["text"], "One\n\nTwo");
}

#[test]
fn test_dropcap_on_first_top_level_body_only() {
    let mut theme = Theme::default();
    theme.dropcap.enabled = true;
    let html = "<aside><p>Side</p></aside><p>First</p><h2>Break</h2><p>Second</p>";
    let export = export_with(&Settings::default(), theme, &Content::new("1", html));
    let components = &export.document.components;

    assert_eq!(components[0]["components"][0]["textStyle"], "default-body");
    assert_eq!(components[1]["textStyle"], "dropcapBodyStyle");
    assert_eq!(components[3]["textStyle"], "default-body");
    assert_eq!(
        export.document.component_text_styles["dropcapBodyStyle"]["dropCapStyle"]["numberOfLines"],
        4
    );
}

// ============================================================================
// Image splitting
// ============================================================================

#[test]
fn test_heading_with_image_and_text() {
    let export = export(r#"<h1><img src="https://x.test/a.jpg">Title</h1>"#);
    let components = &export.document.components;

    assert_eq!(roles(components), vec!["photo", "heading1"]);
    assert_eq!(components[0]["URL"], "bundle://a.jpg");
    assert_eq!(components[1]["text"], "Title");
    assert!(export.diagnostics.is_empty());
}

#[test]
fn test_image_only_heading_keeps_image() {
    let export = export(r#"<h2><img src="https://x.test/a.jpg"></h2><p>Body</p>"#);
    let components = &export.document.components;

    assert_eq!(roles(components), vec!["photo", "body"]);
    assert_eq!(components[0]["URL"], "bundle://a.jpg");
    assert_eq!(export.bundles, vec!["https://x.test/a.jpg".to_string()]);
}

#[test]
fn test_paragraph_of_images_keeps_every_image() {
    let html = r#"<p><img src="https://x.test/a.jpg"><img src="https://x.test/b.jpg"></p><p>Body</p>"#;
    let export = export(html);
    let components = &export.document.components;

    assert_eq!(roles(components), vec!["photo", "photo", "body"]);
    assert_eq!(components[0]["URL"], "bundle://a.jpg");
    assert_eq!(components[1]["URL"], "bundle://b.jpg");
    assert_eq!(
        export.bundles,
        vec!["https://x.test/a.jpg".to_string(), "https://x.test/b.jpg".to_string()]
    );
    assert!(export.diagnostics.is_empty());
}

// ============================================================================
// Recoverable problems
// ============================================================================

#[test]
fn test_problems_become_diagnostics() {
    let html = r#"<canvas></canvas><img src="https://x.test/"><p>Kept</p>"#;
    let export = export(html);

    assert_eq!(roles(&export.document.components), vec!["body"]);
    let kinds: Vec<_> = export.diagnostics.iter().map(|d| d.kind).collect();
    assert!(kinds.contains(&DiagnosticKind::UnsupportedElement));
    assert!(kinds.contains(&DiagnosticKind::Bundle));
    assert!(kinds.contains(&DiagnosticKind::InvalidComponent));
}

#[test]
fn test_remote_images_are_not_bundled() {
    let settings = Settings {
        use_remote_images: true,
        ..Settings::default()
    };
    let export = export_with(&settings, Theme::default(), &Content::new("1", r#"<img src="https://x.test/a.jpg">"#));
    assert_eq!(export.document.components[0]["URL"], "https://x.test/a.jpg");
    assert!(export.bundles.is_empty());
}

#[test]
fn test_postmeta_override_reads_metadata() {
    let catalog = ComponentRegistry::new().catalog();
    let mut theme = Theme::default();
    catalog
        .save_override(
            &mut theme,
            "body",
            "json",
            json!({"role": "body", "text": "#text#", "format": "#format#", "subtitle": "#postmeta.subtitle#"}),
        )
        .unwrap();

    let mut metadata = InMemoryMetadata::new();
    metadata.insert("5", "subtitle", "From the archive");
    let settings = Settings::default();
    let themes = ThemeLibrary::with_theme(theme);
    let exporter = Exporter::new(&settings, &themes, &FilenameBundler).with_metadata(&metadata);

    let export = exporter.export(&Content::new("5", "<p>Hi</p>")).unwrap();
    assert_eq!(export.document.components[0]["subtitle"], "From the archive");

    let export = exporter.export(&Content::new("6", "<p>Hi</p>")).unwrap();
    assert!(export.document.components[0].get("subtitle").is_none());
}

#[test]
fn test_exports_are_independent() {
    let settings = Settings::default();
    let themes = ThemeLibrary::with_theme(Theme::default());
    let exporter = Exporter::new(&settings, &themes, &FilenameBundler);

    let content = Content::new("1", "<p>A</p>").with_pullquote("Q", PullquotePosition::Top);
    let first = exporter.export(&content).unwrap();
    let second = exporter.export(&content).unwrap();
    assert_eq!(first, second);
    assert_eq!(second.document.components[1]["identifier"], "body-1");
}
