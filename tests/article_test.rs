//! A full editor article through every builder pass.

use serde_json::Value;

use folio::content::PullquotePosition;
use folio::{Content, DiagnosticKind, Exporter, FilenameBundler, Settings, Theme, ThemeLibrary};

const ARTICLE_HTML: &str = include_str!("fixtures/article.html");

fn article() -> Content {
    let mut content = Content::new("harbour", ARTICLE_HTML)
        .with_title("The last boats of the north wall")
        .with_cover("https://media.example.com/2024/05/cover.jpg")
        .with_pullquote("Nothing moves faster than a rumour", PullquotePosition::Middle);
    content.author = Some("Staff Writer".to_string());
    content
}

fn roles(components: &[Value]) -> Vec<&str> {
    components.iter().map(|c| c["role"].as_str().unwrap_or_default()).collect()
}

#[test]
fn test_article_structure() {
    let settings = Settings::default();
    let themes = ThemeLibrary::with_theme(Theme::default());
    let exporter = Exporter::new(&settings, &themes, &FilenameBundler);
    let export = exporter.export(&article()).expect("export should succeed");
    let components = &export.document.components;

    assert_eq!(roles(components), vec!["header", "container"]);
    let body = components[1]["components"].as_array().unwrap();
    assert_eq!(
        roles(body),
        vec![
            "title",
            "byline",
            "body",
            "photo",
            "body",
            "heading2",
            "body",
            "quote",
            "embedwebvideo",
            "aside",
            "divider",
            "gallery",
            "heading2",
            "pullquote",
            "body",
            "banner_advertisement",
            "container",
        ]
    );

    // The floated photo sits beside the paragraphs around it.
    assert_eq!(body[3]["layout"], "anchor-layout-right");
    assert_eq!(body[3]["anchor"]["targetComponentIdentifier"], body[4]["identifier"]);
    assert!(body[4]["text"].as_str().unwrap().contains("first"));

    // The list is merged into the paragraph before it.
    assert!(body[6]["text"].as_str().unwrap().contains("- Rising fuel costs"));

    assert_eq!(body[8]["URL"], "https://www.youtube.com/embed/dQw4w9WgXcQ");
    assert_eq!(body[15]["bannerType"], "standard");
    assert_eq!(body[14]["layout"], "body-layout-last");
    assert_eq!(body[13]["anchor"]["targetComponentIdentifier"], body[14]["identifier"]);

    assert!(
        export
            .diagnostics
            .iter()
            .all(|d| d.kind != DiagnosticKind::UnsupportedElement),
        "{:?}",
        export.diagnostics
    );
    assert!(export.bundles.contains(&"https://media.example.com/2024/05/harbour.jpg".to_string()));
    assert!(export.bundles.contains(&"https://media.example.com/2024/05/nets.jpg".to_string()));
    assert!(export.bundles.contains(&"https://media.example.com/2024/05/cover.jpg".to_string()));
}

#[test]
fn test_article_json_is_stable() {
    let settings = Settings::default();
    let themes = ThemeLibrary::with_theme(Theme::default());
    let exporter = Exporter::new(&settings, &themes, &FilenameBundler);

    let first = exporter.export(&article()).unwrap().document.to_json_string().unwrap();
    let second = exporter.export(&article()).unwrap().document.to_json_string().unwrap();
    assert_eq!(first, second);
}
