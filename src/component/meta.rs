//! Meta components: built from the content item's fields rather than its
//! body HTML.

use serde_json::json;

use crate::content::Content;
use crate::context::ExportContext;
use crate::dom::escape_text;
use crate::markdown::escape_markdown;
use crate::spec::ComponentSpec;

use super::{Component, ComponentKind, StyleRef, text_format};

/// Layout of a cover shown first.
pub const COVER_LAYOUT: &str = "headerPhotoLayout";
/// Layout of a cover that follows other meta components.
pub const COVER_BELOW_TEXT_LAYOUT: &str = "headerBelowTextPhotoLayout";

fn plain_text(ctx: &ExportContext<'_>, text: &str) -> String {
    if ctx.settings.html_support {
        escape_text(text)
    } else {
        escape_markdown(text)
    }
}

fn text_layout(component: &str, name: &str, top: u32, bottom: u32) -> ComponentSpec {
    ComponentSpec::new(
        component,
        name,
        "Layout",
        json!({
            "columnStart": "#body_offset#",
            "columnSpan": "#body_column_span#",
            "margin": {"top": top, "bottom": bottom},
        }),
    )
}

fn text_style(component: &str, name: &str, prefix: &str) -> ComponentSpec {
    ComponentSpec::new(
        component,
        name,
        "Text style",
        json!({
            "fontName": format!("#{prefix}_font#"),
            "fontSize": format!("#{prefix}_size#"),
            "lineHeight": format!("#{prefix}_line_height#"),
            "textColor": format!("#{prefix}_color#"),
            "textAlignment": "left",
        }),
    )
}

fn text_json(component: &str, role: &str) -> ComponentSpec {
    ComponentSpec::new(
        component,
        "json",
        "JSON",
        json!({"role": role, "text": "#text#", "format": "#format#"}),
    )
}

pub(crate) fn cover_specs() -> Vec<ComponentSpec> {
    let header_layout = |name: &str, top: u32| {
        ComponentSpec::new(
            "cover",
            name,
            "Layout",
            json!({
                "ignoreDocumentMargin": true,
                "columnStart": 0,
                "columnSpan": "#layout_columns#",
                "margin": {"top": top, "bottom": 0},
                "minimumHeight": "40vh",
            }),
        )
    };
    vec![
        ComponentSpec::new(
            "cover",
            "json",
            "JSON",
            json!({"role": "header", "behavior": {"type": "background_parallax"}}),
        ),
        ComponentSpec::new(
            "cover",
            "photo",
            "Photo",
            json!({"role": "photo", "URL": "#url#", "caption": "#caption#"}),
        ),
        ComponentSpec::new(
            "cover",
            "caption",
            "Caption",
            json!({"role": "caption", "text": "#caption#", "format": "#format#"}),
        ),
        header_layout(COVER_LAYOUT, 0),
        header_layout(COVER_BELOW_TEXT_LAYOUT, 30),
        text_style("cover", "default-cover-caption", "caption"),
    ]
}

pub(crate) fn title_specs() -> Vec<ComponentSpec> {
    vec![
        text_json("title", "title"),
        text_layout("title", "title-layout", 30, 0),
        text_style("title", "default-title", "title"),
    ]
}

pub(crate) fn byline_specs() -> Vec<ComponentSpec> {
    vec![
        text_json("byline", "byline"),
        text_layout("byline", "byline-layout", 10, 10),
        text_style("byline", "default-byline", "byline"),
    ]
}

pub(crate) fn intro_specs() -> Vec<ComponentSpec> {
    vec![
        text_json("intro", "intro"),
        text_layout("intro", "intro-layout", 0, 20),
        text_style("intro", "default-intro", "intro"),
    ]
}

/// Header with the cover photo. `first` selects the layout for a cover
/// at the top of the article.
pub fn cover(ctx: &mut ExportContext<'_>, content: &Content, first: bool) -> Option<Component> {
    let cover = content.cover.as_ref().filter(|c| !c.url.trim().is_empty())?;
    let url = ctx.bundle(cover.url.trim())?;
    let caption = cover
        .caption
        .as_deref()
        .map(str::trim)
        .filter(|c| !c.is_empty())
        .map(|c| plain_text(ctx, c))
        .unwrap_or_default();

    let values = ctx
        .values()
        .with("url", url)
        .with("caption", caption.as_str())
        .with("format", text_format(ctx.settings));
    let layout = if first { COVER_LAYOUT } else { COVER_BELOW_TEXT_LAYOUT };

    let mut photo = Component::new(ComponentKind::Cover, "photo");
    photo.json = ctx.render_object("cover", "photo", &values);
    photo.layout = Some(StyleRef::Named(layout.to_string()));

    let mut header = Component::new(ComponentKind::Cover, "header");
    header.json = ctx.render_object("cover", "json", &values);
    header.layout = Some(ctx.register_layout("cover", layout, &values));
    header.children.push(photo);

    if ctx.theme.cover_caption && !caption.is_empty() {
        let mut caption = Component::new(ComponentKind::Cover, "caption");
        caption.json = ctx.render_object("cover", "caption", &values);
        caption.text_style = Some(ctx.register_text_style("cover", "default-cover-caption", &values));
        header.children.push(caption);
    }
    Some(header)
}

fn text_component(ctx: &mut ExportContext<'_>, kind: ComponentKind, text: String) -> Component {
    let name = kind.name();
    let values = ctx
        .values()
        .with("text", text)
        .with("format", text_format(ctx.settings));

    let mut component = Component::new(kind, name);
    component.json = ctx.render_object(name, "json", &values);
    component.layout = Some(ctx.register_layout(name, &format!("{name}-layout"), &values));
    component.text_style = Some(ctx.register_text_style(name, &format!("default-{name}"), &values));
    component
}

pub fn title(ctx: &mut ExportContext<'_>, content: &Content) -> Option<Component> {
    let title = content.title.as_deref().map(str::trim).filter(|t| !t.is_empty())?;
    let text = plain_text(ctx, title);
    Some(text_component(ctx, ComponentKind::Title, text))
}

/// Byline text: the item's own byline, or the theme's format filled with
/// author and date.
pub fn byline_text(format: &str, content: &Content) -> Option<String> {
    if let Some(byline) = content.byline.as_deref().map(str::trim).filter(|b| !b.is_empty()) {
        return Some(byline.to_string());
    }
    let author = content.author.as_deref().map(str::trim).filter(|a| !a.is_empty())?;
    let date = content.date.as_deref().map(str::trim).unwrap_or_default();
    let text = format.replace("#author#", author).replace("#date#", date);
    Some(text.trim_end_matches([' ', '|', ',']).to_string())
}

pub fn byline(ctx: &mut ExportContext<'_>, content: &Content) -> Option<Component> {
    let text = byline_text(&ctx.theme.byline_format, content)?;
    let text = plain_text(ctx, &text);
    Some(text_component(ctx, ComponentKind::Byline, text))
}

pub fn intro(ctx: &mut ExportContext<'_>, content: &Content) -> Option<Component> {
    let excerpt = content.excerpt.as_deref().map(str::trim).filter(|e| !e.is_empty())?;
    let text = plain_text(ctx, excerpt);
    Some(text_component(ctx, ComponentKind::Intro, text))
}
