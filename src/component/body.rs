//! Body text: paragraphs, lists, preformatted text and stray inline content.

use serde_json::json;

use crate::context::ExportContext;
use crate::dom::{Dom, NodeId};
use crate::spec::ComponentSpec;

use super::{Component, ComponentKind, NodeMatch, block_text, split_around_images, text_format};

const BLOCK_TAGS: &[&str] = &["p", "ul", "ol", "pre"];

/// Phrasing elements that can show up directly under `<body>`.
const INLINE_TAGS: &[&str] = &[
    "a", "abbr", "b", "cite", "code", "del", "em", "i", "ins", "kbd", "mark", "q", "s", "small",
    "span", "strong", "sub", "sup", "u",
];

pub(crate) fn matches(dom: &Dom, node: NodeId) -> Option<NodeMatch> {
    if dom.is_text(node) {
        return (!dom.is_blank(node)).then_some(NodeMatch::Claim(node));
    }
    let tag = dom.tag(node);
    if !BLOCK_TAGS.contains(&tag) && !INLINE_TAGS.contains(&tag) {
        return None;
    }
    if tag == "p"
        && let Some(segments) = split_around_images(dom, node)
    {
        return Some(NodeMatch::Split(segments));
    }
    Some(NodeMatch::Claim(node))
}

pub(crate) fn specs() -> Vec<ComponentSpec> {
    vec![
        ComponentSpec::new(
            "body",
            "json",
            "JSON",
            json!({"role": "body", "text": "#text#", "format": "#format#"}),
        ),
        ComponentSpec::new(
            "body",
            "body-layout",
            "Layout",
            json!({
                "columnStart": "#body_offset#",
                "columnSpan": "#body_column_span#",
                "margin": {"top": 12, "bottom": 12},
            }),
        ),
        ComponentSpec::new(
            "body",
            "body-layout-last",
            "Layout for the last body component",
            json!({
                "columnStart": "#body_offset#",
                "columnSpan": "#body_column_span#",
                "margin": {"top": 12, "bottom": 30},
            }),
        ),
        ComponentSpec::new(
            "body",
            "default-body",
            "Text style",
            json!({
                "textAlignment": "left",
                "fontName": "#body_font#",
                "fontSize": "#body_size#",
                "tracking": "#body_tracking#",
                "lineHeight": "#body_line_height#",
                "textColor": "#body_color#",
                "linkStyle": {"textColor": "#body_link_color#"},
                "paragraphSpacingBefore": 18,
                "paragraphSpacingAfter": 18,
            }),
        ),
        ComponentSpec::new(
            "body",
            "dropcapBodyStyle",
            "Drop cap text style",
            json!({
                "textAlignment": "left",
                "fontName": "#body_font#",
                "fontSize": "#body_size#",
                "tracking": "#body_tracking#",
                "lineHeight": "#body_line_height#",
                "textColor": "#body_color#",
                "linkStyle": {"textColor": "#body_link_color#"},
                "paragraphSpacingBefore": 18,
                "paragraphSpacingAfter": 18,
                "dropCapStyle": {
                    "numberOfLines": "#dropcap_number_of_lines#",
                    "numberOfCharacters": 1,
                    "padding": 5,
                    "fontName": "#dropcap_font#",
                    "textColor": "#dropcap_color#",
                },
            }),
        ),
    ]
}

pub(crate) fn build(ctx: &mut ExportContext<'_>, dom: &Dom, node: NodeId) -> Component {
    let text = block_text(ctx, dom, node);
    if text.trim().is_empty() {
        return Component::suppressed(ComponentKind::Body, "empty body text");
    }
    from_text(ctx, text)
}

/// Body component holding already rendered `text`.
pub(crate) fn from_text(ctx: &mut ExportContext<'_>, text: String) -> Component {
    let values = ctx
        .values()
        .with("text", text)
        .with("format", text_format(ctx.settings));

    let mut component = Component::new(ComponentKind::Body, "body");
    component.json = ctx.render_object("body", "json", &values);
    component.layout = Some(ctx.register_layout("body", "body-layout", &values));
    let text_style = if ctx.take_dropcap() {
        "dropcapBodyStyle"
    } else {
        "default-body"
    };
    component.text_style = Some(ctx.register_text_style("body", text_style, &values));
    component
}

/// Switch `component` to the layout for the final body component.
pub(crate) fn apply_last_layout(ctx: &mut ExportContext<'_>, component: &mut Component) {
    let values = ctx.values();
    component.layout = Some(ctx.register_layout("body", "body-layout-last", &values));
}
