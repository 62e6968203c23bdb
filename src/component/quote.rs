//! Block quotes and pull quotes.

use serde_json::json;

use crate::context::ExportContext;
use crate::dom::{Dom, NodeId, escape_text, inner_html};
use crate::markdown::{escape_markdown, render_block};
use crate::spec::ComponentSpec;

use super::{AnchorPosition, Component, ComponentKind, NodeMatch, text_format};

const PULLQUOTE_CLASS: &str = "wp-block-pullquote";

pub(crate) fn matches(dom: &Dom, node: NodeId) -> Option<NodeMatch> {
    (dom.is_tag(node, "blockquote") || dom.has_class(node, PULLQUOTE_CLASS)).then_some(NodeMatch::Claim(node))
}

pub(crate) fn specs() -> Vec<ComponentSpec> {
    vec![
        ComponentSpec::new(
            "quote",
            "json",
            "JSON",
            json!({"role": "quote", "text": "#text#", "format": "#format#"}),
        ),
        ComponentSpec::new(
            "quote",
            "blockquote-layout",
            "Layout",
            json!({
                "columnStart": "#body_offset#",
                "columnSpan": "#body_column_span#",
                "margin": {"top": 12, "bottom": 12},
                "contentInset": {"left": true},
            }),
        ),
        ComponentSpec::new(
            "quote",
            "default-blockquote",
            "Style",
            json!({
                "backgroundColor": "#blockquote_background_color#",
                "border": {
                    "all": {"width": 3, "color": "#blockquote_border_color#"},
                    "top": false,
                    "right": false,
                    "bottom": false,
                },
            }),
        ),
        ComponentSpec::new(
            "quote",
            "default-blockquote-text",
            "Text style",
            json!({
                "fontName": "#blockquote_font#",
                "fontSize": "#blockquote_size#",
                "lineHeight": "#blockquote_line_height#",
                "textColor": "#blockquote_color#",
                "textAlignment": "left",
            }),
        ),
    ]
}

pub(crate) fn pullquote_specs() -> Vec<ComponentSpec> {
    vec![
        ComponentSpec::new(
            "pullquote",
            "json",
            "JSON",
            json!({"role": "pullquote", "text": "#text#", "format": "#format#"}),
        ),
        ComponentSpec::new(
            "pullquote",
            "pullquote-layout",
            "Layout",
            json!({
                "columnStart": "#body_offset#",
                "columnSpan": "#body_column_span#",
                "margin": {"top": 12, "bottom": 12},
            }),
        ),
        ComponentSpec::new(
            "pullquote",
            "pullquote-border",
            "Style",
            json!({
                "border": {
                    "all": {"width": 3, "color": "#pullquote_border_color#"},
                    "left": false,
                    "right": false,
                },
            }),
        ),
        ComponentSpec::new(
            "pullquote",
            "default-pullquote",
            "Text style",
            json!({
                "fontName": "#pullquote_font#",
                "fontSize": "#pullquote_size#",
                "lineHeight": "#pullquote_line_height#",
                "textColor": "#pullquote_color#",
                "textTransform": "#pullquote_transform#",
                "textAlignment": "center",
            }),
        ),
    ]
}

fn quote_text(ctx: &ExportContext<'_>, dom: &Dom, node: NodeId) -> String {
    if ctx.settings.html_support {
        inner_html(dom, node).trim().to_string()
    } else {
        render_block(dom, node).trim().to_string()
    }
}

/// Build a block quote.
///
/// A quote the editor marked as a pull quote gets the pull quote styling but
/// stays in the text flow where it was written: unlike the builder's
/// [`pullquote`], it is never anchored.
pub(crate) fn build(ctx: &mut ExportContext<'_>, dom: &Dom, node: NodeId) -> Component {
    let text = quote_text(ctx, dom, node);
    if text.is_empty() {
        return Component::suppressed(ComponentKind::Quote, "empty quote");
    }
    if dom.has_class(node, PULLQUOTE_CLASS) {
        return styled_pullquote(ctx, ComponentKind::Quote, text);
    }

    let values = ctx
        .values()
        .with("text", text)
        .with("format", text_format(ctx.settings));
    let mut component = Component::new(ComponentKind::Quote, "quote");
    component.json = ctx.render_object("quote", "json", &values);
    component.layout = Some(ctx.register_layout("quote", "blockquote-layout", &values));
    component.style = Some(ctx.register_style("quote", "default-blockquote", &values));
    component.text_style = Some(ctx.register_text_style("quote", "default-blockquote-text", &values));
    component
}

fn styled_pullquote(ctx: &mut ExportContext<'_>, kind: ComponentKind, text: String) -> Component {
    let values = ctx
        .values()
        .with("text", text)
        .with("format", text_format(ctx.settings));
    let mut component = Component::new(kind, "pullquote");
    component.json = ctx.render_object("pullquote", "json", &values);
    component.layout = Some(ctx.register_layout("pullquote", "pullquote-layout", &values));
    component.style = Some(ctx.register_style("pullquote", "pullquote-border", &values));
    component.text_style = Some(ctx.register_text_style("pullquote", "default-pullquote", &values));
    component
}

/// Floating pull quote for plain `text`, placed by the builder.
pub fn pullquote(ctx: &mut ExportContext<'_>, text: &str) -> Component {
    let text = text.trim();
    if text.is_empty() {
        return Component::suppressed(ComponentKind::Pullquote, "empty pull quote");
    }
    let text = if ctx.settings.html_support {
        escape_text(text)
    } else {
        escape_markdown(text)
    };
    let mut component = styled_pullquote(ctx, ComponentKind::Pullquote, text);
    component.anchor_position = AnchorPosition::Auto;
    component
}
