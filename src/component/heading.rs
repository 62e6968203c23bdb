//! Headings `h1` to `h6`.

use serde_json::json;

use crate::context::ExportContext;
use crate::dom::{Dom, NodeId};
use crate::spec::ComponentSpec;

use super::{Component, ComponentKind, NodeMatch, image_segments, inline_text, is_image_node, text_format};

fn level(dom: &Dom, node: NodeId) -> Option<usize> {
    match dom.tag(node) {
        "h1" => Some(1),
        "h2" => Some(2),
        "h3" => Some(3),
        "h4" => Some(4),
        "h5" => Some(5),
        "h6" => Some(6),
        _ => None,
    }
}

pub(crate) fn matches(dom: &Dom, node: NodeId) -> Option<NodeMatch> {
    level(dom, node)?;
    // Images inside a heading become their own photo components, even when
    // no heading text is left.
    if dom.children(node).any(|c| is_image_node(dom, c)) {
        return Some(NodeMatch::Split(image_segments(dom, node)));
    }
    Some(NodeMatch::Claim(node))
}

pub(crate) fn specs() -> Vec<ComponentSpec> {
    let mut specs = vec![
        ComponentSpec::new(
            "heading",
            "json",
            "JSON",
            json!({"role": "#role#", "text": "#text#", "format": "#format#"}),
        ),
        ComponentSpec::new(
            "heading",
            "heading-layout",
            "Layout",
            json!({
                "columnStart": "#body_offset#",
                "columnSpan": "#body_column_span#",
                "margin": {"top": 15, "bottom": 15},
            }),
        ),
    ];
    for level in 1..=6 {
        specs.push(ComponentSpec::new(
            "heading",
            &format!("default-heading-{level}"),
            &format!("Level {level}"),
            json!({
                "fontName": "#heading_font#",
                "fontSize": format!("#heading{level}_size#"),
                "lineHeight": format!("#heading{level}_line_height#"),
                "textColor": "#heading_color#",
                "textAlignment": "left",
                "tracking": "#heading_tracking#",
            }),
        ));
    }
    specs
}

pub(crate) fn build(ctx: &mut ExportContext<'_>, dom: &Dom, node: NodeId) -> Component {
    let Some(level) = level(dom, node) else {
        return Component::suppressed(ComponentKind::Heading, format!("<{}> is not a heading", dom.tag(node)));
    };
    let text = inline_text(ctx, dom, node);
    if text.is_empty() {
        return Component::suppressed(ComponentKind::Heading, "empty heading");
    }

    let role = format!("heading{level}");
    let values = ctx
        .values()
        .with("role", role.as_str())
        .with("text", text)
        .with("format", text_format(ctx.settings));

    let mut component = Component::new(ComponentKind::Heading, &role);
    component.json = ctx.render_object("heading", "json", &values);
    component.layout = Some(ctx.register_layout("heading", "heading-layout", &values));
    component.text_style = Some(ctx.register_text_style("heading", &format!("default-heading-{level}"), &values));
    component
}
