//! Photos.

use serde_json::json;

use crate::context::ExportContext;
use crate::dom::{Dom, NodeId};
use crate::spec::ComponentSpec;

use super::{AnchorPosition, Component, ComponentKind, NodeMatch, is_image_node};

/// Figures owned by other kinds.
const FOREIGN_FIGURE_CLASSES: &[&str] = &["wp-block-gallery", "gallery", "wp-block-embed", "wp-block-table"];

pub(crate) fn matches(dom: &Dom, node: NodeId) -> Option<NodeMatch> {
    match dom.tag(node) {
        "img" => Some(NodeMatch::Claim(node)),
        "figure" => {
            let foreign = FOREIGN_FIGURE_CLASSES.iter().any(|c| dom.has_class(node, c));
            (!foreign && dom.find_tag_within(node, "img").is_some()).then_some(NodeMatch::Claim(node))
        }
        "p" | "a" | "div" => {
            let mut children = dom.significant_children(node);
            let only = children.next()?;
            (children.next().is_none() && is_image_node(dom, only)).then_some(NodeMatch::Claim(node))
        }
        _ => None,
    }
}

pub(crate) fn specs() -> Vec<ComponentSpec> {
    vec![
        ComponentSpec::new(
            "image",
            "json",
            "JSON",
            json!({"role": "photo", "URL": "#url#", "caption": "#caption#"}),
        ),
        ComponentSpec::new(
            "image",
            "normal-image",
            "Layout",
            json!({
                "columnStart": "#body_offset#",
                "columnSpan": "#body_column_span#",
                "margin": {"top": 25, "bottom": 25},
            }),
        ),
        ComponentSpec::new(
            "image",
            "full-width-image",
            "Full width layout",
            json!({
                "columnStart": 0,
                "columnSpan": "#layout_columns#",
                "margin": {"top": 25, "bottom": 25},
            }),
        ),
    ]
}

/// Position requested through the editor's alignment classes.
fn alignment(dom: &Dom, nodes: &[NodeId]) -> AnchorPosition {
    if nodes.iter().any(|&n| dom.has_class(n, "alignleft")) {
        AnchorPosition::Left
    } else if nodes.iter().any(|&n| dom.has_class(n, "alignright")) {
        AnchorPosition::Right
    } else {
        AnchorPosition::None
    }
}

pub(crate) fn build(ctx: &mut ExportContext<'_>, dom: &Dom, node: NodeId) -> Component {
    let Some(img) = dom.find_tag_within(node, "img") else {
        return Component::suppressed(ComponentKind::Image, "no image found");
    };
    let src = dom
        .get_attr(img, "src")
        .or_else(|| dom.get_attr(img, "data-src"))
        .map(str::trim)
        .unwrap_or_default();
    if src.is_empty() {
        return Component::suppressed(ComponentKind::Image, "image without a source");
    }
    let Some(url) = ctx.bundle(src) else {
        return Component::suppressed(ComponentKind::Image, format!("could not bundle {src}"));
    };

    let caption = dom
        .find_tag_within(node, "figcaption")
        .map(|c| dom.text(c).trim().to_string())
        .unwrap_or_default();
    let values = ctx.values().with("url", url).with("caption", caption);

    let mut component = Component::new(ComponentKind::Image, "photo");
    component.json = ctx.render_object("image", "json", &values);
    let layout = if ctx.settings.full_bleed_images {
        "full-width-image"
    } else {
        "normal-image"
    };
    component.layout = Some(ctx.register_layout("image", layout, &values));
    component.anchor_position = alignment(dom, &[node, img]);
    component
}
