//! Image galleries.

use serde_json::{Value, json};

use crate::context::ExportContext;
use crate::dom::{Dom, NodeId};
use crate::spec::ComponentSpec;

use super::{Component, ComponentKind, NodeMatch};

pub(crate) fn matches(dom: &Dom, node: NodeId) -> Option<NodeMatch> {
    (dom.has_class(node, "gallery") || dom.has_class(node, "wp-block-gallery")).then_some(NodeMatch::Claim(node))
}

pub(crate) fn specs() -> Vec<ComponentSpec> {
    vec![
        ComponentSpec::new("gallery", "json", "JSON", json!({"role": "#role#", "items": "#items#"})),
        ComponentSpec::new(
            "gallery",
            "gallery-layout",
            "Layout",
            json!({
                "columnStart": "#body_offset#",
                "columnSpan": "#body_column_span#",
                "margin": {"top": 25, "bottom": 25},
            }),
        ),
    ]
}

/// Caption for one gallery image: the closest `figcaption` or the gallery
/// item's caption element.
fn item_caption(dom: &Dom, img: NodeId) -> Option<String> {
    let mut current = dom.get(img)?.parent;
    while current.is_some() {
        if dom.is_tag(current, "figure") || dom.has_class(current, "gallery-item") {
            let caption = dom
                .find_tag_within(current, "figcaption")
                .or_else(|| dom.descendants_by_class(current, "gallery-caption").into_iter().next())?;
            return Some(dom.text(caption).trim().to_string()).filter(|c| !c.is_empty());
        }
        current = dom.get(current)?.parent;
    }
    None
}

pub(crate) fn build(ctx: &mut ExportContext<'_>, dom: &Dom, node: NodeId) -> Component {
    let mut items = Vec::new();
    for img in dom.descendants_by_tag(node, "img") {
        let Some(src) = dom.get_attr(img, "src").map(str::trim).filter(|s| !s.is_empty()) else {
            continue;
        };
        let Some(url) = ctx.bundle(src) else {
            continue;
        };
        let mut item = json!({"URL": url});
        if let Some(caption) = item_caption(dom, img) {
            item["caption"] = Value::String(caption);
        }
        items.push(item);
    }
    if items.is_empty() {
        return Component::suppressed(ComponentKind::Gallery, "gallery without images");
    }

    let role = ctx.theme.gallery_type.role();
    let values = ctx.values().with("role", role).with("items", Value::Array(items));

    let mut component = Component::new(ComponentKind::Gallery, role);
    component.json = ctx.render_object("gallery", "json", &values);
    component.layout = Some(ctx.register_layout("gallery", "gallery-layout", &values));
    component
}
