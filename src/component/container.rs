//! Components that hold other components: asides, footnote blocks and the
//! container the builder wraps content in after the cover.

use serde_json::json;

use crate::builder;
use crate::context::ExportContext;
use crate::dom::{Dom, NodeId, inner_html};
use crate::spec::ComponentSpec;

use super::{Component, ComponentKind, NodeMatch};

pub(crate) fn matches_aside(dom: &Dom, node: NodeId) -> Option<NodeMatch> {
    dom.is_tag(node, "aside").then_some(NodeMatch::Claim(node))
}

pub(crate) fn matches_footnotes(dom: &Dom, node: NodeId) -> Option<NodeMatch> {
    (dom.has_class(node, "footnotes") || dom.has_class(node, "wp-block-footnotes")).then_some(NodeMatch::Claim(node))
}

pub(crate) fn aside_specs() -> Vec<ComponentSpec> {
    vec![
        ComponentSpec::new("aside", "json", "JSON", json!({"role": "aside"})),
        ComponentSpec::new(
            "aside",
            "aside-layout",
            "Layout",
            json!({
                "columnStart": "#body_offset#",
                "columnSpan": "#body_column_span#",
                "margin": {"top": 20, "bottom": 20},
                "contentInset": true,
            }),
        ),
        ComponentSpec::new(
            "aside",
            "default-aside",
            "Style",
            json!({
                "backgroundColor": "#blockquote_background_color#",
                "border": {
                    "all": {"width": 1, "color": "#blockquote_border_color#"},
                },
            }),
        ),
    ]
}

pub(crate) fn footnotes_specs() -> Vec<ComponentSpec> {
    vec![
        ComponentSpec::new("footnotes", "json", "JSON", json!({"role": "container"})),
        ComponentSpec::new(
            "footnotes",
            "footnotes-layout",
            "Layout",
            json!({
                "columnStart": "#body_offset#",
                "columnSpan": "#body_column_span#",
                "margin": {"top": 25, "bottom": 0},
            }),
        ),
        ComponentSpec::new(
            "footnotes",
            "default-footnotes",
            "Style",
            json!({
                "border": {
                    "all": {"width": 1, "color": "#blockquote_border_color#"},
                    "left": false,
                    "right": false,
                    "bottom": false,
                },
            }),
        ),
    ]
}

pub(crate) fn container_specs() -> Vec<ComponentSpec> {
    vec![
        ComponentSpec::new(
            "container",
            "json",
            "JSON",
            json!({
                "role": "container",
                "style": {"backgroundColor": "#body_background_color#"},
            }),
        ),
        ComponentSpec::new(
            "container",
            "container-layout",
            "Layout",
            json!({"columnStart": 0, "columnSpan": "#layout_columns#"}),
        ),
    ]
}

/// Shared build for the nested kinds: export the inner HTML on its own and
/// keep the result as children.
fn build_nested(ctx: &mut ExportContext<'_>, dom: &Dom, node: NodeId, kind: ComponentKind, role: &str) -> Component {
    // A list keeps its numbering, but not the class that matched it here.
    let html = match dom.tag(node) {
        tag @ ("ol" | "ul") => format!("<{tag}>{}</{tag}>", inner_html(dom, node)),
        _ => inner_html(dom, node),
    };
    let children = builder::build_nested(ctx, &html);
    if children.is_empty() {
        return Component::suppressed(kind, format!("empty {role}"));
    }

    let name = kind.name();
    let values = ctx.values();
    let mut component = Component::new(kind, role);
    component.json = ctx.render_object(name, "json", &values);
    component.layout = Some(ctx.register_layout(name, &format!("{name}-layout"), &values));
    component.style = Some(ctx.register_style(name, &format!("default-{name}"), &values));
    component.children = children;
    component
}

pub(crate) fn build_aside(ctx: &mut ExportContext<'_>, dom: &Dom, node: NodeId) -> Component {
    build_nested(ctx, dom, node, ComponentKind::Aside, "aside")
}

pub(crate) fn build_footnotes(ctx: &mut ExportContext<'_>, dom: &Dom, node: NodeId) -> Component {
    build_nested(ctx, dom, node, ComponentKind::Footnotes, "container")
}

/// Container wrapping `children`, used by the cover regrouping pass.
pub fn wrap(ctx: &mut ExportContext<'_>, children: Vec<Component>) -> Component {
    let values = ctx.values();
    let mut component = Component::new(ComponentKind::Container, "container");
    component.json = ctx.render_object("container", "json", &values);
    component.layout = Some(ctx.register_layout("container", "container-layout", &values));
    component.children = children;
    component
}
