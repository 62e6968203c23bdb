//! Horizontal rules.

use serde_json::json;

use crate::context::ExportContext;
use crate::dom::{Dom, NodeId};
use crate::spec::ComponentSpec;

use super::{Component, ComponentKind, NodeMatch};

pub(crate) fn matches(dom: &Dom, node: NodeId) -> Option<NodeMatch> {
    dom.is_tag(node, "hr").then_some(NodeMatch::Claim(node))
}

pub(crate) fn specs() -> Vec<ComponentSpec> {
    vec![
        ComponentSpec::new(
            "divider",
            "json",
            "JSON",
            json!({
                "role": "divider",
                "stroke": {"color": "#blockquote_border_color#", "width": 1},
            }),
        ),
        ComponentSpec::new(
            "divider",
            "divider-layout",
            "Layout",
            json!({
                "columnStart": "#body_offset#",
                "columnSpan": "#body_column_span#",
                "margin": {"top": 25, "bottom": 25},
            }),
        ),
    ]
}

pub(crate) fn build(ctx: &mut ExportContext<'_>, _dom: &Dom, _node: NodeId) -> Component {
    let values = ctx.values();
    let mut component = Component::new(ComponentKind::Divider, "divider");
    component.json = ctx.render_object("divider", "json", &values);
    component.layout = Some(ctx.register_layout("divider", "divider-layout", &values));
    component
}
