//! HTML tables, emitted only when the export allows HTML text.

use serde_json::json;

use crate::context::ExportContext;
use crate::dom::{Dom, NodeId, outer_html};
use crate::settings::Settings;
use crate::spec::ComponentSpec;

use super::{Component, ComponentKind, NodeMatch};

pub(crate) fn matches(dom: &Dom, node: NodeId, settings: &Settings) -> Option<NodeMatch> {
    if !settings.html_support {
        return None;
    }
    let is_table = dom.is_tag(node, "table")
        || (dom.is_tag(node, "figure") && dom.has_class(node, "wp-block-table"));
    is_table.then_some(NodeMatch::Claim(node))
}

pub(crate) fn specs() -> Vec<ComponentSpec> {
    vec![
        ComponentSpec::new("table", "json", "JSON", json!({"role": "htmltable", "html": "#html#"})),
        ComponentSpec::new(
            "table",
            "table-layout",
            "Layout",
            json!({
                "columnStart": "#body_offset#",
                "columnSpan": "#body_column_span#",
                "margin": {"top": 20, "bottom": 20},
            }),
        ),
        ComponentSpec::new(
            "table",
            "default-table",
            "Style",
            json!({
                "border": {"all": {"width": 1, "color": "#blockquote_border_color#"}},
                "tableStyle": {
                    "cells": {
                        "textStyle": {
                            "fontName": "#body_font#",
                            "fontSize": "#body_size#",
                            "textColor": "#body_color#",
                        },
                        "padding": 5,
                    },
                    "headerCells": {
                        "backgroundColor": "#blockquote_background_color#",
                        "textStyle": {"fontName": "#heading_font#", "textColor": "#heading_color#"},
                    },
                },
            }),
        ),
    ]
}

pub(crate) fn build(ctx: &mut ExportContext<'_>, dom: &Dom, node: NodeId) -> Component {
    let Some(table) = dom.find_tag_within(node, "table") else {
        return Component::suppressed(ComponentKind::Table, "figure without a table");
    };
    if dom.is_blank(table) {
        return Component::suppressed(ComponentKind::Table, "empty table");
    }

    let values = ctx.values().with("html", outer_html(dom, table));
    let mut component = Component::new(ComponentKind::Table, "htmltable");
    component.json = ctx.render_object("table", "json", &values);
    component.layout = Some(ctx.register_layout("table", "table-layout", &values));
    component.style = Some(ctx.register_style("table", "default-table", &values));
    component
}
