//! Advertisement placeholders.
//!
//! Editors mark ad slots with `div.ad-slot` or a `data-ad` attribute whose
//! value is the banner type. Ads span the full page width and are never
//! used as anchor targets.

use serde_json::json;

use crate::context::ExportContext;
use crate::dom::{Dom, NodeId};
use crate::spec::ComponentSpec;

use super::{Component, ComponentKind, NodeMatch};

const BANNER_TYPES: &[&str] = &["any", "standard", "double_height", "large"];

pub(crate) fn matches(dom: &Dom, node: NodeId) -> Option<NodeMatch> {
    let is_slot = (dom.is_tag(node, "div") && dom.has_class(node, "ad-slot")) || dom.get_attr(node, "data-ad").is_some();
    is_slot.then_some(NodeMatch::Claim(node))
}

pub(crate) fn specs() -> Vec<ComponentSpec> {
    vec![
        ComponentSpec::new(
            "advertisement",
            "json",
            "JSON",
            json!({"role": "banner_advertisement", "bannerType": "#banner_type#"}),
        ),
        ComponentSpec::new(
            "advertisement",
            "advertisement-layout",
            "Layout",
            json!({
                "columnStart": 0,
                "columnSpan": "#layout_columns#",
                "margin": {"top": 25, "bottom": 25},
            }),
        ),
    ]
}

pub(crate) fn build(ctx: &mut ExportContext<'_>, dom: &Dom, node: NodeId) -> Component {
    if !ctx.settings.enable_advertisement {
        return Component::suppressed(ComponentKind::Advertisement, "advertisements are disabled");
    }
    let banner_type = dom
        .get_attr(node, "data-ad")
        .map(str::trim)
        .filter(|t| BANNER_TYPES.contains(t))
        .unwrap_or("any");

    let values = ctx.values().with("banner_type", banner_type);
    let mut component = Component::new(ComponentKind::Advertisement, "banner_advertisement");
    component.json = ctx.render_object("advertisement", "json", &values);
    component.layout = Some(ctx.register_layout("advertisement", "advertisement-layout", &values));
    component
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bundle::FilenameBundler;
    use crate::component::ComponentRegistry;
    use crate::dom::parse_html;
    use crate::settings::Settings;
    use crate::theme::Theme;

    #[test]
    fn test_banner_type_from_attribute() {
        let settings = Settings::default();
        let theme = Theme::default();
        let registry = ComponentRegistry::new();
        let catalog = registry.catalog();
        let mut ctx = ExportContext::new(&settings, &theme, &catalog, &registry, &FilenameBundler);

        let dom = parse_html(r#"<div data-ad="large"></div><div class="ad-slot" data-ad="huge"></div>"#);
        let nodes: Vec<_> = dom.child_elements(dom.body()).collect();
        assert!(matches(&dom, nodes[0]).is_some());

        assert_eq!(build(&mut ctx, &dom, nodes[0]).json["bannerType"], "large");
        assert_eq!(build(&mut ctx, &dom, nodes[1]).json["bannerType"], "any");
    }

    #[test]
    fn test_disabled_advertisements_suppressed() {
        let settings = Settings {
            enable_advertisement: false,
            ..Settings::default()
        };
        let theme = Theme::default();
        let registry = ComponentRegistry::new();
        let catalog = registry.catalog();
        let mut ctx = ExportContext::new(&settings, &theme, &catalog, &registry, &FilenameBundler);

        let dom = parse_html(r#"<div class="ad-slot"></div>"#);
        let node = dom.child_elements(dom.body()).next().unwrap();
        assert!(build(&mut ctx, &dom, node).is_suppressed());
    }
}
