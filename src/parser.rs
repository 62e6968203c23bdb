//! Content parsing: HTML in, built components out.

use tracing::debug;

use crate::component::{BuildState, Component};
use crate::context::{DiagnosticKind, ExportContext};
use crate::dom::{NodeId, parse_html};

/// Walks the first-level nodes of a document body through the dispatcher.
#[derive(Debug, Default, Clone, Copy)]
pub struct ContentParser;

impl ContentParser {
    pub fn new() -> Self {
        Self
    }

    /// Components for `html`, in document order.
    ///
    /// Malformed markup is recovered by the HTML parser. Components that were
    /// matched but suppressed are dropped and reported.
    pub fn parse(&self, html: &str, ctx: &mut ExportContext<'_>) -> Vec<Component> {
        let mut dom = parse_html(html);
        let body = dom.body();
        let nodes: Vec<NodeId> = dom.children(body).collect();
        debug!(target: "folio::parser", nodes = nodes.len(), nested = ctx.is_nested(), "parsing content");

        let registry = ctx.components;
        let mut components = Vec::new();
        for node in nodes {
            for component in registry.components_from_node(ctx, &mut dom, node) {
                if let BuildState::Suppressed(reason) = &component.state {
                    ctx.log_error(
                        DiagnosticKind::InvalidComponent,
                        format!("dropped {} component: {reason}", component.kind.name()),
                    );
                    continue;
                }
                components.push(component);
            }
        }
        components
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bundle::FilenameBundler;
    use crate::component::ComponentRegistry;
    use crate::settings::Settings;
    use crate::theme::Theme;

    #[test]
    fn test_parse_first_level_nodes() {
        let settings = Settings::default();
        let theme = Theme::default();
        let registry = ComponentRegistry::new();
        let catalog = registry.catalog();
        let mut ctx = ExportContext::new(&settings, &theme, &catalog, &registry, &FilenameBundler);

        let components = ContentParser::new().parse("<h2>Hi</h2><p>One</p><hr><p>Two</p>", &mut ctx);
        let roles: Vec<_> = components.iter().map(|c| c.role.as_str()).collect();
        assert_eq!(roles, vec!["heading2", "body", "divider", "body"]);
        assert!(ctx.diagnostics().is_empty());
    }

    #[test]
    fn test_suppressed_components_are_reported() {
        let settings = Settings::default();
        let theme = Theme::default();
        let registry = ComponentRegistry::new();
        let catalog = registry.catalog();
        let mut ctx = ExportContext::new(&settings, &theme, &catalog, &registry, &FilenameBundler);

        let components = ContentParser::new().parse("<h2> </h2><p>Kept</p>", &mut ctx);
        assert_eq!(components.len(), 1);
        assert_eq!(ctx.diagnostics()[0].kind, DiagnosticKind::InvalidComponent);
    }

    #[test]
    fn test_unclaimed_wrappers_are_descended() {
        let settings = Settings::default();
        let theme = Theme::default();
        let registry = ComponentRegistry::new();
        let catalog = registry.catalog();
        let mut ctx = ExportContext::new(&settings, &theme, &catalog, &registry, &FilenameBundler);

        let html = "<section><div><p>Deep</p></div></section><script>x()</script>";
        let components = ContentParser::new().parse(html, &mut ctx);
        assert_eq!(components.len(), 1);
        assert_eq!(components[0].text().map(str::trim), Some("Deep"));
        assert_eq!(ctx.diagnostics()[0].kind, DiagnosticKind::UnsupportedElement);
    }
}
