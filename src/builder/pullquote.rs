//! Placing the item's pull quote.

use tracing::debug;

use crate::component::{Component, quote};
use crate::content::Content;
use crate::context::ExportContext;

use super::anchoring::anchor_together;

/// Insert the pull quote before the first anchor target at or after its
/// configured position, anchored to that target.
///
/// Nothing is inserted when the item has no pull quote or no target is
/// found.
pub(crate) fn insert_pullquote(ctx: &mut ExportContext<'_>, content: &Content, components: &mut Vec<Component>) {
    if ctx.is_nested() {
        return;
    }
    let (Some(text), Some(position)) = (content.pullquote.as_deref(), content.pullquote_position) else {
        return;
    };
    if text.trim().is_empty() {
        return;
    }

    let start = position.start_index(components.len());
    let Some(index) = (start..components.len()).find(|&i| components[i].can_be_anchor_target()) else {
        debug!(target: "folio::builder", start, "no target for pull quote");
        return;
    };

    let pullquote = quote::pullquote(ctx, text);
    if pullquote.is_suppressed() {
        return;
    }
    components.insert(index, pullquote);
    anchor_together(ctx, components, index, index + 1);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bundle::FilenameBundler;
    use crate::component::{AnchorPosition, ComponentKind, ComponentRegistry};
    use crate::content::PullquotePosition;
    use crate::settings::Settings;
    use crate::theme::Theme;

    fn components() -> Vec<Component> {
        vec![
            Component::new(ComponentKind::Heading, "heading1"),
            Component::new(ComponentKind::Body, "body"),
            Component::new(ComponentKind::Divider, "divider"),
            Component::new(ComponentKind::Body, "body"),
        ]
    }

    #[test]
    fn test_pullquote_at_top() {
        let settings = Settings::default();
        let theme = Theme::default();
        let registry = ComponentRegistry::new();
        let catalog = registry.catalog();
        let mut ctx = ExportContext::new(&settings, &theme, &catalog, &registry, &FilenameBundler);

        let content = Content::new("1", "").with_pullquote("Quoted", PullquotePosition::Top);
        let mut list = components();
        insert_pullquote(&mut ctx, &content, &mut list);

        assert_eq!(list.len(), 5);
        assert_eq!(list[1].role, "pullquote");
        assert_eq!(list[1].anchor_position, AnchorPosition::Right);
        assert_eq!(
            list[1].anchor.as_ref().unwrap().target_component_identifier,
            list[2].identifier
        );
        assert!(list[2].is_anchor_target);
    }

    #[test]
    fn test_pullquote_at_bottom() {
        let settings = Settings::default();
        let theme = Theme::default();
        let registry = ComponentRegistry::new();
        let catalog = registry.catalog();
        let mut ctx = ExportContext::new(&settings, &theme, &catalog, &registry, &FilenameBundler);

        let content = Content::new("1", "").with_pullquote("Quoted", PullquotePosition::Bottom);
        let mut list = components();
        insert_pullquote(&mut ctx, &content, &mut list);
        assert_eq!(list[3].role, "pullquote");
    }

    #[test]
    fn test_no_target_skips_silently() {
        let settings = Settings::default();
        let theme = Theme::default();
        let registry = ComponentRegistry::new();
        let catalog = registry.catalog();
        let mut ctx = ExportContext::new(&settings, &theme, &catalog, &registry, &FilenameBundler);

        let content = Content::new("1", "").with_pullquote("Quoted", PullquotePosition::Top);
        let mut list = vec![Component::new(ComponentKind::Divider, "divider")];
        insert_pullquote(&mut ctx, &content, &mut list);
        assert_eq!(list.len(), 1);
        assert!(ctx.diagnostics().is_empty());
    }
}
