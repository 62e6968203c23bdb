//! Meta components placed ahead of the body content.

use crate::component::{Component, meta};
use crate::content::Content;
use crate::context::ExportContext;
use crate::theme::MetaComponent;

/// Meta components in the theme's order, skipping those the item has no
/// data for.
pub(crate) fn meta_components(ctx: &mut ExportContext<'_>, content: &Content) -> Vec<Component> {
    if ctx.is_nested() {
        return Vec::new();
    }
    let theme = ctx.theme;
    theme
        .meta_component_order
        .iter()
        .enumerate()
        .filter_map(|(index, kind)| match kind {
            MetaComponent::Cover => meta::cover(ctx, content, index == 0),
            MetaComponent::Title => meta::title(ctx, content),
            MetaComponent::Byline => meta::byline(ctx, content),
            MetaComponent::Intro => meta::intro(ctx, content),
        })
        .collect()
}

/// Prepend the meta components to `components`.
pub(crate) fn inject_meta(ctx: &mut ExportContext<'_>, content: &Content, components: &mut Vec<Component>) {
    let meta = meta_components(ctx, content);
    components.splice(0..0, meta);
}
