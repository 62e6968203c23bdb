//! Wrapping the content that follows the cover.

use crate::component::{Component, container};
use crate::context::ExportContext;

/// Move everything after the first header into one container.
pub(crate) fn regroup_after_cover(ctx: &mut ExportContext<'_>, mut components: Vec<Component>) -> Vec<Component> {
    if ctx.is_nested() {
        return components;
    }
    let Some(header) = components.iter().position(|c| c.role == "header") else {
        return components;
    };
    let rest = components.split_off(header + 1);
    if !rest.is_empty() {
        components.push(container::wrap(ctx, rest));
    }
    components
}
