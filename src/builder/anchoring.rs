//! Pairing floating components with the text they sit beside.

use tracing::debug;

use crate::component::{Anchor, AnchorPosition, Component};
use crate::context::ExportContext;
use crate::theme::Orientation;

/// Anchor every floating component to a neighbour.
///
/// The previous component is tried first, then the next; when neither can
/// take an anchor the scan moves forward. A component with no reachable
/// target stays unanchored.
pub(crate) fn anchor_components(ctx: &mut ExportContext<'_>, components: &mut [Component]) {
    if components.len() < 2 {
        return;
    }
    for index in 0..components.len() {
        if components[index].anchor_position == AnchorPosition::None || components[index].is_anchor_target {
            continue;
        }
        match find_target(components, index) {
            Some(target) => anchor_together(ctx, components, index, target),
            None => debug!(target: "folio::builder", role = %components[index].role, "no anchor target"),
        }
    }
}

fn find_target(components: &[Component], index: usize) -> Option<usize> {
    let mut candidate = if index > 0 { index - 1 } else { index + 1 };
    let mut step = 1;
    while !components[candidate].can_be_anchor_target() && index + step < components.len() {
        candidate = index + step;
        step += 1;
    }
    components[candidate].can_be_anchor_target().then_some(candidate)
}

/// Side the target takes for a float at `position`.
pub(crate) fn target_position(position: AnchorPosition, orientation: Orientation) -> AnchorPosition {
    match position {
        AnchorPosition::Auto if orientation == Orientation::Left => AnchorPosition::Left,
        AnchorPosition::Auto => AnchorPosition::Right,
        other => other.opposite(),
    }
}

/// Anchor `components[origin]` to `components[target]`.
pub(crate) fn anchor_together(ctx: &mut ExportContext<'_>, components: &mut [Component], origin: usize, target: usize) {
    let position = target_position(components[origin].anchor_position, ctx.theme.body.orientation);

    let identifier = match components[target].identifier.clone() {
        Some(identifier) => identifier,
        None => {
            let identifier = ctx.next_identifier(&components[target].role);
            components[target].identifier = Some(identifier.clone());
            identifier
        }
    };
    {
        let target = &mut components[target];
        target.is_anchor_target = true;
        target.anchor_position = position;
        target.anchor(ctx);
    }

    let origin = &mut components[origin];
    origin.anchor_position = position.opposite();
    let mut anchor = origin.anchor.take().unwrap_or_default();
    anchor.target_component_identifier = Some(identifier);
    origin.anchor = Some(anchor);
    origin.anchor(ctx);
}
