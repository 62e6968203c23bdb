//! Merging consecutive body text into single components.

use std::collections::VecDeque;

use crate::component::{Component, body};
use crate::context::ExportContext;

fn is_plain_body(component: &Component) -> bool {
    component.is_body() && component.identifier.is_none()
}

fn append_text(collector: &mut Component, next: &Component) {
    let mut text = collector.text().unwrap_or_default().to_string();
    text.push_str(next.text().unwrap_or_default());
    collector.set_text(text);
}

fn flush(collector: &mut Option<Component>, out: &mut Vec<Component>) {
    if let Some(mut component) = collector.take() {
        let text = component.text().unwrap_or_default().trim().to_string();
        component.set_text(text);
        out.push(component);
    }
}

/// Merge runs of body components.
///
/// A body carrying an identifier is an anchor target and starts a new run:
/// it absorbs a following plain body, also across one anchored component in
/// between. The last body afterwards gets the closing layout.
pub(crate) fn group_body(ctx: &mut ExportContext<'_>, components: Vec<Component>) -> Vec<Component> {
    let mut queue: VecDeque<Component> = components.into();
    let mut out = Vec::with_capacity(queue.len());
    let mut collector: Option<Component> = None;

    while let Some(component) = queue.pop_front() {
        if !component.is_body() {
            flush(&mut collector, &mut out);
            out.push(component);
            continue;
        }
        if component.identifier.is_none() {
            match collector.as_mut() {
                Some(current) => append_text(current, &component),
                None => collector = Some(component),
            }
            continue;
        }

        flush(&mut collector, &mut out);
        let mut current = component;
        let across_anchor = queue.front().is_some_and(|c| c.anchor.is_some()) && queue.get(1).is_some_and(is_plain_body);
        if across_anchor {
            if let Some(anchored) = queue.pop_front() {
                out.push(anchored);
            }
            if let Some(next) = queue.pop_front() {
                append_text(&mut current, &next);
            }
        } else if queue.front().is_some_and(is_plain_body)
            && let Some(next) = queue.pop_front()
        {
            append_text(&mut current, &next);
        }
        collector = Some(current);
    }
    flush(&mut collector, &mut out);

    if let Some(last) = out.iter_mut().rev().find(|c| c.is_body()) {
        body::apply_last_layout(ctx, last);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bundle::FilenameBundler;
    use crate::component::{Anchor, ComponentKind, ComponentRegistry, StyleRef};
    use crate::settings::Settings;
    use crate::theme::Theme;

    fn text(text: &str) -> Component {
        let mut component = Component::new(ComponentKind::Body, "body");
        component.set_text(format!("{text}\n\n"));
        component.layout = Some(StyleRef::Named("body-layout".to_string()));
        component
    }

    fn target(value: &str, identifier: &str) -> Component {
        let mut component = text(value);
        component.identifier = Some(identifier.to_string());
        component
    }

    fn anchored() -> Component {
        let mut photo = Component::new(ComponentKind::Image, "photo");
        photo.anchor = Some(Anchor::default());
        photo
    }

    fn texts(components: &[Component]) -> Vec<&str> {
        components.iter().map(|c| c.text().unwrap_or(c.role.as_str())).collect()
    }

    #[test]
    fn test_plain_runs_merge() {
        let settings = Settings::default();
        let theme = Theme::default();
        let registry = ComponentRegistry::new();
        let catalog = registry.catalog();
        let mut ctx = ExportContext::new(&settings, &theme, &catalog, &registry, &FilenameBundler);

        let divider = Component::new(ComponentKind::Divider, "divider");
        let grouped = group_body(&mut ctx, vec![text("a"), text("b"), divider, text("c")]);
        assert_eq!(texts(&grouped), vec!["a\n\nb", "divider", "c"]);
        assert_eq!(grouped[0].layout, Some(StyleRef::Named("body-layout".to_string())));
        assert_eq!(grouped[2].layout, Some(StyleRef::Named("body-layout-last".to_string())));
    }

    #[test]
    fn test_target_absorbs_next_body() {
        let settings = Settings::default();
        let theme = Theme::default();
        let registry = ComponentRegistry::new();
        let catalog = registry.catalog();
        let mut ctx = ExportContext::new(&settings, &theme, &catalog, &registry, &FilenameBundler);

        let grouped = group_body(&mut ctx, vec![text("a"), target("b", "body-1"), text("c"), text("d")]);
        assert_eq!(texts(&grouped), vec!["a", "b\n\nc\n\nd"]);
        assert_eq!(grouped[1].identifier.as_deref(), Some("body-1"));
    }

    #[test]
    fn test_target_absorbs_across_anchored_component() {
        let settings = Settings::default();
        let theme = Theme::default();
        let registry = ComponentRegistry::new();
        let catalog = registry.catalog();
        let mut ctx = ExportContext::new(&settings, &theme, &catalog, &registry, &FilenameBundler);

        let grouped = group_body(&mut ctx, vec![target("a", "body-1"), anchored(), text("b")]);
        assert_eq!(texts(&grouped), vec!["photo", "a\n\nb"]);
    }

    #[test]
    fn test_lone_target_stands_alone() {
        let settings = Settings::default();
        let theme = Theme::default();
        let registry = ComponentRegistry::new();
        let catalog = registry.catalog();
        let mut ctx = ExportContext::new(&settings, &theme, &catalog, &registry, &FilenameBundler);

        let grouped = group_body(&mut ctx, vec![target("a", "body-1"), target("b", "body-2")]);
        assert_eq!(texts(&grouped), vec!["a", "b"]);
        assert_eq!(grouped[0].layout, Some(StyleRef::Named("body-layout".to_string())));
        assert_eq!(grouped[1].layout, Some(StyleRef::Named("body-layout-last".to_string())));
    }
}
