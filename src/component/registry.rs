//! Dispatching DOM nodes to component kinds.

use tracing::debug;

use crate::context::{DiagnosticKind, ExportContext};
use crate::dom::{Dom, NodeData, NodeId};
use crate::settings::Settings;
use crate::spec::SpecCatalog;

use super::{Component, ComponentKind, NodeMatch, Segment, common_specs};

/// Elements that never carry article content.
const IGNORED_TAGS: &[&str] = &["script", "style", "noscript", "template", "link", "meta", "head"];

/// Ordered list of the kinds tried against each node.
#[derive(Debug, Clone, PartialEq)]
pub struct ComponentRegistry {
    kinds: Vec<ComponentKind>,
}

impl Default for ComponentRegistry {
    fn default() -> Self {
        Self::with_kinds(ComponentKind::DISPATCHED)
    }
}

impl ComponentRegistry {
    /// Registry holding every matched kind in its default priority order.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_kinds(kinds: impl IntoIterator<Item = ComponentKind>) -> Self {
        Self {
            kinds: kinds.into_iter().collect(),
        }
    }

    /// Register `kind` ahead of `before`, or last if `before` is absent.
    pub fn insert_before(&mut self, kind: ComponentKind, before: ComponentKind) {
        self.kinds.retain(|&k| k != kind);
        let index = self
            .kinds
            .iter()
            .position(|&k| k == before)
            .unwrap_or(self.kinds.len());
        self.kinds.insert(index, kind);
    }

    pub fn remove(&mut self, kind: ComponentKind) {
        self.kinds.retain(|&k| k != kind);
    }

    pub fn kinds(&self) -> &[ComponentKind] {
        &self.kinds
    }

    /// Default specs of the registered kinds and the builder's own kinds.
    pub fn catalog(&self) -> SpecCatalog {
        let mut catalog = SpecCatalog::new();
        for spec in common_specs() {
            catalog.register(spec);
        }
        for kind in self.kinds.iter().chain(ComponentKind::BUILDER_ONLY.iter()) {
            for spec in kind.register_specs() {
                catalog.register(spec);
            }
        }
        catalog
    }

    /// First registered kind claiming `node`, with how it claims it.
    pub fn match_node(&self, dom: &Dom, node: NodeId, settings: &Settings) -> Option<(ComponentKind, NodeMatch)> {
        self.kinds
            .iter()
            .find_map(|&kind| kind.node_matches(dom, node, settings).map(|m| (kind, m)))
    }

    /// Components for one DOM node.
    ///
    /// Unclaimed elements have their children dispatched instead; unclaimed
    /// leaves are dropped with a diagnostic.
    pub fn components_from_node(&self, ctx: &mut ExportContext<'_>, dom: &mut Dom, node: NodeId) -> Vec<Component> {
        match dom.get(node).map(|n| &n.data) {
            Some(NodeData::Text(text)) if text.trim().is_empty() => return Vec::new(),
            Some(NodeData::Element { .. }) | Some(NodeData::Text(_)) => {}
            _ => return Vec::new(),
        }

        if IGNORED_TAGS.contains(&dom.tag(node)) {
            ctx.log_error(
                DiagnosticKind::UnsupportedElement,
                format!("skipped <{}> element", dom.tag(node)),
            );
            return Vec::new();
        }

        let mut components = Vec::new();
        match self.match_node(dom, node, ctx.settings) {
            Some((kind, NodeMatch::Claim(claimed))) => {
                debug!(target: "folio::dispatch", kind = kind.name(), tag = dom.tag(claimed), "matched node");
                components.push(kind.build(ctx, dom, claimed));
            }
            Some((kind, NodeMatch::Split(segments))) => {
                debug!(target: "folio::dispatch", kind = kind.name(), parts = segments.len(), "split node");
                for segment in segments {
                    let part = materialize(dom, segment);
                    components.extend(self.components_from_node(ctx, dom, part));
                }
            }
            None if dom.is_element(node) && dom.children(node).next().is_some() => {
                let children: Vec<NodeId> = dom.children(node).collect();
                for child in children {
                    components.extend(self.components_from_node(ctx, dom, child));
                }
            }
            None => {
                let message = if dom.is_element(node) {
                    format!("no component handles <{}>", dom.tag(node))
                } else {
                    "no component handles text node".to_string()
                };
                ctx.log_error(DiagnosticKind::UnsupportedElement, message);
            }
        }
        components
    }
}

/// Turn a segment into a node of `dom`.
fn materialize(dom: &mut Dom, segment: Segment) -> NodeId {
    match segment {
        Segment::Node(id) => id,
        Segment::Wrap { like, children } => {
            let Some(wrapper) = dom.clone_element(like) else {
                return like;
            };
            for child in children {
                dom.detach(child);
                dom.append(wrapper, child);
            }
            wrapper
        }
    }
}
