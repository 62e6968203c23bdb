//! The component model.
//!
//! A [`Component`] is one typed node of the output document. Components are
//! produced by [`ComponentKind::build`] when the dispatcher matches a DOM
//! node, or directly by the builder for meta components, and are then
//! reshaped by the builder passes before being flattened with
//! [`Component::to_json`].
//!
//! Each kind lives in its own module and provides the same three pieces:
//! a node matcher, its default specs and a build function. [`ComponentKind`]
//! ties them together.

mod advertisement;
pub(crate) mod body;
pub(crate) mod container;
mod divider;
mod embed;
mod gallery;
mod heading;
mod image;
mod media;
pub mod meta;
pub mod quote;
pub mod registry;
mod table;

use serde::Serialize;
use serde_json::{Map, Value, json};

use crate::context::ExportContext;
use crate::dom::{Dom, NodeId, inner_html, outer_html};
use crate::markdown;
use crate::settings::Settings;
use crate::spec::ComponentSpec;

pub use registry::ComponentRegistry;

/// Reference to a registry entry, or an inline definition.
#[derive(Debug, Clone, PartialEq)]
pub enum StyleRef {
    Named(String),
    Inline(Value),
}

impl StyleRef {
    pub fn name(&self) -> Option<&str> {
        match self {
            StyleRef::Named(name) => Some(name),
            StyleRef::Inline(_) => None,
        }
    }

    pub fn to_json(&self) -> Value {
        match self {
            StyleRef::Named(name) => Value::String(name.clone()),
            StyleRef::Inline(value) => value.clone(),
        }
    }
}

/// Whether and on which side a component floats beside another.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum AnchorPosition {
    #[default]
    None,
    Auto,
    Left,
    Right,
}

impl AnchorPosition {
    /// Position for the other half of an anchored pair.
    pub fn opposite(self) -> Self {
        match self {
            AnchorPosition::Left => AnchorPosition::Right,
            AnchorPosition::Right => AnchorPosition::Left,
            other => other,
        }
    }

    pub fn is_side(self) -> bool {
        matches!(self, AnchorPosition::Left | AnchorPosition::Right)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Anchor {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub target_component_identifier: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub origin_anchor_position: Option<String>,
    pub target_anchor_position: String,
    pub range_start: usize,
    pub range_length: usize,
}

impl Default for Anchor {
    fn default() -> Self {
        Self {
            target_component_identifier: None,
            origin_anchor_position: None,
            target_anchor_position: "center".to_string(),
            range_start: 0,
            range_length: 1,
        }
    }
}

/// Outcome of building a component.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BuildState {
    Built,
    /// Matched, but there was nothing valid to emit.
    Suppressed(String),
}

/// How a kind claims a DOM node.
#[derive(Debug, Clone, PartialEq)]
pub enum NodeMatch {
    /// Build this node.
    Claim(NodeId),
    /// Dispatch each segment on its own instead.
    Split(Vec<Segment>),
}

/// Part of a split node.
#[derive(Debug, Clone, PartialEq)]
pub enum Segment {
    /// An existing node.
    Node(NodeId),
    /// A copy of element `like` holding only `children`.
    Wrap { like: NodeId, children: Vec<NodeId> },
}

#[derive(Debug, Clone, PartialEq)]
pub struct Component {
    pub kind: ComponentKind,
    pub role: String,
    pub json: Map<String, Value>,
    pub layout: Option<StyleRef>,
    pub text_style: Option<StyleRef>,
    pub style: Option<StyleRef>,
    pub anchor: Option<Anchor>,
    pub identifier: Option<String>,
    pub anchor_position: AnchorPosition,
    pub is_anchor_target: bool,
    pub children: Vec<Component>,
    pub state: BuildState,
}

impl Component {
    pub fn new(kind: ComponentKind, role: &str) -> Self {
        Self {
            kind,
            role: role.to_string(),
            json: Map::new(),
            layout: None,
            text_style: None,
            style: None,
            anchor: None,
            identifier: None,
            anchor_position: AnchorPosition::None,
            is_anchor_target: false,
            children: Vec::new(),
            state: BuildState::Built,
        }
    }

    pub fn suppressed(kind: ComponentKind, reason: impl Into<String>) -> Self {
        let mut component = Self::new(kind, kind.name());
        component.state = BuildState::Suppressed(reason.into());
        component
    }

    pub fn is_suppressed(&self) -> bool {
        matches!(self.state, BuildState::Suppressed(_))
    }

    pub fn is_body(&self) -> bool {
        self.role == "body"
    }

    pub fn text(&self) -> Option<&str> {
        self.json.get("text").and_then(Value::as_str)
    }

    pub fn set_text(&mut self, text: String) {
        self.json.insert("text".to_string(), Value::String(text));
    }

    /// Whether another component may anchor onto this one now.
    pub fn can_be_anchor_target(&self) -> bool {
        self.kind.can_be_anchor_target() && !self.is_anchor_target
    }

    /// Apply the anchored layout once the target is known.
    ///
    /// Only the floating half of a pair changes: it gets the layout for its
    /// side. Targets keep their layout.
    pub fn anchor(&mut self, ctx: &mut ExportContext<'_>) {
        if self.is_anchor_target {
            return;
        }
        let has_target = self
            .anchor
            .as_ref()
            .is_some_and(|a| a.target_component_identifier.is_some());
        if !has_target {
            return;
        }

        let theme = ctx.theme;
        let (side, column_start) = match self.anchor_position {
            AnchorPosition::Left => ("left", theme.body_offset()),
            AnchorPosition::Right => (
                "right",
                (theme.body_offset() + theme.body_column_span()).saturating_sub(theme.anchored_column_span()),
            ),
            _ => return,
        };
        let values = ctx.values().with("column_start", column_start);
        self.layout = Some(ctx.register_layout("anchor", &format!("anchor-layout-{side}"), &values));
    }

    /// Flattened output, or `None` for a suppressed component.
    pub fn to_json(&self) -> Option<Value> {
        if self.is_suppressed() {
            return None;
        }

        let mut map = self.json.clone();
        map.insert("role".to_string(), Value::String(self.role.clone()));
        if let Some(identifier) = &self.identifier {
            map.insert("identifier".to_string(), Value::String(identifier.clone()));
        }
        if let Some(layout) = &self.layout {
            map.insert("layout".to_string(), layout.to_json());
        }
        if let Some(text_style) = &self.text_style {
            map.insert("textStyle".to_string(), text_style.to_json());
        }
        if let Some(style) = &self.style {
            map.insert("style".to_string(), style.to_json());
        }
        if let Some(anchor) = &self.anchor
            && let Ok(anchor) = serde_json::to_value(anchor)
        {
            map.insert("anchor".to_string(), anchor);
        }
        let children: Vec<Value> = self.children.iter().filter_map(Component::to_json).collect();
        if !children.is_empty() {
            map.insert("components".to_string(), Value::Array(children));
        }
        Some(Value::Object(map))
    }
}

/// Every component type.
///
/// The first sixteen are matched against the DOM, in the order of
/// [`ComponentKind::DISPATCHED`]; the rest are created by the builder.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ComponentKind {
    Advertisement,
    Tweet,
    Instagram,
    Facebook,
    EmbedWebVideo,
    Gallery,
    Footnotes,
    Aside,
    Table,
    Audio,
    Video,
    Quote,
    Divider,
    Heading,
    Image,
    Body,
    Cover,
    Title,
    Byline,
    Intro,
    Container,
    Pullquote,
}

impl ComponentKind {
    /// Matched kinds in priority order: specific matchers before generic
    /// ones.
    pub const DISPATCHED: [ComponentKind; 16] = [
        ComponentKind::Advertisement,
        ComponentKind::Tweet,
        ComponentKind::Instagram,
        ComponentKind::Facebook,
        ComponentKind::EmbedWebVideo,
        ComponentKind::Gallery,
        ComponentKind::Footnotes,
        ComponentKind::Aside,
        ComponentKind::Table,
        ComponentKind::Audio,
        ComponentKind::Video,
        ComponentKind::Quote,
        ComponentKind::Divider,
        ComponentKind::Heading,
        ComponentKind::Image,
        ComponentKind::Body,
    ];

    pub const BUILDER_ONLY: [ComponentKind; 6] = [
        ComponentKind::Cover,
        ComponentKind::Title,
        ComponentKind::Byline,
        ComponentKind::Intro,
        ComponentKind::Container,
        ComponentKind::Pullquote,
    ];

    /// Spec namespace of the kind.
    pub fn name(self) -> &'static str {
        match self {
            ComponentKind::Advertisement => "advertisement",
            ComponentKind::Tweet => "tweet",
            ComponentKind::Instagram => "instagram",
            ComponentKind::Facebook => "facebook",
            ComponentKind::EmbedWebVideo => "embed-web-video",
            ComponentKind::Gallery => "gallery",
            ComponentKind::Footnotes => "footnotes",
            ComponentKind::Aside => "aside",
            ComponentKind::Table => "table",
            ComponentKind::Audio => "audio",
            ComponentKind::Video => "video",
            ComponentKind::Quote => "quote",
            ComponentKind::Divider => "divider",
            ComponentKind::Heading => "heading",
            ComponentKind::Image => "image",
            ComponentKind::Body => "body",
            ComponentKind::Cover => "cover",
            ComponentKind::Title => "title",
            ComponentKind::Byline => "byline",
            ComponentKind::Intro => "intro",
            ComponentKind::Container => "container",
            ComponentKind::Pullquote => "pullquote",
        }
    }

    /// Whether floating components may pin themselves to this kind.
    pub fn can_be_anchor_target(self) -> bool {
        matches!(self, ComponentKind::Body)
    }

    /// Whether this kind claims `node`. Builder-only kinds never do.
    pub fn node_matches(self, dom: &Dom, node: NodeId, settings: &Settings) -> Option<NodeMatch> {
        match self {
            ComponentKind::Advertisement => advertisement::matches(dom, node),
            ComponentKind::Tweet => embed::Provider::Twitter.matches(dom, node),
            ComponentKind::Instagram => embed::Provider::Instagram.matches(dom, node),
            ComponentKind::Facebook => embed::Provider::Facebook.matches(dom, node),
            ComponentKind::EmbedWebVideo => embed::Provider::WebVideo.matches(dom, node),
            ComponentKind::Gallery => gallery::matches(dom, node),
            ComponentKind::Footnotes => container::matches_footnotes(dom, node),
            ComponentKind::Aside => container::matches_aside(dom, node),
            ComponentKind::Table => table::matches(dom, node, settings),
            ComponentKind::Audio => media::Media::Audio.matches(dom, node),
            ComponentKind::Video => media::Media::Video.matches(dom, node),
            ComponentKind::Quote => quote::matches(dom, node),
            ComponentKind::Divider => divider::matches(dom, node),
            ComponentKind::Heading => heading::matches(dom, node),
            ComponentKind::Image => image::matches(dom, node),
            ComponentKind::Body => body::matches(dom, node),
            ComponentKind::Cover
            | ComponentKind::Title
            | ComponentKind::Byline
            | ComponentKind::Intro
            | ComponentKind::Container
            | ComponentKind::Pullquote => None,
        }
    }

    /// Default specs the kind renders from.
    pub fn register_specs(self) -> Vec<ComponentSpec> {
        match self {
            ComponentKind::Advertisement => advertisement::specs(),
            ComponentKind::Tweet => embed::Provider::Twitter.specs(),
            ComponentKind::Instagram => embed::Provider::Instagram.specs(),
            ComponentKind::Facebook => embed::Provider::Facebook.specs(),
            ComponentKind::EmbedWebVideo => embed::Provider::WebVideo.specs(),
            ComponentKind::Gallery => gallery::specs(),
            ComponentKind::Footnotes => container::footnotes_specs(),
            ComponentKind::Aside => container::aside_specs(),
            ComponentKind::Table => table::specs(),
            ComponentKind::Audio => media::Media::Audio.specs(),
            ComponentKind::Video => media::Media::Video.specs(),
            ComponentKind::Quote => quote::specs(),
            ComponentKind::Divider => divider::specs(),
            ComponentKind::Heading => heading::specs(),
            ComponentKind::Image => image::specs(),
            ComponentKind::Body => body::specs(),
            ComponentKind::Cover => meta::cover_specs(),
            ComponentKind::Title => meta::title_specs(),
            ComponentKind::Byline => meta::byline_specs(),
            ComponentKind::Intro => meta::intro_specs(),
            ComponentKind::Container => container::container_specs(),
            ComponentKind::Pullquote => quote::pullquote_specs(),
        }
    }

    /// Build a component from a node this kind claimed.
    pub fn build(self, ctx: &mut ExportContext<'_>, dom: &Dom, node: NodeId) -> Component {
        match self {
            ComponentKind::Advertisement => advertisement::build(ctx, dom, node),
            ComponentKind::Tweet => embed::Provider::Twitter.build(ctx, dom, node),
            ComponentKind::Instagram => embed::Provider::Instagram.build(ctx, dom, node),
            ComponentKind::Facebook => embed::Provider::Facebook.build(ctx, dom, node),
            ComponentKind::EmbedWebVideo => embed::Provider::WebVideo.build(ctx, dom, node),
            ComponentKind::Gallery => gallery::build(ctx, dom, node),
            ComponentKind::Footnotes => container::build_footnotes(ctx, dom, node),
            ComponentKind::Aside => container::build_aside(ctx, dom, node),
            ComponentKind::Table => table::build(ctx, dom, node),
            ComponentKind::Audio => media::Media::Audio.build(ctx, dom, node),
            ComponentKind::Video => media::Media::Video.build(ctx, dom, node),
            ComponentKind::Quote => quote::build(ctx, dom, node),
            ComponentKind::Divider => divider::build(ctx, dom, node),
            ComponentKind::Heading => heading::build(ctx, dom, node),
            ComponentKind::Image => image::build(ctx, dom, node),
            ComponentKind::Body => body::build(ctx, dom, node),
            ComponentKind::Cover
            | ComponentKind::Title
            | ComponentKind::Byline
            | ComponentKind::Intro
            | ComponentKind::Container
            | ComponentKind::Pullquote => Component::suppressed(self, "only the builder creates this component"),
        }
    }
}

/// Specs shared by every kind.
pub(crate) fn common_specs() -> Vec<ComponentSpec> {
    ["left", "right"]
        .into_iter()
        .map(|side| {
            ComponentSpec::new(
                "anchor",
                &format!("anchor-layout-{side}"),
                &format!("Anchored layout ({side})"),
                json!({
                    "columnStart": "#column_start#",
                    "columnSpan": "#anchored_column_span#",
                    "margin": {"top": 12, "bottom": 12},
                }),
            )
        })
        .collect()
}

/// Elements treated as images when deciding whether to split text around
/// them: an `img`, or an element holding an image and no text.
pub(crate) fn is_image_node(dom: &Dom, node: NodeId) -> bool {
    if dom.is_tag(node, "img") {
        return true;
    }
    matches!(dom.tag(node), "a" | "figure" | "span" | "picture")
        && dom.find_tag_within(node, "img").is_some()
        && dom.is_blank(node)
}

/// Segments for an element whose children mix images with text, or that
/// holds several images: runs of non-image children are re-wrapped in a copy
/// of the element, images stand alone. `None` when there is nothing to
/// split, which includes a lone image.
pub(crate) fn split_around_images(dom: &Dom, node: NodeId) -> Option<Vec<Segment>> {
    let children: Vec<NodeId> = dom.children(node).collect();
    let images = children.iter().filter(|&&c| is_image_node(dom, c)).count();
    if images == 0 {
        return None;
    }
    let only_images = children
        .iter()
        .all(|&c| is_image_node(dom, c) || (dom.is_blank(c) && !dom.is_element(c)));
    if images == 1 && only_images {
        return None;
    }
    Some(image_segments(dom, node))
}

/// Split `node` at every image child, dropping blank runs.
pub(crate) fn image_segments(dom: &Dom, node: NodeId) -> Vec<Segment> {
    let mut segments = Vec::new();
    let mut run = Vec::new();
    for child in dom.children(node) {
        if is_image_node(dom, child) {
            flush_run(dom, node, &mut run, &mut segments);
            segments.push(Segment::Node(child));
        } else {
            run.push(child);
        }
    }
    flush_run(dom, node, &mut run, &mut segments);
    segments
}

fn flush_run(dom: &Dom, like: NodeId, run: &mut Vec<NodeId>, segments: &mut Vec<Segment>) {
    let children = std::mem::take(run);
    if children.iter().all(|&c| dom.is_blank(c) && !dom.is_tag(c, "br")) {
        return;
    }
    segments.push(Segment::Wrap { like, children });
}

/// Text format emitted by the text components.
pub(crate) fn text_format(settings: &Settings) -> &'static str {
    if settings.html_support { "html" } else { "markdown" }
}

/// Block text of `node` in the export's text format.
pub(crate) fn block_text(ctx: &ExportContext<'_>, dom: &Dom, node: NodeId) -> String {
    if ctx.settings.html_support {
        if dom.is_text(node) {
            let text = dom.text(node);
            return format!("<p>{}</p>", crate::dom::escape_text(text.trim()));
        }
        return outer_html(dom, node).trim().to_string();
    }
    markdown::render_block(dom, node)
}

/// Inline text of `node` in the export's text format.
pub(crate) fn inline_text(ctx: &ExportContext<'_>, dom: &Dom, node: NodeId) -> String {
    if ctx.settings.html_support {
        return inner_html(dom, node).trim().to_string();
    }
    markdown::render_inline(dom, node)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dom::parse_html;

    fn first(dom: &Dom) -> NodeId {
        dom.child_elements(dom.body()).next().unwrap()
    }

    #[test]
    fn test_opposite_positions() {
        assert_eq!(AnchorPosition::Left.opposite(), AnchorPosition::Right);
        assert_eq!(AnchorPosition::Right.opposite(), AnchorPosition::Left);
        assert_eq!(AnchorPosition::Auto.opposite(), AnchorPosition::Auto);
    }

    #[test]
    fn test_to_json_flattens_references() {
        let mut component = Component::new(ComponentKind::Body, "body");
        component.set_text("Hello".to_string());
        component.layout = Some(StyleRef::Named("body-layout".to_string()));
        component.text_style = Some(StyleRef::Inline(json!({"fontSize": 12})));
        component.identifier = Some("body-1".to_string());

        assert_eq!(
            component.to_json().unwrap(),
            json!({
                "role": "body",
                "text": "Hello",
                "identifier": "body-1",
                "layout": "body-layout",
                "textStyle": {"fontSize": 12},
            })
        );
    }

    #[test]
    fn test_to_json_anchor_and_children() {
        let mut container = Component::new(ComponentKind::Container, "container");
        let mut photo = Component::new(ComponentKind::Image, "photo");
        photo.anchor = Some(Anchor {
            target_component_identifier: Some("body-1".to_string()),
            ..Anchor::default()
        });
        container.children.push(photo);
        container
            .children
            .push(Component::suppressed(ComponentKind::Heading, "empty"));

        assert_eq!(
            container.to_json().unwrap(),
            json!({
                "role": "container",
                "components": [{
                    "role": "photo",
                    "anchor": {
                        "targetComponentIdentifier": "body-1",
                        "targetAnchorPosition": "center",
                        "rangeStart": 0,
                        "rangeLength": 1,
                    },
                }],
            })
        );
    }

    #[test]
    fn test_suppressed_has_no_json() {
        assert!(Component::suppressed(ComponentKind::Image, "no src").to_json().is_none());
    }

    #[test]
    fn test_anchor_target_capability() {
        let mut body = Component::new(ComponentKind::Body, "body");
        assert!(body.can_be_anchor_target());
        body.is_anchor_target = true;
        assert!(!body.can_be_anchor_target());
        assert!(!Component::new(ComponentKind::Advertisement, "banner_advertisement").can_be_anchor_target());
    }

    #[test]
    fn test_split_around_images() {
        let dom = parse_html(r#"<p>Before <img src="a.jpg"> after</p>"#);
        let p = first(&dom);
        let segments = split_around_images(&dom, p).unwrap();
        assert_eq!(segments.len(), 3);
        assert!(matches!(segments[0], Segment::Wrap { like, .. } if like == p));
        assert!(matches!(segments[1], Segment::Node(n) if dom.is_tag(n, "img")));
    }

    #[test]
    fn test_no_split_for_lone_image() {
        let dom = parse_html(r#"<p><a href="x"><img src="a.jpg"></a></p>"#);
        assert!(split_around_images(&dom, first(&dom)).is_none());

        let dom = parse_html("<p>Only text</p>");
        assert!(split_around_images(&dom, first(&dom)).is_none());
    }

    #[test]
    fn test_split_image_only_paragraph() {
        let dom = parse_html(r#"<p><img src="a.jpg"> <img src="b.jpg"></p>"#);
        let segments = split_around_images(&dom, first(&dom)).unwrap();
        assert_eq!(segments.len(), 2);
        assert!(segments.iter().all(|s| matches!(s, Segment::Node(n) if dom.is_tag(*n, "img"))));
    }
}
