//! Social and video embeds.
//!
//! Editors produce embeds in three shapes: the provider's own markup
//! (`blockquote.twitter-tweet`, `div.fb-post`, an `iframe`), a block-editor
//! figure (`figure.wp-block-embed-twitter`), or a paragraph holding nothing
//! but the URL. All three resolve to one canonical URL per provider.

use serde_json::json;
use url::Url;

use crate::context::ExportContext;
use crate::dom::{Dom, NodeId};
use crate::spec::ComponentSpec;

use super::{Component, ComponentKind, NodeMatch};

/// Attributes that carry embed URLs.
const URL_ATTRIBUTES: &[&str] = &["data-href", "data-instgrm-permalink", "src", "href", "cite"];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Provider {
    Twitter,
    Instagram,
    Facebook,
    WebVideo,
}

impl Provider {
    fn kind(self) -> ComponentKind {
        match self {
            Provider::Twitter => ComponentKind::Tweet,
            Provider::Instagram => ComponentKind::Instagram,
            Provider::Facebook => ComponentKind::Facebook,
            Provider::WebVideo => ComponentKind::EmbedWebVideo,
        }
    }

    fn role(self) -> &'static str {
        match self {
            Provider::Twitter => "tweet",
            Provider::Instagram => "instagram",
            Provider::Facebook => "facebook_post",
            Provider::WebVideo => "embedwebvideo",
        }
    }

    fn figure_classes(self) -> &'static [&'static str] {
        match self {
            Provider::Twitter => &["wp-block-embed-twitter", "is-provider-twitter"],
            Provider::Instagram => &["wp-block-embed-instagram", "is-provider-instagram"],
            Provider::Facebook => &["wp-block-embed-facebook", "is-provider-facebook"],
            Provider::WebVideo => &[
                "wp-block-embed-youtube",
                "is-provider-youtube",
                "wp-block-embed-vimeo",
                "is-provider-vimeo",
            ],
        }
    }

    /// The provider's own embed markup.
    fn is_native_markup(self, dom: &Dom, node: NodeId) -> bool {
        match self {
            Provider::Twitter => dom.is_tag(node, "blockquote") && dom.has_class(node, "twitter-tweet"),
            Provider::Instagram => dom.is_tag(node, "blockquote") && dom.has_class(node, "instagram-media"),
            Provider::Facebook => dom.has_class(node, "fb-post") || dom.has_class(node, "fb-video"),
            Provider::WebVideo => {
                let iframe = if dom.is_tag(node, "iframe") {
                    Some(node)
                } else if matches!(dom.tag(node), "p" | "div") {
                    let mut children = dom.significant_children(node);
                    children
                        .next()
                        .filter(|&c| dom.is_tag(c, "iframe") && children.next().is_none())
                } else {
                    None
                };
                iframe
                    .and_then(|f| dom.get_attr(f, "src"))
                    .is_some_and(|src| self.canonical_url(src).is_some())
            }
        }
    }

    fn is_embed_figure(self, dom: &Dom, node: NodeId) -> bool {
        dom.is_tag(node, "figure") && self.figure_classes().iter().any(|c| dom.has_class(node, c))
    }

    /// A paragraph (or bare text) consisting of one provider URL.
    fn is_bare_url(self, dom: &Dom, node: NodeId) -> bool {
        if !dom.is_text(node) && !dom.is_tag(node, "p") {
            return false;
        }
        if dom.is_tag(node, "p") {
            let mut children = dom.significant_children(node);
            let only_child = children.next().filter(|_| children.next().is_none());
            let simple = only_child.is_some_and(|c| dom.is_text(c) || dom.is_tag(c, "a"));
            if !simple {
                return false;
            }
        }
        let text = dom.text(node);
        let text = text.trim();
        !text.contains(char::is_whitespace) && self.canonical_url(text).is_some()
    }

    /// Canonical URL for `raw` if it points at this provider.
    pub(crate) fn canonical_url(self, raw: &str) -> Option<String> {
        let mut parsed = Url::parse(raw.trim()).ok()?;
        if !matches!(parsed.scheme(), "http" | "https") {
            return None;
        }
        let host = parsed.host_str()?.to_ascii_lowercase();
        let host = ["www.", "m.", "mobile."]
            .iter()
            .fold(host.as_str(), |h, prefix| h.strip_prefix(prefix).unwrap_or(h))
            .to_string();
        let segments: Vec<String> = parsed
            .path_segments()
            .map(|s| s.filter(|p| !p.is_empty()).map(str::to_string).collect())
            .unwrap_or_default();

        match self {
            Provider::Twitter => {
                let is_status = matches!(host.as_str(), "twitter.com" | "x.com")
                    && segments.iter().any(|s| s == "status" || s == "statuses");
                if !is_status {
                    return None;
                }
                parsed.set_query(None);
                parsed.set_fragment(None);
                Some(parsed.to_string())
            }
            Provider::Instagram => {
                if host != "instagram.com" || segments.len() < 2 {
                    return None;
                }
                matches!(segments[0].as_str(), "p" | "reel" | "tv")
                    .then(|| format!("https://www.instagram.com/{}/{}/", segments[0], segments[1]))
            }
            Provider::Facebook => {
                let is_post = host == "facebook.com"
                    && segments
                        .iter()
                        .any(|s| matches!(s.as_str(), "posts" | "videos" | "photos" | "permalink.php"));
                if !is_post {
                    return None;
                }
                parsed.set_fragment(None);
                Some(parsed.to_string())
            }
            Provider::WebVideo => {
                let youtube_id = match host.as_str() {
                    "youtube.com" | "youtube-nocookie.com" => match segments.first().map(String::as_str) {
                        Some("embed") => segments.get(1).cloned(),
                        Some("watch") => parsed
                            .query_pairs()
                            .find(|(k, _)| k == "v")
                            .map(|(_, v)| v.into_owned()),
                        _ => None,
                    },
                    "youtu.be" => segments.first().cloned(),
                    _ => None,
                };
                if let Some(id) = youtube_id.filter(|id| !id.is_empty()) {
                    return Some(format!("https://www.youtube.com/embed/{id}"));
                }

                let vimeo_id = match host.as_str() {
                    "vimeo.com" => segments.first(),
                    "player.vimeo.com" if segments.first().is_some_and(|s| s == "video") => segments.get(1),
                    _ => None,
                };
                vimeo_id
                    .filter(|id| !id.is_empty() && id.chars().all(|c| c.is_ascii_digit()))
                    .map(|id| format!("https://player.vimeo.com/video/{id}"))
            }
        }
    }

    pub(crate) fn matches(self, dom: &Dom, node: NodeId) -> Option<NodeMatch> {
        let claimed = self.is_native_markup(dom, node) || self.is_embed_figure(dom, node) || self.is_bare_url(dom, node);
        claimed.then_some(NodeMatch::Claim(node))
    }

    /// First provider URL found on the node, its descendants or its text.
    fn find_url(self, dom: &Dom, node: NodeId) -> Option<String> {
        let mut candidates: Vec<&str> = Vec::new();
        for id in std::iter::once(node).chain(dom.descendants(node)) {
            for attr in URL_ATTRIBUTES {
                if let Some(value) = dom.get_attr(id, attr) {
                    candidates.push(value);
                }
            }
        }
        let text = dom.text(node);
        candidates.extend(text.split_whitespace());
        candidates.into_iter().find_map(|c| self.canonical_url(c))
    }

    pub(crate) fn specs(self) -> Vec<ComponentSpec> {
        let component = self.kind().name();
        let json = match self {
            Provider::WebVideo => json!({"role": self.role(), "URL": "#url#", "aspectRatio": 1.777}),
            _ => json!({"role": self.role(), "URL": "#url#"}),
        };
        vec![
            ComponentSpec::new(component, "json", "JSON", json),
            ComponentSpec::new(
                component,
                &format!("{component}-layout"),
                "Layout",
                json!({
                    "columnStart": "#body_offset#",
                    "columnSpan": "#body_column_span#",
                    "margin": {"top": 15, "bottom": 15},
                }),
            ),
        ]
    }

    pub(crate) fn build(self, ctx: &mut ExportContext<'_>, dom: &Dom, node: NodeId) -> Component {
        let Some(url) = self.find_url(dom, node) else {
            return Component::suppressed(self.kind(), format!("no {} URL in embed", self.role()));
        };
        let component_name = self.kind().name();
        let values = ctx.values().with("url", url);

        let mut component = Component::new(self.kind(), self.role());
        component.json = ctx.render_object(component_name, "json", &values);
        component.layout = Some(ctx.register_layout(component_name, &format!("{component_name}-layout"), &values));
        component
    }
}
