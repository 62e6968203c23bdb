//! Audio and video files.
//!
//! Media URLs are referenced remotely: the publishing side streams them, so
//! they are not bundled.

use serde_json::json;

use crate::context::ExportContext;
use crate::dom::{Dom, NodeId};
use crate::spec::ComponentSpec;

use super::{Component, ComponentKind, NodeMatch};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Media {
    Audio,
    Video,
}

impl Media {
    fn kind(self) -> ComponentKind {
        match self {
            Media::Audio => ComponentKind::Audio,
            Media::Video => ComponentKind::Video,
        }
    }

    fn tag(self) -> &'static str {
        match self {
            Media::Audio => "audio",
            Media::Video => "video",
        }
    }

    pub(crate) fn matches(self, dom: &Dom, node: NodeId) -> Option<NodeMatch> {
        let claimed = dom.is_tag(node, self.tag())
            || (dom.is_tag(node, "figure") && dom.find_tag_within(node, self.tag()).is_some());
        claimed.then_some(NodeMatch::Claim(node))
    }

    pub(crate) fn specs(self) -> Vec<ComponentSpec> {
        let name = self.kind().name();
        let json = match self {
            Media::Audio => json!({"role": "audio", "URL": "#url#"}),
            Media::Video => json!({"role": "video", "URL": "#url#", "stillURL": "#still_url#"}),
        };
        vec![
            ComponentSpec::new(name, "json", "JSON", json),
            ComponentSpec::new(
                name,
                &format!("{name}-layout"),
                "Layout",
                json!({
                    "columnStart": "#body_offset#",
                    "columnSpan": "#body_column_span#",
                    "margin": {"top": 20, "bottom": 20},
                }),
            ),
        ]
    }

    pub(crate) fn build(self, ctx: &mut ExportContext<'_>, dom: &Dom, node: NodeId) -> Component {
        let Some(element) = dom.find_tag_within(node, self.tag()) else {
            return Component::suppressed(self.kind(), format!("no <{}> element", self.tag()));
        };
        let url = dom
            .get_attr(element, "src")
            .or_else(|| {
                dom.find_tag_within(element, "source")
                    .and_then(|s| dom.get_attr(s, "src"))
            })
            .map(str::trim)
            .unwrap_or_default();
        if url.is_empty() {
            return Component::suppressed(self.kind(), format!("<{}> without a source", self.tag()));
        }

        let mut values = ctx.values().with("url", url);
        if self == Media::Video
            && let Some(poster) = dom.get_attr(element, "poster").filter(|p| !p.trim().is_empty())
            && let Some(still) = ctx.bundle(poster.trim())
        {
            values.insert("still_url", still);
        }

        let name = self.kind().name();
        let mut component = Component::new(self.kind(), self.tag());
        component.json = ctx.render_object(name, "json", &values);
        component.layout = Some(ctx.register_layout(name, &format!("{name}-layout"), &values));
        component
    }
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
    fn test_audio_and_video() {
        let settings = Settings::default();
        let theme = Theme::default();
        let registry = ComponentRegistry::new();
        let catalog = registry.catalog();
        let mut ctx = ExportContext::new(&settings, &theme, &catalog, &registry, &FilenameBundler);

        let dom = parse_html(
            r#"<figure><audio controls src="https://x.test/a.mp3"></audio></figure><video poster="https://x.test/p.jpg"><source src="https://x.test/v.mp4"></video>"#,
        );
        let nodes: Vec<_> = dom.child_elements(dom.body()).collect();
        assert!(Media::Audio.matches(&dom, nodes[0]).is_some());
        assert!(Media::Video.matches(&dom, nodes[0]).is_none());

        let audio = Media::Audio.build(&mut ctx, &dom, nodes[0]);
        assert_eq!(audio.json, json!({"role": "audio", "URL": "https://x.test/a.mp3"}).as_object().unwrap().clone());

        let video = Media::Video.build(&mut ctx, &dom, nodes[1]);
        assert_eq!(video.role, "video");
        assert_eq!(video.json["URL"], "https://x.test/v.mp4");
        assert_eq!(video.json["stillURL"], "bundle://p.jpg");
    }

    #[test]
    fn test_missing_source_suppressed() {
        let settings = Settings::default();
        let theme = Theme::default();
        let registry = ComponentRegistry::new();
        let catalog = registry.catalog();
        let mut ctx = ExportContext::new(&settings, &theme, &catalog, &registry, &FilenameBundler);

        let dom = parse_html("<audio></audio>");
        let node = dom.child_elements(dom.body()).next().unwrap();
        assert!(Media::Audio.build(&mut ctx, &dom, node).is_suppressed());
    }
}
