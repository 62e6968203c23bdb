//! HTML parsing into an arena DOM.
//!
//! Editor output is parsed with html5ever, which recovers from malformed
//! markup the way browsers do, into a [`Dom`] whose nodes are addressed by
//! [`NodeId`]. Fragments are parsed as full documents, so content always ends
//! up under a `<body>` element.
//!
//! ```
//! use folio::dom::parse_html;
//!
//! let dom = parse_html("<p class='lead'>Hello</p>");
//! let p = dom.find_by_class("lead").unwrap();
//! assert_eq!(dom.text(p), "Hello");
//! ```

mod arena;
mod serialize;
mod tree_sink;

pub use arena::{Attribute, ChildrenIter, Dom, Node, NodeData, NodeId};
pub use serialize::{escape_attr, escape_text, inner_html, is_void_element, outer_html};
pub use tree_sink::{DomSink, SinkHandle};

use html5ever::driver::ParseOpts;
use html5ever::parse_document;
use html5ever::tendril::TendrilSink;

/// Parse an HTML document or fragment.
pub fn parse_html(html: &str) -> Dom {
    let sink = DomSink::new();
    parse_document(sink, ParseOpts::default())
        .from_utf8()
        .one(html.as_bytes())
        .into_dom()
}
