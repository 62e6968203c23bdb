//! Markdown generation for text components.
//!
//! - [`escape`]: escaping and whitespace helpers
//! - [`render`]: DOM subtree → Markdown

mod escape;
mod render;

pub use escape::{calculate_inline_code_ticks, collapse_whitespace, escape_markdown};
pub use render::{render_block, render_inline};
