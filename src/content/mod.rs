pub mod highlight;
pub mod html_utils;
pub mod markdown_renderer;
pub mod slug;

pub use highlight::{Highlighter, NoHighlighter};
pub use markdown_renderer::MarkdownRenderer;
