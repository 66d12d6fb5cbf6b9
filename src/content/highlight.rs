use std::panic::{self, AssertUnwindSafe};

use crate::error::HighlightError;

/// Turns the source of a fenced code block into highlighted HTML.
///
/// The returned string is placed inside `<pre><code class="language-LANG">`
/// as is, so implementations must escape the code themselves.
pub trait Highlighter {
    fn highlight(&self, code: &str, lang: &str) -> Result<String, HighlightError>;
}

/// Knows no languages. Every block is left as plain text.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoHighlighter;

impl Highlighter for NoHighlighter {
    fn highlight(&self, _code: &str, lang: &str) -> Result<String, HighlightError> {
        Err(HighlightError::UnknownLanguage(lang.to_string()))
    }
}

impl<F> Highlighter for F
where
    F: Fn(&str, &str) -> Result<String, HighlightError>,
{
    fn highlight(&self, code: &str, lang: &str) -> Result<String, HighlightError> {
        self(code, lang)
    }
}

/// Runs the highlighter, turning a panic into [`HighlightError::Failed`].
pub(crate) fn highlight_guarded<H: Highlighter>(highlighter: &H, code: &str, lang: &str) -> Result<String, HighlightError> {
    match panic::catch_unwind(AssertUnwindSafe(|| highlighter.highlight(code, lang))) {
        Ok(result) => result,
        Err(payload) => {
            let reason = payload.downcast_ref::<&str>().map(|s| s.to_string())
                .or_else(|| payload.downcast_ref::<String>().cloned())
                .unwrap_or_else(|| "highlighter panicked".to_string());
            Err(HighlightError::Failed(reason))
        }
    }
}
