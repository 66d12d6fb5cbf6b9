use lazy_static::lazy_static;
use markdown::{CompileOptions, Options, ParseOptions};
use regex::{Captures, Regex};
use spdlog::{debug, error, warn};

use crate::content::highlight::{highlight_guarded, Highlighter, NoHighlighter};
use crate::content::html_utils::{escape_html, text_content, unescape_html};
use crate::content::slug::{anchor_target, AnchorRegistry};
use crate::error::HighlightError;

lazy_static! {
    static ref HEADING: Regex = Regex::new(r"(?s)<h([1-6])>(.*?)</h[1-6]>").unwrap();
    static ref CODE_BLOCK: Regex = Regex::new(r#"(?s)<pre><code class="language-([^"]*)">(.*?)</code></pre>"#).unwrap();
    static ref COMMENT: Regex = Regex::new(r"(?s)<!--.*?(-->|$)").unwrap();
}

/// Applies `f` to the parts of `html` outside comments; comments are copied as is.
fn outside_comments(html: &str, mut f: impl FnMut(&str) -> String) -> String {
    let mut out = String::with_capacity(html.len());
    let mut last = 0;
    for comment in COMMENT.find_iter(html) {
        out.push_str(&f(&html[last..comment.start()]));
        out.push_str(comment.as_str());
        last = comment.end();
    }
    out.push_str(&f(&html[last..]));
    out
}

/// Markdown to HTML for post bodies.
///
/// Headings from level 2 down get an `id` and a trailing permalink scoped by
/// the post's path, fenced code goes through the [`Highlighter`].
///
/// Raw HTML in the markdown is passed through and the output is not
/// sanitized: post sources are author supplied and packaged with the site.
/// Put a sanitizer in front of the output before rendering anything else.
pub struct MarkdownRenderer<H = NoHighlighter> {
    highlighter: H,
}

impl MarkdownRenderer {
    pub fn new() -> Self {
        MarkdownRenderer { highlighter: NoHighlighter }
    }
}

impl Default for MarkdownRenderer {
    fn default() -> Self {
        Self::new()
    }
}

fn render_options() -> Options {
    Options {
        parse: ParseOptions::gfm(),
        compile: CompileOptions {
            allow_dangerous_html: true,
            allow_dangerous_protocol: true,
            gfm_tagfilter: false,
            ..CompileOptions::gfm()
        },
    }
}

impl<H: Highlighter> MarkdownRenderer<H> {
    pub fn with_highlighter(highlighter: H) -> Self {
        MarkdownRenderer { highlighter }
    }

    pub fn render(&self, md_text: &str, scope_path: &str) -> String {
        let html = match markdown::to_html_with_options(md_text, &render_options()) {
            Ok(html) => html,
            Err(e) => {
                error!("Error rendering markdown for {}: {}", scope_path, e);
                return format!("<pre>{}</pre>", escape_html(md_text));
            }
        };

        let html = add_heading_anchors(&html, scope_path);
        self.highlight_code_blocks(&html)
    }

    fn highlight_code_blocks(&self, html: &str) -> String {
        outside_comments(html, |part| self.highlight_part(part))
    }

    fn highlight_part(&self, html: &str) -> String {
        CODE_BLOCK.replace_all(html, |caps: &Captures| {
            let lang = unescape_html(&caps[1]).into_owned();
            let code = unescape_html(&caps[2]);
            match highlight_guarded(&self.highlighter, &code, &lang) {
                Ok(highlighted) => format!(r#"<pre><code class="language-{}">{}</code></pre>"#, &caps[1], highlighted),
                Err(HighlightError::UnknownLanguage(_)) => {
                    debug!("No highlighting for {} code block", lang);
                    caps[0].to_string()
                }
                Err(e) => {
                    warn!("Keeping {} code block as plain text: {}", lang, e);
                    caps[0].to_string()
                }
            }
        }).into_owned()
    }
}

fn add_heading_anchors(html: &str, scope_path: &str) -> String {
    let mut registry = AnchorRegistry::default();
    outside_comments(html, |part| anchor_headings(part, scope_path, &mut registry))
}

fn anchor_headings(html: &str, scope_path: &str, registry: &mut AnchorRegistry) -> String {
    HEADING.replace_all(html, |caps: &Captures| {
        let level = &caps[1];
        // h1 is the post title
        if level == "1" {
            return caps[0].to_string();
        }

        let inner = &caps[2];
        let target = registry.unique(anchor_target(scope_path, &text_content(inner)));
        let target = escape_html(&target);
        format!(r##"<h{level} id="{target}">{inner} <a class="header-anchor" href="#{target}" aria-hidden="true">¶</a></h{level}>"##)
    }).into_owned()
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;

    use crate::test_data::POST_DATA_MD;

    use super::*;

    #[test]
    fn test_title_has_no_anchor() {
        let html = MarkdownRenderer::new().render("# Title\n## Section", "post-a");
        assert!(html.contains("<h1>Title</h1>"));
        assert!(html.contains(r##"<h2 id="a/post-a/section">Section <a class="header-anchor" href="#a/post-a/section" aria-hidden="true">¶</a></h2>"##));
    }

    #[test]
    fn test_all_deeper_levels_get_anchors() {
        let html = MarkdownRenderer::new().render("### Three\n\n#### Four\n\n##### Five\n\n###### Six", "p");
        for (level, text) in [(3, "three"), (4, "four"), (5, "five"), (6, "six")] {
            assert!(html.contains(&format!(r#"<h{} id="a/p/{}">"#, level, text)), "missing anchor for h{}", level);
        }
    }

    #[test]
    fn test_anchor_uses_heading_text() {
        let html = MarkdownRenderer::new().render("## Setup *Guide* & `cargo`", "my-post");
        assert!(html.contains(r#"id="a/my-post/setup-guide--cargo""#));
        assert!(html.contains("Setup <em>Guide</em> &amp; <code>cargo</code> <a"));
    }

    #[test]
    fn test_duplicate_headings_are_unique() {
        let html = MarkdownRenderer::new().render("## Notes\n\ntext\n\n## Notes", "p");
        assert!(html.contains(r#"id="a/p/notes""#));
        assert!(html.contains(r#"id="a/p/notes-1""#));
    }

    #[test]
    fn test_same_heading_in_two_posts() {
        let renderer = MarkdownRenderer::new();
        let first = renderer.render("## Intro", "first");
        let second = renderer.render("## Intro", "second");
        assert!(first.contains("a/first/intro"));
        assert!(second.contains("a/second/intro"));
    }

    #[test]
    fn test_markdown_features() {
        let md = "Some *emphasis* and **strong**.\n\n- one\n- two\n\n[link](https://example.com) and https://rust-lang.org\n\n<div class=\"raw\">kept</div>\n";
        let html = MarkdownRenderer::new().render(md, "p");
        assert!(html.contains("<em>emphasis</em>"));
        assert!(html.contains("<strong>strong</strong>"));
        assert!(html.contains("<li>one</li>"));
        assert!(html.contains(r#"<a href="https://example.com">link</a>"#));
        assert!(html.contains(r#"<a href="https://rust-lang.org">https://rust-lang.org</a>"#));
        assert!(html.contains(r#"<div class="raw">kept</div>"#));
    }

    #[test]
    fn test_unhighlighted_code_is_escaped() {
        let html = MarkdownRenderer::new().render(POST_DATA_MD, "p");
        assert!(html.contains(r#"<pre><code class="language-rust">fn main() {"#));
        assert!(html.contains("println!(&quot;&lt;hello&gt;&quot;);"));
    }

    #[test]
    fn test_highlighter_gets_decoded_code() {
        let seen = RefCell::new(vec![]);
        let highlighter = |code: &str, lang: &str| -> Result<String, HighlightError> {
            seen.borrow_mut().push((lang.to_string(), code.to_string()));
            Ok("<span class=\"hl\">HIGHLIGHTED</span>".to_string())
        };
        let html = MarkdownRenderer::with_highlighter(highlighter).render(POST_DATA_MD, "p");

        assert!(html.contains(r#"<pre><code class="language-rust"><span class="hl">HIGHLIGHTED</span></code></pre>"#));
        let seen = seen.borrow();
        assert_eq!(seen.len(), 1);
        assert_eq!(seen[0].0, "rust");
        assert!(seen[0].1.contains("println!(\"<hello>\");"));
    }

    #[test]
    fn test_code_without_language_is_untouched() {
        let highlighter = |_code: &str, _lang: &str| -> Result<String, HighlightError> { Ok("NOPE".to_string()) };
        let html = MarkdownRenderer::with_highlighter(highlighter).render("```\nplain <text>\n```", "p");
        assert!(html.contains("<pre><code>plain &lt;text&gt;\n</code></pre>"));
        assert!(!html.contains("NOPE"));
    }

    #[test]
    fn test_highlight_failure_keeps_rendering() {
        let failing = |_code: &str, lang: &str| -> Result<String, HighlightError> {
            if lang == "broken" {
                Err(HighlightError::Failed("bad grammar".to_string()))
            } else {
                Ok("OK".to_string())
            }
        };
        let md = "```broken\nx < y\n```\n\n## After\n\n```js\nlet a;\n```\n\nThe end.";
        let html = MarkdownRenderer::with_highlighter(failing).render(md, "p");

        assert!(html.contains(r#"<pre><code class="language-broken">x &lt; y"#));
        assert!(html.contains(r#"<h2 id="a/p/after">"#));
        assert!(html.contains(r#"<pre><code class="language-js">OK</code></pre>"#));
        assert!(html.contains("<p>The end.</p>"));
    }

    #[test]
    fn test_highlight_panic_keeps_rendering() {
        let panicking = |_code: &str, _lang: &str| -> Result<String, HighlightError> { panic!("boom") };
        let html = MarkdownRenderer::with_highlighter(panicking).render("```rust\nlet x = 1;\n```\n\nAfter the block.", "p");
        assert!(html.contains(r#"<pre><code class="language-rust">let x = 1;"#));
        assert!(html.contains("<p>After the block.</p>"));
    }

    #[test]
    fn test_commented_heading_is_ignored() {
        let html = MarkdownRenderer::new().render("<!-- <h2>Setup</h2> -->\n\n## Setup", "p");
        assert!(html.contains("<!-- <h2>Setup</h2> -->"));
        assert!(html.contains(r#"<h2 id="a/p/setup">Setup "#));
        assert!(!html.contains("a/p/setup-1"));
    }

    #[test]
    fn test_commented_code_is_not_highlighted() {
        let calls = RefCell::new(0);
        let highlighter = |_code: &str, _lang: &str| -> Result<String, HighlightError> {
            *calls.borrow_mut() += 1;
            Ok("HL".to_string())
        };
        let md = "<!--\n<pre><code class=\"language-rust\">let x;</code></pre>\n-->\n\n```rust\nlet y;\n```";
        let html = MarkdownRenderer::with_highlighter(highlighter).render(md, "p");
        assert_eq!(*calls.borrow(), 1);
        assert!(html.contains(r#"<pre><code class="language-rust">let x;</code></pre>"#));
        assert!(html.contains(r#"<pre><code class="language-rust">HL</code></pre>"#));
    }

    #[test]
    fn test_render_is_idempotent() {
        let renderer = MarkdownRenderer::new();
        let first = renderer.render(POST_DATA_MD, "twenty-years");
        let second = renderer.render(POST_DATA_MD, "twenty-years");
        assert_eq!(first, second);
    }
}
