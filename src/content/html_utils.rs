use std::borrow::Cow;

use lazy_static::lazy_static;
use regex::{Captures, Regex};

lazy_static! {
    static ref TAG: Regex = Regex::new(r"<[^>]*>").unwrap();
    static ref ENTITY: Regex = Regex::new(r"&(#[0-9]{1,7}|#[xX][0-9a-fA-F]{1,6}|amp|lt|gt|quot|apos);").unwrap();
}

pub fn escape_html(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#x27;"),
            _ => escaped.push(c),
        }
    }
    escaped
}

/// Decodes the entities the markdown compiler emits, plus numeric references.
/// Unknown entities are left as they are.
pub fn unescape_html(text: &str) -> Cow<'_, str> {
    ENTITY.replace_all(text, |caps: &Captures| {
        let entity = &caps[1];
        let decoded = match entity {
            "amp" => Some('&'),
            "lt" => Some('<'),
            "gt" => Some('>'),
            "quot" => Some('"'),
            "apos" => Some('\''),
            _ if entity.starts_with("#x") || entity.starts_with("#X") => {
                u32::from_str_radix(&entity[2..], 16).ok().and_then(char::from_u32)
            }
            _ => entity[1..].parse::<u32>().ok().and_then(char::from_u32),
        };
        match decoded {
            Some(c) => c.to_string(),
            None => caps[0].to_string(),
        }
    })
}

/// Text content of an HTML fragment.
pub fn text_content(html: &str) -> String {
    let stripped = TAG.replace_all(html, "");
    unescape_html(&stripped).into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_escape() {
        assert_eq!(escape_html(r#"<a href="x">Tom & 'Jerry'</a>"#), "&lt;a href=&quot;x&quot;&gt;Tom &amp; &#x27;Jerry&#x27;&lt;/a&gt;");
        assert_eq!(escape_html("plain"), "plain");
    }

    #[test]
    fn test_unescape() {
        assert_eq!(unescape_html("&lt;b&gt; &amp;&amp; &quot;q&quot;"), "<b> && \"q\"");
        assert_eq!(unescape_html("&#39;&#x27;&#X41;"), "''A");
        assert_eq!(unescape_html("&nbsp; &#xFFFFFF;"), "&nbsp; &#xFFFFFF;");
    }

    #[test]
    fn test_text_content() {
        assert_eq!(text_content("Setup <em>Guide</em> &amp; <code>cargo</code>"), "Setup Guide & cargo");
        assert_eq!(text_content(r#"<a href="/x">Link</a>"#), "Link");
    }
}
