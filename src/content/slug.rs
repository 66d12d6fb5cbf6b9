//! Heading anchor slugs.
//!
//! A heading's anchor target is `a/<scope path>/<slug>`, so the same heading
//! text in two posts links to two different places.

use std::collections::HashMap;

use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    static ref WHITESPACE: Regex = Regex::new(r"\s+").unwrap();
    static ref NON_SLUG: Regex = Regex::new(r"[^a-zA-Z0-9-]").unwrap();
}

/// Lower-cases, turns whitespace runs into a single `-` and drops every
/// character outside `[a-zA-Z0-9-]`.
pub fn slugify(text: &str) -> String {
    let lower = text.trim().to_lowercase();
    let hyphenated = WHITESPACE.replace_all(&lower, "-");
    NON_SLUG.replace_all(&hyphenated, "").into_owned()
}

pub fn anchor_target(scope_path: &str, heading_text: &str) -> String {
    format!("a/{}/{}", scope_path, slugify(heading_text))
}

/// Hands out unique anchor targets within one document.
/// Repeats get `-1`, `-2`, ... appended.
#[derive(Default)]
pub struct AnchorRegistry {
    seen: HashMap<String, usize>,
}

impl AnchorRegistry {
    pub fn unique(&mut self, target: String) -> String {
        if !self.seen.contains_key(&target) {
            self.seen.insert(target.clone(), 0);
            return target;
        }

        let mut index = self.seen[&target];
        loop {
            index += 1;
            let candidate = format!("{}-{}", target, index);
            if !self.seen.contains_key(&candidate) {
                self.seen.insert(target, index);
                self.seen.insert(candidate.clone(), 0);
                return candidate;
            }
        }
    }
}
