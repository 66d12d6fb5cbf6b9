use std::collections::HashSet;
use std::fmt::{Display, Formatter};

use lazy_static::lazy_static;
use regex::Regex;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

lazy_static! {
    static ref URL_SAFE: Regex = Regex::new(r"^[A-Za-z0-9._~-]+$").unwrap();
}

/// One entry of the post manifest.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PostMetadata {
    pub name: String,
    pub file: String,
    pub link: String,
    pub date: String,
    #[serde(default, deserialize_with = "lenient_readtime")]
    pub readtime: Option<u32>,
}

/// Whole positive minutes; any other value reads as no read time.
fn lenient_readtime<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<u32>, D::Error> {
    let minutes = match Value::deserialize(deserializer)? {
        Value::Number(n) => match (n.as_u64(), n.as_f64()) {
            (Some(n), _) => Some(n),
            (None, Some(f)) if f >= 1.0 && f.fract() == 0.0 => Some(f.min(u32::MAX as f64) as u64),
            _ => None,
        },
        _ => None,
    };
    Ok(minutes.filter(|&n| n > 0).map(|n| n.min(u32::MAX as u64) as u32))
}

impl PostMetadata {
    /// "N min read", only for a non-zero read time.
    pub fn readtime_label(&self) -> Option<String> {
        match self.readtime {
            Some(minutes) if minutes > 0 => Some(format!("{} min read", minutes)),
            _ => None,
        }
    }

    pub fn route(&self) -> String {
        format!("a/{}", self.link)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum ManifestIssue {
    DuplicateFile(String),
    DuplicateLink(String),
    UnsafeLink(String),
}

impl Display for ManifestIssue {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            ManifestIssue::DuplicateFile(file) => write!(f, "file {} is listed more than once", file),
            ManifestIssue::DuplicateLink(link) => write!(f, "link {} is listed more than once", link),
            ManifestIssue::UnsafeLink(link) => write!(f, "link {:?} is not URL-safe", link),
        }
    }
}

/// The ordered post index. Order is display order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Manifest {
    posts: Vec<PostMetadata>,
}

impl Manifest {
    pub fn new(posts: Vec<PostMetadata>) -> Self {
        Manifest { posts }
    }

    pub fn parse(json: &str) -> Result<Self, serde_json::Error> {
        let posts: Vec<PostMetadata> = serde_json::from_str(json)?;
        Ok(Manifest { posts })
    }

    pub fn posts(&self) -> &[PostMetadata] {
        &self.posts
    }

    pub fn len(&self) -> usize {
        self.posts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.posts.is_empty()
    }

    pub fn by_file(&self, file: &str) -> Option<&PostMetadata> {
        self.posts.iter().find(|p| p.file == file)
    }

    pub fn by_link(&self, link: &str) -> Option<&PostMetadata> {
        self.posts.iter().find(|p| p.link == link)
    }

    pub fn validate(&self) -> Vec<ManifestIssue> {
        let mut issues = vec![];
        let mut files = HashSet::new();
        let mut links = HashSet::new();

        for post in self.posts.iter() {
            if !files.insert(post.file.as_str()) {
                issues.push(ManifestIssue::DuplicateFile(post.file.clone()));
            }
            if !links.insert(post.link.as_str()) {
                issues.push(ManifestIssue::DuplicateLink(post.link.clone()));
            }
            if !URL_SAFE.is_match(&post.link) {
                issues.push(ManifestIssue::UnsafeLink(post.link.clone()));
            }
        }

        issues
    }
}
