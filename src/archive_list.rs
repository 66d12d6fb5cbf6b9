use crate::manifest::PostMetadata;

/// One line of the archive list.
#[derive(Debug, Clone, PartialEq)]
pub struct ArchiveEntry {
    pub title: String,
    pub target: String,
    pub date: String,
    pub readtime: Option<String>,
}

/// Builds the archive links in manifest order.
pub fn render_list(posts: &[PostMetadata]) -> Vec<ArchiveEntry> {
    posts.iter()
        .map(|post| ArchiveEntry {
            title: post.name.clone(),
            target: post.route(),
            date: post.date.clone(),
            readtime: post.readtime_label(),
        })
        .collect()
}
