use ramhorns::Template;

use crate::archive_list::ArchiveEntry;

#[derive(ramhorns::Content)]
struct ListPage<'a> {
    site_title: &'a str,
    has_posts: bool,
    post_list: Vec<PostItem<'a>>,
}

#[derive(ramhorns::Content)]
struct PostItem<'a> {
    title: &'a str,
    target: &'a str,
    date: &'a str,
    has_readtime: bool,
    readtime: &'a str,
}

pub struct ListRenderer {
    pub template: Template<'static>,
}

impl ListRenderer {
    pub fn new(template: Template<'static>) -> Self {
        ListRenderer { template }
    }

    pub fn render(&self, site_title: &str, entries: &[ArchiveEntry]) -> String {
        let post_list = entries.iter()
            .map(|entry| PostItem {
                title: entry.title.as_str(),
                target: entry.target.as_str(),
                date: entry.date.as_str(),
                has_readtime: entry.readtime.is_some(),
                readtime: entry.readtime.as_deref().unwrap_or_default(),
            })
            .collect();

        self.template.render(&ListPage {
            site_title,
            has_posts: !entries.is_empty(),
            post_list,
        })
    }
}
