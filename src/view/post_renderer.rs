use ramhorns::Template;

use crate::post_resolver::RenderedPost;

#[derive(ramhorns::Content)]
struct ViewItem<'a> {
    site_title: &'a str,
    post_title: &'a str,
    date: &'a str,
    has_readtime: bool,
    readtime: &'a str,
    post_content: &'a str,
}

pub struct PostRenderer {
    pub template: Template<'static>,
}

impl PostRenderer {
    pub fn new(template: Template<'static>) -> Self {
        PostRenderer { template }
    }

    pub fn render(&self, site_title: &str, post: &RenderedPost) -> String {
        let readtime = post.meta.readtime_label();
        self.template.render(&ViewItem {
            site_title,
            post_title: post.meta.name.as_str(),
            date: post.meta.date.as_str(),
            has_readtime: readtime.is_some(),
            readtime: readtime.as_deref().unwrap_or_default(),
            post_content: post.html.as_str(),
        })
    }
}
