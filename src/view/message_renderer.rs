use ramhorns::Template;

#[derive(ramhorns::Content)]
struct NotFoundItem<'a> {
    site_title: &'a str,
    path: &'a str,
}

#[derive(ramhorns::Content)]
struct FetchErrorItem<'a> {
    site_title: &'a str,
    post_title: &'a str,
}

/// Fixed documents shown instead of a post.
pub struct MessageRenderer {
    pub not_found: Template<'static>,
    pub fetch_error: Template<'static>,
}

impl MessageRenderer {
    pub fn render_not_found(&self, site_title: &str, path: &str) -> String {
        self.not_found.render(&NotFoundItem { site_title, path })
    }

    pub fn render_fetch_error(&self, site_title: &str, post_title: &str) -> String {
        self.fetch_error.render(&FetchErrorItem { site_title, post_title })
    }
}
