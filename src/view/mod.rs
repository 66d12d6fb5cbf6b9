use std::io;
use std::path::Path;

use crate::view::list_renderer::ListRenderer;
use crate::view::message_renderer::MessageRenderer;
use crate::view::post_renderer::PostRenderer;
use crate::view::templates::{load_template, FETCH_ERROR_TPL, LIST_TPL, NOT_FOUND_TPL, POST_TPL};

pub mod list_renderer;
pub mod message_renderer;
pub mod post_renderer;
pub mod templates;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageStatus {
    Ok,
    NotFound,
    BadGateway,
}

/// A rendered HTML document.
#[derive(Debug, Clone, PartialEq)]
pub struct Page {
    pub status: PageStatus,
    pub title: String,
    pub body: String,
}

pub struct Views {
    pub list: ListRenderer,
    pub post: PostRenderer,
    pub message: MessageRenderer,
}

impl Views {
    pub fn load(template_dir: Option<&Path>) -> io::Result<Views> {
        Ok(Views {
            list: ListRenderer::new(load_template(template_dir, "list.tpl", LIST_TPL)?),
            post: PostRenderer::new(load_template(template_dir, "post.tpl", POST_TPL)?),
            message: MessageRenderer {
                not_found: load_template(template_dir, "not_found.tpl", NOT_FOUND_TPL)?,
                fetch_error: load_template(template_dir, "fetch_error.tpl", FETCH_ERROR_TPL)?,
            },
        })
    }

    pub fn builtin() -> io::Result<Views> {
        Self::load(None)
    }
}
