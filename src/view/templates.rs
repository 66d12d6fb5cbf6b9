use std::io;
use std::io::ErrorKind;
use std::path::Path;

use ramhorns::Template;
use spdlog::info;

pub const LIST_TPL: &str = r##"<!DOCTYPE html>
<html>
<head><meta charset="utf-8"><title>{{site_title}}</title></head>
<body>
<main class="archive">
<h1>{{site_title}}</h1>
{{^has_posts}}<p class="empty">No posts yet.</p>{{/has_posts}}
<ol class="post-list">
{{#post_list}}<li><a href="/{{target}}">{{title}}</a> <span class="date">{{date}}</span>{{#has_readtime}} <span class="readtime">{{readtime}}</span>{{/has_readtime}}</li>
{{/post_list}}</ol>
</main>
</body>
</html>
"##;

pub const POST_TPL: &str = r##"<!DOCTYPE html>
<html>
<head><meta charset="utf-8"><title>{{post_title}} - {{site_title}}</title></head>
<body>
<nav><a href="/">{{site_title}}</a></nav>
<article class="post">
<p class="meta"><span class="date">{{date}}</span>{{#has_readtime}} <span class="readtime">{{readtime}}</span>{{/has_readtime}}</p>
{{{post_content}}}
</article>
</body>
</html>
"##;

pub const NOT_FOUND_TPL: &str = r##"<!DOCTYPE html>
<html>
<head><meta charset="utf-8"><title>Not found - {{site_title}}</title></head>
<body>
<nav><a href="/">{{site_title}}</a></nav>
<article class="not-found">
<h1>Post not found</h1>
<p>Sorry, there is nothing at {{path}}. It may have been moved or never existed.</p>
</article>
</body>
</html>
"##;

pub const FETCH_ERROR_TPL: &str = r##"<!DOCTYPE html>
<html>
<head><meta charset="utf-8"><title>{{post_title}} - {{site_title}}</title></head>
<body>
<nav><a href="/">{{site_title}}</a></nav>
<article class="fetch-error">
<h1>{{post_title}}</h1>
<p>This post exists but its content could not be loaded right now. Please try again later.</p>
</article>
</body>
</html>
"##;

pub fn parse_template(name: &str, src: String) -> io::Result<Template<'static>> {
    Template::new(src)
        .map_err(|e| io::Error::new(ErrorKind::InvalidInput, format!("Error parsing {} template: {}", name, e)))
}

/// Reads `file_name` from the template directory when it exists there,
/// otherwise uses the built-in source.
pub fn load_template(template_dir: Option<&Path>, file_name: &str, builtin: &str) -> io::Result<Template<'static>> {
    let src = match template_dir.map(|dir| dir.join(file_name)) {
        Some(path) if path.exists() => {
            info!("Using template {}", path.display());
            std::fs::read_to_string(&path)?
        }
        _ => builtin.to_string(),
    };
    parse_template(file_name, src)
}
