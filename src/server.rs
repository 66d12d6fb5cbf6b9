use std::io;
use std::sync::Arc;

use ntex::web;
use ntex::web::HttpRequest;
use spdlog::info;

use crate::asset_source::DirSource;
use crate::config::Config;
use crate::content::{MarkdownRenderer, NoHighlighter};
use crate::content_cache::{ContentCache, Expire};
use crate::manifest_store::ManifestStore;
use crate::navigation::Shell;
use crate::post_resolver::PostResolver;
use crate::route::Route;
use crate::view::{Page, PageStatus, Views};

pub type SiteShell = Shell<DirSource, NoHighlighter>;

pub struct AppState {
    pub shell: SiteShell,
}

/// Wires the content directory, caches and templates named in the config.
pub fn build_shell(config: &Config) -> io::Result<SiteShell> {
    let source = DirSource::new(&config.paths.content_dir);
    let store = Arc::new(ManifestStore::new(source, &config.paths.manifest_file));

    let cache = if config.defaults.rendering_cache_enabled {
        ContentCache::new(Expire::from_secs(config.defaults.cache_ttl_secs))
    } else {
        ContentCache::non_caching()
    };
    let resolver = PostResolver::new(store, MarkdownRenderer::new(), &config.paths.posts_dir)
        .with_cache(cache);

    let views = Views::load(config.paths.template_dir.as_deref())?;
    Ok(Shell::new(&config.defaults.site_title, resolver, views))
}

fn page_response(page: Page) -> web::HttpResponse {
    let mut builder = match page.status {
        PageStatus::Ok => web::HttpResponse::Ok(),
        PageStatus::NotFound => web::HttpResponse::NotFound(),
        PageStatus::BadGateway => web::HttpResponse::BadGateway(),
    };
    builder
        .content_type("text/html; charset=utf-8")
        .body(page.body)
}

#[web::get("/")]
async fn index(state: web::types::State<Arc<AppState>>) -> web::HttpResponse {
    page_response(state.shell.render(&Route::Archive).await)
}

#[web::get("/a/{post}")]
async fn view(post: web::types::Path<String>, state: web::types::State<Arc<AppState>>) -> web::HttpResponse {
    page_response(state.shell.render(&Route::Post(post.into_inner())).await)
}

#[web::get("/a/{post}/")]
async fn view_with_slash(post: web::types::Path<String>, state: web::types::State<Arc<AppState>>) -> web::HttpResponse {
    page_response(state.shell.render(&Route::Post(post.into_inner())).await)
}

#[web::post("/manifest/refresh")]
async fn refresh(state: web::types::State<Arc<AppState>>) -> web::HttpResponse {
    let manifest = state.shell.refresh().await;
    info!("Manifest refreshed with {} posts", manifest.len());
    web::HttpResponse::Ok()
        .content_type("text/plain; charset=utf-8")
        .body(format!("{}", manifest.len()))
}

async fn not_found(req: HttpRequest, state: web::types::State<Arc<AppState>>) -> web::HttpResponse {
    page_response(state.shell.render_path(req.path()).await)
}

pub fn routes(cfg: &mut web::ServiceConfig) {
    cfg.service(index)
        .service(view)
        .service(view_with_slash)
        .service(refresh);
}

pub async fn server_run(config: Config) -> io::Result<()> {
    let shell = build_shell(&config)?;
    let manifest = shell.store().load().await;
    for post in manifest.posts() {
        info!("Post: {} -> {}", post.link, post.file);
    }

    let bind_addr = config.server.address.clone();
    let bind_port = config.server.port;
    let app_state = Arc::new(AppState { shell });

    web::HttpServer::new(move || {
        web::App::new()
            .state(app_state.clone())
            .configure(routes)
            .default_service(web::route().to(not_found))
    })
        .bind((bind_addr, bind_port))?
        .run()
        .await
}

#[cfg(test)]
mod tests {
    use std::fs;
    use std::path::Path;

    use ntex::http::StatusCode;
    use ntex::web::test;

    use crate::config::parse_config;
    use crate::test_data::MANIFEST_JSON;

    use super::*;

    fn write_site(root: &Path) {
        fs::create_dir(root.join("posts")).unwrap();
        fs::write(root.join("posts.json"), MANIFEST_JSON).unwrap();
        fs::write(root.join("posts").join("a.md"), "# Title\n## Section").unwrap();
    }

    fn config_for(root: &Path) -> Config {
        let mut config = parse_config(r#"
[paths]
content_dir = "."

[defaults]
site_title = "Test Blog"
rendering_cache_enabled = true

[server]
address = "127.0.0.1"
port = 0
"#).unwrap();
        config.paths.content_dir = root.to_path_buf();
        config
    }

    #[ntex::test]
    async fn test_routes() {
        let dir = tempfile::tempdir().unwrap();
        write_site(dir.path());
        let state = Arc::new(AppState { shell: build_shell(&config_for(dir.path())).unwrap() });

        let app = test::init_service(
            web::App::new()
                .state(state)
                .configure(routes)
                .default_service(web::route().to(not_found))
        ).await;

        let resp = test::call_service(&app, test::TestRequest::with_uri("/").to_request()).await;
        assert_eq!(resp.status(), StatusCode::OK);
        let body = test::read_body(resp).await;
        let body = String::from_utf8_lossy(&body);
        assert!(body.contains("Test Blog"));
        assert!(body.contains(r#"href="/a/post-a""#));

        for uri in ["/a/post-a", "/a/post-a/"] {
            let resp = test::call_service(&app, test::TestRequest::with_uri(uri).to_request()).await;
            assert_eq!(resp.status(), StatusCode::OK);
            let body = test::read_body(resp).await;
            assert!(String::from_utf8_lossy(&body).contains(r##"href="#a/post-a/section""##));
        }

        let resp = test::call_service(&app, test::TestRequest::with_uri("/a/missing").to_request()).await;
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);

        let resp = test::call_service(&app, test::TestRequest::with_uri("/a/b").to_request()).await;
        assert_eq!(resp.status(), StatusCode::BAD_GATEWAY);

        let resp = test::call_service(&app, test::TestRequest::with_uri("/somewhere/else").to_request()).await;
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);
        let body = test::read_body(resp).await;
        assert!(String::from_utf8_lossy(&body).contains("Post not found"));
    }

    #[ntex::test]
    async fn test_refresh() {
        let dir = tempfile::tempdir().unwrap();
        write_site(dir.path());
        let state = Arc::new(AppState { shell: build_shell(&config_for(dir.path())).unwrap() });
        let app = test::init_service(web::App::new().state(state).configure(routes)).await;

        let resp = test::call_service(&app, test::TestRequest::with_uri("/").to_request()).await;
        assert_eq!(resp.status(), StatusCode::OK);

        fs::write(dir.path().join("posts.json"), "[]").unwrap();
        let req = test::TestRequest::with_uri("/manifest/refresh").method(ntex::http::Method::POST).to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::OK);
        let body = test::read_body(resp).await;
        assert_eq!(&body[..], b"0");
    }
}
