use std::fmt::{Display, Formatter};
use std::sync::Arc;

use spdlog::{debug, error, info};

use crate::asset_source::AssetSource;
use crate::content::{Highlighter, MarkdownRenderer};
use crate::content_cache::ContentCache;
use crate::error::SlugError;
use crate::manifest::{Manifest, PostMetadata};
use crate::manifest_store::ManifestStore;

/// A route parameter that is safe to use as a post identifier.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct PostSlug(String);

impl PostSlug {
    pub fn parse(raw: &str) -> Result<Self, SlugError> {
        if raw.is_empty() {
            return Err(SlugError::Empty);
        }
        let allowed = |c: char| c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.' | '~');
        if !raw.chars().all(allowed) || raw.contains("..") {
            return Err(SlugError::Malformed(raw.to_string()));
        }
        Ok(PostSlug(raw.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Name of the markdown asset the slug refers to.
    pub fn file_name(&self) -> String {
        format!("{}.md", self.0)
    }
}

impl Display for PostSlug {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Finds the manifest entry for a slug: by `file == "<slug>.md"` first,
/// then by `link == slug`.
pub fn resolve_entry<'a>(manifest: &'a Manifest, slug: &PostSlug) -> Option<&'a PostMetadata> {
    manifest.by_file(&slug.file_name())
        .or_else(|| manifest.by_link(slug.as_str()))
}

#[derive(Debug, Clone, PartialEq)]
pub struct RenderedPost {
    pub meta: PostMetadata,
    pub scope_path: String,
    pub html: String,
}

/// Progress of one navigation to a post route.
#[derive(Debug, Clone, PartialEq)]
pub enum PostState {
    Idle,
    Validating(PostSlug),
    NotFound,
    Fetching {
        slug: PostSlug,
        entry: PostMetadata,
    },
    Rendered(Arc<RenderedPost>),
    FetchError {
        slug: PostSlug,
        entry: PostMetadata,
        reason: String,
    },
}

impl PostState {
    pub fn is_terminal(&self) -> bool {
        matches!(self, PostState::NotFound | PostState::Rendered(_) | PostState::FetchError { .. })
    }
}

pub struct PostResolver<S, H> {
    store: Arc<ManifestStore<S>>,
    renderer: MarkdownRenderer<H>,
    posts_dir: String,
    cache: ContentCache<RenderedPost>,
}

impl<S: AssetSource, H: Highlighter> PostResolver<S, H> {
    pub fn new(store: Arc<ManifestStore<S>>, renderer: MarkdownRenderer<H>, posts_dir: &str) -> Self {
        PostResolver {
            store,
            renderer,
            posts_dir: posts_dir.trim_end_matches('/').to_string(),
            cache: ContentCache::non_caching(),
        }
    }

    pub fn with_cache(mut self, cache: ContentCache<RenderedPost>) -> Self {
        self.cache = cache;
        self
    }

    pub fn store(&self) -> &Arc<ManifestStore<S>> {
        &self.store
    }

    pub fn clear_cache(&self) {
        self.cache.clear();
    }

    fn asset_path(&self, entry: &PostMetadata) -> String {
        if self.posts_dir.is_empty() {
            entry.file.clone()
        } else {
            format!("{}/{}", self.posts_dir, entry.file)
        }
    }

    /// Leaves [`PostState::Idle`] once the route parameter is known.
    pub fn accept(&self, param: Option<&str>) -> PostState {
        let Some(param) = param else {
            info!("Post route without a slug");
            return PostState::NotFound;
        };

        match PostSlug::parse(param) {
            Ok(slug) => PostState::Validating(slug),
            Err(e) => {
                info!("Rejecting post route: {}", e);
                PostState::NotFound
            }
        }
    }

    /// Performs a single transition. Terminal states are returned unchanged.
    pub async fn step(&self, state: PostState) -> PostState {
        match state {
            PostState::Validating(slug) => self.validate(slug).await,
            PostState::Fetching { slug, entry } => self.fetch(slug, entry).await,
            other => other,
        }
    }

    /// Drives a navigation from the route parameter to a terminal state.
    pub async fn run(&self, param: Option<&str>) -> PostState {
        let mut state = self.accept(param);
        while !state.is_terminal() {
            state = self.step(state).await;
        }
        state
    }

    async fn validate(&self, slug: PostSlug) -> PostState {
        let manifest = self.store.load().await;
        let Some(entry) = resolve_entry(&manifest, &slug) else {
            info!("No post found for {}", slug);
            return PostState::NotFound;
        };

        if let Some(rendered) = self.cache.get(slug.as_str()) {
            debug!("Using cached render of {}", slug);
            return PostState::Rendered(rendered);
        }

        PostState::Fetching {
            slug,
            entry: entry.clone(),
        }
    }

    async fn fetch(&self, slug: PostSlug, entry: PostMetadata) -> PostState {
        let path = self.asset_path(&entry);
        match self.store.source().fetch_text(&path).await {
            Ok(md_text) => {
                let html = self.renderer.render(&md_text, slug.as_str());
                let rendered = self.cache.add(slug.as_str(), RenderedPost {
                    meta: entry,
                    scope_path: slug.as_str().to_string(),
                    html,
                });
                PostState::Rendered(rendered)
            }
            Err(e) => {
                error!("Error fetching post {} from {}: {}", slug, path, e);
                PostState::FetchError {
                    slug,
                    entry,
                    reason: e.to_string(),
                }
            }
        }
    }
}
