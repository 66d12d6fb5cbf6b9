use std::cell::{Cell, RefCell};
use std::sync::Arc;

use spdlog::debug;

use crate::archive_list::render_list;
use crate::asset_source::AssetSource;
use crate::content::Highlighter;
use crate::manifest::Manifest;
use crate::manifest_store::ManifestStore;
use crate::post_resolver::{PostResolver, PostState};
use crate::route::Route;
use crate::view::{Page, PageStatus, Views};

/// Maps routes to pages. Shared by every client.
pub struct Shell<S, H> {
    site_title: String,
    store: Arc<ManifestStore<S>>,
    resolver: PostResolver<S, H>,
    views: Views,
}

impl<S: AssetSource, H: Highlighter> Shell<S, H> {
    pub fn new(site_title: &str, resolver: PostResolver<S, H>, views: Views) -> Self {
        Shell {
            site_title: site_title.to_string(),
            store: resolver.store().clone(),
            resolver,
            views,
        }
    }

    pub fn store(&self) -> &Arc<ManifestStore<S>> {
        &self.store
    }

    pub async fn render_path(&self, path: &str) -> Page {
        self.render(&Route::parse(path)).await
    }

    pub async fn render(&self, route: &Route) -> Page {
        match route {
            Route::Archive => self.render_archive().await,
            Route::Post(slug) => self.render_post(route, slug).await,
            Route::NotFound => self.not_found(&route.path()),
        }
    }

    /// Drops the cached manifest and rendered posts, then fetches the manifest again.
    pub async fn refresh(&self) -> Arc<Manifest> {
        self.resolver.clear_cache();
        self.store.refresh().await
    }

    pub fn invalidate(&self) {
        self.resolver.clear_cache();
        self.store.invalidate();
    }

    async fn render_archive(&self) -> Page {
        let manifest = self.store.load().await;
        let entries = render_list(manifest.posts());
        Page {
            status: PageStatus::Ok,
            title: self.site_title.clone(),
            body: self.views.list.render(&self.site_title, &entries),
        }
    }

    async fn render_post(&self, route: &Route, slug: &str) -> Page {
        match self.resolver.run(Some(slug)).await {
            PostState::Rendered(post) => Page {
                status: PageStatus::Ok,
                title: post.meta.name.clone(),
                body: self.views.post.render(&self.site_title, &post),
            },
            PostState::FetchError { entry, .. } => Page {
                status: PageStatus::BadGateway,
                title: entry.name.clone(),
                body: self.views.message.render_fetch_error(&self.site_title, &entry.name),
            },
            PostState::NotFound => self.not_found(&route.path()),
            state => {
                debug!("Post navigation stopped in {:?}", state);
                self.not_found(&route.path())
            }
        }
    }

    fn not_found(&self, path: &str) -> Page {
        Page {
            status: PageStatus::NotFound,
            title: "Not found".to_string(),
            body: self.views.message.render_not_found(&self.site_title, path),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NavigationTicket(u64);

/// Navigation history of a single client.
///
/// Every navigation takes a ticket; a page whose ticket has been superseded
/// by a later navigation is dropped instead of displayed.
pub struct Session<'a, S, H> {
    shell: &'a Shell<S, H>,
    generation: Cell<u64>,
    displayed: RefCell<Option<Page>>,
}

impl<'a, S: AssetSource, H: Highlighter> Session<'a, S, H> {
    pub fn new(shell: &'a Shell<S, H>) -> Self {
        Session {
            shell,
            generation: Cell::new(0),
            displayed: RefCell::new(None),
        }
    }

    pub fn begin(&self) -> NavigationTicket {
        let next = self.generation.get() + 1;
        self.generation.set(next);
        NavigationTicket(next)
    }

    pub fn is_current(&self, ticket: NavigationTicket) -> bool {
        ticket.0 == self.generation.get()
    }

    pub fn complete(&self, ticket: NavigationTicket, page: Page) -> Option<Page> {
        if !self.is_current(ticket) {
            debug!("Dropping stale navigation {} (current is {})", ticket.0, self.generation.get());
            return None;
        }
        *self.displayed.borrow_mut() = Some(page.clone());
        Some(page)
    }

    pub async fn navigate(&self, path: &str) -> Option<Page> {
        let ticket = self.begin();
        let page = self.shell.render_path(path).await;
        self.complete(ticket, page)
    }

    pub fn displayed(&self) -> Option<Page> {
        self.displayed.borrow().clone()
    }
}
