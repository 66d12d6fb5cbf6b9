/// Client routes of the archive.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Route {
    Archive,
    /// `/a/<slug>`; the slug is validated later by the resolver.
    Post(String),
    NotFound,
}

impl Route {
    pub fn parse(path: &str) -> Route {
        let path = path.split(['?', '#']).next().unwrap_or_default();
        let trimmed = path.strip_suffix('/').unwrap_or(path);

        if trimmed.is_empty() {
            return Route::Archive;
        }

        let Some(rest) = trimmed.strip_prefix("/a/") else {
            return Route::NotFound;
        };
        if rest.is_empty() || rest.contains('/') {
            return Route::NotFound;
        }
        Route::Post(rest.to_string())
    }

    pub fn path(&self) -> String {
        match self {
            Route::Archive => "/".to_string(),
            Route::Post(slug) => format!("/a/{}", slug),
            Route::NotFound => "/404".to_string(),
        }
    }
}
