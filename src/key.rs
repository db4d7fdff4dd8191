//! Cache keys: the request identity a stored response is filed under.

use http::{HeaderMap, Method};

/// The request descriptor used to query and populate the cache.
///
/// `origin`, `path`, and `method` position an entry in the index. `headers`
/// never does: it is consulted only when a stored response's vary rule needs
/// the request's header values.
#[derive(Debug, Clone)]
pub struct CacheKey {
    pub origin: String,
    pub path: String,
    pub method: Method,
    pub headers: HeaderMap,
}

impl CacheKey {
    pub fn new(origin: impl Into<String>, path: impl Into<String>, method: Method) -> Self {
        CacheKey {
            origin: origin.into(),
            path: path.into(),
            method,
            headers: HeaderMap::new(),
        }
    }

    /// Attach the request headers consulted during vary matching.
    pub fn with_headers(mut self, headers: HeaderMap) -> Self {
        self.headers = headers;
        self
    }

    pub(crate) fn route(&self) -> RouteKey {
        RouteKey {
            origin: self.origin.clone(),
            path: self.path.clone(),
            method: self.method.clone(),
        }
    }
}

/// The (origin, path, method) identity of one entry list; also the member
/// type of the tag index.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub(crate) struct RouteKey {
    pub origin: String,
    pub path: String,
    pub method: Method,
}
