//! Cache tags: invalidation labels parsed from a response header.
//!
//! A response may carry a comma-separated list of tags in a header named at
//! store construction. Tags are parsed once, when the write is opened, and
//! indexed so that a whole group of entries can be dropped in one call
//! regardless of which routes they live under.

use std::collections::{HashMap, HashSet};

use http::{HeaderMap, HeaderName};

use crate::key::RouteKey;

/// Split the configured tag header into individual tags.
///
/// Only the first occurrence of the header is consulted; the name comparison
/// is case-insensitive (a `HeaderMap` property). Returns an empty list when
/// no header is configured, the header is missing, or its value is not
/// valid UTF-8.
pub(crate) fn parse_cache_tags(headers: &HeaderMap, tag_header: Option<&HeaderName>) -> Vec<String> {
    let Some(name) = tag_header else {
        return Vec::new();
    };
    let Some(value) = headers.get(name) else {
        return Vec::new();
    };
    let Ok(value) = value.to_str() else {
        return Vec::new();
    };
    value
        .split(',')
        .map(str::trim)
        .filter(|tag| !tag.is_empty())
        .map(str::to_owned)
        .collect()
}

/// Secondary index from tag to the routes holding entries labeled with it.
///
/// Every entry-removal path must unlink the tags the removed entry carried,
/// or this index leaks and tag deletion chases entries that are already
/// gone (which is tolerated, but wasteful).
#[derive(Debug, Default)]
pub(crate) struct TagIndex {
    routes: HashMap<String, HashSet<RouteKey>>,
}

impl TagIndex {
    /// Add `route` to each tag's set. Re-linking is a no-op.
    pub fn link(&mut self, route: &RouteKey, tags: &[String]) {
        for tag in tags {
            self.routes
                .entry(tag.clone())
                .or_default()
                .insert(route.clone());
        }
    }

    /// Remove `route` from each of `tags`, dropping a tag once its set
    /// empties. Unlinking a route that was never linked is a no-op.
    pub fn unlink<'a>(&mut self, route: &RouteKey, tags: impl IntoIterator<Item = &'a String>) {
        for tag in tags {
            if let Some(set) = self.routes.get_mut(tag) {
                set.remove(route);
                if set.is_empty() {
                    self.routes.remove(tag);
                }
            }
        }
    }

    /// The routes currently holding entries labeled `tag`.
    pub fn routes_of(&self, tag: &str) -> Option<&HashSet<RouteKey>> {
        self.routes.get(tag)
    }

    #[cfg(test)]
    pub fn is_empty(&self) -> bool {
        self.routes.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use http::{HeaderValue, Method};

    fn route(path: &str) -> RouteKey {
        RouteKey {
            origin: "https://example.com".to_owned(),
            path: path.to_owned(),
            method: Method::GET,
        }
    }

    #[test]
    fn no_configured_header_yields_no_tags() {
        let mut headers = HeaderMap::new();
        headers.insert("cache-tags", HeaderValue::from_static("a,b"));
        assert!(parse_cache_tags(&headers, None).is_empty());
    }

    #[test]
    fn splits_and_trims_comma_list() {
        let mut headers = HeaderMap::new();
        headers.insert("cache-tags", HeaderValue::from_static(" a , b ,, c "));
        let name = HeaderName::from_static("cache-tags");
        assert_eq!(parse_cache_tags(&headers, Some(&name)), ["a", "b", "c"]);
    }

    #[test]
    fn header_name_is_normalized_case_insensitively() {
        let mut headers = HeaderMap::new();
        let sent: HeaderName = "Cache-Tags".parse().unwrap();
        headers.insert(sent, HeaderValue::from_static("news"));
        let configured: HeaderName = "CACHE-TAGS".parse().unwrap();
        assert_eq!(parse_cache_tags(&headers, Some(&configured)), ["news"]);
    }

    #[test]
    fn only_the_first_occurrence_is_used() {
        let mut headers = HeaderMap::new();
        headers.append("cache-tags", HeaderValue::from_static("first"));
        headers.append("cache-tags", HeaderValue::from_static("second"));
        let name = HeaderName::from_static("cache-tags");
        assert_eq!(parse_cache_tags(&headers, Some(&name)), ["first"]);
    }

    #[test]
    fn unlink_drops_empty_tag_sets() {
        let mut index = TagIndex::default();
        let a = route("/a");
        let b = route("/b");
        index.link(&a, &["news".to_owned(), "sports".to_owned()]);
        index.link(&b, &["news".to_owned()]);
        // Linking twice adds nothing.
        index.link(&a, &["news".to_owned()]);
        assert_eq!(index.routes_of("news").unwrap().len(), 2);

        index.unlink(&a, ["news".to_owned(), "sports".to_owned()].iter());
        assert_eq!(index.routes_of("news").unwrap().len(), 1);
        assert!(index.routes_of("sports").is_none());

        // Unlinking an unknown route or tag is a no-op.
        index.unlink(&a, ["news".to_owned()].iter());
        index.unlink(&b, ["absent".to_owned()].iter());
        assert_eq!(index.routes_of("news").unwrap().len(), 1);

        index.unlink(&b, ["news".to_owned()].iter());
        assert!(index.is_empty());
    }
}
