//! Request-header variance, per HTTP's `Vary` rules.
//!
//! A response stored with a `Vary` header only answers requests that
//! reproduce the header values of the request it was originally fetched for.
//! The caching layer resolves the `Vary` names against the original request
//! and hands the store the resulting name/value pairs; matching a later
//! request is then a straight comparison against its headers.

use std::collections::BTreeMap;

use http::{HeaderMap, HeaderName, HeaderValue};

/// The header values a request must reproduce to be served a stored
/// response.
///
/// Each named header maps to the value the original request carried, or
/// `None` if it carried none. The empty rule matches every request.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct VaryRule {
    fields: BTreeMap<HeaderName, Option<HeaderValue>>,
}

impl VaryRule {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record the value `name` must take; `None` requires the header to be
    /// absent.
    pub fn require(mut self, name: HeaderName, value: Option<HeaderValue>) -> Self {
        self.fields.insert(name, value);
        self
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// True if `headers` carries exactly the recorded value for every field.
    pub fn matches(&self, headers: &HeaderMap) -> bool {
        self.fields
            .iter()
            .all(|(name, expected)| headers.get(name) == expected.as_ref())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn headers(pairs: &[(&'static str, &'static str)]) -> HeaderMap {
        let mut map = HeaderMap::new();
        for (name, value) in pairs {
            map.append(
                HeaderName::from_static(name),
                HeaderValue::from_static(value),
            );
        }
        map
    }

    #[test]
    fn empty_rule_matches_everything() {
        let rule = VaryRule::new();
        assert!(rule.matches(&HeaderMap::new()));
        assert!(rule.matches(&headers(&[("accept-encoding", "gzip")])));
    }

    #[test]
    fn recorded_value_must_match() {
        let rule = VaryRule::new().require(
            HeaderName::from_static("accept-encoding"),
            Some(HeaderValue::from_static("gzip")),
        );
        assert!(rule.matches(&headers(&[("accept-encoding", "gzip")])));
        assert!(!rule.matches(&headers(&[("accept-encoding", "br")])));
        assert!(!rule.matches(&HeaderMap::new()));
    }

    #[test]
    fn absent_field_requires_absence() {
        let rule = VaryRule::new().require(HeaderName::from_static("accept-language"), None);
        assert!(rule.matches(&HeaderMap::new()));
        assert!(!rule.matches(&headers(&[("accept-language", "de")])));
    }

    #[test]
    fn all_fields_must_hold() {
        let rule = VaryRule::new()
            .require(
                HeaderName::from_static("accept-encoding"),
                Some(HeaderValue::from_static("gzip")),
            )
            .require(HeaderName::from_static("accept-language"), None);
        assert!(rule.matches(&headers(&[("accept-encoding", "gzip")])));
        assert!(!rule.matches(&headers(&[
            ("accept-encoding", "gzip"),
            ("accept-language", "de"),
        ])));
    }
}
