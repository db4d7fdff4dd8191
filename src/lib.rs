//! An in-memory store of HTTP responses, for the cache layer of an HTTP
//! client.
//!
//! The store files responses under (origin, path, method), disambiguates
//! entries on the same route by their recorded `Vary` header values, and
//! bounds its footprint by entry count, per-entry body size, and total body
//! size. Freshness is not computed here: the caller's caching policy supplies
//! `cached_at`/`stale_at`/`delete_at` timestamps and the store trusts them,
//! refusing only to serve entries past their hard expiry.
//!
//! Responses stream in through a [`StreamingBody`] returned by
//! [`Cache::begin_write`] and back out through the [`Body`] of a [`Found`].
//! Tags parsed from a configurable response header support bulk invalidation
//! via [`Cache::delete_tags`].

// When building the project in release mode:
//   (1): Promote warnings into errors.
//   (2): Deny broken documentation links.
#![cfg_attr(not(debug_assertions), deny(warnings))]
#![cfg_attr(not(debug_assertions), deny(rustdoc::broken_intra_doc_links))]

pub mod body;
pub mod config;
pub mod error;

mod key;
mod store;
mod streaming_body;
mod tags;
mod variance;

pub use {
    body::Body,
    config::CacheOptions,
    error::{ConfigError, Error},
    key::CacheKey,
    store::{Cache, Found, WriteOptions},
    streaming_body::StreamingBody,
    variance::VaryRule,
};
