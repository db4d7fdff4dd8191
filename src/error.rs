//! Error types.

#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum Error {
    /// The body of a single write reached the configured per-entry limit.
    ///
    /// The write's buffered data has been discarded and its slot released;
    /// nothing was committed. Only the writer observes this condition.
    #[error("cache entry body exceeds the per-entry size limit")]
    EntryTooLarge,

    #[error(transparent)]
    Config(#[from] ConfigError),
}

/// Errors thrown for an invalid store configuration.
///
/// These are fatal: a store is never constructed from options that fail
/// validation.
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum ConfigError {
    /// The configured cache-tags header is not a valid header name.
    #[error("invalid cache-tags header name {name:?}")]
    InvalidTagHeader {
        name: String,
        #[source]
        err: http::header::InvalidHeaderName,
    },

    /// A single entry would be allowed to exceed the whole store's budget.
    #[error("per-entry size limit {max_entry_size} exceeds the total size limit {max_size}")]
    EntrySizeOverTotal { max_entry_size: u64, max_size: u64 },

    #[error("error reading options from {path}")]
    Io {
        path: String,
        #[source]
        err: std::io::Error,
    },

    #[error("invalid options: {0}")]
    InvalidToml(#[from] toml::de::Error),
}
