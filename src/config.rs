//! Store construction options.
//!
//! Options carry the capacity bounds and the name of the response header
//! that holds cache tags. They can be filled in directly or parsed from
//! TOML; either way an inconsistent configuration fails before a store
//! exists.

use std::{convert::TryInto, fs, path::Path, str::FromStr};

use http::HeaderName;
use serde_derive::Deserialize;

use crate::error::ConfigError;

/// Default bound on the number of committed entries.
pub const DEFAULT_MAX_COUNT: usize = 1024;

/// Default bound on a single entry's body, in bytes (5 MiB).
pub const DEFAULT_MAX_ENTRY_SIZE: u64 = 5 * 1024 * 1024;

/// Default bound on all committed bodies together, in bytes (100 MiB).
pub const DEFAULT_MAX_SIZE: u64 = 100 * 1024 * 1024;

/// Construction options for a [`Cache`](crate::Cache).
#[derive(Debug, Clone)]
pub struct CacheOptions {
    /// Bound on the number of committed entries.
    pub max_count: usize,
    /// Bound on the body size of a single entry, in bytes. A write whose
    /// body reaches this limit is discarded rather than committed.
    pub max_entry_size: u64,
    /// Bound on the bodies of all committed entries together, in bytes.
    pub max_size: u64,
    /// Name of the response header carrying comma-separated cache tags.
    /// `None` disables tag parsing entirely.
    pub cache_tags_header: Option<HeaderName>,
}

impl Default for CacheOptions {
    fn default() -> Self {
        CacheOptions {
            max_count: DEFAULT_MAX_COUNT,
            max_entry_size: DEFAULT_MAX_ENTRY_SIZE,
            max_size: DEFAULT_MAX_SIZE,
            cache_tags_header: None,
        }
    }
}

impl CacheOptions {
    /// Read options from a TOML file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        fs::read_to_string(path.as_ref())
            .map_err(|err| ConfigError::Io {
                path: path.as_ref().display().to_string(),
                err,
            })
            .and_then(|toml| Self::from_str(&toml))
    }

    /// Parse a string of TOML data into options.
    fn from_str(toml: impl AsRef<str>) -> Result<Self, ConfigError> {
        toml::from_str::<RawCacheOptions>(toml.as_ref())
            .map_err(Into::into)
            .and_then(TryInto::try_into)
    }

    /// Check cross-field consistency. Run by every construction path.
    pub(crate) fn validate(&self) -> Result<(), ConfigError> {
        if self.max_entry_size > self.max_size {
            return Err(ConfigError::EntrySizeOverTotal {
                max_entry_size: self.max_entry_size,
                max_size: self.max_size,
            });
        }
        Ok(())
    }
}

impl FromStr for CacheOptions {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_str(s)
    }
}

/// Internal deserializer for the TOML form of [`CacheOptions`].
///
/// Unset fields fall back to the defaults; unknown fields and values of the
/// wrong type are rejected outright.
#[derive(Deserialize)]
#[serde(deny_unknown_fields)]
struct RawCacheOptions {
    #[serde(alias = "max_entries")]
    max_count: Option<usize>,
    max_entry_size: Option<u64>,
    max_size: Option<u64>,
    cache_tags_header: Option<String>,
}

impl TryFrom<RawCacheOptions> for CacheOptions {
    type Error = ConfigError;

    fn try_from(raw: RawCacheOptions) -> Result<Self, Self::Error> {
        let cache_tags_header = raw
            .cache_tags_header
            .map(|name| {
                HeaderName::try_from(name.as_str()).map_err(|err| ConfigError::InvalidTagHeader {
                    name: name.clone(),
                    err,
                })
            })
            .transpose()?;
        let options = CacheOptions {
            max_count: raw.max_count.unwrap_or(DEFAULT_MAX_COUNT),
            max_entry_size: raw.max_entry_size.unwrap_or(DEFAULT_MAX_ENTRY_SIZE),
            max_size: raw.max_size.unwrap_or(DEFAULT_MAX_SIZE),
            cache_tags_header,
        };
        options.validate()?;
        Ok(options)
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;

    #[test]
    fn defaults() {
        let options = CacheOptions::default();
        assert_eq!(options.max_count, 1024);
        assert_eq!(options.max_entry_size, 5 * 1024 * 1024);
        assert_eq!(options.max_size, 100 * 1024 * 1024);
        assert!(options.cache_tags_header.is_none());
    }

    #[test]
    fn empty_toml_is_all_defaults() {
        let options: CacheOptions = "".parse().unwrap();
        assert_eq!(options.max_count, 1024);
    }

    #[test]
    fn parses_every_field() {
        let options: CacheOptions = r#"
            max_count = 16
            max_entry_size = 1024
            max_size = 4096
            cache_tags_header = "cache-tags"
        "#
        .parse()
        .unwrap();
        assert_eq!(options.max_count, 16);
        assert_eq!(options.max_entry_size, 1024);
        assert_eq!(options.max_size, 4096);
        assert_eq!(
            options.cache_tags_header.unwrap(),
            HeaderName::from_static("cache-tags")
        );
    }

    #[test]
    fn accepts_the_max_entries_alias() {
        let options: CacheOptions = "max_entries = 7".parse().unwrap();
        assert_eq!(options.max_count, 7);
    }

    #[test]
    fn rejects_invalid_tag_header_names() {
        let err = "cache_tags_header = \"not a header\""
            .parse::<CacheOptions>()
            .unwrap_err();
        assert!(matches!(err, ConfigError::InvalidTagHeader { .. }));
    }

    #[test]
    fn rejects_values_of_the_wrong_type() {
        let err = "max_count = \"many\"".parse::<CacheOptions>().unwrap_err();
        assert!(matches!(err, ConfigError::InvalidToml(_)));
    }

    #[test]
    fn rejects_negative_bounds() {
        let err = "max_size = -1".parse::<CacheOptions>().unwrap_err();
        assert!(matches!(err, ConfigError::InvalidToml(_)));
    }

    #[test]
    fn rejects_unknown_fields() {
        let err = "max_weight = 9".parse::<CacheOptions>().unwrap_err();
        assert!(matches!(err, ConfigError::InvalidToml(_)));
    }

    #[test]
    fn rejects_per_entry_size_over_total() {
        let err = "max_entry_size = 10\nmax_size = 5"
            .parse::<CacheOptions>()
            .unwrap_err();
        assert!(matches!(err, ConfigError::EntrySizeOverTotal { .. }));
    }

    #[test]
    fn reads_options_from_a_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "max_count = 3").unwrap();
        let options = CacheOptions::from_file(file.path()).unwrap();
        assert_eq!(options.max_count, 3);
    }

    #[test]
    fn missing_file_reports_the_path() {
        let err = CacheOptions::from_file("/nonexistent/alcove.toml").unwrap_err();
        assert!(matches!(err, ConfigError::Io { .. }));
    }
}
