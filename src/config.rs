use crate::error::{DatamuseError, Result};
use std::env;

/// Default Datamuse API root; the query string is appended at assembly time.
pub const DEFAULT_BASE_URL: &str = "https://api.datamuse.com/words";

/// Environment variable overriding the API root, e.g. for a local proxy.
pub const BASE_URL_ENV_VAR: &str = "DATAMUSE_BASE_URL";

/// Resolves the API root to query against.
///
/// # Errors
/// Returns `DatamuseError::InvalidBaseUrl` if `DATAMUSE_BASE_URL` is set but
/// does not parse as an absolute URL.
///
/// # Returns
/// * `Result<String>` - The override when set, the built-in root otherwise.
pub fn resolve_base_url() -> Result<String> {
    match env::var(BASE_URL_ENV_VAR) {
        Ok(value) => {
            url::Url::parse(&value).map_err(DatamuseError::InvalidBaseUrl)?;
            // Assembly appends "?query", so a trailing separator would double up.
            Ok(value.trim_end_matches(['?', '/']).to_string())
        }
        Err(_) => Ok(DEFAULT_BASE_URL.to_string()),
    }
}
