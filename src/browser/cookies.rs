//! Cookie types and the cookie-store seam.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::browser::error::BrowserError;

/// A cookie as returned by the browser's cookie API.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Cookie {
    pub name: String,
    pub value: String,
    pub path: String,
}

/// Parameters for setting a cookie, mirroring the browser API's shape.
#[derive(Debug, Clone, PartialEq)]
pub struct SetCookieParams {
    /// Origin URL the cookie is scoped to.
    pub url: String,
    pub name: String,
    pub value: String,
    pub path: String,
}

impl SetCookieParams {
    /// Cookie scoped to the given origin with the root path.
    pub fn scoped(
        url: impl Into<String>,
        name: impl Into<String>,
        value: impl Into<String>,
    ) -> Self {
        Self {
            url: url.into(),
            name: name.into(),
            value: value.into(),
            path: "/".to_string(),
        }
    }
}

/// Lookup key for reading or deleting a cookie.
#[derive(Debug, Clone, PartialEq)]
pub struct CookieTarget {
    pub url: String,
    pub name: String,
}

impl CookieTarget {
    pub fn new(url: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            name: name.into(),
        }
    }
}

/// Seam over the browser's cookie API.
#[async_trait]
pub trait CookieStore: Send + Sync {
    /// Create or overwrite a cookie.
    async fn set(&self, params: SetCookieParams) -> Result<(), BrowserError>;

    /// Read a cookie by origin and name, `None` if absent.
    async fn get(&self, target: CookieTarget) -> Result<Option<Cookie>, BrowserError>;

    /// Delete a cookie by origin and name. Deleting an absent cookie is not
    /// an error.
    async fn remove(&self, target: CookieTarget) -> Result<(), BrowserError>;
}
