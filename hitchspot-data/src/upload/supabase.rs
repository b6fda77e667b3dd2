//! `TableStore` over Supabase's PostgREST endpoint.

use std::time::Duration;

use reqwest::Client;
use reqwest::header::{AUTHORIZATION, CONTENT_TYPE, HeaderMap, HeaderValue};
use serde_json::Value;
use url::Url;

use super::{TableStore, UploadError};
use crate::blocking::BlockingRuntime;

const URL_VAR: &str = "SUPABASE_URL";
const SERVICE_KEY_VAR: &str = "SUPABASE_SERVICE_ROLE_KEY";
const ANON_KEY_VAR: &str = "SUPABASE_ANON_KEY";

const REQUEST_TIMEOUT: Duration = Duration::from_secs(60);

/// Project URL and API key.
#[derive(Clone, PartialEq, Eq)]
pub struct SupabaseCredentials {
    url: String,
    key: String,
}

impl std::fmt::Debug for SupabaseCredentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SupabaseCredentials")
            .field("url", &self.url)
            .field("key", &"<redacted>")
            .finish()
    }
}

impl SupabaseCredentials {
    /// Credentials from explicit values.
    #[must_use]
    pub fn new(url: impl Into<String>, key: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            key: key.into(),
        }
    }

    /// Resolve credentials through `lookup`, typically an environment read.
    ///
    /// Uses `SUPABASE_URL` and `SUPABASE_SERVICE_ROLE_KEY`, falling back to
    /// `SUPABASE_ANON_KEY`. Blank values count as missing.
    ///
    /// # Errors
    /// Returns [`UploadError::MissingCredentials`] naming the first absent
    /// variable.
    ///
    /// # Examples
    /// ```
    /// use hitchspot_data::upload::SupabaseCredentials;
    ///
    /// let credentials = SupabaseCredentials::from_lookup(|name| match name {
    ///     "SUPABASE_URL" => Some("https://demo.supabase.co".to_owned()),
    ///     "SUPABASE_ANON_KEY" => Some("anon".to_owned()),
    ///     _ => None,
    /// })?;
    /// assert_eq!(credentials.url(), "https://demo.supabase.co");
    /// # Ok::<(), hitchspot_data::upload::UploadError>(())
    /// ```
    pub fn from_lookup<F>(lookup: F) -> Result<Self, UploadError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let present = |name: &str| lookup(name).filter(|value| !value.trim().is_empty());
        let url = present(URL_VAR).ok_or(UploadError::MissingCredentials { name: URL_VAR })?;
        let key = present(SERVICE_KEY_VAR)
            .or_else(|| present(ANON_KEY_VAR))
            .ok_or(UploadError::MissingCredentials {
                name: SERVICE_KEY_VAR,
            })?;
        Ok(Self::new(url.trim(), key.trim()))
    }

    /// Resolve credentials from the process environment.
    ///
    /// # Errors
    /// See [`SupabaseCredentials::from_lookup`].
    pub fn from_env() -> Result<Self, UploadError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Project URL.
    #[must_use]
    pub fn url(&self) -> &str {
        &self.url
    }
}

/// Inserts rows with `POST {url}/rest/v1/{table}`.
pub struct SupabaseStore {
    client: Client,
    rest_root: Url,
    runtime: BlockingRuntime,
}

impl std::fmt::Debug for SupabaseStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SupabaseStore")
            .field("rest_root", &self.rest_root.as_str())
            .field("runtime", &self.runtime)
            .finish_non_exhaustive()
    }
}

impl SupabaseStore {
    /// Build a store for the given project.
    ///
    /// # Errors
    /// Returns [`UploadError::InvalidUrl`] for an unparsable project URL and
    /// [`UploadError::Client`] when the HTTP client or runtime cannot be
    /// built.
    pub fn new(credentials: &SupabaseCredentials) -> Result<Self, UploadError> {
        let rest_root = rest_root(&credentials.url)?;
        let client = Client::builder()
            .default_headers(auth_headers(&credentials.key)?)
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(|err| UploadError::Client {
                message: err.to_string(),
            })?;
        let runtime = BlockingRuntime::new().map_err(|err| UploadError::Client {
            message: err.to_string(),
        })?;
        Ok(Self {
            client,
            rest_root,
            runtime,
        })
    }

    /// Endpoint receiving inserts for `table`.
    ///
    /// # Errors
    /// Returns [`UploadError::InvalidUrl`] if `table` does not form a valid
    /// path segment.
    pub fn table_url(&self, table: &str) -> Result<Url, UploadError> {
        self.rest_root
            .join(table)
            .map_err(|source| UploadError::InvalidUrl {
                url: format!("{}{table}", self.rest_root),
                source,
            })
    }

    async fn post(&self, table: &str, rows: &[Value]) -> Result<(), UploadError> {
        let url = self.table_url(table)?;
        let request_failed = |err: reqwest::Error| UploadError::Request {
            table: table.to_owned(),
            message: err.to_string(),
        };
        let response = self
            .client
            .post(url)
            .json(rows)
            .send()
            .await
            .map_err(request_failed)?;
        let status = response.status();
        if status.is_success() {
            return Ok(());
        }
        let body = response.text().await.unwrap_or_default();
        Err(UploadError::Rejected {
            table: table.to_owned(),
            status: status.as_u16(),
            body,
        })
    }
}

impl TableStore for SupabaseStore {
    fn insert(&self, table: &str, rows: &[Value]) -> Result<(), UploadError> {
        self.runtime
            .block_on(self.post(table, rows))
            .map_err(|err| UploadError::Request {
                table: table.to_owned(),
                message: err.to_string(),
            })?
    }
}

fn rest_root(project_url: &str) -> Result<Url, UploadError> {
    let invalid = |source| UploadError::InvalidUrl {
        url: project_url.to_owned(),
        source,
    };
    let base = Url::parse(&format!("{}/", project_url.trim_end_matches('/'))).map_err(invalid)?;
    base.join("rest/v1/").map_err(invalid)
}

fn auth_headers(key: &str) -> Result<HeaderMap, UploadError> {
    let invalid = |_| UploadError::Client {
        message: "API key contains characters not allowed in a header".to_owned(),
    };
    let mut headers = HeaderMap::new();
    headers.insert("apikey", HeaderValue::from_str(key).map_err(invalid)?);
    let mut bearer = HeaderValue::from_str(&format!("Bearer {key}")).map_err(invalid)?;
    bearer.set_sensitive(true);
    headers.insert(AUTHORIZATION, bearer);
    headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
    headers.insert("Prefer", HeaderValue::from_static("return=minimal"));
    Ok(headers)
}
