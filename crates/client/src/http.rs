//! # HTTP Core
//!
//! Every request goes through [`ApiClient::execute`]: bearer header, GET
//! cache, one refresh-and-retry on 401, error normalization.

use crate::cache::ResponseCache;
use crate::error::{ApiError, ClientError, ClientResult};
use crate::session::SessionContext;
use ancla_config::{AnclaConfig, ApiConfig};
use reqwest::{Method, StatusCode};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info, warn};
use url::Url;

pub const REFRESH_PATH: &str = "/api/auth/refresh";

/// Auth endpoints whose 401 means bad input, not an expired token.
const NO_RETRY_PATHS: &[&str] = &[
    "/api/auth/login",
    "/api/auth/register",
    REFRESH_PATH,
    "/api/auth/forgot-password",
    "/api/auth/reset-password",
];

/// File part of a multipart upload. Kept as bytes so a retried request can
/// rebuild the form.
#[derive(Debug, Clone)]
pub struct Upload {
    pub field: String,
    pub file_name: String,
    pub mime: String,
    pub bytes: Vec<u8>,
    pub fields: Vec<(String, String)>,
}

impl Upload {
    fn to_form(&self) -> ClientResult<reqwest::multipart::Form> {
        let part = reqwest::multipart::Part::bytes(self.bytes.clone())
            .file_name(self.file_name.clone())
            .mime_str(&self.mime)?;
        let mut form = reqwest::multipart::Form::new().part(self.field.clone(), part);
        for (name, value) in &self.fields {
            form = form.text(name.clone(), value.clone());
        }
        Ok(form)
    }
}

#[derive(Debug, Clone)]
enum Body {
    Empty,
    Json(Value),
    Multipart(Upload),
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RefreshResponse {
    access_token: String,
    #[serde(default)]
    refresh_token: Option<String>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct RefreshRequest<'a> {
    refresh_token: &'a str,
}

/// REST client bound to one session.
pub struct ApiClient {
    base_url: Url,
    http: reqwest::Client,
    session: Arc<SessionContext>,
    cache: ResponseCache,
    page_size: u32,
}

impl std::fmt::Debug for ApiClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ApiClient")
            .field("base_url", &self.base_url.as_str())
            .field("session", &self.session)
            .finish_non_exhaustive()
    }
}

impl ApiClient {
    pub fn new(config: &ApiConfig, session: Arc<SessionContext>) -> ClientResult<Self> {
        let base_url = Url::parse(&config.base_url)?;
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .user_agent(concat!("ancla/", env!("CARGO_PKG_VERSION")))
            .build()?;
        Ok(Self {
            base_url,
            http,
            session,
            cache: ResponseCache::new(Duration::from_secs(config.cache_ttl_secs)),
            page_size: config.page_size,
        })
    }

    pub fn from_config(config: &AnclaConfig, session: Arc<SessionContext>) -> ClientResult<Self> {
        Self::new(&config.api, session)
    }

    pub fn session(&self) -> &Arc<SessionContext> {
        &self.session
    }

    pub fn cache(&self) -> &ResponseCache {
        &self.cache
    }

    /// Default rows per page for list calls
    pub fn page_size(&self) -> u32 {
        self.page_size
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    fn url(&self, path: &str, query: &[(String, String)]) -> ClientResult<Url> {
        let mut url = self.base_url.join(path)?;
        if !query.is_empty() {
            url.query_pairs_mut()
                .extend_pairs(query.iter().map(|(k, v)| (k.as_str(), v.as_str())));
        }
        Ok(url)
    }

    // === Typed helpers ===

    pub async fn get<T: DeserializeOwned>(&self, path: &str) -> ClientResult<T> {
        self.get_with(path, &()).await
    }

    /// GET with a query built from any serializable filter struct.
    pub async fn get_with<T, Q>(&self, path: &str, query: &Q) -> ClientResult<T>
    where
        T: DeserializeOwned,
        Q: Serialize + ?Sized,
    {
        let pairs = query_pairs(query)?;
        let value = self.execute(Method::GET, path, &pairs, Body::Empty).await?;
        Ok(serde_json::from_value(value)?)
    }

    pub async fn post<T, B>(&self, path: &str, body: &B) -> ClientResult<T>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        let body = Body::Json(serde_json::to_value(body)?);
        let value = self.execute(Method::POST, path, &[], body).await?;
        Ok(serde_json::from_value(value)?)
    }

    /// POST without a body, for action endpoints such as `/submit`.
    pub async fn post_empty<T: DeserializeOwned>(&self, path: &str) -> ClientResult<T> {
        let value = self.execute(Method::POST, path, &[], Body::Empty).await?;
        Ok(serde_json::from_value(value)?)
    }

    pub async fn put<T, B>(&self, path: &str, body: &B) -> ClientResult<T>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        let body = Body::Json(serde_json::to_value(body)?);
        let value = self.execute(Method::PUT, path, &[], body).await?;
        Ok(serde_json::from_value(value)?)
    }

    /// DELETE; whatever body comes back is ignored.
    pub async fn delete(&self, path: &str) -> ClientResult<()> {
        self.execute(Method::DELETE, path, &[], Body::Empty).await?;
        Ok(())
    }

    pub async fn upload<T: DeserializeOwned>(&self, path: &str, upload: Upload) -> ClientResult<T> {
        let value = self
            .execute(Method::POST, path, &[], Body::Multipart(upload))
            .await?;
        Ok(serde_json::from_value(value)?)
    }

    /// Exchange the refresh token now, outside of any failing request.
    pub async fn refresh(&self) -> ClientResult<()> {
        let current = self.session.access_token();
        self.refresh_after_unauthorized(current.as_deref()).await?;
        Ok(())
    }

    // === Core ===

    async fn execute(
        &self,
        method: Method,
        path: &str,
        query: &[(String, String)],
        body: Body,
    ) -> ClientResult<Value> {
        let cacheable = method == Method::GET && !path.starts_with("/api/auth/");
        let cache_key = ResponseCache::key(path, query);
        if cacheable {
            if let Some(hit) = self.cache.get(&cache_key) {
                return Ok(hit);
            }
        }

        let generation = self.cache.generation(path);
        let url = self.url(path, query)?;
        let token = self.session.access_token();
        let mut response = self.send(&method, &url, token.as_deref(), &body).await?;

        if response.status() == StatusCode::UNAUTHORIZED && !NO_RETRY_PATHS.contains(&path) {
            let fresh = self.refresh_after_unauthorized(token.as_deref()).await?;
            debug!(%method, path, "Retrying after token refresh");
            response = self.send(&method, &url, Some(&fresh), &body).await?;
        }

        let value = read_response(response).await?;

        if cacheable {
            self.cache.insert(cache_key, value.clone(), generation);
        } else if method != Method::GET {
            self.cache.invalidate_collection(path);
        }
        Ok(value)
    }

    async fn send(
        &self,
        method: &Method,
        url: &Url,
        token: Option<&str>,
        body: &Body,
    ) -> ClientResult<reqwest::Response> {
        let mut request = self.http.request(method.clone(), url.clone());
        if let Some(token) = token {
            request = request.bearer_auth(token);
        }
        request = match body {
            Body::Empty => request,
            Body::Json(value) => request.json(value),
            Body::Multipart(upload) => request.multipart(upload.to_form()?),
        };

        let response = request.send().await?;
        debug!(%method, path = url.path(), status = response.status().as_u16(), "API request");
        Ok(response)
    }

    /// Single-flight refresh.
    ///
    /// `failed_token` is the token the caller's request was sent with. If the
    /// session already holds a different one, another request refreshed while
    /// this one waited for the lock, and the new token is returned as is.
    async fn refresh_after_unauthorized(&self, failed_token: Option<&str>) -> ClientResult<String> {
        let _in_flight = self.session.refresh_lock().lock().await;

        if let Some(current) = self.session.access_token() {
            if Some(current.as_str()) != failed_token {
                return Ok(current);
            }
        }

        let Some(refresh_token) = self.session.refresh_token() else {
            self.session.expire();
            return Err(ClientError::SessionExpired);
        };

        match self.exchange_refresh_token(&refresh_token).await {
            Ok(tokens) => {
                self.session
                    .update_tokens(tokens.access_token.clone(), tokens.refresh_token)?;
                info!("Access token refreshed");
                Ok(tokens.access_token)
            }
            Err(e) => {
                warn!(error = %e, "Token refresh failed, clearing session");
                self.session.expire();
                self.cache.clear();
                Err(ClientError::SessionExpired)
            }
        }
    }

    async fn exchange_refresh_token(&self, refresh_token: &str) -> ClientResult<RefreshResponse> {
        let url = self.url(REFRESH_PATH, &[])?;
        let response = self
            .http
            .post(url)
            .json(&RefreshRequest { refresh_token })
            .send()
            .await?;
        let value = read_response(response).await?;
        Ok(serde_json::from_value(value)?)
    }
}

async fn read_response(response: reqwest::Response) -> ClientResult<Value> {
    let status = response.status();
    let bytes = response.bytes().await?;
    if !status.is_success() {
        return Err(ApiError::from_body(status.as_u16(), &bytes).into());
    }
    if bytes.iter().all(u8::is_ascii_whitespace) {
        return Ok(Value::Null);
    }
    Ok(serde_json::from_slice(&bytes)?)
}

/// Flatten a filter struct into query pairs; nulls are skipped, arrays repeat the key.
pub fn query_pairs<Q: Serialize + ?Sized>(query: &Q) -> ClientResult<Vec<(String, String)>> {
    let value = serde_json::to_value(query)?;
    let Value::Object(map) = value else {
        return Ok(Vec::new());
    };
    let mut pairs = Vec::with_capacity(map.len());
    for (key, value) in map {
        match value {
            Value::Null => {}
            Value::Array(items) => {
                for item in items {
                    if let Some(text) = scalar(item) {
                        pairs.push((key.clone(), text));
                    }
                }
            }
            other => {
                if let Some(text) = scalar(other) {
                    pairs.push((key, text));
                }
            }
        }
    }
    Ok(pairs)
}

fn scalar(value: Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ancla_core::{LoanFilters, LoanStatus};

    #[test]
    fn test_query_pairs_from_filters() {
        let filters = LoanFilters {
            status: Some(LoanStatus::UnderReview),
            page: Some(3),
            ..Default::default()
        };
        let mut pairs = query_pairs(&filters).unwrap();
        pairs.sort();
        assert_eq!(
            pairs,
            vec![
                ("page".to_string(), "3".to_string()),
                ("status".to_string(), "UnderReview".to_string()),
            ]
        );
        assert!(query_pairs(&()).unwrap().is_empty());
    }

    #[test]
    fn test_url_join() {
        let session = Arc::new(SessionContext::in_memory());
        let client = ApiClient::new(&ApiConfig::default(), session).unwrap();
        let url = client
            .url("/api/loans", &[("page".into(), "2".into())])
            .unwrap();
        assert_eq!(url.as_str(), "http://localhost:5000/api/loans?page=2");
    }
}
