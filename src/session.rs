use std::time::Duration;

use reqwest::{Method, StatusCode};
use serde_json::Value;
use tokio::sync::{Mutex, RwLock};
use tracing::{debug, trace, warn};

use crate::protocol::{login_body, AUTH_HEADER, LOGIN_PATH};
use crate::{Error, Result};

/// Authenticated transport shared by every device of one client.
///
/// Holds the bearer token and applies the retry policy: one re-login on a
/// rejected token, one delayed retry on any other failure status, and 404
/// mapped to `None`.
pub struct Session {
    http: reqwest::Client,
    base_url: String,
    username: String,
    password: String,
    token: RwLock<String>,
    login_lock: Mutex<()>,
    retry_backoff: Duration,
}

impl Session {
    pub(crate) fn new(
        http: reqwest::Client,
        base_url: &str,
        username: String,
        password: String,
        retry_backoff: Duration,
    ) -> Self {
        let mut base_url = base_url.to_string();
        if !base_url.ends_with('/') {
            base_url.push('/');
        }
        Self {
            http,
            base_url,
            username,
            password,
            token: RwLock::new(String::new()),
            login_lock: Mutex::new(()),
            retry_backoff,
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub async fn has_token(&self) -> bool {
        !self.token.read().await.is_empty()
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path.trim_start_matches('/'))
    }

    /// Log in with the stored credentials.
    ///
    /// Returns `Ok(false)` when the cloud answers without handing out a token.
    pub async fn login(&self) -> Result<bool> {
        let _guard = self.login_lock.lock().await;
        self.login_locked().await
    }

    async fn login_locked(&self) -> Result<bool> {
        let url = self.url(LOGIN_PATH);
        debug!(url = %url, "logging in");

        let response = self
            .http
            .post(&url)
            .json(&login_body(&self.username, &self.password))
            .send()
            .await
            .map_err(Error::Connection)?;

        let status = response.status();
        if status == StatusCode::NOT_FOUND {
            return Ok(false);
        }
        if !status.is_success() {
            return Err(Error::Authentication(format!(
                "login rejected with status {}",
                status.as_u16()
            )));
        }

        let bytes = response.bytes().await.map_err(Error::Connection)?;
        if bytes.is_empty() {
            return Ok(false);
        }
        let body: Value = serde_json::from_slice(&bytes)?;
        match body.get("token").and_then(Value::as_str) {
            Some(token) => {
                *self.token.write().await = token.to_string();
                debug!("login succeeded");
                Ok(true)
            }
            None => {
                debug!("login response carried no token");
                Ok(false)
            }
        }
    }

    /// Replace a rejected token. Only one caller logs in at a time; a caller
    /// whose rejected token was already replaced while it waited skips the login.
    async fn refresh_token(&self, rejected: &str) -> Result<()> {
        let _guard = self.login_lock.lock().await;
        if self.token.read().await.as_str() != rejected {
            debug!("token already refreshed, skipping login");
            return Ok(());
        }
        if self.login_locked().await? {
            Ok(())
        } else {
            Err(Error::Authentication("login failed (password changed?)".into()))
        }
    }

    pub async fn request(
        &self,
        method: Method,
        path: &str,
        query: &[(&str, String)],
        body: Option<&Value>,
    ) -> Result<Option<Value>> {
        let url = self.url(path);
        let mut reauthenticated = false;
        let mut backed_off = false;

        loop {
            let token = self.token.read().await.clone();
            debug!(method = %method, path, "request");

            let mut request = self
                .http
                .request(method.clone(), &url)
                .header(AUTH_HEADER, token.as_str());
            if !query.is_empty() {
                request = request.query(query);
            }
            if let Some(body) = body {
                request = request.json(body);
            }

            let response = request.send().await?;
            let status = response.status();

            if status.is_success() {
                let bytes = response.bytes().await?;
                if bytes.is_empty() {
                    trace!(path, "empty response");
                    return Ok(None);
                }
                let value: Value = serde_json::from_slice(&bytes)?;
                trace!(path, body = %value, "response");
                return Ok(Some(value));
            }

            match status {
                StatusCode::UNAUTHORIZED | StatusCode::METHOD_NOT_ALLOWED => {
                    if reauthenticated {
                        return Err(Error::Authentication("invalid token".into()));
                    }
                    reauthenticated = true;
                    debug!(path, status = status.as_u16(), "token rejected");
                    self.refresh_token(&token).await?;
                }
                StatusCode::NOT_FOUND => {
                    debug!(path, "not found");
                    return Ok(None);
                }
                _ => {
                    if backed_off {
                        return Err(Error::Transport {
                            status: status.as_u16(),
                        });
                    }
                    backed_off = true;
                    warn!(
                        path,
                        status = status.as_u16(),
                        backoff = ?self.retry_backoff,
                        "request failed, retrying once"
                    );
                    tokio::time::sleep(self.retry_backoff).await;
                }
            }
        }
    }

    pub async fn get(&self, path: &str, query: &[(&str, String)]) -> Result<Option<Value>> {
        self.request(Method::GET, path, query, None).await
    }

    pub async fn post(
        &self,
        path: &str,
        query: &[(&str, String)],
        body: &Value,
    ) -> Result<Option<Value>> {
        self.request(Method::POST, path, query, Some(body)).await
    }
}

impl std::fmt::Debug for Session {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Session")
            .field("base_url", &self.base_url)
            .field("username", &self.username)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn session(base: &str) -> Session {
        Session::new(
            reqwest::Client::new(),
            base,
            "user".into(),
            "secret".into(),
            Duration::from_millis(1),
        )
    }

    #[test]
    fn base_url_gets_trailing_slash() {
        let s = session("http://localhost:1234/api/v2");
        assert_eq!(s.base_url(), "http://localhost:1234/api/v2/");
        assert_eq!(s.url("remote/plants"), "http://localhost:1234/api/v2/remote/plants");
        assert_eq!(s.url("/velis/plants"), "http://localhost:1234/api/v2/velis/plants");
    }

    #[test]
    fn debug_hides_credentials() {
        let s = session("http://localhost/");
        let out = format!("{s:?}");
        assert!(!out.contains("secret"));
    }

    #[tokio::test]
    async fn starts_without_token() {
        let s = session("http://localhost/");
        assert!(!s.has_token().await);
    }
}
