// Configuration REST API HTTP client
//
// Wraps `reqwest::Client` with the gateway's URL layout, status checking
// and JSON:API envelope unwrapping. Endpoint groups (session, configuration,
// nodes) are implemented as inherent methods in separate files to keep this
// module focused on transport mechanics.

use reqwest::StatusCode;
use reqwest::header::{ACCEPT, AUTHORIZATION, HeaderMap, HeaderValue};
use secrecy::{ExposeSecret, SecretString};
use serde::de::DeserializeOwned;
use tracing::{debug, trace};
use url::Url;

use crate::error::Error;
use crate::models::Document;
use crate::transport::TransportConfig;

/// Path of the REST API root on the management interface.
pub const REST_ROOT: &str = "airlock/rest/";

/// Raw HTTP client for one gateway's configuration REST API.
///
/// Every request carries the API key as a bearer token; the session
/// cookie handed out by [`create_session`](Self::create_session) rides
/// along in the client's cookie jar.
pub struct GatewayClient {
    http: reqwest::Client,
    base_url: Url,
}

impl GatewayClient {
    /// Build a client against an explicit REST root URL, usually from
    /// [`management_url`](Self::management_url).
    ///
    /// Does not talk to the gateway; call
    /// [`create_session`](Self::create_session) next. The URL must end
    /// with a `/` so relative endpoint paths join onto it.
    pub fn with_base_url(
        base_url: Url,
        api_key: &SecretString,
        transport: &TransportConfig,
    ) -> Result<Self, Error> {
        let mut headers = HeaderMap::new();
        let mut bearer = HeaderValue::from_str(&format!("Bearer {}", api_key.expose_secret()))
            .map_err(|e| Error::InvalidApiKey(e.to_string()))?;
        bearer.set_sensitive(true);
        headers.insert(AUTHORIZATION, bearer);
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));

        let http = transport.build_client(headers)?;
        Ok(Self { http, base_url })
    }

    /// The REST root of a gateway's management interface.
    ///
    /// Bare IPv6 addresses are bracketed.
    pub fn management_url(host: &str, port: u16) -> Result<Url, Error> {
        let host = if host.contains(':') && !host.starts_with('[') {
            format!("[{host}]")
        } else {
            host.to_owned()
        };
        let origin = Url::parse(&format!("https://{host}:{port}/"))?;
        Self::rest_url(&origin)
    }

    /// The REST root below an explicit origin (e.g. `https://gw.example:8443`).
    pub fn rest_url(origin: &Url) -> Result<Url, Error> {
        let mut origin = origin.clone();
        if !origin.path().ends_with('/') {
            let path = format!("{}/", origin.path());
            origin.set_path(&path);
        }
        Ok(origin.join(REST_ROOT)?)
    }

    /// The REST root this client talks to.
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// The underlying HTTP client.
    pub fn http(&self) -> &reqwest::Client {
        &self.http
    }

    // ── URL builder ──────────────────────────────────────────────────

    /// Join a relative endpoint path (e.g. `"session/create"`) onto the REST root.
    pub(crate) fn url(&self, path: &str) -> Result<Url, Error> {
        Ok(self.base_url.join(path.trim_start_matches('/'))?)
    }

    // ── Request helpers ──────────────────────────────────────────────

    /// Send a request and check its status against `expected`.
    pub(crate) async fn send(
        &self,
        path: &str,
        request: reqwest::RequestBuilder,
        expected: &[StatusCode],
    ) -> Result<reqwest::Response, Error> {
        let resp = request.send().await?;
        let status = resp.status();
        trace!(%status, path, "response received");

        if expected.contains(&status) {
            return Ok(resp);
        }

        let body = resp.text().await.unwrap_or_default();
        let message = body.chars().take(200).collect::<String>();

        if status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN {
            return Err(Error::Authentication {
                message: format!("HTTP {status} on {path}: {message}"),
            });
        }

        Err(Error::Api {
            status: status.as_u16(),
            path: path.to_owned(),
            message,
        })
    }

    /// `GET` a JSON:API document and unwrap its `data` member.
    pub(crate) async fn get_data<T: DeserializeOwned>(&self, path: &str) -> Result<T, Error> {
        let body = self.get_text(path).await?;
        let document: Document<T> = serde_json::from_str(&body).map_err(|e| {
            let preview = body.chars().take(200).collect::<String>();
            Error::Deserialization {
                message: format!("{e} (body preview: {preview:?})"),
                body: body.clone(),
            }
        })?;
        Ok(document.data)
    }

    /// `GET` a JSON body without unwrapping it.
    pub(crate) async fn get_json(&self, path: &str) -> Result<serde_json::Value, Error> {
        let body = self.get_text(path).await?;
        serde_json::from_str(&body).map_err(|e| Error::Deserialization {
            message: e.to_string(),
            body,
        })
    }

    async fn get_text(&self, path: &str) -> Result<String, Error> {
        let url = self.url(path)?;
        debug!("GET {url}");
        let resp = self
            .send(path, self.http.get(url), &[StatusCode::OK])
            .await?;
        Ok(resp.text().await?)
    }

    /// `POST` without a body, accepting any of `expected`.
    pub(crate) async fn post_empty(
        &self,
        path: &str,
        expected: &[StatusCode],
    ) -> Result<reqwest::Response, Error> {
        let url = self.url(path)?;
        debug!("POST {url}");
        self.send(path, self.http.post(url), expected).await
    }
}
