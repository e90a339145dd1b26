// goform HTTP client
//
// Wraps `reqwest::Client` with the device's request dialect: fixed
// endpoints, AJAX-style headers, a cookie jar for the session, and
// JSON-object responses. Logical operations (status, wifi, sms, ...) are inherent
// methods in sibling files so this module stays about transport mechanics.

use reqwest::header;
use serde_json::{Map, Value};
use tracing::{debug, warn};
use url::Url;

use crate::error::Error;
use crate::session::Session;
use crate::transport::TransportConfig;

/// Write, login, and logout commands, keyed by `goformId`.
pub const SET_CMD_PATH: &str = "/goform/goform_set_cmd_process";
/// Read commands, keyed by a comma-joined `cmd`.
pub const GET_CMD_PATH: &str = "/goform/goform_get_cmd_process";

/// HTTP client for a MiFi router's goform control plane.
///
/// Cheap to clone: clones share the connection pool and the [`Session`].
/// Every request carries the cookies held at send time, and every response
/// may update them.
#[derive(Debug, Clone)]
pub struct GoformClient {
    http: reqwest::Client,
    base_url: Url,
    session: Session,
}

impl GoformClient {
    /// Create a client for the device at `base_url` (e.g. `http://192.168.1.1`).
    pub fn new(base_url: Url, transport: &TransportConfig) -> Result<Self, Error> {
        let session = Session::new(base_url.join(GET_CMD_PATH)?);
        let http = transport.build_client(&session)?;
        Ok(Self {
            http,
            base_url,
            session,
        })
    }

    /// The device base URL.
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// The cookie store shared with the HTTP client.
    pub fn session(&self) -> &Session {
        &self.session
    }

    // ── URL builders ─────────────────────────────────────────────────

    pub(crate) fn endpoint_url(&self, path: &str) -> Result<Url, Error> {
        Ok(self.base_url.join(path)?)
    }

    /// The device's root page, sent as `Referer` -- the firmware rejects
    /// goform calls that don't appear to come from its own UI.
    fn referer(&self) -> String {
        format!("{}/index.html", self.base_url.as_str().trim_end_matches('/'))
    }

    // ── Request helpers ──────────────────────────────────────────────

    fn apply_headers(&self, builder: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        builder
            .header(header::REFERER, self.referer())
            .header("X-Requested-With", "XMLHttpRequest")
            .header(header::CONNECTION, "keep-alive")
    }

    /// GET a read endpoint with query parameters.
    pub async fn get(&self, path: &str, query: &[(&str, &str)]) -> Result<Map<String, Value>, Error> {
        let url = self.endpoint_url(path)?;
        debug!("GET {}", url);

        let builder = self.apply_headers(self.http.get(url).query(query));
        let resp = builder.send().await.map_err(|e| {
            warn!(path, error = %e, "request failed");
            Error::Transport(e)
        })?;

        Self::parse_object(path, resp).await
    }

    /// POST a form to a write endpoint.
    pub async fn post(&self, path: &str, form: &[(&str, &str)]) -> Result<Map<String, Value>, Error> {
        let url = self.endpoint_url(path)?;
        debug!("POST {}", url);

        let builder = self.apply_headers(self.http.post(url).form(form));
        let resp = builder.send().await.map_err(|e| {
            warn!(path, error = %e, "request failed");
            Error::Transport(e)
        })?;

        Self::parse_object(path, resp).await
    }

    /// Unauthenticated reachability check against the base URL.
    ///
    /// Succeeds for any 2xx or 3xx answer without needing a session. Cookies
    /// the root page sets are kept, since some firmware issues the session
    /// id there and only authenticates it on login.
    pub async fn probe(&self) -> Result<(), Error> {
        debug!("probing {}", self.base_url);

        let resp = self
            .http
            .get(self.base_url.clone())
            .send()
            .await
            .map_err(Error::Transport)?;

        let status = resp.status();
        if status.is_success() || status.is_redirection() {
            Ok(())
        } else {
            Err(Error::Status {
                status: status.as_u16(),
                path: self.base_url.path().to_owned(),
            })
        }
    }

    /// Require a 2xx status and a JSON object body.
    async fn parse_object(path: &str, resp: reqwest::Response) -> Result<Map<String, Value>, Error> {
        let status = resp.status();
        if !status.is_success() {
            warn!(path, status = status.as_u16(), "unexpected HTTP status");
            return Err(Error::Status {
                status: status.as_u16(),
                path: path.to_owned(),
            });
        }

        let body = resp.text().await.map_err(Error::Transport)?;

        let value: Value = serde_json::from_str(&body).map_err(|e| {
            let preview: String = body.chars().take(200).collect();
            warn!(path, error = %e, "response is not JSON");
            Error::Deserialization {
                path: path.to_owned(),
                message: format!("{e} (body preview: {preview:?})"),
                body: body.clone(),
            }
        })?;

        match value {
            Value::Object(body) => Ok(body),
            other => Err(Error::Deserialization {
                path: path.to_owned(),
                message: format!("expected a JSON object, got {}", json_kind(&other)),
                body,
            }),
        }
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
