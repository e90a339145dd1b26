// Session authentication
//
// Login posts the base64 password (the web UI's own encoding, not a
// security measure) and classifies the device's numeric result code. The
// cookie jar picks up whatever the login response sets; a rejected login
// rolls the jar back to what it held before.

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use secrecy::{ExposeSecret, SecretString};
use tracing::{debug, info, warn};

use crate::error::Error;
use crate::goform::client::{GoformClient, SET_CMD_PATH};
use crate::goform::decode::Fields;

impl GoformClient {
    /// Authenticate with the device.
    ///
    /// Result codes `0` and `4` succeed. `1`, `2`, and `3` map to
    /// [`Error::LoginFailed`], [`Error::DuplicateSession`], and
    /// [`Error::BadCredentials`]; any other code is
    /// [`Error::LoginRejected`]. A failed login leaves the cookies held
    /// before it untouched.
    ///
    /// `username` is accepted for symmetry with the device UI; this
    /// firmware authenticates on the password alone.
    pub async fn login(&self, username: &str, password: &SecretString) -> Result<(), Error> {
        debug!(username, "logging in");

        let before = self.session().cookie_header();
        if let Err(e) = self.submit_login(password).await {
            if self.session().cookie_header() != before {
                debug!("rolling back cookies set by the failed login");
                self.session().restore(before.as_deref());
            }
            return Err(e);
        }

        if !self.session().is_held() {
            debug!("no session cookie held after login");
        }
        info!("login successful");
        Ok(())
    }

    async fn submit_login(&self, password: &SecretString) -> Result<(), Error> {
        let encoded = STANDARD.encode(password.expose_secret().as_bytes());
        let form = [
            ("isTest", "false"),
            ("goformId", "LOGIN"),
            ("password", encoded.as_str()),
        ];

        let body = self.post(SET_CMD_PATH, &form).await?;
        let code = Fields::new(&body)
            .opt_text("result")
            .ok_or(Error::ProtocolFormat { field: "result" })?;

        classify_login_code(&code)
    }

    /// End the session.
    ///
    /// Best effort and infallible: the held token is cleared whether or not
    /// the device answers, since it may already have expired the session
    /// itself. A failed request is logged and otherwise ignored, so calling
    /// this twice is always safe.
    pub async fn logout(&self) {
        debug!("logging out");

        let outcome = self.post(SET_CMD_PATH, &[("goformId", "LOGOUT")]).await;
        self.session().clear();

        match outcome {
            Ok(_) => debug!("logout complete"),
            Err(e) => warn!(error = %e, "logout request failed; local session cleared anyway"),
        }
    }

    /// Whether the device still honors this client's session.
    ///
    /// Not a cached flag: this performs a full status fetch and reports
    /// whether it succeeded, because the device expires sessions on its own
    /// schedule. Callers needing a cheap check must debounce it themselves.
    pub async fn is_authenticated(&self) -> bool {
        match self.device_status().await {
            Ok(_) => true,
            Err(e) => {
                debug!(error = %e, "authentication check failed");
                false
            }
        }
    }
}

/// Map a login `result` code to success or its classified error.
pub fn classify_login_code(code: &str) -> Result<(), Error> {
    match code {
        "0" | "4" => Ok(()),
        "1" => Err(Error::LoginFailed),
        "2" => Err(Error::DuplicateSession),
        "3" => Err(Error::BadCredentials),
        other => Err(Error::LoginRejected {
            code: other.to_owned(),
        }),
    }
}
