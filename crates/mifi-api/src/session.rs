// Session cookie store
//
// The device authenticates by cookie. Whatever it sets -- on the root page,
// on login, or on any later goform answer -- lands in a `reqwest` cookie jar
// installed as the client's cookie provider, and goes back out on every
// request. The jar sits behind an `ArcSwap` so logout can drop every cookie
// at once while a poll tick is mid-request.

use std::fmt;
use std::sync::Arc;

use arc_swap::ArcSwap;
use reqwest::cookie::{CookieStore, Jar};
use reqwest::header::HeaderValue;
use url::Url;

/// Shared handle to the device's cookies.
///
/// Cheap to clone; every clone sees the same jar. Empty means
/// unauthenticated as far as the client is concerned -- whether the device
/// still honors a held cookie is only known by asking it
/// (see [`GoformClient::is_authenticated`](crate::GoformClient::is_authenticated)).
#[derive(Clone)]
pub struct Session {
    jar: Arc<ArcSwap<Jar>>,
    /// URL the goform requests go to; decides which cookies count as held.
    scope: Url,
}

impl Session {
    pub fn new(scope: Url) -> Self {
        Self {
            jar: Arc::new(ArcSwap::from_pointee(Jar::default())),
            scope,
        }
    }

    /// Store a cookie as if the device had sent `set_cookie` in a
    /// `Set-Cookie` header.
    pub fn set(&self, set_cookie: &str) {
        self.jar.load().add_cookie_str(set_cookie, &self.scope);
    }

    /// Drop every cookie. Idempotent.
    pub fn clear(&self) {
        self.jar.store(Arc::new(Jar::default()));
    }

    /// Whether any cookie would accompany a goform request.
    pub fn is_held(&self) -> bool {
        self.cookie_header().is_some()
    }

    /// `Cookie` header value a goform request would carry right now.
    pub fn cookie_header(&self) -> Option<String> {
        self.jar
            .load()
            .cookies(&self.scope)
            .and_then(|value| value.to_str().ok().map(str::to_owned))
    }

    /// Replace the jar with one holding exactly the `name=value` pairs of
    /// `header`, as returned by [`cookie_header`](Self::cookie_header).
    pub(crate) fn restore(&self, header: Option<&str>) {
        let jar = Jar::default();
        for pair in header
            .into_iter()
            .flat_map(|h| h.split(';'))
            .map(str::trim)
            .filter(|pair| !pair.is_empty())
        {
            jar.add_cookie_str(&format!("{pair}; Path=/"), &self.scope);
        }
        self.jar.store(Arc::new(jar));
    }
}

impl CookieStore for Session {
    fn set_cookies(&self, cookie_headers: &mut dyn Iterator<Item = &HeaderValue>, url: &Url) {
        self.jar.load().set_cookies(cookie_headers, url);
    }

    fn cookies(&self, url: &Url) -> Option<HeaderValue> {
        self.jar.load().cookies(url)
    }
}

impl fmt::Debug for Session {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Session")
            .field("scope", &self.scope.as_str())
            .field("held", &self.is_held())
            .finish()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn session() -> Session {
        Session::new(Url::parse("http://192.168.0.1/goform/goform_get_cmd_process").unwrap())
    }

    #[test]
    fn attributes_are_not_sent_back() {
        let session = session();
        session.set("PHPSESSID=abc123; path=/; HttpOnly");
        assert_eq!(session.cookie_header().as_deref(), Some("PHPSESSID=abc123"));
    }

    #[test]
    fn expired_cookie_is_not_held() {
        let session = session();
        session.set("PHPSESSID=abc123; path=/");
        session.set("PHPSESSID=; Max-Age=0; path=/");
        assert!(!session.is_held());
    }

    #[test]
    fn clones_share_the_jar() {
        let session = session();
        let other = session.clone();
        session.set("sid=42; path=/");
        assert_eq!(other.cookie_header().as_deref(), Some("sid=42"));

        other.clear();
        other.clear();
        assert!(!session.is_held());
        assert_eq!(session.cookie_header(), None);
    }

    #[test]
    fn restore_rebuilds_every_pair() {
        let session = session();
        session.set("lang=en; path=/");
        session.set("sid=42; path=/");
        let saved = session.cookie_header();

        session.set("sid=99; path=/");
        session.restore(saved.as_deref());

        let header = session.cookie_header().unwrap();
        assert!(header.contains("lang=en"), "{header}");
        assert!(header.contains("sid=42"), "{header}");
        assert!(!header.contains("sid=99"), "{header}");

        session.restore(None);
        assert!(!session.is_held());
    }

    #[test]
    fn debug_redacts_values() {
        let session = session();
        session.set("sid=secret; path=/");
        let rendered = format!("{session:?}");
        assert!(!rendered.contains("secret"));
        assert!(rendered.contains("held: true"));
    }
}
