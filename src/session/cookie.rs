//! The `token` cookie contract.

use chrono::{DateTime, Utc};
pub use cookie::SameSite;
use cookie::time::OffsetDateTime;
use cookie::{Cookie, CookieBuilder};

pub const SESSION_COOKIE_NAME: &str = "token";

#[derive(Debug, Clone)]
pub struct CookieConfig {
    pub name: String,
    pub path: String,
    pub secure: bool,
    pub same_site: SameSite,
    /// `None` scopes the cookie to the serving host.
    pub domain: Option<String>,
}

impl Default for CookieConfig {
    fn default() -> Self {
        Self {
            name: SESSION_COOKIE_NAME.to_owned(),
            path: "/".to_owned(),
            secure: false,
            same_site: SameSite::Lax,
            domain: None,
        }
    }
}

impl CookieConfig {
    /// Same as the default with the `Secure` flag set.
    pub fn production() -> Self {
        Self {
            secure: true,
            ..Self::default()
        }
    }

    /// Cookie carrying a freshly issued token, expiring with it.
    pub fn session_cookie(&self, token: &str, expires_at: DateTime<Utc>) -> Cookie<'static> {
        let expires = OffsetDateTime::from_unix_timestamp(expires_at.timestamp())
            .unwrap_or_else(|_| {
                log::warn!(
                    target: "portfolio_auth",
                    "msg=\"token expiry out of cookie range\" exp={}",
                    expires_at.timestamp()
                );
                OffsetDateTime::now_utc()
            });

        self.builder(token.to_owned()).expires(expires).build()
    }

    /// Empty cookie expired at the Unix epoch, sent on logout.
    pub fn clearing_cookie(&self) -> Cookie<'static> {
        self.builder(String::new())
            .expires(OffsetDateTime::UNIX_EPOCH)
            .build()
    }

    /// Finds this cookie's value in a raw `Cookie` request header.
    pub fn extract_token(&self, header: &str) -> Option<String> {
        extract_named(header, &self.name)
    }

    fn builder(&self, value: String) -> CookieBuilder<'static> {
        let mut builder = Cookie::build((self.name.clone(), value))
            .path(self.path.clone())
            .http_only(true)
            .secure(self.secure)
            .same_site(self.same_site);
        if let Some(ref domain) = self.domain {
            builder = builder.domain(domain.clone());
        }
        builder
    }
}

/// Finds the `token` cookie in a raw `Cookie` request header.
///
/// Empty values are treated as absent.
pub fn extract_token(header: &str) -> Option<String> {
    extract_named(header, SESSION_COOKIE_NAME)
}

fn extract_named(header: &str, name: &str) -> Option<String> {
    Cookie::split_parse(header)
        .filter_map(Result::ok)
        .find(|c| c.name() == name)
        .map(|c| c.value().to_owned())
        .filter(|v| !v.is_empty())
}

#[cfg(test)]
mod tests {
    use chrono::Duration;

    use super::*;

    #[test]
    fn test_session_cookie_attributes() {
        let config = CookieConfig::default();
        let expires_at = Utc::now() + Duration::days(7);
        let cookie = config.session_cookie("abc.def.ghi", expires_at);

        assert_eq!(cookie.name(), "token");
        assert_eq!(cookie.value(), "abc.def.ghi");
        assert_eq!(cookie.http_only(), Some(true));
        assert_eq!(cookie.path(), Some("/"));
        assert_eq!(cookie.same_site(), Some(SameSite::Lax));
        assert_eq!(
            cookie.expires_datetime().map(|t| t.unix_timestamp()),
            Some(expires_at.timestamp())
        );

        let header = cookie.to_string();
        assert!(header.contains("HttpOnly"));
        assert!(!header.contains("Secure"));
    }

    #[test]
    fn test_production_sets_secure() {
        let cookie = CookieConfig::production().session_cookie("t", Utc::now());
        assert_eq!(cookie.secure(), Some(true));
    }

    #[test]
    fn test_clearing_cookie() {
        let cookie = CookieConfig::default().clearing_cookie();

        assert_eq!(cookie.name(), "token");
        assert_eq!(cookie.value(), "");
        assert_eq!(cookie.expires_datetime(), Some(OffsetDateTime::UNIX_EPOCH));
        assert_eq!(cookie.http_only(), Some(true));
    }

    #[test]
    fn test_domain_is_applied() {
        let config = CookieConfig {
            domain: Some("example.com".to_owned()),
            ..CookieConfig::default()
        };
        let cookie = config.clearing_cookie();
        assert_eq!(cookie.domain(), Some("example.com"));
    }

    #[test]
    fn test_extract_token() {
        assert_eq!(
            extract_token("theme=dark; token=abc.def.ghi; lang=en"),
            Some("abc.def.ghi".to_owned())
        );
        assert_eq!(extract_token("theme=dark"), None);
        assert_eq!(extract_token("token="), None);
        assert_eq!(extract_token(""), None);
    }

    #[test]
    fn test_extract_with_custom_name() {
        let config = CookieConfig {
            name: "portfolio_session".to_owned(),
            ..CookieConfig::default()
        };
        assert_eq!(
            config.extract_token("token=x; portfolio_session=y"),
            Some("y".to_owned())
        );
    }
}
