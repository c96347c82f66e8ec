//! Cookie model and `Set-Cookie` rendering.

use std::fmt;

use crate::codec::headers::join_values;

/// A response cookie.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Cookie {
    pub name: String,
    pub value: String,
    pub domain: Option<String>,
    pub path: Option<String>,
    /// Lifetime in seconds. `None` is a session cookie.
    pub max_age: Option<i64>,
    pub secure: bool,
    pub http_only: bool,
}

impl Cookie {
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
            ..Default::default()
        }
    }

    pub fn with_domain(mut self, domain: impl Into<String>) -> Self {
        self.domain = Some(domain.into());
        self
    }

    pub fn with_path(mut self, path: impl Into<String>) -> Self {
        self.path = Some(path.into());
        self
    }

    pub fn with_max_age(mut self, seconds: i64) -> Self {
        self.max_age = Some(seconds);
        self
    }

    pub fn secure(mut self, secure: bool) -> Self {
        self.secure = secure;
        self
    }

    pub fn http_only(mut self, http_only: bool) -> Self {
        self.http_only = http_only;
        self
    }
}

impl fmt::Display for Cookie {
    /// `name=value` then Domain, Path, Max-Age, Secure, HttpOnly.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}={}", self.name, self.value)?;
        if let Some(domain) = &self.domain {
            write!(f, "; Domain={domain}")?;
        }
        if let Some(path) = &self.path {
            write!(f, "; Path={path}")?;
        }
        if let Some(max_age) = self.max_age {
            write!(f, "; Max-Age={max_age}")?;
        }
        if self.secure {
            f.write_str("; Secure")?;
        }
        if self.http_only {
            f.write_str("; HttpOnly")?;
        }
        Ok(())
    }
}

/// Render cookies as a single `Set-Cookie` wire value.
///
/// Renderings are appended, never re-parsed: an attribute that itself holds
/// a comma is emitted verbatim.
pub fn encode_set_cookie(cookies: &[Cookie]) -> String {
    join_values(cookies.iter().map(ToString::to_string))
}

/// Parse an inbound `Cookie` header into name/value pairs.
pub fn parse_cookie_header(header: &str) -> Vec<(String, String)> {
    header
        .split(';')
        .filter_map(|pair| {
            let (name, value) = pair.split_once('=')?;
            let name = name.trim();
            if name.is_empty() {
                return None;
            }
            Some((name.to_string(), value.trim().trim_matches('"').to_string()))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn renders_attributes_in_order() {
        let cookie = Cookie::new("session", "abc")
            .with_domain("mydomain.com")
            .with_path("/")
            .with_max_age(3600)
            .secure(true)
            .http_only(true);
        assert_eq!(
            cookie.to_string(),
            "session=abc; Domain=mydomain.com; Path=/; Max-Age=3600; Secure; HttpOnly"
        );
    }

    #[test]
    fn bare_cookie_has_no_attributes() {
        assert_eq!(Cookie::new("a", "1").to_string(), "a=1");
    }

    #[test]
    fn multiple_cookies_join_with_comma() {
        let cookies = [
            Cookie::new("MyCookie", "CookieValue").with_domain("mydomain.com").with_path("/"),
            Cookie::new("MyCookie2", "CookieValue2").with_domain("mydomain.com").with_path("/"),
        ];
        let wire = encode_set_cookie(&cookies);
        assert_eq!(wire.split(',').count(), 2);
        assert!(wire.contains("MyCookie=CookieValue"));
        assert!(wire.contains("MyCookie2=CookieValue2"));
        assert_eq!(wire.matches("mydomain.com").count(), 2);
    }

    #[test]
    fn parses_request_cookie_header() {
        let pairs = parse_cookie_header("a=1; b=\"two\";; =skip; c=");
        assert_eq!(
            pairs,
            vec![
                ("a".to_string(), "1".to_string()),
                ("b".to_string(), "two".to_string()),
                ("c".to_string(), String::new()),
            ]
        );
    }
}
