use std::fmt::{Debug, Formatter};

use crate::error::Error;

/// Session cookie copied from the dashboard.
///
/// Treated as an opaque secret: it is never logged and carries no structure.
#[derive(Clone)]
#[must_use]
pub struct Credential(String);

impl Debug for Credential {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str("Credential(***)")
    }
}

impl Credential {
    pub fn try_new(cookie: impl Into<String>) -> Result<Self, Error> {
        let cookie = cookie.into();
        if cookie.trim().is_empty() {
            return Err(Error::Configuration("the session cookie is empty".to_string()));
        }
        http::HeaderValue::from_str(&cookie).map_err(|_| {
            Error::Configuration("the session cookie is not a valid header value".to_string())
        })?;
        Ok(Self(cookie))
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for Credential {
    type Error = Error;

    fn try_from(cookie: String) -> Result<Self, Self::Error> {
        Self::try_new(cookie)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_rejected() {
        assert!(matches!(Credential::try_new(""), Err(Error::Configuration(_))));
        assert!(matches!(Credential::try_new("  \n"), Err(Error::Configuration(_))));
    }

    #[test]
    fn test_invalid_header_value_rejected() {
        assert!(matches!(Credential::try_new("JSESSIONID=abc\r"), Err(Error::Configuration(_))));
        assert!(matches!(Credential::try_new("a=1\nb=2"), Err(Error::Configuration(_))));
    }

    #[test]
    fn test_debug_redacted() {
        let credential = Credential::try_new("JSESSIONID=secret").unwrap();
        assert_eq!(format!("{credential:?}"), "Credential(***)");
        assert_eq!(credential.as_str(), "JSESSIONID=secret");
    }
}
