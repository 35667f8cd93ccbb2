use std::fmt;

use strum::Display;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
#[strum(serialize_all = "lowercase")]
pub enum AuthMode {
    /// The login form is filled and submitted by the automation.
    Automatic,
    /// The operator completes the login by hand in the opened browser.
    Manual,
}

impl AuthMode {
    pub fn from_manual_flag(manual: bool) -> Self {
        if manual {
            AuthMode::Manual
        } else {
            AuthMode::Automatic
        }
    }
}

#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    pub email: String,
    pub password: String,
    pub auth_mode: AuthMode,
}

impl Credentials {
    pub fn new(email: impl Into<String>, password: impl Into<String>, auth_mode: AuthMode) -> Self {
        Self {
            email: email.into(),
            password: password.into(),
            auth_mode,
        }
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("email", &self.email)
            .field("password", &"<redacted>")
            .field("auth_mode", &self.auth_mode)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_debug_hides_password() {
        let credentials = Credentials::new("me@example.com", "hunter2", AuthMode::Manual);
        let printed = format!("{:?}", credentials);
        assert!(printed.contains("me@example.com"));
        assert!(!printed.contains("hunter2"));
    }

    #[test]
    fn test_auth_mode_from_flag() {
        assert_eq!(AuthMode::from_manual_flag(true), AuthMode::Manual);
        assert_eq!(AuthMode::from_manual_flag(false), AuthMode::Automatic);
        assert_eq!(AuthMode::Manual.to_string(), "manual");
    }
}
