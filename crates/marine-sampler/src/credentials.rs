//! Provider credential resolution.

use std::fmt;

/// Environment variable holding the provider username.
pub const USERNAME_ENV: &str = "MARINE_DATA_USERNAME";

/// Environment variable holding the provider password.
pub const PASSWORD_ENV: &str = "MARINE_DATA_PASSWORD";

/// Sentinel meaning "use the credentials stored locally for the provider".
pub const STORED_SENTINEL: &str = "stored";

/// Credentials used to reach the provider.
#[derive(Clone, PartialEq, Eq)]
pub enum Credentials {
    /// Username and password supplied explicitly or through the environment.
    Explicit { username: String, password: String },
    /// Fall back to whatever the provider has stored locally.
    Stored,
}

impl Credentials {
    /// Resolve credentials from arguments, then the process environment.
    pub fn resolve(username: Option<String>, password: Option<String>) -> Self {
        Self::resolve_with(username, password, |key| std::env::var(key).ok())
    }

    /// Resolve credentials with a custom environment lookup.
    ///
    /// Each field comes from the argument, else `lookup`, else the
    /// [`STORED_SENTINEL`]. A sentinel in either field yields `Stored`.
    pub fn resolve_with<F>(username: Option<String>, password: Option<String>, lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let pick = |arg: Option<String>, key: &str| {
            arg.filter(|s| !s.is_empty())
                .or_else(|| lookup(key).filter(|s| !s.is_empty()))
                .unwrap_or_else(|| STORED_SENTINEL.to_string())
        };

        let username = pick(username, USERNAME_ENV);
        let password = pick(password, PASSWORD_ENV);

        if username == STORED_SENTINEL || password == STORED_SENTINEL {
            Credentials::Stored
        } else {
            Credentials::Explicit { username, password }
        }
    }

    pub fn is_stored(&self) -> bool {
        matches!(self, Credentials::Stored)
    }

    /// Username for logging, `"stored"` for the sentinel.
    pub fn username(&self) -> &str {
        match self {
            Credentials::Explicit { username, .. } => username,
            Credentials::Stored => STORED_SENTINEL,
        }
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Credentials::Explicit { username, .. } => f
                .debug_struct("Explicit")
                .field("username", username)
                .field("password", &"***")
                .finish(),
            Credentials::Stored => f.write_str("Stored"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn no_env(_: &str) -> Option<String> {
        None
    }

    #[test]
    fn test_arguments_take_precedence() {
        let creds = Credentials::resolve_with(
            Some("alice".to_string()),
            Some("secret".to_string()),
            |key| Some(format!("env-{}", key)),
        );
        assert_eq!(
            creds,
            Credentials::Explicit {
                username: "alice".to_string(),
                password: "secret".to_string()
            }
        );
    }

    #[test]
    fn test_environment_fallback() {
        let creds = Credentials::resolve_with(None, None, |key| match key {
            USERNAME_ENV => Some("bob".to_string()),
            PASSWORD_ENV => Some("hunter2".to_string()),
            _ => None,
        });
        assert_eq!(creds.username(), "bob");
        assert!(!creds.is_stored());
    }

    #[test]
    fn test_missing_everything_means_stored() {
        let creds = Credentials::resolve_with(None, None, no_env);
        assert!(creds.is_stored());
        assert_eq!(creds.username(), "stored");
    }

    #[test]
    fn test_half_resolved_means_stored() {
        let creds = Credentials::resolve_with(Some("alice".to_string()), None, no_env);
        assert!(creds.is_stored());
    }

    #[test]
    fn test_explicit_sentinel_means_stored() {
        let creds = Credentials::resolve_with(
            Some("stored".to_string()),
            Some("stored".to_string()),
            no_env,
        );
        assert!(creds.is_stored());
    }

    #[test]
    fn test_debug_hides_password() {
        let creds = Credentials::Explicit {
            username: "alice".to_string(),
            password: "secret".to_string(),
        };
        let debug = format!("{:?}", creds);
        assert!(debug.contains("alice"));
        assert!(!debug.contains("secret"));
    }
}
