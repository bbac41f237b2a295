use tracing::{info, warn};

/// Decides whether a submitted username/password pair may log in.
pub trait CredentialVerifier {
    fn verify(&self, username: &str, password: &str) -> bool;
}

/// A single configured credential pair.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StaticCredentials {
    username: String,
    password: String,
}

impl StaticCredentials {
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        StaticCredentials {
            username: username.into(),
            password: password.into(),
        }
    }

    pub fn username(&self) -> &str {
        &self.username
    }
}

impl Default for StaticCredentials {
    fn default() -> Self {
        StaticCredentials::new("admin", "1234")
    }
}

impl CredentialVerifier for StaticCredentials {
    fn verify(&self, username: &str, password: &str) -> bool {
        let ok = username == self.username && password == self.password;
        if ok {
            info!(username, "login accepted");
        } else {
            warn!(username, "login rejected");
        }
        ok
    }
}

impl<F> CredentialVerifier for F
where
    F: Fn(&str, &str) -> bool,
{
    fn verify(&self, username: &str, password: &str) -> bool {
        self(username, password)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_pair_is_accepted() {
        let creds = StaticCredentials::default();
        assert!(creds.verify("admin", "1234"));
        assert!(!creds.verify("admin", "12345"));
        assert!(!creds.verify("Admin", "1234"));
        assert!(!creds.verify("", ""));
    }

    #[test]
    fn closures_are_verifiers() {
        let only_guest = |u: &str, _: &str| u == "guest";
        assert!(only_guest.verify("guest", "anything"));
        assert!(!only_guest.verify("admin", "1234"));
    }
}
