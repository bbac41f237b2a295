use std::fmt;
use std::str::FromStr;

use crate::auth::CredentialVerifier;

/// Login state of the single interactive session.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Session {
    #[default]
    LoggedOut,
    LoggedIn {
        username: String,
    },
}

impl Session {
    pub fn is_logged_in(&self) -> bool {
        matches!(self, Session::LoggedIn { .. })
    }

    /// LoggedOut -> LoggedIn on a credential match; any other input keeps
    /// the current state.
    pub fn login<V: CredentialVerifier + ?Sized>(
        self,
        verifier: &V,
        username: &str,
        password: &str,
    ) -> Result<Session, Session> {
        match self {
            Session::LoggedOut if verifier.verify(username, password) => Ok(Session::LoggedIn {
                username: username.to_string(),
            }),
            other => Err(other),
        }
    }

    pub fn logout(self) -> Session {
        Session::LoggedOut
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuItem {
    Home,
    Prediction,
    About,
    Logout,
}

impl MenuItem {
    pub const ALL: [MenuItem; 4] = [
        MenuItem::Home,
        MenuItem::Prediction,
        MenuItem::About,
        MenuItem::Logout,
    ];
}

impl fmt::Display for MenuItem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            MenuItem::Home => "Home",
            MenuItem::Prediction => "Prediction",
            MenuItem::About => "About",
            MenuItem::Logout => "Logout",
        };
        f.write_str(name)
    }
}

impl FromStr for MenuItem {
    type Err = String;

    /// Accepts the 1-based menu position or the item name, case-insensitive.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if let Ok(n) = s.parse::<usize>() {
            return n
                .checked_sub(1)
                .and_then(|i| MenuItem::ALL.get(i).copied())
                .ok_or_else(|| format!("no menu entry {}", n));
        }
        MenuItem::ALL
            .iter()
            .copied()
            .find(|item| item.to_string().eq_ignore_ascii_case(s))
            .ok_or_else(|| format!("unknown menu entry '{}'", s))
    }
}
