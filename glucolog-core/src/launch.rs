//! Which screen a fresh start should land on.

use std::fmt;

use crate::session::{KeyValueStore, ONBOARDING_SEEN_KEY, USER_KEY};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Launch {
    /// Signed in with a profile.
    Home,
    /// Never seen the welcome slides.
    Onboarding,
    Login,
}

impl fmt::Display for Launch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Launch::Home => write!(f, "home"),
            Launch::Onboarding => write!(f, "onboarding"),
            Launch::Login => write!(f, "login"),
        }
    }
}

/// Picks the start route from session storage.
///
/// A stored token alone is not enough for [`Launch::Home`]; the profile
/// must also have been created. Storage that cannot be read sends the user
/// to login.
pub fn resolve_launch<S: KeyValueStore + ?Sized>(session: &S) -> Launch {
    match read_launch(session) {
        Ok(launch) => launch,
        Err(e) => {
            tracing::warn!("Could not read session, falling back to login: {}", e);
            Launch::Login
        }
    }
}

fn read_launch<S: KeyValueStore + ?Sized>(
    session: &S,
) -> Result<Launch, crate::session::SessionError> {
    let token = crate::session::auth_token(session)?;
    let user = session.get(USER_KEY)?;
    if token.is_some() && user.is_some() {
        return Ok(Launch::Home);
    }
    if session.get(ONBOARDING_SEEN_KEY)?.is_some() {
        Ok(Launch::Login)
    } else {
        Ok(Launch::Onboarding)
    }
}
