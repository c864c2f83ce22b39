//! Session lifecycle state machine.
//!
//! ```text
//! anonymous -> authenticating -> authenticated -> refreshing -> authenticated
//!                    |                                  |
//!                    +------------> anonymous <---------+
//! ```
//!
//! Every failure event, a logout and a 401 seen anywhere lead back to
//! `anonymous` regardless of the current state.

use crate::error::{RcapError, Result};
use serde::{Deserialize, Serialize};
use strum::{AsRefStr, Display};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, Display, AsRefStr)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum SessionState {
    #[default]
    Anonymous,
    Authenticating,
    Authenticated,
    Refreshing,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, AsRefStr)]
#[strum(serialize_all = "snake_case")]
pub enum SessionEvent {
    /// Login, register or boot-time restore was issued.
    Authenticate,
    /// Token and user were received.
    Established,
    /// Credentials or a restored token were refused.
    Rejected,
    RefreshStarted,
    Refreshed,
    RefreshRejected,
    /// A 401 response was intercepted.
    Unauthorized,
    LoggedOut,
}

impl SessionEvent {
    /// Events that always end the session.
    pub fn is_terminal(self) -> bool {
        matches!(
            self,
            Self::Rejected | Self::RefreshRejected | Self::Unauthorized | Self::LoggedOut
        )
    }
}

impl SessionState {
    /// Returns the state reached by applying `event`.
    pub fn next(self, event: SessionEvent) -> Result<SessionState> {
        use SessionEvent as E;
        use SessionState as S;

        if event.is_terminal() {
            return Ok(S::Anonymous);
        }

        match (self, event) {
            (S::Anonymous | S::Authenticated, E::Authenticate) => Ok(S::Authenticating),
            (S::Authenticating, E::Established) => Ok(S::Authenticated),
            (S::Authenticated, E::RefreshStarted) => Ok(S::Refreshing),
            (S::Refreshing, E::Refreshed) => Ok(S::Authenticated),
            (from, event) => Err(RcapError::InvalidTransition {
                from: from.to_string(),
                event: event.to_string(),
            }),
        }
    }
}
