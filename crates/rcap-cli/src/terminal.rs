//! Terminal renderings of the client's feedback seams.

use colored::Colorize;
use rcap_core::feedback::{Navigator, Notice, NoticeLevel, Notifier};

/// Prints notices to stderr.
pub struct TerminalNotifier;

impl Notifier for TerminalNotifier {
    fn notify(&self, notice: Notice) {
        let line = match notice.level {
            NoticeLevel::Negative => format!("✗ {}", notice.message).red(),
            NoticeLevel::Warning => format!("! {}", notice.message).yellow(),
            NoticeLevel::Info => format!("ℹ {}", notice.message).cyan(),
        };
        eprintln!("{}", line);
    }
}

/// Maps the running command to a page; a forced redirect becomes a hint.
///
/// Login and register count as the login page, so a rejected sign-in does
/// not print a hint to sign in again.
pub struct TerminalNavigator {
    login_route: String,
    current: Option<String>,
}

impl TerminalNavigator {
    pub fn new(login_route: impl Into<String>) -> Self {
        Self {
            login_route: login_route.into(),
            current: None,
        }
    }

    pub fn at_login(login_route: impl Into<String>) -> Self {
        let login_route = login_route.into();
        Self {
            current: Some(login_route.clone()),
            login_route,
        }
    }

    fn hint(&self, path: &str) -> String {
        if path == self.login_route {
            "Session expired, run `rcap login`.".to_string()
        } else {
            format!("Continue at {}", path)
        }
    }
}

impl Navigator for TerminalNavigator {
    fn current_route(&self) -> Option<String> {
        self.current.clone()
    }

    fn redirect(&self, path: &str) {
        eprintln!("{}", self.hint(path).yellow());
    }
}
