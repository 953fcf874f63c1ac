//! User-facing side-effect seams.
//!
//! The HTTP core and the session surface transient notices and blocking
//! redirects. Both effects go through injectable traits so embedders wire
//! in their UI and tests record what was surfaced.

use tracing::{error, info, warn};

/// Transient user-visible notification (toast-equivalent).
pub trait Notifier: Send + Sync {
    fn success(&self, message: &str);
    fn warning(&self, message: &str);
    fn error(&self, message: &str);
}

/// Navigation target for blocking redirects.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Redirect {
    /// To the login surface, preserving the originally intended path.
    Login { redirect: Option<String> },
    /// To the forbidden surface.
    Forbidden,
}

/// Performs blocking redirects on authentication/permission failures.
pub trait Navigator: Send + Sync {
    fn redirect(&self, target: Redirect);
}

/// Default notifier that logs notices through `tracing`.
#[derive(Debug, Clone, Default)]
pub struct TracingNotifier;

impl Notifier for TracingNotifier {
    fn success(&self, message: &str) {
        info!(target: "ifarm::notice", "{message}");
    }

    fn warning(&self, message: &str) {
        warn!(target: "ifarm::notice", "{message}");
    }

    fn error(&self, message: &str) {
        error!(target: "ifarm::notice", "{message}");
    }
}

/// Default navigator that logs redirects through `tracing`.
#[derive(Debug, Clone, Default)]
pub struct TracingNavigator;

impl Navigator for TracingNavigator {
    fn redirect(&self, target: Redirect) {
        warn!(target: "ifarm::navigation", ?target, "redirect requested");
    }
}
