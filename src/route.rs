//! Navigation targets shared by the screens.

use std::time::Duration;

/// Pause between a successful submit and the jump to the report.
pub const REDIRECT_DELAY: Duration = Duration::from_secs(1);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Route {
    /// Entry form.
    Form,
    /// Read-only view of the last submitted record.
    Report,
    /// Table of every stored profile.
    Listing,
}

impl Route {
    pub fn path(&self) -> &'static str {
        match self {
            Self::Form => "/",
            Self::Report => "/export",
            Self::Listing => "/list",
        }
    }
}

/// Navigation the caller should perform once `after` has elapsed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Redirect {
    pub route: Route,
    pub after: Duration,
}

impl Redirect {
    pub fn now(route: Route) -> Self {
        Self {
            route,
            after: Duration::ZERO,
        }
    }

    pub fn delayed(route: Route, after: Duration) -> Self {
        Self { route, after }
    }
}
