use crate::session::handle::SessionSnapshot;

/// Access requirements a command or screen declares up front.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RouteGuard {
    pub requires_auth: bool,
    pub admin_only: bool,
}

impl RouteGuard {
    pub const PUBLIC: RouteGuard = RouteGuard {
        requires_auth: false,
        admin_only: false,
    };
    pub const PROTECTED: RouteGuard = RouteGuard {
        requires_auth: true,
        admin_only: false,
    };
    pub const ADMIN: RouteGuard = RouteGuard {
        requires_auth: true,
        admin_only: true,
    };
}

/// What the view layer may do with a guarded request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GateOutcome {
    /// Session still resolving; show the loading indicator
    Loading,
    Render,
    RedirectToLogin,
    /// Access denied in place; no navigation
    Deny,
}

/// The access gate: a pure function of the session snapshot and the route's
/// requirements. This is the only place authorization decisions are made;
/// views render the outcome and never re-derive it.
pub fn evaluate(session: &SessionSnapshot, guard: RouteGuard) -> GateOutcome {
    if session.loading {
        return GateOutcome::Loading;
    }

    if !guard.requires_auth {
        return GateOutcome::Render;
    }

    if !session.is_authenticated() {
        return GateOutcome::RedirectToLogin;
    }

    if guard.admin_only && !session.is_admin() {
        return GateOutcome::Deny;
    }

    GateOutcome::Render
}
