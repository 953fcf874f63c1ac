//! Route guard.
//!
//! A decision function evaluated before each navigation: given the target
//! route (with its inherited metadata chain) and the current session, it
//! allows, redirects, or blocks. It performs no navigation itself; the
//! embedding router acts on the returned decision.

use tracing::{debug, error};

use ifarm_core::auth::{Role, has_role};

use crate::notify::Notifier;
use crate::session::Session;

/// Path of the login surface.
pub const LOGIN_PATH: &str = "/login";
/// Path of the forbidden surface.
pub const FORBIDDEN_PATH: &str = "/403";

/// Suffix appended to every page title.
pub const TITLE_SUFFIX: &str = "iFarm智慧农场管理系统";

/// Metadata declared on a route record.
#[derive(Debug, Clone, Default)]
pub struct RouteMeta {
    pub requires_auth: bool,
    /// When set, only these roles may enter.
    pub allowed_roles: Option<Vec<Role>>,
    pub title: Option<String>,
}

/// The target of a navigation, with the matched chain of route records
/// from root to leaf.
#[derive(Debug, Clone)]
pub struct RouteLocation {
    pub path: String,
    /// Path including query, preserved as the post-login return target.
    pub full_path: String,
    pub matched: Vec<RouteMeta>,
}

impl RouteLocation {
    pub fn new(path: impl Into<String>, matched: Vec<RouteMeta>) -> Self {
        let path = path.into();
        Self {
            full_path: path.clone(),
            path,
            matched,
        }
    }

    /// Authentication is required when any record in the chain demands it.
    pub fn requires_auth(&self) -> bool {
        self.matched.iter().any(|meta| meta.requires_auth)
    }

    /// The first allowed-role list declared along the chain.
    pub fn allowed_roles(&self) -> Option<&[Role]> {
        self.matched
            .iter()
            .find_map(|meta| meta.allowed_roles.as_deref())
    }

    /// The leaf-most title along the chain.
    pub fn title(&self) -> Option<&str> {
        self.matched.iter().rev().find_map(|meta| meta.title.as_deref())
    }
}

/// The guard's verdict for one navigation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NavDecision {
    Allow,
    Redirect {
        path: String,
        /// Originally intended path, preserved for post-login return.
        redirect: Option<String>,
    },
}

impl NavDecision {
    fn to(path: impl Into<String>) -> Self {
        NavDecision::Redirect {
            path: path.into(),
            redirect: None,
        }
    }

    fn to_login_from(target: &RouteLocation) -> Self {
        NavDecision::Redirect {
            path: LOGIN_PATH.to_string(),
            redirect: Some(target.full_path.clone()),
        }
    }
}

/// Window title for a route, `None` when the route declares none.
pub fn page_title(to: &RouteLocation) -> Option<String> {
    to.title().map(|title| format!("{title} - {TITLE_SUFFIX}"))
}

/// Decides whether the navigation to `to` may proceed.
pub async fn before_each(
    session: &Session,
    to: &RouteLocation,
    notifier: &dyn Notifier,
) -> NavDecision {
    debug!(path = %to.path, "route navigation");

    // Public routes: only the login page redirects authenticated sessions.
    if !to.requires_auth() {
        if to.path == LOGIN_PATH && session.is_logged_in().await {
            let landing = session
                .role()
                .await
                .map_or(FORBIDDEN_PATH, |role| role.default_redirect_path());
            return NavDecision::to(landing);
        }
        return NavDecision::Allow;
    }

    if !session.is_logged_in().await {
        notifier.warning("请先登录");
        return NavDecision::to_login_from(to);
    }

    if !session.can_access().await {
        notifier.error("您没有权限访问后台管理系统");
        return NavDecision::to(FORBIDDEN_PATH);
    }

    if let Some(allowed) = to.allowed_roles() {
        let role = session.role().await;
        if !role.is_some_and(|role| has_role(role, allowed)) {
            notifier.error("您没有权限访问该页面");
            return NavDecision::to(FORBIDDEN_PATH);
        }
    }

    if let Err(err) = session.check_expiry().await {
        error!(%err, "token refresh during navigation failed");
        notifier.error("登录状态已过期，请重新登录");
        session.clear_auth_data().await;
        return NavDecision::to_login_from(to);
    }

    NavDecision::Allow
}

/// Router-level error hook: surfaces a generic notice instead of letting a
/// navigation failure crash the pipeline.
pub fn on_route_error(notifier: &dyn Notifier, err: &ifarm_core::IfarmError) {
    error!(%err, "route error");
    notifier.error("页面加载失败，请刷新重试");
}
