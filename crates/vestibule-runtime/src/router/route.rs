//! Static route data.
//!
//! The route table is the only configuration surface of the routing
//! core: a list of `(path, required role, action)` entries loaded once
//! at startup and immutable thereafter. Views are identifiers — what a
//! host UI mounts for them is not this crate's concern.

use vestibule_types::Role;

/// A normalized navigation path.
///
/// Normalization: a leading `/` is ensured and a trailing `/` is
/// stripped (except for the root), so `"/recruiter/"` and
/// `"/recruiter"` compare equal.
///
/// # Example
///
/// ```
/// use vestibule_runtime::router::RoutePath;
///
/// let a = RoutePath::new("/recruiter/dashboard/");
/// let b = RoutePath::new("recruiter/dashboard");
/// assert_eq!(a, b);
/// assert_eq!(a.as_str(), "/recruiter/dashboard");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RoutePath(String);

impl RoutePath {
    /// Creates a normalized path.
    #[must_use]
    pub fn new(path: impl AsRef<str>) -> Self {
        let raw = path.as_ref().trim();
        let mut normalized = if raw.starts_with('/') {
            raw.to_string()
        } else {
            format!("/{raw}")
        };
        while normalized.len() > 1 && normalized.ends_with('/') {
            normalized.pop();
        }
        Self(normalized)
    }

    /// Returns the path string.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Returns `true` if this path equals `base` or lies under it.
    #[must_use]
    pub fn is_within(&self, base: &RoutePath) -> bool {
        self == base
            || (base.0.len() < self.0.len()
                && self.0.starts_with(&base.0)
                && self.0.as_bytes().get(base.0.len()) == Some(&b'/'))
    }
}

impl From<&str> for RoutePath {
    fn from(path: &str) -> Self {
        Self::new(path)
    }
}

impl From<String> for RoutePath {
    fn from(path: String) -> Self {
        Self::new(path)
    }
}

impl std::fmt::Display for RoutePath {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Identifier of a view the host UI can mount.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ViewRef(&'static str);

impl ViewRef {
    /// Creates a view reference.
    #[must_use]
    pub const fn new(name: &'static str) -> Self {
        Self(name)
    }

    /// Returns the view name.
    #[must_use]
    pub fn name(&self) -> &'static str {
        self.0
    }
}

impl std::fmt::Display for ViewRef {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.0)
    }
}

/// View identifiers for the interview platform client.
pub mod views {
    use super::ViewRef;

    pub const SIGN_IN: ViewRef = ViewRef::new("sign-in");
    pub const SIGN_UP: ViewRef = ViewRef::new("sign-up");
    pub const ROLE_SELECTION: ViewRef = ViewRef::new("role-selection");
    pub const RECRUITER_DASHBOARD: ViewRef = ViewRef::new("recruiter-dashboard");
    pub const INTERVIEW_TEMPLATES: ViewRef = ViewRef::new("interview-templates");
    pub const CREATE_TEMPLATE: ViewRef = ViewRef::new("create-template");
    pub const EDIT_TEMPLATE: ViewRef = ViewRef::new("edit-template");
    pub const CANDIDATE_SCHEDULER: ViewRef = ViewRef::new("candidate-scheduler");
    pub const REVIEWS: ViewRef = ViewRef::new("reviews");
    pub const CANDIDATE_REVIEW: ViewRef = ViewRef::new("candidate-review");
    pub const RECRUITER_ANALYTICS: ViewRef = ViewRef::new("recruiter-analytics");
    pub const CANDIDATE_DASHBOARD: ViewRef = ViewRef::new("candidate-dashboard");
    pub const INTERVIEW_SESSION: ViewRef = ViewRef::new("interview-session");
    pub const INTERVIEW_COMPLETE: ViewRef = ViewRef::new("interview-complete");
    pub const NOT_FOUND: ViewRef = ViewRef::new("not-found");
}

/// What matching a route does.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RouteAction {
    /// Mount the given view.
    Render(ViewRef),

    /// Alias to another path (legacy paths, index routes).
    Redirect(&'static str),
}

/// One entry in the route table.
///
/// # Matching
///
/// Exact entries match their path only. Subtree entries
/// ([`RouteSpec::subtree`]) also match any path below theirs —
/// `/interview` matches `/interview/42`. When both match, the longest
/// path wins, and an exact entry beats a subtree entry of the same
/// path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RouteSpec {
    path: &'static str,
    prefix: bool,
    required_role: Option<Role>,
    action: RouteAction,
}

impl RouteSpec {
    /// Creates an exact route rendering `view`.
    #[must_use]
    pub fn view(path: &'static str, view: ViewRef) -> Self {
        Self {
            path,
            prefix: false,
            required_role: None,
            action: RouteAction::Render(view),
        }
    }

    /// Creates a subtree route rendering `view` for the path and
    /// everything below it.
    #[must_use]
    pub fn subtree(path: &'static str, view: ViewRef) -> Self {
        Self {
            path,
            prefix: true,
            required_role: None,
            action: RouteAction::Render(view),
        }
    }

    /// Creates an exact route aliasing to another path.
    #[must_use]
    pub fn redirect(path: &'static str, to: &'static str) -> Self {
        Self {
            path,
            prefix: false,
            required_role: None,
            action: RouteAction::Redirect(to),
        }
    }

    /// Requires a role for this route.
    #[must_use]
    pub fn require(mut self, role: Role) -> Self {
        self.required_role = Some(role);
        self
    }

    /// Returns the route's path.
    #[must_use]
    pub fn path(&self) -> &'static str {
        self.path
    }

    /// Returns the required role, if any.
    #[must_use]
    pub fn required_role(&self) -> Option<Role> {
        self.required_role
    }

    /// Returns the action taken when this route matches.
    #[must_use]
    pub fn action(&self) -> RouteAction {
        self.action
    }

    fn matches(&self, target: &RoutePath) -> bool {
        let own = RoutePath::new(self.path);
        if self.prefix {
            target.is_within(&own)
        } else {
            *target == own
        }
    }
}

/// The static route table.
///
/// Built once at startup, immutable thereafter.
#[derive(Debug, Clone)]
pub struct RouteTable {
    routes: Vec<RouteSpec>,
    not_found: ViewRef,
}

impl RouteTable {
    /// Creates a table from explicit entries.
    #[must_use]
    pub fn new(routes: Vec<RouteSpec>, not_found: ViewRef) -> Self {
        Self { routes, not_found }
    }

    /// The interview platform's route table.
    ///
    /// | Path | Role | Action |
    /// |------|------|--------|
    /// | `/sign-in/*` | — | sign-in view (public) |
    /// | `/sign-up` | — | sign-up view |
    /// | `/login`, `/register` | — | legacy aliases |
    /// | `/` , `/dashboard` | — | alias to role dispatch |
    /// | `/select-role` | — | role selection view |
    /// | `/recruiter` | Recruiter | alias to its dashboard |
    /// | `/recruiter/...` | Recruiter | recruiter pages |
    /// | `/candidate` | Candidate | alias to its dashboard |
    /// | `/candidate/dashboard` | Candidate | candidate dashboard |
    /// | `/interview/*`, `/interview-complete` | Candidate | interview flow |
    #[must_use]
    pub fn interview_platform() -> Self {
        use views::*;
        let recruiter = Role::Recruiter;
        let candidate = Role::Candidate;
        Self::new(
            vec![
                RouteSpec::subtree("/sign-in", SIGN_IN),
                RouteSpec::view("/sign-up", SIGN_UP),
                RouteSpec::redirect("/login", "/sign-in"),
                RouteSpec::redirect("/register", "/sign-up"),
                RouteSpec::redirect("/", "/dashboard"),
                RouteSpec::redirect("/dashboard", "/select-role"),
                RouteSpec::view("/select-role", ROLE_SELECTION),
                RouteSpec::redirect("/recruiter", "/recruiter/dashboard").require(recruiter),
                RouteSpec::view("/recruiter/dashboard", RECRUITER_DASHBOARD).require(recruiter),
                RouteSpec::view("/recruiter/templates", INTERVIEW_TEMPLATES).require(recruiter),
                RouteSpec::view("/recruiter/templates/create", CREATE_TEMPLATE).require(recruiter),
                RouteSpec::subtree("/recruiter/templates/edit", EDIT_TEMPLATE).require(recruiter),
                RouteSpec::view("/recruiter/scheduler", CANDIDATE_SCHEDULER).require(recruiter),
                RouteSpec::view("/recruiter/reviews", REVIEWS).require(recruiter),
                RouteSpec::subtree("/recruiter/reviews", CANDIDATE_REVIEW).require(recruiter),
                RouteSpec::view("/recruiter/analytics", RECRUITER_ANALYTICS).require(recruiter),
                RouteSpec::redirect("/candidate", "/candidate/dashboard").require(candidate),
                RouteSpec::view("/candidate/dashboard", CANDIDATE_DASHBOARD).require(candidate),
                RouteSpec::subtree("/interview", INTERVIEW_SESSION).require(candidate),
                RouteSpec::view("/interview-complete", INTERVIEW_COMPLETE).require(candidate),
            ],
            NOT_FOUND,
        )
    }

    /// Finds the best route for a path.
    ///
    /// Longest matching path wins; exact beats subtree at equal length.
    /// `None` means the table has no entry — the caller renders the
    /// [`not_found`](Self::not_found) view.
    #[must_use]
    pub fn lookup(&self, target: &RoutePath) -> Option<&RouteSpec> {
        self.routes
            .iter()
            .filter(|spec| spec.matches(target))
            .max_by_key(|spec| (spec.path.len(), !spec.prefix))
    }

    /// Returns the fallback view for unmatched paths.
    #[must_use]
    pub fn not_found(&self) -> ViewRef {
        self.not_found
    }

    /// Returns the home path for an assigned role, if it has one.
    #[must_use]
    pub fn home_for(&self, role: Role) -> Option<RoutePath> {
        match role {
            Role::Recruiter => Some(RoutePath::new("/recruiter/dashboard")),
            Role::Candidate => Some(RoutePath::new("/candidate/dashboard")),
            Role::Unknown => None,
        }
    }
}
