//! Route access gate.
//!
//! Maps route prefixes to the roles allowed to open them. Lookup always
//! uses the longest registered prefix of the requested path so nested rules
//! override their parents. Paths with no matching rule fall back to an
//! explicit [`UnlistedRoutePolicy`].
//!
//! The gate never fails: blank paths and unknown role claims are evaluated
//! with [`Role::Usuario`] privileges.

mod guard;
mod menu;

use std::collections::{BTreeMap, BTreeSet};
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use tracing::debug;

use super::Role;

pub use guard::{RouteDecision, guard_route};
pub use menu::{MenuItem, standard_menu};

/// Decision applied to paths no rule covers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UnlistedRoutePolicy {
    /// Any authenticated role may open unlisted paths.
    #[default]
    Allow,
    /// Unlisted paths are closed to every role.
    Deny,
}

impl UnlistedRoutePolicy {
    fn permits(self) -> bool {
        matches!(self, Self::Allow)
    }
}

/// Parse error for [`UnlistedRoutePolicy`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid unlisted route policy: {input} (expected allow|deny)")]
pub struct ParseUnlistedRoutePolicyError {
    pub input: String,
}

impl FromStr for UnlistedRoutePolicy {
    type Err = ParseUnlistedRoutePolicyError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "allow" => Ok(Self::Allow),
            "deny" => Ok(Self::Deny),
            _ => Err(ParseUnlistedRoutePolicyError {
                input: value.to_owned(),
            }),
        }
    }
}

impl fmt::Display for UnlistedRoutePolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Allow => f.write_str("allow"),
            Self::Deny => f.write_str("deny"),
        }
    }
}

/// Errors raised while registering a rule.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RuleError {
    /// The prefix was blank.
    #[error("route prefix must not be empty")]
    EmptyPrefix,
    /// The prefix did not start at the root.
    #[error("route prefix must start with '/': {prefix}")]
    NotRooted { prefix: String },
}

/// Route prefix to allowed-role table.
///
/// # Examples
/// ```
/// use doctrack::domain::{Role, RoutePermissions};
///
/// let gate = RoutePermissions::standard();
/// assert!(gate.is_authorized("/dashboard/settings/users", Some(Role::Admin)));
/// assert!(!gate.is_authorized("/dashboard/settings/users", Some(Role::Usuario)));
/// assert!(gate.is_authorized("/dashboard/random-page", Some(Role::Usuario)));
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RoutePermissions {
    rules: BTreeMap<String, BTreeSet<Role>>,
    unlisted: UnlistedRoutePolicy,
}

impl RoutePermissions {
    /// An empty table with the given policy for unlisted paths.
    pub fn new(unlisted: UnlistedRoutePolicy) -> Self {
        Self {
            rules: BTreeMap::new(),
            unlisted,
        }
    }

    /// The dashboard rule table shipped with the application.
    pub fn standard() -> Self {
        use Role::{Admin, Auditor, Gestor, Usuario};

        let table: [(&str, &[Role]); 8] = [
            ("/dashboard/stats", &[Admin, Gestor, Auditor, Usuario]),
            ("/dashboard/inbox", &[Admin, Gestor, Auditor, Usuario]),
            ("/dashboard/register", &[Admin, Gestor]),
            ("/dashboard/search", &[Admin, Gestor, Auditor, Usuario]),
            ("/dashboard/reports", &[Admin, Auditor]),
            ("/dashboard/settings/users", &[Admin]),
            ("/dashboard/settings/roles", &[Admin]),
            ("/dashboard/settings", &[Admin]),
        ];

        let mut permissions = Self::default();
        for (prefix, roles) in table {
            permissions
                .rules
                .insert(prefix.to_owned(), roles.iter().copied().collect());
        }
        permissions
    }

    /// Replace the unlisted-route policy.
    pub fn with_unlisted_policy(mut self, unlisted: UnlistedRoutePolicy) -> Self {
        self.unlisted = unlisted;
        self
    }

    /// Register or replace the rule for `prefix`.
    pub fn insert_rule(
        &mut self,
        prefix: impl Into<String>,
        roles: impl IntoIterator<Item = Role>,
    ) -> Result<(), RuleError> {
        let prefix = prefix.into();
        if prefix.trim().is_empty() {
            return Err(RuleError::EmptyPrefix);
        }
        if !prefix.starts_with('/') {
            return Err(RuleError::NotRooted { prefix });
        }
        self.rules.insert(prefix, roles.into_iter().collect());
        Ok(())
    }

    /// Builder-style variant of [`Self::insert_rule`].
    pub fn with_rule(
        mut self,
        prefix: impl Into<String>,
        roles: impl IntoIterator<Item = Role>,
    ) -> Result<Self, RuleError> {
        self.insert_rule(prefix, roles)?;
        Ok(self)
    }

    pub fn unlisted_policy(&self) -> UnlistedRoutePolicy {
        self.unlisted
    }

    /// Registered rules in prefix order.
    pub fn rules(&self) -> impl Iterator<Item = (&str, &BTreeSet<Role>)> {
        self.rules.iter().map(|(prefix, roles)| (prefix.as_str(), roles))
    }

    /// The most specific rule covering `pathname`.
    ///
    /// Candidates are the registered prefixes `pathname` starts with; the
    /// longest wins. Equal-length candidates resolve to the lexicographically
    /// first key, which the ordered map yields first.
    pub fn matching_rule(&self, pathname: &str) -> Option<(&str, &BTreeSet<Role>)> {
        self.rules
            .iter()
            .filter(|(prefix, _)| pathname.starts_with(prefix.as_str()))
            .fold(None, |best: Option<(&String, &BTreeSet<Role>)>, candidate| {
                match best {
                    Some(current) if current.0.len() >= candidate.0.len() => Some(current),
                    _ => Some(candidate),
                }
            })
            .map(|(prefix, roles)| (prefix.as_str(), roles))
    }

    /// Decide whether `role` may open `pathname`.
    ///
    /// `None` and blank paths are evaluated as [`Role::Usuario`].
    pub fn is_authorized(&self, pathname: &str, role: Option<Role>) -> bool {
        let effective = if pathname.trim().is_empty() {
            Role::Usuario
        } else {
            role.unwrap_or(Role::Usuario)
        };

        let allowed = match self.matching_rule(pathname) {
            Some((_, roles)) => roles.contains(&effective),
            None => self.unlisted.permits(),
        };
        if !allowed {
            debug!(path = %pathname, role = %effective, "route denied");
        }
        allowed
    }

    /// Gate check for a raw role claim as stored in a session payload.
    pub fn is_authorized_claim(&self, pathname: &str, claim: Option<&str>) -> bool {
        self.is_authorized(pathname, Some(Role::from_claim(claim)))
    }

    /// Keep the menu entries whose `href` the role may open, in input order.
    ///
    /// The returned iterator borrows both the gate and the items and can be
    /// recreated at will; it holds no state between calls.
    pub fn filter_menu<'a>(
        &'a self,
        items: &'a [MenuItem],
        role: Option<Role>,
    ) -> impl Iterator<Item = &'a MenuItem> + Clone + 'a {
        items
            .iter()
            .filter(move |item| self.is_authorized(item.href(), role))
    }
}
