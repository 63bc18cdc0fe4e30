//! Per-role capability matrix (module × action).
//!
//! The route gate decides which views a role may open; this matrix decides
//! which operations the role may trigger inside them. Both mirror backend
//! enforcement and never replace it.

use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

use serde::{Deserialize, Serialize};
use tracing::debug;

use super::{Error, Role, Session};

/// Functional area a capability applies to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Module {
    Documents,
    Users,
    Departments,
    Reports,
    Settings,
}

impl Module {
    pub const ALL: [Self; 5] = [
        Self::Documents,
        Self::Users,
        Self::Departments,
        Self::Reports,
        Self::Settings,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Documents => "documents",
            Self::Users => "users",
            Self::Departments => "departments",
            Self::Reports => "reports",
            Self::Settings => "settings",
        }
    }
}

/// Operation within a [`Module`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Action {
    Read,
    Create,
    Update,
    Delete,
    Export,
    Approve,
    Reject,
}

impl Action {
    pub const ALL: [Self; 7] = [
        Self::Read,
        Self::Create,
        Self::Update,
        Self::Delete,
        Self::Export,
        Self::Approve,
        Self::Reject,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Read => "read",
            Self::Create => "create",
            Self::Update => "update",
            Self::Delete => "delete",
            Self::Export => "export",
            Self::Approve => "approve",
            Self::Reject => "reject",
        }
    }
}

/// A single grant, rendered as `module:action`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Capability {
    pub module: Module,
    pub action: Action,
}

impl Capability {
    pub const fn new(module: Module, action: Action) -> Self {
        Self { module, action }
    }
}

impl fmt::Display for Capability {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.module.as_str(), self.action.as_str())
    }
}

use Action as A;
use Module as M;

const ADMIN_GRANTS: &[(Module, &[Action])] = &[
    (
        M::Documents,
        &[A::Read, A::Create, A::Update, A::Delete, A::Approve, A::Reject, A::Export],
    ),
    (M::Users, &[A::Read, A::Create, A::Update, A::Delete]),
    (M::Departments, &[A::Read, A::Update]),
    (M::Reports, &[A::Read, A::Export]),
    (M::Settings, &[A::Update]),
];

const GESTOR_GRANTS: &[(Module, &[Action])] = &[
    (M::Documents, &[A::Read, A::Create, A::Approve, A::Reject]),
    (M::Users, &[A::Read]),
    (M::Departments, &[A::Read]),
    (M::Reports, &[A::Read]),
];

const AUDITOR_GRANTS: &[(Module, &[Action])] = &[
    (M::Documents, &[A::Read, A::Export]),
    (M::Users, &[A::Read]),
    (M::Departments, &[A::Read]),
    (M::Reports, &[A::Read, A::Export]),
];

const USUARIO_GRANTS: &[(Module, &[Action])] = &[(M::Documents, &[A::Read])];

/// Role → granted capabilities.
///
/// # Examples
/// ```
/// use doctrack::domain::{Action, Capabilities, Module, Role};
///
/// let matrix = Capabilities::standard();
/// assert!(matrix.allows(Role::Gestor, Module::Documents, Action::Approve));
/// assert!(!matrix.allows(Role::Auditor, Module::Documents, Action::Approve));
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Capabilities {
    grants: BTreeMap<Role, BTreeSet<Capability>>,
}

impl Capabilities {
    /// The default role matrix.
    pub fn standard() -> Self {
        let mut matrix = Self::default();
        for (role, table) in [
            (Role::Admin, ADMIN_GRANTS),
            (Role::Gestor, GESTOR_GRANTS),
            (Role::Auditor, AUDITOR_GRANTS),
            (Role::Usuario, USUARIO_GRANTS),
        ] {
            for (module, actions) in table {
                for action in *actions {
                    matrix.grant(role, Capability::new(*module, *action));
                }
            }
        }
        matrix
    }

    /// Add a grant. Returns `false` when it was already present.
    pub fn grant(&mut self, role: Role, capability: Capability) -> bool {
        self.grants.entry(role).or_default().insert(capability)
    }

    /// Remove a grant. Returns `true` when it was present.
    pub fn revoke(&mut self, role: Role, capability: Capability) -> bool {
        self.grants
            .get_mut(&role)
            .is_some_and(|set| set.remove(&capability))
    }

    pub fn allows(&self, role: Role, module: Module, action: Action) -> bool {
        self.grants
            .get(&role)
            .is_some_and(|set| set.contains(&Capability::new(module, action)))
    }

    /// Grants for `role` in `module:action` order.
    pub fn granted(&self, role: Role) -> impl Iterator<Item = Capability> + '_ {
        self.grants.get(&role).into_iter().flatten().copied()
    }

    /// Check a session before a guarded call and return its role.
    ///
    /// # Errors
    ///
    /// `Unauthorized` without a signed-in session, `Forbidden` when the role
    /// lacks the grant.
    pub fn authorize(&self, session: &Session, module: Module, action: Action) -> Result<Role, Error> {
        let Some(context) = session.context() else {
            return Err(Error::unauthorized("Sesión no iniciada."));
        };
        let role = context.role();
        if self.allows(role, module, action) {
            Ok(role)
        } else {
            debug!(%role, module = module.as_str(), action = action.as_str(), "capability denied");
            Err(Error::forbidden(format!(
                "El rol {role} no puede realizar {}:{}.",
                module.as_str(),
                action.as_str()
            )))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ErrorCode;
    use crate::test_support::session_with_role;
    use rstest::rstest;

    #[rstest]
    #[case(Role::Admin, Module::Settings, Action::Update, true)]
    #[case(Role::Gestor, Module::Settings, Action::Update, false)]
    #[case(Role::Gestor, Module::Documents, Action::Reject, true)]
    #[case(Role::Auditor, Module::Reports, Action::Export, true)]
    #[case(Role::Auditor, Module::Documents, Action::Reject, false)]
    #[case(Role::Usuario, Module::Documents, Action::Read, true)]
    #[case(Role::Usuario, Module::Documents, Action::Create, false)]
    fn standard_matrix(
        #[case] role: Role,
        #[case] module: Module,
        #[case] action: Action,
        #[case] expected: bool,
    ) {
        assert_eq!(Capabilities::standard().allows(role, module, action), expected);
    }

    #[rstest]
    fn every_role_can_read_documents() {
        let matrix = Capabilities::standard();
        for role in Role::ALL {
            assert!(matrix.allows(role, Module::Documents, Action::Read), "{role}");
        }
    }

    #[rstest]
    fn grant_and_revoke() {
        let mut matrix = Capabilities::standard();
        let export = Capability::new(Module::Documents, Action::Export);
        assert!(matrix.grant(Role::Usuario, export));
        assert!(!matrix.grant(Role::Usuario, export));
        assert!(matrix.allows(Role::Usuario, Module::Documents, Action::Export));
        assert!(matrix.revoke(Role::Usuario, export));
        assert!(!matrix.revoke(Role::Usuario, export));
    }

    #[rstest]
    fn renders_as_module_action() {
        let rendered: Vec<String> = Capabilities::standard()
            .granted(Role::Usuario)
            .map(|capability| capability.to_string())
            .collect();
        assert_eq!(rendered, ["documents:read"]);
    }

    #[rstest]
    fn authorize_distinguishes_anonymous_from_denied() {
        let matrix = Capabilities::standard();
        let anonymous = matrix
            .authorize(&Session::anonymous(), Module::Users, Action::Read)
            .expect_err("no session");
        assert_eq!(anonymous.code(), ErrorCode::Unauthorized);

        let denied = matrix
            .authorize(&session_with_role(Role::Gestor), Module::Users, Action::Delete)
            .expect_err("gestor cannot delete users");
        assert_eq!(denied.code(), ErrorCode::Forbidden);
        assert_eq!(denied.message(), "El rol Gestor no puede realizar users:delete.");

        assert_eq!(
            matrix.authorize(&session_with_role(Role::Admin), Module::Users, Action::Delete),
            Ok(Role::Admin)
        );
    }
}
