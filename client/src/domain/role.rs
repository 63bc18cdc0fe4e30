//! Closed role enumeration shared by the access gate and capability matrix.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use tracing::warn;

/// Role assigned to a user by the backend.
///
/// Variants are ordered from most to least privileged. Wire names match the
/// backend exactly (`"Admin"`, `"Gestor"`, `"Auditor"`, `"Usuario"`).
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub enum Role {
    /// Full administrative access.
    Admin,
    /// Registers and routes documents.
    Gestor,
    /// Read-only oversight with reporting access.
    Auditor,
    /// Least-privileged authenticated role.
    #[default]
    Usuario,
}

impl Role {
    /// Every role, most privileged first.
    pub const ALL: [Self; 4] = [Self::Admin, Self::Gestor, Self::Auditor, Self::Usuario];

    /// Wire representation of the role.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Admin => "Admin",
            Self::Gestor => "Gestor",
            Self::Auditor => "Auditor",
            Self::Usuario => "Usuario",
        }
    }

    /// Resolve a role claim from a session or API payload.
    ///
    /// Absent, blank or unrecognised values resolve to [`Role::Usuario`];
    /// a missing role never grants elevated access.
    ///
    /// # Examples
    /// ```
    /// use doctrack::domain::Role;
    ///
    /// assert_eq!(Role::from_claim(Some("Gestor")), Role::Gestor);
    /// assert_eq!(Role::from_claim(Some("root")), Role::Usuario);
    /// assert_eq!(Role::from_claim(None), Role::Usuario);
    /// ```
    pub fn from_claim(claim: Option<&str>) -> Self {
        let Some(raw) = claim.map(str::trim).filter(|value| !value.is_empty()) else {
            return Self::Usuario;
        };
        match raw.parse() {
            Ok(role) => role,
            Err(error) => {
                warn!(%error, "unrecognised role claim; using least-privileged role");
                Self::Usuario
            }
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Parse error for [`Role`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid role: {input}")]
pub struct ParseRoleError {
    /// Raw value that failed to parse.
    pub input: String,
}

impl FromStr for Role {
    type Err = ParseRoleError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "Admin" => Ok(Self::Admin),
            "Gestor" => Ok(Self::Gestor),
            "Auditor" => Ok(Self::Auditor),
            "Usuario" => Ok(Self::Usuario),
            _ => Err(ParseRoleError {
                input: value.to_owned(),
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(Role::Admin)]
    #[case(Role::Gestor)]
    #[case(Role::Auditor)]
    #[case(Role::Usuario)]
    fn display_matches_parse(#[case] role: Role) {
        assert_eq!(role.to_string().parse::<Role>(), Ok(role));
    }

    #[rstest]
    #[case(None)]
    #[case(Some(""))]
    #[case(Some("   "))]
    #[case(Some("admin"))]
    #[case(Some("SuperUser"))]
    fn claims_fail_closed(#[case] claim: Option<&str>) {
        assert_eq!(Role::from_claim(claim), Role::Usuario);
    }

    #[rstest]
    fn default_is_least_privileged() {
        assert_eq!(Role::default(), Role::Usuario);
        assert_eq!(Role::ALL.last(), Some(&Role::default()));
    }

    #[rstest]
    fn claims_are_trimmed() {
        assert_eq!(Role::from_claim(Some(" Auditor ")), Role::Auditor);
    }

    #[rstest]
    fn strict_parse_is_case_sensitive() {
        let err = "gestor".parse::<Role>().expect_err("lowercase must fail");
        assert_eq!(err.input, "gestor");
    }
}
