//! Role classes used for authorization and token selection.

use core::fmt;

use serde::{Deserialize, Serialize};

/// A user's role class.
///
/// Roles drive both authorization and bearer-token selection: each role class
/// is issued one fixed token for the lifetime of the process. The role state
/// machine is strict: registration always yields [`Role::User`], `admin` is
/// assigned only by a super-admin, and `katta_admin` is seeded exactly once
/// and can never be created or deleted through the API.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    /// Regular registered user.
    #[default]
    User,
    /// Administrator (managed by the super-admin).
    Admin,
    /// Super-admin. Seeded once at startup, immutable afterwards.
    KattaAdmin,
}

impl Role {
    /// Parse a role from its wire representation.
    #[must_use]
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "user" => Some(Self::User),
            "admin" => Some(Self::Admin),
            "katta_admin" => Some(Self::KattaAdmin),
            _ => None,
        }
    }

    /// Wire representation of the role.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::User => "user",
            Self::Admin => "admin",
            Self::KattaAdmin => "katta_admin",
        }
    }

    /// Whether this role belongs to the admin tier (admin or super-admin).
    #[must_use]
    pub const fn is_admin_tier(self) -> bool {
        matches!(self, Self::Admin | Self::KattaAdmin)
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
