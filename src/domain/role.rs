//! Role hierarchy and capability resolution
//!
//! Roles form a total order (viewer < editor < admin < owner) and every
//! authority comparison in the crate goes through [`TeamRole::outranks`],
//! a single strict comparison rather than scattered boolean checks.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

/// An atomic permission composed into role capability sets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize, Hash)]
#[serde(rename_all = "kebab-case")]
pub enum Capability {
    View,
    Comment,
    Edit,
    ManageMembers,
    ManageShares,
}

/// Role of a user within a team.
///
/// Each tier inherits the capabilities of the tiers below it:
/// viewer+ gets {view, comment}, editor+ adds {edit}, admin+ adds
/// {manage-members, manage-shares}. Owner adds no extra capability but
/// outranks every other role.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, Default,
)]
#[serde(rename_all = "snake_case")]
pub enum TeamRole {
    /// Read-only access
    #[default]
    Viewer = 1,

    /// Can create and edit content
    Editor = 2,

    /// Can manage members and shares
    Admin = 3,

    /// Full team control; exactly one per team
    Owner = 4,
}

impl TeamRole {
    /// The capability set for this role.
    pub fn capabilities(&self) -> BTreeSet<Capability> {
        let mut caps = BTreeSet::from([Capability::View, Capability::Comment]);

        if *self >= TeamRole::Editor {
            caps.insert(Capability::Edit);
        }

        if *self >= TeamRole::Admin {
            caps.insert(Capability::ManageMembers);
            caps.insert(Capability::ManageShares);
        }

        caps
    }

    /// Check if this role includes a capability.
    pub fn has_capability(&self, capability: Capability) -> bool {
        self.capabilities().contains(&capability)
    }

    /// Strict authority comparison: equal roles never outrank each other.
    ///
    /// A user may only invite, assign, or modify roles strictly below
    /// their own.
    pub fn outranks(&self, other: TeamRole) -> bool {
        *self > other
    }

    /// Parse role from string representation (case-insensitive).
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "viewer" => Some(Self::Viewer),
            "editor" => Some(Self::Editor),
            "admin" => Some(Self::Admin),
            "owner" => Some(Self::Owner),
            _ => None,
        }
    }

    /// Lowercase string representation.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Viewer => "viewer",
            Self::Editor => "editor",
            Self::Admin => "admin",
            Self::Owner => "owner",
        }
    }
}

impl std::fmt::Display for TeamRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
