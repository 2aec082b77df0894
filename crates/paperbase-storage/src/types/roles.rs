//! Role and plan enumerations for workspace membership and billing.

use std::str::FromStr;

/// Role of a member within a workspace
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Role {
    Owner,  // Full control, can delete the workspace
    Admin,  // Manage members and invites, but not ownership
    Member, // Regular access
    Guest,  // Restricted access
}

/// Error type for parsing Role from string
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseRoleError(pub String);

impl std::fmt::Display for ParseRoleError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "invalid role: {}", self.0)
    }
}

impl std::error::Error for ParseRoleError {}

impl FromStr for Role {
    type Err = ParseRoleError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "owner" => Ok(Role::Owner),
            "admin" => Ok(Role::Admin),
            "member" => Ok(Role::Member),
            "guest" => Ok(Role::Guest),
            _ => Err(ParseRoleError(s.to_string())),
        }
    }
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Owner => "owner",
            Role::Admin => "admin",
            Role::Member => "member",
            Role::Guest => "guest",
        }
    }

    /// Check if this role has at least the permissions of another role
    pub fn includes(&self, other: &Role) -> bool {
        match self {
            Role::Owner => true, // Owner includes all permissions
            Role::Admin => matches!(other, Role::Admin | Role::Member | Role::Guest),
            Role::Member => matches!(other, Role::Member | Role::Guest),
            Role::Guest => matches!(other, Role::Guest),
        }
    }
}

/// Billing plan tier
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Plan {
    Free,
    Pro,
    Enterprise,
}

impl FromStr for Plan {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "free" => Ok(Plan::Free),
            "pro" => Ok(Plan::Pro),
            "enterprise" => Ok(Plan::Enterprise),
            _ => Err(format!("invalid plan: {}", s)),
        }
    }
}

impl Plan {
    pub fn as_str(&self) -> &'static str {
        match self {
            Plan::Free => "free",
            Plan::Pro => "pro",
            Plan::Enterprise => "enterprise",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn role_includes_owner() {
        // Owner includes all roles
        assert!(Role::Owner.includes(&Role::Owner));
        assert!(Role::Owner.includes(&Role::Admin));
        assert!(Role::Owner.includes(&Role::Member));
        assert!(Role::Owner.includes(&Role::Guest));
    }

    #[test]
    fn role_includes_admin() {
        // Admin includes everything below it, but not Owner
        assert!(!Role::Admin.includes(&Role::Owner));
        assert!(Role::Admin.includes(&Role::Admin));
        assert!(Role::Admin.includes(&Role::Member));
        assert!(Role::Admin.includes(&Role::Guest));
    }

    #[test]
    fn role_includes_guest() {
        // Guest only includes Guest
        assert!(!Role::Guest.includes(&Role::Owner));
        assert!(!Role::Guest.includes(&Role::Admin));
        assert!(!Role::Guest.includes(&Role::Member));
        assert!(Role::Guest.includes(&Role::Guest));
    }

    #[test]
    fn role_roundtrip() {
        for role in [Role::Owner, Role::Admin, Role::Member, Role::Guest] {
            let parsed: Role = role.as_str().parse().unwrap();
            assert_eq!(role, parsed);
        }
    }

    #[test]
    fn role_parse_invalid() {
        assert!("invalid".parse::<Role>().is_err());
        assert!("Owner".parse::<Role>().is_err()); // Case sensitive
        assert!("".parse::<Role>().is_err());
    }

    #[test]
    fn plan_roundtrip() {
        for plan in [Plan::Free, Plan::Pro, Plan::Enterprise] {
            let parsed: Plan = plan.as_str().parse().unwrap();
            assert_eq!(plan, parsed);
        }
    }

    #[test]
    fn parse_role_error_display() {
        let err = ParseRoleError("unknown".to_string());
        assert!(err.to_string().contains("unknown"));
    }
}
