use serde::{Deserialize, Serialize};
use std::str::FromStr;
use uuid::Uuid;

use crate::errors::{BazaarError, BazaarResult};

/// Role tag carried by every authenticated caller.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    Admin,
    Vendor,
    User,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Admin => "admin",
            Role::Vendor => "vendor",
            Role::User => "user",
        }
    }
}

impl FromStr for Role {
    type Err = BazaarError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "admin" => Ok(Role::Admin),
            "vendor" => Ok(Role::Vendor),
            "user" => Ok(Role::User),
            other => Err(BazaarError::Validation(format!("Unknown role: {}", other))),
        }
    }
}

/// The authenticated caller attached to a request context.
///
/// Handlers authorize against this one type instead of probing for separate
/// user/vendor/admin identities.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Principal {
    pub account_id: Uuid,
    pub role: Role,
}

impl Principal {
    pub fn is_admin(&self) -> bool {
        self.role == Role::Admin
    }

    pub fn require_admin(&self) -> BazaarResult<()> {
        if self.is_admin() {
            Ok(())
        } else {
            Err(BazaarError::Authorization(
                "Administrator role required".to_string(),
            ))
        }
    }

    pub fn require_vendor(&self) -> BazaarResult<()> {
        if self.role == Role::Vendor {
            Ok(())
        } else {
            Err(BazaarError::Authorization(
                "Vendor role required".to_string(),
            ))
        }
    }

    /// Admins may act on any vendor's resources; vendors only on their own.
    pub fn may_manage_vendor(&self, vendor_id: Uuid) -> bool {
        self.is_admin() || (self.role == Role::Vendor && self.account_id == vendor_id)
    }
}
