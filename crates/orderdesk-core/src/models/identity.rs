use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter, Result as FmtResult};
use std::str::FromStr;
use uuid::Uuid;

use crate::error::AppError;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Customer,
    Admin,
}

impl Display for Role {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        match self {
            Role::Customer => write!(f, "customer"),
            Role::Admin => write!(f, "admin"),
        }
    }
}

impl FromStr for Role {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "customer" => Ok(Role::Customer),
            "admin" => Ok(Role::Admin),
            _ => Err(anyhow::anyhow!("Invalid role: {}", s)),
        }
    }
}

/// Resolved request identity, attached by the authentication collaborator and
/// threaded explicitly into operations that need it.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Identity {
    pub user_id: Uuid,
    pub role: Role,
}

/// Role guard. An admin satisfies any requirement; anything else must match
/// exactly. An anonymous caller is rejected the same way as an insufficient
/// role.
pub fn require_role(required: Role, identity: Option<&Identity>) -> Result<&Identity, AppError> {
    let identity =
        identity.ok_or_else(|| AppError::Forbidden("authentication required".to_string()))?;
    if identity.role == Role::Admin || identity.role == required {
        Ok(identity)
    } else {
        Err(AppError::Forbidden(format!(
            "requires role: {}",
            required
        )))
    }
}
