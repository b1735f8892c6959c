//! # Actor & Authorization Gates
//!
//! The identity collaborator is external: it verifies the bearer
//! credential and hands the engines an [`Actor`]. Nothing in this
//! workspace parses tokens or touches passwords.
//!
//! Authorization is a role gate per operation:
//! - admin-only: payment review, catalog mutation, full sale listing
//! - client-only: sale creation, voucher upload
//! - owner-or-admin: sale detail reads

use serde::{Deserialize, Serialize};

use crate::error::{EngineError, EngineResult};
use movil_core::Role;

/// The authenticated actor on whose behalf an operation runs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Actor {
    /// User id as known to the identity service and the users table.
    pub id: String,
    pub role: Role,
}

impl Actor {
    /// Creates an actor. Used by the transport adapter after credential
    /// verification, and by tests.
    pub fn new(id: impl Into<String>, role: Role) -> Self {
        Actor {
            id: id.into(),
            role,
        }
    }

    /// Returns true for store staff.
    #[inline]
    pub fn is_admin(&self) -> bool {
        self.role == Role::Admin
    }

    /// Gate for admin-only operations.
    pub fn require_admin(&self) -> EngineResult<()> {
        if self.role == Role::Admin {
            Ok(())
        } else {
            Err(EngineError::Forbidden {
                required: Role::Admin,
            })
        }
    }

    /// Gate for client-only operations (buying flows).
    pub fn require_client(&self) -> EngineResult<()> {
        if self.role == Role::Client {
            Ok(())
        } else {
            Err(EngineError::Forbidden {
                required: Role::Client,
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;

    #[test]
    fn test_role_gates() {
        let admin = Actor::new("u-admin", Role::Admin);
        let client = Actor::new("u-client", Role::Client);

        assert!(admin.require_admin().is_ok());
        assert!(client.require_client().is_ok());

        let err = client.require_admin().unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Forbidden);

        let err = admin.require_client().unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Forbidden);
    }
}
