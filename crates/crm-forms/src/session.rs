//! Session context passed to forms.
//!
//! Forms never read tenant or user identity from ambient storage; the
//! host hands them a [`SessionContext`].

use std::fmt;

use serde::{Deserialize, Serialize};

/// Identifier of the tenant a record is created under.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TenantId(pub i64);

impl fmt::Display for TenantId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Identifier of the signed-in user.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UserId(pub i64);

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Read-only view of the current session.
pub trait SessionContext {
    /// Returns the current tenant, if any.
    fn tenant_id(&self) -> Option<TenantId>;

    /// Returns the signed-in user, if any.
    fn user_id(&self) -> Option<UserId>;
}

/// Session context holding fixed identifiers.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StaticSession {
    /// Tenant ID if known.
    pub tenant_id: Option<TenantId>,
    /// User ID if authenticated.
    pub user_id: Option<UserId>,
}

impl StaticSession {
    /// Creates a session for a user within a tenant.
    pub const fn new(tenant_id: TenantId, user_id: UserId) -> Self {
        Self {
            tenant_id: Some(tenant_id),
            user_id: Some(user_id),
        }
    }

    /// Creates a session with no tenant and no user.
    pub const fn anonymous() -> Self {
        Self {
            tenant_id: None,
            user_id: None,
        }
    }
}

impl SessionContext for StaticSession {
    fn tenant_id(&self) -> Option<TenantId> {
        self.tenant_id
    }

    fn user_id(&self) -> Option<UserId> {
        self.user_id
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_static_session() {
        let session = StaticSession::new(TenantId(3), UserId(7));
        assert_eq!(session.tenant_id(), Some(TenantId(3)));
        assert_eq!(session.user_id(), Some(UserId(7)));

        let anonymous = StaticSession::anonymous();
        assert_eq!(anonymous, StaticSession::default());
        assert_eq!(anonymous.tenant_id(), None);
    }

    #[test]
    fn test_session_from_json() {
        let session: StaticSession =
            serde_json::from_str(r#"{"tenant_id": 12, "user_id": null}"#).unwrap();
        assert_eq!(session.tenant_id, Some(TenantId(12)));
        assert_eq!(session.user_id, None);
        assert_eq!(TenantId(12).to_string(), "12");
    }
}
