use crate::{Role, User};

/// Per-request identity, attached by the verifier and refined by the gate.
#[derive(Debug, Clone, Default)]
pub struct RequestContext {
    pub principal: Option<User>,
    /// Set only by [`RoleGate`](super::RoleGate) after a successful check.
    pub granted_role: Option<Role>,
}

impl RequestContext {
    pub fn anonymous() -> Self {
        Self::default()
    }

    pub fn authenticated(user: User) -> Self {
        Self {
            principal: Some(user),
            granted_role: None,
        }
    }

    pub fn principal(&self) -> Option<&User> {
        self.principal.as_ref()
    }

    pub fn is_authenticated(&self) -> bool {
        self.principal.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_anonymous_has_no_principal() {
        let ctx = RequestContext::anonymous();
        assert!(!ctx.is_authenticated());
        assert!(ctx.granted_role.is_none());
    }

    #[test]
    fn test_authenticated_does_not_grant_role() {
        let user = User::mock().with_role(Role::Admin);
        let ctx = RequestContext::authenticated(user.clone());
        assert_eq!(ctx.principal().map(|u| u.id), Some(user.id));
        assert!(ctx.granted_role.is_none());
    }
}
