use super::RequestContext;
use crate::{AuthError, Role};

/// Allow-list of roles declared per route group.
///
/// Membership is exact; no role implies another.
#[derive(Debug, Clone)]
pub struct RoleGate {
    allowed: Vec<Role>,
}

impl RoleGate {
    pub fn new(roles: impl IntoIterator<Item = Role>) -> Self {
        let mut allowed: Vec<Role> = Vec::new();
        for role in roles {
            if !allowed.contains(&role) {
                allowed.push(role);
            }
        }
        Self { allowed }
    }

    pub fn allows(&self, role: Role) -> bool {
        self.allowed.contains(&role)
    }

    pub fn roles(&self) -> &[Role] {
        &self.allowed
    }

    /// Admits the context's principal or rejects the request.
    ///
    /// Returns `Unauthenticated` when no principal is attached and `Forbidden`
    /// when its role is not in the allow-list. On success `granted_role` is set.
    pub fn authorize(&self, ctx: &mut RequestContext) -> Result<(), AuthError> {
        let Some(user) = ctx.principal.as_ref() else {
            log::debug!(target: "portfolio_auth", "msg=\"role gate reached without principal\"");
            return Err(AuthError::Unauthenticated);
        };

        if !self.allows(user.role) {
            log::warn!(
                target: "portfolio_auth",
                "msg=\"role not allowed\" user_id={} role={}",
                user.id,
                user.role
            );
            return Err(AuthError::Forbidden);
        }

        ctx.granted_role = Some(user.role);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::User;

    #[test]
    fn test_allowed_role_is_granted() {
        let gate = RoleGate::new([Role::Admin, Role::Editor]);
        let mut ctx = RequestContext::authenticated(User::mock().with_role(Role::Editor));

        gate.authorize(&mut ctx).unwrap();
        assert_eq!(ctx.granted_role, Some(Role::Editor));
    }

    #[test]
    fn test_disallowed_role_is_forbidden() {
        let gate = RoleGate::new([Role::Admin]);
        let mut ctx = RequestContext::authenticated(User::mock().with_role(Role::User));

        assert_eq!(gate.authorize(&mut ctx).unwrap_err(), AuthError::Forbidden);
        assert!(ctx.granted_role.is_none());
    }

    #[test]
    fn test_roles_are_flat() {
        let gate = RoleGate::new([Role::Editor]);
        let mut ctx = RequestContext::authenticated(User::mock().with_role(Role::Admin));

        assert_eq!(gate.authorize(&mut ctx).unwrap_err(), AuthError::Forbidden);
    }

    #[test]
    fn test_missing_principal_is_unauthenticated() {
        let gate = RoleGate::new([Role::Admin]);
        let mut ctx = RequestContext::anonymous();

        assert_eq!(gate.authorize(&mut ctx).unwrap_err(), AuthError::Unauthenticated);
    }

    #[test]
    fn test_empty_gate_rejects_everyone() {
        let gate = RoleGate::new(Vec::<Role>::new());
        let mut ctx = RequestContext::authenticated(User::mock().with_role(Role::Admin));

        assert_eq!(gate.authorize(&mut ctx).unwrap_err(), AuthError::Forbidden);
    }

    #[test]
    fn test_duplicates_collapse() {
        let gate = RoleGate::new([Role::Admin, Role::Admin, Role::Editor]);
        assert_eq!(gate.roles(), &[Role::Admin, Role::Editor]);
    }
}
