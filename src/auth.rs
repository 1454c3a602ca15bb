//! Accountability resolution for WebSocket connections.
//!
//! A connection's accountability is resolved once, at the handshake, from
//! the `access_token` query parameter. The logs channel reads the admin
//! flag on every control message; an absent context always means "not
//! administrator". Privilege revocation is not re-checked against already
//! active subscriptions.

/// Authorization context attached to a connection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Accountability {
    /// Whether the caller holds administrative privilege.
    pub admin: bool,
    /// Optional user label, used only for logging.
    pub user: Option<String>,
}

/// Resolves a connection's accountability from its presented token.
///
/// - No token presented: no resolvable context (`None`).
/// - Token matches the configured admin token: administrator.
/// - Token presented but unknown: authenticated-but-unprivileged context.
#[must_use]
pub fn resolve(token: Option<&str>, admin_token: Option<&str>) -> Option<Accountability> {
    let token = token?;
    if admin_token.is_some_and(|admin| admin == token) {
        return Some(Accountability {
            admin: true,
            user: Some("admin".to_string()),
        });
    }
    Some(Accountability {
        admin: false,
        user: None,
    })
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use super::*;

    #[test]
    fn absent_token_resolves_to_nothing() {
        assert_eq!(resolve(None, Some("secret")), None);
    }

    #[test]
    fn matching_token_is_admin() {
        let Some(acc) = resolve(Some("secret"), Some("secret")) else {
            panic!("expected a context");
        };
        assert!(acc.admin);
    }

    #[test]
    fn unknown_token_is_not_admin() {
        let Some(acc) = resolve(Some("other"), Some("secret")) else {
            panic!("expected a context");
        };
        assert!(!acc.admin);
    }

    #[test]
    fn no_configured_admin_token_grants_nobody() {
        let Some(acc) = resolve(Some("secret"), None) else {
            panic!("expected a context");
        };
        assert!(!acc.admin);
    }
}
