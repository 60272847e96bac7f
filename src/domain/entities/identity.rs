use std::fmt;

use crate::application::errors::IdentityError;

/// Default server for bare user identifiers
pub const DEFAULT_USER_SERVER: &str = "s.whatsapp.net";
/// Server suffix carried by group identities
pub const GROUP_SERVER: &str = "g.us";

/// Server half of a resolved identity
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Server {
    User,
    Group,
    Custom(String),
}

impl Server {
    pub fn from_wire(s: &str) -> Self {
        match s {
            DEFAULT_USER_SERVER => Server::User,
            GROUP_SERVER => Server::Group,
            other => Server::Custom(other.to_string()),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            Server::User => DEFAULT_USER_SERVER,
            Server::Group => GROUP_SERVER,
            Server::Custom(s) => s,
        }
    }
}

/// A resolved recipient/participant reference (user@server)
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Identity {
    pub user: String,
    pub server: Server,
}

impl Identity {
    pub fn new(user: impl Into<String>, server: Server) -> Self {
        Self {
            user: user.into(),
            server,
        }
    }

    /// Resolve a free-form textual identifier into an identity.
    ///
    /// A single leading `+` is stripped. Input without an `@` is taken
    /// verbatim as a user on the default server. Input with an `@` must
    /// carry a non-empty user part and a well-formed server.
    pub fn resolve(raw: &str) -> Result<Self, IdentityError> {
        let trimmed = raw.strip_prefix('+').unwrap_or(raw);

        let Some((user, server)) = trimmed.split_once('@') else {
            if trimmed.is_empty() {
                let err = IdentityError::MissingUser {
                    raw: raw.to_string(),
                };
                tracing::error!("{}", err);
                return Err(err);
            }
            return Ok(Identity::new(trimmed, Server::User));
        };

        if server.contains('@') || server.is_empty() {
            let err = IdentityError::Parse {
                raw: raw.to_string(),
                reason: "malformed server part".to_string(),
            };
            tracing::error!("{}", err);
            return Err(err);
        }
        if user.is_empty() {
            let err = IdentityError::MissingUser {
                raw: raw.to_string(),
            };
            tracing::error!("{}", err);
            return Err(err);
        }

        Ok(Identity::new(user, Server::from_wire(server)))
    }

    pub fn is_group(&self) -> bool {
        self.server == Server::Group
    }
}

impl fmt::Display for Identity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}@{}", self.user, self.server.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bare_number_defaults_to_user_server() {
        let id = Identity::resolve("5511999887766").unwrap();
        assert_eq!(id.user, "5511999887766");
        assert_eq!(id.server, Server::User);
        assert_eq!(id.to_string(), "5511999887766@s.whatsapp.net");
    }

    #[test]
    fn leading_plus_is_stripped() {
        let id = Identity::resolve("+5511999887766").unwrap();
        assert_eq!(id.user, "5511999887766");
        assert_eq!(id.server, Server::User);
    }

    #[test]
    fn explicit_group_server_is_recognized() {
        let id = Identity::resolve("123456789-987654@g.us").unwrap();
        assert!(id.is_group());
        assert_eq!(id.user, "123456789-987654");
    }

    #[test]
    fn custom_server_is_preserved() {
        let id = Identity::resolve("alice@broadcast").unwrap();
        assert_eq!(id.server, Server::Custom("broadcast".to_string()));
        assert_eq!(id.to_string(), "alice@broadcast");
    }

    #[test]
    fn empty_user_part_fails() {
        assert!(Identity::resolve("@g.us").is_err());
        assert!(Identity::resolve("+@s.whatsapp.net").is_err());
    }

    #[test]
    fn double_at_fails() {
        assert!(Identity::resolve("a@b@c").is_err());
    }

    #[test]
    fn empty_server_fails() {
        assert!(Identity::resolve("5511999@").is_err());
    }

    #[test]
    fn non_numeric_user_without_server_still_resolves() {
        // no structural validation happens in the default-server branch
        let id = Identity::resolve("not-a-number").unwrap();
        assert_eq!(id.user, "not-a-number");
        assert_eq!(id.server, Server::User);
    }
}
