//! Contains the types needed to describe a user to create.

use std::fmt::Debug;

use md5::{Digest, Md5};
use typed_builder::TypedBuilder;

use crate::error::{Error, Result};

/// The database whose users are granted cluster-wide roles.
pub(crate) const ADMIN_DB: &str = "admin";

/// A struct containing the identity of a database user: its name, the database that
/// authenticates it (its source), and its password.
///
/// Every field is optional at construction so that a `Credential` can be assembled from
/// configuration, but user administration operations reject a credential without a username or
/// a source with [`ErrorKind::InvalidArgument`](crate::error::ErrorKind::InvalidArgument) before
/// any connection is checked out.
#[derive(Clone, Default, PartialEq, TypedBuilder)]
#[builder(field_defaults(default, setter(into)))]
#[non_exhaustive]
pub struct Credential {
    /// The name of the user.
    pub username: Option<String>,

    /// The database used to authenticate the user. Users are created in this database.
    pub source: Option<String>,

    /// The password of the user.
    pub password: Option<String>,
}

impl Credential {
    /// Checks that the credential identifies a user: both `username` and `source` must be
    /// present and non-empty.
    pub fn validate(&self) -> Result<()> {
        match self.source.as_deref() {
            None => {
                return Err(Error::invalid_argument(
                    "a credential must specify the source database of the user",
                ))
            }
            Some("") => {
                return Err(Error::invalid_argument(
                    "the source database of a credential cannot be empty",
                ))
            }
            Some(_) => {}
        }

        match self.username.as_deref() {
            None | Some("") => Err(Error::invalid_argument(
                "a credential must specify a non-empty username",
            )),
            Some(_) => Ok(()),
        }
    }

    pub(crate) fn username_str(&self) -> &str {
        self.username.as_deref().unwrap_or_default()
    }

    pub(crate) fn source_str(&self) -> &str {
        self.source.as_deref().unwrap_or_default()
    }

    /// The digest stored by the server for this user, if a password was provided:
    /// `hex(md5("<username>:mongo:<password>"))`.
    pub(crate) fn password_digest(&self) -> Option<String> {
        let password = self.password.as_deref()?;
        // nosemgrep: insecure-hashes
        let mut md5 = Md5::new();
        md5.update(format!("{}:mongo:{}", self.username_str(), password));
        Some(hex::encode(md5.finalize()))
    }

    /// The built-in role matching the requested privilege tier. Users of the admin database get
    /// cluster-wide roles.
    pub(crate) fn role_name(&self, read_only: bool) -> &'static str {
        match (self.source_str() == ADMIN_DB, read_only) {
            (true, true) => "readAnyDatabase",
            (true, false) => "root",
            (false, true) => "read",
            (false, false) => "dbOwner",
        }
    }
}

impl Debug for Credential {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credential")
            .field("username", &self.username)
            .field("source", &self.source)
            .field("password", &self.password.as_ref().map(|_| "REDACTED"))
            .finish()
    }
}

#[cfg(test)]
mod test {
    use crate::error::ErrorKind;

    use super::Credential;

    fn credential(username: &str, source: &str) -> Credential {
        Credential::builder()
            .username(username.to_string())
            .source(source.to_string())
            .password("pencil".to_string())
            .build()
    }

    #[test]
    fn validate_requires_source_and_username() {
        assert!(credential("alice", "admin").validate().is_ok());

        let no_source = Credential::builder().username("alice".to_string()).build();
        let err = no_source.validate().unwrap_err();
        assert!(matches!(*err.kind, ErrorKind::InvalidArgument { .. }));

        let err = credential("alice", "").validate().unwrap_err();
        assert!(matches!(*err.kind, ErrorKind::InvalidArgument { .. }));

        let no_user = Credential::builder().source("admin".to_string()).build();
        let err = no_user.validate().unwrap_err();
        assert!(matches!(*err.kind, ErrorKind::InvalidArgument { .. }));
    }

    #[test]
    fn password_digest() {
        // md5("user:mongo:pencil")
        let cred = credential("user", "test");
        assert_eq!(
            cred.password_digest().as_deref(),
            Some("1c33006ec1ffd90f9cadcbcc0e118200")
        );

        let no_password = Credential::builder()
            .username("user".to_string())
            .source("test".to_string())
            .build();
        assert_eq!(no_password.password_digest(), None);
    }

    #[test]
    fn role_names() {
        assert_eq!(credential("alice", "admin").role_name(true), "readAnyDatabase");
        assert_eq!(credential("alice", "admin").role_name(false), "root");
        assert_eq!(credential("alice", "shop").role_name(true), "read");
        assert_eq!(credential("alice", "shop").role_name(false), "dbOwner");
    }

    #[test]
    fn debug_redacts_password() {
        let output = format!("{:?}", credential("alice", "admin"));
        assert!(output.contains("alice"));
        assert!(output.contains("REDACTED"));
        assert!(!output.contains("pencil"));
    }
}
