use std::fmt;

/// The collection that pre-2.6 servers keep user documents in.
pub(crate) const SYSTEM_USERS_COLLECTION: &str = "system.users";

/// A struct modeling the canonical name for a collection in MongoDB.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Namespace {
    /// The name of the database associated with this namespace.
    pub db: String,

    /// The name of the collection this namespace corresponds to.
    pub coll: String,
}

impl Namespace {
    /// Construct a `Namespace` with the given database and collection.
    pub fn new(db: impl Into<String>, coll: impl Into<String>) -> Self {
        Self {
            db: db.into(),
            coll: coll.into(),
        }
    }

    /// The `system.users` collection of the given database.
    pub(crate) fn system_users(db: impl Into<String>) -> Self {
        Self::new(db, SYSTEM_USERS_COLLECTION)
    }
}

impl fmt::Display for Namespace {
    fn fmt(&self, fmt: &mut fmt::Formatter) -> fmt::Result {
        write!(fmt, "{}.{}", self.db, self.coll)
    }
}
