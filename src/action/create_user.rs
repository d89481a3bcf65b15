use futures_util::{future::BoxFuture, FutureExt};
use tokio_util::sync::CancellationToken;

use crate::{
    cmap::{AsyncConnection, AsyncWriteBinding, Connection, WriteBinding},
    error::{Error, Result},
    executor,
    operation::{self, remove_empty_write_concern},
    options::{CreateUserOptions, Credential},
};

/// Creates a database user from a [`Credential`], granting it either read-only or full access.
///
/// The user is created in the credential's source database. Users of the `admin` database are
/// granted cluster-wide roles (`readAnyDatabase` or `root`), users of any other database are
/// granted roles on that database only (`read` or `dbOwner`).
///
/// Whether the user is created with the `createUser` command or by inserting into the source's
/// `system.users` collection is decided on every execution, from the wire version of the
/// connection the binding hands out. Servers older than 2.6 only support the latter.
///
/// ```rust
/// # use mongodb_user_admin::{
/// #     action::CreateUser,
/// #     error::Result,
/// #     options::{CreateUserOptions, Credential, WriteConcern},
/// # };
/// # fn wrapper() -> Result<()> {
/// let credential = Credential::builder()
///     .username("reporting".to_string())
///     .source("sales".to_string())
///     .password("hunter2".to_string())
///     .build();
/// let create_user = CreateUser::new(credential, true)?.with_options(
///     CreateUserOptions::builder()
///         .write_concern(WriteConcern::majority())
///         .build(),
/// )?;
/// assert!(create_user.is_read_only());
/// # Ok(())
/// # }
/// ```
#[derive(Clone, Debug)]
pub struct CreateUser {
    credential: Credential,
    read_only: bool,
    options: Option<CreateUserOptions>,
}

impl CreateUser {
    /// Constructs the operation. Fails with
    /// [`ErrorKind::InvalidArgument`](crate::error::ErrorKind::InvalidArgument) if the
    /// credential lacks a username or a source.
    pub fn new(credential: Credential, read_only: bool) -> Result<Self> {
        credential.validate()?;
        Ok(Self {
            credential,
            read_only,
            options: None,
        })
    }

    /// Replaces the options of this operation. The write concern must be valid and acknowledged.
    pub fn with_options(mut self, options: impl Into<Option<CreateUserOptions>>) -> Result<Self> {
        let mut options = options.into();
        if let Some(write_concern) = options.as_ref().and_then(|o| o.write_concern.as_ref()) {
            write_concern.validate()?;
            if !write_concern.is_acknowledged() {
                return Err(Error::invalid_argument(
                    "user creation requires an acknowledged write concern",
                ));
            }
        }
        remove_empty_write_concern!(options);
        self.options = options;
        Ok(self)
    }

    /// The credential describing the user to create.
    pub fn credential(&self) -> &Credential {
        &self.credential
    }

    /// Whether the user is granted read-only access.
    pub fn is_read_only(&self) -> bool {
        self.read_only
    }

    /// The options of this operation, if any were set.
    pub fn options(&self) -> Option<&CreateUserOptions> {
        self.options.as_ref()
    }

    /// Creates the user, blocking the calling thread for the connection check-out and the round
    /// trip. The connection is checked back in before this returns.
    pub fn execute<B>(&self, binding: &B) -> Result<()>
    where
        B: WriteBinding,
        B::Connection: Connection,
    {
        executor::execute_operation(binding, self.operation())
    }

    /// Creates the user without blocking. The returned future resolves once the connection has
    /// been checked back in; dropping it early also checks in any connection it holds.
    pub fn execute_async<'a, B>(&'a self, binding: &'a B) -> BoxFuture<'a, Result<()>>
    where
        B: AsyncWriteBinding,
        B::Connection: AsyncConnection,
    {
        self.execute_async_with_cancellation(binding, CancellationToken::new())
    }

    /// Like [`CreateUser::execute_async`], but resolves to
    /// [`ErrorKind::Cancelled`](crate::error::ErrorKind::Cancelled) if `cancellation` is
    /// cancelled before the server's reply arrives.
    pub fn execute_async_with_cancellation<'a, B>(
        &'a self,
        binding: &'a B,
        cancellation: CancellationToken,
    ) -> BoxFuture<'a, Result<()>>
    where
        B: AsyncWriteBinding,
        B::Connection: AsyncConnection,
    {
        executor::execute_operation_async(binding, self.operation(), cancellation).boxed()
    }

    fn operation(&self) -> operation::CreateUser<'_> {
        operation::CreateUser::new(&self.credential, self.read_only, self.options.as_ref())
    }
}
