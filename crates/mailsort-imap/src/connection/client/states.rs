//! Connection states, used as the second type parameter of
//! [`Client`](super::Client).

use crate::types::MailboxStatus;

/// Greeting received, not logged in yet.
#[derive(Debug, Clone, Copy, Default)]
pub struct NotAuthenticated;

/// Logged in, no mailbox open.
#[derive(Debug, Clone, Copy, Default)]
pub struct Authenticated;

/// Logged in with a mailbox open.
#[derive(Debug, Clone)]
pub struct Selected {
    pub(crate) mailbox: String,
    pub(crate) status: MailboxStatus,
}

impl Selected {
    /// Name of the open mailbox.
    #[must_use]
    pub fn mailbox(&self) -> &str {
        &self.mailbox
    }

    /// What SELECT reported.
    #[must_use]
    pub const fn status(&self) -> &MailboxStatus {
        &self.status
    }
}

/// Either logged-in state. LIST, CREATE and SELECT are available in both.
pub trait LoggedIn: private::Sealed {}

impl LoggedIn for Authenticated {}
impl LoggedIn for Selected {}

mod private {
    pub trait Sealed {}

    impl Sealed for super::Authenticated {}
    impl Sealed for super::Selected {}
}
