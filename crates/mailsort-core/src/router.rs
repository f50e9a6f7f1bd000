//! Per-message routing.

use mailsort_imap::Uid;

use crate::catalog::FolderCatalog;
use crate::envelope::folder_name;
use crate::transport::{MailItem, MailSession, TransportError};

/// The step at which routing a message failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RouteStage {
    /// Creating the target folder.
    CreateFolder,
    /// Moving the message.
    Move,
}

impl std::fmt::Display for RouteStage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::CreateFolder => f.write_str("create folder"),
            Self::Move => f.write_str("move"),
        }
    }
}

/// What happened to one message.
#[derive(Debug)]
pub enum RouteOutcome {
    /// The message was moved into `folder`.
    Moved {
        /// Message UID in the scanned mailbox.
        uid: Uid,
        /// Target folder name, lower-cased.
        folder: String,
    },
    /// No folder name could be derived; the message was left in place.
    Skipped {
        /// Message UID in the scanned mailbox.
        uid: Uid,
    },
    /// The message stays in place because a server call failed.
    Failed {
        /// Message UID in the scanned mailbox.
        uid: Uid,
        /// Target folder name, lower-cased.
        folder: String,
        /// Step that failed.
        stage: RouteStage,
        /// Error reported by the server or the connection.
        error: TransportError,
    },
}

impl RouteOutcome {
    /// UID of the message this outcome is about.
    #[must_use]
    pub const fn uid(&self) -> Uid {
        match self {
            Self::Moved { uid, .. } | Self::Skipped { uid } | Self::Failed { uid, .. } => *uid,
        }
    }

    /// Returns true for [`RouteOutcome::Moved`].
    #[must_use]
    pub const fn is_moved(&self) -> bool {
        matches!(self, Self::Moved { .. })
    }

    /// Returns true for [`RouteOutcome::Failed`].
    #[must_use]
    pub const fn is_failed(&self) -> bool {
        matches!(self, Self::Failed { .. })
    }
}

/// Routes one message out of `inbox`.
///
/// Never fails: errors from folder creation or the move are captured in the
/// returned outcome, and nothing is retried or rolled back.
pub async fn route<M: MailSession>(
    session: &mut M,
    catalog: &mut FolderCatalog,
    inbox: &str,
    item: &MailItem,
) -> RouteOutcome {
    let uid = item.uid;
    let folder = folder_name(&item.header);
    if folder.is_empty() {
        tracing::warn!(%uid, header = %item.header, "no folder name, leaving message in place");
        return RouteOutcome::Skipped { uid };
    }

    let path = match catalog.ensure(session, &folder).await {
        Ok(path) => path,
        Err(error) => {
            tracing::warn!(%uid, %folder, %error, "failed to create folder");
            return RouteOutcome::Failed {
                uid,
                folder,
                stage: RouteStage::CreateFolder,
                error,
            };
        }
    };

    match session.move_message(inbox, uid, &path).await {
        Ok(()) => {
            tracing::info!(%uid, %folder, "moved message");
            RouteOutcome::Moved { uid, folder }
        }
        Err(error) => {
            tracing::warn!(%uid, %folder, %error, "failed to move message");
            RouteOutcome::Failed {
                uid,
                folder,
                stage: RouteStage::Move,
                error,
            }
        }
    }
}
