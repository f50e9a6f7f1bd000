//! The mail-store operations a run needs.
//!
//! [`MailSession`] is the seam between the routing logic and the wire. It
//! is implemented for [`mailsort_imap::Session`] here and by in-memory
//! recorders in the tests.

use mailsort_imap::{ListResponse, Session, Uid};
use tokio::io::{AsyncRead, AsyncWrite};

/// Error reported by the mail store.
pub type TransportError = mailsort_imap::Error;

/// Result of a mail-store operation.
pub type TransportResult<T> = std::result::Result<T, TransportError>;

/// One inbox message as captured at scan time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MailItem {
    /// Server-assigned UID in the scanned mailbox.
    pub uid: Uid,
    /// Raw delivery-address header value; empty when absent.
    pub header: String,
}

impl MailItem {
    /// Creates a mail item.
    #[must_use]
    pub fn new(uid: Uid, header: impl Into<String>) -> Self {
        Self {
            uid,
            header: header.into(),
        }
    }
}

/// An authenticated connection to one mail store.
///
/// Every call is one awaited round trip. The session is released with
/// [`close`](MailSession::close), which consumes it.
#[allow(async_fn_in_trait)]
pub trait MailSession {
    /// Lists the full folder tree.
    async fn list_folders(&mut self) -> TransportResult<Vec<ListResponse>>;

    /// Lists every message in `mailbox` with the value of `header`, in
    /// ascending UID order.
    async fn list_messages(&mut self, mailbox: &str, header: &str)
    -> TransportResult<Vec<MailItem>>;

    /// Creates a folder by its full path.
    async fn create_folder(&mut self, path: &str) -> TransportResult<()>;

    /// Moves one message from `from` to the folder at path `to`.
    async fn move_message(&mut self, from: &str, uid: Uid, to: &str) -> TransportResult<()>;

    /// Ends the session.
    async fn close(self) -> TransportResult<()>
    where
        Self: Sized;
}

impl<S> MailSession for Session<S>
where
    S: AsyncRead + AsyncWrite + Unpin,
{
    async fn list_folders(&mut self) -> TransportResult<Vec<ListResponse>> {
        Self::list_folders(self).await
    }

    async fn list_messages(
        &mut self,
        mailbox: &str,
        header: &str,
    ) -> TransportResult<Vec<MailItem>> {
        let fields = self.fetch_header_field(mailbox, header).await?;
        Ok(fields
            .into_iter()
            .map(|field| MailItem::new(field.uid, field.value))
            .collect())
    }

    async fn create_folder(&mut self, path: &str) -> TransportResult<()> {
        self.create(path).await
    }

    async fn move_message(&mut self, from: &str, uid: Uid, to: &str) -> TransportResult<()> {
        Self::move_message(self, from, uid, to).await
    }

    async fn close(self) -> TransportResult<()> {
        self.logout().await
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::time::Duration;

    use tokio_test::io::Builder;

    use super::*;

    #[tokio::test]
    async fn test_imap_session_lists_messages_as_mail_items() {
        let mock = Builder::new()
            .read(b"* OK ready\r\n")
            .write(b"A0000 LOGIN u p\r\n")
            .read(b"A0000 OK [CAPABILITY IMAP4rev1] Logged in\r\n")
            .write(b"A0001 SELECT INBOX\r\n")
            .read(b"* 1 EXISTS\r\n")
            .read(b"A0001 OK [READ-WRITE] Select completed\r\n")
            .write(b"A0002 UID FETCH 1:* (UID BODY.PEEK[HEADER.FIELDS (ENVELOPE-TO)])\r\n")
            .read(b"* 1 FETCH (UID 3 BODY[HEADER.FIELDS (ENVELOPE-TO)] {24}\r\n")
            .read(b"Envelope-To: z@q.net\r\n\r\n)\r\n")
            .read(b"A0002 OK Fetch completed\r\n")
            .write(b"A0003 LOGOUT\r\n")
            .read(b"A0003 OK Logout completed\r\n")
            .build();

        let mut session = Session::login(mock, "u", "p", Duration::from_secs(5))
            .await
            .unwrap();
        let items = MailSession::list_messages(&mut session, "INBOX", "Envelope-To")
            .await
            .unwrap();

        assert_eq!(items, vec![MailItem::new(Uid::new(3).unwrap(), "z@q.net")]);
        MailSession::close(session).await.unwrap();
    }
}
