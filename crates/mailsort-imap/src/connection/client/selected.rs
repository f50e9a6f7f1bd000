//! Implementation for the selected state.

use tokio::io::{AsyncRead, AsyncWrite};

use super::Client;
use super::states::Selected;
use crate::Result;
use crate::command::{Command, FetchAttribute};
use crate::parser::{FetchItem, Response, ResponseParser, UntaggedResponse};
use crate::types::{Flag, Mailbox, SeqNum, UidSet};

impl<S> Client<S, Selected>
where
    S: AsyncRead + AsyncWrite + Unpin,
{
    /// Returns the selected mailbox name.
    #[must_use]
    pub fn mailbox(&self) -> &str {
        self.state.mailbox()
    }

    /// Returns the selected-mailbox state.
    #[must_use]
    pub const fn selected(&self) -> &Selected {
        &self.state
    }

    /// Fetches message data by UID.
    ///
    /// Returns a (sequence number, fetch items) pair per FETCH response.
    pub async fn uid_fetch(
        &mut self,
        uids: &UidSet,
        items: Vec<FetchAttribute>,
    ) -> Result<Vec<(SeqNum, Vec<FetchItem>)>> {
        let responses = self
            .execute(&Command::UidFetch {
                uids: *uids,
                items,
            })
            .await?;

        Ok(responses
            .iter()
            .filter_map(|bytes| match ResponseParser::parse(bytes) {
                Ok(Response::Untagged(UntaggedResponse::Fetch { seq, items })) => {
                    Some((seq, items))
                }
                Ok(_) => None,
                Err(e) => {
                    tracing::debug!(error = %e, "skipping unparsable FETCH data");
                    None
                }
            })
            .collect())
    }

    /// Adds flags by UID without asking for the new flags back.
    pub async fn uid_add_flags(&mut self, uids: &UidSet, flags: Vec<Flag>) -> Result<()> {
        self.execute(&Command::UidAddFlags {
            uids: *uids,
            flags,
        })
        .await
        .map(drop)
    }

    /// Copies messages to another mailbox by UID.
    pub async fn uid_copy(&mut self, uids: &UidSet, mailbox: &str) -> Result<()> {
        self.execute(&Command::UidCopy {
            uids: *uids,
            mailbox: Mailbox::new(mailbox),
        })
        .await
        .map(drop)
    }

    /// Moves messages to another mailbox by UID.
    ///
    /// Requires the MOVE capability (RFC 6851).
    pub async fn uid_move(&mut self, uids: &UidSet, mailbox: &str) -> Result<()> {
        self.execute(&Command::UidMove {
            uids: *uids,
            mailbox: Mailbox::new(mailbox),
        })
        .await
        .map(drop)
    }

    /// Removes `\Deleted` messages among `uids` only.
    ///
    /// Requires the UIDPLUS capability (RFC 4315).
    pub async fn uid_expunge(&mut self, uids: &UidSet) -> Result<()> {
        self.execute(&Command::UidExpunge { uids: *uids })
            .await
            .map(drop)
    }

    /// Permanently removes every message marked `\Deleted`.
    ///
    /// Returns the sequence numbers of expunged messages.
    pub async fn expunge(&mut self) -> Result<Vec<SeqNum>> {
        let responses = self.execute(&Command::Expunge).await?;

        Ok(responses
            .iter()
            .filter_map(|bytes| match ResponseParser::parse(bytes) {
                Ok(Response::Untagged(UntaggedResponse::Expunge(seq))) => Some(seq),
                _ => None,
            })
            .collect())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use tokio_test::io::Builder;

    use super::*;
    use crate::connection::NotAuthenticated;
    use crate::types::Uid;

    async fn selected(mock: tokio_test::io::Mock) -> Client<tokio_test::io::Mock, Selected> {
        let client = Client::<_, NotAuthenticated>::from_stream(mock)
            .await
            .unwrap();
        client
            .login("u", "p")
            .await
            .unwrap()
            .select("INBOX")
            .await
            .unwrap()
    }

    fn login_and_select(builder: &mut Builder) -> &mut Builder {
        builder
            .read(b"* OK ready\r\n")
            .write(b"A0000 LOGIN u p\r\n")
            .read(b"A0000 OK Logged in\r\n")
            .write(b"A0001 SELECT INBOX\r\n")
            .read(b"* 2 EXISTS\r\n")
            .read(b"A0001 OK [READ-WRITE] Select completed\r\n")
    }

    #[tokio::test]
    async fn test_select_then_fetch_header() {
        let mock = login_and_select(&mut Builder::new())
            .write(b"A0002 UID FETCH 1:* (UID BODY.PEEK[HEADER.FIELDS (ENVELOPE-TO)])\r\n")
            .read(b"* 1 FETCH (UID 7 BODY[HEADER.FIELDS (ENVELOPE-TO)] {2}\r\n")
            .read(b"\r\n)\r\n")
            .read(b"* 2 FETCH (UID 9 BODY[HEADER.FIELDS (ENVELOPE-TO)] {22}\r\n")
            .read(b"Envelope-To: c@d.org\r\n)\r\n")
            .read(b"A0002 OK Fetch completed\r\n")
            .build();

        let mut client = selected(mock).await;
        assert_eq!(client.mailbox(), "INBOX");
        assert_eq!(client.selected().status().exists, 2);

        let rows = client
            .uid_fetch(
                &UidSet::all(),
                vec![
                    FetchAttribute::Uid,
                    FetchAttribute::header_field("Envelope-To"),
                ],
            )
            .await
            .unwrap();

        assert_eq!(rows.len(), 2);
        assert_eq!(rows[1].1[0].as_uid(), Uid::new(9));
    }

    #[tokio::test]
    async fn test_copy_delete_expunge_fallback() {
        let mock = login_and_select(&mut Builder::new())
            .write(b"A0002 UID COPY 9 Archive\r\n")
            .read(b"A0002 OK [COPYUID 1 9 3] Copy completed\r\n")
            .write(b"A0003 UID STORE 9 +FLAGS.SILENT (\\Deleted)\r\n")
            .read(b"A0003 OK Store completed\r\n")
            .write(b"A0004 EXPUNGE\r\n")
            .read(b"* 2 EXPUNGE\r\n")
            .read(b"A0004 OK Expunge completed\r\n")
            .build();

        let mut client = selected(mock).await;
        let uid = UidSet::single(Uid::new(9).unwrap());

        client.uid_copy(&uid, "Archive").await.unwrap();
        client
            .uid_add_flags(&uid, vec![Flag::Deleted])
            .await
            .unwrap();
        let expunged = client.expunge().await.unwrap();

        assert_eq!(expunged, vec![SeqNum::new(2).unwrap()]);
    }
}
