//! Commands for the logged-in states.
//!
//! LIST, CREATE, SELECT and LOGOUT are valid whether or not a mailbox is
//! selected, so they are implemented once for every [`LoggedIn`] state.

use tokio::io::{AsyncRead, AsyncWrite};

use super::states::{Authenticated, LoggedIn, Selected};
use super::{Client, SelectRefused};
use crate::Result;
use crate::command::Command;
use crate::connection::framed::ResponseAccumulator;
use crate::parser::{Response, ResponseParser, UntaggedResponse};
use crate::types::{ListResponse, Mailbox, MailboxStatus, ResponseCode, Status};

impl<S, State> Client<S, State>
where
    S: AsyncRead + AsyncWrite + Unpin,
    State: LoggedIn,
{
    /// Lists mailboxes matching a pattern.
    pub async fn list(&mut self, reference: &str, pattern: &str) -> Result<Vec<ListResponse>> {
        let responses = self
            .execute(&Command::List {
                reference: reference.to_string(),
                pattern: pattern.to_string(),
            })
            .await?;

        Ok(responses
            .iter()
            .filter_map(|bytes| match ResponseParser::parse(bytes) {
                Ok(Response::Untagged(UntaggedResponse::List(item))) => Some(item),
                _ => None,
            })
            .collect())
    }

    /// Creates a new mailbox.
    ///
    /// Fails with [`Error::AlreadyExists`] when the server reports the
    /// `ALREADYEXISTS` response code.
    pub async fn create(&mut self, mailbox: &str) -> Result<()> {
        self.execute(&Command::Create {
            mailbox: Mailbox::new(mailbox),
        })
        .await
        .map(drop)
    }

    /// Selects a mailbox for read-write access.
    ///
    /// A failed SELECT leaves the connection authenticated with nothing
    /// selected (RFC 3501 6.3.1), so the client comes back in
    /// [`SelectRefused`] in that state.
    #[allow(clippy::result_large_err)]
    pub async fn select(
        mut self,
        mailbox: &str,
    ) -> std::result::Result<Client<S, Selected>, SelectRefused<S>> {
        let command = Command::Select {
            mailbox: Mailbox::new(mailbox),
        };
        match self.execute(&command).await {
            Ok(responses) => {
                let status = parse_mailbox_status(&responses);
                Ok(self.transition(Selected {
                    mailbox: mailbox.to_string(),
                    status,
                }))
            }
            Err(error) => Err(SelectRefused {
                client: self.transition(Authenticated),
                error,
            }),
        }
    }

    /// Gracefully disconnects from the server.
    ///
    /// The server's reply is not checked; a BYE followed by a closed
    /// connection is as good as a tagged OK here.
    pub async fn logout(mut self) -> Result<()> {
        let tag = self.tags.next();
        self.stream
            .write_command(&Command::Logout.serialize(&tag))
            .await?;

        let _ = ResponseAccumulator::new(tag.as_str())
            .read_until_tagged(&mut self.stream)
            .await;
        Ok(())
    }
}

/// Builds the mailbox snapshot from SELECT responses.
fn parse_mailbox_status(responses: &[Vec<u8>]) -> MailboxStatus {
    let mut status = MailboxStatus::default();

    for response_bytes in responses {
        match ResponseParser::parse(response_bytes) {
            Ok(Response::Untagged(UntaggedResponse::Exists(n))) => status.exists = n,
            Ok(Response::Untagged(UntaggedResponse::Recent(n))) => status.recent = n,
            Ok(Response::Untagged(UntaggedResponse::Status {
                status: Status::Ok,
                code: Some(code),
                ..
            })) => match code {
                ResponseCode::UidValidity(v) => status.uid_validity = Some(v),
                ResponseCode::UidNext(v) => status.uid_next = Some(v),
                _ => {}
            },
            Ok(Response::Tagged {
                code: Some(ResponseCode::ReadOnly),
                ..
            }) => status.read_only = true,
            _ => {}
        }
    }

    status
}
