//! Connection with its protocol state in the type.
//!
//! [`NotAuthenticated`] can log in, [`Authenticated`] can list, create and
//! select, and [`Selected`] adds the UID message commands. Methods that
//! change state consume the client and return it in the new state.

#![allow(clippy::missing_errors_doc)]

mod authenticated;
mod not_authenticated;
mod selected;
mod states;

use tokio::io::{AsyncRead, AsyncWrite};

pub use self::states::{Authenticated, LoggedIn, NotAuthenticated, Selected};
use super::framed::{FramedStream, ResponseAccumulator};
use crate::command::{Command, TagGenerator};
use crate::parser::{Response, ResponseParser, UntaggedResponse};
use crate::types::{Capability, ResponseCode, Status};
use crate::{Error, Result};

/// A connection in protocol state `State`.
pub struct Client<S, State> {
    pub(crate) stream: FramedStream<S>,
    pub(crate) tags: TagGenerator,
    pub(crate) capabilities: Vec<Capability>,
    pub(crate) state: State,
}

impl<S, State: std::fmt::Debug> std::fmt::Debug for Client<S, State> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Client")
            .field("state", &self.state)
            .field("capabilities", &self.capabilities)
            .finish_non_exhaustive()
    }
}

/// A SELECT the server refused, with the connection to carry on from.
pub struct SelectRefused<S> {
    /// The same connection, now with nothing selected.
    pub client: Client<S, Authenticated>,
    /// Why the server refused.
    pub error: Error,
}

impl<S> std::fmt::Debug for SelectRefused<S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SelectRefused")
            .field("client", &self.client)
            .field("error", &self.error)
            .finish()
    }
}

impl<S> From<SelectRefused<S>> for Error {
    fn from(refused: SelectRefused<S>) -> Self {
        refused.error
    }
}

impl<S, State> Client<S, State>
where
    S: AsyncRead + AsyncWrite + Unpin,
{
    /// Capabilities as last advertised.
    #[must_use]
    pub fn capabilities(&self) -> &[Capability] {
        &self.capabilities
    }

    /// Whether `capability` was advertised.
    #[must_use]
    pub fn advertises(&self, capability: &Capability) -> bool {
        self.capabilities.contains(capability)
    }

    /// `MOVE` (RFC 6851).
    #[must_use]
    pub fn supports_move(&self) -> bool {
        self.advertises(&Capability::Move)
    }

    /// `UIDPLUS` (RFC 4315).
    #[must_use]
    pub fn supports_uidplus(&self) -> bool {
        self.advertises(&Capability::UidPlus)
    }

    /// Asks for the capability list and stores it.
    pub async fn capability(&mut self) -> Result<Vec<Capability>> {
        let responses = self.execute(&Command::Capability).await?;
        self.absorb_capabilities(&responses);
        Ok(self.capabilities.clone())
    }

    /// Sends `command` and collects responses up to its completion, which
    /// comes last. Anything but an OK completion is an error.
    pub(crate) async fn execute(&mut self, command: &Command) -> Result<Vec<Vec<u8>>> {
        let tag = self.tags.next();
        tracing::trace!(%tag, command = command.name(), "sending");

        self.stream.write_command(&command.serialize(&tag)).await?;
        let responses = ResponseAccumulator::new(tag.as_str())
            .read_until_tagged(&mut self.stream)
            .await?;

        Self::check_tagged_ok(&responses, &tag)?;
        Ok(responses)
    }

    /// Keeps any capability list the server sent along, either as data or
    /// as a response code.
    pub(crate) fn absorb_capabilities(&mut self, responses: &[Vec<u8>]) {
        let latest = responses
            .iter()
            .rev()
            .find_map(|raw| match ResponseParser::parse(raw).ok()? {
                Response::Untagged(UntaggedResponse::Capability(caps))
                | Response::Tagged {
                    code: Some(ResponseCode::Capability(caps)),
                    ..
                } => Some(caps),
                _ => None,
            });
        if let Some(caps) = latest {
            self.capabilities = caps;
        }
    }

    /// Turns the completion tagged `tag` into `Ok` or the matching error.
    pub(crate) fn check_tagged_ok(responses: &[Vec<u8>], tag: &str) -> Result<()> {
        let completion = responses.iter().rev().find_map(|raw| {
            match ResponseParser::parse(raw).ok()? {
                Response::Tagged {
                    tag: seen,
                    status,
                    code,
                    text,
                } if seen.as_str() == tag => Some((status, code, text)),
                _ => None,
            }
        });
        let Some((status, code, text)) = completion else {
            return Err(Error::Protocol(format!("no completion for {tag}")));
        };

        match status {
            Status::Ok | Status::PreAuth => Ok(()),
            Status::No if code == Some(ResponseCode::AlreadyExists) => {
                Err(Error::AlreadyExists(text))
            }
            Status::No => Err(Error::No(text)),
            Status::Bad => Err(Error::Bad(text)),
            Status::Bye => Err(Error::Bye(text)),
        }
    }

    /// Same connection, new state.
    pub(crate) fn transition<Next>(self, state: Next) -> Client<S, Next> {
        Client {
            stream: self.stream,
            tags: self.tags,
            capabilities: self.capabilities,
            state,
        }
    }
}
