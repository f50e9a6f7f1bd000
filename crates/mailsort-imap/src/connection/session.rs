//! High-level IMAP session for one batch run.
//!
//! `Session` wraps the type-state [`Client`] and manages SELECT transitions
//! internally, so callers work through `&mut self` methods. Every command
//! round trip is bounded by the configured I/O timeout.
//!
//! A session that hits a timeout, an I/O error or a BYE is marked closed:
//! the wire is out of sync and later calls fail with
//! [`Error::InvalidState`].

use std::future::Future;
use std::time::Duration;

use tokio::io::{AsyncRead, AsyncWrite};

use super::client::{Authenticated, Client, NotAuthenticated, SelectRefused, Selected};
use super::{Config, ImapStream, Security};
use crate::command::FetchAttribute;
use crate::parser::FetchItem;
use crate::types::{Capability, Flag, ListResponse, MailboxStatus, Uid, UidSet};
use crate::{Error, Result};

/// One message's UID and the unfolded value of a requested header.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HeaderField {
    /// Message UID in the mailbox it was listed from.
    pub uid: Uid,
    /// Header value without the field name; empty when the header is absent.
    pub value: String,
}

enum SessionState<S> {
    Authenticated(Client<S, Authenticated>),
    Selected(Client<S, Selected>),
    Closed,
}

/// Logged-in IMAP session.
pub struct Session<S = ImapStream> {
    state: SessionState<S>,
    io_timeout: Duration,
}

impl Session<ImapStream> {
    /// Connects, negotiates TLS as configured and logs in.
    ///
    /// # Errors
    ///
    /// Returns an error if the connection, the TLS handshake or the login
    /// fails, or if any step exceeds its timeout.
    pub async fn connect(config: &Config, username: &str, password: &str) -> Result<Self> {
        let stream = super::connect(config).await?;
        let mut client = with_timeout(config.io_timeout, Client::from_stream(stream)).await?;

        match config.security {
            Security::StartTls => {
                client = with_timeout(
                    config.io_timeout,
                    client.starttls(&config.host, config.insecure_skip_verify),
                )
                .await?;
            }
            Security::None => {
                tracing::warn!(host = %config.host, "logging in over an unencrypted connection");
            }
            Security::Implicit => {}
        }

        Self::authenticate(client, username, password, config.io_timeout).await
    }
}

impl<S> Session<S>
where
    S: AsyncRead + AsyncWrite + Unpin,
{
    /// Reads the greeting from an already connected stream and logs in.
    ///
    /// # Errors
    ///
    /// Returns an error if the greeting is a BYE or the login is refused.
    pub async fn login(
        stream: S,
        username: &str,
        password: &str,
        io_timeout: Duration,
    ) -> Result<Self> {
        let client = with_timeout(io_timeout, Client::from_stream(stream)).await?;
        Self::authenticate(client, username, password, io_timeout).await
    }

    async fn authenticate(
        client: Client<S, NotAuthenticated>,
        username: &str,
        password: &str,
        io_timeout: Duration,
    ) -> Result<Self> {
        let mut client = with_timeout(io_timeout, client.login(username, password)).await?;
        if !announced_capabilities(client.capabilities()) {
            with_timeout(io_timeout, client.capability()).await?;
        }
        tracing::debug!(
            user = username,
            capabilities = ?client.capabilities(),
            "logged in"
        );

        Ok(Self {
            state: SessionState::Authenticated(client),
            io_timeout,
        })
    }

    /// Returns true once the session can no longer issue commands.
    #[must_use]
    pub const fn is_closed(&self) -> bool {
        matches!(self.state, SessionState::Closed)
    }

    /// Returns the currently selected mailbox, if any.
    #[must_use]
    pub fn selected_mailbox(&self) -> Option<&str> {
        match &self.state {
            SessionState::Selected(client) => Some(client.mailbox()),
            _ => None,
        }
    }

    /// Lists every folder on the server.
    ///
    /// # Errors
    ///
    /// Returns an error if LIST fails or the session is closed.
    pub async fn list_folders(&mut self) -> Result<Vec<ListResponse>> {
        let timeout = self.io_timeout;
        let result = match &mut self.state {
            SessionState::Authenticated(client) => with_timeout(timeout, client.list("", "*")).await,
            SessionState::Selected(client) => with_timeout(timeout, client.list("", "*")).await,
            SessionState::Closed => Err(closed()),
        };
        self.settle(result)
    }

    /// Creates a folder by its full server path.
    ///
    /// # Errors
    ///
    /// Returns [`Error::AlreadyExists`] (or a `NO` that
    /// [`Error::is_already_exists`] recognizes) when the folder is there
    /// already, and other errors as reported.
    pub async fn create(&mut self, path: &str) -> Result<()> {
        let timeout = self.io_timeout;
        let result = match &mut self.state {
            SessionState::Authenticated(client) => with_timeout(timeout, client.create(path)).await,
            SessionState::Selected(client) => with_timeout(timeout, client.create(path)).await,
            SessionState::Closed => Err(closed()),
        };
        self.settle(result)
    }

    /// Selects a mailbox.
    ///
    /// A refused SELECT leaves the session logged in with nothing selected.
    /// A timeout closes it.
    ///
    /// # Errors
    ///
    /// Returns an error if the mailbox cannot be selected.
    pub async fn select(&mut self, mailbox: &str) -> Result<MailboxStatus> {
        let timeout = self.io_timeout;
        let attempt = match std::mem::replace(&mut self.state, SessionState::Closed) {
            SessionState::Authenticated(client) => {
                tokio::time::timeout(timeout, client.select(mailbox)).await
            }
            SessionState::Selected(client) => {
                tokio::time::timeout(timeout, client.select(mailbox)).await
            }
            SessionState::Closed => return Err(closed()),
        };

        match attempt {
            Ok(Ok(client)) => {
                let status = client.selected().status().clone();
                tracing::debug!(mailbox, exists = status.exists, "selected");
                self.state = SessionState::Selected(client);
                Ok(status)
            }
            Ok(Err(SelectRefused { client, error })) => {
                tracing::debug!(mailbox, %error, "select refused");
                self.state = SessionState::Authenticated(client);
                self.settle(Err(error))
            }
            Err(_) => Err(Error::Timeout(timeout)),
        }
    }

    /// Returns the UID and value of `header` for every message in `mailbox`.
    ///
    /// Selects the mailbox (fresh, so the message count is current) and
    /// issues a single `UID FETCH 1:*` unless it is empty. Results are in
    /// ascending UID order.
    ///
    /// # Errors
    ///
    /// Returns an error if SELECT or FETCH fails.
    pub async fn fetch_header_field(
        &mut self,
        mailbox: &str,
        header: &str,
    ) -> Result<Vec<HeaderField>> {
        let status = self.select(mailbox).await?;
        if status.exists == 0 {
            return Ok(Vec::new());
        }

        let timeout = self.io_timeout;
        let items = vec![FetchAttribute::Uid, FetchAttribute::header_field(header)];
        let result = match &mut self.state {
            SessionState::Selected(client) => {
                with_timeout(timeout, client.uid_fetch(&UidSet::all(), items)).await
            }
            _ => Err(closed()),
        };
        let rows = self.settle(result)?;

        let mut fields: Vec<HeaderField> = rows
            .into_iter()
            .filter_map(|(seq, items)| {
                let uid = items.iter().find_map(FetchItem::as_uid);
                if uid.is_none() {
                    tracing::warn!(%seq, "FETCH response without UID ignored");
                }
                let value = items
                    .iter()
                    .find_map(|item| match item {
                        FetchItem::Body { data: Some(data), .. } => {
                            Some(header_value(data, header))
                        }
                        _ => None,
                    })
                    .unwrap_or_default();
                uid.map(|uid| HeaderField { uid, value })
            })
            .collect();

        fields.sort_by_key(|field| field.uid);
        fields.dedup_by_key(|field| field.uid);
        Ok(fields)
    }

    /// Moves one message from `from` to the folder at path `to`.
    ///
    /// Uses UID MOVE when the server has it, otherwise UID COPY followed by
    /// flagging the original `\Deleted` and expunging it (UID EXPUNGE with
    /// UIDPLUS, plain EXPUNGE without).
    ///
    /// # Errors
    ///
    /// Returns the first failing step's error. When the fallback fails after
    /// the copy, the message may exist in both folders.
    pub async fn move_message(&mut self, from: &str, uid: Uid, to: &str) -> Result<()> {
        if self.selected_mailbox() != Some(from) {
            self.select(from).await?;
        }

        let timeout = self.io_timeout;
        let result = match &mut self.state {
            SessionState::Selected(client) => move_uid(client, uid, to, timeout).await,
            _ => Err(closed()),
        };
        self.settle(result)
    }

    /// Logs out and closes the connection.
    ///
    /// # Errors
    ///
    /// Returns an error if the LOGOUT command cannot be written.
    pub async fn logout(self) -> Result<()> {
        match self.state {
            SessionState::Authenticated(client) => {
                with_timeout(self.io_timeout, client.logout()).await
            }
            SessionState::Selected(client) => with_timeout(self.io_timeout, client.logout()).await,
            SessionState::Closed => {
                tracing::debug!("connection already lost, dropping it without LOGOUT");
                Ok(())
            }
        }
    }

    /// Marks the session closed when `result` shows the connection is gone.
    fn settle<T>(&mut self, result: Result<T>) -> Result<T> {
        if let Err(e @ (Error::Timeout(_) | Error::Io(_) | Error::Bye(_) | Error::Tls(_))) =
            &result
        {
            tracing::debug!(error = %e, "session closed");
            self.state = SessionState::Closed;
        }
        result
    }
}

async fn move_uid<S>(
    client: &mut Client<S, Selected>,
    uid: Uid,
    to: &str,
    timeout: Duration,
) -> Result<()>
where
    S: AsyncRead + AsyncWrite + Unpin,
{
    let set = UidSet::single(uid);

    if client.supports_move() {
        return with_timeout(timeout, client.uid_move(&set, to)).await;
    }

    with_timeout(timeout, client.uid_copy(&set, to)).await?;
    with_timeout(timeout, client.uid_add_flags(&set, vec![Flag::Deleted])).await?;

    if client.supports_uidplus() {
        with_timeout(timeout, client.uid_expunge(&set)).await
    } else {
        with_timeout(timeout, client.expunge()).await.map(drop)
    }
}

/// True once the server has sent a post-login capability list. MOVE and
/// UIDPLUS support is only judged from such a list.
fn announced_capabilities(capabilities: &[Capability]) -> bool {
    capabilities
        .iter()
        .any(|cap| matches!(cap, Capability::Imap4Rev1 | Capability::Imap4Rev2))
}

async fn with_timeout<T>(duration: Duration, fut: impl Future<Output = Result<T>>) -> Result<T> {
    tokio::time::timeout(duration, fut)
        .await
        .map_err(|_| Error::Timeout(duration))?
}

fn closed() -> Error {
    Error::InvalidState("session is closed".to_string())
}

/// Extracts the unfolded value of `name` from a header section.
///
/// Continuation lines keep their leading whitespace, per RFC 5322
/// unfolding. The first occurrence wins.
fn header_value(raw: &[u8], name: &str) -> String {
    let text = String::from_utf8_lossy(raw);
    let mut value: Option<String> = None;

    for line in text.lines() {
        if let Some(v) = value.as_mut() {
            if line.starts_with([' ', '\t']) {
                v.push_str(line);
                continue;
            }
            break;
        }

        if let Some((field, rest)) = line.split_once(':')
            && field.trim_end().eq_ignore_ascii_case(name)
        {
            value = Some(rest.to_string());
        }
    }

    value.map(|v| v.trim().to_string()).unwrap_or_default()
}
