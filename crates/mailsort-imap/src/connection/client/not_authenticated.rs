//! Implementation for the not-authenticated state.

use tokio::io::{AsyncRead, AsyncWrite};

use super::Client;
use super::states::{Authenticated, NotAuthenticated};
use crate::command::{Command, TagGenerator};
use crate::connection::ImapStream;
use crate::connection::framed::FramedStream;
use crate::parser::{Response, ResponseParser, UntaggedResponse};
use crate::types::{Capability, ResponseCode, Status};
use crate::{Error, Result};

impl<S> Client<S, NotAuthenticated>
where
    S: AsyncRead + AsyncWrite + Unpin,
{
    /// Creates a new client from a connected stream.
    ///
    /// Reads the server greeting and any capabilities it advertises.
    pub async fn from_stream(stream: S) -> Result<Self> {
        let mut framed = FramedStream::new(stream);

        let greeting = framed.read_response().await?;
        let capabilities = match ResponseParser::parse(&greeting)? {
            Response::Untagged(UntaggedResponse::Status {
                status: Status::Ok | Status::PreAuth,
                code,
                ..
            }) => match code {
                Some(ResponseCode::Capability(caps)) => caps,
                _ => Vec::new(),
            },
            Response::Untagged(UntaggedResponse::Status {
                status: Status::Bye,
                text,
                ..
            }) => return Err(Error::Bye(text)),
            other => {
                return Err(Error::Protocol(format!("unexpected greeting: {other:?}")));
            }
        };

        Ok(Self {
            stream: framed,
            tags: TagGenerator::default(),
            capabilities,
            state: NotAuthenticated,
        })
    }

    /// Authenticates with the server using LOGIN.
    ///
    /// Consumes self and returns an authenticated client on success.
    pub async fn login(
        mut self,
        username: &str,
        password: &str,
    ) -> Result<Client<S, Authenticated>> {
        if self.advertises(&Capability::LoginDisabled) {
            return Err(Error::InvalidState(
                "server advertises LOGINDISABLED".to_string(),
            ));
        }

        let responses = self
            .execute(&Command::Login {
                username: username.to_string(),
                password: password.to_string(),
            })
            .await?;
        // The pre-login list does not carry over (RFC 9051 7.2.2).
        self.capabilities.clear();
        self.absorb_capabilities(&responses);

        Ok(self.transition(Authenticated))
    }

    /// Gracefully disconnects from the server.
    pub async fn logout(mut self) -> Result<()> {
        let tag = self.tags.next();
        self.stream
            .write_command(&Command::Logout.serialize(&tag))
            .await?;

        let _ = self.stream.read_response().await;
        Ok(())
    }
}

impl Client<ImapStream, NotAuthenticated> {
    /// Upgrades a plaintext connection with STARTTLS.
    ///
    /// Capabilities are re-read after the handshake, since RFC 3501 says
    /// the pre-TLS list must be discarded.
    pub async fn starttls(mut self, host: &str, insecure_skip_verify: bool) -> Result<Self> {
        self.execute(&Command::StartTls).await?;

        let stream = self
            .stream
            .into_inner()
            .upgrade_to_tls(host, insecure_skip_verify)
            .await?;

        let mut client = Self {
            stream: FramedStream::new(stream),
            tags: self.tags,
            capabilities: Vec::new(),
            state: NotAuthenticated,
        };
        client.capability().await?;
        Ok(client)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use tokio_test::io::Builder;

    use super::*;

    #[tokio::test]
    async fn test_greeting_capabilities_and_login() {
        let mock = Builder::new()
            .read(b"* OK [CAPABILITY IMAP4rev1 AUTH=PLAIN] Dovecot ready.\r\n")
            .write(b"A0000 LOGIN alice \"s3cret pw\"\r\n")
            .read(b"A0000 OK [CAPABILITY IMAP4rev1 MOVE UIDPLUS] Logged in\r\n")
            .build();

        let client = Client::<_, NotAuthenticated>::from_stream(mock)
            .await
            .unwrap();
        assert!(!client.supports_move());

        let client = client.login("alice", "s3cret pw").await.unwrap();
        assert!(client.supports_move());
        assert!(client.supports_uidplus());
        assert!(client.advertises(&Capability::Imap4Rev1));
    }

    #[tokio::test]
    async fn test_greeting_capabilities_do_not_survive_login() {
        let mock = Builder::new()
            .read(b"* OK [CAPABILITY IMAP4rev1 STARTTLS LOGINDISABLED] ready\r\n")
            .build();
        let client = Client::<_, NotAuthenticated>::from_stream(mock)
            .await
            .unwrap();
        assert!(client.advertises(&Capability::StartTls));

        let mock = Builder::new()
            .read(b"* OK [CAPABILITY IMAP4rev1 MOVE] ready\r\n")
            .write(b"A0000 LOGIN u p\r\n")
            .read(b"A0000 OK Logged in\r\n")
            .build();
        let client = Client::<_, NotAuthenticated>::from_stream(mock)
            .await
            .unwrap();
        let client = client.login("u", "p").await.unwrap();
        assert!(client.capabilities().is_empty());
    }

    #[tokio::test]
    async fn test_bye_greeting() {
        let mock = Builder::new()
            .read(b"* BYE Too many connections\r\n")
            .build();

        let err = Client::<_, NotAuthenticated>::from_stream(mock)
            .await
            .unwrap_err();
        assert!(matches!(err, Error::Bye(text) if text == "Too many connections"));
    }

    #[tokio::test]
    async fn test_login_rejected() {
        let mock = Builder::new()
            .read(b"* OK ready\r\n")
            .write(b"A0000 LOGIN bob wrong\r\n")
            .read(b"A0000 NO [AUTHENTICATIONFAILED] Authentication failed.\r\n")
            .build();

        let client = Client::<_, NotAuthenticated>::from_stream(mock)
            .await
            .unwrap();
        let err = client.login("bob", "wrong").await.unwrap_err();
        assert!(matches!(err, Error::No(_)));
    }

    #[tokio::test]
    async fn test_login_disabled_is_refused_locally() {
        let mock = Builder::new()
            .read(b"* OK [CAPABILITY IMAP4rev1 STARTTLS LOGINDISABLED] ready\r\n")
            .build();

        let client = Client::<_, NotAuthenticated>::from_stream(mock)
            .await
            .unwrap();
        let err = client.login("bob", "pw").await.unwrap_err();
        assert!(matches!(err, Error::InvalidState(_)));
    }
}
