//! The byte stream under a client: TCP, optionally wrapped in TLS.

#![allow(clippy::missing_errors_doc)]

use std::io;
use std::pin::Pin;
use std::sync::Arc;
use std::task::{Context, Poll};

use rustls::DigitallySignedStruct;
use rustls::client::danger::{HandshakeSignatureValid, ServerCertVerified, ServerCertVerifier};
use rustls::pki_types::{CertificateDer, ServerName, UnixTime};
use tokio::io::{AsyncRead, AsyncWrite, ReadBuf};
use tokio::net::TcpStream;
use tokio_rustls::TlsConnector;
use tokio_rustls::client::TlsStream;

use super::{Config, Security};
use crate::{Error, Result};

/// TCP, plain or under TLS.
pub enum ImapStream {
    /// No encryption, before STARTTLS or with [`Security::None`].
    Plain(TcpStream),
    /// After the TLS handshake.
    Tls(Box<TlsStream<TcpStream>>),
}

/// Runs `$body` with `$s` bound to the pinned inner stream.
macro_rules! pinned {
    ($self:ident, $s:ident => $body:expr) => {
        match $self.get_mut() {
            ImapStream::Plain(inner) => {
                let $s = Pin::new(inner);
                $body
            }
            ImapStream::Tls(inner) => {
                let $s = Pin::new(inner);
                $body
            }
        }
    };
}

impl ImapStream {
    /// Runs the TLS handshake on a plain stream, as STARTTLS requires.
    pub async fn upgrade_to_tls(self, host: &str, insecure_skip_verify: bool) -> Result<Self> {
        let Self::Plain(tcp) = self else {
            return Err(Error::InvalidState("TLS is already active".to_string()));
        };
        handshake(tcp, host, insecure_skip_verify).await
    }
}

impl AsyncRead for ImapStream {
    fn poll_read(
        self: Pin<&mut Self>,
        cx: &mut Context<'_>,
        buf: &mut ReadBuf<'_>,
    ) -> Poll<io::Result<()>> {
        pinned!(self, s => s.poll_read(cx, buf))
    }
}

impl AsyncWrite for ImapStream {
    fn poll_write(
        self: Pin<&mut Self>,
        cx: &mut Context<'_>,
        buf: &[u8],
    ) -> Poll<io::Result<usize>> {
        pinned!(self, s => s.poll_write(cx, buf))
    }

    fn poll_flush(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<io::Result<()>> {
        pinned!(self, s => s.poll_flush(cx))
    }

    fn poll_shutdown(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<io::Result<()>> {
        pinned!(self, s => s.poll_shutdown(cx))
    }
}

/// A connector that checks certificates against the webpki roots, or, with
/// `insecure_skip_verify`, accepts anything.
#[must_use]
pub fn create_tls_connector(insecure_skip_verify: bool) -> TlsConnector {
    let builder = rustls::ClientConfig::builder();
    let config = if insecure_skip_verify {
        tracing::warn!("TLS certificate verification is disabled");
        builder
            .dangerous()
            .with_custom_certificate_verifier(Arc::new(AcceptAnyCertificate))
            .with_no_client_auth()
    } else {
        let roots = rustls::RootCertStore {
            roots: webpki_roots::TLS_SERVER_ROOTS.to_vec(),
        };
        builder.with_root_certificates(roots).with_no_client_auth()
    };
    TlsConnector::from(Arc::new(config))
}

async fn handshake(tcp: TcpStream, host: &str, insecure_skip_verify: bool) -> Result<ImapStream> {
    let server_name = ServerName::try_from(host.to_owned())?;
    let tls = create_tls_connector(insecure_skip_verify)
        .connect(server_name, tcp)
        .await?;
    Ok(ImapStream::Tls(Box::new(tls)))
}

/// Opens the TCP connection and, for [`Security::Implicit`], completes the
/// TLS handshake. Both steps share `config.connect_timeout`.
///
/// STARTTLS happens later in the client, after the greeting.
pub async fn connect(config: &Config) -> Result<ImapStream> {
    let addr = format!("{}:{}", config.host, config.port);
    tracing::debug!(%addr, security = ?config.security, "connecting");

    let open = async {
        let tcp = TcpStream::connect(&addr).await?;
        match config.security {
            Security::Implicit => handshake(tcp, &config.host, config.insecure_skip_verify).await,
            Security::StartTls | Security::None => Ok(ImapStream::Plain(tcp)),
        }
    };
    tokio::time::timeout(config.connect_timeout, open)
        .await
        .map_err(|_| Error::Timeout(config.connect_timeout))?
}

/// Certificate verifier that accepts every server certificate.
#[derive(Debug)]
struct AcceptAnyCertificate;

impl ServerCertVerifier for AcceptAnyCertificate {
    fn verify_server_cert(
        &self,
        _end_entity: &CertificateDer<'_>,
        _intermediates: &[CertificateDer<'_>],
        _server_name: &ServerName<'_>,
        _ocsp_response: &[u8],
        _now: UnixTime,
    ) -> std::result::Result<ServerCertVerified, rustls::Error> {
        Ok(ServerCertVerified::assertion())
    }

    fn verify_tls12_signature(
        &self,
        _message: &[u8],
        _cert: &CertificateDer<'_>,
        _dss: &DigitallySignedStruct,
    ) -> std::result::Result<HandshakeSignatureValid, rustls::Error> {
        Ok(HandshakeSignatureValid::assertion())
    }

    fn verify_tls13_signature(
        &self,
        _message: &[u8],
        _cert: &CertificateDer<'_>,
        _dss: &DigitallySignedStruct,
    ) -> std::result::Result<HandshakeSignatureValid, rustls::Error> {
        Ok(HandshakeSignatureValid::assertion())
    }

    fn supported_verify_schemes(&self) -> Vec<rustls::SignatureScheme> {
        use rustls::SignatureScheme;

        vec![
            SignatureScheme::RSA_PKCS1_SHA256,
            SignatureScheme::RSA_PKCS1_SHA384,
            SignatureScheme::RSA_PKCS1_SHA512,
            SignatureScheme::ECDSA_NISTP256_SHA256,
            SignatureScheme::ECDSA_NISTP384_SHA384,
            SignatureScheme::RSA_PSS_SHA256,
            SignatureScheme::RSA_PSS_SHA384,
            SignatureScheme::RSA_PSS_SHA512,
            SignatureScheme::ED25519,
        ]
    }
}
