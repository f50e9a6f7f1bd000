//! Where and how to connect.

use std::time::Duration;

/// Transport security.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Security {
    /// TLS from the first byte, normally on port 993.
    #[default]
    Implicit,
    /// Plaintext, upgraded with STARTTLS before login, normally on 143.
    StartTls,
    /// Plaintext throughout. Only for local test servers.
    None,
}

impl Security {
    /// The IANA port for this mode.
    #[must_use]
    pub const fn default_port(self) -> u16 {
        match self {
            Self::Implicit => 993,
            Self::StartTls | Self::None => 143,
        }
    }
}

/// Connection settings for one server.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Server host name, also used for certificate checks.
    pub host: String,
    /// Server port.
    pub port: u16,
    /// Transport security.
    pub security: Security,
    /// Accept any server certificate.
    pub insecure_skip_verify: bool,
    /// Limit on TCP connect and the TLS handshake.
    pub connect_timeout: Duration,
    /// Limit on each command round trip.
    pub io_timeout: Duration,
}

impl Config {
    /// Settings for `host` with `security` on its default port, verified
    /// certificates, a 30 s connect timeout and a 60 s I/O timeout.
    #[must_use]
    pub fn new(host: impl Into<String>, security: Security) -> Self {
        Self {
            host: host.into(),
            port: security.default_port(),
            security,
            insecure_skip_verify: false,
            connect_timeout: Duration::from_secs(30),
            io_timeout: Duration::from_secs(60),
        }
    }

    /// Uses a non-default port.
    #[must_use]
    pub const fn with_port(mut self, port: u16) -> Self {
        self.port = port;
        self
    }

    /// Turns certificate verification off (`true`) or on.
    #[must_use]
    pub const fn with_insecure_skip_verify(mut self, skip: bool) -> Self {
        self.insecure_skip_verify = skip;
        self
    }

    /// Sets the connect timeout.
    #[must_use]
    pub const fn with_connect_timeout(mut self, timeout: Duration) -> Self {
        self.connect_timeout = timeout;
        self
    }

    /// Sets the per-command timeout.
    #[must_use]
    pub const fn with_io_timeout(mut self, timeout: Duration) -> Self {
        self.io_timeout = timeout;
        self
    }
}
