//! Process configuration from the environment.
//!
//! | Variable | Default |
//! |---|---|
//! | `IMAP_HOST` | required |
//! | `IMAP_PORT` | 993, or 143 for `starttls`/`plain` |
//! | `IMAP_USER` | required |
//! | `IMAP_PASSWORD` | required |
//! | `IMAP_SECURITY` | `tls` (`tls`, `starttls`, `plain`) |
//! | `IMAP_INSECURE_SKIP_VERIFY` | `false` |
//! | `IMAP_TIMEOUT_SECS` | `60` |
//! | `PORT` | `8080` (carried, unused) |
//! | `MAILSORT_ROOT` | `INBOX` |
//! | `MAILSORT_CONTAINER` | `Received` |
//! | `MAILSORT_CREATE_CONTAINER` | `false` |
//! | `MAILSORT_HEADER` | `Envelope-To` |

use std::str::FromStr;
use std::time::Duration;

use mailsort_imap::Security;

use crate::{Error, Result};

/// Where and how messages are filed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoutingOptions {
    /// Root folder; also the mailbox that is scanned.
    pub root: String,
    /// Folder under the root that holds the per-recipient folders.
    pub container: String,
    /// Create the container when it is missing instead of aborting.
    pub create_container: bool,
    /// Header carrying the delivery address.
    pub header: String,
}

impl Default for RoutingOptions {
    fn default() -> Self {
        Self {
            root: "INBOX".to_string(),
            container: "Received".to_string(),
            create_container: false,
            header: "Envelope-To".to_string(),
        }
    }
}

/// Everything a run needs, loaded once at startup.
#[derive(Clone)]
pub struct Config {
    /// IMAP connection settings.
    pub imap: mailsort_imap::Config,
    /// Login user.
    pub username: String,
    /// Login password.
    pub password: String,
    /// Listen port. Nothing listens on it; it is accepted for deployments
    /// that always set `PORT`.
    pub listen_port: u16,
    /// Routing settings.
    pub routing: RoutingOptions,
}

impl std::fmt::Debug for Config {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Config")
            .field("imap", &self.imap)
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .field("listen_port", &self.listen_port)
            .field("routing", &self.routing)
            .finish()
    }
}

impl Config {
    /// Loads the configuration from process environment variables.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Config`] when a required variable is missing or
    /// empty, or a value cannot be parsed.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Loads the configuration through `lookup`, which maps a variable name
    /// to its value.
    ///
    /// # Errors
    ///
    /// Same as [`Config::from_env`].
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let env = Env { lookup };

        let host = env.required("IMAP_HOST")?;
        let username = env.required("IMAP_USER")?;
        let password = env.required_raw("IMAP_PASSWORD")?;

        let security = match env.optional("IMAP_SECURITY") {
            None => Security::Implicit,
            Some(mode) => parse_security(&mode)?,
        };
        let port = match env.parse::<u16>("IMAP_PORT")? {
            Some(0) => return Err(Error::Config("IMAP_PORT must be 1-65535".to_string())),
            Some(port) => port,
            None => security.default_port(),
        };
        let timeout_secs = match env.parse::<u64>("IMAP_TIMEOUT_SECS")? {
            Some(0) => {
                return Err(Error::Config(
                    "IMAP_TIMEOUT_SECS must be greater than zero".to_string(),
                ));
            }
            Some(secs) => secs,
            None => 60,
        };
        let insecure_skip_verify = env.flag("IMAP_INSECURE_SKIP_VERIFY")?.unwrap_or(false);

        let imap = mailsort_imap::Config::new(host, security)
            .with_port(port)
            .with_insecure_skip_verify(insecure_skip_verify)
            .with_io_timeout(Duration::from_secs(timeout_secs));

        let defaults = RoutingOptions::default();
        let routing = RoutingOptions {
            root: env.optional("MAILSORT_ROOT").unwrap_or(defaults.root),
            container: env.optional("MAILSORT_CONTAINER").unwrap_or(defaults.container),
            create_container: env
                .flag("MAILSORT_CREATE_CONTAINER")?
                .unwrap_or(defaults.create_container),
            header: match env.optional("MAILSORT_HEADER") {
                Some(name) => header_name(name)?,
                None => defaults.header,
            },
        };

        Ok(Self {
            imap,
            username,
            password,
            listen_port: env.parse("PORT")?.unwrap_or(8080),
            routing,
        })
    }
}

struct Env<F> {
    lookup: F,
}

impl<F> Env<F>
where
    F: Fn(&str) -> Option<String>,
{
    /// Trimmed value; unset and blank are both `None`.
    fn optional(&self, key: &str) -> Option<String> {
        (self.lookup)(key)
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty())
    }

    fn required(&self, key: &str) -> Result<String> {
        self.optional(key)
            .ok_or_else(|| Error::Config(format!("{key} is required")))
    }

    /// Like `required`, but keeps surrounding whitespace.
    fn required_raw(&self, key: &str) -> Result<String> {
        (self.lookup)(key)
            .filter(|v| !v.is_empty())
            .ok_or_else(|| Error::Config(format!("{key} is required")))
    }

    fn parse<T: FromStr>(&self, key: &str) -> Result<Option<T>> {
        self.optional(key)
            .map(|v| {
                v.parse()
                    .map_err(|_| Error::Config(format!("{key} has an invalid value: {v}")))
            })
            .transpose()
    }

    fn flag(&self, key: &str) -> Result<Option<bool>> {
        self.optional(key)
            .map(|v| match v.to_ascii_lowercase().as_str() {
                "1" | "true" | "yes" | "on" => Ok(true),
                "0" | "false" | "no" | "off" => Ok(false),
                _ => Err(Error::Config(format!("{key} must be true or false, got {v}"))),
            })
            .transpose()
    }
}

fn parse_security(mode: &str) -> Result<Security> {
    match mode.to_ascii_lowercase().as_str() {
        "tls" | "ssl" | "implicit" => Ok(Security::Implicit),
        "starttls" => Ok(Security::StartTls),
        "plain" | "none" => Ok(Security::None),
        _ => Err(Error::Config(format!(
            "IMAP_SECURITY must be tls, starttls or plain, got {mode}"
        ))),
    }
}

/// Accepts an RFC 5322 field name (printable ASCII, no colon) that can also
/// go into `HEADER.FIELDS (...)` as an IMAP atom.
fn header_name(name: String) -> Result<String> {
    const SPECIALS: &[u8] = b":(){}\"%*[]\\";

    let valid = name
        .bytes()
        .all(|b| b.is_ascii_graphic() && !SPECIALS.contains(&b));
    if valid {
        Ok(name)
    } else {
        Err(Error::Config(format!(
            "MAILSORT_HEADER must be a header field name, got {name:?}"
        )))
    }
}
