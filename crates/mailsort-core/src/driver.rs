//! One end-to-end run: connect, sort the inbox, disconnect.

use mailsort_imap::Session;

use crate::catalog::FolderCatalog;
use crate::config::{Config, RoutingOptions};
use crate::report::RunReport;
use crate::router::route;
use crate::transport::{MailSession, TransportResult};
use crate::Result;

/// Opens sessions to the mail store.
#[allow(async_fn_in_trait)]
pub trait Connector {
    /// The session type this connector yields.
    type Session: MailSession;

    /// Connects and authenticates.
    async fn connect(&self) -> TransportResult<Self::Session>;
}

/// Connects over IMAP with the process configuration.
#[derive(Debug, Clone)]
pub struct ImapConnector {
    config: Config,
}

impl ImapConnector {
    /// Creates a connector from the loaded configuration.
    #[must_use]
    pub fn new(config: &Config) -> Self {
        Self {
            config: config.clone(),
        }
    }
}

impl Connector for ImapConnector {
    type Session = Session;

    async fn connect(&self) -> TransportResult<Session> {
        let config = &self.config;
        tracing::debug!(host = %config.imap.host, port = config.imap.port, "connecting");
        Session::connect(&config.imap, &config.username, &config.password).await
    }
}

/// Runs one sort.
///
/// The session is closed on every path once it has been opened; a failure
/// to close is logged and does not change the result.
///
/// # Errors
///
/// Returns an error if the connection cannot be established, the folder
/// tree is missing the root or container, or the inbox cannot be listed.
/// Per-message failures are reported in the [`RunReport`] instead.
pub async fn run<C: Connector>(connector: &C, options: &RoutingOptions) -> Result<RunReport> {
    let mut session = connector.connect().await?;
    let result = sort_mailbox(&mut session, options).await;
    if let Err(e) = session.close().await {
        tracing::warn!(error = %e, "failed to close session");
    }
    result
}

/// Sorts the root mailbox over an open session.
///
/// # Errors
///
/// Same as [`run`], minus connection failures.
pub async fn sort_mailbox<M: MailSession>(
    session: &mut M,
    options: &RoutingOptions,
) -> Result<RunReport> {
    let mut catalog = FolderCatalog::initialize(session, options).await?;
    let inbox = catalog.root().to_string();

    let items = session.list_messages(&inbox, &options.header).await?;
    tracing::info!(mailbox = %inbox, messages = items.len(), "listed messages");

    let mut report = RunReport::new();
    for item in &items {
        let outcome = route(session, &mut catalog, &inbox, item).await;
        report.record(outcome);
    }
    report.set_folders_created(catalog.created());

    Ok(report)
}
