//! The result of one run.

use crate::router::RouteOutcome;

/// Outcomes of a run, one per listed message, in routing order.
#[derive(Debug, Default)]
pub struct RunReport {
    outcomes: Vec<RouteOutcome>,
    folders_created: usize,
}

impl RunReport {
    /// Creates an empty report.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends the outcome for the next message.
    pub fn record(&mut self, outcome: RouteOutcome) {
        self.outcomes.push(outcome);
    }

    /// Sets the number of folders created during the run.
    pub const fn set_folders_created(&mut self, count: usize) {
        self.folders_created = count;
    }

    /// All outcomes in routing order.
    #[must_use]
    pub fn outcomes(&self) -> &[RouteOutcome] {
        &self.outcomes
    }

    /// Number of messages listed.
    #[must_use]
    pub fn total(&self) -> usize {
        self.outcomes.len()
    }

    /// Number of messages moved.
    #[must_use]
    pub fn moved(&self) -> usize {
        self.outcomes.iter().filter(|o| o.is_moved()).count()
    }

    /// Number of messages skipped for lack of a folder name.
    #[must_use]
    pub fn skipped(&self) -> usize {
        self.outcomes
            .iter()
            .filter(|o| matches!(o, RouteOutcome::Skipped { .. }))
            .count()
    }

    /// Number of messages that could not be moved.
    #[must_use]
    pub fn failed(&self) -> usize {
        self.failures().count()
    }

    /// The failed outcomes.
    pub fn failures(&self) -> impl Iterator<Item = &RouteOutcome> {
        self.outcomes.iter().filter(|o| o.is_failed())
    }

    /// Returns true if any message failed.
    #[must_use]
    pub fn has_failures(&self) -> bool {
        self.outcomes.iter().any(RouteOutcome::is_failed)
    }

    /// Number of folders created during the run.
    #[must_use]
    pub const fn folders_created(&self) -> usize {
        self.folders_created
    }
}
