//! Errors found in user input while processing parameters.

use std::fmt::{Display, Formatter};

use indexmap::IndexSet;
use serde::Serialize;

use crate::options::UNKNOWN_ELEMENT;

/// How serious a processing error is. Ordered from least to most severe.
#[derive(Serialize, Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Minor,
    Low,
    Normal,
    High,
    Fatal,
}

/// What a consumer is expected to do with an error of a given severity.
#[derive(Serialize, Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[serde(rename_all = "lowercase")]
pub enum Action {
    Ignore,
    Log,
    Warn,
    Show,
    Demand,
}

/// Maps severities to actions. Fatal errors always demand attention, whatever
/// the table says.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ActionTable {
    pub minor: Action,
    pub low: Action,
    pub normal: Action,
    pub high: Action,
}

impl Default for ActionTable {
    fn default() -> Self {
        Self {
            minor: Action::Ignore,
            low: Action::Log,
            normal: Action::Warn,
            high: Action::Show,
        }
    }
}

impl ActionTable {
    pub fn action_for(&self, severity: Severity) -> Action {
        match severity {
            Severity::Minor => self.minor,
            Severity::Low => self.low,
            Severity::Normal => self.normal,
            Severity::High => self.high,
            Severity::Fatal => Action::Demand,
        }
    }
}

#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct ProcessingError {
    message: String,
    severity: Severity,
    element: String,
    tags: IndexSet<String>,
}

impl ProcessingError {
    pub fn new(message: impl Into<String>, severity: Severity) -> Self {
        Self {
            message: message.into(),
            severity,
            element: UNKNOWN_ELEMENT.to_string(),
            tags: IndexSet::new(),
        }
    }

    #[must_use]
    pub fn with_element(mut self, element: impl Into<String>) -> Self {
        self.element = element.into();
        self
    }

    #[must_use]
    pub fn with_tags<I, S>(mut self, tags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.tags.extend(tags.into_iter().map(Into::into));
        self
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn severity(&self) -> Severity {
        self.severity
    }

    pub fn element(&self) -> &str {
        &self.element
    }

    pub fn tags(&self) -> &IndexSet<String> {
        &self.tags
    }

    pub fn has_tag(&self, tag: &str) -> bool {
        self.tags.contains(tag)
    }

    pub fn is_fatal(&self) -> bool {
        self.severity == Severity::Fatal
    }

    /// Action under the default table.
    pub fn action(&self) -> Action {
        ActionTable::default().action_for(self.severity)
    }

    pub fn action_with(&self, table: &ActionTable) -> Action {
        table.action_for(self.severity)
    }

    /// Whether the error should be surfaced to the end user at all.
    pub fn should_show(&self) -> bool {
        self.action() >= Action::Show
    }

    pub fn should_report(&self) -> bool {
        self.action() > Action::Ignore
    }
}

impl Display for ProcessingError {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> std::fmt::Result {
        write!(formatter, "[{:?}] {}: {}", self.severity, self.element, self.message)
    }
}
