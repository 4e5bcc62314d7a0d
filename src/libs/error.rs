//! Error types for task, sync and integration operations.
//!
//! Storage plumbing propagates `anyhow::Error`; these enums exist where the
//! interactive layer has to tell failures apart, for example to show an
//! inline validation message instead of the retry modal.

use crate::libs::messages::Message;
use thiserror::Error;

/// Input rejected before it reaches storage.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("{}", Message::DescriptionEmpty)]
    EmptyDescription,

    #[error("{}", Message::InvalidTimeOfDay(.0.clone()))]
    InvalidTime(String),

    #[error("{}", Message::InvalidWorkHours(.0.clone()))]
    InvalidWorkHours(String),
}

/// Errors returned by the task service.
#[derive(Debug, Error)]
pub enum TaskError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error("{}", Message::TaskNotFoundWithId(*.0))]
    NotFound(i64),

    #[error("{}", Message::TaskAlreadyClosed(*.0))]
    AlreadyClosed(i64),

    /// Storage failure, shown to the user without ending the session.
    #[error(transparent)]
    Repository(#[from] anyhow::Error),
}

impl TaskError {
    pub fn is_validation(&self) -> bool {
        matches!(self, TaskError::Validation(_))
    }
}

pub type TaskResult<T> = Result<T, TaskError>;

/// Failures reported by the external time tracker.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum IntegrationError {
    #[error("{}", Message::IntegrationNotConfigured)]
    NotConfigured,

    /// Credentials were refused. Surfaced separately so it is not mistaken
    /// for a network blip.
    #[error("{}", Message::IntegrationUnauthorized)]
    Unauthorized,

    /// Field errors reported by the server.
    #[error("{}", Message::IntegrationRejected(.0.join(", ")))]
    Rejected(Vec<String>),

    #[error("{}", Message::IntegrationUnexpectedStatus(*.0))]
    UnexpectedStatus(u16),

    #[error("{}", Message::IntegrationTransport(.0.clone()))]
    Transport(String),
}

impl From<reqwest::Error> for IntegrationError {
    fn from(error: reqwest::Error) -> Self {
        IntegrationError::Transport(error.to_string())
    }
}

/// Transitions refused by the sync session.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SyncError {
    #[error("{}", Message::SyncLocked)]
    Locked,

    #[error("{}", Message::SyncActivitiesMissing)]
    ActivitiesMissing,

    /// The row has no activity list to pick from.
    #[error("{}", Message::SyncNoActivitiesLoaded(*.0))]
    NoActivities(usize),
}
