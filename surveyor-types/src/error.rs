use crate::{CodecError, OptionId, QuestionId, SurveyId, ValidationReport};

/// A lookup by draft-local identity found nothing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum NotFound {
    #[error("option {0} does not exist")]
    Option(OptionId),

    #[error("question {0} does not exist")]
    Question(QuestionId),
}

/// Failure reported by a persistence collaborator.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// The requested survey, question set or response set does not exist or is
    /// not visible to the requester.
    #[error("{0}")]
    NotFound(String),

    /// The round trip did not complete or its answer could not be read.
    #[error("cannot communicate with the store: {0}")]
    Communication(#[source] anyhow::Error),

    /// The store understood the request but failed to persist it.
    #[error("storage failure: {0}")]
    Persistence(String),
}

impl StoreError {
    pub fn communication(err: impl Into<anyhow::Error>) -> Self {
        Self::Communication(err.into())
    }
}

/// Error type for authoring, answering and browsing operations.
///
/// Every failure reaches the caller as one of these values; nothing is
/// retried automatically.
#[derive(Debug, thiserror::Error)]
pub enum SurveyError {
    /// User-correctable input problems, all of them at once.
    #[error("validation failed:\n{0}")]
    Validation(ValidationReport),

    /// Nothing to show: the survey or its responses do not exist.
    #[error("nothing here: {0}")]
    NotFound(String),

    /// The collaborator could not be reached or returned unparseable content.
    #[error("cannot communicate with the server, try again later")]
    Communication(#[source] anyhow::Error),

    /// The collaborator reported a storage failure.
    #[error("storage failure: {0}")]
    Persistence(String),

    /// The survey row exists but not every question could be stored.
    #[error("survey {survey_id} was created but only {persisted} of {total} questions were stored")]
    PartiallyPersisted {
        survey_id: SurveyId,
        persisted: usize,
        total: usize,
        #[source]
        source: StoreError,
    },

    /// A submission is already outstanding.
    #[error("a submission is already in flight")]
    InFlight,

    /// The draft or response was already accepted.
    #[error("already submitted")]
    AlreadySubmitted,

    /// The operation does not fit the current state of the session.
    #[error("out of sequence: {0}")]
    OutOfSequence(&'static str),

    /// An owner-only operation was attempted without an identity.
    #[error("not authenticated")]
    Unauthenticated,
}

impl SurveyError {
    /// Check if this error carries a validation report.
    pub fn is_validation(&self) -> bool {
        matches!(self, Self::Validation(_))
    }

    /// Check if re-submitting the same input may succeed.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            Self::Communication(_) | Self::Persistence(_) | Self::PartiallyPersisted { .. }
        )
    }

    /// The validation report, if this is a validation failure.
    pub fn report(&self) -> Option<&ValidationReport> {
        match self {
            Self::Validation(report) => Some(report),
            _ => None,
        }
    }
}

impl From<StoreError> for SurveyError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::NotFound(message) => Self::NotFound(message),
            StoreError::Communication(source) => Self::Communication(source),
            StoreError::Persistence(message) => Self::Persistence(message),
        }
    }
}

impl From<CodecError> for SurveyError {
    fn from(err: CodecError) -> Self {
        Self::Communication(err.into())
    }
}

impl From<ValidationReport> for SurveyError {
    fn from(report: ValidationReport) -> Self {
        Self::Validation(report)
    }
}
