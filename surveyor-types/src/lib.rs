//! Core types for surveyor.
//!
//! This crate provides the presentation-agnostic model behind survey authoring
//! and answering:
//! - `OptionSet` and `Question` - what an author builds
//! - `Answer` and `Response` - what a respondent submits
//! - `Ranked` - the ordered sequence that keeps positions contiguous
//! - `ValidationReport` and `SurveyError` - how problems are reported
//! - `SurveyStore` and `Authenticator` traits - the external collaborators
//! - `wire` - the encoded documents exchanged with the store

mod ids;
pub use ids::{OptionId, QuestionId, SurveyId};

mod position;
pub use position::{Positioned, Ranked};

mod validation;
pub use validation::{Field, ValidationIssue, ValidationReport};

pub mod limits;
pub use limits::Limits;

mod option_set;
pub use option_set::{Choice, OptionSet};

mod question;
pub use question::{ClosedQuestion, Question, QuestionKind};

mod answer;
pub use answer::{Answer, AnswerValue, Response};

pub mod wire;
pub use wire::{CodecError, StoredOption};

mod records;
pub use records::{
    NewQuestion, NewResponse, OwnedSurveySummary, PublishedQuestion, PublishedResponse,
    QuestionRecord, ResponseRecord, SurveySummary,
};

mod auth;
pub use auth::{AuthError, Credentials, Identity, Viewer};

mod error;
pub use error::{NotFound, StoreError, SurveyError};

mod traits;
pub use traits::{Authenticator, SurveyStore};
