//! # surveyor
//!
//! Author surveys and collect validated responses. Store-agnostic.
//!
//! ## Usage
//!
//! ```rust,ignore
//! use surveyor::{OptionSet, Question, SurveyDraft};
//!
//! let mut draft = SurveyDraft::new();
//! draft.set_title("Pets")?;
//! draft.add_question(Question::closed_with_options(
//!     "Favorite animal?",
//!     1,
//!     1,
//!     OptionSet::from_texts(["Cat", "Dog"]),
//! ))?;
//!
//! // Validates everything, then creates the survey and its questions
//! let survey_id = draft.submit(&store, &owner).await?;
//!
//! // A respondent answers one question at a time
//! let mut session = AnsweringSession::new(survey_id);
//! session.load(&store).await?;
//! session.answer(vec![1])?;
//! session.submit(&store, "Ann").await?;
//! ```
//!
//! ## Components
//!
//! - `SurveyDraft` - the authoring state machine; owns question ordering
//! - `AnswerValidator` - checks answers against persisted questions
//! - `AnsweringSession` - the one-way answering flow
//! - `ResponseBrowser` - one response at a time, for the survey's owner
//! - `browse` - the survey catalog for the current viewer
//!
//! ## Stores
//!
//! Anything implementing `SurveyStore` and `Authenticator`. `MemoryStore`
//! keeps everything in memory and supports fault injection for tests.

// Re-export all types from surveyor-types
pub use surveyor_types::*;

mod draft;
pub use draft::{DraftError, DraftQuestion, DraftState, Submission, SurveyDraft};

mod validator;
pub use validator::AnswerValidator;

mod answering;
pub use answering::{AnsweringSession, AnsweringState};

mod browser;
pub use browser::{AnswerRow, ResponseBrowser, RowAnswer};

mod catalog;
pub use catalog::{SurveyListing, browse};

mod memory_store;
pub use memory_store::{
    AdminAccount, Fault, MemoryStore, Snapshot, StoreOp, StoredSurvey, hash_password,
};
