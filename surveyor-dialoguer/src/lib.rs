//! # surveyor-dialoguer
//!
//! Dialoguer frontend for surveyor.
//!
//! Authoring runs as a menu over the draft; answering presents one question
//! at a time in a classic CLI wizard style; responses are paged one by one.
//!
//! ## Example
//!
//! ```rust,ignore
//! use surveyor::{AnsweringSession, SurveyId};
//! use surveyor_dialoguer::DialoguerBackend;
//!
//! let backend = DialoguerBackend::new();
//! let mut session = AnsweringSession::new(survey_id);
//! session.load(&store).await?;
//! backend.answer(&mut session)?;
//! let name = backend.ask_name()?;
//! session.submit(&store, &name).await?;
//! ```

mod backend;
pub mod render;

pub use backend::{DialoguerBackend, DialoguerError, DraftAction};
