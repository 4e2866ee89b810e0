//! The survey being authored.
//!
//! A [`SurveyDraft`] holds an ordered, editable list of questions and moves
//! through `Empty -> Editing -> ReadyToSubmit -> Submitted`. A rejected
//! submission leaves it in `Failed`, from which any edit (or another submit)
//! continues. Validation runs only when submitting, so incomplete
//! intermediate states are fine while editing.

use std::fmt;

use surveyor_types::{
    Choice, Field, Identity, Limits, NewQuestion, NotFound, OptionId, Positioned, Question,
    QuestionId, Ranked, SurveyError, SurveyId, SurveyStore, ValidationReport, limits,
};
use tracing::{debug, info, warn};

/// Where a draft is in its lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DraftState {
    /// Nothing entered yet.
    Empty,

    /// Being edited.
    Editing,

    /// Validated and handed to the store; awaiting the outcome.
    ReadyToSubmit,

    /// Stored under the given id. Terminal.
    Submitted(SurveyId),

    /// The last submission was rejected or failed. Editable.
    Failed,
}

impl DraftState {
    /// Check if edits are accepted in this state.
    pub fn is_editable(&self) -> bool {
        !matches!(self, Self::ReadyToSubmit | Self::Submitted(_))
    }
}

impl fmt::Display for DraftState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Empty => write!(f, "empty"),
            Self::Editing => write!(f, "editing"),
            Self::ReadyToSubmit => write!(f, "submitting"),
            Self::Submitted(id) => write!(f, "submitted as survey {id}"),
            Self::Failed => write!(f, "failed"),
        }
    }
}

/// Error type for draft editing.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DraftError {
    #[error(transparent)]
    NotFound(#[from] NotFound),

    #[error("question {0} is an open question and has no options")]
    NotClosed(QuestionId),

    #[error("the draft cannot be edited while {0}")]
    Locked(DraftState),
}

/// A question placed in a draft.
#[derive(Debug, Clone, PartialEq)]
pub struct DraftQuestion {
    id: QuestionId,
    position: u32,
    question: Question,
}

impl DraftQuestion {
    pub fn id(&self) -> QuestionId {
        self.id
    }

    pub fn position(&self) -> u32 {
        self.position
    }

    pub fn question(&self) -> &Question {
        &self.question
    }
}

impl Positioned for DraftQuestion {
    fn position(&self) -> u32 {
        self.position
    }

    fn set_position(&mut self, position: u32) {
        self.position = position;
    }
}

/// An in-progress survey.
#[derive(Debug, Clone)]
pub struct SurveyDraft {
    title: String,
    questions: Ranked<DraftQuestion>,
    next_id: u32,
    state: DraftState,
    limits: Limits,
}

impl SurveyDraft {
    /// Create an empty draft with default limits.
    pub fn new() -> Self {
        Self::with_limits(Limits::default())
    }

    /// Create an empty draft validated against `limits`.
    pub fn with_limits(limits: Limits) -> Self {
        Self {
            title: String::new(),
            questions: Ranked::new(),
            next_id: 1,
            state: DraftState::Empty,
            limits,
        }
    }

    pub fn state(&self) -> DraftState {
        self.state
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn limits(&self) -> &Limits {
        &self.limits
    }

    /// Number of questions.
    pub fn len(&self) -> usize {
        self.questions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.questions.is_empty()
    }

    /// The position the next added question will take.
    pub fn next_position(&self) -> u32 {
        self.questions.next_position()
    }

    /// Iterate over the questions in position order.
    pub fn questions(&self) -> impl Iterator<Item = &DraftQuestion> {
        self.questions.iter()
    }

    /// Get a question by id.
    pub fn question(&self, id: QuestionId) -> Option<&DraftQuestion> {
        self.questions.find(|q| q.id == id)
    }

    /// Check the question positions invariant.
    pub fn is_contiguous(&self) -> bool {
        self.questions.is_contiguous()
    }

    pub fn set_title(&mut self, title: impl Into<String>) -> Result<(), DraftError> {
        self.ensure_editable()?;
        self.title = title.into();
        debug!(title = %self.title, "title set");
        self.settle();
        Ok(())
    }

    /// Append a question at the next position.
    pub fn add_question(&mut self, question: Question) -> Result<QuestionId, DraftError> {
        self.ensure_editable()?;
        let id = QuestionId::new(self.next_id);
        self.next_id += 1;
        let position = self.questions.push(DraftQuestion {
            id,
            position: 0,
            question,
        });
        debug!(%id, position, "question added");
        self.settle();
        Ok(id)
    }

    /// Remove a question; every later question moves up one position.
    pub fn delete_question(&mut self, id: QuestionId) -> Result<Question, DraftError> {
        self.ensure_editable()?;
        let removed = self
            .questions
            .remove_first(|q| q.id == id)
            .ok_or(NotFound::Question(id))?;
        debug!(%id, position = removed.position, "question deleted");
        self.settle();
        Ok(removed.question)
    }

    /// Swap the question at `position` with the one above it.
    ///
    /// Returns `Ok(false)` without changing anything at the first position.
    pub fn move_up(&mut self, position: u32) -> Result<bool, DraftError> {
        self.ensure_editable()?;
        let moved = self.questions.swap_with_previous(position);
        if moved {
            debug!(from = position, to = position - 1, "question moved up");
            self.settle();
        }
        Ok(moved)
    }

    /// Swap the question at `position` with the one below it.
    ///
    /// Returns `Ok(false)` without changing anything at the last position.
    pub fn move_down(&mut self, position: u32) -> Result<bool, DraftError> {
        self.ensure_editable()?;
        let moved = self.questions.swap_with_next(position);
        if moved {
            debug!(from = position, to = position + 1, "question moved down");
            self.settle();
        }
        Ok(moved)
    }

    /// Edit a question in place.
    pub fn question_mut(&mut self, id: QuestionId) -> Result<&mut Question, DraftError> {
        self.ensure_editable()?;
        if self.questions.find(|q| q.id == id).is_none() {
            return Err(NotFound::Question(id).into());
        }
        self.settle();
        self.questions
            .find_mut(|q| q.id == id)
            .map(|q| &mut q.question)
            .ok_or(DraftError::NotFound(NotFound::Question(id)))
    }

    /// Append an option to a closed question.
    pub fn add_option(
        &mut self,
        id: QuestionId,
        text: impl Into<String>,
    ) -> Result<OptionId, DraftError> {
        let options = self
            .question_mut(id)?
            .options_mut()
            .ok_or(DraftError::NotClosed(id))?;
        let option = options.add(text);
        debug!(question = %id, %option, "option added");
        Ok(option)
    }

    /// Replace an option's text. Returns whether the option existed.
    pub fn edit_option(
        &mut self,
        id: QuestionId,
        option: OptionId,
        text: impl Into<String>,
    ) -> Result<bool, DraftError> {
        let options = self
            .question_mut(id)?
            .options_mut()
            .ok_or(DraftError::NotClosed(id))?;
        let edited = options.edit(option, text);
        if edited {
            debug!(question = %id, %option, "option edited");
        }
        Ok(edited)
    }

    /// Remove an option; later options move up one position.
    pub fn remove_option(&mut self, id: QuestionId, option: OptionId) -> Result<Choice, DraftError> {
        let options = self
            .question_mut(id)?
            .options_mut()
            .ok_or(DraftError::NotClosed(id))?;
        let removed = options.remove(option)?;
        debug!(question = %id, %option, "option removed");
        Ok(removed)
    }

    /// Run every submission-time check and collect all violations.
    pub fn validate(&self) -> ValidationReport {
        let mut report = ValidationReport::new();

        if self.title.trim().is_empty() {
            report.push(Field::SurveyTitle, "cannot be empty");
        }
        if limits::exceeds(&self.title, self.limits.survey_title_max) {
            report.push(
                Field::SurveyTitle,
                format!(
                    "is too long (max {} characters)",
                    self.limits.survey_title_max
                ),
            );
        }
        if self.questions.is_empty() {
            report.push(Field::Survey, "must have at least one question");
        }
        for draft_question in &self.questions {
            report.extend(
                draft_question
                    .question
                    .validate(draft_question.position, &self.limits),
            );
        }

        report
    }

    /// Validate and lock the draft for submission.
    ///
    /// On success the draft is `ReadyToSubmit` and stays locked until
    /// [`SurveyDraft::complete_submit`] is called with the outcome. A second
    /// call while a submission is outstanding is rejected with
    /// [`SurveyError::InFlight`]. Validation failures never reach the store.
    pub fn begin_submit(&mut self) -> Result<Submission, SurveyError> {
        match self.state {
            DraftState::ReadyToSubmit => return Err(SurveyError::InFlight),
            DraftState::Submitted(_) => return Err(SurveyError::AlreadySubmitted),
            _ => {}
        }

        let report = self.validate();
        if !report.is_empty() {
            warn!(issues = report.len(), "draft rejected");
            self.state = DraftState::Failed;
            return Err(SurveyError::Validation(report));
        }

        let questions = self
            .questions
            .iter()
            .map(|q| NewQuestion::encode(q.position, &q.question))
            .collect::<Result<Vec<_>, _>>();
        let questions = match questions {
            Ok(questions) => questions,
            Err(err) => {
                self.state = DraftState::Failed;
                return Err(err.into());
            }
        };

        self.state = DraftState::ReadyToSubmit;
        Ok(Submission {
            title: self.title.clone(),
            questions,
        })
    }

    /// Record the outcome of the outstanding submission.
    ///
    /// Success makes the draft `Submitted`; failure returns it to `Failed`
    /// with its content untouched so the author can retry.
    pub fn complete_submit(
        &mut self,
        outcome: Result<SurveyId, SurveyError>,
    ) -> Result<SurveyId, SurveyError> {
        if self.state != DraftState::ReadyToSubmit {
            return Err(SurveyError::OutOfSequence("no submission is in flight"));
        }
        match &outcome {
            Ok(survey_id) => {
                info!(%survey_id, questions = self.questions.len(), "survey submitted");
                self.state = DraftState::Submitted(*survey_id);
            }
            Err(err) => {
                warn!(error = %err, "survey submission failed");
                self.state = DraftState::Failed;
            }
        }
        outcome
    }

    /// Give up on the outstanding submission without an outcome.
    ///
    /// Used when the [`Submission`] is dropped or its future cancelled; the
    /// draft returns to `Failed` so it can be edited and resubmitted.
    pub fn abort_submit(&mut self) -> Result<(), SurveyError> {
        if self.state != DraftState::ReadyToSubmit {
            return Err(SurveyError::OutOfSequence("no submission is in flight"));
        }
        warn!("survey submission abandoned");
        self.state = DraftState::Failed;
        Ok(())
    }

    /// Validate, store and record the outcome in one step.
    #[tracing::instrument(skip_all, fields(owner = %owner.name))]
    pub async fn submit<S: SurveyStore>(
        &mut self,
        store: &S,
        owner: &Identity,
    ) -> Result<SurveyId, SurveyError> {
        let submission = self.begin_submit()?;
        let outcome = submission.send(store, owner).await;
        self.complete_submit(outcome)
    }

    fn ensure_editable(&self) -> Result<(), DraftError> {
        if self.state.is_editable() {
            Ok(())
        } else {
            Err(DraftError::Locked(self.state))
        }
    }

    fn settle(&mut self) {
        self.state = if self.title.is_empty() && self.questions.is_empty() {
            DraftState::Empty
        } else {
            DraftState::Editing
        };
    }
}

impl Default for SurveyDraft {
    fn default() -> Self {
        Self::new()
    }
}

/// A validated draft, encoded for the store.
#[derive(Debug, Clone, PartialEq)]
pub struct Submission {
    title: String,
    questions: Vec<NewQuestion>,
}

impl Submission {
    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn questions(&self) -> &[NewQuestion] {
        &self.questions
    }

    /// Create the survey, then each question in position order.
    ///
    /// Nothing is rolled back: if a question fails after the survey row
    /// exists, the error reports how many questions made it.
    #[tracing::instrument(skip_all, fields(title = %self.title, questions = self.questions.len()))]
    pub async fn send<S: SurveyStore>(
        &self,
        store: &S,
        owner: &Identity,
    ) -> Result<SurveyId, SurveyError> {
        let survey_id = store.create_survey(owner, &self.title).await?;
        let total = self.questions.len();
        for (persisted, question) in self.questions.iter().enumerate() {
            if let Err(source) = store.create_question(survey_id, question).await {
                warn!(%survey_id, persisted, total, error = %source, "question was not stored");
                return Err(SurveyError::PartiallyPersisted {
                    survey_id,
                    persisted,
                    total,
                    source,
                });
            }
        }
        Ok(survey_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use surveyor_types::OptionSet;

    fn titles(draft: &SurveyDraft) -> Vec<(&str, u32)> {
        draft
            .questions()
            .map(|q| (q.question().title(), q.position()))
            .collect()
    }

    fn pets() -> SurveyDraft {
        let mut draft = SurveyDraft::new();
        draft.set_title("Pets").unwrap();
        draft
            .add_question(Question::closed_with_options(
                "Favorite animal?",
                1,
                1,
                OptionSet::from_texts(["Cat", "Dog"]),
            ))
            .unwrap();
        draft
    }

    #[test]
    fn starts_empty() {
        let draft = SurveyDraft::new();
        assert_eq!(draft.state(), DraftState::Empty);
        assert_eq!(draft.next_position(), 1);
        assert!(draft.is_empty());
    }

    #[test]
    fn add_appends_and_delete_renumbers() {
        let mut draft = SurveyDraft::new();
        let a = draft.add_question(Question::open("A", 0)).unwrap();
        let b = draft.add_question(Question::open("B", 0)).unwrap();
        let c = draft.add_question(Question::open("C", 0)).unwrap();
        assert_eq!(draft.state(), DraftState::Editing);
        assert_eq!(draft.next_position(), 4);

        draft.delete_question(b).unwrap();
        assert_eq!(titles(&draft), vec![("A", 1), ("C", 2)]);
        assert_eq!(draft.next_position(), 3);
        assert_eq!(draft.question(c).unwrap().position(), 2);

        let d = draft.add_question(Question::open("D", 0)).unwrap();
        assert_ne!(d, b);
        assert_eq!(titles(&draft), vec![("A", 1), ("C", 2), ("D", 3)]);

        draft.delete_question(a).unwrap();
        draft.delete_question(c).unwrap();
        draft.delete_question(d).unwrap();
        assert_eq!(draft.state(), DraftState::Empty);
    }

    #[test]
    fn delete_unknown_question() {
        let mut draft = pets();
        let err = draft.delete_question(QuestionId::new(99)).unwrap_err();
        assert_eq!(
            err,
            DraftError::NotFound(NotFound::Question(QuestionId::new(99)))
        );
        assert_eq!(draft.len(), 1);
    }

    #[test]
    fn moves_are_disabled_at_the_boundaries() {
        let mut draft = SurveyDraft::new();
        draft.add_question(Question::open("A", 0)).unwrap();
        draft.add_question(Question::open("B", 0)).unwrap();

        assert!(!draft.move_up(1).unwrap());
        assert!(!draft.move_down(2).unwrap());
        assert_eq!(titles(&draft), vec![("A", 1), ("B", 2)]);

        assert!(draft.move_down(1).unwrap());
        assert_eq!(titles(&draft), vec![("B", 1), ("A", 2)]);
        assert!(draft.move_up(2).unwrap());
        assert_eq!(titles(&draft), vec![("A", 1), ("B", 2)]);
    }

    #[test]
    fn option_editing_through_the_draft() {
        let mut draft = SurveyDraft::new();
        let closed = draft.add_question(Question::closed("Pick", 0, 2)).unwrap();
        let open = draft.add_question(Question::open("Why?", 0)).unwrap();

        let a = draft.add_option(closed, "A").unwrap();
        let b = draft.add_option(closed, "").unwrap();
        assert!(draft.edit_option(closed, b, "B").unwrap());
        assert_eq!(draft.remove_option(closed, a).unwrap().text(), "A");

        let options = draft.question(closed).unwrap().question().options().unwrap();
        assert_eq!(options.at(1).unwrap().text(), "B");

        assert_eq!(
            draft.add_option(open, "X").unwrap_err(),
            DraftError::NotClosed(open)
        );
        assert_eq!(
            draft.remove_option(closed, a).unwrap_err(),
            DraftError::NotFound(NotFound::Option(a))
        );
    }

    #[test]
    fn validate_aggregates_every_clause() {
        let mut draft = SurveyDraft::new();
        draft.add_question(Question::closed("", 2, 1)).unwrap();
        draft.add_question(Question::open("Fine", 0)).unwrap();

        let report = draft.validate();
        assert!(report.mentions(Field::SurveyTitle));
        assert!(report.mentions(Field::Question(1)));
        assert!(!report.mentions(Field::Question(2)));
        assert!(report.len() >= 4);
    }

    #[test]
    fn empty_survey_is_rejected() {
        let mut draft = SurveyDraft::new();
        draft.set_title("Nothing").unwrap();
        let err = draft.begin_submit().unwrap_err();
        let report = err.report().unwrap();
        assert!(report.mentions(Field::Survey));
        assert_eq!(draft.state(), DraftState::Failed);
    }

    #[test]
    fn failed_draft_returns_to_editing() {
        let mut draft = pets();
        draft.set_title("").unwrap();
        assert!(draft.begin_submit().unwrap_err().is_validation());
        assert_eq!(draft.state(), DraftState::Failed);

        draft.set_title("Pets").unwrap();
        assert_eq!(draft.state(), DraftState::Editing);
    }

    #[test]
    fn second_begin_submit_is_rejected_while_in_flight() {
        let mut draft = pets();
        let submission = draft.begin_submit().unwrap();
        assert_eq!(submission.title(), "Pets");
        assert_eq!(submission.questions().len(), 1);
        assert_eq!(draft.state(), DraftState::ReadyToSubmit);

        assert!(matches!(draft.begin_submit(), Err(SurveyError::InFlight)));
        assert_eq!(
            draft.add_question(Question::open("late", 0)).unwrap_err(),
            DraftError::Locked(DraftState::ReadyToSubmit)
        );
    }

    #[test]
    fn abandoned_submission_unlocks_the_draft() {
        let mut draft = pets();
        drop(draft.begin_submit().unwrap());
        assert_eq!(draft.state(), DraftState::ReadyToSubmit);

        draft.abort_submit().unwrap();
        assert_eq!(draft.state(), DraftState::Failed);
        assert!(matches!(
            draft.abort_submit(),
            Err(SurveyError::OutOfSequence(_))
        ));

        draft.add_question(Question::open("Why?", 0)).unwrap();
        assert_eq!(draft.state(), DraftState::Editing);
        assert!(draft.begin_submit().is_ok());
    }

    #[test]
    fn unknown_question_leaves_failed_state() {
        let mut draft = pets();
        draft.set_title("").unwrap();
        assert!(draft.begin_submit().is_err());

        let missing = QuestionId::new(99);
        assert_eq!(
            draft.question_mut(missing).unwrap_err(),
            DraftError::NotFound(NotFound::Question(missing))
        );
        assert!(draft.add_option(missing, "Cat").is_err());
        assert_eq!(draft.state(), DraftState::Failed);
    }

    #[test]
    fn complete_submit_records_the_outcome() {
        let mut draft = pets();
        draft.begin_submit().unwrap();
        let err = draft
            .complete_submit(Err(SurveyError::Persistence("disk full".into())))
            .unwrap_err();
        assert!(err.is_retryable());
        assert_eq!(draft.state(), DraftState::Failed);
        assert_eq!(draft.len(), 1);

        draft.begin_submit().unwrap();
        let id = draft.complete_submit(Ok(SurveyId::new(5))).unwrap();
        assert_eq!(draft.state(), DraftState::Submitted(id));
        assert!(matches!(
            draft.begin_submit(),
            Err(SurveyError::AlreadySubmitted)
        ));
        assert!(matches!(
            draft.complete_submit(Ok(id)),
            Err(SurveyError::OutOfSequence(_))
        ));
    }

    #[test]
    fn custom_limits() {
        let mut draft = SurveyDraft::with_limits(Limits {
            survey_title_max: 4,
            ..Limits::default()
        });
        draft.set_title("Pets!").unwrap();
        draft.add_question(Question::open("Why?", 0)).unwrap();
        let report = draft.validate();
        assert_eq!(report.len(), 1);
        assert_eq!(
            report.issues()[0].to_string(),
            "survey title: is too long (max 4 characters)"
        );
    }
}
