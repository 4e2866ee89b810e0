//! Answering one survey, one question at a time.

use std::fmt;

use surveyor_types::{
    Answer, AnswerValue, CodecError, Limits, NewResponse, PublishedQuestion, Response,
    SurveyError, SurveyId, SurveyStore, limits,
};
use tracing::{debug, info, warn};

use crate::AnswerValidator;

/// Where a respondent is in a survey.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AnsweringState {
    /// Questions not fetched yet.
    Loading,

    /// Showing the question at this position.
    Presenting(u32),

    /// Every question answered; waiting for the name and the submit.
    ReviewComplete,

    /// The response is with the store.
    Submitting,

    /// The response was accepted. Terminal.
    Submitted,
}

impl fmt::Display for AnsweringState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Loading => write!(f, "loading"),
            Self::Presenting(position) => write!(f, "presenting question {position}"),
            Self::ReviewComplete => write!(f, "ready to submit"),
            Self::Submitting => write!(f, "submitting"),
            Self::Submitted => write!(f, "submitted"),
        }
    }
}

/// A respondent's pass through one survey.
///
/// Questions are presented in position order and there is no way back: each
/// answer is checked on its own before the next question is shown, and the
/// whole response is checked again before it is sent.
#[derive(Debug, Clone)]
pub struct AnsweringSession {
    survey_id: SurveyId,
    questions: Vec<PublishedQuestion>,
    answers: Vec<Answer>,
    state: AnsweringState,
    validator: AnswerValidator,
}

impl AnsweringSession {
    pub fn new(survey_id: SurveyId) -> Self {
        Self::with_limits(survey_id, Limits::default())
    }

    pub fn with_limits(survey_id: SurveyId, limits: Limits) -> Self {
        Self {
            survey_id,
            questions: Vec::new(),
            answers: Vec::new(),
            state: AnsweringState::Loading,
            validator: AnswerValidator::new(limits),
        }
    }

    pub fn survey_id(&self) -> SurveyId {
        self.survey_id
    }

    pub fn state(&self) -> AnsweringState {
        self.state
    }

    pub fn questions(&self) -> &[PublishedQuestion] {
        &self.questions
    }

    /// Answers accepted so far, in question order.
    pub fn answers(&self) -> &[Answer] {
        &self.answers
    }

    /// Fetch and decode the survey's questions, then present the first one.
    #[tracing::instrument(skip(self, store), fields(survey_id = %self.survey_id))]
    pub async fn load<S: SurveyStore>(&mut self, store: &S) -> Result<(), SurveyError> {
        if self.state != AnsweringState::Loading {
            return Err(SurveyError::OutOfSequence("questions are already loaded"));
        }
        let records = store.questions(self.survey_id).await.inspect_err(|err| {
            warn!(error = %err, "cannot load questions");
        })?;
        let questions = records
            .into_iter()
            .map(PublishedQuestion::try_from)
            .collect::<Result<Vec<_>, _>>()?;
        self.present(questions)
    }

    /// Start presenting already decoded questions.
    pub fn present(&mut self, mut questions: Vec<PublishedQuestion>) -> Result<(), SurveyError> {
        if self.state != AnsweringState::Loading {
            return Err(SurveyError::OutOfSequence("questions are already loaded"));
        }
        if questions.is_empty() {
            return Err(SurveyError::NotFound(format!(
                "survey {} has no questions",
                self.survey_id
            )));
        }
        questions.sort_by_key(|q| q.position);
        let contiguous = questions
            .iter()
            .zip(1u32..)
            .all(|(q, expected)| q.position == expected);
        if !contiguous {
            return Err(CodecError::Inconsistent(format!(
                "question positions of survey {} are not 1..{}",
                self.survey_id,
                questions.len()
            ))
            .into());
        }

        debug!(survey_id = %self.survey_id, questions = questions.len(), "questions loaded");
        self.questions = questions;
        self.state = AnsweringState::Presenting(1);
        Ok(())
    }

    /// The question waiting for an answer.
    pub fn current(&self) -> Option<&PublishedQuestion> {
        match self.state {
            AnsweringState::Presenting(position) => {
                self.questions.iter().find(|q| q.position == position)
            }
            _ => None,
        }
    }

    /// The current position and the number of questions.
    pub fn progress(&self) -> Option<(u32, usize)> {
        match self.state {
            AnsweringState::Presenting(position) => Some((position, self.questions.len())),
            _ => None,
        }
    }

    /// Answer the current question and advance.
    ///
    /// Selections are stored in ascending order and free text is cut at the
    /// configured cap. If the answer does not satisfy the question, the
    /// session stays on it and the report is returned.
    pub fn answer(&mut self, value: impl Into<AnswerValue>) -> Result<(), SurveyError> {
        let AnsweringState::Presenting(position) = self.state else {
            return Err(SurveyError::OutOfSequence("no question is being presented"));
        };
        let Some(current) = self.questions.iter().find(|q| q.position == position) else {
            return Err(SurveyError::OutOfSequence("no question is being presented"));
        };

        let value = match value.into() {
            AnswerValue::Choices(mut choices) => {
                choices.sort_unstable();
                AnswerValue::Choices(choices)
            }
            AnswerValue::Text(text) => {
                let cap = self.validator.limits().open_answer_max;
                if limits::exceeds(&text, cap) {
                    debug!(position, cap, "answer truncated");
                    AnswerValue::Text(text.chars().take(cap).collect())
                } else {
                    AnswerValue::Text(text)
                }
            }
        };

        self.validator
            .check_answer(position, &current.question, Some(&value))
            .into_result()?;

        self.answers.push(Answer::new(position, value));
        self.state = if usize::try_from(position).is_ok_and(|p| p >= self.questions.len()) {
            AnsweringState::ReviewComplete
        } else {
            AnsweringState::Presenting(position + 1)
        };
        Ok(())
    }

    /// Validate the full response and lock the session for sending.
    pub fn prepare(&mut self, name: &str) -> Result<NewResponse, SurveyError> {
        match self.state {
            AnsweringState::ReviewComplete => {}
            AnsweringState::Submitting => return Err(SurveyError::InFlight),
            AnsweringState::Submitted => return Err(SurveyError::AlreadySubmitted),
            AnsweringState::Loading | AnsweringState::Presenting(_) => {
                return Err(SurveyError::OutOfSequence(
                    "every question must be answered before submitting",
                ));
            }
        }

        let response = Response::new(name, self.answers.clone());
        let report = self.validator.validate(&self.questions, &response);
        if !report.is_empty() {
            warn!(survey_id = %self.survey_id, issues = report.len(), "response rejected");
            return Err(SurveyError::Validation(report));
        }

        let encoded = NewResponse::encode(&response)?;
        self.state = AnsweringState::Submitting;
        Ok(encoded)
    }

    /// Record the store's verdict on the prepared response.
    ///
    /// On failure the session goes back to `ReviewComplete` with its answers
    /// intact, so the respondent can retry.
    pub fn complete(&mut self, outcome: Result<i64, SurveyError>) -> Result<i64, SurveyError> {
        if self.state != AnsweringState::Submitting {
            return Err(SurveyError::OutOfSequence("no response is in flight"));
        }
        match &outcome {
            Ok(response_id) => {
                info!(survey_id = %self.survey_id, response_id, "response submitted");
                self.state = AnsweringState::Submitted;
            }
            Err(err) => {
                warn!(survey_id = %self.survey_id, error = %err, "response submission failed");
                self.state = AnsweringState::ReviewComplete;
            }
        }
        outcome
    }

    /// Validate, send and record the outcome in one step.
    #[tracing::instrument(skip(self, store), fields(survey_id = %self.survey_id))]
    pub async fn submit<S: SurveyStore>(
        &mut self,
        store: &S,
        name: &str,
    ) -> Result<i64, SurveyError> {
        let response = self.prepare(name)?;
        let outcome = store
            .create_response(self.survey_id, &response)
            .await
            .map_err(SurveyError::from);
        self.complete(outcome)
    }
}
