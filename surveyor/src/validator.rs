//! Checks a response against the questions it answers.

use std::collections::HashSet;

use surveyor_types::{
    AnswerValue, Field, Limits, PublishedQuestion, Question, QuestionKind, Response,
    ValidationReport, limits,
};

/// Validates answers for one survey.
#[derive(Debug, Clone, Default)]
pub struct AnswerValidator {
    limits: Limits,
}

impl AnswerValidator {
    pub fn new(limits: Limits) -> Self {
        Self { limits }
    }

    pub fn limits(&self) -> &Limits {
        &self.limits
    }

    /// Check one answer (or its absence) for the question at `position`.
    ///
    /// A missing answer is treated like a blank one: it fails mandatory
    /// questions and passes optional ones.
    pub fn check_answer(
        &self,
        position: u32,
        question: &Question,
        answer: Option<&AnswerValue>,
    ) -> ValidationReport {
        let mut report = ValidationReport::new();
        let field = Field::Question(position);

        match question.kind() {
            QuestionKind::Open => match answer {
                None => {
                    if question.is_mandatory() {
                        report.push(field, "this question is mandatory");
                    }
                }
                Some(AnswerValue::Text(text)) => {
                    if question.is_mandatory() && text.trim().is_empty() {
                        report.push(field, "this question is mandatory");
                    }
                }
                Some(AnswerValue::Choices(_)) => report.push(field, "expected a text answer"),
            },
            QuestionKind::Closed(closed) => {
                let choices = match answer {
                    None => &[][..],
                    Some(AnswerValue::Choices(choices)) => choices.as_slice(),
                    Some(AnswerValue::Text(_)) => {
                        report.push(field, "expected a choice answer");
                        return report;
                    }
                };

                let count = u32::try_from(closed.options.count()).unwrap_or(u32::MAX);
                let mut seen = HashSet::new();
                for &choice in choices {
                    if choice == 0 || choice > count {
                        report.push(field, format!("option {choice} does not exist"));
                    } else if !seen.insert(choice) {
                        report.push(field, format!("option {choice} selected more than once"));
                    }
                }

                let selected = u32::try_from(seen.len()).unwrap_or(u32::MAX);
                if selected < question.min() || selected > closed.max {
                    report.push(
                        field,
                        format!(
                            "must choose between {} and {} options",
                            question.min(),
                            closed.max
                        ),
                    );
                }
            }
        }

        report
    }

    /// Check the respondent's name.
    pub fn check_name(&self, name: &str) -> ValidationReport {
        let mut report = ValidationReport::new();
        if name.trim().is_empty() {
            report.push(Field::RespondentName, "cannot be empty");
        }
        if limits::exceeds(name, self.limits.respondent_name_max) {
            report.push(
                Field::RespondentName,
                format!(
                    "is too long (max {} characters)",
                    self.limits.respondent_name_max
                ),
            );
        }
        report
    }

    /// Check a whole response: the name, every question, and that each
    /// answer refers to exactly one existing question.
    pub fn validate(&self, questions: &[PublishedQuestion], response: &Response) -> ValidationReport {
        let mut report = self.check_name(&response.name);

        let mut answered = HashSet::new();
        for answer in &response.answers {
            let position = answer.question_position;
            if !questions.iter().any(|q| q.position == position) {
                report.push(Field::Question(position), "answer refers to unknown question");
            } else if !answered.insert(position) {
                report.push(Field::Question(position), "question answered more than once");
            }
        }

        for published in questions {
            report.extend(self.check_answer(
                published.position,
                &published.question,
                response.answer_for(published.position),
            ));
        }

        report
    }
}
