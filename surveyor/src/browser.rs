//! Paging through the responses of an owned survey.

use surveyor_types::{
    AnswerValue, Choice, PublishedQuestion, PublishedResponse, SurveyError, SurveyId, SurveyStore,
    Viewer,
};
use tracing::{debug, warn};

/// The responses of one survey, shown one at a time.
#[derive(Debug, Clone)]
pub struct ResponseBrowser {
    questions: Vec<PublishedQuestion>,
    responses: Vec<PublishedResponse>,
    index: usize,
}

impl ResponseBrowser {
    /// Fetch the questions, then the responses, of a survey owned by `viewer`.
    #[tracing::instrument(skip(store, viewer))]
    pub async fn load<S: SurveyStore>(
        store: &S,
        survey_id: SurveyId,
        viewer: &Viewer,
    ) -> Result<Self, SurveyError> {
        let owner = viewer.identity().ok_or(SurveyError::Unauthenticated)?;

        let questions = store
            .questions(survey_id)
            .await
            .inspect_err(|err| warn!(error = %err, "cannot load questions"))?
            .into_iter()
            .map(PublishedQuestion::try_from)
            .collect::<Result<Vec<_>, _>>()?;
        let responses = store
            .responses(survey_id, owner)
            .await
            .inspect_err(|err| warn!(error = %err, "cannot load responses"))?
            .into_iter()
            .map(PublishedResponse::try_from)
            .collect::<Result<Vec<_>, _>>()?;

        debug!(responses = responses.len(), "responses loaded");
        Self::from_parts(questions, responses)
    }

    /// Browse already decoded data. There must be at least one response.
    pub fn from_parts(
        mut questions: Vec<PublishedQuestion>,
        responses: Vec<PublishedResponse>,
    ) -> Result<Self, SurveyError> {
        if responses.is_empty() {
            return Err(SurveyError::NotFound("this survey has no responses yet".into()));
        }
        questions.sort_by_key(|q| q.position);
        Ok(Self {
            questions,
            responses,
            index: 0,
        })
    }

    pub fn questions(&self) -> &[PublishedQuestion] {
        &self.questions
    }

    /// Number of responses.
    pub fn len(&self) -> usize {
        self.responses.len()
    }

    /// Always `false`: a browser is never built without responses.
    pub fn is_empty(&self) -> bool {
        self.responses.is_empty()
    }

    /// Zero-based index of the current response.
    pub fn index(&self) -> usize {
        self.index
    }

    pub fn has_next(&self) -> bool {
        self.index + 1 < self.responses.len()
    }

    pub fn has_previous(&self) -> bool {
        self.index > 0
    }

    /// Move to the next response. Returns `false` on the last one.
    pub fn next_response(&mut self) -> bool {
        let moved = self.has_next();
        if moved {
            self.index += 1;
        }
        moved
    }

    /// Move to the previous response. Returns `false` on the first one.
    pub fn previous_response(&mut self) -> bool {
        let moved = self.has_previous();
        if moved {
            self.index -= 1;
        }
        moved
    }

    pub fn current(&self) -> &PublishedResponse {
        &self.responses[self.index]
    }

    /// One row per question, pairing it with the current response's answer.
    pub fn rows(&self) -> Vec<AnswerRow<'_>> {
        let response = &self.current().response;
        self.questions
            .iter()
            .map(|question| {
                let answer = match (response.answer_for(question.position), question.question.options()) {
                    (None, _) => RowAnswer::Skipped,
                    (Some(value), _) if value.is_blank() => RowAnswer::Skipped,
                    (Some(AnswerValue::Text(text)), _) => RowAnswer::Text(text.as_str()),
                    (Some(AnswerValue::Choices(selected)), Some(options)) => RowAnswer::Choices(
                        options
                            .iter()
                            .map(|choice| (choice, selected.contains(&choice.position())))
                            .collect(),
                    ),
                    (Some(AnswerValue::Choices(_)), None) => RowAnswer::Skipped,
                };
                AnswerRow { question, answer }
            })
            .collect()
    }
}

/// A question and what the current respondent made of it.
#[derive(Debug, Clone, PartialEq)]
pub struct AnswerRow<'a> {
    pub question: &'a PublishedQuestion,
    pub answer: RowAnswer<'a>,
}

/// The answer part of an [`AnswerRow`].
#[derive(Debug, Clone, PartialEq)]
pub enum RowAnswer<'a> {
    /// The respondent did not answer.
    Skipped,

    Text(&'a str),

    /// Every option of the question, flagged if it was selected.
    Choices(Vec<(&'a Choice, bool)>),
}

#[cfg(test)]
mod tests {
    use super::*;
    use surveyor_types::{Answer, OptionSet, Question, Response};

    fn questions() -> Vec<PublishedQuestion> {
        vec![
            PublishedQuestion {
                id: 1,
                position: 1,
                question: Question::closed_with_options(
                    "Pet?",
                    0,
                    2,
                    OptionSet::from_texts(["Cat", "Dog"]),
                ),
            },
            PublishedQuestion {
                id: 2,
                position: 2,
                question: Question::open("Why?", 0),
            },
        ]
    }

    fn response(id: i64, name: &str, answers: Vec<Answer>) -> PublishedResponse {
        PublishedResponse {
            id,
            response: Response::new(name, answers),
        }
    }

    #[test]
    fn no_responses_is_not_found() {
        assert!(matches!(
            ResponseBrowser::from_parts(questions(), Vec::new()),
            Err(SurveyError::NotFound(_))
        ));
    }

    #[test]
    fn navigation_stops_at_the_ends() {
        let mut browser = ResponseBrowser::from_parts(
            questions(),
            vec![
                response(1, "Ann", Vec::new()),
                response(2, "Bob", Vec::new()),
            ],
        )
        .unwrap();

        assert!(!browser.previous_response());
        assert_eq!(browser.current().response.name, "Ann");
        assert!(browser.next_response());
        assert_eq!(browser.index(), 1);
        assert!(!browser.next_response());
        assert_eq!(browser.current().response.name, "Bob");
        assert!(browser.previous_response());
        assert_eq!(browser.current().response.name, "Ann");
    }

    #[test]
    fn rows_pair_questions_with_answers() {
        let browser = ResponseBrowser::from_parts(
            questions(),
            vec![response(1, "Ann", vec![Answer::new(1, vec![2])])],
        )
        .unwrap();

        let rows = browser.rows();
        assert_eq!(rows.len(), 2);
        let RowAnswer::Choices(choices) = &rows[0].answer else {
            panic!("expected choices, got {:?}", rows[0].answer);
        };
        let flags: Vec<_> = choices.iter().map(|(c, selected)| (c.text(), *selected)).collect();
        assert_eq!(flags, vec![("Cat", false), ("Dog", true)]);
        assert_eq!(rows[1].answer, RowAnswer::Skipped);
    }

    #[test]
    fn text_answers() {
        let browser = ResponseBrowser::from_parts(
            questions(),
            vec![response(1, "Ann", vec![Answer::new(2, "they purr")])],
        )
        .unwrap();
        assert_eq!(browser.rows()[1].answer, RowAnswer::Text("they purr"));
        assert_eq!(browser.rows()[0].answer, RowAnswer::Skipped);
    }
}
