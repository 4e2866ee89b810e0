use serde::{Deserialize, Serialize};

/// The value given for one question.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum AnswerValue {
    /// Selected option positions (closed questions).
    Choices(Vec<u32>),

    /// Free text (open questions).
    Text(String),
}

impl AnswerValue {
    /// An answer selecting nothing.
    pub fn no_choice() -> Self {
        Self::Choices(Vec::new())
    }

    pub fn as_choices(&self) -> Option<&[u32]> {
        match self {
            Self::Choices(choices) => Some(choices),
            Self::Text(_) => None,
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text(text) => Some(text),
            Self::Choices(_) => None,
        }
    }

    /// Check whether the respondent left this answer blank.
    pub fn is_blank(&self) -> bool {
        match self {
            Self::Choices(choices) => choices.is_empty(),
            Self::Text(text) => text.trim().is_empty(),
        }
    }
}

impl From<Vec<u32>> for AnswerValue {
    fn from(choices: Vec<u32>) -> Self {
        Self::Choices(choices)
    }
}

impl From<String> for AnswerValue {
    fn from(text: String) -> Self {
        Self::Text(text)
    }
}

impl From<&str> for AnswerValue {
    fn from(text: &str) -> Self {
        Self::Text(text.to_string())
    }
}

/// One answer, correlated with its question by position rather than by any
/// stored identifier.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Answer {
    #[serde(rename = "id")]
    pub question_position: u32,
    pub value: AnswerValue,
}

impl Answer {
    pub fn new(question_position: u32, value: impl Into<AnswerValue>) -> Self {
        Self {
            question_position,
            value: value.into(),
        }
    }
}

/// A respondent's submission for one survey.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Response {
    /// The respondent's self-reported name.
    pub name: String,

    /// Answers in question order.
    pub answers: Vec<Answer>,
}

impl Response {
    pub fn new(name: impl Into<String>, answers: Vec<Answer>) -> Self {
        Self {
            name: name.into(),
            answers,
        }
    }

    /// The answer given for the question at `position`, if any.
    pub fn answer_for(&self, position: u32) -> Option<&AnswerValue> {
        self.answers
            .iter()
            .find(|answer| answer.question_position == position)
            .map(|answer| &answer.value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blank_answers() {
        assert!(AnswerValue::no_choice().is_blank());
        assert!(AnswerValue::from("  ").is_blank());
        assert!(!AnswerValue::from(vec![1]).is_blank());
        assert!(!AnswerValue::from("hi").is_blank());
    }

    #[test]
    fn answer_for_correlates_by_position() {
        let response = Response::new(
            "Ann",
            vec![Answer::new(2, "because"), Answer::new(1, vec![1])],
        );
        assert_eq!(response.answer_for(1), Some(&AnswerValue::Choices(vec![1])));
        assert_eq!(
            response.answer_for(2).and_then(AnswerValue::as_text),
            Some("because")
        );
        assert!(response.answer_for(3).is_none());
    }
}
