use serde::{Deserialize, Serialize};

/// Length bounds applied at submission time.
///
/// Lengths are counted in characters, not bytes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Limits {
    pub survey_title_max: usize,
    pub question_title_max: usize,
    pub respondent_name_max: usize,
    /// Cap on free-text answers, enforced where answers enter a session.
    pub open_answer_max: usize,
}

impl Default for Limits {
    fn default() -> Self {
        Self {
            survey_title_max: 100,
            question_title_max: 100,
            respondent_name_max: 25,
            open_answer_max: 200,
        }
    }
}

/// Check whether `text` is longer than `max` characters.
pub fn exceeds(text: &str, max: usize) -> bool {
    text.chars().count() > max
}
