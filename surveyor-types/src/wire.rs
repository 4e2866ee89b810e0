//! The data-interchange boundary.
//!
//! Closed-question options and response answers cross the store boundary as a
//! single JSON document each, wrapped one level deep:
//!
//! ```text
//! {"options":[{"id":1,"text":"Cat"},{"id":2,"text":"Dog"}]}
//! {"answers":[{"id":1,"value":[1]},{"id":2,"value":"free text"}]}
//! ```
//!
//! Option `id`s are option positions; answer `id`s are question positions.
//! Everything that encodes or decodes these documents goes through this module.

use serde::{Deserialize, Serialize};

use crate::{Answer, OptionSet};

/// Error type for encoding and decoding boundary documents.
#[derive(Debug, thiserror::Error)]
pub enum CodecError {
    #[error("malformed {document} document: {source}")]
    Malformed {
        document: &'static str,
        #[source]
        source: serde_json::Error,
    },

    #[error("inconsistent record: {0}")]
    Inconsistent(String),
}

/// An option as stored: `id` is its position within the question.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoredOption {
    pub id: u32,
    pub text: String,
}

#[derive(Serialize, Deserialize)]
struct OptionsDocument {
    options: Vec<StoredOption>,
}

#[derive(Serialize, Deserialize)]
struct AnswersDocument {
    answers: Vec<Answer>,
}

/// Encode the options of a closed question.
pub fn encode_options(options: &OptionSet) -> Result<String, CodecError> {
    let document = OptionsDocument {
        options: options
            .iter()
            .map(|choice| StoredOption {
                id: choice.position(),
                text: choice.text().to_string(),
            })
            .collect(),
    };
    serde_json::to_string(&document).map_err(|source| CodecError::Malformed {
        document: "options",
        source,
    })
}

/// Decode stored options back into an option set.
///
/// Stored ids must be exactly the positions `1..=N` (in any order); the
/// decoded set has option ids equal to those positions.
pub fn decode_options(encoded: &str) -> Result<OptionSet, CodecError> {
    let mut document: OptionsDocument =
        serde_json::from_str(encoded).map_err(|source| CodecError::Malformed {
            document: "options",
            source,
        })?;
    document.options.sort_by_key(|option| option.id);

    let mut set = OptionSet::new();
    for (index, option) in document.options.into_iter().enumerate() {
        if usize::try_from(option.id).ok() != Some(index + 1) {
            return Err(CodecError::Inconsistent(format!(
                "option ids are not contiguous (found {} at position {})",
                option.id,
                index + 1
            )));
        }
        set.add(option.text);
    }
    Ok(set)
}

/// Encode the answers of a response.
pub fn encode_answers(answers: &[Answer]) -> Result<String, CodecError> {
    let document = AnswersDocument {
        answers: answers.to_vec(),
    };
    serde_json::to_string(&document).map_err(|source| CodecError::Malformed {
        document: "answers",
        source,
    })
}

/// Decode the answers of a stored response.
pub fn decode_answers(encoded: &str) -> Result<Vec<Answer>, CodecError> {
    let document: AnswersDocument =
        serde_json::from_str(encoded).map_err(|source| CodecError::Malformed {
            document: "answers",
            source,
        })?;
    Ok(document.answers)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{AnswerValue, OptionId};

    #[test]
    fn options_document_shape() {
        let options = OptionSet::from_texts(["Cat", "Dog"]);
        assert_eq!(
            encode_options(&options).unwrap(),
            r#"{"options":[{"id":1,"text":"Cat"},{"id":2,"text":"Dog"}]}"#
        );
    }

    #[test]
    fn option_ids_are_positions_after_removal() {
        let mut options = OptionSet::from_texts(["A", "B", "C"]);
        options.remove(OptionId::new(1)).unwrap();
        assert_eq!(
            encode_options(&options).unwrap(),
            r#"{"options":[{"id":1,"text":"B"},{"id":2,"text":"C"}]}"#
        );
    }

    #[test]
    fn decode_sorts_by_id() {
        let set = decode_options(r#"{"options":[{"id":2,"text":"No"},{"id":1,"text":"Yes"}]}"#)
            .unwrap();
        let texts: Vec<_> = set.iter().map(|c| c.text()).collect();
        assert_eq!(texts, vec!["Yes", "No"]);
        assert!(set.is_contiguous());
    }

    #[test]
    fn decode_rejects_gaps() {
        let err = decode_options(r#"{"options":[{"id":1,"text":"Yes"},{"id":3,"text":"No"}]}"#)
            .unwrap_err();
        assert!(matches!(err, CodecError::Inconsistent(_)));
    }

    #[test]
    fn decode_rejects_bare_lists() {
        let err = decode_options(r#"[{"id":1,"text":"Yes"}]"#).unwrap_err();
        assert!(matches!(
            err,
            CodecError::Malformed {
                document: "options",
                ..
            }
        ));
    }

    #[test]
    fn answers_document_shape() {
        let answers = vec![Answer::new(1, vec![1, 3]), Answer::new(2, "because")];
        let encoded = encode_answers(&answers).unwrap();
        assert_eq!(
            encoded,
            r#"{"answers":[{"id":1,"value":[1,3]},{"id":2,"value":"because"}]}"#
        );
        assert_eq!(decode_answers(&encoded).unwrap(), answers);
    }

    #[test]
    fn decode_answers_distinguishes_shapes() {
        let answers =
            decode_answers(r#"{"answers":[{"id":1,"value":[]},{"id":2,"value":""}]}"#).unwrap();
        assert_eq!(answers[0].value, AnswerValue::Choices(vec![]));
        assert_eq!(answers[1].value, AnswerValue::Text(String::new()));
    }
}
