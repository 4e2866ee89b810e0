//! Records exchanged with the store, and their decoded forms.

use serde::{Deserialize, Serialize};

use crate::{
    CodecError, Question, Response, SurveyId,
    wire::{decode_answers, decode_options, encode_answers, encode_options},
};

/// Public catalog entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SurveySummary {
    pub id: SurveyId,
    pub title: String,
    pub admin_name: String,
}

/// Catalog entry as seen by the survey's owner.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OwnedSurveySummary {
    pub id: SurveyId,
    pub title: String,
    pub num_answers: u32,
}

/// A question as handed to the store. `options` is an encoded document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewQuestion {
    pub title: String,
    pub position: u32,
    pub min: u32,
    pub max: Option<u32>,
    pub options: Option<String>,
}

impl NewQuestion {
    /// Encode a question for the given position.
    pub fn encode(position: u32, question: &Question) -> Result<Self, CodecError> {
        let options = question.options().map(encode_options).transpose()?;
        Ok(Self {
            title: question.title().to_string(),
            position,
            min: question.min(),
            max: question.max(),
            options,
        })
    }
}

/// A question as returned by the store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuestionRecord {
    pub id: i64,
    pub title: String,
    pub position: u32,
    pub min: u32,
    pub max: Option<u32>,
    pub options: Option<String>,
}

/// A persisted, read-only question ready for answering or display.
#[derive(Debug, Clone, PartialEq)]
pub struct PublishedQuestion {
    pub id: i64,
    pub position: u32,
    pub question: Question,
}

impl TryFrom<QuestionRecord> for PublishedQuestion {
    type Error = CodecError;

    fn try_from(record: QuestionRecord) -> Result<Self, Self::Error> {
        let question = match (record.max, record.options.as_deref()) {
            (None, None) => Question::open(record.title, record.min),
            (Some(max), Some(encoded)) => {
                Question::closed_with_options(record.title, record.min, max, decode_options(encoded)?)
            }
            _ => {
                return Err(CodecError::Inconsistent(format!(
                    "question at position {} must have both max and options or neither",
                    record.position
                )));
            }
        };
        Ok(Self {
            id: record.id,
            position: record.position,
            question,
        })
    }
}

/// A response as handed to the store. `answers` is an encoded document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewResponse {
    pub name: String,
    pub answers: String,
}

impl NewResponse {
    pub fn encode(response: &Response) -> Result<Self, CodecError> {
        Ok(Self {
            name: response.name.clone(),
            answers: encode_answers(&response.answers)?,
        })
    }
}

/// A response as returned by the store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResponseRecord {
    pub id: i64,
    pub name: String,
    pub answers: String,
}

/// A persisted response with its answers decoded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PublishedResponse {
    pub id: i64,
    pub response: Response,
}

impl TryFrom<ResponseRecord> for PublishedResponse {
    type Error = CodecError;

    fn try_from(record: ResponseRecord) -> Result<Self, Self::Error> {
        Ok(Self {
            id: record.id,
            response: Response::new(record.name, decode_answers(&record.answers)?),
        })
    }
}
