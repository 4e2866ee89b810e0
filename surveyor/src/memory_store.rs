//! An in-process store and authenticator.
//!
//! `MemoryStore` implements both collaborator traits over a [`Snapshot`]
//! held in memory. The snapshot is plain serde data, so a frontend can load
//! it from and save it to disk. For tests, faults can be queued per
//! operation and every call is counted.
//!
//! # Example
//!
//! ```rust,ignore
//! use surveyor::{MemoryStore, Snapshot};
//!
//! let store = MemoryStore::from_snapshot(
//!     Snapshot::new().with_admin("Ann", "ann@example.com", "secret"),
//! );
//! ```

use std::{
    collections::{HashMap, VecDeque},
    sync::Arc,
};

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use surveyor_types::{
    AuthError, Authenticator, Credentials, Identity, NewQuestion, NewResponse,
    OwnedSurveySummary, QuestionRecord, ResponseRecord, StoreError, SurveyId, SurveyStore,
    SurveySummary,
};
use tokio::sync::Mutex;
use tracing::debug;

const REJECTED_LOGIN: &str = "Incorrect username and/or password.";

/// Hex-encoded SHA-256 digest of a password, as kept in [`AdminAccount`].
pub fn hash_password(password: &str) -> String {
    hex::encode(Sha256::digest(password.as_bytes()))
}

/// An administrator who can log in and own surveys.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AdminAccount {
    pub id: i64,
    pub name: String,
    pub username: String,
    pub password_sha256: String,
}

impl AdminAccount {
    pub fn identity(&self) -> Identity {
        Identity {
            id: self.id,
            name: self.name.clone(),
        }
    }
}

/// A stored survey with its questions and responses.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoredSurvey {
    pub id: SurveyId,
    pub owner: Identity,
    pub title: String,
    pub questions: Vec<QuestionRecord>,
    pub responses: Vec<ResponseRecord>,
}

/// Everything a [`MemoryStore`] holds.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Snapshot {
    pub admins: Vec<AdminAccount>,
    pub surveys: Vec<StoredSurvey>,
    next_id: i64,
}

impl Snapshot {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an administrator with a plain-text password.
    pub fn with_admin(
        self,
        name: impl Into<String>,
        username: impl Into<String>,
        password: &str,
    ) -> Self {
        self.with_hashed_admin(name, username, hash_password(password))
    }

    /// Add an administrator with an already hashed password.
    pub fn with_hashed_admin(
        mut self,
        name: impl Into<String>,
        username: impl Into<String>,
        password_sha256: impl Into<String>,
    ) -> Self {
        let id = self.allocate_id();
        self.admins.push(AdminAccount {
            id,
            name: name.into(),
            username: username.into(),
            password_sha256: password_sha256.into(),
        });
        self
    }

    /// Look up an administrator by username.
    pub fn admin(&self, username: &str) -> Option<&AdminAccount> {
        self.admins.iter().find(|admin| admin.username == username)
    }

    pub fn survey(&self, id: SurveyId) -> Option<&StoredSurvey> {
        self.surveys.iter().find(|survey| survey.id == id)
    }

    fn survey_mut(&mut self, id: SurveyId) -> Option<&mut StoredSurvey> {
        self.surveys.iter_mut().find(|survey| survey.id == id)
    }

    fn allocate_id(&mut self) -> i64 {
        let highest = self
            .admins
            .iter()
            .map(|a| a.id)
            .chain(self.surveys.iter().map(|s| s.id.get()))
            .chain(self.surveys.iter().flat_map(|s| s.questions.iter().map(|q| q.id)))
            .chain(self.surveys.iter().flat_map(|s| s.responses.iter().map(|r| r.id)))
            .max()
            .unwrap_or(0);
        self.next_id = self.next_id.max(highest) + 1;
        self.next_id
    }
}

/// A store operation that can be made to fail.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StoreOp {
    ListSurveys,
    ListOwnedSurveys,
    Questions,
    Responses,
    CreateSurvey,
    CreateQuestion,
    CreateResponse,
    Login,
}

/// The kind of failure to inject.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Fault {
    NotFound,
    Communication,
    Persistence,
}

impl Fault {
    fn into_store_error(self, op: StoreOp) -> StoreError {
        match self {
            Self::NotFound => StoreError::NotFound(format!("{op:?}: not found")),
            Self::Communication => {
                StoreError::communication(anyhow::anyhow!("{op:?}: connection reset"))
            }
            Self::Persistence => StoreError::Persistence(format!("{op:?}: write failed")),
        }
    }
}

#[derive(Debug, Default)]
struct Inner {
    data: Snapshot,
    session: Option<Identity>,
    faults: HashMap<StoreOp, VecDeque<Fault>>,
    question_budget: Option<usize>,
    calls: HashMap<StoreOp, usize>,
}

impl Inner {
    /// Count the call and pop a queued fault for it, if any.
    fn enter(&mut self, op: StoreOp) -> Result<(), StoreError> {
        *self.calls.entry(op).or_default() += 1;
        match self.faults.get_mut(&op).and_then(VecDeque::pop_front) {
            Some(fault) => {
                debug!(?op, ?fault, "injected fault");
                Err(fault.into_store_error(op))
            }
            None => Ok(()),
        }
    }
}

/// A [`SurveyStore`] and [`Authenticator`] backed by memory.
///
/// Clones share the same data.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    inner: Arc<Mutex<Inner>>,
}

impl MemoryStore {
    /// Create an empty store with no administrators.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_snapshot(data: Snapshot) -> Self {
        Self {
            inner: Arc::new(Mutex::new(Inner {
                data,
                ..Inner::default()
            })),
        }
    }

    /// A copy of the current data.
    pub async fn snapshot(&self) -> Snapshot {
        self.inner.lock().await.data.clone()
    }

    /// Make the next call of `op` fail. Faults queue up in order.
    pub async fn fail_next(&self, op: StoreOp, fault: Fault) {
        self.inner
            .lock()
            .await
            .faults
            .entry(op)
            .or_default()
            .push_back(fault);
    }

    /// Let `n` more questions be created, then fail every later one.
    pub async fn fail_create_question_after(&self, n: usize) {
        self.inner.lock().await.question_budget = Some(n);
    }

    /// How many times `op` has been called.
    pub async fn calls(&self, op: StoreOp) -> usize {
        self.inner
            .lock()
            .await
            .calls
            .get(&op)
            .copied()
            .unwrap_or_default()
    }
}

impl SurveyStore for MemoryStore {
    async fn list_surveys(&self) -> Result<Vec<SurveySummary>, StoreError> {
        let mut inner = self.inner.lock().await;
        inner.enter(StoreOp::ListSurveys)?;
        Ok(inner
            .data
            .surveys
            .iter()
            .map(|survey| SurveySummary {
                id: survey.id,
                title: survey.title.clone(),
                admin_name: survey.owner.name.clone(),
            })
            .collect())
    }

    async fn list_owned_surveys(
        &self,
        owner: &Identity,
    ) -> Result<Vec<OwnedSurveySummary>, StoreError> {
        let mut inner = self.inner.lock().await;
        inner.enter(StoreOp::ListOwnedSurveys)?;
        Ok(inner
            .data
            .surveys
            .iter()
            .filter(|survey| survey.owner.id == owner.id)
            .map(|survey| OwnedSurveySummary {
                id: survey.id,
                title: survey.title.clone(),
                num_answers: u32::try_from(survey.responses.len()).unwrap_or(u32::MAX),
            })
            .collect())
    }

    async fn questions(&self, survey_id: SurveyId) -> Result<Vec<QuestionRecord>, StoreError> {
        let mut inner = self.inner.lock().await;
        inner.enter(StoreOp::Questions)?;
        let mut questions = inner
            .data
            .survey(survey_id)
            .map(|survey| survey.questions.clone())
            .unwrap_or_default();
        if questions.is_empty() {
            return Err(StoreError::NotFound(format!(
                "survey {survey_id} has no questions"
            )));
        }
        questions.sort_by_key(|q| q.position);
        Ok(questions)
    }

    async fn responses(
        &self,
        survey_id: SurveyId,
        owner: &Identity,
    ) -> Result<Vec<ResponseRecord>, StoreError> {
        let mut inner = self.inner.lock().await;
        inner.enter(StoreOp::Responses)?;
        let responses = inner
            .data
            .survey(survey_id)
            .filter(|survey| survey.owner.id == owner.id)
            .map(|survey| survey.responses.clone())
            .unwrap_or_default();
        if responses.is_empty() {
            return Err(StoreError::NotFound(format!(
                "survey {survey_id} has no responses"
            )));
        }
        Ok(responses)
    }

    async fn create_survey(&self, owner: &Identity, title: &str) -> Result<SurveyId, StoreError> {
        let mut inner = self.inner.lock().await;
        inner.enter(StoreOp::CreateSurvey)?;
        let id = SurveyId::new(inner.data.allocate_id());
        inner.data.surveys.push(StoredSurvey {
            id,
            owner: owner.clone(),
            title: title.to_string(),
            questions: Vec::new(),
            responses: Vec::new(),
        });
        debug!(%id, "survey created");
        Ok(id)
    }

    async fn create_question(
        &self,
        survey_id: SurveyId,
        question: &NewQuestion,
    ) -> Result<i64, StoreError> {
        let mut inner = self.inner.lock().await;
        inner.enter(StoreOp::CreateQuestion)?;
        let budget = inner.question_budget;
        match budget {
            Some(0) => {
                return Err(StoreError::Persistence(format!(
                    "question at position {} was not written",
                    question.position
                )));
            }
            Some(remaining) => inner.question_budget = Some(remaining - 1),
            None => {}
        }
        if inner.data.survey(survey_id).is_none() {
            return Err(StoreError::NotFound(format!("survey {survey_id} does not exist")));
        }

        let id = inner.data.allocate_id();
        let record = QuestionRecord {
            id,
            title: question.title.clone(),
            position: question.position,
            min: question.min,
            max: question.max,
            options: question.options.clone(),
        };
        if let Some(survey) = inner.data.survey_mut(survey_id) {
            survey.questions.push(record);
        }
        Ok(id)
    }

    async fn create_response(
        &self,
        survey_id: SurveyId,
        response: &NewResponse,
    ) -> Result<i64, StoreError> {
        let mut inner = self.inner.lock().await;
        inner.enter(StoreOp::CreateResponse)?;
        if inner.data.survey(survey_id).is_none() {
            return Err(StoreError::NotFound(format!("survey {survey_id} does not exist")));
        }

        let id = inner.data.allocate_id();
        let record = ResponseRecord {
            id,
            name: response.name.clone(),
            answers: response.answers.clone(),
        };
        if let Some(survey) = inner.data.survey_mut(survey_id) {
            survey.responses.push(record);
        }
        Ok(id)
    }
}

impl Authenticator for MemoryStore {
    async fn login(&self, credentials: &Credentials) -> Result<Identity, AuthError> {
        let mut inner = self.inner.lock().await;
        inner.enter(StoreOp::Login).map_err(|err| match err {
            StoreError::Communication(source) => AuthError::Communication(source),
            other => AuthError::Rejected(other.to_string()),
        })?;

        let digest = hash_password(&credentials.password);
        let identity = inner
            .data
            .admin(&credentials.username)
            .filter(|admin| admin.password_sha256.eq_ignore_ascii_case(&digest))
            .map(AdminAccount::identity)
            .ok_or_else(|| AuthError::Rejected(REJECTED_LOGIN.to_string()))?;

        debug!(admin = %identity.name, "logged in");
        inner.session = Some(identity.clone());
        Ok(identity)
    }

    async fn logout(&self) {
        self.inner.lock().await.session = None;
    }

    async fn current(&self) -> Option<Identity> {
        self.inner.lock().await.session.clone()
    }
}
