use crate::{
    AuthError, Credentials, Identity, NewQuestion, NewResponse, OwnedSurveySummary,
    QuestionRecord, ResponseRecord, StoreError, SurveyId, SurveySummary,
};

/// The persistence collaborator.
///
/// Each method is one round trip. Implementations own the stored data
/// exclusively; responses are append-only.
pub trait SurveyStore: Clone + Send + Sync + 'static {
    /// Every survey, in no particular order.
    fn list_surveys(&self) -> impl Future<Output = Result<Vec<SurveySummary>, StoreError>> + Send;

    /// The surveys owned by `owner`, with their response counts.
    fn list_owned_surveys(
        &self,
        owner: &Identity,
    ) -> impl Future<Output = Result<Vec<OwnedSurveySummary>, StoreError>> + Send;

    /// The questions of a survey ordered by position.
    ///
    /// Fails with [`StoreError::NotFound`] when the survey has no questions.
    fn questions(
        &self,
        survey_id: SurveyId,
    ) -> impl Future<Output = Result<Vec<QuestionRecord>, StoreError>> + Send;

    /// The responses of a survey.
    ///
    /// Fails with [`StoreError::NotFound`] when there are none or when
    /// `owner` does not own the survey.
    fn responses(
        &self,
        survey_id: SurveyId,
        owner: &Identity,
    ) -> impl Future<Output = Result<Vec<ResponseRecord>, StoreError>> + Send;

    /// Create an empty survey and return its id.
    fn create_survey(
        &self,
        owner: &Identity,
        title: &str,
    ) -> impl Future<Output = Result<SurveyId, StoreError>> + Send;

    /// Attach one question to a survey.
    fn create_question(
        &self,
        survey_id: SurveyId,
        question: &NewQuestion,
    ) -> impl Future<Output = Result<i64, StoreError>> + Send;

    /// Append a response to a survey.
    fn create_response(
        &self,
        survey_id: SurveyId,
        response: &NewResponse,
    ) -> impl Future<Output = Result<i64, StoreError>> + Send;
}

/// The session collaborator.
pub trait Authenticator: Clone + Send + Sync + 'static {
    /// Start a session, returning who logged in.
    fn login(
        &self,
        credentials: &Credentials,
    ) -> impl Future<Output = Result<Identity, AuthError>> + Send;

    /// End the current session, if any.
    fn logout(&self) -> impl Future<Output = ()> + Send;

    /// The identity of the current session.
    fn current(&self) -> impl Future<Output = Option<Identity>> + Send;
}
