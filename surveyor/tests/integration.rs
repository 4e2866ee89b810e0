//! End-to-end flows against the in-memory store.

use surveyor::{
    AnswerRow, AnsweringSession, AnsweringState, Credentials, DraftState, Fault, Identity,
    MemoryStore, OptionSet, Question, ResponseBrowser, RowAnswer, Snapshot, StoreOp,
    SurveyDraft, SurveyError, SurveyId, SurveyListing, SurveyStore, Viewer, browse,
};

fn store() -> MemoryStore {
    MemoryStore::from_snapshot(Snapshot::new().with_admin("Ann", "ann@example.com", "secret"))
}

async fn login(store: &MemoryStore) -> Identity {
    use surveyor::Authenticator;
    store
        .login(&Credentials::new("ann@example.com", "secret"))
        .await
        .unwrap()
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

#[tokio::test]
async fn pets_end_to_end() {
    let store = store();
    let owner = login(&store).await;

    let mut draft = pets();
    let survey_id = draft.submit(&store, &owner).await.unwrap();
    assert_eq!(draft.state(), DraftState::Submitted(survey_id));

    let records = store.questions(survey_id).await.unwrap();
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].position, 1);
    assert_eq!(records[0].max, Some(1));
    assert_eq!(
        records[0].options.as_deref(),
        Some(r#"{"options":[{"id":1,"text":"Cat"},{"id":2,"text":"Dog"}]}"#)
    );

    let mut session = AnsweringSession::new(survey_id);
    session.load(&store).await.unwrap();
    assert_eq!(session.current().unwrap().question.title(), "Favorite animal?");
    session.answer(vec![1]).unwrap();
    assert_eq!(session.state(), AnsweringState::ReviewComplete);
    session.submit(&store, "Ann").await.unwrap();
    assert_eq!(session.state(), AnsweringState::Submitted);

    let viewer = Viewer::Admin(owner);
    let browser = ResponseBrowser::load(&store, survey_id, &viewer)
        .await
        .unwrap();
    assert_eq!(browser.len(), 1);
    assert_eq!(browser.current().response.name, "Ann");
    let rows = browser.rows();
    let AnswerRow {
        answer: RowAnswer::Choices(choices),
        ..
    } = &rows[0]
    else {
        panic!("expected a closed answer");
    };
    let selected: Vec<_> = choices
        .iter()
        .filter(|(_, selected)| *selected)
        .map(|(choice, _)| choice.text())
        .collect();
    assert_eq!(selected, vec!["Cat"]);

    let SurveyListing::Owned(owned) = browse(&store, &viewer).await.unwrap() else {
        panic!("expected the owner listing");
    };
    assert_eq!(owned[0].num_answers, 1);
}

#[tokio::test]
async fn empty_title_never_reaches_the_store() {
    let store = store();
    let owner = login(&store).await;

    let mut draft = pets();
    draft.set_title("").unwrap();
    let err = draft.submit(&store, &owner).await.unwrap_err();

    let report = err.report().unwrap();
    assert!(report.mentions(surveyor::Field::SurveyTitle));
    assert_eq!(store.calls(StoreOp::CreateSurvey).await, 0);
    assert_eq!(store.calls(StoreOp::CreateQuestion).await, 0);
    assert_eq!(draft.state(), DraftState::Failed);
}

#[tokio::test]
async fn communication_failure_keeps_the_draft() {
    let store = store();
    let owner = login(&store).await;
    store
        .fail_next(StoreOp::CreateSurvey, Fault::Communication)
        .await;

    let mut draft = pets();
    let err = draft.submit(&store, &owner).await.unwrap_err();
    assert!(matches!(err, SurveyError::Communication(_)));
    assert!(err.is_retryable());
    assert_eq!(draft.state(), DraftState::Failed);
    assert_eq!(draft.len(), 1);

    let survey_id = draft.submit(&store, &owner).await.unwrap();
    assert_eq!(store.questions(survey_id).await.unwrap().len(), 1);
}

#[tokio::test]
async fn partial_failure_is_reported_without_rollback() {
    let store = store();
    let owner = login(&store).await;
    store.fail_create_question_after(1).await;

    let mut draft = pets();
    draft.add_question(Question::open("Why?", 0)).unwrap();
    draft.add_question(Question::open("Anything else?", 0)).unwrap();

    let err = draft.submit(&store, &owner).await.unwrap_err();
    let SurveyError::PartiallyPersisted {
        survey_id,
        persisted,
        total,
        ..
    } = &err
    else {
        panic!("expected a partial failure, got {err:?}");
    };
    assert_eq!((*persisted, *total), (1, 3));
    assert_eq!(store.questions(*survey_id).await.unwrap().len(), 1);
    assert_eq!(store.calls(StoreOp::CreateQuestion).await, 2);
    assert_eq!(draft.state(), DraftState::Failed);
}

#[tokio::test]
async fn submitted_draft_rejects_another_submit() {
    let store = store();
    let owner = login(&store).await;
    let mut draft = pets();
    draft.submit(&store, &owner).await.unwrap();

    assert!(matches!(
        draft.submit(&store, &owner).await,
        Err(SurveyError::AlreadySubmitted)
    ));
    assert_eq!(store.calls(StoreOp::CreateSurvey).await, 1);
}

#[tokio::test]
async fn unknown_survey_is_not_found() {
    let store = store();
    let mut session = AnsweringSession::new(SurveyId::new(404));
    assert!(matches!(
        session.load(&store).await,
        Err(SurveyError::NotFound(_))
    ));
}

#[tokio::test]
async fn anonymous_viewer_sees_the_public_catalog() {
    let store = store();
    let owner = login(&store).await;
    pets().submit(&store, &owner).await.unwrap();

    let SurveyListing::Public(surveys) = browse(&store, &Viewer::Anonymous).await.unwrap() else {
        panic!("expected the public listing");
    };
    assert_eq!(surveys.len(), 1);
    assert_eq!(surveys[0].title, "Pets");
    assert_eq!(surveys[0].admin_name, "Ann");

    assert!(matches!(
        ResponseBrowser::load(&store, surveys[0].id, &Viewer::Anonymous).await,
        Err(SurveyError::Unauthenticated)
    ));
}

#[tokio::test]
async fn survey_without_responses_has_nothing_to_browse() {
    let store = store();
    let owner = login(&store).await;
    let survey_id = pets().submit(&store, &owner).await.unwrap();

    assert!(matches!(
        ResponseBrowser::load(&store, survey_id, &Viewer::Admin(owner)).await,
        Err(SurveyError::NotFound(_))
    ));
}

#[tokio::test]
async fn failed_response_can_be_resent() {
    let store = store();
    let owner = login(&store).await;
    let survey_id = pets().submit(&store, &owner).await.unwrap();
    store
        .fail_next(StoreOp::CreateResponse, Fault::Persistence)
        .await;

    let mut session = AnsweringSession::new(survey_id);
    session.load(&store).await.unwrap();
    session.answer(vec![2]).unwrap();

    let err = session.submit(&store, "Bob").await.unwrap_err();
    assert!(matches!(err, SurveyError::Persistence(_)));
    assert_eq!(session.state(), AnsweringState::ReviewComplete);

    session.submit(&store, "Bob").await.unwrap();
    assert_eq!(store.responses(survey_id, &owner).await.unwrap().len(), 1);
}
