//! Listing surveys for the current viewer.

use surveyor_types::{
    OwnedSurveySummary, SurveyError, SurveyId, SurveyStore, SurveySummary, Viewer,
};
use tracing::warn;

/// The surveys a viewer gets to see.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SurveyListing {
    /// Every survey, for respondents.
    Public(Vec<SurveySummary>),

    /// The admin's own surveys with their response counts.
    Owned(Vec<OwnedSurveySummary>),
}

impl SurveyListing {
    pub fn len(&self) -> usize {
        match self {
            Self::Public(surveys) => surveys.len(),
            Self::Owned(surveys) => surveys.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Survey ids in listing order.
    pub fn ids(&self) -> Vec<SurveyId> {
        match self {
            Self::Public(surveys) => surveys.iter().map(|s| s.id).collect(),
            Self::Owned(surveys) => surveys.iter().map(|s| s.id).collect(),
        }
    }
}

/// List the public catalog for anonymous viewers, or the admin's own surveys.
#[tracing::instrument(skip(store))]
pub async fn browse<S: SurveyStore>(store: &S, viewer: &Viewer) -> Result<SurveyListing, SurveyError> {
    let listing = match viewer {
        Viewer::Anonymous => store.list_surveys().await.map(SurveyListing::Public),
        Viewer::Admin(owner) => store
            .list_owned_surveys(owner)
            .await
            .map(SurveyListing::Owned),
    };
    listing.map_err(|err| {
        warn!(error = %err, "cannot list surveys");
        err.into()
    })
}
