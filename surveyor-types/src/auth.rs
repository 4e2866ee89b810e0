use serde::{Deserialize, Serialize};

/// An authenticated survey administrator.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Identity {
    pub id: i64,
    pub name: String,
}

/// Login input. The credential mechanism itself lives in the collaborator.
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    pub username: String,
    pub password: String,
}

impl Credentials {
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
        }
    }
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("username", &self.username)
            .field("password", &"***")
            .finish()
    }
}

/// Who is looking: the only distinction the core makes between the author
/// view and the respondent view.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum Viewer {
    #[default]
    Anonymous,
    Admin(Identity),
}

impl Viewer {
    pub fn is_authenticated(&self) -> bool {
        matches!(self, Self::Admin(_))
    }

    pub fn identity(&self) -> Option<&Identity> {
        match self {
            Self::Anonymous => None,
            Self::Admin(identity) => Some(identity),
        }
    }
}

impl From<Option<Identity>> for Viewer {
    fn from(identity: Option<Identity>) -> Self {
        identity.map_or(Self::Anonymous, Self::Admin)
    }
}

/// Error type for authentication.
#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    /// The collaborator refused the credentials; the message is shown as is.
    #[error("{0}")]
    Rejected(String),

    #[error("cannot communicate with the server: {0}")]
    Communication(#[source] anyhow::Error),
}
