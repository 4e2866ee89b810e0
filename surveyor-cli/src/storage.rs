//! Loading and saving the store snapshot.

use std::path::Path;

use anyhow::{Context, Result};
use surveyor::{MemoryStore, Snapshot};
use tracing::debug;

use crate::config::AdminConfig;

/// Open the snapshot at `path` (or start empty) and seed missing admins.
pub fn open(path: &Path, admins: &[AdminConfig]) -> Result<MemoryStore> {
    let mut snapshot = if path.is_file() {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("reading {}", path.display()))?;
        serde_json::from_str::<Snapshot>(&content)
            .with_context(|| format!("parsing {}", path.display()))?
    } else {
        debug!(path = %path.display(), "no snapshot yet, starting empty");
        Snapshot::new()
    };

    for admin in admins {
        if snapshot.admin(&admin.username).is_none() {
            snapshot = snapshot.with_hashed_admin(
                admin.name.clone(),
                admin.username.clone(),
                admin.password_sha256.clone(),
            );
        }
    }

    Ok(MemoryStore::from_snapshot(snapshot))
}

/// Write the store's current data to `path`.
pub async fn save(store: &MemoryStore, path: &Path) -> Result<()> {
    let snapshot = store.snapshot().await;
    let json = serde_json::to_string_pretty(&snapshot).context("serializing the store")?;
    std::fs::write(path, json).with_context(|| format!("writing {}", path.display()))?;
    debug!(path = %path.display(), surveys = snapshot.surveys.len(), "store saved");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use surveyor::{Authenticator, Credentials, SurveyStore, hash_password};

    fn ann() -> AdminConfig {
        AdminConfig {
            name: "Ann".into(),
            username: "ann@example.com".into(),
            password_sha256: hash_password("secret"),
        }
    }

    #[tokio::test]
    async fn admins_are_seeded_once() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("store.json");

        let store = open(&path, &[ann()]).unwrap();
        let identity = store
            .login(&Credentials::new("ann@example.com", "secret"))
            .await
            .unwrap();
        store.create_survey(&identity, "Pets").await.unwrap();
        save(&store, &path).await.unwrap();

        let reopened = open(&path, &[ann()]).unwrap();
        let snapshot = reopened.snapshot().await;
        assert_eq!(snapshot.admins.len(), 1);
        assert_eq!(snapshot.surveys.len(), 1);
        assert_eq!(snapshot.surveys[0].title, "Pets");
    }

    #[test]
    fn corrupt_snapshot_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("store.json");
        std::fs::write(&path, "not json").unwrap();

        let err = open(&path, &[]).unwrap_err();
        assert!(format!("{err:#}").contains("parsing"));
    }
}
