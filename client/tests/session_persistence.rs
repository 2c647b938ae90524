//! Session survival across process restarts with file-backed storage.

use std::sync::Arc;

use camino::Utf8PathBuf;
use conectahc::domain::ports::{
    CookieStore, FIXTURE_EMAIL, FIXTURE_PASSWORD, FixtureCredentialVerifier, KeyValueStore,
};
use conectahc::domain::session_store::{AUTH_COOKIE, PROFILE_KEY};
use conectahc::domain::{LoginCredentials, RestoreOutcome, SessionStore};
use conectahc::outbound::storage::FileClientStorage;
use conectahc::test_support::MutableClock;
use mockable::Clock;
use rstest::{fixture, rstest};
use tempfile::TempDir;

struct Workspace {
    _temp: TempDir,
    root: Utf8PathBuf,
    clock: Arc<MutableClock>,
}

impl Workspace {
    fn storage(&self) -> Arc<FileClientStorage> {
        Arc::new(FileClientStorage::open(&self.root, self.clock.clone()).expect("open storage"))
    }

    /// A fresh store over a freshly opened file, as after a restart.
    fn session(&self) -> SessionStore {
        let storage = self.storage();
        SessionStore::new(
            Arc::new(FixtureCredentialVerifier),
            storage.clone(),
            storage,
            self.clock.clone(),
        )
    }
}

#[fixture]
fn workspace() -> Workspace {
    let temp = TempDir::new().expect("temp dir");
    let root = Utf8PathBuf::from_path_buf(temp.path().join("client")).expect("utf8 path");
    Workspace {
        _temp: temp,
        root,
        clock: Arc::new(MutableClock::fixed()),
    }
}

async fn log_in(session: &SessionStore) {
    let credentials =
        LoginCredentials::try_from_parts(FIXTURE_EMAIL, FIXTURE_PASSWORD).expect("credentials");
    session.login(&credentials).await.expect("login");
}

#[rstest]
#[tokio::test]
async fn login_survives_a_restart(workspace: Workspace) {
    let first = workspace.session();
    first.restore();
    log_in(&first).await;
    drop(first);

    let second = workspace.session();
    let outcome = second.restore();

    let RestoreOutcome::Restored(user) = outcome else {
        panic!("expected restored session, got {outcome:?}");
    };
    assert_eq!(user.email(), FIXTURE_EMAIL);
    assert!(second.is_authenticated());
}

#[rstest]
#[tokio::test]
async fn marker_expires_after_seven_days(workspace: Workspace) {
    let first = workspace.session();
    first.restore();
    log_in(&first).await;

    workspace.clock.advance_days(6);
    assert!(matches!(
        workspace.session().restore(),
        RestoreOutcome::Restored(_)
    ));

    workspace.clock.advance_days(1);
    assert_eq!(workspace.session().restore(), RestoreOutcome::Anonymous);
}

#[rstest]
#[tokio::test]
async fn logout_survives_a_restart(workspace: Workspace) {
    let first = workspace.session();
    first.restore();
    log_in(&first).await;
    first.logout();

    assert_eq!(workspace.session().restore(), RestoreOutcome::Anonymous);
}

#[rstest]
fn corrupted_profile_is_discarded_and_cleared(workspace: Workspace) {
    let storage = workspace.storage();
    storage
        .set_item(PROFILE_KEY, "{\"id\":")
        .expect("write profile");
    storage
        .set(
            AUTH_COOKIE,
            "authenticated",
            workspace.clock.utc() + chrono::TimeDelta::days(7),
        )
        .expect("write cookie");
    drop(storage);

    assert_eq!(workspace.session().restore(), RestoreOutcome::Discarded);

    let reopened = workspace.storage();
    assert_eq!(reopened.get_item(PROFILE_KEY).expect("read"), None);
    assert_eq!(reopened.get(AUTH_COOKIE).expect("read"), None);
}
