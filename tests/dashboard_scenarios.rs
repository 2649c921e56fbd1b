use staff_dashboard::core::config::{Config, StartupPolicy};
use staff_dashboard::core::error::{LoginError, StorageError};
use staff_dashboard::core::startup::start;
use staff_dashboard::core::state::AppState;
use staff_dashboard::events::{drain, InboxEvent};
use staff_dashboard::models::notification::ActionKind;
use staff_dashboard::models::user::User;
use staff_dashboard::storage::file::FileStore;
use staff_dashboard::storage::memory::MemoryStore;
use staff_dashboard::storage::KeyValueStore;
use staff_dashboard::stores::directory::UserDirectory;
use std::sync::Arc;
use tempfile::TempDir;

fn app(store: Arc<dyn KeyValueStore>, policy: StartupPolicy) -> AppState {
    let mut config = Config::default();
    config.startup.policy = policy;
    AppState::new(config, UserDirectory::builtin(), store)
}

/// A fresh process over the same storage, keeping what was stored
fn reload(store: Arc<dyn KeyValueStore>) -> AppState {
    let state = app(store, StartupPolicy::Preserve);
    start(&state);
    state
}

struct FullDisk;

impl KeyValueStore for FullDisk {
    fn get(&self, _key: &str) -> Result<Option<String>, StorageError> {
        Ok(None)
    }

    fn set(&self, _key: &str, _value: &str) -> Result<(), StorageError> {
        Err(StorageError::Unavailable("quota exceeded".to_string()))
    }

    fn remove(&self, _key: &str) -> Result<(), StorageError> {
        Err(StorageError::Unavailable("quota exceeded".to_string()))
    }
}

#[test]
fn test_open_welcome_survives_reload() {
    let store: Arc<dyn KeyValueStore> = Arc::new(MemoryStore::new());
    let state = app(store.clone(), StartupPolicy::Preserve);

    state.session.authenticate("001", " ", None).unwrap();

    let list = state.inbox.list();
    assert_eq!(list.len(), 1);
    assert_eq!(list[0].title, "Welcome!");
    assert!(!list[0].read);

    state.inbox.open("n-001-1").unwrap();
    assert!(state.inbox.get("n-001-1").unwrap().read);

    let reloaded = reload(store);
    assert_eq!(reloaded.session.active_user_id(), Some("001".to_string()));
    assert!(reloaded.inbox.get("n-001-1").unwrap().read);
}

#[test]
fn test_open_welcome_survives_reload_on_disk() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("dashboard.json");

    {
        let store: Arc<dyn KeyValueStore> = Arc::new(FileStore::open(path.clone()).unwrap());
        let state = app(store, StartupPolicy::Preserve);
        state.session.authenticate("001", " ", None).unwrap();
        state.inbox.open("n-001-1").unwrap();
    }

    let store: Arc<dyn KeyValueStore> = Arc::new(FileStore::open(path).unwrap());
    let reloaded = reload(store);
    assert!(reloaded.inbox.get("n-001-1").unwrap().read);
}

#[test]
fn test_wipe_policy_discards_previous_run() {
    let store: Arc<dyn KeyValueStore> = Arc::new(MemoryStore::new());
    let state = app(store.clone(), StartupPolicy::Wipe);
    start(&state);
    state.session.authenticate("001", " ", None).unwrap();
    state.inbox.open("n-001-1").unwrap();

    let next = app(store, StartupPolicy::Wipe);
    start(&next);
    assert_eq!(next.session.active_user_id(), Some("001".to_string()));
    assert!(!next.inbox.get("n-001-1").unwrap().read);
}

#[test]
fn test_clear_all_survives_reload() {
    let store: Arc<dyn KeyValueStore> = Arc::new(MemoryStore::new());
    let state = app(store.clone(), StartupPolicy::Preserve);
    state.session.authenticate("002", " ", None).unwrap();

    state.inbox.clear_all();
    assert!(state.inbox.list().is_empty());

    let reloaded = reload(store);
    assert!(reloaded.inbox.list().is_empty());
}

#[test]
fn test_dispatch_delete_matches_remove() {
    let via_action: Arc<dyn KeyValueStore> = Arc::new(MemoryStore::new());
    let via_remove: Arc<dyn KeyValueStore> = Arc::new(MemoryStore::new());

    let a = app(via_action.clone(), StartupPolicy::Preserve);
    a.session.authenticate("001", " ", None).unwrap();
    a.inbox.dispatch_action("n-001-1", ActionKind::Delete);

    let b = app(via_remove.clone(), StartupPolicy::Preserve);
    b.session.authenticate("001", " ", None).unwrap();
    b.inbox.remove("n-001-1");

    let key = "ugai_notifs_001";
    assert_eq!(via_action.get(key).unwrap(), via_remove.get(key).unwrap());
    assert_eq!(via_action.get(key).unwrap(), Some("[]".to_string()));
}

#[test]
fn test_unknown_action_is_harmless() {
    let store: Arc<dyn KeyValueStore> = Arc::new(MemoryStore::new());
    let state = app(store.clone(), StartupPolicy::Preserve);
    state.session.authenticate("001", " ", None).unwrap();
    let mut rx = state.events.subscribe();

    let outcome = state.inbox.dispatch_action_name("n-001-1", "launchMissiles");

    assert_eq!(outcome.kind, ActionKind::Noop);
    assert!(!outcome.close_view);
    assert!(!state.inbox.get("n-001-1").unwrap().read);
    assert_eq!(store.get("ugai_notifs_001").unwrap(), None);
    assert!(rx.try_recv().is_err());
}

#[test]
fn test_id_format_checked_before_lookup() {
    let state = app(Arc::new(MemoryStore::new()), StartupPolicy::Preserve);

    for id in ["", "1", "12", "1234", "abc", "00x", " 0 1"] {
        assert_eq!(
            state.session.authenticate(id, " ", None),
            Err(LoginError::InvalidIdFormat),
            "id {:?}",
            id
        );
    }
    // Well-formed but unknown
    assert_eq!(state.session.authenticate("123", " ", None), Err(LoginError::UserNotFound));
}

#[test]
fn test_two_step_account() {
    let store: Arc<dyn KeyValueStore> = Arc::new(MemoryStore::new());
    let directory = UserDirectory::builtin();
    directory.add_user(User::new("010", "pw", Vec::new()).with_two_step("9876"));
    let state = AppState::new(Config::default(), directory, store);

    assert!(state.session.requires_two_step("010"));
    for password in ["pw", "nope", ""] {
        assert_eq!(state.session.authenticate("010", password, None), Err(LoginError::TwoStepRequired));
        assert_eq!(
            state.session.authenticate("010", password, Some("0000")),
            Err(LoginError::InvalidTwoStepCode)
        );
    }

    let active = state.session.authenticate("010", "pw", Some("9876")).unwrap();
    assert_eq!(active.id, "010");
}

#[test]
fn test_storage_failure_does_not_block_operations() {
    let state = app(Arc::new(FullDisk), StartupPolicy::Wipe);
    start(&state);

    state.session.authenticate("001", " ", None).unwrap();
    assert!(state.inbox.set_read("n-001-1", true));
    assert!(state.inbox.get("n-001-1").unwrap().read);
    assert!(state.inbox.remove("n-001-1"));
    assert!(state.inbox.list().is_empty());

    state.session.end_session();
    assert!(!state.session.is_logged_in());
}

#[test]
fn test_logout_then_login_keeps_inbox() {
    let store: Arc<dyn KeyValueStore> = Arc::new(MemoryStore::new());
    let state = app(store, StartupPolicy::Preserve);

    state.session.authenticate("001", " ", None).unwrap();
    state.inbox.set_read("n-001-1", true);
    state.session.end_session();

    assert!(state.inbox.list().is_empty());

    state.session.authenticate("001", " ", None).unwrap();
    assert!(state.inbox.get("n-001-1").unwrap().read);
}

#[test]
fn test_view_layer_sees_every_mutation() {
    let state = app(Arc::new(MemoryStore::new()), StartupPolicy::Preserve);
    let mut rx = state.events.subscribe();

    state.session.authenticate("001", " ", None).unwrap();
    state.inbox.toggle_read("n-001-1");
    state.inbox.toggle_read("n-001-1");
    state.inbox.clear_read();
    state.session.end_session();

    let events: Vec<InboxEvent> = drain(&mut rx);
    assert_eq!(
        events,
        vec![
            InboxEvent::SessionStarted { user_id: "001".to_string() },
            InboxEvent::Changed { user_id: "001".to_string(), unread: 0 },
            InboxEvent::Changed { user_id: "001".to_string(), unread: 1 },
            InboxEvent::Changed { user_id: "001".to_string(), unread: 1 },
            InboxEvent::SessionEnded { user_id: "001".to_string() },
        ]
    );
}

#[test]
fn test_stored_duplicate_ids_collapse_on_login() {
    let store: Arc<dyn KeyValueStore> = Arc::new(MemoryStore::new());
    store
        .set("ugai_notifs_001", r#"[{"id":"dup","title":"A"},{"id":"dup","title":"B"}]"#)
        .unwrap();
    let state = app(store, StartupPolicy::Preserve);
    state.session.authenticate("001", " ", None).unwrap();

    assert!(state.inbox.set_read("dup", true));

    let list = state.inbox.list();
    assert_eq!(list.len(), 1);
    assert_eq!(list[0].title, "A");
    assert!(list[0].read);
    assert_eq!(state.inbox.unread_count(), 0);
}
