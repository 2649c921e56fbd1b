use crate::events::{EventBus, InboxEvent};
use crate::models::notification::{ActionKind, Notification, NotificationAction};
use crate::session::manager::SessionManager;
use crate::storage::persistence::Persistence;
use crate::stores::directory::UserDirectory;
use std::sync::Arc;
use tracing::debug;

/// What the detail view shows for an opened notification
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NotificationDetail {
    pub id: String,
    pub title: String,
    pub body_text: String,
    pub detail_text: Option<String>,
    pub actions: Vec<NotificationAction>,
}

impl From<&Notification> for NotificationDetail {
    fn from(n: &Notification) -> Self {
        let title = if n.title.is_empty() {
            "Notification".to_string()
        } else {
            n.title.clone()
        };

        let actions = if n.actions.is_empty() {
            vec![NotificationAction::new("Close", ActionKind::Close)]
        } else {
            n.actions
                .iter()
                .map(|action| {
                    let label = if action.label.is_empty() { "Action" } else { action.label.as_str() };
                    NotificationAction::new(label, action.kind)
                })
                .collect()
        };

        Self {
            id: n.id.clone(),
            title,
            body_text: n.body_text.clone(),
            detail_text: n.detail_text.clone().filter(|detail| !detail.is_empty()),
            actions,
        }
    }
}

/// Result of running a notification button
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ActionOutcome {
    pub kind: ActionKind,
    /// Whether the detail view should close afterwards
    pub close_view: bool,
}

/// The active user's inbox
///
/// Every operation silently does nothing when no one is logged in. Every
/// mutation writes the user's complete list to storage and emits
/// [`InboxEvent::Changed`] before returning.
pub struct NotificationStore {
    directory: Arc<UserDirectory>,
    session: Arc<SessionManager>,
    persistence: Persistence,
    events: Arc<EventBus>,
}

impl NotificationStore {
    pub fn new(
        directory: Arc<UserDirectory>,
        session: Arc<SessionManager>,
        persistence: Persistence,
        events: Arc<EventBus>,
    ) -> Self {
        Self {
            directory,
            session,
            persistence,
            events,
        }
    }

    /// Notifications newest first
    pub fn list(&self) -> Vec<Notification> {
        let mut notifications = self.snapshot().unwrap_or_default();
        notifications.reverse();
        notifications
    }

    pub fn unread_count(&self) -> usize {
        self.snapshot()
            .map(|notifications| notifications.iter().filter(|n| !n.read).count())
            .unwrap_or(0)
    }

    pub fn get(&self, id: &str) -> Option<Notification> {
        self.snapshot()?.into_iter().find(|n| n.id == id)
    }

    /// Fetch a notification for the detail view, marking it read
    pub fn open(&self, id: &str) -> Option<NotificationDetail> {
        let notification = self.get(id)?;
        self.set_read(id, true);
        Some(NotificationDetail::from(&notification))
    }

    /// Set the read flag. Returns false if the notification doesn't exist
    pub fn set_read(&self, id: &str, value: bool) -> bool {
        self.mutate("set_read", |notifications| {
            let n = notifications.iter_mut().find(|n| n.id == id)?;
            n.read = value;
            Some(())
        })
        .is_some()
    }

    /// Flip the read flag. Returns the new value
    pub fn toggle_read(&self, id: &str) -> Option<bool> {
        self.mutate("toggle_read", |notifications| {
            let n = notifications.iter_mut().find(|n| n.id == id)?;
            n.read = !n.read;
            Some(n.read)
        })
    }

    /// Delete a notification. Returns false if it didn't exist
    pub fn remove(&self, id: &str) -> bool {
        self.mutate("remove", |notifications| {
            let before = notifications.len();
            notifications.retain(|n| n.id != id);
            (notifications.len() != before).then_some(())
        })
        .is_some()
    }

    /// Delete every read notification. Returns how many were removed
    pub fn clear_read(&self) -> usize {
        self.mutate("clear_read", |notifications| {
            let before = notifications.len();
            notifications.retain(|n| !n.read);
            Some(before - notifications.len())
        })
        .unwrap_or(0)
    }

    /// Delete every notification. Returns how many were removed
    pub fn clear_all(&self) -> usize {
        self.mutate("clear_all", |notifications| {
            let removed = notifications.len();
            notifications.clear();
            Some(removed)
        })
        .unwrap_or(0)
    }

    /// Run the behaviour behind a notification button
    pub fn dispatch_action(&self, id: &str, kind: ActionKind) -> ActionOutcome {
        let close_view = match kind {
            ActionKind::Close => true,
            ActionKind::Delete => {
                self.remove(id);
                true
            }
            ActionKind::MarkRead => {
                self.set_read(id, true);
                true
            }
            ActionKind::MarkUnread => {
                self.set_read(id, false);
                true
            }
            ActionKind::Noop => false,
        };

        debug!(notification_id = %id, action = %kind, "Notification action dispatched");
        ActionOutcome { kind, close_view }
    }

    /// Like [`dispatch_action`](Self::dispatch_action) but from a stored action name
    pub fn dispatch_action_name(&self, id: &str, name: &str) -> ActionOutcome {
        self.dispatch_action(id, ActionKind::parse_lenient(name))
    }

    fn snapshot(&self) -> Option<Vec<Notification>> {
        let user_id = self.session.active_user_id()?;
        self.directory.get_user(&user_id).map(|user| user.notifications)
    }

    /// Apply `f` to the active user's list
    ///
    /// `f` returns `None` to signal that nothing changed; only then are the
    /// write and the change event skipped. The directory lock is released
    /// before storage and subscribers are touched.
    fn mutate<R>(&self, op: &'static str, f: impl FnOnce(&mut Vec<Notification>) -> Option<R>) -> Option<R> {
        let user_id = self.session.active_user_id()?;

        let (result, notifications) = self
            .directory
            .with_user_mut(&user_id, |user| {
                f(&mut user.notifications).map(|result| (result, user.notifications.clone()))
            })
            .flatten()?;

        self.persistence.save_notifications(&user_id, &notifications);

        let unread = notifications.iter().filter(|n| !n.read).count();
        debug!(
            user_id = %user_id,
            op = op,
            total = notifications.len(),
            unread = unread,
            "Notifications updated"
        );
        self.events.emit(InboxEvent::Changed { user_id, unread });

        Some(result)
    }
}
