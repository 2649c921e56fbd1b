use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;
use std::str::FromStr;

/// Behaviour a notification button can trigger
///
/// Deserializes from the stored action name. Unknown names become `Noop`
/// so stale or hand-edited data never fails to load.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", from = "String")]
pub enum ActionKind {
    Close,
    Delete,
    MarkRead,
    MarkUnread,
    #[default]
    Noop,
}

impl ActionKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ActionKind::Close => "close",
            ActionKind::Delete => "delete",
            ActionKind::MarkRead => "markRead",
            ActionKind::MarkUnread => "markUnread",
            ActionKind::Noop => "noop",
        }
    }

    /// Resolve an action name, falling back to `Noop` for anything unrecognised
    pub fn parse_lenient(name: &str) -> Self {
        match name {
            "close" => ActionKind::Close,
            "delete" => ActionKind::Delete,
            "markRead" => ActionKind::MarkRead,
            "markUnread" => ActionKind::MarkUnread,
            _ => ActionKind::Noop,
        }
    }
}

impl From<String> for ActionKind {
    fn from(name: String) -> Self {
        ActionKind::parse_lenient(&name)
    }
}

impl FromStr for ActionKind {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(ActionKind::parse_lenient(s))
    }
}

impl fmt::Display for ActionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Display category of a notification
///
/// Only drives styling. Categories other than `info` and `warning` are kept
/// verbatim so they survive a load/save cycle.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Category {
    #[default]
    Info,
    Warning,
    Other(String),
}

impl Category {
    pub fn as_str(&self) -> &str {
        match self {
            Category::Info => "info",
            Category::Warning => "warning",
            Category::Other(name) => name,
        }
    }
}

impl From<String> for Category {
    fn from(name: String) -> Self {
        match name.as_str() {
            "info" => Category::Info,
            "warning" => Category::Warning,
            _ => Category::Other(name),
        }
    }
}

impl From<Category> for String {
    fn from(category: Category) -> Self {
        category.as_str().to_string()
    }
}

/// A button declared by a notification
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NotificationAction {
    #[serde(default)]
    pub label: String,
    #[serde(rename = "action", default)]
    pub kind: ActionKind,
}

impl NotificationAction {
    pub fn new(label: impl Into<String>, kind: ActionKind) -> Self {
        Self {
            label: label.into(),
            kind,
        }
    }
}

/// A single inbox entry
///
/// Field names on the wire match the browser dashboard's stored format, so
/// data written by either side loads in the other.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Notification {
    pub id: String,
    #[serde(default)]
    pub title: String,
    #[serde(rename = "text", default)]
    pub body_text: String,
    #[serde(rename = "UserNotifyDesc", default, skip_serializing_if = "Option::is_none")]
    pub detail_text: Option<String>,
    #[serde(default)]
    pub read: bool,
    #[serde(rename = "type", default)]
    pub category: Category,
    #[serde(rename = "buttons", default)]
    pub actions: Vec<NotificationAction>,
}

impl Notification {
    pub fn new(id: impl Into<String>, title: impl Into<String>, body_text: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            body_text: body_text.into(),
            detail_text: None,
            read: false,
            category: Category::Info,
            actions: Vec::new(),
        }
    }

    pub fn with_detail(mut self, detail: impl Into<String>) -> Self {
        self.detail_text = Some(detail.into());
        self
    }

    pub fn with_category(mut self, category: Category) -> Self {
        self.category = category;
        self
    }

    pub fn with_action(mut self, label: impl Into<String>, kind: ActionKind) -> Self {
        self.actions.push(NotificationAction::new(label, kind));
        self
    }
}

/// Keep the first notification for each ID and drop later repeats
///
/// Returns the IDs that were dropped, in list order.
pub fn drop_duplicate_ids(notifications: &mut Vec<Notification>) -> Vec<String> {
    let mut seen = HashSet::new();
    let mut dropped = Vec::new();
    notifications.retain(|n| {
        if seen.insert(n.id.clone()) {
            true
        } else {
            dropped.push(n.id.clone());
            false
        }
    });
    dropped
}
