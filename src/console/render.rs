use crate::models::notification::Notification;
use crate::models::user::ActiveUser;
use crate::stores::notification_store::NotificationDetail;
use std::fmt::Write;

pub fn render_header(user: &ActiveUser, unread: usize) -> String {
    format!("ID {} | Tokens: {} | Unread: {}", user.id, user.token_balance, unread)
}

/// Inbox listing, in the order given
///
/// Unread entries are marked with `*`.
pub fn render_inbox(notifications: &[Notification]) -> String {
    if notifications.is_empty() {
        return "Inbox is empty.".to_string();
    }

    let mut out = String::new();
    for n in notifications {
        let marker = if n.read { ' ' } else { '*' };
        let title = if n.title.is_empty() { "No title" } else { n.title.as_str() };
        let _ = write!(out, "{} [{}] {} ({})", marker, n.id, title, n.category.as_str());
        if !n.body_text.is_empty() {
            let _ = write!(out, "\n      {}", n.body_text);
        }
        out.push('\n');
    }
    out.pop();
    out
}

pub fn render_detail(detail: &NotificationDetail) -> String {
    let mut out = format!("== {} ==", detail.title);

    if !detail.body_text.is_empty() {
        let _ = write!(out, "\n{}", detail.body_text);
    }
    if let Some(extra) = &detail.detail_text {
        let _ = write!(out, "\n---\n{}", extra);
    }

    for (i, action) in detail.actions.iter().enumerate() {
        let _ = write!(out, "\n  [{}] {} ({})", i + 1, action.label, action.kind);
    }

    out
}
