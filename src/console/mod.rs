//! Line-oriented dashboard front end
//!
//! Reads one [`Command`] per line and writes plain-text output. Session
//! changes and inbox updates are rendered from [`InboxEvent`]s, not from
//! the commands that caused them.

pub mod command;
pub mod render;

use crate::core::state::AppState;
use crate::events::{drain, InboxEvent};
use crate::models::notification::ActionKind;
use crate::stores::notification_store::NotificationDetail;
use crate::validation::login::normalize_id_input;
use anyhow::{Context, Result};
use command::{Command, HELP};
use std::io::{BufRead, Write};
use tracing::debug;

const LOGIN_PROMPT: &str = "Log in with: login <id> <password> [code]";

/// Run commands from `input` until it ends or `quit` is read
pub fn run<R: BufRead, W: Write>(state: &AppState, input: R, mut output: W) -> Result<()> {
    let mut events = state.events.subscribe();

    match state.session.active_user() {
        Some(_) => render_dashboard(state, &mut output)?,
        None => writeln!(output, "{}", LOGIN_PROMPT)?,
    }

    for line in input.lines() {
        let line = line.context("Failed to read command")?;
        if line.trim().is_empty() {
            continue;
        }

        match Command::parse(&line) {
            Ok(Command::Quit) => break,
            Ok(command) => execute(state, command, &mut output)?,
            Err(e) => writeln!(output, "{}", e)?,
        }

        for event in drain(&mut events) {
            render_event(state, &event, &mut output)?;
        }
    }

    output.flush()?;
    Ok(())
}

fn render_dashboard<W: Write>(state: &AppState, output: &mut W) -> Result<()> {
    if let Some(user) = state.session.active_user() {
        writeln!(output, "{}", render::render_header(&user, state.inbox.unread_count()))?;
        writeln!(output, "{}", render::render_inbox(&state.inbox.list()))?;
    }
    Ok(())
}

fn render_event<W: Write>(state: &AppState, event: &InboxEvent, output: &mut W) -> Result<()> {
    debug!(event = ?event, "Rendering event");
    match event {
        InboxEvent::SessionStarted { .. } => render_dashboard(state, output)?,
        InboxEvent::SessionEnded { user_id } => {
            writeln!(output, "Logged out of {}.", user_id)?;
            writeln!(output, "{}", LOGIN_PROMPT)?;
        }
        InboxEvent::Changed { unread, .. } => writeln!(output, "Unread: {}", unread)?,
    }
    Ok(())
}

/// Resolve an `action` target: a 1-based button number or an action name
fn resolve_action(state: &AppState, id: &str, target: &str) -> Option<ActionKind> {
    match target.parse::<usize>() {
        Ok(number) => {
            let notification = state.inbox.get(id)?;
            let detail = NotificationDetail::from(&notification);
            number
                .checked_sub(1)
                .and_then(|index| detail.actions.get(index))
                .map(|action| action.kind)
        }
        Err(_) => Some(ActionKind::parse_lenient(target)),
    }
}

fn not_found<W: Write>(output: &mut W, id: &str) -> std::io::Result<()> {
    writeln!(output, "No notification with ID {}.", id)
}

fn execute<W: Write>(state: &AppState, command: Command, output: &mut W) -> Result<()> {
    let needs_session = !matches!(
        command,
        Command::Login { .. } | Command::Logout | Command::Help | Command::Quit
    );
    if needs_session && !state.session.is_logged_in() {
        writeln!(output, "Not logged in. {}", LOGIN_PROMPT)?;
        return Ok(());
    }

    match command {
        Command::Login { id, password, two_step_code } => {
            // Same filtering the login form applies while typing
            let id = normalize_id_input(&id);
            if let Err(e) = state.session.authenticate(&id, &password, two_step_code.as_deref()) {
                writeln!(output, "{}", e)?;
            }
        }
        Command::Logout => {
            if state.session.is_logged_in() {
                state.session.end_session();
            } else {
                writeln!(output, "Not logged in.")?;
            }
        }
        Command::WhoAmI => {
            if let Some(user) = state.session.active_user() {
                writeln!(output, "{}", render::render_header(&user, state.inbox.unread_count()))?;
            }
        }
        Command::List => writeln!(output, "{}", render::render_inbox(&state.inbox.list()))?,
        Command::Open(id) => match state.inbox.open(&id) {
            Some(detail) => writeln!(output, "{}", render::render_detail(&detail))?,
            None => not_found(output, &id)?,
        },
        Command::MarkRead(id) => {
            if !state.inbox.set_read(&id, true) {
                not_found(output, &id)?;
            }
        }
        Command::MarkUnread(id) => {
            if !state.inbox.set_read(&id, false) {
                not_found(output, &id)?;
            }
        }
        Command::Toggle(id) => match state.inbox.toggle_read(&id) {
            Some(true) => writeln!(output, "{} marked read.", id)?,
            Some(false) => writeln!(output, "{} marked unread.", id)?,
            None => not_found(output, &id)?,
        },
        Command::Delete(id) => {
            if state.inbox.remove(&id) {
                writeln!(output, "Deleted {}.", id)?;
            } else {
                not_found(output, &id)?;
            }
        }
        Command::Action { id, target } => match resolve_action(state, &id, &target) {
            Some(kind) => {
                let outcome = state.inbox.dispatch_action(&id, kind);
                if outcome.close_view {
                    writeln!(output, "Ran {} on {}.", outcome.kind, id)?;
                }
            }
            None => writeln!(output, "No button {} on {}.", target, id)?,
        },
        Command::ClearRead => {
            let removed = state.inbox.clear_read();
            writeln!(output, "Removed {} read notification(s).", removed)?;
        }
        Command::ClearAll => {
            let removed = state.inbox.clear_all();
            writeln!(output, "Removed {} notification(s).", removed)?;
        }
        Command::Help => writeln!(output, "{}", HELP)?,
        Command::Quit => {}
    }

    Ok(())
}
