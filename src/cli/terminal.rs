use std::sync::{Arc, Mutex};

use tokio::io::{AsyncBufRead, AsyncBufReadExt};
use tokio::sync::mpsc::UnboundedSender;

use crate::domain::{Joke, ScenePhase};
use crate::services::{AppEvent, AppState, StateObserver};

pub const HELP: &str = "Commands: [n]ext, [f]avourite, [l]ist, [b]ackground, [a]ctive, [i]nactive, [q]uit";

/// What a line typed into the session means
#[derive(Debug, PartialEq, Eq)]
pub enum SessionCommand {
    Next,
    Favourite,
    List,
    Phase(ScenePhase),
    Quit,
    Help,
}

impl SessionCommand {
    pub fn parse(line: &str) -> Self {
        let line = line.trim().to_lowercase();
        match line.as_str() {
            "" | "n" | "next" => SessionCommand::Next,
            "f" | "fav" | "favourite" => SessionCommand::Favourite,
            "l" | "list" => SessionCommand::List,
            "q" | "quit" | "exit" => SessionCommand::Quit,
            other => other
                .parse::<ScenePhase>()
                .map(SessionCommand::Phase)
                .unwrap_or(SessionCommand::Help),
        }
    }
}

/// Renders session state to stdout, printing only when something visible changed.
#[derive(Clone, Default)]
pub struct TerminalView {
    inner: Arc<Mutex<ViewState>>,
}

#[derive(Default)]
struct ViewState {
    last_frame: Option<String>,
    favourites: Vec<Joke>,
}

impl TerminalView {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn print_favourites(&self) {
        if let Ok(inner) = self.inner.lock() {
            println!("{}", render_favourites(&inner.favourites));
        }
    }
}

impl StateObserver for TerminalView {
    fn on_state_changed(&self, state: &AppState) {
        let Ok(mut inner) = self.inner.lock() else {
            return;
        };
        inner.favourites = state.favourites.snapshot();

        let Some(frame) = render_joke(state) else {
            return;
        };
        if inner.last_frame.as_deref() != Some(frame.as_str()) {
            println!("{}", frame);
            inner.last_frame = Some(frame);
        }
    }
}

/// Current joke with a heart when it is a favourite
pub fn render_joke(state: &AppState) -> Option<String> {
    let joke = state.current_joke.as_ref()?;
    let marker = if state.is_current_favourited { "♥" } else { "♡" };
    Some(format!("{} {}", marker, joke.text))
}

pub fn render_favourites(jokes: &[Joke]) -> String {
    if jokes.is_empty() {
        return "No favourites saved.".to_string();
    }

    let mut out = String::from("Favourites:");
    for (i, joke) in jokes.iter().enumerate() {
        out.push_str(&format!("\n  {}. {}", i + 1, joke.text));
    }
    out
}

/// Turn input lines into session events until quit or end of input.
///
/// Leaving always reports `Background` before `Quit` so favourites are saved.
pub async fn read_commands<R>(input: R, events: UnboundedSender<AppEvent>, view: TerminalView)
where
    R: AsyncBufRead + Unpin,
{
    let mut lines = input.lines();

    loop {
        let line = match lines.next_line().await {
            Ok(Some(line)) => line,
            Ok(None) => break,
            Err(e) => {
                tracing::warn!(error = %e, "could not read input");
                break;
            }
        };

        let event = match SessionCommand::parse(&line) {
            SessionCommand::Next => AppEvent::Refresh,
            SessionCommand::Favourite => AppEvent::Favourite,
            SessionCommand::Phase(phase) => AppEvent::Lifecycle(phase),
            SessionCommand::List => {
                view.print_favourites();
                continue;
            }
            SessionCommand::Help => {
                println!("{}", HELP);
                continue;
            }
            SessionCommand::Quit => break,
        };

        if events.send(event).is_err() {
            return;
        }
    }

    events.send(AppEvent::Lifecycle(ScenePhase::Background)).ok();
    events.send(AppEvent::Quit).ok();
}
