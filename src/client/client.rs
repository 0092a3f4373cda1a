//! Event loop of the terminal client.

use crossterm::event::{Event, EventStream, KeyEventKind};
use futures_util::StreamExt;
use tracing::{debug, warn};

use crate::QuizError;
use crate::api::QuizApi;
use crate::session::{OptionLayout, Persistence, Screen, Session, SessionError, SubmitOutcome};
use crate::terminal::TerminalGuard;

use super::input::{Command, map_key};
use super::state::ClientApp;
use super::ui;

/// Run the client until the user quits.
///
/// The question at the session cursor is loaded first; a failure there is
/// shown on screen rather than aborting.
pub async fn run<A: QuizApi>(mut session: Session<A>) -> Result<(), QuizError> {
    let mut app = ClientApp::new();
    if let Err(err) = session.load_current().await {
        warn!(error = %err, "initial question load failed");
        app.error(format!("Could not load question: {err}"));
    }

    let mut guard = TerminalGuard::enter()?;
    let mut events = EventStream::new();

    while !app.should_quit {
        guard
            .terminal()
            .draw(|frame| ui::render(frame, &app, &session))?;

        let Some(event) = events.next().await else {
            break;
        };
        let Event::Key(key) = event? else {
            continue;
        };
        if key.kind != KeyEventKind::Press {
            continue;
        }

        if let Some(command) = map_key(key, &app.input) {
            debug!(?command, "command");
            handle_command(&mut app, &mut session, command).await;
        }
    }

    Ok(())
}

async fn handle_command<A: QuizApi>(app: &mut ClientApp, session: &mut Session<A>, command: Command) {
    let view = match session.screen() {
        Screen::Question(view) => Some(view),
        _ => None,
    };
    let option_count = view.as_ref().map_or(0, |v| v.options.len());

    match command {
        Command::Quit => app.quit(),
        Command::CursorUp => app.cursor_up(option_count),
        Command::CursorDown => app.cursor_down(option_count),
        Command::Choose => {
            let Some(view) = view else {
                return;
            };
            let Some(option) = view.options.get(app.cursor) else {
                return;
            };
            match view.layout {
                OptionLayout::ToggleThenSubmit => {
                    app.clear_notice();
                    if let Err(err) = session.toggle_option(&option.key) {
                        report_error(app, &err);
                    }
                }
                OptionLayout::SubmitOnChoose => {
                    let result = session.choose(&option.key).await;
                    report_submit(app, result);
                }
            }
        }
        Command::SubmitDraft => {
            if view.is_some_and(|v| v.layout == OptionLayout::ToggleThenSubmit) {
                let result = session.submit_draft().await;
                report_submit(app, result);
            }
        }
        Command::Next => {
            let result = session.next().await;
            report_navigation(app, result);
        }
        Command::Prev => {
            let result = session.prev().await;
            report_navigation(app, result);
        }
        Command::ToggleStar => match session.toggle_star().await {
            Ok(outcome) => {
                app.info(if outcome.starred { "Starred" } else { "Unstarred" });
                report_persistence(app, outcome.persistence);
            }
            Err(err) => report_error(app, &err),
        },
        Command::ToggleExplanations => {
            let on = !session.flags().show_explanations;
            match session.set_show_explanations(on).await {
                Ok(true) => app.info("Explanations shown"),
                Ok(false) => app.info("Explanations hidden"),
                Err(err) => report_error(app, &err),
            }
        }
        Command::BeginJump => {
            if !session.is_empty() {
                app.begin_jump();
            }
        }
        Command::JumpDigit(digit) => app.push_jump_digit(digit),
        Command::JumpBackspace => app.pop_jump_digit(),
        Command::CancelJump => app.cancel_jump(),
        Command::ConfirmJump => {
            let Some(index) = app.take_jump() else {
                return;
            };
            let result = session.jump(index).await;
            report_navigation(app, result);
        }
    }
}

fn report_submit(app: &mut ClientApp, result: Result<SubmitOutcome, SessionError>) {
    match result {
        Ok(outcome) => {
            if outcome.verdict.correct {
                app.info("Correct!");
            } else {
                app.warn("Incorrect.");
            }
            report_persistence(app, outcome.persistence);
        }
        Err(err) => report_error(app, &err),
    }
}

fn report_navigation(app: &mut ClientApp, result: Result<Persistence, SessionError>) {
    app.reset_cursor();
    match result {
        Ok(persistence) => {
            app.clear_notice();
            report_persistence(app, persistence);
        }
        Err(err) => report_error(app, &err),
    }
}

fn report_persistence(app: &mut ClientApp, persistence: Persistence) {
    if persistence.failed() {
        app.warn("Progress could not be saved.");
    }
}

fn report_error(app: &mut ClientApp, err: &SessionError) {
    if err.is_rejection() {
        app.warn(err.to_string());
    } else {
        app.error(format!("Request failed: {err}"));
    }
}
