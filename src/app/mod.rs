pub mod commands;
pub mod events;
pub mod proxy;
pub mod state;
pub mod tasks;
pub mod view_model;

use anyhow::Result;
use std::io::Write;
use tokio::io::{AsyncBufRead, AsyncBufReadExt};
use tokio::sync::mpsc::UnboundedReceiver;

use events::{AppEvent, ShellCommand, HELP};
use proxy::EventProxy;
use state::AppState;
use tasks::{handle_event, start_walk};

/// Applies every event already waiting in `rx` and returns how many there were.
pub fn drain_events(state: &mut AppState, rx: &mut UnboundedReceiver<AppEvent>) -> usize {
    let mut handled = 0;
    while let Ok(event) = rx.try_recv() {
        handle_event(state, event);
        handled += 1;
    }
    handled
}

/// Runs the interactive shell until `quit` or end of input.
///
/// Each iteration drains pending walk events, then waits for either the next
/// input line or a completion event, whichever comes first. The configuration
/// is saved on the way out and the final state is returned.
pub async fn run_shell<R, W, P>(
    mut state: AppState,
    proxy: P,
    mut rx: UnboundedReceiver<AppEvent>,
    input: R,
    out: &mut W,
) -> Result<AppState>
where
    R: AsyncBufRead + Unpin,
    W: Write,
    P: EventProxy,
{
    let mut lines = input.lines();

    writeln!(out, "File Tree Viewer. Type `help` for a list of commands.")?;
    start_walk(&mut state, proxy.clone());

    loop {
        drain_events(&mut state, &mut rx);
        write!(out, "{}> ", state.current_dir.display())?;
        out.flush()?;

        let line = tokio::select! {
            Some(event) = rx.recv() => {
                handle_event(&mut state, event);
                writeln!(out)?;
                writeln!(out, "{}", state.status)?;
                continue;
            }
            line = lines.next_line() => line?,
        };

        let Some(line) = line else {
            writeln!(out)?;
            break;
        };

        let command = match ShellCommand::parse(&line) {
            Ok(Some(command)) => command,
            Ok(None) => continue,
            Err(message) => {
                writeln!(out, "{message}")?;
                continue;
            }
        };

        match command {
            ShellCommand::Quit => break,
            ShellCommand::Wait => {
                if state.is_walking {
                    if let Some(event) = rx.recv().await {
                        handle_event(&mut state, event);
                    }
                }
                writeln!(out, "{}", state.status)?;
            }
            command => {
                if let Err(e) = execute(&mut state, proxy.clone(), command, out) {
                    tracing::debug!("Command failed: {:#}", e);
                    writeln!(out, "Error: {e:#}")?;
                }
            }
        }
    }

    commands::shutdown(&state);
    Ok(state)
}

/// Runs one non-blocking command and writes its output to `out`.
///
/// `Wait` and `Quit` drive the shell loop itself and are no-ops here.
pub fn execute<P: EventProxy, W: Write>(
    state: &mut AppState,
    proxy: P,
    command: ShellCommand,
    out: &mut W,
) -> Result<()> {
    match command {
        ShellCommand::Tree => write!(out, "{}", commands::show_tree(state))?,
        ShellCommand::Toggle(rows) => write!(out, "{}", commands::toggle_rows(state, &rows)?)?,
        ShellCommand::CheckAll => {
            commands::check_all(state)?;
            writeln!(out, "{}", state.status)?;
        }
        ShellCommand::UncheckAll => {
            commands::uncheck_all(state)?;
            writeln!(out, "{}", state.status)?;
        }
        ShellCommand::Generate => write!(out, "{}", commands::generate_output(state)?)?,
        ShellCommand::Save(path) => {
            commands::save_output(state, &path)?;
            writeln!(out, "{}", state.status)?;
        }
        ShellCommand::Preview(row) => writeln!(out, "{}", commands::preview(state, row)?)?,
        ShellCommand::Refresh => {
            commands::refresh(state, proxy);
            writeln!(out, "{}", state.status)?;
        }
        ShellCommand::Open(directory) => {
            commands::open_directory(state, proxy, &directory)?;
            writeln!(out, "{}", state.status)?;
        }
        ShellCommand::Recent(None) => write!(out, "{}", commands::list_recent(state))?,
        ShellCommand::Recent(Some(n)) => {
            commands::open_recent(state, proxy, n)?;
            writeln!(out, "{}", state.status)?;
        }
        ShellCommand::ListPatterns => write!(out, "{}", commands::list_patterns(state))?,
        ShellCommand::AddPattern(pattern) => {
            commands::add_pattern(state, proxy, &pattern)?;
            writeln!(out, "{}", state.status)?;
        }
        ShellCommand::RemovePattern(pattern) => {
            commands::remove_pattern(state, proxy, &pattern)?;
            writeln!(out, "{}", state.status)?;
        }
        ShellCommand::MaxLines(n) => {
            commands::set_max_lines(state, n);
            writeln!(out, "{}", state.status)?;
        }
        ShellCommand::ExportConfig(path) => {
            commands::export_config(state, &path)?;
            writeln!(out, "{}", state.status)?;
        }
        ShellCommand::ImportConfig(path) => {
            commands::import_config(state, proxy, &path)?;
            writeln!(out, "{}", state.status)?;
        }
        ShellCommand::Json => writeln!(out, "{}", commands::ui_state_json(state)?)?,
        ShellCommand::Status => {
            let checked = state.selection.len();
            writeln!(out, "{} ({checked} item(s) checked)", state.status)?;
        }
        ShellCommand::Help => write!(out, "{HELP}")?,
        ShellCommand::Wait | ShellCommand::Quit => {}
    }
    Ok(())
}
