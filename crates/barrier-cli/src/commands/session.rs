//! Interactive session: one barrier, commands from stdin, events as they happen.

use std::path::Path;

use barrier_core::display::log_line;
use barrier_core::{BarrierAction, BarrierHandle, Config};
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::broadcast::error::RecvError;

use super::output::{print_event, print_snapshot};
use super::{load_config, runtime, seeded_controller};

const HELP: &str = "commands: open, close, status, log, help, quit";

#[derive(Debug, PartialEq, Eq)]
enum Input {
    Request(BarrierAction),
    Status,
    Log,
    Help,
    Quit,
    Empty,
    Unknown(String),
}

fn parse_input(line: &str) -> Input {
    let word = line.trim().to_ascii_lowercase();
    match word.as_str() {
        "" => Input::Empty,
        "status" | "s" => Input::Status,
        "log" | "l" => Input::Log,
        "help" | "h" | "?" => Input::Help,
        "quit" | "exit" | "q" => Input::Quit,
        other => match other.parse::<BarrierAction>() {
            Ok(action) => Input::Request(action),
            Err(_) => Input::Unknown(other.to_string()),
        },
    }
}

pub fn run(config_path: Option<&Path>) -> Result<(), Box<dyn std::error::Error>> {
    let config = load_config(config_path)?;
    let controller = seeded_controller(&config);

    runtime()?.block_on(async {
        let service = barrier_core::BarrierService::spawn(controller);
        let handle = service.handle();
        let mut events = handle.subscribe();
        let mut lines = BufReader::new(tokio::io::stdin()).lines();

        println!("{HELP}");
        loop {
            tokio::select! {
                line = lines.next_line() => {
                    let Some(line) = line? else { break };
                    if !dispatch(parse_input(&line), &handle, &config).await? {
                        break;
                    }
                }
                event = events.recv() => match event {
                    Ok(event) => print_event(&event, false)?,
                    Err(RecvError::Lagged(skipped)) => {
                        tracing::warn!(skipped, "event subscriber lagged");
                    }
                    Err(RecvError::Closed) => break,
                },
            }
        }

        // In-flight transitions still land before the loop stops.
        handle.shutdown().await?;
        drop(handle);
        let print_rest = async {
            while let Ok(event) = events.recv().await {
                if let Err(e) = print_event(&event, false) {
                    tracing::warn!(error = %e, "failed to print event");
                }
            }
        };
        let (joined, ()) = tokio::join!(service.join(), print_rest);
        joined?;
        Ok::<(), Box<dyn std::error::Error>>(())
    })
}

/// Returns `false` when the session should end.
async fn dispatch(
    input: Input,
    handle: &BarrierHandle,
    config: &Config,
) -> Result<bool, Box<dyn std::error::Error>> {
    match input {
        Input::Request(action) => {
            // The outcome is printed from the event stream.
            handle.request(action).await?;
        }
        Input::Status => print_snapshot(&handle.snapshot().await?, config, false)?,
        Input::Log => {
            for entry in handle.snapshot().await?.log.iter() {
                println!("{}", log_line(entry));
            }
        }
        Input::Help => println!("{HELP}"),
        Input::Quit => return Ok(false),
        Input::Empty => {}
        Input::Unknown(word) => println!("unknown command '{word}'; {HELP}"),
    }
    Ok(true)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_session_commands() {
        assert_eq!(parse_input(" OPEN "), Input::Request(BarrierAction::Open));
        assert_eq!(parse_input("close"), Input::Request(BarrierAction::Close));
        assert_eq!(parse_input("s"), Input::Status);
        assert_eq!(parse_input("exit"), Input::Quit);
        assert_eq!(parse_input(""), Input::Empty);
        assert_eq!(parse_input("raise"), Input::Unknown("raise".into()));
    }
}
