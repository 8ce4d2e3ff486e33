use crate::common::{DomainError, DomainResult};
use crate::domains::logger::DynLogger;
use crate::domains::tour::{Speed, TourCommand, TourCommandActor};
use std::io::{self, BufRead};
use std::thread;
use tokio::io::{AsyncBufRead, AsyncBufReadExt};

pub const CONTROLS_HELP: &str =
    "controls: s=start p=stop b=previous r=reset 1|2|3=speed v on|off=narration";

/// Parse one line of keyboard input. Blank lines yield `None`.
pub fn parse_control(line: &str) -> DomainResult<Option<TourCommand>> {
    let mut words = line.split_whitespace();
    let Some(word) = words.next() else { return Ok(None) };

    let command = match word.to_ascii_lowercase().as_str() {
        "s" | "start" => TourCommand::Start,
        "p" | "stop" | "pause" => TourCommand::Stop,
        "b" | "prev" | "previous" => TourCommand::Previous,
        "r" | "reset" => TourCommand::Reset,
        "1" | "slow" => TourCommand::SetSpeed(Speed::Slow),
        "2" | "normal" => TourCommand::SetSpeed(Speed::Normal),
        "3" | "fast" => TourCommand::SetSpeed(Speed::Fast),
        "v" | "voice" => match words.next() {
            Some("on") => TourCommand::SetNarration(true),
            Some("off") => TourCommand::SetNarration(false),
            _ => {
                return Err(DomainError::InvalidCommand {
                    reason: "voice needs `on` or `off`".to_string(),
                })
            }
        },
        other => {
            return Err(DomainError::InvalidCommand {
                reason: format!("unknown control `{}`", other),
            })
        }
    };
    Ok(Some(command))
}

fn command_from_line(line: &str, logger: &DynLogger) -> Option<TourCommand> {
    match parse_control(line) {
        Ok(command) => command,
        Err(e) => {
            logger.warn(&format!("{}; {}", e, CONTROLS_HELP));
            None
        }
    }
}

/// Forward parsed controls from `input` to the tour until input ends or the tour stops listening.
pub async fn run_controls<R>(input: R, actor: TourCommandActor, logger: DynLogger)
where
    R: AsyncBufRead + Unpin,
{
    let mut lines = input.lines();
    loop {
        let line = match lines.next_line().await {
            Ok(Some(line)) => line,
            Ok(None) => return,
            Err(e) => {
                logger.error(&format!("Failed to read controls: {}", e));
                return;
            }
        };

        if let Some(command) = command_from_line(&line, &logger) {
            if let Err(e) = actor.send(command).await {
                logger.warn(&e);
                return;
            }
        }
    }
}

/// Keyboard controls on standard input.
///
/// Reads on a dedicated thread so a pending read never keeps the tokio
/// runtime from shutting down.
pub fn spawn_stdin_controls(actor: TourCommandActor, logger: DynLogger) -> io::Result<thread::JoinHandle<()>> {
    thread::Builder::new().name("stdin-controls".to_string()).spawn(move || {
        for line in io::stdin().lock().lines() {
            let line = match line {
                Ok(line) => line,
                Err(e) => {
                    logger.error(&format!("Failed to read controls: {}", e));
                    return;
                }
            };
            if let Some(command) = command_from_line(&line, &logger) {
                if let Err(e) = actor.blocking_send(command) {
                    logger.warn(&e);
                    return;
                }
            }
        }
    })
}
