use std::sync::Arc;

use serde::Serialize;
use tokio::io::{AsyncBufReadExt, BufReader};

use quiz_session_engine::{
    config::Config,
    errors::{AppError, AppResult},
    models::domain::QuizDefinition,
    repositories::LogResultSink,
    services::{QuizSession, SessionHandle, SessionRunner, TokioClock},
};

#[derive(Debug, PartialEq, Eq)]
enum CliCommand {
    View,
    Next,
    Previous,
    GoTo(usize),
    Select {
        question_id: Option<String>,
        option_id: String,
    },
    Submit,
}

fn parse_command(line: &str) -> Result<CliCommand, String> {
    let parts: Vec<&str> = line.split_whitespace().collect();
    match parts.as_slice() {
        ["view"] => Ok(CliCommand::View),
        ["next"] => Ok(CliCommand::Next),
        ["prev"] | ["previous"] => Ok(CliCommand::Previous),
        ["goto", index] => index
            .parse()
            .map(CliCommand::GoTo)
            .map_err(|_| format!("'{}' is not a question index", index)),
        ["select", option_id] => Ok(CliCommand::Select {
            question_id: None,
            option_id: option_id.to_string(),
        }),
        ["select", question_id, option_id] => Ok(CliCommand::Select {
            question_id: Some(question_id.to_string()),
            option_id: option_id.to_string(),
        }),
        ["submit"] | ["quit"] => Ok(CliCommand::Submit),
        _ => Err(format!(
            "unknown command '{}' (view, next, prev, goto <n>, select [question] <option>, submit)",
            line.trim()
        )),
    }
}

fn print_json<T: Serialize>(value: &T) -> AppResult<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

/// Returns true once the session has been submitted.
async fn run_command(handle: &SessionHandle, command: CliCommand) -> AppResult<bool> {
    match command {
        CliCommand::View => {}
        CliCommand::Next => handle.next().await?,
        CliCommand::Previous => handle.previous().await?,
        CliCommand::GoTo(index) => handle.go_to(index).await?,
        CliCommand::Select {
            question_id,
            option_id,
        } => {
            let question_id = match question_id {
                Some(id) => id,
                None => handle.view().await?.question.id,
            };
            handle.select_answer(&question_id, &option_id).await?
        }
        CliCommand::Submit => {
            print_json(&handle.submit().await?)?;
            return Ok(true);
        }
    }

    print_json(&handle.view().await?)?;
    Ok(false)
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> AppResult<()> {
    dotenvy::dotenv().ok();
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let config = Config::from_env();
    config.validate()?;

    log::info!("Loading quiz from {}", config.quiz_definition_path);
    let json = tokio::fs::read_to_string(&config.quiz_definition_path).await?;
    let definition = Arc::new(QuizDefinition::from_json(&json)?);

    let session = QuizSession::start(definition, Arc::new(TokioClock::new()))?;
    let (handle, runner) = SessionRunner::spawn(session, Arc::new(LogResultSink), &config);
    print_json(&handle.latest())?;

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        tokio::select! {
            result = handle.wait_for_completion() => {
                println!("Time is up.");
                print_json(&result?)?;
                break;
            }
            line = lines.next_line() => {
                let Some(line) = line? else {
                    // stdin closed: hand in whatever has been answered
                    print_json(&handle.submit().await?)?;
                    break;
                };
                if line.trim().is_empty() {
                    continue;
                }
                match parse_command(&line) {
                    Ok(command) => match run_command(&handle, command).await {
                        Ok(true) => break,
                        Ok(false) => {}
                        Err(err) if err.is_caller_error() => {
                            eprintln!("error [{}]: {}", err.error_code(), err)
                        }
                        Err(err) => return Err(err),
                    },
                    Err(message) => eprintln!("{}", message),
                }
            }
        }
    }

    drop(handle);
    runner
        .await
        .map_err(|e| AppError::InternalError(format!("Session runner failed: {}", e)))?;
    Ok(())
}
