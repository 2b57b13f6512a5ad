use std::sync::Arc;
use std::time::Duration;

use tokio::sync::{mpsc, oneshot, watch};
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;

use crate::{
    config::Config,
    errors::{AppError, AppResult},
    models::{domain::QuizResult, dto::QuizSessionView},
    repositories::QuizResultSink,
    services::quiz_session_service::{QuizSession, TickOutcome},
};

/// Requests a `SessionHandle` sends to the task that owns the session.
#[derive(Debug)]
pub enum SessionCommand {
    View {
        reply: oneshot::Sender<QuizSessionView>,
    },
    SelectAnswer {
        question_id: String,
        option_id: String,
        reply: oneshot::Sender<AppResult<()>>,
    },
    Next {
        reply: oneshot::Sender<AppResult<()>>,
    },
    Previous {
        reply: oneshot::Sender<AppResult<()>>,
    },
    GoTo {
        index: usize,
        reply: oneshot::Sender<AppResult<()>>,
    },
    Submit {
        reply: oneshot::Sender<AppResult<QuizResult>>,
    },
}

/// Cloneable front door to a running session.
#[derive(Clone)]
pub struct SessionHandle {
    session_id: String,
    commands: mpsc::Sender<SessionCommand>,
    updates: watch::Receiver<QuizSessionView>,
}

impl SessionHandle {
    pub fn session_id(&self) -> &str {
        &self.session_id
    }

    /// Receives a fresh view after every tick and every command.
    pub fn subscribe(&self) -> watch::Receiver<QuizSessionView> {
        self.updates.clone()
    }

    pub fn latest(&self) -> QuizSessionView {
        self.updates.borrow().clone()
    }

    pub async fn view(&self) -> AppResult<QuizSessionView> {
        self.request(|reply| SessionCommand::View { reply }).await
    }

    pub async fn select_answer(&self, question_id: &str, option_id: &str) -> AppResult<()> {
        self.request(|reply| SessionCommand::SelectAnswer {
            question_id: question_id.to_string(),
            option_id: option_id.to_string(),
            reply,
        })
        .await?
    }

    pub async fn next(&self) -> AppResult<()> {
        self.request(|reply| SessionCommand::Next { reply }).await?
    }

    pub async fn previous(&self) -> AppResult<()> {
        self.request(|reply| SessionCommand::Previous { reply }).await?
    }

    pub async fn go_to(&self, index: usize) -> AppResult<()> {
        self.request(|reply| SessionCommand::GoTo { index, reply })
            .await?
    }

    pub async fn submit(&self) -> AppResult<QuizResult> {
        self.request(|reply| SessionCommand::Submit { reply }).await?
    }

    /// Resolves once the session has completed, by submission or expiry.
    pub async fn wait_for_completion(&self) -> AppResult<QuizResult> {
        let mut updates = self.updates.clone();
        loop {
            let result = updates.borrow_and_update().result.clone();
            if let Some(result) = result {
                return Ok(result);
            }
            updates.changed().await.map_err(|_| {
                AppError::InternalError(format!(
                    "Session {} stopped before completing",
                    self.session_id
                ))
            })?;
        }
    }

    async fn request<T>(
        &self,
        build: impl FnOnce(oneshot::Sender<T>) -> SessionCommand,
    ) -> AppResult<T> {
        let (reply, response) = oneshot::channel();
        self.commands.send(build(reply)).await.map_err(|_| {
            AppError::InternalError(format!("Session {} is no longer running", self.session_id))
        })?;
        response.await.map_err(|_| {
            AppError::InternalError(format!(
                "Session {} dropped the request",
                self.session_id
            ))
        })
    }
}

pub struct SessionRunner;

impl SessionRunner {
    /// Moves the session onto its own task. Ticks and commands are handled one at a
    /// time on that task, so an expiry and a submit can never interleave.
    pub fn spawn(
        session: QuizSession,
        sink: Arc<dyn QuizResultSink>,
        config: &Config,
    ) -> (SessionHandle, JoinHandle<()>) {
        let (commands_tx, commands_rx) = mpsc::channel(config.command_buffer.max(1));
        let (updates_tx, updates_rx) = watch::channel(session.view());

        let handle = SessionHandle {
            session_id: session.session_id().to_string(),
            commands: commands_tx,
            updates: updates_rx,
        };
        let worker = SessionWorker {
            session,
            sink,
            updates: updates_tx,
        };
        let join = tokio::spawn(worker.run(commands_rx, config.tick_interval()));

        (handle, join)
    }
}

struct SessionWorker {
    session: QuizSession,
    sink: Arc<dyn QuizResultSink>,
    updates: watch::Sender<QuizSessionView>,
}

impl SessionWorker {
    async fn run(mut self, mut commands: mpsc::Receiver<SessionCommand>, tick_interval: Duration) {
        let mut interval = tokio::time::interval(tick_interval);
        interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
        let mut commands_open = true;

        loop {
            let ticking = !self.session.is_completed();
            if !ticking && !commands_open {
                break;
            }

            tokio::select! {
                command = commands.recv(), if commands_open => match command {
                    Some(command) => self.dispatch(command).await,
                    None => {
                        commands_open = false;
                        if ticking {
                            log::info!(
                                "All handles to session {} dropped; running until expiry",
                                self.session.session_id()
                            );
                        }
                    }
                },
                _ = interval.tick(), if ticking => self.on_tick().await,
            }
        }

        log::debug!("Runner for session {} stopped", self.session.session_id());
    }

    async fn dispatch(&mut self, command: SessionCommand) {
        let was_completed = self.session.is_completed();

        // Settle before replying, so a caller that sees completion also sees the
        // result already handed to the sink.
        match command {
            SessionCommand::View { reply } => {
                let _ = reply.send(self.session.view());
            }
            SessionCommand::SelectAnswer {
                question_id,
                option_id,
                reply,
            } => {
                let outcome = self.session.select_answer(&question_id, &option_id);
                self.settle(was_completed).await;
                let _ = reply.send(outcome);
            }
            SessionCommand::Next { reply } => {
                let outcome = self.session.next();
                self.settle(was_completed).await;
                let _ = reply.send(outcome);
            }
            SessionCommand::Previous { reply } => {
                let outcome = self.session.previous();
                self.settle(was_completed).await;
                let _ = reply.send(outcome);
            }
            SessionCommand::GoTo { index, reply } => {
                let outcome = self.session.go_to(index);
                self.settle(was_completed).await;
                let _ = reply.send(outcome);
            }
            SessionCommand::Submit { reply } => {
                let outcome = self.session.submit();
                self.settle(was_completed).await;
                let _ = reply.send(outcome);
            }
        }
    }

    async fn on_tick(&mut self) {
        let was_completed = self.session.is_completed();

        match self.session.tick() {
            Ok(TickOutcome::Running { time_remaining }) => {
                log::debug!(
                    "Session {} has {}s remaining",
                    self.session.session_id(),
                    time_remaining
                );
            }
            Ok(TickOutcome::Expired(_)) => {
                log::info!("Session {} ran out of time", self.session.session_id());
            }
            Ok(TickOutcome::Completed) => {}
            Err(err) => {
                log::error!(
                    "Tick failed for session {}: {}",
                    self.session.session_id(),
                    err
                );
            }
        }

        self.settle(was_completed).await;
    }

    /// Hand a freshly completed result to the sink, then publish the new view.
    async fn settle(&mut self, was_completed: bool) {
        if !was_completed {
            if let Some(result) = self.session.result() {
                if let Err(err) = self
                    .sink
                    .save_result(self.session.session_id(), result)
                    .await
                {
                    log::warn!(
                        "Failed to deliver result for session {}: {}",
                        self.session.session_id(),
                        err
                    );
                }
            }
        }

        self.updates.send_replace(self.session.view());
    }
}
