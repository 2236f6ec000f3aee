//! Session management.
//!
//! Runs the inspector on a background thread so every dispatch serializes
//! through that thread's single dispatch context, processing one command to
//! completion before accepting the next. Commands go in and events come
//! back over crossbeam channels.

use crate::error::InspectError;
use crate::inspector::Inspector;
use crate::memory::TargetMemory;
use anyhow::{Context as _, Result};
use crossbeam_channel::{Receiver, Sender};
use std::thread;
use std::time::Duration;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InspectCommand {
    /// Display objects by numeric id.
    Object { args: Vec<String>, verbose: bool },
    /// Display semaphores by index.
    Semaphore { args: Vec<String>, verbose: bool },
    /// Display tasks by index.
    Task { args: Vec<String>, verbose: bool },
    /// Display message queues by index.
    MessageQueue { args: Vec<String>, verbose: bool },
    Exit,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InspectEvent {
    /// A command completed; the rendered report lines.
    Report(Vec<String>),
    /// A command failed. Lines rendered before the failure are kept so the
    /// operator sees the partial batch.
    Failed { lines: Vec<String>, message: String },
}

/// A handle to an inspection session running in a background thread.
pub struct SessionHandle {
    command_tx: Sender<InspectCommand>,
    event_rx: Receiver<InspectEvent>,
    thread_handle: Option<thread::JoinHandle<()>>,
}

impl SessionHandle {
    /// Spawn a session. The factory runs on the session thread, so it can
    /// open non-`Send` targets (probe sessions) there; a factory error is
    /// reported as a `Failed` event before the thread exits.
    pub fn spawn<M, F>(factory: F) -> Self
    where
        M: TargetMemory + 'static,
        F: FnOnce() -> Result<Inspector<M>> + Send + 'static,
    {
        let (cmd_tx, cmd_rx) = crossbeam_channel::unbounded::<InspectCommand>();
        let (evt_tx, evt_rx) = crossbeam_channel::unbounded::<InspectEvent>();

        let thread_handle = thread::spawn(move || {
            let mut inspector = match factory() {
                Ok(inspector) => inspector,
                Err(e) => {
                    let _ = evt_tx.send(InspectEvent::Failed {
                        lines: Vec::new(),
                        message: format!("failed to open target: {e:#}"),
                    });
                    return;
                }
            };
            log::info!("inspection session started");

            while let Ok(cmd) = cmd_rx.recv() {
                let mut lines = Vec::new();
                let result: Result<(), InspectError> = match cmd {
                    InspectCommand::Object { args, verbose } => {
                        inspector.object_command(&args, verbose, &mut lines)
                    }
                    InspectCommand::Semaphore { args, verbose } => {
                        inspector.semaphore_command(&args, verbose, &mut lines)
                    }
                    InspectCommand::Task { args, verbose } => {
                        inspector.task_command(&args, verbose, &mut lines)
                    }
                    InspectCommand::MessageQueue { args, verbose } => {
                        inspector.mqueue_command(&args, verbose, &mut lines)
                    }
                    InspectCommand::Exit => return,
                };

                let event = match result {
                    Ok(()) => InspectEvent::Report(lines),
                    Err(e) => InspectEvent::Failed { lines, message: e.to_string() },
                };
                if evt_tx.send(event).is_err() {
                    return;
                }
            }
        });

        Self { command_tx: cmd_tx, event_rx: evt_rx, thread_handle: Some(thread_handle) }
    }

    /// Session handle wired to bare channels, for tests of the plumbing.
    pub fn new_test() -> (Self, Receiver<InspectCommand>, Sender<InspectEvent>) {
        let (cmd_tx, cmd_rx) = crossbeam_channel::unbounded();
        let (evt_tx, evt_rx) = crossbeam_channel::unbounded();
        (
            Self { command_tx: cmd_tx, event_rx: evt_rx, thread_handle: None },
            cmd_rx,
            evt_tx,
        )
    }

    pub fn send(&self, cmd: InspectCommand) -> Result<()> {
        self.command_tx.send(cmd).context("Failed to send command to session")
    }

    /// Wait for the next event.
    pub fn recv_timeout(&self, timeout: Duration) -> Result<InspectEvent> {
        self.event_rx
            .recv_timeout(timeout)
            .context("Timed out waiting for session event")
    }

    /// Send `Exit` and join the session thread.
    pub fn shutdown(mut self) {
        let _ = self.command_tx.send(InspectCommand::Exit);
        if let Some(handle) = self.thread_handle.take() {
            let _ = handle.join();
        }
    }
}
