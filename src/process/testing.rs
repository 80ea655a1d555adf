//! Recording runner used by checker and pipeline tests

use std::sync::Mutex;

use super::{CommandResult, CommandSpec, ProcessRunner};

type Responder = Box<dyn Fn(&CommandSpec) -> CommandResult + Send + Sync>;

/// Records every command and answers with a scripted result
pub(crate) struct RecordingRunner {
    calls: Mutex<Vec<CommandSpec>>,
    responder: Responder,
}

impl RecordingRunner {
    /// Every command succeeds
    pub(crate) fn passing() -> Self {
        Self::responding(|_| CommandResult::exited(0, ""))
    }

    /// Commands whose argv contains `needle` fail, everything else passes
    pub(crate) fn failing_when(needle: &'static str) -> Self {
        Self::responding(move |command| {
            if command.argv().iter().any(|arg| arg.contains(needle)) {
                CommandResult::exited(1, format!(
                    "violation reported by {}",
                    command.program.to_string_lossy()
                ))
            } else {
                CommandResult::exited(0, "")
            }
        })
    }

    pub(crate) fn responding(
        responder: impl Fn(&CommandSpec) -> CommandResult + Send + Sync + 'static,
    ) -> Self {
        Self {
            calls: Mutex::new(Vec::new()),
            responder: Box::new(responder),
        }
    }

    pub(crate) fn calls(&self) -> Vec<CommandSpec> {
        self.calls.lock().unwrap().clone()
    }

    /// Calls rendered as space-joined argv strings
    pub(crate) fn command_lines(&self) -> Vec<String> {
        self.calls().iter().map(ToString::to_string).collect()
    }
}

impl ProcessRunner for RecordingRunner {
    async fn run(&self, command: &CommandSpec) -> CommandResult {
        self.calls.lock().unwrap().push(command.clone());
        (self.responder)(command)
    }
}
