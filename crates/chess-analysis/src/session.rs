//! One engine process, owned for the length of one analysis.

use std::io::{self, BufRead, BufReader};
use std::path::Path;
use std::process::{Child, ChildStdin, Command, Stdio};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::{self, Receiver, RecvTimeoutError};
use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};

use tracing::{debug, warn};
use uci::GuiCommand;

use crate::engine::EngineError;

/// How often a blocked read wakes up to look at the cancel flag.
const POLL_INTERVAL: Duration = Duration::from_millis(50);

/// Shared flag that aborts a running analysis.
#[derive(Debug, Clone, Default)]
pub struct CancelToken(Arc<AtomicBool>);

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }
}

/// A running engine process with its pipes.
///
/// Stdout is read on a helper thread and handed over through a channel, so
/// reads can give up at a deadline. Stderr is drained into debug logs.
/// Dropping the session sends `quit`, kills the process if it has not left
/// within the grace period, and reaps it. Only the direct child is killed;
/// see [`EngineConfig::engine_args`](crate::EngineConfig::engine_args) for
/// wrapper scripts.
pub struct EngineSession {
    process: Child,
    stdin: ChildStdin,
    lines: Receiver<io::Result<String>>,
    quit_grace: Duration,
}

impl EngineSession {
    /// Spawn the engine at `path` with `args`.
    pub fn spawn(path: &Path, args: &[String], quit_grace: Duration) -> Result<Self, EngineError> {
        let mut process = Command::new(path)
            .args(args)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(EngineError::SpawnError)?;

        let (stdin, stdout, stderr) = match (
            process.stdin.take(),
            process.stdout.take(),
            process.stderr.take(),
        ) {
            (Some(stdin), Some(stdout), Some(stderr)) => (stdin, stdout, stderr),
            _ => {
                let _ = process.kill();
                let _ = process.wait();
                return Err(EngineError::InitFailed);
            }
        };

        let (tx, rx) = mpsc::channel();
        thread::spawn(move || {
            for line in BufReader::new(stdout).lines() {
                let failed = line.is_err();
                if tx.send(line).is_err() || failed {
                    break;
                }
            }
        });

        thread::spawn(move || {
            for line in BufReader::new(stderr).lines().map_while(Result::ok) {
                debug!(target: "engine_stderr", "{}", line);
            }
        });

        debug!(pid = process.id(), path = %path.display(), "engine started");

        Ok(Self {
            process,
            stdin,
            lines: rx,
            quit_grace,
        })
    }

    /// Write one command line and flush it.
    pub fn send(&mut self, command: &GuiCommand) -> Result<(), EngineError> {
        debug!(command = %command.to_uci(), "to engine");
        command.write_to(&mut self.stdin)?;
        Ok(())
    }

    /// Wait for the next output line.
    ///
    /// Returns `Ok(None)` once the engine has closed its output. Fails with
    /// [`EngineError::Timeout`] when `deadline` passes and with
    /// [`EngineError::Cancelled`] when `cancel` is raised.
    pub fn next_line(
        &mut self,
        deadline: Instant,
        budget: Duration,
        cancel: &CancelToken,
    ) -> Result<Option<String>, EngineError> {
        loop {
            if cancel.is_cancelled() {
                let _ = self.send(&GuiCommand::Stop);
                return Err(EngineError::Cancelled);
            }

            let now = Instant::now();
            if now >= deadline {
                return Err(EngineError::Timeout(budget.as_millis() as u64));
            }

            match self.lines.recv_timeout((deadline - now).min(POLL_INTERVAL)) {
                Ok(Ok(line)) => return Ok(Some(line)),
                Ok(Err(e)) => return Err(EngineError::Io(e)),
                Err(RecvTimeoutError::Timeout) => continue,
                Err(RecvTimeoutError::Disconnected) => return Ok(None),
            }
        }
    }

    fn shutdown(&mut self) {
        let _ = self.send(&GuiCommand::Quit);

        let deadline = Instant::now() + self.quit_grace;
        loop {
            match self.process.try_wait() {
                Ok(Some(status)) => {
                    debug!(%status, "engine exited");
                    return;
                }
                Ok(None) if Instant::now() < deadline => {
                    thread::sleep(Duration::from_millis(10));
                }
                _ => break,
            }
        }

        warn!(pid = self.process.id(), "engine did not exit after quit, killing it");
        let _ = self.process.kill();
        if let Err(e) = self.process.wait() {
            warn!("failed to reap engine process: {}", e);
        }
    }
}

impl Drop for EngineSession {
    fn drop(&mut self) {
        self.shutdown();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cancel_token_is_shared_between_clones() {
        let token = CancelToken::new();
        let clone = token.clone();
        assert!(!clone.is_cancelled());
        token.cancel();
        assert!(clone.is_cancelled());
    }

    #[test]
    fn spawn_nonexistent_executable_returns_error() {
        let result = EngineSession::spawn(
            Path::new("/nonexistent/path/to/engine"),
            &[],
            Duration::from_millis(10),
        );
        assert!(matches!(result, Err(EngineError::SpawnError(_))));
    }
}
