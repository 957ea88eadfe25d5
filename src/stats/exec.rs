// External command execution for source providers

use std::io::Read;
use std::process::{Command, Stdio};
use std::thread;
use std::time::Duration;
use wait_timeout::ChildExt;

/// Default limit for a single external command
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(5);

/// Runs external commands and captures their standard output.
///
/// Every failure mode (command not found, non-zero exit, non UTF-8 output,
/// timeout) collapses to an empty string.
#[derive(Debug, Clone, Copy)]
pub struct Runner {
    timeout: Duration,
}

impl Default for Runner {
    fn default() -> Self {
        Self::new(DEFAULT_TIMEOUT)
    }
}

impl Runner {
    pub fn new(timeout: Duration) -> Self {
        Self { timeout }
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Run `program` with `args`, returning trimmed stdout or `""`
    pub fn run(&self, program: &str, args: &[&str]) -> String {
        if program.is_empty() {
            return String::new();
        }

        let mut child = match Command::new(program)
            .args(args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::null())
            .spawn()
        {
            Ok(child) => child,
            Err(e) => {
                tracing::trace!(program, error = %e, "command unavailable");
                return String::new();
            }
        };

        // Drain stdout on the side so a chatty command cannot fill the pipe
        // and stall while we wait on it.
        let reader = child.stdout.take().map(|mut stdout| {
            thread::spawn(move || {
                let mut buf = Vec::new();
                let _ = stdout.read_to_end(&mut buf);
                buf
            })
        });

        let status = match child.wait_timeout(self.timeout) {
            Ok(Some(status)) => Some(status),
            Ok(None) => {
                tracing::trace!(program, timeout = ?self.timeout, "command timed out");
                let _ = child.kill();
                let _ = child.wait();
                None
            }
            Err(e) => {
                tracing::trace!(program, error = %e, "wait failed");
                let _ = child.kill();
                let _ = child.wait();
                None
            }
        };

        let output = reader
            .and_then(|handle| handle.join().ok())
            .unwrap_or_default();

        match status {
            Some(status) if status.success() => String::from_utf8(output)
                .map(|s| s.trim().to_string())
                .unwrap_or_default(),
            Some(status) => {
                tracing::trace!(program, code = ?status.code(), "command failed");
                String::new()
            }
            None => String::new(),
        }
    }
}
