//! Windows service control
//!
//! Installs and drives the AI server as a background service through NSSM.
//! Exit codes are turned into operator-facing text; nothing is retried.

use crate::config::ServiceConfig;
use crate::consts::cli_consts::service::{ROTATE_SECONDS, STDERR_LOG, STDOUT_LOG};
use std::path::Path;
use std::process::Command;
use thiserror::Error;

#[cfg(test)]
use mockall::automock;

#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("Failed to run service manager '{program}': {source}")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },

    #[error("'{command}' failed with exit code {code}: {output}. See the logs in {log_dir}")]
    Failed {
        command: String,
        code: i32,
        output: String,
        log_dir: String,
    },
}

/// Exit status and captured output of one service manager call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandOutput {
    /// `None` when the process was killed by a signal.
    pub code: Option<i32>,
    pub stdout: String,
    pub stderr: String,
}

impl CommandOutput {
    pub fn success(&self) -> bool {
        self.code == Some(0)
    }
}

#[cfg_attr(test, automock)]
pub trait CommandRunner: Send + Sync {
    fn run(&self, program: &str, args: &[String]) -> std::io::Result<CommandOutput>;
}

/// Runs commands on the host.
#[derive(Debug, Clone, Default)]
pub struct SystemRunner;

impl CommandRunner for SystemRunner {
    fn run(&self, program: &str, args: &[String]) -> std::io::Result<CommandOutput> {
        let output = Command::new(program).args(args).output()?;
        Ok(CommandOutput {
            code: output.status.code(),
            stdout: decode_console(&output.stdout),
            stderr: decode_console(&output.stderr),
        })
    }
}

/// NSSM writes UTF-16LE to pipes; dropping the NUL bytes recovers ASCII text.
fn decode_console(bytes: &[u8]) -> String {
    String::from_utf8_lossy(bytes)
        .replace('\0', "")
        .trim()
        .to_string()
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, strum::Display)]
#[strum(serialize_all = "lowercase")]
pub enum ServiceAction {
    Install,
    Start,
    Stop,
    Restart,
    Status,
    Remove,
}

pub struct ServiceManager<R: CommandRunner> {
    runner: R,
    config: ServiceConfig,
}

impl<R: CommandRunner> ServiceManager<R> {
    pub fn new(runner: R, config: ServiceConfig) -> Self {
        Self { runner, config }
    }

    /// Runs one NSSM command and maps a non-zero exit to [`ServiceError::Failed`].
    fn nssm(&self, args: Vec<String>) -> Result<String, ServiceError> {
        let program = self.config.nssm_path.as_str();
        let command = format!("{} {}", program, args.join(" "));
        log::debug!("Running {}", command);

        let output = self
            .runner
            .run(program, &args)
            .map_err(|source| ServiceError::Spawn {
                program: program.to_string(),
                source,
            })?;

        if !output.success() {
            let text = if output.stderr.is_empty() {
                output.stdout
            } else {
                output.stderr
            };
            log::error!("{} exited with {:?}: {}", command, output.code, text);
            return Err(ServiceError::Failed {
                command,
                code: output.code.unwrap_or(-1),
                output: text,
                log_dir: self.config.log_dir.clone(),
            });
        }
        Ok(output.stdout)
    }

    fn set(&self, parameter: &str, values: &[&str]) -> Result<String, ServiceError> {
        let mut args = vec![
            "set".to_string(),
            self.config.name.clone(),
            parameter.to_string(),
        ];
        args.extend(values.iter().map(|v| v.to_string()));
        self.nssm(args)
    }

    fn simple(&self, verb: &str) -> Result<String, ServiceError> {
        self.nssm(vec![verb.to_string(), self.config.name.clone()])
    }

    /// Registers the service and configures daily-rotated stdout/stderr logs.
    pub fn install(&self) -> Result<String, ServiceError> {
        let mut args = vec![
            "install".to_string(),
            self.config.name.clone(),
            self.config.executable.clone(),
        ];
        args.extend(self.config.arguments.iter().cloned());
        self.nssm(args)?;

        let log_dir = Path::new(&self.config.log_dir);
        let stdout_log = log_dir.join(STDOUT_LOG).to_string_lossy().into_owned();
        let stderr_log = log_dir.join(STDERR_LOG).to_string_lossy().into_owned();
        let rotate_seconds = ROTATE_SECONDS.to_string();

        if let Some(dir) = &self.config.working_dir {
            self.set("AppDirectory", &[dir.as_str()])?;
        }
        self.set("AppStdout", &[stdout_log.as_str()])?;
        self.set("AppStderr", &[stderr_log.as_str()])?;
        self.set("AppRotateFiles", &["1"])?;
        self.set("AppRotateOnline", &["1"])?;
        self.set("AppRotateSeconds", &[rotate_seconds.as_str()])?;
        self.set("Start", &["SERVICE_AUTO_START"])?;

        Ok(format!(
            "Service {} installed. Logs: {}",
            self.config.name, self.config.log_dir
        ))
    }

    pub fn start(&self) -> Result<String, ServiceError> {
        self.simple("start")?;
        Ok(format!("Service {} started", self.config.name))
    }

    pub fn stop(&self) -> Result<String, ServiceError> {
        self.simple("stop")?;
        Ok(format!("Service {} stopped", self.config.name))
    }

    pub fn restart(&self) -> Result<String, ServiceError> {
        self.simple("restart")?;
        Ok(format!("Service {} restarted", self.config.name))
    }

    /// Service manager's status text, e.g. `SERVICE_RUNNING`.
    pub fn status(&self) -> Result<String, ServiceError> {
        let status = self.simple("status")?;
        Ok(format!("Service {}: {}", self.config.name, status))
    }

    pub fn remove(&self) -> Result<String, ServiceError> {
        self.nssm(vec![
            "remove".to_string(),
            self.config.name.clone(),
            "confirm".to_string(),
        ])?;
        Ok(format!("Service {} removed", self.config.name))
    }

    pub fn run(&self, action: ServiceAction) -> Result<String, ServiceError> {
        match action {
            ServiceAction::Install => self.install(),
            ServiceAction::Start => self.start(),
            ServiceAction::Stop => self.stop(),
            ServiceAction::Restart => self.restart(),
            ServiceAction::Status => self.status(),
            ServiceAction::Remove => self.remove(),
        }
    }
}
