//! Execution dispatcher: run a code snippet through its interpreter, or hand
//! markup back for rendering.

use std::{
    io::{self, Write},
    path::{Path, PathBuf},
    process::{ExitStatus, Stdio},
    time::Duration,
};

use tempfile::NamedTempFile;
use thiserror::Error;
use tokio::{io::AsyncReadExt, process::Command, time::timeout};
use tracing::{debug, warn};

pub mod profile;

pub use profile::{ExecutionMode, LanguageProfile, ProfileTable, DEFAULT_TIMEOUT};

pub const NO_OUTPUT_MESSAGE: &str = "Code executed successfully (no output)";

#[derive(Debug, Error)]
pub enum ExecError {
    #[error("Language {0} is not supported")]
    UnsupportedLanguage(String),
    #[error("{command} not found. Please install {language} ({command}) to run this code")]
    RuntimeMissing { language: String, command: String },
    #[error("Execution timed out after {} seconds", .0.as_secs())]
    Timeout(Duration),
    #[error("Error: {0}")]
    NonZeroExit(String),
    #[error("Execution error: {0}")]
    SetupOrIo(#[from] io::Error),
}

/// Uniform result of one call: captured stdout on success, a readable error otherwise.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExecutionOutcome {
    pub success: bool,
    pub message: String,
}

impl ExecutionOutcome {
    fn ok(message: impl Into<String>) -> Self {
        Self { success: true, message: message.into() }
    }

    fn failed(err: &ExecError) -> Self {
        Self { success: false, message: err.to_string() }
    }
}

#[derive(Debug, Clone, Default)]
pub struct CodeExecutor {
    profiles: ProfileTable,
    temp_dir: Option<PathBuf>,
}

impl CodeExecutor {
    pub fn new(profiles: ProfileTable) -> Self {
        Self { profiles, temp_dir: None }
    }

    /// Place temp source files under `dir` instead of the system temp directory.
    pub fn with_temp_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.temp_dir = Some(dir.into());
        self
    }

    pub fn profile(&self, language: &str) -> Option<&LanguageProfile> {
        self.profiles.get(language)
    }

    pub fn is_markup(&self, language: &str) -> bool {
        self.profile(language).is_some_and(LanguageProfile::is_markup)
    }

    pub async fn execute(&self, source: &str, language: &str) -> ExecutionOutcome {
        match self.try_execute(source, language).await {
            Ok(message) => ExecutionOutcome::ok(message),
            Err(err) => {
                warn!(%language, error = %err, "execution failed");
                ExecutionOutcome::failed(&err)
            }
        }
    }

    async fn try_execute(&self, source: &str, language: &str) -> Result<String, ExecError> {
        let profile = self
            .profile(language)
            .ok_or_else(|| ExecError::UnsupportedLanguage(language.to_string()))?;
        let command = match (&profile.mode, &profile.command) {
            (ExecutionMode::Markup, _) => return Ok(source.to_string()),
            (ExecutionMode::Interpreted, Some(cmd)) => cmd.as_str(),
            (ExecutionMode::Interpreted, None) => {
                return Err(ExecError::SetupOrIo(io::Error::new(
                    io::ErrorKind::InvalidInput,
                    format!("no interpreter configured for {}", profile.name),
                )))
            }
        };

        let file = self.write_source(profile, source)?;
        debug!(path = %file.path().display(), %command, "running snippet");
        let run = run_interpreter(profile, command, file.path()).await;
        // NamedTempFile would also unlink on drop; closing here surfaces removal errors.
        let closed = file.close();
        let stdout = run?;
        closed?;
        Ok(stdout)
    }

    fn write_source(&self, profile: &LanguageProfile, source: &str) -> io::Result<NamedTempFile> {
        let mut builder = tempfile::Builder::new();
        builder.prefix("codeassist-").suffix(&profile.extension);
        let mut file = match &self.temp_dir {
            Some(dir) => builder.tempfile_in(dir)?,
            None => builder.tempfile()?,
        };
        file.write_all(source.as_bytes())?;
        file.flush()?;
        Ok(file)
    }
}

async fn run_interpreter(
    profile: &LanguageProfile,
    command: &str,
    path: &Path,
) -> Result<String, ExecError> {
    let mut cmd = Command::new(command);
    cmd.arg(path)
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .kill_on_drop(true);
    // own process group, so a timeout can take down anything the snippet spawned
    #[cfg(unix)]
    cmd.process_group(0);
    let mut child = cmd
        .spawn()
        .map_err(|e| match e.kind() {
            io::ErrorKind::NotFound => ExecError::RuntimeMissing {
                language: profile.name.clone(),
                command: command.to_string(),
            },
            _ => ExecError::SetupOrIo(e),
        })?;

    let mut stdout = child
        .stdout
        .take()
        .ok_or_else(|| io::Error::other("no stdout"))?;
    let mut stderr = child
        .stderr
        .take()
        .ok_or_else(|| io::Error::other("no stderr"))?;
    let (mut out, mut err) = (Vec::new(), Vec::new());

    let waited = timeout(profile.timeout, async {
        let (read_out, read_err, status) = tokio::join!(
            stdout.read_to_end(&mut out),
            stderr.read_to_end(&mut err),
            child.wait(),
        );
        read_out.and(read_err).and(status)
    })
    .await;

    let status: ExitStatus = match waited {
        Ok(status) => status?,
        Err(_) => {
            kill_process_group(&child);
            if let Err(e) = child.kill().await {
                warn!(error = %e, "failed to kill timed out interpreter");
            }
            return Err(ExecError::Timeout(profile.timeout));
        }
    };
    debug!(%status, "interpreter exited");

    if status.success() {
        let stdout = String::from_utf8_lossy(&out).trim().to_string();
        if stdout.is_empty() {
            Ok(NO_OUTPUT_MESSAGE.to_string())
        } else {
            Ok(stdout)
        }
    } else {
        let stderr = String::from_utf8_lossy(&err).trim().to_string();
        if stderr.is_empty() {
            Err(ExecError::NonZeroExit(format!("process exited with {}", status)))
        } else {
            Err(ExecError::NonZeroExit(stderr))
        }
    }
}

#[cfg(unix)]
fn kill_process_group(child: &tokio::process::Child) {
    use nix::{
        sys::signal::{killpg, Signal},
        unistd::Pid,
    };

    if let Some(pid) = child.id() {
        if let Err(e) = killpg(Pid::from_raw(pid as i32), Signal::SIGKILL) {
            warn!(pid, error = %e, "failed to kill interpreter process group");
        }
    }
}

#[cfg(not(unix))]
fn kill_process_group(_child: &tokio::process::Child) {}

/// Turn markup into a string meant for direct display. CSS gets a style
/// wrapper; everything else passes through.
pub fn render(source: &str, language: &str) -> String {
    match language {
        "CSS" => format!("<style>\n{}\n</style>", source),
        _ => source.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn unsupported_language_fails_without_touching_disk() {
        let dir = tempfile::tempdir().unwrap();
        let exec = CodeExecutor::default().with_temp_dir(dir.path());
        let outcome = exec.execute("print(1)", "Brainfuck").await;
        assert!(!outcome.success);
        assert_eq!(outcome.message, "Language Brainfuck is not supported");
        assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 0);
    }

    #[tokio::test]
    async fn markup_is_returned_unchanged() {
        let dir = tempfile::tempdir().unwrap();
        let exec = CodeExecutor::default().with_temp_dir(dir.path());
        let html = "<p>unclosed <b>tag";
        let outcome = exec.execute(html, "HTML").await;
        assert_eq!(outcome, ExecutionOutcome::ok(html));
        let css = "body { color: red; }";
        assert_eq!(exec.execute(css, "CSS").await.message, css);
        assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 0);
    }

    #[test]
    fn render_wraps_css_only() {
        assert_eq!(render("a{}", "CSS"), "<style>\na{}\n</style>");
        assert_eq!(render("<h1>x</h1>", "HTML"), "<h1>x</h1>");
        assert_eq!(render("print(1)", "Python"), "print(1)");
    }

    #[test]
    fn is_markup_follows_profiles() {
        let exec = CodeExecutor::default();
        assert!(exec.is_markup("HTML"));
        assert!(exec.is_markup("CSS"));
        assert!(!exec.is_markup("Python"));
        assert!(!exec.is_markup("Cobol"));
    }

    #[tokio::test]
    async fn missing_runtime_suggests_install() {
        let dir = tempfile::tempdir().unwrap();
        let table = ProfileTable::from_profiles([LanguageProfile::interpreted(
            "Nothing",
            ".nothing",
            "codeassist-no-such-interpreter",
        )]);
        let exec = CodeExecutor::new(table).with_temp_dir(dir.path());
        let outcome = exec.execute("x", "Nothing").await;
        assert!(!outcome.success);
        assert!(outcome.message.contains("not found"), "{}", outcome.message);
        assert!(outcome.message.contains("Please install Nothing"));
        assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 0);
    }

    #[test]
    fn error_messages() {
        assert_eq!(
            ExecError::Timeout(Duration::from_secs(10)).to_string(),
            "Execution timed out after 10 seconds"
        );
        assert_eq!(ExecError::NonZeroExit("boom".into()).to_string(), "Error: boom");
        let io = io::Error::new(io::ErrorKind::PermissionDenied, "denied");
        assert_eq!(ExecError::from(io).to_string(), "Execution error: denied");
    }
}
