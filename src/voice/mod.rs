//! Voice input: runs an external speech-to-text command and reads the
//! transcript from its stdout.

use std::{
    process::{ExitStatus, Stdio},
    time::Duration,
};

use thiserror::Error;
use tokio::time::timeout;
use tracing::{debug, warn};

use crate::{config::Config, utils::shell_command};

pub const DEFAULT_VOICE_TIMEOUT: Duration = Duration::from_secs(15);

const WAKE_PHRASES: &[&str] = &["hey assistant", "ok assistant", "okay assistant"];

#[derive(Debug, Error)]
pub enum VoiceError {
    #[error("Voice input is not configured. Set VOICE_COMMAND to a speech-to-text command")]
    NotConfigured,
    #[error("Error accessing microphone: {0}")]
    Device(#[source] std::io::Error),
    #[error("Listening timed out after {} seconds", .0.as_secs())]
    Timeout(Duration),
    #[error("Sorry, there was an error with the speech recognition service: {0}")]
    Service(String),
    #[error("Sorry, I couldn't understand the audio")]
    Unintelligible,
}

#[derive(Debug, Clone)]
pub struct AudioHandler {
    command: Option<String>,
    timeout: Duration,
}

impl AudioHandler {
    pub fn new(command: Option<String>, timeout: Duration) -> Self {
        Self { command, timeout }
    }

    pub fn from_config(cfg: &Config) -> Self {
        Self::new(
            cfg.voice_command(),
            cfg.get_secs("VOICE_TIMEOUT").unwrap_or(DEFAULT_VOICE_TIMEOUT),
        )
    }

    /// Capture one spoken question.
    pub async fn listen(&self) -> Result<String, VoiceError> {
        let command = self.command.as_deref().ok_or(VoiceError::NotConfigured)?;
        debug!(%command, "listening");

        let child = shell_command(command)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn()
            .map_err(VoiceError::Device)?;

        let output = match timeout(self.timeout, child.wait_with_output()).await {
            Ok(res) => res.map_err(VoiceError::Device)?,
            // dropping the future kills the child
            Err(_) => return Err(VoiceError::Timeout(self.timeout)),
        };

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr).trim().to_string();
            warn!(status = %output.status, %stderr, "speech recognition failed");
            if shell_could_not_start(output.status, &stderr) {
                return Err(VoiceError::Device(std::io::Error::new(
                    std::io::ErrorKind::NotFound,
                    stderr,
                )));
            }
            return Err(VoiceError::Service(if stderr.is_empty() {
                output.status.to_string()
            } else {
                stderr
            }));
        }

        let transcript = normalize_transcript(&String::from_utf8_lossy(&output.stdout));
        if transcript.is_empty() {
            return Err(VoiceError::Unintelligible);
        }
        Ok(transcript)
    }
}

/// The platform shell ran but the speech-to-text program itself could not be
/// started: 127 (not found) / 126 (not executable) on unix, "not recognized" on Windows.
fn shell_could_not_start(status: ExitStatus, stderr: &str) -> bool {
    if cfg!(windows) {
        stderr.contains("is not recognized")
    } else {
        matches!(status.code(), Some(126) | Some(127))
    }
}

/// Collapse whitespace and drop a leading wake phrase.
pub fn normalize_transcript(text: &str) -> String {
    let collapsed = text.split_whitespace().collect::<Vec<_>>().join(" ");
    let lower = collapsed.to_ascii_lowercase();
    for phrase in WAKE_PHRASES {
        if lower.starts_with(phrase) {
            let rest = &collapsed[phrase.len()..];
            // only a full word match counts
            if rest.is_empty() || rest.starts_with([' ', ',']) {
                return rest.trim_start_matches([' ', ',']).to_string();
            }
        }
    }
    collapsed
}
