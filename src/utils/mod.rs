//! Utilities (platform shell commands, stdin prompt handling).

use tokio::process::Command;

/// Build a command that runs `cmd` through the platform shell.
///
/// On Windows: PowerShell if `SHELL_NAME` asks for it or PSModulePath is set, otherwise cmd.exe.
/// On Unix-like systems: the shell from `SHELL`, or /bin/sh as fallback.
pub fn shell_command(cmd: &str) -> Command {
    if cfg!(windows) {
        let override_shell = std::env::var("SHELL_NAME").unwrap_or_default().to_ascii_lowercase();
        let prefer_ps = if override_shell.contains("powershell") {
            true
        } else if override_shell.contains("cmd") {
            false
        } else {
            !std::env::var("PSModulePath").unwrap_or_default().is_empty()
        };
        let mut c = if prefer_ps {
            let mut c = Command::new("powershell.exe");
            c.args(["-NoLogo", "-NoProfile", "-Command"]);
            c
        } else {
            let mut c = Command::new("cmd.exe");
            c.arg("/c");
            c
        };
        c.arg(cmd);
        c
    } else {
        let shell = std::env::var("SHELL").unwrap_or_else(|_| "/bin/sh".into());
        let mut c = Command::new(shell);
        c.arg("-c").arg(cmd);
        c
    }
}

/// Piped stdin may carry a trailing `__codeassist__eof__` marker; drop it and everything after.
pub fn strip_eof_marker(input: &str) -> &str {
    input
        .split_once("__codeassist__eof__")
        .map(|(before, _)| before)
        .unwrap_or(input)
}

/// Whether stdin carried any prompt text.
pub fn has_piped_prompt(from_stdin: &str) -> bool {
    !from_stdin.trim().is_empty()
}

/// Join stdin text and the positional prompt.
pub fn combine_prompt(from_stdin: &str, from_arg: &str) -> String {
    let (stdin, arg) = (from_stdin.trim(), from_arg.trim());
    match (stdin.is_empty(), arg.is_empty()) {
        (false, false) => format!("{}\n\n{}", stdin, arg),
        (false, true) => stdin.to_string(),
        _ => arg.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn eof_marker_truncates() {
        assert_eq!(strip_eof_marker("code\n__codeassist__eof__\nignored"), "code\n");
        assert_eq!(strip_eof_marker("plain"), "plain");
    }

    #[test]
    fn prompt_joining() {
        assert_eq!(combine_prompt("fn main() {}", "explain"), "fn main() {}\n\nexplain");
        assert_eq!(combine_prompt("  ", "explain"), "explain");
        assert_eq!(combine_prompt("only stdin\n", ""), "only stdin");
    }

    #[test]
    fn empty_stdin_is_not_a_prompt() {
        assert!(!has_piped_prompt(""));
        assert!(!has_piped_prompt(" \n\t"));
        assert!(!has_piped_prompt(strip_eof_marker("__codeassist__eof__ignored")));
        assert!(has_piped_prompt("sort a list"));
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn shell_command_runs_through_shell() {
        let out = shell_command("echo one && echo two").output().await.unwrap();
        assert!(out.status.success());
        assert_eq!(String::from_utf8_lossy(&out.stdout), "one\ntwo\n");
    }
}
