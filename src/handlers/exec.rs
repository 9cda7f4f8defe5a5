//! Exec handler: run local source through the dispatcher, no model involved.

use std::io::{self, Read};

use anyhow::{Context, Result};

use crate::{config::Config, printer::print_outcome};

/// Returns whether the run succeeded.
pub async fn run(cfg: &Config, path: &str, language: &str) -> Result<bool> {
    let source = if path == "-" {
        let mut buf = String::new();
        io::stdin().read_to_string(&mut buf).context("failed to read source from stdin")?;
        buf
    } else {
        std::fs::read_to_string(path).with_context(|| format!("failed to read '{}'", path))?
    };

    let executor = super::executor_from_config(cfg);
    let outcome = executor.execute(&source, language).await;
    print_outcome(&outcome, language, executor.is_markup(language) && outcome.success);
    Ok(outcome.success)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::Path;

    fn config() -> Config {
        Config::load_from(Path::new("/nonexistent/codeassist/.codeassistrc"))
    }

    #[tokio::test]
    async fn empty_markup_file_still_succeeds() {
        let file = tempfile::Builder::new().suffix(".html").tempfile().unwrap();
        let path = file.path().to_string_lossy().into_owned();
        assert!(run(&config(), &path, "HTML").await.unwrap());
    }

    #[tokio::test]
    async fn unsupported_language_is_a_failed_run() {
        let file = tempfile::NamedTempFile::new().unwrap();
        let path = file.path().to_string_lossy().into_owned();
        assert!(!run(&config(), &path, "Rust").await.unwrap());
    }

    #[tokio::test]
    async fn unreadable_path_is_an_error() {
        let err = run(&config(), "/nonexistent/codeassist/main.py", "Python")
            .await
            .unwrap_err();
        assert!(err.to_string().contains("failed to read"));
    }
}
