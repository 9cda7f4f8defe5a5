use std::{
    collections::HashMap,
    env,
    fs,
    io::{BufRead, BufReader},
    path::{Path, PathBuf},
    time::Duration,
};

use directories::BaseDirs;

#[derive(Debug, Clone)]
pub struct Config {
    inner: HashMap<String, String>,
}

impl Config {
    pub fn load() -> Self {
        Self::load_from(&default_config_path())
    }

    /// Defaults, then the rc file at `path`, then environment variables.
    pub fn load_from(path: &Path) -> Self {
        let mut map = default_map();

        if path.exists() {
            if let Ok(file) = fs::File::open(path) {
                let reader = BufReader::new(file);
                for line in reader.lines().map_while(Result::ok) {
                    let line = line.trim();
                    if line.is_empty() || line.starts_with('#') {
                        continue;
                    }
                    if let Some((k, v)) = line.split_once('=') {
                        map.insert(k.trim().to_string(), v.trim().to_string());
                    }
                }
            }
        }

        // Overlay environment variables (take precedence)
        for (k, v) in env::vars() {
            if is_config_key(&k) {
                map.insert(k, v);
            }
        }

        Self { inner: map }
    }

    pub fn get(&self, key: &str) -> Option<String> {
        // ENV first
        if let Ok(v) = env::var(key) {
            return Some(v);
        }
        self.inner.get(key).cloned()
    }

    pub fn get_bool(&self, key: &str) -> bool {
        self.get(key)
            .map(|v| v.eq_ignore_ascii_case("true"))
            .unwrap_or(false)
    }

    pub fn get_u64(&self, key: &str) -> Option<u64> {
        self.get(key).and_then(|v| v.trim().parse::<u64>().ok())
    }

    pub fn get_secs(&self, key: &str) -> Option<Duration> {
        self.get_u64(key).filter(|s| *s > 0).map(Duration::from_secs)
    }

    /// Gemini key first; any OpenAI-compatible key works against a custom base URL.
    pub fn api_key(&self) -> Option<String> {
        self.get("GEMINI_API_KEY")
            .or_else(|| self.get("OPENAI_API_KEY"))
            .filter(|k| !k.trim().is_empty())
    }

    pub fn voice_command(&self) -> Option<String> {
        self.get("VOICE_COMMAND").filter(|c| !c.trim().is_empty())
    }
}

fn is_config_key(k: &str) -> bool {
    const KEYS: &[&str] = &[
        "GEMINI_API_KEY",
        "OPENAI_API_KEY",
        "API_BASE_URL",
        "DEFAULT_MODEL",
        "DEFAULT_LANGUAGE",
        "REQUEST_TIMEOUT",
        "EXECUTION_TIMEOUT",
        "PRETTIFY_MARKDOWN",
        "VOICE_COMMAND",
        "VOICE_TIMEOUT",
    ];

    KEYS.contains(&k) || k.starts_with("CODEASSIST_")
}

fn default_config_path() -> PathBuf {
    let base = BaseDirs::new()
        .map(|b| b.config_dir().to_path_buf())
        .unwrap_or_else(|| PathBuf::from("~/.config"));
    base.join("codeassist").join(".codeassistrc")
}

fn default_map() -> HashMap<String, String> {
    let mut m = HashMap::new();

    // Numbers
    m.insert("REQUEST_TIMEOUT".into(), "60".into());
    m.insert("EXECUTION_TIMEOUT".into(), "10".into());
    m.insert("VOICE_TIMEOUT".into(), "15".into());

    // Strings
    m.insert("DEFAULT_MODEL".into(), "gemini-1.5-flash".into());
    m.insert("DEFAULT_LANGUAGE".into(), "Python".into());
    m.insert("API_BASE_URL".into(), "default".into());

    // Bools as strings
    m.insert("PRETTIFY_MARKDOWN".into(), "true".into());

    m
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn rc_file_overrides_defaults() {
        let mut rc = tempfile::NamedTempFile::new().unwrap();
        writeln!(rc, "# comment\nCODEASSIST_TEST_ONLY_KEY = 42\n\nnot a pair").unwrap();
        let cfg = Config::load_from(rc.path());
        assert_eq!(cfg.get_u64("CODEASSIST_TEST_ONLY_KEY"), Some(42));
        assert_eq!(cfg.get("REQUEST_TIMEOUT").as_deref(), Some("60"));
    }

    #[test]
    fn missing_rc_file_uses_defaults() {
        let cfg = Config::load_from(Path::new("/nonexistent/codeassist/.codeassistrc"));
        assert!(cfg.get_bool("PRETTIFY_MARKDOWN"));
        assert!(cfg.get("CODEASSIST_TEST_ONLY_KEY").is_none());
    }

    #[test]
    fn zero_seconds_is_ignored() {
        let mut rc = tempfile::NamedTempFile::new().unwrap();
        writeln!(rc, "CODEASSIST_TEST_ZERO=0\nCODEASSIST_TEST_FIVE=5").unwrap();
        let cfg = Config::load_from(rc.path());
        assert_eq!(cfg.get_secs("CODEASSIST_TEST_ZERO"), None);
        assert_eq!(cfg.get_secs("CODEASSIST_TEST_FIVE"), Some(Duration::from_secs(5)));
    }
}
