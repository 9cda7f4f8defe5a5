//! Language profiles: how each supported language is handled.

use std::{collections::HashMap, time::Duration};

pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExecutionMode {
    /// Run through an external interpreter.
    Interpreted,
    /// Returned as-is for direct rendering.
    Markup,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LanguageProfile {
    pub name: String,
    pub extension: String,
    pub mode: ExecutionMode,
    /// Interpreter binary; `None` for markup.
    pub command: Option<String>,
    pub timeout: Duration,
}

impl LanguageProfile {
    pub fn interpreted(name: &str, extension: &str, command: &str) -> Self {
        Self {
            name: name.to_string(),
            extension: extension.to_string(),
            mode: ExecutionMode::Interpreted,
            command: Some(command.to_string()),
            timeout: DEFAULT_TIMEOUT,
        }
    }

    pub fn markup(name: &str, extension: &str) -> Self {
        Self {
            name: name.to_string(),
            extension: extension.to_string(),
            mode: ExecutionMode::Markup,
            command: None,
            timeout: DEFAULT_TIMEOUT,
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn is_markup(&self) -> bool {
        self.mode == ExecutionMode::Markup
    }
}

/// Immutable name -> profile table. Lookups are case-sensitive.
#[derive(Debug, Clone)]
pub struct ProfileTable {
    profiles: HashMap<String, LanguageProfile>,
}

impl Default for ProfileTable {
    fn default() -> Self {
        Self::from_profiles([
            LanguageProfile::interpreted("Python", ".py", "python3"),
            LanguageProfile::interpreted("JavaScript", ".js", "node"),
            LanguageProfile::interpreted("Ruby", ".rb", "ruby"),
            LanguageProfile::interpreted("PHP", ".php", "php"),
            LanguageProfile::markup("HTML", ".html"),
            LanguageProfile::markup("CSS", ".css"),
        ])
    }
}

impl ProfileTable {
    pub fn from_profiles(profiles: impl IntoIterator<Item = LanguageProfile>) -> Self {
        let profiles = profiles
            .into_iter()
            .map(|p| (p.name.clone(), p))
            .collect();
        Self { profiles }
    }

    /// Default table with every profile bounded by `timeout`.
    pub fn with_timeout(timeout: Duration) -> Self {
        Self::from_profiles(
            Self::default()
                .profiles
                .into_values()
                .map(|p| p.with_timeout(timeout)),
        )
    }

    pub fn get(&self, language: &str) -> Option<&LanguageProfile> {
        self.profiles.get(language)
    }

    /// Language names, sorted.
    pub fn languages(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.profiles.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }
}
