use std::env;
use std::path::PathBuf;

use log::warn;

use crate::quiz::composer::DEFAULT_QUESTIONS_PER_MODULE;

const CONTENT_PATH_VAR: &str = "AV_TUTOR_CONTENT_PATH";
const QUESTIONS_PER_MODULE_VAR: &str = "AV_TUTOR_QUESTIONS_PER_MODULE";
const DEFAULT_CONTENT_PATH: &str = "content.json";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub content_path: PathBuf,
    pub questions_per_module: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            content_path: PathBuf::from(DEFAULT_CONTENT_PATH),
            questions_per_module: DEFAULT_QUESTIONS_PER_MODULE,
        }
    }
}

impl Config {
    /// Reads the process environment. `.env` should already be loaded.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Self::default();

        let content_path = lookup(CONTENT_PATH_VAR)
            .filter(|v| !v.trim().is_empty())
            .map(PathBuf::from)
            .unwrap_or(defaults.content_path);

        let questions_per_module = match lookup(QUESTIONS_PER_MODULE_VAR) {
            None => defaults.questions_per_module,
            Some(raw) => match raw.trim().parse::<usize>() {
                Ok(n) if n > 0 => n,
                _ => {
                    warn!(
                        "{} must be a positive number, got {:?}; using {}",
                        QUESTIONS_PER_MODULE_VAR, raw, defaults.questions_per_module
                    );
                    defaults.questions_per_module
                }
            },
        };

        Self {
            content_path,
            questions_per_module,
        }
    }
}
