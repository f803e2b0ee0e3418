//! Module description text.
//!
//! Descriptions come from a primary provider (a JSON file) when it is usable,
//! otherwise from the built-in texts. Question data is never touched here.

use std::collections::HashMap;
use std::fs::File;
use std::io::BufReader;
use std::path::PathBuf;

use log::{debug, warn};

use crate::quiz::error::ContentError;

/// Module name -> description text.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ModuleContent {
    descriptions: HashMap<String, String>,
}

impl ModuleContent {
    pub fn description(&self, module: &str) -> Option<&str> {
        self.descriptions.get(module).map(String::as_str)
    }

    pub fn insert(&mut self, module: impl Into<String>, description: impl Into<String>) {
        self.descriptions.insert(module.into(), description.into());
    }
}

impl<M: Into<String>, D: Into<String>> FromIterator<(M, D)> for ModuleContent {
    fn from_iter<T: IntoIterator<Item = (M, D)>>(iter: T) -> Self {
        let mut content = Self::default();
        for (module, description) in iter {
            content.insert(module, description);
        }
        content
    }
}

pub trait ContentProvider {
    fn load(&self) -> Result<ModuleContent, ContentError>;
}

pub const BUILTIN_DESCRIPTIONS: [(&str, &str); 4] = [
    (
        "What is a Virus?",
        "A virus is a type of malicious software that can replicate and spread to other files.",
    ),
    (
        "How Viruses Spread",
        "Viruses spread through downloads, email attachments, infected USB drives, and unsafe websites.",
    ),
    (
        "Using Antivirus Software",
        "Install trusted antivirus, keep definitions updated, run scans regularly, and respond to alerts.",
    ),
    (
        "Maintenance & Updates",
        "Keep your OS and software updated; enable firewall; perform regular backups.",
    ),
];

pub struct BuiltinContent;

impl ContentProvider for BuiltinContent {
    fn load(&self) -> Result<ModuleContent, ContentError> {
        Ok(BUILTIN_DESCRIPTIONS.iter().copied().collect())
    }
}

#[derive(Debug, serde::Deserialize)]
struct JsonContent {
    modules: Vec<JsonModule>,
}

#[derive(Debug, serde::Deserialize)]
struct JsonModule {
    name: String,
    description: String,
}

/// Reads `{"modules": [{"name": ..., "description": ...}]}`.
pub struct JsonFileProvider {
    path: PathBuf,
}

impl JsonFileProvider {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl ContentProvider for JsonFileProvider {
    fn load(&self) -> Result<ModuleContent, ContentError> {
        if !self.path.exists() {
            return Err(ContentError::Missing(self.path.display().to_string()));
        }
        let file = File::open(&self.path)?;
        let data: JsonContent = serde_json::from_reader(BufReader::new(file))?;
        if data.modules.is_empty() {
            return Err(ContentError::Missing(format!(
                "{} lists no modules",
                self.path.display()
            )));
        }
        Ok(data
            .modules
            .into_iter()
            .map(|m| (m.name, m.description))
            .collect())
    }
}

/// Tries `primary`, and on any failure uses `fallback` instead. Descriptions
/// missing from the primary content are filled in from the fallback.
pub fn load_with_fallback(
    primary: &dyn ContentProvider,
    fallback: &dyn ContentProvider,
) -> ModuleContent {
    let base = fallback.load().unwrap_or_else(|e| {
        warn!("Built-in content unavailable: {}", e);
        ModuleContent::default()
    });

    match primary.load() {
        Ok(primary) => {
            debug!("Loaded module content from primary provider");
            let mut merged = base;
            merged.descriptions.extend(primary.descriptions);
            merged
        }
        Err(e) => {
            warn!("Content provider failed ({}), using built-in content", e);
            base
        }
    }
}
