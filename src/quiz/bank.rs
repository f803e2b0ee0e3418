use log::debug;

use crate::quiz::content::{load_with_fallback, BuiltinContent, ContentProvider, ModuleContent};
use crate::quiz::{Question, QuizError};

#[derive(Debug, Clone)]
pub struct Module {
    pub name: String,
    pub description: String,
    pub questions: Vec<Question>,
}

/// Read-only catalog of questions grouped by module. Module order is the
/// order modules were first listed and never changes afterwards.
#[derive(Debug, Clone, Default)]
pub struct QuestionBank {
    modules: Vec<Module>,
}

impl QuestionBank {
    /// Builds a bank from an ordered module list. Every question must name
    /// one of `modules`.
    pub fn new(modules: Vec<String>, questions: Vec<Question>) -> Result<Self, QuizError> {
        let mut bank = Self {
            modules: Vec::with_capacity(modules.len()),
        };
        for name in modules {
            if bank.module(&name).is_none() {
                bank.modules.push(Module {
                    name,
                    description: String::new(),
                    questions: Vec::new(),
                });
            }
        }

        for question in questions {
            question.validate()?;
            let module = bank
                .modules
                .iter_mut()
                .find(|m| m.name == question.module)
                .ok_or_else(|| QuizError::InvalidQuestion {
                    prompt: question.prompt.clone(),
                    reason: format!("unknown module \"{}\"", question.module),
                })?;
            module.questions.push(question);
        }
        Ok(bank)
    }

    /// The built-in catalog with the built-in module descriptions.
    pub fn builtin() -> Self {
        let mut bank = Self {
            modules: BUILTIN_QUESTIONS
                .iter()
                .map(|(module, questions)| Module {
                    name: module.to_string(),
                    description: String::new(),
                    questions: questions.iter().map(|q| q.to_question(module)).collect(),
                })
                .collect(),
        };
        if let Ok(content) = BuiltinContent.load() {
            bank.apply_content(&content);
        }
        bank
    }

    /// The built-in catalog, decorated with descriptions from `provider`
    /// when it works. The questions are the same either way.
    pub fn with_content(provider: &dyn ContentProvider) -> Self {
        let mut bank = Self::builtin();
        let content = load_with_fallback(provider, &BuiltinContent);
        bank.apply_content(&content);
        debug!(
            "Question bank ready: {} modules, {} questions",
            bank.modules.len(),
            bank.total_questions()
        );
        bank
    }

    fn apply_content(&mut self, content: &ModuleContent) {
        for module in &mut self.modules {
            if let Some(description) = content.description(&module.name) {
                module.description = description.to_string();
            }
        }
    }

    pub fn all_modules(&self) -> impl Iterator<Item = &str> + '_ {
        self.modules.iter().map(|m| m.name.as_str())
    }

    pub fn modules(&self) -> &[Module] {
        &self.modules
    }

    pub fn module(&self, name: &str) -> Option<&Module> {
        self.modules.iter().find(|m| m.name == name)
    }

    /// Questions of `module`; empty for an unknown module.
    pub fn questions_for(&self, module: &str) -> &[Question] {
        self.module(module)
            .map(|m| m.questions.as_slice())
            .unwrap_or(&[])
    }

    pub fn description(&self, module: &str) -> Option<&str> {
        self.module(module).map(|m| m.description.as_str())
    }

    pub fn total_questions(&self) -> usize {
        self.modules.iter().map(|m| m.questions.len()).sum()
    }
}

struct CatalogEntry {
    prompt: &'static str,
    options: [&'static str; 3],
    correct: usize,
    explanation: &'static str,
}

impl CatalogEntry {
    fn to_question(&self, module: &str) -> Question {
        Question {
            module: module.to_string(),
            prompt: self.prompt.to_string(),
            options: self.options.iter().map(|o| o.to_string()).collect(),
            correct_index: self.correct,
            explanation: self.explanation.to_string(),
        }
    }
}

macro_rules! entry {
    ($prompt:expr, [$($option:expr),+ $(,)?], $correct:expr, $explanation:expr $(,)?) => {
        CatalogEntry {
            prompt: $prompt,
            options: [$($option),+],
            correct: $correct,
            explanation: $explanation,
        }
    };
}

const BUILTIN_QUESTIONS: [(&str, [CatalogEntry; 5]); 4] = [
    (
        "What is a Virus?",
        [
            entry!(
                "What is the defining capability of a computer virus?",
                ["It provides useful features", "It replicates and spreads", "It speeds up the system"],
                1,
                "A virus can replicate itself and spread to other files or systems.",
            ),
            entry!(
                "Which term best describes software that disguises itself as legitimate?",
                ["Adware", "Trojan", "Firewall"],
                1,
                "A Trojan disguises itself as legitimate software to trick users into running it.",
            ),
            entry!(
                "Which of these is NOT a typical symptom of virus infection?",
                ["Unexpected crashes", "Slower performance", "Improved battery life"],
                2,
                "Improved battery life is not a symptom of malware; the others commonly occur.",
            ),
            entry!(
                "What does 'payload' refer to in malware context?",
                ["Update mechanism", "Harmful action carried out", "User interface"],
                1,
                "The payload is the harmful action the malware performs (e.g., data theft).",
            ),
            entry!(
                "Which practice helps prevent virus infections?",
                ["Running unknown executables", "Keeping software updated", "Disabling antivirus"],
                1,
                "Keeping software updated helps close vulnerabilities that viruses exploit.",
            ),
        ],
    ),
    (
        "How Viruses Spread",
        [
            entry!(
                "Which is a common vector for viruses to spread?",
                ["Email attachments", "Clear desktop wallpaper", "Regular backups"],
                0,
                "Email attachments are a common vector for malware delivery.",
            ),
            entry!(
                "Public Wi-Fi can be risky because attackers may:",
                ["Encrypt your files automatically", "Intercept unencrypted traffic", "Improve connection speed"],
                1,
                "Attackers on the same network can intercept unencrypted traffic and exploit vulnerabilities.",
            ),
            entry!(
                "Removable drives (USB sticks) can spread infections when:",
                ["They are scanned by antivirus", "They carry autorun-infected files", "They are formatted regularly"],
                1,
                "Autorun or infected files on removable media can spread malware between machines.",
            ),
            entry!(
                "Social engineering attacks rely mainly on:",
                ["Technical exploits", "Tricking users", "Hardware failure"],
                1,
                "Social engineering tricks users into performing unsafe actions like opening attachments.",
            ),
            entry!(
                "Downloading software from untrusted sites increases risk because:",
                ["Files may be tampered with", "Downloads are always faster", "It reduces disk usage"],
                0,
                "Untrusted sites may provide tampered or bundled malware with installers.",
            ),
        ],
    ),
    (
        "Using Antivirus Software",
        [
            entry!(
                "What should you do if your antivirus warns about a program?",
                ["Ignore the warning", "Quarantine or delete the file", "Share it with colleagues"],
                1,
                "Quarantine or delete suspected malicious files and investigate further.",
            ),
            entry!(
                "Real-time protection in antivirus software means:",
                ["It scans only on boot", "It scans files as they are accessed", "It never scans"],
                1,
                "Real-time protection scans files and actions as they occur to block threats immediately.",
            ),
            entry!(
                "Why keep antivirus definitions up to date?",
                ["To detect new threats", "To reduce internet use", "To improve screen resolution"],
                0,
                "Updated definitions help the antivirus recognize and block the latest threats.",
            ),
            entry!(
                "Running a full system scan is useful when:",
                ["You suspect infection", "You want to uninstall software", "You want to defragment disk"],
                0,
                "A full scan helps find infections that real-time scanning may have missed.",
            ),
            entry!(
                "A good antivirus vendor practice is to:",
                ["Ignore reports", "Provide regular updates and support", "Release no updates"],
                1,
                "Trusted vendors provide frequent updates and support to address new threats.",
            ),
        ],
    ),
    (
        "Maintenance & Updates",
        [
            entry!(
                "Why install OS updates promptly?",
                ["They add unnecessary features", "They patch security vulnerabilities", "They slow the system down"],
                1,
                "OS updates often patch security flaws that attackers could exploit.",
            ),
            entry!(
                "Regular backups help because they:",
                ["Allow recovery after an incident", "Encrypt all files automatically", "Prevent viruses entirely"],
                0,
                "Backups let you restore data after malware or hardware failure.",
            ),
            entry!(
                "Using least-privilege accounts means:",
                ["Users run with only required permissions", "Everyone has admin rights", "No user can log in"],
                0,
                "Least privilege reduces the potential impact of compromised accounts.",
            ),
            entry!(
                "Why enable a firewall?",
                ["To block unauthorized network access", "To speed up downloads", "To display ads"],
                0,
                "Firewalls help block unauthorized inbound and outbound connections.",
            ),
            entry!(
                "What is an important habit for maintenance?",
                ["Ignore update prompts", "Review logs and update regularly", "Share passwords"],
                1,
                "Regularly reviewing logs and applying updates helps maintain security.",
            ),
        ],
    ),
];

#[cfg(test)]
mod tests {
    use super::*;
    use crate::quiz::content::{JsonFileProvider, BUILTIN_DESCRIPTIONS};
    use crate::quiz::error::ContentError;

    struct BrokenProvider;

    impl ContentProvider for BrokenProvider {
        fn load(&self) -> Result<ModuleContent, ContentError> {
            Err(ContentError::Missing("offline".to_string()))
        }
    }

    struct RenamingProvider;

    impl ContentProvider for RenamingProvider {
        fn load(&self) -> Result<ModuleContent, ContentError> {
            Ok([
                ("What is a Virus?", "Loaded elsewhere."),
                ("Not a catalog module", "Ignored."),
            ]
            .into_iter()
            .collect())
        }
    }

    #[test]
    fn builtin_catalog_has_four_modules_of_five() {
        let bank = QuestionBank::builtin();
        let modules: Vec<&str> = bank.all_modules().collect();
        assert_eq!(
            modules,
            vec![
                "What is a Virus?",
                "How Viruses Spread",
                "Using Antivirus Software",
                "Maintenance & Updates",
            ]
        );
        for module in &modules {
            assert_eq!(bank.questions_for(module).len(), 5);
        }
        assert_eq!(bank.total_questions(), 20);
    }

    #[test]
    fn builtin_questions_are_valid() {
        let bank = QuestionBank::builtin();
        for module in bank.modules() {
            for question in &module.questions {
                question.validate().unwrap();
                assert_eq!(question.module, module.name);
            }
        }
    }

    #[test]
    fn builtin_descriptions_are_attached() {
        let bank = QuestionBank::builtin();
        for (module, description) in BUILTIN_DESCRIPTIONS {
            assert_eq!(bank.description(module), Some(description));
        }
    }

    #[test]
    fn unknown_module_has_no_questions() {
        let bank = QuestionBank::builtin();
        assert!(bank.questions_for("Cooking").is_empty());
        assert_eq!(bank.description("Cooking"), None);
    }

    #[test]
    fn failing_provider_keeps_catalog_and_builtin_text() {
        let bank = QuestionBank::with_content(&BrokenProvider);
        let builtin = QuestionBank::builtin();

        assert_eq!(bank.total_questions(), 20);
        for module in builtin.modules() {
            assert_eq!(bank.questions_for(&module.name), module.questions.as_slice());
            assert_eq!(bank.description(&module.name), Some(module.description.as_str()));
        }
    }

    #[test]
    fn provider_only_changes_descriptions() {
        let bank = QuestionBank::with_content(&RenamingProvider);

        assert_eq!(bank.description("What is a Virus?"), Some("Loaded elsewhere."));
        assert!(bank.module("Not a catalog module").is_none());
        assert_eq!(bank.all_modules().count(), 4);
        assert_eq!(bank.total_questions(), 20);
    }

    #[test]
    fn missing_content_file_is_silent() {
        let bank = QuestionBank::with_content(&JsonFileProvider::new("/no/such/content.json"));
        assert_eq!(bank.total_questions(), 20);
    }

    #[test]
    fn new_rejects_questions_from_unknown_modules() {
        let question = Question::new(
            "B",
            "Which?",
            vec!["x".to_string(), "y".to_string()],
            0,
            "",
        )
        .unwrap();
        let err = QuestionBank::new(vec!["A".to_string()], vec![question]).unwrap_err();
        assert!(matches!(err, QuizError::InvalidQuestion { .. }));
    }

    #[test]
    fn new_keeps_module_order_and_allows_empty_modules() {
        let question = Question::new(
            "B",
            "Which?",
            vec!["x".to_string(), "y".to_string()],
            1,
            "",
        )
        .unwrap();
        let bank = QuestionBank::new(
            vec!["B".to_string(), "A".to_string(), "B".to_string()],
            vec![question],
        )
        .unwrap();

        assert_eq!(bank.all_modules().collect::<Vec<_>>(), vec!["B", "A"]);
        assert_eq!(bank.questions_for("B").len(), 1);
        assert!(bank.questions_for("A").is_empty());
        assert_eq!(bank.total_questions(), 1);
    }
}
