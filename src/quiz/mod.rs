pub mod bank;
pub mod composer;
pub mod content;
pub mod error;
pub mod random;
pub mod results;
pub mod session;
pub mod shuffle;

pub use error::QuizError;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Question {
    pub module: String,
    pub prompt: String,
    pub options: Vec<String>,
    pub correct_index: usize,
    pub explanation: String,
}

impl Question {
    pub fn new(
        module: impl Into<String>,
        prompt: impl Into<String>,
        options: Vec<String>,
        correct_index: usize,
        explanation: impl Into<String>,
    ) -> Result<Self, QuizError> {
        let question = Self {
            module: module.into(),
            prompt: prompt.into(),
            options,
            correct_index,
            explanation: explanation.into(),
        };
        question.validate()?;
        Ok(question)
    }

    pub fn validate(&self) -> Result<(), QuizError> {
        if self.options.len() < 2 {
            return Err(self.invalid(format!(
                "needs at least 2 options, got {}",
                self.options.len()
            )));
        }
        if self.correct_index >= self.options.len() {
            return Err(self.invalid(format!(
                "correct index {} does not point at one of {} options",
                self.correct_index,
                self.options.len()
            )));
        }
        Ok(())
    }

    pub fn correct_text(&self) -> &str {
        &self.options[self.correct_index]
    }

    fn invalid(&self, reason: String) -> QuizError {
        QuizError::InvalidQuestion {
            prompt: self.prompt.clone(),
            reason,
        }
    }
}

/// A question as presented in one attempt: options reordered, `correct_index`
/// remapped onto the same answer text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShuffledQuestion {
    pub module: String,
    pub prompt: String,
    pub options: Vec<String>,
    pub correct_index: usize,
    pub explanation: String,
}

impl ShuffledQuestion {
    pub fn correct_text(&self) -> &str {
        &self.options[self.correct_index]
    }

    pub fn is_correct(&self, selected: usize) -> bool {
        selected == self.correct_index
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QuizPlan {
    questions: Vec<ShuffledQuestion>,
}

impl QuizPlan {
    pub fn new(questions: Vec<ShuffledQuestion>) -> Self {
        Self { questions }
    }

    pub fn len(&self) -> usize {
        self.questions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.questions.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&ShuffledQuestion> {
        self.questions.get(index)
    }

    pub fn questions(&self) -> &[ShuffledQuestion] {
        &self.questions
    }
}
