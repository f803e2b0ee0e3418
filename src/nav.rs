//! Dialogue state and the mapping from chat text to tutor actions.

use crate::quiz::bank::QuestionBank;
use crate::quiz::session::QuizSession;

pub const LEARNING_MODULES: &str = "📚 Learning Modules";
pub const QUICK_QUIZ: &str = "❓ Quick Quiz";
pub const EXIT: &str = "🚪 Exit";

pub const PREVIOUS_MODULE: &str = "⬅️ Previous Module";
pub const NEXT_MODULE: &str = "Next Module ➡️";
pub const BACK_TO_HOME: &str = "🏠 Back to Home";
pub const BACK_TO_LEARNING: &str = "📚 Back to Learning";
pub const TAKE_QUIZ: &str = "❓ Take Quiz";

pub const START_QUIZ: &str = "Start Quiz";
pub const PREVIOUS: &str = "⬅️ Previous";
pub const NEXT: &str = "Next ➡️";
pub const RETAKE_QUIZ: &str = "Retake Quiz";

/// One chat's position in the tutor. `module` is the last learning module
/// the chat looked at; it is carried through every page so "Learning
/// Modules" reopens it.
#[derive(Clone, Default)]
pub enum State {
    #[default]
    Start,
    Home {
        module: usize,
    },
    Learning {
        selected: usize,
    },
    QuizStart {
        module: usize,
    },
    Quiz {
        module: usize,
        session: QuizSession,
    },
    Results {
        module: usize,
        session: QuizSession,
    },
}

impl State {
    pub fn module(&self) -> usize {
        match self {
            State::Start => 0,
            State::Learning { selected } => *selected,
            State::Home { module }
            | State::QuizStart { module }
            | State::Quiz { module, .. }
            | State::Results { module, .. } => *module,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LearningInput {
    Select(usize),
    Home,
    TakeQuiz,
    Unknown,
}

pub fn parse_learning_input(bank: &QuestionBank, selected: usize, text: &str) -> LearningInput {
    let last = bank.modules().len().saturating_sub(1);
    match text {
        PREVIOUS_MODULE => LearningInput::Select(selected.saturating_sub(1)),
        NEXT_MODULE => LearningInput::Select((selected + 1).min(last)),
        BACK_TO_HOME => LearningInput::Home,
        TAKE_QUIZ => LearningInput::TakeQuiz,
        name => match bank.all_modules().position(|m| m == name) {
            Some(i) => LearningInput::Select(i),
            None => LearningInput::Unknown,
        },
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QuizInput {
    Answer(usize),
    Previous,
    Next,
    /// Zero-based question index.
    Jump(usize),
    Home,
    Exit,
    Unknown,
}

/// Option texts of the current question win over navigation labels.
pub fn parse_quiz_input(session: &QuizSession, text: &str) -> QuizInput {
    if let Ok(question) = session.current_question() {
        if let Some(i) = question.options.iter().position(|o| o == text) {
            return QuizInput::Answer(i);
        }
    }

    match text {
        PREVIOUS => QuizInput::Previous,
        NEXT => QuizInput::Next,
        BACK_TO_HOME => QuizInput::Home,
        EXIT => QuizInput::Exit,
        jump if jump.starts_with('#') => jump[1..]
            .trim()
            .parse::<usize>()
            .ok()
            .and_then(|n| n.checked_sub(1))
            .map(QuizInput::Jump)
            .unwrap_or(QuizInput::Unknown),
        _ => QuizInput::Unknown,
    }
}
