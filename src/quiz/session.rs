use std::collections::BTreeMap;

use log::debug;

use crate::quiz::{QuizError, QuizPlan, ShuffledQuestion};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    InProgress,
    Completed,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Feedback {
    Correct,
    Incorrect { correct_text: String },
}

/// Progress through one quiz attempt.
///
/// A question is scored by the first answer submitted for it; later
/// submissions only replace the stored answer. `score` therefore equals the
/// number of questions whose first submitted answer was correct.
#[derive(Debug, Clone)]
pub struct QuizSession {
    plan: QuizPlan,
    current_index: usize,
    furthest_index: usize,
    answers: BTreeMap<usize, usize>,
    /// Question index -> first submitted option.
    submitted: BTreeMap<usize, usize>,
    score: usize,
    state: SessionState,
    just_submitted: bool,
}

impl QuizSession {
    /// Fails with `EmptyPlan` when there is nothing to ask.
    pub fn new(plan: QuizPlan) -> Result<Self, QuizError> {
        if plan.is_empty() {
            return Err(QuizError::EmptyPlan);
        }
        Ok(Self {
            plan,
            current_index: 0,
            furthest_index: 0,
            answers: BTreeMap::new(),
            submitted: BTreeMap::new(),
            score: 0,
            state: SessionState::InProgress,
            just_submitted: false,
        })
    }

    pub fn plan(&self) -> &QuizPlan {
        &self.plan
    }

    pub fn current_index(&self) -> usize {
        self.current_index
    }

    /// Highest question index reached through `go_to_next`; `go_to_index`
    /// accepts anything up to it.
    pub fn furthest_index(&self) -> usize {
        self.furthest_index
    }

    pub fn score(&self) -> usize {
        self.score
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn is_completed(&self) -> bool {
        self.state == SessionState::Completed
    }

    pub fn just_submitted(&self) -> bool {
        self.just_submitted
    }

    pub fn answers(&self) -> &BTreeMap<usize, usize> {
        &self.answers
    }

    pub fn answer(&self, index: usize) -> Option<usize> {
        self.answers.get(&index).copied()
    }

    pub fn is_submitted(&self, index: usize) -> bool {
        self.submitted.contains_key(&index)
    }

    pub fn current_question(&self) -> Result<&ShuffledQuestion, QuizError> {
        self.plan.get(self.current_index).ok_or(QuizError::OutOfRange {
            index: self.current_index,
            len: self.plan.len(),
        })
    }

    pub fn submit_answer(&mut self, selected: usize) -> Result<Feedback, QuizError> {
        if self.is_completed() {
            return Err(QuizError::SessionCompleted);
        }
        let question = self.current_question()?;
        if selected >= question.options.len() {
            return Err(QuizError::OutOfRange {
                index: selected,
                len: question.options.len(),
            });
        }

        let feedback = if question.is_correct(selected) {
            Feedback::Correct
        } else {
            Feedback::Incorrect {
                correct_text: question.correct_text().to_string(),
            }
        };

        let index = self.current_index;
        self.answers.insert(index, selected);
        if !self.submitted.contains_key(&index) {
            self.submitted.insert(index, selected);
            if feedback == Feedback::Correct {
                self.score += 1;
            }
        }
        self.just_submitted = true;

        debug!(
            "Question {} answered with option {} (score: {})",
            index, selected, self.score
        );
        Ok(feedback)
    }

    pub fn go_to_previous(&mut self) {
        self.current_index = self.current_index.saturating_sub(1);
        self.just_submitted = false;
    }

    /// Moves forward, or completes the session when already on the last question.
    pub fn go_to_next(&mut self) {
        self.just_submitted = false;
        if self.current_index + 1 < self.plan.len() {
            self.current_index += 1;
            self.furthest_index = self.furthest_index.max(self.current_index);
        } else {
            self.state = SessionState::Completed;
        }
    }

    /// Returns to an already visited question and yields its stored answer.
    pub fn go_to_index(&mut self, index: usize) -> Result<Option<usize>, QuizError> {
        if index >= self.plan.len() || index > self.furthest_index {
            return Err(QuizError::OutOfRange {
                index,
                len: self.furthest_index + 1,
            });
        }
        self.current_index = index;
        self.just_submitted = false;
        Ok(self.answer(index))
    }
}
