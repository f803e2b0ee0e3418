use crate::quiz::session::QuizSession;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModuleTally {
    pub module: String,
    pub correct: usize,
    pub total: usize,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuestionReview {
    pub module: String,
    pub prompt: String,
    pub selected: Option<String>,
    pub correct: String,
    pub explanation: String,
}

impl QuestionReview {
    pub fn is_correct(&self) -> bool {
        self.selected.as_deref() == Some(self.correct.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResultsSummary {
    pub total_score: usize,
    pub total_questions: usize,
    /// In the order modules first appear in the plan.
    pub modules: Vec<ModuleTally>,
    pub reviews: Vec<QuestionReview>,
}

impl ResultsSummary {
    pub fn module(&self, name: &str) -> Option<&ModuleTally> {
        self.modules.iter().find(|m| m.module == name)
    }

    pub fn ratio(&self) -> f64 {
        if self.total_questions == 0 {
            return 0.0;
        }
        self.total_score as f64 / self.total_questions as f64
    }
}

/// Works on finished and unfinished sessions alike. Unanswered questions
/// count towards a module's total but never towards its correct answers.
pub fn summarize(session: &QuizSession) -> ResultsSummary {
    let mut modules: Vec<ModuleTally> = Vec::new();
    let mut reviews = Vec::with_capacity(session.plan().len());

    for (i, question) in session.plan().questions().iter().enumerate() {
        let answer = session.answer(i);
        let correct = answer == Some(question.correct_index);

        let tally = match modules.iter().position(|m| m.module == question.module) {
            Some(pos) => &mut modules[pos],
            None => {
                modules.push(ModuleTally {
                    module: question.module.clone(),
                    correct: 0,
                    total: 0,
                });
                let last = modules.len() - 1;
                &mut modules[last]
            }
        };
        tally.total += 1;
        if correct {
            tally.correct += 1;
        }

        reviews.push(QuestionReview {
            module: question.module.clone(),
            prompt: question.prompt.clone(),
            selected: answer.and_then(|a| question.options.get(a)).cloned(),
            correct: question.correct_text().to_string(),
            explanation: question.explanation.clone(),
        });
    }

    ResultsSummary {
        total_score: session.score(),
        total_questions: session.plan().len(),
        modules,
        reviews,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::quiz::bank::QuestionBank;
    use crate::quiz::composer::compose;
    use crate::quiz::random::StdRandom;
    use crate::quiz::{QuizPlan, ShuffledQuestion};

    fn question(module: &str, n: usize) -> ShuffledQuestion {
        ShuffledQuestion {
            module: module.to_string(),
            prompt: format!("{} {}", module, n),
            options: vec!["yes".to_string(), "no".to_string()],
            correct_index: 0,
            explanation: if n == 0 { "Because.".to_string() } else { String::new() },
        }
    }

    fn session(modules: &[(&str, usize)]) -> QuizSession {
        let questions = modules
            .iter()
            .flat_map(|(m, count)| (0..*count).map(move |n| question(m, n)))
            .collect();
        QuizSession::new(QuizPlan::new(questions)).unwrap()
    }

    #[test]
    fn partial_module_counts_unanswered_as_incorrect() {
        let mut session = session(&[("A", 5)]);
        session.submit_answer(0).unwrap();
        session.go_to_next();
        session.submit_answer(0).unwrap();

        let summary = summarize(&session);

        let a = summary.module("A").unwrap();
        assert_eq!((a.correct, a.total), (2, 5));
        assert_eq!(summary.total_score, 2);
        assert_eq!(summary.total_questions, 5);
        assert!(summary.reviews[2].selected.is_none());
    }

    #[test]
    fn modules_keep_plan_order() {
        let session = session(&[("B", 1), ("A", 2), ("C", 1)]);
        let summary = summarize(&session);
        let order: Vec<&str> = summary.modules.iter().map(|m| m.module.as_str()).collect();
        assert_eq!(order, vec!["B", "A", "C"]);
        assert_eq!(summary.module("A").unwrap().total, 2);
        assert!(summary.module("D").is_none());
    }

    #[test]
    fn reviews_show_selected_and_correct_text() {
        let mut session = session(&[("A", 2)]);
        session.submit_answer(1).unwrap();

        let summary = summarize(&session);

        let first = &summary.reviews[0];
        assert_eq!(first.selected.as_deref(), Some("no"));
        assert_eq!(first.correct, "yes");
        assert_eq!(first.explanation, "Because.");
        assert!(!first.is_correct());
        assert_eq!(summary.reviews[1].selected, None);
    }

    #[test]
    fn summarizing_does_not_touch_the_session() {
        let mut session = session(&[("A", 3)]);
        session.submit_answer(0).unwrap();
        session.go_to_next();
        let before = (session.current_index(), session.score(), session.answers().clone());

        let _ = summarize(&session);
        let _ = summarize(&session);

        assert_eq!(
            (session.current_index(), session.score(), session.answers().clone()),
            before
        );
    }

    #[test]
    fn ratio_of_full_builtin_run() {
        let bank = QuestionBank::builtin();
        let plan = compose(&bank, 5, &mut StdRandom::seeded(11)).unwrap();
        let answers: Vec<usize> = plan.questions().iter().map(|q| q.correct_index).collect();
        let mut session = QuizSession::new(plan).unwrap();

        for (i, correct) in answers.into_iter().enumerate() {
            // Every other question answered wrong.
            let pick = if i % 2 == 0 { correct } else { (correct + 1) % 3 };
            session.submit_answer(pick).unwrap();
            session.go_to_next();
        }
        assert!(session.is_completed());

        let summary = summarize(&session);
        assert_eq!(summary.total_score, 10);
        assert_eq!(summary.total_questions, 20);
        assert!((summary.ratio() - 0.5).abs() < f64::EPSILON);
        for tally in &summary.modules {
            assert_eq!(tally.total, 5);
        }
        let correct: usize = summary.modules.iter().map(|m| m.correct).sum();
        assert_eq!(correct, 10);
    }
}
