use log::debug;

use crate::quiz::bank::QuestionBank;
use crate::quiz::random::{is_permutation, RandomSource};
use crate::quiz::shuffle::shuffle_options;
use crate::quiz::{QuizError, QuizPlan};

pub const DEFAULT_QUESTIONS_PER_MODULE: usize = 5;

/// Builds one quiz attempt: up to `questions_per_module` questions drawn
/// without replacement from every module, kept grouped in bank module order,
/// each with its options shuffled.
///
/// An empty bank yields an empty plan, not an error.
pub fn compose(
    bank: &QuestionBank,
    questions_per_module: usize,
    rng: &mut dyn RandomSource,
) -> Result<QuizPlan, QuizError> {
    let mut questions = Vec::new();

    for module in bank.all_modules() {
        let pool = bank.questions_for(module);
        let take = questions_per_module.min(pool.len());

        let order = rng.permutation(pool.len());
        if !is_permutation(&order, pool.len()) {
            return Err(QuizError::InvalidPermutation { len: pool.len() });
        }

        for &i in order.iter().take(take) {
            questions.push(shuffle_options(&pool[i], rng)?);
        }
        debug!("Selected {} of {} questions from \"{}\"", take, pool.len(), module);
    }

    Ok(QuizPlan::new(questions))
}
