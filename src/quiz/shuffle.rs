use crate::quiz::random::{is_permutation, RandomSource};
use crate::quiz::{Question, QuizError, ShuffledQuestion};

/// Reorders the options of `question` so the correct one isn't always in the
/// same place. The new correct index is found by the answer's text, so with
/// duplicate option texts it lands on the first match.
pub fn shuffle_options(
    question: &Question,
    rng: &mut dyn RandomSource,
) -> Result<ShuffledQuestion, QuizError> {
    question.validate()?;

    let len = question.options.len();
    let order = rng.permutation(len);
    if !is_permutation(&order, len) {
        return Err(QuizError::InvalidPermutation { len });
    }

    let options: Vec<String> = order
        .iter()
        .map(|&i| question.options[i].clone())
        .collect();

    let correct_text = question.correct_text();
    let correct_index = options
        .iter()
        .position(|o| o == correct_text)
        .ok_or(QuizError::InvalidPermutation { len })?;

    Ok(ShuffledQuestion {
        module: question.module.clone(),
        prompt: question.prompt.clone(),
        options,
        correct_index,
        explanation: question.explanation.clone(),
    })
}
