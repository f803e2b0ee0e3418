//! Text shown to the user, built from engine state. Output is Telegram HTML.

use teloxide::utils::html::escape;

use crate::quiz::bank::QuestionBank;
use crate::quiz::results::ResultsSummary;
use crate::quiz::session::{Feedback, QuizSession};
use crate::quiz::QuizError;

const PROGRESS_WIDTH: usize = 10;
// Telegram rejects messages over 4096 characters.
const MESSAGE_LIMIT: usize = 3500;

pub fn home() -> String {
    "🛡️ <b>AV Tutor</b>\nLearn how to protect your computer from viruses.\n\n\
     Pick <i>Learning Modules</i> to read, or <i>Quick Quiz</i> to test yourself."
        .to_string()
}

pub fn module_page(bank: &QuestionBank, selected: usize) -> String {
    match bank.modules().get(selected) {
        Some(module) => format!(
            "📚 <b>Module {} of {}: {}</b>\n\n{}",
            selected + 1,
            bank.modules().len(),
            escape(&module.name),
            escape(&module.description)
        ),
        None => "No content available.".to_string(),
    }
}

pub fn quiz_overview(bank: &QuestionBank, questions_per_module: usize) -> String {
    let mut text = String::from("❓ <b>Quick Quiz</b>\n\n");
    let mut total = 0;
    for module in bank.modules() {
        let asked = questions_per_module.min(module.questions.len());
        total += asked;
        text.push_str(&format!(
            "• <b>{}</b>: {} of {} questions\n",
            escape(&module.name),
            asked,
            module.questions.len()
        ));
    }
    text.push_str(&format!(
        "\nYou will answer {} questions in total, grouped by module.",
        total
    ));
    text
}

pub fn no_questions() -> String {
    "There are no questions available right now.".to_string()
}

/// Sent when a handler fails; the chat is returned home.
pub fn unexpected_error() -> String {
    "Sorry, something went wrong. Taking you back home.".to_string()
}

pub fn question(bank: &QuestionBank, session: &QuizSession) -> Result<String, QuizError> {
    let index = session.current_index();
    let question = session.current_question()?;
    let module_number = bank
        .all_modules()
        .position(|m| m == question.module)
        .map(|i| i + 1)
        .unwrap_or(1);

    let mut text = format!(
        "<b>Module {}: {}</b>\n<i>Question {} of {}</i>\n\n{}\n",
        module_number,
        escape(&question.module),
        index + 1,
        session.plan().len(),
        escape(&question.prompt)
    );
    for (i, option) in question.options.iter().enumerate() {
        text.push_str(&format!("\n{}. {}", i + 1, escape(option)));
    }
    if let Some(previous) = session.answer(index).and_then(|a| question.options.get(a)) {
        text.push_str(&format!("\n\nYour answer: <i>{}</i>", escape(previous)));
    }
    let furthest = session.furthest_index();
    if furthest > 0 {
        text.push_str(&format!(
            "\n\n<i>Send #1 to #{} to revisit a question.</i>",
            furthest + 1
        ));
    }
    Ok(text)
}

pub fn feedback(feedback: &Feedback) -> String {
    match feedback {
        Feedback::Correct => "✓ Correct".to_string(),
        Feedback::Incorrect { correct_text } => {
            format!("✗ Incorrect - correct answer: {}", escape(correct_text))
        }
    }
}

pub fn progress_bar(ratio: f64) -> String {
    let ratio = ratio.clamp(0.0, 1.0);
    let filled = (ratio * PROGRESS_WIDTH as f64).round() as usize;
    format!(
        "{}{} {}%",
        "▓".repeat(filled),
        "░".repeat(PROGRESS_WIDTH - filled),
        (ratio * 100.0).round() as u32
    )
}

/// Score line, progress and per-module breakdown.
pub fn results(summary: &ResultsSummary) -> String {
    let mut text = format!(
        "🏁 <b>Quiz Results</b>\n\nYou scored <b>{}</b> out of <b>{}</b>.\n{}\n\n<b>Per-module results</b>\n",
        summary.total_score,
        summary.total_questions,
        progress_bar(summary.ratio())
    );
    for tally in &summary.modules {
        text.push_str(&format!(
            "<b>{}:</b> {} / {} correct\n",
            escape(&tally.module),
            tally.correct,
            tally.total
        ));
    }
    text
}

/// Question-by-question review, one entry per question.
pub fn review(summary: &ResultsSummary) -> Vec<String> {
    summary
        .reviews
        .iter()
        .enumerate()
        .map(|(i, r)| {
            let answer = match &r.selected {
                Some(selected) => escape(selected),
                None => "<i>No answer</i>".to_string(),
            };
            let mark = if r.is_correct() { "✓" } else { "✗" };
            let mut text = format!(
                "{} <b>Q{}. {}</b>\nYour answer: {}\nCorrect answer: {}",
                mark,
                i + 1,
                escape(&r.prompt),
                answer,
                escape(&r.correct)
            );
            if !r.explanation.is_empty() {
                text.push_str(&format!("\nExplanation: {}", escape(&r.explanation)));
            }
            text
        })
        .collect()
}

/// Joins review entries into as few messages as fit under the size limit.
pub fn review_messages(summary: &ResultsSummary) -> Vec<String> {
    pack(review(summary), MESSAGE_LIMIT)
}

fn pack(entries: Vec<String>, limit: usize) -> Vec<String> {
    let mut messages: Vec<String> = Vec::new();
    for entry in entries {
        let fits = messages
            .last()
            .map_or(false, |last| last.chars().count() + entry.chars().count() + 2 <= limit);
        if !fits {
            messages.push(entry);
        } else if let Some(last) = messages.last_mut() {
            last.push_str("\n\n");
            last.push_str(&entry);
        }
    }
    messages
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::quiz::composer::compose;
    use crate::quiz::random::StdRandom;
    use crate::quiz::results::summarize;

    fn session() -> (QuestionBank, QuizSession) {
        let bank = QuestionBank::builtin();
        let plan = compose(&bank, 5, &mut StdRandom::seeded(3)).unwrap();
        (bank, QuizSession::new(plan).unwrap())
    }

    #[test]
    fn progress_bar_bounds() {
        assert_eq!(progress_bar(0.0), format!("{} 0%", "░".repeat(10)));
        assert_eq!(progress_bar(1.0), format!("{} 100%", "▓".repeat(10)));
        assert_eq!(progress_bar(0.5), format!("{}{} 50%", "▓".repeat(5), "░".repeat(5)));
        assert_eq!(progress_bar(3.0), progress_bar(1.0));
    }

    #[test]
    fn question_page_names_module_and_position() {
        let (bank, session) = session();
        let text = question(&bank, &session).unwrap();
        assert!(text.contains("Module 1: What is a Virus?"));
        assert!(text.contains("Question 1 of 20"));
        assert!(!text.contains("Your answer"));
        assert!(!text.contains("revisit"));
    }

    #[test]
    fn question_page_hints_at_jumps_once_past_the_first() {
        let (bank, mut session) = session();
        session.go_to_next();
        session.go_to_next();
        let text = question(&bank, &session).unwrap();
        assert!(text.contains("Send #1 to #3 to revisit a question."));

        session.go_to_index(0).unwrap();
        let text = question(&bank, &session).unwrap();
        assert!(text.contains("Question 1 of 20"));
        assert!(text.contains("#1 to #3"));
    }

    #[test]
    fn question_page_shows_stored_answer() {
        let (bank, mut session) = session();
        session.submit_answer(2).unwrap();
        let chosen = session.current_question().unwrap().options[2].clone();

        let text = question(&bank, &session).unwrap();
        assert!(text.contains(&format!("Your answer: <i>{}</i>", escape(&chosen))));
    }

    #[test]
    fn results_list_every_module() {
        let (bank, session) = session();
        let text = results(&summarize(&session));
        assert!(text.contains("You scored <b>0</b> out of <b>20</b>."));
        for module in bank.all_modules() {
            assert!(text.contains(&format!("<b>{}:</b> 0 / 5 correct", escape(module))));
        }
    }

    #[test]
    fn review_marks_unanswered_questions() {
        let (_, session) = session();
        let entries = review(&summarize(&session));
        assert_eq!(entries.len(), 20);
        assert!(entries.iter().all(|e| e.contains("No answer")));
        assert!(entries.iter().all(|e| e.contains("Explanation:")));
        assert!(entries.iter().all(|e| e.starts_with("✗ ")));
    }

    #[test]
    fn review_marks_right_and_wrong_answers() {
        let (_, mut session) = session();
        let correct = session.current_question().unwrap().correct_index;
        session.submit_answer(correct).unwrap();
        session.go_to_next();
        let second = session.current_question().unwrap();
        let wrong = (second.correct_index + 1) % second.options.len();
        session.submit_answer(wrong).unwrap();

        let entries = review(&summarize(&session));
        assert!(entries[0].starts_with("✓ <b>Q1."));
        assert!(entries[1].starts_with("✗ <b>Q2."));
    }

    #[test]
    fn unexpected_error_is_plain_text() {
        let text = unexpected_error();
        assert!(!text.contains('<'));
        assert!(text.contains("back home"));
    }

    #[test]
    fn packs_entries_under_the_limit() {
        let entries = vec!["a".repeat(4), "b".repeat(4), "c".repeat(4)];
        assert_eq!(pack(entries.clone(), 10), vec!["aaaa\n\nbbbb", "cccc"]);
        assert_eq!(pack(entries, 3).len(), 3);
        assert!(pack(Vec::new(), 10).is_empty());
    }

    #[test]
    fn full_review_fits_in_few_messages() {
        let (_, session) = session();
        let messages = review_messages(&summarize(&session));
        assert!(!messages.is_empty());
        assert!(messages.iter().all(|m| m.chars().count() <= MESSAGE_LIMIT));
        assert_eq!(messages.join("\n\n").matches("Correct answer:").count(), 20);
    }

    #[test]
    fn overview_counts_questions() {
        let bank = QuestionBank::builtin();
        let text = quiz_overview(&bank, 5);
        assert!(text.contains("20 questions in total"));
        assert!(text.contains("5 of 5 questions"));
    }

    #[test]
    fn module_page_out_of_range() {
        let bank = QuestionBank::builtin();
        assert_eq!(module_page(&bank, 9), "No content available.");
        assert!(module_page(&bank, 0).contains("Module 1 of 4"));
    }
}
