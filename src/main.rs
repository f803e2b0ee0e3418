use std::sync::Arc;

use av_tutor_bot::{
    config::Config,
    nav::*,
    quiz::{
        bank::QuestionBank,
        composer::compose,
        content::JsonFileProvider,
        random::StdRandom,
        results::summarize,
        session::QuizSession,
        QuizError,
    },
    render,
};
use dotenv::dotenv;
use log::{debug, error, info, warn};
use teloxide::{
    dispatching::dialogue::InMemStorage,
    prelude::*,
    types::{KeyboardButton, KeyboardMarkup, KeyboardRemove, ParseMode},
};

type TutorDialogue = Dialogue<State, InMemStorage<State>>;
type HandlerResult = Result<(), Box<dyn std::error::Error + Send + Sync>>;

/// Shared, read-only data every handler needs.
struct Tutor {
    bank: QuestionBank,
    config: Config,
}

#[tokio::main]
async fn main() {
    dotenv().ok();
    pretty_env_logger::init();
    log::info!("Starting AV Tutor bot...");

    let config = Config::from_env();
    debug!("Using {:?}", config);

    let bank = QuestionBank::with_content(&JsonFileProvider::new(&config.content_path));
    info!(
        "Loaded {} questions across {} modules",
        bank.total_questions(),
        bank.modules().len()
    );

    let tutor = Arc::new(Tutor { bank, config });
    let bot = Bot::from_env();

    Dispatcher::builder(
        bot,
        Update::filter_message()
            .enter_dialogue::<Message, InMemStorage<State>, State>()
            .branch(dptree::case![State::Start].endpoint(start))
            .branch(dptree::case![State::Home { module }].endpoint(home))
            .branch(dptree::case![State::Learning { selected }].endpoint(learning))
            .branch(dptree::case![State::QuizStart { module }].endpoint(quiz_start))
            .branch(dptree::case![State::Quiz { module, session }].endpoint(quiz))
            .branch(dptree::case![State::Results { module, session }].endpoint(results)),
    )
    .dependencies(dptree::deps![InMemStorage::<State>::new(), tutor])
    .enable_ctrlc_handler()
    .build()
    .dispatch()
    .await;
}

fn keyboard(rows: Vec<Vec<&str>>) -> KeyboardMarkup {
    KeyboardMarkup::new(
        rows.into_iter()
            .map(|row| row.into_iter().map(KeyboardButton::new).collect::<Vec<_>>())
            .collect::<Vec<_>>(),
    )
}

fn home_keyboard() -> KeyboardMarkup {
    keyboard(vec![vec![LEARNING_MODULES, QUICK_QUIZ], vec![EXIT]])
}

fn learning_keyboard(bank: &QuestionBank) -> KeyboardMarkup {
    let mut rows: Vec<Vec<&str>> = bank.all_modules().map(|m| vec![m]).collect();
    rows.push(vec![PREVIOUS_MODULE, NEXT_MODULE]);
    rows.push(vec![BACK_TO_HOME, TAKE_QUIZ]);
    keyboard(rows)
}

fn question_keyboard(session: &QuizSession) -> KeyboardMarkup {
    let mut rows: Vec<Vec<&str>> = match session.current_question() {
        Ok(question) => question.options.iter().map(|o| vec![o.as_str()]).collect(),
        Err(_) => Vec::new(),
    };
    rows.push(vec![PREVIOUS, NEXT]);
    rows.push(vec![BACK_TO_HOME, EXIT]);
    keyboard(rows)
}

fn results_keyboard() -> KeyboardMarkup {
    keyboard(vec![vec![RETAKE_QUIZ], vec![BACK_TO_LEARNING, BACK_TO_HOME]])
}

async fn send_html(
    bot: &Bot,
    chat_id: ChatId,
    text: String,
    markup: KeyboardMarkup,
) -> HandlerResult {
    bot.send_message(chat_id, text)
        .parse_mode(ParseMode::Html)
        .reply_markup(markup)
        .await?;
    Ok(())
}

async fn send_plain(bot: &Bot, chat_id: ChatId, text: &str) -> HandlerResult {
    bot.send_message(chat_id, text).await?;
    Ok(())
}

/// Logs a failed step and sends the chat home with a neutral notice instead
/// of leaving it without a reply.
async fn recover(
    bot: &Bot,
    dialogue: &TutorDialogue,
    chat_id: ChatId,
    module: usize,
    outcome: HandlerResult,
) -> HandlerResult {
    if let Err(e) = outcome {
        error!("Chat {}: {}", chat_id, e);
        send_html(bot, chat_id, render::unexpected_error(), home_keyboard()).await?;
        dialogue.update(State::Home { module }).await?;
    }
    Ok(())
}

async fn start(bot: Bot, dialogue: TutorDialogue, msg: Message) -> HandlerResult {
    let outcome = go_home(&bot, &dialogue, msg.chat.id, 0).await;
    recover(&bot, &dialogue, msg.chat.id, 0, outcome).await
}

async fn go_home(
    bot: &Bot,
    dialogue: &TutorDialogue,
    chat_id: ChatId,
    module: usize,
) -> HandlerResult {
    send_html(bot, chat_id, render::home(), home_keyboard()).await?;
    dialogue.update(State::Home { module }).await?;
    Ok(())
}

async fn exit(bot: &Bot, dialogue: &TutorDialogue, chat_id: ChatId) -> HandlerResult {
    bot.send_message(
        chat_id,
        "Thanks for using AV Tutor! Send any message to come back.",
    )
    .reply_markup(KeyboardRemove::new())
    .await?;
    dialogue.update(State::Start).await?;
    Ok(())
}

async fn home(
    bot: Bot,
    dialogue: TutorDialogue,
    tutor: Arc<Tutor>,
    module: usize,
    msg: Message,
) -> HandlerResult {
    let chat_id = msg.chat.id;
    let outcome = match msg.text() {
        Some(LEARNING_MODULES) => show_module(&bot, &dialogue, &tutor, chat_id, module).await,
        Some(QUICK_QUIZ) => show_overview(&bot, &dialogue, &tutor, chat_id, module).await,
        Some(EXIT) => exit(&bot, &dialogue, chat_id).await,
        _ => {
            send_html(
                &bot,
                chat_id,
                "Please choose one of the options.".to_string(),
                home_keyboard(),
            )
            .await
        }
    };
    recover(&bot, &dialogue, chat_id, module, outcome).await
}

async fn show_module(
    bot: &Bot,
    dialogue: &TutorDialogue,
    tutor: &Tutor,
    chat_id: ChatId,
    selected: usize,
) -> HandlerResult {
    send_html(
        bot,
        chat_id,
        render::module_page(&tutor.bank, selected),
        learning_keyboard(&tutor.bank),
    )
    .await?;
    dialogue.update(State::Learning { selected }).await?;
    Ok(())
}

async fn learning(
    bot: Bot,
    dialogue: TutorDialogue,
    tutor: Arc<Tutor>,
    selected: usize,
    msg: Message,
) -> HandlerResult {
    let chat_id = msg.chat.id;
    let input = msg
        .text()
        .map_or(LearningInput::Unknown, |text| {
            parse_learning_input(&tutor.bank, selected, text)
        });

    let outcome = match input {
        LearningInput::Select(next) => show_module(&bot, &dialogue, &tutor, chat_id, next).await,
        LearningInput::Home => go_home(&bot, &dialogue, chat_id, selected).await,
        LearningInput::TakeQuiz => {
            show_overview(&bot, &dialogue, &tutor, chat_id, selected).await
        }
        LearningInput::Unknown => send_plain(&bot, chat_id, "Please choose a module.").await,
    };
    recover(&bot, &dialogue, chat_id, selected, outcome).await
}

async fn show_overview(
    bot: &Bot,
    dialogue: &TutorDialogue,
    tutor: &Tutor,
    chat_id: ChatId,
    module: usize,
) -> HandlerResult {
    send_html(
        bot,
        chat_id,
        render::quiz_overview(&tutor.bank, tutor.config.questions_per_module),
        keyboard(vec![vec![START_QUIZ], vec![BACK_TO_LEARNING, BACK_TO_HOME]]),
    )
    .await?;
    dialogue.update(State::QuizStart { module }).await?;
    Ok(())
}

async fn quiz_start(
    bot: Bot,
    dialogue: TutorDialogue,
    tutor: Arc<Tutor>,
    module: usize,
    msg: Message,
) -> HandlerResult {
    let chat_id = msg.chat.id;
    let outcome = match msg.text() {
        Some(START_QUIZ) => start_quiz(&bot, &dialogue, &tutor, chat_id, module).await,
        Some(BACK_TO_LEARNING) => show_module(&bot, &dialogue, &tutor, chat_id, module).await,
        Some(BACK_TO_HOME) => go_home(&bot, &dialogue, chat_id, module).await,
        _ => show_overview(&bot, &dialogue, &tutor, chat_id, module).await,
    };
    recover(&bot, &dialogue, chat_id, module, outcome).await
}

/// Composes a fresh plan. A plan without questions ends up back home with a
/// neutral notice instead of an empty quiz.
async fn start_quiz(
    bot: &Bot,
    dialogue: &TutorDialogue,
    tutor: &Tutor,
    chat_id: ChatId,
    module: usize,
) -> HandlerResult {
    let plan = compose(
        &tutor.bank,
        tutor.config.questions_per_module,
        &mut StdRandom::from_entropy(),
    )?;

    match QuizSession::new(plan) {
        Ok(session) => {
            info!(
                "Chat {} started a quiz with {} questions",
                chat_id,
                session.plan().len()
            );
            show_question(bot, dialogue, &tutor.bank, chat_id, module, session).await
        }
        Err(QuizError::EmptyPlan) => {
            warn!("Chat {} asked for a quiz but there are no questions", chat_id);
            send_html(bot, chat_id, render::no_questions(), home_keyboard()).await?;
            dialogue.update(State::Home { module }).await?;
            Ok(())
        }
        Err(e) => Err(e.into()),
    }
}

async fn show_question(
    bot: &Bot,
    dialogue: &TutorDialogue,
    bank: &QuestionBank,
    chat_id: ChatId,
    module: usize,
    session: QuizSession,
) -> HandlerResult {
    let text = render::question(bank, &session)?;
    send_html(bot, chat_id, text, question_keyboard(&session)).await?;
    dialogue.update(State::Quiz { module, session }).await?;
    Ok(())
}

async fn quiz(
    bot: Bot,
    dialogue: TutorDialogue,
    tutor: Arc<Tutor>,
    (module, session): (usize, QuizSession),
    msg: Message,
) -> HandlerResult {
    let chat_id = msg.chat.id;
    let outcome = quiz_step(&bot, &dialogue, &tutor, module, session, &msg).await;
    recover(&bot, &dialogue, chat_id, module, outcome).await
}

async fn quiz_step(
    bot: &Bot,
    dialogue: &TutorDialogue,
    tutor: &Tutor,
    module: usize,
    mut session: QuizSession,
    msg: &Message,
) -> HandlerResult {
    let chat_id = msg.chat.id;
    let input = msg
        .text()
        .map_or(QuizInput::Unknown, |text| parse_quiz_input(&session, text));

    match input {
        QuizInput::Answer(selected) => {
            let feedback = session.submit_answer(selected)?;
            send_html(
                bot,
                chat_id,
                render::feedback(&feedback),
                question_keyboard(&session),
            )
            .await?;
            dialogue.update(State::Quiz { module, session }).await?;
            Ok(())
        }
        QuizInput::Previous => {
            session.go_to_previous();
            show_question(bot, dialogue, &tutor.bank, chat_id, module, session).await
        }
        QuizInput::Next => {
            session.go_to_next();
            if session.is_completed() {
                show_results(bot, dialogue, chat_id, module, session).await
            } else {
                show_question(bot, dialogue, &tutor.bank, chat_id, module, session).await
            }
        }
        QuizInput::Jump(index) => match session.go_to_index(index) {
            Ok(_) => show_question(bot, dialogue, &tutor.bank, chat_id, module, session).await,
            Err(_) => {
                send_plain(
                    bot,
                    chat_id,
                    "You can only jump back to questions you have already seen.",
                )
                .await
            }
        },
        QuizInput::Home => {
            info!(
                "Chat {} left a quiz at question {}",
                chat_id,
                session.current_index() + 1
            );
            go_home(bot, dialogue, chat_id, module).await
        }
        QuizInput::Exit => exit(bot, dialogue, chat_id).await,
        QuizInput::Unknown => send_plain(bot, chat_id, "Please pick one of the answers.").await,
    }
}

async fn show_results(
    bot: &Bot,
    dialogue: &TutorDialogue,
    chat_id: ChatId,
    module: usize,
    session: QuizSession,
) -> HandlerResult {
    let summary = summarize(&session);
    info!(
        "Chat {} finished a quiz: {}/{}",
        chat_id, summary.total_score, summary.total_questions
    );

    send_html(bot, chat_id, render::results(&summary), results_keyboard()).await?;
    for message in render::review_messages(&summary) {
        send_html(bot, chat_id, message, results_keyboard()).await?;
    }
    dialogue.update(State::Results { module, session }).await?;
    Ok(())
}

async fn results(
    bot: Bot,
    dialogue: TutorDialogue,
    tutor: Arc<Tutor>,
    (module, session): (usize, QuizSession),
    msg: Message,
) -> HandlerResult {
    let chat_id = msg.chat.id;
    let outcome = match msg.text() {
        Some(RETAKE_QUIZ) => start_quiz(&bot, &dialogue, &tutor, chat_id, module).await,
        Some(BACK_TO_LEARNING) => show_module(&bot, &dialogue, &tutor, chat_id, module).await,
        Some(BACK_TO_HOME) => go_home(&bot, &dialogue, chat_id, module).await,
        _ => {
            let summary = summarize(&session);
            send_html(&bot, chat_id, render::results(&summary), results_keyboard()).await
        }
    };
    recover(&bot, &dialogue, chat_id, module, outcome).await
}
