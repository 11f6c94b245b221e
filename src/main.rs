mod config;
mod quiz;

use std::sync::Arc;

use dotenv::dotenv;
use log::{debug, info};
use quiz::{display, AnswerOutcome, PromptState, QuestionBank, SelectionGateway};
use teloxide::{
    dispatching::dialogue::InMemStorage,
    prelude::*,
    types::{KeyboardButton, KeyboardMarkup, ParseMode},
};

type QuizDialogue = Dialogue<State, InMemStorage<State>>;
type HandlerResult = Result<(), Box<dyn std::error::Error + Send + Sync>>;

#[derive(Clone, Default)]
pub enum State {
    #[default]
    Start,
    Playing {
        gateway: SelectionGateway,
    },
}

#[tokio::main]
async fn main() {
    // The .env file is optional, the token may come from the environment directly
    dotenv().ok();

    pretty_env_logger::init();
    log::info!("Starting body quiz bot...");

    let config = config::Config::from_env();
    let bank = Arc::new(
        config
            .load_bank()
            .expect("Failed to load the question bank"),
    );
    info!("Question bank loaded: {} questions", bank.len());

    let bot = Bot::from_env();

    Dispatcher::builder(
        bot,
        Update::filter_message()
            .enter_dialogue::<Message, InMemStorage<State>, State>()
            .branch(dptree::case![State::Start].endpoint(start))
            .branch(dptree::case![State::Playing { gateway }].endpoint(play)),
    )
    .dependencies(dptree::deps![InMemStorage::<State>::new(), bank])
    .enable_ctrlc_handler()
    .build()
    .dispatch()
    .await;
}

const GREETING_TEXT: &str = "Bienvenue dans le Corps Humain Interactif ! Choisis une partie du corps pour répondre à sa question. Chaque mauvaise réponse te coûte 10% de santé.";
const CLOSE_BUTTON: &str = "✖ Fermer";
const RESTART_BUTTON: &str = "Recommencer le défi";
const RESTART_COMMANDS: [&str; 3] = ["/start", "/restart", RESTART_BUTTON];

async fn start(
    bot: Bot,
    dialogue: QuizDialogue,
    msg: Message,
    bank: Arc<QuestionBank>,
) -> HandlerResult {
    let gateway = SelectionGateway::new(bank);

    bot.send_message(
        msg.chat.id,
        format!(
            "{}\n\n{}",
            GREETING_TEXT,
            display::health_bar(gateway.session().health())
        ),
    )
    .reply_markup(body_parts_keyboard(gateway.session().bank()))
    .await?;

    dialogue.update(State::Playing { gateway }).await?;
    Ok(())
}

async fn play(
    bot: Bot,
    dialogue: QuizDialogue,
    mut gateway: SelectionGateway,
    msg: Message,
) -> HandlerResult {
    let text = match msg.text() {
        Some(text) => text,
        None => return Ok(()),
    };

    if RESTART_COMMANDS.contains(&text) {
        info!("Chat {} restarted the challenge", msg.chat.id.0);
        gateway.restart();

        bot.send_message(
            msg.chat.id,
            format!(
                "C'est reparti !\n\n{}",
                display::health_bar(gateway.session().health())
            ),
        )
        .reply_markup(body_parts_keyboard(gateway.session().bank()))
        .await?;

        dialogue.update(State::Playing { gateway }).await?;
        return Ok(());
    }

    match gateway.prompt().cloned() {
        Some(prompt) => handle_open_prompt(bot, dialogue, gateway, prompt, &msg, text).await,
        None => handle_interaction(bot, dialogue, gateway, &msg, text).await,
    }
}

async fn handle_interaction(
    bot: Bot,
    dialogue: QuizDialogue,
    mut gateway: SelectionGateway,
    msg: &Message,
    target_id: &str,
) -> HandlerResult {
    // Inert interactions get no reply, the chat simply doesn't change
    let prompt = match gateway.on_interaction(target_id) {
        Some(prompt) => prompt.clone(),
        None => return Ok(()),
    };

    bot.send_message(msg.chat.id, display::prompt_text(&prompt))
        .parse_mode(ParseMode::Html)
        .reply_markup(options_keyboard(&prompt))
        .await?;

    dialogue.update(State::Playing { gateway }).await?;
    Ok(())
}

async fn handle_open_prompt(
    bot: Bot,
    dialogue: QuizDialogue,
    mut gateway: SelectionGateway,
    prompt: PromptState,
    msg: &Message,
    text: &str,
) -> HandlerResult {
    if text == CLOSE_BUTTON {
        gateway.on_dismiss();

        bot.send_message(msg.chat.id, "Question fermée. Choisis une autre partie du corps.")
            .reply_markup(body_parts_keyboard(gateway.session().bank()))
            .await?;

        dialogue.update(State::Playing { gateway }).await?;
        return Ok(());
    }

    if !prompt.question.has_option(text) {
        debug!(
            "Ignoring '{}' while the question for '{}' is open",
            text, prompt.target_id
        );
        return Ok(());
    }

    let outcome = gateway.on_answer_chosen(text)?;
    send_outcome(&bot, msg, &gateway, outcome).await?;

    dialogue.update(State::Playing { gateway }).await?;
    Ok(())
}

async fn send_outcome(
    bot: &Bot,
    msg: &Message,
    gateway: &SelectionGateway,
    outcome: AnswerOutcome,
) -> HandlerResult {
    let session = gateway.session();
    let feedback = format!(
        "{}\n\nSanté : {}",
        display::feedback(outcome.is_correct),
        display::health_bar(session.health())
    );

    if !outcome.session_now_over {
        bot.send_message(msg.chat.id, feedback)
            .reply_markup(body_parts_keyboard(session.bank()))
            .await?;
        return Ok(());
    }

    bot.send_message(msg.chat.id, feedback).await?;
    bot.send_message(msg.chat.id, display::summary(&session.snapshot()))
        .parse_mode(ParseMode::Html)
        .reply_markup(KeyboardMarkup::new(vec![vec![KeyboardButton::new(
            RESTART_BUTTON,
        )]]))
        .await?;
    Ok(())
}

fn body_parts_keyboard(bank: &QuestionBank) -> KeyboardMarkup {
    let rows = bank
        .ids()
        .chunks(2)
        .map(|row| {
            row.iter()
                .map(|id| KeyboardButton::new(*id))
                .collect::<Vec<_>>()
        })
        .collect::<Vec<_>>();

    KeyboardMarkup::new(rows)
}

fn options_keyboard(prompt: &PromptState) -> KeyboardMarkup {
    let mut rows = prompt
        .question
        .options
        .iter()
        .map(|option| vec![KeyboardButton::new(option.clone())])
        .collect::<Vec<_>>();
    rows.push(vec![KeyboardButton::new(CLOSE_BUTTON)]);

    KeyboardMarkup::new(rows)
}
