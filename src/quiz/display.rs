use teloxide::utils::html::escape;

use crate::quiz::{PromptState, SessionSnapshot};

const BAR_CELLS: usize = 10;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HealthBand {
    Good,
    Fair,
    Low,
    Critical,
}
impl HealthBand {
    pub fn from_health(health: u32) -> Self {
        if health > 70 {
            HealthBand::Good
        } else if health > 50 {
            HealthBand::Fair
        } else if health > 30 {
            HealthBand::Low
        } else {
            HealthBand::Critical
        }
    }

    pub fn symbol(&self) -> char {
        match self {
            HealthBand::Good => '🟩',
            HealthBand::Fair => '🟨',
            HealthBand::Low => '🟧',
            HealthBand::Critical => '🟥',
        }
    }
}

/// Ten-cell gauge followed by the percentage, e.g. `🟩🟩🟩🟩🟩🟩🟩🟩🟩⬜ 90%`.
pub fn health_bar(health: u32) -> String {
    let filled = (health as usize * BAR_CELLS / 100).min(BAR_CELLS);
    let symbol = HealthBand::from_health(health).symbol();

    let mut bar = String::new();
    for i in 0..BAR_CELLS {
        bar.push(if i < filled { symbol } else { '⬜' });
    }
    format!("{} {}%", bar, health)
}

// Paired organs share one label
pub fn display_name(id: &str) -> &str {
    match id {
        "LeftLung" | "RightLung" => "Les Poumons",
        "LeftKidney" | "RightKidney" => "Les Reins",
        "LeftEye" | "RightEye" => "Les Yeux",
        "Liver" => "Le Foie",
        "Brain" => "Le Cerveau",
        "Heart" => "Le Cœur",
        "Intestine" => "Les Intestins",
        _ => id,
    }
}

pub fn feedback(is_correct: bool) -> &'static str {
    if is_correct {
        "Bonne réponse !"
    } else {
        "Mauvaise réponse !"
    }
}

/// HTML message for the open question; bank text is escaped.
pub fn prompt_text(prompt: &PromptState) -> String {
    format!(
        "<b>Partie : {}</b>\n\n<b>Contexte :</b> {}\n\n{}",
        escape(display_name(&prompt.target_id)),
        escape(&prompt.question.context_text),
        escape(&prompt.question.prompt_text)
    )
}

pub fn summary(snapshot: &SessionSnapshot) -> String {
    format!(
        "<b>Résumé de votre journée éducative</b>\nQuestions correctes : {}\nQuestions incorrectes : {}\nParties explorées : {}/{}\nSanté : {}%",
        snapshot.correct_count,
        snapshot.incorrect_count,
        snapshot.answered_ids.len(),
        snapshot.total_questions,
        snapshot.health
    )
}
