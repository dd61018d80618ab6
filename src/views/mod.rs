pub mod quiz;

use maud::{html, Markup, PreEscaped, DOCTYPE};

use crate::models::session::QuizSession;

const STYLE: &str = "
body { font-family: system-ui, sans-serif; max-width: 48rem; margin: 2rem auto; padding: 0 1rem; }
.card { border: 1px solid #ddd; border-radius: 0.75rem; padding: 1.5rem; }
.alert { background: #fde8e8; border: 1px solid #f5a3a3; padding: 0.75rem; border-radius: 0.5rem; margin-bottom: 1rem; }
.badge { background: #7c3aed; color: #fff; border-radius: 999px; padding: 0.2rem 0.75rem; font-size: 0.8rem; }
.option { display: block; width: 100%; text-align: left; padding: 0.75rem; margin: 0.4rem 0; border: 1px solid #ccc; border-radius: 0.5rem; background: #fafafa; }
.option.selected { background: #ede9fe; border-color: #7c3aed; }
.option.correct { background: #dcfce7; border-color: #16a34a; }
.option.incorrect { background: #fee2e2; border-color: #dc2626; }
.explanation { background: #e0f2fe; border: 1px solid #38bdf8; padding: 0.75rem; border-radius: 0.5rem; margin: 1rem 0; }
";

pub fn layout(title: &str, body: Markup) -> Markup {
    html! {
        (DOCTYPE)
        html lang="en" {
            head {
                meta charset="utf-8";
                meta name="viewport" content="width=device-width, initial-scale=1";
                title { (title) }
                style { (PreEscaped(STYLE)) }
            }
            body {
                h1 { "AI Quiz Generator" }
                main { (body) }
            }
        }
    }
}

/// Full page for the session's current phase. `token` is the serialised
/// session posted back with every action.
pub fn session_page(session: &QuizSession, token: &str, max_questions: usize) -> Markup {
    let body = match session {
        QuizSession::Setup(setup) => quiz::setup(setup, session.can_generate(), token, max_questions),
        QuizSession::InProgress(_) => quiz::question(session, token),
        QuizSession::Completed(_) => quiz::summary(session, token),
    };
    layout("AI Quiz Generator", body)
}
