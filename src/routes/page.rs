use axum::{extract::State, Form};
use maud::Markup;

use crate::dto::session_dto::{SessionAction, SessionForm};
use crate::error::Result;
use crate::models::session::{QuizSession, SetupState};
use crate::utils::session_token;
use crate::views;
use crate::AppState;

const SESSION_LOST_ALERT: &str = "Your quiz session could not be restored. Please start again.";

#[axum::debug_handler]
pub async fn index(State(state): State<AppState>) -> Result<Markup> {
    render(&state, &QuizSession::new())
}

/// Applies one user action to the posted session and renders the result.
/// Actions that are not valid in the current phase leave it unchanged.
#[axum::debug_handler]
pub async fn session_action(
    State(state): State<AppState>,
    Form(form): Form<SessionForm>,
) -> Result<Markup> {
    let mut session = match session_token::decode(&form.state) {
        Ok(session) => session,
        Err(e) => {
            tracing::warn!(error = %e, "Discarding unreadable session token");
            QuizSession::Setup(SetupState {
                alert: Some(SESSION_LOST_ALERT.to_string()),
                ..SetupState::default()
            })
        }
    };

    let outcome: Result<()> = match form.action() {
        Ok(SessionAction::Select(option)) => session.select(&option).map_err(Into::into),
        Ok(SessionAction::Submit) => session.submit().map(|_| ()).map_err(Into::into),
        Ok(SessionAction::Next) => session.advance().map(|_| ()).map_err(Into::into),
        Ok(SessionAction::Restart) => session.reset().map_err(Into::into),
        Ok(SessionAction::Generate) => generate(&state, &mut session, &form).await,
        Err(e) => Err(e),
    };
    if let Err(e) = outcome {
        tracing::warn!(error = %e, phase = ?session.phase(), "Ignoring session action");
    }

    render(&state, &session)
}

async fn generate(state: &AppState, session: &mut QuizSession, form: &SessionForm) -> Result<()> {
    if let QuizSession::Setup(setup) = &*session {
        let updated = form.setup_form(&setup.form);
        session.update_form(updated)?;
    }

    let payload = session.begin_generation()?;
    let outcome = match payload.into_request(state.config.max_questions) {
        Ok(req) => Ok(state.quiz_service.generate(&req).await.questions),
        Err(e) => Err(e.to_string()),
    };
    session.finish_generation(outcome)?;
    Ok(())
}

fn render(state: &AppState, session: &QuizSession) -> Result<Markup> {
    let token = session_token::encode(session)?;
    Ok(views::session_page(session, &token, state.config.max_questions))
}
