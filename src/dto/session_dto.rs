use crate::error::{Error, Result};
use crate::models::question::QuestionType;
use crate::models::session::SetupForm;
use serde::Deserialize;

/// Urlencoded body posted by every form on the quiz page.
#[derive(Debug, Default, Deserialize)]
pub struct SessionForm {
    #[serde(default)]
    pub state: String,
    pub action: Option<String>,
    pub select: Option<String>,
    pub topic: Option<String>,
    pub difficulty: Option<String>,
    pub num_questions: Option<String>,
    pub question_type: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionAction {
    Select(String),
    Generate,
    Submit,
    Next,
    Restart,
}

impl SessionForm {
    /// Option buttons post `select`; every other control posts `action`.
    pub fn action(&self) -> Result<SessionAction> {
        if let Some(option) = &self.select {
            return Ok(SessionAction::Select(option.clone()));
        }
        match self.action.as_deref().map(str::trim) {
            Some("generate") => Ok(SessionAction::Generate),
            Some("submit") => Ok(SessionAction::Submit),
            Some("next") => Ok(SessionAction::Next),
            Some("restart") => Ok(SessionAction::Restart),
            Some(other) => Err(Error::BadRequest(format!("Unknown action: {}", other))),
            None => Err(Error::BadRequest("Missing action".to_string())),
        }
    }

    /// Overlays the posted setup fields on `current`. An unparseable count
    /// becomes 0, which generation then rejects as missing.
    pub fn setup_form(&self, current: &SetupForm) -> SetupForm {
        SetupForm {
            topic: self
                .topic
                .as_deref()
                .map(|t| t.trim().to_string())
                .unwrap_or_else(|| current.topic.clone()),
            difficulty: self
                .difficulty
                .as_deref()
                .map(|d| d.trim().to_lowercase())
                .filter(|d| !d.is_empty())
                .unwrap_or_else(|| current.difficulty.clone()),
            num_questions: self
                .num_questions
                .as_deref()
                .map(|n| n.trim().parse().unwrap_or(0))
                .unwrap_or(current.num_questions),
            question_type: self
                .question_type
                .as_deref()
                .and_then(|t| t.parse::<QuestionType>().ok())
                .unwrap_or(current.question_type),
        }
    }
}
