use crate::error::{Error, Result};
use crate::models::question::{QuestionType, QuizQuestion};
use serde::{Deserialize, Serialize};
use validator::Validate;

pub const DEFAULT_DIFFICULTY: &str = "medium";
pub const MISSING_FIELDS_MESSAGE: &str = "Topic and number of questions are required";

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct GenerateQuizPayload {
    #[serde(default, deserialize_with = "trim_optional_string")]
    pub topic: Option<String>,

    #[serde(default, deserialize_with = "trim_optional_string")]
    pub difficulty: Option<String>,

    #[serde(default)]
    #[validate(range(min = 1, message = "Number of questions must be positive"))]
    pub num_questions: Option<i64>,

    #[serde(default)]
    pub question_type: Option<QuestionType>,
}

/// A generation request that passed validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuizRequest {
    pub topic: String,
    pub difficulty: String,
    pub num_questions: usize,
    pub question_type: QuestionType,
}

impl GenerateQuizPayload {
    /// Counts above `max_questions` are clamped rather than rejected, so every
    /// request carrying a topic and a positive count gets a quiz.
    pub fn into_request(self, max_questions: usize) -> Result<QuizRequest> {
        let (Some(topic), Some(num_questions)) = (self.topic.clone(), self.num_questions) else {
            return Err(Error::BadRequest(MISSING_FIELDS_MESSAGE.to_string()));
        };
        if num_questions == 0 {
            return Err(Error::BadRequest(MISSING_FIELDS_MESSAGE.to_string()));
        }
        self.validate()?;

        let requested = usize::try_from(num_questions).unwrap_or(usize::MAX);
        let num_questions = requested.min(max_questions.max(1));
        if num_questions < requested {
            tracing::warn!(requested, num_questions, "Clamping question count");
        }

        Ok(QuizRequest {
            topic,
            difficulty: self
                .difficulty
                .unwrap_or_else(|| DEFAULT_DIFFICULTY.to_string())
                .to_lowercase(),
            num_questions,
            question_type: self.question_type.unwrap_or_default(),
        })
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenerateQuizResponse {
    pub quiz: Vec<QuizQuestion>,
}

fn trim_optional_string<'de, D>(deserializer: D) -> std::result::Result<Option<String>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let opt: Option<String> = Option::deserialize(deserializer)?;
    Ok(opt.and_then(|s| {
        let trimmed = s.trim();
        if trimmed.is_empty() {
            None
        } else {
            Some(trimmed.to_string())
        }
    }))
}
