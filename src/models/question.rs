use serde::{Deserialize, Serialize};

pub const TRUE_FALSE_CHOICES: [&str; 2] = ["True", "False"];

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuizQuestion {
    pub question: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub options: Option<Vec<String>>,
    pub answer: String,
    pub explanation: String,
    pub difficulty: String,
}

impl QuizQuestion {
    /// Choices offered for this question: its own options for multiple choice,
    /// the fixed True/False pair otherwise.
    pub fn choices(&self, question_type: QuestionType) -> Vec<String> {
        match question_type {
            QuestionType::Mcq => self.options.clone().unwrap_or_default(),
            QuestionType::Tf => TRUE_FALSE_CHOICES.iter().map(|c| c.to_string()).collect(),
        }
    }

    pub fn is_correct(&self, selected: &str) -> bool {
        self.answer == selected
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum QuestionType {
    #[default]
    Mcq,
    Tf,
}

impl QuestionType {
    pub fn as_str(&self) -> &'static str {
        match self {
            QuestionType::Mcq => "mcq",
            QuestionType::Tf => "tf",
        }
    }

    pub fn describe(&self) -> &'static str {
        match self {
            QuestionType::Mcq => "multiple choice",
            QuestionType::Tf => "true/false",
        }
    }
}

impl std::str::FromStr for QuestionType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "mcq" => Ok(QuestionType::Mcq),
            "tf" => Ok(QuestionType::Tf),
            other => Err(format!("Unknown question type: {}", other)),
        }
    }
}

/// Maps loose boolean spellings to the canonical "True"/"False" pair.
pub fn canonical_true_false(answer: &str) -> Option<&'static str> {
    match answer.trim().to_ascii_lowercase().as_str() {
        "true" => Some("True"),
        "false" => Some("False"),
        _ => None,
    }
}
