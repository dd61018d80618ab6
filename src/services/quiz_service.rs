use crate::dto::quiz_dto::QuizRequest;
use crate::error::{Error, Result};
use crate::models::question::{canonical_true_false, QuestionType, QuizQuestion};
use crate::services::ollama_service::OllamaService;
use crate::utils::json_extract::extract_array;
use serde_json::Value as JsonValue;

const FALLBACK_OPTIONS: [&str; 4] = ["Option A", "Option B", "Option C", "Option D"];

/// Where a returned quiz came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QuizSource {
    Model,
    Fallback,
}

impl QuizSource {
    pub fn as_str(&self) -> &'static str {
        match self {
            QuizSource::Model => "model",
            QuizSource::Fallback => "fallback",
        }
    }
}

#[derive(Debug, Clone)]
pub struct GeneratedQuiz {
    pub questions: Vec<QuizQuestion>,
    pub source: QuizSource,
}

#[derive(Clone)]
pub struct QuizService {
    ollama: OllamaService,
    num_predict: u32,
    tokens_per_question: u32,
}

impl QuizService {
    pub fn new(ollama: OllamaService, num_predict: u32, tokens_per_question: u32) -> Self {
        Self {
            ollama,
            num_predict,
            tokens_per_question,
        }
    }

    /// Generation cap for a request: the configured floor, raised for long quizzes.
    pub fn num_predict_for(&self, num_questions: usize) -> u32 {
        let scaled = u32::try_from(num_questions)
            .unwrap_or(u32::MAX)
            .saturating_mul(self.tokens_per_question);
        self.num_predict.max(scaled)
    }

    /// Generates a quiz, substituting placeholder questions on any failure.
    pub async fn generate(&self, req: &QuizRequest) -> GeneratedQuiz {
        match self.try_generate(req).await {
            Ok(questions) => {
                tracing::info!(count = questions.len(), topic = %req.topic, "Generated valid questions");
                GeneratedQuiz {
                    questions,
                    source: QuizSource::Model,
                }
            }
            Err(e) => {
                tracing::error!(error = %e, topic = %req.topic, "Quiz generation failed, falling back to placeholder quiz");
                GeneratedQuiz {
                    questions: fallback_quiz(req),
                    source: QuizSource::Fallback,
                }
            }
        }
    }

    pub async fn try_generate(&self, req: &QuizRequest) -> Result<Vec<QuizQuestion>> {
        let prompt = build_prompt(req);
        let raw = self
            .ollama
            .generate(&prompt, self.num_predict_for(req.num_questions))
            .await?;

        let cleaned_preview: String = raw.trim().chars().take(200).collect();
        tracing::debug!(preview = %cleaned_preview, "Parsing model output");

        let records = extract_array(&raw)?;
        let questions = sanitize_questions(&records, req);
        if questions.is_empty() {
            return Err(Error::EmptyQuiz);
        }
        Ok(questions)
    }
}

pub fn build_prompt(req: &QuizRequest) -> String {
    let difficulty = req.difficulty.to_lowercase();
    let example = match req.question_type {
        QuestionType::Mcq => serde_json::json!([{
            "question": "What is Python primarily used for?",
            "options": ["Web development", "Gaming", "Mobile apps", "Hardware design"],
            "answer": "Web development",
            "explanation": "Python is widely used for web development due to frameworks like Django and Flask.",
            "difficulty": difficulty,
        }]),
        QuestionType::Tf => serde_json::json!([{
            "question": "Python is an interpreted language.",
            "answer": "True",
            "explanation": "Python source is executed by an interpreter rather than compiled ahead of time.",
            "difficulty": difficulty,
        }]),
    };
    let example = serde_json::to_string_pretty(&example).unwrap_or_default();
    let format_rule = match req.question_type {
        QuestionType::Mcq => "4 options each with 1 correct answer",
        QuestionType::Tf => "True/False questions with answer \"True\" or \"False\"",
    };

    format!(
        "Generate {n} {difficulty} difficulty {kind} questions about {topic}.\n\
         \n\
         Return ONLY a valid JSON array in this exact format:\n\
         {example}\n\
         \n\
         Requirements:\n\
         - {n} questions only\n\
         - {difficulty} difficulty level\n\
         - Questions about {topic}\n\
         - {format_rule}\n\
         - Detailed explanations\n\
         - Return ONLY the JSON array, no other text",
        n = req.num_questions,
        kind = req.question_type.describe(),
        topic = req.topic,
    )
}

/// Keeps well-formed records, normalised to the request, capped at the
/// requested count.
pub fn sanitize_questions(records: &[JsonValue], req: &QuizRequest) -> Vec<QuizQuestion> {
    let mut questions: Vec<QuizQuestion> = records
        .iter()
        .filter_map(|record| coerce_question(record, req))
        .collect();
    if questions.len() > req.num_questions {
        questions.truncate(req.num_questions);
    }
    questions
}

fn coerce_question(v: &JsonValue, req: &QuizRequest) -> Option<QuizQuestion> {
    let question = text_field(v, "question")?;
    let answer = text_field(v, "answer")?;
    let explanation = text_field(v, "explanation")?;

    let (options, answer) = match req.question_type {
        QuestionType::Mcq => {
            let options: Vec<String> = v
                .get("options")?
                .as_array()?
                .iter()
                .filter_map(stringify)
                .filter(|o| !o.is_empty())
                .collect();
            if options.is_empty() {
                return None;
            }
            (Some(options), answer)
        }
        QuestionType::Tf => {
            let answer = canonical_true_false(&answer)
                .map(str::to_string)
                .unwrap_or(answer);
            (None, answer)
        }
    };

    let difficulty = text_field(v, "difficulty")
        .unwrap_or_else(|| req.difficulty.clone())
        .to_lowercase();

    Some(QuizQuestion {
        question,
        options,
        answer,
        explanation,
        difficulty,
    })
}

fn text_field(v: &JsonValue, key: &str) -> Option<String> {
    v.get(key)
        .and_then(stringify)
        .filter(|s| !s.is_empty())
}

fn stringify(v: &JsonValue) -> Option<String> {
    match v {
        JsonValue::String(s) => Some(s.trim().to_string()),
        JsonValue::Number(n) => Some(n.to_string()),
        JsonValue::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

/// Placeholder questions returned when the model cannot produce a quiz.
pub fn fallback_quiz(req: &QuizRequest) -> Vec<QuizQuestion> {
    (1..=req.num_questions)
        .map(|i| QuizQuestion {
            question: format!("Real {} question {} would appear here", req.topic, i),
            options: match req.question_type {
                QuestionType::Mcq => Some(FALLBACK_OPTIONS.iter().map(|o| o.to_string()).collect()),
                QuestionType::Tf => None,
            },
            answer: match req.question_type {
                QuestionType::Mcq => FALLBACK_OPTIONS[0].to_string(),
                QuestionType::Tf => "True".to_string(),
            },
            explanation: format!("This would be a real explanation about {}.", req.topic),
            difficulty: req.difficulty.to_lowercase(),
        })
        .collect()
}
