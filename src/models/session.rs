use crate::dto::quiz_dto::{GenerateQuizPayload, DEFAULT_DIFFICULTY};
use crate::models::question::{QuestionType, QuizQuestion};
use serde::{Deserialize, Serialize};

pub const GENERATION_FAILED_ALERT: &str = "Failed to generate quiz. Please try again.";
pub const DEFAULT_NUM_QUESTIONS: u32 = 5;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SessionError {
    #[error("cannot {action} while in {phase:?}")]
    InvalidTransition { action: &'static str, phase: Phase },
    #[error("no answer selected")]
    NoSelection,
    #[error("'{0}' is not one of the choices")]
    UnknownOption(String),
    #[error("topic is required")]
    EmptyTopic,
    #[error("a quiz is already being generated")]
    GenerationInFlight,
    #[error("no generation is in flight")]
    NoGenerationInFlight,
    #[error("session state is inconsistent: {0}")]
    Corrupt(&'static str),
}

/// Coarse position in the session, for rendering and error reporting.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Setup,
    Answering(usize),
    Revealed(usize),
    Completed,
}

/// How an option should be drawn.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OptionState {
    Unselected,
    Selected,
    /// The right answer, shown once revealed.
    Correct,
    /// Chosen but wrong, shown once revealed.
    Incorrect,
}

impl OptionState {
    pub fn css_class(&self) -> &'static str {
        match self {
            OptionState::Unselected => "option",
            OptionState::Selected => "option selected",
            OptionState::Correct => "option correct",
            OptionState::Incorrect => "option incorrect",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SetupForm {
    pub topic: String,
    pub difficulty: String,
    pub num_questions: u32,
    pub question_type: QuestionType,
}

impl Default for SetupForm {
    fn default() -> Self {
        Self {
            topic: String::new(),
            difficulty: DEFAULT_DIFFICULTY.to_string(),
            num_questions: DEFAULT_NUM_QUESTIONS,
            question_type: QuestionType::Mcq,
        }
    }
}

impl SetupForm {
    pub fn to_payload(&self) -> GenerateQuizPayload {
        GenerateQuizPayload {
            topic: Some(self.topic.trim().to_string()),
            difficulty: Some(self.difficulty.clone()),
            num_questions: Some(i64::from(self.num_questions)),
            question_type: Some(self.question_type),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SetupState {
    pub form: SetupForm,
    pub generating: bool,
    pub alert: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "step", rename_all = "snake_case")]
pub enum Step {
    Answering { selected: Option<String> },
    Revealed { selected: String },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuizRun {
    questions: Vec<QuizQuestion>,
    question_type: QuestionType,
    score: usize,
    index: usize,
    step: Step,
}

impl QuizRun {
    fn current(&self) -> &QuizQuestion {
        &self.questions[self.index]
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuizResult {
    questions: Vec<QuizQuestion>,
    question_type: QuestionType,
    score: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "phase", rename_all = "snake_case")]
pub enum QuizSession {
    Setup(SetupState),
    InProgress(QuizRun),
    Completed(QuizResult),
}

impl Default for QuizSession {
    fn default() -> Self {
        QuizSession::Setup(SetupState::default())
    }
}

impl QuizSession {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn phase(&self) -> Phase {
        match self {
            QuizSession::Setup(_) => Phase::Setup,
            QuizSession::InProgress(run) => match run.step {
                Step::Answering { .. } => Phase::Answering(run.index),
                Step::Revealed { .. } => Phase::Revealed(run.index),
            },
            QuizSession::Completed(_) => Phase::Completed,
        }
    }

    fn invalid(&self, action: &'static str) -> SessionError {
        SessionError::InvalidTransition {
            action,
            phase: self.phase(),
        }
    }

    pub fn score(&self) -> usize {
        match self {
            QuizSession::Setup(_) => 0,
            QuizSession::InProgress(run) => run.score,
            QuizSession::Completed(result) => result.score,
        }
    }

    pub fn questions(&self) -> &[QuizQuestion] {
        match self {
            QuizSession::Setup(_) => &[],
            QuizSession::InProgress(run) => &run.questions,
            QuizSession::Completed(result) => &result.questions,
        }
    }

    pub fn total(&self) -> usize {
        self.questions().len()
    }

    pub fn question_type(&self) -> Option<QuestionType> {
        match self {
            QuizSession::Setup(_) => None,
            QuizSession::InProgress(run) => Some(run.question_type),
            QuizSession::Completed(result) => Some(result.question_type),
        }
    }

    pub fn current_question(&self) -> Option<&QuizQuestion> {
        match self {
            QuizSession::InProgress(run) => Some(run.current()),
            _ => None,
        }
    }

    pub fn selected(&self) -> Option<&str> {
        match self {
            QuizSession::InProgress(QuizRun {
                step: Step::Answering { selected },
                ..
            }) => selected.as_deref(),
            QuizSession::InProgress(QuizRun {
                step: Step::Revealed { selected },
                ..
            }) => Some(selected),
            _ => None,
        }
    }

    pub fn choices(&self) -> Vec<String> {
        match self {
            QuizSession::InProgress(run) => run.current().choices(run.question_type),
            _ => Vec::new(),
        }
    }

    pub fn can_generate(&self) -> bool {
        match self {
            QuizSession::Setup(setup) => !setup.generating && !setup.form.topic.trim().is_empty(),
            _ => false,
        }
    }

    pub fn can_submit(&self) -> bool {
        matches!(
            self,
            QuizSession::InProgress(QuizRun {
                step: Step::Answering { selected: Some(_) },
                ..
            })
        )
    }

    pub fn option_state(&self, option: &str) -> OptionState {
        let QuizSession::InProgress(run) = self else {
            return OptionState::Unselected;
        };
        match &run.step {
            Step::Answering { selected } if selected.as_deref() == Some(option) => {
                OptionState::Selected
            }
            Step::Answering { .. } => OptionState::Unselected,
            Step::Revealed { .. } if run.current().is_correct(option) => OptionState::Correct,
            Step::Revealed { selected } if selected == option => OptionState::Incorrect,
            Step::Revealed { .. } => OptionState::Unselected,
        }
    }

    pub fn update_form(&mut self, form: SetupForm) -> Result<(), SessionError> {
        match self {
            QuizSession::Setup(setup) if setup.generating => Err(SessionError::GenerationInFlight),
            QuizSession::Setup(setup) => {
                setup.form = form;
                Ok(())
            }
            _ => Err(self.invalid("edit the quiz settings")),
        }
    }

    /// Marks a generation request as in flight and returns its payload.
    pub fn begin_generation(&mut self) -> Result<GenerateQuizPayload, SessionError> {
        let QuizSession::Setup(setup) = self else {
            return Err(self.invalid("generate a quiz"));
        };
        if setup.generating {
            return Err(SessionError::GenerationInFlight);
        }
        if setup.form.topic.trim().is_empty() {
            return Err(SessionError::EmptyTopic);
        }
        setup.generating = true;
        setup.alert = None;
        Ok(setup.form.to_payload())
    }

    /// Completes an in-flight generation. A failure keeps the setup form and
    /// raises an alert so the user can retry.
    pub fn finish_generation(
        &mut self,
        outcome: Result<Vec<QuizQuestion>, String>,
    ) -> Result<(), SessionError> {
        let QuizSession::Setup(setup) = self else {
            return Err(self.invalid("finish generating"));
        };
        if !setup.generating {
            return Err(SessionError::NoGenerationInFlight);
        }
        setup.generating = false;

        let question_type = setup.form.question_type;
        let playable = |questions: &[QuizQuestion]| {
            !questions.is_empty() && questions.iter().all(|q| !q.choices(question_type).is_empty())
        };
        match outcome {
            Ok(questions) if playable(&questions) => {
                *self = QuizSession::InProgress(QuizRun {
                    questions,
                    question_type,
                    score: 0,
                    index: 0,
                    step: Step::Answering { selected: None },
                });
            }
            Ok(_) => {
                tracing::warn!("generation returned no playable questions");
                setup.alert = Some(GENERATION_FAILED_ALERT.to_string());
            }
            Err(reason) => {
                tracing::warn!(%reason, "quiz generation failed");
                setup.alert = Some(GENERATION_FAILED_ALERT.to_string());
            }
        }
        Ok(())
    }

    pub fn select(&mut self, option: &str) -> Result<(), SessionError> {
        let choices = self.choices();
        let QuizSession::InProgress(QuizRun {
            step: Step::Answering { selected },
            ..
        }) = self
        else {
            return Err(self.invalid("select an answer"));
        };
        if !choices.iter().any(|c| c == option) {
            return Err(SessionError::UnknownOption(option.to_string()));
        }
        *selected = Some(option.to_string());
        Ok(())
    }

    /// Reveals the current question. Returns whether the answer was correct.
    pub fn submit(&mut self) -> Result<bool, SessionError> {
        let phase = self.phase();
        let QuizSession::InProgress(run) = self else {
            return Err(self.invalid("submit an answer"));
        };
        let selected = match &run.step {
            Step::Answering {
                selected: Some(selected),
            } => selected.clone(),
            Step::Answering { selected: None } => return Err(SessionError::NoSelection),
            Step::Revealed { .. } => {
                return Err(SessionError::InvalidTransition {
                    action: "submit an answer",
                    phase,
                })
            }
        };

        let correct = run.current().is_correct(&selected);
        if correct {
            run.score += 1;
        }
        run.step = Step::Revealed { selected };
        Ok(correct)
    }

    pub fn advance(&mut self) -> Result<Phase, SessionError> {
        let phase = self.phase();
        let QuizSession::InProgress(run) = self else {
            return Err(self.invalid("advance"));
        };
        if !matches!(run.step, Step::Revealed { .. }) {
            return Err(SessionError::InvalidTransition {
                action: "advance",
                phase,
            });
        }

        if run.index + 1 < run.questions.len() {
            run.index += 1;
            run.step = Step::Answering { selected: None };
        } else {
            let result = QuizResult {
                questions: std::mem::take(&mut run.questions),
                question_type: run.question_type,
                score: run.score,
            };
            *self = QuizSession::Completed(result);
        }
        Ok(self.phase())
    }

    pub fn reset(&mut self) -> Result<(), SessionError> {
        match self {
            QuizSession::Setup(SetupState {
                generating: true, ..
            }) => Err(SessionError::GenerationInFlight),
            QuizSession::Setup(_) | QuizSession::Completed(_) => {
                *self = QuizSession::default();
                Ok(())
            }
            QuizSession::InProgress(_) => Err(self.invalid("restart")),
        }
    }

    /// Checks invariants that deserialisation alone cannot enforce.
    pub fn check(&self) -> Result<(), SessionError> {
        match self {
            QuizSession::Setup(setup) if setup.generating => {
                Err(SessionError::Corrupt("a posted session cannot be mid-generation"))
            }
            QuizSession::Setup(_) => Ok(()),
            QuizSession::InProgress(run) => {
                if run.questions.is_empty() {
                    return Err(SessionError::Corrupt("quiz has no questions"));
                }
                if run.index >= run.questions.len() {
                    return Err(SessionError::Corrupt("question index out of range"));
                }
                let answered = match run.step {
                    Step::Answering { .. } => run.index,
                    Step::Revealed { .. } => run.index + 1,
                };
                if run.score > answered {
                    return Err(SessionError::Corrupt("score exceeds answered questions"));
                }
                if run
                    .questions
                    .iter()
                    .any(|q| q.choices(run.question_type).is_empty())
                {
                    return Err(SessionError::Corrupt("question has no choices"));
                }
                Ok(())
            }
            QuizSession::Completed(result) => {
                if result.questions.is_empty() {
                    return Err(SessionError::Corrupt("quiz has no questions"));
                }
                if result.score > result.questions.len() {
                    return Err(SessionError::Corrupt("score exceeds question count"));
                }
                Ok(())
            }
        }
    }
}
