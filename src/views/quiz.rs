use maud::{html, Markup};

use crate::models::question::QuestionType;
use crate::models::session::{Phase, QuizSession, SetupState};

const DIFFICULTIES: [(&str, &str); 3] = [("easy", "Easy"), ("medium", "Medium"), ("hard", "Hard")];
const QUESTION_TYPES: [(QuestionType, &str); 2] = [
    (QuestionType::Mcq, "Multiple Choice"),
    (QuestionType::Tf, "True/False"),
];

const DISABLE_ON_SUBMIT: &str = "var b = document.getElementById('generate-btn'); \
     b.disabled = true; b.textContent = 'Generating Quiz...';";
const TOGGLE_ON_INPUT: &str =
    "document.getElementById('generate-btn').disabled = !this.value.trim();";

/// `max_questions` bounds the count input to what the server will generate.
pub fn setup(setup: &SetupState, can_generate: bool, token: &str, max_questions: usize) -> Markup {
    let form = &setup.form;
    html! {
        div class="card" {
            @if let Some(alert) = &setup.alert {
                div class="alert" role="alert" { (alert) }
            }
            form method="post" action="/session" onsubmit=(DISABLE_ON_SUBMIT) {
                input type="hidden" name="state" value=(token);
                input type="hidden" name="action" value="generate";

                label for="topic" { "Topic:" }
                input id="topic" type="text" name="topic" value=(form.topic)
                    placeholder="Enter quiz topic..." oninput=(TOGGLE_ON_INPUT) required;

                label for="difficulty" { "Difficulty:" }
                select id="difficulty" name="difficulty" {
                    @for (value, label) in DIFFICULTIES {
                        option value=(value) selected[form.difficulty == value] { (label) }
                    }
                }

                label for="num_questions" { "Questions:" }
                input id="num_questions" type="number" name="num_questions"
                    min="1" max=(max_questions) value=(form.num_questions);

                label for="question_type" { "Type:" }
                select id="question_type" name="question_type" {
                    @for (kind, label) in QUESTION_TYPES {
                        option value=(kind.as_str()) selected[form.question_type == kind] { (label) }
                    }
                }

                button id="generate-btn" type="submit" disabled[!can_generate] {
                    @if setup.generating { "Generating Quiz..." } @else { "Generate Quiz" }
                }
            }
        }
    }
}

pub fn question(session: &QuizSession, token: &str) -> Markup {
    let Some(current) = session.current_question() else {
        return html! {};
    };
    let (index, revealed) = match session.phase() {
        Phase::Answering(i) => (i, false),
        Phase::Revealed(i) => (i, true),
        _ => (0, false),
    };
    let is_last = index + 1 == session.total();

    html! {
        div class="card" {
            div class="question-header" {
                h2 { "Question " (index + 1) "/" (session.total()) }
                span class="badge" { (current.difficulty.to_uppercase()) }
            }
            h3 { (current.question) }

            form method="post" action="/session" {
                input type="hidden" name="state" value=(token);
                div class="options" {
                    @for choice in session.choices() {
                        button type="submit" name="select" value=(choice)
                            class=(session.option_state(&choice).css_class()) disabled[revealed] {
                            (choice)
                        }
                    }
                }

                @if revealed {
                    div class="explanation" {
                        h4 { "Explanation:" }
                        p { (current.explanation) }
                    }
                    button type="submit" name="action" value="next" {
                        @if is_last { "Finish Quiz" } @else { "Next Question" }
                    }
                } @else {
                    button type="submit" name="action" value="submit" disabled[!session.can_submit()] {
                        "Submit Answer"
                    }
                }
            }
        }
    }
}

pub fn summary(session: &QuizSession, token: &str) -> Markup {
    html! {
        div class="card summary" {
            h2 { "Quiz Completed!" }
            p { "You scored " (session.score()) " out of " (session.total()) " questions" }
            form method="post" action="/session" {
                input type="hidden" name="state" value=(token);
                button type="submit" name="action" value="restart" { "Generate New Quiz" }
            }
        }
    }
}
