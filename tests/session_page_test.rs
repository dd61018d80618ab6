mod common;

use axum::http::StatusCode;
use common::{app_for, get_page, post_form, state_token, FakeOllama};

const THREE_QUESTIONS: &str = r#"[
  {"question": "2 + 2?", "options": ["3", "4", "5", "22"], "answer": "4", "explanation": "Basic addition."},
  {"question": "3 * 3?", "options": ["6", "9", "12", "33"], "answer": "9", "explanation": "Basic multiplication."},
  {"question": "10 / 2?", "options": ["2", "5", "8", "20"], "answer": "5", "explanation": "Basic division."}
]"#;

#[tokio::test]
async fn index_renders_setup_form() {
    let app = app_for("http://127.0.0.1:1");
    let (status, html) = get_page(&app, "/").await;

    assert_eq!(status, StatusCode::OK);
    assert!(html.contains("AI Quiz Generator"));
    assert!(html.contains(r#"name="topic""#));
    assert!(html.contains(r#"id="generate-btn" type="submit" disabled"#));
    assert!(html.contains(r#"min="1" max="50""#));
    assert!(!state_token(&html).is_empty());
}

#[tokio::test]
async fn full_quiz_scores_one_of_three() {
    let ollama = FakeOllama::replying(THREE_QUESTIONS).await;
    let app = app_for(&ollama.base_url);

    let (_, html) = get_page(&app, "/").await;
    let token = state_token(&html);
    let (status, html) = post_form(
        &app,
        "/session",
        &[
            ("state", token.as_str()),
            ("action", "generate"),
            ("topic", "Arithmetic"),
            ("difficulty", "easy"),
            ("num_questions", "3"),
            ("question_type", "mcq"),
        ],
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(ollama.calls(), 1);
    assert!(html.contains("Question 1/3"));
    assert!(html.contains(r#"value="submit" disabled"#));

    // Submitting with nothing selected changes nothing.
    let token = state_token(&html);
    let (_, html) = post_form(&app, "/session", &[("state", token.as_str()), ("action", "submit")]).await;
    assert!(html.contains("Question 1/3"));
    assert!(!html.contains("Explanation:"));

    let answers = ["4", "6", "20"];
    let mut html = html;
    for (i, answer) in answers.into_iter().enumerate() {
        let token = state_token(&html);
        let (_, selected) = post_form(&app, "/session", &[("state", token.as_str()), ("select", answer)]).await;
        assert!(selected.contains(r#"class="option selected""#));
        assert!(!selected.contains(r#"value="submit" disabled"#));

        let token = state_token(&selected);
        let (_, revealed) = post_form(&app, "/session", &[("state", token.as_str()), ("action", "submit")]).await;
        assert!(revealed.contains("Explanation:"));
        assert!(revealed.contains(r#"class="option correct""#));

        // A second submit while revealed is ignored.
        let token = state_token(&revealed);
        let (_, again) = post_form(&app, "/session", &[("state", token.as_str()), ("action", "submit")]).await;
        assert_eq!(state_token(&again), token);

        let label = if i + 1 == answers.len() { "Finish Quiz" } else { "Next Question" };
        assert!(revealed.contains(label));

        let (_, next) = post_form(&app, "/session", &[("state", token.as_str()), ("action", "next")]).await;
        html = next;
    }

    assert!(html.contains("Quiz Completed!"));
    assert!(html.contains("You scored 1 out of 3 questions"));

    let token = state_token(&html);
    let (_, html) = post_form(&app, "/session", &[("state", token.as_str()), ("action", "restart")]).await;
    let (_, fresh) = get_page(&app, "/").await;
    assert_eq!(state_token(&html), state_token(&fresh));
}

#[tokio::test]
async fn placeholder_quiz_is_playable_when_model_is_down() {
    let app = app_for("http://127.0.0.1:1");
    let (status, html) = post_form(
        &app,
        "/session",
        &[
            ("state", ""),
            ("action", "generate"),
            ("topic", "Tides"),
            ("num_questions", "2"),
            ("question_type", "tf"),
        ],
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert!(html.contains("Question 1/2"));
    assert!(html.contains("Real Tides question 1 would appear here"));
    assert!(html.contains(r#"value="True""#));
    assert!(html.contains(r#"value="False""#));
}

#[tokio::test]
async fn blank_topic_stays_on_setup() {
    let ollama = FakeOllama::replying(THREE_QUESTIONS).await;
    let app = app_for(&ollama.base_url);

    let (status, html) = post_form(
        &app,
        "/session",
        &[("state", ""), ("action", "generate"), ("topic", "   "), ("num_questions", "3")],
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert!(html.contains(r#"id="generate-btn""#));
    assert_eq!(ollama.calls(), 0);
}

#[tokio::test]
async fn invalid_count_raises_alert() {
    let ollama = FakeOllama::replying(THREE_QUESTIONS).await;
    let app = app_for(&ollama.base_url);

    let (_, html) = post_form(
        &app,
        "/session",
        &[("state", ""), ("action", "generate"), ("topic", "Rust"), ("num_questions", "zero")],
    )
    .await;

    assert!(html.contains("Failed to generate quiz. Please try again."));
    assert!(html.contains(r#"value="Rust""#));
    assert_eq!(ollama.calls(), 0);
}

#[tokio::test]
async fn unreadable_token_restarts_session() {
    let app = app_for("http://127.0.0.1:1");
    let (status, html) = post_form(&app, "/session", &[("state", "!!not-a-token!!"), ("action", "next")]).await;

    assert_eq!(status, StatusCode::OK);
    assert!(html.contains("could not be restored"));
    assert!(html.contains(r#"id="generate-btn""#));
}
