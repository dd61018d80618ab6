use base64::{engine::general_purpose::URL_SAFE_NO_PAD as BASE64, Engine};

use crate::error::{Error, Result};
use crate::models::session::QuizSession;

/// Serialises a session into the opaque token carried by the page.
pub fn encode(session: &QuizSession) -> Result<String> {
    let json = serde_json::to_vec(session)?;
    Ok(BASE64.encode(json))
}

/// Restores a session from a page token. An empty token is a fresh session.
pub fn decode(token: &str) -> Result<QuizSession> {
    let token = token.trim();
    if token.is_empty() {
        return Ok(QuizSession::default());
    }
    let bytes = BASE64
        .decode(token)
        .map_err(|e| Error::BadRequest(format!("Malformed session token: {}", e)))?;
    let session: QuizSession = serde_json::from_slice(&bytes)?;
    session.check()?;
    Ok(session)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::question::QuizQuestion;
    use crate::models::session::{Phase, SetupForm};

    #[test]
    fn restores_in_progress_session() {
        let mut session = QuizSession::new();
        session
            .update_form(SetupForm {
                topic: "Geography".into(),
                ..SetupForm::default()
            })
            .unwrap();
        session.begin_generation().unwrap();
        session
            .finish_generation(Ok(vec![QuizQuestion {
                question: "Capital of France?".into(),
                options: Some(vec!["Paris".into(), "Rome".into()]),
                answer: "Paris".into(),
                explanation: "Paris is the capital.".into(),
                difficulty: "easy".into(),
            }]))
            .unwrap();
        session.select("Paris").unwrap();

        let token = encode(&session).unwrap();
        assert!(token.bytes().all(|b| b.is_ascii_alphanumeric() || b == b'-' || b == b'_'));

        let restored = decode(&token).unwrap();
        assert_eq!(restored, session);
        assert_eq!(restored.phase(), Phase::Answering(0));
        assert_eq!(restored.selected(), Some("Paris"));
    }

    #[test]
    fn empty_token_is_fresh_session() {
        assert_eq!(decode("").unwrap(), QuizSession::default());
    }

    #[test]
    fn garbage_is_rejected() {
        assert!(matches!(decode("%%%"), Err(Error::BadRequest(_))));
        let not_a_session = BASE64.encode(b"{\"phase\":\"nowhere\"}");
        assert!(matches!(decode(&not_a_session), Err(Error::Json(_))));
    }

    #[test]
    fn inconsistent_session_is_rejected() {
        let forged = BASE64.encode(
            br#"{"phase":"in_progress","questions":[],"question_type":"mcq","score":0,"index":0,"step":{"step":"answering","selected":null}}"#,
        );
        assert!(matches!(decode(&forged), Err(Error::Session(_))));
    }
}
