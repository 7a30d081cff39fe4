use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::current_timestamp;
use crate::domain::DomainError;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct QuizQuestion {
    pub question: String,
    pub options: Vec<String>,
    pub correct_index: usize,
    pub explanation: String,
}

/// A multiple-choice exam generated from aggregated context.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Quiz {
    id: String,
    name: String,
    created_at: i64,
    questions: Vec<QuizQuestion>,
}

/// Wire shape the backend is instructed to produce.
#[derive(Deserialize)]
#[serde(deny_unknown_fields)]
struct QuizPayload {
    quiz_name: String,
    questions: Vec<QuizQuestion>,
}

impl Quiz {
    pub fn reconstitute(id: String, name: String, created_at: i64, questions: Vec<QuizQuestion>) -> Self {
        Self {
            id,
            name,
            created_at,
            questions,
        }
    }

    /// Decodes raw backend text into a quiz.
    ///
    /// Text that is not JSON at all is a malformed response; JSON that does
    /// not match the quiz shape is a structured decode failure. A surrounding
    /// Markdown code fence is tolerated.
    pub fn decode(raw: &str) -> Result<Self, DomainError> {
        let body = strip_code_fence(raw);
        let value: serde_json::Value = serde_json::from_str(body)
            .map_err(|e| DomainError::malformed(format!("exam output is not JSON: {}", e)))?;

        let payload: QuizPayload = serde_json::from_value(value)
            .map_err(|e| DomainError::structured_decode(format!("exam JSON has wrong shape: {}", e)))?;

        if payload.quiz_name.trim().is_empty() {
            return Err(DomainError::structured_decode("quiz_name is empty"));
        }
        if payload.questions.is_empty() {
            return Err(DomainError::structured_decode("quiz has no questions"));
        }
        for (i, q) in payload.questions.iter().enumerate() {
            if q.options.len() < 2 {
                return Err(DomainError::structured_decode(format!(
                    "question {} has fewer than two options",
                    i
                )));
            }
            if q.correct_index >= q.options.len() {
                return Err(DomainError::structured_decode(format!(
                    "question {} has correct_index {} but {} options",
                    i,
                    q.correct_index,
                    q.options.len()
                )));
            }
        }

        Ok(Self {
            id: Uuid::new_v4().to_string(),
            name: payload.quiz_name.trim().to_string(),
            created_at: current_timestamp(),
            questions: payload.questions,
        })
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn created_at(&self) -> i64 {
        self.created_at
    }

    pub fn questions(&self) -> &[QuizQuestion] {
        &self.questions
    }
}

fn strip_code_fence(raw: &str) -> &str {
    let trimmed = raw.trim();
    let Some(rest) = trimmed.strip_prefix("```") else {
        return trimmed;
    };
    // Drop an optional language tag on the opening fence line.
    let rest = match rest.find('\n') {
        Some(pos) => &rest[pos + 1..],
        None => rest,
    };
    rest.trim_end().strip_suffix("```").unwrap_or(rest).trim()
}

#[cfg(test)]
mod tests {
    use super::*;

    const VALID: &str = r#"{
        "quiz_name": "Biology basics",
        "questions": [
            {
                "question": "What do mitochondria produce?",
                "options": ["ATP", "DNA", "Chlorophyll"],
                "correct_index": 0,
                "explanation": "Mitochondria generate ATP."
            }
        ]
    }"#;

    #[test]
    fn decode_valid_quiz() {
        let quiz = Quiz::decode(VALID).expect("decode");
        assert_eq!(quiz.name(), "Biology basics");
        assert_eq!(quiz.questions().len(), 1);
        assert_eq!(quiz.questions()[0].correct_index, 0);
    }

    #[test]
    fn decode_tolerates_code_fence() {
        let fenced = format!("```json\n{}\n```", VALID);
        assert!(Quiz::decode(&fenced).is_ok());
    }

    #[test]
    fn decode_non_json_is_malformed() {
        let err = Quiz::decode("Sure! Here is your quiz.").unwrap_err();
        assert!(matches!(err, DomainError::MalformedBackendResponse(_)));
    }

    #[test]
    fn decode_wrong_shape_is_structured_failure() {
        let err = Quiz::decode(r#"{"title": "x", "items": []}"#).unwrap_err();
        assert!(matches!(err, DomainError::StructuredDecodeFailure(_)));
    }

    #[test]
    fn decode_out_of_range_answer_is_structured_failure() {
        let raw = r#"{"quiz_name": "q", "questions": [
            {"question": "?", "options": ["a", "b"], "correct_index": 2, "explanation": ""}
        ]}"#;
        let err = Quiz::decode(raw).unwrap_err();
        assert!(matches!(err, DomainError::StructuredDecodeFailure(_)));
    }
}
