use lazy_static::lazy_static;
use regex::Regex;
use serde_json::Value;

use crate::{
    models::question::{Question, RawQuestion},
    services::generator::GenerationError,
};

lazy_static! {
    static ref CODE_FENCE_REGEX: Regex = Regex::new(r"(?i)```json|```").unwrap();
    // Greedy: first '[' through last ']'
    static ref JSON_ARRAY_REGEX: Regex = Regex::new(r"\[[\s\S]*\]").unwrap();
}

pub fn strip_code_fences(text: &str) -> String {
    CODE_FENCE_REGEX.replace_all(text, "").trim().to_string()
}

/// Pulls a JSON array of question-like values out of free-form model output.
///
/// The bracket-delimited substring is tried first, then the whole text, which
/// may also be an object wrapping the array under `quiz`.
pub fn extract_question_array(text: &str) -> Option<Vec<Value>> {
    let cleaned = strip_code_fences(text);
    if cleaned.is_empty() {
        return None;
    }

    if let Some(found) = JSON_ARRAY_REGEX.find(&cleaned) {
        if let Ok(Value::Array(items)) = serde_json::from_str::<Value>(found.as_str()) {
            return Some(items);
        }
    }

    match serde_json::from_str::<Value>(&cleaned).ok()? {
        Value::Array(items) => Some(items),
        Value::Object(mut map) => match map.remove("quiz") {
            Some(Value::Array(items)) => Some(items),
            _ => None,
        },
        _ => None,
    }
}

/// Parses model output into valid questions, dropping malformed items.
pub fn parse_generated_questions(text: &str) -> Result<Vec<Question>, GenerationError> {
    let items = extract_question_array(text)
        .ok_or_else(|| GenerationError::Parse("no JSON array in response".to_string()))?;
    if items.is_empty() {
        return Err(GenerationError::Parse("empty question array".to_string()));
    }

    let total = items.len();
    let questions: Vec<Question> = items
        .into_iter()
        .enumerate()
        .filter_map(|(index, item)| {
            serde_json::from_value::<RawQuestion>(item)
                .ok()
                .and_then(|raw| raw.into_question(index))
        })
        .collect();

    if questions.is_empty() {
        return Err(GenerationError::NoValidQuestions(total));
    }
    if questions.len() < total {
        tracing::warn!(
            "Dropped {} of {} generated questions that failed validation",
            total - questions.len(),
            total
        );
    }

    Ok(questions)
}

#[cfg(test)]
mod tests {
    use super::*;

    const ONE_QUESTION: &str = r#"[{"id":"q1","category":"SQL","question":"Which clause filters groups?","options":[{"id":"a","text":"WHERE"},{"id":"b","text":"HAVING"},{"id":"c","text":"ORDER BY"},{"id":"d","text":"LIMIT"}],"correctAnswer":"b","explanation":"HAVING filters groups."}]"#;

    #[test]
    fn strips_fences_case_insensitively() {
        assert_eq!(strip_code_fences("```JSON\n[1]\n```"), "[1]");
    }

    #[test]
    fn parses_bare_array() {
        let questions = parse_generated_questions(ONE_QUESTION).unwrap();
        assert_eq!(questions.len(), 1);
        assert_eq!(questions[0].correct_answer, "b");
    }

    #[test]
    fn parses_array_wrapped_in_prose_and_fences() {
        let text = format!(
            "Sure! Here are your questions:\n```json\n{}\n```\nGood luck.",
            ONE_QUESTION
        );
        let questions = parse_generated_questions(&text).unwrap();
        assert_eq!(questions[0].id, "q1");
    }

    #[test]
    fn falls_back_to_object_with_quiz_field() {
        // The trailing ']' in "notes" makes the bracket substring unparseable
        let text = format!(r#"{{"quiz": {}, "notes": "see item [1]"}}"#, ONE_QUESTION);
        let questions = parse_generated_questions(&text).unwrap();
        assert_eq!(questions.len(), 1);
        assert_eq!(questions[0].category, "SQL");
    }

    #[test]
    fn non_array_is_a_parse_failure() {
        assert!(matches!(
            parse_generated_questions(r#"{"message": "no"}"#),
            Err(GenerationError::Parse(_))
        ));
        assert!(matches!(
            parse_generated_questions("I cannot help with that."),
            Err(GenerationError::Parse(_))
        ));
        assert!(matches!(
            parse_generated_questions("[]"),
            Err(GenerationError::Parse(_))
        ));
    }

    #[test]
    fn invalid_items_are_dropped_not_the_batch() {
        let text = r#"[
            {"question":"Missing options","correctAnswer":"a"},
            {"question":"Q2","options":[{"id":"a","text":"1"},{"id":"b","text":"2"},{"id":"c","text":"3"},{"id":"d","text":"4"}],"correctAnswer":"d"},
            "not an object"
        ]"#;
        let questions = parse_generated_questions(text).unwrap();
        assert_eq!(questions.len(), 1);
        assert_eq!(questions[0].question, "Q2");
    }

    #[test]
    fn all_invalid_items_fail_generation() {
        let text = r#"[{"question":"Q","options":[],"correctAnswer":"a"}]"#;
        assert!(matches!(
            parse_generated_questions(text),
            Err(GenerationError::NoValidQuestions(1))
        ));
    }
}
