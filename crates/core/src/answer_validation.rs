//! Answer validation for questions.
//!
//! A question carries a set of question types (`text`, `file`) and one
//! validation strategy. The result of validating a submission is
//! tri-state: `Some(true)` correct, `Some(false)` wrong, `None` undecided
//! (waits for a manual review).

use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::error::CoreError;

// ---------------------------------------------------------------------------
// Constants
// ---------------------------------------------------------------------------

pub const QUESTION_TYPE_TEXT: &str = "text";
pub const QUESTION_TYPE_FILE: &str = "file";

/// All valid question types.
pub const VALID_QUESTION_TYPES: &[&str] = &[QUESTION_TYPE_TEXT, QUESTION_TYPE_FILE];

pub const VALIDATION_TEXT_EXACT: &str = "text_exact";
pub const VALIDATION_TEXT_CONTAINS: &str = "text_contains";
pub const VALIDATION_REGEX: &str = "regex";
pub const VALIDATION_MANUAL: &str = "manual";

/// All valid answer validation types.
pub const VALID_VALIDATION_TYPES: &[&str] = &[
    VALIDATION_TEXT_EXACT,
    VALIDATION_TEXT_CONTAINS,
    VALIDATION_REGEX,
    VALIDATION_MANUAL,
];

pub const ANSWER_STATUS_SUCCESS: &str = "success";
pub const ANSWER_STATUS_FAILED: &str = "failed";
pub const ANSWER_STATUS_PENDING: &str = "pending";

// ---------------------------------------------------------------------------
// Question types
// ---------------------------------------------------------------------------

/// What a question expects the member to submit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QuestionType {
    Text,
    File,
}

impl QuestionType {
    /// Convert from a database string value.
    pub fn from_str_value(s: &str) -> Result<Self, String> {
        match s {
            QUESTION_TYPE_TEXT => Ok(Self::Text),
            QUESTION_TYPE_FILE => Ok(Self::File),
            _ => Err(format!(
                "Invalid question type '{s}'. Must be one of: {}",
                VALID_QUESTION_TYPES.join(", ")
            )),
        }
    }

    /// Convert to the database string value.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Text => QUESTION_TYPE_TEXT,
            Self::File => QUESTION_TYPE_FILE,
        }
    }
}

// ---------------------------------------------------------------------------
// Validation strategies
// ---------------------------------------------------------------------------

/// How a text submission is checked against the stored answers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AnswerValidationType {
    TextExact,
    TextContains,
    Regex,
    Manual,
}

impl AnswerValidationType {
    /// Convert from a database string value.
    pub fn from_str_value(s: &str) -> Result<Self, String> {
        match s {
            VALIDATION_TEXT_EXACT => Ok(Self::TextExact),
            VALIDATION_TEXT_CONTAINS => Ok(Self::TextContains),
            VALIDATION_REGEX => Ok(Self::Regex),
            VALIDATION_MANUAL => Ok(Self::Manual),
            _ => Err(format!(
                "Invalid answer validation type '{s}'. Must be one of: {}",
                VALID_VALIDATION_TYPES.join(", ")
            )),
        }
    }

    /// Convert to the database string value.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::TextExact => VALIDATION_TEXT_EXACT,
            Self::TextContains => VALIDATION_TEXT_CONTAINS,
            Self::Regex => VALIDATION_REGEX,
            Self::Manual => VALIDATION_MANUAL,
        }
    }

    /// Check `submitted` against any of `correct_answers`.
    ///
    /// * `TextExact` - equal to one of the answers.
    /// * `TextContains` - one of the answers is a substring of the submission.
    /// * `Regex` - one of the patterns matches at the start of the submission.
    ///   Patterns that fail to compile never match.
    /// * `Manual` - always undecided.
    pub fn validate(&self, submitted: &str, correct_answers: &[String]) -> Option<bool> {
        match self {
            Self::TextExact => Some(correct_answers.iter().any(|a| a == submitted)),
            Self::TextContains => Some(
                correct_answers
                    .iter()
                    .any(|a| submitted.contains(a.as_str())),
            ),
            Self::Regex => Some(
                correct_answers
                    .iter()
                    .filter_map(|pattern| compile_anchored(pattern))
                    .any(|re| re.is_match(submitted)),
            ),
            Self::Manual => None,
        }
    }
}

/// Compile a stored pattern so it only matches at the start of the input.
fn compile_anchored(pattern: &str) -> Option<Regex> {
    Regex::new(&format!("^(?:{pattern})")).ok()
}

/// Stored regex answers that do not compile, for the caller to report.
pub fn invalid_regex_patterns(correct_answers: &[String]) -> Vec<&str> {
    correct_answers
        .iter()
        .map(String::as_str)
        .filter(|pattern| compile_anchored(pattern).is_none())
        .collect()
}

// ---------------------------------------------------------------------------
// Question-level validation
// ---------------------------------------------------------------------------

/// The parts of a question that decide how its answers are validated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuestionRules {
    pub is_by_pass: bool,
    pub question_types: Vec<QuestionType>,
    pub validation_type: AnswerValidationType,
}

impl QuestionRules {
    /// Parse the raw column values of a question row.
    pub fn from_columns(
        is_by_pass: bool,
        question_types: &[String],
        validation_type: &str,
    ) -> Result<Self, CoreError> {
        let question_types = question_types
            .iter()
            .map(|t| QuestionType::from_str_value(t))
            .collect::<Result<Vec<_>, _>>()
            .map_err(CoreError::Internal)?;
        let validation_type =
            AnswerValidationType::from_str_value(validation_type).map_err(CoreError::Internal)?;
        Ok(Self {
            is_by_pass,
            question_types,
            validation_type,
        })
    }

    pub fn has_type(&self, question_type: QuestionType) -> bool {
        self.question_types.contains(&question_type)
    }
}

/// Decide whether a submission is correct.
///
/// Checks run in this order: bypass questions always pass, questions
/// without the `text` type are left for review, an empty submission is
/// wrong, a question without stored answers is left for review, and
/// otherwise the strategy decides.
pub fn validate_answer(
    rules: &QuestionRules,
    submitted: Option<&str>,
    correct_answers: &[String],
) -> Option<bool> {
    if rules.is_by_pass {
        return Some(true);
    }
    if !rules.has_type(QuestionType::Text) {
        return None;
    }
    let submitted = match submitted {
        Some(s) if !s.is_empty() => s,
        _ => return Some(false),
    };
    if correct_answers.is_empty() {
        return None;
    }
    rules.validation_type.validate(submitted, correct_answers)
}

/// Check that a submission carries what the question types require.
pub fn validate_submission(
    rules: &QuestionRules,
    answer: Option<&str>,
    file_count: usize,
) -> Result<(), CoreError> {
    if rules.has_type(QuestionType::Text) && answer.map_or(true, |a| a.trim().is_empty()) {
        return Err(CoreError::Validation(
            "answer is required for text questions".to_string(),
        ));
    }
    if rules.has_type(QuestionType::File) && file_count == 0 {
        return Err(CoreError::Validation(
            "at least one file is required for file questions".to_string(),
        ));
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Answer status
// ---------------------------------------------------------------------------

/// Review state of a submitted answer, derived from `is_correct`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AnswerStatus {
    Success,
    Failed,
    Pending,
}

impl AnswerStatus {
    pub fn from_result(is_correct: Option<bool>) -> Self {
        match is_correct {
            Some(true) => Self::Success,
            Some(false) => Self::Failed,
            None => Self::Pending,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Success => ANSWER_STATUS_SUCCESS,
            Self::Failed => ANSWER_STATUS_FAILED,
            Self::Pending => ANSWER_STATUS_PENDING,
        }
    }
}

/// Default feedback stored with an automatically decided answer.
/// Undecided answers get no feedback until they are reviewed.
pub fn default_feedback(
    is_correct: Option<bool>,
    success_feedback: Option<&str>,
    failure_feedback: Option<&str>,
) -> Option<String> {
    match is_correct {
        Some(true) => success_feedback.map(str::to_string),
        Some(false) => failure_feedback.map(str::to_string),
        None => None,
    }
}
