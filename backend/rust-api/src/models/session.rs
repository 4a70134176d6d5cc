use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::question::{is_option_id, Question};

/// Time limit of a unit quiz.
pub const UNIT_QUIZ_DURATION_SECONDS: u32 = 20 * 60;
pub const UNIT_QUIZ_QUESTION_COUNT: u32 = 20;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum SessionError {
    #[error("Quiz already submitted")]
    AlreadySubmitted,
    #[error("Unknown question: {0}")]
    UnknownQuestion(String),
    #[error("Invalid option id: {0}")]
    InvalidOption(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScoreBand {
    Excellent,
    Good,
    NeedsWork,
}

impl ScoreBand {
    pub fn for_score(score: usize, total: usize) -> Self {
        if total == 0 {
            return ScoreBand::NeedsWork;
        }
        // Integer comparison keeps 80%/60% boundaries exact
        if score * 5 >= total * 4 {
            ScoreBand::Excellent
        } else if score * 5 >= total * 3 {
            ScoreBand::Good
        } else {
            ScoreBand::NeedsWork
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuestionReview {
    pub question_id: String,
    pub selected: Option<String>,
    pub correct_answer: String,
    pub is_correct: bool,
    pub explanation: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuizResult {
    pub score: usize,
    pub total: usize,
    pub percentage: u32,
    pub band: ScoreBand,
    pub reviews: Vec<QuestionReview>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GradeQuizRequest {
    pub questions: Vec<Question>,
    /// Question id → option id.
    #[serde(default)]
    pub answers: HashMap<String, String>,
    /// Defaults to the unit quiz limit.
    #[serde(default)]
    pub time_limit_seconds: Option<u32>,
    /// Seconds the client spent before submitting, if it tracked them.
    #[serde(default)]
    pub elapsed_seconds: Option<u32>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GradedQuiz {
    #[serde(flatten)]
    pub result: QuizResult,
    pub answered_percentage: f64,
    /// True when the elapsed time ran the countdown out.
    pub timed_out: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub time_taken: Option<String>,
}

/// Replays a client submission through a [`QuizSession`] so answers get the
/// same validation and timer rules as an interactive run.
pub fn grade_submission(request: GradeQuizRequest) -> Result<GradedQuiz, SessionError> {
    let time_limit = request
        .time_limit_seconds
        .unwrap_or(UNIT_QUIZ_DURATION_SECONDS);
    let mut session = QuizSession::new(request.questions, time_limit);

    for (question_id, option_id) in &request.answers {
        session.select_answer(question_id, option_id.trim())?;
    }
    let answered_percentage = session.progress_percentage();

    let timed_out = request
        .elapsed_seconds
        .is_some_and(|elapsed| session.advance(elapsed));
    let time_taken = request
        .elapsed_seconds
        .map(|elapsed| format_time(elapsed.min(time_limit)));

    Ok(GradedQuiz {
        result: session.submit().clone(),
        answered_percentage,
        timed_out,
        time_taken,
    })
}

/// Scores `answers` (question id → option id) against the question set.
pub fn grade(questions: &[Question], answers: &HashMap<String, String>) -> QuizResult {
    let reviews: Vec<QuestionReview> = questions
        .iter()
        .map(|question| {
            let selected = answers.get(&question.id).cloned();
            let is_correct = selected.as_deref() == Some(question.correct_answer.as_str());
            QuestionReview {
                question_id: question.id.clone(),
                selected,
                correct_answer: question.correct_answer.clone(),
                is_correct,
                explanation: question.explanation.clone(),
            }
        })
        .collect();

    let score = reviews.iter().filter(|review| review.is_correct).count();
    let total = questions.len();
    let percentage = if total == 0 {
        0
    } else {
        ((score as f64 / total as f64) * 100.0).round() as u32
    };

    QuizResult {
        score,
        total,
        percentage,
        band: ScoreBand::for_score(score, total),
        reviews,
    }
}

pub fn format_time(seconds: u32) -> String {
    format!("{:02}:{:02}", seconds / 60, seconds % 60)
}

/// One run through a quiz: answers, countdown and submission lock.
///
/// The session locks while the countdown runs. When the timer reaches zero
/// the quiz is submitted automatically and the lock released. Moving between
/// questions is left to the client.
#[derive(Debug, Clone)]
pub struct QuizSession {
    questions: Vec<Question>,
    answers: HashMap<String, String>,
    remaining_seconds: u32,
    locked: bool,
    result: Option<QuizResult>,
}

impl QuizSession {
    pub fn new(questions: Vec<Question>, duration_seconds: u32) -> Self {
        let running = !questions.is_empty() && duration_seconds > 0;
        Self {
            questions,
            answers: HashMap::new(),
            remaining_seconds: if running { duration_seconds } else { 0 },
            locked: running,
            result: None,
        }
    }

    pub fn remaining_seconds(&self) -> u32 {
        self.remaining_seconds
    }

    pub fn is_locked(&self) -> bool {
        self.locked
    }

    pub fn result(&self) -> Option<&QuizResult> {
        self.result.as_ref()
    }

    pub fn selected(&self, question_id: &str) -> Option<&str> {
        self.answers.get(question_id).map(String::as_str)
    }

    pub fn select_answer(&mut self, question_id: &str, option_id: &str) -> Result<(), SessionError> {
        if self.result.is_some() {
            return Err(SessionError::AlreadySubmitted);
        }
        if !self.questions.iter().any(|q| q.id == question_id) {
            return Err(SessionError::UnknownQuestion(question_id.to_string()));
        }
        if !is_option_id(option_id) {
            return Err(SessionError::InvalidOption(option_id.to_string()));
        }
        self.answers
            .insert(question_id.to_string(), option_id.to_string());
        Ok(())
    }

    /// Advances the countdown by one second. Returns the result when this
    /// tick expired the timer.
    pub fn tick(&mut self) -> Option<&QuizResult> {
        if !self.locked || self.result.is_some() {
            return None;
        }
        self.remaining_seconds = self.remaining_seconds.saturating_sub(1);
        if self.remaining_seconds == 0 {
            self.submit();
            return self.result.as_ref();
        }
        None
    }

    /// Runs the countdown for `seconds`. Returns true when the timer expired.
    pub fn advance(&mut self, seconds: u32) -> bool {
        for _ in 0..seconds {
            if !self.locked {
                break;
            }
            if self.tick().is_some() {
                return true;
            }
        }
        false
    }

    /// Scores the session. Submitting twice returns the first result.
    pub fn submit(&mut self) -> &QuizResult {
        self.locked = false;
        self.remaining_seconds = 0;
        let (questions, answers) = (&self.questions, &self.answers);
        self.result.get_or_insert_with(|| grade(questions, answers))
    }

    pub fn progress_percentage(&self) -> f64 {
        if self.questions.is_empty() {
            return 0.0;
        }
        (self.answers.len() as f64 / self.questions.len() as f64) * 100.0
    }
}
