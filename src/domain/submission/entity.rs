// src/domain/submission/entity.rs

use std::{fmt, str::FromStr};

use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

use super::error::SubmissionError;
use crate::{
    domain::lifecycle::Tracked,
    utils::random::{SUBMISSION_CODE_LENGTH, new_id, random_alphanumeric},
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SubmissionStatus {
    InProgress,
    Submitted,
    Canceled,
}

impl SubmissionStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            SubmissionStatus::InProgress => "inprogress",
            SubmissionStatus::Submitted => "submitted",
            SubmissionStatus::Canceled => "canceled",
        }
    }
}

impl fmt::Display for SubmissionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SubmissionStatus {
    type Err = SubmissionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "inprogress" => Ok(SubmissionStatus::InProgress),
            "submitted" => Ok(SubmissionStatus::Submitted),
            "canceled" => Ok(SubmissionStatus::Canceled),
            other => Err(SubmissionError::InvalidStatus(other.to_string())),
        }
    }
}

/// An anonymous attempt at a published module.
///
/// Status only moves forward: `InProgress` to `Submitted` or `Canceled`.
/// Answers can only be appended while in progress, and `total_questions` is
/// the question count captured when the attempt started.
#[derive(Debug, Clone)]
pub struct Submission {
    pub id: Uuid,
    pub module_id: Uuid,
    pub code: String,
    pub student_name: String,
    pub status: SubmissionStatus,
    pub total_questions: i64,
    pub submitted_at: Option<DateTime<Utc>>,
    pub answers: Vec<Tracked<SubmissionAnswer>>,
}

impl Submission {
    pub fn new(module_id: Uuid, student_name: String, total_questions: i64) -> Tracked<Submission> {
        Tracked::created(Submission {
            id: new_id(),
            module_id,
            code: random_alphanumeric(SUBMISSION_CODE_LENGTH),
            student_name,
            status: SubmissionStatus::InProgress,
            total_questions,
            submitted_at: None,
            answers: Vec::new(),
        })
    }

    pub fn is_in_progress(&self) -> bool {
        self.status == SubmissionStatus::InProgress
    }

    pub fn is_submitted(&self) -> bool {
        self.status == SubmissionStatus::Submitted
    }

    pub fn is_canceled(&self) -> bool {
        self.status == SubmissionStatus::Canceled
    }

    pub fn has_answered_question(&self, question_slug: &str) -> bool {
        self.answers.iter().any(|a| a.question_slug == question_slug)
    }

    /// Number of correct answers so far.
    pub fn score(&self) -> i64 {
        self.answers.iter().filter(|a| a.is_correct).count() as i64
    }
}

impl Tracked<Submission> {
    pub fn submit(&mut self) -> Result<(), SubmissionError> {
        self.try_update(|s| {
            if !s.is_in_progress() {
                return Err(SubmissionError::CannotSubmit);
            }
            s.status = SubmissionStatus::Submitted;
            Ok(())
        })
    }

    pub fn cancel(&mut self) -> Result<(), SubmissionError> {
        self.try_update(|s| {
            if !s.is_in_progress() {
                return Err(SubmissionError::CannotCancel);
            }
            s.status = SubmissionStatus::Canceled;
            Ok(())
        })
    }

    /// Submits and stamps `submitted_at`.
    pub fn finalize(&mut self) -> Result<(), SubmissionError> {
        if !self.is_in_progress() {
            return Err(SubmissionError::SubmissionAlreadyDone);
        }
        self.submit()?;
        self.update(|s| s.submitted_at = Some(Utc::now()));
        Ok(())
    }

    pub fn add_answer(&mut self, answer: Tracked<SubmissionAnswer>) -> Result<(), SubmissionError> {
        self.try_update(|s| {
            if !s.is_in_progress() {
                return Err(SubmissionError::SubmissionAlreadyDone);
            }
            s.answers.push(answer);
            Ok(())
        })
    }
}

/// One answered question. Question and answer text are copied in so the
/// record survives later edits to the module.
#[derive(Debug, Clone)]
pub struct SubmissionAnswer {
    pub id: Uuid,
    pub submission_id: Uuid,
    pub question_slug: String,
    pub question: String,
    pub answer: String,
    pub is_correct: bool,
}

impl SubmissionAnswer {
    pub fn new(
        submission_id: Uuid,
        question_slug: String,
        question: String,
        answer: String,
        is_correct: bool,
    ) -> Tracked<SubmissionAnswer> {
        Tracked::created(SubmissionAnswer {
            id: new_id(),
            submission_id,
            question_slug,
            question,
            answer,
            is_correct,
        })
    }
}

// Read-only views of foreign aggregates, produced by `ModuleAcl`.

#[derive(Debug, Clone)]
pub struct Grade {
    pub id: Uuid,
    pub name: String,
}

#[derive(Debug, Clone)]
pub struct Subject {
    pub id: Uuid,
    pub name: String,
}

#[derive(Debug, Clone)]
pub struct Module {
    pub id: Uuid,
    pub slug: String,
    pub title: String,
    pub grade: Option<Grade>,
    pub subject: Option<Subject>,
}

#[derive(Debug, Clone)]
pub struct Choice {
    pub id: Uuid,
    pub content: String,
    pub is_correct_answer: bool,
}

#[derive(Debug, Clone)]
pub struct Question {
    pub id: Uuid,
    pub content: String,
    pub slug: String,
    pub choices: Vec<Choice>,
}

impl Question {
    pub fn choice_by_id(&self, choice_id: Uuid) -> Option<&Choice> {
        self.choices.iter().find(|c| c.id == choice_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn in_progress() -> Tracked<Submission> {
        Tracked::loaded(Submission::new(Uuid::new_v4(), "Alice".to_string(), 3).into_inner())
    }

    fn answer(slug: &str, is_correct: bool) -> Tracked<SubmissionAnswer> {
        SubmissionAnswer::new(
            Uuid::new_v4(),
            slug.to_string(),
            "question".to_string(),
            "answer".to_string(),
            is_correct,
        )
    }

    #[test]
    fn test_new_submission_starts_in_progress() {
        let submission = Submission::new(Uuid::new_v4(), "Alice".to_string(), 5);
        assert!(submission.is_created());
        assert!(submission.is_in_progress());
        assert_eq!(submission.code.len(), SUBMISSION_CODE_LENGTH);
        assert_eq!(submission.total_questions, 5);
        assert!(submission.submitted_at.is_none());
    }

    #[test]
    fn test_finalize_stamps_and_submits() {
        let mut submission = in_progress();
        submission.finalize().unwrap();
        assert!(submission.is_submitted());
        assert!(submission.submitted_at.is_some());
        assert!(submission.is_updated());
    }

    #[test]
    fn test_terminal_states_reject_every_transition() {
        let mut submitted = in_progress();
        submitted.submit().unwrap();
        let mut canceled = in_progress();
        canceled.cancel().unwrap();

        for submission in [&mut submitted, &mut canceled] {
            assert!(matches!(submission.submit(), Err(SubmissionError::CannotSubmit)));
            assert!(matches!(submission.cancel(), Err(SubmissionError::CannotCancel)));
            assert!(matches!(
                submission.finalize(),
                Err(SubmissionError::SubmissionAlreadyDone)
            ));
            assert!(matches!(
                submission.add_answer(answer("q1", true)),
                Err(SubmissionError::SubmissionAlreadyDone)
            ));
            assert!(submission.answers.is_empty());
        }
    }

    #[test]
    fn test_status_is_unchanged_after_rejected_transition() {
        let mut submission = in_progress();
        submission.cancel().unwrap();
        let _ = submission.submit();
        assert!(submission.is_canceled());
        assert!(submission.submitted_at.is_none());
    }

    #[test]
    fn test_score_counts_correct_answers() {
        let mut submission = in_progress();
        submission.add_answer(answer("q1", true)).unwrap();
        submission.add_answer(answer("q2", false)).unwrap();
        submission.add_answer(answer("q3", true)).unwrap();

        assert_eq!(submission.score(), 2);
        assert_eq!(submission.score(), 2);
        assert!(submission.has_answered_question("q2"));
        assert!(!submission.has_answered_question("q4"));
    }

    #[test]
    fn test_status_round_trips_through_text() {
        for status in [
            SubmissionStatus::InProgress,
            SubmissionStatus::Submitted,
            SubmissionStatus::Canceled,
        ] {
            assert_eq!(status.as_str().parse::<SubmissionStatus>().unwrap(), status);
        }
        assert!(matches!(
            "done".parse::<SubmissionStatus>(),
            Err(SubmissionError::InvalidStatus(_))
        ));
    }
}
