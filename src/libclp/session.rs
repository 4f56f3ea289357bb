use crate::libclp::question::{MissedQuestion, Question, Quiz};
use log::{debug, warn};
use rand::rng;
use rand::seq::SliceRandom;
use rand::Rng;
use serde::Serialize;
use std::sync::Arc;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SessionError {
    #[error("no quiz attempt has been started")]
    NotStarted,
    #[error("the quiz attempt is already completed")]
    Completed,
    #[error("quiz `{0}` has no questions")]
    EmptyQuiz(String),
    #[error("the current question has already been answered")]
    AlreadyAnswered,
    #[error("the current question has not been answered yet")]
    Unanswered,
    #[error("the current question has no option {0}")]
    NoSuchOption(usize),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    NotStarted,
    Unanswered,
    Answered,
    Completed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verdict {
    Correct,
    Incorrect,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Step {
    Next,
    Finished(ResultSummary),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResultSummary {
    pub quiz_id: String,
    pub quiz_name: String,
    pub score: usize,
    pub total: usize,
    pub missed: Vec<MissedQuestion>,
}

impl ResultSummary {
    /// `100 * score / total` rounded half up, or 0 for an empty quiz.
    pub fn percentage(&self) -> usize {
        if self.total == 0 {
            return 0;
        }
        (200 * self.score + self.total) / (2 * self.total)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Answer {
    Unanswered,
    Answered(String),
}

#[derive(Debug, Clone)]
struct Attempt {
    quiz: Arc<Quiz>,
    order: Vec<usize>,
    position: usize,
    answer: Answer,
    score: usize,
    missed: Vec<MissedQuestion>,
}

impl Attempt {
    fn current(&self) -> &Question {
        &self.quiz.questions[self.order[self.position]]
    }

    fn summary(&self) -> ResultSummary {
        ResultSummary {
            quiz_id: self.quiz.id.clone(),
            quiz_name: self.quiz.name.clone(),
            score: self.score,
            total: self.order.len(),
            missed: self.missed.clone(),
        }
    }
}

#[derive(Debug, Clone, Default)]
enum State {
    #[default]
    NotStarted,
    InProgress(Attempt),
    Completed(Attempt, ResultSummary),
}

/// Drives one quiz attempt at a time. Out-of-sequence calls return a
/// [`SessionError`] and leave the state untouched.
#[derive(Debug, Clone, Default)]
pub struct Session {
    state: State,
}

impl Session {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn start(&mut self, quiz: Arc<Quiz>) -> Result<(), SessionError> {
        self.start_with_rng(quiz, &mut rng())
    }

    /// Starts a fresh attempt, shuffling the question order with `rng`.
    /// Any previous attempt is discarded.
    pub fn start_with_rng<R: Rng + ?Sized>(
        &mut self,
        quiz: Arc<Quiz>,
        rng: &mut R,
    ) -> Result<(), SessionError> {
        if quiz.is_empty() {
            warn!("[Session] Quiz {} has no questions, not starting", quiz.id);
            return Err(SessionError::EmptyQuiz(quiz.id.clone()));
        }

        let mut order: Vec<usize> = (0..quiz.len()).collect();
        order.shuffle(rng);
        debug!("[Session] Started {} with order {:?}", quiz.id, order);

        self.state = State::InProgress(Attempt {
            quiz,
            order,
            position: 0,
            answer: Answer::Unanswered,
            score: 0,
            missed: Vec::new(),
        });
        Ok(())
    }

    pub fn select_option(&mut self, option: &str) -> Result<Verdict, SessionError> {
        let attempt = self.attempt_mut()?;
        if attempt.answer != Answer::Unanswered {
            return Err(SessionError::AlreadyAnswered);
        }

        let question = attempt.current();
        let verdict = if question.is_correct(option) {
            Verdict::Correct
        } else {
            Verdict::Incorrect
        };
        debug!(
            "[Session] Question {} answered {:?}: {:?}",
            question.id, option, verdict
        );

        match verdict {
            Verdict::Correct => attempt.score += 1,
            Verdict::Incorrect => {
                let missed = question.snapshot();
                attempt.missed.push(missed);
            }
        }
        attempt.answer = Answer::Answered(option.to_string());
        Ok(verdict)
    }

    /// Selects the option at `index` (0-based) of the current question.
    pub fn select_index(&mut self, index: usize) -> Result<Verdict, SessionError> {
        let option = match &self.state {
            State::NotStarted => return Err(SessionError::NotStarted),
            State::Completed(..) => return Err(SessionError::Completed),
            State::InProgress(attempt) if attempt.answer != Answer::Unanswered => {
                return Err(SessionError::AlreadyAnswered)
            }
            State::InProgress(attempt) => attempt
                .current()
                .options
                .get(index)
                .cloned()
                .ok_or(SessionError::NoSuchOption(index))?,
        };
        self.select_option(&option)
    }

    pub fn advance(&mut self) -> Result<Step, SessionError> {
        let attempt = self.attempt_mut()?;
        if attempt.answer == Answer::Unanswered {
            return Err(SessionError::Unanswered);
        }

        if attempt.position + 1 < attempt.order.len() {
            attempt.position += 1;
            attempt.answer = Answer::Unanswered;
            return Ok(Step::Next);
        }

        let summary = attempt.summary();
        debug!(
            "[Session] Completed {} with {}/{}",
            summary.quiz_id, summary.score, summary.total
        );
        if let State::InProgress(attempt) = std::mem::take(&mut self.state) {
            self.state = State::Completed(attempt, summary.clone());
        }
        Ok(Step::Finished(summary))
    }

    pub fn restart(&mut self) {
        debug!("[Session] Restarting");
        self.state = State::NotStarted;
    }

    fn attempt_mut(&mut self) -> Result<&mut Attempt, SessionError> {
        match &mut self.state {
            State::NotStarted => Err(SessionError::NotStarted),
            State::InProgress(attempt) => Ok(attempt),
            State::Completed(..) => Err(SessionError::Completed),
        }
    }

    fn attempt(&self) -> Option<&Attempt> {
        match &self.state {
            State::NotStarted => None,
            State::InProgress(attempt) | State::Completed(attempt, _) => Some(attempt),
        }
    }

    pub fn phase(&self) -> Phase {
        match &self.state {
            State::NotStarted => Phase::NotStarted,
            State::InProgress(attempt) => match attempt.answer {
                Answer::Unanswered => Phase::Unanswered,
                Answer::Answered(_) => Phase::Answered,
            },
            State::Completed(..) => Phase::Completed,
        }
    }

    pub fn quiz(&self) -> Option<&Quiz> {
        self.attempt().map(|attempt| attempt.quiz.as_ref())
    }

    /// The question being shown, `None` unless an attempt is in progress.
    pub fn current_question(&self) -> Option<&Question> {
        match &self.state {
            State::InProgress(attempt) => Some(attempt.current()),
            _ => None,
        }
    }

    /// 0-based index into the shuffled order.
    pub fn position(&self) -> usize {
        self.attempt().map_or(0, |attempt| attempt.position)
    }

    pub fn total(&self) -> usize {
        self.attempt().map_or(0, |attempt| attempt.order.len())
    }

    pub fn is_last(&self) -> bool {
        self.attempt()
            .is_some_and(|attempt| attempt.position + 1 == attempt.order.len())
    }

    pub fn is_answered(&self) -> bool {
        self.phase() == Phase::Answered
    }

    pub fn selected_option(&self) -> Option<&str> {
        match &self.state {
            State::InProgress(Attempt {
                answer: Answer::Answered(option),
                ..
            }) => Some(option.as_str()),
            _ => None,
        }
    }

    pub fn score(&self) -> usize {
        self.attempt().map_or(0, |attempt| attempt.score)
    }

    pub fn missed(&self) -> &[MissedQuestion] {
        self.attempt()
            .map(|attempt| attempt.missed.as_slice())
            .unwrap_or_default()
    }

    pub fn summary(&self) -> Option<&ResultSummary> {
        match &self.state {
            State::Completed(_, summary) => Some(summary),
            _ => None,
        }
    }
}
