use serde::Serialize;

pub const NO_EXPLANATION: &str = "No explanation provided.";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Question {
    /// 1-based position of the block this question came from, counting
    /// every block in the file, including the ones that were dropped.
    pub id: usize,
    pub question: String,
    pub options: Vec<String>,
    pub correct_answer: String,
    pub explanation: String,
}

impl Question {
    pub fn is_correct(&self, option: &str) -> bool {
        self.correct_answer == option
    }

    /// Whether the answer text matches one of the options. A question where
    /// this is false can never be answered correctly.
    pub fn answer_in_options(&self) -> bool {
        self.options.iter().any(|opt| *opt == self.correct_answer)
    }

    pub fn snapshot(&self) -> MissedQuestion {
        MissedQuestion {
            question: self.question.clone(),
            correct_answer: self.correct_answer.clone(),
            explanation: self.explanation.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Quiz {
    pub id: String,
    pub name: String,
    pub questions: Vec<Question>,
}

impl Quiz {
    pub fn len(&self) -> usize {
        self.questions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.questions.is_empty()
    }
}

/// Copy of a question taken when it was answered incorrectly.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MissedQuestion {
    pub question: String,
    pub correct_answer: String,
    pub explanation: String,
}
