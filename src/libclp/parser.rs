use crate::libclp::question::{Question, Quiz, NO_EXPLANATION};
use log::debug;
use std::fmt;

const QUESTION_TAG: &str = "Q\\";
const OPTION_TAG: &str = "O\\";
const ANSWER_TAG: &str = "A\\";
const EXPLANATION_TAG: &str = "E\\";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Tag {
    Question,
    Option,
    Answer,
    Explanation,
}

/// Matches a trimmed line against the known tags, returning the tag and the
/// trimmed text after it.
fn tagged(line: &str) -> Option<(Tag, &str)> {
    [
        (QUESTION_TAG, Tag::Question),
        (OPTION_TAG, Tag::Option),
        (ANSWER_TAG, Tag::Answer),
        (EXPLANATION_TAG, Tag::Explanation),
    ]
    .into_iter()
    .find_map(|(prefix, tag)| line.strip_prefix(prefix).map(|rest| (tag, rest.trim())))
}

/// Splits the text into blocks of trimmed, non-blank lines. Any run of
/// whitespace-only lines is one separator, and the text is trimmed first so
/// leading or trailing blank lines never yield an empty block. A leading
/// byte-order mark is not part of the first line.
fn split_blocks(text: &str) -> Vec<Vec<&str>> {
    let mut blocks = Vec::new();
    let mut current: Vec<&str> = Vec::new();
    let text = text.trim_start_matches('\u{FEFF}');
    for line in text.trim().lines().map(str::trim) {
        if line.is_empty() {
            if !current.is_empty() {
                blocks.push(std::mem::take(&mut current));
            }
        } else {
            current.push(line);
        }
    }
    if !current.is_empty() {
        blocks.push(current);
    }
    blocks
}

#[derive(Debug, Default)]
struct Draft<'a> {
    question: &'a str,
    options: Vec<&'a str>,
    answer: &'a str,
    explanation: String,
    unknown: Vec<&'a str>,
}

impl<'a> Draft<'a> {
    fn read(lines: &[&'a str]) -> Self {
        let mut draft = Draft::default();
        for line in lines {
            match tagged(line) {
                Some((Tag::Question, text)) => draft.question = text,
                Some((Tag::Option, text)) => draft.options.push(text),
                Some((Tag::Answer, text)) => draft.answer = text,
                Some((Tag::Explanation, text)) => {
                    draft.explanation.push_str(text);
                    draft.explanation.push(' ');
                }
                None => draft.unknown.push(line),
            }
        }
        draft
    }

    fn is_complete(&self) -> bool {
        !self.question.is_empty() && !self.options.is_empty() && !self.answer.is_empty()
    }

    fn into_question(self, id: usize) -> Question {
        let explanation = match self.explanation.trim() {
            "" => NO_EXPLANATION.to_string(),
            text => text.to_string(),
        };
        Question {
            id,
            question: self.question.to_string(),
            options: self.options.into_iter().map(String::from).collect(),
            correct_answer: self.answer.to_string(),
            explanation,
        }
    }
}

fn leads_with_question(lines: &[&str]) -> bool {
    lines
        .first()
        .is_some_and(|line| line.starts_with(QUESTION_TAG))
}

/// Parses a quiz file into a [`Quiz`]. Blocks that do not lead with `Q\`, or
/// that end up without question text, options or an answer, are dropped.
/// Question ids are block positions in the unfiltered split.
pub fn parse_quiz_text(text: &str, id: &str, name: &str) -> Quiz {
    let blocks = split_blocks(text);
    let mut questions = Vec::with_capacity(blocks.len());

    for (index, lines) in blocks.iter().enumerate() {
        let block_id = index + 1;
        if !leads_with_question(lines) {
            debug!("[Parse] {}: block {} does not start with a question, skipping", id, block_id);
            continue;
        }
        let draft = Draft::read(lines);
        if !draft.is_complete() {
            debug!("[Parse] {}: block {} is incomplete, dropping", id, block_id);
            continue;
        }
        questions.push(draft.into_question(block_id));
    }

    debug!(
        "[Parse] {}: {} of {} blocks became questions",
        id,
        questions.len(),
        blocks.len()
    );
    Quiz {
        id: id.to_string(),
        name: name.to_string(),
        questions,
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Finding {
    NotAQuestion { block: usize, first_line: String },
    MissingQuestion { block: usize },
    NoOptions { block: usize },
    MissingAnswer { block: usize },
    AnswerNotInOptions { block: usize, answer: String },
    UnknownTag { block: usize, line: String },
}

impl Finding {
    pub fn block(&self) -> usize {
        match self {
            Finding::NotAQuestion { block, .. }
            | Finding::MissingQuestion { block }
            | Finding::NoOptions { block }
            | Finding::MissingAnswer { block }
            | Finding::AnswerNotInOptions { block, .. }
            | Finding::UnknownTag { block, .. } => *block,
        }
    }

    /// Whether the finding means the block is left out of the parsed quiz.
    pub fn drops_block(&self) -> bool {
        matches!(
            self,
            Finding::NotAQuestion { .. }
                | Finding::MissingQuestion { .. }
                | Finding::NoOptions { .. }
                | Finding::MissingAnswer { .. }
        )
    }
}

impl fmt::Display for Finding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Finding::NotAQuestion { block, first_line } => {
                write!(f, "block {block} does not start with `Q\\` ({first_line:?})")
            }
            Finding::MissingQuestion { block } => write!(f, "block {block} has no question text"),
            Finding::NoOptions { block } => write!(f, "block {block} has no `O\\` options"),
            Finding::MissingAnswer { block } => write!(f, "block {block} has no `A\\` answer"),
            Finding::AnswerNotInOptions { block, answer } => {
                write!(f, "block {block} answer {answer:?} matches none of its options")
            }
            Finding::UnknownTag { block, line } => {
                write!(f, "block {block} has an unrecognised line {line:?}")
            }
        }
    }
}

/// Walks the same blocks as [`parse_quiz_text`] and reports everything that
/// got dropped, ignored, or that makes a kept question unanswerable.
pub fn inspect(text: &str) -> Vec<Finding> {
    let mut findings = Vec::new();

    for (index, lines) in split_blocks(text).iter().enumerate() {
        let block = index + 1;
        if !leads_with_question(lines) {
            findings.push(Finding::NotAQuestion {
                block,
                first_line: lines.first().copied().unwrap_or_default().to_string(),
            });
            continue;
        }

        let draft = Draft::read(lines);
        findings.extend(draft.unknown.iter().map(|line| Finding::UnknownTag {
            block,
            line: line.to_string(),
        }));
        if draft.question.is_empty() {
            findings.push(Finding::MissingQuestion { block });
        }
        if draft.options.is_empty() {
            findings.push(Finding::NoOptions { block });
        }
        if draft.answer.is_empty() {
            findings.push(Finding::MissingAnswer { block });
        }
        if draft.is_complete() && !draft.options.contains(&draft.answer) {
            findings.push(Finding::AnswerNotInOptions {
                block,
                answer: draft.answer.to_string(),
            });
        }
    }

    findings
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_single_question() {
        let quiz = parse_quiz_text(
            "Q\\What color is the sky?\nO\\Blue\nO\\Green\nA\\Blue\nE\\Rayleigh scattering.",
            "sky",
            "Sky",
        );
        assert_eq!(quiz.id, "sky");
        assert_eq!(quiz.name, "Sky");
        assert_eq!(
            quiz.questions,
            vec![Question {
                id: 1,
                question: "What color is the sky?".into(),
                options: vec!["Blue".into(), "Green".into()],
                correct_answer: "Blue".into(),
                explanation: "Rayleigh scattering.".into(),
            }]
        );
    }

    #[test]
    fn ids_follow_unfiltered_block_positions() {
        let text = "Q\\One?\nO\\a\nA\\a\n\nQ\\Two?\nA\\b\n\nQ\\Three?\nO\\c\nA\\c";
        let quiz = parse_quiz_text(text, "q", "Q");
        let ids: Vec<usize> = quiz.questions.iter().map(|q| q.id).collect();
        assert_eq!(ids, vec![1, 3]);
    }

    #[test]
    fn explanation_lines_are_joined_in_order() {
        let text = "Q\\Why?\nO\\x\nA\\x\nE\\First part.\nE\\Second part.";
        let quiz = parse_quiz_text(text, "q", "Q");
        assert_eq!(quiz.questions[0].explanation, "First part. Second part.");
    }

    #[test]
    fn missing_explanation_uses_placeholder() {
        let quiz = parse_quiz_text("Q\\Why?\nO\\x\nA\\x", "q", "Q");
        assert_eq!(quiz.questions[0].explanation, NO_EXPLANATION);
    }

    #[test]
    fn blank_line_runs_are_one_separator() {
        let one = "Q\\A?\nO\\1\nA\\1\n\nQ\\B?\nO\\2\nA\\2";
        let many = "\n\n  Q\\A?\nO\\1\nA\\1\n\n   \n\t\n\nQ\\B?\nO\\2\nA\\2\n\n\n";
        assert_eq!(parse_quiz_text(one, "q", "Q"), parse_quiz_text(many, "q", "Q"));
        assert_eq!(parse_quiz_text(many, "q", "Q").len(), 2);
    }

    #[test]
    fn block_must_lead_with_question_tag() {
        let text = "O\\1\nQ\\Hidden?\nA\\1\n\nQ\\Shown?\nO\\2\nA\\2";
        let quiz = parse_quiz_text(text, "q", "Q");
        assert_eq!(quiz.len(), 1);
        assert_eq!(quiz.questions[0].question, "Shown?");
        assert_eq!(quiz.questions[0].id, 2);
    }

    #[test]
    fn lines_are_trimmed_and_unknown_tags_ignored() {
        let text = "   Q\\  Spaced?  \r\n  O\\ yes \r\nX\\noise\r\n A\\yes\r\n";
        let quiz = parse_quiz_text(text, "q", "Q");
        let question = &quiz.questions[0];
        assert_eq!(question.question, "Spaced?");
        assert_eq!(question.options, vec!["yes".to_string()]);
        assert_eq!(question.correct_answer, "yes");
    }

    #[test]
    fn byte_order_mark_keeps_first_question() {
        let text = "\u{FEFF}Q\\First?\nO\\a\nA\\a\n\nQ\\Second?\nO\\b\nA\\b";
        let quiz = parse_quiz_text(text, "q", "Q");
        let ids: Vec<usize> = quiz.questions.iter().map(|q| q.id).collect();
        assert_eq!(ids, vec![1, 2]);
        assert_eq!(quiz.questions[0].question, "First?");
        assert!(inspect(text).is_empty());
    }

    #[test]
    fn last_question_line_wins() {
        let quiz = parse_quiz_text("Q\\First?\nQ\\Second?\nO\\a\nA\\a", "q", "Q");
        assert_eq!(quiz.questions[0].question, "Second?");
    }

    #[test]
    fn garbage_gives_empty_quiz() {
        assert!(parse_quiz_text("", "q", "Q").is_empty());
        assert!(parse_quiz_text("just some text\n\nmore", "q", "Q").is_empty());
    }

    #[test]
    fn answer_outside_options_is_kept_but_reported() {
        let text = "Q\\Pick?\nO\\a\nO\\b\nA\\c";
        let quiz = parse_quiz_text(text, "q", "Q");
        assert_eq!(quiz.len(), 1);
        assert!(!quiz.questions[0].answer_in_options());

        let findings = inspect(text);
        assert_eq!(
            findings,
            vec![Finding::AnswerNotInOptions {
                block: 1,
                answer: "c".into()
            }]
        );
        assert!(!findings[0].drops_block());
    }

    #[test]
    fn inspect_reports_dropped_blocks() {
        let text = "Intro text\n\nQ\\\nO\\a\nA\\a\n\nQ\\No options?\nA\\a\nZ\\huh\n\nQ\\No answer?\nO\\a";
        let findings = inspect(text);
        assert!(findings.contains(&Finding::NotAQuestion {
            block: 1,
            first_line: "Intro text".into()
        }));
        assert!(findings.contains(&Finding::MissingQuestion { block: 2 }));
        assert!(findings.contains(&Finding::NoOptions { block: 3 }));
        assert!(findings.contains(&Finding::UnknownTag {
            block: 3,
            line: "Z\\huh".into()
        }));
        assert!(findings.contains(&Finding::MissingAnswer { block: 4 }));
        assert!(parse_quiz_text(text, "q", "Q").is_empty());
    }
}
