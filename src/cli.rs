use crate::Error;
use clpquiz::libclp::question::Quiz;
use clpquiz::libclp::report::{missed_review, performance_message, score_line};
use clpquiz::libclp::session::{ResultSummary, Session, Step, Verdict};
use colored::Colorize;
use log::debug;
use std::io::{self, Write};
use std::sync::Arc;
use text_io::try_read;

#[derive(Debug, PartialEq)]
pub enum Choice {
    Option(usize),
    Quit,
    OutOfRange,
    Invalid,
}

impl Choice {
    /// Reads a 1-based menu number, `q` to quit.
    pub fn from_str(choices_count: usize, input: &str) -> Choice {
        match input.trim() {
            "q" | "Q" => Choice::Quit,
            input => match input.parse::<usize>() {
                Ok(num) if (1..=choices_count).contains(&num) => Choice::Option(num - 1),
                Ok(num) if num > choices_count => Choice::OutOfRange,
                Ok(_) | Err(_) => Choice::Invalid,
            },
        }
    }
}

/// Prints `message` and reads one line. `None` once stdin is exhausted.
fn prompt(message: &str) -> Result<Option<String>, Error> {
    print!("{} ", message.cyan());
    io::stdout().flush()?;
    let line: Result<String, _> = try_read!("{}\n");
    debug!("input: {:?}", line);
    Ok(line.ok())
}

fn ask_choice(message: &str, choices_count: usize) -> Result<Choice, Error> {
    loop {
        let Some(line) = prompt(message)? else {
            return Ok(Choice::Quit);
        };
        match Choice::from_str(choices_count, &line) {
            Choice::OutOfRange => println!(
                "{}",
                format!("There are only {} options available!", choices_count).bright_red()
            ),
            Choice::Invalid => continue,
            choice => return Ok(choice),
        }
    }
}

pub fn select_quiz(quizzes: &[Arc<Quiz>]) -> Result<Option<Arc<Quiz>>, Error> {
    println!("{}", "==========> CLP Quiz <==========".cyan());
    println!("{}", "Choose your test...".bold());
    for (i, quiz) in quizzes.iter().enumerate() {
        println!(
            "  {}. {} {}",
            format!("{}", i + 1).bold(),
            quiz.name,
            format!("({} questions)", quiz.len()).dimmed()
        );
    }

    let message = format!("Test (1-{}, q to quit):", quizzes.len());
    match ask_choice(&message, quizzes.len())? {
        Choice::Option(idx) => Ok(Some(quizzes[idx].clone())),
        _ => Ok(None),
    }
}

/// Runs one attempt on the terminal. Returns `None` if the user quit early.
pub fn play(session: &mut Session, quiz: Arc<Quiz>) -> Result<Option<ResultSummary>, Error> {
    session.start(quiz)?;
    let quiz_name = session
        .quiz()
        .map(|quiz| quiz.name.clone())
        .unwrap_or_default();

    loop {
        let Some(question) = session.current_question().cloned() else {
            return Ok(None);
        };

        let leading = format!("{}/{}. ", session.position() + 1, session.total());
        println!();
        println!("{}", quiz_name.dimmed());
        println!(
            "{}{}",
            leading.cyan(),
            question.question.as_str().black().bold().on_white()
        );
        let indent = " ".repeat(leading.len());
        for (i, option) in question.options.iter().enumerate() {
            println!("{}{}. {}", indent, format!("{}", i + 1).bold(), option);
        }

        let message = format!("Answer (1-{}, q to quit):", question.options.len());
        match ask_choice(&message, question.options.len())? {
            Choice::Option(idx) => match session.select_index(idx)? {
                Verdict::Correct => println!("{}", "Correct!".bright_green()),
                Verdict::Incorrect => {
                    println!("{}", "Incorrect".bright_red());
                    println!(
                        "{} {}",
                        "The correct answer is:".green(),
                        question.correct_answer.bold()
                    );
                }
            },
            _ => {
                println!("{}", "Quitting Early!".cyan());
                return Ok(None);
            }
        }
        println!("{} {}", "Explanation:".italic(), question.explanation);

        let next = if session.is_last() { "Finish" } else { "Next" };
        prompt(&format!("[Enter] {}", next))?;
        if let Step::Finished(summary) = session.advance()? {
            return Ok(Some(summary));
        }
    }
}

pub fn show_score(summary: &ResultSummary) {
    let percentage = summary.percentage();
    println!();
    println!(
        "{}",
        format!("==========> {} results <==========", summary.quiz_name).cyan()
    );
    let headline = format!("{}%", percentage).bold();
    if percentage >= 70 {
        println!("{}", headline.bright_green());
    } else {
        println!("{}", headline.bright_red());
    }
    println!("{}", performance_message(percentage));
    println!("{}", score_line(summary));

    if !summary.missed.is_empty() {
        println!();
        println!("{}", "Review Your Missed Questions".bold());
        print!("{}", missed_review(summary));
    }
}

pub fn ask_again() -> Result<bool, Error> {
    let answer = prompt("Take another test? (y/n):")?;
    Ok(answer.is_some_and(|line| line.trim().eq_ignore_ascii_case("y")))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn choice_parses_menu_numbers() {
        assert_eq!(Choice::from_str(4, "1"), Choice::Option(0));
        assert_eq!(Choice::from_str(4, " 4 "), Choice::Option(3));
        assert_eq!(Choice::from_str(4, "5"), Choice::OutOfRange);
        assert_eq!(Choice::from_str(4, "0"), Choice::Invalid);
        assert_eq!(Choice::from_str(4, "q"), Choice::Quit);
        assert_eq!(Choice::from_str(4, "blue"), Choice::Invalid);
    }
}
