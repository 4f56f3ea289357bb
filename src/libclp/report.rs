use crate::libclp::session::ResultSummary;
pub fn performance_message(percentage: usize) -> &'static str {
    match percentage {
        90.. => "Excellent! You're ready for the road!",
        70..=89 => "Good job! A little more practice and you'll be an expert.",
        50..=69 => "You're on the right track. Review the missed questions to improve.",
        _ => "Keep studying! Reviewing these topics will help you succeed.",
    }
}

pub fn score_line(summary: &ResultSummary) -> String {
    format!(
        "You answered {} out of {} questions correctly.",
        summary.score, summary.total
    )
}

/// Plain-text list of the missed questions, suitable for printing or
/// pasting into an email.
pub fn missed_review(summary: &ResultSummary) -> String {
    let mut body = String::from("I missed the following questions on the CLP practice quiz:\n\n");
    for (idx, missed) in summary.missed.iter().enumerate() {
        body.push_str(&format!("{}. Question: {}\n", idx + 1, missed.question));
        body.push_str(&format!("   Correct Answer: {}\n", missed.correct_answer));
        body.push_str(&format!("   Explanation: {}\n\n", missed.explanation));
    }
    body
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::libclp::question::MissedQuestion;

    fn summary(score: usize, total: usize, missed: Vec<MissedQuestion>) -> ResultSummary {
        ResultSummary {
            quiz_id: "tanker".into(),
            quiz_name: "Tanker".into(),
            score,
            total,
            missed,
        }
    }

    #[test]
    fn messages_follow_thresholds() {
        assert_eq!(performance_message(100), "Excellent! You're ready for the road!");
        assert_eq!(performance_message(90), "Excellent! You're ready for the road!");
        assert!(performance_message(89).starts_with("Good job!"));
        assert!(performance_message(70).starts_with("Good job!"));
        assert!(performance_message(50).starts_with("You're on the right track."));
        assert!(performance_message(49).starts_with("Keep studying!"));
        assert!(performance_message(0).starts_with("Keep studying!"));
    }

    #[test]
    fn review_lists_missed_in_order() {
        let missed = vec![
            MissedQuestion {
                question: "What is surge?".into(),
                correct_answer: "Liquid movement".into(),
                explanation: "Baffles help.".into(),
            },
            MissedQuestion {
                question: "Outage?".into(),
                correct_answer: "Room for expansion".into(),
                explanation: "No explanation provided.".into(),
            },
        ];
        let text = missed_review(&summary(3, 5, missed));
        assert_eq!(
            text,
            "I missed the following questions on the CLP practice quiz:\n\n\
             1. Question: What is surge?\n   Correct Answer: Liquid movement\n   Explanation: Baffles help.\n\n\
             2. Question: Outage?\n   Correct Answer: Room for expansion\n   Explanation: No explanation provided.\n\n"
        );
        assert_eq!(
            score_line(&summary(3, 5, Vec::new())),
            "You answered 3 out of 5 questions correctly."
        );
    }
}
