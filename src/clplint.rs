use clap::Parser;
use clpquiz::libclp::parser::{inspect, parse_quiz_text};
use colored::Colorize;
use env_logger::Env;
use log::{error, info};
use std::path::PathBuf;
use std::process::ExitCode;

#[derive(Parser, Debug)]
#[command(name = "CLP Quiz Lint")]
#[command(version, about = "Checks quiz files for blocks the player would drop", long_about = None)]
struct Args {
    #[arg(short, long, default_value = "info")]
    log_level: String,
    /// Exit with a failure status when any finding is reported
    #[arg(short, long, default_value = "false")]
    strict: bool,
    #[arg(required = true)]
    files: Vec<PathBuf>,
}

fn main() -> ExitCode {
    let args = Args::parse();
    env_logger::Builder::from_env(Env::default().default_filter_or(args.log_level.as_str())).init();

    let mut unreadable = 0;
    let mut findings_total = 0;
    for file in &args.files {
        let text = match std::fs::read_to_string(file) {
            Ok(text) => text,
            Err(e) => {
                error!("{}", format!("Cannot read {:?}: {}", file, e).red());
                unreadable += 1;
                continue;
            }
        };

        let name = file
            .file_stem()
            .map(|stem| stem.to_string_lossy().into_owned())
            .unwrap_or_default();
        let quiz = parse_quiz_text(&text, &name, &name);
        let findings = inspect(&text);
        findings_total += findings.len();

        info!(
            "{}",
            format!("{:?} ({} questions, {} findings)", file, quiz.len(), findings.len()).blue()
        );
        for question in &quiz.questions {
            let line = format!("├ {}: {}", question.id, question.question);
            if findings.iter().any(|f| f.block() == question.id) {
                info!("{} {}", "│".blue(), line.yellow());
            } else {
                info!("{} {}", "│".blue(), line.green());
            }
        }
        for finding in &findings {
            let line = format!("├ ✘ {}", finding);
            if finding.drops_block() {
                error!("{} {}", "│".blue(), line.red().strikethrough());
            } else {
                error!("{} {}", "│".blue(), line.yellow());
            }
        }
    }

    if unreadable > 0 || (args.strict && findings_total > 0) {
        ExitCode::FAILURE
    } else {
        ExitCode::SUCCESS
    }
}
