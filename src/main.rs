use clap::Parser;
use clpquiz::libclp::loader::{load_all, Catalog, CatalogError, Source};
use clpquiz::libclp::session::{ResultSummary, Session, SessionError};
use colored::Colorize;
use env_logger::Env;
use log::{debug, error, info, warn};
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;

mod cli;

#[derive(Parser, Debug)]
#[command(name = "CLP Quiz")]
#[command(version, about, long_about = None)]
struct Args {
    /// JSON catalog of quizzes; the eight built-in topics when omitted
    #[arg(long, value_name = "FILE")]
    catalog: Option<PathBuf>,
    /// Directory or http(s) base URL holding the quiz files
    #[arg(short, long, default_value = "data")]
    data: String,
    /// Start this quiz id directly instead of showing the selection
    #[arg(short, long)]
    quiz: Option<String>,
    /// Write the result summary of each finished attempt as JSON
    #[arg(short, long, value_name = "FILE")]
    export: Option<PathBuf>,
    #[arg(short, long, default_value = "error")]
    log_level: String,
}

#[derive(Debug, Error)]
pub enum Error {
    #[error(transparent)]
    Catalog(#[from] CatalogError),
    #[error("no quiz with id `{0}`")]
    UnknownQuiz(String),
    #[error(transparent)]
    Session(#[from] SessionError),
    #[error("terminal error: {0}")]
    Io(#[from] io::Error),
    #[error("cannot write results: {0}")]
    Export(#[from] serde_json::Error),
}

#[tokio::main]
async fn main() -> Result<(), Error> {
    let args = Args::parse();
    env_logger::Builder::from_env(Env::default().default_filter_or(args.log_level.as_str())).init();

    let catalog = match &args.catalog {
        Some(path) => Catalog::from_json_file(path)?,
        None => Catalog::builtin(),
    };
    debug!("[Setup] Catalog: {:?}", catalog);

    println!("{}", "Loading Quizzes...".cyan());
    let quizzes = match load_all(&catalog, &Source::parse(&args.data)).await {
        Ok(quizzes) => quizzes,
        Err(err) => {
            error!("[Load] {:?}", err);
            println!("{} {}", "Error".bright_red().bold(), err.to_string().red());
            std::process::exit(1);
        }
    };

    let mut preselected = match &args.quiz {
        Some(id) => match quizzes.iter().find(|quiz| quiz.id == *id) {
            Some(quiz) => Some(quiz.clone()),
            None => return Err(Error::UnknownQuiz(id.clone())),
        },
        None => None,
    };

    let mut session = Session::new();
    loop {
        let quiz = match preselected.take() {
            Some(quiz) => quiz,
            None => match cli::select_quiz(&quizzes)? {
                Some(quiz) => quiz,
                None => break,
            },
        };
        if quiz.is_empty() {
            warn!("[Setup] {} has no usable questions", quiz.id);
            println!("{}", format!("{} has no questions yet.", quiz.name).yellow());
            continue;
        }

        info!("[Setup] Starting {}", quiz.id);
        if let Some(summary) = cli::play(&mut session, quiz)? {
            cli::show_score(&summary);
            if let Some(path) = &args.export {
                export(path, &summary)?;
            }
        }
        session.restart();

        if !cli::ask_again()? {
            break;
        }
    }

    Ok(())
}

fn export(path: &Path, summary: &ResultSummary) -> Result<(), Error> {
    let json = serde_json::to_string_pretty(summary)?;
    std::fs::write(path, json)?;
    info!("[Export] Wrote results to {:?}", path);
    Ok(())
}
