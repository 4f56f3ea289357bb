use clpquiz::libclp::loader::{load_all, Catalog, DirFetcher, Fetcher, QuizMeta};
use clpquiz::libclp::parser::inspect;
use clpquiz::libclp::session::{Phase, Session, Step};
use std::collections::HashSet;
use std::path::PathBuf;

fn data_dir() -> DirFetcher {
    DirFetcher {
        dir: PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("data"),
    }
}

#[tokio::test]
async fn bundled_quizzes_load_and_are_answerable() {
    let quizzes = load_all(&Catalog::builtin(), &data_dir()).await.unwrap();
    assert_eq!(quizzes.len(), 8);

    for quiz in &quizzes {
        assert!(!quiz.is_empty(), "{} has no questions", quiz.id);
        for question in &quiz.questions {
            assert!(
                question.answer_in_options(),
                "{} question {} can never be answered correctly",
                quiz.id,
                question.id
            );
        }
    }
}

#[tokio::test]
async fn bundled_files_have_no_findings() {
    let fetcher = data_dir();
    for meta in &Catalog::builtin().quizzes {
        let text = fetcher.fetch(&meta.file).await.unwrap();
        assert_eq!(inspect(&text), Vec::new(), "{}", meta.file);
    }
}

#[tokio::test]
async fn missing_file_exposes_no_quizzes() {
    let mut catalog = Catalog::builtin();
    catalog.quizzes.push(QuizMeta {
        id: "missing".into(),
        name: "Missing".into(),
        file: "missing.txt".into(),
    });
    let err = load_all(&catalog, &data_dir()).await.unwrap_err();
    assert_eq!(err.to_string(), "Failed to load quiz: Missing");
}

#[tokio::test]
async fn full_attempt_then_restart() {
    let quizzes = load_all(&Catalog::builtin(), &data_dir()).await.unwrap();
    let tanker = quizzes.iter().find(|quiz| quiz.id == "tanker").unwrap().clone();

    let mut session = Session::new();
    for _ in 0..2 {
        session.start(tanker.clone()).unwrap();
        let mut seen = HashSet::new();
        let summary = loop {
            let question = session.current_question().unwrap().clone();
            seen.insert(question.id);
            // miss the first question shown, get the rest right
            let option = if session.position() == 0 {
                "not an option"
            } else {
                question.correct_answer.as_str()
            };
            session.select_option(option).unwrap();
            if let Step::Finished(summary) = session.advance().unwrap() {
                break summary;
            }
        };

        assert_eq!(seen.len(), tanker.len());
        assert_eq!(summary.total, tanker.len());
        assert_eq!(summary.score, tanker.len() - 1);
        assert_eq!(summary.missed.len(), 1);
        assert_eq!(summary.percentage(), 67);
        assert_eq!(session.phase(), Phase::Completed);
        session.restart();
    }
}
