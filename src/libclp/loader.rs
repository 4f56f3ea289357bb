use crate::libclp::parser::parse_quiz_text;
use crate::libclp::question::Quiz;
use async_trait::async_trait;
use futures::future::try_join_all;
use log::{debug, error, info};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Instant;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum FetchError {
    #[error("cannot read quiz file: {0}")]
    Io(#[from] std::io::Error),
    #[cfg(feature = "remote")]
    #[error(transparent)]
    Http(#[from] reqwest::Error),
    #[error("quiz request failed with status {0}")]
    HttpStatus(u16),
    #[error("remote quiz source {0} is not supported in this build")]
    Unsupported(String),
}

#[derive(Debug, Error)]
#[error("Failed to load quiz: {name}")]
pub struct LoadError {
    pub name: String,
    #[source]
    pub source: FetchError,
}

#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("cannot read catalog: {0}")]
    Io(#[from] std::io::Error),
    #[error("malformed catalog: {0}")]
    Json(#[from] serde_json::Error),
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct QuizMeta {
    pub id: String,
    pub name: String,
    pub file: String,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct Catalog {
    pub quizzes: Vec<QuizMeta>,
}

const BUILTIN: [(&str, &str, &str); 8] = [
    ("general_knowledge", "General Knowledge", "generalKnowledge.txt"),
    ("air_brakes", "Air Brakes", "airBrakes.txt"),
    ("combination", "Combination", "combination.txt"),
    ("passenger", "Passenger", "passenger.txt"),
    ("school_bus", "School Bus", "schoolBus.txt"),
    ("doubles_triples", "Doubles/Triples", "doublesTriples.txt"),
    ("tanker", "Tanker", "tanker.txt"),
    ("hazardous_materials", "Hazardous Materials", "hazardousMaterials.txt"),
];

impl Catalog {
    pub fn builtin() -> Self {
        Catalog {
            quizzes: BUILTIN
                .iter()
                .map(|(id, name, file)| QuizMeta {
                    id: id.to_string(),
                    name: name.to_string(),
                    file: file.to_string(),
                })
                .collect(),
        }
    }

    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self, CatalogError> {
        let json = std::fs::read_to_string(path)?;
        Ok(serde_json::from_str(&json)?)
    }

    pub fn get(&self, id: &str) -> Option<&QuizMeta> {
        self.quizzes.iter().find(|meta| meta.id == id)
    }
}

/// Retrieves the raw text of one quiz file.
#[async_trait]
pub trait Fetcher: Sync {
    async fn fetch(&self, file: &str) -> Result<String, FetchError>;
}

#[derive(Debug, Clone)]
pub struct DirFetcher {
    pub dir: PathBuf,
}

#[async_trait]
impl Fetcher for DirFetcher {
    async fn fetch(&self, file: &str) -> Result<String, FetchError> {
        let path = self.dir.join(file);
        debug!("[Load] Reading {:?}", path);
        Ok(tokio::fs::read_to_string(path).await?)
    }
}

#[derive(Debug, Clone)]
pub struct HttpFetcher {
    pub base_url: String,
    #[cfg(feature = "remote")]
    client: reqwest::Client,
}

impl HttpFetcher {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            #[cfg(feature = "remote")]
            client: reqwest::Client::new(),
        }
    }

    fn url_for(&self, file: &str) -> String {
        format!("{}/{}", self.base_url.trim_end_matches('/'), file)
    }

    #[cfg(feature = "remote")]
    async fn get(&self, url: String) -> Result<String, FetchError> {
        debug!("[Load] GET {}", url);
        let response = self.client.get(url).send().await?;
        if !response.status().is_success() {
            return Err(FetchError::HttpStatus(response.status().as_u16()));
        }
        Ok(response.text().await?)
    }

    #[cfg(not(feature = "remote"))]
    async fn get(&self, url: String) -> Result<String, FetchError> {
        Err(FetchError::Unsupported(url))
    }
}

#[async_trait]
impl Fetcher for HttpFetcher {
    async fn fetch(&self, file: &str) -> Result<String, FetchError> {
        self.get(self.url_for(file)).await
    }
}

/// Where quiz files live: a local directory or an `http(s)://` base URL.
#[derive(Debug, Clone)]
pub enum Source {
    Dir(DirFetcher),
    Http(HttpFetcher),
}

impl Source {
    pub fn parse(location: &str) -> Self {
        if location.starts_with("http://") || location.starts_with("https://") {
            Source::Http(HttpFetcher::new(location))
        } else {
            Source::Dir(DirFetcher {
                dir: PathBuf::from(location),
            })
        }
    }
}

#[async_trait]
impl Fetcher for Source {
    async fn fetch(&self, file: &str) -> Result<String, FetchError> {
        match self {
            Source::Dir(fetcher) => fetcher.fetch(file).await,
            Source::Http(fetcher) => fetcher.fetch(file).await,
        }
    }
}

async fn load_one<F: Fetcher + ?Sized>(meta: &QuizMeta, fetcher: &F) -> Result<Arc<Quiz>, LoadError> {
    let text = fetcher.fetch(&meta.file).await.map_err(|source| {
        error!("[Load] {} ({}): {}", meta.name, meta.file, source);
        LoadError {
            name: meta.name.clone(),
            source,
        }
    })?;
    Ok(Arc::new(parse_quiz_text(&text, &meta.id, &meta.name)))
}

/// Fetches and parses every quiz in the catalog concurrently. The first
/// failure aborts the whole load; quizzes come back in catalog order.
pub async fn load_all<F: Fetcher + ?Sized>(
    catalog: &Catalog,
    fetcher: &F,
) -> Result<Vec<Arc<Quiz>>, LoadError> {
    let now = Instant::now();
    let quizzes = try_join_all(catalog.quizzes.iter().map(|meta| load_one(meta, fetcher))).await?;
    info!(
        "[Load] Loaded {} quizzes ({} questions) in {} ms.",
        quizzes.len(),
        quizzes.iter().map(|quiz| quiz.len()).sum::<usize>(),
        now.elapsed().as_millis()
    );
    Ok(quizzes)
}
