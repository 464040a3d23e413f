use std::sync::Arc;

use sea_orm::DatabaseConnection;

use crate::config::AppConfig;
use crate::repository::ArticleRepository;
use crate::summarizer::Summarizer;
use crate::youtube::TranscriptFetcher;

#[derive(Clone)]
pub struct AppState {
    pub config: AppConfig,
    pub db: DatabaseConnection,
    pub articles: Arc<dyn ArticleRepository>,
    pub transcripts: Arc<dyn TranscriptFetcher>,
    pub summarizer: Arc<dyn Summarizer>,
}
