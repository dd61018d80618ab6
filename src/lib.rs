pub mod config;
pub mod dto;
pub mod error;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod services;
pub mod utils;
pub mod views;

use crate::config::Config;
use crate::error::Result;
use crate::services::{ollama_service::OllamaService, quiz_service::QuizService};
use reqwest::Client;

#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    pub quiz_service: QuizService,
}

impl AppState {
    pub fn new(config: &Config) -> Result<Self> {
        let http_client = Client::builder().build()?;

        let ollama = OllamaService::new(config, http_client)?;
        let quiz_service =
            QuizService::new(ollama, config.num_predict, config.tokens_per_question);

        Ok(Self {
            config: config.clone(),
            quiz_service,
        })
    }
}
