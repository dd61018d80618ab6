pub mod ollama_service;
pub mod quiz_service;
