pub mod chat;
pub mod config;
pub mod error;
pub mod guardrail;
pub mod handlers;
pub mod llm;
pub mod prompt;
pub mod routes;
pub mod state;
pub mod translate;

pub use error::{AppError, AppResult};
