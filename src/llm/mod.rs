pub mod interface;
pub mod gemini;
pub mod gateway;

pub use interface::*;
pub use gemini::GeminiClient;
pub use gateway::*;
