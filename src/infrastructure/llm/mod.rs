//! Generation backends and routing

mod gemini;
mod openai;
mod router;

pub use gemini::GeminiProvider;
pub use openai::OpenAiProvider;
pub use router::GenerationRouter;
