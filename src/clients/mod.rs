pub mod arxiv_client;
pub mod extractor;
pub mod llm_client;

pub use arxiv_client::{ArxivClient, PaperSearch};
pub use extractor::{DocumentExtractor, TextExtractor};
pub use llm_client::{CompletionService, OpenAiClient};
