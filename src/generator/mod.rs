use anyhow::Result;
use async_trait::async_trait;

use crate::concept::ConceptKind;
use crate::question::RawQuestion;

mod gemini;

pub use gemini::GeminiClient;

/// Remote collaborator producing question content.
///
/// Implementations report failure through an opaque error; the supplier maps
/// any failure to the built-in bank without inspecting it, so no generation
/// error ever reaches the user.
#[async_trait]
pub trait QuestionGenerator {
    async fn generate(&self, kind: ConceptKind, count: usize) -> Result<Vec<RawQuestion>>;
}
