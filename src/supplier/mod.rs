use rand::Rng;
use thiserror::Error;
use tracing::warn;

use crate::concept::ConceptKind;
use crate::generator::QuestionGenerator;
use crate::question::{Question, RawQuestion};

mod bank;

#[derive(Debug, Error, PartialEq)]
pub enum SupplyError {
    /// Caller asked for a non-positive number of questions. This is a
    /// contract violation by the embedding layer, not a runtime condition.
    #[error("requested question count must be at least 1")]
    InvalidRequest,
}

/// Produces question sets: generated when the collaborator cooperates, from
/// the built-in bank otherwise. The random source is injected so tests can
/// seed it.
pub struct QuestionSupplier<G, R> {
    generator: G,
    rng: R,
}

impl<G: QuestionGenerator, R: Rng> QuestionSupplier<G, R> {
    pub fn new(generator: G, rng: R) -> Self {
        QuestionSupplier { generator, rng }
    }

    /// Returns `count` validated questions for `kind`, each with the answer
    /// merged into its shuffled options.
    ///
    /// Generation failures of any sort are recovered by the bank and never
    /// surfaced. When the bank holds fewer than `count` entries for `kind`,
    /// the available entries are returned without error; callers that need an
    /// exact count must keep their requests within the bank size.
    pub async fn supply(
        &mut self,
        kind: ConceptKind,
        count: usize,
    ) -> Result<Vec<Question>, SupplyError> {
        if count == 0 {
            return Err(SupplyError::InvalidRequest);
        }

        let batch = match self.generator.generate(kind, count).await {
            Ok(batch) => match check_batch(batch, count) {
                Ok(batch) => batch,
                Err(reason) => {
                    warn!(%kind, %reason, "generated questions rejected; using question bank");
                    bank::questions(kind, count)
                }
            },
            Err(error) => {
                warn!(%kind, error = %error, "question generation failed; using question bank");
                bank::questions(kind, count)
            }
        };

        Ok(batch
            .into_iter()
            .map(|raw| raw.into_question(&mut self.rng))
            .collect())
    }
}

/// A generated batch is usable when every record is well-formed and at least
/// `count` records came back; surplus records are dropped.
fn check_batch(mut batch: Vec<RawQuestion>, count: usize) -> Result<Vec<RawQuestion>, &'static str> {
    if batch.len() < count {
        return Err("batch is smaller than requested");
    }
    if !batch.iter().all(RawQuestion::is_well_formed) {
        return Err("batch contains a malformed record");
    }
    batch.truncate(count);
    Ok(batch)
}
