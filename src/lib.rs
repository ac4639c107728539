//! Rhythm Maestro · music-themed proportionality quiz engine
//!
//! The crate is built around two pieces:
//!
//! - [`session::Session`] is the quiz progression state machine. It owns the
//!   score and the active question set, announces every transition through an
//!   injected [`output::QuizOutput`], and hands out a [`session::LoadRequest`]
//!   whenever a concept needs questions.
//! - [`supplier::QuestionSupplier`] turns a load request into a validated,
//!   shuffled question set. It asks an injected [`generator::QuestionGenerator`]
//!   first and falls back to the built-in question bank on any failure, so it
//!   never surfaces a generation error.
//!
//! The embedding UI wires the two together:
//!
//! ```text
//! let request = session.acknowledge_concept()?;
//! let questions = supplier.supply(request.kind, request.count).await?;
//! session.deliver_questions(request.token, questions);
//! ```
//!
//! Deliveries carry the fetch token from their request; the session discards
//! any delivery whose token is stale, so an abandoned fetch can never clobber
//! a newer one. The library imposes no timeout on `supply`; an embedder that
//! wants one can race the call against a timer and deliver bank questions
//! itself.

pub mod concept;
pub mod generator;
pub mod output;
pub mod question;
pub mod session;
pub mod supplier;

pub use crate::concept::{Concept, ConceptKind, QUESTIONS_PER_CONCEPT};
pub use crate::generator::{GeminiClient, QuestionGenerator};
pub use crate::output::{AudioControl, Message, QuizOutput};
pub use crate::question::{Question, RawQuestion, DISTRACTORS_PER_QUESTION};
pub use crate::session::{
    FetchToken, GameState, LoadRequest, Session, SessionError, SessionHandle,
};
pub use crate::supplier::{QuestionSupplier, SupplyError};
