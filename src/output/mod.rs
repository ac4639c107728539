use anyhow::Result;

use crate::concept::{Concept, ConceptKind};
use crate::question::Question;

#[cfg(test)]
pub mod mock;

/// Everything the session announces towards the embedding UI.
#[derive(Clone, Debug, PartialEq)]
pub enum Message {
    ConceptBegins(Concept),
    LoadingQuestions(ConceptKind),
    QuestionBegins {
        question: Question,
        number: usize,
        total: usize,
    },
    AnswerCorrect {
        explanation: String,
    },
    AnswerIncorrect {
        answer: i64,
        explanation: String,
    },
    SessionResults {
        score: u32,
        total: u32,
        percentage: u32,
    },
}

/// Playback widget for the background music track. The session only ever
/// calls [`AudioControl::play`]; volume and mute belong to the embedding UI.
pub trait AudioControl {
    fn play(&mut self) -> Result<()>;
    fn set_volume(&mut self, volume: f32);
    fn set_muted(&mut self, muted: bool);
}

/// Rendering seam between the session and the embedding UI.
pub trait QuizOutput {
    type Audio: AudioControl;

    fn say(&mut self, message: &Message);
    fn audio(&mut self) -> &mut Self::Audio;
}
