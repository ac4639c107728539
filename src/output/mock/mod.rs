use parking_lot::RwLock;
use std::sync::Arc;

use crate::output::{AudioControl, Message, QuizOutput};

#[derive(Default)]
struct MockAudioState {
    play_count: u32,
    volume: f32,
    muted: bool,
}

#[derive(Clone, Default)]
pub struct MockAudio {
    state: Arc<RwLock<MockAudioState>>,
}

impl MockAudio {
    pub fn play_count(&self) -> u32 {
        self.state.read().play_count
    }

    pub fn volume(&self) -> f32 {
        self.state.read().volume
    }

    pub fn is_muted(&self) -> bool {
        self.state.read().muted
    }
}

impl AudioControl for MockAudio {
    fn play(&mut self) -> anyhow::Result<()> {
        self.state.write().play_count += 1;
        Ok(())
    }

    fn set_volume(&mut self, volume: f32) {
        self.state.write().volume = volume;
    }

    fn set_muted(&mut self, muted: bool) {
        self.state.write().muted = muted;
    }
}

#[derive(Clone, Default)]
pub struct MockQuizOutput {
    messages: Arc<RwLock<Vec<Message>>>,
    audio: MockAudio,
}

impl MockQuizOutput {
    pub fn new() -> Self {
        Default::default()
    }

    pub fn flush(&mut self) -> Vec<Message> {
        std::mem::replace(&mut *self.messages.write(), Vec::new())
    }

    pub fn contains_message(&self, message: &Message) -> bool {
        self.messages.read().iter().any(|m| m == message)
    }

    /// Handle onto the shared audio state, usable while a session owns a
    /// clone of this output.
    pub fn audio_handle(&self) -> MockAudio {
        self.audio.clone()
    }
}

impl QuizOutput for MockQuizOutput {
    type Audio = MockAudio;

    fn say(&mut self, message: &Message) {
        self.messages.write().push(message.clone());
    }

    fn audio(&mut self) -> &mut MockAudio {
        &mut self.audio
    }
}
