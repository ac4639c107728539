use parking_lot::RwLock;
use std::fmt;
use std::mem;
use std::sync::Arc;
use thiserror::Error;
use tracing::debug;

use crate::concept::{self, Concept, ConceptKind, QUESTIONS_PER_CONCEPT};
use crate::output::{AudioControl, Message, QuizOutput};
use crate::question::Question;

#[cfg(test)]
mod tests;

/// Shared handle for embedders whose delivery callbacks run off the UI event
/// path.
pub type SessionHandle<O> = Arc<RwLock<Session<O>>>;

/// Identifies one question fetch. A delivery whose token does not match the
/// session's current fetch is stale and gets discarded.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct FetchToken(u64);

/// What the embedding layer must fetch after a concept is acknowledged.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct LoadRequest {
    pub kind: ConceptKind,
    pub count: usize,
    pub token: FetchToken,
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum GameState {
    Start,
    Concept,
    Loading,
    Playing,
    Feedback,
    Finished,
}

impl fmt::Display for GameState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            GameState::Start => "start",
            GameState::Concept => "concept",
            GameState::Loading => "loading",
            GameState::Playing => "playing",
            GameState::Feedback => "feedback",
            GameState::Finished => "finished",
        };
        write!(f, "{}", name)
    }
}

#[derive(Debug, Error, PartialEq)]
pub enum SessionError {
    #[error("answer {0} is not one of the current options")]
    InvalidAnswer(i64),
    #[error("cannot {action} during the {state} phase")]
    InvalidTransition {
        action: &'static str,
        state: GameState,
    },
}

#[derive(Debug)]
struct PlayState {
    concept_index: usize,
    questions: Vec<Question>,
    question_index: usize,
}

#[derive(Debug)]
enum Phase {
    Start,
    Concept {
        concept_index: usize,
    },
    Loading {
        concept_index: usize,
        token: FetchToken,
    },
    Playing(PlayState),
    Feedback {
        play: PlayState,
        was_correct: bool,
    },
    Finished,
}

/// The quiz progression state machine. Owns the score and the active question
/// set; every mutation happens through one of the transition methods below,
/// and every transition is announced through the injected output.
pub struct Session<O: QuizOutput> {
    current_phase: Phase,
    score: u32,
    fetch_counter: u64,
    music_started: bool,
    output: O,
}

impl<O: QuizOutput> Session<O> {
    pub fn new(output: O) -> Session<O> {
        Session {
            current_phase: Phase::Start,
            score: 0,
            fetch_counter: 0,
            music_started: false,
            output,
        }
    }

    /// Begin a new session from the start screen.
    pub fn start(&mut self) -> Result<(), SessionError> {
        match self.phase() {
            Phase::Start => {
                self.begin_session();
                Ok(())
            }
            _ => Err(self.rejected("start")),
        }
    }

    /// Begin a fresh session after the previous one finished. Score and
    /// concept progression reset; the music keeps playing.
    pub fn restart(&mut self) -> Result<(), SessionError> {
        match self.phase() {
            Phase::Finished => {
                self.begin_session();
                Ok(())
            }
            _ => Err(self.rejected("restart")),
        }
    }

    /// Leave the current concept screen. Returns the request the embedding
    /// layer must fetch; further triggers are rejected until the matching
    /// delivery arrives, so at most one fetch is ever outstanding.
    pub fn acknowledge_concept(&mut self) -> Result<LoadRequest, SessionError> {
        match self.phase() {
            Phase::Concept { concept_index } => {
                let concept_index = *concept_index;
                let kind = concept::all()[concept_index].kind;
                self.fetch_counter += 1;
                let token = FetchToken(self.fetch_counter);
                self.output.say(&Message::LoadingQuestions(kind));
                self.set_phase(Phase::Loading {
                    concept_index,
                    token,
                });
                Ok(LoadRequest {
                    kind,
                    count: QUESTIONS_PER_CONCEPT,
                    token,
                })
            }
            _ => Err(self.rejected("acknowledge the concept")),
        }
    }

    /// Install a fetched question set and begin playing. Returns false when
    /// the delivery was discarded: its token is stale, the session is not
    /// loading, or the set is empty. A stale delivery is a normal condition,
    /// not an error.
    pub fn deliver_questions(&mut self, token: FetchToken, questions: Vec<Question>) -> bool {
        match self.phase() {
            Phase::Loading {
                concept_index,
                token: current,
            } if *current == token && !questions.is_empty() => {
                let play = PlayState {
                    concept_index: *concept_index,
                    questions,
                    question_index: 0,
                };
                self.announce_question(&play);
                self.set_phase(Phase::Playing(play));
                true
            }
            _ => {
                debug!(?token, state = %self.state(), "discarding question delivery");
                false
            }
        }
    }

    /// Submit an answer for the current question. Rejects values that are not
    /// among the presented options without any state change. Returns whether
    /// the answer was correct.
    pub fn submit_answer(&mut self, value: i64) -> Result<bool, SessionError> {
        match self.take_phase() {
            Phase::Playing(play) => {
                let question = &play.questions[play.question_index];
                if !question.has_option(value) {
                    self.set_phase(Phase::Playing(play));
                    return Err(SessionError::InvalidAnswer(value));
                }
                let was_correct = question.is_answer_correct(value);
                let message = if was_correct {
                    Message::AnswerCorrect {
                        explanation: question.explanation.clone(),
                    }
                } else {
                    Message::AnswerIncorrect {
                        answer: question.answer,
                        explanation: question.explanation.clone(),
                    }
                };
                if was_correct {
                    self.score += 1;
                }
                self.output.say(&message);
                self.set_phase(Phase::Feedback { play, was_correct });
                Ok(was_correct)
            }
            other => {
                self.set_phase(other);
                Err(self.rejected("submit an answer"))
            }
        }
    }

    /// Leave the feedback screen: next question, next concept, or the final
    /// results. The correctness flag lives in the feedback phase and cannot
    /// leak past this transition.
    pub fn acknowledge_feedback(&mut self) -> Result<(), SessionError> {
        match self.take_phase() {
            Phase::Feedback { mut play, .. } => {
                if play.question_index + 1 < play.questions.len() {
                    play.question_index += 1;
                    self.announce_question(&play);
                    self.set_phase(Phase::Playing(play));
                } else if play.concept_index + 1 < concept::all().len() {
                    self.enter_concept(play.concept_index + 1);
                } else {
                    self.output.say(&Message::SessionResults {
                        score: self.score,
                        total: self.total_questions(),
                        percentage: self.percentage(),
                    });
                    self.set_phase(Phase::Finished);
                }
                Ok(())
            }
            other => {
                self.set_phase(other);
                Err(self.rejected("acknowledge the feedback"))
            }
        }
    }

    pub fn state(&self) -> GameState {
        match self.phase() {
            Phase::Start => GameState::Start,
            Phase::Concept { .. } => GameState::Concept,
            Phase::Loading { .. } => GameState::Loading,
            Phase::Playing(_) => GameState::Playing,
            Phase::Feedback { .. } => GameState::Feedback,
            Phase::Finished => GameState::Finished,
        }
    }

    pub fn is_loading(&self) -> bool {
        self.state() == GameState::Loading
    }

    pub fn current_concept(&self) -> Option<&'static Concept> {
        let index = match self.phase() {
            Phase::Start | Phase::Finished => return None,
            Phase::Concept { concept_index } | Phase::Loading { concept_index, .. } => {
                *concept_index
            }
            Phase::Playing(play) | Phase::Feedback { play, .. } => play.concept_index,
        };
        concept::all().get(index)
    }

    pub fn current_question(&self) -> Option<&Question> {
        match self.phase() {
            Phase::Playing(play) | Phase::Feedback { play, .. } => {
                play.questions.get(play.question_index)
            }
            _ => None,
        }
    }

    /// 1-based number of the current question within its concept block.
    pub fn question_number(&self) -> Option<usize> {
        match self.phase() {
            Phase::Playing(play) | Phase::Feedback { play, .. } => Some(play.question_index + 1),
            _ => None,
        }
    }

    pub fn score(&self) -> u32 {
        self.score
    }

    /// Correctness of the last submitted answer; only known while the
    /// feedback screen is up.
    pub fn last_answer_correct(&self) -> Option<bool> {
        match self.phase() {
            Phase::Feedback { was_correct, .. } => Some(*was_correct),
            _ => None,
        }
    }

    pub fn total_questions(&self) -> u32 {
        (concept::all().len() * QUESTIONS_PER_CONCEPT) as u32
    }

    pub fn percentage(&self) -> u32 {
        (f64::from(self.score) / f64::from(self.total_questions()) * 100.0).round() as u32
    }

    fn begin_session(&mut self) {
        self.score = 0;
        if !self.music_started {
            // Autoplay can be blocked by the embedder; the quiz goes on
            // without music.
            self.output.audio().play().ok();
            self.music_started = true;
        }
        self.enter_concept(0);
    }

    fn enter_concept(&mut self, concept_index: usize) {
        let concept = concept::all()[concept_index].clone();
        self.output.say(&Message::ConceptBegins(concept));
        self.set_phase(Phase::Concept { concept_index });
    }

    fn announce_question(&mut self, play: &PlayState) {
        self.output.say(&Message::QuestionBegins {
            question: play.questions[play.question_index].clone(),
            number: play.question_index + 1,
            total: play.questions.len(),
        });
    }

    fn phase(&self) -> &Phase {
        &self.current_phase
    }

    // Transient placeholder; every caller installs a real phase before
    // returning.
    fn take_phase(&mut self) -> Phase {
        mem::replace(&mut self.current_phase, Phase::Start)
    }

    fn set_phase(&mut self, phase: Phase) {
        self.current_phase = phase;
    }

    fn rejected(&self, action: &'static str) -> SessionError {
        SessionError::InvalidTransition {
            action,
            state: self.state(),
        }
    }
}
