use super::*;
use crate::concept::ConceptKind;
use crate::output::mock::MockQuizOutput;

fn question(offset: i64) -> Question {
    Question {
        prompt: format!("question {}", offset),
        options: vec![offset, offset + 1, offset + 2, offset + 3],
        answer: offset,
        explanation: format!("explanation {}", offset),
    }
}

fn question_set() -> Vec<Question> {
    (0..QUESTIONS_PER_CONCEPT as i64)
        .map(|i| question(i * 10))
        .collect()
}

struct Context {
    session: Session<MockQuizOutput>,
    output: MockQuizOutput,
}

impl Context {
    fn new() -> Self {
        let output = MockQuizOutput::new();
        let session = Session::new(output.clone());
        Context { session, output }
    }

    fn begin_playing(&mut self) {
        let request = self.session.acknowledge_concept().unwrap();
        assert!(self
            .session
            .deliver_questions(request.token, question_set()));
    }

    fn answer_correctly(&mut self) {
        let answer = self.session.current_question().unwrap().answer;
        assert!(self.session.submit_answer(answer).unwrap());
    }

    fn answer_incorrectly(&mut self) {
        let question = self.session.current_question().unwrap();
        let wrong = question
            .options
            .iter()
            .copied()
            .find(|v| *v != question.answer)
            .unwrap();
        assert!(!self.session.submit_answer(wrong).unwrap());
    }

    /// Play through one whole concept block with the given answers.
    fn play_concept(&mut self, correct_answers: &[bool]) {
        assert_eq!(correct_answers.len(), QUESTIONS_PER_CONCEPT);
        self.begin_playing();
        for correct in correct_answers {
            if *correct {
                self.answer_correctly();
            } else {
                self.answer_incorrectly();
            }
            self.session.acknowledge_feedback().unwrap();
        }
    }
}

#[test]
fn new_session_is_on_the_start_screen() {
    let ctx = Context::new();
    assert_eq!(ctx.session.state(), GameState::Start);
    assert_eq!(ctx.session.score(), 0);
    assert_eq!(ctx.session.current_concept(), None);
    assert_eq!(ctx.session.current_question(), None);
    assert_eq!(ctx.session.last_answer_correct(), None);
}

#[test]
fn start_enters_the_first_concept() {
    let mut ctx = Context::new();
    ctx.session.start().unwrap();
    assert_eq!(ctx.session.state(), GameState::Concept);
    let concept = ctx.session.current_concept().unwrap();
    assert_eq!(concept.kind, ConceptKind::Direct);
    assert!(ctx
        .output
        .contains_message(&Message::ConceptBegins(concept.clone())));
}

#[test]
fn start_is_rejected_outside_the_start_screen() {
    let mut ctx = Context::new();
    ctx.session.start().unwrap();
    assert_eq!(
        ctx.session.start(),
        Err(SessionError::InvalidTransition {
            action: "start",
            state: GameState::Concept,
        })
    );
}

#[test]
fn music_starts_once_per_session_lifetime() {
    let mut ctx = Context::new();
    let audio = ctx.output.audio_handle();
    assert_eq!(audio.play_count(), 0);
    ctx.session.start().unwrap();
    assert_eq!(audio.play_count(), 1);
    ctx.play_concept(&[true, true, true]);
    ctx.play_concept(&[true, true, true]);
    ctx.session.restart().unwrap();
    assert_eq!(audio.play_count(), 1);
}

#[test]
fn acknowledging_a_concept_requests_its_questions() {
    let mut ctx = Context::new();
    ctx.session.start().unwrap();
    let request = ctx.session.acknowledge_concept().unwrap();
    assert_eq!(request.kind, ConceptKind::Direct);
    assert_eq!(request.count, QUESTIONS_PER_CONCEPT);
    assert!(ctx.session.is_loading());
    assert!(ctx
        .output
        .contains_message(&Message::LoadingQuestions(ConceptKind::Direct)));
}

#[test]
fn triggers_are_rejected_while_loading() {
    let mut ctx = Context::new();
    ctx.session.start().unwrap();
    ctx.session.acknowledge_concept().unwrap();
    assert!(ctx.session.acknowledge_concept().is_err());
    assert!(ctx.session.submit_answer(0).is_err());
    assert!(ctx.session.acknowledge_feedback().is_err());
    assert!(ctx.session.restart().is_err());
    assert_eq!(ctx.session.state(), GameState::Loading);
}

#[test]
fn delivery_begins_the_question_block() {
    let mut ctx = Context::new();
    ctx.session.start().unwrap();
    ctx.begin_playing();
    assert_eq!(ctx.session.state(), GameState::Playing);
    assert_eq!(ctx.session.question_number(), Some(1));
    let question = ctx.session.current_question().unwrap().clone();
    assert!(ctx.output.contains_message(&Message::QuestionBegins {
        question,
        number: 1,
        total: QUESTIONS_PER_CONCEPT,
    }));
}

#[test]
fn stale_delivery_is_discarded() {
    let mut ctx = Context::new();
    ctx.session.start().unwrap();
    let first = ctx.session.acknowledge_concept().unwrap();
    assert!(ctx.session.deliver_questions(first.token, question_set()));
    for _ in 0..QUESTIONS_PER_CONCEPT {
        ctx.answer_correctly();
        ctx.session.acknowledge_feedback().unwrap();
    }
    assert_eq!(ctx.session.state(), GameState::Concept);
    let second = ctx.session.acknowledge_concept().unwrap();

    assert!(!ctx.session.deliver_questions(first.token, question_set()));
    assert_eq!(ctx.session.state(), GameState::Loading);
    assert!(ctx.session.deliver_questions(second.token, question_set()));
    assert_eq!(ctx.session.state(), GameState::Playing);
}

#[test]
fn delivery_outside_loading_is_discarded() {
    let mut ctx = Context::new();
    ctx.session.start().unwrap();
    assert!(!ctx.session.deliver_questions(FetchToken(7), question_set()));
    assert_eq!(ctx.session.state(), GameState::Concept);
}

#[test]
fn empty_delivery_is_discarded() {
    let mut ctx = Context::new();
    ctx.session.start().unwrap();
    let request = ctx.session.acknowledge_concept().unwrap();
    assert!(!ctx.session.deliver_questions(request.token, Vec::new()));
    assert!(ctx.session.is_loading());
}

#[test]
fn correct_answer_scores_and_enters_feedback() {
    let mut ctx = Context::new();
    ctx.session.start().unwrap();
    ctx.begin_playing();
    let explanation = ctx.session.current_question().unwrap().explanation.clone();
    ctx.answer_correctly();
    assert_eq!(ctx.session.state(), GameState::Feedback);
    assert_eq!(ctx.session.score(), 1);
    assert_eq!(ctx.session.last_answer_correct(), Some(true));
    assert!(ctx
        .output
        .contains_message(&Message::AnswerCorrect { explanation }));
}

#[test]
fn incorrect_answer_reveals_the_answer_without_scoring() {
    let mut ctx = Context::new();
    ctx.session.start().unwrap();
    ctx.begin_playing();
    let question = ctx.session.current_question().unwrap().clone();
    ctx.answer_incorrectly();
    assert_eq!(ctx.session.state(), GameState::Feedback);
    assert_eq!(ctx.session.score(), 0);
    assert_eq!(ctx.session.last_answer_correct(), Some(false));
    assert!(ctx.output.contains_message(&Message::AnswerIncorrect {
        answer: question.answer,
        explanation: question.explanation,
    }));
}

#[test]
fn out_of_options_answer_is_rejected_without_transition() {
    let mut ctx = Context::new();
    ctx.session.start().unwrap();
    ctx.begin_playing();
    assert_eq!(
        ctx.session.submit_answer(999),
        Err(SessionError::InvalidAnswer(999))
    );
    assert_eq!(ctx.session.state(), GameState::Playing);
    assert_eq!(ctx.session.score(), 0);
    assert_eq!(ctx.session.last_answer_correct(), None);
}

#[test]
fn feedback_acknowledgement_advances_to_the_next_question() {
    let mut ctx = Context::new();
    ctx.session.start().unwrap();
    ctx.begin_playing();
    ctx.answer_correctly();
    ctx.session.acknowledge_feedback().unwrap();
    assert_eq!(ctx.session.state(), GameState::Playing);
    assert_eq!(ctx.session.question_number(), Some(2));
    assert_eq!(ctx.session.last_answer_correct(), None);
}

#[test]
fn last_question_of_a_concept_advances_to_the_next_concept() {
    let mut ctx = Context::new();
    ctx.session.start().unwrap();
    ctx.play_concept(&[true, false, true]);
    assert_eq!(ctx.session.state(), GameState::Concept);
    assert_eq!(
        ctx.session.current_concept().unwrap().kind,
        ConceptKind::Inverse
    );
    assert_eq!(ctx.session.question_number(), None);
}

#[test]
fn full_session_reaches_finished_with_the_final_score() {
    let mut ctx = Context::new();
    ctx.session.start().unwrap();
    ctx.play_concept(&[true, true, false]);
    ctx.play_concept(&[true, true, false]);
    assert_eq!(ctx.session.state(), GameState::Finished);
    assert_eq!(ctx.session.score(), 4);
    assert_eq!(ctx.session.percentage(), 67);
    assert!(ctx.output.contains_message(&Message::SessionResults {
        score: 4,
        total: 6,
        percentage: 67,
    }));
}

#[test]
fn a_session_asks_exactly_one_question_set_per_concept() {
    let mut ctx = Context::new();
    ctx.session.start().unwrap();
    ctx.play_concept(&[true, true, true]);
    ctx.play_concept(&[false, false, false]);
    let messages = ctx.output.flush();
    let questions_asked = messages
        .iter()
        .filter(|m| matches!(m, Message::QuestionBegins { .. }))
        .count();
    assert_eq!(
        questions_asked,
        concept::all().len() * QUESTIONS_PER_CONCEPT
    );
    let results = messages
        .iter()
        .filter(|m| matches!(m, Message::SessionResults { .. }))
        .count();
    assert_eq!(results, 1);
}

#[test]
fn restart_resets_score_and_progression() {
    let mut ctx = Context::new();
    ctx.session.start().unwrap();
    ctx.play_concept(&[true, true, true]);
    ctx.play_concept(&[true, true, true]);
    assert_eq!(ctx.session.state(), GameState::Finished);
    ctx.session.restart().unwrap();
    assert_eq!(ctx.session.state(), GameState::Concept);
    assert_eq!(ctx.session.score(), 0);
    assert_eq!(
        ctx.session.current_concept().unwrap().kind,
        ConceptKind::Direct
    );
}

#[test]
fn restart_is_rejected_before_the_session_finishes() {
    let mut ctx = Context::new();
    ctx.session.start().unwrap();
    assert_eq!(
        ctx.session.restart(),
        Err(SessionError::InvalidTransition {
            action: "restart",
            state: GameState::Concept,
        })
    );
}
