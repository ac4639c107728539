use itertools::Itertools;
use rand::seq::SliceRandom;
use rand::Rng;

/// How many incorrect options accompany the correct answer.
pub const DISTRACTORS_PER_QUESTION: usize = 3;

/// A question as authored or generated. `distractors` holds only the
/// incorrect options; the correct answer is merged in by
/// [`RawQuestion::into_question`].
#[derive(Clone, Debug, PartialEq)]
pub struct RawQuestion {
    pub prompt: String,
    pub distractors: Vec<i64>,
    pub answer: i64,
    pub explanation: String,
}

impl RawQuestion {
    /// A record is well-formed when it carries exactly the expected number of
    /// distinct distractors, none of which equals the answer.
    pub fn is_well_formed(&self) -> bool {
        self.distractors.len() == DISTRACTORS_PER_QUESTION
            && self.distractors.iter().unique().count() == self.distractors.len()
            && !self.distractors.contains(&self.answer)
    }

    /// Merge the answer into the options and shuffle them, so the position of
    /// the correct answer is unpredictable.
    pub fn into_question<R: Rng>(self, rng: &mut R) -> Question {
        let mut options = self.distractors;
        options.push(self.answer);
        options.shuffle(rng);
        Question {
            prompt: self.prompt,
            options,
            answer: self.answer,
            explanation: self.explanation,
        }
    }
}

/// A question ready to present: `options` contains the answer and its
/// distractors in randomized order.
#[derive(Clone, Debug, PartialEq)]
pub struct Question {
    pub prompt: String,
    pub options: Vec<i64>,
    pub answer: i64,
    pub explanation: String,
}

impl Question {
    pub fn has_option(&self, value: i64) -> bool {
        self.options.contains(&value)
    }

    pub fn is_answer_correct(&self, value: i64) -> bool {
        value == self.answer
    }
}
