use lazy_static::lazy_static;
use serde::Deserialize;
use std::fmt;

/// How many questions are asked for each concept.
pub const QUESTIONS_PER_CONCEPT: usize = 3;

/// The two kinds of proportionality the quiz teaches.
#[derive(Clone, Copy, Debug, Deserialize, Eq, Hash, PartialEq)]
#[serde(rename_all = "lowercase")]
pub enum ConceptKind {
    Direct,
    Inverse,
}

impl fmt::Display for ConceptKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConceptKind::Direct => write!(f, "direct"),
            ConceptKind::Inverse => write!(f, "inverse"),
        }
    }
}

/// One teaching unit: an explanation screen shown before its question block.
#[derive(Clone, Debug, PartialEq)]
pub struct Concept {
    pub kind: ConceptKind,
    pub title: String,
    pub explanation: String,
    pub image_url: String,
}

lazy_static! {
    static ref CONCEPTS: Vec<Concept> = vec![
        Concept {
            kind: ConceptKind::Direct,
            title: "Direct Proportionality".to_owned(),
            explanation: "When one thing goes up, the other goes up with it! If one goes \
                          down, the other goes down too. They move in the same direction, \
                          like the volume and the number of instruments playing."
                .to_owned(),
            image_url: "https://picsum.photos/seed/directproportionality/600/300".to_owned(),
        },
        Concept {
            kind: ConceptKind::Inverse,
            title: "Inverse Proportionality".to_owned(),
            explanation: "Here it is the opposite! When one thing goes up, the other goes \
                          down. They move in opposite directions, like how speeding up a \
                          song's tempo (BPM) makes its duration shrink."
                .to_owned(),
            image_url: "https://picsum.photos/seed/inverseproportionality/600/300".to_owned(),
        },
    ];
}

/// The concept catalog, in teaching order.
pub fn all() -> &'static [Concept] {
    &CONCEPTS
}
