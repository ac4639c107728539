//! The built-in question bank: a small hand-authored set guaranteeing the
//! quiz stays playable when question generation is unavailable.

use lazy_static::lazy_static;
use serde::de;
use serde::{Deserialize, Deserializer};
use std::collections::HashMap;

use crate::concept::ConceptKind;
use crate::question::RawQuestion;

const BANK_CSV: &str = include_str!("bank.csv");

fn distractors_from_string<'de, D>(deserializer: D) -> Result<Vec<i64>, D::Error>
where
    D: Deserializer<'de>,
{
    String::deserialize(deserializer)?
        .split('|')
        .map(|value| value.trim().parse().map_err(de::Error::custom))
        .collect()
}

#[derive(Deserialize)]
struct BankRow {
    kind: ConceptKind,
    prompt: String,
    #[serde(deserialize_with = "distractors_from_string")]
    distractors: Vec<i64>,
    answer: i64,
    explanation: String,
}

lazy_static! {
    static ref BANK: HashMap<ConceptKind, Vec<RawQuestion>> = load_bank();
}

fn load_bank() -> HashMap<ConceptKind, Vec<RawQuestion>> {
    let mut bank: HashMap<ConceptKind, Vec<RawQuestion>> = HashMap::new();
    let mut csv_reader = csv::Reader::from_reader(BANK_CSV.as_bytes());
    for row in csv_reader.deserialize() {
        let row: BankRow = row.expect("built-in question bank is malformed");
        bank.entry(row.kind).or_default().push(RawQuestion {
            prompt: row.prompt,
            distractors: row.distractors,
            answer: row.answer,
            explanation: row.explanation,
        });
    }
    bank
}

/// The first `count` bank questions for `kind`; fewer when the bank is
/// shorter than the request.
pub fn questions(kind: ConceptKind, count: usize) -> Vec<RawQuestion> {
    let entries = BANK.get(&kind).map(Vec::as_slice).unwrap_or(&[]);
    entries.iter().take(count).cloned().collect()
}
