//! Word tables for the PassiveGram wheel.

use crate::passivegram::Mode;
use derive_more::{AsRef, Deref, Display, From, Into};
use rand::Rng;
use rand::seq::SliceRandom;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use thiserror::Error;

/// One word or phrase shown in a segment.
#[derive(
    Debug,
    Clone,
    Default,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    Display,
    Deref,
    From,
    Into,
    AsRef,
)]
#[serde(transparent)]
pub struct Phrase(String);

crate::impl_string_newtype!(Phrase);

#[derive(Debug, Error, PartialEq, Eq)]
pub enum VocabError {
    #[error("vocabulary '{list}' has {available} entries, {needed} are needed")]
    TooFewEntries {
        list: String,
        needed: usize,
        available: usize,
    },
}

pub const SUBJECTS: &[&str] = &[
    "The homework", "The project", "The exam", "The report", "The building",
    "The book", "The article", "The message", "The problem", "The rules",
    "The results", "The documents", "The website", "The system", "The house",
    "The car", "The computer", "Tom", "She", "He",
    "They", "It", "The students", "The teacher", "The company",
    "The government", "The film", "The product", "The speech", "The experiment",
];

pub const STANDARD_AUXILIARIES: &[&str] = &[
    "is", "are", "was", "were", "is being", "are being",
    "has been", "have been", "had been", "will be", "can be", "must be",
];

pub const REPORTING_AUXILIARIES: &[&str] = &[
    "is said to", "are said to", "is believed to", "are believed to",
    "is known to", "is thought to", "is considered to", "is expected to",
];

pub const CAUSATIVE_AUXILIARIES: &[&str] = &[
    "has had", "have had", "had had", "will have",
    "had", "should have", "must have", "could have",
];

pub const PAST_PARTICIPLES: &[&str] = &[
    "written", "prepared", "completed", "checked", "explained",
    "recorded", "published", "sent", "opened", "closed",
    "changed", "improved", "translated", "corrected", "printed",
    "repaired", "cleaned", "painted", "built", "destroyed",
    "announced", "developed", "discussed", "approved", "invited",
    "stolen", "discovered", "finished", "organized", "examined",
];

pub const AGENTS: &[&str] = &[
    "by the teacher", "by the students", "by the government", "by experts",
    "by scientists", "by the manager", "yesterday", "today",
    "last year", "recently", "at school", "in the city",
    "at home", "carefully", "quickly", "officially",
    "in 2024", "during the lesson", "before the exam", "by professionals",
    "by a mechanic", "by a technician", "at the hospital", "in the laboratory",
    "worldwide", "in the media", "in the news", "by many people",
    "by researchers", "step by step", "with a pencil", "with a computer",
    "with a smartphone", "with a microphone", "with a camera", "with a key",
];

fn phrases(table: &[&str]) -> Vec<Phrase> {
    table.iter().copied().map(Phrase::from).collect()
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Auxiliaries {
    pub standard: Vec<Phrase>,
    pub reporting: Vec<Phrase>,
    pub causative: Vec<Phrase>,
}

impl Default for Auxiliaries {
    fn default() -> Self {
        Self {
            standard: phrases(STANDARD_AUXILIARIES),
            reporting: phrases(REPORTING_AUXILIARIES),
            causative: phrases(CAUSATIVE_AUXILIARIES),
        }
    }
}

/// Every list the wheel draws from. Missing lists in a config file fall back
/// to the built-in tables.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct VocabularySet {
    pub subjects: Vec<Phrase>,
    pub auxiliaries: Auxiliaries,
    pub participles: Vec<Phrase>,
    pub agents: Vec<Phrase>,
}

impl Default for VocabularySet {
    fn default() -> Self {
        Self {
            subjects: phrases(SUBJECTS),
            auxiliaries: Auxiliaries::default(),
            participles: phrases(PAST_PARTICIPLES),
            agents: phrases(AGENTS),
        }
    }
}

impl VocabularySet {
    pub fn auxiliaries(&self, mode: Mode) -> &[Phrase] {
        match mode {
            Mode::Standard => &self.auxiliaries.standard,
            Mode::Reporting => &self.auxiliaries.reporting,
            Mode::Causative => &self.auxiliaries.causative,
        }
    }

    fn lists(&self) -> [(&'static str, &[Phrase]); 6] {
        [
            ("subjects", self.subjects.as_slice()),
            ("auxiliaries.standard", self.auxiliaries.standard.as_slice()),
            ("auxiliaries.reporting", self.auxiliaries.reporting.as_slice()),
            ("auxiliaries.causative", self.auxiliaries.causative.as_slice()),
            ("participles", self.participles.as_slice()),
            ("agents", self.agents.as_slice()),
        ]
    }

    /// Checks that every list holds at least `needed` distinct phrases.
    pub fn validate(&self, needed: usize) -> Result<(), VocabError> {
        self.lists()
            .into_iter()
            .try_for_each(|(name, list)| ensure_len(name, &unique(list), needed))
    }
}

/// Entries in first-seen order with repeats dropped.
fn unique(entries: &[Phrase]) -> Vec<&Phrase> {
    let mut seen = HashSet::new();
    entries.iter().filter(|p| seen.insert(*p)).collect()
}

fn ensure_len(list: &str, entries: &[&Phrase], needed: usize) -> Result<(), VocabError> {
    if entries.len() < needed {
        return Err(VocabError::TooFewEntries {
            list: list.to_string(),
            needed,
            available: entries.len(),
        });
    }
    Ok(())
}

/// Picks `count` distinct phrases using a partial Fisher-Yates shuffle.
/// Repeated entries count once. Fails rather than repeat or pad when there
/// are too few distinct phrases.
pub fn sample_distinct<R: Rng + ?Sized>(
    list: &str,
    entries: &[Phrase],
    count: usize,
    rng: &mut R,
) -> Result<Vec<Phrase>, VocabError> {
    let mut pool = unique(entries);
    ensure_len(list, &pool, count)?;
    let (picked, _) = pool.partial_shuffle(rng, count);
    Ok(picked.iter().map(|p| (*p).clone()).collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    #[test]
    fn test_builtin_tables_fill_a_ring() {
        assert_eq!(VocabularySet::default().validate(8), Ok(()));
        assert_eq!(STANDARD_AUXILIARIES.len(), 12);
        assert_eq!(REPORTING_AUXILIARIES.len(), 8);
        assert_eq!(CAUSATIVE_AUXILIARIES.len(), 8);
    }

    #[test]
    fn test_builtin_tables_have_no_duplicates() {
        for table in [
            SUBJECTS,
            STANDARD_AUXILIARIES,
            REPORTING_AUXILIARIES,
            CAUSATIVE_AUXILIARIES,
            PAST_PARTICIPLES,
            AGENTS,
        ] {
            let unique: HashSet<_> = table.iter().collect();
            assert_eq!(unique.len(), table.len());
        }
    }

    #[test]
    fn test_sample_is_distinct_subset() {
        let mut rng = StdRng::seed_from_u64(7);
        let pool = phrases(STANDARD_AUXILIARIES);
        for _ in 0..50 {
            let picked = sample_distinct("standard", &pool, 8, &mut rng).unwrap();
            assert_eq!(picked.len(), 8);
            let unique: HashSet<_> = picked.iter().collect();
            assert_eq!(unique.len(), 8);
            assert!(picked.iter().all(|p| pool.contains(p)));
        }
    }

    #[test]
    fn test_short_list_fails() {
        let mut rng = StdRng::seed_from_u64(1);
        let pool = phrases(&["is", "was"]);
        let err = sample_distinct("tiny", &pool, 8, &mut rng).unwrap_err();
        assert_eq!(
            err,
            VocabError::TooFewEntries {
                list: "tiny".into(),
                needed: 8,
                available: 2
            }
        );
    }

    #[test]
    fn test_validate_names_offending_list() {
        let mut set = VocabularySet::default();
        set.agents.truncate(3);
        let err = set.validate(8).unwrap_err();
        assert!(err.to_string().contains("agents"));
    }

    #[test]
    fn test_repeated_entries_count_once() {
        let mut set = VocabularySet::default();
        set.agents = vec![Phrase::from("by me"); 8];
        assert_eq!(
            set.validate(8),
            Err(VocabError::TooFewEntries {
                list: "agents".into(),
                needed: 8,
                available: 1
            })
        );

        let mut rng = StdRng::seed_from_u64(3);
        let mut pool = phrases(REPORTING_AUXILIARIES);
        pool.extend(phrases(&REPORTING_AUXILIARIES[..4]));
        let picked = sample_distinct("reporting", &pool, 8, &mut rng).unwrap();
        let unique: HashSet<_> = picked.iter().collect();
        assert_eq!(unique.len(), 8);

        pool.truncate(7);
        pool.push(pool[0].clone());
        assert!(sample_distinct("reporting", &pool, 8, &mut rng).is_err());
    }

    #[test]
    fn test_partial_override_keeps_builtins() {
        let set: VocabularySet =
            serde_json::from_str(r#"{"auxiliaries": {"reporting": ["a","b","c","d","e","f","g","h"]}}"#)
                .unwrap();
        assert_eq!(set.subjects.len(), SUBJECTS.len());
        assert_eq!(set.auxiliaries.standard.len(), 12);
        assert_eq!(set.auxiliaries(Mode::Reporting)[0].as_str(), "a");
    }
}
