//! The normalizer: a stateless, pure tokenize/stopword/stem function wrapped
//! in a gRPC leaf service. See design §2 — stemming itself is treated as an
//! external, out-of-scope algorithm; this crate only needs to call it
//! correctly and enforce the phrase-length limit.

pub mod config;
pub mod grpc;

use std::collections::BTreeSet;

use once_cell::sync::Lazy;
use rust_stemmers::{Algorithm, Stemmer};
use stop_words::{get, LANGUAGE};
use thiserror::Error;

static STOP_WORDS: Lazy<std::collections::HashSet<String>> =
    Lazy::new(|| get(LANGUAGE::English).into_iter().collect());

static STEMMER: Lazy<Stemmer> = Lazy::new(|| Stemmer::create(Algorithm::English));

#[derive(Debug, Error, PartialEq, Eq)]
pub enum Error {
    #[error("phrase length exceeds {} bytes", xkcd_types::MAX_PHRASE_BYTES)]
    ResourceExhausted,
}

/// Lowercases `phrase`, tokenizes on non-alphanumeric boundaries, drops
/// stop-words, stems the rest with a Snowball (Porter2) stemmer, and
/// deduplicates. Returns the stems in sorted order for deterministic
/// output; callers treat the result as a set.
pub fn normalize(phrase: &str) -> Result<BTreeSet<String>, Error> {
    if phrase.len() > xkcd_types::MAX_PHRASE_BYTES {
        return Err(Error::ResourceExhausted);
    }

    let lower = phrase.to_lowercase();
    let mut stems = BTreeSet::new();
    for token in lower.split(|c: char| !c.is_ascii_alphanumeric()) {
        if token.is_empty() || STOP_WORDS.contains(token) {
            continue;
        }
        stems.insert(STEMMER.stem(token).into_owned());
    }
    Ok(stems)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lowercases_tokenizes_and_stems() {
        let stems = normalize("Running, runners run!").unwrap();
        assert!(stems.contains("run"));
    }

    #[test]
    fn drops_stop_words() {
        let stems = normalize("the a an of").unwrap();
        assert!(stems.is_empty());
    }

    #[test]
    fn deduplicates() {
        let stems = normalize("dog dogs dog").unwrap();
        assert_eq!(stems.len(), 1);
    }

    #[test]
    fn rejects_oversized_phrase() {
        let phrase = "a".repeat(xkcd_types::MAX_PHRASE_BYTES + 1);
        assert_eq!(normalize(&phrase), Err(Error::ResourceExhausted));
    }

    #[test]
    fn only_non_alphanumeric_yields_empty_set() {
        let stems = normalize("   ...---   ").unwrap();
        assert!(stems.is_empty());
    }
}
