//! The in-memory inverted index backing `ISearch` (design §4.2). Rebuilt
//! wholesale from a fresh database scan and published via an atomic swap so
//! readers never observe a partially-built snapshot and never block a
//! rebuild in progress (grounded on the original's copy-on-write rebuild
//! documented for the search service).

use std::collections::HashSet;
use std::sync::Arc;

use arc_swap::ArcSwap;
use xkcd_types::model::{ComicRef, SearchResult};

pub struct IndexEntry {
    pub id: i64,
    pub url: String,
    pub words: HashSet<String>,
}

#[derive(Default)]
pub struct IndexSnapshot {
    entries: Vec<IndexEntry>,
}

impl IndexSnapshot {
    pub fn from_rows(rows: Vec<(i64, String, Vec<String>)>) -> Self {
        let entries = rows
            .into_iter()
            .map(|(id, url, words)| IndexEntry { id, url, words: words.into_iter().collect() })
            .collect();
        Self { entries }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }
}

pub struct InvertedIndex {
    snapshot: ArcSwap<IndexSnapshot>,
}

impl InvertedIndex {
    pub fn empty() -> Self {
        Self { snapshot: ArcSwap::from_pointee(IndexSnapshot::default()) }
    }

    pub fn swap(&self, snapshot: IndexSnapshot) {
        self.snapshot.store(Arc::new(snapshot));
    }

    pub fn len(&self) -> usize {
        self.snapshot.load().len()
    }

    /// Ranks entries by descending keyword-match count, breaking ties by
    /// ascending comic id, and reports the full match count in `total` even
    /// when `comics` is truncated to `limit` (design §9, open question:
    /// `ISearch`'s `total` is the true match count, unlike the weaker
    /// database-backed `Search`).
    pub fn search(&self, keywords: &HashSet<String>, limit: i64) -> SearchResult {
        if keywords.is_empty() {
            return SearchResult::default();
        }

        let snapshot = self.snapshot.load();
        let mut matches: Vec<(i64, &str, usize)> = snapshot
            .entries
            .iter()
            .filter_map(|entry| {
                let count = entry.words.intersection(keywords).count();
                (count > 0).then_some((entry.id, entry.url.as_str(), count))
            })
            .collect();

        matches.sort_by(|a, b| b.2.cmp(&a.2).then_with(|| a.0.cmp(&b.0)));

        let total = matches.len() as i64;
        let matches: Box<dyn Iterator<Item = (i64, &str, usize)>> = if limit > 0 {
            Box::new(matches.into_iter().take(limit as usize))
        } else {
            Box::new(matches.into_iter())
        };
        let comics = matches.map(|(id, url, _)| ComicRef { id, url: url.to_string() }).collect();

        SearchResult { comics, total }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn snapshot() -> IndexSnapshot {
        IndexSnapshot::from_rows(vec![
            (1, "https://example.test/1".into(), vec!["cat".into(), "dog".into()]),
            (2, "https://example.test/2".into(), vec!["cat".into()]),
            (3, "https://example.test/3".into(), vec!["cat".into(), "dog".into()]),
            (4, "https://example.test/4".into(), vec!["bird".into()]),
        ])
    }

    fn keywords(words: &[&str]) -> HashSet<String> {
        words.iter().map(|w| w.to_string()).collect()
    }

    #[test]
    fn empty_keywords_short_circuit() {
        let index = InvertedIndex::empty();
        index.swap(snapshot());
        let result = index.search(&HashSet::new(), 10);
        assert_eq!(result, SearchResult::default());
    }

    #[test]
    fn ranks_by_match_count_then_id_ascending() {
        let index = InvertedIndex::empty();
        index.swap(snapshot());
        let result = index.search(&keywords(&["cat", "dog"]), 10);
        let ids: Vec<i64> = result.comics.iter().map(|c| c.id).collect();
        // 1 and 3 both match both keywords (tie -> ascending id), 2 matches one.
        assert_eq!(ids, vec![1, 3, 2]);
        assert_eq!(result.total, 3);
    }

    #[test]
    fn total_reports_full_match_count_even_when_truncated() {
        let index = InvertedIndex::empty();
        index.swap(snapshot());
        let result = index.search(&keywords(&["cat"]), 1);
        assert_eq!(result.comics.len(), 1);
        assert_eq!(result.total, 3);
    }

    #[test]
    fn no_matches_yields_empty_result() {
        let index = InvertedIndex::empty();
        index.swap(snapshot());
        let result = index.search(&keywords(&["spaceship"]), 10);
        assert_eq!(result, SearchResult::default());
    }

    #[test]
    fn non_positive_limit_returns_every_match_untruncated() {
        let index = InvertedIndex::empty();
        index.swap(snapshot());
        let result = index.search(&keywords(&["cat", "dog"]), 0);
        assert_eq!(result.comics.len(), 3);
        assert_eq!(result.total, 3);

        let result = index.search(&keywords(&["cat", "dog"]), -1);
        assert_eq!(result.comics.len(), 3);
    }
}
