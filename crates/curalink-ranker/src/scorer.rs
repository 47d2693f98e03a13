//! Keyword scoring and ranking.

use std::cmp::Reverse;

use curalink_common::{RecordKind, UserProfile};
use serde::Serialize;
use tracing::{debug, instrument, warn};

use crate::keywords::KeywordSet;
use crate::searchable::Searchable;

/// Maximum number of recommendations returned.
pub const RECOMMENDATION_LIMIT: usize = 10;

/// A candidate with its relevance score.
///
/// `score` is `None` on the cold-start path, where nothing was scored.
/// Serialises as the item's own fields plus `score`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Scored<T> {
    #[serde(flatten)]
    pub item: T,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub score: Option<u32>,
}

/// One point per keyword occurring anywhere in `text`.
/// `text` must already be lower-case.
pub fn score_text(keywords: &KeywordSet, text: &str) -> u32 {
    keywords.iter().filter(|k| text.contains(k)).count() as u32
}

/// Rank `candidates` for `profile`, returning at most [`RECOMMENDATION_LIMIT`].
pub fn rank<T: Searchable>(profile: &UserProfile, candidates: Vec<T>, kind: RecordKind) -> Vec<Scored<T>> {
    rank_with_limit(profile, candidates, kind, RECOMMENDATION_LIMIT)
}

#[instrument(skip_all, fields(kind = kind.as_str(), candidates = candidates.len(), limit = limit))]
pub fn rank_with_limit<T: Searchable>(
    profile: &UserProfile,
    candidates: Vec<T>,
    kind: RecordKind,
    limit: usize,
) -> Vec<Scored<T>> {
    let keywords = KeywordSet::from_profile(profile);

    // Cold start: no signal, keep input order.
    if keywords.is_empty() {
        debug!("Profile has no keywords, returning candidates unscored");
        return candidates
            .into_iter()
            .take(limit)
            .map(|item| Scored { item, score: None })
            .collect();
    }

    let mut scored: Vec<Scored<T>> = candidates
        .into_iter()
        .enumerate()
        .map(|(index, item)| {
            let score = match item.searchable_text() {
                Ok(text) => score_text(&keywords, &text),
                Err(e) => {
                    warn!(index, error = %e, "Candidate not scorable, scoring 0");
                    0
                }
            };
            Scored { item, score: Some(score) }
        })
        .collect();

    // sort_by_key is stable: equal scores stay in input order.
    scored.sort_by_key(|s| Reverse(s.score));
    scored.truncate(limit);

    debug!(
        keywords = keywords.len(),
        top_score = scored.first().and_then(|s| s.score).unwrap_or(0),
        "Ranking complete"
    );
    scored
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_score_text_counts_each_keyword_once() {
        let kw = KeywordSet::from_profile(&UserProfile::patient(["asthma", "copd"]));
        assert_eq!(score_text(&kw, "asthma asthma asthma"), 1);
        assert_eq!(score_text(&kw, "asthma and copd"), 2);
        assert_eq!(score_text(&kw, "nothing here"), 0);
    }

    #[test]
    fn test_substring_match_without_word_boundary() {
        let kw = KeywordSet::from_profile(&UserProfile::patient(["onco"]));
        assert_eq!(score_text(&kw, "neuro-oncology"), 1);
    }

    #[test]
    fn test_limit_zero() {
        let ranked = rank_with_limit(
            &UserProfile::patient(["x"]),
            vec![serde_json::json!({"a": "x"})],
            RecordKind::Trial,
            0,
        );
        assert!(ranked.is_empty());
    }
}
