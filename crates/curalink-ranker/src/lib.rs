//! curalink-ranker: Profile-driven recommendation ranking.
//!
//! Score = number of profile keywords found (case-insensitive substring) in a
//! record's declared searchable text. Candidates are ordered by descending
//! score with ties kept in input order, then cut to [`RECOMMENDATION_LIMIT`].

pub mod keywords;
pub mod searchable;
pub mod scorer;

pub use keywords::KeywordSet;
pub use searchable::{AsJson, Searchable, SearchTextError};
pub use scorer::{rank, rank_with_limit, score_text, Scored, RECOMMENDATION_LIMIT};
