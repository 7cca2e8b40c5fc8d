//! Match ranker
//!
//! Orders every other user by combined score (numeric similarity from the
//! current matrix blended with preference compatibility) and keeps the
//! top N. Ties keep population order.

use crate::distance::{combined_score, compute_preference_score, PreferenceMatrix};
use crate::error::MatchError;
use crate::matrix::SimilarityMatrix;
use crate::schema::FeatureTable;
use ordered_float::OrderedFloat;
use rayon::prelude::*;
use serde::Serialize;
use std::cmp::Reverse;

/// A candidate and its combined score
#[derive(Debug, Clone, PartialEq)]
pub struct RankedMatch {
    pub uid: String,
    pub score: f32,
}

/// Ranked candidates for one user, best first
#[derive(Debug, Clone, PartialEq)]
pub struct MatchResult {
    pub uid: String,
    pub matches: Vec<RankedMatch>,
}

/// One line of the match output table
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MatchRow<'a> {
    pub uid: &'a str,
    pub match_uid: &'a str,
    pub score: f32,
    pub rank: usize,
}

impl MatchResult {
    /// Output rows with 1-based contiguous ranks
    pub fn rows(&self) -> impl Iterator<Item = MatchRow<'_>> {
        self.matches.iter().enumerate().map(move |(i, m)| MatchRow {
            uid: &self.uid,
            match_uid: &m.uid,
            score: m.score,
            rank: i + 1,
        })
    }

    pub fn len(&self) -> usize {
        self.matches.len()
    }

    pub fn is_empty(&self) -> bool {
        self.matches.is_empty()
    }
}

/// Top `top_n` matches for `uid`, excluding `uid` itself
pub fn rank(
    uid: &str,
    matrix: &SimilarityMatrix,
    table: &FeatureTable,
    top_n: usize,
) -> Result<MatchResult, MatchError> {
    check_dimensions(matrix, table)?;
    let i = table
        .index_of(uid)
        .ok_or_else(|| MatchError::UnknownUid(uid.to_string()))?;

    let rows = table.rows();
    let schema = table.schema();
    Ok(rank_index(i, matrix, table, top_n, |j| {
        compute_preference_score(schema, &rows[i], &rows[j])
    }))
}

/// [`rank`] for every user, in population order
pub fn rank_all(
    matrix: &SimilarityMatrix,
    table: &FeatureTable,
    top_n: usize,
) -> Result<Vec<MatchResult>, MatchError> {
    let preferences = PreferenceMatrix::compute(table);
    rank_all_with(matrix, table, &preferences, top_n)
}

/// [`rank_all`] over precomputed preference scores
pub fn rank_all_with(
    matrix: &SimilarityMatrix,
    table: &FeatureTable,
    preferences: &PreferenceMatrix,
    top_n: usize,
) -> Result<Vec<MatchResult>, MatchError> {
    check_dimensions(matrix, table)?;
    if preferences.len() != table.len() {
        return Err(MatchError::DimensionMismatch {
            expected: table.len(),
            actual: preferences.len(),
        });
    }

    Ok((0..table.len())
        .into_par_iter()
        .map(|i| rank_index(i, matrix, table, top_n, |j| preferences.get(i, j)))
        .collect())
}

fn check_dimensions(matrix: &SimilarityMatrix, table: &FeatureTable) -> Result<(), MatchError> {
    if matrix.len() != table.len() {
        return Err(MatchError::DimensionMismatch {
            expected: table.len(),
            actual: matrix.len(),
        });
    }
    Ok(())
}

fn rank_index<F>(
    i: usize,
    matrix: &SimilarityMatrix,
    table: &FeatureTable,
    top_n: usize,
    preference: F,
) -> MatchResult
where
    F: Fn(usize) -> f32,
{
    let mut scored: Vec<(usize, f32)> = (0..table.len())
        .filter(|&j| j != i)
        .map(|j| (j, combined_score(matrix.get(i, j), preference(j))))
        .collect();

    // stable: equal scores stay in population order
    scored.sort_by_key(|&(_, score)| Reverse(OrderedFloat(score)));
    scored.truncate(top_n);

    let rows = table.rows();
    MatchResult {
        uid: rows[i].uid.clone(),
        matches: scored
            .into_iter()
            .map(|(j, score)| RankedMatch {
                uid: rows[j].uid.clone(),
                score,
            })
            .collect(),
    }
}
