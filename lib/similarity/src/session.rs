//! Ranking session
//!
//! Owns the feature table and the mutable similarity matrix for the life
//! of one matching run. The preference matrix is computed once; only the
//! numeric matrix moves under feedback.

use crate::config::MatchConfig;
use crate::distance::{compute_similarity, PreferenceMatrix};
use crate::error::MatchError;
use crate::matrix::{FeedbackEvent, FeedbackReport, SimilarityMatrix};
use crate::rerank::{rank, rank_all_with, MatchResult};
use crate::schema::FeatureTable;
use tracing::info;

pub struct MatchSession {
    table: FeatureTable,
    matrix: SimilarityMatrix,
    preferences: PreferenceMatrix,
    config: MatchConfig,
    applied: usize,
}

impl MatchSession {
    pub fn new(table: FeatureTable, config: MatchConfig) -> Result<Self, MatchError> {
        config.validate()?;
        if table.is_empty() {
            return Err(MatchError::EmptyTable);
        }

        let matrix = compute_similarity(&table);
        let preferences = PreferenceMatrix::compute(&table);
        info!(users = table.len(), top_n = config.top_n, "similarity computed");

        Ok(Self {
            table,
            matrix,
            preferences,
            config,
            applied: 0,
        })
    }

    /// Apply events in order; unknown uids are skipped and counted
    pub fn apply_feedback(&mut self, events: &[FeedbackEvent]) -> Result<FeedbackReport, MatchError> {
        let report = self.matrix.apply_batch(&self.table, events)?;
        self.applied += report.applied;
        info!(
            applied = report.applied,
            skipped = report.skipped,
            total = self.applied,
            "feedback round applied"
        );
        Ok(report)
    }

    pub fn rank(&self, uid: &str) -> Result<MatchResult, MatchError> {
        rank(uid, &self.matrix, &self.table, self.config.top_n)
    }

    pub fn rank_all(&self) -> Result<Vec<MatchResult>, MatchError> {
        rank_all_with(&self.matrix, &self.table, &self.preferences, self.config.top_n)
    }

    pub fn table(&self) -> &FeatureTable {
        &self.table
    }

    pub fn matrix(&self) -> &SimilarityMatrix {
        &self.matrix
    }

    pub fn config(&self) -> &MatchConfig {
        &self.config
    }

    /// Feedback events applied so far
    pub fn applied(&self) -> usize {
        self.applied
    }
}

/// The two scripted feedback rounds over the first three users
///
/// Round one: u0 accepts u1, u0 rejects u2, u1 accepts u0.
/// Round two: u0 accepts u2, u1 rejects u0.
pub fn simulation_rounds(table: &FeatureTable) -> Result<[Vec<FeedbackEvent>; 2], MatchError> {
    let uids: Vec<&str> = table.uids().take(3).collect();
    let [u0, u1, u2] = uids[..] else {
        return Err(MatchError::InsufficientUids {
            required: 3,
            found: uids.len(),
        });
    };

    Ok([
        vec![
            FeedbackEvent::accept(u0, u1),
            FeedbackEvent::reject(u0, u2),
            FeedbackEvent::accept(u1, u0),
        ],
        vec![FeedbackEvent::accept(u0, u2), FeedbackEvent::reject(u1, u0)],
    ])
}
