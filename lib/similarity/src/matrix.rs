//! Similarity matrix and feedback adjustment
//!
//! The matrix is square over the feature table's population, indexed by
//! row position. Feedback scales both directions of a pair, then every
//! cell is clamped back into [0.0, 1.0].

use crate::error::MatchError;
use crate::schema::FeatureTable;
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;
use tracing::{debug, warn};

pub const ACCEPT_FACTOR: f32 = 1.2;
pub const REJECT_FACTOR: f32 = 0.8;

/// Dense n×n similarity matrix in row-major order
#[derive(Debug, Clone, PartialEq)]
pub struct SimilarityMatrix {
    n: usize,
    data: Vec<f32>,
}

impl SimilarityMatrix {
    pub fn zeros(n: usize) -> Self {
        Self {
            n,
            data: vec![0.0; n * n],
        }
    }

    pub(crate) fn from_raw(n: usize, data: Vec<f32>) -> Self {
        debug_assert_eq!(data.len(), n * n);
        Self { n, data }
    }

    /// Build from nested rows; every row must be `rows.len()` wide
    pub fn from_rows(rows: Vec<Vec<f32>>) -> Result<Self, MatchError> {
        let n = rows.len();
        let mut data = Vec::with_capacity(n * n);
        for row in rows {
            if row.len() != n {
                return Err(MatchError::DimensionMismatch {
                    expected: n,
                    actual: row.len(),
                });
            }
            data.extend(row);
        }
        Ok(Self { n, data })
    }

    pub fn len(&self) -> usize {
        self.n
    }

    pub fn is_empty(&self) -> bool {
        self.n == 0
    }

    #[inline]
    pub fn get(&self, i: usize, j: usize) -> f32 {
        self.data[i * self.n + j]
    }

    #[inline]
    pub(crate) fn set(&mut self, i: usize, j: usize, value: f32) {
        self.data[i * self.n + j] = value;
    }

    pub fn row(&self, i: usize) -> &[f32] {
        &self.data[i * self.n..(i + 1) * self.n]
    }

    /// Clamp every cell to [0.0, 1.0]; NaN becomes 0.0
    pub fn clamp(&mut self) {
        for cell in &mut self.data {
            *cell = if cell.is_nan() { 0.0 } else { cell.clamp(0.0, 1.0) };
        }
    }

    pub fn is_symmetric(&self, tolerance: f32) -> bool {
        (0..self.n).all(|i| {
            (i + 1..self.n).all(|j| (self.get(i, j) - self.get(j, i)).abs() <= tolerance)
        })
    }

    /// Scale the (actor, candidate) pair by the event's factor
    ///
    /// Both directions are scaled; a self-event scales the diagonal cell
    /// twice. Unknown uids are an error and leave the matrix untouched.
    pub fn apply_feedback(
        &mut self,
        table: &FeatureTable,
        event: &FeedbackEvent,
    ) -> Result<(), MatchError> {
        if self.n != table.len() {
            return Err(MatchError::DimensionMismatch {
                expected: table.len(),
                actual: self.n,
            });
        }
        let i = table
            .index_of(&event.actor_uid)
            .ok_or_else(|| MatchError::UnknownUid(event.actor_uid.clone()))?;
        let j = table
            .index_of(&event.candidate_uid)
            .ok_or_else(|| MatchError::UnknownUid(event.candidate_uid.clone()))?;

        let factor = event.action.factor();
        self.set(i, j, self.get(i, j) * factor);
        self.set(j, i, self.get(j, i) * factor);
        self.clamp();

        debug!(
            actor = %event.actor_uid,
            candidate = %event.candidate_uid,
            action = %event.action,
            score = self.get(i, j),
            "feedback applied"
        );
        Ok(())
    }

    /// Apply events in order, skipping any that name an unknown uid
    pub fn apply_batch(
        &mut self,
        table: &FeatureTable,
        events: &[FeedbackEvent],
    ) -> Result<FeedbackReport, MatchError> {
        let mut report = FeedbackReport::default();
        for event in events {
            match self.apply_feedback(table, event) {
                Ok(()) => report.applied += 1,
                Err(MatchError::UnknownUid(uid)) => {
                    warn!(%uid, "feedback names an unknown uid, skipped");
                    report.skipped += 1;
                }
                Err(e) => return Err(e),
            }
        }
        Ok(report)
    }

    pub fn into_shared(self) -> SharedSimilarity {
        Arc::new(RwLock::new(self))
    }
}

/// A matrix shared between readers and a feedback writer
pub type SharedSimilarity = Arc<RwLock<SimilarityMatrix>>;

/// Apply a batch under the write lock
pub fn apply_shared(
    shared: &SharedSimilarity,
    table: &FeatureTable,
    events: &[FeedbackEvent],
) -> Result<FeedbackReport, MatchError> {
    shared.write().apply_batch(table, events)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FeedbackAction {
    Accept,
    Reject,
}

impl FeedbackAction {
    pub fn factor(self) -> f32 {
        match self {
            FeedbackAction::Accept => ACCEPT_FACTOR,
            FeedbackAction::Reject => REJECT_FACTOR,
        }
    }

    pub fn as_i8(self) -> i8 {
        match self {
            FeedbackAction::Accept => 1,
            FeedbackAction::Reject => -1,
        }
    }
}

impl TryFrom<i8> for FeedbackAction {
    type Error = MatchError;

    fn try_from(value: i8) -> Result<Self, Self::Error> {
        match value {
            1 => Ok(FeedbackAction::Accept),
            -1 => Ok(FeedbackAction::Reject),
            other => Err(MatchError::InvalidConfig(format!(
                "feedback action must be +1 or -1, got {other}"
            ))),
        }
    }
}

impl fmt::Display for FeedbackAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            FeedbackAction::Accept => "accept",
            FeedbackAction::Reject => "reject",
        })
    }
}

/// One user's reaction to a proposed match
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeedbackEvent {
    pub actor_uid: String,
    pub candidate_uid: String,
    pub action: FeedbackAction,
}

impl FeedbackEvent {
    pub fn new(
        actor_uid: impl Into<String>,
        candidate_uid: impl Into<String>,
        action: FeedbackAction,
    ) -> Self {
        Self {
            actor_uid: actor_uid.into(),
            candidate_uid: candidate_uid.into(),
            action,
        }
    }

    pub fn accept(actor_uid: impl Into<String>, candidate_uid: impl Into<String>) -> Self {
        Self::new(actor_uid, candidate_uid, FeedbackAction::Accept)
    }

    pub fn reject(actor_uid: impl Into<String>, candidate_uid: impl Into<String>) -> Self {
        Self::new(actor_uid, candidate_uid, FeedbackAction::Reject)
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FeedbackReport {
    pub applied: usize,
    pub skipped: usize,
}

impl std::ops::AddAssign for FeedbackReport {
    fn add_assign(&mut self, other: Self) {
        self.applied += other.applied;
        self.skipped += other.skipped;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::{FeatureRow, FeatureSchema};

    fn table(uids: &[&str]) -> FeatureTable {
        let schema = FeatureSchema::new(vec!["music".into()], vec![], vec![]);
        let rows = uids.iter().map(|uid| FeatureRow {
            uid: uid.to_string(),
            interests: vec![1],
            traits: vec![],
            preferences: vec![],
        });
        FeatureTable::from_rows(schema, rows)
    }

    fn matrix() -> SimilarityMatrix {
        SimilarityMatrix::from_rows(vec![
            vec![1.0, 0.5, 0.9],
            vec![0.5, 1.0, 0.25],
            vec![0.9, 0.25, 1.0],
        ])
        .unwrap()
    }

    #[test]
    fn test_accept_scales_both_directions() {
        let t = table(&["a", "b", "c"]);
        let mut m = matrix();
        m.apply_feedback(&t, &FeedbackEvent::accept("a", "b")).unwrap();
        assert!((m.get(0, 1) - 0.6).abs() < 1e-6);
        assert!((m.get(1, 0) - 0.6).abs() < 1e-6);
        assert_eq!(m.get(1, 2), 0.25);
    }

    #[test]
    fn test_accept_clamps_at_one() {
        let t = table(&["a", "b", "c"]);
        let mut m = matrix();
        m.apply_feedback(&t, &FeedbackEvent::accept("a", "c")).unwrap();
        assert_eq!(m.get(0, 2), 1.0);
        assert_eq!(m.get(2, 0), 1.0);
    }

    #[test]
    fn test_single_event_moves_strictly() {
        let t = table(&["a", "b", "c"]);
        let mut m = matrix();

        let mut last = m.get(1, 2);
        while last < 1.0 / ACCEPT_FACTOR {
            m.apply_feedback(&t, &FeedbackEvent::accept("b", "c")).unwrap();
            let now = m.get(1, 2);
            assert!(now > last, "accept kept {} at {}", last, now);
            last = now;
        }
        m.apply_feedback(&t, &FeedbackEvent::accept("b", "c")).unwrap();
        assert_eq!(m.get(1, 2), 1.0);

        let mut last = m.get(0, 1);
        for _ in 0..20 {
            m.apply_feedback(&t, &FeedbackEvent::reject("a", "b")).unwrap();
            let now = m.get(0, 1);
            assert!(now < last && now > 0.0);
            last = now;
        }
        assert!(m.is_symmetric(1e-6));
    }

    #[test]
    fn test_reject_then_accept() {
        let t = table(&["a", "b", "c"]);
        let mut m = matrix();
        m.apply_feedback(&t, &FeedbackEvent::reject("b", "c")).unwrap();
        assert!((m.get(1, 2) - 0.2).abs() < 1e-6);
        m.apply_feedback(&t, &FeedbackEvent::accept("c", "b")).unwrap();
        assert!((m.get(2, 1) - 0.24).abs() < 1e-6);
        assert!(m.is_symmetric(1e-6));
    }

    #[test]
    fn test_self_event_scales_diagonal_twice() {
        let t = table(&["a", "b", "c"]);
        let mut m = matrix();
        m.apply_feedback(&t, &FeedbackEvent::reject("a", "a")).unwrap();
        assert!((m.get(0, 0) - 0.64).abs() < 1e-6);
    }

    #[test]
    fn test_unknown_uid_leaves_matrix_unchanged() {
        let t = table(&["a", "b", "c"]);
        let mut m = matrix();
        let before = m.clone();
        let err = m.apply_feedback(&t, &FeedbackEvent::accept("a", "zz")).unwrap_err();
        assert!(matches!(err, MatchError::UnknownUid(uid) if uid == "zz"));
        assert_eq!(m, before);
    }

    #[test]
    fn test_batch_skips_unknown() {
        let t = table(&["a", "b", "c"]);
        let mut m = matrix();
        let report = m
            .apply_batch(
                &t,
                &[
                    FeedbackEvent::accept("a", "b"),
                    FeedbackEvent::reject("ghost", "b"),
                    FeedbackEvent::accept("a", "b"),
                ],
            )
            .unwrap();
        assert_eq!(report, FeedbackReport { applied: 2, skipped: 1 });
        assert!((m.get(0, 1) - 0.72).abs() < 1e-6);
    }

    #[test]
    fn test_dimension_mismatch() {
        let t = table(&["a", "b"]);
        let mut m = matrix();
        let err = m.apply_feedback(&t, &FeedbackEvent::accept("a", "b")).unwrap_err();
        assert!(matches!(err, MatchError::DimensionMismatch { expected: 2, actual: 3 }));
    }

    #[test]
    fn test_from_rows_rejects_ragged() {
        let err = SimilarityMatrix::from_rows(vec![vec![1.0, 0.0], vec![0.0]]).unwrap_err();
        assert!(matches!(err, MatchError::DimensionMismatch { .. }));
    }

    #[test]
    fn test_clamp_handles_nan_and_range() {
        let mut m = SimilarityMatrix::from_rows(vec![vec![f32::NAN, 1.5], vec![-0.2, 0.3]]).unwrap();
        m.clamp();
        assert_eq!(m.row(0), &[0.0, 1.0]);
        assert_eq!(m.row(1), &[0.0, 0.3]);
    }

    #[test]
    fn test_action_conversion() {
        assert_eq!(FeedbackAction::try_from(1i8).unwrap(), FeedbackAction::Accept);
        assert_eq!(FeedbackAction::try_from(-1i8).unwrap(), FeedbackAction::Reject);
        assert!(FeedbackAction::try_from(0i8).is_err());
        assert_eq!(FeedbackAction::Reject.as_i8(), -1);
    }

    #[test]
    fn test_shared_matrix_writer() {
        let t = table(&["a", "b", "c"]);
        let shared = matrix().into_shared();
        let reader = Arc::clone(&shared);
        apply_shared(&shared, &t, &[FeedbackEvent::accept("b", "c")]).unwrap();
        assert!((reader.read().get(1, 2) - 0.3).abs() < 1e-6);
    }
}
