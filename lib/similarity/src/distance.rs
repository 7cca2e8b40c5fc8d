//! Similarity functions
//!
//! Numeric similarity is the cosine of the (interest ++ trait) vectors.
//! Preference compatibility counts how many applicable preference checks a
//! pair passes. Both land in [0.0, 1.0] and are blended by [`combined_score`].

use crate::matrix::SimilarityMatrix;
use crate::schema::{FeatureRow, FeatureSchema, FeatureTable};
use brewmatch_core::{PreferenceFlag, RELIGION, SHARED_INTERESTS};
use rayon::prelude::*;

/// Weight of the numeric cosine similarity in the combined score.
pub const NUMERIC_WEIGHT: f32 = 0.7;

/// Weight of the preference compatibility in the combined score.
pub const PREFERENCE_WEIGHT: f32 = 0.3;

/// Minimum trait score that satisfies a "wants this trait" preference.
pub const TRAIT_THRESHOLD: u8 = 7;

/// Pairwise cosine similarity of every user's numeric vector
///
/// Self-pairs are included; an all-zero vector scores 0.0 everywhere,
/// including its own diagonal cell.
pub fn compute_similarity(table: &FeatureTable) -> SimilarityMatrix {
    let vectors: Vec<_> = table.rows().iter().map(FeatureRow::numeric_vector).collect();
    let n = vectors.len();
    let mut data = vec![0.0f32; n * n];

    data.par_chunks_mut(n.max(1))
        .take(n)
        .enumerate()
        .for_each(|(i, row)| {
            for (j, cell) in row.iter_mut().enumerate() {
                *cell = vectors[i].cosine_similarity(&vectors[j]);
            }
        });

    let mut matrix = SimilarityMatrix::from_raw(n, data);
    matrix.clamp();
    matrix
}

/// Preference compatibility of two users in [0.0, 1.0]
///
/// - shared interests: both want them 1, one wants them 0.5, neither 0
/// - religion: both flagged or both unflagged 1, otherwise 0
/// - each trait preference either side holds: 1 if the other side scores
///   at least [`TRAIT_THRESHOLD`] on that trait
///
/// The score is the total over the number of checks made.
pub fn compute_preference_score(schema: &FeatureSchema, a: &FeatureRow, b: &FeatureRow) -> f32 {
    let mut score = 0.0f32;
    let mut checks = 0u32;

    let flag = |row: &FeatureRow, name: &str| {
        schema.preference_index(name).and_then(|i| row.preference(i))
    };

    let wants_shared = |row: &FeatureRow| flag(row, SHARED_INTERESTS) == Some(PreferenceFlag::Yes);
    score += match (wants_shared(a), wants_shared(b)) {
        (true, true) => 1.0,
        (true, false) | (false, true) => 0.5,
        (false, false) => 0.0,
    };
    checks += 1;

    if flag(a, RELIGION).is_some() == flag(b, RELIGION).is_some() {
        score += 1.0;
    }
    checks += 1;

    for &(trait_idx, pref_idx) in schema.trait_preferences() {
        if a.preference(pref_idx) == Some(PreferenceFlag::Yes) {
            if b.trait_score(trait_idx) >= TRAIT_THRESHOLD {
                score += 1.0;
            }
            checks += 1;
        }
        if b.preference(pref_idx) == Some(PreferenceFlag::Yes) {
            if a.trait_score(trait_idx) >= TRAIT_THRESHOLD {
                score += 1.0;
            }
            checks += 1;
        }
    }

    if checks == 0 {
        0.0
    } else {
        score / checks as f32
    }
}

#[inline]
pub fn combined_score(numeric: f32, preference: f32) -> f32 {
    NUMERIC_WEIGHT * numeric + PREFERENCE_WEIGHT * preference
}

/// Preference scores for every ordered pair
///
/// Preferences never change during a session, so this is computed once
/// and reused across ranking rounds.
#[derive(Debug, Clone, PartialEq)]
pub struct PreferenceMatrix {
    n: usize,
    data: Vec<f32>,
}

impl PreferenceMatrix {
    pub fn compute(table: &FeatureTable) -> Self {
        let rows = table.rows();
        let schema = table.schema();
        let n = rows.len();

        let data = (0..n * n)
            .into_par_iter()
            .map(|k| compute_preference_score(schema, &rows[k / n], &rows[k % n]))
            .collect();

        Self { n, data }
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
}

#[cfg(test)]
mod tests {
    use super::*;

    fn schema() -> FeatureSchema {
        FeatureSchema::new(
            vec!["music".into(), "art".into()],
            vec!["humor".into(), "kindness".into()],
            vec![SHARED_INTERESTS.into(), RELIGION.into(), "humor".into(), "kindness".into()],
        )
    }

    fn row(uid: &str, numeric: [u8; 4], prefs: [Option<PreferenceFlag>; 4]) -> FeatureRow {
        FeatureRow {
            uid: uid.to_string(),
            interests: numeric[..2].to_vec(),
            traits: numeric[2..].to_vec(),
            preferences: prefs.to_vec(),
        }
    }

    const YES: Option<PreferenceFlag> = Some(PreferenceFlag::Yes);
    const REL: Option<PreferenceFlag> = Some(PreferenceFlag::Religious);

    #[test]
    fn test_no_preferences_set() {
        let s = schema();
        let a = row("a", [1, 2, 3, 4], [None; 4]);
        let b = row("b", [1, 2, 3, 4], [None; 4]);
        // shared 0/1 + religion 1/1
        assert!((compute_preference_score(&s, &a, &b) - 0.5).abs() < 1e-6);
    }

    #[test]
    fn test_shared_interest_half_credit() {
        let s = schema();
        let a = row("a", [0; 4], [YES, None, None, None]);
        let b = row("b", [0; 4], [None, None, None, None]);
        // (0.5 + 1) / 2
        assert!((compute_preference_score(&s, &a, &b) - 0.75).abs() < 1e-6);
    }

    #[test]
    fn test_religion_mismatch() {
        let s = schema();
        let a = row("a", [0; 4], [YES, REL, None, None]);
        let b = row("b", [0; 4], [YES, None, None, None]);
        assert!((compute_preference_score(&s, &a, &b) - 0.5).abs() < 1e-6);
    }

    #[test]
    fn test_trait_checks_each_direction() {
        let s = schema();
        // a wants humor, b has humor 8; b wants kindness, a has kindness 3
        let a = row("a", [0, 0, 0, 3], [None, None, YES, None]);
        let b = row("b", [0, 0, 8, 0], [None, None, None, YES]);
        // shared 0 + religion 1 + humor 1 + kindness 0 over 4 checks
        assert!((compute_preference_score(&s, &a, &b) - 0.5).abs() < 1e-6);

        // mutual want-same-trait is two checks
        let c = row("c", [0, 0, 7, 0], [None, None, YES, None]);
        let d = row("d", [0, 0, 9, 0], [None, None, YES, None]);
        assert!((compute_preference_score(&s, &c, &d) - 0.75).abs() < 1e-6);
    }

    #[test]
    fn test_missing_preference_columns_read_as_unset() {
        let s = FeatureSchema::new(vec!["music".into()], vec![], vec![]);
        let a = FeatureRow { uid: "a".into(), interests: vec![1], traits: vec![], preferences: vec![] };
        // shared 0 + religion 1 over 2 checks
        assert!((compute_preference_score(&s, &a, &a) - 0.5).abs() < 1e-6);
    }

    #[test]
    fn test_similarity_matrix() {
        let s = schema();
        let table = FeatureTable::from_rows(
            s,
            vec![
                row("a", [5, 5, 0, 0], [None; 4]),
                row("b", [5, 5, 0, 0], [None; 4]),
                row("c", [0, 0, 0, 0], [None; 4]),
                row("d", [0, 5, 0, 0], [None; 4]),
            ],
        );
        let m = compute_similarity(&table);
        assert_eq!(m.len(), 4);
        assert!((m.get(0, 1) - 1.0).abs() < 1e-6);
        assert!((m.get(0, 0) - 1.0).abs() < 1e-6);
        assert_eq!(m.get(0, 2), 0.0);
        assert_eq!(m.get(2, 2), 0.0);
        assert!((m.get(0, 3) - std::f32::consts::FRAC_1_SQRT_2).abs() < 1e-6);
        assert!(m.is_symmetric(1e-6));
    }

    #[test]
    fn test_preference_matrix_matches_pairwise() {
        let table = FeatureTable::from_rows(
            schema(),
            vec![
                row("a", [0, 0, 0, 3], [None, None, YES, None]),
                row("b", [0, 0, 8, 0], [YES, REL, None, YES]),
            ],
        );
        let prefs = PreferenceMatrix::compute(&table);
        let rows = table.rows();
        assert_eq!(prefs.get(0, 1), compute_preference_score(table.schema(), &rows[0], &rows[1]));
        assert_eq!(prefs.get(1, 0), compute_preference_score(table.schema(), &rows[1], &rows[0]));
    }

    #[test]
    fn test_combined_weights() {
        assert!((combined_score(1.0, 1.0) - 1.0).abs() < 1e-6);
        assert!((combined_score(1.0, 0.0) - 0.7).abs() < 1e-6);
        assert!((combined_score(0.0, 1.0) - 0.3).abs() < 1e-6);
    }
}
