use serde::{Deserialize, Serialize};

/// A dense numeric feature vector
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct FeatureVector {
    data: Vec<f32>,
}

impl FeatureVector {
    #[inline]
    #[must_use]
    pub fn new(data: Vec<f32>) -> Self {
        Self { data }
    }

    /// Build from integer scores
    #[must_use]
    pub fn from_scores(scores: &[u8]) -> Self {
        Self {
            data: scores.iter().map(|&s| f32::from(s)).collect(),
        }
    }

    #[inline]
    #[must_use]
    pub fn dim(&self) -> usize {
        self.data.len()
    }

    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    #[inline]
    #[must_use]
    pub fn as_slice(&self) -> &[f32] {
        &self.data
    }

    /// Dot product with two accumulators for better pipelining
    #[inline]
    pub fn dot(&self, other: &FeatureVector) -> f32 {
        if self.dim() != other.dim() {
            return 0.0;
        }

        let mut even = 0.0f32;
        let mut odd = 0.0f32;
        for (a, b) in self.data.chunks_exact(2).zip(other.data.chunks_exact(2)) {
            even += a[0] * b[0];
            odd += a[1] * b[1];
        }
        if self.dim() % 2 == 1 {
            even += self.data[self.dim() - 1] * other.data[other.dim() - 1];
        }
        even + odd
    }

    #[inline]
    pub fn norm(&self) -> f32 {
        self.data.iter().map(|x| x * x).sum::<f32>().sqrt()
    }

    /// Compute cosine similarity with another vector
    ///
    /// Returns 0.0 when the dimensions differ or either vector is all-zero,
    /// so a zero vector is not similar even to itself.
    #[inline]
    pub fn cosine_similarity(&self, other: &FeatureVector) -> f32 {
        if self.dim() != other.dim() {
            return 0.0;
        }

        let norm_a = self.norm();
        let norm_b = other.norm();

        if norm_a == 0.0 || norm_b == 0.0 {
            return 0.0;
        }

        self.dot(other) / (norm_a * norm_b)
    }
}
