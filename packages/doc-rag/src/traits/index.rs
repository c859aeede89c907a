//! Similarity index abstraction.
//!
//! The index stores fixed-width vectors by insertion position. Callers keep
//! any per-vector metadata in a parallel array addressed by that position.

use crate::error::Result;

/// Inner-product similarity search over fixed-width vectors.
pub trait SimilarityIndex: Send + Sync {
    /// Width of every stored vector.
    fn dimension(&self) -> usize;

    /// Number of stored vectors.
    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Append vectors. Every vector must match [`dimension`](Self::dimension).
    fn add(&mut self, vectors: Vec<Vec<f32>>) -> Result<()>;

    /// Return up to `k` `(position, score)` pairs, highest score first.
    ///
    /// Equal scores keep insertion order. A query of the wrong width is an
    /// error, never a silent truncation.
    fn search(&self, query: &[f32], k: usize) -> Result<Vec<(usize, f32)>>;
}

/// Inner product of two equal-width vectors.
pub fn inner_product(a: &[f32], b: &[f32]) -> f32 {
    a.iter().zip(b.iter()).map(|(x, y)| x * y).sum()
}

/// Scale `vector` to unit length in place. Zero vectors are left alone.
pub fn l2_normalize(vector: &mut [f32]) {
    let norm = vector.iter().map(|x| x * x).sum::<f32>().sqrt();
    if norm > 0.0 {
        for x in vector.iter_mut() {
            *x /= norm;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalized_inner_product_is_cosine() {
        let mut a = vec![3.0, 4.0];
        let mut b = vec![6.0, 8.0];
        l2_normalize(&mut a);
        l2_normalize(&mut b);

        assert!((inner_product(&a, &b) - 1.0).abs() < 1e-6);
        assert!((a[0] - 0.6).abs() < 1e-6);
    }

    #[test]
    fn test_zero_vector_stays_zero() {
        let mut v = vec![0.0, 0.0, 0.0];
        l2_normalize(&mut v);
        assert_eq!(v, vec![0.0, 0.0, 0.0]);
    }
}
