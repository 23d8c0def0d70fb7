use crate::prelude::{TransformError, TransformResult};
use std::num::NonZeroUsize;

/// Row-skipping factor. Position `i` (0-based) is kept iff `i % n == 0`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Stride(NonZeroUsize);

impl Stride {
    pub const ALL: Stride = Stride(NonZeroUsize::MIN);

    pub fn new(n: usize) -> TransformResult<Self> {
        NonZeroUsize::new(n)
            .map(Stride)
            .ok_or(TransformError::InvalidStride(n))
    }

    pub fn get(&self) -> usize {
        self.0.get()
    }

    pub fn keeps(&self, index: usize) -> bool {
        index % self.0.get() == 0
    }

    /// Positions retained out of `len` rows, in order.
    pub fn retained(&self, len: usize) -> impl Iterator<Item = usize> {
        (0..len).step_by(self.0.get())
    }
}

impl Default for Stride {
    fn default() -> Self {
        Self::ALL
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stride_keeps_first_row_and_every_nth_after() {
        let stride = Stride::new(20).unwrap();
        assert!(stride.keeps(0));
        assert!(!stride.keeps(19));
        assert!(stride.keeps(20));
        assert_eq!(stride.retained(45).collect::<Vec<_>>(), vec![0, 20, 40]);
    }

    #[test]
    fn unit_stride_keeps_everything() {
        assert_eq!(Stride::ALL.retained(3).collect::<Vec<_>>(), vec![0, 1, 2]);
        assert_eq!(Stride::default().get(), 1);
    }

    #[test]
    fn retained_agrees_with_keeps() {
        let stride = Stride::new(7).unwrap();
        let via_keeps: Vec<_> = (0..50).filter(|&i| stride.keeps(i)).collect();
        assert_eq!(stride.retained(50).collect::<Vec<_>>(), via_keeps);
    }
}
