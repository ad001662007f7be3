use crate::core::errors::*;
use anyhow::{bail, Result};
use std::collections::HashSet;

/// Largest number of dimensions a [`Layout`] can describe.
pub const MAX_RANK: usize = 32;

/// Shape and byte strides of an N-dimensional array, stored inline.
///
/// Capacity is fixed at [`MAX_RANK`] so that building or compacting a layout
/// never allocates. Only the first `rank` entries of each array are
/// meaningful; the rest stay zero.
#[derive(Copy, Clone)]
pub struct Layout {
    rank: usize,
    sizes: [usize; MAX_RANK],
    strides: [isize; MAX_RANK],
}

impl Layout {
    pub fn new(sizes: &[usize], strides: &[isize]) -> Result<Layout> {
        valid_rank(sizes.len())?;

        if sizes.len() != strides.len() {
            bail!(LayoutError::StridesLength {
                num_strides: strides.len(),
                num_dimensions: sizes.len(),
            });
        }

        valid_extent(sizes, 1)?;
        let layout = Layout::from_parts(sizes, strides);
        if layout.reach().is_none() {
            bail!(LayoutError::StrideOverflow {
                sizes: sizes.to_vec(),
                strides: strides.to_vec(),
            });
        }

        Ok(layout)
    }

    /// Row-major layout for elements of `itemsize` bytes.
    pub fn contiguous(sizes: &[usize], itemsize: usize) -> Result<Layout> {
        valid_rank(sizes.len())?;
        valid_extent(sizes, itemsize)?;
        Ok(Layout::row_major(sizes, itemsize))
    }

    // Rank and extent already checked, so the running product fits.
    pub(crate) fn row_major(sizes: &[usize], itemsize: usize) -> Layout {
        let mut strides = [0; MAX_RANK];
        let mut current = itemsize as isize;
        for (d, &size) in sizes.iter().enumerate().rev() {
            strides[d] = current;
            current *= size as isize;
        }

        Layout::from_parts(sizes, &strides[..sizes.len()])
    }

    pub fn scalar() -> Layout {
        Layout::from_parts(&[], &[])
    }

    // Callers have already checked rank and lengths.
    pub(crate) fn from_parts(sizes: &[usize], strides: &[isize]) -> Layout {
        debug_assert!(sizes.len() <= MAX_RANK && sizes.len() == strides.len());

        let mut layout = Layout {
            rank: sizes.len(),
            sizes: [0; MAX_RANK],
            strides: [0; MAX_RANK],
        };
        layout.sizes[..sizes.len()].copy_from_slice(sizes);
        layout.strides[..strides.len()].copy_from_slice(strides);
        layout
    }

    // --- Attributes ---

    pub fn rank(&self) -> usize {
        self.rank
    }

    pub fn sizes(&self) -> &[usize] {
        &self.sizes[..self.rank]
    }

    pub fn strides(&self) -> &[isize] {
        &self.strides[..self.rank]
    }

    pub fn numel(&self) -> usize {
        self.sizes().iter().product()
    }

    /// Byte offset of `indices` from the base of the array.
    pub fn offset(&self, indices: &[usize]) -> isize {
        self.strides()
            .iter()
            .zip(indices)
            .map(|(&stride, &index)| stride * index as isize)
            .sum()
    }

    /// Lowest and highest offsets reachable from the base, or `None` if
    /// they overflow. Both are 0 for an empty layout.
    pub(crate) fn reach(&self) -> Option<(isize, isize)> {
        if self.numel() == 0 {
            return Some((0, 0));
        }

        self.sizes()
            .iter()
            .zip(self.strides())
            .try_fold((0isize, 0isize), |(low, high), (&size, &stride)| {
                let span = isize::try_from(size - 1).ok()?.checked_mul(stride)?;
                Some((low.checked_add(span.min(0))?, high.checked_add(span.max(0))?))
            })
    }

    pub fn is_contiguous(&self, itemsize: usize) -> bool {
        let mut expected = itemsize as isize;
        for d in (0..self.rank).rev() {
            if self.sizes[d] != 1 && self.strides[d] != expected {
                return false;
            }
            expected *= self.sizes[d] as isize;
        }

        true
    }

    // --- Layout operations ---

    /// Compacts the layout into one of rank `rank - 1`, dropping `axis` and
    /// keeping the remaining dimensions in order.
    ///
    /// # Panics
    ///
    /// Panics if `axis >= self.rank()`.
    pub fn remove_axis(&self, axis: usize) -> Layout {
        assert!(axis < self.rank, "axis {axis} out of range for rank {}", self.rank);

        let mut layout = Layout {
            rank: self.rank - 1,
            sizes: [0; MAX_RANK],
            strides: [0; MAX_RANK],
        };

        let mut j = 0;
        for i in (0..self.rank).filter(|&i| i != axis) {
            layout.sizes[j] = self.sizes[i];
            layout.strides[j] = self.strides[i];
            j += 1;
        }

        layout
    }

    pub fn permute(&self, permutation: &[usize]) -> Result<Layout> {
        self.valid_permutation(permutation)?;

        let mut layout = *self;
        for (i, &p) in permutation.iter().enumerate() {
            layout.sizes[i] = self.sizes[p];
            layout.strides[i] = self.strides[p];
        }

        Ok(layout)
    }

    pub(crate) fn with_axis(&self, axis: usize, size: usize, stride: isize) -> Layout {
        let mut layout = *self;
        layout.sizes[axis] = size;
        layout.strides[axis] = stride;
        layout
    }

    // --- Validation ---

    pub(crate) fn valid_axis(&self, axis: isize) -> Result<usize, AxisError> {
        normalize_axis(axis, self.rank)
    }

    pub(crate) fn valid_permutation(&self, permutation: &[usize]) -> Result<(), AxisError> {
        if permutation.len() != self.rank {
            return Err(AxisError::PermutationLength {
                num_axes: permutation.len(),
                rank: self.rank,
            });
        }

        let mut set = HashSet::with_capacity(permutation.len());
        for &axis in permutation {
            if axis >= self.rank {
                return Err(AxisError::OutOfRange {
                    axis: axis as isize,
                    rank: self.rank,
                });
            } else if !set.insert(axis) {
                return Err(AxisError::Repetition(axis));
            }
        }

        Ok(())
    }

    /// Checks that `target` has this layout's shape with `axis` removed.
    pub(crate) fn valid_reduced(&self, target: &Layout, axis: usize) -> Result<(), PairedShapeError> {
        let matches = axis < self.rank
            && target.rank + 1 == self.rank
            && target.sizes() == self.remove_axis(axis).sizes();

        if matches {
            Ok(())
        } else {
            Err(PairedShapeError {
                source_shape: self.sizes().to_vec(),
                target_shape: target.sizes().to_vec(),
                axis,
            })
        }
    }
}

impl PartialEq for Layout {
    fn eq(&self, rhs: &Layout) -> bool {
        self.sizes() == rhs.sizes() && self.strides() == rhs.strides()
    }
}

impl std::fmt::Debug for Layout {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Layout")
            .field("sizes", &self.sizes())
            .field("strides", &self.strides())
            .finish()
    }
}

pub(crate) fn valid_rank(rank: usize) -> Result<(), RankError> {
    if rank > MAX_RANK {
        Err(RankError::TooLarge {
            rank,
            max_rank: MAX_RANK,
        })
    } else {
        Ok(())
    }
}

/// Element count of `sizes`, once the non-empty dimensions times `itemsize`
/// are known to fit in `isize` bytes. Row-major strides of such a shape
/// cannot overflow.
pub(crate) fn valid_extent(sizes: &[usize], itemsize: usize) -> Result<usize, LayoutError> {
    let bytes = sizes
        .iter()
        .filter(|&&size| size != 0)
        .try_fold(itemsize.max(1), |bytes, &size| bytes.checked_mul(size));

    match bytes {
        Some(bytes) if bytes <= isize::MAX as usize => Ok(sizes.iter().product()),
        _ => Err(LayoutError::TooLarge {
            sizes: sizes.to_vec(),
        }),
    }
}

/// Resolves a possibly negative axis (counted from the end) against `rank`.
pub fn normalize_axis(axis: isize, rank: usize) -> Result<usize, AxisError> {
    let resolved = if axis < 0 { axis + rank as isize } else { axis };

    if (0..rank as isize).contains(&resolved) {
        Ok(resolved as usize)
    } else {
        Err(AxisError::OutOfRange { axis, rank })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn contiguous_strides() {
        let layout = Layout::contiguous(&[2, 3, 4], 8).unwrap();
        assert_eq!(layout.strides(), &[96, 32, 8]);
        assert_eq!(layout.numel(), 24);
        assert!(layout.is_contiguous(8));
        assert!(!layout.is_contiguous(4));
    }

    #[test]
    fn remove_axis_keeps_order() {
        let layout = Layout::new(&[2, 3, 4], &[96, 32, 8]).unwrap();
        let reduced = layout.remove_axis(1);
        assert_eq!(reduced.sizes(), &[2, 4]);
        assert_eq!(reduced.strides(), &[96, 8]);

        let reduced = layout.remove_axis(0).remove_axis(1);
        assert_eq!(reduced.sizes(), &[3]);
        assert_eq!(reduced.strides(), &[32]);
    }

    #[test]
    fn rank_limit() {
        let sizes = vec![1; MAX_RANK + 1];
        let strides = vec![1; MAX_RANK + 1];
        assert!(Layout::new(&sizes, &strides).is_err());
        assert!(Layout::new(&sizes[..MAX_RANK], &strides[..MAX_RANK]).is_ok());
        assert!(Layout::new(&[2, 3], &[1]).is_err());
    }

    #[test]
    fn oversized_shapes() {
        let half = usize::MAX / 2;
        assert!(Layout::new(&[half, 4], &[1, 1]).is_err());
        assert!(Layout::contiguous(&[half, 2], 8).is_err());
        assert!(Layout::new(&[3, 2], &[isize::MAX, 1]).is_err());

        // Empty, so only the non-empty dimensions count.
        assert!(Layout::contiguous(&[0, half / 8], 8).is_ok());
        assert_eq!(valid_extent(&[half / 2, 0, 2], 1).unwrap(), 0);
        assert!(valid_extent(&[half, 0, 4], 1).is_err());

        let layout = Layout::new(&[3, 4], &[-16, 4]).unwrap();
        assert_eq!(layout.reach(), Some((-32, 12)));
    }

    #[test]
    fn negative_axes() {
        assert_eq!(normalize_axis(-1, 3).unwrap(), 2);
        assert_eq!(normalize_axis(-3, 3).unwrap(), 0);
        assert_eq!(normalize_axis(2, 3).unwrap(), 2);
        assert!(normalize_axis(3, 3).is_err());
        assert!(normalize_axis(-4, 3).is_err());
        assert!(normalize_axis(0, 0).is_err());
    }

    #[test]
    fn permutation() {
        let layout = Layout::contiguous(&[2, 3, 4], 1).unwrap();
        let permuted = layout.permute(&[2, 0, 1]).unwrap();
        assert_eq!(permuted.sizes(), &[4, 2, 3]);
        assert_eq!(permuted.strides(), &[1, 12, 4]);

        assert!(layout.permute(&[0, 1]).is_err());
        assert!(layout.permute(&[0, 1, 1]).is_err());
        assert!(layout.permute(&[0, 1, 3]).is_err());
    }

    #[test]
    fn reduced_shape_check() {
        let source = Layout::contiguous(&[2, 3, 4], 8).unwrap();
        let target = Layout::contiguous(&[2, 4], 8).unwrap();
        assert!(source.valid_reduced(&target, 1).is_ok());
        assert!(source.valid_reduced(&target, 0).is_err());
        assert!(source.valid_reduced(&source, 1).is_err());
    }
}
