//! Property-based tests for the axis iterators and the reductions built on
//! them, using proptest over random shapes, strides and axes.

#[cfg(test)]
mod tests {
    use crate::core::iters::Indexer;
    use crate::{AxisIter, Layout, NdArray, PairedAxisIter, RawView};
    use proptest::prelude::*;
    use std::collections::HashSet;

    // Shape with 1-4 dims (sizes may be 0), matching strides, and an axis.
    fn layout_strategy() -> impl Strategy<Value = (Vec<usize>, Vec<isize>, usize)> {
        prop::collection::vec((0usize..5, -64isize..64), 1..=4).prop_flat_map(|dims| {
            let rank = dims.len();
            let (sizes, strides): (Vec<usize>, Vec<isize>) = dims.into_iter().unzip();
            (Just(sizes), Just(strides), 0..rank)
        })
    }

    fn raw(sizes: &[usize], strides: &[isize]) -> RawView {
        RawView::new(std::ptr::null_mut(), Layout::new(sizes, strides).unwrap(), 1)
    }

    fn product_except(sizes: &[usize], skip: usize) -> usize {
        sizes
            .iter()
            .enumerate()
            .filter(|&(d, _)| d != skip)
            .map(|(_, &s)| s)
            .product()
    }

    fn dot(indices: &[usize], strides: &[isize]) -> isize {
        indices
            .iter()
            .zip(strides)
            .map(|(&i, &s)| i as isize * s)
            .sum()
    }

    proptest! {
        #[test]
        fn prop_axis_visits_outer_space_in_order((sizes, strides, axis) in layout_strategy()) {
            let mut it = AxisIter::new(&raw(&sizes, &strides), axis);
            prop_assert_eq!(it.total(), product_except(&sizes, axis));

            let outer = it.outer().sizes().to_vec();
            let outer_strides = it.outer().strides().to_vec();
            let mut expected = Indexer::new(&outer);

            while !it.is_exhausted() {
                prop_assert_eq!(Some(it.indices().to_vec()), expected.next());
                prop_assert_eq!(it.offset(), dot(it.indices(), &outer_strides));
                it.advance();
            }

            prop_assert_eq!(expected.next(), None);
            prop_assert_eq!(it.completed(), it.total());
        }

        #[test]
        fn prop_paired_tracks_both_pointers(
            (sizes, strides, axis) in layout_strategy(),
            fast in 0usize..4,
            target_scale in 1isize..5,
        ) {
            let rank = sizes.len();
            let fast_axis = fast % rank;

            let source = Layout::new(&sizes, &strides).unwrap();
            let reduced = source.remove_axis(axis);
            let target_strides: Vec<isize> =
                reduced.strides().iter().map(|s| s * target_scale + 1).collect();

            let mut it = PairedAxisIter::new(
                &raw(&sizes, &strides),
                &raw(reduced.sizes(), &target_strides),
                axis,
                fast_axis,
            );
            prop_assert_eq!(it.total(), product_except(&sizes, fast_axis));
            prop_assert_eq!(it.target_strides()[axis], 0);
            prop_assert_eq!(it.target_stride(), it.target_strides()[fast_axis]);

            let aligned = it.target_strides().to_vec();
            let mut seen = HashSet::new();

            while !it.is_exhausted() {
                prop_assert_eq!(it.indices()[fast_axis], 0);
                prop_assert!(it.indices().iter().zip(&sizes).all(|(&i, &s)| i < s.max(1)));
                prop_assert_eq!(it.offset(), dot(it.indices(), &strides));
                prop_assert_eq!(it.target_offset(), dot(it.indices(), &aligned));
                prop_assert!(seen.insert(it.indices().to_vec()));
                it.advance();
            }

            prop_assert_eq!(seen.len(), it.total());
        }

        #[test]
        fn prop_reductions_match_indexer(
            sizes in prop::collection::vec(1usize..5, 1..=4),
            axis_seed in 0usize..4,
            fast_seed in 0usize..4,
            flip in any::<bool>(),
        ) {
            let rank = sizes.len();
            let axis = axis_seed % rank;
            let fast_axis = fast_seed % rank;

            let a = NdArray::<i64>::arange(&sizes).unwrap();
            let view = if flip { a.view().flip(0).unwrap() } else { a.view() };
            let copy = view.to_owned();

            // slow reference: one Indexer pass over every element
            let reduced = Layout::new(&sizes, &vec![0; rank]).unwrap().remove_axis(axis);
            let mut expected = NdArray::<i64>::zeros(reduced.sizes()).unwrap();
            for index in Indexer::new(&sizes) {
                let mut out_index = index.clone();
                out_index.remove(axis);
                let flat = Indexer::new(reduced.sizes())
                    .position(|i| i == out_index)
                    .unwrap();
                expected.data[flat] += copy.get(&index).unwrap();
            }

            let axis = axis as isize;
            prop_assert_eq!(&view.nansum(Some(axis)).unwrap(), &expected);
            prop_assert_eq!(&view.sum_axis(axis).unwrap(), &expected);
            prop_assert_eq!(
                &view.fold_axis_with(axis, fast_axis as isize, 0i64, |acc, v| acc + v).unwrap(),
                &expected
            );

            let total: i64 = copy.data().iter().sum();
            prop_assert_eq!(view.nansum(None).unwrap().item(), Some(total));
        }
    }
}
