mod array;
mod display;
mod element;
mod errors;
mod iters;
mod layout;
mod ops;
mod property_tests;
mod view;

pub use array::NdArray;
pub use element::Element;
pub use errors::AxisError;
pub use iters::{align_target_strides, aligned_target_stride, AxisIter, Indexer, PairedAxisIter};
pub use layout::{normalize_axis, Layout, MAX_RANK};
pub use ops::fold::fold_into;
pub use view::{ArrayView, ArrayViewMut, RawView};
