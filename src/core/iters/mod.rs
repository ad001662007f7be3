mod axis;
mod indexer;
mod paired;

pub use axis::AxisIter;
pub use indexer::Indexer;
pub use paired::{align_target_strides, aligned_target_stride, PairedAxisIter};
