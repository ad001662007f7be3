/*!
Strided traversal of N-dimensional arrays with one axis held out.

[`AxisIter`] walks every lane of an array along a chosen axis, moving a byte
pointer with a mixed-radix carry instead of recomputing offsets.
[`PairedAxisIter`] walks a source array together with a target of one lower
rank, which is what a reduction writes into, and lets the inner loop run
along a different "fast" axis than the one being reduced.

On top of the iterators sit NaN-aware per-axis reductions on [`ArrayView`]
(`nansum`, `nanmean`, `nanvar`, `nanmin`, `nanargmax`, `median`, ...) and
paired folds (`fold_axis`, `sum_axis`, `max_axis`, ...).

```
use axiter::NdArray;

let a = NdArray::<f64>::arange(&[3, 4])?;
assert_eq!(a.view().nansum(Some(0))?.data(), &[12.0, 15.0, 18.0, 21.0]);
assert_eq!(a.view().sum_axis(1)?.data(), &[6.0, 22.0, 38.0]);
# Ok::<(), anyhow::Error>(())
```
*/

mod core;
pub use crate::core::*;
pub type Res<U> = anyhow::Result<U>;
