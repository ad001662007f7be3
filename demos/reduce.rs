use axiter::{ArrayView, NdArray, Res};

fn main() -> Res<()> {
    let now = std::time::Instant::now();

    let a = NdArray::<f64>::arange(&[3, 4])?;
    println!("{}", a);

    println!("{}", a.view().nansum(Some(0))?);
    println!("{}", a.view().nansum(Some(-1))?);
    println!("{}", a.view().nanmean(None)?);

    let data = [1.0, f64::NAN, 3.0, 4.0, f64::NAN, f64::NAN];
    let b = ArrayView::new(&data, &[2, 3])?;
    println!("{}", b.nanvar(Some(1), 0)?);
    println!("{}", b.nanmedian(Some(0))?);
    println!("{}", b.anynan(Some(1))?);
    println!("{}", b.nanargmax(None)?);

    // every other column, last row first
    let c = a.view().step(1, 0, 2)?.flip(0)?;
    println!("{}", c.to_owned());
    println!("{}", c.nanmax(Some(1))?);

    let end = now.elapsed();
    println!("{:?}", end);

    Ok(())
}
