/// Plain odometer over index vectors in C order. Slower than the axis
/// iterators, but simple enough to check them against.
pub struct Indexer<'a> {
    sizes: &'a [usize],
    indices: Vec<usize>,
    current: usize,
    maximum: usize,
}

impl<'a> Indexer<'a> {
    pub fn new(sizes: &'a [usize]) -> Self {
        Indexer {
            sizes,
            indices: vec![0; sizes.len()],
            current: 0,
            maximum: sizes.iter().product(),
        }
    }
}

impl<'a> Iterator for Indexer<'a> {
    type Item = Vec<usize>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.current == self.maximum {
            return None;
        };

        let next = self.indices.clone();

        for (index, &size) in self.indices.iter_mut().zip(self.sizes).rev() {
            *index += 1;

            if *index < size {
                break;
            }

            *index = 0;
        }

        self.current += 1;
        Some(next)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.maximum - self.current;
        (remaining, Some(remaining))
    }
}
