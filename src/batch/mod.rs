//! Module slicing envelopes into the fixed-size groups sent to the stream.

use std::iter::FusedIterator;


/// Splits `items` into consecutive groups of `size`. The last group holds the remainder.
/// A `size` of zero produces no groups at all.
pub fn chunk<T>(items: &[T], size: usize) -> Batches<'_, T> {
    Batches {
        remaining: items,
        size,
    }
}

/// Number of groups [`chunk`] yields for `len` items.
pub fn batch_count(len: usize, size: usize) -> usize {
    if size == 0 { 0 } else { len.div_ceil(size) }
}

/// Iterator over the groups of a slice. Cloning it restarts from the current position.
#[derive(Debug)]
pub struct Batches<'a, T> {
    remaining: &'a [T],
    size: usize,
}

impl<T> Clone for Batches<'_, T> {
    fn clone(&self) -> Self {
        Self {
            remaining: self.remaining,
            size: self.size,
        }
    }
}

impl<'a, T> Iterator for Batches<'a, T> {
    type Item = &'a [T];

    fn next(&mut self) -> Option<Self::Item> {
        if self.size == 0 || self.remaining.is_empty() {
            return None;
        }
        let at = self.size.min(self.remaining.len());
        let (batch, rest) = self.remaining.split_at(at);
        self.remaining = rest;
        Some(batch)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let n = batch_count(self.remaining.len(), self.size);
        (n, Some(n))
    }
}

impl<T> ExactSizeIterator for Batches<'_, T> {}

impl<T> FusedIterator for Batches<'_, T> {}
