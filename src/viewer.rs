//! Sequential paging over a dataset's raw records.

use crate::dataset::{Dataset, Trip};

/// Records shown per page.
pub const CHUNK_SIZE: usize = 5;

/// Forward-only cursor yielding consecutive, fixed-size slices of trips.
///
/// Once exhausted it stays exhausted; load the dataset again to start over.
#[derive(Debug)]
pub struct RecordPager<'a> {
    trips: &'a [Trip],
    size: usize,
    cursor: usize,
}

impl<'a> RecordPager<'a> {
    pub fn new(dataset: &'a Dataset) -> Self {
        Self::with_size(dataset.trips(), CHUNK_SIZE)
    }

    /// `size` is clamped to at least 1.
    pub fn with_size(trips: &'a [Trip], size: usize) -> Self {
        Self {
            trips,
            size: size.max(1),
            cursor: 0,
        }
    }

    /// Next slice, or `None` at the end. Only the last slice may be short.
    pub fn next_chunk(&mut self) -> Option<&'a [Trip]> {
        if self.cursor >= self.trips.len() {
            return None;
        }
        let end = (self.cursor + self.size).min(self.trips.len());
        let chunk = &self.trips[self.cursor..end];
        self.cursor = end;
        Some(chunk)
    }

    /// Index of the first record of the next chunk.
    pub fn position(&self) -> usize {
        self.cursor
    }

    pub fn remaining(&self) -> usize {
        self.trips.len() - self.cursor
    }
}

impl<'a> Iterator for RecordPager<'a> {
    type Item = &'a [Trip];

    fn next(&mut self) -> Option<Self::Item> {
        self.next_chunk()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{NaiveDate, TimeDelta};

    fn trips(n: usize) -> Vec<Trip> {
        let base = NaiveDate::from_ymd_opt(2017, 1, 1)
            .unwrap()
            .and_hms_opt(0, 0, 0)
            .unwrap();
        (0..n)
            .map(|i| Trip::new(base + TimeDelta::minutes(i as i64)))
            .collect()
    }

    #[test]
    fn test_chunk_count_and_coverage() {
        for n in [0, 1, 4, 5, 6, 10, 12] {
            let trips = trips(n);
            let chunks: Vec<_> = RecordPager::with_size(&trips, CHUNK_SIZE).collect();

            assert_eq!(chunks.len(), n.div_ceil(CHUNK_SIZE), "n = {n}");
            let flat: Vec<_> = chunks.iter().flat_map(|c| c.iter()).cloned().collect();
            assert_eq!(flat, trips);
            if let Some((last, full)) = chunks.split_last() {
                assert!(full.iter().all(|c| c.len() == CHUNK_SIZE));
                assert!(!last.is_empty() && last.len() <= CHUNK_SIZE);
            }
        }
    }

    #[test]
    fn test_exhausted_pager_stays_empty() {
        let trips = trips(3);
        let mut pager = RecordPager::with_size(&trips, CHUNK_SIZE);

        assert_eq!(pager.next_chunk().map(<[Trip]>::len), Some(3));
        assert_eq!(pager.remaining(), 0);
        assert!(pager.next_chunk().is_none());
        assert!(pager.next_chunk().is_none());
    }

    #[test]
    fn test_position_advances() {
        let trips = trips(7);
        let mut pager = RecordPager::with_size(&trips, 5);
        pager.next_chunk();
        assert_eq!(pager.position(), 5);
        assert_eq!(pager.remaining(), 2);
    }
}
