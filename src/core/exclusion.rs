/// Set of excluded subsequence indices, stored as sorted disjoint closed ranges.
///
/// Used by the motif extractor as explicit state: each extraction step takes
/// the set by value and hands back the updated set.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExclusionSet {
    len: usize,
    ranges: Vec<(usize, usize)>,
}

impl ExclusionSet {
    /// Empty set over indices `0..len`.
    pub fn new(len: usize) -> Self {
        Self {
            len,
            ranges: Vec::new(),
        }
    }

    /// Number of indices the set ranges over.
    pub fn len(&self) -> usize {
        self.len
    }

    /// Whether nothing is excluded yet.
    pub fn is_empty(&self) -> bool {
        self.ranges.is_empty()
    }

    /// The merged excluded ranges, inclusive on both ends.
    pub fn ranges(&self) -> &[(usize, usize)] {
        &self.ranges
    }

    /// Exclude `[center - radius, center + radius]`, clamped to bounds.
    pub fn exclude(&mut self, center: usize, radius: usize) {
        if self.len == 0 || center >= self.len {
            return;
        }
        let mut start = center.saturating_sub(radius);
        let mut end = center.saturating_add(radius).min(self.len - 1);

        // Ranges that overlap or touch [start, end] are absorbed.
        let first = self.ranges.partition_point(|&(_, e)| e + 1 < start);
        let mut last = first;
        while last < self.ranges.len() && self.ranges[last].0 <= end.saturating_add(1) {
            start = start.min(self.ranges[last].0);
            end = end.max(self.ranges[last].1);
            last += 1;
        }
        self.ranges.splice(first..last, [(start, end)]);
    }

    /// Whether `idx` is excluded.
    pub fn contains(&self, idx: usize) -> bool {
        let pos = self.ranges.partition_point(|&(_, e)| e < idx);
        pos < self.ranges.len() && self.ranges[pos].0 <= idx
    }

    /// Smallest finite value among non-excluded indices of `values`.
    ///
    /// Ties resolve to the smallest index. Returns `None` when every
    /// non-excluded value is infinite or NaN.
    pub fn argmin(&self, values: &[f64]) -> Option<(usize, f64)> {
        debug_assert_eq!(values.len(), self.len);
        let mut best: Option<(usize, f64)> = None;
        let mut consider = |lo: usize, hi: usize| {
            for (offset, &v) in values[lo..hi].iter().enumerate() {
                if v.is_finite() && best.map_or(true, |(_, b)| v < b) {
                    best = Some((lo + offset, v));
                }
            }
        };

        let mut cursor = 0;
        for &(s, e) in &self.ranges {
            if cursor < s {
                consider(cursor, s);
            }
            cursor = e + 1;
        }
        if cursor < self.len {
            consider(cursor, self.len);
        }
        best
    }
}
