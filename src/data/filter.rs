use std::collections::{BTreeMap, BTreeSet};

use super::model::{Dataset, Reading, Timestamp};
use super::summary::{GroupKey, Summary, summarize};

// ---------------------------------------------------------------------------
// Filter criteria
// ---------------------------------------------------------------------------

/// Closed interval `[lo, hi]` on the time axis. `lo > hi` selects nothing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimeRange {
    pub lo: Timestamp,
    pub hi: Timestamp,
}

impl TimeRange {
    pub fn new(lo: Timestamp, hi: Timestamp) -> Self {
        TimeRange { lo, hi }
    }

    pub fn contains(&self, t: &Timestamp) -> bool {
        self.lo <= *t && *t <= self.hi
    }
}

/// What the viewer currently asks for. Rebuilt on every interaction.
#[derive(Debug, Clone, PartialEq)]
pub struct FilterCriteria {
    pub range: TimeRange,
    /// `None` → no location constraint.
    pub locations: Option<BTreeSet<String>>,
    /// Summarize per location instead of over the whole selection.
    pub group_by_location: bool,
}

impl FilterCriteria {
    /// Full time range, no location constraint (unlabelled readings
    /// included), grouped when the data has locations.
    /// `None` for an empty dataset.
    pub fn everything(dataset: &Dataset) -> Option<Self> {
        let (lo, hi) = dataset.time_bounds()?;
        Some(FilterCriteria {
            range: TimeRange::new(lo, hi),
            locations: None,
            group_by_location: dataset.has_locations,
        })
    }

    /// Whether a single reading passes.
    ///
    /// A reading without a location label fails any location filter.
    pub fn accepts(&self, reading: &Reading) -> bool {
        if !self.range.contains(&reading.timestamp) {
            return false;
        }
        match (&self.locations, &reading.location) {
            (None, _) => true,
            (Some(selected), Some(loc)) => selected.contains(loc),
            (Some(_), None) => false,
        }
    }

    /// Group a selected reading belongs to under these criteria.
    pub fn group_key(&self, reading: &Reading) -> GroupKey {
        if !self.group_by_location {
            return GroupKey::All;
        }
        reading
            .location
            .as_ref()
            .map_or(GroupKey::Unlabelled, |l| GroupKey::Location(l.clone()))
    }
}

// ---------------------------------------------------------------------------
// Filter & summarize
// ---------------------------------------------------------------------------

/// Output handed to the presentation layer.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FilterResult {
    /// Indices into the source readings, ascending (original order).
    pub indices: Vec<usize>,
    pub summaries: BTreeMap<GroupKey, Summary>,
}

impl FilterResult {
    /// Resolve the indices against the readings they were computed from.
    /// Indices past the end of `source` are skipped.
    pub fn readings<'a>(&'a self, source: &'a [Reading]) -> impl Iterator<Item = &'a Reading> + 'a {
        self.indices.iter().filter_map(move |&i| source.get(i))
    }

    pub fn is_empty(&self) -> bool {
        self.indices.is_empty()
    }
}

/// Return indices of readings that pass `criteria`, in original order.
pub fn filtered_indices(readings: &[Reading], criteria: &FilterCriteria) -> Vec<usize> {
    readings
        .iter()
        .enumerate()
        .filter(|(_, r)| criteria.accepts(r))
        .map(|(i, _)| i)
        .collect()
}

/// Filter `readings` and compute one [`Summary`] per group present in the
/// selection. Groups with no selected readings get no entry.
pub fn filter_and_summarize(readings: &[Reading], criteria: &FilterCriteria) -> FilterResult {
    let indices = filtered_indices(readings, criteria);

    let mut groups: BTreeMap<GroupKey, Vec<&Reading>> = BTreeMap::new();
    for &i in &indices {
        let r = &readings[i];
        groups.entry(criteria.group_key(r)).or_default().push(r);
    }

    let summaries = groups
        .into_iter()
        .map(|(key, members)| (key, summarize(&members)))
        .collect();

    log::debug!(
        "Filter kept {} of {} readings",
        indices.len(),
        readings.len()
    );

    FilterResult { indices, summaries }
}
