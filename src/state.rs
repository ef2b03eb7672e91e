use std::collections::BTreeSet;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use chrono::NaiveDate;

use thermo_panda::DashboardConfig;
use thermo_panda::data::{
    Dataset, DatasetCache, FilterCriteria, FilterResult, TimeRange, Timestamp, filter_and_summarize,
};

use crate::color::ColorMap;

// ---------------------------------------------------------------------------
// Time range widgets' backing values
// ---------------------------------------------------------------------------

/// Current slider / date-picker values plus the dataset's limits.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum RangeInput {
    Numeric { lo: f64, hi: f64, min: f64, max: f64 },
    Dates { lo: NaiveDate, hi: NaiveDate, min: NaiveDate, max: NaiveDate },
}

impl RangeInput {
    /// Full range of the dataset. `None` when it has no readings.
    pub fn for_dataset(dataset: &Dataset) -> Option<Self> {
        match dataset.time_bounds()? {
            (Timestamp::Index(min), Timestamp::Index(max)) => Some(RangeInput::Numeric {
                lo: min,
                hi: max,
                min,
                max,
            }),
            (Timestamp::Date(min), Timestamp::Date(max)) => Some(RangeInput::Dates {
                lo: min.date(),
                hi: max.date(),
                min: min.date(),
                max: max.date(),
            }),
            _ => None,
        }
    }

    /// Closed time range; date pickers cover whole days.
    pub fn to_time_range(self) -> TimeRange {
        match self {
            RangeInput::Numeric { lo, hi, .. } => {
                TimeRange::new(Timestamp::Index(lo), Timestamp::Index(hi))
            }
            RangeInput::Dates { lo, hi, .. } => {
                TimeRange::new(Timestamp::day_start(lo), Timestamp::day_end(hi))
            }
        }
    }
}

// ---------------------------------------------------------------------------
// Application state
// ---------------------------------------------------------------------------

/// The full UI state, independent of rendering.
pub struct AppState {
    pub config: DashboardConfig,

    /// Datasets already read from disk.
    pub cache: DatasetCache,

    /// Active dataset (None until a load succeeds).
    pub dataset: Option<Arc<Dataset>>,

    pub range: Option<RangeInput>,
    pub selected_locations: BTreeSet<String>,
    pub group_by_location: bool,

    /// Output of the last filter run (cached until a widget changes).
    pub result: FilterResult,

    pub color_map: Option<ColorMap>,

    /// Status / error message shown in the UI.
    pub status_message: Option<String>,
}

impl AppState {
    pub fn new(config: DashboardConfig) -> Self {
        Self {
            config,
            cache: DatasetCache::new(),
            dataset: None,
            range: None,
            selected_locations: BTreeSet::new(),
            group_by_location: false,
            result: FilterResult::default(),
            color_map: None,
            status_message: None,
        }
    }

    /// Load `path` (from cache when possible) and make it the active dataset.
    pub fn load(&mut self, path: &Path) {
        let columns = self.config.columns.clone();
        match self.cache.get_or_load(path, &columns) {
            Ok(dataset) => {
                self.config.data_path = path.to_path_buf();
                self.set_dataset(dataset);
            }
            Err(e) => {
                log::error!("Failed to load {}: {e}", path.display());
                self.status_message = Some(format!("Error: {e}"));
            }
        }
    }

    /// Drop the cached copy of the current file and read it again.
    pub fn reload(&mut self) {
        let path: PathBuf = self.config.data_path.clone();
        self.cache.invalidate(&path);
        self.load(&path);
    }

    /// Ingest a newly loaded dataset, reset widgets to "show everything".
    pub fn set_dataset(&mut self, dataset: Arc<Dataset>) {
        self.range = RangeInput::for_dataset(&dataset);
        self.selected_locations = dataset.locations.clone();
        self.group_by_location = dataset.has_locations;
        self.color_map = Some(ColorMap::for_dataset(&dataset));
        self.dataset = Some(dataset);
        self.status_message = None;
        self.refilter();
    }

    /// Build criteria from the current widget values.
    ///
    /// Every location ticked means no location constraint, so readings
    /// without a label stay visible.
    pub fn criteria(&self) -> Option<FilterCriteria> {
        let dataset = self.dataset.as_ref()?;
        let range = self.range?.to_time_range();
        let all_selected = self.selected_locations == dataset.locations;
        Some(FilterCriteria {
            range,
            locations: (dataset.has_locations && !all_selected)
                .then(|| self.selected_locations.clone()),
            group_by_location: self.group_by_location,
        })
    }

    /// Recompute `result` after a widget change.
    pub fn refilter(&mut self) {
        self.result = match (&self.dataset, self.criteria()) {
            (Some(ds), Some(criteria)) => filter_and_summarize(&ds.readings, &criteria),
            _ => FilterResult::default(),
        };
    }

    /// Toggle one location in the selection.
    pub fn toggle_location(&mut self, location: &str) {
        if !self.selected_locations.remove(location) {
            self.selected_locations.insert(location.to_string());
        }
        self.refilter();
    }

    /// Select every location.
    pub fn select_all(&mut self) {
        if let Some(ds) = &self.dataset {
            self.selected_locations = ds.locations.clone();
            self.refilter();
        }
    }

    /// Deselect every location.
    pub fn select_none(&mut self) {
        self.selected_locations.clear();
        self.refilter();
    }
}
