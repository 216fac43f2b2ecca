//! Plot and study repository.
//!
//! [`Repository`] is the only shared state in the system. The in-memory
//! implementation keeps insertion order for listings and is seeded with the
//! Riyadh sample plots.

use hbu_common::{NewPlot, Plot, PlotId, Study, StudyId};
use std::collections::HashMap;
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};
use thiserror::Error;
use tracing::debug;

/// Errors from repository writes.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("invalid plot: {0}")]
    InvalidPlot(#[from] hbu_common::Error),

    #[error("unknown plot: {0}")]
    UnknownPlot(PlotId),

    #[error("duplicate study id: {0}")]
    DuplicateStudy(StudyId),
}

impl From<StoreError> for hbu_common::Error {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::InvalidPlot(inner) => inner,
            StoreError::UnknownPlot(plot_id) => hbu_common::Error::PlotNotFound {
                plot_id: plot_id.to_string(),
            },
            StoreError::DuplicateStudy(_) => hbu_common::Error::Analysis(err.to_string()),
        }
    }
}

/// Source of plots and sink for generated studies.
///
/// Absence is reported as `None`, never as a placeholder value.
pub trait Repository: Send + Sync {
    fn list_plots(&self) -> Vec<Plot>;
    fn get_plot(&self, id: &PlotId) -> Option<Plot>;
    fn create_plot(&self, plot: NewPlot) -> Result<Plot, StoreError>;

    fn studies_for_plot(&self, plot_id: &PlotId) -> Vec<Study>;
    fn get_study(&self, id: &StudyId) -> Option<Study>;
    fn create_study(&self, study: Study) -> Result<Study, StoreError>;
}

/// Insertion-ordered map.
#[derive(Debug)]
struct Table<K, V> {
    order: Vec<K>,
    rows: HashMap<K, V>,
}

impl<K, V> Default for Table<K, V> {
    fn default() -> Self {
        Self {
            order: Vec::new(),
            rows: HashMap::new(),
        }
    }
}

impl<K: std::hash::Hash + Eq + Clone, V: Clone> Table<K, V> {
    fn insert(&mut self, key: K, value: V) {
        if self.rows.insert(key.clone(), value).is_none() {
            self.order.push(key);
        }
    }

    fn get(&self, key: &K) -> Option<V> {
        self.rows.get(key).cloned()
    }

    fn contains(&self, key: &K) -> bool {
        self.rows.contains_key(key)
    }

    fn values(&self) -> impl Iterator<Item = &V> {
        self.order.iter().filter_map(|k| self.rows.get(k))
    }

    fn len(&self) -> usize {
        self.order.len()
    }
}

/// In-memory repository.
#[derive(Debug, Default)]
pub struct MemoryRepository {
    plots: RwLock<Table<PlotId, Plot>>,
    studies: RwLock<Table<StudyId, Study>>,
}

// Writers never leave a table half-updated, so poisoning is ignored.
fn read<T>(lock: &RwLock<T>) -> RwLockReadGuard<'_, T> {
    lock.read().unwrap_or_else(|e| e.into_inner())
}

fn write<T>(lock: &RwLock<T>) -> RwLockWriteGuard<'_, T> {
    lock.write().unwrap_or_else(|e| e.into_inner())
}

impl MemoryRepository {
    /// Empty repository.
    pub fn new() -> Self {
        Self::default()
    }

    /// Repository preloaded with [`sample_plots`].
    pub fn seeded() -> Self {
        let repo = Self::new();
        {
            let mut plots = write(&repo.plots);
            for plot in sample_plots() {
                plots.insert(plot.id.clone(), plot);
            }
        }
        repo
    }

    pub fn plot_count(&self) -> usize {
        read(&self.plots).len()
    }

    pub fn study_count(&self) -> usize {
        read(&self.studies).len()
    }
}

impl Repository for MemoryRepository {
    fn list_plots(&self) -> Vec<Plot> {
        read(&self.plots).values().cloned().collect()
    }

    fn get_plot(&self, id: &PlotId) -> Option<Plot> {
        read(&self.plots).get(id)
    }

    fn create_plot(&self, new_plot: NewPlot) -> Result<Plot, StoreError> {
        let plot = new_plot.into_plot(PlotId::generate());
        plot.validate()?;
        write(&self.plots).insert(plot.id.clone(), plot.clone());
        debug!(plot_id = %plot.id, "plot created");
        Ok(plot)
    }

    fn studies_for_plot(&self, plot_id: &PlotId) -> Vec<Study> {
        read(&self.studies)
            .values()
            .filter(|s| &s.plot_id == plot_id)
            .cloned()
            .collect()
    }

    fn get_study(&self, id: &StudyId) -> Option<Study> {
        read(&self.studies).get(id)
    }

    fn create_study(&self, study: Study) -> Result<Study, StoreError> {
        if !read(&self.plots).contains(&study.plot_id) {
            return Err(StoreError::UnknownPlot(study.plot_id));
        }
        let mut studies = write(&self.studies);
        if studies.contains(&study.id) {
            return Err(StoreError::DuplicateStudy(study.id));
        }
        studies.insert(study.id.clone(), study.clone());
        debug!(study_id = %study.id, plot_id = %study.plot_id, "study stored");
        Ok(study)
    }
}

/// Closed rectangular ring from a `[min_lon, min_lat, max_lon, max_lat]`
/// bounding box.
fn ring(bbox: [f64; 4]) -> Vec<[f64; 2]> {
    let [x0, y0, x1, y1] = bbox;
    vec![[x0, y0], [x1, y0], [x1, y1], [x0, y1], [x0, y0]]
}

struct Seed {
    id: &'static str,
    address: &'static str,
    parcel: &'static str,
    lat: f64,
    lon: f64,
    size: f64,
    zoning: &'static str,
    current_use: &'static str,
    value: f64,
    owner: &'static str,
    bbox: [f64; 4],
}

const SEEDS: [Seed; 8] = [
    Seed {
        id: "plot-001",
        address: "King Fahd Road, Al Olaya District",
        parcel: "RY-2024-00123",
        lat: 24.7136,
        lon: 46.6753,
        size: 10117.0,
        zoning: "C-1 Commercial",
        current_use: "Mixed Use Development",
        value: 45_000_000.0,
        owner: "Al Olaya Properties",
        bbox: [46.6743, 24.7130, 46.6763, 24.7142],
    },
    Seed {
        id: "plot-002",
        address: "Prince Mohammed Bin Salman Road, KAFD",
        parcel: "RY-2024-00456",
        lat: 24.7648,
        lon: 46.6426,
        size: 16997.0,
        zoning: "MU-2 Mixed Use",
        current_use: "Financial District",
        value: 120_000_000.0,
        owner: "KAFD Development Corp",
        bbox: [46.6410, 24.7638, 46.6442, 24.7658],
    },
    Seed {
        id: "plot-003",
        address: "Al Takhassusi Street, Al Sahafah",
        parcel: "RY-2024-00789",
        lat: 24.7892,
        lon: 46.6589,
        size: 7284.0,
        zoning: "R-3 Residential",
        current_use: "Residential Complex",
        value: 32_000_000.0,
        owner: "Sahafah Real Estate",
        bbox: [46.6579, 24.7885, 46.6599, 24.7899],
    },
    Seed {
        id: "plot-004",
        address: "King Abdullah Road, Al Malqa",
        parcel: "RY-2024-00321",
        lat: 24.8156,
        lon: 46.6234,
        size: 14164.0,
        zoning: "C-2 Commercial",
        current_use: "Vacant Land",
        value: 58_000_000.0,
        owner: "Malqa Investment Group",
        bbox: [46.6220, 24.8146, 46.6248, 24.8166],
    },
    Seed {
        id: "plot-005",
        address: "Northern Ring Road, An Narjis",
        parcel: "RY-2024-00555",
        lat: 24.8423,
        lon: 46.7012,
        size: 23472.0,
        zoning: "I-1 Industrial",
        current_use: "Logistics Center",
        value: 75_000_000.0,
        owner: "Narjis Logistics LLC",
        bbox: [46.6990, 24.8408, 46.7034, 24.8438],
    },
    Seed {
        id: "plot-006",
        address: "Diplomatic Quarter, DQ",
        parcel: "RY-2024-00888",
        lat: 24.6812,
        lon: 46.6287,
        size: 8498.0,
        zoning: "S-1 Special Use",
        current_use: "Embassy District",
        value: 95_000_000.0,
        owner: "DQ Authority",
        bbox: [46.6272, 24.6802, 46.6302, 24.6822],
    },
    Seed {
        id: "plot-007",
        address: "Exit 5, Eastern Ring Road",
        parcel: "RY-2024-00042",
        lat: 24.7234,
        lon: 46.7456,
        size: 33184.0,
        zoning: "MU-3 Mixed Use",
        current_use: "Shopping Mall",
        value: 180_000_000.0,
        owner: "Eastern Ring Properties",
        bbox: [46.7430, 24.7214, 46.7482, 24.7254],
    },
    Seed {
        id: "plot-008",
        address: "Tahlia Street, Al Rawdah",
        parcel: "RY-2024-00200",
        lat: 24.6945,
        lon: 46.6856,
        size: 5666.0,
        zoning: "C-1 Commercial",
        current_use: "Retail Complex",
        value: 42_000_000.0,
        owner: "Tahlia Commercial Group",
        bbox: [46.6846, 24.6938, 46.6866, 24.6952],
    },
];

/// The eight Riyadh sample plots.
pub fn sample_plots() -> Vec<Plot> {
    SEEDS
        .iter()
        .map(|s| Plot {
            id: PlotId::from(s.id),
            address: s.address.to_string(),
            parcel_number: s.parcel.to_string(),
            latitude: s.lat,
            longitude: s.lon,
            size: s.size,
            zoning: s.zoning.to_string(),
            current_use: s.current_use.to_string(),
            market_value: Some(s.value),
            owner_name: Some(s.owner.to_string()),
            boundaries: Some(ring(s.bbox)),
        })
        .collect()
}
