//! Memoized connected-region lookup.
//!
//! Terrain is fixed once a [`Grid`](super::Grid) is built, so the first query
//! that touches a region floods it once and labels every member tile; later
//! queries from any tile of that region hit the cache.

use std::sync::{Arc, Mutex, PoisonError};

use super::Position;

#[derive(Clone, Debug, Default)]
struct RegionTable {
    labels: Vec<Option<usize>>,
    regions: Vec<Arc<[Position]>>,
}

#[derive(Debug, Default)]
pub(crate) struct RegionCache {
    table: Mutex<RegionTable>,
}

impl RegionCache {
    pub(crate) fn new(tile_count: usize) -> Self {
        Self {
            table: Mutex::new(RegionTable {
                labels: vec![None; tile_count],
                regions: Vec::new(),
            }),
        }
    }

    pub(crate) fn lookup(&self, index: usize) -> Option<Arc<[Position]>> {
        let table = self.table.lock().unwrap_or_else(PoisonError::into_inner);
        let label = table.labels.get(index).copied().flatten()?;
        table.regions.get(label).cloned()
    }

    /// Records `members` as one region, labelling every index in `indices`.
    pub(crate) fn store(
        &self,
        indices: impl IntoIterator<Item = usize>,
        members: Vec<Position>,
    ) -> Arc<[Position]> {
        let mut table = self.table.lock().unwrap_or_else(PoisonError::into_inner);
        let label = table.regions.len();
        let region: Arc<[Position]> = members.into();
        table.regions.push(Arc::clone(&region));
        for index in indices {
            if let Some(slot) = table.labels.get_mut(index) {
                *slot = Some(label);
            }
        }
        region
    }

    pub(crate) fn cached_regions(&self) -> usize {
        self.table
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .regions
            .len()
    }
}

impl Clone for RegionCache {
    fn clone(&self) -> Self {
        let table = self
            .table
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone();
        Self {
            table: Mutex::new(table),
        }
    }
}
