//! In-memory storage backend (for testing)

use crate::storage::traits::{RecordMap, Storage, StorageResult};
use crate::storage::TrackedPackage;

#[derive(Debug, Default, Clone)]
pub struct MemoryStorage {
    pub records: RecordMap,
    pub packages: Vec<TrackedPackage>,
    pub cache_saves: usize,
}

impl Storage for MemoryStorage {
    fn load_cache(&self) -> StorageResult<RecordMap> {
        Ok(self.records.clone())
    }

    fn save_cache(&mut self, records: &RecordMap) -> StorageResult<()> {
        self.records = records.clone();
        self.cache_saves += 1;
        Ok(())
    }

    fn clear_cache(&mut self) -> StorageResult<()> {
        self.records.clear();
        Ok(())
    }

    fn load_tracked(&self) -> StorageResult<Vec<TrackedPackage>> {
        Ok(self.packages.clone())
    }

    fn save_tracked(&mut self, packages: &[TrackedPackage]) -> StorageResult<()> {
        self.packages = packages.to_vec();
        Ok(())
    }
}
