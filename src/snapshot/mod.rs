// Snapshot management for stepping backward through evaluation

/// Machine states that can be recorded in a [`SnapshotManager`]
pub trait Snapshot: Clone {
    /// Estimate the memory usage of this snapshot in bytes
    fn estimated_size(&self) -> usize;
}

/// Bounded history of recorded machine states
#[derive(Debug)]
pub struct SnapshotManager<S> {
    snapshots: Vec<S>,
    max_memory: usize,
    current_memory: usize,
}

impl<S: Snapshot> SnapshotManager<S> {
    pub fn new(max_memory: usize) -> Self {
        SnapshotManager {
            snapshots: Vec::new(),
            max_memory,
            current_memory: 0,
        }
    }

    /// Add a snapshot to history
    pub fn push(&mut self, snapshot: S) -> Result<(), (usize, usize)> {
        let snapshot_size = snapshot.estimated_size();

        if self.current_memory + snapshot_size > self.max_memory {
            return Err((self.current_memory + snapshot_size, self.max_memory));
        }

        self.current_memory += snapshot_size;
        self.snapshots.push(snapshot);
        Ok(())
    }

    /// Get a snapshot by index
    pub fn get(&self, index: usize) -> Option<&S> {
        self.snapshots.get(index)
    }

    pub fn last(&self) -> Option<&S> {
        self.snapshots.last()
    }

    /// Get the number of snapshots
    pub fn len(&self) -> usize {
        self.snapshots.len()
    }

    /// Check if empty
    pub fn is_empty(&self) -> bool {
        self.snapshots.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &S> {
        self.snapshots.iter()
    }

    /// Get current memory usage
    pub fn memory_usage(&self) -> usize {
        self.current_memory
    }

    /// Get max memory limit
    pub fn memory_limit(&self) -> usize {
        self.max_memory
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Clone)]
    struct Fixed(usize);

    impl Snapshot for Fixed {
        fn estimated_size(&self) -> usize {
            self.0
        }
    }

    #[test]
    fn test_push_respects_memory_limit() {
        let mut manager = SnapshotManager::new(100);
        assert!(manager.push(Fixed(60)).is_ok());
        assert_eq!(manager.push(Fixed(50)), Err((110, 100)));
        assert_eq!(manager.len(), 1);
        assert_eq!(manager.memory_usage(), 60);
        assert_eq!(manager.memory_limit(), 100);
    }
}
