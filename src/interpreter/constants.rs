// Default limits for the evaluation driver

/// Steps taken before evaluation gives up on a program
pub const DEFAULT_MAX_STEPS: usize = 10_000_000;

/// Memory budget for recorded machine states (1 GB)
pub const DEFAULT_SNAPSHOT_LIMIT: usize = 1024 * 1024 * 1024;

/// Rough per-node size used when estimating snapshot memory
pub const NODE_SIZE_ESTIMATE: usize = 48;

/// Rough per-entry size of a stack, dump or code entry
pub const ENTRY_SIZE_ESTIMATE: usize = 16;

/// Steps between collections when the command line asks for periodic GC
/// without giving an interval
pub const DEFAULT_GC_INTERVAL: usize = 100;
