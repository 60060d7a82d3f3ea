// Registry constants (No magic values)

/// Slots per queue when not configured
pub const DEFAULT_QUEUE_CAPACITY: usize = 64;

/// Upper bound on slots per queue (1M); keeps the channel's permit count
/// far below the runtime's semaphore limit
pub const MAX_QUEUE_CAPACITY: usize = 1 << 20;

/// Distinct queue names the registry accepts before rejecting new ones
pub const DEFAULT_MAX_QUEUES: usize = 1024;

/// Largest accepted payload (1 MiB)
pub const DEFAULT_MAX_PAYLOAD_BYTES: usize = 1024 * 1024;

/// Longest accepted queue name in bytes
pub const DEFAULT_MAX_NAME_LEN: usize = 255;
