//! Session Slot Adapters
//!
//! Implementations of the SessionSlot port.
//!
//! ## Available Adapters
//!
//! - **InMemorySessionSlot** - Process-local map (testing/development)
//! - **FileSessionSlot** - One file per slot with atomic replace
//! - **RedisSessionSlot** - Shared Redis strings for multi-instance deployments
//!
//! ## Usage
//!
//! ```ignore
//! use adapters::storage::{FileSessionSlot, InMemorySessionSlot};
//!
//! // Single instance with restarts: file-based slots
//! let slot = FileSessionSlot::new("./data/sessions");
//!
//! // Testing: in-memory slots
//! let slot = InMemorySessionSlot::new();
//! ```

mod file_slot;
mod in_memory_slot;
mod redis_slot;

pub use file_slot::FileSessionSlot;
pub use in_memory_slot::InMemorySessionSlot;
pub use redis_slot::RedisSessionSlot;
