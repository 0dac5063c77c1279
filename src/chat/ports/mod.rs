//! Injected collaborators: time, randomness and key-value persistence.

pub mod clock;
pub mod random;
pub mod storage;

pub use clock::{Clock, ManualClock, SystemClock};
pub use random::{RandomSource, RngSource, ScriptedRandom};
pub use storage::{JsonFileStore, KeyValueStore, MemoryStore};
