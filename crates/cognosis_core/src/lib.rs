//! Core atom codec for cognosis.
//! This crate owns the operator registry, the atom wire formats and the
//! scratch memory they encode into.

pub mod codec;
pub mod config;
pub mod logging;
pub mod model;
pub mod registry;
pub mod scratch;
pub mod sync;

pub use codec::{AtomCodec, CodecError, CodecResult};
pub use config::{ArenaConfig, ConfigError, CoreConfig, LoggingConfig};
pub use logging::{default_log_level, init_logging, logging_status, LogTarget, LoggingError};
pub use model::atom::{AnyAtom, Atom, AtomKind, Expression};
pub use model::atomic_data::AtomicData;
pub use model::formal_theory::FormalTheory;
pub use model::value::{Payload, Value};
pub use registry::{transparent, Operator, OperatorRegistry, RegistryError, RegistryResult};
pub use scratch::arena::{
    ArenaError, ArenaResult, ScratchArena, ScratchRegion, DEFAULT_CHUNK_CAPACITY,
};
pub use scratch::thread_cache::{with_scratch_arena, ThreadScratchCache};
pub use sync::{AtomMutex, AtomMutexGuard, LockError, ScopedLock};

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
