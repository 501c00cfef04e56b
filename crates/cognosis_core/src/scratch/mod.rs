//! Transient memory: chunked arenas and thread-confined scratch values.

pub mod arena;
pub mod thread_cache;
