//! Block-organised editable byte storage.
//!
//! - [`block`] holds the fixed-size block arena and the [`block::store::BlockStore`]
//!   contract every storage backend satisfies.
//! - [`buffer`] layers a cursor, streaming I/O and insert/delete on top of any store.
//! - [`line`] decorates a store with per-block newline counts.
pub mod block;
pub mod buffer;
pub mod enums;
pub mod errors;
pub mod line;
