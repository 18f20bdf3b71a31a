/// # Buffer Module.
///
/// Cursor-based streaming and positioned I/O, plus insert/delete, over any
/// [`crate::block::store::BlockStore`].
pub mod editable;
pub mod io;
