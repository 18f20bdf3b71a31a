/// # Line Module.
///
/// A [`crate::block::store::BlockStore`] decorator tracking newlines per block.
pub mod counter;
