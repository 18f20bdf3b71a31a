/// # Block Module.
///
/// Fixed-size storage blocks, the address arithmetic shared by every
/// component, and the [`store::BlockStore`] contract.
pub mod address;
pub mod fixed;
pub mod store;

/// Size in bytes of every block. Stores and decorators wrapping them must agree on it.
pub const BLOCK_SIZE: usize = 512;

/// Extra blocks appended on each growth to amortise repeated appends.
pub const GROWTH_DELTA: usize = 2;
