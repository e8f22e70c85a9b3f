use thiserror::Error;

/// Failures the reader can report.
///
/// The source design signals all three kinds through a single non-zero
/// status code; a typed enum is strictly more useful in Rust without
/// changing the recovery story described in the error handling design:
/// the parser never attempts to recover from any of these, and the only
/// safe next step after any of them is to drop the parser state (and the
/// tree it was building) and start over.
#[derive(Debug, Error)]
pub enum Error {
    /// A string growth or record allocation could not obtain memory.
    ///
    /// Stable safe Rust gives no way to intercept allocator failure short
    /// of `Vec::try_reserve`, which this crate does not use, so this
    /// variant is never constructed today. It is kept for interface
    /// fidelity with the source design and reserved in case the crate
    /// adopts fallible allocation later.
    #[error("allocation failure")]
    Alloc,

    /// A stray `<` was followed by input that does not begin any of the
    /// six known tag patterns while no tag was currently active.
    #[error("stray `<` at offset {offset} does not begin a known tag pattern")]
    StructuralStall {
        /// Byte offset, relative to the start of the chunk in which the
        /// stall was detected, of the offending `<`.
        offset: usize,
    },
}

/// Convenience alias used throughout the crate.
pub type Result<T> = core::result::Result<T, Error>;
