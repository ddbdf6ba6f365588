//! A module containing [`Buffer`] and associated types.
//!
//! [`Buffer`] is also re-exported at the crate root. The other public items are [`NPOS`] (the
//! not-found sentinel for the search methods), [`IntoIter`] for owned iteration and, behind the
//! `read` feature, [`ReadError`]. Borrowed iteration uses [`Iter`](std::slice::Iter) and
//! [`IterMut`](std::slice::IterMut) from [`std::slice`] via `Deref`.

mod buffer;
mod fmt;
mod iter;
mod raw;
mod search;
mod tests;

#[cfg(feature = "read")]
mod read;

pub use buffer::*;
pub use iter::*;
pub use search::*;

#[cfg(feature = "read")]
pub use read::*;
