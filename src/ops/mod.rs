//! Operations and batches.
//!
//! An [`Operation`] is one atomic edit addressed by absolute offsets. A
//! [`Batch`] is the ordered list submitted to the remote document in a
//! single call.

mod batch;
mod operation;

pub use batch::Batch;
pub use operation::{utf16_len, BulletPreset, CellRef, Operation, Span};
