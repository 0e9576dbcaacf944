//! Offset bookkeeping.
//!
//! The [`Cursor`] tracks where the next element starts, [`LayoutConstants`]
//! sizes structural content, and [`TableLayout`] predicts every cell offset
//! of an inserted table.

mod constants;
mod cursor;
mod table;

pub use constants::LayoutConstants;
pub use cursor::{Cursor, Reservation};
pub use table::{emit_table, CellContent, CellLayout, TableLayout};
