//! Sessions: the holder, its durable slot, and the server-side token table.

pub mod holder;
pub mod slot;
pub mod table;

pub use holder::{Session, SessionState};
pub use slot::{FileSlot, MemorySlot, SessionSlot};
pub use table::{OpenedSession, SessionTable};
