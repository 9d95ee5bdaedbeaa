//! Dataset analysis and preprocessing.
//!
//! - [`logic`]: stateless functions over a `DataFrame` (classification,
//!   transforms, summaries, CSV IO)
//! - [`session`]: the working-copy context that applies transforms in order
//!   and can revert to the loaded data

pub mod logic;
pub mod session;

pub use session::{EdaSession, SessionState};
