//! Processing Pipeline Module
//!
//! ```text
//! BatchSource (file | stdin | api-<tier>)
//!     -> ProcessingLoop (translate, in order)
//!     -> mpsc channel
//!     -> Publisher (Signal K delta JSON lines)
//! ```
//!
//! Each source runs its own loop; all loops share one publisher.

pub mod processing_loop;
pub mod publisher;
pub mod source;

pub use processing_loop::{LoopExit, LoopStats, ProcessingLoop};
pub use publisher::Publisher;
pub use source::{ApiSource, BatchEvent, BatchSource, FileSource, LineSource, StdinSource};
