//! Audio I/O modules
//!
//! Audio decoding using Symphonia and directory listing for batch runs.

pub mod decoder;
pub mod files;
