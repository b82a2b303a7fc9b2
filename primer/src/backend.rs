//! Backend interfacing.
//!
//! Types and traits a graphics context must provide for the rest of the crate to drive it. Nothing
//! in here does any work on its own.

pub mod shader;
