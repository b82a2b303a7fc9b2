//! WebGL backend for primer.
//!
//! This crate implements [`primer`]’s shader context for [WebGL] 2.0 and adds the few other
//! primitives the tutorial scenes call directly: vertex buffers, vertex arrays, uniforms and draw
//! calls.
//!
//! [WebGL]: https://www.khronos.org/webgl

pub mod webgl2;

pub use crate::webgl2::WebGL2;
