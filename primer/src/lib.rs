//! # primer
//!
//! Shader compilation and program linking for WebGL2, written once and shared by every tutorial
//! scene instead of being pasted in each of them.
//!
//! The crate is backend-agnostic: everything goes through the [`ShaderContext`] trait, which a
//! backend crate (such as `primer-webgl`) implements for its graphics context. On top of it, the
//! [`shader`] module provides:
//!
//! - [`shader::compile_stage`], turning GLSL source into a compiled stage handle.
//! - [`shader::link_program`], combining a vertex and a fragment stage into a program handle.
//! - [`shader::build_program`], doing both and releasing the intermediate stages.
//!
//! Failures are never retried. A compilation or link failure has its diagnostic logged through
//! the [`log`] facade, the half-built object released, and is returned as an error.
//!
//! The [`geometry`] and [`canvas`] modules hold the little bit of math the tutorial scenes need:
//! rectangle corner coordinates and drawing-buffer sizing.
//!
//! [`ShaderContext`]: crate::backend::shader::ShaderContext

#![deny(missing_docs)]

pub mod backend;
pub mod canvas;
pub mod geometry;
pub mod shader;
