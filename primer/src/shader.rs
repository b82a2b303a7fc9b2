//! Shader stages and programs.
//!
//! A shader program is made of two stages: a vertex shader and a fragment shader. Each stage is
//! compiled from GLSL source with [`compile_stage`], then both are linked into a program with
//! [`link_program`]. [`build_program`] chains the three calls and cleans up after itself, which is
//! what most code wants.
//!
//! Compilation and linking are single attempts. When the host reports a failure, its diagnostic
//! is logged at error level, the object that failed is released and the diagnostic is returned in
//! the error.

use crate::backend::shader::{ShaderContext, StageType};
use std::error::Error;
use std::fmt;

/// Errors that shader stages can emit.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum StageError {
  /// The context refused to allocate a shader object.
  CreationFailed(StageType),
  /// Occurs when a shader fails to compile. The `String` is the compiler log.
  CompilationFailed(StageType, String),
}

impl StageError {
  /// Create a creation failure.
  pub fn creation_failed(ty: StageType) -> Self {
    StageError::CreationFailed(ty)
  }

  /// Create a compilation failure.
  pub fn compilation_failed(ty: StageType, reason: impl Into<String>) -> Self {
    StageError::CompilationFailed(ty, reason.into())
  }
}

impl fmt::Display for StageError {
  fn fmt(&self, f: &mut fmt::Formatter) -> Result<(), fmt::Error> {
    match *self {
      StageError::CreationFailed(ty) => write!(f, "unable to create {}", ty),

      StageError::CompilationFailed(ty, ref r) => write!(f, "{} compilation error: {}", ty, r),
    }
  }
}

impl Error for StageError {}

/// Errors that a program can generate.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum ProgramError {
  /// The context refused to allocate a program object.
  CreationFailed,
  /// A shader stage failed before the program could be linked.
  Stage(StageError),
  /// Program link failed. You can inspect the reason by looking at the contained `String`.
  LinkFailed(String),
}

impl ProgramError {
  /// Create a link failure.
  pub fn link_failed(reason: impl Into<String>) -> Self {
    ProgramError::LinkFailed(reason.into())
  }
}

impl fmt::Display for ProgramError {
  fn fmt(&self, f: &mut fmt::Formatter) -> Result<(), fmt::Error> {
    match *self {
      ProgramError::CreationFailed => f.write_str("unable to allocate shader program"),

      ProgramError::Stage(ref e) => write!(f, "shader program has stage error: {}", e),

      ProgramError::LinkFailed(ref s) => write!(f, "shader program failed to link: {}", s),
    }
  }
}

impl Error for ProgramError {
  fn source(&self) -> Option<&(dyn Error + 'static)> {
    match self {
      ProgramError::Stage(e) => Some(e),
      _ => None,
    }
  }
}

impl From<StageError> for ProgramError {
  fn from(e: StageError) -> Self {
    ProgramError::Stage(e)
  }
}

const UNKNOWN_COMPILATION_ERROR: &str = "unknown compilation error";
const UNKNOWN_LINK_ERROR: &str = "unknown link error";

/// Compile a shader stage of type `ty` from `src`.
///
/// If the context cannot allocate a shader object, this fails right away without issuing any other
/// call. If compilation fails, the compiler log is logged, the shader object is deleted and the
/// log is returned in [`StageError::CompilationFailed`]. The log is never empty.
pub fn compile_stage<C>(ctx: &C, ty: StageType, src: &str) -> Result<C::StageHandle, StageError>
where
  C: ShaderContext + ?Sized,
{
  let handle = ctx
    .create_stage(ty)
    .ok_or_else(|| StageError::creation_failed(ty))?;

  ctx.stage_source(&handle, src);
  ctx.compile_stage(&handle);

  if ctx.stage_compile_status(&handle) {
    return Ok(handle);
  }

  let log = non_empty_log(ctx.stage_info_log(&handle), UNKNOWN_COMPILATION_ERROR);
  log::error!("{} compilation failed:\n{}", ty, log);
  ctx.delete_stage(handle);

  Err(StageError::compilation_failed(ty, log))
}

/// Link a vertex and a fragment stage into a program.
///
/// Both stages must come from a successful [`compile_stage`]. They are attached in that order and
/// are left untouched: releasing them is up to the caller. On link failure the linker log is
/// logged, the program object is deleted and the log is returned in
/// [`ProgramError::LinkFailed`].
pub fn link_program<C>(
  ctx: &C,
  vertex: &C::StageHandle,
  fragment: &C::StageHandle,
) -> Result<C::ProgramHandle, ProgramError>
where
  C: ShaderContext + ?Sized,
{
  let handle = ctx.create_program().ok_or(ProgramError::CreationFailed)?;

  ctx.attach_stage(&handle, vertex);
  ctx.attach_stage(&handle, fragment);
  ctx.link_program(&handle);

  if ctx.program_link_status(&handle) {
    return Ok(handle);
  }

  let log = non_empty_log(ctx.program_info_log(&handle), UNKNOWN_LINK_ERROR);
  log::error!("shader program link failed:\n{}", log);
  ctx.delete_program(handle);

  Err(ProgramError::link_failed(log))
}

/// Compile both stages and link them into a program.
///
/// The stages are only needed until the program is linked, so they are deleted once linking has
/// been attempted, whatever its outcome. If the fragment stage fails to compile, the vertex stage
/// is deleted as well.
pub fn build_program<C>(
  ctx: &C,
  vertex_src: &str,
  fragment_src: &str,
) -> Result<C::ProgramHandle, ProgramError>
where
  C: ShaderContext + ?Sized,
{
  let vertex = compile_stage(ctx, StageType::VertexShader, vertex_src)?;

  let fragment = match compile_stage(ctx, StageType::FragmentShader, fragment_src) {
    Ok(fragment) => fragment,
    Err(e) => {
      ctx.delete_stage(vertex);
      return Err(e.into());
    }
  };

  let program = link_program(ctx, &vertex, &fragment);

  ctx.delete_stage(vertex);
  ctx.delete_stage(fragment);

  program
}

fn non_empty_log(log: Option<String>, fallback: &str) -> String {
  match log {
    Some(log) if !log.trim().is_empty() => log,
    _ => fallback.to_owned(),
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn missing_or_blank_logs_fall_back() {
    assert_eq!(non_empty_log(None, "fallback"), "fallback");
    assert_eq!(non_empty_log(Some(" \n".to_owned()), "fallback"), "fallback");
    assert_eq!(
      non_empty_log(Some("ERROR: 0:1: oops".to_owned()), "fallback"),
      "ERROR: 0:1: oops"
    );
  }

  #[test]
  fn error_display() {
    let e = StageError::compilation_failed(StageType::FragmentShader, "bad token");
    assert_eq!(e.to_string(), "fragment shader compilation error: bad token");
    assert_eq!(
      StageError::creation_failed(StageType::VertexShader).to_string(),
      "unable to create vertex shader"
    );

    let e = ProgramError::from(e);
    assert_eq!(
      e.to_string(),
      "shader program has stage error: fragment shader compilation error: bad token"
    );
    assert!(e.source().is_some());
    assert!(ProgramError::link_failed("varying").source().is_none());
  }
}
