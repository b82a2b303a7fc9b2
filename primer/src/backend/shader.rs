//! Shader backend.

use std::fmt;

/// A shader stage type.
///
/// WebGL2 only knows about two stages.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum StageType {
  /// Vertex shader.
  VertexShader,
  /// Fragment shader.
  FragmentShader,
}

impl fmt::Display for StageType {
  fn fmt(&self, f: &mut fmt::Formatter) -> Result<(), fmt::Error> {
    match *self {
      StageType::VertexShader => f.write_str("vertex shader"),
      StageType::FragmentShader => f.write_str("fragment shader"),
    }
  }
}

/// Shader and program primitives of a graphics context.
///
/// Every method maps to a single host API call. Handles are opaque and owned by the context; the
/// trait makes no attempt at tracking them, releasing is always explicit (see
/// [`ShaderContext::delete_stage`] and [`ShaderContext::delete_program`]).
///
/// All methods take `&self`: graphics contexts are single-threaded handles whose mutability lives
/// on the host side.
pub trait ShaderContext {
  /// Representation of a shader stage object.
  type StageHandle;

  /// Representation of a shader program object.
  type ProgramHandle;

  /// Allocate a new shader object of the given type.
  ///
  /// `None` means the context refused to allocate it.
  fn create_stage(&self, ty: StageType) -> Option<Self::StageHandle>;

  /// Replace the source of a shader object.
  fn stage_source(&self, stage: &Self::StageHandle, src: &str);

  /// Compile a shader object.
  fn compile_stage(&self, stage: &Self::StageHandle);

  /// Whether the last compilation of the shader object succeeded.
  fn stage_compile_status(&self, stage: &Self::StageHandle) -> bool;

  /// Compiler diagnostic log of a shader object, if any.
  fn stage_info_log(&self, stage: &Self::StageHandle) -> Option<String>;

  /// Release a shader object.
  fn delete_stage(&self, stage: Self::StageHandle);

  /// Allocate a new program object.
  ///
  /// `None` means the context refused to allocate it.
  fn create_program(&self) -> Option<Self::ProgramHandle>;

  /// Attach a shader object to a program object.
  fn attach_stage(&self, program: &Self::ProgramHandle, stage: &Self::StageHandle);

  /// Link a program object.
  fn link_program(&self, program: &Self::ProgramHandle);

  /// Whether the last link of the program object succeeded.
  fn program_link_status(&self, program: &Self::ProgramHandle) -> bool;

  /// Linker diagnostic log of a program object, if any.
  fn program_info_log(&self, program: &Self::ProgramHandle) -> Option<String>;

  /// Release a program object.
  fn delete_program(&self, program: Self::ProgramHandle);
}
