//! Uniform lookup and update.

use crate::webgl2::WebGL2;
use std::fmt;
use web_sys::{WebGlProgram, WebGlUniformLocation};

/// Warnings related to uniform issues.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum UniformWarning {
  /// Inactive uniform (not in use / no participation to the final output in shaders).
  Inactive(String),
}

impl UniformWarning {
  /// Create an inactive uniform warning.
  pub fn inactive<N>(name: N) -> Self
  where
    N: Into<String>,
  {
    UniformWarning::Inactive(name.into())
  }
}

impl fmt::Display for UniformWarning {
  fn fmt(&self, f: &mut fmt::Formatter) -> Result<(), fmt::Error> {
    match *self {
      UniformWarning::Inactive(ref s) => write!(f, "inactive {} uniform", s),
    }
  }
}

impl std::error::Error for UniformWarning {}

/// A uniform of a given program.
#[derive(Clone, Debug)]
pub struct Uniform {
  location: WebGlUniformLocation,
}

impl Uniform {
  /// Look a uniform up by name.
  pub fn new(webgl2: &WebGL2, program: &WebGlProgram, name: &str) -> Result<Self, UniformWarning> {
    webgl2
      .state
      .borrow()
      .ctx
      .get_uniform_location(program, name)
      .map(|location| Uniform { location })
      .ok_or_else(|| UniformWarning::inactive(name))
  }
}

/// Values that can be sent to a uniform.
///
/// The program owning the uniform must be in use (see [`WebGL2::use_program`]).
pub trait Uniformable {
  /// Update `uniform` with `self`.
  fn update(self, webgl2: &WebGL2, uniform: &Uniform);
}

impl Uniformable for f32 {
  fn update(self, webgl2: &WebGL2, uniform: &Uniform) {
    webgl2
      .state
      .borrow()
      .ctx
      .uniform1f(Some(&uniform.location), self);
  }
}

impl Uniformable for [f32; 2] {
  fn update(self, webgl2: &WebGL2, uniform: &Uniform) {
    webgl2
      .state
      .borrow()
      .ctx
      .uniform2f(Some(&uniform.location), self[0], self[1]);
  }
}

impl Uniformable for [f32; 4] {
  fn update(self, webgl2: &WebGL2, uniform: &Uniform) {
    webgl2.state.borrow().ctx.uniform4f(
      Some(&uniform.location),
      self[0],
      self[1],
      self[2],
      self[3],
    );
  }
}

impl WebGL2 {
  /// Set a uniform of the program in use.
  pub fn set_uniform<T>(&self, uniform: &Uniform, value: T)
  where
    T: Uniformable,
  {
    value.update(self, uniform);
  }
}
