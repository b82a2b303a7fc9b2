//! Vertex array objects.
//!
//! A vertex array records how vertex attributes are read from buffers. The scenes only ever need
//! one float attribute per vertex array, so that’s all this supports.

use crate::webgl2::buffer::Buffer;
use crate::webgl2::state::{Bind, WebGL2State};
use crate::webgl2::WebGL2;
use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;
use web_sys::{WebGl2RenderingContext, WebGlProgram, WebGlVertexArrayObject};

/// Vertex array errors.
#[non_exhaustive]
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum VertexArrayError {
  /// The context refused to allocate a vertex array object.
  CannotCreate,
  /// The program has no active attribute with that name.
  InactiveAttribute(String),
  /// Attributes have between one and four components.
  InvalidComponentCount(u32),
}

impl fmt::Display for VertexArrayError {
  fn fmt(&self, f: &mut fmt::Formatter) -> Result<(), fmt::Error> {
    match *self {
      VertexArrayError::CannotCreate => f.write_str("cannot create vertex array"),

      VertexArrayError::InactiveAttribute(ref name) => {
        write!(f, "inactive {} vertex attribute", name)
      }

      VertexArrayError::InvalidComponentCount(n) => {
        write!(f, "invalid vertex attribute component count: {}", n)
      }
    }
  }
}

impl std::error::Error for VertexArrayError {}

/// A vertex array object with a single `f32` attribute.
#[derive(Debug)]
pub struct VertexArray {
  vao: WebGlVertexArrayObject,
  components: u32,
  state: Rc<RefCell<WebGL2State>>,
}

impl Drop for VertexArray {
  fn drop(&mut self) {
    let mut state = self.state.borrow_mut();

    state.unbind_vertex_array(&self.vao);
    state.ctx.delete_vertex_array(Some(&self.vao));
  }
}

impl VertexArray {
  /// Bind the attribute `name` of `program` to `buffer`, `components` floats per vertex, tightly
  /// packed.
  pub fn new(
    webgl2: &WebGL2,
    program: &WebGlProgram,
    name: &str,
    buffer: &Buffer,
    components: u32,
  ) -> Result<Self, VertexArrayError> {
    if !(1..=4).contains(&components) {
      return Err(VertexArrayError::InvalidComponentCount(components));
    }

    let mut state = webgl2.state.borrow_mut();

    let location = state.ctx.get_attrib_location(program, name);
    if location < 0 {
      return Err(VertexArrayError::InactiveAttribute(name.to_owned()));
    }
    let location = location as u32;

    let vao = state
      .create_vertex_array()
      .ok_or(VertexArrayError::CannotCreate)?;

    // force binding the vertex array so that previously bound vertex arrays (possibly the same
    // handle) don’t prevent us from binding here
    state.bind_vertex_array(Some(&vao), Bind::Forced);

    state.ctx.enable_vertex_attrib_array(location);
    state.bind_array_buffer(Some(&buffer.gl_buf), Bind::Forced);
    state.ctx.vertex_attrib_pointer_with_i32(
      location,
      components as i32,
      WebGl2RenderingContext::FLOAT,
      false,
      0,
      0,
    );

    Ok(VertexArray {
      vao,
      components,
      state: webgl2.state.clone(),
    })
  }

  /// Number of vertices `buffer` holds for this vertex array’s layout.
  pub fn vertex_count(&self, buffer: &Buffer) -> usize {
    buffer.len() / self.components as usize
  }

  pub(crate) fn bind(&self, state: &mut WebGL2State) {
    state.bind_vertex_array(Some(&self.vao), Bind::Cached);
  }
}
