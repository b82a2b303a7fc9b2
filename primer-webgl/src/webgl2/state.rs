//! Graphics state.

use js_sys::{Float32Array, Int32Array};
use std::{fmt, marker::PhantomData};
use web_sys::{WebGl2RenderingContext, WebGlBuffer, WebGlProgram, WebGlVertexArrayObject};

/// Whether a binding should go through the cache.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub(crate) enum Bind {
  Forced,
  Cached,
}

/// The graphics state.
///
/// This type represents the current state of a given graphics context. It acts
/// as a forward-gate to the low-level API but adds a small cache layer over it to
/// prevent from issuing the same API call (with the same parameters).
#[derive(Debug)]
pub struct WebGL2State {
  _phantom: PhantomData<*const ()>, // !Send and !Sync

  // WebGL context
  pub(crate) ctx: WebGl2RenderingContext,

  // viewport
  viewport: [i32; 4],

  // clear buffers
  clear_color: [f32; 4],

  // array buffer
  bound_array_buffer: Option<WebGlBuffer>,

  // vertex array
  bound_vertex_array: Option<WebGlVertexArrayObject>,

  // shader program
  current_program: Option<WebGlProgram>,
}

impl WebGL2State {
  pub(crate) fn new(ctx: WebGl2RenderingContext) -> Result<Self, StateQueryError> {
    let viewport = get_ctx_viewport(&ctx)?;
    let clear_color = get_ctx_clear_color(&ctx)?;

    Ok(WebGL2State {
      _phantom: PhantomData,
      ctx,
      viewport,
      clear_color,
      bound_array_buffer: None,
      bound_vertex_array: None,
      current_program: None,
    })
  }

  pub(crate) fn create_buffer(&mut self) -> Option<WebGlBuffer> {
    self.ctx.create_buffer()
  }

  pub(crate) fn bind_array_buffer(&mut self, buffer: Option<&WebGlBuffer>, bind: Bind) {
    if bind == Bind::Forced || self.bound_array_buffer.as_ref() != buffer {
      self
        .ctx
        .bind_buffer(WebGl2RenderingContext::ARRAY_BUFFER, buffer);
      self.bound_array_buffer = buffer.cloned();
    }
  }

  pub(crate) fn unbind_buffer(&mut self, buffer: &WebGlBuffer) {
    if self.bound_array_buffer.as_ref() == Some(buffer) {
      self.bind_array_buffer(None, Bind::Cached);
    }
  }

  pub(crate) fn create_vertex_array(&mut self) -> Option<WebGlVertexArrayObject> {
    self.ctx.create_vertex_array()
  }

  pub(crate) fn bind_vertex_array(&mut self, vao: Option<&WebGlVertexArrayObject>, bind: Bind) {
    if bind == Bind::Forced || self.bound_vertex_array.as_ref() != vao {
      self.ctx.bind_vertex_array(vao);
      self.bound_vertex_array = vao.cloned();
    }
  }

  pub(crate) fn unbind_vertex_array(&mut self, vao: &WebGlVertexArrayObject) {
    if self.bound_vertex_array.as_ref() == Some(vao) {
      self.bind_vertex_array(None, Bind::Cached);
    }
  }

  pub(crate) fn use_program(&mut self, handle: Option<&WebGlProgram>) {
    if self.current_program.as_ref() != handle {
      self.ctx.use_program(handle);
      self.current_program = handle.cloned();
    }
  }

  // a deleted program stays in use until another one replaces it; forget it so that the next
  // use_program with a fresh handle is not skipped
  pub(crate) fn forget_program(&mut self, handle: &WebGlProgram) {
    if self.current_program.as_ref() == Some(handle) {
      self.current_program = None;
    }
  }

  pub(crate) fn set_viewport(&mut self, viewport: [i32; 4]) {
    if self.viewport != viewport {
      self
        .ctx
        .viewport(viewport[0], viewport[1], viewport[2], viewport[3]);
      self.viewport = viewport;
    }
  }

  pub(crate) fn set_clear_color(&mut self, clear_color: [f32; 4]) {
    if self.clear_color != clear_color {
      self.ctx.clear_color(
        clear_color[0],
        clear_color[1],
        clear_color[2],
        clear_color[3],
      );
      self.clear_color = clear_color;
    }
  }
}

/// An error that might happen when the context is queried.
#[non_exhaustive]
#[derive(Debug)]
pub enum StateQueryError {
  /// Unknown viewport initial state.
  UnknownViewportInitialState,
  /// Unknown clear color initial state.
  UnknownClearColorInitialState,
}

impl fmt::Display for StateQueryError {
  fn fmt(&self, f: &mut fmt::Formatter) -> Result<(), fmt::Error> {
    match *self {
      StateQueryError::UnknownViewportInitialState => write!(f, "unknown viewport initial state"),

      StateQueryError::UnknownClearColorInitialState => {
        write!(f, "unknown clear color initial state")
      }
    }
  }
}

impl std::error::Error for StateQueryError {}

fn get_ctx_viewport(ctx: &WebGl2RenderingContext) -> Result<[i32; 4], StateQueryError> {
  let array: Int32Array = ctx
    .get_parameter(WebGl2RenderingContext::VIEWPORT)
    .ok()
    .map(Int32Array::from)
    .ok_or(StateQueryError::UnknownViewportInitialState)?;

  if array.length() != 4 {
    return Err(StateQueryError::UnknownViewportInitialState);
  }

  let mut viewport = [0; 4];
  array.copy_to(&mut viewport); // safe thanks to the length test above

  Ok(viewport)
}

fn get_ctx_clear_color(ctx: &WebGl2RenderingContext) -> Result<[f32; 4], StateQueryError> {
  let array: Float32Array = ctx
    .get_parameter(WebGl2RenderingContext::COLOR_CLEAR_VALUE)
    .ok()
    .map(Float32Array::from)
    .ok_or(StateQueryError::UnknownClearColorInitialState)?;

  if array.length() != 4 {
    return Err(StateQueryError::UnknownClearColorInitialState);
  }

  let mut color = [0.0; 4];
  array.copy_to(&mut color);

  Ok(color)
}
