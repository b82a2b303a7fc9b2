//! WebGL2 buffer implementation.

use crate::webgl2::state::{Bind, WebGL2State};
use crate::webgl2::WebGL2;
use js_sys::Float32Array;
use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;
use web_sys::{WebGl2RenderingContext, WebGlBuffer};

/// Buffer errors.
#[non_exhaustive]
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum BufferError {
  /// The context refused to allocate a buffer object.
  CannotCreate,
  /// Trying to write past the end of the buffer.
  Overflow {
    /// Buffer length, in items.
    len: usize,
    /// Index one past the last written item.
    end: usize,
  },
}

impl fmt::Display for BufferError {
  fn fmt(&self, f: &mut fmt::Formatter) -> Result<(), fmt::Error> {
    match *self {
      BufferError::CannotCreate => f.write_str("cannot create buffer"),

      BufferError::Overflow { len, end } => {
        write!(f, "buffer overflow (length = {}, write up to = {})", len, end)
      }
    }
  }
}

impl std::error::Error for BufferError {}

/// Usage hint given to the GPU when (re)allocating the buffer storage.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum BufferUsage {
  /// Written once, drawn many times.
  Static,
  /// Rewritten often.
  Dynamic,
}

impl BufferUsage {
  fn to_glenum(self) -> u32 {
    match self {
      BufferUsage::Static => WebGl2RenderingContext::STATIC_DRAW,
      BufferUsage::Dynamic => WebGl2RenderingContext::DYNAMIC_DRAW,
    }
  }
}

/// An `ARRAY_BUFFER` holding `f32` vertex data.
#[derive(Debug)]
pub struct Buffer {
  pub(crate) gl_buf: WebGlBuffer,
  len: usize,
  usage: BufferUsage,
  state: Rc<RefCell<WebGL2State>>,
}

impl Drop for Buffer {
  fn drop(&mut self) {
    let mut state = self.state.borrow_mut();

    state.unbind_buffer(&self.gl_buf);
    state.ctx.delete_buffer(Some(&self.gl_buf));
  }
}

impl Buffer {
  /// Create a buffer and upload `data` into it.
  pub fn from_slice(
    webgl2: &WebGL2,
    data: &[f32],
    usage: BufferUsage,
  ) -> Result<Self, BufferError> {
    let mut state = webgl2.state.borrow_mut();

    // generate a buffer and force binding the handle; this prevent side-effects from previous bound
    // resources to prevent binding the buffer
    let gl_buf = state.create_buffer().ok_or(BufferError::CannotCreate)?;
    state.bind_array_buffer(Some(&gl_buf), Bind::Forced);
    upload(&state.ctx, data, usage);

    Ok(Buffer {
      gl_buf,
      len: data.len(),
      usage,
      state: webgl2.state.clone(),
    })
  }

  /// Number of `f32` in the buffer.
  pub fn len(&self) -> usize {
    self.len
  }

  /// Whether the buffer is empty.
  pub fn is_empty(&self) -> bool {
    self.len == 0
  }

  /// Replace the whole content of the buffer, reallocating it if the length changes.
  pub fn set(&mut self, data: &[f32]) {
    let mut state = self.state.borrow_mut();

    state.bind_array_buffer(Some(&self.gl_buf), Bind::Cached);
    upload(&state.ctx, data, self.usage);
    self.len = data.len();
  }

  /// Overwrite the items starting at `offset` with `data`, without reallocating.
  pub fn write(&mut self, offset: usize, data: &[f32]) -> Result<(), BufferError> {
    let end = offset + data.len();

    if end > self.len {
      return Err(BufferError::Overflow { len: self.len, end });
    }

    let mut state = self.state.borrow_mut();
    state.bind_array_buffer(Some(&self.gl_buf), Bind::Cached);

    // the view must not outlive data and no allocation may happen while it exists
    let view = unsafe { Float32Array::view(data) };
    state.ctx.buffer_sub_data_with_i32_and_array_buffer_view(
      WebGl2RenderingContext::ARRAY_BUFFER,
      (offset * std::mem::size_of::<f32>()) as i32,
      &view,
    );

    Ok(())
  }
}

// Upload into the currently bound ARRAY_BUFFER.
fn upload(ctx: &WebGl2RenderingContext, data: &[f32], usage: BufferUsage) {
  // the view must not outlive data and no allocation may happen while it exists
  let view = unsafe { Float32Array::view(data) };
  ctx.buffer_data_with_array_buffer_view(
    WebGl2RenderingContext::ARRAY_BUFFER,
    &view,
    usage.to_glenum(),
  );
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn usage_hints() {
    assert_eq!(BufferUsage::Static.to_glenum(), 0x88E4);
    assert_eq!(BufferUsage::Dynamic.to_glenum(), 0x88E8);
  }

  #[test]
  fn overflow_display() {
    let e = BufferError::Overflow { len: 12, end: 24 };
    assert_eq!(e.to_string(), "buffer overflow (length = 12, write up to = 24)");
  }
}
