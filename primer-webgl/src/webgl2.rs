//! WebGL 2.0 backend support.

pub mod buffer;
pub mod shader;
pub mod state;
pub mod uniform;
pub mod vertex_array;

pub use crate::webgl2::state::StateQueryError;
use crate::webgl2::state::WebGL2State;
use crate::webgl2::vertex_array::VertexArray;
use std::cell::RefCell;
use std::rc::Rc;
pub use web_sys::WebGl2RenderingContext;
use web_sys::WebGlProgram;

/// The WebGL2 backend.
///
/// Cloning is cheap and yields a handle on the same graphics state.
#[derive(Clone, Debug)]
pub struct WebGL2 {
  pub(crate) state: Rc<RefCell<WebGL2State>>,
}

impl WebGL2 {
  /// Wrap a WebGL2 context, reading back the bits of state that get cached.
  pub fn new(ctx: WebGl2RenderingContext) -> Result<Self, StateQueryError> {
    WebGL2State::new(ctx).map(|state| WebGL2 {
      state: Rc::new(RefCell::new(state)),
    })
  }

  /// Set the viewport to cover `width` × `height` pixels from the lower-left corner.
  pub fn viewport(&self, width: u32, height: u32) {
    self
      .state
      .borrow_mut()
      .set_viewport([0, 0, width as i32, height as i32]);
  }

  /// Clear the color buffer with `color`.
  pub fn clear(&self, color: [f32; 4]) {
    let mut state = self.state.borrow_mut();

    state.set_clear_color(color);
    state.ctx.clear(WebGl2RenderingContext::COLOR_BUFFER_BIT);
  }

  /// Make `program` the current program; `None` unbinds.
  pub fn use_program(&self, program: Option<&WebGlProgram>) {
    self.state.borrow_mut().use_program(program);
  }

  /// Draw `count` vertices from `vao` as triangles, starting at vertex `first`.
  pub fn draw_triangles(&self, vao: &VertexArray, first: usize, count: usize) {
    let mut state = self.state.borrow_mut();

    vao.bind(&mut state);
    state
      .ctx
      .draw_arrays(WebGl2RenderingContext::TRIANGLES, first as i32, count as i32);
  }
}
