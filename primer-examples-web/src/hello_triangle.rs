//! Hello, triangle.
//!
//! The smallest possible WebGL2 program: a pass-through vertex shader, a fragment shader writing a
//! constant color and three vertices in clip space.

use crate::{Example, InputAction, LoopFeedback};
use primer::backend::shader::ShaderContext as _;
use primer::shader::build_program;
use primer_web_sys::WebSysWebGL2Surface;
use primer_webgl::webgl2::buffer::{Buffer, BufferUsage};
use primer_webgl::webgl2::vertex_array::VertexArray;
use primer_webgl::WebGL2;
use web_sys::WebGlProgram;

const VS: &str = include_str!("shaders/pass-through-vs.glsl");
const FS: &str = include_str!("shaders/constant-color-fs.glsl");

// three 2D points, in clip space
const TRI_POSITIONS: [f32; 6] = [0., 0., 0., 0.5, 0.7, 0.];

pub struct LocalExample {
  backend: WebGL2,
  program: WebGlProgram,
  triangle: VertexArray,
  // kept alive for the vertex array
  _positions: Buffer,
}

impl Drop for LocalExample {
  fn drop(&mut self) {
    self.backend.delete_program(self.program.clone());
  }
}

impl Example for LocalExample {
  fn bootstrap(surface: &mut WebSysWebGL2Surface) -> Self {
    let backend = surface.backend().clone();

    let program = build_program(&backend, VS, FS).expect("program creation");
    let positions =
      Buffer::from_slice(&backend, &TRI_POSITIONS, BufferUsage::Static).expect("vertex buffer");
    let triangle =
      VertexArray::new(&backend, &program, "a_position", &positions, 2).expect("vertex array");

    Self {
      backend,
      program,
      triangle,
      _positions: positions,
    }
  }

  fn render_frame(
    self,
    _time: f32,
    actions: impl Iterator<Item = InputAction>,
    _surface: &mut WebSysWebGL2Surface,
  ) -> LoopFeedback<Self> {
    for action in actions {
      if action == InputAction::Quit {
        return LoopFeedback::Exit;
      }
    }

    self.backend.clear([0., 0., 0., 0.]);
    self.backend.use_program(Some(&self.program));
    self.backend.draw_triangles(&self.triangle, 0, 3);

    LoopFeedback::Continue(self)
  }
}
