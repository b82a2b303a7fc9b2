//! Following the canvas size.
//!
//! The JavaScript side listens to `resize` events and forwards them as
//! [`InputAction::Resized`]. On each of them, the drawing buffer is resized to the displayed size
//! of the canvas (scaled by the device pixel ratio) and the rectangle is laid out again so that it
//! keeps a margin around it, whatever the size.

use crate::{Example, InputAction, LoopFeedback};
use primer::backend::shader::ShaderContext as _;
use primer::canvas::CanvasSize;
use primer::geometry::{Rect, RECT_FLOATS};
use primer::shader::build_program;
use primer_web_sys::WebSysWebGL2Surface;
use primer_webgl::webgl2::buffer::{Buffer, BufferUsage};
use primer_webgl::webgl2::uniform::Uniform;
use primer_webgl::webgl2::vertex_array::VertexArray;
use primer_webgl::WebGL2;
use web_sys::WebGlProgram;

const VS: &str = include_str!("shaders/pixel-space-vs.glsl");
const FS: &str = include_str!("shaders/uniform-color-fs.glsl");

// fraction of the canvas left empty on each side
const MARGIN: f32 = 0.1;

pub struct LocalExample {
  backend: WebGL2,
  program: WebGlProgram,
  resolution: Uniform,
  color: Uniform,
  rect: VertexArray,
  positions: Buffer,
}

impl Drop for LocalExample {
  fn drop(&mut self) {
    self.backend.delete_program(self.program.clone());
  }
}

fn inset_rect(size: CanvasSize) -> Rect {
  let w = size.width as f32;
  let h = size.height as f32;

  Rect::new(w * MARGIN, h * MARGIN, w * (1. - 2. * MARGIN), h * (1. - 2. * MARGIN))
}

impl LocalExample {
  fn layout(&mut self, size: CanvasSize) {
    let mut corners = [0.; RECT_FLOATS];
    inset_rect(size).write_corners(&mut corners);

    self
      .positions
      .write(0, &corners)
      .expect("rectangle fits in the vertex buffer");
  }
}

impl Example for LocalExample {
  fn bootstrap(surface: &mut WebSysWebGL2Surface) -> Self {
    let backend = surface.backend().clone();

    let program = build_program(&backend, VS, FS).expect("program creation");
    let resolution = Uniform::new(&backend, &program, "u_resolution").expect("u_resolution");
    let color = Uniform::new(&backend, &program, "u_color").expect("u_color");

    let positions = Buffer::from_slice(
      &backend,
      &inset_rect(surface.size()).corners(),
      BufferUsage::Dynamic,
    )
    .expect("vertex buffer");
    let rect =
      VertexArray::new(&backend, &program, "a_position", &positions, 2).expect("vertex array");

    Self {
      backend,
      program,
      resolution,
      color,
      rect,
      positions,
    }
  }

  fn render_frame(
    mut self,
    time: f32,
    actions: impl Iterator<Item = InputAction>,
    surface: &mut WebSysWebGL2Surface,
  ) -> LoopFeedback<Self> {
    for action in actions {
      match action {
        InputAction::Quit => return LoopFeedback::Exit,

        InputAction::Resized { width, height } => {
          log::debug!("canvas displayed at {}×{}", width, height);

          if surface.resize() {
            self.layout(surface.size());
          }
        }
      }
    }

    let size = surface.size();
    let pulse = (time.sin() + 1.) * 0.5;

    self.backend.clear([0., 0., 0., 0.]);
    self.backend.use_program(Some(&self.program));
    self
      .backend
      .set_uniform(&self.resolution, [size.width as f32, size.height as f32]);
    self.backend.set_uniform(&self.color, [0.2, pulse, 0.6, 1.]);
    self
      .backend
      .draw_triangles(&self.rect, 0, self.rect.vertex_count(&self.positions));

    LoopFeedback::Continue(self)
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn inset_keeps_margins() {
    let r = inset_rect(CanvasSize::new(200, 100));
    let expected: [f32; 4] = [20., 10., 160., 80.];

    for (got, expected) in [r.x, r.y, r.width, r.height].iter().zip(&expected) {
      assert!((got - expected).abs() < 1e-3, "{} != {}", got, expected);
    }
  }
}
