//! Random rectangles.
//!
//! Vertices are given in pixels and converted to clip space in the vertex shader with the
//! `u_resolution` uniform. Every rectangle gets its own color through the `u_color` uniform, so
//! they are drawn one draw call each, out of a single vertex buffer.

use crate::{Example, InputAction, LoopFeedback};
use primer::backend::shader::ShaderContext as _;
use primer::geometry::{rects_to_vertices, Rect, RECT_FLOATS};
use primer::shader::build_program;
use primer_web_sys::WebSysWebGL2Surface;
use primer_webgl::webgl2::buffer::{Buffer, BufferUsage};
use primer_webgl::webgl2::uniform::Uniform;
use primer_webgl::webgl2::vertex_array::VertexArray;
use primer_webgl::WebGL2;
use web_sys::WebGlProgram;

const VS: &str = include_str!("shaders/pixel-space-vs.glsl");
const FS: &str = include_str!("shaders/uniform-color-fs.glsl");

const RECT_COUNT: usize = 50;

// vertices per rectangle
const RECT_VERTICES: usize = RECT_FLOATS / 2;

pub struct LocalExample {
  backend: WebGL2,
  program: WebGlProgram,
  resolution: Uniform,
  color: Uniform,
  rects: VertexArray,
  colors: Vec<[f32; 4]>,
  _positions: Buffer,
}

impl Drop for LocalExample {
  fn drop(&mut self) {
    self.backend.delete_program(self.program.clone());
  }
}

/// Random rectangles within `width` × `height` pixels, sides up to `max_side`.
fn random_rects(
  count: usize,
  width: f32,
  height: f32,
  max_side: f32,
  mut random: impl FnMut() -> f32,
) -> Vec<Rect> {
  (0..count)
    .map(|_| {
      Rect::new(
        random() * width,
        random() * height,
        random() * max_side,
        random() * max_side,
      )
    })
    .collect()
}

fn random() -> f32 {
  js_sys::Math::random() as f32
}

impl Example for LocalExample {
  fn bootstrap(surface: &mut WebSysWebGL2Surface) -> Self {
    let backend = surface.backend().clone();
    let size = surface.size();

    let program = build_program(&backend, VS, FS).expect("program creation");
    let resolution = Uniform::new(&backend, &program, "u_resolution").expect("u_resolution");
    let color = Uniform::new(&backend, &program, "u_color").expect("u_color");

    let rects = random_rects(
      RECT_COUNT,
      size.width as f32,
      size.height as f32,
      size.width.min(size.height) as f32 / 3.,
      random,
    );
    let colors = (0..RECT_COUNT)
      .map(|_| [random(), random(), random(), 1.])
      .collect();

    let positions = Buffer::from_slice(&backend, &rects_to_vertices(&rects), BufferUsage::Static)
      .expect("vertex buffer");
    let rects =
      VertexArray::new(&backend, &program, "a_position", &positions, 2).expect("vertex array");

    log::debug!("{} rectangles ready", RECT_COUNT);

    Self {
      backend,
      program,
      resolution,
      color,
      rects,
      colors,
      _positions: positions,
    }
  }

  fn render_frame(
    self,
    _time: f32,
    actions: impl Iterator<Item = InputAction>,
    surface: &mut WebSysWebGL2Surface,
  ) -> LoopFeedback<Self> {
    for action in actions {
      if action == InputAction::Quit {
        return LoopFeedback::Exit;
      }
    }

    let size = surface.size();

    self.backend.clear([0., 0., 0., 0.]);
    self.backend.use_program(Some(&self.program));
    self
      .backend
      .set_uniform(&self.resolution, [size.width as f32, size.height as f32]);

    for (i, color) in self.colors.iter().enumerate() {
      self.backend.set_uniform(&self.color, *color);
      self
        .backend
        .draw_triangles(&self.rects, i * RECT_VERTICES, RECT_VERTICES);
    }

    LoopFeedback::Continue(self)
  }
}
