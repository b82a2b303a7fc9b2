//! Flat vertex data for simple shapes.
//!
//! Positions are 2D and expressed in whatever space the vertex shader expects (pixels in the
//! rectangle scenes). Shapes are flattened into `f32` slices ready to be uploaded into a vertex
//! buffer with two components per vertex.

/// Number of `f32` a rectangle needs: two triangles of three 2D corners.
pub const RECT_FLOATS: usize = 12;

/// An axis-aligned rectangle.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Rect {
  /// Left edge.
  pub x: f32,
  /// Top edge.
  pub y: f32,
  /// Width, may be negative (the rectangle then extends to the left).
  pub width: f32,
  /// Height, may be negative.
  pub height: f32,
}

impl Rect {
  /// Create a new rectangle.
  pub fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
    Rect {
      x,
      y,
      width,
      height,
    }
  }

  /// Corners of the two triangles covering the rectangle.
  ///
  /// The triangles are `(x1, y1) (x2, y1) (x1, y2)` and `(x1, y2) (x2, y1) (x2, y2)`.
  pub fn corners(&self) -> [f32; RECT_FLOATS] {
    let x1 = self.x;
    let x2 = self.x + self.width;
    let y1 = self.y;
    let y2 = self.y + self.height;

    [x1, y1, x2, y1, x1, y2, x1, y2, x2, y1, x2, y2]
  }

  /// Write the corners into the first [`RECT_FLOATS`] items of `out`.
  ///
  /// # Panics
  ///
  /// Panics if `out` is shorter than [`RECT_FLOATS`].
  pub fn write_corners(&self, out: &mut [f32]) {
    out[..RECT_FLOATS].copy_from_slice(&self.corners());
  }
}

/// Flatten a list of rectangles into one vertex array, [`RECT_FLOATS`] items per rectangle.
pub fn rects_to_vertices<'a>(rects: impl IntoIterator<Item = &'a Rect>) -> Vec<f32> {
  rects.into_iter().flat_map(|r| r.corners()).collect()
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn corners_cover_two_triangles() {
    let r = Rect::new(10., 20., 30., 40.);

    assert_eq!(
      r.corners(),
      [10., 20., 40., 20., 10., 60., 10., 60., 40., 20., 40., 60.]
    );
  }

  #[test]
  fn write_corners_leaves_the_tail_alone() {
    let mut out = [-1.; RECT_FLOATS + 2];
    Rect::new(0., 0., 1., 1.).write_corners(&mut out);

    assert_eq!(&out[..RECT_FLOATS], &Rect::new(0., 0., 1., 1.).corners());
    assert_eq!(&out[RECT_FLOATS..], &[-1., -1.]);
  }

  #[test]
  fn flatten_several_rects() {
    let rects = [Rect::new(0., 0., 1., 1.), Rect::new(5., 5., 2., 3.)];
    let vertices = rects_to_vertices(&rects);

    assert_eq!(vertices.len(), 2 * RECT_FLOATS);
    assert_eq!(&vertices[RECT_FLOATS..], &rects[1].corners());
  }
}
