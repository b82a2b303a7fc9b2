//! Canvas sizing.
//!
//! A canvas has two sizes: the size it is displayed at, in CSS pixels, and the size of its drawing
//! buffer, in device pixels. Rendering crisply means keeping the second one equal to the first one
//! scaled by the device pixel ratio.

/// Size of a drawing buffer, in device pixels.
#[derive(Clone, Copy, Debug, Default, Eq, Hash, PartialEq)]
pub struct CanvasSize {
  /// Width.
  pub width: u32,
  /// Height.
  pub height: u32,
}

impl CanvasSize {
  /// Create a new size.
  pub fn new(width: u32, height: u32) -> Self {
    CanvasSize { width, height }
  }
}

/// Drawing-buffer size matching a CSS size displayed with the given device pixel ratio.
///
/// Each axis is rounded to the nearest device pixel. Negative or non-finite inputs yield `0`.
pub fn display_size(css_width: f64, css_height: f64, device_pixel_ratio: f64) -> CanvasSize {
  CanvasSize {
    width: to_device_pixels(css_width, device_pixel_ratio),
    height: to_device_pixels(css_height, device_pixel_ratio),
  }
}

fn to_device_pixels(css: f64, dpr: f64) -> u32 {
  let px = (css * dpr).round();

  if px.is_finite() && px > 0. {
    px.min(u32::MAX as f64) as u32
  } else {
    0
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn scales_by_device_pixel_ratio() {
    assert_eq!(display_size(300., 150., 1.), CanvasSize::new(300, 150));
    assert_eq!(display_size(300., 150., 2.), CanvasSize::new(600, 300));
  }

  #[test]
  fn rounds_to_nearest() {
    assert_eq!(display_size(100.3, 100.6, 1.5), CanvasSize::new(150, 151));
  }

  #[test]
  fn degenerate_inputs() {
    assert_eq!(display_size(-10., 20., 1.), CanvasSize::new(0, 20));
    assert_eq!(display_size(f64::NAN, 20., 1.), CanvasSize::new(0, 20));
  }
}
