//! web-sys platform for primer.
//!
//! Grab a `<canvas>` element from the current document, get a WebGL2 context out of it and keep
//! its drawing buffer sized the way [`SurfaceOpt`] asks for.

use primer::canvas::{display_size, CanvasSize};
use primer_webgl::webgl2::{StateQueryError, WebGL2};
use std::fmt;
use wasm_bindgen::JsCast;
use web_sys::{HtmlCanvasElement, WebGl2RenderingContext, Window};

/// How the canvas drawing buffer is sized.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum CanvasDim {
  /// Fixed size, in device pixels.
  Fixed {
    /// Width.
    width: u32,
    /// Height.
    height: u32,
  },
  /// Follow the displayed size of the canvas, scaled by the device pixel ratio.
  Display,
}

/// Surface options.
///
/// Feel free to look at the different methods available to tweak the options. You may want to
/// start with `default()` though.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct SurfaceOpt {
  dim: CanvasDim,
}

impl Default for SurfaceOpt {
  /// Defaults:
  ///
  /// - `dim` set to `CanvasDim::Display`.
  fn default() -> Self {
    SurfaceOpt {
      dim: CanvasDim::Display,
    }
  }
}

impl SurfaceOpt {
  /// Set the canvas sizing policy.
  pub fn set_dim(self, dim: CanvasDim) -> Self {
    SurfaceOpt { dim }
  }

  /// Get the canvas sizing policy.
  pub fn dim(&self) -> CanvasDim {
    self.dim
  }
}

/// web-sys errors that might occur while initializing and using the platform.
#[non_exhaustive]
#[derive(Debug)]
pub enum WebSysWebGL2SurfaceError {
  /// No global `window` object.
  CannotGrabWindow,
  /// The window has no document.
  CannotGrabDocument,
  /// No element with the given id.
  NotSuchCanvasElement(String),
  /// The element with the given id is not a `<canvas>`.
  NotACanvasElement(String),
  /// `getContext("webgl2")` threw.
  CannotGrabWebGL2Context,
  /// The canvas cannot provide a WebGL2 context.
  NoAvailableWebGL2Context,
  /// The initial WebGL2 state couldn’t be read back.
  StateQueryError(StateQueryError),
}

impl WebSysWebGL2SurfaceError {
  fn not_such_canvas_element(name: impl Into<String>) -> Self {
    WebSysWebGL2SurfaceError::NotSuchCanvasElement(name.into())
  }

  fn not_a_canvas_element(name: impl Into<String>) -> Self {
    WebSysWebGL2SurfaceError::NotACanvasElement(name.into())
  }
}

impl fmt::Display for WebSysWebGL2SurfaceError {
  fn fmt(&self, f: &mut fmt::Formatter) -> Result<(), fmt::Error> {
    match *self {
      WebSysWebGL2SurfaceError::CannotGrabWindow => f.write_str("cannot grab the window node"),
      WebSysWebGL2SurfaceError::CannotGrabDocument => f.write_str("cannot grab the document node"),
      WebSysWebGL2SurfaceError::NotSuchCanvasElement(ref name) => {
        write!(f, "cannot grab canvas named {}", name)
      }
      WebSysWebGL2SurfaceError::NotACanvasElement(ref name) => {
        write!(f, "element {} is not a canvas", name)
      }
      WebSysWebGL2SurfaceError::CannotGrabWebGL2Context => {
        f.write_str("cannot grab WebGL2 context")
      }
      WebSysWebGL2SurfaceError::NoAvailableWebGL2Context => {
        f.write_str("no available WebGL2 context")
      }
      WebSysWebGL2SurfaceError::StateQueryError(ref e) => {
        write!(f, "WebGL2 state query error: {}", e)
      }
    }
  }
}

impl std::error::Error for WebSysWebGL2SurfaceError {
  fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
    match self {
      WebSysWebGL2SurfaceError::StateQueryError(e) => Some(e),
      _ => None,
    }
  }
}

impl From<StateQueryError> for WebSysWebGL2SurfaceError {
  fn from(e: StateQueryError) -> Self {
    WebSysWebGL2SurfaceError::StateQueryError(e)
  }
}

/// web-sys surface for WebGL2.
pub struct WebSysWebGL2Surface {
  window: Window,
  canvas: HtmlCanvasElement,
  backend: WebGL2,
  opt: SurfaceOpt,
}

impl WebSysWebGL2Surface {
  /// Grab the canvas with id `canvas_name` and create a WebGL2 context for it.
  pub fn new(canvas_name: &str, opt: SurfaceOpt) -> Result<Self, WebSysWebGL2SurfaceError> {
    let window = web_sys::window().ok_or(WebSysWebGL2SurfaceError::CannotGrabWindow)?;

    let document = window
      .document()
      .ok_or(WebSysWebGL2SurfaceError::CannotGrabDocument)?;

    let canvas = document
      .get_element_by_id(canvas_name)
      .ok_or_else(|| WebSysWebGL2SurfaceError::not_such_canvas_element(canvas_name))?
      .dyn_into::<HtmlCanvasElement>()
      .map_err(|_| WebSysWebGL2SurfaceError::not_a_canvas_element(canvas_name))?;

    let context = canvas
      .get_context("webgl2")
      .map_err(|_| WebSysWebGL2SurfaceError::CannotGrabWebGL2Context)?
      .ok_or(WebSysWebGL2SurfaceError::NoAvailableWebGL2Context)?
      .dyn_into::<WebGl2RenderingContext>()
      .map_err(|_| WebSysWebGL2SurfaceError::NoAvailableWebGL2Context)?;

    let backend = WebGL2::new(context)?;

    let mut surface = Self {
      window,
      canvas,
      backend,
      opt,
    };
    surface.resize();

    log::info!(
      "WebGL2 surface ready on #{} ({}×{})",
      canvas_name,
      surface.canvas.width(),
      surface.canvas.height()
    );

    Ok(surface)
  }

  /// WebGL2 backend bound to the canvas.
  pub fn backend(&self) -> &WebGL2 {
    &self.backend
  }

  /// Current drawing-buffer size.
  pub fn size(&self) -> CanvasSize {
    CanvasSize::new(self.canvas.width(), self.canvas.height())
  }

  /// Apply the sizing policy to the canvas and the viewport.
  ///
  /// Returns whether the drawing-buffer size changed.
  pub fn resize(&mut self) -> bool {
    let changed = match self.opt.dim {
      CanvasDim::Fixed { width, height } => {
        set_canvas_size(&self.canvas, CanvasSize::new(width, height))
      }

      CanvasDim::Display => resize_canvas_to_display(&self.window, &self.canvas),
    };

    let size = self.size();
    self.backend.viewport(size.width, size.height);

    changed
  }
}

/// Resize the drawing buffer of `canvas` to match its displayed size.
///
/// Returns whether the size changed.
pub fn resize_canvas_to_display(window: &Window, canvas: &HtmlCanvasElement) -> bool {
  let dpr = window.device_pixel_ratio();
  let rect = canvas.get_bounding_client_rect();

  set_canvas_size(canvas, display_size(rect.width(), rect.height(), dpr))
}

fn set_canvas_size(canvas: &HtmlCanvasElement, size: CanvasSize) -> bool {
  if canvas.width() == size.width && canvas.height() == size.height {
    return false;
  }

  log::debug!("resizing canvas to {}×{}", size.width, size.height);
  canvas.set_width(size.width);
  canvas.set_height(size.height);

  true
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn default_opt_follows_display() {
    let opt = SurfaceOpt::default();
    assert_eq!(opt.dim(), CanvasDim::Display);

    let opt = opt.set_dim(CanvasDim::Fixed {
      width: 640,
      height: 480,
    });
    assert_eq!(
      opt.dim(),
      CanvasDim::Fixed {
        width: 640,
        height: 480
      }
    );
  }

  #[test]
  fn error_display() {
    assert_eq!(
      WebSysWebGL2SurfaceError::not_such_canvas_element("gl").to_string(),
      "cannot grab canvas named gl"
    );
    assert_eq!(
      WebSysWebGL2SurfaceError::not_a_canvas_element("title").to_string(),
      "element title is not a canvas"
    );

    let e = WebSysWebGL2SurfaceError::from(StateQueryError::UnknownViewportInitialState);
    assert_eq!(
      e.to_string(),
      "WebGL2 state query error: unknown viewport initial state"
    );
    assert!(std::error::Error::source(&e).is_some());
  }
}
