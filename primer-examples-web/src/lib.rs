//! WebGL2 tutorial scenes.
//!
//! Each scene is a module exposing a `LocalExample` that implements [`Example`]. The JavaScript
//! side gets a [`Showcase`] from [`get_showcase`], forwards input events to it and calls
//! [`Showcase::render_example`] once per animation frame with the name of the scene to show.
//!
//! # Error handling
//!
//! Scenes showcase the happy path: resource allocation failures inside a scene are not recovered
//! and end up in `expect`. Shader compile and link diagnostics are logged to the browser console
//! before that happens.

mod hello_triangle;
mod rectangles;
mod resize;

use primer_web_sys::{SurfaceOpt, WebSysWebGL2Surface};
use wasm_bindgen::prelude::*;

/// Example interface.
pub trait Example: Sized {
  /// Bootstrap the example.
  fn bootstrap(surface: &mut WebSysWebGL2Surface) -> Self;

  /// Render a frame of the example.
  fn render_frame(
    self,
    time: f32,
    actions: impl Iterator<Item = InputAction>,
    surface: &mut WebSysWebGL2Surface,
  ) -> LoopFeedback<Self>;
}

/// A type used to pass “inputs” to examples.
#[derive(Clone, Debug, PartialEq)]
pub enum InputAction {
  /// Quit the application.
  Quit,

  /// The displayed size of the canvas changed.
  Resized { width: u32, height: u32 },
}

/// Whether an example wants to keep running.
#[derive(Clone, Debug, Eq, Hash, PartialEq)]
pub enum LoopFeedback<T> {
  Continue(T),
  Exit,
}

/// Input actions waiting for the next rendered frame.
#[derive(Debug, Default)]
pub struct ActionQueue {
  actions: Vec<InputAction>,
}

impl ActionQueue {
  /// Queue an action for the next frame.
  pub fn push(&mut self, action: InputAction) {
    self.actions.push(action);
  }

  /// Hand the queued actions over to a frame.
  pub fn drain(&mut self) -> impl Iterator<Item = InputAction> + '_ {
    self.actions.drain(..)
  }

  /// Drop queued actions without delivering them.
  pub fn discard(&mut self) {
    if !self.actions.is_empty() {
      log::debug!("discarding {} pending actions", self.actions.len());
      self.actions.clear();
    }
  }

  /// Number of queued actions.
  pub fn len(&self) -> usize {
    self.actions.len()
  }

  /// Whether nothing is queued.
  pub fn is_empty(&self) -> bool {
    self.actions.is_empty()
  }
}

/// Macro to declaratively add examples.
macro_rules! examples {
  ($($test_name:literal, $test_ident:ident),* $(,)?) => {
    /// List of available examples.
    #[wasm_bindgen]
    pub fn examples_names() -> Box<[JsValue]> {
      let names: Vec<JsValue> = vec![$( $test_name.into() ),*];
      names.into_boxed_slice()
    }

    /// Main example object.
    ///
    /// This object will be passed around in JavaScript and will act as a bridge between the
    /// JavaScript code and the Rust code.
    #[wasm_bindgen]
    pub struct Showcase {
      surface: WebSysWebGL2Surface,
      actions: ActionQueue,
      $( $test_ident: Option<$test_ident::LocalExample> ),*
    }

    #[wasm_bindgen]
    impl Showcase {
      fn new(surface: WebSysWebGL2Surface) -> Self {
        Showcase {
          surface,
          actions: ActionQueue::default(),
          $( $test_ident: None ),*
        }
      }

      pub fn enqueue_quit_action(&mut self) {
        self.actions.push(InputAction::Quit);
      }

      pub fn enqueue_resized_action(&mut self, width: u32, height: u32) {
        self.actions.push(InputAction::Resized { width, height });
      }

      /// Cleanup all examples.
      pub fn reset(&mut self) {
        self.actions.discard();

        $(
          log::debug!("resetting example {}", $test_name);
          self.$test_ident = None;
        )*
      }

      /// Render a frame of the example called `name`.
      ///
      /// Returns `false` once the example has exited, or if there is no such example.
      pub fn render_example(&mut self, name: &str, time: f32) -> bool {
        match name {
          $(
            $test_name => {
              // bootstrap the example on its first frame
              let surface = &mut self.surface;
              let example = self.$test_ident.take().unwrap_or_else(|| {
                log::debug!("bootstrapping example {}", $test_name);
                $test_ident::LocalExample::bootstrap(surface)
              });

              let loop_feedback = example.render_frame(time, self.actions.drain(), surface);

              // deallocate the example if we exit it
              match loop_feedback {
                LoopFeedback::Continue(stepped) => {
                  self.$test_ident = Some(stepped);
                  true
                }

                LoopFeedback::Exit => {
                  log::debug!("example {} exited", $test_name);
                  false
                }
              }
            }
          )*

          _ => {
            log::warn!("{} is not a valid example", name);
            self.actions.discard();
            false
          }
        }
      }
    }
  }
}

examples! {
  "hello-triangle", hello_triangle,
  "rectangles", rectangles,
  "resize", resize,
}

/// Create the showcase on the canvas with id `canvas_name`.
#[wasm_bindgen]
pub fn get_showcase(canvas_name: &str) -> Result<Showcase, JsValue> {
  wasm_logger::init(wasm_logger::Config::new(log::Level::Debug));
  console_error_panic_hook::set_once();

  log::info!("creating the WebGL2 context…");
  let surface = WebSysWebGL2Surface::new(canvas_name, SurfaceOpt::default())
    .map_err(|e| JsValue::from_str(&e.to_string()))?;

  Ok(Showcase::new(surface))
}
