//! Shader support for WebGL2.

use crate::webgl2::WebGL2;
use primer::backend::shader::{ShaderContext, StageType};
use web_sys::{WebGl2RenderingContext, WebGlProgram, WebGlShader};

impl ShaderContext for WebGL2 {
  type StageHandle = WebGlShader;

  type ProgramHandle = WebGlProgram;

  fn create_stage(&self, ty: StageType) -> Option<WebGlShader> {
    self.state.borrow().ctx.create_shader(webgl_shader_type(ty))
  }

  fn stage_source(&self, stage: &WebGlShader, src: &str) {
    self.state.borrow().ctx.shader_source(stage, src);
  }

  fn compile_stage(&self, stage: &WebGlShader) {
    self.state.borrow().ctx.compile_shader(stage);
  }

  fn stage_compile_status(&self, stage: &WebGlShader) -> bool {
    // a lost context answers null here; treat it as a failed compilation
    self
      .state
      .borrow()
      .ctx
      .get_shader_parameter(stage, WebGl2RenderingContext::COMPILE_STATUS)
      .as_bool()
      .unwrap_or(false)
  }

  fn stage_info_log(&self, stage: &WebGlShader) -> Option<String> {
    self.state.borrow().ctx.get_shader_info_log(stage)
  }

  fn delete_stage(&self, stage: WebGlShader) {
    self.state.borrow().ctx.delete_shader(Some(&stage));
  }

  fn create_program(&self) -> Option<WebGlProgram> {
    self.state.borrow().ctx.create_program()
  }

  fn attach_stage(&self, program: &WebGlProgram, stage: &WebGlShader) {
    self.state.borrow().ctx.attach_shader(program, stage);
  }

  fn link_program(&self, program: &WebGlProgram) {
    self.state.borrow().ctx.link_program(program);
  }

  fn program_link_status(&self, program: &WebGlProgram) -> bool {
    self
      .state
      .borrow()
      .ctx
      .get_program_parameter(program, WebGl2RenderingContext::LINK_STATUS)
      .as_bool()
      .unwrap_or(false)
  }

  fn program_info_log(&self, program: &WebGlProgram) -> Option<String> {
    self.state.borrow().ctx.get_program_info_log(program)
  }

  fn delete_program(&self, program: WebGlProgram) {
    let mut state = self.state.borrow_mut();

    state.forget_program(&program);
    state.ctx.delete_program(Some(&program));
  }
}

fn webgl_shader_type(ty: StageType) -> u32 {
  match ty {
    StageType::VertexShader => WebGl2RenderingContext::VERTEX_SHADER,
    StageType::FragmentShader => WebGl2RenderingContext::FRAGMENT_SHADER,
  }
}
