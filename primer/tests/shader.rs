use log::{Level, Log, Metadata, Record};
use primer::backend::shader::{ShaderContext, StageType};
use primer::shader::{build_program, compile_stage, link_program, ProgramError, StageError};
use std::cell::{Cell, RefCell};
use std::collections::HashMap;
use std::sync::Once;

const PASS_THROUGH_VS: &str = "#version 300 es
in vec4 a_position;

void main() {
  gl_Position = a_position;
}
";

const CONSTANT_COLOR_FS: &str = "#version 300 es
precision highp float;

out vec4 outColor;

void main() {
  outColor = vec4(1, 0, 0.5, 1);
}
";

const COLORED_VS: &str = "#version 300 es
in vec4 a_position;
out vec4 v_color;

void main() {
  gl_Position = a_position;
  v_color = a_position * 0.5 + 0.5;
}
";

const VARYING_FS: &str = "#version 300 es
precision highp float;

in vec4 v_color;
out vec4 outColor;

void main() {
  outColor = v_color;
}
";

const BROKEN_FS: &str = "#version 300 es
precision highp float;

out vec4 outColor;

void mian() {
  outColor = vec4(1, 0, 0.5, 1)
}
";

const BROKEN_VS: &str = "#version 300 es
in vec4 a_position;

void main() {
  gl_Position = a_position
}
";

// Logger keeping records per thread (each test runs on its own thread) and forwarding them to
// env_logger so that they still show up with --nocapture.
struct CaptureLogger {
  inner: env_logger::Logger,
}

thread_local! {
  static RECORDS: RefCell<Vec<(Level, String)>> = RefCell::new(Vec::new());
}

impl Log for CaptureLogger {
  fn enabled(&self, _: &Metadata) -> bool {
    true
  }

  fn log(&self, record: &Record) {
    RECORDS.with(|r| {
      r.borrow_mut()
        .push((record.level(), record.args().to_string()))
    });

    if self.inner.enabled(record.metadata()) {
      self.inner.log(record);
    }
  }

  fn flush(&self) {
    self.inner.flush();
  }
}

fn init_logs() {
  static INIT: Once = Once::new();

  INIT.call_once(|| {
    let inner = env_logger::Builder::from_default_env().is_test(true).build();
    log::set_boxed_logger(Box::new(CaptureLogger { inner })).expect("logger");
    log::set_max_level(log::LevelFilter::Trace);
  });

  RECORDS.with(|r| r.borrow_mut().clear());
}

fn error_logs() -> Vec<String> {
  RECORDS.with(|r| {
    r.borrow()
      .iter()
      .filter(|(level, _)| *level == Level::Error)
      .map(|(_, msg)| msg.clone())
      .collect()
  })
}

/// Calls issued against the context.
#[derive(Clone, Debug, Eq, PartialEq)]
enum Call {
  CreateStage(StageType),
  StageSource(u32),
  CompileStage(u32),
  StageCompileStatus(u32),
  StageInfoLog(u32),
  DeleteStage(u32),
  CreateProgram,
  AttachStage(u32, u32),
  LinkProgram(u32),
  ProgramLinkStatus(u32),
  ProgramInfoLog(u32),
  DeleteProgram(u32),
}

#[derive(Debug)]
struct FakeStage {
  ty: StageType,
  src: String,
  compiled: bool,
  log: String,
}

#[derive(Debug, Default)]
struct FakeProgram {
  stages: Vec<u32>,
  linked: bool,
  log: String,
}

/// A context double with just enough of a GLSL “compiler” to tell good sources from bad ones: a
/// stage compiles when it defines `void main()` and all its statements end properly, and a program
/// links when every `in` of the fragment stage is an `out` of the vertex stage.
#[derive(Debug, Default)]
struct FakeContext {
  refuse_stages: bool,
  refuse_programs: bool,
  // the host answers with empty diagnostic logs
  silent_logs: bool,
  next_handle: Cell<u32>,
  stages: RefCell<HashMap<u32, FakeStage>>,
  programs: RefCell<HashMap<u32, FakeProgram>>,
  calls: RefCell<Vec<Call>>,
}

impl FakeContext {
  fn new() -> Self {
    Self::default()
  }

  fn record(&self, call: Call) {
    self.calls.borrow_mut().push(call);
  }

  fn calls(&self) -> Vec<Call> {
    self.calls.borrow().clone()
  }

  fn clear_calls(&self) {
    self.calls.borrow_mut().clear();
  }

  fn alloc(&self) -> u32 {
    let h = self.next_handle.get() + 1;
    self.next_handle.set(h);
    h
  }

  fn live_stages(&self) -> usize {
    self.stages.borrow().len()
  }

  fn live_programs(&self) -> usize {
    self.programs.borrow().len()
  }

  fn queried_logs(&self) -> bool {
    self
      .calls
      .borrow()
      .iter()
      .any(|c| matches!(c, Call::StageInfoLog(_) | Call::ProgramInfoLog(_)))
  }
}

fn declarations<'a>(src: &'a str, qualifier: &str) -> Vec<&'a str> {
  src
    .lines()
    .map(str::trim)
    .filter_map(|line| line.strip_prefix(qualifier))
    .filter_map(|decl| decl.strip_prefix(' '))
    .map(|decl| decl.trim_end_matches(';').trim())
    .collect()
}

fn check_source(src: &str) -> Result<(), String> {
  if !src.contains("void main()") {
    return Err("ERROR: 0:1: 'main' : function not defined".to_owned());
  }

  for (i, line) in src.lines().enumerate() {
    let line = line.trim();

    if line.contains('=') && !line.ends_with(';') {
      return Err(format!("ERROR: 0:{}: '}}' : syntax error", i + 2));
    }
  }

  Ok(())
}

impl ShaderContext for FakeContext {
  type StageHandle = u32;

  type ProgramHandle = u32;

  fn create_stage(&self, ty: StageType) -> Option<u32> {
    self.record(Call::CreateStage(ty));

    if self.refuse_stages {
      return None;
    }

    let h = self.alloc();
    self.stages.borrow_mut().insert(
      h,
      FakeStage {
        ty,
        src: String::new(),
        compiled: false,
        log: String::new(),
      },
    );
    Some(h)
  }

  fn stage_source(&self, stage: &u32, src: &str) {
    self.record(Call::StageSource(*stage));
    self.stages.borrow_mut().get_mut(stage).unwrap().src = src.to_owned();
  }

  fn compile_stage(&self, stage: &u32) {
    self.record(Call::CompileStage(*stage));

    let mut stages = self.stages.borrow_mut();
    let stage = stages.get_mut(stage).unwrap();

    match check_source(&stage.src) {
      Ok(()) => {
        stage.compiled = true;
        stage.log.clear();
      }

      Err(log) => {
        stage.compiled = false;
        stage.log = log;
      }
    }
  }

  fn stage_compile_status(&self, stage: &u32) -> bool {
    self.record(Call::StageCompileStatus(*stage));
    self.stages.borrow()[stage].compiled
  }

  fn stage_info_log(&self, stage: &u32) -> Option<String> {
    self.record(Call::StageInfoLog(*stage));

    if self.silent_logs {
      return None;
    }

    Some(self.stages.borrow()[stage].log.clone())
  }

  fn delete_stage(&self, stage: u32) {
    self.record(Call::DeleteStage(stage));
    self.stages.borrow_mut().remove(&stage);
  }

  fn create_program(&self) -> Option<u32> {
    self.record(Call::CreateProgram);

    if self.refuse_programs {
      return None;
    }

    let h = self.alloc();
    self.programs.borrow_mut().insert(h, FakeProgram::default());
    Some(h)
  }

  fn attach_stage(&self, program: &u32, stage: &u32) {
    self.record(Call::AttachStage(*program, *stage));
    self
      .programs
      .borrow_mut()
      .get_mut(program)
      .unwrap()
      .stages
      .push(*stage);
  }

  fn link_program(&self, program: &u32) {
    self.record(Call::LinkProgram(*program));

    let stages = self.stages.borrow();
    let mut programs = self.programs.borrow_mut();
    let program = programs.get_mut(program).unwrap();

    let find = |ty: StageType| {
      program
        .stages
        .iter()
        .filter_map(|h| stages.get(h))
        .find(|s| s.ty == ty && s.compiled)
    };

    let (vs, fs) = match (find(StageType::VertexShader), find(StageType::FragmentShader)) {
      (Some(vs), Some(fs)) => (vs, fs),
      _ => {
        program.linked = false;
        program.log = "ERROR: missing compiled stage".to_owned();
        return;
      }
    };

    let outputs = declarations(&vs.src, "out");
    let missing = declarations(&fs.src, "in")
      .into_iter()
      .find(|input| !outputs.contains(input));

    match missing {
      Some(input) => {
        program.linked = false;
        program.log = format!(
          "ERROR: Input of fragment shader '{}' not written by vertex shader",
          input
        );
      }

      None => {
        program.linked = true;
        program.log.clear();
      }
    }
  }

  fn program_link_status(&self, program: &u32) -> bool {
    self.record(Call::ProgramLinkStatus(*program));
    self.programs.borrow()[program].linked
  }

  fn program_info_log(&self, program: &u32) -> Option<String> {
    self.record(Call::ProgramInfoLog(*program));

    if self.silent_logs {
      return Some(String::new());
    }

    Some(self.programs.borrow()[program].log.clone())
  }

  fn delete_program(&self, program: u32) {
    self.record(Call::DeleteProgram(program));
    self.programs.borrow_mut().remove(&program);
  }
}

#[test]
fn compile_valid_stage() {
  init_logs();
  let ctx = FakeContext::new();

  let vs = compile_stage(&ctx, StageType::VertexShader, PASS_THROUGH_VS).expect("vertex shader");

  assert_eq!(
    ctx.calls(),
    vec![
      Call::CreateStage(StageType::VertexShader),
      Call::StageSource(vs),
      Call::CompileStage(vs),
      Call::StageCompileStatus(vs),
    ]
  );
  assert_eq!(ctx.live_stages(), 1);
  assert!(error_logs().is_empty());
}

#[test]
fn compile_invalid_stage_releases_it() {
  init_logs();
  let ctx = FakeContext::new();

  let err = compile_stage(&ctx, StageType::FragmentShader, BROKEN_FS).unwrap_err();

  match err {
    StageError::CompilationFailed(StageType::FragmentShader, ref log) => {
      assert!(log.contains("function not defined"))
    }
    ref e => panic!("unexpected error: {:?}", e),
  }

  assert_eq!(ctx.live_stages(), 0);
  assert_eq!(ctx.calls().last(), Some(&Call::DeleteStage(1)));

  let logs = error_logs();
  assert_eq!(logs.len(), 1);
  assert!(logs[0].contains("function not defined"));
}

#[test]
fn compile_failure_without_log_still_has_diagnostic() {
  init_logs();
  let ctx = FakeContext {
    silent_logs: true,
    ..FakeContext::new()
  };

  let err = compile_stage(&ctx, StageType::FragmentShader, BROKEN_FS).unwrap_err();

  assert_eq!(
    err,
    StageError::CompilationFailed(
      StageType::FragmentShader,
      "unknown compilation error".to_owned()
    )
  );
  assert_eq!(ctx.live_stages(), 0);
  assert_eq!(error_logs().len(), 1);
}

#[test]
fn compile_reports_statement_errors() {
  init_logs();
  let ctx = FakeContext::new();

  let src = "void main() {\n  gl_Position = vec4(0)\n}\n";
  let err = compile_stage(&ctx, StageType::VertexShader, src).unwrap_err();

  assert!(matches!(
    err,
    StageError::CompilationFailed(StageType::VertexShader, ref log) if log.contains("syntax error")
  ));
}

#[test]
fn stage_creation_refused() {
  init_logs();
  let ctx = FakeContext {
    refuse_stages: true,
    ..FakeContext::new()
  };

  let err = compile_stage(&ctx, StageType::VertexShader, PASS_THROUGH_VS).unwrap_err();

  assert_eq!(err, StageError::CreationFailed(StageType::VertexShader));
  assert_eq!(ctx.calls(), vec![Call::CreateStage(StageType::VertexShader)]);
}

#[test]
fn link_complementary_stages() {
  init_logs();
  let ctx = FakeContext::new();

  let vs = compile_stage(&ctx, StageType::VertexShader, COLORED_VS).unwrap();
  let fs = compile_stage(&ctx, StageType::FragmentShader, VARYING_FS).unwrap();
  ctx.clear_calls();

  let program = link_program(&ctx, &vs, &fs).expect("program");

  assert_eq!(
    ctx.calls(),
    vec![
      Call::CreateProgram,
      Call::AttachStage(program, vs),
      Call::AttachStage(program, fs),
      Call::LinkProgram(program),
      Call::ProgramLinkStatus(program),
    ]
  );
  assert_eq!(ctx.live_programs(), 1);
  // stages belong to the caller
  assert_eq!(ctx.live_stages(), 2);
  assert!(error_logs().is_empty());
}

#[test]
fn link_mismatched_interfaces() {
  init_logs();
  let ctx = FakeContext::new();

  let vs = compile_stage(&ctx, StageType::VertexShader, PASS_THROUGH_VS).unwrap();
  let fs = compile_stage(&ctx, StageType::FragmentShader, VARYING_FS).unwrap();

  let err = link_program(&ctx, &vs, &fs).unwrap_err();

  match err {
    ProgramError::LinkFailed(ref log) => assert!(log.contains("v_color")),
    ref e => panic!("unexpected error: {:?}", e),
  }

  assert_eq!(ctx.live_programs(), 0);
  assert!(matches!(ctx.calls().last(), Some(Call::DeleteProgram(_))));

  let logs = error_logs();
  assert_eq!(logs.len(), 1);
  assert!(logs[0].contains("v_color"));
}

#[test]
fn program_creation_refused() {
  init_logs();
  let ctx = FakeContext {
    refuse_programs: true,
    ..FakeContext::new()
  };

  let vs = compile_stage(&ctx, StageType::VertexShader, PASS_THROUGH_VS).unwrap();
  let fs = compile_stage(&ctx, StageType::FragmentShader, CONSTANT_COLOR_FS).unwrap();
  ctx.clear_calls();

  let err = link_program(&ctx, &vs, &fs).unwrap_err();

  assert_eq!(err, ProgramError::CreationFailed);
  assert_eq!(ctx.calls(), vec![Call::CreateProgram]);
}

#[test]
fn pass_through_and_constant_color() {
  init_logs();
  let ctx = FakeContext::new();

  let vs = compile_stage(&ctx, StageType::VertexShader, PASS_THROUGH_VS).unwrap();
  let fs = compile_stage(&ctx, StageType::FragmentShader, CONSTANT_COLOR_FS).unwrap();
  let program = link_program(&ctx, &vs, &fs).unwrap();

  assert!(ctx.programs.borrow()[&program].linked);
  assert!(!ctx.queried_logs());
  assert!(error_logs().is_empty());
}

#[test]
fn build_program_releases_stages() {
  init_logs();
  let ctx = FakeContext::new();

  let program = build_program(&ctx, COLORED_VS, VARYING_FS).expect("program");

  assert_eq!(ctx.live_stages(), 0);
  assert_eq!(ctx.live_programs(), 1);
  assert!(ctx.programs.borrow().contains_key(&program));
}

#[test]
fn build_program_releases_vertex_stage_on_fragment_failure() {
  init_logs();
  let ctx = FakeContext::new();

  let err = build_program(&ctx, PASS_THROUGH_VS, BROKEN_FS).unwrap_err();

  assert!(matches!(
    err,
    ProgramError::Stage(StageError::CompilationFailed(StageType::FragmentShader, _))
  ));
  assert_eq!(ctx.live_stages(), 0);
  assert!(!ctx.calls().contains(&Call::CreateProgram));
}

#[test]
fn build_program_stops_at_vertex_failure() {
  init_logs();
  let ctx = FakeContext::new();

  let err = build_program(&ctx, BROKEN_VS, CONSTANT_COLOR_FS).unwrap_err();

  match err {
    ProgramError::Stage(StageError::CompilationFailed(StageType::VertexShader, ref log)) => {
      assert!(log.contains("syntax error"))
    }
    ref e => panic!("unexpected error: {:?}", e),
  }

  let calls = ctx.calls();
  assert!(!calls.contains(&Call::CreateStage(StageType::FragmentShader)));
  assert!(!calls.contains(&Call::CreateProgram));
  assert_eq!(calls.last(), Some(&Call::DeleteStage(1)));
  assert_eq!(ctx.live_stages(), 0);
  assert_eq!(ctx.live_programs(), 0);
  assert_eq!(error_logs().len(), 1);
}

#[test]
fn build_program_releases_everything_on_link_failure() {
  init_logs();
  let ctx = FakeContext::new();

  let err = build_program(&ctx, PASS_THROUGH_VS, VARYING_FS).unwrap_err();

  assert!(matches!(err, ProgramError::LinkFailed(_)));
  assert_eq!(ctx.live_stages(), 0);
  assert_eq!(ctx.live_programs(), 0);
}

#[test]
fn link_failure_without_log_still_has_diagnostic() {
  init_logs();
  let ctx = FakeContext {
    silent_logs: true,
    ..FakeContext::new()
  };

  let err = build_program(&ctx, PASS_THROUGH_VS, VARYING_FS).unwrap_err();

  assert_eq!(err, ProgramError::link_failed("unknown link error"));
  assert_eq!(error_logs().len(), 1);
}
