use geoglium::backend::{Backend, UniformLocation};
use geoglium::program::{CompiledProgram, ProgramState, ShaderType, SourceCode, UniformSet};
use geoglium::{GlObject, ProgramCreationError, ShaderProgram};

use support::{Call, RecordingBackend};

mod support;

/// Uniform set of the minimal shaders of the support module.
#[derive(Default)]
struct FlatColorUniforms {
    binds: usize,
    unbinds: usize,
    color_id: UniformLocation,
}

impl UniformSet for FlatColorUniforms {
    fn bind<B: ?Sized>(&mut self, gl: &mut B, program: &mut CompiledProgram) where B: Backend {
        self.binds += 1;
        self.color_id = program.uniform_location(gl, "color");
        gl.uniform_4f(self.color_id, 0.0, 0.0, 0.0, 1.0);
    }

    fn unbind(&mut self) {
        self.unbinds += 1;
        self.color_id = UniformLocation::INVALID;
    }
}

fn source(vertex_shader: &str, fragment_shader: &str) -> SourceCode {
    SourceCode {
        vertex_shader: vertex_shader.to_owned(),
        fragment_shader: fragment_shader.to_owned(),
    }
}

fn valid_program() -> CompiledProgram {
    CompiledProgram::new(source(support::VERTEX_SOURCE, support::FRAGMENT_SOURCE),
                         vec!["vertexPoint"])
}

#[test]
fn program_creation() {
    let mut gl = RecordingBackend::new();
    let mut program = valid_program();

    assert_eq!(program.state(), ProgramState::Unlinked);
    program.link(&mut gl).unwrap();
    assert_eq!(program.state(), ProgramState::Linked);

    assert_eq!(gl.calls, vec![
        Call::CreateShader(ShaderType::Vertex, 1),
        Call::CompileShader(1),
        Call::CreateShader(ShaderType::Fragment, 2),
        Call::CompileShader(2),
        Call::CreateProgram(3),
        Call::AttachShader(3, 1),
        Call::AttachShader(3, 2),
        Call::BindAttribLocation(3, 0, "vertexPoint".to_owned()),
        Call::LinkProgram(3),
        Call::DeleteShader(1),
        Call::DeleteShader(2),
    ]);

    assert_eq!(program.get_id(), 3);
    assert_eq!(program.attrib_bindings(), &["vertexPoint".to_owned()]);
}

#[test]
fn link_is_idempotent() {
    let mut gl = RecordingBackend::new();
    let mut program = valid_program();

    program.link(&mut gl).unwrap();
    gl.clear();
    program.link(&mut gl).unwrap();

    assert!(gl.calls.is_empty());
}

#[test]
fn program_compilation_error() {
    let mut gl = RecordingBackend::new();
    let mut program = CompiledProgram::new(source(support::INVALID_SOURCE,
                                                  support::FRAGMENT_SOURCE),
                                           Vec::<String>::new());

    match program.link(&mut gl) {
        Err(ProgramCreationError::CompilationError(log, ShaderType::Vertex)) => {
            assert_eq!(log, "0:1: syntax error");
        },
        other => panic!("unexpected result: {:?}", other),
    }

    assert_eq!(program.state(), ProgramState::Invalid);
    assert!(gl.calls.contains(&Call::DeleteShader(1)));
    assert!(!gl.calls.iter().any(|call| match call {
        Call::CreateProgram(_) => true,
        _ => false,
    }));
}

#[test]
fn program_linking_error() {
    let mut gl = RecordingBackend::new();
    gl.fail_link = true;
    let mut program = valid_program();

    let err = program.link(&mut gl).unwrap_err();
    assert_eq!(err.code(), "errorLinkingProgram");
    assert_eq!(program.state(), ProgramState::Invalid);

    // every object created along the way is destroyed
    assert!(gl.calls.contains(&Call::DeleteShader(1)));
    assert!(gl.calls.contains(&Call::DeleteShader(2)));
    assert!(gl.calls.contains(&Call::DeleteProgram(3)));

    // the failure is permanent
    gl.fail_link = false;
    gl.clear();
    assert_eq!(program.link(&mut gl), Err(err));
    assert!(gl.calls.is_empty());
}

#[test]
fn program_object_creation_error() {
    let mut gl = RecordingBackend::new();
    gl.fail_create_program = true;
    let mut program = valid_program();

    let err = program.link(&mut gl).unwrap_err();
    assert_eq!(err, ProgramCreationError::ProgramCreationFailed);
    assert_eq!(err.code(), "errorCreatingProgram");
    assert_eq!(program.state(), ProgramState::Invalid);

    // both shaders are destroyed, nothing is attached or linked
    assert!(gl.calls.contains(&Call::DeleteShader(1)));
    assert!(gl.calls.contains(&Call::DeleteShader(2)));
    assert!(!gl.calls.iter().any(|call| match call {
        Call::AttachShader(..) | Call::LinkProgram(_) | Call::DeleteProgram(_) => true,
        _ => false,
    }));
}

#[test]
fn lazy_program_links_on_first_activation() {
    let mut gl = RecordingBackend::new();
    let mut program = ShaderProgram::lazy(valid_program(), FlatColorUniforms::default());
    assert!(gl.calls.is_empty());

    assert!(program.activate(&mut gl));
    assert_eq!(program.raw().state(), ProgramState::Initialized);
    assert_eq!(program.uniforms().binds, 1);
    assert!(gl.calls.contains(&Call::LinkProgram(3)));
    assert!(gl.calls.contains(&Call::UseProgram(3)));
}

#[test]
fn lazy_program_failure_is_not_fatal() {
    let mut gl = RecordingBackend::new();
    gl.fail_link = true;
    let mut program = ShaderProgram::lazy(valid_program(), FlatColorUniforms::default());

    assert!(!program.activate(&mut gl));
    assert!(!program.is_valid());
    assert_eq!(program.uniforms().binds, 0);

    gl.clear();
    assert!(!program.activate(&mut gl));
    assert!(gl.calls.is_empty());
}

#[test]
fn bind_once_per_link() {
    let mut gl = RecordingBackend::new();
    let mut program = ShaderProgram::from_raw(&mut gl, valid_program(),
                                              FlatColorUniforms::default()).unwrap();
    assert_eq!(program.raw().state(), ProgramState::Linked);

    for _ in 0..3 {
        assert!(program.activate(&mut gl));
    }
    assert_eq!(program.uniforms().binds, 1);

    program.release(&mut gl);
    assert_eq!(program.uniforms().unbinds, 1);
    assert!(!program.uniforms().color_id.is_valid());

    assert!(program.activate(&mut gl));
    assert!(program.activate(&mut gl));
    assert_eq!(program.uniforms().binds, 2);
}

#[test]
fn release_unlinked_program_does_nothing() {
    let mut gl = RecordingBackend::new();
    let mut program = ShaderProgram::lazy(valid_program(), FlatColorUniforms::default());

    program.release(&mut gl);

    assert!(gl.calls.is_empty());
    assert_eq!(program.uniforms().unbinds, 0);
}

#[test]
fn uniform_locations_cached() {
    let mut gl = RecordingBackend::new();
    let mut program = valid_program();
    program.link(&mut gl).unwrap();
    gl.clear();

    let first = program.uniform_location(&mut gl, "color");
    let second = program.uniform_location(&mut gl, "color");

    assert!(first.is_valid());
    assert_eq!(first, second);
    assert_eq!(gl.calls, vec![Call::GetUniformLocation(3, "color".to_owned())]);
}

#[test]
fn uniform_location_of_unlinked_program() {
    let mut gl = RecordingBackend::new();
    let mut program = valid_program();

    assert_eq!(program.uniform_location(&mut gl, "color"), UniformLocation::INVALID);
    assert!(gl.calls.is_empty());
}

#[test]
fn inactive_uniform_location() {
    let mut gl = RecordingBackend::new();
    gl.inactive_uniforms.push("unused".to_owned());
    let mut program = valid_program();
    program.link(&mut gl).unwrap();

    assert!(!program.uniform_location(&mut gl, "unused").is_valid());
}

#[test]
fn invalid_program_is_inert() {
    let mut gl = RecordingBackend::new();
    let error = ProgramCreationError::SourceUnavailable("flat.vert".to_owned());
    let mut program = ShaderProgram::inert(error.clone(), FlatColorUniforms::default());

    assert!(!program.is_valid());
    assert_eq!(program.raw().error(), Some(&error));
    assert!(!program.activate(&mut gl));
    assert_eq!(program.uniform_location(&mut gl, "color"), UniformLocation::INVALID);
    assert!(gl.calls.is_empty());
}

#[test]
fn error_messages() {
    let err = ProgramCreationError::CompilationError("0:1: syntax error".to_owned(),
                                                     ShaderType::Fragment);
    assert_eq!(err.to_string(), "Compilation error in fragment shader: 0:1: syntax error");
    assert_eq!(err.code(), "errorCompilingProgram");

    let err = ProgramCreationError::SourceUnavailable("flat.vert".to_owned());
    assert_eq!(err.to_string(), "Shader source `flat.vert` is not available");
    assert_eq!(err.code(), "errorReadingProgramSource");

    let err = ProgramCreationError::ShaderCreationFailed(ShaderType::Vertex);
    assert_eq!(err.code(), "errorCreatingShader");
    assert_eq!(err.to_string(), "The driver could not create a vertex shader object");

    let err = ProgramCreationError::ProgramCreationFailed;
    assert_eq!(err.to_string(), "The driver could not create a program object");
}

#[test]
#[should_panic]
fn short_matrix_upload_panics() {
    let mut gl = RecordingBackend::new();
    gl.uniform_matrix_3fv(UniformLocation(0), 2, &[0.0; 9]);
}
