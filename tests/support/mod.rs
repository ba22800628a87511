/*!
Test supports module.

*/

#![allow(dead_code)]

use geoglium::backend::{Backend, ProgramId, ShaderId, UniformLocation};
use geoglium::program::ShaderType;

use std::collections::HashMap;

/// Source that the recording backend refuses to compile.
pub const INVALID_SOURCE: &str = "invalid glsl code";

/// Minimal pass-through vertex shader.
pub const VERTEX_SOURCE: &str = "
    #version 100

    uniform mat4 mvpMatrix;
    attribute vec4 vertexPoint;

    void main() {
        gl_Position = mvpMatrix * vertexPoint;
    }
";

/// Minimal fragment shader.
pub const FRAGMENT_SOURCE: &str = "
    #version 100

    precision mediump float;
    uniform vec4 color;

    void main() {
        gl_FragColor = color;
    }
";

/// A call received by the `RecordingBackend`.
#[derive(Clone, Debug, PartialEq)]
pub enum Call {
    CreateShader(ShaderType, ShaderId),
    CompileShader(ShaderId),
    DeleteShader(ShaderId),
    CreateProgram(ProgramId),
    AttachShader(ProgramId, ShaderId),
    BindAttribLocation(ProgramId, u32, String),
    LinkProgram(ProgramId),
    DeleteProgram(ProgramId),
    UseProgram(ProgramId),
    GetUniformLocation(ProgramId, String),
    Uniform1i(UniformLocation, i32),
    Uniform4f(UniformLocation, [f32; 4]),
    UniformMatrix3fv(UniformLocation, usize, Vec<f32>),
    UniformMatrix4fv(UniformLocation, usize, Vec<f32>),
}

/// Backend that records every call instead of talking to a driver.
///
/// Objects get increasing names starting at 1. Uniform locations are handed out in the order
/// of the first lookup, starting at 0, except for names listed in `inactive_uniforms`.
#[derive(Default)]
pub struct RecordingBackend {
    pub calls: Vec<Call>,
    pub fail_link: bool,
    pub fail_create_program: bool,
    pub inactive_uniforms: Vec<String>,
    next_name: u32,
    locations: HashMap<(ProgramId, String), UniformLocation>,
}

impl RecordingBackend {
    pub fn new() -> RecordingBackend {
        RecordingBackend::default()
    }

    /// Forgets the calls recorded so far.
    pub fn clear(&mut self) {
        self.calls.clear();
    }

    /// Returns the location given to `name` in `program`, if it has been looked up.
    pub fn location_in(&self, program: ProgramId, name: &str) -> Option<UniformLocation> {
        self.locations.get(&(program, name.to_owned())).cloned()
    }

    /// Returns the uniform uploads, ignoring every other call.
    pub fn uploads(&self) -> Vec<&Call> {
        self.calls.iter().filter(|call| match call {
            Call::Uniform1i(..) | Call::Uniform4f(..) |
            Call::UniformMatrix3fv(..) | Call::UniformMatrix4fv(..) => true,
            _ => false,
        }).collect()
    }

    /// Returns the uploads that targeted `location`.
    pub fn uploads_to(&self, location: UniformLocation) -> Vec<&Call> {
        self.calls.iter().filter(|call| match call {
            Call::Uniform1i(l, _) | Call::Uniform4f(l, _) |
            Call::UniformMatrix3fv(l, _, _) | Call::UniformMatrix4fv(l, _, _) => *l == location,
            _ => false,
        }).collect()
    }

    fn next_name(&mut self) -> u32 {
        self.next_name += 1;
        self.next_name
    }
}

impl Backend for RecordingBackend {
    fn create_shader(&mut self, ty: ShaderType) -> ShaderId {
        let id = self.next_name();
        self.calls.push(Call::CreateShader(ty, id));
        id
    }

    fn compile_shader(&mut self, shader: ShaderId, source: &str) -> Result<(), String> {
        self.calls.push(Call::CompileShader(shader));

        if source.contains(INVALID_SOURCE) {
            Err("0:1: syntax error".to_owned())
        } else {
            Ok(())
        }
    }

    fn delete_shader(&mut self, shader: ShaderId) {
        self.calls.push(Call::DeleteShader(shader));
    }

    fn create_program(&mut self) -> ProgramId {
        if self.fail_create_program {
            self.calls.push(Call::CreateProgram(0));
            return 0;
        }

        let id = self.next_name();
        self.calls.push(Call::CreateProgram(id));
        id
    }

    fn attach_shader(&mut self, program: ProgramId, shader: ShaderId) {
        self.calls.push(Call::AttachShader(program, shader));
    }

    fn bind_attrib_location(&mut self, program: ProgramId, index: u32, name: &str) {
        self.calls.push(Call::BindAttribLocation(program, index, name.to_owned()));
    }

    fn link_program(&mut self, program: ProgramId) -> Result<(), String> {
        self.calls.push(Call::LinkProgram(program));

        if self.fail_link {
            Err("error: vertex output not consumed".to_owned())
        } else {
            Ok(())
        }
    }

    fn delete_program(&mut self, program: ProgramId) {
        self.calls.push(Call::DeleteProgram(program));
    }

    fn use_program(&mut self, program: ProgramId) {
        self.calls.push(Call::UseProgram(program));
    }

    fn get_uniform_location(&mut self, program: ProgramId, name: &str) -> UniformLocation {
        self.calls.push(Call::GetUniformLocation(program, name.to_owned()));

        if self.inactive_uniforms.iter().any(|n| n == name) {
            return UniformLocation::INVALID;
        }

        let next = UniformLocation(self.locations.len() as i32);
        *self.locations.entry((program, name.to_owned())).or_insert(next)
    }

    fn uniform_1i(&mut self, location: UniformLocation, value: i32) {
        self.calls.push(Call::Uniform1i(location, value));
    }

    fn uniform_4f(&mut self, location: UniformLocation, x: f32, y: f32, z: f32, w: f32) {
        self.calls.push(Call::Uniform4f(location, [x, y, z, w]));
    }

    fn uniform_matrix_3fv(&mut self, location: UniformLocation, count: usize, value: &[f32]) {
        self.calls.push(Call::UniformMatrix3fv(location, count, value[..count * 9].to_vec()));
    }

    fn uniform_matrix_4fv(&mut self, location: UniformLocation, count: usize, value: &[f32]) {
        self.calls.push(Call::UniformMatrix4fv(location, count, value[..count * 16].to_vec()));
    }
}
