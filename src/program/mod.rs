use std::fmt;
use std::error::Error;
use std::sync::Mutex;

use crate::backend::{Backend, UniformLocation};
use crate::gl;

pub use self::raw::{CompiledProgram, ProgramState};
pub use self::sources::{BuiltinSources, SourceProvider};

mod raw;
mod shader;
pub mod sources;

// Some shader compilers have race-condition issues, so we lock this mutex
// in the GL thread every time we compile a shader or link a program.
lazy_static! {
    static ref COMPILER_GLOBAL_LOCK: Mutex<()> = Mutex::new(());
}

/// Type of a shader stage.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum ShaderType {
    /// Runs once per vertex.
    Vertex,
    /// Runs once per fragment.
    Fragment,
}

impl ShaderType {
    /// Returns the corresponding `GLenum`.
    #[inline]
    pub fn to_opengl_type(self) -> gl::types::GLenum {
        match self {
            ShaderType::Vertex => gl::VERTEX_SHADER,
            ShaderType::Fragment => gl::FRAGMENT_SHADER,
        }
    }
}

impl fmt::Display for ShaderType {
    fn fmt(&self, formatter: &mut fmt::Formatter) -> Result<(), fmt::Error> {
        match self {
            ShaderType::Vertex => formatter.write_str("vertex shader"),
            ShaderType::Fragment => formatter.write_str("fragment shader"),
        }
    }
}

/// Error that can be triggered when creating a program.
///
/// Whatever the variant, the outcome for the renderer is the same: the program is inert and
/// draws nothing.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ProgramCreationError {
    /// The source of one of the shaders could not be found. Contains the key that was looked up.
    SourceUnavailable(String),

    /// Error while compiling one of the shaders.
    CompilationError(String, ShaderType),

    /// Error while linking the program.
    LinkingError(String),

    /// The driver refused to create a shader object of this type.
    ShaderCreationFailed(ShaderType),

    /// The driver refused to create a program object.
    ProgramCreationFailed,
}

impl ProgramCreationError {
    /// Returns a stable identifier for the kind of failure, used in log messages.
    pub fn code(&self) -> &'static str {
        match self {
            ProgramCreationError::SourceUnavailable(_) => "errorReadingProgramSource",
            ProgramCreationError::CompilationError(..) => "errorCompilingProgram",
            ProgramCreationError::LinkingError(_) => "errorLinkingProgram",
            ProgramCreationError::ShaderCreationFailed(_) => "errorCreatingShader",
            ProgramCreationError::ProgramCreationFailed => "errorCreatingProgram",
        }
    }
}

impl fmt::Display for ProgramCreationError {
    fn fmt(&self, formatter: &mut fmt::Formatter) -> Result<(), fmt::Error> {
        match self {
            ProgramCreationError::SourceUnavailable(key) =>
                write!(formatter, "Shader source `{}` is not available", key),
            ProgramCreationError::CompilationError(log, ty) =>
                write!(formatter, "Compilation error in {}: {}", ty, log),
            ProgramCreationError::LinkingError(log) =>
                write!(formatter, "Error while linking shaders together: {}", log),
            ProgramCreationError::ShaderCreationFailed(ty) =>
                write!(formatter, "The driver could not create a {} object", ty),
            ProgramCreationError::ProgramCreationFailed =>
                write!(formatter, "The driver could not create a program object"),
        }
    }
}

impl Error for ProgramCreationError {}

/// Represents the source code of a program.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SourceCode {
    /// Source code of the vertex shader.
    pub vertex_shader: String,

    /// Source code of the fragment shader.
    pub fragment_shader: String,
}

impl SourceCode {
    /// Looks up the two shaders of a program in a source provider.
    pub fn from_provider<S: ?Sized>(sources: &S, vertex_key: &str, fragment_key: &str)
                                    -> Result<SourceCode, ProgramCreationError>
        where S: SourceProvider
    {
        let vertex_shader = sources.source(vertex_key)
            .ok_or_else(|| ProgramCreationError::SourceUnavailable(vertex_key.to_owned()))?;
        let fragment_shader = sources.source(fragment_key)
            .ok_or_else(|| ProgramCreationError::SourceUnavailable(fragment_key.to_owned()))?;

        Ok(SourceCode {
            vertex_shader: vertex_shader.into_owned(),
            fragment_shader: fragment_shader.into_owned(),
        })
    }
}

/// The uniform variables of one family of shaders.
///
/// Implementations hold the uniform locations and the CPU-side copies of uploaded values.
pub trait UniformSet {
    /// Called exactly once after each successful link, the first time the program is activated.
    ///
    /// Must resolve the uniform locations and upload default values for every uniform, so that
    /// a freshly linked program always starts from the same state.
    fn bind<B: ?Sized>(&mut self, gl: &mut B, program: &mut CompiledProgram) where B: Backend;

    /// Called when the GPU program goes away. Must forget every location and cached value.
    fn unbind(&mut self);
}

/// A compiled program and the uniforms of its shader family.
pub struct ShaderProgram<U> {
    raw: CompiledProgram,
    uniforms: U,
}

impl<U> ShaderProgram<U> where U: UniformSet {
    /// Builds a program and links it immediately.
    pub fn from_raw<B: ?Sized>(gl: &mut B, mut raw: CompiledProgram, uniforms: U)
                               -> Result<ShaderProgram<U>, ProgramCreationError>
        where B: Backend
    {
        raw.link(gl)?;

        Ok(ShaderProgram {
            raw,
            uniforms,
        })
    }

    /// Builds a program that will compile and link the first time it is activated.
    #[inline]
    pub fn lazy(raw: CompiledProgram, uniforms: U) -> ShaderProgram<U> {
        ShaderProgram {
            raw,
            uniforms,
        }
    }

    /// Builds a program that never draws anything.
    #[inline]
    pub fn inert(error: ProgramCreationError, uniforms: U) -> ShaderProgram<U> {
        ShaderProgram {
            raw: CompiledProgram::invalid(error),
            uniforms,
        }
    }

    /// Makes the program current, linking and initializing it if needed.
    ///
    /// Returns `false` if the program is invalid, in which case nothing should be drawn with it.
    #[inline]
    pub fn activate<B: ?Sized>(&mut self, gl: &mut B) -> bool where B: Backend {
        self.raw.activate(gl, &mut self.uniforms)
    }

    /// Destroys the GPU program. The next activation links and initializes it again.
    pub fn release<B: ?Sized>(&mut self, gl: &mut B) where B: Backend {
        if self.raw.release(gl) {
            self.uniforms.unbind();
        }
    }

    /// Returns the location of an arbitrary uniform of the linked program.
    #[inline]
    pub fn uniform_location<B: ?Sized>(&mut self, gl: &mut B, name: &str) -> UniformLocation
        where B: Backend
    {
        self.raw.uniform_location(gl, name)
    }

    /// Returns false if the program failed to build.
    #[inline]
    pub fn is_valid(&self) -> bool {
        self.raw.state() != ProgramState::Invalid
    }

    /// Returns the compiled program.
    #[inline]
    pub fn raw(&self) -> &CompiledProgram {
        &self.raw
    }

    /// Returns the uniforms of the program.
    #[inline]
    pub fn uniforms(&self) -> &U {
        &self.uniforms
    }

    /// Returns the uniforms of the program.
    #[inline]
    pub fn uniforms_mut(&mut self) -> &mut U {
        &mut self.uniforms
    }
}

impl<U> fmt::Debug for ShaderProgram<U> {
    fn fmt(&self, formatter: &mut fmt::Formatter) -> Result<(), fmt::Error> {
        formatter.debug_struct("ShaderProgram")
            .field("id", &self.raw.id())
            .field("state", &self.raw.state())
            .finish()
    }
}
