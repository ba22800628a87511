use std::collections::HashMap;
use std::hash::BuildHasherDefault;

use fnv::FnvHasher;
use smallvec::SmallVec;

use crate::backend::{Backend, ProgramId, UniformLocation};
use crate::GlObject;

use crate::program::{COMPILER_GLOBAL_LOCK, ProgramCreationError, ShaderType, SourceCode};
use crate::program::UniformSet;
use crate::program::shader::build_shader;

/// Where a program is in its lifetime.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum ProgramState {
    /// Sources are known but nothing exists on the GPU yet.
    Unlinked,
    /// Compiled and linked, uniforms not initialized yet.
    Linked,
    /// Linked and initialized. Activations only make the program current.
    Initialized,
    /// Compilation or linking failed. Terminal.
    Invalid,
}

/// A program object, from its sources to its linked GPU handle.
pub struct CompiledProgram {
    source: Option<SourceCode>,
    attrib_bindings: SmallVec<[String; 4]>,
    id: ProgramId,
    state: ProgramState,
    error: Option<ProgramCreationError>,
    locations: HashMap<String, UniformLocation, BuildHasherDefault<FnvHasher>>,
}

impl GlObject for CompiledProgram {
    type Id = ProgramId;

    #[inline]
    fn get_id(&self) -> ProgramId {
        self.id
    }
}

impl CompiledProgram {
    /// Builds an unlinked program.
    ///
    /// The vertex attributes are bound to slots in the order of `attrib_bindings`, starting at 0.
    pub fn new<I, S>(source: SourceCode, attrib_bindings: I) -> CompiledProgram
        where I: IntoIterator<Item = S>, S: Into<String>
    {
        CompiledProgram {
            source: Some(source),
            attrib_bindings: attrib_bindings.into_iter().map(Into::into).collect(),
            id: 0,
            state: ProgramState::Unlinked,
            error: None,
            locations: HashMap::with_hasher(Default::default()),
        }
    }

    /// Builds a program that failed to build. It never touches the GPU.
    pub fn invalid(error: ProgramCreationError) -> CompiledProgram {
        CompiledProgram {
            source: None,
            attrib_bindings: SmallVec::new(),
            id: 0,
            state: ProgramState::Invalid,
            error: Some(error),
            locations: HashMap::with_hasher(Default::default()),
        }
    }

    /// Returns the GPU name of the program, or `0` if it isn't linked.
    #[inline]
    pub fn id(&self) -> ProgramId {
        self.id
    }

    /// Returns where the program is in its lifetime.
    #[inline]
    pub fn state(&self) -> ProgramState {
        self.state
    }

    /// Returns the error that made this program invalid.
    #[inline]
    pub fn error(&self) -> Option<&ProgramCreationError> {
        self.error.as_ref()
    }

    /// Returns the vertex attribute names, in slot order.
    #[inline]
    pub fn attrib_bindings(&self) -> &[String] {
        &self.attrib_bindings
    }

    /// Compiles and links the program if it isn't linked yet.
    ///
    /// On failure the program becomes `Invalid` for the rest of its lifetime and the same
    /// error is returned by every later call.
    pub fn link<B: ?Sized>(&mut self, gl: &mut B) -> Result<(), ProgramCreationError>
        where B: Backend
    {
        match self.state {
            ProgramState::Linked | ProgramState::Initialized => return Ok(()),
            ProgramState::Invalid => {
                return Err(self.error.clone()
                    .unwrap_or_else(|| ProgramCreationError::LinkingError(String::new())));
            },
            ProgramState::Unlinked => (),
        }

        let result = match self.source {
            Some(ref source) => build_program(gl, source, &self.attrib_bindings),
            None => Err(ProgramCreationError::LinkingError("The program has no source".to_owned())),
        };

        match result {
            Ok(id) => {
                debug!("linked program {}", id);
                self.id = id;
                self.state = ProgramState::Linked;
                self.locations.clear();
                Ok(())
            },
            Err(err) => {
                self.state = ProgramState::Invalid;
                self.error = Some(err.clone());
                Err(err)
            },
        }
    }

    /// Makes the program current.
    ///
    /// An unlinked program is linked first; a failure is logged and the program becomes
    /// invalid. The first activation after a link calls `UniformSet::bind`.
    ///
    /// Returns `false` if the program can't be used.
    pub fn activate<B: ?Sized, U>(&mut self, gl: &mut B, uniforms: &mut U) -> bool
        where B: Backend, U: UniformSet
    {
        if self.state == ProgramState::Unlinked {
            if let Err(err) = self.link(gl) {
                error!("CompiledProgram: activate: {}: {}", err.code(), err);
                return false;
            }
        }

        match self.state {
            ProgramState::Initialized => {
                gl.use_program(self.id);
                true
            },
            ProgramState::Linked => {
                gl.use_program(self.id);
                uniforms.bind(gl, self);
                self.state = ProgramState::Initialized;
                debug!("initialized program {}", self.id);
                true
            },
            ProgramState::Invalid | ProgramState::Unlinked => false,
        }
    }

    /// Returns the location of a uniform. Lookups are cached until the program is released.
    ///
    /// Returns `UniformLocation::INVALID` if the program isn't linked or if the uniform is
    /// not active.
    pub fn uniform_location<B: ?Sized>(&mut self, gl: &mut B, name: &str) -> UniformLocation
        where B: Backend
    {
        match self.state {
            ProgramState::Linked | ProgramState::Initialized => (),
            ProgramState::Unlinked | ProgramState::Invalid => return UniformLocation::INVALID,
        }

        if let Some(location) = self.locations.get(name) {
            return *location;
        }

        let location = gl.get_uniform_location(self.id, name);
        if !location.is_valid() {
            debug!("uniform `{}` is not active in program {}", name, self.id);
        }

        self.locations.insert(name.to_owned(), location);
        location
    }

    /// Destroys the GPU program and goes back to `Unlinked`.
    ///
    /// Returns `true` if there was something to destroy.
    pub fn release<B: ?Sized>(&mut self, gl: &mut B) -> bool where B: Backend {
        match self.state {
            ProgramState::Linked | ProgramState::Initialized => {
                gl.delete_program(self.id);
                debug!("released program {}", self.id);
                self.id = 0;
                self.state = ProgramState::Unlinked;
                self.locations.clear();
                true
            },
            ProgramState::Unlinked | ProgramState::Invalid => false,
        }
    }
}

/// Compiles both shaders, binds the attributes and links them together.
///
/// Every object created along the way is destroyed on failure.
fn build_program<B: ?Sized>(gl: &mut B, source: &SourceCode, attrib_bindings: &[String])
                            -> Result<ProgramId, ProgramCreationError> where B: Backend
{
    let _lock = COMPILER_GLOBAL_LOCK.lock();

    let vertex_shader = build_shader(gl, ShaderType::Vertex, &source.vertex_shader)?;
    let fragment_shader = match build_shader(gl, ShaderType::Fragment, &source.fragment_shader) {
        Ok(shader) => shader,
        Err(err) => {
            vertex_shader.delete(gl);
            return Err(err);
        },
    };

    let id = gl.create_program();

    if id == 0 {
        vertex_shader.delete(gl);
        fragment_shader.delete(gl);
        return Err(ProgramCreationError::ProgramCreationFailed);
    }

    gl.attach_shader(id, vertex_shader.get_id());
    gl.attach_shader(id, fragment_shader.get_id());

    for (index, name) in attrib_bindings.iter().enumerate() {
        gl.bind_attrib_location(id, index as u32, name);
    }

    let result = gl.link_program(id);

    // the program keeps what it needs from the shaders once linked
    vertex_shader.delete(gl);
    fragment_shader.delete(gl);

    match result {
        Ok(()) => Ok(id),
        Err(log) => {
            gl.delete_program(id);
            Err(ProgramCreationError::LinkingError(log))
        },
    }
}
