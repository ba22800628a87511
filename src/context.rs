/*!
The draw context: the active backend plus the programs built for it.

Programs are created the first time a shader family is requested and kept for the lifetime of
the context. When the context is lost, `release_programs` destroys every GPU program; each one
links again on its next activation.
*/
use std::any::{Any, TypeId};
use std::collections::HashMap;
use std::fmt;
use std::hash::BuildHasherDefault;

use fnv::FnvHasher;

use crate::backend::Backend;
use crate::program::{ShaderProgram, SourceProvider, UniformSet};

/// A shader family that knows how to build its own program.
pub trait ProgramFactory: UniformSet + Sized + 'static {
    /// Builds the program. Failures must give an inert program rather than an error, so that a
    /// broken shader only stops its own family from drawing.
    fn create<B: ?Sized>(gl: &mut B, sources: &dyn SourceProvider) -> ShaderProgram<Self>
        where B: Backend;
}

/// Type-erased cached program.
trait CachedProgram<B> {
    fn release(&mut self, gl: &mut B);
    fn as_any_mut(&mut self) -> &mut dyn Any;
}

impl<B, U> CachedProgram<B> for ShaderProgram<U> where B: Backend, U: UniformSet + 'static {
    #[inline]
    fn release(&mut self, gl: &mut B) {
        ShaderProgram::release(self, gl)
    }

    #[inline]
    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}

/// The backend of the current context and the programs built for it.
pub struct DrawContext<B, S> {
    gl: B,
    sources: S,
    programs: HashMap<TypeId, Box<dyn CachedProgram<B>>, BuildHasherDefault<FnvHasher>>,
}

impl<B, S> DrawContext<B, S> where B: Backend, S: SourceProvider {
    /// Builds a context with no program.
    pub fn new(gl: B, sources: S) -> DrawContext<B, S> {
        DrawContext {
            gl,
            sources,
            programs: HashMap::with_hasher(Default::default()),
        }
    }

    /// Returns the backend.
    #[inline]
    pub fn gl(&mut self) -> &mut B {
        &mut self.gl
    }

    /// Returns the program of the shader family `U`, building it if needed, and activates it.
    ///
    /// Returns `None` if the program is invalid, in which case nothing should be drawn with it.
    pub fn activate_program<U>(&mut self) -> Option<(&mut B, &mut ShaderProgram<U>)>
        where U: ProgramFactory
    {
        let gl = &mut self.gl;
        let sources = &self.sources;

        let program = self.programs.entry(TypeId::of::<U>()).or_insert_with(|| {
            let program: Box<dyn CachedProgram<B>> = Box::new(U::create(&mut *gl, sources));
            program
        });

        let program = program.as_any_mut().downcast_mut::<ShaderProgram<U>>()?;

        if program.activate(&mut *gl) {
            Some((gl, program))
        } else {
            None
        }
    }

    /// Returns true if the program of the shader family `U` has already been requested.
    #[inline]
    pub fn has_program<U>(&self) -> bool where U: ProgramFactory {
        self.programs.contains_key(&TypeId::of::<U>())
    }

    /// Destroys the GPU objects of every program. Call after a context loss.
    pub fn release_programs(&mut self) {
        debug!("releasing {} programs", self.programs.len());

        for program in self.programs.values_mut() {
            program.release(&mut self.gl);
        }
    }

    /// Releases the programs and gives back the backend.
    pub fn into_inner(mut self) -> B {
        self.release_programs();
        self.gl
    }
}

impl<B, S> fmt::Debug for DrawContext<B, S> {
    fn fmt(&self, formatter: &mut fmt::Formatter) -> Result<(), fmt::Error> {
        formatter.debug_struct("DrawContext")
            .field("programs", &self.programs.len())
            .finish()
    }
}
