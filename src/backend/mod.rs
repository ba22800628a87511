/*!
The binding layer between the programs and the graphics driver.

Programs never talk to OpenGL directly. Every operation receives the `Backend` of the context
that is current on the calling thread, which makes the ownership of the context visible at
the call site. `GlBackend` is the implementation over real OpenGL ES 2.0 entry points.
*/
pub use self::gles::GlBackend;

use crate::program::ShaderType;

mod gles;

/// Name of a shader object. `0` means that the object could not be created.
pub type ShaderId = u32;

/// Name of a program object. `0` means that the object could not be created.
pub type ProgramId = u32;

/// Location of a uniform variable inside a linked program.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct UniformLocation(pub i32);

impl UniformLocation {
    /// The location returned by the driver when a uniform doesn't exist or is inactive, and the
    /// value of every location before it has been resolved.
    pub const INVALID: UniformLocation = UniformLocation(-1);

    /// Returns true if this location refers to an active uniform.
    #[inline]
    pub fn is_valid(&self) -> bool {
        self.0 >= 0
    }
}

impl Default for UniformLocation {
    #[inline]
    fn default() -> UniformLocation {
        UniformLocation::INVALID
    }
}

/// Trait for types that give access to the shader-related functions of a graphics context.
///
/// All the functions must be called from the thread that owns the context, while the context
/// is current. None of them is reentrant.
pub trait Backend {
    /// Creates an empty shader object. Returns `0` on failure.
    fn create_shader(&mut self, ty: ShaderType) -> ShaderId;

    /// Uploads the source code of a shader and compiles it.
    ///
    /// Returns the info log of the compiler on failure.
    fn compile_shader(&mut self, shader: ShaderId, source: &str) -> Result<(), String>;

    /// Destroys a shader object.
    fn delete_shader(&mut self, shader: ShaderId);

    /// Creates an empty program object. Returns `0` on failure.
    fn create_program(&mut self) -> ProgramId;

    /// Attaches a compiled shader to a program.
    fn attach_shader(&mut self, program: ProgramId, shader: ShaderId);

    /// Binds a vertex attribute name to a slot index. Takes effect at the next link.
    fn bind_attrib_location(&mut self, program: ProgramId, index: u32, name: &str);

    /// Links a program.
    ///
    /// Returns the info log of the linker on failure.
    fn link_program(&mut self, program: ProgramId) -> Result<(), String>;

    /// Destroys a program object.
    fn delete_program(&mut self, program: ProgramId);

    /// Makes a program current. Uniform uploads always target the current program.
    fn use_program(&mut self, program: ProgramId);

    /// Returns the location of a uniform, or `UniformLocation::INVALID`.
    fn get_uniform_location(&mut self, program: ProgramId, name: &str) -> UniformLocation;

    /// `glUniform1i`.
    fn uniform_1i(&mut self, location: UniformLocation, value: i32);

    /// `glUniform4f`.
    fn uniform_4f(&mut self, location: UniformLocation, x: f32, y: f32, z: f32, w: f32);

    /// `glUniformMatrix3fv` without transposition. `value` holds `9 * count` floats in
    /// column-major order.
    ///
    /// # Panic
    ///
    /// Implementations panic if `value` holds less than `9 * count` elements.
    fn uniform_matrix_3fv(&mut self, location: UniformLocation, count: usize, value: &[f32]);

    /// `glUniformMatrix4fv` without transposition. `value` holds `16 * count` floats in
    /// column-major order.
    ///
    /// # Panic
    ///
    /// Implementations panic if `value` holds less than `16 * count` elements.
    fn uniform_matrix_4fv(&mut self, location: UniformLocation, count: usize, value: &[f32]);
}

impl<'a, T: ?Sized> Backend for &'a mut T where T: Backend {
    #[inline]
    fn create_shader(&mut self, ty: ShaderType) -> ShaderId {
        (**self).create_shader(ty)
    }

    #[inline]
    fn compile_shader(&mut self, shader: ShaderId, source: &str) -> Result<(), String> {
        (**self).compile_shader(shader, source)
    }

    #[inline]
    fn delete_shader(&mut self, shader: ShaderId) {
        (**self).delete_shader(shader)
    }

    #[inline]
    fn create_program(&mut self) -> ProgramId {
        (**self).create_program()
    }

    #[inline]
    fn attach_shader(&mut self, program: ProgramId, shader: ShaderId) {
        (**self).attach_shader(program, shader)
    }

    #[inline]
    fn bind_attrib_location(&mut self, program: ProgramId, index: u32, name: &str) {
        (**self).bind_attrib_location(program, index, name)
    }

    #[inline]
    fn link_program(&mut self, program: ProgramId) -> Result<(), String> {
        (**self).link_program(program)
    }

    #[inline]
    fn delete_program(&mut self, program: ProgramId) {
        (**self).delete_program(program)
    }

    #[inline]
    fn use_program(&mut self, program: ProgramId) {
        (**self).use_program(program)
    }

    #[inline]
    fn get_uniform_location(&mut self, program: ProgramId, name: &str) -> UniformLocation {
        (**self).get_uniform_location(program, name)
    }

    #[inline]
    fn uniform_1i(&mut self, location: UniformLocation, value: i32) {
        (**self).uniform_1i(location, value)
    }

    #[inline]
    fn uniform_4f(&mut self, location: UniformLocation, x: f32, y: f32, z: f32, w: f32) {
        (**self).uniform_4f(location, x, y, z, w)
    }

    #[inline]
    fn uniform_matrix_3fv(&mut self, location: UniformLocation, count: usize, value: &[f32]) {
        (**self).uniform_matrix_3fv(location, count, value)
    }

    #[inline]
    fn uniform_matrix_4fv(&mut self, location: UniformLocation, count: usize, value: &[f32]) {
        (**self).uniform_matrix_4fv(location, count, value)
    }
}
