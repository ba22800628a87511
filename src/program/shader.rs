use crate::backend::{Backend, ShaderId};
use crate::GlObject;

use crate::program::{ProgramCreationError, ShaderType};

/// A single, compiled but unlinked, shader.
///
/// Shader objects are only needed until the program is linked. They must be destroyed with
/// `delete` since dropping them doesn't have access to the context.
pub struct Shader {
    id: ShaderId,
}

impl GlObject for Shader {
    type Id = ShaderId;

    #[inline]
    fn get_id(&self) -> ShaderId {
        self.id
    }
}

impl Shader {
    /// Destroys the shader object.
    #[inline]
    pub fn delete<B: ?Sized>(self, gl: &mut B) where B: Backend {
        gl.delete_shader(self.id);
    }
}

/// Builds an individual shader.
pub fn build_shader<B: ?Sized>(gl: &mut B, ty: ShaderType, source_code: &str)
                               -> Result<Shader, ProgramCreationError> where B: Backend
{
    let id = gl.create_shader(ty);

    if id == 0 {
        return Err(ProgramCreationError::ShaderCreationFailed(ty));
    }

    match gl.compile_shader(id, source_code) {
        Ok(()) => Ok(Shader { id }),
        Err(log) => {
            gl.delete_shader(id);
            Err(ProgramCreationError::CompilationError(log, ty))
        },
    }
}
