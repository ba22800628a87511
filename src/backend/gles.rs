use crate::gl;
use crate::program::ShaderType;

use std::ffi::CString;
use std::os::raw;
use std::ptr;

use super::{Backend, ProgramId, ShaderId, UniformLocation};

/// Implementation of `Backend` over the OpenGL ES 2.0 entry points of the current context.
pub struct GlBackend {
    gl: gl::Gles2,
}

impl GlBackend {
    /// Loads the entry points through the context's `get_proc_address` function.
    ///
    /// # Safety
    ///
    /// The context the functions belong to must be current on this thread whenever the backend
    /// is used, and `loadfn` must return valid function pointers or null.
    pub unsafe fn load_with<F>(loadfn: F) -> GlBackend
        where F: FnMut(&'static str) -> *const raw::c_void
    {
        GlBackend {
            gl: gl::Gles2::load_with(loadfn),
        }
    }

    /// Gives access to the raw bindings, for the calls that are not part of `Backend`.
    #[inline]
    pub fn gl(&self) -> &gl::Gles2 {
        &self.gl
    }
}

impl Backend for GlBackend {
    fn create_shader(&mut self, ty: ShaderType) -> ShaderId {
        unsafe { self.gl.CreateShader(ty.to_opengl_type()) }
    }

    fn compile_shader(&mut self, shader: ShaderId, source: &str) -> Result<(), String> {
        let source = CString::new(source.as_bytes())
            .map_err(|_| "The shader source contains a nul byte".to_owned())?;

        unsafe {
            self.gl.ShaderSource(shader, 1, [source.as_ptr()].as_ptr(), ptr::null());
            self.gl.CompileShader(shader);

            // checking compilation success by reading a flag on the shader
            let mut compilation_success: gl::types::GLint = 0;
            self.gl.GetShaderiv(shader, gl::COMPILE_STATUS, &mut compilation_success);

            if compilation_success == gl::TRUE as gl::types::GLint {
                return Ok(());
            }

            let mut error_log_size: gl::types::GLint = 0;
            self.gl.GetShaderiv(shader, gl::INFO_LOG_LENGTH, &mut error_log_size);

            let mut error_log: Vec<u8> = vec![0; error_log_size.max(0) as usize];
            self.gl.GetShaderInfoLog(shader, error_log_size, &mut error_log_size,
                                     error_log.as_mut_ptr() as *mut gl::types::GLchar);
            error_log.truncate(error_log_size.max(0) as usize);

            Err(String::from_utf8(error_log)
                .unwrap_or_else(|_| "Could not convert the log message to UTF-8".to_owned()))
        }
    }

    fn delete_shader(&mut self, shader: ShaderId) {
        unsafe { self.gl.DeleteShader(shader) }
    }

    fn create_program(&mut self) -> ProgramId {
        unsafe { self.gl.CreateProgram() }
    }

    fn attach_shader(&mut self, program: ProgramId, shader: ShaderId) {
        unsafe { self.gl.AttachShader(program, shader) }
    }

    fn bind_attrib_location(&mut self, program: ProgramId, index: u32, name: &str) {
        // a name containing a nul byte can't match any attribute anyway
        if let Ok(name) = CString::new(name.as_bytes()) {
            unsafe { self.gl.BindAttribLocation(program, index, name.as_ptr()) }
        }
    }

    fn link_program(&mut self, program: ProgramId) -> Result<(), String> {
        unsafe {
            self.gl.LinkProgram(program);

            let mut link_success: gl::types::GLint = 0;
            self.gl.GetProgramiv(program, gl::LINK_STATUS, &mut link_success);

            if link_success == gl::TRUE as gl::types::GLint {
                return Ok(());
            }

            match self.gl.GetError() {
                gl::NO_ERROR => (),
                gl::INVALID_VALUE => {
                    return Err("glLinkProgram triggered GL_INVALID_VALUE".to_owned());
                },
                gl::INVALID_OPERATION => {
                    return Err("glLinkProgram triggered GL_INVALID_OPERATION".to_owned());
                },
                _ => {
                    return Err("glLinkProgram triggered an unknown error".to_owned());
                }
            };

            let mut error_log_size: gl::types::GLint = 0;
            self.gl.GetProgramiv(program, gl::INFO_LOG_LENGTH, &mut error_log_size);

            let mut error_log: Vec<u8> = vec![0; error_log_size.max(0) as usize];
            self.gl.GetProgramInfoLog(program, error_log_size, &mut error_log_size,
                                      error_log.as_mut_ptr() as *mut gl::types::GLchar);
            error_log.truncate(error_log_size.max(0) as usize);

            Err(String::from_utf8(error_log)
                .unwrap_or_else(|_| "Could not convert the log message to UTF-8".to_owned()))
        }
    }

    fn delete_program(&mut self, program: ProgramId) {
        unsafe { self.gl.DeleteProgram(program) }
    }

    fn use_program(&mut self, program: ProgramId) {
        unsafe { self.gl.UseProgram(program) }
    }

    fn get_uniform_location(&mut self, program: ProgramId, name: &str) -> UniformLocation {
        match CString::new(name.as_bytes()) {
            Ok(name) => UniformLocation(unsafe { self.gl.GetUniformLocation(program, name.as_ptr()) }),
            Err(_) => UniformLocation::INVALID,
        }
    }

    fn uniform_1i(&mut self, location: UniformLocation, value: i32) {
        unsafe { self.gl.Uniform1i(location.0, value) }
    }

    fn uniform_4f(&mut self, location: UniformLocation, x: f32, y: f32, z: f32, w: f32) {
        unsafe { self.gl.Uniform4f(location.0, x, y, z, w) }
    }

    fn uniform_matrix_3fv(&mut self, location: UniformLocation, count: usize, value: &[f32]) {
        assert!(value.len() >= count * 9);
        unsafe {
            self.gl.UniformMatrix3fv(location.0, count as gl::types::GLsizei, gl::FALSE,
                                     value.as_ptr())
        }
    }

    fn uniform_matrix_4fv(&mut self, location: UniformLocation, count: usize, value: &[f32]) {
        assert!(value.len() >= count * 16);
        unsafe {
            self.gl.UniformMatrix4fv(location.0, count as gl::types::GLsizei, gl::FALSE,
                                     value.as_ptr())
        }
    }
}
