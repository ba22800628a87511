/*!
The program that drapes textured imagery over surface geometry.

A renderer activates the program once per frame, then sets the uniforms of every visible tile
before drawing it:

```no_run
# use geoglium::backend::GlBackend;
# use geoglium::geom::{Color, Matrix3, Matrix4};
# use geoglium::program::BuiltinSources;
# use geoglium::SurfaceTextureProgram;
# fn tiles() -> Vec<(Matrix4, [Matrix3; 2])> { vec![] }
# let mut gl: GlBackend = unimplemented!();
let mut program = SurfaceTextureProgram::new_or_inert(&mut gl, &BuiltinSources);

if program.activate(&mut gl) {
    program.enable_texture(&mut gl, true);
    program.load_color(&mut gl, &Color::WHITE);

    for (mvp, tex_coord) in tiles() {
        program.load_modelview_projection(&mut gl, &mvp);
        program.load_tex_coord_matrix(&mut gl, &tex_coord);
        // draw the tile
    }
}
```

Only the color uniform is cached. The matrices change with every tile, so comparing them would
never save an upload.
*/
use crate::backend::{Backend, UniformLocation};
use crate::context::ProgramFactory;
use crate::geom::{Color, Matrix3, Matrix4};
use crate::program::{CompiledProgram, ProgramCreationError, ShaderProgram, SourceCode};
use crate::program::{SourceProvider, UniformSet};
use crate::program::sources::{SURFACE_TEXTURE_FRAGMENT_SHADER, SURFACE_TEXTURE_VERTEX_SHADER};

/// Vertex attributes of the surface texture shaders, in slot order.
pub const ATTRIB_BINDINGS: [&str; 2] = ["vertexPoint", "vertexTexCoord"];

/// Program for draping textured imagery over surface geometry.
pub type SurfaceTextureProgram = ShaderProgram<SurfaceTextureUniforms>;

/// Uniforms of the surface texture shaders.
#[derive(Debug)]
pub struct SurfaceTextureUniforms {
    enable_pick_mode_id: UniformLocation,
    enable_texture_id: UniformLocation,
    mvp_matrix_id: UniformLocation,
    tex_coord_matrix_id: UniformLocation,
    color_id: UniformLocation,
    tex_sampler_id: UniformLocation,

    mvp_matrix_array: [f32; 16],
    tex_coord_matrix_array: [f32; 9 * 2],

    // last color uploaded, before premultiplication
    color: Color,
}

impl Default for SurfaceTextureUniforms {
    fn default() -> SurfaceTextureUniforms {
        SurfaceTextureUniforms {
            enable_pick_mode_id: UniformLocation::INVALID,
            enable_texture_id: UniformLocation::INVALID,
            mvp_matrix_id: UniformLocation::INVALID,
            tex_coord_matrix_id: UniformLocation::INVALID,
            color_id: UniformLocation::INVALID,
            tex_sampler_id: UniformLocation::INVALID,
            mvp_matrix_array: [0.0; 16],
            tex_coord_matrix_array: [0.0; 9 * 2],
            color: Color::WHITE,
        }
    }
}

impl UniformSet for SurfaceTextureUniforms {
    fn bind<B: ?Sized>(&mut self, gl: &mut B, program: &mut CompiledProgram) where B: Backend {
        self.enable_pick_mode_id = program.uniform_location(gl, "enablePickMode");
        if self.enable_pick_mode_id.is_valid() {
            gl.uniform_1i(self.enable_pick_mode_id, 0);
        }

        self.enable_texture_id = program.uniform_location(gl, "enableTexture");
        if self.enable_texture_id.is_valid() {
            gl.uniform_1i(self.enable_texture_id, 0);
        }

        self.mvp_matrix_id = program.uniform_location(gl, "mvpMatrix");
        Matrix4::identity().transpose_to_array(&mut self.mvp_matrix_array);
        if self.mvp_matrix_id.is_valid() {
            gl.uniform_matrix_4fv(self.mvp_matrix_id, 1, &self.mvp_matrix_array);
        }

        self.tex_coord_matrix_id = program.uniform_location(gl, "texCoordMatrix");
        Matrix3::identity().transpose_to_array(&mut self.tex_coord_matrix_array[..9]);
        Matrix3::identity().transpose_to_array(&mut self.tex_coord_matrix_array[9..]);
        if self.tex_coord_matrix_id.is_valid() {
            gl.uniform_matrix_3fv(self.tex_coord_matrix_id, 2, &self.tex_coord_matrix_array);
        }

        self.color_id = program.uniform_location(gl, "color");
        self.color = Color::WHITE;
        if self.color_id.is_valid() {
            let [r, g, b, a] = self.color.premultiplied();
            gl.uniform_4f(self.color_id, r, g, b, a);
        }

        // GL_TEXTURE0
        self.tex_sampler_id = program.uniform_location(gl, "texSampler");
        if self.tex_sampler_id.is_valid() {
            gl.uniform_1i(self.tex_sampler_id, 0);
        }
    }

    fn unbind(&mut self) {
        *self = SurfaceTextureUniforms::default();
    }
}

impl SurfaceTextureUniforms {
    /// Switches the fragment shader between the pick color and the visual color.
    ///
    /// Always uploads. Pick mode changes at most twice per frame.
    pub fn enable_pick_mode<B: ?Sized>(&mut self, gl: &mut B, enable: bool) where B: Backend {
        if self.enable_pick_mode_id.is_valid() {
            gl.uniform_1i(self.enable_pick_mode_id, enable as i32);
        }
    }

    /// Enables texture sampling. When disabled, fragments get the flat color alone.
    ///
    /// Always uploads.
    pub fn enable_texture<B: ?Sized>(&mut self, gl: &mut B, enable: bool) where B: Backend {
        if self.enable_texture_id.is_valid() {
            gl.uniform_1i(self.enable_texture_id, enable as i32);
        }
    }

    /// Uploads the transpose of `matrix` as the model-view-projection matrix.
    pub fn load_modelview_projection<B: ?Sized>(&mut self, gl: &mut B, matrix: &Matrix4)
        where B: Backend
    {
        if !self.mvp_matrix_id.is_valid() {
            return;
        }

        matrix.transpose_to_array(&mut self.mvp_matrix_array);
        gl.uniform_matrix_4fv(self.mvp_matrix_id, 1, &self.mvp_matrix_array);
    }

    /// Uploads the transposes of both texture coordinate matrices in a single call.
    pub fn load_tex_coord_matrix<B: ?Sized>(&mut self, gl: &mut B, matrices: &[Matrix3; 2])
        where B: Backend
    {
        if !self.tex_coord_matrix_id.is_valid() {
            return;
        }

        matrices[0].transpose_to_array(&mut self.tex_coord_matrix_array[..9]);
        matrices[1].transpose_to_array(&mut self.tex_coord_matrix_array[9..]);
        gl.uniform_matrix_3fv(self.tex_coord_matrix_id, 2, &self.tex_coord_matrix_array);
    }

    /// Uploads `color` with its RGB components premultiplied by alpha, unless it is equal to
    /// the last color uploaded.
    pub fn load_color<B: ?Sized>(&mut self, gl: &mut B, color: &Color) where B: Backend {
        if self.color == *color {
            trace!("skipping upload of unchanged color {:?}", color);
            return;
        }

        if !self.color_id.is_valid() {
            return;
        }

        self.color.set(color);
        let [r, g, b, a] = color.premultiplied();
        gl.uniform_4f(self.color_id, r, g, b, a);
    }

    /// Returns the last color uploaded, before premultiplication.
    #[inline]
    pub fn color(&self) -> &Color {
        &self.color
    }
}

impl ShaderProgram<SurfaceTextureUniforms> {
    /// Looks up the surface texture shaders in `sources`, then compiles and links them.
    pub fn new<B: ?Sized, S: ?Sized>(gl: &mut B, sources: &S)
                                     -> Result<SurfaceTextureProgram, ProgramCreationError>
        where B: Backend, S: SourceProvider
    {
        let source = SourceCode::from_provider(sources, SURFACE_TEXTURE_VERTEX_SHADER,
                                               SURFACE_TEXTURE_FRAGMENT_SHADER)?;
        let raw = CompiledProgram::new(source, ATTRIB_BINDINGS);

        ShaderProgram::from_raw(gl, raw, SurfaceTextureUniforms::default())
    }

    /// Same as `new`, but a failure is logged and gives a program that never draws anything.
    pub fn new_or_inert<B: ?Sized, S: ?Sized>(gl: &mut B, sources: &S) -> SurfaceTextureProgram
        where B: Backend, S: SourceProvider
    {
        match SurfaceTextureProgram::new(gl, sources) {
            Ok(program) => program,
            Err(err) => {
                error!("SurfaceTextureProgram: constructor: {}: {}", err.code(), err);
                ShaderProgram::inert(err, SurfaceTextureUniforms::default())
            },
        }
    }

    /// See `SurfaceTextureUniforms::enable_pick_mode`.
    #[inline]
    pub fn enable_pick_mode<B: ?Sized>(&mut self, gl: &mut B, enable: bool) where B: Backend {
        self.uniforms_mut().enable_pick_mode(gl, enable)
    }

    /// See `SurfaceTextureUniforms::enable_texture`.
    #[inline]
    pub fn enable_texture<B: ?Sized>(&mut self, gl: &mut B, enable: bool) where B: Backend {
        self.uniforms_mut().enable_texture(gl, enable)
    }

    /// See `SurfaceTextureUniforms::load_modelview_projection`.
    #[inline]
    pub fn load_modelview_projection<B: ?Sized>(&mut self, gl: &mut B, matrix: &Matrix4)
        where B: Backend
    {
        self.uniforms_mut().load_modelview_projection(gl, matrix)
    }

    /// See `SurfaceTextureUniforms::load_tex_coord_matrix`.
    #[inline]
    pub fn load_tex_coord_matrix<B: ?Sized>(&mut self, gl: &mut B, matrices: &[Matrix3; 2])
        where B: Backend
    {
        self.uniforms_mut().load_tex_coord_matrix(gl, matrices)
    }

    /// See `SurfaceTextureUniforms::load_color`.
    #[inline]
    pub fn load_color<B: ?Sized>(&mut self, gl: &mut B, color: &Color) where B: Backend {
        self.uniforms_mut().load_color(gl, color)
    }
}

impl ProgramFactory for SurfaceTextureUniforms {
    #[inline]
    fn create<B: ?Sized>(gl: &mut B, sources: &dyn SourceProvider) -> SurfaceTextureProgram
        where B: Backend
    {
        SurfaceTextureProgram::new_or_inert(gl, sources)
    }
}
