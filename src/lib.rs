/*!
Shader programs for draping surface imagery over a globe.

A renderer draws thousands of surface tiles per frame, and every tile needs a handful of
uniform variables before its draw call. This library wraps OpenGL ES programs so that:

 - compiling and linking happens once, and a broken shader only makes its program inert
   instead of bringing the renderer down;
 - uniform locations are resolved and given default values exactly once after each link;
 - values that rarely change between tiles, such as the flat color, are only uploaded when they
   actually change.

# Backend

Nothing here talks to a global OpenGL context. Every operation takes the `Backend` of the
context that is current on the calling thread. `GlBackend` implements it over the real
entry points:

```no_run
# fn get_proc_address(_: &str) -> *const std::os::raw::c_void { std::ptr::null() }
use geoglium::backend::GlBackend;

let mut gl = unsafe { GlBackend::load_with(|symbol| get_proc_address(symbol)) };
```

# Programs

A program is made of a `CompiledProgram`, which owns the sources and the GPU object, and of a
`UniformSet`, which owns the uniform locations of one family of shaders.
`SurfaceTextureProgram` is the program used to drape textures over terrain:

```no_run
# use geoglium::backend::GlBackend;
# let mut gl: GlBackend = unimplemented!();
use geoglium::geom::{Color, Matrix4};
use geoglium::program::BuiltinSources;
use geoglium::SurfaceTextureProgram;

let mut program = match SurfaceTextureProgram::new(&mut gl, &BuiltinSources) {
    Ok(program) => program,
    Err(err) => panic!("{}", err),
};

if program.activate(&mut gl) {
    program.load_modelview_projection(&mut gl, &Matrix4::identity());
    program.load_color(&mut gl, &Color::new(1.0, 0.0, 0.0, 0.5));
    // draw
}
```

Programs built with `new_or_inert` log their failure through the `log` facade and silently
ignore every later call instead.

# Draw context

`DrawContext` keeps one program per shader family and releases all of them when the context
is lost.
*/
#![warn(missing_docs)]

#[macro_use]
extern crate lazy_static;
#[macro_use]
extern crate log;

pub use crate::context::{DrawContext, ProgramFactory};
pub use crate::program::{ProgramCreationError, ShaderProgram};
pub use crate::surface::{SurfaceTextureProgram, SurfaceTextureUniforms};

pub mod backend;
pub mod context;
pub mod geom;
pub mod program;
pub mod surface;

/// The raw OpenGL ES 2.0 bindings, generated at build time.
#[allow(missing_docs, non_camel_case_types, non_snake_case, non_upper_case_globals)]
#[allow(clippy::all)]
pub mod gl {
    include!(concat!(env!("OUT_DIR"), "/gl_bindings.rs"));
}

/// Trait for objects that are OpenGL objects.
pub trait GlObject {
    /// The type of identifier for this object.
    type Id;

    /// Returns the id of the object.
    fn get_id(&self) -> Self::Id;
}
