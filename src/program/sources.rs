/*!
Lookup of shader source text by a stable key.

```
use geoglium::program::{BuiltinSources, SourceProvider};

assert!(BuiltinSources.source("surface_texture_program.vert").is_some());
assert!(BuiltinSources.source("unknown.frag").is_none());
```
*/
use std::borrow::Cow;
use std::collections::HashMap;
use std::hash::BuildHasher;

/// Key of the vertex shader of `SurfaceTextureProgram`.
pub const SURFACE_TEXTURE_VERTEX_SHADER: &str = "surface_texture_program.vert";

/// Key of the fragment shader of `SurfaceTextureProgram`.
pub const SURFACE_TEXTURE_FRAGMENT_SHADER: &str = "surface_texture_program.frag";

/// Supplies the source text of shaders.
///
/// A missing key makes the program that needs it fail to build.
pub trait SourceProvider {
    /// Returns the source registered under `key`.
    fn source(&self, key: &str) -> Option<Cow<'_, str>>;
}

impl<'a, T: ?Sized> SourceProvider for &'a T where T: SourceProvider {
    #[inline]
    fn source(&self, key: &str) -> Option<Cow<'_, str>> {
        (**self).source(key)
    }
}

impl<S> SourceProvider for HashMap<String, String, S> where S: BuildHasher {
    #[inline]
    fn source(&self, key: &str) -> Option<Cow<'_, str>> {
        self.get(key).map(|source| Cow::Borrowed(source.as_str()))
    }
}

impl<S> SourceProvider for HashMap<&'static str, &'static str, S> where S: BuildHasher {
    #[inline]
    fn source(&self, key: &str) -> Option<Cow<'_, str>> {
        self.get(key).map(|source| Cow::Borrowed(*source))
    }
}

/// The shaders shipped with the crate.
#[derive(Copy, Clone, Debug, Default)]
pub struct BuiltinSources;

impl SourceProvider for BuiltinSources {
    fn source(&self, key: &str) -> Option<Cow<'_, str>> {
        let source = match key {
            SURFACE_TEXTURE_VERTEX_SHADER => include_str!("../shaders/surface_texture_program.vert"),
            SURFACE_TEXTURE_FRAGMENT_SHADER => include_str!("../shaders/surface_texture_program.frag"),
            _ => return None,
        };

        Some(Cow::Borrowed(source))
    }
}
