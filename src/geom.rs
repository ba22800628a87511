/*!
Value types passed to the programs: transform matrices and colors.

Matrices are stored row-major, the way they are written on paper. OpenGL expects column-major
data, which is why the `transpose_to_array` functions exist: the programs call them to
serialize a snapshot of the caller's matrix at upload time.

```
use geoglium::geom::Matrix4;

let mut mvp = Matrix4::identity();
mvp.set_translation(1.0, 2.0, 3.0);

let mut array = [0.0f32; 16];
mvp.transpose_to_array(&mut array);
assert_eq!(&array[12..15], &[1.0, 2.0, 3.0]);
```
*/

/// A 4x4 transform matrix, stored row-major.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Matrix4 {
    /// The sixteen components, row by row.
    pub m: [f64; 16],
}

impl Default for Matrix4 {
    #[inline]
    fn default() -> Matrix4 {
        Matrix4::identity()
    }
}

impl Matrix4 {
    /// Builds the identity matrix.
    #[inline]
    pub const fn identity() -> Matrix4 {
        Matrix4 {
            m: [
                1.0, 0.0, 0.0, 0.0,
                0.0, 1.0, 0.0, 0.0,
                0.0, 0.0, 1.0, 0.0,
                0.0, 0.0, 0.0, 1.0,
            ],
        }
    }

    /// Builds a matrix from its sixteen components given row by row.
    #[inline]
    pub const fn from_rows(m: [f64; 16]) -> Matrix4 {
        Matrix4 { m }
    }

    /// Resets this matrix to the identity.
    #[inline]
    pub fn set_to_identity(&mut self) -> &mut Matrix4 {
        *self = Matrix4::identity();
        self
    }

    /// Copies the components of another matrix into this one.
    #[inline]
    pub fn set(&mut self, other: &Matrix4) -> &mut Matrix4 {
        self.m = other.m;
        self
    }

    /// Sets the translation components, leaving the rest untouched.
    pub fn set_translation(&mut self, x: f64, y: f64, z: f64) -> &mut Matrix4 {
        self.m[3] = x;
        self.m[7] = y;
        self.m[11] = z;
        self
    }

    /// Sets this matrix to `self * other`.
    pub fn multiply_by_matrix(&mut self, other: &Matrix4) -> &mut Matrix4 {
        let a = self.m;
        let b = &other.m;

        for row in 0..4 {
            for col in 0..4 {
                self.m[row * 4 + col] = (0..4).map(|k| a[row * 4 + k] * b[k * 4 + col]).sum();
            }
        }

        self
    }

    /// Writes the transpose of this matrix into `result`, which is the column-major layout
    /// expected by `glUniformMatrix4fv`.
    ///
    /// # Panic
    ///
    /// Panics if `result` holds less than 16 elements.
    pub fn transpose_to_array(&self, result: &mut [f32]) {
        let result = &mut result[..16];

        for row in 0..4 {
            for col in 0..4 {
                result[col * 4 + row] = self.m[row * 4 + col] as f32;
            }
        }
    }
}

/// A 3x3 transform matrix, stored row-major.
///
/// Used for texture coordinate transforms, which map the texture coordinates of a piece of
/// geometry into the region of an image covered by a tile.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Matrix3 {
    /// The nine components, row by row.
    pub m: [f64; 9],
}

impl Default for Matrix3 {
    #[inline]
    fn default() -> Matrix3 {
        Matrix3::identity()
    }
}

impl Matrix3 {
    /// Builds the identity matrix.
    #[inline]
    pub const fn identity() -> Matrix3 {
        Matrix3 {
            m: [
                1.0, 0.0, 0.0,
                0.0, 1.0, 0.0,
                0.0, 0.0, 1.0,
            ],
        }
    }

    /// Builds a matrix from its nine components given row by row.
    #[inline]
    pub const fn from_rows(m: [f64; 9]) -> Matrix3 {
        Matrix3 { m }
    }

    /// Resets this matrix to the identity.
    #[inline]
    pub fn set_to_identity(&mut self) -> &mut Matrix3 {
        *self = Matrix3::identity();
        self
    }

    /// Copies the components of another matrix into this one.
    #[inline]
    pub fn set(&mut self, other: &Matrix3) -> &mut Matrix3 {
        self.m = other.m;
        self
    }

    /// Sets the translation components, leaving the rest untouched.
    pub fn set_translation(&mut self, x: f64, y: f64) -> &mut Matrix3 {
        self.m[2] = x;
        self.m[5] = y;
        self
    }

    /// Sets the scale components, leaving the rest untouched.
    pub fn set_scale(&mut self, x: f64, y: f64) -> &mut Matrix3 {
        self.m[0] = x;
        self.m[4] = y;
        self
    }

    /// Multiplies this matrix by the matrix that flips the Y texture coordinate, which maps
    /// images stored top-down onto geometry whose coordinates grow upwards.
    pub fn multiply_by_tex_coord_flip(&mut self) -> &mut Matrix3 {
        self.m[2] += self.m[1];
        self.m[5] += self.m[4];
        self.m[8] += self.m[7];
        self.m[1] = -self.m[1];
        self.m[4] = -self.m[4];
        self.m[7] = -self.m[7];
        self
    }

    /// Writes the transpose of this matrix into `result`, which is the column-major layout
    /// expected by `glUniformMatrix3fv`.
    ///
    /// # Panic
    ///
    /// Panics if `result` holds less than 9 elements.
    pub fn transpose_to_array(&self, result: &mut [f32]) {
        let result = &mut result[..9];

        for row in 0..3 {
            for col in 0..3 {
                result[col * 3 + row] = self.m[row * 3 + col] as f32;
            }
        }
    }
}

/// An RGBA color with components in the `[0, 1]` range.
///
/// The components are not premultiplied. Programs premultiply the RGB components by alpha when
/// uploading a color, see `premultiplied`.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Color {
    /// Red component.
    pub red: f32,
    /// Green component.
    pub green: f32,
    /// Blue component.
    pub blue: f32,
    /// Opacity, `1.0` being opaque.
    pub alpha: f32,
}

impl Default for Color {
    #[inline]
    fn default() -> Color {
        Color::WHITE
    }
}

impl Color {
    /// Opaque white.
    pub const WHITE: Color = Color::new(1.0, 1.0, 1.0, 1.0);

    /// Opaque black.
    pub const BLACK: Color = Color::new(0.0, 0.0, 0.0, 1.0);

    /// Fully transparent black.
    pub const TRANSPARENT: Color = Color::new(0.0, 0.0, 0.0, 0.0);

    /// Builds a color from its components.
    #[inline]
    pub const fn new(red: f32, green: f32, blue: f32, alpha: f32) -> Color {
        Color { red, green, blue, alpha }
    }

    /// Copies the components of another color into this one.
    #[inline]
    pub fn set(&mut self, other: &Color) -> &mut Color {
        *self = *other;
        self
    }

    /// Returns the components with red, green and blue multiplied by alpha.
    #[inline]
    pub fn premultiplied(&self) -> [f32; 4] {
        let a = self.alpha;
        [self.red * a, self.green * a, self.blue * a, a]
    }
}

impl From<[f32; 4]> for Color {
    #[inline]
    fn from([red, green, blue, alpha]: [f32; 4]) -> Color {
        Color::new(red, green, blue, alpha)
    }
}

#[cfg(feature = "cgmath")]
impl From<cgmath::Matrix4<f64>> for Matrix4 {
    fn from(m: cgmath::Matrix4<f64>) -> Matrix4 {
        // cgmath stores columns
        Matrix4::from_rows([
            m.x.x, m.y.x, m.z.x, m.w.x,
            m.x.y, m.y.y, m.z.y, m.w.y,
            m.x.z, m.y.z, m.z.z, m.w.z,
            m.x.w, m.y.w, m.z.w, m.w.w,
        ])
    }
}

#[cfg(feature = "cgmath")]
impl From<cgmath::Matrix3<f64>> for Matrix3 {
    fn from(m: cgmath::Matrix3<f64>) -> Matrix3 {
        Matrix3::from_rows([
            m.x.x, m.y.x, m.z.x,
            m.x.y, m.y.y, m.z.y,
            m.x.z, m.y.z, m.z.z,
        ])
    }
}
