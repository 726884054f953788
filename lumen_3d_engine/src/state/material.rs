use glam::Vec4;

/// Reflectance parameters used to request a `MaterialState`
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MaterialParams {
    pub ambient: Vec4,
    pub diffuse: Vec4,
    pub specular: Vec4,
    pub emission: Vec4,
    pub shininess: f32,
    /// Vertex colors drive ambient and diffuse
    pub color_material: bool,
    /// Light back faces with flipped normals
    pub two_sided: bool,
}

impl Default for MaterialParams {
    fn default() -> Self {
        Self {
            ambient: Vec4::new(0.2, 0.2, 0.2, 1.0),
            diffuse: Vec4::new(0.8, 0.8, 0.8, 1.0),
            specular: Vec4::new(0.0, 0.0, 0.0, 1.0),
            emission: Vec4::new(0.0, 0.0, 0.0, 1.0),
            shininess: 0.0,
            color_material: false,
            two_sided: false,
        }
    }
}

/// Material reflectance.
///
/// Interned: obtain instances through `RenderStateCache::material`.
#[derive(Debug, Clone, PartialEq)]
pub struct MaterialState {
    params: MaterialParams,
}

impl MaterialState {
    pub(crate) fn new(params: MaterialParams) -> Self {
        Self { params }
    }

    pub fn params(&self) -> &MaterialParams {
        &self.params
    }

    pub fn color_material(&self) -> bool {
        self.params.color_material
    }
}
