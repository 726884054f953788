/// Interning tables for render states.
///
/// Structurally equal parameters map to the same `Arc`, so batches can be
/// grouped and redundant state changes skipped by pointer comparison.
/// The cache is owned by the render thread and mutated through `&mut self`.

use std::hash::Hash;
use std::sync::Arc;
use glam::Vec4;
use rustc_hash::FxHashMap;
use super::{
    AlphaState, ArrayState, BlendFactor, ColorMask, ColorMaskState, ColorState, CompareFunc,
    CullFace, CullState, DepthState, FogMode, FogState, LightState, MaterialParams,
    MaterialState, RenderState, RenderStateSet, ShaderState, StencilParams, StencilState,
    TextureState, TransformState,
};

/// Hashable bit pattern of a float (`-0.0` folds onto `0.0`)
pub(crate) fn float_key(value: f32) -> u32 {
    if value == 0.0 { 0 } else { value.to_bits() }
}

fn vec4_key(value: Vec4) -> [u32; 4] {
    [float_key(value.x), float_key(value.y), float_key(value.z), float_key(value.w)]
}

type AlphaKey = (CompareFunc, u32, BlendFactor, BlendFactor);
type FogKey = (u8, [u32; 2], [u32; 4]);
type MaterialKey = ([[u32; 4]; 4], u32, bool, bool);

fn intern<K: Hash + Eq, V>(
    table: &mut FxHashMap<K, Arc<V>>,
    key: K,
    make: impl FnOnce() -> V,
) -> Arc<V> {
    Arc::clone(table.entry(key).or_insert_with(|| Arc::new(make())))
}

/// Canonical render state instances plus the default state set
pub struct RenderStateCache {
    alpha: FxHashMap<AlphaKey, Arc<AlphaState>>,
    color: FxHashMap<[u32; 4], Arc<ColorState>>,
    color_mask: FxHashMap<ColorMask, Arc<ColorMaskState>>,
    cull: FxHashMap<Option<CullFace>, Arc<CullState>>,
    depth: FxHashMap<(CompareFunc, bool), Arc<DepthState>>,
    fog: FxHashMap<FogKey, Arc<FogState>>,
    material: FxHashMap<MaterialKey, Arc<MaterialState>>,
    stencil: FxHashMap<StencilParams, Arc<StencilState>>,
    defaults: RenderStateSet,
}

impl RenderStateCache {
    pub fn new() -> Self {
        let mut cache = Self {
            alpha: FxHashMap::default(),
            color: FxHashMap::default(),
            color_mask: FxHashMap::default(),
            cull: FxHashMap::default(),
            depth: FxHashMap::default(),
            fog: FxHashMap::default(),
            material: FxHashMap::default(),
            stencil: FxHashMap::default(),
            defaults: RenderStateSet::empty(),
        };
        cache.defaults = RenderStateSet::from_states([
            RenderState::Alpha(cache.opaque()),
            RenderState::Array(Arc::new(ArrayState::disabled())),
            RenderState::Color(cache.color(Vec4::ONE)),
            RenderState::ColorMask(cache.color_mask(ColorMask::all())),
            RenderState::Cull(cache.cull(None)),
            RenderState::Depth(cache.depth(CompareFunc::LessOrEqual, true)),
            RenderState::Fog(cache.fog(None, Vec4::ZERO)),
            RenderState::Light(Arc::new(LightState::disabled())),
            RenderState::Material(cache.material(MaterialParams::default())),
            RenderState::Shader(Arc::new(ShaderState::disabled())),
            RenderState::Stencil(cache.stencil(StencilParams::default())),
            RenderState::Texture(Arc::new(TextureState::disabled())),
            RenderState::Transform(Arc::new(TransformState::identity())),
        ]);
        cache
    }

    /// Full base state set (one canonical default per type)
    pub fn defaults(&self) -> &RenderStateSet {
        &self.defaults
    }

    // ===== FACTORIES =====

    pub fn alpha(
        &mut self,
        test_func: CompareFunc,
        test_ref: f32,
        src_blend: BlendFactor,
        dest_blend: BlendFactor,
    ) -> Arc<AlphaState> {
        let key = (test_func, float_key(test_ref), src_blend, dest_blend);
        intern(&mut self.alpha, key, || AlphaState::new(test_func, test_ref, src_blend, dest_blend))
    }

    /// No alpha test, no blending
    pub fn opaque(&mut self) -> Arc<AlphaState> {
        self.alpha(CompareFunc::Always, 0.0, BlendFactor::One, BlendFactor::Zero)
    }

    /// Standard `SrcAlpha, OneMinusSrcAlpha` blending
    pub fn blended(&mut self) -> Arc<AlphaState> {
        self.alpha(CompareFunc::Always, 0.0, BlendFactor::SrcAlpha, BlendFactor::OneMinusSrcAlpha)
    }

    /// Premultiplied-alpha blending
    pub fn premultiplied(&mut self) -> Arc<AlphaState> {
        self.alpha(CompareFunc::Always, 0.0, BlendFactor::One, BlendFactor::OneMinusSrcAlpha)
    }

    pub fn color(&mut self, color: Vec4) -> Arc<ColorState> {
        intern(&mut self.color, vec4_key(color), || ColorState::new(color))
    }

    pub fn color_mask(&mut self, mask: ColorMask) -> Arc<ColorMaskState> {
        intern(&mut self.color_mask, mask, || ColorMaskState::new(mask))
    }

    pub fn cull(&mut self, face: Option<CullFace>) -> Arc<CullState> {
        intern(&mut self.cull, face, || CullState::new(face))
    }

    pub fn depth(&mut self, test_func: CompareFunc, mask: bool) -> Arc<DepthState> {
        intern(&mut self.depth, (test_func, mask), || DepthState::new(test_func, mask))
    }

    pub fn fog(&mut self, mode: Option<FogMode>, color: Vec4) -> Arc<FogState> {
        let (tag, params) = match mode {
            None => (0u8, [0, 0]),
            Some(FogMode::Linear { start, end }) => (1, [float_key(start), float_key(end)]),
            Some(FogMode::Exponential { density }) => (2, [float_key(density), 0]),
            Some(FogMode::ExponentialSquared { density }) => (3, [float_key(density), 0]),
        };
        // Disabled fog ignores its color
        let color_key = if mode.is_some() { vec4_key(color) } else { [0; 4] };
        intern(&mut self.fog, (tag, params, color_key), || FogState::new(mode, color))
    }

    pub fn material(&mut self, params: MaterialParams) -> Arc<MaterialState> {
        let key = (
            [
                vec4_key(params.ambient),
                vec4_key(params.diffuse),
                vec4_key(params.specular),
                vec4_key(params.emission),
            ],
            float_key(params.shininess),
            params.color_material,
            params.two_sided,
        );
        intern(&mut self.material, key, || MaterialState::new(params))
    }

    pub fn stencil(&mut self, params: StencilParams) -> Arc<StencilState> {
        intern(&mut self.stencil, params, || StencilState::new(params))
    }

    /// Total number of canonical instances across all tables
    pub fn interned_count(&self) -> usize {
        self.alpha.len()
            + self.color.len()
            + self.color_mask.len()
            + self.cull.len()
            + self.depth.len()
            + self.fog.len()
            + self.material.len()
            + self.stencil.len()
    }
}

impl Default for RenderStateCache {
    fn default() -> Self {
        Self::new()
    }
}
