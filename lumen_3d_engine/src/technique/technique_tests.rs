use std::sync::Arc;
use glam::{Mat4, Vec3, Vec4};
use crate::config::BufferCacheConfig;
use crate::geometry::{ClientArrayConfig, GeometryArrays, GeometryBufferCache, StoredGeometry};
use crate::renderer::mock_renderer::MockRenderer;
use crate::renderer::{DrawCommand, PrimitiveMode, RendererCaps, StateTracker};
use crate::scene::InfluenceSet;
use crate::state::{
    FogMode, Light, LightState, MaterialParams, RenderState, RenderStateCache, RenderStateSet,
    RenderStateType, ShaderProgram, ShaderState, TextureHandle, TextureState, TextureTarget,
    TextureUnit, TransformState,
};
use super::*;

// ============================================================================
// Fixtures
// ============================================================================

fn make_quad() -> StoredGeometry {
    let vertex = ClientArrayConfig::new(3, vec![
        0.0, 0.0, 0.0,
        1.0, 0.0, 0.0,
        1.0, 1.0, 0.0,
        0.0, 1.0, 0.0,
    ]).unwrap();
    let normal = ClientArrayConfig::new(3, [0.0, 0.0, 1.0].repeat(4)).unwrap();
    let color = ClientArrayConfig::new(4, [1.0, 0.0, 0.0, 1.0].repeat(4)).unwrap();
    let arrays = GeometryArrays::new(PrimitiveMode::Triangles, vertex)
        .with_normal(normal)
        .with_color(color);
    StoredGeometry::indexed(arrays, vec![0, 1, 2, 0, 2, 3]).unwrap()
}

fn unlit_pass() -> PassConfig {
    PassConfig::new(RenderStateSet::empty())
}

fn lit_pass() -> PassConfig {
    let lights = LightState::new(vec![Light::directional(Vec3::NEG_Z, Vec4::ONE)], Vec4::splat(0.1));
    PassConfig::new(RenderStateSet::from_states([RenderState::Light(Arc::new(lights))]))
}

fn shader_pass(attributes: &[&str]) -> PassConfig {
    let program = Arc::new(ShaderProgram {
        id: 1,
        name: "skin".to_string(),
        attributes: attributes.iter().map(|a| a.to_string()).collect(),
    });
    PassConfig::new(RenderStateSet::from_states([
        RenderState::Shader(Arc::new(ShaderState::new(program, Vec::new()))),
    ]))
}

fn textured_pass(coord_sets: &[u32]) -> PassConfig {
    let units = coord_sets.iter().enumerate().map(|(i, &set)| {
        let handle = Arc::new(TextureHandle {
            id: i as u32,
            name: format!("tex{}", i),
            target: TextureTarget::Texture2D,
        });
        Some(TextureUnit::new(handle, set))
    }).collect();
    PassConfig::new(RenderStateSet::from_states([
        RenderState::Texture(Arc::new(TextureState::new(units))),
    ]))
}

fn technique(name: &str, scheme: Option<&str>, passes: Vec<PassConfig>) -> TechniqueConfig {
    let config = TechniqueConfig::new(name, EnqueuerConfig::normal(RenderQueues::OPAQUE, 0, passes));
    match scheme {
        Some(scheme) => config.with_scheme(scheme),
        None => config,
    }
}

fn make_batch(states: &RenderStateCache, depth: f32) -> Batch {
    Batch::new(
        states.defaults().clone(),
        DrawCommand::Arrays { mode: PrimitiveMode::Triangles, first: 0, count: 3 },
        depth,
    )
}

fn depths(group: &QueueGroup) -> Vec<f32> {
    group.batches().iter().map(|batch| batch.depth).collect()
}

// ============================================================================
// Schemes
// ============================================================================

#[test]
fn test_scheme_registry_compatibility() {
    let mut registry = SchemeRegistry::new();
    registry.register(RenderScheme::new("glow").with_compatible("bright"));
    registry.register(RenderScheme::new("shadow").accepting_undefined());

    assert!(registry.is_compatible(Some("glow"), Some("glow")));
    assert!(registry.is_compatible(Some("glow"), Some("bright")));
    assert!(!registry.is_compatible(Some("glow"), None));
    assert!(registry.is_compatible(Some("shadow"), None));
    assert!(!registry.is_compatible(Some("shadow"), Some("glow")));
    assert!(registry.is_compatible(None, None));
    assert!(!registry.is_compatible(None, Some("glow")));
}

#[test]
fn test_unregistered_scheme_matches_exactly() {
    let registry = SchemeRegistry::new();
    assert!(registry.is_compatible(Some("custom"), Some("custom")));
    assert!(!registry.is_compatible(Some("custom"), None));
    assert!(!registry.is_compatible(Some("custom"), Some("other")));
}

// ============================================================================
// Passes
// ============================================================================

#[test]
fn test_unlit_pass_reads_colors() {
    let summary = unlit_pass().summary();
    assert!(summary.needs_color());
    assert!(!summary.needs_normal());
}

#[test]
fn test_lit_pass_reads_normals() {
    let summary = lit_pass().summary();
    assert!(summary.needs_normal());
    assert!(!summary.needs_color());
}

#[test]
fn test_color_material_pass_reads_both() {
    let mut cache = RenderStateCache::new();
    let material = cache.material(MaterialParams { color_material: true, ..Default::default() });
    let mut states = lit_pass().states().clone();
    states.set(RenderState::Material(material));
    let summary = PassConfig::new(states).summary();
    assert!(summary.needs_normal());
    assert!(summary.needs_color());
}

#[test]
fn test_disabled_lighting_is_unlit() {
    let pass = PassConfig::new(RenderStateSet::from_states([
        RenderState::Light(Arc::new(LightState::disabled())),
    ]));
    assert!(!pass.is_lit());
    assert!(pass.summary().needs_color());
}

#[test]
fn test_summary_collects_attributes_and_coord_sets() {
    let summary = shader_pass(&["boneWeights", "tangent"]).summary();
    assert!(summary.attributes.contains("boneWeights"));
    assert!(summary.attributes.contains("tangent"));

    let summary = textured_pass(&[0, 2]).summary();
    assert_eq!(summary.tex_coord_sets.iter().copied().collect::<Vec<_>>(), vec![0, 2]);
}

#[test]
fn test_pass_support() {
    let fixed = RendererCaps::fixed_function();
    assert!(unlit_pass().is_supported(&fixed));
    assert!(!shader_pass(&[]).is_supported(&fixed));
    assert!(shader_pass(&[]).is_supported(&RendererCaps::default()));
    assert!(textured_pass(&[0, 1]).is_supported(&fixed));
    assert!(!textured_pass(&[0, 1, 2]).is_supported(&fixed));
}

// ============================================================================
// Technique selection
// ============================================================================

#[test]
fn test_exact_scheme_wins() {
    let mut registry = SchemeRegistry::new();
    registry.register(RenderScheme::new("glow").with_compatible("bright"));
    let material = Material::new("m", vec![
        technique("bright", Some("bright"), vec![unlit_pass()]),
        technique("glow", Some("glow"), vec![unlit_pass()]),
    ]);
    let caps = RendererCaps::default();
    assert_eq!(material.technique(Some("glow"), &registry, &caps).unwrap().name, "glow");
}

#[test]
fn test_compatible_scheme_fallback() {
    let mut registry = SchemeRegistry::new();
    registry.register(RenderScheme::new("glow").with_compatible("bright"));
    let material = Material::new("m", vec![
        technique("plain", None, vec![unlit_pass()]),
        technique("bright", Some("bright"), vec![unlit_pass()]),
    ]);
    let caps = RendererCaps::default();
    assert_eq!(material.technique(Some("glow"), &registry, &caps).unwrap().name, "bright");
}

#[test]
fn test_no_scheme_selects_undefined() {
    let registry = SchemeRegistry::new();
    let material = Material::new("m", vec![
        technique("glow", Some("glow"), vec![unlit_pass()]),
        technique("plain", None, vec![unlit_pass()]),
    ]);
    let caps = RendererCaps::default();
    assert_eq!(material.technique(None, &registry, &caps).unwrap().name, "plain");
}

#[test]
fn test_missing_technique_is_none() {
    let registry = SchemeRegistry::new();
    let material = Material::new("m", vec![technique("glow", Some("glow"), vec![unlit_pass()])]);
    let caps = RendererCaps::default();
    assert!(material.technique(None, &registry, &caps).is_none());
    assert!(material.technique(Some("shadow"), &registry, &caps).is_none());
}

#[test]
fn test_unsupported_techniques_are_filtered() {
    let registry = SchemeRegistry::new();
    let material = Material::new("m", vec![
        technique("shader", None, vec![shader_pass(&[])]),
        technique("fixed", None, vec![unlit_pass()]),
    ]);

    let fixed = RendererCaps::fixed_function();
    assert_eq!(material.supported_techniques(&fixed).len(), 1);
    assert_eq!(material.technique(None, &registry, &fixed).unwrap().name, "fixed");

    // Recomputed for different capabilities
    let full = RendererCaps::default();
    assert_eq!(material.supported_techniques(&full).len(), 2);
    assert_eq!(material.technique(None, &registry, &full).unwrap().name, "shader");
}

#[test]
fn test_processed_list_is_cached() {
    let material = Material::new("m", vec![technique("fixed", None, vec![unlit_pass()])]);
    let caps = RendererCaps::default();
    let first = material.supported_techniques(&caps);
    let second = material.supported_techniques(&caps);
    assert!(Arc::ptr_eq(&first[0], &second[0]));
    assert!(Arc::ptr_eq(&first[0], &material.techniques()[0]));
}

// ============================================================================
// Enqueuers
// ============================================================================

#[test]
fn test_compile_normal_one_batch_per_pass() {
    let mut renderer = MockRenderer::new();
    let states = RenderStateCache::new();
    let mut buffers = GeometryBufferCache::new(&BufferCacheConfig::default());
    let quad = make_quad();

    let config = EnqueuerConfig::normal(RenderQueues::OPAQUE, 3, vec![unlit_pass(), lit_pass()]);
    let compiled = config.compile(&quad, &mut renderer, &states, &mut buffers, &InfluenceSet::empty()).unwrap();
    assert_eq!(compiled.batch_count(), 2);

    let CompiledEnqueuer::Normal { batches, priority, .. } = &compiled else {
        panic!("expected a normal enqueuer");
    };
    assert_eq!(*priority, 3);
    for (set, _) in batches {
        assert!(set.is_full());
        assert!(matches!(set.get(RenderStateType::Array), Some(RenderState::Array(a)) if !a.is_disabled()));
    }
    // Unlit pass reads colors, lit pass reads normals: two array states
    assert_eq!(buffers.array_state_count(), 2);
    assert!(matches!(batches[0].1, DrawCommand::Elements { count: 6, .. }));
}

#[test]
fn test_compile_applies_influences() {
    let mut renderer = MockRenderer::new();
    let mut states = RenderStateCache::new();
    let mut buffers = GeometryBufferCache::new(&BufferCacheConfig::default());
    let quad = make_quad();

    let fog = states.fog(Some(FogMode::Linear { start: 1.0, end: 50.0 }), Vec4::ONE);
    let lights = Arc::new(LightState::new(vec![Light::point(Vec3::ZERO, Vec4::ONE)], Vec4::splat(0.3)));
    let influences = InfluenceSet { fog: Some(Arc::clone(&fog)), lights: Some(Arc::clone(&lights)) };

    let config = EnqueuerConfig::normal(RenderQueues::OPAQUE, 0, vec![unlit_pass(), lit_pass()]);
    let compiled = config.compile(&quad, &mut renderer, &states, &mut buffers, &influences).unwrap();
    let CompiledEnqueuer::Normal { batches, .. } = &compiled else {
        panic!("expected a normal enqueuer");
    };

    let (unlit, _) = &batches[0];
    assert!(matches!(unlit.get(RenderStateType::Fog), Some(RenderState::Fog(f)) if Arc::ptr_eq(f, &fog)));
    assert!(matches!(unlit.get(RenderStateType::Light), Some(RenderState::Light(l)) if !l.is_enabled()));

    let (lit, _) = &batches[1];
    assert!(matches!(lit.get(RenderStateType::Light), Some(RenderState::Light(l)) if Arc::ptr_eq(l, &lights)));
}

#[test]
fn test_enqueue_sets_transform() {
    let mut renderer = MockRenderer::new();
    let states = RenderStateCache::new();
    let mut buffers = GeometryBufferCache::new(&BufferCacheConfig::default());
    let mut queues = RenderQueues::new();
    let quad = make_quad();

    let config = EnqueuerConfig::normal(RenderQueues::TRANSPARENT, 0, vec![unlit_pass()]);
    let compiled = config.compile(&quad, &mut renderer, &states, &mut buffers, &InfluenceSet::empty()).unwrap();
    let transform = Arc::new(TransformState::new(Mat4::from_translation(Vec3::X)));
    compiled.enqueue(&mut queues, &transform, 4.0).unwrap();

    let queue = queues.queue(RenderQueues::TRANSPARENT).unwrap();
    let batches = queue.group().batches();
    assert_eq!(batches.len(), 1);
    assert_eq!(batches[0].depth, 4.0);
    assert!(matches!(
        batches[0].states.get(RenderStateType::Transform),
        Some(RenderState::Transform(t)) if Arc::ptr_eq(t, &transform)
    ));
}

#[test]
fn test_enqueue_unknown_queue_fails() {
    let mut renderer = MockRenderer::new();
    let states = RenderStateCache::new();
    let mut buffers = GeometryBufferCache::new(&BufferCacheConfig::default());
    let mut queues = RenderQueues::new();
    let quad = make_quad();

    let config = EnqueuerConfig::normal("missing", 0, vec![unlit_pass()]);
    let compiled = config.compile(&quad, &mut renderer, &states, &mut buffers, &InfluenceSet::empty()).unwrap();
    let result = compiled.enqueue(&mut queues, &Arc::new(TransformState::identity()), 0.0);
    assert!(result.is_err());
    assert_eq!(queues.batch_count(), 0);
}

#[test]
fn test_grouped_enqueuer_builds_sub_group() {
    let mut renderer = MockRenderer::new();
    let states = RenderStateCache::new();
    let mut buffers = GeometryBufferCache::new(&BufferCacheConfig::default());
    let mut queues = RenderQueues::new();
    let quad = make_quad();

    let config = EnqueuerConfig::grouped(RenderQueues::OPAQUE, 5, vec![
        EnqueuerConfig::normal("ignored", 2, vec![lit_pass()]),
        EnqueuerConfig::normal("ignored", 1, vec![unlit_pass()]),
    ]);
    assert_eq!(config.passes().len(), 2);
    let compiled = config.compile(&quad, &mut renderer, &states, &mut buffers, &InfluenceSet::empty()).unwrap();
    compiled.enqueue(&mut queues, &Arc::new(TransformState::identity()), 1.0).unwrap();

    let group = queues.queue(RenderQueues::OPAQUE).unwrap().group();
    assert_eq!(group.len(), 1);
    assert_eq!(group.batch_count(), 2);

    // Children ordered by their own priority inside the group
    queues.sort();
    let batches = queues.queue(RenderQueues::OPAQUE).unwrap().group().batches();
    assert!(matches!(batches[0].states.get(RenderStateType::Light), Some(RenderState::Light(l)) if !l.is_enabled()));
    assert!(matches!(batches[1].states.get(RenderStateType::Light), Some(RenderState::Light(l)) if l.is_enabled()));
}

// ============================================================================
// Render queues
// ============================================================================

#[test]
fn test_default_queues_in_priority_order() {
    let queues = RenderQueues::new();
    let names: Vec<&str> = queues.queues().iter().map(RenderQueue::name).collect();
    assert_eq!(names, vec!["opaque", "transparent", "overlay"]);
}

#[test]
fn test_add_queue_keeps_order_and_rejects_duplicates() {
    let mut queues = RenderQueues::new();
    queues.add_queue("sky", -10, SortMode::None).unwrap();
    queues.add_queue("decals", 50, SortMode::BackToFront).unwrap();
    assert!(queues.add_queue("opaque", 7, SortMode::None).is_err());

    let names: Vec<&str> = queues.queues().iter().map(RenderQueue::name).collect();
    assert_eq!(names, vec!["sky", "opaque", "decals", "transparent", "overlay"]);
}

#[test]
fn test_front_to_back_sort() {
    let states = RenderStateCache::new();
    let mut group = QueueGroup::new(SortMode::FrontToBack);
    for depth in [5.0, -1.0, 12.5, 0.0, 3.0] {
        group.add_batch(0, make_batch(&states, depth));
    }
    group.sort();
    assert_eq!(depths(&group), vec![-1.0, 0.0, 3.0, 5.0, 12.5]);
}

#[test]
fn test_back_to_front_sort() {
    let states = RenderStateCache::new();
    let mut group = QueueGroup::new(SortMode::BackToFront);
    for depth in [5.0, -1.0, 12.5, 0.0, 3.0] {
        group.add_batch(0, make_batch(&states, depth));
    }
    group.sort();
    assert_eq!(depths(&group), vec![12.5, 5.0, 3.0, 0.0, -1.0]);
}

#[test]
fn test_unsorted_keeps_insertion_order() {
    let states = RenderStateCache::new();
    let mut group = QueueGroup::new(SortMode::None);
    for depth in [5.0, -1.0, 12.5] {
        group.add_batch(0, make_batch(&states, depth));
    }
    group.sort();
    assert_eq!(depths(&group), vec![5.0, -1.0, 12.5]);
}

#[test]
fn test_priority_outranks_depth() {
    let states = RenderStateCache::new();
    let mut group = QueueGroup::new(SortMode::FrontToBack);
    group.add_batch(10, make_batch(&states, 1.0));
    group.add_batch(-5, make_batch(&states, 9.0));
    group.add_batch(0, make_batch(&states, 4.0));
    group.sort();
    assert_eq!(depths(&group), vec![9.0, 4.0, 1.0]);
}

#[test]
fn test_nested_group_sorted_by_nearest_member() {
    let states = RenderStateCache::new();
    let mut inner = QueueGroup::new(SortMode::FrontToBack);
    inner.add_batch(0, make_batch(&states, 8.0));
    inner.add_batch(0, make_batch(&states, 2.0));

    let mut outer = QueueGroup::new(SortMode::FrontToBack);
    outer.add_batch(0, make_batch(&states, 3.0));
    outer.add_group(0, inner);
    outer.add_group(0, QueueGroup::new(SortMode::None));
    assert_eq!(outer.len(), 2);

    outer.sort();
    assert_eq!(depths(&outer), vec![2.0, 8.0, 3.0]);
}

#[test]
fn test_render_draws_in_order_and_clears() {
    let states = RenderStateCache::new();
    let mut renderer = MockRenderer::new();
    let mut tracker = StateTracker::new();
    let mut queues = RenderQueues::new();

    queues.enqueue(RenderQueues::OVERLAY, 0, make_batch(&states, 0.0)).unwrap();
    queues.enqueue(RenderQueues::OPAQUE, 0, make_batch(&states, 2.0)).unwrap();
    queues.enqueue(RenderQueues::OPAQUE, 0, make_batch(&states, 1.0)).unwrap();
    assert!(queues.enqueue("missing", 0, make_batch(&states, 0.0)).is_err());
    assert_eq!(queues.batch_count(), 3);

    let draws = queues.render(&mut renderer, &mut tracker).unwrap();
    assert_eq!(draws, 3);
    assert_eq!(renderer.draws.len(), 3);
    assert_eq!(queues.batch_count(), 0);
    // Identical state sets are applied once
    assert_eq!(renderer.applied_states.len(), 13);
    assert_eq!(tracker.applied_count(), 13);
}
