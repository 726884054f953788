use std::sync::Arc;
use glam::{Mat4, Vec3};
use crate::config::BufferCacheConfig;
use crate::renderer::mock_renderer::MockRenderer;
use crate::renderer::{BufferObject, DrawCommand, IndexData, IndexType, PrimitiveMode, RendererCaps};
use crate::state::{ArrayBuffer, ArrayDataType};
use crate::geometry::{AttributeArrayConfig, ClientArrayConfig, PassSummary, SummaryFlags};
use super::*;

fn quad_arrays() -> GeometryArrays {
    let vertex = ClientArrayConfig::new(3, vec![
        0.0, 0.0, 0.0,
        1.0, 0.0, 0.0,
        1.0, 1.0, 0.0,
        0.0, 1.0, 0.0,
    ]).unwrap();
    let normal = ClientArrayConfig::new(3, [0.0, 0.0, 1.0].repeat(4)).unwrap();
    let uv = ClientArrayConfig::new(2, vec![0.0, 0.0, 1.0, 0.0, 1.0, 1.0, 0.0, 1.0]).unwrap();
    GeometryArrays::new(PrimitiveMode::Triangles, vertex)
        .with_normal(normal)
        .with_tex_coords(0, uv)
}

fn make_quad() -> StoredGeometry {
    StoredGeometry::indexed(quad_arrays(), vec![0, 1, 2, 0, 2, 3]).unwrap()
}

fn full_summary() -> PassSummary {
    let mut summary = PassSummary::new();
    summary.tex_coord_sets.insert(0);
    summary.flags = SummaryFlags::NORMAL | SummaryFlags::COLOR;
    summary
}

fn cache() -> GeometryBufferCache {
    GeometryBufferCache::new(&BufferCacheConfig::default())
}

// ============================================================================
// Construction
// ============================================================================

#[test]
fn test_indexed_range_and_bounds() {
    let quad = make_quad();
    assert_eq!(quad.vertex_range(), 0..4);
    assert_eq!(quad.bounds().min, Vec3::ZERO);
    assert_eq!(quad.bounds().max, Vec3::new(1.0, 1.0, 0.0));
    assert!(matches!(quad.kind(), StoredKind::Indexed { start: 0, end: 3, .. }));
}

#[test]
fn test_index_out_of_range_is_error() {
    assert!(StoredGeometry::indexed(quad_arrays(), vec![0, 1, 4]).is_err());
    assert!(StoredGeometry::indexed(quad_arrays(), vec![]).is_err());
}

#[test]
fn test_array_range_is_validated() {
    assert!(StoredGeometry::array(quad_arrays(), 1, 3).is_ok());
    assert!(StoredGeometry::array(quad_arrays(), 2, 3).is_err());
}

#[test]
fn test_mismatched_array_lengths_are_error() {
    let arrays = quad_arrays().with_color(ClientArrayConfig::new(4, vec![1.0; 8]).unwrap());
    assert!(StoredGeometry::array(arrays, 0, 4).is_err());
}

#[test]
fn test_skinned_requires_bone_attributes() {
    assert!(StoredGeometry::skinned_indexed(quad_arrays(), vec![0, 1, 2], vec!["root".into()]).is_err());

    let arrays = quad_arrays()
        .with_attribute(AttributeArrayConfig::new(BONE_INDICES, ClientArrayConfig::new(4, vec![0.0; 16]).unwrap()))
        .with_attribute(AttributeArrayConfig::new(BONE_WEIGHTS, ClientArrayConfig::new(4, vec![0.25; 16]).unwrap()));
    let skinned = StoredGeometry::skinned_indexed(arrays, vec![0, 1, 2], vec!["root".into()]).unwrap();
    assert!(skinned.is_skinned());
}

#[test]
fn test_geometry_ids_are_unique() {
    assert_ne!(make_quad().id(), make_quad().id());
}

// ============================================================================
// Array states
// ============================================================================

#[test]
fn test_required_arrays_order() {
    let arrays = quad_arrays()
        .with_color(ClientArrayConfig::with_type(4, ArrayDataType::UnsignedByte, true, vec![1.0; 16]).unwrap())
        .with_attribute(AttributeArrayConfig::new("tangent", ClientArrayConfig::new(3, vec![1.0; 12]).unwrap()));
    let quad = StoredGeometry::array(arrays, 0, 4).unwrap();
    let mut summary = full_summary();
    summary.attributes.insert("tangent".into());
    summary.tex_coord_sets.insert(5);

    let slots: Vec<ArraySlot> = quad.required_arrays(&summary).into_iter().map(|(slot, _)| slot).collect();
    assert_eq!(slots, vec![
        ArraySlot::Attribute("tangent".into()),
        ArraySlot::TexCoord(0),
        ArraySlot::Color,
        ArraySlot::Normal,
        ArraySlot::Vertex,
    ]);
}

#[test]
fn test_vertex_only_summary() {
    let quad = make_quad();
    let required = quad.required_arrays(&PassSummary::new());
    assert_eq!(required.len(), 1);
    assert_eq!(required[0].0, ArraySlot::Vertex);
}

#[test]
fn test_array_state_interleaves_into_one_buffer() {
    let quad = make_quad();
    let mut renderer = MockRenderer::new();
    let mut cache = cache();

    let state = quad.create_array_state(&mut renderer, &mut cache, &full_summary(), false).unwrap();

    // texcoord(8) + normal(12) + vertex(12)
    let tex = state.tex_coord_arrays()[0].as_ref().unwrap();
    let normal = state.normal_array().unwrap();
    let vertex = state.vertex_array().unwrap();
    assert_eq!((tex.offset, normal.offset, vertex.offset), (0, 8, 20));
    assert_eq!(vertex.stride, 32);
    assert_eq!(tex.buffer, vertex.buffer);

    assert_eq!(renderer.buffers.len(), 1);
    let floats = renderer.buffers[0].floats();
    assert_eq!(floats.len(), 8 * 4);
    // Second vertex: uv (1,0), normal (0,0,1), position (1,0,0)
    assert_eq!(&floats[8..16], &[1.0, 0.0, 0.0, 0.0, 1.0, 1.0, 0.0, 0.0]);
}

#[test]
fn test_aligned_array_state_pads_stride() {
    let quad = make_quad();
    let mut renderer = MockRenderer::new();
    let mut cache = cache();
    let mut summary = PassSummary::new();
    summary.flags = SummaryFlags::NORMAL;

    let state = quad.create_array_state(&mut renderer, &mut cache, &summary, true).unwrap();
    assert_eq!(state.vertex_array().unwrap().stride, 32);
    assert_eq!(renderer.buffers[0].size(), 32 * 4);
}

#[test]
fn test_array_state_is_cached_by_array_ids() {
    let quad = make_quad();
    let mut renderer = MockRenderer::new();
    let mut cache = cache();
    let summary = full_summary();

    let a = quad.create_array_state(&mut renderer, &mut cache, &summary, false).unwrap();
    let b = quad.create_array_state(&mut renderer, &mut cache, &summary, false).unwrap();
    assert!(Arc::ptr_eq(&a, &b));
    assert_eq!(renderer.buffers.len(), 1);

    let c = quad.create_array_state(&mut renderer, &mut cache, &summary, true).unwrap();
    assert!(!Arc::ptr_eq(&a, &c));
    assert_eq!(cache.array_state_count(), 2);
}

#[test]
fn test_geometries_sharing_arrays_share_state() {
    let arrays = quad_arrays();
    let first = StoredGeometry::indexed(arrays.clone(), vec![0, 1, 2]).unwrap();
    let second = StoredGeometry::indexed(arrays, vec![0, 2, 3]).unwrap();
    let mut renderer = MockRenderer::new();
    let mut cache = cache();
    let summary = full_summary();

    let a = first.create_array_state(&mut renderer, &mut cache, &summary, false).unwrap();
    let b = second.create_array_state(&mut renderer, &mut cache, &summary, false).unwrap();
    assert!(Arc::ptr_eq(&a, &b));
}

#[test]
fn test_array_state_client_fallback() {
    let quad = make_quad();
    let mut renderer = MockRenderer::with_caps(RendererCaps::fixed_function());
    let mut cache = cache();

    let state = quad.create_array_state(&mut renderer, &mut cache, &PassSummary::new(), false).unwrap();
    assert!(renderer.buffers.is_empty());
    match &state.vertex_array().unwrap().buffer {
        ArrayBuffer::Client(bytes) => assert_eq!(bytes.len(), 12 * 4),
        ArrayBuffer::Object(_) => panic!("expected client memory"),
    }
}

#[test]
fn test_array_state_follows_renderer_caps_on_shared_cache() {
    let quad = make_quad();
    let mut fixed = MockRenderer::with_caps(RendererCaps::fixed_function());
    let mut vbo = MockRenderer::new();
    let mut cache = cache();
    let summary = PassSummary::new();

    let client = quad.create_array_state(&mut fixed, &mut cache, &summary, false).unwrap();
    assert!(matches!(client.vertex_array().unwrap().buffer, ArrayBuffer::Client(_)));

    let object = quad.create_array_state(&mut vbo, &mut cache, &summary, false).unwrap();
    assert!(matches!(object.vertex_array().unwrap().buffer, ArrayBuffer::Object(_)));
    assert_eq!(vbo.buffers.len(), 1);
    assert_eq!(cache.array_state_count(), 2);

    // Both variants stay cached
    let again = quad.create_array_state(&mut fixed, &mut cache, &summary, false).unwrap();
    assert!(Arc::ptr_eq(&client, &again));
    let again = quad.create_array_state(&mut vbo, &mut cache, &summary, false).unwrap();
    assert!(Arc::ptr_eq(&object, &again));
    assert_eq!(vbo.buffers.len(), 1);
}

#[test]
fn test_buffer_creation_failure_propagates() {
    let quad = make_quad();
    let mut renderer = MockRenderer::new();
    renderer.fail_buffer_creation = true;
    let mut cache = cache();
    assert!(quad.create_array_state(&mut renderer, &mut cache, &PassSummary::new(), false).is_err());
    assert_eq!(cache.array_state_count(), 0);
}

// ============================================================================
// Draw commands
// ============================================================================

#[test]
fn test_draw_command_uses_short_element_buffer() {
    let quad = make_quad();
    let mut renderer = MockRenderer::new();
    let mut cache = cache();

    let command = quad.create_draw_command(&mut renderer, &mut cache).unwrap();
    match &command {
        DrawCommand::Elements { start, end, count, index_type, indices, .. } => {
            assert_eq!((*start, *end, *count), (0, 3, 6));
            assert_eq!(*index_type, IndexType::U16);
            assert!(matches!(indices, IndexData::Buffer(_)));
        }
        DrawCommand::Arrays { .. } => panic!("expected indexed draw"),
    }
    assert_eq!(renderer.buffers[0].contents().len(), 12);

    let again = quad.create_draw_command(&mut renderer, &mut cache).unwrap();
    assert_eq!(command, again);
    assert_eq!(renderer.buffers.len(), 1);
}

#[test]
fn test_draw_command_client_fallback() {
    let quad = make_quad();
    let mut renderer = MockRenderer::with_caps(RendererCaps::fixed_function());
    let mut cache = cache();
    let command = quad.create_draw_command(&mut renderer, &mut cache).unwrap();
    assert!(!command.uses_buffer_objects());
    assert_eq!(command.primitive_count(), 2);
}

#[test]
fn test_array_draw_command() {
    let strip = StoredGeometry::array(quad_arrays(), 1, 3).unwrap();
    let mut renderer = MockRenderer::new();
    let command = strip.create_draw_command(&mut renderer, &mut cache()).unwrap();
    assert_eq!(command, DrawCommand::Arrays { mode: PrimitiveMode::Triangles, first: 1, count: 3 });
}

// ============================================================================
// Merging
// ============================================================================

#[test]
fn test_merge_rebases_indices() {
    let quad = Arc::new(make_quad());
    let triangle = Arc::new(StoredGeometry::indexed(quad_arrays(), vec![1, 2, 3]).unwrap());
    let mut list = vec![
        TransformedGeometry::new(Arc::clone(&quad), Mat4::IDENTITY),
        TransformedGeometry::new(Arc::clone(&triangle), Mat4::from_translation(Vec3::X * 10.0)),
        TransformedGeometry::new(quad, Mat4::from_translation(Vec3::Y * 10.0)),
    ];
    // 4 + 3 + 4 vertices
    let total = 11;

    let merged = StoredGeometry::merge(&mut list).unwrap().unwrap();
    assert!(list.is_empty());
    assert_eq!(merged.arrays().vertex_count(), total);
    match merged.kind() {
        StoredKind::Indexed { start, end, indices } => {
            assert_eq!(*start, 0);
            assert_eq!(*end, total - 1);
            assert_eq!(indices.len(), 15);
            assert!(indices.iter().all(|&i| i < total));
            // Triangle indices 1,2,3 rebased to 4,5,6
            assert_eq!(&indices[6..9], &[4, 5, 6]);
        }
        _ => panic!("expected indexed geometry"),
    }
}

#[test]
fn test_merge_transforms_positions_and_normals() {
    let quad = Arc::new(make_quad());
    let rotate = Mat4::from_translation(Vec3::Z * 5.0) * Mat4::from_rotation_x(std::f32::consts::FRAC_PI_2);
    let mut list = vec![
        TransformedGeometry::new(Arc::clone(&quad), Mat4::IDENTITY),
        TransformedGeometry::new(quad, rotate),
    ];
    let merged = StoredGeometry::merge(&mut list).unwrap().unwrap();

    let vertex = &merged.arrays().vertex;
    // Vertex 6 is the second copy of (1,1,0): rotated onto (1,0,1), translated by +5 z
    let p = vertex.vertex(6);
    assert!((Vec3::new(p[0], p[1], p[2]) - Vec3::new(1.0, 0.0, 6.0)).length() < 1e-5);

    // Normals ignore the translation
    let n = merged.arrays().normal.as_ref().unwrap().vertex(6);
    assert!((Vec3::new(n[0], n[1], n[2]) - Vec3::new(0.0, -1.0, 0.0)).length() < 1e-5);
    assert!((merged.bounds().max.z - 6.0).abs() < 1e-5);
}

#[test]
fn test_unmergeable_entries_stay() {
    let quad = Arc::new(make_quad());
    let no_normals = Arc::new(StoredGeometry::indexed(
        GeometryArrays::new(PrimitiveMode::Triangles, quad.arrays().vertex.clone()),
        vec![0, 1, 2],
    ).unwrap());
    let mut list = vec![
        TransformedGeometry::new(Arc::clone(&quad), Mat4::IDENTITY),
        TransformedGeometry::new(Arc::clone(&no_normals), Mat4::IDENTITY),
        TransformedGeometry::new(quad, Mat4::IDENTITY),
    ];
    let merged = StoredGeometry::merge(&mut list).unwrap().unwrap();
    assert_eq!(merged.arrays().vertex_count(), 8);
    assert_eq!(list.len(), 1);
    assert!(Arc::ptr_eq(&list[0].geometry, &no_normals));
}

#[test]
fn test_strip_template_is_not_merged() {
    let arrays = GeometryArrays { mode: PrimitiveMode::TriangleStrip, ..quad_arrays() };
    let strip = Arc::new(StoredGeometry::array(arrays, 0, 4).unwrap());
    let mut list = vec![
        TransformedGeometry::new(Arc::clone(&strip), Mat4::IDENTITY),
        TransformedGeometry::new(strip, Mat4::IDENTITY),
    ];
    assert!(StoredGeometry::merge(&mut list).unwrap().is_none());
    assert_eq!(list.len(), 2);
}

#[test]
fn test_merge_empty_list() {
    let mut list = Vec::new();
    assert!(StoredGeometry::merge(&mut list).unwrap().is_none());
}

#[test]
fn test_merge_array_geometries() {
    let a = Arc::new(StoredGeometry::array(quad_arrays(), 0, 3).unwrap());
    let b = Arc::new(StoredGeometry::array(quad_arrays(), 1, 3).unwrap());
    let mut list = vec![
        TransformedGeometry::new(a, Mat4::IDENTITY),
        TransformedGeometry::new(b, Mat4::IDENTITY),
    ];
    let merged = StoredGeometry::merge(&mut list).unwrap().unwrap();
    assert!(matches!(merged.kind(), StoredKind::Array { first: 0, count: 6 }));
}

#[test]
fn test_merge_eligibility_is_an_equivalence() {
    let a = make_quad();
    let b = make_quad();
    let c = StoredGeometry::indexed(quad_arrays(), vec![3, 2, 1]).unwrap();
    let other_mode = StoredGeometry::indexed(
        GeometryArrays { mode: PrimitiveMode::Lines, ..quad_arrays() },
        vec![0, 1],
    ).unwrap();
    let non_indexed = StoredGeometry::array(quad_arrays(), 0, 3).unwrap();

    assert!(a.can_merge(&b) && b.can_merge(&a));
    assert!(b.can_merge(&c) && a.can_merge(&c));
    for x in [&a, &b, &c] {
        assert_eq!(x.can_merge(&other_mode), other_mode.can_merge(x));
        assert!(!x.can_merge(&other_mode));
        assert_eq!(x.can_merge(&non_indexed), non_indexed.can_merge(x));
        assert!(!x.can_merge(&non_indexed));
    }
}

#[test]
fn test_skinned_never_merges() {
    let arrays = quad_arrays()
        .with_attribute(AttributeArrayConfig::new(BONE_INDICES, ClientArrayConfig::new(4, vec![0.0; 16]).unwrap()))
        .with_attribute(AttributeArrayConfig::new(BONE_WEIGHTS, ClientArrayConfig::new(4, vec![0.25; 16]).unwrap()));
    let skinned = StoredGeometry::skinned_indexed(arrays, vec![0, 1, 2], vec!["root".into()]).unwrap();
    assert!(!skinned.can_merge(&skinned));
}
