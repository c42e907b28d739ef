//! Integration tests for topology batching against the recording device.

use rstest::rstest;

use navoverlay_debug_drawer::{BatchGroup, DrawProtocolError, GeometryBatch, Topology};
use navoverlay_graphics::{GraphicsError, RecordingDevice, RenderPhase, RenderState};

fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

fn push_run(batch: &mut GeometryBatch, vertices: usize, size: f32) {
    batch.begin(size).unwrap();
    for i in 0..vertices {
        batch
            .add_vertex(i as f32, (i * 2) as f32, 0.5, 0xff40_8020, 0.0, 1.0)
            .unwrap();
    }
    batch.end().unwrap();
}

// ============================================================================
// Batching
// ============================================================================

#[rstest]
#[case::points(Topology::Points, 5, 5)]
#[case::lines(Topology::Lines, 5, 4)]
#[case::lines_exact(Topology::Lines, 6, 6)]
#[case::triangles(Topology::Triangles, 7, 6)]
#[case::quads(Topology::Quads, 9, 12)]
#[case::quads_incomplete(Topology::Quads, 3, 0)]
fn test_run_index_count_follows_arity(
    #[case] topology: Topology,
    #[case] vertices: usize,
    #[case] expected_indices: u32,
) {
    init_logging();
    let mut batch = GeometryBatch::new(topology);
    push_run(&mut batch, vertices, 1.0);

    let run = batch.runs()[0];
    assert_eq!(run.index_count, expected_indices);
    assert_eq!(
        run.index_count as usize % topology.indices_per_primitive(),
        0
    );
}

#[test]
fn test_runs_are_contiguous() {
    let mut batch = GeometryBatch::new(Topology::Triangles);
    push_run(&mut batch, 6, 1.0);
    push_run(&mut batch, 3, 2.0);

    let runs = batch.runs();
    assert_eq!(runs.len(), 2);
    assert_eq!(runs[1].start_index, runs[0].index_count);
    assert_eq!(runs[1].first_vertex, 6);
    assert_eq!(runs[1].size, 2.0);
}

// ============================================================================
// Rendering
// ============================================================================

#[rstest]
#[case::points(Topology::Points)]
#[case::lines(Topology::Lines)]
#[case::triangles(Topology::Triangles)]
#[case::quads(Topology::Quads)]
fn test_reset_then_render_draws_nothing(#[case] topology: Topology) {
    init_logging();
    let mut device = RecordingDevice::new();
    let mut batch = GeometryBatch::new(topology);
    push_run(&mut batch, 12, 1.0);
    assert!(batch.render(&mut device) > 0);

    device.clear_draws();
    batch.reset();
    assert_eq!(batch.render(&mut device), 0);
    assert!(device.draws().is_empty());

    batch.invalidate_device_objects(&mut device);
}

#[test]
fn test_upload_matches_cpu_content() {
    let mut device = RecordingDevice::new();
    let mut batch = GeometryBatch::new(Topology::Quads);
    push_run(&mut batch, 4, 1.0);
    batch.render(&mut device);

    let buffers = device.live_buffers();
    assert_eq!(buffers.len(), 2);
    let vertex_bytes: &[u8] = bytemuck::cast_slice(batch.vertices());
    let index_bytes: &[u8] = bytemuck::cast_slice(batch.indices());
    assert_eq!(device.buffer_data(buffers[0]), Some(vertex_bytes));
    assert_eq!(device.buffer_data(buffers[1]), Some(index_bytes));
    assert!(!batch.is_dirty());

    batch.invalidate_device_objects(&mut device);
}

#[test]
fn test_create_device_objects_is_idempotent() {
    let mut device = RecordingDevice::new();
    let mut batch = GeometryBatch::new(Topology::Lines);
    push_run(&mut batch, 4, 1.0);

    batch.create_device_objects(&mut device).unwrap();
    batch.create_device_objects(&mut device).unwrap();
    assert_eq!(device.total_allocations(), 2);
    assert_eq!(device.live_buffer_count(), 2);

    // Growth replaces the buffers instead of adding more.
    push_run(&mut batch, 8, 1.0);
    batch.create_device_objects(&mut device).unwrap();
    assert_eq!(device.total_allocations(), 4);
    assert_eq!(device.live_buffer_count(), 2);

    batch.invalidate_device_objects(&mut device);
    assert_eq!(device.live_buffer_count(), 0);
}

#[test]
fn test_create_device_objects_without_content() {
    let mut device = RecordingDevice::new();
    let mut batch = GeometryBatch::new(Topology::Triangles);

    batch.create_device_objects(&mut device).unwrap();
    assert!(!batch.has_device_objects());
    assert_eq!(batch.render(&mut device), 0);
    batch.invalidate_device_objects(&mut device);
}

#[test]
fn test_visible_range_selects_runs_by_start_index() {
    init_logging();
    let mut device = RecordingDevice::new();
    let mut batch = GeometryBatch::new(Topology::Points);
    push_run(&mut batch, 10, 1.0);
    push_run(&mut batch, 15, 1.0);
    push_run(&mut batch, 15, 1.0);
    push_run(&mut batch, 5, 1.0);

    let starts: Vec<u32> = batch.runs().iter().map(|r| r.start_index).collect();
    assert_eq!(starts, vec![0, 10, 25, 40]);

    batch.set_visible_range(10, 39);
    assert_eq!(batch.render(&mut device), 2);
    let drawn: Vec<u32> = device.draws().iter().map(|d| d.start_index).collect();
    assert_eq!(drawn, vec![10, 25]);

    device.clear_draws();
    batch.show_all();
    assert_eq!(batch.render(&mut device), 4);

    batch.invalidate_device_objects(&mut device);
}

#[test]
fn test_point_size_clamped_to_device() {
    let mut device = RecordingDevice::with_capabilities(navoverlay_graphics::DeviceCapabilities {
        max_point_size: 2.0,
        ..Default::default()
    });
    let mut batch = GeometryBatch::new(Topology::Points);
    push_run(&mut batch, 1, 8.0);
    batch.render(&mut device);

    assert_eq!(
        device.render_state(RenderState::PointSize(0.0)),
        Some(RenderState::PointSize(2.0))
    );
    batch.invalidate_device_objects(&mut device);
}

// ============================================================================
// Failure handling
// ============================================================================

#[test]
fn test_allocation_failure_recovers_on_next_render() {
    init_logging();
    let mut device = RecordingDevice::new();
    let mut batch = GeometryBatch::new(Topology::Triangles);
    push_run(&mut batch, 3, 1.0);

    device.fail_next_allocations(1);
    assert_eq!(
        batch.create_device_objects(&mut device),
        Err(GraphicsError::OutOfMemory)
    );
    assert_eq!(device.live_buffer_count(), 0);

    device.fail_next_allocations(1);
    assert_eq!(batch.render(&mut device), 0);
    assert_eq!(batch.render(&mut device), 1);
    assert_eq!(batch.run_count(), 1);

    batch.invalidate_device_objects(&mut device);
}

#[test]
fn test_failed_topology_does_not_affect_others() {
    let mut device = RecordingDevice::new();
    let mut group = BatchGroup::new();
    for topology in [Topology::Points, Topology::Lines] {
        group.begin(topology, 1.0).unwrap();
        for _ in 0..2 {
            group.add_vertex(0.0, 0.0, 0.0, 0, 0.0, 0.0).unwrap();
        }
        group.end().unwrap();
    }

    // Points allocate first; its vertex buffer fails.
    device.fail_next_allocations(1);
    assert_eq!(group.render(&mut device, RenderPhase::Geometry), 1);
    assert!(!group.batch(Topology::Points).has_device_objects());
    assert!(group.batch(Topology::Lines).has_device_objects());

    assert_eq!(group.render(&mut device, RenderPhase::Geometry), 2);
    group.invalidate_device_objects(&mut device);
}

#[test]
fn test_device_loss_keeps_cpu_content() {
    init_logging();
    let mut device = RecordingDevice::new();
    let mut group = BatchGroup::new();
    group.begin(Topology::Lines, 1.0).unwrap();
    group.add_vertex(0.0, 0.0, 0.0, 0, 0.0, 0.0).unwrap();
    group.add_vertex(1.0, 1.0, 1.0, 0, 0.0, 0.0).unwrap();
    group.end().unwrap();
    assert_eq!(group.render(&mut device, RenderPhase::Geometry), 1);

    device.lose_device();
    assert_eq!(group.render(&mut device, RenderPhase::Geometry), 0);
    assert_eq!(device.reset(), Err(GraphicsError::ResourcesOutstanding(2)));

    group.invalidate_device_objects(&mut device);
    device.reset().unwrap();
    assert_eq!(group.batch(Topology::Lines).run_count(), 1);
    assert_eq!(group.render(&mut device, RenderPhase::Geometry), 1);

    group.invalidate_device_objects(&mut device);
}

// ============================================================================
// Protocol violations
// ============================================================================

#[test]
#[cfg_attr(debug_assertions, should_panic(expected = "draw protocol violation"))]
fn test_vertex_without_begin_is_rejected() {
    let mut group = BatchGroup::new();
    let result = group.add_vertex(0.0, 0.0, 0.0, 0, 0.0, 0.0);
    assert_eq!(result, Err(DrawProtocolError::NoOpenBatch));
    assert!(group.is_empty());
}

#[test]
#[cfg_attr(debug_assertions, should_panic(expected = "draw protocol violation"))]
fn test_end_without_begin_is_rejected() {
    let mut group = BatchGroup::new();
    assert_eq!(group.end(), Err(DrawProtocolError::NoOpenBatch));
    assert!(group.batches().all(|b| b.run_count() == 0));
}

#[test]
#[cfg_attr(debug_assertions, should_panic(expected = "draw protocol violation"))]
fn test_nested_begin_is_rejected() {
    let mut group = BatchGroup::new();
    group.begin(Topology::Lines, 1.0).unwrap();
    assert_eq!(
        group.begin(Topology::Points, 3.0),
        Err(DrawProtocolError::NestedBegin(Topology::Lines))
    );

    // The open batch is untouched.
    assert_eq!(group.current(), Some(Topology::Lines));
    assert!(!group.batch(Topology::Points).is_open());
    group.add_vertex(0.0, 0.0, 0.0, 0, 0.0, 0.0).unwrap();
    group.add_vertex(1.0, 0.0, 0.0, 0, 0.0, 0.0).unwrap();
    group.end().unwrap();
    assert_eq!(group.batch(Topology::Lines).index_count(), 2);
}

#[test]
#[cfg_attr(debug_assertions, should_panic(expected = "draw protocol violation"))]
fn test_nested_begin_on_same_batch_is_rejected() {
    let mut batch = GeometryBatch::new(Topology::Lines);
    push_run(&mut batch, 2, 1.0);
    let first = batch.runs()[0];

    batch.begin(2.0).unwrap();
    batch.add_vertex(0.0, 0.0, 0.0, 0, 0.0, 0.0).unwrap();
    assert_eq!(
        batch.begin(5.0),
        Err(DrawProtocolError::NestedBegin(Topology::Lines))
    );

    // The open run keeps its size and pending vertex.
    batch.add_vertex(1.0, 0.0, 0.0, 0, 0.0, 0.0).unwrap();
    batch.end().unwrap();
    assert_eq!(batch.run_count(), 2);
    assert_eq!(batch.runs()[0], first);
    assert_eq!(batch.runs()[1].size, 2.0);
    assert_eq!(batch.runs()[1].index_count, 2);
}
