//! Integration tests for the recording backend.
//!
//! These exercise the device through `&mut dyn FixedFunctionDevice`, the way
//! the overlay consumes a host device.

use navoverlay_graphics::*;
use rstest::rstest;

fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

fn create(device: &mut dyn FixedFunctionDevice, size: u64, usage: BufferUsage) -> BufferHandle {
    device
        .create_buffer(&BufferDescriptor::new(size, usage))
        .expect("allocation should succeed")
}

#[rstest]
#[case(PrimitiveType::PointList, 4, 4)]
#[case(PrimitiveType::LineList, 2, 4)]
#[case(PrimitiveType::TriangleList, 2, 6)]
fn test_draw_reads_expected_index_count(
    #[case] primitive: PrimitiveType,
    #[case] primitive_count: u32,
    #[case] expected_indices: u32,
) {
    init_logging();
    let mut device = RecordingDevice::new();
    let dyn_device: &mut dyn FixedFunctionDevice = &mut device;

    let vb = create(dyn_device, 24 * 8, BufferUsage::VERTEX);
    let ib = create(dyn_device, 4 * 8, BufferUsage::INDEX);
    let draw = IndexedDraw {
        primitive,
        vertex_buffer: vb,
        vertex_stride: 24,
        index_buffer: ib,
        min_vertex: 0,
        vertex_count: 8,
        start_index: 0,
        primitive_count,
    };
    assert_eq!(draw.index_count(), expected_indices);
    dyn_device.draw_indexed(&draw).unwrap();

    assert_eq!(device.draws(), &[draw]);
}

#[rstest]
fn test_lost_device_rejects_work_until_reset() {
    init_logging();
    let mut device = RecordingDevice::new();
    let vb = create(&mut device, 64, BufferUsage::VERTEX);

    device.lose_device();
    assert_eq!(
        device.write_buffer(vb, 0, &[0; 4]),
        Err(GraphicsError::DeviceLost)
    );

    device.release_buffer(vb);
    device.reset().unwrap();
    assert!(!device.is_lost());
    assert_eq!(device.live_buffer_count(), 0);
    assert_eq!(device.total_allocations(), 1);
}

#[rstest]
fn test_reset_restores_default_state() {
    init_logging();
    let mut device = RecordingDevice::new();
    let before = device.state_snapshot();

    device.set_fixed_function_pipeline();
    device.set_render_state(RenderState::ZEnable(false));
    device.set_sampler_state(0, SamplerState::MinFilter(TextureFilter::Anisotropic));
    assert_ne!(device.state_snapshot(), before);
    assert!(device.is_fixed_function());

    device.lose_device();
    device.reset().unwrap();
    assert_eq!(device.state_snapshot(), before);
    assert_eq!(
        device.sampler_state(0, SamplerState::MinFilter(TextureFilter::Point)),
        None
    );
}

#[rstest]
fn test_texture_stage_beyond_capabilities_is_ignored() {
    init_logging();
    let caps = DeviceCapabilities {
        max_texture_stages: 2,
        ..DeviceCapabilities::default()
    };
    let mut device = RecordingDevice::with_capabilities(caps);

    device.set_texture_stage_state(1, TextureStageState::Constant(0xff00_00ff));
    device.set_texture_stage_state(2, TextureStageState::Constant(0xff00_00ff));

    assert!(
        device
            .texture_stage_state(1, TextureStageState::Constant(0))
            .is_some()
    );
    assert!(
        device
            .texture_stage_state(2, TextureStageState::Constant(0))
            .is_none()
    );
}

#[rstest]
fn test_oversized_buffer_rejected() {
    init_logging();
    let caps = DeviceCapabilities {
        max_buffer_size: 128,
        ..DeviceCapabilities::default()
    };
    let mut device = RecordingDevice::with_capabilities(caps);

    let result = device.create_buffer(&BufferDescriptor::new(256, BufferUsage::VERTEX));
    assert!(matches!(result, Err(GraphicsError::InvalidParameter(_))));
    assert_eq!(device.live_buffer_count(), 0);
}
