//! # Headless Overlay Demo
//!
//! Drives the navmesh overlay for a number of frames on the recording device:
//! - loads a grid navmesh and draws it
//! - swaps in a navmesh with an off-mesh connection
//! - loses and resets the device
//! - disables and re-enables the overlay
//!
//! ```bash
//! cargo run --bin headless_overlay -- --frames 10 --tiles 3
//! RUST_LOG=debug cargo run --bin headless_overlay
//! ```

use std::path::PathBuf;
use std::sync::Arc;

use clap::Parser;
use navoverlay::{NavMeshOverlay, OverlayConfig, load_or_default};
use navoverlay_graphics::{FixedFunctionDevice, RecordingDevice, RenderPhase};
use navoverlay_navmesh::{MeshLoader, NavMesh, NavMeshDrawFlags};

/// Headless navmesh overlay demo.
#[derive(Parser, Debug)]
#[command(
    name = "headless_overlay",
    about = "Render a navmesh overlay on a recording device"
)]
struct Args {
    /// Number of frames to render.
    #[arg(long, default_value = "8")]
    frames: u32,

    /// Tiles along each axis of the generated navmesh.
    #[arg(long, default_value = "2")]
    tiles: u32,

    /// Cells along each axis of a tile.
    #[arg(long, default_value = "4")]
    cells: u32,

    /// Side length of one cell.
    #[arg(long, default_value = "1.0")]
    cell_size: f32,

    /// Frame at which the device is lost and reset.
    #[arg(long, default_value = "3")]
    lose_device_at: u32,

    /// Draw tile bounding boxes.
    #[arg(long)]
    tile_bounds: bool,

    /// Overlay configuration file.
    #[arg(long)]
    config: Option<PathBuf>,
}

fn build_navmesh(args: &Args, with_link: bool) -> NavMesh {
    let mut navmesh = NavMesh::grid(args.tiles, args.tiles, args.cells, args.cell_size);
    if with_link {
        let far = (args.tiles * args.cells) as f32 * args.cell_size - 0.5;
        if let Some(tile) = navmesh.tile_mut(0) {
            tile.add_off_mesh_connection([0.5, 0.0, 0.5], [far, 0.0, far], 0.3, true);
        }
    }
    navmesh
}

fn report(frame: u32, draws: usize, overlay: &NavMeshOverlay, device: &RecordingDevice) {
    log::info!(
        "frame {frame}: {draws} draws, {:?}, {} rebuilds, {} live buffers",
        overlay.state(),
        overlay.rebuild_count(),
        device.live_buffer_count()
    );
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args = Args::parse();
    log::info!("Starting headless overlay demo");
    navoverlay_graphics::init();

    let mut config = match &args.config {
        Some(path) => load_or_default(path),
        None => OverlayConfig::default(),
    };
    if args.tile_bounds {
        config.draw_flags.tile_bounds = true;
    }

    let loader = Arc::new(MeshLoader::new());
    let mut overlay = NavMeshOverlay::new(&loader, &config);
    let mut device = RecordingDevice::new();
    log::info!("Device: {}", device.name());

    loader.set_navmesh(Arc::new(build_navmesh(&args, false)));

    for frame in 0..args.frames {
        match frame {
            2 => loader.set_navmesh(Arc::new(build_navmesh(&args, true))),
            f if f == args.lose_device_at => {
                device.lose_device();
                overlay.invalidate_device_objects(&mut device);
                if let Err(e) = device.reset() {
                    log::error!("Device reset failed: {e}");
                    return;
                }
                overlay.create_device_objects();
            }
            5 => overlay.set_enabled(false),
            6 => {
                overlay.set_enabled(true);
                overlay.set_draw_flags(overlay.draw_flags() | NavMeshDrawFlags::COLOR_TILES);
            }
            _ => {}
        }

        device.clear_draws();
        let draws = overlay.render(&mut device, RenderPhase::Geometry);
        overlay.render(&mut device, RenderPhase::Overlay);
        report(frame, draws, &overlay, &device);
    }

    overlay.invalidate_device_objects(&mut device);
    log::info!(
        "Done: {} allocations over the run, {} live buffers",
        device.total_allocations(),
        device.live_buffer_count()
    );
}
