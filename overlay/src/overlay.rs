//! The navmesh overlay: rebuilds batched geometry from the active navmesh and
//! draws it once per frame.

use std::sync::{Arc, Weak};

use navoverlay_debug_drawer::{BatchGroup, Topology};
use navoverlay_graphics::{FixedFunctionDevice, RenderPhase};
use navoverlay_navmesh::{ClosedList, MeshLoader, NavMesh, NavMeshDrawFlags, SubscriptionId};
use parking_lot::Mutex;

use crate::adapter::DebugDrawAdapter;
use crate::config::OverlayConfig;
use crate::state::{PipelineStateConfig, apply_default_overlay_state, bind_fixed_function};

/// Geometry lifecycle of a [`NavMeshOverlay`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OverlayState {
    /// No geometry is drawn.
    Unloaded,
    /// Geometry is being rebuilt from the navmesh.
    Loading,
    /// Batches reflect the navmesh and are drawn each frame.
    Loaded,
}

/// A navmesh-changed notification waiting for the render thread.
#[derive(Debug, Clone)]
enum NavMeshChange {
    Changed(Weak<NavMesh>),
    Cleared,
}

type PendingChange = Arc<Mutex<Option<NavMeshChange>>>;

/// Draws the active navmesh of a [`MeshLoader`] as debug geometry.
///
/// The overlay subscribes to the loader on construction and unsubscribes when
/// dropped. Notifications are queued and applied on the render thread at the
/// start of the next geometry render, or by
/// [`process_navmesh_changes`](Self::process_navmesh_changes).
///
/// Disabling the overlay releases its device buffers but keeps the CPU
/// geometry; enabling it again without a navmesh change reuses that geometry.
///
/// # Device lifecycle
///
/// ```ignore
/// // Host is about to reset the device:
/// overlay.invalidate_device_objects(device);
/// device.reset()?;
/// // Device is usable again; buffers are recreated on the next render.
/// overlay.create_device_objects();
/// ```
pub struct NavMeshOverlay {
    loader: Weak<MeshLoader>,
    subscription: SubscriptionId,
    pending: PendingChange,

    navmesh: Weak<NavMesh>,
    group: BatchGroup,
    pipeline_state: PipelineStateConfig,

    state: OverlayState,
    enabled: bool,
    stale: bool,
    rebuild_count: u64,
    device_suspended: bool,

    use_state_editor: bool,
    draw_flags: NavMeshDrawFlags,
    closed_list: ClosedList,
}

static_assertions::assert_impl_all!(NavMeshOverlay: Send);

impl NavMeshOverlay {
    pub fn new(loader: &Arc<MeshLoader>, config: &OverlayConfig) -> Self {
        let pending = PendingChange::default();
        let subscription = {
            let pending = Arc::clone(&pending);
            loader.subscribe(move |navmesh| {
                let change = match navmesh {
                    Some(navmesh) => NavMeshChange::Changed(Arc::downgrade(navmesh)),
                    None => NavMeshChange::Cleared,
                };
                *pending.lock() = Some(change);
            })
        };

        let mut group = BatchGroup::new();
        group.set_eq_coords(config.eq_coords);
        group.set_enabled(Topology::Points, config.topologies.points);
        group.set_enabled(Topology::Lines, config.topologies.lines);
        group.set_enabled(Topology::Triangles, config.topologies.triangles);
        group.set_enabled(Topology::Quads, config.topologies.quads);

        let navmesh = loader
            .navmesh()
            .map(|navmesh| Arc::downgrade(&navmesh))
            .unwrap_or_default();

        log::debug!(
            "NavMeshOverlay created (enabled: {}, navmesh: {})",
            config.enabled,
            navmesh.strong_count() > 0
        );

        Self {
            loader: Arc::downgrade(loader),
            subscription,
            pending,
            navmesh,
            group,
            pipeline_state: config.render_state.clone().unwrap_or_default(),
            state: OverlayState::Unloaded,
            enabled: config.enabled,
            stale: true,
            rebuild_count: 0,
            device_suspended: false,
            use_state_editor: config.use_state_editor,
            draw_flags: config.draw_flags.into(),
            closed_list: ClosedList::new(),
        }
    }

    // ------------------------------------------------------------------------
    // Accessors
    // ------------------------------------------------------------------------

    pub fn state(&self) -> OverlayState {
        self.state
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Whether the batches currently reflect the navmesh.
    pub fn is_loaded(&self) -> bool {
        self.state == OverlayState::Loaded
    }

    /// The navmesh being drawn, if it is still alive.
    pub fn navmesh(&self) -> Option<Arc<NavMesh>> {
        self.navmesh.upgrade()
    }

    pub fn batch_group(&self) -> &BatchGroup {
        &self.group
    }

    pub fn batch_group_mut(&mut self) -> &mut BatchGroup {
        &mut self.group
    }

    /// Number of completed geometry rebuilds.
    pub fn rebuild_count(&self) -> u64 {
        self.rebuild_count
    }

    pub fn subscription(&self) -> SubscriptionId {
        self.subscription
    }

    pub fn pipeline_state(&self) -> &PipelineStateConfig {
        &self.pipeline_state
    }

    pub fn pipeline_state_mut(&mut self) -> &mut PipelineStateConfig {
        &mut self.pipeline_state
    }

    pub fn use_state_editor(&self) -> bool {
        self.use_state_editor
    }

    pub fn draw_flags(&self) -> NavMeshDrawFlags {
        self.draw_flags
    }

    pub fn closed_list(&self) -> &ClosedList {
        &self.closed_list
    }

    // ------------------------------------------------------------------------
    // Settings (applied on the next render)
    // ------------------------------------------------------------------------

    pub fn set_enabled(&mut self, enabled: bool) {
        self.enabled = enabled;
    }

    pub fn set_topology_enabled(&mut self, topology: Topology, enabled: bool) {
        self.group.set_enabled(topology, enabled);
    }

    /// Draw with [`pipeline_state`](Self::pipeline_state) instead of the built-in state.
    pub fn set_use_state_editor(&mut self, use_state_editor: bool) {
        self.use_state_editor = use_state_editor;
    }

    pub fn set_draw_flags(&mut self, flags: NavMeshDrawFlags) {
        if flags != self.draw_flags {
            self.draw_flags = flags;
            self.stale = true;
        }
    }

    pub fn set_closed_list(&mut self, closed_list: ClosedList) {
        if closed_list != self.closed_list {
            self.closed_list = closed_list;
            self.stale = true;
        }
    }

    pub fn set_eq_coords(&mut self, eq_coords: bool) {
        self.group.set_eq_coords(eq_coords);
        self.stale = true;
    }

    // ------------------------------------------------------------------------
    // Device lifecycle
    // ------------------------------------------------------------------------

    /// Resume drawing after [`invalidate_device_objects`](Self::invalidate_device_objects).
    ///
    /// Buffers are allocated by the next render, not here.
    pub fn create_device_objects(&mut self) {
        if self.device_suspended {
            log::debug!("NavMeshOverlay: device objects re-armed");
        }
        self.device_suspended = false;
    }

    /// Release every device buffer. CPU geometry is kept. Nothing is drawn or
    /// allocated until [`create_device_objects`](Self::create_device_objects).
    pub fn invalidate_device_objects(&mut self, device: &mut dyn FixedFunctionDevice) {
        self.group.invalidate_device_objects(device);
        self.device_suspended = true;
        log::debug!("NavMeshOverlay: device objects invalidated");
    }

    // ------------------------------------------------------------------------
    // Navmesh changes
    // ------------------------------------------------------------------------

    /// Apply a queued navmesh-changed notification, rebuilding or unloading
    /// as needed.
    pub fn process_navmesh_changes(&mut self, device: &mut dyn FixedFunctionDevice) {
        let change = self.pending.lock().take();
        match change {
            Some(NavMeshChange::Changed(navmesh)) => {
                log::debug!("NavMeshOverlay: navmesh changed");
                self.navmesh = navmesh;
                self.stale = true;
            }
            Some(NavMeshChange::Cleared) => {
                log::debug!("NavMeshOverlay: navmesh cleared");
                self.navmesh = Weak::new();
                self.stale = true;
            }
            None => {}
        }

        // A pending disable wins: the change is applied on the next enable.
        if !self.enabled || self.state != OverlayState::Loaded {
            return;
        }
        match self.navmesh.upgrade() {
            Some(navmesh) if self.stale => self.rebuild(&navmesh),
            Some(_) => {}
            None => self.unload(device),
        }
    }

    fn rebuild(&mut self, navmesh: &NavMesh) {
        self.state = OverlayState::Loading;
        self.group.reset();

        let mut dd = DebugDrawAdapter::new(&mut self.group);
        navoverlay_navmesh::draw_navmesh(
            &mut dd,
            navmesh,
            Some(&self.closed_list),
            self.draw_flags,
        );
        if dd.protocol_errors() > 0 {
            log::warn!(
                "NavMeshOverlay: {} draw calls rejected during rebuild",
                dd.protocol_errors()
            );
        }

        self.stale = false;
        self.rebuild_count += 1;
        self.state = OverlayState::Loaded;

        log::debug!(
            "NavMeshOverlay: rebuilt geometry ({} polys, {} runs)",
            navmesh.poly_count(),
            self.group.batches().map(|b| b.run_count()).sum::<usize>()
        );
    }

    fn unload(&mut self, device: &mut dyn FixedFunctionDevice) {
        self.group.reset();
        self.group.invalidate_device_objects(device);
        self.stale = true;
        self.state = OverlayState::Unloaded;
        log::debug!("NavMeshOverlay: unloaded");
    }

    // ------------------------------------------------------------------------
    // Rendering
    // ------------------------------------------------------------------------

    /// Draw the overlay for one render phase. Only [`RenderPhase::Geometry`]
    /// draws anything. Returns the number of draw calls issued.
    pub fn render(&mut self, device: &mut dyn FixedFunctionDevice, phase: RenderPhase) -> usize {
        if phase != RenderPhase::Geometry {
            return 0;
        }

        self.process_navmesh_changes(device);

        if self.enabled != self.is_loaded() {
            if self.enabled {
                match self.navmesh.upgrade() {
                    Some(navmesh) if self.stale => self.rebuild(&navmesh),
                    Some(_) => {
                        log::debug!("NavMeshOverlay: enabled, reusing geometry");
                        self.state = OverlayState::Loaded;
                    }
                    None => {}
                }
            } else {
                self.group.invalidate_device_objects(device);
                self.state = OverlayState::Unloaded;
                log::debug!("NavMeshOverlay: disabled");
            }
        }

        if !self.is_loaded() || self.device_suspended {
            return 0;
        }

        bind_fixed_function(device);
        if self.use_state_editor {
            self.pipeline_state.apply_state(device);
        } else {
            apply_default_overlay_state(device);
        }

        self.group.render(device, phase)
    }
}

impl Drop for NavMeshOverlay {
    fn drop(&mut self) {
        if let Some(loader) = self.loader.upgrade() {
            loader.unsubscribe(self.subscription);
        }
        if self.group.batches().any(|b| b.has_device_objects()) {
            log::warn!("NavMeshOverlay dropped without invalidating its device objects");
        }
    }
}
