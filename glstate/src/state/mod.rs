//! Filter for redundant driver state changes.
//!
//! [`StateCache`] remembers the last value it told the driver for every
//! binding point and context toggle it manages, and drops requests that would
//! not change anything. All slots follow the same rule: compare against the
//! cached value, forward to the [`Driver`] only on a difference, then store the
//! new value.
//!
//! The cache only knows what went through it. Changing driver state through
//! any other path leaves the cache stale, and it has no way to notice.

mod options;
mod viewport;
mod write_mask;

pub use options::StateCacheOptions;
pub use viewport::Viewport;
pub use write_mask::WriteMask;

use crate::driver::Driver;
use crate::handle::Handle;
use crate::types::{BufferTarget, Capability, CapabilitySet};
use glstate_utils::GlArgs;
use tracing::{debug, trace};

const DEFAULT_CLEAR_COLOR: [f32; 4] = [1.0, 1.0, 1.0, 1.0];

/// Number of transitions the cache forwarded and dropped.
#[derive(Debug, Default, Copy, Clone, Eq, PartialEq)]
pub struct CacheStats {
    pub forwarded: u64,
    pub suppressed: u64,
}

impl CacheStats {
    pub fn total(&self) -> u64 {
        self.forwarded + self.suppressed
    }
}

/// Cached view of one driver context.
///
/// There should be exactly one cache per context, and every state change on
/// that context has to go through it. Binding calls accept either a raw
/// [`Handle`] or a reference to the matching resource.
pub struct StateCache<'d> {
    driver: &'d dyn Driver,
    options: StateCacheOptions,

    framebuffer: Handle,
    pipeline: Handle,
    vertex_array: Handle,
    buffers: [Handle; BufferTarget::COUNT],
    capabilities: CapabilitySet,
    viewport: Viewport,
    clear_color: [f32; 4],
    write_mask: WriteMask,

    stats: CacheStats,
}

impl<'d> StateCache<'d> {
    pub fn new(driver: &'d dyn Driver) -> Self {
        Self::with_options(driver, StateCacheOptions::default())
    }

    /// Creates a cache configured from the process arguments.
    pub fn from_args(driver: &'d dyn Driver) -> Self {
        Self::with_options(driver, StateCacheOptions::from_args(GlArgs::get()))
    }

    pub fn with_options(driver: &'d dyn Driver, options: StateCacheOptions) -> Self {
        let mut cache = Self {
            driver,
            options,
            framebuffer: Handle::NONE,
            pipeline: Handle::NONE,
            vertex_array: Handle::NONE,
            buffers: [Handle::NONE; BufferTarget::COUNT],
            capabilities: CapabilitySet::EMPTY,
            viewport: Viewport::default(),
            clear_color: DEFAULT_CLEAR_COLOR,
            write_mask: WriteMask::default(),
            stats: CacheStats::default(),
        };

        debug!("Created state cache with {:?}", options);

        if options.debug_output {
            cache.enable(Capability::DebugOutput);
            cache.enable(Capability::DebugOutputSynchronous);
        }

        if let Some([r, g, b, a]) = options.clear_color {
            cache.set_clear_color(r, g, b, a);
        }

        cache
    }

    pub fn driver(&self) -> &'d dyn Driver {
        self.driver
    }

    pub fn options(&self) -> &StateCacheOptions {
        &self.options
    }

    pub fn stats(&self) -> CacheStats {
        self.stats
    }

    pub fn reset_stats(&mut self) {
        self.stats = CacheStats::default();
    }

    // Counts the request and decides whether it reaches the driver.
    fn admit(&mut self, changed: bool) -> bool {
        let forward = changed || self.options.passthrough;
        if forward {
            self.stats.forwarded += 1;
        } else {
            self.stats.suppressed += 1;
        }
        forward
    }

    pub fn enable(&mut self, capability: Capability) {
        let changed = !self.capabilities.contains(capability);
        if self.admit(changed) {
            trace!("enable {:?}", capability);
            self.driver.enable(capability);
            self.capabilities.insert(capability);
        }
    }

    pub fn disable(&mut self, capability: Capability) {
        let changed = self.capabilities.contains(capability);
        if self.admit(changed) {
            trace!("disable {:?}", capability);
            self.driver.disable(capability);
            self.capabilities.remove(capability);
        }
    }

    /// Enables or disables `capability` depending on `enabled`.
    pub fn set_enabled(&mut self, capability: Capability, enabled: bool) {
        if enabled {
            self.enable(capability);
        } else {
            self.disable(capability);
        }
    }

    pub fn set_clear_color(&mut self, r: f32, g: f32, b: f32, a: f32) {
        let color = [r, g, b, a];
        let changed = self.clear_color != color;
        if self.admit(changed) {
            trace!("clear color {:?}", color);
            self.clear_color = color;
            self.driver.clear_color(color);
        }
    }

    pub fn set_viewport(&mut self, x: u32, y: u32, width: u32, height: u32) {
        let viewport = Viewport::new(x, y, width, height);
        let changed = self.viewport != viewport;
        if self.admit(changed) {
            trace!("viewport {:?}", viewport);
            self.driver.viewport(viewport);
            self.viewport = viewport;
        }
    }

    pub fn bind_framebuffer(&mut self, framebuffer: impl Into<Handle>) {
        let framebuffer = framebuffer.into();
        let changed = self.framebuffer != framebuffer;
        if self.admit(changed) {
            trace!("bind framebuffer {}", framebuffer);
            self.driver.bind_framebuffer(framebuffer);
            self.framebuffer = framebuffer;
        }
    }

    pub fn bind_vertex_array(&mut self, vertex_array: impl Into<Handle>) {
        let vertex_array = vertex_array.into();
        let changed = self.vertex_array != vertex_array;
        if self.admit(changed) {
            trace!("bind vertex array {}", vertex_array);
            self.driver.bind_vertex_array(vertex_array);
            self.vertex_array = vertex_array;
        }
    }

    pub fn bind_buffer(&mut self, target: BufferTarget, buffer: impl Into<Handle>) {
        let buffer = buffer.into();
        let slot = target.index();
        let changed = self.buffers[slot] != buffer;
        if self.admit(changed) {
            trace!("bind {:?} buffer {}", target, buffer);
            self.driver.bind_buffer(target, buffer);
            self.buffers[slot] = buffer;
        }
    }

    pub fn bind_pipeline(&mut self, pipeline: impl Into<Handle>) {
        let pipeline = pipeline.into();
        let changed = self.pipeline != pipeline;
        if self.admit(changed) {
            trace!("bind program pipeline {}", pipeline);
            self.driver.bind_program_pipeline(pipeline);
            self.pipeline = pipeline;
        }
    }

    pub fn set_color_mask(&mut self, red: bool, green: bool, blue: bool, alpha: bool) {
        self.set_color_mask_packed(WriteMask::from_color(red, green, blue, alpha));
    }

    /// Packed form of [`set_color_mask`](Self::set_color_mask). Only the color
    /// bits of `mask` are looked at.
    pub fn set_color_mask_packed(&mut self, mask: WriteMask) {
        let new = mask & WriteMask::COLOR;
        let old = self.write_mask & WriteMask::COLOR;
        if self.admit(old != new) {
            self.write_mask = self.write_mask.with_field(WriteMask::COLOR, new);

            let [r, g, b, a] = new.color_channels();
            trace!("color mask {:?}", [r, g, b, a]);
            self.driver.color_mask(r, g, b, a);
        }
    }

    pub fn set_depth_mask(&mut self, depth: bool) {
        let new = if depth {
            WriteMask::DEPTH
        } else {
            WriteMask::empty()
        };
        let old = self.write_mask & WriteMask::DEPTH;
        if self.admit(old != new) {
            self.write_mask = self.write_mask.with_field(WriteMask::DEPTH, new);

            trace!("depth mask {}", depth);
            self.driver.depth_mask(depth);
        }
    }

    pub fn bound_framebuffer(&self) -> Handle {
        self.framebuffer
    }

    pub fn bound_vertex_array(&self) -> Handle {
        self.vertex_array
    }

    pub fn bound_pipeline(&self) -> Handle {
        self.pipeline
    }

    pub fn bound_buffer(&self, target: BufferTarget) -> Handle {
        self.buffers[target.index()]
    }

    pub fn is_enabled(&self, capability: Capability) -> bool {
        self.capabilities.contains(capability)
    }

    pub fn capabilities(&self) -> CapabilitySet {
        self.capabilities
    }

    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    pub fn clear_color(&self) -> [f32; 4] {
        self.clear_color
    }

    pub fn write_mask(&self) -> WriteMask {
        self.write_mask
    }

    pub fn color_mask(&self) -> [bool; 4] {
        self.write_mask.color_channels()
    }

    pub fn depth_mask(&self) -> bool {
        self.write_mask.depth()
    }
}
