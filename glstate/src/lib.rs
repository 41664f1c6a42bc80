//! Ownership wrappers for GPU driver objects and a cache that filters
//! redundant context state changes.
//!
//! ```
//! use glstate::{Buffer, BufferTarget, BufferUsage, RecordingDriver, StateCache};
//!
//! let driver = RecordingDriver::new();
//! let mut cache = StateCache::new(&driver);
//!
//! let vertices = Buffer::create_mutable(&driver, BufferTarget::Array, 64, BufferUsage::StaticDraw, None);
//! vertices.bind(&mut cache);
//! vertices.bind(&mut cache);
//!
//! assert_eq!(cache.stats().suppressed, 1);
//! ```

pub mod driver;
pub mod handle;
pub mod resource;
pub mod state;
pub mod types;

pub use driver::{Driver, DriverCall, ObjectKind, RecordingDriver};
pub use handle::Handle;
pub use resource::{
    Buffer, BufferDescription, BufferMode, Framebuffer, FramebufferError, FramebufferStatus,
    OwnedHandle, ProgramPipeline, Resource, VertexArray,
};
pub use state::{CacheStats, StateCache, StateCacheOptions, Viewport, WriteMask};
pub use types::*;

pub use ::glstate_utils::GlArgs;
pub use ::tracing;
