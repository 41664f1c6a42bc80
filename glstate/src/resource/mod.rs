//! Move-only wrappers around driver objects.
//!
//! Every wrapper owns at most one [`Handle`]. A wrapper starts out empty,
//! allocates its handle on `create` and gives it back on `destroy` or when it
//! goes out of scope. Rust moves already transfer ownership without running
//! the destructor on the source. [`OwnedHandle::take`] covers the case where
//! the source has to stay usable and end up empty.
//!
//! Operations other than create and destroy are forwarded to the driver
//! without checking for an empty handle. Calling them on an empty wrapper is a
//! caller bug, and the driver decides what happens.

mod buffer;
mod framebuffer;
mod owned;
mod program_pipeline;
mod vertex_array;

pub use buffer::{Buffer, BufferDescription, BufferMode};
pub use framebuffer::{Framebuffer, FramebufferError, FramebufferStatus};
pub use owned::OwnedHandle;
pub use program_pipeline::ProgramPipeline;
pub use vertex_array::VertexArray;

use crate::driver::ObjectKind;
use crate::handle::Handle;

/// Shared surface of the driver object wrappers.
pub trait Resource {
    /// What `create` needs besides the driver. `()` for most kinds.
    type Description<'a>;

    const KIND: ObjectKind;

    /// Allocates a handle if the wrapper is empty, otherwise does nothing.
    ///
    /// If the driver can't allocate, the wrapper stays empty and
    /// [`is_valid`](Resource::is_valid) keeps returning `false`.
    fn create(&mut self, desc: Self::Description<'_>);

    /// Releases the handle. Does nothing on an empty wrapper.
    fn destroy(&mut self);

    fn handle(&self) -> Handle;

    #[inline]
    fn is_valid(&self) -> bool {
        self.handle().is_valid()
    }
}
