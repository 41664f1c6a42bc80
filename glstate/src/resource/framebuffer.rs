use crate::driver::{Driver, ObjectKind};
use crate::handle::Handle;
use crate::resource::{OwnedHandle, Resource};
use crate::state::StateCache;
use crate::types::Attachment;
use num_enum::TryFromPrimitive;
use snafu::{OptionExt, Snafu};

#[derive(Debug, Snafu)]
pub enum FramebufferError {
    #[snafu(display("Driver reported unknown framebuffer status {code:#06x}"))]
    UnknownStatus { code: u32 },
}

/// Completeness as reported by `glCheckNamedFramebufferStatus`.
#[repr(u32)]
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash, TryFromPrimitive)]
pub enum FramebufferStatus {
    Complete = 0x8CD5,
    Undefined = 0x8219,
    IncompleteAttachment = 0x8CD6,
    MissingAttachment = 0x8CD7,
    IncompleteDrawBuffer = 0x8CDB,
    IncompleteReadBuffer = 0x8CDC,
    Unsupported = 0x8CDD,
    IncompleteMultisample = 0x8D56,
    IncompleteLayerTargets = 0x8DA8,
}

impl FramebufferStatus {
    pub fn from_code(code: u32) -> Result<Self, FramebufferError> {
        FramebufferStatus::try_from(code)
            .ok()
            .context(UnknownStatusSnafu { code })
    }

    pub fn is_complete(self) -> bool {
        self == FramebufferStatus::Complete
    }
}

/// A framebuffer object.
///
/// Attachment calls use direct state access and don't need the framebuffer
/// to be bound.
#[derive(Debug)]
pub struct Framebuffer<'d> {
    owned: OwnedHandle<'d>,
}

impl<'d> Framebuffer<'d> {
    pub fn new(driver: &'d dyn Driver) -> Self {
        Self {
            owned: OwnedHandle::empty(driver, ObjectKind::Framebuffer),
        }
    }

    /// A framebuffer with its handle already allocated, if the driver could.
    pub fn allocated(driver: &'d dyn Driver) -> Self {
        let mut framebuffer = Self::new(driver);
        framebuffer.create(());
        framebuffer
    }

    pub fn take(&mut self) -> Self {
        Self {
            owned: self.owned.take(),
        }
    }

    pub fn bind(&self, cache: &mut StateCache<'_>) {
        cache.bind_framebuffer(self);
    }

    /// Binds the default framebuffer of the context.
    pub fn bind_default(cache: &mut StateCache<'_>) {
        cache.bind_framebuffer(Handle::NONE);
    }

    pub fn attach_texture(&self, attachment: Attachment, texture: impl Into<Handle>, level: u32) {
        self.owned
            .driver()
            .framebuffer_texture(self.handle(), attachment, texture.into(), level);
    }

    pub fn attach_texture_layer(
        &self,
        attachment: Attachment,
        texture: impl Into<Handle>,
        level: u32,
        layer: u32,
    ) {
        self.owned.driver().framebuffer_texture_layer(
            self.handle(),
            attachment,
            texture.into(),
            level,
            layer,
        );
    }

    /// Raw status code from the driver.
    pub fn check_status(&self) -> u32 {
        self.owned.driver().check_framebuffer_status(self.handle())
    }

    pub fn status(&self) -> Result<FramebufferStatus, FramebufferError> {
        FramebufferStatus::from_code(self.check_status())
    }

    pub fn draw_buffer(&self, attachment: Attachment) {
        self.owned
            .driver()
            .framebuffer_draw_buffer(self.handle(), attachment);
    }

    pub fn draw_buffers(&self, attachments: &[Attachment]) {
        self.owned
            .driver()
            .framebuffer_draw_buffers(self.handle(), attachments);
    }
}

impl Resource for Framebuffer<'_> {
    type Description<'a> = ();

    const KIND: ObjectKind = ObjectKind::Framebuffer;

    fn create(&mut self, _desc: ()) {
        self.owned.allocate();
    }

    fn destroy(&mut self) {
        self.owned.release();
    }

    #[inline]
    fn handle(&self) -> Handle {
        self.owned.handle()
    }
}

impl From<&Framebuffer<'_>> for Handle {
    fn from(framebuffer: &Framebuffer<'_>) -> Self {
        framebuffer.handle()
    }
}
