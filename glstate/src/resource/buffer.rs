use crate::driver::{Driver, ObjectKind};
use crate::handle::Handle;
use crate::resource::{OwnedHandle, Resource};
use crate::state::StateCache;
use crate::types::{BufferStorageFlags, BufferTarget, BufferUsage, MapAccess, MapRangeAccess};
use bon::Builder;
use glstate_utils::debug_panic;
use std::ptr::NonNull;
use tracing::debug;

/// How the storage of a buffer is specified.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum BufferMode {
    /// `glNamedBufferData`: can be respecified later, with a usage hint.
    Mutable(BufferUsage),
    /// `glNamedBufferStorage`: fixed size, with storage flags.
    Immutable(BufferStorageFlags),
}

#[derive(Debug, Copy, Clone, Builder)]
pub struct BufferDescription<'a> {
    pub buffer_type: BufferTarget,
    pub size: usize,
    /// Initial contents. The storage is left uninitialized without it. Must
    /// hold at least `size` bytes, or the buffer stays empty.
    pub data: Option<&'a [u8]>,
    #[builder(default = BufferMode::Mutable(BufferUsage::StaticDraw))]
    pub mode: BufferMode,
}

impl<'a> BufferDescription<'a> {
    pub fn mutable(buffer_type: BufferTarget, size: usize, usage: BufferUsage) -> Self {
        Self {
            buffer_type,
            size,
            data: None,
            mode: BufferMode::Mutable(usage),
        }
    }

    pub fn immutable(buffer_type: BufferTarget, size: usize, flags: BufferStorageFlags) -> Self {
        Self {
            buffer_type,
            size,
            data: None,
            mode: BufferMode::Immutable(flags),
        }
    }

    pub fn with_data(mut self, data: &'a [u8]) -> Self {
        self.data = Some(data);
        self
    }
}

/// A buffer object together with the target it was created for.
#[derive(Debug)]
pub struct Buffer<'d> {
    owned: OwnedHandle<'d>,
    buffer_type: BufferTarget,
    size: usize,
}

impl<'d> Buffer<'d> {
    /// An empty buffer. Nothing is allocated until [`Resource::create`].
    pub fn new(driver: &'d dyn Driver) -> Self {
        Self {
            owned: OwnedHandle::empty(driver, ObjectKind::Buffer),
            buffer_type: BufferTarget::Array,
            size: 0,
        }
    }

    pub fn with_description(driver: &'d dyn Driver, desc: BufferDescription<'_>) -> Self {
        let mut buffer = Self::new(driver);
        buffer.create(desc);
        buffer
    }

    pub fn create_mutable(
        driver: &'d dyn Driver,
        buffer_type: BufferTarget,
        size: usize,
        usage: BufferUsage,
        data: Option<&[u8]>,
    ) -> Self {
        let desc = BufferDescription {
            data,
            ..BufferDescription::mutable(buffer_type, size, usage)
        };
        Self::with_description(driver, desc)
    }

    pub fn create_immutable(
        driver: &'d dyn Driver,
        buffer_type: BufferTarget,
        size: usize,
        flags: BufferStorageFlags,
        data: Option<&[u8]>,
    ) -> Self {
        let desc = BufferDescription {
            data,
            ..BufferDescription::immutable(buffer_type, size, flags)
        };
        Self::with_description(driver, desc)
    }

    /// Moves the buffer out, leaving this one empty.
    pub fn take(&mut self) -> Self {
        let size = std::mem::take(&mut self.size);
        Self {
            owned: self.owned.take(),
            buffer_type: self.buffer_type,
            size,
        }
    }

    /// Native target enum of [`buffer_type`](Self::buffer_type).
    #[inline]
    pub fn target(&self) -> u32 {
        self.buffer_type.native()
    }

    #[inline]
    pub fn buffer_type(&self) -> BufferTarget {
        self.buffer_type
    }

    #[inline]
    pub fn size(&self) -> usize {
        self.size
    }

    /// Binds this buffer to its own target.
    pub fn bind(&self, cache: &mut StateCache<'_>) {
        cache.bind_buffer(self.buffer_type, self);
    }

    /// Maps the whole buffer. `None` if the driver refuses.
    pub fn map(&self, access: MapAccess) -> Option<NonNull<u8>> {
        if self.buffer_type == BufferTarget::Parameter {
            debug_panic!("Parameter buffer {} cannot be mapped", self.handle());
            return None;
        }

        let ptr = self.owned.driver().map_buffer(self.handle(), access);
        if ptr.is_none() {
            debug!("Driver denied {:?} mapping of buffer {}", access, self.handle());
        }
        ptr
    }

    /// Maps `length` bytes starting at `offset`. `None` if the driver refuses.
    pub fn map_range(
        &self,
        offset: usize,
        length: usize,
        access: MapRangeAccess,
    ) -> Option<NonNull<u8>> {
        if self.buffer_type == BufferTarget::Parameter {
            debug_panic!("Parameter buffer {} cannot be mapped", self.handle());
            return None;
        }

        let ptr = self
            .owned
            .driver()
            .map_buffer_range(self.handle(), offset, length, access);
        if ptr.is_none() {
            debug!(
                "Driver denied mapping {}..{} of buffer {}",
                offset,
                offset.saturating_add(length),
                self.handle()
            );
        }
        ptr
    }

    /// Returns `false` if the contents got lost while mapped.
    pub fn unmap(&self) -> bool {
        self.owned.driver().unmap_buffer(self.handle())
    }

    /// Overwrites part of the storage with `data`.
    pub fn sub_data(&self, offset: usize, data: &[u8]) {
        self.owned
            .driver()
            .buffer_sub_data(self.handle(), offset, data);
    }

    /// [`sub_data`](Self::sub_data) for plain data records, such as indirect
    /// draw commands.
    pub fn write<T: bytemuck::Pod>(&self, offset: usize, values: &[T]) {
        self.sub_data(offset, bytemuck::cast_slice(values));
    }
}

impl Resource for Buffer<'_> {
    type Description<'a> = BufferDescription<'a>;

    const KIND: ObjectKind = ObjectKind::Buffer;

    fn create(&mut self, desc: BufferDescription<'_>) {
        if self.owned.is_valid() {
            return;
        }

        self.buffer_type = desc.buffer_type;
        let data_len = desc.data.map(<[u8]>::len);
        if let Some(len) = data_len.filter(|len| *len < desc.size) {
            debug_panic!(
                "Initial data of {} bytes is shorter than the buffer size of {}",
                len,
                desc.size
            );
            return;
        }

        if !self.owned.allocate() {
            return;
        }

        let driver = self.owned.driver();
        let handle = self.owned.handle();
        match desc.mode {
            BufferMode::Mutable(usage) => driver.buffer_data(handle, desc.size, desc.data, usage),
            BufferMode::Immutable(flags) => {
                driver.buffer_storage(handle, desc.size, desc.data, flags)
            }
        }
        self.size = desc.size;
    }

    fn destroy(&mut self) {
        self.owned.release();
        self.size = 0;
    }

    #[inline]
    fn handle(&self) -> Handle {
        self.owned.handle()
    }
}

impl From<&Buffer<'_>> for Handle {
    fn from(buffer: &Buffer<'_>) -> Self {
        buffer.handle()
    }
}
