use crate::driver::{Driver, ObjectKind};
use crate::handle::Handle;
use crate::state::Viewport;
use crate::types::{
    Attachment, BufferStorageFlags, BufferTarget, BufferUsage, Capability, DataType, MapAccess,
    MapRangeAccess, ShaderStages,
};
use std::cell::RefCell;
use std::collections::HashMap;
use std::ptr::NonNull;

const FRAMEBUFFER_COMPLETE: u32 = 0x8CD5;

/// One native call as seen by a [`RecordingDriver`].
#[derive(Debug, Clone, PartialEq)]
pub enum DriverCall {
    Create {
        kind: ObjectKind,
        handle: Handle,
    },
    Delete {
        kind: ObjectKind,
        handle: Handle,
    },
    BufferData {
        buffer: Handle,
        size: usize,
        usage: BufferUsage,
    },
    BufferStorage {
        buffer: Handle,
        size: usize,
        flags: BufferStorageFlags,
    },
    BufferSubData {
        buffer: Handle,
        offset: usize,
        len: usize,
    },
    MapBuffer {
        buffer: Handle,
        access: MapAccess,
    },
    MapBufferRange {
        buffer: Handle,
        offset: usize,
        length: usize,
        access: MapRangeAccess,
    },
    UnmapBuffer {
        buffer: Handle,
    },
    FramebufferTexture {
        framebuffer: Handle,
        attachment: Attachment,
        texture: Handle,
        level: u32,
    },
    FramebufferTextureLayer {
        framebuffer: Handle,
        attachment: Attachment,
        texture: Handle,
        level: u32,
        layer: u32,
    },
    CheckFramebufferStatus {
        framebuffer: Handle,
    },
    FramebufferDrawBuffer {
        framebuffer: Handle,
        attachment: Attachment,
    },
    FramebufferDrawBuffers {
        framebuffer: Handle,
        attachments: Vec<Attachment>,
    },
    VertexArrayEnableAttrib {
        vertex_array: Handle,
        index: u32,
    },
    VertexArrayAttribFormat {
        vertex_array: Handle,
        index: u32,
        components: u32,
        data_type: DataType,
        normalized: bool,
        relative_offset: u32,
    },
    VertexArrayAttribBinding {
        vertex_array: Handle,
        index: u32,
        binding: u32,
    },
    VertexArrayVertexBuffer {
        vertex_array: Handle,
        binding: u32,
        buffer: Handle,
        offset: usize,
        stride: u32,
    },
    VertexArrayElementBuffer {
        vertex_array: Handle,
        buffer: Handle,
    },
    UseProgramStages {
        pipeline: Handle,
        stages: ShaderStages,
        program: Handle,
    },
    Enable(Capability),
    Disable(Capability),
    ClearColor([f32; 4]),
    Viewport(Viewport),
    BindFramebuffer(Handle),
    BindVertexArray(Handle),
    BindBuffer(BufferTarget, Handle),
    BindProgramPipeline(Handle),
    ColorMask([bool; 4]),
    DepthMask(bool),
}

impl DriverCall {
    /// Whether this call changes context state rather than an object.
    pub fn is_state_change(&self) -> bool {
        matches!(
            self,
            DriverCall::Enable(_)
                | DriverCall::Disable(_)
                | DriverCall::ClearColor(_)
                | DriverCall::Viewport(_)
                | DriverCall::BindFramebuffer(_)
                | DriverCall::BindVertexArray(_)
                | DriverCall::BindBuffer(..)
                | DriverCall::BindProgramPipeline(_)
                | DriverCall::ColorMask(_)
                | DriverCall::DepthMask(_)
        )
    }
}

#[derive(Debug, Default)]
struct BufferStore {
    data: Vec<u8>,
    immutable: Option<BufferStorageFlags>,
    mapped: bool,
}

impl BufferStore {
    fn allows(&self, read: bool, write: bool) -> bool {
        match self.immutable {
            None => true,
            Some(flags) => {
                (!read || flags.contains(BufferStorageFlags::MAP_READ))
                    && (!write || flags.contains(BufferStorageFlags::MAP_WRITE))
            }
        }
    }
}

#[derive(Debug)]
struct Recording {
    next_id: u32,
    calls: Vec<DriverCall>,
    live: HashMap<Handle, ObjectKind>,
    buffers: HashMap<Handle, BufferStore>,
    fail_allocations: bool,
    deny_mapping: bool,
    framebuffer_status: u32,
}

impl Default for Recording {
    fn default() -> Self {
        Self {
            next_id: 1,
            calls: Vec::new(),
            live: HashMap::new(),
            buffers: HashMap::new(),
            fail_allocations: false,
            deny_mapping: false,
            framebuffer_status: FRAMEBUFFER_COMPLETE,
        }
    }
}

/// In-memory [`Driver`] that records every call it receives.
///
/// Handles are handed out in increasing order and never reused. Buffer
/// storage lives in host memory, so mapped pointers are real and point into
/// the recorded contents.
#[derive(Debug, Default)]
pub struct RecordingDriver {
    inner: RefCell<Recording>,
}

impl RecordingDriver {
    pub fn new() -> Self {
        Self::default()
    }

    /// Makes every following allocation return [`Handle::NONE`].
    pub fn set_fail_allocations(&self, fail: bool) {
        self.inner.borrow_mut().fail_allocations = fail;
    }

    /// Makes every following map request fail.
    pub fn set_deny_mapping(&self, deny: bool) {
        self.inner.borrow_mut().deny_mapping = deny;
    }

    /// Status code reported by `check_framebuffer_status`.
    pub fn set_framebuffer_status(&self, status: u32) {
        self.inner.borrow_mut().framebuffer_status = status;
    }

    pub fn calls(&self) -> Vec<DriverCall> {
        self.inner.borrow().calls.clone()
    }

    pub fn take_calls(&self) -> Vec<DriverCall> {
        std::mem::take(&mut self.inner.borrow_mut().calls)
    }

    pub fn clear_calls(&self) {
        self.inner.borrow_mut().calls.clear();
    }

    pub fn call_count(&self) -> usize {
        self.inner.borrow().calls.len()
    }

    pub fn count_calls(&self, predicate: impl Fn(&DriverCall) -> bool) -> usize {
        self.inner
            .borrow()
            .calls
            .iter()
            .filter(|c| predicate(*c))
            .count()
    }

    pub fn last_call(&self) -> Option<DriverCall> {
        self.inner.borrow().calls.last().cloned()
    }

    pub fn live_objects(&self) -> usize {
        self.inner.borrow().live.len()
    }

    pub fn is_live(&self, handle: Handle) -> bool {
        self.inner.borrow().live.contains_key(&handle)
    }

    pub fn buffer_contents(&self, buffer: Handle) -> Option<Vec<u8>> {
        self.inner
            .borrow()
            .buffers
            .get(&buffer)
            .map(|store| store.data.clone())
    }

    pub fn is_mapped(&self, buffer: Handle) -> bool {
        self.inner
            .borrow()
            .buffers
            .get(&buffer)
            .is_some_and(|store| store.mapped)
    }

    fn record(&self, call: DriverCall) {
        self.inner.borrow_mut().calls.push(call);
    }

    fn specify_buffer(
        &self,
        buffer: Handle,
        size: usize,
        data: Option<&[u8]>,
        immutable: Option<BufferStorageFlags>,
    ) {
        let mut inner = self.inner.borrow_mut();
        if inner.live.get(&buffer) != Some(&ObjectKind::Buffer) {
            return;
        }

        let store = inner.buffers.entry(buffer).or_default();
        if store.immutable.is_some() || store.mapped {
            return;
        }

        let mut contents = vec![0; size];
        if let Some(data) = data {
            let len = data.len().min(size);
            contents[..len].copy_from_slice(&data[..len]);
        }
        store.data = contents;
        store.immutable = immutable;
    }

    fn map_range(
        &self,
        buffer: Handle,
        offset: usize,
        length: usize,
        read: bool,
        write: bool,
    ) -> Option<NonNull<u8>> {
        let mut inner = self.inner.borrow_mut();
        if inner.deny_mapping || length == 0 {
            return None;
        }

        let store = inner.buffers.get_mut(&buffer)?;
        let end = offset.checked_add(length)?;
        if store.mapped || end > store.data.len() || !store.allows(read, write) {
            return None;
        }

        store.mapped = true;
        NonNull::new(store.data[offset..end].as_mut_ptr())
    }
}

impl Driver for RecordingDriver {
    fn create_object(&self, kind: ObjectKind) -> Handle {
        let handle = {
            let mut inner = self.inner.borrow_mut();
            if inner.fail_allocations {
                Handle::NONE
            } else {
                let handle = Handle::new(inner.next_id);
                inner.next_id += 1;
                inner.live.insert(handle, kind);
                handle
            }
        };

        self.record(DriverCall::Create { kind, handle });
        handle
    }

    fn delete_object(&self, kind: ObjectKind, handle: Handle) {
        {
            let mut inner = self.inner.borrow_mut();
            if inner.live.get(&handle) == Some(&kind) {
                inner.live.remove(&handle);
                inner.buffers.remove(&handle);
            }
        }

        self.record(DriverCall::Delete { kind, handle });
    }

    fn buffer_data(&self, buffer: Handle, size: usize, data: Option<&[u8]>, usage: BufferUsage) {
        self.specify_buffer(buffer, size, data, None);
        self.record(DriverCall::BufferData {
            buffer,
            size,
            usage,
        });
    }

    fn buffer_storage(
        &self,
        buffer: Handle,
        size: usize,
        data: Option<&[u8]>,
        flags: BufferStorageFlags,
    ) {
        self.specify_buffer(buffer, size, data, Some(flags));
        self.record(DriverCall::BufferStorage {
            buffer,
            size,
            flags,
        });
    }

    fn buffer_sub_data(&self, buffer: Handle, offset: usize, data: &[u8]) {
        {
            let mut inner = self.inner.borrow_mut();
            if let Some(store) = inner.buffers.get_mut(&buffer) {
                let dynamic = store
                    .immutable
                    .is_none_or(|flags| flags.contains(BufferStorageFlags::DYNAMIC_STORAGE));
                let end = offset.saturating_add(data.len());
                if dynamic && !store.mapped && end <= store.data.len() {
                    store.data[offset..end].copy_from_slice(data);
                }
            }
        }

        self.record(DriverCall::BufferSubData {
            buffer,
            offset,
            len: data.len(),
        });
    }

    fn map_buffer(&self, buffer: Handle, access: MapAccess) -> Option<NonNull<u8>> {
        self.record(DriverCall::MapBuffer { buffer, access });
        let len = self
            .inner
            .borrow()
            .buffers
            .get(&buffer)
            .map_or(0, |store| store.data.len());
        self.map_range(buffer, 0, len, access.reads(), access.writes())
    }

    fn map_buffer_range(
        &self,
        buffer: Handle,
        offset: usize,
        length: usize,
        access: MapRangeAccess,
    ) -> Option<NonNull<u8>> {
        self.record(DriverCall::MapBufferRange {
            buffer,
            offset,
            length,
            access,
        });
        self.map_range(
            buffer,
            offset,
            length,
            access.contains(MapRangeAccess::READ),
            access.contains(MapRangeAccess::WRITE),
        )
    }

    fn unmap_buffer(&self, buffer: Handle) -> bool {
        self.record(DriverCall::UnmapBuffer { buffer });
        let mut inner = self.inner.borrow_mut();
        match inner.buffers.get_mut(&buffer) {
            Some(store) if store.mapped => {
                store.mapped = false;
                true
            }
            _ => false,
        }
    }

    fn framebuffer_texture(
        &self,
        framebuffer: Handle,
        attachment: Attachment,
        texture: Handle,
        level: u32,
    ) {
        self.record(DriverCall::FramebufferTexture {
            framebuffer,
            attachment,
            texture,
            level,
        });
    }

    fn framebuffer_texture_layer(
        &self,
        framebuffer: Handle,
        attachment: Attachment,
        texture: Handle,
        level: u32,
        layer: u32,
    ) {
        self.record(DriverCall::FramebufferTextureLayer {
            framebuffer,
            attachment,
            texture,
            level,
            layer,
        });
    }

    fn check_framebuffer_status(&self, framebuffer: Handle) -> u32 {
        self.record(DriverCall::CheckFramebufferStatus { framebuffer });
        self.inner.borrow().framebuffer_status
    }

    fn framebuffer_draw_buffer(&self, framebuffer: Handle, attachment: Attachment) {
        self.record(DriverCall::FramebufferDrawBuffer {
            framebuffer,
            attachment,
        });
    }

    fn framebuffer_draw_buffers(&self, framebuffer: Handle, attachments: &[Attachment]) {
        self.record(DriverCall::FramebufferDrawBuffers {
            framebuffer,
            attachments: attachments.to_vec(),
        });
    }

    fn vertex_array_enable_attrib(&self, vertex_array: Handle, index: u32) {
        self.record(DriverCall::VertexArrayEnableAttrib {
            vertex_array,
            index,
        });
    }

    fn vertex_array_attrib_format(
        &self,
        vertex_array: Handle,
        index: u32,
        components: u32,
        data_type: DataType,
        normalized: bool,
        relative_offset: u32,
    ) {
        self.record(DriverCall::VertexArrayAttribFormat {
            vertex_array,
            index,
            components,
            data_type,
            normalized,
            relative_offset,
        });
    }

    fn vertex_array_attrib_binding(&self, vertex_array: Handle, index: u32, binding: u32) {
        self.record(DriverCall::VertexArrayAttribBinding {
            vertex_array,
            index,
            binding,
        });
    }

    fn vertex_array_vertex_buffer(
        &self,
        vertex_array: Handle,
        binding: u32,
        buffer: Handle,
        offset: usize,
        stride: u32,
    ) {
        self.record(DriverCall::VertexArrayVertexBuffer {
            vertex_array,
            binding,
            buffer,
            offset,
            stride,
        });
    }

    fn vertex_array_element_buffer(&self, vertex_array: Handle, buffer: Handle) {
        self.record(DriverCall::VertexArrayElementBuffer {
            vertex_array,
            buffer,
        });
    }

    fn use_program_stages(&self, pipeline: Handle, stages: ShaderStages, program: Handle) {
        self.record(DriverCall::UseProgramStages {
            pipeline,
            stages,
            program,
        });
    }

    fn enable(&self, capability: Capability) {
        self.record(DriverCall::Enable(capability));
    }

    fn disable(&self, capability: Capability) {
        self.record(DriverCall::Disable(capability));
    }

    fn clear_color(&self, color: [f32; 4]) {
        self.record(DriverCall::ClearColor(color));
    }

    fn viewport(&self, viewport: Viewport) {
        self.record(DriverCall::Viewport(viewport));
    }

    fn bind_framebuffer(&self, framebuffer: Handle) {
        self.record(DriverCall::BindFramebuffer(framebuffer));
    }

    fn bind_vertex_array(&self, vertex_array: Handle) {
        self.record(DriverCall::BindVertexArray(vertex_array));
    }

    fn bind_buffer(&self, target: BufferTarget, buffer: Handle) {
        self.record(DriverCall::BindBuffer(target, buffer));
    }

    fn bind_program_pipeline(&self, pipeline: Handle) {
        self.record(DriverCall::BindProgramPipeline(pipeline));
    }

    fn color_mask(&self, red: bool, green: bool, blue: bool, alpha: bool) {
        self.record(DriverCall::ColorMask([red, green, blue, alpha]));
    }

    fn depth_mask(&self, depth: bool) {
        self.record(DriverCall::DepthMask(depth));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hands_out_fresh_handles() {
        let driver = RecordingDriver::new();
        let a = driver.create_object(ObjectKind::Buffer);
        let b = driver.create_object(ObjectKind::Framebuffer);
        driver.delete_object(ObjectKind::Buffer, a);
        let c = driver.create_object(ObjectKind::Buffer);

        assert!(a.is_valid() && b.is_valid() && c.is_valid());
        assert_ne!(a, c);
        assert_eq!(driver.live_objects(), 2);
        assert!(!driver.is_live(a));
    }

    #[test]
    fn failed_allocation_returns_sentinel() {
        let driver = RecordingDriver::new();
        driver.set_fail_allocations(true);
        assert_eq!(driver.create_object(ObjectKind::VertexArray), Handle::NONE);
        assert_eq!(driver.live_objects(), 0);
        assert_eq!(
            driver.last_call(),
            Some(DriverCall::Create {
                kind: ObjectKind::VertexArray,
                handle: Handle::NONE
            })
        );
    }

    #[test]
    fn immutable_storage_respects_map_flags() {
        let driver = RecordingDriver::new();
        let buffer = driver.create_object(ObjectKind::Buffer);
        driver.buffer_storage(buffer, 8, None, BufferStorageFlags::MAP_READ);

        assert!(driver.map_buffer(buffer, MapAccess::WriteOnly).is_none());
        assert!(driver.map_buffer(buffer, MapAccess::ReadOnly).is_some());
        assert!(driver.is_mapped(buffer));
        assert!(driver.map_buffer(buffer, MapAccess::ReadOnly).is_none());
        assert!(driver.unmap_buffer(buffer));
        assert!(!driver.unmap_buffer(buffer));
    }

    #[test]
    fn sub_data_writes_into_store() {
        let driver = RecordingDriver::new();
        let buffer = driver.create_object(ObjectKind::Buffer);
        driver.buffer_data(buffer, 4, Some(&[1, 2, 3, 4][..]), BufferUsage::DynamicDraw);
        driver.buffer_sub_data(buffer, 2, &[9, 9]);
        assert_eq!(driver.buffer_contents(buffer), Some(vec![1, 2, 9, 9]));

        // out of range writes are dropped like the native call would
        driver.buffer_sub_data(buffer, 3, &[7, 7]);
        assert_eq!(driver.buffer_contents(buffer), Some(vec![1, 2, 9, 9]));
    }
}
