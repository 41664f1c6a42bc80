//! The boundary to the native graphics API.
//!
//! A [`Driver`] is one current graphics context. Every method maps onto exactly
//! one native call, named after the OpenGL 4.5 direct state access entry point
//! it stands for. Implementations are thread affine: the context has to be
//! current on the calling thread for every call, which is why the trait takes
//! `&self` and asks for neither `Send` nor `Sync`.
//!
//! Resources and the [`StateCache`](crate::StateCache) only ever talk to the
//! driver through this trait. [`RecordingDriver`] is an in-memory
//! implementation that logs every call, for headless use and tests.

pub mod recording;

pub use recording::{DriverCall, RecordingDriver};

use crate::handle::Handle;
use crate::state::Viewport;
use crate::types::{
    Attachment, BufferStorageFlags, BufferTarget, BufferUsage, Capability, DataType, MapAccess,
    MapRangeAccess, ShaderStages,
};
use std::fmt::{Display, Formatter};
use std::ptr::NonNull;

/// Kind of driver object a [`Handle`] names.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum ObjectKind {
    Buffer,
    Framebuffer,
    VertexArray,
    ProgramPipeline,
}

impl Display for ObjectKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            ObjectKind::Buffer => "buffer",
            ObjectKind::Framebuffer => "framebuffer",
            ObjectKind::VertexArray => "vertex array",
            ObjectKind::ProgramPipeline => "program pipeline",
        };
        f.write_str(name)
    }
}

pub trait Driver {
    /// `glCreate*`. Returns [`Handle::NONE`] if the driver could not allocate.
    fn create_object(&self, kind: ObjectKind) -> Handle;
    /// `glDelete*`
    fn delete_object(&self, kind: ObjectKind, handle: Handle);

    // buffers

    /// `glNamedBufferData`
    fn buffer_data(&self, buffer: Handle, size: usize, data: Option<&[u8]>, usage: BufferUsage);
    /// `glNamedBufferStorage`
    fn buffer_storage(
        &self,
        buffer: Handle,
        size: usize,
        data: Option<&[u8]>,
        flags: BufferStorageFlags,
    );
    /// `glNamedBufferSubData`
    fn buffer_sub_data(&self, buffer: Handle, offset: usize, data: &[u8]);
    /// `glMapNamedBuffer`, `None` if the mapping is refused.
    fn map_buffer(&self, buffer: Handle, access: MapAccess) -> Option<NonNull<u8>>;
    /// `glMapNamedBufferRange`, `None` if the mapping is refused.
    fn map_buffer_range(
        &self,
        buffer: Handle,
        offset: usize,
        length: usize,
        access: MapRangeAccess,
    ) -> Option<NonNull<u8>>;
    /// `glUnmapNamedBuffer`, `false` if the store got corrupted while mapped.
    fn unmap_buffer(&self, buffer: Handle) -> bool;

    // framebuffers

    /// `glNamedFramebufferTexture`
    fn framebuffer_texture(
        &self,
        framebuffer: Handle,
        attachment: Attachment,
        texture: Handle,
        level: u32,
    );
    /// `glNamedFramebufferTextureLayer`
    fn framebuffer_texture_layer(
        &self,
        framebuffer: Handle,
        attachment: Attachment,
        texture: Handle,
        level: u32,
        layer: u32,
    );
    /// `glCheckNamedFramebufferStatus`
    fn check_framebuffer_status(&self, framebuffer: Handle) -> u32;
    /// `glNamedFramebufferDrawBuffer`
    fn framebuffer_draw_buffer(&self, framebuffer: Handle, attachment: Attachment);
    /// `glNamedFramebufferDrawBuffers`
    fn framebuffer_draw_buffers(&self, framebuffer: Handle, attachments: &[Attachment]);

    // vertex arrays

    /// `glEnableVertexArrayAttrib`
    fn vertex_array_enable_attrib(&self, vertex_array: Handle, index: u32);
    /// `glVertexArrayAttribFormat`
    fn vertex_array_attrib_format(
        &self,
        vertex_array: Handle,
        index: u32,
        components: u32,
        data_type: DataType,
        normalized: bool,
        relative_offset: u32,
    );
    /// `glVertexArrayAttribBinding`
    fn vertex_array_attrib_binding(&self, vertex_array: Handle, index: u32, binding: u32);
    /// `glVertexArrayVertexBuffer`
    fn vertex_array_vertex_buffer(
        &self,
        vertex_array: Handle,
        binding: u32,
        buffer: Handle,
        offset: usize,
        stride: u32,
    );
    /// `glVertexArrayElementBuffer`
    fn vertex_array_element_buffer(&self, vertex_array: Handle, buffer: Handle);

    // program pipelines

    /// `glUseProgramStages`
    fn use_program_stages(&self, pipeline: Handle, stages: ShaderStages, program: Handle);

    // context state

    /// `glEnable`
    fn enable(&self, capability: Capability);
    /// `glDisable`
    fn disable(&self, capability: Capability);
    /// `glClearColor`
    fn clear_color(&self, color: [f32; 4]);
    /// `glViewport`
    fn viewport(&self, viewport: Viewport);
    /// `glBindFramebuffer(GL_FRAMEBUFFER, ..)`
    fn bind_framebuffer(&self, framebuffer: Handle);
    /// `glBindVertexArray`
    fn bind_vertex_array(&self, vertex_array: Handle);
    /// `glBindBuffer`
    fn bind_buffer(&self, target: BufferTarget, buffer: Handle);
    /// `glBindProgramPipeline`
    fn bind_program_pipeline(&self, pipeline: Handle);
    /// `glColorMask`
    fn color_mask(&self, red: bool, green: bool, blue: bool, alpha: bool);
    /// `glDepthMask`
    fn depth_mask(&self, depth: bool);
}
