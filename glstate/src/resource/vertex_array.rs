use crate::driver::{Driver, ObjectKind};
use crate::handle::Handle;
use crate::resource::{OwnedHandle, Resource};
use crate::state::StateCache;
use crate::types::DataType;

/// A vertex array object. Attribute setup uses direct state access and
/// doesn't touch the bound vertex array.
#[derive(Debug)]
pub struct VertexArray<'d> {
    owned: OwnedHandle<'d>,
}

impl<'d> VertexArray<'d> {
    pub fn new(driver: &'d dyn Driver) -> Self {
        Self {
            owned: OwnedHandle::empty(driver, ObjectKind::VertexArray),
        }
    }

    pub fn allocated(driver: &'d dyn Driver) -> Self {
        let mut vertex_array = Self::new(driver);
        vertex_array.create(());
        vertex_array
    }

    pub fn take(&mut self) -> Self {
        Self {
            owned: self.owned.take(),
        }
    }

    pub fn bind(&self, cache: &mut StateCache<'_>) {
        cache.bind_vertex_array(self);
    }

    pub fn enable_attrib(&self, index: u32) {
        self.owned
            .driver()
            .vertex_array_enable_attrib(self.handle(), index);
    }

    /// Describes attribute `index` as `components` values of `data_type`,
    /// `relative_offset` bytes into each vertex.
    pub fn attrib_format(
        &self,
        index: u32,
        components: u32,
        data_type: DataType,
        normalized: bool,
        relative_offset: u32,
    ) {
        self.owned.driver().vertex_array_attrib_format(
            self.handle(),
            index,
            components,
            data_type,
            normalized,
            relative_offset,
        );
    }

    pub fn attrib_binding(&self, index: u32, binding: u32) {
        self.owned
            .driver()
            .vertex_array_attrib_binding(self.handle(), index, binding);
    }

    pub fn vertex_buffer(
        &self,
        binding: u32,
        buffer: impl Into<Handle>,
        offset: usize,
        stride: u32,
    ) {
        self.owned.driver().vertex_array_vertex_buffer(
            self.handle(),
            binding,
            buffer.into(),
            offset,
            stride,
        );
    }

    pub fn element_buffer(&self, buffer: impl Into<Handle>) {
        self.owned
            .driver()
            .vertex_array_element_buffer(self.handle(), buffer.into());
    }
}

impl Resource for VertexArray<'_> {
    type Description<'a> = ();

    const KIND: ObjectKind = ObjectKind::VertexArray;

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

impl From<&VertexArray<'_>> for Handle {
    fn from(vertex_array: &VertexArray<'_>) -> Self {
        vertex_array.handle()
    }
}
