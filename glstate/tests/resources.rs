use glstate::{
    Attachment, Buffer, BufferDescription, BufferMode, BufferStorageFlags, BufferTarget,
    BufferUsage, DataType, DrawArraysIndirectCommand, DriverCall, Framebuffer, FramebufferError,
    FramebufferStatus, Handle, MapAccess, MapRangeAccess, ObjectKind, ProgramPipeline,
    RecordingDriver, Resource, ShaderStages, StateCache, VertexArray,
};

fn creates(driver: &RecordingDriver, kind: ObjectKind) -> usize {
    driver.count_calls(|c| matches!(c, DriverCall::Create { kind: k, .. } if *k == kind))
}

fn deletes(driver: &RecordingDriver, handle: Handle) -> usize {
    driver.count_calls(|c| matches!(c, DriverCall::Delete { handle: h, .. } if *h == handle))
}

#[test]
fn test_create_allocates_once() {
    let driver = RecordingDriver::new();
    let mut framebuffer = Framebuffer::new(&driver);
    assert!(!framebuffer.is_valid());

    framebuffer.create(());
    let handle = framebuffer.handle();
    framebuffer.create(());

    assert!(framebuffer.is_valid());
    assert_eq!(framebuffer.handle(), handle);
    assert_eq!(creates(&driver, ObjectKind::Framebuffer), 1);
}

#[test]
fn test_create_after_destroy_gets_new_handle() {
    let driver = RecordingDriver::new();
    let mut vertex_array = VertexArray::allocated(&driver);
    let first = vertex_array.handle();

    vertex_array.destroy();
    assert!(!vertex_array.is_valid());
    assert!(!driver.is_live(first));

    vertex_array.create(());
    assert!(vertex_array.is_valid());
    assert_ne!(vertex_array.handle(), first);
    assert_eq!(driver.live_objects(), 1);
}

#[test]
fn test_destroy_is_idempotent() {
    let driver = RecordingDriver::new();
    let mut pipeline = ProgramPipeline::allocated(&driver);
    let handle = pipeline.handle();

    pipeline.destroy();
    pipeline.destroy();
    drop(pipeline);

    assert_eq!(deletes(&driver, handle), 1);
}

#[test]
fn test_destroy_on_empty_wrapper_does_nothing() {
    let driver = RecordingDriver::new();
    let mut buffer = Buffer::new(&driver);
    buffer.destroy();
    drop(buffer);

    assert_eq!(driver.call_count(), 0);
}

#[test]
fn test_drop_releases_handle() {
    let driver = RecordingDriver::new();
    let handle = {
        let framebuffer = Framebuffer::allocated(&driver);
        framebuffer.handle()
    };

    assert_eq!(deletes(&driver, handle), 1);
    assert_eq!(driver.live_objects(), 0);
}

#[test]
fn test_move_transfers_ownership() {
    let driver = RecordingDriver::new();
    let original = Buffer::create_mutable(
        &driver,
        BufferTarget::Uniform,
        32,
        BufferUsage::DynamicDraw,
        None,
    );
    let handle = original.handle();

    let moved = original;
    assert_eq!(moved.handle(), handle);
    assert_eq!(moved.buffer_type(), BufferTarget::Uniform);
    assert_eq!(deletes(&driver, handle), 0);

    drop(moved);
    assert_eq!(deletes(&driver, handle), 1);
}

#[test]
fn test_take_leaves_source_empty() {
    let driver = RecordingDriver::new();
    let mut source = Buffer::create_mutable(
        &driver,
        BufferTarget::ShaderStorage,
        16,
        BufferUsage::StaticDraw,
        None,
    );
    let handle = source.handle();

    let target = source.take();
    assert!(!source.is_valid());
    assert_eq!(source.size(), 0);
    assert_eq!(target.handle(), handle);
    assert_eq!(target.size(), 16);

    drop(source);
    assert_eq!(deletes(&driver, handle), 0);
    drop(target);
    assert_eq!(deletes(&driver, handle), 1);
}

#[test]
fn test_move_assign_releases_previous_handle() {
    let driver = RecordingDriver::new();
    let mut target = VertexArray::allocated(&driver);
    let old = target.handle();
    let source = VertexArray::allocated(&driver);
    let new = source.handle();

    target = source;

    assert_eq!(target.handle(), new);
    assert!(!driver.is_live(old));
    assert!(driver.is_live(new));
}

#[test]
fn test_failed_allocation_leaves_wrapper_empty() {
    let driver = RecordingDriver::new();
    driver.set_fail_allocations(true);

    let buffer = Buffer::create_mutable(&driver, BufferTarget::Array, 64, BufferUsage::StaticDraw, None);
    assert!(!buffer.is_valid());
    assert_eq!(buffer.size(), 0);
    assert_eq!(
        driver.count_calls(|c| matches!(c, DriverCall::BufferData { .. })),
        0
    );

    drop(buffer);
    assert_eq!(
        driver.count_calls(|c| matches!(c, DriverCall::Delete { .. })),
        0
    );
}

#[test]
fn test_buffer_create_sets_type_and_storage() {
    let driver = RecordingDriver::new();
    let data = [1u8, 2, 3, 4];
    let buffer = Buffer::create_mutable(
        &driver,
        BufferTarget::ElementArray,
        data.len(),
        BufferUsage::StaticDraw,
        Some(&data[..]),
    );

    assert_eq!(buffer.buffer_type(), BufferTarget::ElementArray);
    assert_eq!(buffer.target(), 0x8893);
    assert_eq!(buffer.size(), 4);
    assert_eq!(
        driver.last_call(),
        Some(DriverCall::BufferData {
            buffer: buffer.handle(),
            size: 4,
            usage: BufferUsage::StaticDraw,
        })
    );
    assert_eq!(driver.buffer_contents(buffer.handle()), Some(data.to_vec()));
}

#[test]
fn test_buffer_description_builder() {
    let driver = RecordingDriver::new();
    let desc = BufferDescription::builder()
        .buffer_type(BufferTarget::DrawIndirect)
        .size(48)
        .mode(BufferMode::Immutable(BufferStorageFlags::DYNAMIC_STORAGE))
        .build();

    let mut buffer = Buffer::new(&driver);
    buffer.create(desc);

    assert_eq!(buffer.buffer_type(), BufferTarget::DrawIndirect);
    assert_eq!(
        driver.last_call(),
        Some(DriverCall::BufferStorage {
            buffer: buffer.handle(),
            size: 48,
            flags: BufferStorageFlags::DYNAMIC_STORAGE,
        })
    );
}

#[test]
fn test_sub_data_updates_contents() {
    let driver = RecordingDriver::new();
    let buffer = Buffer::create_mutable(
        &driver,
        BufferTarget::Array,
        4,
        BufferUsage::DynamicDraw,
        Some(&[1, 2, 3, 4][..]),
    );

    buffer.sub_data(1, &[9, 9]);
    assert_eq!(driver.buffer_contents(buffer.handle()), Some(vec![1, 9, 9, 4]));
}

#[test]
fn test_sub_data_needs_dynamic_storage() {
    let driver = RecordingDriver::new();
    let buffer = Buffer::create_immutable(
        &driver,
        BufferTarget::Array,
        2,
        BufferStorageFlags::MAP_READ,
        Some(&[5, 6][..]),
    );

    buffer.sub_data(0, &[0, 0]);
    assert_eq!(driver.buffer_contents(buffer.handle()), Some(vec![5, 6]));
}

#[test]
fn test_write_indirect_commands() {
    let driver = RecordingDriver::new();
    let commands = [DrawArraysIndirectCommand {
        count: 3,
        instance_count: 1,
        first: 0,
        base_instance: 0,
    }];
    let buffer = Buffer::create_immutable(
        &driver,
        BufferTarget::DrawIndirect,
        size_of::<DrawArraysIndirectCommand>(),
        BufferStorageFlags::DYNAMIC_STORAGE,
        None,
    );

    buffer.write(0, &commands);

    let contents = driver.buffer_contents(buffer.handle()).unwrap();
    assert_eq!(contents, bytemuck::cast_slice::<_, u8>(&commands[..]));
}

#[test]
fn test_map_and_unmap() {
    let driver = RecordingDriver::new();
    let buffer = Buffer::create_mutable(&driver, BufferTarget::Array, 8, BufferUsage::StreamDraw, None);

    assert!(buffer.map(MapAccess::WriteOnly).is_some());
    assert!(driver.is_mapped(buffer.handle()));
    assert!(buffer.unmap());
    assert!(!buffer.unmap());

    assert!(buffer.map_range(2, 4, MapRangeAccess::READ_WRITE).is_some());
    assert!(buffer.unmap());
}

#[test]
#[cfg(debug_assertions)]
#[should_panic(expected = "shorter than the buffer size")]
fn test_short_initial_data_panics() {
    let driver = RecordingDriver::new();
    let _ = Buffer::create_mutable(
        &driver,
        BufferTarget::Array,
        4096,
        BufferUsage::StaticDraw,
        Some(&[1u8, 2][..]),
    );
}

#[test]
#[cfg(not(debug_assertions))]
fn test_short_initial_data_leaves_buffer_empty() {
    let driver = RecordingDriver::new();
    let buffer = Buffer::create_mutable(
        &driver,
        BufferTarget::Array,
        4096,
        BufferUsage::StaticDraw,
        Some(&[1u8, 2][..]),
    );

    assert!(!buffer.is_valid());
    assert_eq!(buffer.size(), 0);
    assert_eq!(driver.call_count(), 0);
}

#[test]
fn test_longer_initial_data_is_accepted() {
    let driver = RecordingDriver::new();
    let buffer = Buffer::create_immutable(
        &driver,
        BufferTarget::Uniform,
        2,
        BufferStorageFlags::MAP_READ,
        Some(&[3u8, 4, 5][..]),
    );

    assert!(buffer.is_valid());
    assert_eq!(driver.buffer_contents(buffer.handle()), Some(vec![3, 4]));
}

#[test]
fn test_map_denied_returns_none() {
    let driver = RecordingDriver::new();
    let buffer = Buffer::create_mutable(&driver, BufferTarget::Array, 8, BufferUsage::StreamDraw, None);
    driver.set_deny_mapping(true);

    assert!(buffer.map(MapAccess::ReadWrite).is_none());
    assert!(buffer.map_range(0, 8, MapRangeAccess::WRITE).is_none());
    assert!(!driver.is_mapped(buffer.handle()));
}

#[test]
fn test_immutable_map_respects_storage_flags() {
    let driver = RecordingDriver::new();
    let buffer = Buffer::create_immutable(
        &driver,
        BufferTarget::CopyRead,
        8,
        BufferStorageFlags::MAP_READ,
        None,
    );

    assert!(buffer.map(MapAccess::WriteOnly).is_none());
    assert!(buffer.map(MapAccess::ReadOnly).is_some());
}

#[test]
#[cfg(debug_assertions)]
#[should_panic(expected = "cannot be mapped")]
fn test_parameter_buffer_map_panics() {
    let driver = RecordingDriver::new();
    let buffer = Buffer::create_mutable(&driver, BufferTarget::Parameter, 4, BufferUsage::StaticDraw, None);
    let _ = buffer.map(MapAccess::ReadOnly);
}

#[test]
fn test_framebuffer_status() {
    let driver = RecordingDriver::new();
    let framebuffer = Framebuffer::allocated(&driver);

    assert_eq!(framebuffer.status().unwrap(), FramebufferStatus::Complete);

    driver.set_framebuffer_status(0x8CD6);
    assert_eq!(framebuffer.check_status(), 0x8CD6);
    assert_eq!(
        framebuffer.status().unwrap(),
        FramebufferStatus::IncompleteAttachment
    );

    driver.set_framebuffer_status(0);
    assert!(matches!(
        framebuffer.status(),
        Err(FramebufferError::UnknownStatus { code: 0 })
    ));
}

#[test]
fn test_framebuffer_attachments() {
    let driver = RecordingDriver::new();
    let framebuffer = Framebuffer::allocated(&driver);
    let texture = Handle::new(40);

    framebuffer.attach_texture(Attachment::Color0, texture, 0);
    framebuffer.attach_texture_layer(Attachment::Depth, texture, 0, 3);
    framebuffer.draw_buffers(&[Attachment::Color0, Attachment::Color1]);
    framebuffer.draw_buffer(Attachment::Color2);

    let calls = driver.take_calls();
    assert_eq!(
        &calls[1..],
        &[
            DriverCall::FramebufferTexture {
                framebuffer: framebuffer.handle(),
                attachment: Attachment::Color0,
                texture,
                level: 0,
            },
            DriverCall::FramebufferTextureLayer {
                framebuffer: framebuffer.handle(),
                attachment: Attachment::Depth,
                texture,
                level: 0,
                layer: 3,
            },
            DriverCall::FramebufferDrawBuffers {
                framebuffer: framebuffer.handle(),
                attachments: vec![Attachment::Color0, Attachment::Color1],
            },
            DriverCall::FramebufferDrawBuffer {
                framebuffer: framebuffer.handle(),
                attachment: Attachment::Color2,
            },
        ]
    );
}

#[test]
fn test_vertex_array_setup() {
    let driver = RecordingDriver::new();
    let vertices = Buffer::create_mutable(&driver, BufferTarget::Array, 96, BufferUsage::StaticDraw, None);
    let indices = Buffer::create_mutable(&driver, BufferTarget::ElementArray, 12, BufferUsage::StaticDraw, None);
    let vertex_array = VertexArray::allocated(&driver);
    driver.clear_calls();

    vertex_array.enable_attrib(0);
    vertex_array.attrib_format(0, 3, DataType::Float, false, 0);
    vertex_array.attrib_binding(0, 0);
    vertex_array.vertex_buffer(0, &vertices, 0, 12);
    vertex_array.element_buffer(&indices);

    assert_eq!(
        driver.last_call(),
        Some(DriverCall::VertexArrayElementBuffer {
            vertex_array: vertex_array.handle(),
            buffer: indices.handle(),
        })
    );
    assert_eq!(driver.call_count(), 5);
    assert!(driver.calls().iter().all(|c| !c.is_state_change()));
}

#[test]
fn test_program_pipeline_stages() {
    let driver = RecordingDriver::new();
    let mut pipeline = ProgramPipeline::allocated(&driver);
    let program = Handle::new(77);

    pipeline.use_stages(ShaderStages::VERTEX | ShaderStages::FRAGMENT, program);

    assert_eq!(
        driver.last_call(),
        Some(DriverCall::UseProgramStages {
            pipeline: pipeline.handle(),
            stages: ShaderStages::VERTEX | ShaderStages::FRAGMENT,
            program,
        })
    );
}

#[test]
fn test_resources_bind_through_cache() {
    let driver = RecordingDriver::new();
    let mut cache = StateCache::new(&driver);
    let framebuffer = Framebuffer::allocated(&driver);
    let pipeline = ProgramPipeline::allocated(&driver);
    let vertex_array = VertexArray::allocated(&driver);
    driver.clear_calls();

    framebuffer.bind(&mut cache);
    framebuffer.bind(&mut cache);
    pipeline.bind(&mut cache);
    vertex_array.bind(&mut cache);
    Framebuffer::bind_default(&mut cache);

    assert_eq!(
        driver.calls(),
        vec![
            DriverCall::BindFramebuffer(framebuffer.handle()),
            DriverCall::BindProgramPipeline(pipeline.handle()),
            DriverCall::BindVertexArray(vertex_array.handle()),
            DriverCall::BindFramebuffer(Handle::NONE),
        ]
    );
    assert_eq!(cache.bound_framebuffer(), Handle::NONE);
}
