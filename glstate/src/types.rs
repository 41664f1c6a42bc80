//! Driver facing enumerations and their native constant tables.
//!
//! The enums in here are what the rest of the crate speaks. Drivers translate
//! them with the `native()` accessors, which return the values the OpenGL 4.5
//! API expects.

use bitflags::bitflags;
use num_enum::TryFromPrimitive;
use static_assertions::{const_assert, const_assert_eq};

/// Binding point of a buffer object.
#[repr(u8)]
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash, TryFromPrimitive)]
pub enum BufferTarget {
    Array,
    AtomicCounter,
    CopyRead,
    CopyWrite,
    DrawIndirect,
    DispatchIndirect,
    ElementArray,
    PixelPack,
    PixelUnpack,
    Query,
    ShaderStorage,
    TextureBuffer,
    TransformFeedback,
    Uniform,
    Parameter,
}

impl BufferTarget {
    pub const COUNT: usize = 15;

    pub const ALL: [BufferTarget; Self::COUNT] = [
        BufferTarget::Array,
        BufferTarget::AtomicCounter,
        BufferTarget::CopyRead,
        BufferTarget::CopyWrite,
        BufferTarget::DrawIndirect,
        BufferTarget::DispatchIndirect,
        BufferTarget::ElementArray,
        BufferTarget::PixelPack,
        BufferTarget::PixelUnpack,
        BufferTarget::Query,
        BufferTarget::ShaderStorage,
        BufferTarget::TextureBuffer,
        BufferTarget::TransformFeedback,
        BufferTarget::Uniform,
        BufferTarget::Parameter,
    ];

    const NATIVE: [u32; Self::COUNT] = [
        0x8892, // ARRAY_BUFFER
        0x92C0, // ATOMIC_COUNTER_BUFFER
        0x8F36, // COPY_READ_BUFFER
        0x8F37, // COPY_WRITE_BUFFER
        0x8F3F, // DRAW_INDIRECT_BUFFER
        0x90EE, // DISPATCH_INDIRECT_BUFFER
        0x8893, // ELEMENT_ARRAY_BUFFER
        0x88EB, // PIXEL_PACK_BUFFER
        0x88EC, // PIXEL_UNPACK_BUFFER
        0x9192, // QUERY_BUFFER
        0x90D2, // SHADER_STORAGE_BUFFER
        0x8C2A, // TEXTURE_BUFFER
        0x8C8E, // TRANSFORM_FEEDBACK_BUFFER
        0x8A11, // UNIFORM_BUFFER
        0x80EE, // PARAMETER_BUFFER_ARB
    ];

    #[inline]
    pub const fn index(self) -> usize {
        self as usize
    }

    #[inline]
    pub const fn native(self) -> u32 {
        Self::NATIVE[self as usize]
    }
}

/// A boolean driver toggle, as used by `glEnable`/`glDisable`.
#[repr(u8)]
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash, TryFromPrimitive)]
pub enum Capability {
    Blend,
    ColorLogicOp,
    CullFace,
    DebugOutput,
    DebugOutputSynchronous,
    DepthClamp,
    DepthTest,
    Dither,
    FramebufferSrgb,
    LineSmooth,
    Multisample,
    PolygonOffsetFill,
    PolygonOffsetLine,
    PolygonOffsetPoint,
    PolygonSmooth,
    PrimitiveRestart,
    PrimitiveRestartFixedIndex,
    RasterizerDiscard,
    SampleAlphaToCoverage,
    SampleAlphaToOne,
    SampleCoverage,
    SampleShading,
    SampleMask,
    ScissorTest,
    StencilTest,
    TextureCubeMapSeamless,
    ProgramPointSize,
    ConservativeRasterization,
}

impl Capability {
    pub const COUNT: usize = 28;

    const NATIVE: [u32; Self::COUNT] = [
        0x0BE2, // BLEND
        0x0BF2, // COLOR_LOGIC_OP
        0x0B44, // CULL_FACE
        0x92E0, // DEBUG_OUTPUT
        0x8242, // DEBUG_OUTPUT_SYNCHRONOUS
        0x864F, // DEPTH_CLAMP
        0x0B71, // DEPTH_TEST
        0x0BD0, // DITHER
        0x8DB9, // FRAMEBUFFER_SRGB
        0x0B20, // LINE_SMOOTH
        0x809D, // MULTISAMPLE
        0x8037, // POLYGON_OFFSET_FILL
        0x2A02, // POLYGON_OFFSET_LINE
        0x2A01, // POLYGON_OFFSET_POINT
        0x0B41, // POLYGON_SMOOTH
        0x8F9D, // PRIMITIVE_RESTART
        0x8D69, // PRIMITIVE_RESTART_FIXED_INDEX
        0x8C89, // RASTERIZER_DISCARD
        0x809E, // SAMPLE_ALPHA_TO_COVERAGE
        0x809F, // SAMPLE_ALPHA_TO_ONE
        0x80A0, // SAMPLE_COVERAGE
        0x8C36, // SAMPLE_SHADING
        0x8E51, // SAMPLE_MASK
        0x0C11, // SCISSOR_TEST
        0x0B90, // STENCIL_TEST
        0x884F, // TEXTURE_CUBE_MAP_SEAMLESS
        0x8642, // PROGRAM_POINT_SIZE
        0x9346, // CONSERVATIVE_RASTERIZATION_NV
    ];

    #[inline]
    pub const fn native(self) -> u32 {
        Self::NATIVE[self as usize]
    }

    #[inline]
    const fn bit(self) -> u32 {
        1 << self as u32
    }
}

// capabilities are tracked as bits of a single u32
const_assert!(Capability::COUNT <= 32);

/// Set of enabled [`Capability`] toggles.
#[derive(Debug, Default, Copy, Clone, Eq, PartialEq, Hash)]
pub struct CapabilitySet(u32);

impl CapabilitySet {
    pub const EMPTY: CapabilitySet = CapabilitySet(0);

    #[inline]
    pub const fn contains(self, cap: Capability) -> bool {
        self.0 & cap.bit() != 0
    }

    #[inline]
    pub fn insert(&mut self, cap: Capability) {
        self.0 |= cap.bit();
    }

    #[inline]
    pub fn remove(&mut self, cap: Capability) {
        self.0 &= !cap.bit();
    }

    #[inline]
    pub const fn is_empty(self) -> bool {
        self.0 == 0
    }

    #[inline]
    pub const fn len(self) -> usize {
        self.0.count_ones() as usize
    }

    #[inline]
    pub const fn bits(self) -> u32 {
        self.0
    }

    pub fn iter(self) -> impl Iterator<Item = Capability> {
        (0..Capability::COUNT as u8)
            .filter_map(|i| Capability::try_from(i).ok())
            .filter(move |cap| self.contains(*cap))
    }
}

impl FromIterator<Capability> for CapabilitySet {
    fn from_iter<T: IntoIterator<Item = Capability>>(iter: T) -> Self {
        let mut set = CapabilitySet::EMPTY;
        for cap in iter {
            set.insert(cap);
        }
        set
    }
}

/// Framebuffer attachment point.
#[repr(u32)]
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash, TryFromPrimitive)]
pub enum Attachment {
    Color0 = 0x8CE0,
    Color1 = 0x8CE1,
    Color2 = 0x8CE2,
    Color3 = 0x8CE3,
    Color4 = 0x8CE4,
    Color5 = 0x8CE5,
    Color6 = 0x8CE6,
    Color7 = 0x8CE7,
    Color8 = 0x8CE8,
    Color9 = 0x8CE9,
    Color10 = 0x8CEA,
    Color11 = 0x8CEB,
    Color12 = 0x8CEC,
    Color13 = 0x8CED,
    Color14 = 0x8CEE,
    Color15 = 0x8CEF,
    Depth = 0x8D00,
    Stencil = 0x8D20,
    DepthStencil = 0x821A,
}

impl Attachment {
    pub const MAX_COLOR_ATTACHMENTS: u8 = 16;

    /// The `index`th color attachment, if there are that many.
    pub fn color(index: u8) -> Option<Attachment> {
        if index >= Self::MAX_COLOR_ATTACHMENTS {
            return None;
        }
        Attachment::try_from(Attachment::Color0 as u32 + index as u32).ok()
    }

    #[inline]
    pub const fn native(self) -> u32 {
        self as u32
    }

    pub const fn is_color(self) -> bool {
        !matches!(
            self,
            Attachment::Depth | Attachment::Stencil | Attachment::DepthStencil
        )
    }
}

/// Programmable pipeline stage.
#[repr(u8)]
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash, TryFromPrimitive)]
pub enum ShaderStage {
    Vertex,
    Geometry,
    Compute,
    Fragment,
    TessControl,
    TessEval,
}

impl ShaderStage {
    /// Shader object type, as passed to `glCreateShaderProgramv`.
    pub const fn native(self) -> u32 {
        match self {
            ShaderStage::Vertex => 0x8B31,
            ShaderStage::Geometry => 0x8DD9,
            ShaderStage::Compute => 0x91B9,
            ShaderStage::Fragment => 0x8B30,
            ShaderStage::TessControl => 0x8E88,
            ShaderStage::TessEval => 0x8E87,
        }
    }

    pub const fn stage_bit(self) -> ShaderStages {
        match self {
            ShaderStage::Vertex => ShaderStages::VERTEX,
            ShaderStage::Geometry => ShaderStages::GEOMETRY,
            ShaderStage::Compute => ShaderStages::COMPUTE,
            ShaderStage::Fragment => ShaderStages::FRAGMENT,
            ShaderStage::TessControl => ShaderStages::TESS_CONTROL,
            ShaderStage::TessEval => ShaderStages::TESS_EVAL,
        }
    }
}

bitflags! {
    /// Stage mask for `glUseProgramStages`.
    #[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
    pub struct ShaderStages: u32 {
        const VERTEX       = 0x01;
        const FRAGMENT     = 0x02;
        const GEOMETRY     = 0x04;
        const TESS_CONTROL = 0x08;
        const TESS_EVAL    = 0x10;
        const COMPUTE      = 0x20;
    }
}

impl From<ShaderStage> for ShaderStages {
    fn from(stage: ShaderStage) -> Self {
        stage.stage_bit()
    }
}

/// Component type of a vertex attribute.
#[repr(u32)]
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash, TryFromPrimitive)]
pub enum DataType {
    Byte = 0x1400,
    UnsignedByte = 0x1401,
    Short = 0x1402,
    UnsignedShort = 0x1403,
    Int = 0x1404,
    UnsignedInt = 0x1405,
    Float = 0x1406,
}

impl DataType {
    #[inline]
    pub const fn native(self) -> u32 {
        self as u32
    }
}

/// Usage hint of mutable buffer storage.
#[repr(u32)]
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash, TryFromPrimitive)]
pub enum BufferUsage {
    StreamDraw = 0x88E0,
    StreamRead = 0x88E1,
    StreamCopy = 0x88E2,
    StaticDraw = 0x88E4,
    StaticRead = 0x88E5,
    StaticCopy = 0x88E6,
    DynamicDraw = 0x88E8,
    DynamicRead = 0x88E9,
    DynamicCopy = 0x88EA,
}

impl BufferUsage {
    #[inline]
    pub const fn native(self) -> u32 {
        self as u32
    }
}

bitflags! {
    /// Flags of immutable buffer storage.
    #[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
    pub struct BufferStorageFlags: u32 {
        const MAP_READ        = 0x0001;
        const MAP_WRITE       = 0x0002;
        const MAP_PERSISTENT  = 0x0040;
        const MAP_COHERENT    = 0x0080;
        const DYNAMIC_STORAGE = 0x0100;
        const CLIENT_STORAGE  = 0x0200;
    }
}

/// Access policy for mapping a whole buffer.
#[repr(u32)]
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash, TryFromPrimitive)]
pub enum MapAccess {
    ReadOnly = 0x88B8,
    WriteOnly = 0x88B9,
    ReadWrite = 0x88BA,
}

impl MapAccess {
    #[inline]
    pub const fn native(self) -> u32 {
        self as u32
    }

    pub const fn reads(self) -> bool {
        matches!(self, MapAccess::ReadOnly | MapAccess::ReadWrite)
    }

    pub const fn writes(self) -> bool {
        matches!(self, MapAccess::WriteOnly | MapAccess::ReadWrite)
    }
}

bitflags! {
    /// Access flags for mapping part of a buffer.
    #[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
    pub struct MapRangeAccess: u32 {
        const READ              = 0x0001;
        const WRITE             = 0x0002;
        const INVALIDATE_RANGE  = 0x0004;
        const INVALIDATE_BUFFER = 0x0008;
        const FLUSH_EXPLICIT    = 0x0010;
        const UNSYNCHRONIZED    = 0x0020;
        const PERSISTENT        = 0x0040;
        const COHERENT          = 0x0080;

        const READ_WRITE = Self::READ.bits() | Self::WRITE.bits();
    }
}

/// Layout of one `glDrawElementsIndirect` command in a draw indirect buffer.
#[repr(C)]
#[derive(Debug, Default, Copy, Clone, Eq, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct DrawElementsIndirectCommand {
    pub count: u32,
    pub instance_count: u32,
    pub first_index: u32,
    pub base_vertex: u32,
    pub base_instance: u32,
}

/// Layout of one `glDrawArraysIndirect` command in a draw indirect buffer.
#[repr(C)]
#[derive(Debug, Default, Copy, Clone, Eq, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct DrawArraysIndirectCommand {
    pub count: u32,
    pub instance_count: u32,
    pub first: u32,
    pub base_instance: u32,
}

const_assert_eq!(size_of::<DrawElementsIndirectCommand>(), 20);
const_assert_eq!(size_of::<DrawArraysIndirectCommand>(), 16);
