use bitflags::bitflags;

bitflags! {
    /// Color and depth write enables, packed into one byte.
    ///
    /// The color channels and the depth bit are set by separate calls but
    /// share this storage, so updates only ever touch their own bits.
    #[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
    pub struct WriteMask: u8 {
        const RED   = 1 << 0;
        const GREEN = 1 << 1;
        const BLUE  = 1 << 2;
        const ALPHA = 1 << 3;
        const DEPTH = 1 << 4;

        const COLOR = Self::RED.bits() | Self::GREEN.bits() | Self::BLUE.bits() | Self::ALPHA.bits();
    }
}

impl Default for WriteMask {
    fn default() -> Self {
        WriteMask::all()
    }
}

impl WriteMask {
    pub fn from_color(red: bool, green: bool, blue: bool, alpha: bool) -> Self {
        let mut mask = WriteMask::empty();
        mask.set(WriteMask::RED, red);
        mask.set(WriteMask::GREEN, green);
        mask.set(WriteMask::BLUE, blue);
        mask.set(WriteMask::ALPHA, alpha);
        mask
    }

    /// The four color enables in `glColorMask` order.
    pub fn color_channels(self) -> [bool; 4] {
        [
            self.contains(WriteMask::RED),
            self.contains(WriteMask::GREEN),
            self.contains(WriteMask::BLUE),
            self.contains(WriteMask::ALPHA),
        ]
    }

    pub fn depth(self) -> bool {
        self.contains(WriteMask::DEPTH)
    }

    /// Replaces the bits selected by `field` with the ones from `value`.
    pub(crate) fn with_field(self, field: WriteMask, value: WriteMask) -> Self {
        (self - field) | (value & field)
    }
}
