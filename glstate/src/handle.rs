use std::fmt::{Display, Formatter};

/// Driver side name of a GPU object.
///
/// Zero is never handed out by a driver and marks an empty or unallocated
/// object. A non-zero handle is owned by exactly one live resource wrapper.
#[repr(transparent)]
#[derive(Debug, Default, Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub struct Handle(u32);

impl Handle {
    pub const NONE: Handle = Handle(0);

    #[inline]
    pub const fn new(id: u32) -> Self {
        Self(id)
    }

    #[inline]
    pub const fn get(self) -> u32 {
        self.0
    }

    #[inline]
    pub const fn is_valid(self) -> bool {
        self.0 != 0
    }
}

impl From<u32> for Handle {
    fn from(id: u32) -> Self {
        Handle(id)
    }
}

impl From<Handle> for u32 {
    fn from(handle: Handle) -> Self {
        handle.0
    }
}

impl Display for Handle {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        if self.is_valid() {
            write!(f, "#{}", self.0)
        } else {
            f.write_str("#none")
        }
    }
}
