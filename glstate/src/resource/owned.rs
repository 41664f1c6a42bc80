use crate::driver::{Driver, ObjectKind};
use crate::handle::Handle;
use std::fmt::{Debug, Formatter};
use tracing::{debug, warn};

/// Exclusive owner of one driver object name.
///
/// Holds the driver it allocated from and releases the name when dropped.
/// The resource wrappers build on this instead of each repeating the
/// ownership rules.
pub struct OwnedHandle<'d> {
    driver: &'d dyn Driver,
    kind: ObjectKind,
    handle: Handle,
}

impl<'d> OwnedHandle<'d> {
    pub fn empty(driver: &'d dyn Driver, kind: ObjectKind) -> Self {
        Self {
            driver,
            kind,
            handle: Handle::NONE,
        }
    }

    /// Asks the driver for a name if this owner is empty.
    ///
    /// Returns whether a new name was allocated. `false` means either that a
    /// name was already owned or that the driver handed back the zero sentinel.
    pub fn allocate(&mut self) -> bool {
        if self.handle.is_valid() {
            return false;
        }

        let handle = self.driver.create_object(self.kind);
        if !handle.is_valid() {
            warn!("Driver could not allocate a {}", self.kind);
            return false;
        }

        debug!("Allocated {} {}", self.kind, handle);
        self.handle = handle;
        true
    }

    /// Gives the name back to the driver. Safe to call repeatedly.
    pub fn release(&mut self) {
        if !self.handle.is_valid() {
            return;
        }

        debug!("Releasing {} {}", self.kind, self.handle);
        self.driver.delete_object(self.kind, self.handle);
        self.handle = Handle::NONE;
    }

    /// Moves the name into a new owner and leaves this one empty.
    pub fn take(&mut self) -> Self {
        let empty = Self::empty(self.driver, self.kind);
        std::mem::replace(self, empty)
    }

    pub fn swap(&mut self, other: &mut Self) {
        debug_assert_eq!(self.kind, other.kind, "swapping handles of different kinds");
        std::mem::swap(self, other);
    }

    #[inline]
    pub fn handle(&self) -> Handle {
        self.handle
    }

    #[inline]
    pub fn is_valid(&self) -> bool {
        self.handle.is_valid()
    }

    #[inline]
    pub fn kind(&self) -> ObjectKind {
        self.kind
    }

    #[inline]
    pub fn driver(&self) -> &'d dyn Driver {
        self.driver
    }
}

impl Drop for OwnedHandle<'_> {
    fn drop(&mut self) {
        self.release();
    }
}

impl Debug for OwnedHandle<'_> {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OwnedHandle")
            .field("kind", &self.kind)
            .field("handle", &self.handle)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::driver::{DriverCall, RecordingDriver};

    fn deletes(driver: &RecordingDriver) -> usize {
        driver.count_calls(|c| matches!(c, DriverCall::Delete { .. }))
    }

    #[test]
    fn allocates_once() {
        let driver = RecordingDriver::new();
        let mut owned = OwnedHandle::empty(&driver, ObjectKind::Buffer);

        assert!(owned.allocate());
        let first = owned.handle();
        assert!(!owned.allocate());
        assert_eq!(owned.handle(), first);
        assert_eq!(driver.live_objects(), 1);
    }

    #[test]
    fn take_leaves_source_empty() {
        let driver = RecordingDriver::new();
        let mut source = OwnedHandle::empty(&driver, ObjectKind::Framebuffer);
        source.allocate();
        let handle = source.handle();

        let target = source.take();
        assert_eq!(target.handle(), handle);
        assert!(!source.is_valid());

        drop(source);
        assert_eq!(deletes(&driver), 0);
        drop(target);
        assert_eq!(deletes(&driver), 1);
        assert!(!driver.is_live(handle));
    }

    #[test]
    fn swap_exchanges_names() {
        let driver = RecordingDriver::new();
        let mut a = OwnedHandle::empty(&driver, ObjectKind::VertexArray);
        let mut b = OwnedHandle::empty(&driver, ObjectKind::VertexArray);
        a.allocate();
        let name = a.handle();

        a.swap(&mut b);
        assert!(!a.is_valid());
        assert_eq!(b.handle(), name);
    }
}
