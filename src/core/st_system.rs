use std::{
    cell::{Ref, RefCell, RefMut},
    rc::Rc,
};

/// A shared, single-threaded handle to a system owned by several renderer parts.
///
/// `StSystem` wraps `Rc<RefCell<T>>`: clones point at the same value and borrows
/// are checked at runtime. The editor shares the GPU device, queue and buffer
/// registry this way between the pipeline, bind groups and renderer.
///
/// # Examples
///
/// ```rust
/// use voxel_editor::core::StSystem;
///
/// let counter = StSystem::new(0u32);
/// let shared = counter.clone();
///
/// *shared.get_mut() += 1;
/// assert_eq!(*counter.get(), 1);
/// ```
///
/// # Panics
/// - Panics if a borrow is held while trying to mutably borrow
/// - Panics if a mutable borrow is held while trying to borrow
pub struct StSystem<T> {
    system: Rc<RefCell<T>>,
}

impl<T> StSystem<T> {
    /// Wraps `system` in a new shared handle.
    pub fn new(system: T) -> Self {
        Self {
            system: Rc::new(RefCell::new(system)),
        }
    }

    /// Borrows the system immutably.
    ///
    /// # Panics
    /// Panics if the value is currently mutably borrowed.
    pub fn get(&self) -> Ref<'_, T> {
        self.system.borrow()
    }

    /// Borrows the system mutably.
    ///
    /// # Panics
    /// Panics if the value is currently borrowed.
    pub fn get_mut(&self) -> RefMut<'_, T> {
        self.system.borrow_mut()
    }
}

impl<T> Clone for StSystem<T> {
    fn clone(&self) -> Self {
        Self {
            system: self.system.clone(),
        }
    }
}
