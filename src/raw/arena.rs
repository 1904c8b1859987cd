use alloc::vec::Vec;

use super::handle::Handle;

/// Slot storage addressed by [`Handle`], recycling freed slots through a free list.
#[derive(Clone)]
pub(crate) struct Arena<T> {
    slots: Vec<Option<T>>,
    free: Vec<Handle>,
}

impl<T> Arena<T> {
    pub(crate) const fn new() -> Self {
        Self {
            slots: Vec::new(),
            free: Vec::new(),
        }
    }

    pub(crate) fn with_capacity(capacity: usize) -> Self {
        Self {
            slots: Vec::with_capacity(capacity),
            free: Vec::new(),
        }
    }

    pub(crate) fn capacity(&self) -> usize {
        self.slots.capacity()
    }

    /// Number of occupied slots.
    pub(crate) const fn len(&self) -> usize {
        self.slots.len().saturating_sub(self.free.len())
    }

    pub(crate) fn alloc(&mut self, element: T) -> Handle {
        if let Some(handle) = self.free.pop() {
            self.slots[handle.to_index()] = Some(element);
            return handle;
        }

        // At most `Handle::MAX` slots may exist once the push below has happened.
        assert!(
            self.slots.len() < Handle::MAX,
            "`Arena::alloc()` - arena is at maximum capacity ({})",
            Handle::MAX
        );
        self.slots.push(Some(element));
        Handle::from_index(self.slots.len() - 1)
    }

    #[inline]
    pub(crate) fn get(&self, handle: Handle) -> &T {
        self.slots[handle.to_index()].as_ref().expect("`Arena::get()` - `handle` is invalid!")
    }

    #[inline]
    pub(crate) fn get_mut(&mut self, handle: Handle) -> &mut T {
        self.slots[handle.to_index()].as_mut().expect("`Arena::get_mut()` - `handle` is invalid!")
    }

    /// Returns `true` if `handle` names an occupied slot.
    #[inline]
    pub(crate) fn contains(&self, handle: Handle) -> bool {
        self.slots.get(handle.to_index()).is_some_and(Option::is_some)
    }

    /// Returns a mutable reference to one element without borrowing the rest of the arena.
    ///
    /// # Safety
    /// - `ptr` must point to a valid, allocated `Arena<T>` that outlives `'a`.
    /// - No other reference to the element at `handle` may be alive during `'a`.
    #[inline]
    pub(crate) unsafe fn get_mut_ptr<'a>(ptr: *mut Self, handle: Handle) -> &'a mut T {
        let index = handle.to_index();
        // SAFETY: `Vec::as_mut_ptr` does not materialize a reference to the whole buffer, so
        // references previously handed out for other slots stay valid. The caller guarantees
        // exclusivity for this slot.
        unsafe {
            let slots = core::ptr::addr_of_mut!((*ptr).slots);
            assert!(index < (*slots).len(), "`Arena::get_mut_ptr()` - `handle` is out of bounds!");
            (*(*slots).as_mut_ptr().add(index)).as_mut().expect("`Arena::get_mut_ptr()` - `handle` is invalid!")
        }
    }

    pub(crate) fn take(&mut self, handle: Handle) -> T {
        let element = self.slots[handle.to_index()].take().expect("`Arena::take()` - `handle` is invalid!");
        self.free.push(handle);
        element
    }

    pub(crate) fn free(&mut self, handle: Handle) {
        drop(self.take(handle));
    }
}
