use alloc::rc::Rc;
use core::cell::Cell;

/// A value that counts how many times it, or its siblings, were dropped.
pub(crate) struct Tracked {
    value: i32,
    drops: Rc<Cell<usize>>,
}

impl Tracked {
    pub(crate) fn new(value: i32) -> (Self, Rc<Cell<usize>>) {
        let drops = Rc::new(Cell::new(0));
        (Self::sharing(value, &drops), drops)
    }

    pub(crate) fn sharing(value: i32, drops: &Rc<Cell<usize>>) -> Self {
        Self {
            value,
            drops: drops.clone(),
        }
    }

    pub(crate) fn value(&self) -> i32 {
        self.value
    }
}

impl Drop for Tracked {
    fn drop(&mut self) {
        self.drops.set(self.drops.get() + 1);
    }
}
