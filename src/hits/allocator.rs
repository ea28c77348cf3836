/// Free-list pool for fixed-size records.
///
/// Records handed back through `free_single` are kept boxed and handed out
/// again by `malloc_single`, reset to their default value. A pool is meant
/// to live in a thread local, one per worker thread, so it needs no locking.
pub struct Allocator<T> {
    free: Vec<Box<T>>,
    fresh: usize,
    reused: usize,
}

#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct AllocatorStats {
    /// records created with a new heap allocation
    pub fresh: usize,
    /// records served from the free list
    pub reused: usize,
    /// records currently waiting in the free list
    pub free: usize,
}

impl<T: Default> Allocator<T> {
    pub fn new() -> Allocator<T> {
        Allocator {
            free: Vec::new(),
            fresh: 0,
            reused: 0,
        }
    }

    pub fn malloc_single(&mut self) -> Box<T> {
        match self.free.pop() {
            Some(item) => {
                self.reused += 1;
                item
            }
            None => {
                self.fresh += 1;
                Box::new(T::default())
            }
        }
    }

    pub fn free_single(&mut self, mut item: Box<T>) {
        // reset now so the record doesn't pin its heap data while pooled
        *item = T::default();
        self.free.push(item);
    }

    pub fn stats(&self) -> AllocatorStats {
        AllocatorStats {
            fresh: self.fresh,
            reused: self.reused,
            free: self.free.len(),
        }
    }
}

impl<T: Default> Default for Allocator<T> {
    fn default() -> Self {
        Allocator::new()
    }
}
