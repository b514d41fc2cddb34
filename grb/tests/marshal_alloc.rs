//! Selecting every index must not touch the heap

use std::alloc::{GlobalAlloc, Layout, System};
use std::cell::Cell;

use grb::{to_index_list, IndexList, Select};

struct Counting;

thread_local! {
    static ALLOCATIONS: Cell<usize> = const { Cell::new(0) };
}

unsafe impl GlobalAlloc for Counting {
    unsafe fn alloc(&self, layout: Layout) -> *mut u8 {
        let _ = ALLOCATIONS.try_with(|n| n.set(n.get() + 1));
        System.alloc(layout)
    }

    unsafe fn dealloc(&self, ptr: *mut u8, layout: Layout) {
        System.dealloc(ptr, layout)
    }
}

#[global_allocator]
static GLOBAL: Counting = Counting;

fn allocations() -> usize {
    ALLOCATIONS.with(Cell::get)
}

#[test]
fn test_select_all_does_not_allocate() {
    let before = allocations();
    let rows = to_index_list(Select::<u64>::All);
    let cols = to_index_list(Select::<i32>::All);
    let after = allocations();

    assert_eq!(after, before);
    assert!(matches!(rows, Ok(IndexList::All)));
    assert!(matches!(cols, Ok(IndexList::All)));
}

#[test]
fn test_select_list_allocates_once() {
    let indices = [3i64, 1, 4, 1, 5];
    let before = allocations();
    let list = to_index_list(Select::from(&indices));
    let after = allocations();

    assert_eq!(after - before, 1);
    assert_eq!(list, Ok(IndexList::List(vec![3, 1, 4, 1, 5])));
}
