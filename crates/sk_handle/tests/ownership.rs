//! Release and aliasing guarantees of every ownership strategy, exercised
//! through the public `Handle` API only.

use std::cell::Cell;
use std::rc::Rc;

use sk_handle::{
    AccessError, Array, CountedHandle, DelegateHandle, Handle, LinkedHandle, UniqueHandle,
};

/// Counts drops into a shared counter.
struct Probe {
    value: Cell<i32>,
    drops: Rc<Cell<usize>>,
}

impl Probe {
    fn boxed(value: i32, drops: &Rc<Cell<usize>>) -> Box<Probe> {
        Box::new(Probe {
            value: Cell::new(value),
            drops: drops.clone(),
        })
    }
}

impl Drop for Probe {
    fn drop(&mut self) {
        self.drops.set(self.drops.get() + 1);
    }
}

/// Drop orders over `n` owners, including forward, reverse and interleaved.
fn drop_orders(n: usize) -> Vec<Vec<usize>> {
    let forward: Vec<usize> = (0..n).collect();
    let reverse: Vec<usize> = (0..n).rev().collect();
    let interleaved: Vec<usize> = (0..n).step_by(2).chain((1..n).step_by(2)).collect();
    vec![forward, reverse, interleaved]
}

// -----------------------------------------------------------------------------
// Shared strategies

mod shared {
    use super::*;

    fn release_exactly_once<H: Clone>(make: impl Fn(&Rc<Cell<usize>>) -> H) {
        for n in [1, 2, 5, 16] {
            for order in drop_orders(n) {
                let drops = Rc::new(Cell::new(0));
                let first = make(&drops);
                let mut owners: Vec<Option<H>> = (1..n).map(|_| Some(first.clone())).collect();
                owners.insert(0, Some(first));

                for i in order {
                    assert_eq!(drops.get(), 0, "released before the last owner left");
                    owners[i] = None;
                }
                assert_eq!(drops.get(), 1, "n = {n}");
            }
        }
    }

    #[test]
    fn counted_releases_exactly_once() {
        release_exactly_once(|drops| -> CountedHandle<Probe> {
            Handle::from_box(Probe::boxed(0, drops))
        });
    }

    #[test]
    fn linked_releases_exactly_once() {
        release_exactly_once(|drops| -> LinkedHandle<Probe> {
            Handle::from_box(Probe::boxed(0, drops))
        });
    }

    #[test]
    fn linked_chained_clones_release_exactly_once() {
        let drops = Rc::new(Cell::new(0));
        let root: LinkedHandle<Probe> = Handle::from_box(Probe::boxed(0, &drops));
        let mut chain = vec![root];
        for _ in 0..7 {
            let next = chain[chain.len() - 1].clone();
            chain.push(next);
        }
        assert_eq!(chain[3].owners(), 8);

        while chain.len() > 1 {
            chain.remove(chain.len() / 2);
            assert_eq!(drops.get(), 0);
        }
        assert!(chain[0].is_unique());

        chain.clear();
        assert_eq!(drops.get(), 1);
    }

    #[test]
    fn survivor_keeps_access() {
        let drops = Rc::new(Cell::new(0));
        let counted: CountedHandle<Probe> = Handle::from_box(Probe::boxed(1, &drops));
        let linked: LinkedHandle<Probe> = Handle::from_box(Probe::boxed(1, &drops));

        let counted_rest: Vec<_> = (0..4).map(|_| counted.clone()).collect();
        let linked_rest: Vec<_> = (0..4).map(|_| linked.clone()).collect();
        drop(counted_rest);
        drop(linked_rest);

        counted.value.set(2);
        linked.value.set(3);
        assert_eq!(counted.value.get(), 2);
        assert_eq!(linked.value.get(), 3);
        assert_eq!(drops.get(), 0);
    }

    #[test]
    fn counted_aliasing_scenario() {
        let h1: CountedHandle<Cell<i32>> = Handle::from_box(Box::new(Cell::new(5)));
        let h2 = h1.clone();
        h2.set(9);
        assert_eq!(h1.get(), 9);
    }

    #[test]
    fn linked_scope_scenario() {
        let h1: LinkedHandle<Cell<i32>> = Handle::from_box(Box::new(Cell::new(5)));
        {
            let h2 = h1.clone();
            h2.set(9);
        }
        assert!(!h1.is_null());
        assert_eq!(h1.get(), 9);
    }

    #[test]
    fn linked_source_drop_keeps_clone() {
        let drops = Rc::new(Cell::new(0));
        let a: LinkedHandle<Probe> = Handle::from_box(Probe::boxed(7, &drops));
        let b = a.clone();

        drop(a);
        assert_eq!(b.value.get(), 7);
        assert!(b.is_unique());

        drop(b);
        assert_eq!(drops.get(), 1);
    }

    #[test]
    fn assign_from_co_owner_is_stable() {
        let drops = Rc::new(Cell::new(0));

        let mut c1: CountedHandle<Probe> = Handle::from_box(Probe::boxed(4, &drops));
        let c2 = c1.clone();
        c1.clone_from(&c2);
        assert_eq!(c1.owners(), 2);
        assert_eq!(c1.value.get(), 4);

        let mut l1: LinkedHandle<Probe> = Handle::from_box(Probe::boxed(4, &drops));
        let l2 = l1.clone();
        l1.clone_from(&l2);
        assert_eq!(l1.owners(), 2);
        assert_eq!(l1.value.get(), 4);

        drop((c1, c2, l1, l2));
        assert_eq!(drops.get(), 2);
    }

    #[test]
    fn assign_from_other_resource() {
        let old = Rc::new(Cell::new(0));
        let new = Rc::new(Cell::new(0));

        let mut a: CountedHandle<Probe> = Handle::from_box(Probe::boxed(1, &old));
        let b: CountedHandle<Probe> = Handle::from_box(Probe::boxed(2, &new));
        a.clone_from(&b);
        assert_eq!(old.get(), 1);
        assert!(a.ptr_eq(&b));

        let mut c: LinkedHandle<Probe> = Handle::from_box(Probe::boxed(1, &old));
        let d: LinkedHandle<Probe> = Handle::from_box(Probe::boxed(2, &new));
        c.clone_from(&d);
        assert_eq!(old.get(), 2);
        assert_eq!(c.value.get(), 2);

        drop((a, b, c, d));
        assert_eq!(new.get(), 2);
    }
}

// -----------------------------------------------------------------------------
// Delegate

mod delegate {
    use super::*;

    #[test]
    fn drain_empties_source() {
        let drops = Rc::new(Cell::new(0));
        let mut a: DelegateHandle<Probe> = Handle::from_box(Probe::boxed(5, &drops));
        let original = a.as_ptr();

        let b = a.drain();
        assert!(a.is_null());
        assert!(a.as_ptr().is_null());
        assert_eq!(b.as_ptr(), original);
        assert_eq!(b.value.get(), 5);

        drop(a);
        assert_eq!(drops.get(), 0);
        drop(b);
        assert_eq!(drops.get(), 1);
    }

    #[test]
    fn assign_releases_previous() {
        let first = Rc::new(Cell::new(0));
        let second = Rc::new(Cell::new(0));

        let mut a: DelegateHandle<Probe> = Handle::from_box(Probe::boxed(5, &first));
        let mut b: DelegateHandle<Probe> = Handle::from_box(Probe::boxed(1, &second));

        a.assign_from(&mut b);
        assert_eq!(first.get(), 1);
        assert_eq!(a.value.get(), 1);
        assert_eq!(b.try_get().err(), Some(AccessError::Null));

        drop(b);
        drop(a);
        assert_eq!(second.get(), 1);
    }

    #[test]
    fn write_through_drained_copy() {
        let mut a: DelegateHandle<i32> = Handle::from_box(Box::new(5));
        {
            let mut b = a.drain();
            *b = -12;
            assert_eq!(*b, -12);
        }
        assert!(a.get_mut().is_none());
    }
}

// -----------------------------------------------------------------------------
// Restrict-copy and arrays

mod unique {
    use super::*;

    #[test]
    fn drop_releases() {
        let drops = Rc::new(Cell::new(0));
        let h: UniqueHandle<Probe> = Handle::from_box(Probe::boxed(3, &drops));
        assert_eq!(h.owners(), 1);
        drop(h);
        assert_eq!(drops.get(), 1);
    }

    #[test]
    fn array_writes_read_back_in_order() {
        let mut h: UniqueHandle<i32, Array> = Handle::from_vec(vec![0; 3]);
        h[0] = 3;
        h[1] = 2;
        h[2] = 1;
        assert_eq!([h[0], h[1], h[2]], [3, 2, 1]);

        let mut linked: LinkedHandle<i32, Array> = Handle::from_vec(vec![0; 3]);
        for (i, v) in [3, 2, 1].into_iter().enumerate() {
            *linked.element_mut(i).unwrap() = v;
        }
        assert_eq!(linked.as_slice(), &[3, 2, 1]);
    }

    #[test]
    fn array_releases_every_element_once() {
        let drops = Rc::new(Cell::new(0));
        let elems: Vec<Probe> = (0..4).map(|i| *Probe::boxed(i, &drops)).collect();
        let h: CountedHandle<Probe, Array> = Handle::from_vec(elems);
        let h2 = h.clone();

        drop(h);
        assert_eq!(h2[3].value.get(), 3);
        drop(h2);
        assert_eq!(drops.get(), 4);
    }
}
