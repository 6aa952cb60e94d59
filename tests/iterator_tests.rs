use ringvec::RingVec;

#[test]
fn test_iterator_empty_buffer() {
    let ring: RingVec<u8> = RingVec::with_capacity(4).unwrap();

    let mut iter = ring.iter();
    assert_eq!(iter.size_hint(), (0, Some(0)));
    assert_eq!(iter.next(), None);
    assert_eq!(iter.next(), None);
}

#[test]
fn test_iterator_yields_newest_first() {
    let mut ring = RingVec::with_capacity(4).unwrap();
    ring.push(1);
    ring.push(2);
    ring.push(3);

    let mut iter = ring.iter();
    assert_eq!(iter.size_hint(), (3, Some(3)));

    assert_eq!(iter.next(), Some(&3));
    assert_eq!(iter.size_hint(), (2, Some(2)));

    assert_eq!(iter.next(), Some(&2));
    assert_eq!(iter.size_hint(), (1, Some(1)));

    assert_eq!(iter.next(), Some(&1));
    assert_eq!(iter.size_hint(), (0, Some(0)));

    assert_eq!(iter.next(), None);
}

#[test]
fn test_iterator_across_wraparound() {
    let mut ring = RingVec::with_capacity(3).unwrap();
    for i in 0..8 {
        ring.push(i);
    }

    let items: Vec<_> = ring.iter().copied().collect();
    assert_eq!(items, vec![7, 6, 5]);
}

#[test]
fn test_reverse_iteration_yields_oldest_first() {
    let mut ring = RingVec::with_capacity(4).unwrap();
    for i in 0..6 {
        ring.push(i);
    }

    let items: Vec<_> = ring.iter().rev().copied().collect();
    assert_eq!(items, vec![2, 3, 4, 5]);
}

#[test]
fn test_iterator_from_both_ends() {
    let mut ring = RingVec::with_capacity(4).unwrap();
    for i in 1..=4 {
        ring.push(i);
    }

    let mut iter = ring.iter();
    assert_eq!(iter.next(), Some(&4));
    assert_eq!(iter.next_back(), Some(&1));
    assert_eq!(iter.next(), Some(&3));
    assert_eq!(iter.next_back(), Some(&2));
    assert_eq!(iter.next(), None);
    assert_eq!(iter.next_back(), None);
}

#[test]
fn test_iterator_nth_skips_offsets() {
    let mut ring = RingVec::with_capacity(5).unwrap();
    for i in 0..5 {
        ring.push(i);
    }
    // Logical view [4, 3, 2, 1, 0].
    let mut iter = ring.iter();
    assert_eq!(iter.nth(2), Some(&2));
    assert_eq!(iter.next(), Some(&1));

    let mut iter = ring.iter();
    assert_eq!(iter.nth(7), None);

    let mut iter = ring.iter();
    assert_eq!(iter.nth_back(1), Some(&1));
    assert_eq!(iter.next_back(), Some(&2));
}

#[test]
fn test_iterator_clone_is_independent() {
    let mut ring = RingVec::with_capacity(3).unwrap();
    ring.push(1);
    ring.push(2);

    let mut a = ring.iter();
    assert_eq!(a.next(), Some(&2));

    let mut b = a.clone();
    assert_eq!(a.next(), Some(&1));
    assert_eq!(b.next(), Some(&1));
    assert_eq!(b.next(), None);
}

#[test]
fn test_iter_mut_modifies_in_place() {
    let mut ring = RingVec::with_capacity(3).unwrap();
    for i in 0..5 {
        ring.push(i);
    }

    for value in ring.iter_mut() {
        *value *= 10;
    }
    let items: Vec<_> = ring.iter().copied().collect();
    assert_eq!(items, vec![40, 30, 20]);
}

#[test]
fn test_iter_mut_from_both_ends() {
    let mut ring = RingVec::with_capacity(3).unwrap();
    for i in 1..=3 {
        ring.push(i);
    }

    let mut iter = ring.iter_mut();
    *iter.next().unwrap() += 100;
    *iter.next_back().unwrap() += 200;
    drop(iter);

    let items: Vec<_> = ring.iter().copied().collect();
    assert_eq!(items, vec![103, 2, 201]);
}

#[test]
fn test_for_loop_over_references() {
    let mut ring = RingVec::with_capacity(3).unwrap();
    ring.push(5);
    ring.push(6);

    let mut seen = Vec::new();
    for value in &ring {
        seen.push(*value);
    }
    assert_eq!(seen, vec![6, 5]);

    for value in &mut ring {
        *value += 1;
    }
    assert_eq!(ring.front(), Some(&7));
}

#[test]
fn test_into_iter_consumes_newest_first() {
    let mut ring = RingVec::with_capacity(3).unwrap();
    for i in 0..5 {
        ring.push(format!("v{i}"));
    }

    let items: Vec<String> = ring.into_iter().collect();
    assert_eq!(items, vec!["v4", "v3", "v2"]);
}

#[test]
fn test_into_iter_double_ended() {
    let ring = RingVec::from_slice(&[1, 2, 3, 4]);
    let mut iter = ring.into_iter();

    assert_eq!(iter.next(), Some(4));
    assert_eq!(iter.next_back(), Some(1));
    let rest: Vec<_> = iter.collect();
    assert_eq!(rest, vec![3, 2]);
}

#[test]
fn test_into_iter_partial_consumption_drops_rest() {
    let ring = RingVec::from_slice(&[
        String::from("a"),
        String::from("b"),
        String::from("c"),
    ]);
    let mut iter = ring.into_iter();
    assert_eq!(iter.next().as_deref(), Some("c"));
    // Remaining elements are released when the iterator goes out of scope.
    drop(iter);
}

#[test]
fn test_exact_size_reporting() {
    let mut ring = RingVec::with_capacity(4).unwrap();
    for i in 0..6 {
        ring.push(i);
    }
    assert_eq!(ring.iter().len(), 4);
    assert_eq!(ring.iter_mut().len(), 4);
    assert_eq!(ring.into_iter().len(), 4);
}

#[test]
fn test_iterator_observes_parent_state_lazily() {
    let mut ring = RingVec::with_capacity(3).unwrap();
    ring.push(1);
    ring.push(2);

    // An iterator created now and dereferenced later sees the slot content
    // at dereference time, not at creation time.
    let collected: Vec<_> = {
        let iter = ring.iter();
        iter.copied().collect()
    };
    assert_eq!(collected, vec![2, 1]);
}
