//! End-to-end coverage of the list surface

use std::collections::LinkedList;

use fastpool::list::List;

fn from_slice(values: &[i32]) -> List<i32> {
    List::try_from_iter(values.iter().copied()).expect("allocation")
}

fn collect(list: &List<i32>) -> Vec<i32> {
    list.iter().copied().collect()
}

#[test]
fn build_and_traverse() {
    let mut list = List::new();
    list.push_back(1).expect("push");
    list.push_back(2).expect("push");
    list.push_back(3).expect("push");

    assert_eq!(list.len(), 3);
    assert_eq!(collect(&list), [1, 2, 3]);
    assert_eq!(list.iter().count(), 3);
    assert_eq!(list.iter().rev().count(), 3);
    assert_eq!(list.iter().rev().copied().collect::<Vec<_>>(), [3, 2, 1]);
}

#[test]
fn sort_small() {
    let mut list = from_slice(&[3, 1, 2]);
    list.sort();
    assert_eq!(collect(&list), [1, 2, 3]);
}

#[test]
fn unique_collapses_adjacent_runs() {
    let mut list = from_slice(&[1, 1, 2, 2, 3]);
    list.unique();
    assert_eq!(collect(&list), [1, 2, 3]);
}

#[test]
fn splice_middle_to_other_front() {
    let mut source = from_slice(&[1, 2, 3]);

    let mut cursor = source.cursor_front_mut();
    cursor.move_next();
    let after = cursor.split_after();
    let mut before = cursor.split_before();
    drop(cursor);

    // source is down to its middle element, moved without reallocation
    assert_eq!(collect(&source), [2]);

    let mut destination = from_slice(&[4, 5]);
    destination.cursor_front_mut().splice_before(source);
    assert_eq!(collect(&destination), [2, 4, 5]);

    let mut after = after;
    before.append(&mut after);
    assert_eq!(collect(&before), [1, 3]);
    assert_eq!(before.len(), 2);
}

#[test]
fn insert_erase_round_trip() {
    let mut list = from_slice(&[1, 3, 4]);
    let before = collect(&list);

    let mut cursor = list.cursor_front_mut();
    cursor.move_next();
    cursor.insert_before(2).expect("allocation");
    cursor.move_prev();
    assert_eq!(cursor.remove_current(), Some(2));
    drop(cursor);

    assert_eq!(collect(&list), before);
    assert_eq!(list.len(), 3);
}

#[test]
fn merge_unions_sorted_lists() {
    let mut left = from_slice(&[1, 3, 5]);
    let mut right = from_slice(&[2, 3, 4, 6]);
    left.merge(&mut right);

    assert!(right.is_empty());
    assert_eq!(collect(&left), [1, 2, 3, 3, 4, 5, 6]);
}

#[test]
fn sort_large_matches_reference() {
    let values: Vec<i32> = (0..1000).map(|i| (i * 7919) % 257).collect();
    let mut list = List::try_from_iter(values.iter().copied()).expect("allocation");
    list.sort();

    let mut reference = values;
    reference.sort();
    assert_eq!(collect(&list), reference);

    list.sort();
    assert_eq!(collect(&list), reference, "sorting is idempotent");
}

#[test]
fn behaves_like_the_std_list() {
    let mut ours: List<i32> = List::new();
    let mut std_list: LinkedList<i32> = LinkedList::new();

    for i in 0..50 {
        if i % 3 == 0 {
            ours.push_front(i).expect("push");
            std_list.push_front(i);
        } else {
            ours.push_back(i).expect("push");
            std_list.push_back(i);
        }
        if i % 7 == 0 {
            assert_eq!(ours.pop_back(), std_list.pop_back());
        }
    }

    assert_eq!(ours, std_list);
    assert_eq!(ours.front(), std_list.front());
    assert_eq!(ours.back(), std_list.back());

    ours.reverse();
    let reversed: LinkedList<i32> = std_list.iter().rev().copied().collect();
    assert_eq!(ours, reversed);
}

#[test]
fn assign_and_resize() {
    let mut list = from_slice(&[1, 2, 3]);
    list.assign(5, &9).expect("allocation");
    assert_eq!(collect(&list), [9, 9, 9, 9, 9]);

    list.assign(2, &7).expect("allocation");
    assert_eq!(collect(&list), [7, 7]);

    list.resize(4, 1).expect("allocation");
    assert_eq!(collect(&list), [7, 7, 1, 1]);
    list.resize(0, 1).expect("allocation");
    assert!(list.is_empty());
}

#[test]
fn iter_mut_edits_in_place() {
    let mut list = from_slice(&[1, 2, 3]);
    for elt in list.iter_mut() {
        *elt *= 10;
    }
    assert_eq!(collect(&list), [10, 20, 30]);
}
