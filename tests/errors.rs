//! Size, index and buffer validation

use sumheap::{ForkJoinConfig, HeapError, HeapLayout, SumHeap};
use test_case::test_case;

#[test_case(0 ; "empty")]
#[test_case(3 ; "odd")]
#[test_case(6 ; "even non power")]
#[test_case(1000 ; "large non power")]
fn non_power_of_two_is_rejected(len: usize) {
    let leaves = vec![1u32; len];
    let err = SumHeap::new(&leaves).unwrap_err();
    assert!(matches!(err, HeapError::InvalidSize { len: l } if l == len));
    assert!(HeapLayout::new(len).is_err());
}

#[test]
fn output_length_must_match() {
    let leaves = [1i64; 8];
    let heap = SumHeap::new(&leaves).unwrap();

    let mut short = [0i64; 7];
    let err = heap.compute_prefix_sums(&mut short).unwrap_err();
    assert!(matches!(err, HeapError::LengthMismatch { expected: 8, actual: 7 }));

    let mut long = [0i64; 9];
    assert!(heap.compute_prefix_sums(&mut long).is_err());
    assert_eq!(long, [0; 9], "rejected buffer must be untouched");
}

#[test]
fn lookups_past_the_end_are_reported() {
    let leaves = [1i64; 4];
    let heap = SumHeap::new(&leaves).unwrap();
    assert_eq!(heap.try_value(6).unwrap(), 1);
    assert!(matches!(
        heap.try_value(7),
        Err(HeapError::IndexOutOfRange { index: 7, size: 7 })
    ));
}

#[test]
#[should_panic(expected = "out of range")]
fn unchecked_lookup_past_the_end_panics() {
    let leaves = [1i64; 4];
    let heap = SumHeap::new(&leaves).unwrap();
    heap.value(7);
}

#[test]
fn zero_thread_pool_is_rejected() {
    let leaves = [1i64; 4];
    let err = SumHeap::with_config(&leaves, ForkJoinConfig::default().with_num_threads(0)).unwrap_err();
    assert!(matches!(err, HeapError::InvalidConfiguration(_)));
}
