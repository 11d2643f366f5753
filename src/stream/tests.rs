use super::*;

use crate::fold;

use proptest::prelude::*;

#[test]
fn iter_round_trips() {
    let xs = vec![1, 2, 3, 4];
    assert_eq!(iter(xs.clone()).to_vec(), xs);
    assert_eq!(iter(Vec::<i32>::new()).to_vec(), vec![]);
}

#[test]
fn ranges_are_streams() {
    assert_eq!(iter(3..=6).to_vec(), vec![3, 4, 5, 6]);
}

#[test]
fn unfold_stops_on_none() {
    let powers: Vec<u32> = unfold(1u32, |n| (n < 40).then(|| (n, n * 3))).to_vec();
    assert_eq!(powers, vec![1, 3, 9, 27]);
}

#[test]
fn generate_can_skip() {
    // Count to six, yielding only even numbers via Skip.
    let evens: Vec<u32> = generate(0u32, |n| {
        *n += 1;
        if *n > 6 {
            Step::Stop
        } else if *n % 2 == 0 {
            Step::Yield(*n)
        } else {
            Step::Skip
        }
    })
    .to_vec();
    assert_eq!(evens, vec![2, 4, 6]);
}

#[test]
fn generate_is_fused() {
    let mut calls = 0;
    let mut s = generate((), move |()| {
        calls += 1;
        assert_eq!(calls, 1);
        Step::<i32>::Stop
    });
    assert_eq!(s.step(), Step::Stop);
    assert_eq!(s.step(), Step::Stop);
}

#[test]
fn once_and_empty() {
    assert_eq!(once(9).to_vec(), vec![9]);
    assert_eq!(empty::<i32>().to_vec(), vec![]);
}

#[test]
fn repeat_bounded_by_take() {
    assert_eq!(repeat('x').take(3).to_vec(), vec!['x', 'x', 'x']);
    let mut n = 0;
    assert_eq!(
        repeat_with(|| {
            n += 1;
            n
        })
        .take(3)
        .to_vec(),
        vec![1, 2, 3]
    );
    assert_eq!(replicate(2, "a").to_vec(), vec!["a", "a"]);
}

#[test]
fn map_filter_fuse() {
    let out: Vec<i32> = iter(0..10).filter(|n| n % 3 == 0).map(|n| n * 10).to_vec();
    assert_eq!(out, vec![0, 30, 60, 90]);
}

#[test]
fn filter_map_flattens() {
    let out: Vec<i32> = iter(vec![Some(1), None, Some(3)]).filter_map(|x| x).to_vec();
    assert_eq!(out, vec![1, 3]);
}

#[test]
fn take_and_skip() {
    assert_eq!(iter(0..100).skip(97).to_vec(), vec![97, 98, 99]);
    assert_eq!(iter(0..3).take(5).to_vec(), vec![0, 1, 2]);
    assert_eq!(iter(0..5).take(0).to_vec(), vec![]);
    assert_eq!(
        iter([1, 2, 5, 1]).take_while(|n| *n < 3).to_vec(),
        vec![1, 2]
    );
    assert_eq!(
        iter([1, 2, 5, 1]).skip_while(|n| *n < 3).to_vec(),
        vec![5, 1]
    );
}

#[test]
fn scan_emits_initial_accumulator() {
    let sums: Vec<i32> = iter([1, 2, 3]).scan(fold::sum()).to_vec();
    assert_eq!(sums, vec![0, 1, 3, 6]);
}

#[test]
fn postscan_emits_one_per_input() {
    let sums: Vec<i32> = iter([1, 2, 3]).postscan(fold::sum()).to_vec();
    assert_eq!(sums, vec![1, 3, 6]);
}

#[test]
fn postscan_stops_with_fold() {
    let firsts: Vec<Option<i32>> = iter([7, 8, 9]).postscan(fold::one()).to_vec();
    assert_eq!(firsts, vec![Some(7)]);
}

#[test]
fn rolling_map_sees_predecessor() {
    let deltas: Vec<i32> = iter([3, 5, 4])
        .rolling_map(|prev, cur| cur - prev.copied().unwrap_or(0))
        .to_vec();
    assert_eq!(deltas, vec![3, 2, -1]);
}

#[test]
fn enumerate_pairs_indices() {
    assert_eq!(
        iter("ab".chars()).enumerate().to_vec(),
        vec![(0, 'a'), (1, 'b')]
    );
}

#[test]
fn intersperse_separates() {
    assert_eq!(iter([1, 2, 3]).intersperse(0).to_vec(), vec![1, 0, 2, 0, 3]);
    assert_eq!(iter([1]).intersperse(0).to_vec(), vec![1]);
    assert_eq!(empty::<i32>().intersperse(0).to_vec(), vec![]);
}

#[test]
fn intersperse_suffix_trails() {
    assert_eq!(
        iter([1, 2]).intersperse_suffix(0).to_vec(),
        vec![1, 0, 2, 0]
    );
    let mut n = 9;
    assert_eq!(
        iter([1, 2])
            .intersperse_suffix_with(move || {
                n += 1;
                n
            })
            .to_vec(),
        vec![1, 10, 2, 11]
    );
}

#[test]
fn dedup_collapses_runs() {
    assert_eq!(iter([1, 1, 2, 2, 2, 1]).dedup().to_vec(), vec![1, 2, 1]);
    assert_eq!(
        iter([1, 2, 4, 8, 9]).dedup_by(|a, b| a % 2 == b % 2).to_vec(),
        vec![1, 2, 9]
    );
}

#[test]
fn chain_concatenates() {
    assert_eq!(iter(0..2).chain(iter(5..7)).to_vec(), vec![0, 1, 5, 6]);
}

#[test]
fn flat_map_flattens_in_order() {
    let out: Vec<usize> = iter([1usize, 0, 2]).flat_map(|n| replicate(n, n)).to_vec();
    assert_eq!(out, vec![1, 2, 2]);
}

#[test]
fn zip_stops_at_shorter() {
    assert_eq!(
        iter(0..).zip(iter("ab".chars())).to_vec(),
        vec![(0, 'a'), (1, 'b')]
    );
    // Skips on either side do not desynchronize the pairing.
    let left = iter(0..6).filter(|n| n % 2 == 0);
    let right = iter(0..6).filter(|n| n % 2 == 1);
    assert_eq!(left.zip(right).to_vec(), vec![(0, 1), (2, 3), (4, 5)]);
}

#[test]
fn fold_runs_to_completion() {
    assert_eq!(iter(1..=4).fold(fold::sum()), 10);
}

#[test]
fn fold_can_end_early() {
    // fold::one() terminates after a single element even on an endless
    // stream.
    let first = generate(0, |n| {
        *n += 1;
        Step::Yield(*n)
    })
    .fold(fold::one());
    assert_eq!(first, Some(1));
}

#[test]
fn drain_discards() {
    let mut seen = 0;
    iter(0..5).map(|n| seen += n).drain();
    assert_eq!(seen, 10);
}

proptest! {
    #[test]
    fn to_list_identity(xs: Vec<i32>) {
        prop_assert_eq!(iter(xs.clone()).to_vec(), xs);
    }

    #[test]
    fn filter_matches_iterator(xs: Vec<i32>) {
        let expected: Vec<i32> = xs.iter().copied().filter(|n| n % 2 == 0).collect();
        prop_assert_eq!(iter(xs).filter(|n| n % 2 == 0).to_vec(), expected);
    }

    #[test]
    fn foldl_matches_iterator(xs: Vec<i64>) {
        let expected = xs.iter().fold(0i64, |acc, x| acc ^ (acc.wrapping_add(*x)));
        let got = iter(xs).fold(fold::foldl(0i64, |acc, x| acc ^ (acc.wrapping_add(x))));
        prop_assert_eq!(got, expected);
    }
}
