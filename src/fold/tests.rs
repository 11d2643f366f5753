use super::*;

use crate::stream;
use crate::stream::Stream as _;

fn run<F: Fold<Input = i32>>(fold: F, xs: Vec<i32>) -> F::Output {
    stream::iter(xs).fold(fold)
}

#[test]
fn leaves() {
    assert_eq!(run(length(), vec![1, 2, 3]), 3);
    assert_eq!(run(sum(), vec![1, 2, 3]), 6);
    assert_eq!(run(last(), vec![1, 2, 3]), Some(3));
    assert_eq!(run(last(), vec![]), None);
    assert_eq!(run(one(), vec![7, 8]), Some(7));
    assert_eq!(run(one(), vec![]), None);
    assert_eq!(run(to_vec(), vec![4, 5]), vec![4, 5]);
    run(drain(), vec![1, 2]);
}

#[test]
fn any_and_all_short_circuit() {
    assert!(run(any(|n| *n > 2), vec![1, 2, 3]));
    assert!(!run(any(|n| *n > 9), vec![1, 2, 3]));
    assert!(run(all(|n| *n < 9), vec![1, 2, 3]));
    assert!(!run(all(|n| *n < 3), vec![1, 2, 3]));
    // Short-circuits: the failing element is the last one inspected.
    let mut inspected = 0;
    let ok = run(
        all(move |n| {
            inspected += 1;
            assert!(inspected <= 2);
            *n < 2
        }),
        vec![1, 2, 3],
    );
    assert!(!ok);
}

#[test]
fn foldl_threads_accumulator() {
    assert_eq!(run(foldl(100, |acc, n| acc - n), vec![1, 2, 3]), 94);
    // Reusable: a second run starts from the initial accumulator again.
    let f = foldl(0, |acc, n: i32| acc + n);
    assert_eq!(stream::iter(vec![1, 2]).fold(f.clone()), 3);
    assert_eq!(stream::iter(vec![5]).fold(f), 5);
}

#[test]
fn from_fn_is_a_full_fold() {
    // A mean fold with early exit on the first negative input.
    let mean = from_fn(
        || FoldStep::Partial((0i64, 0i64)),
        |(total, count), n: i64| {
            if n < 0 {
                FoldStep::Done(None)
            } else {
                FoldStep::Partial((total + n, count + 1))
            }
        },
        |(total, count)| if count == 0 { None } else { Some(total / count) },
    );
    assert_eq!(stream::iter(vec![2i64, 4, 6]).fold(mean), Some(4));
}

#[test]
fn pre_map_changes_input() {
    let lens = to_vec().pre_map(|s: &str| s.len());
    assert_eq!(stream::iter(vec!["a", "bcd"]).fold(lens), vec![1, 3]);
}

#[test]
fn post_map_changes_output() {
    assert_eq!(run(length().post_map(|n| n * 2), vec![1, 2]), 4);
}

#[test]
fn filter_feeds_matching_only() {
    assert_eq!(run(sum().filter(|n| n % 2 == 0), vec![1, 2, 3, 4]), 6);
}

#[test]
fn take_bounds_input() {
    assert_eq!(run(sum().take(2), vec![5, 6, 7]), 11);
    assert_eq!(run(sum().take(0), vec![5, 6, 7]), 0);
    assert_eq!(run(sum().take(9), vec![5, 6]), 11);
}

#[test]
fn tee_pairs_outputs() {
    assert_eq!(run(sum().tee(length()), vec![1, 2, 3]), (6, 3));
}

#[test]
fn tee_finishes_when_both_do() {
    // `one` is done after the first element; the length side keeps
    // counting to the end.
    assert_eq!(run(one().tee(length()), vec![7, 8, 9]), (Some(7), 3));
}

#[test]
fn postscan_folds_running_outputs() {
    // Largest running sum.
    let peak = postscan(sum(), foldl(i32::MIN, |acc: i32, n: i32| acc.max(n)));
    assert_eq!(stream::iter(vec![2, -5, 9]).fold(peak), 6);
}

#[test]
fn running_handle_pushes() {
    let mut run = sum().start();
    assert!(!run.is_done());
    for n in [1, 2, 3] {
        run.push(n);
    }
    assert_eq!(run.finish(), 6);
}

#[test]
fn running_handle_respects_early_done() {
    let mut run = one().start();
    run.push(1);
    assert!(run.is_done());
    // Pushes after the fold finished are discarded.
    run.push(2);
    assert_eq!(run.finish(), Some(1));
}
