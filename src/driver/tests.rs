use super::*;

use crate::combinator::from_fold;
use crate::fold;
use crate::stream::Stream as _;
use crate::{stream, token};

#[test]
fn peek_leaves_input_for_the_next_parse() {
    let mut d = Driver::new(stream::iter(vec![1, 2]));
    assert_eq!(d.parse(&mut token::peek()), Ok(1));
    assert_eq!(d.parse(&mut token::any()), Ok(1));
    assert_eq!(d.parse(&mut token::any()), Ok(2));
    assert!(d.parse(&mut token::any()).is_err());
}

#[test]
fn take_while_rewinds_the_boundary_element() {
    let mut d = Driver::new(stream::iter(vec![0, 0, 7, 0]));
    assert_eq!(
        d.parse(&mut token::take_while(|x| *x == 0, fold::to_vec())),
        Ok(vec![0, 0])
    );
    assert_eq!(d.parse(&mut token::any()), Ok(7));
}

#[test]
fn offsets_track_consumed_elements() {
    let mut d = Driver::new(stream::iter(vec![1, 2, 3]));
    assert_eq!(d.offset(), 0);
    assert_eq!(d.parse(&mut token::any()), Ok(1));
    assert_eq!(d.offset(), 1);
    // A rewound element does not advance the offset.
    assert_eq!(d.parse(&mut token::peek()), Ok(2));
    assert_eq!(d.offset(), 1);
}

#[test]
fn error_positions_are_absolute() {
    let mut d = Driver::new(stream::iter(vec![0, 0, 0]));
    assert_eq!(d.parse(&mut token::one_eq(0)), Ok(0));
    let err = d.parse(&mut token::take_eq(5, fold::drain())).unwrap_err();
    assert_eq!(err.position(), 3);
}

#[test]
fn parse_on_empty_input_extracts_immediately() {
    assert_eq!(stream::iter(Vec::<i32>::new()).parse(token::eof()), Ok(()));
    assert_eq!(
        stream::iter(Vec::<i32>::new()).parse(from_fold(fold::to_vec())),
        Ok(vec![])
    );
}

#[test]
fn parse_skips_are_transparent() {
    // The driver resolves Skip steps while pulling.
    let evens = stream::iter(0..10).filter(|n| n % 2 == 0);
    assert_eq!(
        evens.parse(token::take_eq(3, fold::to_vec())),
        Ok(vec![0, 2, 4])
    );
}

#[test]
fn parse_many_splits_repeatedly() {
    let groups: Vec<_> = stream::iter(vec![1, 1, 2, 2, 2, 3])
        .parse_many(token::group_by(|a, b| a == b, fold::to_vec()))
        .to_vec();
    assert_eq!(
        groups,
        vec![Ok(vec![1, 1]), Ok(vec![2, 2, 2]), Ok(vec![3])]
    );
}

#[test]
fn parse_many_on_empty_input_is_empty() {
    let out: Vec<_> = stream::iter(Vec::<i32>::new())
        .parse_many(token::any())
        .to_vec();
    assert_eq!(out, vec![]);
}

#[test]
fn parse_many_ends_after_an_error() {
    let out: Vec<_> = stream::iter(vec![1, 1, 9, 1])
        .parse_many(token::one_eq(1))
        .to_vec();
    assert_eq!(out.len(), 3);
    assert_eq!(out[0], Ok(1));
    assert_eq!(out[1], Ok(1));
    assert!(out[2].is_err());
}

#[test]
fn parse_many_rounds_start_from_rewound_input() {
    // Each word round leaves the next word's first element buffered.
    let words: Vec<_> = stream::iter("a bb  ccc".chars())
        .parse_many(token::word_by(|c| *c == ' ', fold::length()))
        .to_vec();
    assert_eq!(words, vec![Ok(1), Ok(2), Ok(3)]);
}

#[test]
fn commit_truncates_the_rewind_buffer() {
    // take_while commits element by element, so the buffer holds at most
    // the one rewound element when it finishes.
    let mut d = Driver::new(stream::iter(vec![0; 1000].into_iter().chain(Some(1))));
    assert_eq!(
        d.parse(&mut token::take_while(|x| *x == 0, fold::length())),
        Ok(1000)
    );
    assert_eq!(d.parse(&mut token::any()), Ok(1));
}

#[test]
#[should_panic(expected = "consume input")]
fn parse_many_rejects_non_consuming_parsers() {
    let _ = stream::iter(vec![1])
        .parse_many(crate::combinator::success::<i32, i32>(9))
        .to_vec();
}
