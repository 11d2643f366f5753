//! End-to-end pipelines: streams driving parsers through the public API.

use thresh::prelude::*;
use thresh::stream::Stream;

use thresh::combinator::{alt, from_fold, many, some, split_with, success};
use thresh::driver::Driver;
use thresh::{fold, stream, token, Either};

fn chars(s: &str) -> impl Stream<Item = char> + '_ {
    stream::iter(s.chars())
}

fn string_of(v: Vec<char>) -> String {
    v.into_iter().collect()
}

#[test]
fn stream_identity() {
    let xs = vec![1, 2, 3, 4, 5];
    assert_eq!(stream::iter(xs.clone()).to_vec(), xs);
}

#[test]
fn fold_totality_matches_iterator_fold() {
    let xs = vec![3i64, -1, 4, 1, 5];
    let lhs = stream::iter(xs.clone()).fold(fold::foldl(0i64, |acc, x| acc * 2 + x));
    let rhs = xs.iter().fold(0i64, |acc, x| acc * 2 + x);
    assert_eq!(lhs, rhs);
}

#[test]
fn from_fold_round_trip() {
    let xs = vec![9, 8, 7];
    assert_eq!(
        stream::iter(xs.clone()).parse(from_fold(fold::to_vec())),
        Ok(xs)
    );
}

#[test]
fn leading_zero_run() {
    // S1
    assert_eq!(
        stream::iter(vec![0, 0, 1, 0, 1]).parse(token::take_while(|x| *x == 0, fold::to_vec())),
        Ok(vec![0, 0])
    );
}

#[test]
fn counted_take_reports_shortfall() {
    // S2
    let err = stream::iter(vec![1, 2, 3])
        .parse(token::take_eq(4, fold::to_vec()))
        .unwrap_err();
    assert_eq!(
        err.message(),
        "take_eq: expecting exactly 4 elements, input terminated on 3"
    );
}

#[test]
fn braced_block_with_escapes() {
    // S3
    let body = chars("{hello {world}}").parse(token::take_framed_by_esc(
        |c| *c == '\\',
        |c| *c == '{',
        |c| *c == '}',
        fold::to_vec(),
    ));
    assert_eq!(body.map(string_of), Ok(String::from("hello {world}")));
}

#[test]
fn quoted_word_with_mixed_quotes() {
    // S4
    let word = chars("a\"b'c\";'d\"e'f ghi").parse(token::word_quoted_by(
        false,
        |c| *c == '\\',
        |c| *c == '"' || *c == '\'',
        |q| *q,
        |c| *c == ' ',
        fold::to_vec(),
    ));
    assert_eq!(word.map(string_of), Ok(String::from("ab'c;d\"ef")));
}

#[test]
fn ascending_runs() {
    // S5
    let runs: Vec<_> = stream::iter(vec![3, 5, 4, 1, 2, 0])
        .parse_many(token::group_by(|a, b| a < b, fold::to_vec()))
        .to_vec();
    assert_eq!(runs, vec![Ok(vec![3, 5, 4]), Ok(vec![1, 2]), Ok(vec![0])]);
}

#[test]
fn literal_matching() {
    // S6
    let expected: Vec<char> = "string".chars().collect();
    assert_eq!(
        chars("string").parse(token::list_eq(expected.clone())),
        Ok(expected.clone())
    );
    let err = chars("mismatch")
        .parse(token::list_eq(expected))
        .unwrap_err();
    assert_eq!(err.message(), "stream_eq_by: mismatch occurred");
}

#[test]
fn peek_then_one_reads_the_same_element() {
    let mut d = Driver::new(stream::iter(vec![42, 43]));
    assert_eq!(d.parse(&mut token::peek()), Ok(42));
    assert_eq!(d.parse(&mut token::any()), Ok(42));
}

#[test]
fn take_while_then_one_sees_the_boundary() {
    let mut d = Driver::new(stream::iter(vec![0, 0, 0, 5, 6]));
    assert_eq!(
        d.parse(&mut token::take_while(|x| *x == 0, fold::to_vec())),
        Ok(vec![0, 0, 0])
    );
    assert_eq!(d.parse(&mut token::any()), Ok(5));
}

#[test]
fn many_consumes_everything_some_needs_one() {
    let xs = vec![1, 2, 3];
    assert_eq!(
        stream::iter(xs.clone()).parse(many(token::any(), fold::to_vec())),
        Ok(xs)
    );
    assert!(stream::iter(Vec::<i32>::new())
        .parse(some(token::any(), fold::to_vec()))
        .is_err());
}

#[test]
fn alt_commit_rule() {
    // Committed: take_eq consumed (and committed) two elements before the
    // failure, so the second branch is never tried.
    let committed = split_with(
        |_, b: i32| b,
        token::take_eq(2, fold::drain()),
        thresh::combinator::fail("die: x"),
    );
    assert!(stream::iter(vec![1, 2, 3])
        .parse(alt(committed, success(0)))
        .is_err());

    // Uncommitted: one_eq fails on its only element and the fallback wins.
    assert_eq!(
        stream::iter(vec![1]).parse(alt(token::one_eq(9), success(0))),
        Ok(0)
    );
}

#[test]
fn deintercalate_tags_alternating_items() {
    let tagged = chars("a,b,c")
        .parse(thresh::combinator::deintercalate(
            token::satisfy(|c: &char| c.is_ascii_alphabetic()),
            token::one_eq(','),
            fold::to_vec(),
        ))
        .unwrap();
    assert_eq!(
        tagged,
        vec![
            Either::Left('a'),
            Either::Right(','),
            Either::Left('b'),
            Either::Right(','),
            Either::Left('c'),
        ]
    );
}

#[test]
fn csv_fields_end_to_end() {
    // A miniature CSV line: fields separated by commas, quoted fields may
    // contain commas.
    let field = token::word_quoted_by(
        false,
        |c: &char| *c == '\\',
        |c: &char| *c == '"',
        |q: &char| *q,
        |c: &char| *c == ',',
        fold::to_vec(),
    );
    let fields: Vec<_> = chars("one,\"two, three\",four")
        .parse_many(field)
        .to_vec();
    let fields: Vec<_> = fields.into_iter().map(|f| f.map(string_of)).collect();
    assert_eq!(
        fields,
        vec![
            Ok(String::from("one")),
            Ok(String::from("two, three")),
            Ok(String::from("four")),
        ]
    );
}

#[test]
fn transformed_streams_feed_parsers() {
    // Transformation and parsing fuse into one pass.
    let total = stream::iter(1..=10)
        .filter(|n| n % 2 == 1)
        .map(|n| n * n)
        .parse(token::take_eq(5, fold::sum()));
    assert_eq!(total, Ok(1 + 9 + 25 + 49 + 81));
}
