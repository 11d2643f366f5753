use super::*;

use crate::driver::Driver;
use crate::fold;
use crate::parser::Parser as _;
use crate::stream::Stream as _;
use crate::{stream, token, Either};

fn chars(s: &str) -> crate::stream::Iter<core::str::Chars<'_>> {
    stream::iter(s.chars())
}

#[test]
fn from_fold_round_trips() {
    let xs = vec![1, 2, 3];
    assert_eq!(
        stream::iter(xs.clone()).parse(from_fold(fold::to_vec())),
        Ok(xs)
    );
}

#[test]
fn success_and_fail_consume_nothing() {
    let mut d = Driver::new(stream::iter(vec![7]));
    assert_eq!(d.parse(&mut success(42)), Ok(42));
    assert_eq!(d.parse(&mut fail::<i32, i32>("fail: nope")).unwrap_err().message(), "fail: nope");
    assert_eq!(d.parse(&mut token::any()), Ok(7));
}

#[test]
fn success_with_runs_per_parse() {
    let mut n = 0;
    let mut p = success_with::<i32, _, _>(move || {
        n += 1;
        n
    });
    let mut d = Driver::new(stream::iter(Vec::<i32>::new()));
    assert_eq!(d.parse(&mut p), Ok(1));
    assert_eq!(d.parse(&mut p), Ok(2));
}

#[test]
fn look_ahead_rewinds_on_success() {
    let mut d = Driver::new(stream::iter(vec![1, 2, 3]));
    let peeked = d.parse(&mut look_ahead(take_p(2, from_fold(fold::to_vec()))));
    assert_eq!(peeked, Ok(vec![1, 2]));
    // Everything the look-ahead consumed is re-fed to the next parser.
    assert_eq!(d.parse(&mut from_fold(fold::to_vec())), Ok(vec![1, 2, 3]));
}

#[test]
fn look_ahead_is_strict_about_eof() {
    let peeked = stream::iter(vec![1])
        .parse(look_ahead(token::take_eq(1, fold::to_vec())))
        .unwrap();
    assert_eq!(peeked, vec![1]);
    let err = stream::iter(Vec::<i32>::new())
        .parse(look_ahead(from_fold(fold::to_vec())))
        .unwrap_err();
    assert_eq!(err.message(), "look_ahead: unexpected end of input");
}

#[test]
fn take_p_caps_the_inner_parser() {
    assert_eq!(
        stream::iter(vec![1, 2, 3]).parse(take_p(2, from_fold(fold::to_vec()))),
        Ok(vec![1, 2])
    );
    // The cap only limits, it does not pad.
    assert_eq!(
        stream::iter(vec![0, 0, 9]).parse(take_p(5, token::take_while(|n| *n == 0, fold::to_vec()))),
        Ok(vec![0, 0])
    );
    let err = stream::iter(vec![1, 2, 3])
        .parse(take_p(2, token::take_eq(3, fold::to_vec())))
        .unwrap_err();
    assert_eq!(err.message(), "take_eq: expecting exactly 3 elements, input terminated on 2");
}

#[test]
fn split_with_sequences() {
    let p = split_with(
        |a, b| (a, b),
        token::take_eq(2, fold::to_vec()),
        from_fold(fold::to_vec()),
    );
    assert_eq!(
        stream::iter(vec![1, 2, 3, 4]).parse(p),
        Ok((vec![1, 2], vec![3, 4]))
    );
}

#[test]
fn split_with_hands_rewound_input_to_second() {
    // take_while rewinds the offending element; the second parser sees it.
    let p = split_with(
        |a, b| (a, b),
        token::take_while(|n| *n == 0, fold::to_vec()),
        token::any(),
    );
    assert_eq!(stream::iter(vec![0, 0, 7]).parse(p), Ok((vec![0, 0], 7)));
}

#[test]
fn alt_takes_first_on_success() {
    let p = alt(token::one_eq(1), token::any());
    assert_eq!(stream::iter(vec![1, 9]).parse(p), Ok(1));
}

#[test]
fn alt_falls_back_without_commit() {
    let p = alt(token::one_eq(9), success(0));
    assert_eq!(stream::iter(vec![1]).parse(p), Ok(0));

    // The fallback re-reads the input the first branch consumed.
    let p = alt(
        token::list_eq(vec!['a', 'x']),
        token::list_eq(vec!['a', 'b']),
    );
    assert_eq!(chars("ab").parse(p), Ok(vec!['a', 'b']));
}

#[test]
fn alt_commit_is_final() {
    // take_eq commits as it consumes, so the failure after it sticks.
    let committed = split_with(|_, b: i32| b, token::take_eq(2, fold::drain()), fail("die: x"));
    let err = stream::iter(vec![1, 2, 3])
        .parse(alt(committed, success(0)))
        .unwrap_err();
    assert_eq!(err.message(), "die: x");
}

#[test]
fn alt_tries_second_at_eof() {
    // The first branch consumes without committing, then fails at end of
    // input; the second branch re-reads the same two elements.
    let p = alt(token::list_eq(vec![1, 2, 3]), from_fold(fold::to_vec()));
    assert_eq!(stream::iter(vec![1, 2]).parse(p), Ok(vec![1, 2]));
}

#[test]
fn many_collects_until_failure() {
    assert_eq!(
        stream::iter(vec![1, 2, 3]).parse(many(token::any(), fold::to_vec())),
        Ok(vec![1, 2, 3])
    );
    assert_eq!(
        chars("aab").parse(many(token::one_eq('a'), fold::to_vec())),
        Ok(vec!['a', 'a'])
    );
    assert_eq!(
        stream::iter(Vec::<i32>::new()).parse(many(token::any(), fold::to_vec())),
        Ok(vec![])
    );
}

#[test]
fn many_leaves_the_failing_input() {
    let mut d = Driver::new(chars("aab"));
    assert_eq!(
        d.parse(&mut many(token::one_eq('a'), fold::to_vec())),
        Ok(vec!['a', 'a'])
    );
    assert_eq!(d.parse(&mut token::any()), Ok('b'));
}

#[test]
fn some_requires_one() {
    assert_eq!(
        chars("ab").parse(some(token::one_eq('a'), fold::to_vec())),
        Ok(vec!['a'])
    );
    assert!(chars("")
        .parse(some(token::any(), fold::to_vec()))
        .is_err());
    assert!(chars("b")
        .parse(some(token::one_eq('a'), fold::to_vec()))
        .is_err());
}

#[test]
fn many_with_multi_element_items() {
    let pairs = many(token::take_eq(2, fold::to_vec()), fold::to_vec());
    assert_eq!(
        stream::iter(vec![1, 2, 3, 4]).parse(pairs),
        Ok(vec![vec![1, 2], vec![3, 4]])
    );
}

#[test]
fn many_till_stops_on_stop() {
    let mut p = many_till(token::any(), token::one_eq('.'), fold::to_vec());
    let mut d = Driver::new(chars("ab.c"));
    assert_eq!(d.parse(&mut p), Ok(vec!['a', 'b']));
    // The stop match is consumed.
    assert_eq!(d.parse(&mut token::any()), Ok('c'));
}

#[test]
fn many_till_fails_without_stop() {
    let p = many_till(token::any(), token::one_eq('.'), fold::to_vec());
    assert!(chars("abc").parse(p).is_err());
}

#[test]
fn sep_by_parses_separated_items() {
    let p = || {
        sep_by(
            token::satisfy(char::is_ascii_digit),
            token::one_eq(','),
            fold::to_vec(),
        )
    };
    assert_eq!(chars("1,2,3").parse(p()), Ok(vec!['1', '2', '3']));
    assert_eq!(chars("1").parse(p()), Ok(vec!['1']));
    assert_eq!(chars("").parse(p()), Ok(vec![]));
}

#[test]
fn sep_by_rewinds_trailing_separator() {
    let mut p = sep_by(
        token::satisfy(char::is_ascii_digit),
        token::one_eq(','),
        fold::to_vec(),
    );
    let mut d = Driver::new(chars("1,2,x"));
    assert_eq!(d.parse(&mut p), Ok(vec!['1', '2']));
    // The separator before the mismatch is back in the input.
    assert_eq!(d.parse(&mut token::any()), Ok(','));
}

#[test]
fn sep_by_rewinds_separator_at_eof() {
    let mut p = sep_by(
        token::satisfy(char::is_ascii_digit),
        token::one_eq(','),
        fold::to_vec(),
    );
    let mut d = Driver::new(chars("1,"));
    assert_eq!(d.parse(&mut p), Ok(vec!['1']));
    assert_eq!(d.parse(&mut token::any()), Ok(','));
}

#[test]
fn sep_by1_needs_content() {
    let p = sep_by1(
        token::satisfy(char::is_ascii_digit),
        token::one_eq(','),
        fold::to_vec(),
    );
    assert!(chars("").parse(p).is_err());
}

#[test]
fn deintercalate_alternates_into_sink() {
    let p = || {
        deintercalate(
            token::take_while1(|c: &char| c.is_ascii_alphabetic(), fold::to_vec()),
            token::one_eq(','),
            fold::to_vec(),
        )
    };
    let tagged = chars("ab,c,de").parse(p()).unwrap();
    assert_eq!(
        tagged,
        vec![
            Either::Left(vec!['a', 'b']),
            Either::Right(','),
            Either::Left(vec!['c']),
            Either::Right(','),
            Either::Left(vec!['d', 'e']),
        ]
    );
    assert_eq!(chars("").parse(p()), Ok(vec![]));
}

#[test]
fn deintercalate_rewinds_trailing_right() {
    let mut p = deintercalate(
        token::take_while1(|c: &char| c.is_ascii_alphabetic(), fold::to_vec()),
        token::one_eq(','),
        fold::to_vec(),
    );
    let mut d = Driver::new(chars("ab,"));
    let tagged = d.parse(&mut p).unwrap();
    assert_eq!(tagged, vec![Either::Left(vec!['a', 'b'])]);
    assert_eq!(d.parse(&mut token::any()), Ok(','));
}

#[test]
fn sequence_runs_in_order() {
    let p = sequence(
        vec![
            token::take_eq(1, fold::to_vec()),
            token::take_eq(2, fold::to_vec()),
        ],
        fold::to_vec(),
    );
    assert_eq!(
        stream::iter(vec![1, 2, 3]).parse(p),
        Ok(vec![vec![1], vec![2, 3]])
    );
}

#[test]
fn sequence_of_nothing_is_identity() {
    let mut p = sequence(Vec::<token::Any<i32>>::new(), fold::to_vec());
    let mut d = Driver::new(stream::iter(vec![5]));
    assert_eq!(d.parse(&mut p), Ok(vec![]));
    assert_eq!(d.parse(&mut token::any()), Ok(5));
}

#[test]
fn parser_map_and_try_map() {
    let doubled = token::any().map(|n: i32| n * 2);
    assert_eq!(stream::iter(vec![21]).parse(doubled), Ok(42));

    let digit = token::any().try_map(|c: char| c.to_digit(10).ok_or("not a digit"));
    assert_eq!(chars("7").parse(digit), Ok(7));
    let digit = token::any().try_map(|c: char| c.to_digit(10).ok_or("not a digit"));
    assert_eq!(
        chars("x").parse(digit).unwrap_err().message(),
        "try_map: not a digit"
    );
}

#[test]
fn parser_pre_map_adapts_input() {
    let p = token::one_eq(5u8).pre_map(|s: &str| s.len() as u8);
    assert_eq!(stream::iter(vec!["abcde"]).parse(p), Ok(5));
}

#[test]
fn parser_filter_skips_input_without_commit() {
    let p = token::take_eq(2, fold::to_vec()).filter(|n: &i32| *n >= 0);
    assert_eq!(stream::iter(vec![1, -1, -2, 2]).parse(p), Ok(vec![1, 2]));
}
