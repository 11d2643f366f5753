use super::*;

use crate::fold;
use crate::stream::Stream as _;
use crate::{stream, Either};

use proptest::prelude::*;

fn chars(s: &str) -> crate::stream::Iter<core::str::Chars<'_>> {
    stream::iter(s.chars())
}

fn string_of(v: Vec<char>) -> String {
    v.into_iter().collect()
}

#[test]
fn any_takes_one() {
    assert_eq!(chars("ab").parse(any()), Ok('a'));
    assert!(chars("").parse(any()).is_err());
}

#[test]
fn peek_does_not_consume() {
    let err = chars("").parse(peek::<char>()).unwrap_err();
    assert_eq!(err.message(), "peek: unexpected end of input");
}

#[test]
fn eof_only_at_end() {
    assert_eq!(chars("").parse(eof()), Ok(()));
    assert!(chars("x").parse(eof()).is_err());
}

#[test]
fn satisfy_checks_predicate() {
    assert_eq!(chars("7").parse(satisfy(char::is_ascii_digit)), Ok('7'));
    assert!(chars("x").parse(satisfy(char::is_ascii_digit)).is_err());
}

#[test]
fn satisfy_map_maps_or_fails() {
    assert_eq!(chars("7").parse(satisfy_map(|c: &char| c.to_digit(10))), Ok(7));
    assert!(chars("x")
        .parse(satisfy_map(|c: &char| c.to_digit(10)))
        .is_err());
}

#[test]
fn element_equality_parsers() {
    assert_eq!(chars("ab").parse(one_eq('a')), Ok('a'));
    assert!(chars("ba").parse(one_eq('a')).is_err());
    assert_eq!(chars("ba").parse(one_not_eq('a')), Ok('b'));
    assert!(chars("ab").parse(one_not_eq('a')).is_err());
}

#[test]
fn token_sets() {
    assert_eq!(chars("+3").parse(one_of(['+', '-'])), Ok('+'));
    assert!(chars("3").parse(one_of(['+', '-'])).is_err());
    assert_eq!(chars("3").parse(none_of(['+', '-'])), Ok('3'));
    let vowels = "aeiou".chars().collect::<Vec<_>>();
    assert_eq!(chars("e").parse(one_of(vowels.as_slice())), Ok('e'));
    assert_eq!(chars("9").parse(one_of(|c: &char| c.is_numeric())), Ok('9'));
}

#[test]
fn list_eq_matches_whole_prefix() {
    let expected: Vec<char> = "string".chars().collect();
    assert_eq!(chars("strings").parse(list_eq(expected.clone())), Ok(expected));
}

#[test]
fn list_eq_reports_stream_eq_mismatch() {
    let expected: Vec<char> = "string".chars().collect();
    let err = chars("mismatch").parse(list_eq(expected)).unwrap_err();
    assert_eq!(err.message(), "stream_eq_by: mismatch occurred");
}

#[test]
fn list_eq_on_truncated_input() {
    let expected: Vec<char> = "string".chars().collect();
    let err = chars("str").parse(list_eq(expected)).unwrap_err();
    assert_eq!(err.message(), "stream_eq_by: unexpected end of input");
}

#[test]
fn stream_eq_by_compares_against_stream() {
    let p = stream_eq_by(|a: &i32, b: &i32| a == b, stream::iter(1..=3));
    assert_eq!(stream::iter(vec![1, 2, 3, 4]).parse(p), Ok(()));
}

#[test]
fn take_eq_consumes_exactly() {
    assert_eq!(
        stream::iter(vec![1, 2, 3]).parse(take_eq(2, fold::to_vec())),
        Ok(vec![1, 2])
    );
    assert_eq!(stream::iter(vec![1, 2]).parse(take_eq(0, fold::to_vec())), Ok(vec![]));
}

#[test]
fn take_eq_reports_shortfall() {
    let err = stream::iter(vec![1, 2, 3])
        .parse(take_eq(4, fold::to_vec()))
        .unwrap_err();
    assert_eq!(
        err.message(),
        "take_eq: expecting exactly 4 elements, input terminated on 3"
    );
    assert_eq!(err.position(), 3);
}

#[test]
fn take_eq_drains_past_early_fold_exit() {
    // The fold stops at one element; take_eq still consumes all three.
    let leftover = {
        let mut d = crate::driver::Driver::new(stream::iter(vec![1, 2, 3, 4]));
        let first = d.parse(&mut take_eq(3, fold::one())).unwrap();
        assert_eq!(first, Some(1));
        d.parse(&mut any()).unwrap()
    };
    assert_eq!(leftover, 4);
}

#[test]
fn take_ge_takes_at_least() {
    let err = stream::iter(vec![1])
        .parse(take_ge(2, fold::to_vec()))
        .unwrap_err();
    assert_eq!(
        err.message(),
        "take_ge: expecting at least 2 elements, input terminated on 1"
    );
    assert_eq!(
        stream::iter(vec![1, 2, 3]).parse(take_ge(2, fold::to_vec())),
        Ok(vec![1, 2, 3])
    );
}

#[test]
fn take_between_bounds() {
    assert_eq!(
        stream::iter(vec![1, 2, 3, 4]).parse(take_between(1, 3, fold::to_vec())),
        Ok(vec![1, 2, 3])
    );
    assert_eq!(
        stream::iter(vec![1, 2]).parse(take_between(1, 3, fold::to_vec())),
        Ok(vec![1, 2])
    );
    assert!(stream::iter(Vec::<i32>::new())
        .parse(take_between(1, 3, fold::to_vec()))
        .is_err());
    assert!(stream::iter(vec![1])
        .parse(take_between(3, 1, fold::to_vec()))
        .is_err());
    assert_eq!(
        stream::iter(vec![1]).parse(take_between(0, 0, fold::to_vec())),
        Ok(vec![])
    );
}

#[test]
fn take_while_stops_before_mismatch() {
    assert_eq!(
        stream::iter(vec![0, 0, 1, 0, 1]).parse(take_while(|x| *x == 0, fold::to_vec())),
        Ok(vec![0, 0])
    );
    assert_eq!(
        stream::iter(Vec::<i32>::new()).parse(take_while(|x| *x == 0, fold::to_vec())),
        Ok(vec![])
    );
}

#[test]
fn take_while1_requires_first_match() {
    assert_eq!(
        chars("aab").parse(take_while1(|c| *c == 'a', fold::to_vec())),
        Ok(vec!['a', 'a'])
    );
    let err = chars("baa")
        .parse(take_while1(|c| *c == 'a', fold::to_vec()))
        .unwrap_err();
    assert_eq!(err.message(), "take_while1: predicate failed on first element");
    assert!(chars("")
        .parse(take_while1(|c| *c == 'a', fold::to_vec()))
        .is_err());
}

#[test]
fn take_while_p_finalizes_inner_at_boundary() {
    // Cap the run with an inner counted parser.
    let p = take_while_p(|c: &char| *c != ';', take_eq(3, fold::to_vec()));
    assert_eq!(chars("abc;d").parse(p), Ok(vec!['a', 'b', 'c']));

    let short = take_while_p(|c: &char| *c != ';', take_eq(3, fold::to_vec()));
    assert!(chars("ab;cd").parse(short).is_err());
}

#[test]
fn drop_while_discards_prefix() {
    let mut d = crate::driver::Driver::new(chars("   x"));
    d.parse(&mut drop_while(|c: &char| *c == ' ')).unwrap();
    assert_eq!(d.parse(&mut any()), Ok('x'));
}

#[test]
fn group_by_splits_on_head_relation() {
    let groups: Vec<_> = stream::iter(vec![3, 5, 4, 1, 2, 0])
        .parse_many(group_by(|a, b| a < b, fold::to_vec()))
        .to_vec();
    assert_eq!(
        groups,
        vec![Ok(vec![3, 5, 4]), Ok(vec![1, 2]), Ok(vec![0])]
    );
}

#[test]
fn group_by_rolling_compares_neighbors() {
    let groups: Vec<_> = stream::iter(vec![1, 2, 3, 2, 3, 1])
        .parse_many(group_by_rolling(|prev, cur| prev < cur, fold::to_vec()))
        .to_vec();
    assert_eq!(
        groups,
        vec![Ok(vec![1, 2, 3]), Ok(vec![2, 3]), Ok(vec![1])]
    );
}

#[test]
fn group_by_rolling_either_reports_direction() {
    let p = || group_by_rolling_either(|a, b| a <= b, fold::to_vec(), fold::to_vec());
    assert_eq!(
        stream::iter(vec![1, 2, 3, 0]).parse(p()),
        Ok(Either::Left(vec![1, 2, 3]))
    );
    assert_eq!(
        stream::iter(vec![3, 2, 1, 5]).parse(p()),
        Ok(Either::Right(vec![3, 2, 1]))
    );
    // A lone element groups left.
    assert_eq!(stream::iter(vec![9]).parse(p()), Ok(Either::Left(vec![9])));
}

#[test]
fn span_splits_at_first_mismatch() {
    let (zeros, rest) = stream::iter(vec![0, 0, 7, 0])
        .parse(span(|x| *x == 0, fold::to_vec(), fold::to_vec()))
        .unwrap();
    assert_eq!(zeros, vec![0, 0]);
    assert_eq!(rest, vec![7, 0]);
}

#[test]
fn take_end_by_keeps_separator() {
    let p = take_end_by(|c: &char| *c == '\n', crate::combinator::from_fold(fold::to_vec()));
    assert_eq!(chars("ab\ncd").parse(p).map(string_of), Ok(String::from("ab\n")));
}

#[test]
fn take_end_by_drop_discards_separator() {
    let p = take_end_by_drop(|c: &char| *c == '\n', crate::combinator::from_fold(fold::to_vec()));
    assert_eq!(chars("ab\ncd").parse(p).map(string_of), Ok(String::from("ab")));
}

#[test]
fn take_end_by_esc_protects_separator() {
    let p = take_end_by_esc(
        |c: &char| *c == '\\',
        |c: &char| *c == ';',
        crate::combinator::from_fold(fold::to_vec()),
    );
    assert_eq!(
        chars("a\\;b;c").parse(p).map(string_of),
        Ok(String::from("a\\;b;"))
    );
}

#[test]
fn take_start_by_frames() {
    let groups: Vec<_> = chars(">a>bc>d")
        .parse_many(take_start_by(|c| *c == '>', fold::to_vec()))
        .to_vec();
    let groups: Vec<_> = groups.into_iter().map(|g| g.map(string_of)).collect();
    assert_eq!(
        groups,
        vec![
            Ok(String::from(">a")),
            Ok(String::from(">bc")),
            Ok(String::from(">d"))
        ]
    );
}

#[test]
fn take_start_by_drop_drops_marker() {
    assert_eq!(
        chars(">ab>c")
            .parse(take_start_by_drop(|c| *c == '>', fold::to_vec()))
            .map(string_of),
        Ok(String::from("ab"))
    );
    let err = chars("ab")
        .parse(take_start_by_drop(|c| *c == '>', fold::to_vec()))
        .unwrap_err();
    assert_eq!(err.message(), "take_start_by_drop: frame start missing");
}

#[test]
fn take_framed_by_drops_outer_pair() {
    assert_eq!(
        chars("(ab)c")
            .parse(take_framed_by(|c| *c == '(', |c| *c == ')', fold::to_vec()))
            .map(string_of),
        Ok(String::from("ab"))
    );
}

#[test]
fn take_framed_by_esc_keeps_nested_frames() {
    let p = || {
        take_framed_by_esc(
            |c: &char| *c == '\\',
            |c: &char| *c == '{',
            |c: &char| *c == '}',
            fold::to_vec(),
        )
    };
    assert_eq!(
        chars("{hello {world}}").parse(p()).map(string_of),
        Ok(String::from("hello {world}"))
    );
    // The escape strips a delimiter of its framing role.
    assert_eq!(
        chars("{a\\}b}").parse(p()).map(string_of),
        Ok(String::from("a}b"))
    );
    let err = chars("{oops").parse(p()).unwrap_err();
    assert_eq!(err.message(), "take_framed_by_esc: missing frame end");
}

#[test]
fn take_framed_by_generic_requires_a_delimiter() {
    type Pred = fn(&char) -> bool;
    let p = take_framed_by_generic::<char, Pred, Pred, Pred, _>(None, None, None, fold::to_vec());
    let err = chars("x").parse(p).unwrap_err();
    assert_eq!(
        err.message(),
        "take_framed_by_generic: at least one of a begin or end predicate is required"
    );
}

#[test]
fn take_framed_by_generic_end_only() {
    type Pred = fn(&char) -> bool;
    let p = take_framed_by_generic::<char, Pred, Pred, _, _>(
        None,
        None,
        Some(|c: &char| *c == '.'),
        fold::to_vec(),
    );
    assert_eq!(chars("ab.cd").parse(p).map(string_of), Ok(String::from("ab")));
}

#[test]
fn word_by_splits_words() {
    let words: Vec<_> = chars("  to the  mill ")
        .parse_many(word_by(|c| *c == ' ', fold::to_vec()))
        .to_vec();
    let words: Vec<_> = words.into_iter().map(|w| w.map(string_of)).collect();
    assert_eq!(
        words,
        vec![
            Ok(String::from("to")),
            Ok(String::from("the")),
            Ok(String::from("mill"))
        ]
    );
}

#[test]
fn word_framed_by_shields_separators() {
    let p = || {
        word_framed_by(
            |c: &char| *c == '\\',
            |c: &char| *c == '[',
            |c: &char| *c == ']',
            |c: &char| *c == ' ',
            fold::to_vec(),
        )
    };
    assert_eq!(
        chars("[a b] c").parse(p()).map(string_of),
        Ok(String::from("a b"))
    );
    assert_eq!(
        chars("x[ ]y z").parse(p()).map(string_of),
        Ok(String::from("x y"))
    );
    let err = chars("[a b").parse(p()).unwrap_err();
    assert_eq!(err.message(), "word_framed_by: missing frame end");
}

#[test]
fn word_quoted_by_mixed_quotes() {
    let p = |keep| {
        word_quoted_by(
            keep,
            |c: &char| *c == '\\',
            |c: &char| *c == '"' || *c == '\'',
            |q: &char| *q,
            |c: &char| *c == ' ',
            fold::to_vec(),
        )
    };
    assert_eq!(
        chars("a\"b'c\";'d\"e'f ghi").parse(p(false)).map(string_of),
        Ok(String::from("ab'c;d\"ef"))
    );
    assert_eq!(
        chars("a\"b'c\";'d\"e'f ghi").parse(p(true)).map(string_of),
        Ok(String::from("a\"b'c\";'d\"e'f"))
    );
    let err = chars("\"open").parse(p(false)).unwrap_err();
    assert_eq!(err.message(), "word_quoted_by: missing quote end");
}

proptest! {
    #[test]
    fn take_while_matches_model(xs: Vec<u8>) {
        let expected: Vec<u8> = xs.iter().copied().take_while(|n| n % 2 == 0).collect();
        let got = stream::iter(xs).parse(take_while(|n| n % 2 == 0, fold::to_vec()));
        prop_assert_eq!(got, Ok(expected));
    }

    #[test]
    fn list_eq_total_on_itself(xs: Vec<u8>) {
        let got = stream::iter(xs.clone()).parse(list_eq(xs.clone()));
        prop_assert_eq!(got, Ok(xs));
    }

    #[test]
    fn take_eq_len_matches(xs: Vec<u8>, n in 0usize..8) {
        let got = stream::iter(xs.clone()).parse(take_eq(n, fold::to_vec()));
        if n <= xs.len() {
            prop_assert_eq!(got, Ok(xs[..n].to_vec()));
        } else {
            prop_assert!(got.is_err());
        }
    }
}
