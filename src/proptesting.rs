#![cfg(test)]
use crate::grammars::calc::Calculator;
use crate::key::{self, MAX_ORDINAL};
use proptest::prelude::*;
use proptest_derive::Arbitrary;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Arbitrary)]
enum Op {
    Add,
    Sub,
    Mul,
}

impl Op {
    fn symbol(self) -> &'static str {
        match self {
            Op::Add => "+",
            Op::Sub => "-",
            Op::Mul => "*",
        }
    }
}

/// Multiplication first, then addition and subtraction left to right.
fn expected_value(first: i64, rest: &[(Op, i64)]) -> i64 {
    let mut terms = vec![(Op::Add, first)];
    for &(op, n) in rest {
        if op != Op::Mul {
            terms.push((op, n));
        } else if let Some((_, last)) = terms.last_mut() {
            *last *= n;
        }
    }
    terms.into_iter().fold(0, |total, (op, n)| match op {
        Op::Add => total + n,
        Op::Sub => total - n,
        Op::Mul => unreachable!(),
    })
}

fn expression_strategy() -> impl Strategy<Value = (i64, Vec<(Op, i64)>)> {
    (
        0i64..100,
        prop::collection::vec((any::<Op>(), 0i64..100), 0..6),
    )
}

#[test]
fn expected_values() {
    assert_eq!(expected_value(3, &[(Op::Add, 8), (Op::Mul, 5)]), 43);
    assert_eq!(expected_value(1, &[(Op::Sub, 2), (Op::Sub, 3)]), -4);
    assert_eq!(expected_value(7, &[]), 7);
}

proptest! {
    #[test]
    fn flat_expressions_respect_precedence((first, rest) in expression_strategy()) {
        let mut source = first.to_string();
        for (op, n) in &rest {
            source.push_str(&format!(" {} {n}", op.symbol()));
        }

        let mut calc = Calculator::new().unwrap();
        let actual = calc.evaluate(&source).unwrap_or_else(|e| panic!("{}", e.report(&source)));
        prop_assert_eq!(actual, expected_value(first, &rest), "{}", source);
    }
}

proptest! {
    #[test]
    fn concatenated_keys_split_apart(ordinals in prop::collection::vec(0..=MAX_ORDINAL, 0..20)) {
        let mut bytes = vec![];
        for n in &ordinals {
            bytes.extend_from_slice(key::encode(i64::from(*n)).unwrap().as_bytes());
        }

        let split: Result<Vec<u32>, _> = key::split(&bytes).collect();
        prop_assert_eq!(split, Ok(ordinals));
    }
}
