use insta::assert_snapshot;
use shift_reduce::grammars::SourceError;
use shift_reduce::grammars::calc::{CalcError, Calculator};
use shift_reduce::grammars::json::JsonReader;
use shift_reduce::{
    Grammar, GrammarError, KeyError, NoSolution, ParseError, SymbolRole, Symbols, Token,
    UnknownSymbol, key,
};

fn keep(_: &Symbols, mut tokens: Vec<Token<()>>) -> Result<Token<()>, CalcError> {
    Ok(tokens.remove(0))
}

#[test]
fn grammar_errors() {
    let err = Grammar::<(), CalcError>::builder()
        .leaf("a")
        .build()
        .unwrap_err();
    assert_snapshot!(err, @"there can be only one root symbol, found 0");

    let err = Grammar::<(), CalcError>::builder()
        .branch("a")
        .root("b")
        .build()
        .unwrap_err();
    assert_snapshot!(err, @"at least one input symbol is needed");

    let err = Grammar::builder()
        .input_output("a")
        .leaf("+")
        .rule("a + a", keep)
        .rule("a  +  a", keep)
        .build()
        .unwrap_err();
    assert_snapshot!(err, @"rule 'a + a' has the same symbols as rule 'a + a'");

    let err = Grammar::builder()
        .input_output("a")
        .rule("a - a", keep)
        .build()
        .unwrap_err();
    assert_snapshot!(err, @"in rule 'a - a': no such symbol '-'");

    let err = Grammar::builder()
        .input_output("a")
        .rule("", keep)
        .build()
        .unwrap_err();
    assert_eq!(err, GrammarError::EmptyPattern);
}

#[test]
fn key_errors() {
    assert_snapshot!(key::encode(-1).unwrap_err(), @"-1 cannot be encoded as a key, only 0..=0x10FFFF is supported");
    assert_snapshot!(key::decode(&[0xC2]).unwrap_err(), @"not a valid key (at byte 1)");
    assert_eq!(
        GrammarError::from(KeyError::InvalidInput(0x11_0000)).to_string(),
        "too many symbols: 1114112 cannot be encoded as a key, only 0..=0x10FFFF is supported"
    );
}

#[test]
fn parse_errors() {
    let errors: [ParseError<CalcError>; 6] = [
        UnknownSymbol("?".into()).into(),
        ParseError::InvalidPush {
            symbol: "sum".into(),
            role: SymbolRole::Branch,
        },
        ParseError::EmptyInput,
        ParseError::NoSolution(NoSolution::TokenCount(3)),
        ParseError::NoSolution(NoSolution::NotRoot("elements".into())),
        ParseError::Reduction(CalcError::DivisionByZero),
    ];
    let lines: Vec<_> = errors.iter().map(ToString::to_string).collect();
    assert_snapshot!(lines.join("\n"), @r"
    no such symbol '?'
    cannot push 'sum', it is a branch symbol
    no tokens pushed
    end of tokens reached, but no valid solution: token count is not 1 but 3
    end of tokens reached, but no valid solution: remaining token 'elements' is not root
    division by zero
    ");
    assert_snapshot!(
        ParseError::<CalcError>::Ended,
        @"the parse has already failed, the parser needs a reset"
    );
}

#[test]
fn reports_point_at_the_source() {
    let mut calc = Calculator::new().unwrap();

    let source = "12 / (3 - 3)";
    let err = calc.evaluate(source).unwrap_err();
    let report = err.report(source);
    println!("{report}");
    assert!(report.contains("division by zero"), "{report}");
    assert!(report.contains(source), "{report}");

    let source = "1 + $";
    let err = calc.evaluate(source).unwrap_err();
    assert_eq!(err, SourceError::Scan { span: 4..5 });
    let report = err.report(source);
    println!("{report}");
    assert!(report.contains("unrecognised input"), "{report}");
    assert!(report.contains("not a token"), "{report}");

    let mut reader = JsonReader::new().unwrap();
    let source = r#"{"a": 1,}"#;
    let err = reader.read(source).unwrap_err();
    let report = err.report(source);
    println!("{report}");
    assert!(report.contains("no valid solution"), "{report}");
}
