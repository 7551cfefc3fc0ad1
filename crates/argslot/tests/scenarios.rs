use std::path::PathBuf;

use argslot::{
    Classification, DefinitionError, Error, ParseOutcome, Parser, Repeat, adjacent, classify,
    convert, default_text, implicit, name, positional, predicate, prefix, repeatable, required,
};
use regex::Regex;

fn argv(tokens: &[&str]) -> Vec<String> {
    std::iter::once("prog")
        .chain(tokens.iter().copied())
        .map(str::to_string)
        .collect()
}

#[test]
fn double_and_repeatable_positional_int() {
    let mut d = 0.0f64;
    let mut i: Vec<i32> = Vec::new();
    {
        let mut p = Parser::new();
        p.arg(&mut d, 'd', "D").unwrap();
        p.arg_with(
            &mut i,
            ["--int", "-i"],
            "int",
            [repeatable(Repeat::Unbounded), positional(0)],
        )
        .unwrap();
        let outcome = p.parse(argv(&["-d", "1.5", "--int", "3", "4"])).unwrap();
        assert_eq!(outcome, ParseOutcome::Parsed);
    }
    assert_eq!(d, 1.5);
    assert_eq!(i, vec![3, 4]);
}

#[test]
fn bool_switch_alone() {
    let mut v = false;
    {
        let mut p = Parser::new();
        p.arg(&mut v, 'v', "verbose").unwrap();
        p.parse(argv(&["-v"])).unwrap();
    }
    assert!(v);
}

#[test]
fn required_switch_is_satisfied_by_presence() {
    let mut v = false;
    {
        let mut p = Parser::new();
        p.arg_with(&mut v, 'v', "verbose", [required()]).unwrap();
        p.parse(argv(&["-v"])).unwrap();
    }
    assert!(v);
}

#[test]
fn flag_at_end_of_input() {
    let mut c = 0i32;
    let mut p = Parser::new();
    p.arg_with(&mut c, 'c', "C", [required()]).unwrap();
    let err = p.parse(argv(&["-c"])).unwrap_err();
    assert!(matches!(err, Error::MissingValue { ref name } if name == "C"));

    let mut c = 7i32;
    {
        let mut p = Parser::new();
        p.arg(&mut c, 'c', "C").unwrap();
        p.parse(argv(&["-c"])).unwrap();
    }
    assert_eq!(c, 7);
}

#[test]
fn required_flag_followed_by_flag() {
    let mut a = 0i32;
    let mut b = 0i32;
    let mut p = Parser::new();
    p.arg_with(&mut a, ['a', 'A'], "alpha", [required()])
        .unwrap()
        .arg(&mut b, "--beta", "beta")
        .unwrap();
    for tokens in [&["-a", "--beta", "1"][..], &["-A", "-a"][..]] {
        let err = p.parse(argv(tokens)).unwrap_err();
        assert_eq!(err.to_string(), "alpha without value");
    }
}

#[test]
fn required_never_given() {
    let mut path: Option<PathBuf> = None;
    let mut p = Parser::new();
    p.arg_with(&mut path, "--out", "output", [required(), name("out")])
        .unwrap();
    let err = p.parse(argv(&[])).unwrap_err();
    assert_eq!(err.to_string(), "out without value");
}

#[test]
fn unregistered_short_flag() {
    let mut a = 0i32;
    let mut p = Parser::new();
    p.arg(&mut a, 'a', "A").unwrap();
    let err = p.parse(argv(&["-z"])).unwrap_err();
    assert!(matches!(err, Error::UnrecognizedArgument { ref token } if token == "-z"));
    assert_eq!(err.to_string(), "unrecognized argument -z");
}

#[test]
fn unregistered_long_flag() {
    let mut a = 0i32;
    let mut p = Parser::new();
    p.arg(&mut a, "--alpha", "A").unwrap();
    let err = p.parse(argv(&["--alp"])).unwrap_err();
    assert!(matches!(err, Error::UnrecognizedArgument { .. }));
}

#[test]
fn long_inline_value() {
    let mut i = 0i32;
    {
        let mut p = Parser::new();
        p.arg(&mut i, "--int", "int").unwrap();
        p.parse(argv(&["--int=7"])).unwrap();
    }
    assert_eq!(i, 7);
}

#[test]
fn short_inline_value() {
    let mut d = 0.0f64;
    {
        let mut p = Parser::new();
        p.arg(&mut d, 'd', "D").unwrap();
        p.parse(argv(&["-d1.5"])).unwrap();
    }
    assert_eq!(d, 1.5);
}

#[test]
fn short_inline_on_repeatable_does_not_wait() {
    let mut d: Vec<f64> = Vec::new();
    let mut p = Parser::new();
    p.arg_with(&mut d, 'd', "D", [repeatable(Repeat::Times(3))])
        .unwrap();
    // The bare token after an inline value is not a continuation.
    let err = p.parse(argv(&["-d1.5", "2.5"])).unwrap_err();
    assert!(matches!(err, Error::UnrecognizedArgument { ref token } if token == "2.5"));
}

#[test]
fn short_inline_on_repeatable_then_separate_values() {
    let mut d: Vec<f64> = Vec::new();
    {
        let mut p = Parser::new();
        p.arg_with(&mut d, 'd', "D", [repeatable(Repeat::Times(3))])
            .unwrap();
        p.parse(argv(&["-d1.5", "-d", "2.5", "3.5"])).unwrap();
    }
    assert_eq!(d, vec![1.5, 2.5, 3.5]);
}

#[test]
fn repeatable_count_is_enforced() {
    let mut v: Vec<u32> = Vec::new();
    let mut p = Parser::new();
    p.arg_with(&mut v, 'n', "num", [repeatable(Repeat::Times(2))])
        .unwrap();
    let err = p.parse(argv(&["-n", "1", "-n", "2", "-n", "3"])).unwrap_err();
    assert_eq!(err.to_string(), "excessive argument num");
}

#[test]
fn repeatable_count_via_continuation() {
    let mut v: Vec<u32> = Vec::new();
    let mut p = Parser::new();
    p.arg_with(&mut v, 'n', "num", [repeatable(Repeat::Times(2))])
        .unwrap();
    // After two values the slot closes; a third bare token has nowhere to go.
    let err = p.parse(argv(&["-n", "1", "2", "3"])).unwrap_err();
    assert!(matches!(err, Error::UnrecognizedArgument { ref token } if token == "3"));
}

#[test]
fn single_use_slot_rejects_second_match() {
    let mut a = 0i32;
    let mut p = Parser::new();
    p.arg(&mut a, 'a', "A").unwrap();
    let err = p.parse(argv(&["-a", "1", "-a", "2"])).unwrap_err();
    assert!(matches!(err, Error::ExcessiveArgument { .. }));
}

#[test]
fn unbounded_never_excessive() {
    let mut v: Vec<u32> = Vec::new();
    {
        let mut p = Parser::new();
        p.arg_with(&mut v, 'n', "num", [repeatable(Repeat::Unbounded)])
            .unwrap();
        let mut tokens = Vec::new();
        for k in 0..200 {
            tokens.push("-n".to_string());
            tokens.push(k.to_string());
        }
        let tokens: Vec<&str> = tokens.iter().map(String::as_str).collect();
        p.parse(argv(&tokens)).unwrap();
    }
    assert_eq!(v.len(), 200);
    assert_eq!(v[199], 199);
}

#[test]
fn overlapping_matchers_resolve_to_first() {
    let mut a: Vec<String> = Vec::new();
    let mut b: Vec<String> = Vec::new();
    {
        let mut p = Parser::new();
        p.arg_with(
            &mut a,
            predicate(|s| s.starts_with('t')),
            "A",
            [repeatable(Repeat::Unbounded)],
        )
        .unwrap();
        p.arg_with(
            &mut b,
            predicate(|s| s.ends_with('t')),
            "B",
            [repeatable(Repeat::Unbounded)],
        )
        .unwrap();
        p.parse(argv(&["tat", "cat"])).unwrap();
    }
    assert_eq!(a, vec!["tat".to_string()]);
    assert_eq!(b, vec!["cat".to_string()]);
}

#[test]
fn conversion_error_is_fatal() {
    let mut a = 0i32;
    let mut b = 0i32;
    let mut p = Parser::new();
    p.arg(&mut a, 'a', "A").unwrap();
    p.arg(&mut b, 'b', "B").unwrap();
    let err = p.parse(argv(&["-a", "x1", "-b", "2"])).unwrap_err();
    let Error::Conversion { name, source } = err else {
        panic!("expected conversion error");
    };
    assert_eq!(name, "A");
    assert_eq!(source.value, "x1");
    assert_eq!(source.type_name, "i32");
}

#[test]
fn earlier_values_survive_failure() {
    let mut a = 0i32;
    {
        let mut p = Parser::new();
        p.arg(&mut a, 'a', "A").unwrap();
        assert!(p.parse(argv(&["-a", "5", "-q"])).is_err());
    }
    assert_eq!(a, 5);
}

#[test]
fn context_matchers_bind_the_token_itself() {
    let mut txt: Vec<PathBuf> = Vec::new();
    let mut t = String::new();
    {
        let mut p = Parser::new();
        p.arg_with(
            &mut txt,
            Regex::new(r".*\.txt").unwrap(),
            "text files",
            [repeatable(Repeat::Unbounded)],
        )
        .unwrap();
        p.arg(&mut t, predicate(|s| s.starts_with('t')), "starts with t")
            .unwrap();
        p.parse(argv(&["a.txt", "tool", "b.txt"])).unwrap();
    }
    assert_eq!(txt, vec![PathBuf::from("a.txt"), PathBuf::from("b.txt")]);
    assert_eq!(t, "tool");
}

#[test]
fn context_literal_sets_switch() {
    let mut run = false;
    let mut speed = 0u8;
    {
        let mut p = Parser::new();
        p.arg(&mut run, "run", "run it").unwrap();
        p.arg_with(&mut speed, "fast", "speed", [implicit(9u8)])
            .unwrap();
        assert_eq!(p.parse(argv(&["run", "fast"])).unwrap(), ParseOutcome::Parsed);
    }
    assert!(run);
    assert_eq!(speed, 9);
}

#[test]
fn prefix_matcher_accepts_longer_flags() {
    let mut color = String::new();
    {
        let mut p = Parser::new();
        p.arg(&mut color, prefix("--col"), "color").unwrap();
        p.parse(argv(&["--colour=red"])).unwrap();
    }
    assert_eq!(color, "red");
}

#[test]
fn custom_converter_replaces_default() {
    let mut kb = 0u64;
    {
        let mut p = Parser::new();
        p.arg_with(
            &mut kb,
            "--size",
            "size",
            [convert(|s: &str| {
                s.strip_suffix('k')
                    .ok_or("missing k suffix")
                    .and_then(|n| n.parse::<u64>().map_err(|_| "not a number"))
                    .map(|n| n * 1024)
            })],
        )
        .unwrap();
        p.parse(argv(&["--size", "4k"])).unwrap();
    }
    assert_eq!(kb, 4096);

    let mut kb = 0u64;
    let mut p = Parser::new();
    p.arg_with(
        &mut kb,
        "--size",
        "size",
        [convert(|s: &str| s.parse::<u64>())],
    )
    .unwrap();
    let err = p.parse(argv(&["--size=4k"])).unwrap_err();
    assert!(err.to_string().contains("\"4k\" cannot be interpreted as u64"));
}

#[test]
fn implicit_default_without_value() {
    let mut level = 0u8;
    {
        let mut p = Parser::new();
        p.arg_with(&mut level, "--level", "level", [implicit(3u8)])
            .unwrap();
        p.parse(argv(&["--level"])).unwrap();
    }
    assert_eq!(level, 3);

    let mut level = 0u8;
    {
        let mut p = Parser::new();
        p.arg_with(&mut level, "--level", "level", [implicit(3u8)])
            .unwrap();
        p.parse(argv(&["--level=5"])).unwrap();
    }
    assert_eq!(level, 5);
}

#[test]
fn bool_explicit_inline_value() {
    let mut v = true;
    {
        let mut p = Parser::new();
        p.arg(&mut v, ('v', "--verbose"), "verbose").unwrap();
        p.parse(argv(&["--verbose=off"])).unwrap();
    }
    assert!(!v);
}

#[test]
fn positional_limit_and_order() {
    let mut first: Vec<String> = Vec::new();
    let mut rest: Vec<String> = Vec::new();
    {
        let mut p = Parser::new();
        p.arg_with(
            &mut first,
            "--first",
            "first",
            [repeatable(Repeat::Unbounded), positional(2)],
        )
        .unwrap();
        p.arg_with(
            &mut rest,
            "--rest",
            "rest",
            [repeatable(Repeat::Unbounded), positional(0)],
        )
        .unwrap();
        p.parse(argv(&["a", "b", "c", "d"])).unwrap();
    }
    assert_eq!(first, vec!["a", "b"]);
    assert_eq!(rest, vec!["c", "d"]);
}

#[test]
fn adjacent_positional_closes_after_interruption() {
    let mut files: Vec<String> = Vec::new();
    let mut v = false;
    let mut p = Parser::new();
    p.arg_with(
        &mut files,
        "--file",
        "files",
        [repeatable(Repeat::Unbounded), positional(0), adjacent()],
    )
    .unwrap();
    p.arg(&mut v, 'v', "verbose").unwrap();
    let err = p.parse(argv(&["a", "b", "-v", "c"])).unwrap_err();
    assert!(matches!(err, Error::UnexpectedArgument { ref token } if token == "c"));
}

#[test]
fn non_adjacent_positional_resumes_after_interruption() {
    let mut files: Vec<String> = Vec::new();
    let mut v = false;
    {
        let mut p = Parser::new();
        p.arg_with(
            &mut files,
            "--file",
            "files",
            [repeatable(Repeat::Unbounded), positional(0)],
        )
        .unwrap();
        p.arg(&mut v, 'v', "verbose").unwrap();
        p.parse(argv(&["a", "-v", "b"])).unwrap();
    }
    assert_eq!(files, vec!["a", "b"]);
    assert!(v);
}

#[test]
fn definition_errors() {
    let (mut a, mut b, mut c) = (0i32, 0i32, 0i32);
    let mut p = Parser::new();
    let err = p.arg(&mut a, "-aa", "A").unwrap_err();
    assert!(matches!(
        err,
        Error::Definition(DefinitionError::ShortTooLong { .. })
    ));

    let err = p
        .arg_with(&mut b, 'b', "B", [required(), required()])
        .unwrap_err();
    assert!(matches!(
        err,
        Error::Definition(DefinitionError::DuplicateModifier { .. })
    ));

    let err = p.arg_with(&mut c, 'c', "C", [adjacent()]).unwrap_err();
    assert!(matches!(
        err,
        Error::Definition(DefinitionError::InvalidModifiers { .. })
    ));
    assert!(p.registry().is_empty());
}

#[test]
fn classifier_agrees_with_registration() {
    let mut a = 0i32;
    let mut p = Parser::new();
    p.arg(&mut a, ("-a", "--alpha", "alpha", "---alpha"), "A")
        .unwrap();
    let classes: Vec<Classification> = p.describe()[0]
        .matchers
        .iter()
        .map(|m| m.class)
        .collect();
    assert_eq!(
        classes,
        [
            Classification::Short,
            Classification::Long,
            Classification::Context,
            Classification::Context
        ]
    );
    let reg = p.registry();
    assert_eq!(reg.len(), 1);
    for token in ["-a", "--alpha", "alpha", "---alpha"] {
        assert!(reg.resolve(classify(token), token).is_some(), "{token}");
    }
}

#[test]
fn help_lists_slots_and_defaults() {
    let mut d = 2.5f64;
    let mut files: Vec<String> = Vec::new();
    let mut p = Parser::new();
    p.program("demo").about("binding demo");
    p.help(('h', "--help")).unwrap();
    p.arg_with(&mut d, ['d', 'D'], "scale", [default_text(None)])
        .unwrap();
    p.arg_with(
        &mut files,
        "--file",
        "files",
        [repeatable(Repeat::Unbounded), positional(0)],
    )
    .unwrap();
    let outcome = p.parse(argv(&["-d", "1", "-h"])).unwrap();
    let ParseOutcome::Help(text) = outcome else {
        panic!("expected help");
    };
    assert!(text.starts_with("demo - binding demo\n"));
    // Help shows the value bound before it was requested.
    assert!(text.contains("[default: 1]"));
    assert!(text.contains("[FILES]..."));
}

#[test]
fn help_matcher_does_not_steal_waiting_value() {
    let mut word = String::new();
    {
        let mut p = Parser::new();
        p.help("help").unwrap();
        p.arg(&mut word, "--word", "word").unwrap();
        assert_eq!(
            p.parse(argv(&["--word", "help"])).unwrap(),
            ParseOutcome::Parsed
        );
    }
    assert_eq!(word, "help");
}

#[test]
fn describe_exports_schema() {
    let mut n = 0i32;
    let mut p = Parser::new();
    p.arg_with(&mut n, ['n', 'N'], "count", [required()]).unwrap();
    let info = p.describe();
    assert_eq!(info.len(), 1);
    assert_eq!(info[0].name, "count");
    assert_eq!(info[0].value_type, "i32");
    assert!(info[0].required);
    assert!(!info[0].switch);
    let json = serde_json::to_string(&info).unwrap();
    assert!(json.contains("\"class\":\"short\""));
}
