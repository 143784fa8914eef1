#![allow(missing_docs)]

use patternwright::{
    PatternError,
    pattern::{TokenItem, TranslatedPattern, parse_pattern, translate_pattern},
};

/// Split `/body/modifiers`.
fn body_of(translated: &TranslatedPattern) -> (&str, &str) {
    let pattern = translated.pattern.as_str();
    let close = pattern.rfind('/').unwrap();
    (&pattern[1..close], &pattern[close + 1..])
}

fn compile(translated: &TranslatedPattern) -> regex::Regex {
    let (body, modifiers) = body_of(translated);
    let flags: String = modifiers.chars().filter(|m| "im".contains(*m)).collect();
    let source = if flags.is_empty() {
        body.to_string()
    } else {
        format!("(?{flags}){body}")
    };
    regex::Regex::new(&source).unwrap()
}

#[test]
fn test_capture_indices_match_the_engine() {
    let translated = translate_pattern("#(?<year>[0-9]{4})-(?<month>[0-9]{2})(?:/(?P<day>[0-9]{2}))?#").unwrap();
    let re = compile(&translated);

    let caps = re.captures("2024-06/17").unwrap();
    let year = translated.capture_map.get("year").unwrap();
    let month = translated.capture_map.get("month").unwrap();
    let day = translated.capture_map.get("day").unwrap();
    assert_eq!((year, month, day), (1, 2, 3));
    assert_eq!(&caps[year], "2024");
    assert_eq!(&caps[month], "06");
    assert_eq!(&caps[day], "17");
}

#[test]
fn test_unicode_properties_match_the_engine() {
    let translated = translate_pattern(r"/^\p{Lu}\pL*\P{L}$/u").unwrap();
    let re = compile(&translated);

    assert!(re.is_match("Abc1"));
    assert!(re.is_match("Éßж "));
    assert!(re.is_match("Ω中!"));
    assert!(!re.is_match("abc1"));
    assert!(!re.is_match("Abcd"));

    let translated = translate_pattern(r"/^[\p{Nd}x]+$/").unwrap();
    let re = compile(&translated);
    assert!(re.is_match("12x٣"));
    assert!(!re.is_match("12y"));

    let translated = translate_pattern(r"/^[^\P{Zs}]$/").unwrap();
    let re = compile(&translated);
    assert!(re.is_match(" "));
    assert!(re.is_match("\u{3000}"));
    assert!(!re.is_match("a"));
}

#[test]
fn test_dot_all_matches_newlines() {
    let translated = translate_pattern("/^a.b$/s").unwrap();
    assert!(compile(&translated).is_match("a\nb"));

    let translated = translate_pattern("/^a.b$/").unwrap();
    assert!(!compile(&translated).is_match("a\nb"));
}

#[test]
fn test_lookahead_survives() {
    let translated = translate_pattern("#^(?=[a-z])(?!ab)\\w+/#i").unwrap();
    assert_eq!(translated.pattern, r"/^(?=[a-z])(?!ab)\w+\//i");

    let re = fancy_regex::Regex::new(&format!("(?i){}", body_of(&translated).0)).unwrap();
    assert!(re.is_match("Xyz/").unwrap());
    assert!(!re.is_match("abc/").unwrap());
    assert!(!re.is_match("1bc/").unwrap());
}

#[test]
fn test_named_backreferences_match_the_engine() {
    let translated = translate_pattern(r#"/^(?<q>['"])(?<body>\w+)\k<q>$/"#).unwrap();
    assert_eq!(translated.pattern, r#"/^(['"])(\w+)\1$/"#);

    let re = fancy_regex::Regex::new(body_of(&translated).0).unwrap();
    assert!(re.is_match("'abc'").unwrap());
    assert!(re.is_match("\"abc\"").unwrap());
    assert!(!re.is_match("'abc\"").unwrap());
    assert!(!re.is_match("k<q>abck<q>").unwrap());
}

#[test]
fn test_extended_patterns_match_the_engine() {
    let translated = translate_pattern(
        "~^ (?<key> [a-z]+ )   # a key\n   = [ ]* (?<value> [0-9]+ ) $ # then a number\n~x",
    )
    .unwrap();
    assert_eq!(translated.pattern, "/^([a-z]+)=[ ]*([0-9]+)$/");

    let re = compile(&translated);
    let caps = re.captures("width= 42").unwrap();
    assert_eq!(&caps[translated.capture_map.get("key").unwrap()], "width");
    assert_eq!(&caps[translated.capture_map.get("value").unwrap()], "42");
    assert!(!re.is_match("width = 42"));
}

#[test]
fn test_dialect_gaps_are_reported() {
    for pattern in [
        "/(?<=a)b/",
        "/(?<!a)b/",
        "/(?i)a/",
        "/(?i:a)/",
        r"/\p{Greek}/",
        "/(?|a|b)/",
        "/a/U",
        r"/\k<q>(?<q>a)/",
    ] {
        let err = translate_pattern(pattern).unwrap_err();
        assert!(err.is_dialect_gap(), "{pattern}: {err}");
    }

    for pattern in ["/(a/", "/a)/", "/[a/", "abc", "/a"] {
        let err = translate_pattern(pattern).unwrap_err();
        assert!(!err.is_dialect_gap(), "{pattern}: {err}");
    }
}

#[test]
fn test_parse_nesting_links() {
    let info = parse_pattern("/((?:a|(?=b)c)+|(?<n>d))[e]/").unwrap();
    for (idx, token) in info.tokens.iter().enumerate() {
        if let TokenItem::GroupStart(start) = &token.item {
            let TokenItem::GroupEnd(end) = &info.tokens[start.end_token].item else {
                panic!("token {idx} links to a non-end token");
            };
            assert_eq!(end.start_token, idx);
            assert_eq!(end.kind, start.kind);
            assert!(start.end_token > idx);
        }
    }
    assert!(matches!(
        parse_pattern("/(a))/"),
        Err(PatternError::UnbalancedGroup { unmatched: ')', .. })
    ));
}
