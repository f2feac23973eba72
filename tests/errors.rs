use rubex::{
    code, ErrorKind, Options, Pattern, SearchOptions, MAX_ERROR_MESSAGE_LEN,
};

#[test]
fn compile_error_has_code_and_message() {
    let err = Pattern::new(b"yeah(abc").unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Compile);
    assert!(err.code() < 0);
    assert!(!err.message().is_empty());
    assert!(err.to_string().contains(&err.code().to_string()));
}

#[test]
fn compile_errors_are_deterministic() {
    let a = Pattern::new(b"a{2,1}(").unwrap_err();
    let b = Pattern::new(b"a{2,1}(").unwrap_err();
    assert_eq!(a.code(), b.code());
    assert_eq!(a.as_bytes_with_nul(), b.as_bytes_with_nul());
}

#[test]
fn messages_fit_the_fixed_bound() {
    for bad in &["(", ")", "[a", "a**", "(?<n>a)\\k<m>", "\\"] {
        let err = match Pattern::new(bad.as_bytes()) {
            Ok(_) => continue,
            Err(err) => err,
        };
        let bytes = err.as_bytes_with_nul();
        assert!(bytes.len() <= MAX_ERROR_MESSAGE_LEN, "{:?}", bad);
        assert_eq!(bytes.last(), Some(&0));
        assert!(!bytes[..bytes.len() - 1].contains(&0));
    }
}

#[test]
fn unknown_option_bits_are_rejected() {
    let err = Options::from_bits(1 << 20).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Compile);
    assert_eq!(err.code(), code::INVALID_ARGUMENT);

    let err = SearchOptions::from_bits(1).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Bounds);
    assert_eq!(err.code(), code::INVALID_ARGUMENT);

    let opts = Options::from_bits(0b11).unwrap();
    assert_eq!(opts, Options::IGNORECASE | Options::EXTEND);
}

#[test]
fn no_match_is_not_an_error() {
    let re = pattern!("z");
    let mut region = re.region();
    let got = re.search(b"abc", 0, SearchOptions::NONE, &mut region);
    assert!(matches!(got, Ok(None)));
    let got = re.match_at(b"abc", 0, SearchOptions::NONE, &mut region);
    assert!(matches!(got, Ok(None)));
}

#[test]
fn bad_offsets_are_bounds_errors() {
    let re = pattern!("a");
    let mut region = re.region();
    for &(hay, start) in &[(&b"abc"[..], 4), (&b""[..], 1), ("é".as_bytes(), 1)]
    {
        let err = re
            .search(hay, start, SearchOptions::NONE, &mut region)
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Bounds);
        assert_eq!(err.code(), code::INVALID_ARGUMENT);
        let err = re
            .match_at(hay, start, SearchOptions::NONE, &mut region)
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Bounds);
    }
}

#[test]
fn invalid_utf8_input() {
    let err = Pattern::new(b"\xC3(").unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Compile);
    assert_eq!(err.code(), code::INVALID_CODE_POINT_VALUE);

    let re = pattern!("a");
    let err = re.is_match(b"\xC3").unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Search);
    assert_eq!(err.code(), code::INVALID_CODE_POINT_VALUE);
    assert!(re.find_iter(b"a\xFF").is_err());
}

#[test]
fn retry_limit_turns_blowup_into_search_error() {
    let re = rubex::PatternBuilder::new(br"^(a|a)*$")
        .retry_limit(Some(1_000))
        .build()
        .unwrap();
    let hay = format!("{}b", "a".repeat(40));
    let err = re.is_match(hay.as_bytes()).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Search);
    assert!(err.code() < 0);
}
