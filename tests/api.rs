use {
    anyhow::Result,
    rubex::{Options, Pattern, PatternBuilder, SearchOptions, Syntax},
};

use crate::spans;

#[test]
fn search_reports_start_and_group_spans() -> Result<()> {
    let (re, mut region) = rubex::compile(br"(\d+)-(\d+)", Options::NONE)?;
    let start = re.search(b"id 42-7 end", 0, SearchOptions::NONE, &mut region)?;
    assert_eq!(start, Some(3));
    assert_eq!(spans(&region), vec![(3, 7), (3, 5), (6, 7)]);
    Ok(())
}

#[test]
fn search_from_offset() -> Result<()> {
    let re = pattern!(r"\d+");
    let mut region = re.region();
    let hay = b"1 22 333";
    assert_eq!(re.search(hay, 0, SearchOptions::NONE, &mut region)?, Some(0));
    assert_eq!(re.search(hay, 1, SearchOptions::NONE, &mut region)?, Some(2));
    assert_eq!(re.search(hay, 3, SearchOptions::NONE, &mut region)?, Some(3));
    assert_eq!(spans(&region), vec![(3, 4)]);
    assert_eq!(re.search(hay, 8, SearchOptions::NONE, &mut region)?, None);
    Ok(())
}

#[test]
fn search_is_idempotent() -> Result<()> {
    let re = pattern!(r"(a+)(b)?");
    let mut region = re.region();
    let hay = b"xxaab";
    let first = re.search(hay, 0, SearchOptions::NONE, &mut region)?;
    let first_spans = spans(&region);
    for _ in 0..5 {
        let again = re.search(hay, 0, SearchOptions::NONE, &mut region)?;
        assert_eq!(again, first);
        assert_eq!(spans(&region), first_spans);
    }
    assert_eq!(first_spans, vec![(2, 5), (2, 4), (4, 5)]);
    Ok(())
}

#[test]
fn match_at_is_anchored_and_reports_length() -> Result<()> {
    let re = pattern!(r"(\w+)@(\w+)");
    let mut region = re.region();
    let hay = b"mail: joe@example";
    assert_eq!(re.match_at(hay, 0, SearchOptions::NONE, &mut region)?, None);
    assert_eq!(
        re.match_at(hay, 6, SearchOptions::NONE, &mut region)?,
        Some(11)
    );
    assert_eq!(spans(&region), vec![(6, 17), (6, 9), (10, 17)]);
    Ok(())
}

#[test]
fn nul_bytes_are_ordinary() -> Result<()> {
    let re = pattern!(r"b\x00c");
    let mut region = re.region();
    let got = re.search(b"a\x00b\x00c", 0, SearchOptions::NONE, &mut region)?;
    assert_eq!(got, Some(2));
    assert_eq!(spans(&region), vec![(2, 5)]);
    Ok(())
}

#[test]
fn offsets_are_bytes_not_characters() -> Result<()> {
    let re = pattern!("b");
    let mut region = re.region();
    // 'é' takes two bytes.
    let got = re.search("éb".as_bytes(), 0, SearchOptions::NONE, &mut region)?;
    assert_eq!(got, Some(2));
    Ok(())
}

#[test]
fn notbol_and_noteol() -> Result<()> {
    let re = pattern!("^a$");
    let mut region = re.region();
    assert!(re.search(b"a", 0, SearchOptions::NONE, &mut region)?.is_some());
    assert!(re.search(b"a", 0, SearchOptions::NOTBOL, &mut region)?.is_none());
    assert!(re.search(b"a", 0, SearchOptions::NOTEOL, &mut region)?.is_none());
    Ok(())
}

#[test]
fn compile_options() -> Result<()> {
    let re = Pattern::with_options(b"ABC", Options::IGNORECASE)?;
    assert!(re.is_match(b"xabcx")?);

    let re = Pattern::with_options(b"a.b", Options::MULTILINE)?;
    assert!(re.is_match(b"a\nb")?);
    assert!(!pattern!("a.b").is_match(b"a\nb")?);

    let re = Pattern::with_options(b"a b # comment", Options::EXTEND)?;
    assert!(re.is_match(b"ab")?);

    let re = Pattern::with_options(b"a|ab", Options::FIND_LONGEST)?;
    assert_eq!(re.find(b"ab")?.map(|m| m.range()), Some(0..2));
    assert_eq!(pattern!("a|ab").find(b"ab")?.map(|m| m.range()), Some(0..1));
    Ok(())
}

#[test]
fn plain_groups_do_not_capture_beside_named_ones() -> Result<()> {
    let re = pattern!(r"(?<a>x)(y)");
    assert_eq!(re.captures_len(), 2);

    let re = PatternBuilder::new(br"(?<a>x)(y)").capture_group(true).build()?;
    assert_eq!(re.captures_len(), 3);
    Ok(())
}

#[test]
fn syntax_choice() -> Result<()> {
    let re = PatternBuilder::new(br"(?<n>a)").syntax(Syntax::PerlNg).build()?;
    assert_eq!(re.names().len(), 1);
    assert_eq!(re.syntax(), Syntax::PerlNg);
    Ok(())
}

#[test]
fn find_iter_and_captures() -> Result<()> {
    let re = pattern!(r"(\w)=(\d)?");
    let got: Vec<_> = re
        .find_iter(b"a=1 b= c=3")?
        .map(|m| m.map(|m| m.as_bytes().to_vec()))
        .collect::<Result<_, _>>()?;
    assert_eq!(got, vec![b"a=1".to_vec(), b"b=".to_vec(), b"c=3".to_vec()]);

    let caps = re.captures_at(b"a=1 b= c=3", 3)?.unwrap();
    assert_eq!(caps.len(), 3);
    assert_eq!(caps.get(1).map(|m| m.as_bytes()), Some(&b"b"[..]));
    assert!(caps.get(2).is_none());
    assert!(caps.get(3).is_none());
    Ok(())
}

#[test]
fn counts_and_display() {
    let re = pattern!(r"(a)(b)(c)");
    assert_eq!(re.num_subexp(), 3);
    assert_eq!(re.captures_len(), 4);
    assert_eq!(re.to_string(), "(a)(b)(c)");
}

#[test]
fn one_shot_is_match() -> Result<()> {
    assert!(rubex::is_match(br"\d{3}", b"ab123")?);
    assert!(!rubex::is_match(br"\d{4}", b"ab123")?);
    assert!(rubex::is_match(b"(", b"").is_err());
    Ok(())
}

#[test]
fn quoted_literals() -> Result<()> {
    let re = Pattern::new(rubex::quote("a+b (c)").as_bytes())?;
    assert!(re.is_match(b"x a+b (c) y")?);
    assert!(!re.is_match(b"aab c")?);
    Ok(())
}

// `\K` in a look-around moves the recorded match start away from the
// engine's scan position. Every API reports the recorded start.
#[test]
fn keep_moves_reported_start() -> Result<()> {
    for (pat, want) in [(r"a(?=b\K)", 2..2), (r"(?<=\Ka)b", 1..3)] {
        let re = pattern!(pat);
        let mut region = re.region();
        let start = re.search(b"xab", 0, SearchOptions::NONE, &mut region)?;
        assert_eq!(start, Some(want.start), "{}", pat);
        let whole = (want.start as isize, want.end as isize);
        assert_eq!(spans(&region)[0], whole);
        assert_eq!(re.find(b"xab")?.map(|m| m.range()), Some(want));
    }
    Ok(())
}
