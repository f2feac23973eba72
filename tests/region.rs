use {
    anyhow::Result,
    rubex::{ErrorKind, Region, SearchOptions, UNSET},
};

use crate::spans;

#[test]
fn spans_are_bounded_by_haystack() -> Result<()> {
    let re = pattern!(r"(x)?(\w*)(\d)?$");
    let mut region = re.region();
    let hay = b"hello 123";
    for start in 0..=hay.len() {
        if re.search(hay, start, SearchOptions::NONE, &mut region)?.is_none() {
            continue;
        }
        for span in region.iter().flatten() {
            assert!(span.start <= span.end);
            assert!(span.end <= hay.len());
        }
    }
    Ok(())
}

#[test]
fn no_match_clears_stale_spans() -> Result<()> {
    let re = pattern!(r"(a)(b)");
    let mut region = re.region();
    assert!(re.search(b"ab", 0, SearchOptions::NONE, &mut region)?.is_some());
    assert_eq!(spans(&region), vec![(0, 2), (0, 1), (1, 2)]);

    assert!(re.search(b"zz", 0, SearchOptions::NONE, &mut region)?.is_none());
    assert_eq!(spans(&region), vec![(UNSET, UNSET); 3]);
    Ok(())
}

#[test]
fn error_clears_stale_spans() -> Result<()> {
    let re = pattern!(r"(a)");
    let mut region = re.region();
    re.search(b"a", 0, SearchOptions::NONE, &mut region)?;
    assert!(region.get(1).is_some());

    assert!(re.search(b"a", 5, SearchOptions::NONE, &mut region).is_err());
    assert!(region.iter().all(|s| s.is_none()));
    Ok(())
}

#[test]
fn non_participating_group_is_unset() -> Result<()> {
    let re = pattern!(r"(a)|(b)");
    let mut region = re.region();
    re.search(b"b", 0, SearchOptions::NONE, &mut region)?;
    assert_eq!(region.span_or_unset(1)?, (-1, -1));
    assert_eq!(region.span_or_unset(2)?, (0, 1));
    assert_eq!(region.span(1)?, None);
    Ok(())
}

#[test]
fn out_of_range_index() {
    let re = pattern!(r"(a)");
    let region = re.region();
    assert_eq!(region.len(), 2);
    assert_eq!(region.get(2), None);
    let err = region.span(2).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Bounds);
    assert_eq!(err.code(), rubex::code::INVALID_ARGUMENT);
    assert!(region.span_or_unset(99).is_err());
}

#[test]
fn one_region_serves_many_patterns() -> Result<()> {
    let mut region = Region::new();
    assert!(region.is_empty());

    let small = pattern!("a");
    let big = pattern!("(a)(b)(c)(d)");
    big.search(b"abcd", 0, SearchOptions::NONE, &mut region)?;
    assert_eq!(region.len(), 5);
    small.search(b"xa", 0, SearchOptions::NONE, &mut region)?;
    assert_eq!(spans(&region), vec![(1, 2)]);
    Ok(())
}

#[test]
fn clear_unsets_everything() -> Result<()> {
    let re = pattern!(r"(a)");
    let mut region = re.region();
    re.search(b"a", 0, SearchOptions::NONE, &mut region)?;
    region.clear();
    assert_eq!(region.len(), 2);
    assert!(region.iter().all(|s| s.is_none()));
    Ok(())
}
