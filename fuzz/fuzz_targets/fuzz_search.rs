#![no_main]

use {
    libfuzzer_sys::fuzz_target,
    rubex::{Options, PatternBuilder, SearchOptions},
};

fuzz_target!(|data: &[u8]| {
    let _ = run(data);
});

fn run(data: &[u8]) -> Option<()> {
    if data.len() < 2 {
        return None;
    }
    let mut split_at = usize::from(data[0]);
    let data = std::str::from_utf8(&data[1..]).ok()?;
    // Split data into a pattern and haystack to search.
    let len = data.chars().count();
    split_at = std::cmp::max(split_at, 1) % len;
    let char_index = data.char_indices().nth(split_at)?.0;
    let (pattern, haystack) = data.split_at(char_index);
    let re = PatternBuilder::new(pattern.as_bytes())
        .options(Options::NONE)
        .retry_limit(Some(100_000))
        .build()
        .ok()?;
    let hay = haystack.as_bytes();
    let mut region = re.region();

    let found = re.search(hay, 0, SearchOptions::NONE, &mut region);
    assert_eq!(region.len(), re.captures_len());
    match found {
        Ok(Some(start)) => {
            let span = region.get(0).expect("overall match span");
            assert_eq!(span.start, start);
            for span in region.iter().flatten() {
                assert!(span.start <= span.end);
                assert!(span.end <= hay.len());
            }
            let anchored =
                re.match_at(hay, start, SearchOptions::NONE, &mut region);
            if let Ok(Some(len)) = anchored {
                assert!(start + len <= hay.len());
            }
        }
        Ok(None) | Err(_) => {
            assert!(region.iter().all(|span| span.is_none()));
        }
    }

    let mut last = None;
    for m in re.find_iter(hay).ok()?.take(64) {
        let Ok(m) = m else { break };
        if let Some(end) = last {
            assert!(m.start() >= end);
        }
        last = Some(m.end());
    }
    Some(())
}
