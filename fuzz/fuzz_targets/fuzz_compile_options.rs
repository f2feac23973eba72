#![no_main]

use {
    libfuzzer_sys::{fuzz_target, Corpus},
    rubex::{Options, PatternBuilder, SearchOptions, Syntax},
};

#[derive(Debug, arbitrary::Arbitrary)]
struct FuzzData {
    pattern: String,
    haystack: String,
    options: u32,
    search_options: u32,
    start: usize,
    syntax: u8,
}

fuzz_target!(|data: FuzzData| -> Corpus {
    let _ = env_logger::try_init();

    // Unknown bits must be rejected rather than passed to the engine.
    let Ok(options) = Options::from_bits(data.options) else {
        return Corpus::Reject;
    };
    let syntax = match data.syntax % 5 {
        0 => Syntax::Default,
        1 => Syntax::Ruby,
        2 => Syntax::Perl,
        3 => Syntax::PerlNg,
        _ => Syntax::Java,
    };
    let Ok(re) = PatternBuilder::new(data.pattern.as_bytes())
        .options(options)
        .syntax(syntax)
        .retry_limit(Some(100_000))
        .build()
    else {
        return Corpus::Reject;
    };
    let search_options = SearchOptions::from_bits(data.search_options)
        .unwrap_or(SearchOptions::NONE);

    let hay = data.haystack.as_bytes();
    let mut region = re.region();
    let start = data.start % (hay.len() + 1);
    match re.search(hay, start, search_options, &mut region) {
        Ok(Some(at)) => {
            assert!(at >= start);
            assert_eq!(region.get(0).map(|s| s.start), Some(at));
        }
        Ok(None) => {
            assert!(region.iter().all(|span| span.is_none()));
        }
        Err(err) => {
            assert!(err.code() < 0);
            assert!(err.message().len() < rubex::MAX_ERROR_MESSAGE_LEN);
            assert!(region.iter().all(|span| span.is_none()));
        }
    }
    for name in re.names().iter() {
        let index = re.names().lookup(name.name().as_bytes(), &region);
        assert!(name.indices().contains(&index.unwrap()));
    }
    Corpus::Keep
});
