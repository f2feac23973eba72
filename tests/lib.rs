/// Compiles a pattern with default options, panicking on failure.
macro_rules! pattern {
    ($re:expr) => {
        rubex::Pattern::new($re.as_bytes()).unwrap()
    };
}

mod api;
mod concurrency;
mod errors;
mod region;

/// Returns every span of the most recent match in `region` as a pair of
/// signed offsets, with `(-1, -1)` for groups that did not participate.
fn spans(region: &rubex::Region) -> Vec<(isize, isize)> {
    (0..region.len())
        .map(|i| region.span_or_unset(i).unwrap())
        .collect()
}
