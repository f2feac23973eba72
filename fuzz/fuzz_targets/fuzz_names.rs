#![no_main]

use {
    libfuzzer_sys::fuzz_target,
    rubex::{ErrorKind, Pattern},
};

fuzz_target!(|data: &[u8]| {
    let _ = run(data);
});

fn run(data: &[u8]) -> Option<()> {
    let re = Pattern::new(data).ok()?;
    let names = re.names();
    let required = names.encoded_len();
    // One byte short must fail without writing, and report the exact size.
    if required > 0 {
        let mut short = vec![0; required - 1];
        let err = names.write_to(&mut short).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::BufferTooSmall { required });
        assert!(short.iter().all(|&b| b == 0));
    }
    let mut buf = vec![0; required];
    assert_eq!(names.write_to(&mut buf).ok()?, required);

    let mut last = 0;
    for entry in names.iter() {
        assert!(!entry.indices().is_empty());
        assert!(entry.primary() > last);
        assert!(entry.indices().windows(2).all(|w| w[0] < w[1]));
        assert!(entry.indices().iter().all(|&i| i < re.captures_len()));
        last = entry.primary();
    }
    Some(())
}
