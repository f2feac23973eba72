use std::{sync::Arc, thread};

use {
    anyhow::Result,
    rubex::{Pattern, SearchOptions},
};

#[test]
fn one_pattern_many_threads() -> Result<()> {
    let re = Arc::new(Pattern::new(br"(?<word>\w+)-(?<num>\d+)")?);
    let handles: Vec<_> = (0..8)
        .map(|t| {
            let re = Arc::clone(&re);
            thread::spawn(move || {
                let mut region = re.region();
                let hay = format!("{} item-{} tail", " ".repeat(t), t * 11);
                let mut seen = vec![];
                for _ in 0..200 {
                    let hay = hay.as_bytes();
                    let start = re
                        .search(hay, 0, SearchOptions::NONE, &mut region)
                        .unwrap();
                    let num = re.names().lookup(b"num", &region).unwrap();
                    let span = region.get(num).unwrap();
                    seen.push((start, hay[span.range()].to_vec()));
                }
                (t, seen)
            })
        })
        .collect();
    for handle in handles {
        let (t, seen) = handle.join().unwrap();
        for (start, num) in seen {
            assert_eq!(start, Some(t + 1));
            assert_eq!(num, (t * 11).to_string().into_bytes());
        }
    }
    Ok(())
}

#[test]
fn errors_on_one_thread_do_not_leak_into_another() -> Result<()> {
    let bad = thread::spawn(|| {
        (0..100)
            .map(|_| Pattern::new(b"(unclosed").unwrap_err().to_string())
            .collect::<Vec<_>>()
    });
    let good = thread::spawn(|| {
        (0..100)
            .map(|_| Pattern::new(b"[x").unwrap_err().to_string())
            .collect::<Vec<_>>()
    });
    let bad = bad.join().unwrap();
    let good = good.join().unwrap();
    assert!(bad.iter().all(|m| m == &bad[0]));
    assert!(good.iter().all(|m| m == &good[0]));
    assert_ne!(bad[0], good[0]);
    Ok(())
}
