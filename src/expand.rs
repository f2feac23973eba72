use memchr::memchr;

use crate::{error::Error, find::Captures, pattern::Pattern};

/// Replacement.
impl Pattern {
    /// Replaces every non-overlapping match in `haystack` with `template`,
    /// expanded against that match's captures.
    ///
    /// In the template, `\0` through `\9` refer to numbered groups, `\k<name>`
    /// to a named group and `\\` to a literal backslash. Any other backslash
    /// is copied as is. A group that did not participate, or that does not
    /// exist, expands to nothing.
    ///
    /// # Example
    ///
    /// ```
    /// use rubex::Pattern;
    ///
    /// let re = Pattern::new(br"(?<y>\d{4})-(?<m>\d{2})").unwrap();
    /// let got = re.replace_all(b"on 2024-05.", br"\k<m>/\k<y>").unwrap();
    /// assert_eq!(got, b"on 05/2024.");
    /// ```
    pub fn replace_all(
        &self,
        haystack: &[u8],
        template: &[u8],
    ) -> Result<Vec<u8>, Error> {
        self.replace_all_with(haystack, |caps, dst| caps.expand(template, dst))
    }

    /// Replaces every non-overlapping match in `haystack` with whatever
    /// `replacer` appends to the buffer it is given.
    pub fn replace_all_with<F>(
        &self,
        haystack: &[u8],
        mut replacer: F,
    ) -> Result<Vec<u8>, Error>
    where
        F: FnMut(&Captures<'_>, &mut Vec<u8>),
    {
        let mut dst = Vec::with_capacity(haystack.len());
        let mut last = 0;
        for caps in self.captures_iter(haystack)? {
            let caps = caps?;
            // Group 0 is always set for a reported match.
            let m = match caps.get(0) {
                Some(m) => m,
                None => continue,
            };
            dst.extend_from_slice(&haystack[last..m.start()]);
            replacer(&caps, &mut dst);
            last = m.end();
        }
        dst.extend_from_slice(&haystack[last..]);
        Ok(dst)
    }
}

impl<'h> Captures<'h> {
    /// Expands `template` against these captures and appends the result to
    /// `dst`. See [`Pattern::replace_all`] for the template syntax.
    pub fn expand(&self, template: &[u8], dst: &mut Vec<u8>) {
        expand(self, template, dst)
    }
}

fn expand(caps: &Captures<'_>, mut template: &[u8], dst: &mut Vec<u8>) {
    while !template.is_empty() {
        match memchr(b'\\', template) {
            None => break,
            Some(i) => {
                dst.extend_from_slice(&template[..i]);
                template = &template[i..];
            }
        }
        let group_ref = match find_group_ref(template) {
            Some(group_ref) => group_ref,
            None => {
                // Not a reference. Copy the backslash and whatever follows
                // it verbatim.
                let n = template.len().min(2);
                dst.extend_from_slice(&template[..n]);
                template = &template[n..];
                continue;
            }
        };
        template = group_ref.rest;
        let m = match group_ref.group {
            Ref::Escape => {
                dst.push(b'\\');
                continue;
            }
            Ref::Number(i) => caps.get(i),
            Ref::Named(name) => caps.index_of(name).and_then(|i| caps.get(i)),
        };
        if let Some(m) = m {
            dst.extend_from_slice(m.as_bytes());
        }
    }
    dst.extend_from_slice(template);
}

#[derive(Debug, Eq, PartialEq)]
struct GroupRef<'a> {
    rest: &'a [u8],
    group: Ref<'a>,
}

#[derive(Debug, Eq, PartialEq)]
enum Ref<'a> {
    Escape,
    Named(&'a [u8]),
    Number(usize),
}

/// Parses a reference at the start of `template`, which must begin with a
/// backslash.
fn find_group_ref(template: &[u8]) -> Option<GroupRef<'_>> {
    if template.len() < 2 || template[0] != b'\\' {
        return None;
    }
    match template[1] {
        b'\\' => Some(GroupRef { rest: &template[2..], group: Ref::Escape }),
        b @ b'0'..=b'9' => Some(GroupRef {
            rest: &template[2..],
            group: Ref::Number(usize::from(b - b'0')),
        }),
        b'k' => {
            let rest = template.get(2..)?.strip_prefix(b"<")?;
            let end = memchr(b'>', rest)?;
            if end == 0 {
                return None;
            }
            Some(GroupRef {
                rest: &rest[end + 1..],
                group: Ref::Named(&rest[..end]),
            })
        }
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn replace(pattern: &str, hay: &str, template: &str) -> String {
        let re = Pattern::new(pattern.as_bytes()).unwrap();
        let got = re.replace_all(hay.as_bytes(), template.as_bytes()).unwrap();
        String::from_utf8(got).unwrap()
    }

    #[test]
    fn find_group_ref_number() {
        let got = find_group_ref(b"\\1abc").unwrap();
        assert_eq!(got, GroupRef { rest: b"abc", group: Ref::Number(1) });
    }

    #[test]
    fn find_group_ref_named() {
        let got = find_group_ref(b"\\k<foo>z").unwrap();
        assert_eq!(got, GroupRef { rest: b"z", group: Ref::Named(b"foo") });
    }

    #[test]
    fn find_group_ref_rejects() {
        assert_eq!(find_group_ref(b"\\"), None);
        assert_eq!(find_group_ref(b"\\n"), None);
        assert_eq!(find_group_ref(b"\\k<>"), None);
        assert_eq!(find_group_ref(b"\\k<foo"), None);
        assert_eq!(find_group_ref(b"\\kfoo"), None);
        assert_eq!(find_group_ref(b"a\\1"), None);
    }

    #[test]
    fn numbered() {
        assert_eq!(
            replace(r"(\w+) (\w+)", "hello world", r"\2 \1"),
            "world hello",
        );
        assert_eq!(replace(r"\d", "a1b2", r"<\0>"), "a<1>b<2>");
    }

    #[test]
    fn named() {
        assert_eq!(
            replace(
                r"(?<first>\w+)\s(?<last>\w+)",
                "Springsteen Bruce",
                r"\k<last> \k<first>",
            ),
            "Bruce Springsteen",
        );
    }

    #[test]
    fn named_duplicate_uses_participating_branch() {
        assert_eq!(replace(r"(?<g>a)|(?<g>b)", "ab", r"[\k<g>]"), "[a][b]");
    }

    #[test]
    fn missing_groups_expand_to_nothing() {
        assert_eq!(replace(r"(a)|(b)", "ab", r"\2"), "b");
        assert_eq!(replace(r"a", "a", r"x\9y"), "xy");
        assert_eq!(replace(r"a", "a", r"\k<nope>"), "");
    }

    #[test]
    fn escapes() {
        assert_eq!(replace(r"a", "a", r"\\1"), r"\1");
        assert_eq!(replace(r"a", "a", r"\n\"), r"\n\");
    }

    #[test]
    fn empty_matches() {
        assert_eq!(replace(r"", "abc", "-"), "-a-b-c-");
        assert_eq!(replace(r"x*", "axxb", "-"), "-a-b-");
    }

    #[test]
    fn no_matches_copies_haystack() {
        assert_eq!(replace(r"z", "abc", "-"), "abc");
    }

    #[test]
    fn replacer_closure() {
        let re = Pattern::new(br"\d+").unwrap();
        let got = re
            .replace_all_with(b"a12b3", |caps, dst| {
                let len = caps.get(0).map_or(0, |m| m.len());
                dst.extend_from_slice(len.to_string().as_bytes());
            })
            .unwrap();
        assert_eq!(got, b"a2b1");
    }
}
