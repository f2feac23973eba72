use std::collections::HashMap;

use crate::{error::Error, region::Region};

/// A named group and the group indices it backs.
///
/// A name may back more than one group when it is reused across the
/// branches of an alternation, as in `(?<n>a)|(?<n>b)`.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct NameEntry {
    name: Box<str>,
    indices: Box<[usize]>,
}

impl NameEntry {
    /// Returns the name of this group.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the group indices backing this name in ascending order.
    /// This is never empty.
    pub fn indices(&self) -> &[usize] {
        &self.indices
    }

    /// Returns the lowest group index backing this name.
    pub fn primary(&self) -> usize {
        self.indices[0]
    }

    /// Returns the index of the first group backing this name that
    /// participated in the match recorded in `region`, falling back to the
    /// primary index when none did.
    pub fn resolve(&self, region: &Region) -> usize {
        self.resolve_by(|i| region.get(i).is_some())
    }

    pub(crate) fn resolve_by(
        &self,
        participated: impl Fn(usize) -> bool,
    ) -> usize {
        self.indices
            .iter()
            .copied()
            .find(|&i| participated(i))
            .unwrap_or_else(|| self.primary())
    }

    fn encoded_len(&self) -> usize {
        let digits: usize =
            self.indices.iter().map(|&i| decimal_len(i)).sum();
        // name ':' digits (',' between each index)
        self.name.len() + 1 + digits + (self.indices.len() - 1)
    }

    fn encode(&self, dst: &mut Vec<u8>) {
        dst.extend_from_slice(self.name.as_bytes());
        dst.push(b':');
        for (i, index) in self.indices.iter().enumerate() {
            if i > 0 {
                dst.push(b',');
            }
            dst.extend_from_slice(index.to_string().as_bytes());
        }
    }
}

/// The directory of named groups in a compiled pattern.
///
/// The directory is built once, when the pattern is compiled. Entries are
/// ordered by their lowest group index, so the order is stable and follows
/// the order in which names first appear in the pattern.
#[derive(Clone, Debug, Default)]
pub struct NameDirectory {
    entries: Vec<NameEntry>,
    by_name: HashMap<Box<[u8]>, usize>,
}

impl NameDirectory {
    pub(crate) fn new(raw: &onig::Regex) -> NameDirectory {
        let mut entries = Vec::with_capacity(raw.capture_names_len());
        raw.foreach_name(|name, groups| {
            let mut indices: Vec<usize> =
                groups.iter().map(|&g| g as usize).collect();
            indices.sort_unstable();
            indices.dedup();
            if !indices.is_empty() {
                entries.push(NameEntry {
                    name: name.into(),
                    indices: indices.into_boxed_slice(),
                });
            }
            true
        });
        NameDirectory::from_entries(entries)
    }

    fn from_entries(mut entries: Vec<NameEntry>) -> NameDirectory {
        entries.sort_by_key(|e| e.primary());
        let by_name = entries
            .iter()
            .enumerate()
            .map(|(i, e)| (Box::from(e.name.as_bytes()), i))
            .collect();
        NameDirectory { entries, by_name }
    }

    /// Returns the number of distinct names.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns true when the pattern has no named groups.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Returns the entry for the given name, if the pattern defines it.
    /// Names are case sensitive.
    pub fn get(&self, name: &[u8]) -> Option<&NameEntry> {
        self.by_name.get(name).map(|&i| &self.entries[i])
    }

    /// Returns an iterator over every entry, ordered by lowest group index.
    pub fn iter(&self) -> core::slice::Iter<'_, NameEntry> {
        self.entries.iter()
    }

    /// Returns the index of the group that `name` refers to in the match
    /// recorded by `region`.
    ///
    /// When several groups share the name, the lowest indexed one that
    /// participated in the match wins. If none participated, the lowest
    /// index is returned. `None` means the pattern has no group with this
    /// name.
    pub fn lookup(&self, name: &[u8], region: &Region) -> Option<usize> {
        self.get(name).map(|entry| entry.resolve(region))
    }

    /// Returns the number of bytes [`NameDirectory::write_to`] needs.
    pub fn encoded_len(&self) -> usize {
        if self.entries.is_empty() {
            return 0;
        }
        let fields: usize =
            self.entries.iter().map(|e| e.encoded_len()).sum();
        fields + (self.entries.len() - 1)
    }

    /// Writes every entry into `dst` and returns the number of bytes
    /// written.
    ///
    /// Entries are written as `name:i[,j...]` and separated by `;`. For
    /// example, `(?<year>\d{4})-(?<month>\d{2})` is written as
    /// `year:1;month:2`.
    ///
    /// If `dst` is too small, nothing is written and an error of kind
    /// [`ErrorKind::BufferTooSmall`](crate::ErrorKind::BufferTooSmall) is
    /// returned carrying the required capacity, so that the caller can retry
    /// with a larger buffer.
    pub fn write_to(&self, dst: &mut [u8]) -> Result<usize, Error> {
        let required = self.encoded_len();
        if dst.len() < required {
            return Err(Error::buffer_too_small(required, dst.len()));
        }
        let mut buf = Vec::with_capacity(required);
        for (i, entry) in self.entries.iter().enumerate() {
            if i > 0 {
                buf.push(b';');
            }
            entry.encode(&mut buf);
        }
        debug_assert_eq!(buf.len(), required);
        dst[..buf.len()].copy_from_slice(&buf);
        Ok(buf.len())
    }
}

impl<'a> IntoIterator for &'a NameDirectory {
    type Item = &'a NameEntry;
    type IntoIter = core::slice::Iter<'a, NameEntry>;

    fn into_iter(self) -> core::slice::Iter<'a, NameEntry> {
        self.iter()
    }
}

fn decimal_len(mut n: usize) -> usize {
    let mut len = 1;
    while n >= 10 {
        n /= 10;
        len += 1;
    }
    len
}
