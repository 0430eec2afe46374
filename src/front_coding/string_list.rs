use std::fmt;
use std::iter::FusedIterator;
use std::ops::Index;

use bytes::Bytes;

/// An ordered list of decoded strings.
///
/// All strings live back to back in one shared buffer; an offset table marks
/// where each one ends. Cloning is cheap and [`StringList::get_bytes`] hands
/// out zero-copy views.
#[derive(Clone, Default, PartialEq, Eq, Hash)]
pub struct StringList {
    data: Bytes,
    ends: Vec<usize>,
}

impl StringList {
    /// Builds a list from concatenated string bytes and the end offset of each string.
    pub(crate) fn from_parts(data: Bytes, ends: Vec<usize>) -> StringList {
        debug_assert!(ends.windows(2).all(|w| w[0] <= w[1]));
        debug_assert_eq!(ends.last().copied().unwrap_or(0), data.len());
        StringList { data, ends }
    }

    /// Number of strings.
    pub fn len(&self) -> usize {
        self.ends.len()
    }

    /// Returns `true` if the list holds no strings.
    pub fn is_empty(&self) -> bool {
        self.ends.is_empty()
    }

    /// Total number of string bytes, terminators excluded.
    pub fn total_bytes(&self) -> usize {
        self.data.len()
    }

    fn span(&self, index: usize) -> Option<(usize, usize)> {
        let end = *self.ends.get(index)?;
        let start = if index == 0 { 0 } else { self.ends[index - 1] };
        Some((start, end))
    }

    /// Returns the string at `index`.
    pub fn get(&self, index: usize) -> Option<&[u8]> {
        let (start, end) = self.span(index)?;
        Some(&self.data[start..end])
    }

    /// Returns the string at `index` as a view sharing the list's buffer.
    pub fn get_bytes(&self, index: usize) -> Option<Bytes> {
        let (start, end) = self.span(index)?;
        Some(self.data.slice(start..end))
    }

    /// Iterates over the strings in order.
    pub fn iter(&self) -> Iter<'_> {
        Iter {
            list: self,
            front: 0,
            back: self.len(),
        }
    }

    /// Copies every string into its own vector.
    pub fn to_vec(&self) -> Vec<Vec<u8>> {
        self.iter().map(<[u8]>::to_vec).collect()
    }
}

impl Index<usize> for StringList {
    type Output = [u8];

    fn index(&self, index: usize) -> &[u8] {
        match self.get(index) {
            Some(string) => string,
            None => panic!(
                "index out of bounds: the len is {} but the index is {index}",
                self.len()
            ),
        }
    }
}

impl fmt::Debug for StringList {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list()
            .entries(self.iter().map(|s| String::from_utf8_lossy(s)))
            .finish()
    }
}

impl<S: AsRef<[u8]>> PartialEq<[S]> for StringList {
    fn eq(&self, other: &[S]) -> bool {
        self.len() == other.len() && self.iter().zip(other).all(|(a, b)| a == b.as_ref())
    }
}

impl<S: AsRef<[u8]>, const N: usize> PartialEq<[S; N]> for StringList {
    fn eq(&self, other: &[S; N]) -> bool {
        *self == other[..]
    }
}

impl<S: AsRef<[u8]>> PartialEq<Vec<S>> for StringList {
    fn eq(&self, other: &Vec<S>) -> bool {
        *self == other[..]
    }
}

impl<'a> IntoIterator for &'a StringList {
    type Item = &'a [u8];
    type IntoIter = Iter<'a>;

    fn into_iter(self) -> Iter<'a> {
        self.iter()
    }
}

/// Iterator over the strings of a [`StringList`].
#[derive(Debug, Clone)]
pub struct Iter<'a> {
    list: &'a StringList,
    front: usize,
    back: usize,
}

impl<'a> Iterator for Iter<'a> {
    type Item = &'a [u8];

    fn next(&mut self) -> Option<&'a [u8]> {
        if self.front == self.back {
            return None;
        }
        let item = self.list.get(self.front);
        self.front += 1;
        item
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let left = self.back - self.front;
        (left, Some(left))
    }
}

impl DoubleEndedIterator for Iter<'_> {
    fn next_back(&mut self) -> Option<Self::Item> {
        if self.front == self.back {
            return None;
        }
        self.back -= 1;
        self.list.get(self.back)
    }
}

impl ExactSizeIterator for Iter<'_> {}

impl FusedIterator for Iter<'_> {}
