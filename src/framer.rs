//! Slicing a sample sequence into fixed-size, non-overlapping hops.
//!
//! Two policies decide what happens to a trailing remainder shorter than one hop:
//! - [`FramePolicy::Truncate`] (default) drops it, so the hop count is `floor(len / hop_size)`.
//! - [`FramePolicy::Pad`] keeps it as one more hop, zero-padded on the right.
//!
//! Either way, every hop handed to an engine is exactly `hop_size` samples long.

use std::borrow::Cow;
use std::iter::FusedIterator;

use serde::Serialize;

/// How the framer treats a trailing partial hop.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FramePolicy {
    /// Drop trailing samples that do not fill a whole hop.
    #[default]
    Truncate,

    /// Zero-pad the trailing samples into one final hop.
    Pad,
}

/// One fixed-size block of samples.
///
/// Full hops borrow straight from the stream; only a padded final hop allocates.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Hop<'a> {
    index: usize,
    samples: Cow<'a, [i16]>,
}

impl<'a> Hop<'a> {
    /// Zero-based position of this hop in the stream.
    pub fn index(&self) -> usize {
        self.index
    }

    pub fn samples(&self) -> &[i16] {
        &self.samples
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    /// Whether this hop needed zero-padding to reach full length.
    pub fn is_padded(&self) -> bool {
        matches!(self.samples, Cow::Owned(_))
    }
}

/// Number of hops the framer yields for `len` samples.
///
/// A `hop_size` of zero yields no hops.
pub fn frame_count(len: usize, hop_size: usize, policy: FramePolicy) -> usize {
    if hop_size == 0 {
        return 0;
    }

    match policy {
        FramePolicy::Truncate => len / hop_size,
        FramePolicy::Pad => len.div_ceil(hop_size),
    }
}

/// Number of trailing samples `policy` leaves unprocessed.
///
/// Only [`FramePolicy::Truncate`] ever drops samples.
pub fn dropped_samples(len: usize, hop_size: usize, policy: FramePolicy) -> usize {
    match policy {
        FramePolicy::Truncate if hop_size > 0 => len % hop_size,
        FramePolicy::Truncate => len,
        FramePolicy::Pad => 0,
    }
}

/// Extract hop `index`, zero-padding on the right when the slice runs past the end.
///
/// Returns `None` when the hop would start at or beyond the end of `samples`.
pub fn hop_at(samples: &[i16], index: usize, hop_size: usize) -> Option<Hop<'_>> {
    let start = index.checked_mul(hop_size)?;
    if hop_size == 0 || start >= samples.len() {
        return None;
    }

    let end = (start + hop_size).min(samples.len());
    let slice = &samples[start..end];

    let samples = if slice.len() == hop_size {
        Cow::Borrowed(slice)
    } else {
        let mut padded = Vec::with_capacity(hop_size);
        padded.extend_from_slice(slice);
        padded.resize(hop_size, 0);
        Cow::Owned(padded)
    };

    Some(Hop { index, samples })
}

/// Lazily iterate the hops of `samples`.
///
/// The iterator is cheap to create; calling this again re-derives the same sequence.
pub fn frames(samples: &[i16], hop_size: usize, policy: FramePolicy) -> Frames<'_> {
    Frames {
        samples,
        hop_size,
        next: 0,
        count: frame_count(samples.len(), hop_size, policy),
    }
}

/// Iterator returned by [`frames`].
#[derive(Debug, Clone)]
pub struct Frames<'a> {
    samples: &'a [i16],
    hop_size: usize,
    next: usize,
    count: usize,
}

impl<'a> Iterator for Frames<'a> {
    type Item = Hop<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.next >= self.count {
            return None;
        }

        let hop = hop_at(self.samples, self.next, self.hop_size)?;
        self.next += 1;
        Some(hop)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.count - self.next;
        (remaining, Some(remaining))
    }
}

impl ExactSizeIterator for Frames<'_> {}

impl FusedIterator for Frames<'_> {}
