//! Ordered clip collection owned by the caller

use super::{AudioClip, ClipSetError};

/// An ordered collection of decoded clips
///
/// The merge order is the collection order. Edits never touch clip data;
/// a merge takes a snapshot via [`ClipSet::clips`].
#[derive(Debug, Clone, Default)]
pub struct ClipSet {
    clips: Vec<AudioClip>,
}

impl ClipSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append clips in the given order
    pub fn add<I>(&mut self, clips: I)
    where
        I: IntoIterator<Item = AudioClip>,
    {
        self.clips.extend(clips);
    }

    /// Remove and return the clip at `index`
    pub fn remove(&mut self, index: usize) -> Result<AudioClip, ClipSetError> {
        self.check_index(index)?;
        Ok(self.clips.remove(index))
    }

    /// Move the clip at `from` so it lands before the clip currently at `to`
    ///
    /// Dragging downwards (`to > from`) inserts at `to - 1`, because removing
    /// the clip shifts everything after it up by one. `to == len` is not a
    /// valid drop target.
    pub fn reorder(&mut self, from: usize, to: usize) -> Result<(), ClipSetError> {
        self.check_index(from)?;
        self.check_index(to)?;

        let clip = self.clips.remove(from);
        let target = if to > from { to - 1 } else { to };
        self.clips.insert(target, clip);
        Ok(())
    }

    /// Remove every clip
    pub fn clear(&mut self) {
        self.clips.clear();
    }

    /// Snapshot of the clips in merge order
    pub fn clips(&self) -> &[AudioClip] {
        &self.clips
    }

    pub fn len(&self) -> usize {
        self.clips.len()
    }

    pub fn is_empty(&self) -> bool {
        self.clips.is_empty()
    }

    /// Sum of clip durations at their native rates
    pub fn total_duration_seconds(&self) -> f64 {
        self.clips.iter().map(AudioClip::duration_seconds).sum()
    }

    fn check_index(&self, index: usize) -> Result<(), ClipSetError> {
        if index < self.clips.len() {
            Ok(())
        } else {
            Err(ClipSetError::IndexOutOfRange {
                index,
                len: self.clips.len(),
            })
        }
    }
}

impl FromIterator<AudioClip> for ClipSet {
    fn from_iter<I: IntoIterator<Item = AudioClip>>(iter: I) -> Self {
        Self {
            clips: iter.into_iter().collect(),
        }
    }
}
