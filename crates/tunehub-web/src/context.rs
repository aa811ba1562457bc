//! Per-list song and selection state.
//!
//! Each [`ListContext`] owns its own sequence and selection set; nothing is
//! shared between them. Selection is positional: an index into the
//! context's current sequence, which only changes through
//! [`ContextStore::reset_context`]. Whether a row can be selected is read
//! from the row's own `downloaded` flag.

use std::collections::BTreeSet;

use tunehub_proto::songs::{DownloadedMap, Song, SongKey};
use tracing::debug;

use crate::action::ListContext;
use crate::error::UiError;
use crate::widgets::song_list::RowState;

/// A song as held by a list, with its mutable "already downloaded" flag.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListedSong {
    pub song: Song,
    pub downloaded: bool,
}

#[derive(Debug, Default)]
pub struct ContextState {
    songs: Vec<ListedSong>,
    selected: BTreeSet<usize>,
    source: String,
    /// Bumped on every reset so late results can tell the list was replaced.
    generation: u64,
    batch_running: bool,
}

impl ContextState {
    pub fn songs(&self) -> &[ListedSong] {
        &self.songs
    }

    pub fn song(&self, index: usize) -> Option<&ListedSong> {
        self.songs.get(index)
    }

    pub fn source(&self) -> &str {
        &self.source
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn selected(&self) -> &BTreeSet<usize> {
        &self.selected
    }

    pub fn count(&self) -> usize {
        self.selected.len()
    }

    pub fn is_empty(&self) -> bool {
        self.songs.is_empty()
    }

    pub fn is_batch_running(&self) -> bool {
        self.batch_running
    }

    pub fn is_selectable(&self, index: usize) -> bool {
        self.songs.get(index).is_some_and(|s| !s.downloaded)
    }

    pub fn enabled_indices(&self) -> impl Iterator<Item = usize> + '_ {
        self.songs
            .iter()
            .enumerate()
            .filter(|(_, s)| !s.downloaded)
            .map(|(i, _)| i)
    }

    pub fn enabled_count(&self) -> usize {
        self.enabled_indices().count()
    }

    /// Select-all shows checked iff every enabled row is selected and there
    /// is at least one.
    pub fn select_all_checked(&self) -> bool {
        let enabled = self.enabled_count();
        enabled > 0 && self.selected.len() == enabled
    }

    pub fn rows(&self) -> impl Iterator<Item = RowState<'_>> + '_ {
        self.songs.iter().enumerate().map(|(i, s)| RowState {
            song: &s.song,
            downloaded: s.downloaded,
            selected: self.selected.contains(&i),
        })
    }

    fn reset(&mut self, source: &str, songs: Vec<Song>) {
        self.selected.clear();
        self.songs = songs
            .into_iter()
            .map(|song| ListedSong {
                song,
                downloaded: false,
            })
            .collect();
        self.source = source.to_string();
        self.generation += 1;
    }

    fn toggle_one(&mut self, index: usize) -> Result<bool, UiError> {
        if !self.is_selectable(index) {
            return Err(UiError::RowNotSelectable(index));
        }
        if self.selected.remove(&index) {
            Ok(false)
        } else {
            self.selected.insert(index);
            Ok(true)
        }
    }

    fn toggle_all(&mut self, checked: bool) {
        self.selected = if checked {
            self.enabled_indices().collect()
        } else {
            BTreeSet::new()
        };
    }

    /// Flag every row with identity `key` downloaded and drop it from the
    /// selection. Returns how many rows changed.
    fn mark_downloaded(&mut self, key: &SongKey) -> usize {
        let mut changed = 0;
        for (i, row) in self.songs.iter_mut().enumerate() {
            if !row.downloaded && row.song.key() == *key {
                row.downloaded = true;
                self.selected.remove(&i);
                changed += 1;
            }
        }
        changed
    }
}

/// Context-keyed store: one [`ContextState`] per [`ListContext`].
#[derive(Debug, Default)]
pub struct ContextStore {
    search: ContextState,
    toplist: ContextState,
    playlist: ContextState,
}

impl ContextStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, ctx: ListContext) -> &ContextState {
        match ctx {
            ListContext::Search => &self.search,
            ListContext::Toplist => &self.toplist,
            ListContext::Playlist => &self.playlist,
        }
    }

    fn get_mut(&mut self, ctx: ListContext) -> &mut ContextState {
        match ctx {
            ListContext::Search => &mut self.search,
            ListContext::Toplist => &mut self.toplist,
            ListContext::Playlist => &mut self.playlist,
        }
    }

    /// Install a new sequence. The selection is cleared first, so no index
    /// from the previous list survives. Returns the new generation.
    pub fn reset_context(&mut self, ctx: ListContext, source: &str, songs: Vec<Song>) -> u64 {
        let state = self.get_mut(ctx);
        state.reset(source, songs);
        debug!(
            "reset {} context: {} songs (gen {})",
            ctx,
            state.songs.len(),
            state.generation
        );
        state.generation
    }

    /// Apply a downloaded lookup fetched for generation `generation`. Stale
    /// lookups are dropped. Rows that become downloaded leave the selection.
    pub fn apply_downloaded(&mut self, ctx: ListContext, generation: u64, downloaded: &DownloadedMap) -> bool {
        let state = self.get_mut(ctx);
        if state.generation != generation {
            debug!("dropping stale downloaded map for {} (gen {})", ctx, generation);
            return false;
        }
        for (i, row) in state.songs.iter_mut().enumerate() {
            if downloaded.is_downloaded(&row.song.id) {
                row.downloaded = true;
                state.selected.remove(&i);
            }
        }
        true
    }

    /// Flip one row's membership. Out-of-range and downloaded rows are
    /// rejected without touching the selection. Returns the new membership.
    pub fn toggle_one(&mut self, ctx: ListContext, index: usize) -> Result<bool, UiError> {
        self.get_mut(ctx).toggle_one(index)
    }

    pub fn toggle_all(&mut self, ctx: ListContext, checked: bool) {
        self.get_mut(ctx).toggle_all(checked);
    }

    pub fn count(&self, ctx: ListContext) -> usize {
        self.get(ctx).count()
    }

    /// Mark `key` downloaded in every context. Returns the number of rows
    /// that changed.
    pub fn mark_downloaded_everywhere(&mut self, key: &SongKey) -> usize {
        ListContext::ALL
            .into_iter()
            .map(|ctx| self.get_mut(ctx).mark_downloaded(key))
            .sum()
    }

    pub(crate) fn set_batch_running(&mut self, ctx: ListContext, running: bool) {
        self.get_mut(ctx).batch_running = running;
    }

    pub(crate) fn clear_selection(&mut self, ctx: ListContext) {
        self.get_mut(ctx).selected.clear();
    }
}
