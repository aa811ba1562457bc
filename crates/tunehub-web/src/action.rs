//! Identifiers shared by the state store, renderers and the UI server.

use std::fmt;
use std::str::FromStr;

/// One of the three selectable song lists. The library is read-only and
/// has no context.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ListContext {
    Search,
    Toplist,
    Playlist,
}

impl ListContext {
    pub const ALL: [ListContext; 3] = [Self::Search, Self::Toplist, Self::Playlist];

    /// Tag used in markup (`data-type`, element ids) and in UI routes.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Search => "search",
            Self::Toplist => "toplist",
            Self::Playlist => "playlist",
        }
    }

    /// Element id of the container holding this context's rows.
    pub fn list_element_id(&self) -> &'static str {
        match self {
            Self::Search => "search-results",
            Self::Toplist => "toplist-songs",
            Self::Playlist => "playlist-songs",
        }
    }
}

impl fmt::Display for ListContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ListContext {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "search" => Ok(Self::Search),
            "toplist" => Ok(Self::Toplist),
            "playlist" => Ok(Self::Playlist),
            other => Err(format!("unknown list context: {other}")),
        }
    }
}

/// Top-level pages reachable from the navigation bar.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Page {
    #[default]
    Home,
    Playlist,
    Downloads,
    Library,
    Settings,
}

impl Page {
    pub const ALL: [Page; 5] = [
        Self::Home,
        Self::Playlist,
        Self::Downloads,
        Self::Library,
        Self::Settings,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Home => "home",
            Self::Playlist => "playlist",
            Self::Downloads => "downloads",
            Self::Library => "library",
            Self::Settings => "settings",
        }
    }

    pub fn section_id(&self) -> &'static str {
        match self {
            Self::Home => "home-section",
            Self::Playlist => "playlist-section",
            Self::Downloads => "downloads-section",
            Self::Library => "library-section",
            Self::Settings => "settings-section",
        }
    }

    /// Unknown names fall back to the home page.
    pub fn from_name(name: &str) -> Self {
        Self::ALL
            .into_iter()
            .find(|p| p.as_str() == name)
            .unwrap_or_default()
    }
}

impl fmt::Display for Page {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
