use crate::segments::{
    GitSegment, PathSegment, Segment, SpotifySegment, SysInfoSegment, TextSegment, TimeSegment,
};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Segment types that can appear in a configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SegmentKind {
    #[serde(rename = "git")]
    Git,
    #[serde(rename = "path")]
    Path,
    #[serde(rename = "spotify")]
    Spotify,
    #[serde(rename = "sysinfo")]
    SysInfo,
    #[serde(rename = "text")]
    Text,
    #[serde(rename = "time")]
    Time,
}

/// Identifier to kind. Exact, case-sensitive matches only.
const REGISTRY: &[(&str, SegmentKind)] = &[
    ("git", SegmentKind::Git),
    ("path", SegmentKind::Path),
    ("spotify", SegmentKind::Spotify),
    ("sysinfo", SegmentKind::SysInfo),
    ("text", SegmentKind::Text),
    ("time", SegmentKind::Time),
];

pub fn lookup(name: &str) -> Option<SegmentKind> {
    REGISTRY
        .iter()
        .find(|(id, _)| *id == name)
        .map(|(_, kind)| *kind)
}

pub fn identifiers() -> impl Iterator<Item = &'static str> {
    REGISTRY.iter().map(|(id, _)| *id)
}

impl SegmentKind {
    pub const ALL: [SegmentKind; 6] = [
        SegmentKind::Git,
        SegmentKind::Path,
        SegmentKind::Spotify,
        SegmentKind::SysInfo,
        SegmentKind::Text,
        SegmentKind::Time,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            SegmentKind::Git => "git",
            SegmentKind::Path => "path",
            SegmentKind::Spotify => "spotify",
            SegmentKind::SysInfo => "sysinfo",
            SegmentKind::Text => "text",
            SegmentKind::Time => "time",
        }
    }

    /// A fresh, uninitialized segment of this kind.
    pub fn create(&self) -> Box<dyn Segment> {
        match self {
            SegmentKind::Git => Box::new(GitSegment::new()),
            SegmentKind::Path => Box::new(PathSegment::new()),
            SegmentKind::Spotify => Box::new(SpotifySegment::new()),
            SegmentKind::SysInfo => Box::new(SysInfoSegment::new()),
            SegmentKind::Text => Box::new(TextSegment::new()),
            SegmentKind::Time => Box::new(TimeSegment::new()),
        }
    }
}

impl fmt::Display for SegmentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown segment type `{0}`")]
pub struct UnknownSegment(pub String);

impl FromStr for SegmentKind {
    type Err = UnknownSegment;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        lookup(s).ok_or_else(|| UnknownSegment(s.to_string()))
    }
}
