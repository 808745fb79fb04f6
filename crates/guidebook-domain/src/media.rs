//! Media-center folders in the object store.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MediaKind {
    Video,
    Audio,
    Material,
    Image,
}

impl MediaKind {
    /// Parse a media type path segment. Unknown values yield `None`; callers
    /// pick their own fallback (listing shows images, uploads go to material).
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "video" => Some(Self::Video),
            "audio" => Some(Self::Audio),
            "material" => Some(Self::Material),
            "image" => Some(Self::Image),
            _ => None,
        }
    }

    pub fn parse_or_image(s: &str) -> Self {
        Self::parse(s).unwrap_or(Self::Image)
    }

    pub fn parse_or_material(s: &str) -> Self {
        Self::parse(s).unwrap_or(Self::Material)
    }

    /// Object key prefix, always with a trailing slash.
    pub fn folder(self) -> &'static str {
        match self {
            Self::Video => "video/",
            Self::Audio => "audio/",
            Self::Material => "material/",
            Self::Image => "images/",
        }
    }
}
