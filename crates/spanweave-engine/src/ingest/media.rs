//! Asset registration for ingested images and embeds.

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MediaKind {
    Image,
    Embed,
}

/// A media node found during ingestion.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MediaRef<'a> {
    pub kind: MediaKind,
    pub url: &'a str,
    pub alt: Option<&'a str>,
}

/// Collaborator that tracks media found in imported content.
///
/// The returned id, if any, is stored on the node as its asset reference.
pub trait MediaRegistry {
    fn register(&self, media: &MediaRef<'_>) -> Option<String>;
}

impl<F> MediaRegistry for F
where
    F: Fn(&MediaRef<'_>) -> Option<String>,
{
    fn register(&self, media: &MediaRef<'_>) -> Option<String> {
        self(media)
    }
}

/// Registry that assigns no ids.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoRegistry;

impl MediaRegistry for NoRegistry {
    fn register(&self, _media: &MediaRef<'_>) -> Option<String> {
        None
    }
}
