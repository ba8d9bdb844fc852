//! Knowledge base type definitions.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

/// A supported Customer Data Platform.
///
/// The set is closed and fixed for the process lifetime. `ALL` lists the
/// platforms in their canonical order; corpus flattening and index layout
/// depend on that order being stable.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub enum Platform {
    Segment,
    #[serde(rename = "mParticle")]
    MParticle,
    Lytics,
    Zeotap,
}

impl Platform {
    /// All supported platforms, in canonical order.
    pub const ALL: [Platform; 4] = [
        Platform::Segment,
        Platform::MParticle,
        Platform::Lytics,
        Platform::Zeotap,
    ];

    /// Canonical display name, as it appears in documentation and prompts.
    pub fn as_str(&self) -> &'static str {
        match self {
            Platform::Segment => "Segment",
            Platform::MParticle => "mParticle",
            Platform::Lytics => "Lytics",
            Platform::Zeotap => "Zeotap",
        }
    }

    /// Official documentation site for the platform, shown to operators.
    pub fn docs_url(&self) -> &'static str {
        match self {
            Platform::Segment => "https://segment.com/docs/",
            Platform::MParticle => "https://docs.mparticle.com/",
            Platform::Lytics => "https://docs.lytics.com/",
            Platform::Zeotap => "https://docs.zeotap.com/home/en-us/",
        }
    }
}

impl fmt::Display for Platform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Platform {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "segment" => Ok(Platform::Segment),
            "mparticle" => Ok(Platform::MParticle),
            "lytics" => Ok(Platform::Lytics),
            "zeotap" => Ok(Platform::Zeotap),
            _ => Err(format!("Unknown platform: {}", s)),
        }
    }
}

/// One atomic unit of documentation text, tagged with its owning platform.
///
/// Chunks are immutable once loaded.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DocChunk {
    /// Owning platform
    pub platform: Platform,

    /// Documentation text
    pub content: String,
}

impl DocChunk {
    /// Create a new chunk.
    pub fn new(platform: Platform, content: impl Into<String>) -> Self {
        Self {
            platform,
            content: content.into(),
        }
    }

    /// Text used for vectorization only; never shown to the user as-is.
    pub fn combined_text(&self) -> String {
        format!("{}: {}", self.platform, self.content)
    }
}

/// The documentation corpus: platform → ordered chunk texts.
///
/// Built once at startup and read-only thereafter.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Corpus {
    docs: BTreeMap<Platform, Vec<String>>,
}

impl Corpus {
    /// Create a corpus from a platform → chunks mapping.
    pub fn new(docs: BTreeMap<Platform, Vec<String>>) -> Self {
        Self { docs }
    }

    /// Create an empty corpus.
    pub fn empty() -> Self {
        Self {
            docs: BTreeMap::new(),
        }
    }

    /// Documentation chunks for a platform.
    ///
    /// A platform without documentation is a normal "nothing found" case and
    /// yields an empty slice, never an error.
    pub fn get(&self, platform: Platform) -> &[String] {
        self.docs.get(&platform).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Flatten the corpus into tagged chunks.
    ///
    /// Iterates platforms in canonical order, then chunks in stored order.
    /// The relevance index relies on this order being stable: the i-th
    /// vector it builds corresponds to the i-th chunk returned here.
    pub fn chunks(&self) -> Vec<DocChunk> {
        let mut chunks = Vec::new();
        for platform in Platform::ALL {
            for content in self.get(platform) {
                chunks.push(DocChunk::new(platform, content.clone()));
            }
        }
        chunks
    }

    /// Total number of chunks across all platforms.
    pub fn chunk_count(&self) -> usize {
        self.docs.values().map(Vec::len).sum()
    }

    /// Whether the corpus holds no chunks at all.
    pub fn is_empty(&self) -> bool {
        self.chunk_count() == 0
    }

    /// The underlying platform → chunks mapping.
    pub fn as_map(&self) -> &BTreeMap<Platform, Vec<String>> {
        &self.docs
    }
}
