use serde::{Deserialize, Serialize};

/// Whether a link stays on the page's host. Ordering puts internal first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LinkType {
    Internal,
    External,
}

impl LinkType {
    pub fn as_str(&self) -> &'static str {
        match self {
            LinkType::Internal => "internal",
            LinkType::External => "external",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LinkRecord {
    pub url: String,
    pub text: String,
    #[serde(rename = "type")]
    pub link_type: LinkType,
}

impl LinkRecord {
    pub fn is_internal(&self) -> bool {
        self.link_type == LinkType::Internal
    }
}

/// Deduplicated, sorted links found on a single page.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Extraction {
    #[serde(rename = "urls")]
    pub links: Vec<LinkRecord>,
    pub count: usize,
}

impl Extraction {
    pub fn new(links: Vec<LinkRecord>) -> Self {
        let count = links.len();
        Self { links, count }
    }

    pub fn internal(&self) -> impl Iterator<Item = &LinkRecord> {
        self.links.iter().filter(|link| link.is_internal())
    }

    pub fn external(&self) -> impl Iterator<Item = &LinkRecord> {
        self.links.iter().filter(|link| !link.is_internal())
    }
}
