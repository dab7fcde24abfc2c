use derive_more::{Constructor, Display};
use serde::{Deserialize, Serialize};

/// A struct to keep information about the page when results are being paginated
#[derive(Serialize, Deserialize, Copy, Clone, Debug, PartialEq, Eq, Constructor)]
pub struct Pagination {
    /// The page number, starting at 0
    pub page: u32,
    /// Page size. The number of results per page
    pub page_size: u32,
}

impl Pagination {
    #[must_use]
    pub fn new_with_options(page_option: Option<u32>, page_size_option: Option<u32>) -> Self {
        Self {
            page: page_option.unwrap_or_else(Pagination::default_page),
            page_size: page_size_option.unwrap_or_else(Pagination::default_page_size),
        }
    }

    #[must_use]
    pub fn default_page() -> u32 {
        0
    }

    #[must_use]
    pub fn default_page_size() -> u32 {
        4000
    }

    /// The number of items before the first item of this page.
    #[must_use]
    pub fn offset(&self) -> usize {
        (self.page as usize).saturating_mul(self.page_size as usize)
    }
}

impl Default for Pagination {
    fn default() -> Self {
        Self {
            page: Self::default_page(),
            page_size: Self::default_page_size(),
        }
    }
}

/// The order in which torrents are listed.
///
/// Ties are always broken by ascending info-hash.
#[derive(Serialize, Deserialize, Copy, Clone, Debug, Default, PartialEq, Eq, Hash, Display)]
#[serde(rename_all = "snake_case")]
pub enum TorrentsSortKey {
    /// Ascending info-hash (lexical byte order).
    #[default]
    #[display("info_hash")]
    InfoHash,
    /// Descending number of peers in the swarm.
    #[display("peers")]
    Peers,
    /// Descending completed counter.
    #[display("completed")]
    Completed,
}
