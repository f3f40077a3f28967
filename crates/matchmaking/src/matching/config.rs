/// Upper limit for any configured page size.
pub const PAGE_SIZE_CEILING: u32 = 100;

/// Tunables handed to the matchmaking service at construction time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MatchingConfig {
    /// A profile becomes "popular" once its like count exceeds this value.
    pub popularity_threshold: u64,
    pub default_page_size: u32,
    pub max_page_size: u32,
}

impl Default for MatchingConfig {
    fn default() -> Self {
        Self {
            popularity_threshold: 50,
            default_page_size: 20,
            max_page_size: PAGE_SIZE_CEILING,
        }
    }
}
