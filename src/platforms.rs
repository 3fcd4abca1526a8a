/// A configured distraction destination.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PlatformConfig {
    pub id: &'static str,
    /// Substring matched against open tab URLs. One pattern covers every
    /// path variant of the site.
    pub url_pattern: &'static str,
    /// Where a fresh tab is opened when no existing tab matches.
    pub full_url: &'static str,
}

/// Known platforms. The first entry is the default.
pub const PLATFORMS: &[PlatformConfig] = &[
    PlatformConfig {
        id: "youtube",
        url_pattern: "youtube.com/shorts",
        full_url: "https://www.youtube.com/shorts",
    },
    PlatformConfig {
        id: "instagram",
        url_pattern: "instagram.com/reels",
        full_url: "https://www.instagram.com/reels/",
    },
    PlatformConfig {
        id: "tiktok",
        url_pattern: "tiktok.com",
        full_url: "https://www.tiktok.com/",
    },
];

/// Look up a platform by id. Unknown ids fall back to the default entry, so
/// this always returns a usable config.
pub fn resolve(id: &str) -> &'static PlatformConfig {
    PLATFORMS
        .iter()
        .find(|p| p.id == id)
        .unwrap_or(default_platform())
}

pub fn default_platform() -> &'static PlatformConfig {
    &PLATFORMS[0]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_known_platforms() {
        assert_eq!(resolve("youtube").url_pattern, "youtube.com/shorts");
        assert_eq!(resolve("instagram").full_url, "https://www.instagram.com/reels/");
        assert_eq!(resolve("tiktok").url_pattern, "tiktok.com");
    }

    #[test]
    fn test_unknown_platform_resolves_to_default() {
        assert_eq!(resolve("myspace"), default_platform());
        assert_eq!(resolve(""), default_platform());
    }

    #[test]
    fn test_default_is_first_entry() {
        assert_eq!(default_platform().id, "youtube");
    }
}
