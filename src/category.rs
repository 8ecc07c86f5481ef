//! Platform video category taxonomy

/// Display name used for ids outside the taxonomy
pub const UNKNOWN_CATEGORY: &str = "Unknown";

/// Category ids and their display names, as published by the platform.
/// Several ids share a display name; they stay separate entries.
pub const CATEGORY_NAMES: &[(u32, &str)] = &[
    (1, "Film & Animation"),
    (2, "Autos & Vehicles"),
    (10, "Music"),
    (15, "Pets & Animals"),
    (17, "Sports"),
    (18, "Short Movies"),
    (19, "Travel & Events"),
    (20, "Gaming"),
    (21, "Videoblogging"),
    (22, "People & Blogs"),
    (23, "Comedy"),
    (24, "Entertainment"),
    (25, "News & Politics"),
    (26, "Howto & Style"),
    (27, "Education"),
    (28, "Science & Technology"),
    (29, "Nonprofits & Activism"),
    (30, "Movies"),
    (31, "Anime/Animation"),
    (32, "Action/Adventure"),
    (33, "Classics"),
    (34, "Comedy"),
    (35, "Documentary"),
    (36, "Drama"),
    (37, "Family"),
    (38, "Foreign"),
    (39, "Horror"),
    (40, "Sci-Fi/Fantasy"),
    (41, "Thriller"),
    (42, "Shorts"),
    (43, "Shows"),
    (44, "Trailers"),
];

/// Look up the display name for a category id. Never fails.
pub fn resolve_category(id: u32) -> &'static str {
    CATEGORY_NAMES
        .iter()
        .find(|(known, _)| *known == id)
        .map(|(_, name)| *name)
        .unwrap_or(UNKNOWN_CATEGORY)
}
