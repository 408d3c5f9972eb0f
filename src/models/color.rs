//! Display color validation shared by cards and categories

/// Check for a CSS hex color in `#RGB` or `#RRGGBB` form
pub fn is_valid_hex_color(color: &str) -> bool {
    match color.strip_prefix('#') {
        Some(hex) => (hex.len() == 3 || hex.len() == 6) && hex.chars().all(|c| c.is_ascii_hexdigit()),
        None => false,
    }
}
