/// Secrets of this length or shorter are masked entirely.
const FULLY_MASKED_MAX_LENGTH: usize = 12;
/// Number of leading characters kept visible for longer secrets.
const VISIBLE_PREFIX_LENGTH: usize = 8;
/// Number of trailing characters kept visible for longer secrets.
const VISIBLE_SUFFIX_LENGTH: usize = 4;

/// Masks an API key for display: short keys become all asterisks, longer keys keep the first 8
/// and the last 4 characters. Length is measured in characters, not bytes.
pub fn mask_api_key(api_key: &str) -> String {
    let length = api_key.chars().count();
    if length <= FULLY_MASKED_MAX_LENGTH {
        return "*".repeat(length);
    }

    let mut masked = String::with_capacity(api_key.len());
    masked.extend(api_key.chars().take(VISIBLE_PREFIX_LENGTH));
    masked.push_str(&"*".repeat(length - FULLY_MASKED_MAX_LENGTH));
    masked.extend(api_key.chars().skip(length - VISIBLE_SUFFIX_LENGTH));
    masked
}
