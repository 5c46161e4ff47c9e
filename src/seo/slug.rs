// src/seo/slug.rs

//! URL slug generation.

/// Fallback token for titles that normalize to nothing.
pub const FALLBACK_SLUG: &str = "ilan";

/// Maximum slug length, bounding overall URL length.
const MAX_SLUG_LEN: usize = 100;

/// Turn a listing title into a URL-safe slug.
///
/// Total and deterministic: lowercases, transliterates the six Turkish
/// letters outside ASCII, strips everything outside `[a-z0-9\s-]`, collapses
/// whitespace and hyphen runs into single hyphens, trims edge hyphens and
/// caps the result at 100 characters. An input that normalizes to nothing
/// yields [`FALLBACK_SLUG`].
///
/// # Examples
/// ```
/// use listing_seo::seo::slug::slugify;
///
/// assert_eq!(slugify("Çağrı Merkezi Elemanı"), "cagri-merkezi-elemani");
/// assert_eq!(slugify("  C++ Developer!  "), "c-developer");
/// ```
pub fn slugify(text: &str) -> String {
    let mut normalized = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            // Turkish letters mapped before lowercasing: 'İ' lowercases to
            // "i" + combining dot in Unicode, which would leak into the slug.
            'ç' | 'Ç' => normalized.push('c'),
            'ğ' | 'Ğ' => normalized.push('g'),
            'ı' | 'İ' => normalized.push('i'),
            'ö' | 'Ö' => normalized.push('o'),
            'ş' | 'Ş' => normalized.push('s'),
            'ü' | 'Ü' => normalized.push('u'),
            _ => normalized.extend(c.to_lowercase()),
        }
    }

    let filtered: String = normalized
        .chars()
        .filter(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c.is_whitespace() || *c == '-')
        .collect();

    let hyphenated = filtered.split_whitespace().collect::<Vec<_>>().join("-");

    let mut slug = String::with_capacity(hyphenated.len());
    let mut prev_hyphen = false;
    for c in hyphenated.chars() {
        if c == '-' {
            if !prev_hyphen {
                slug.push('-');
            }
            prev_hyphen = true;
        } else {
            slug.push(c);
            prev_hyphen = false;
        }
    }

    slug.truncate(MAX_SLUG_LEN);
    let slug = slug.trim_matches('-');

    if slug.is_empty() {
        FALLBACK_SLUG.to_string()
    } else {
        slug.to_string()
    }
}
