//! Display helpers for balances and hashes.

/// Format an integer with comma thousands separators (`29200` -> `"29,200"`).
pub fn format_number(n: u64) -> String {
    let digits = n.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(c);
    }
    out
}

/// Shorten a long hash to its first 10 and last 6 characters.
///
/// Strings too short to benefit are returned unchanged.
pub fn abbreviate_hash(hash: &str) -> String {
    let chars: Vec<char> = hash.chars().collect();
    if chars.len() <= 19 {
        return hash.to_string();
    }
    let head: String = chars[..10].iter().collect();
    let tail: String = chars[chars.len() - 6..].iter().collect();
    format!("{head}...{tail}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn thousands_separators() {
        assert_eq!(format_number(0), "0");
        assert_eq!(format_number(999), "999");
        assert_eq!(format_number(1000), "1,000");
        assert_eq!(format_number(29200), "29,200");
        assert_eq!(format_number(12_849), "12,849");
        assert_eq!(format_number(1_234_567), "1,234,567");
    }

    #[test]
    fn abbreviates_long_hashes() {
        let hash = "0x2bf8406809dcefb1a57a5e3e7a4b9ce1ae7a5cbeaa9e8e0f8d4b9c2a3f6e1d0c";
        assert_eq!(abbreviate_hash(hash), "0x2bf84068...6e1d0c");
    }

    #[test]
    fn short_hashes_unchanged() {
        assert_eq!(abbreviate_hash("0xabc"), "0xabc");
    }
}
