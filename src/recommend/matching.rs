use crate::util::char_prefix;

const PREFIX_LEN: usize = 4;

/// Lowercased whitespace-separated tokens of an expertise term.
pub fn tokenize(term: &str) -> Vec<String> {
    term.split_whitespace().map(str::to_lowercase).collect()
}

/// Two tokens match when either contains the other, or both are at least
/// four characters long and start with the same four characters.
pub fn tokens_match(a: &str, b: &str) -> bool {
    if a.contains(b) || b.contains(a) {
        return true;
    }

    a.chars().count() >= PREFIX_LEN
        && b.chars().count() >= PREFIX_LEN
        && char_prefix(a, PREFIX_LEN) == char_prefix(b, PREFIX_LEN)
}

pub fn token_sets_match(favorite: &[String], candidate: &[String]) -> bool {
    favorite
        .iter()
        .any(|f| candidate.iter().any(|c| tokens_match(f, c)))
}

pub fn terms_match(favorite: &str, candidate: &str) -> bool {
    token_sets_match(&tokenize(favorite), &tokenize(candidate))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tokenize() {
        assert_eq!(tokenize("  Machine   Learning "), vec!["machine", "learning"]);
        assert!(tokenize("   ").is_empty());
    }

    #[test]
    fn test_substring_rule() {
        assert!(tokens_match("data", "database"));
        assert!(tokens_match("bio", "biology"));
        assert!(!tokens_match("art", "biology"));
    }

    #[test]
    fn test_prefix_rule() {
        assert!(tokens_match("neuroscience", "neurology"));
        assert!(!tokens_match("neu", "nex"));
        // Short tokens never use the prefix rule.
        assert!(!tokens_match("abc", "abd"));
    }

    #[test]
    fn test_terms_match() {
        assert!(terms_match("Machine Learning", "Machine Intelligence"));
        assert!(terms_match("Deep LEARNING", "learning theory"));
        assert!(!terms_match("Machine Learning", "Gardening"));
        assert!(!terms_match("Machine Learning", ""));
    }
}
