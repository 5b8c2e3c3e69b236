/// Baseline alignment: the target token at the connector's own position.
///
/// When the target sentence is shorter than `position` the last target token
/// is used; an empty target sentence yields the empty string.
pub fn positional_equivalent(target: &[String], position: usize) -> String {
    target
        .get(position)
        .or_else(|| target.last())
        .cloned()
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sentence(text: &str) -> Vec<String> {
        text.split_whitespace().map(str::to_string).collect()
    }

    #[test]
    fn same_position_when_in_range() {
        let target = sentence("he is tired but happy");
        assert_eq!(positional_equivalent(&target, 3), "but");
        assert_eq!(positional_equivalent(&target, 0), "he");
    }

    #[test]
    fn clamps_to_last_token_when_target_is_shorter() {
        let target = sentence("yes but");
        assert_eq!(positional_equivalent(&target, 2), "but");
        assert_eq!(positional_equivalent(&target, 40), "but");
    }

    #[test]
    fn empty_target_yields_empty_string() {
        assert_eq!(positional_equivalent(&[], 0), "");
        assert_eq!(positional_equivalent(&[], 7), "");
    }
}
