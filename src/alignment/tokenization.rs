use crate::types::Sentence;

/// Separator class: whitespace and `. , / : ? !`. Anything else is token material.
pub fn is_separator(c: char) -> bool {
    c.is_whitespace() || matches!(c, '.' | ',' | '/' | ':' | '?' | '!')
}

/// Split a line into tokens. Separator runs never produce empty tokens.
///
/// Does not case-fold; callers fold once per line with [`casefold`] first.
pub fn tokenize(line: &str) -> Sentence {
    line.split(is_separator)
        .filter(|fragment| !fragment.is_empty())
        .map(str::to_string)
        .collect()
}

/// Byte spans `[start, end)` of the tokens [`tokenize`] would produce.
pub fn token_spans(line: &str) -> Vec<(usize, usize)> {
    let mut spans = Vec::new();
    let mut start: Option<usize> = None;
    for (idx, c) in line.char_indices() {
        if is_separator(c) {
            if let Some(s) = start.take() {
                spans.push((s, idx));
            }
        } else if start.is_none() {
            start = Some(idx);
        }
    }
    if let Some(s) = start {
        spans.push((s, line.len()));
    }
    spans
}

/// Case-fold a line for connector comparison: lowercase, with `ß` expanded to `ss`.
pub fn casefold(text: &str) -> String {
    let lower = text.to_lowercase();
    if lower.contains('ß') {
        lower.replace('ß', "ss")
    } else {
        lower
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn splits_on_every_separator() {
        assert_eq!(
            tokenize("Aber i bim doch a deitscher!"),
            ["Aber", "i", "bim", "doch", "a", "deitscher"]
        );
        assert_eq!(
            tokenize("a.b,c/d:e?f!g h\ti"),
            ["a", "b", "c", "d", "e", "f", "g", "h", "i"]
        );
    }

    #[test]
    fn consecutive_separators_produce_no_empty_tokens() {
        assert_eq!(tokenize("  ja,,  nein...  "), ["ja", "nein"]);
    }

    #[test]
    fn empty_and_separator_only_lines_are_empty_sentences() {
        assert!(tokenize("").is_empty());
        assert!(tokenize(" .,/:?! \n").is_empty());
    }

    #[test]
    fn other_punctuation_stays_inside_tokens() {
        assert_eq!(tokenize("(so) \"sagt\" er;"), ["(so)", "\"sagt\"", "er;"]);
    }

    #[test]
    fn tokenize_does_not_fold_case() {
        assert_eq!(tokenize("Aber DOCH"), ["Aber", "DOCH"]);
    }

    #[test]
    fn spans_cover_the_same_tokens() {
        for line in ["er ist müde, aber glücklich.", "", "  x", "ü!ä ", "a"] {
            let from_spans: Vec<&str> = token_spans(line)
                .into_iter()
                .map(|(s, e)| &line[s..e])
                .collect();
            assert_eq!(from_spans, tokenize(line), "line {line:?}");
        }
    }

    #[test]
    fn casefold_lowercases_and_expands_sharp_s() {
        assert_eq!(casefold("Aber DASS"), "aber dass");
        assert_eq!(casefold("Daß Straße"), "dass strasse");
        assert_eq!(casefold("Müde"), "müde");
    }
}
