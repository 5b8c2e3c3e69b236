use regex::Regex;

use crate::config::CANDIDATE_PLACEHOLDER;
use crate::error::AlignmentError;

/// Instantiate `template` for `candidate` and compile it case-insensitively.
pub(crate) fn compile_template(template: &str, candidate: &str) -> Result<Regex, AlignmentError> {
    let pattern = format!(
        "(?i){}",
        template.replace(CANDIDATE_PLACEHOLDER, &regex::escape(candidate))
    );
    Regex::new(&pattern).map_err(|e| AlignmentError::pattern(pattern, e))
}

/// Compiled support and lexical patterns for one candidate, with running counts.
pub(crate) struct CandidateRules {
    pub(crate) candidate: String,
    support: Vec<Regex>,
    lexical: Vec<Regex>,
    pub(crate) support_count: usize,
    pub(crate) lexical_count: usize,
    support_cap: usize,
    lexical_cap: usize,
}

impl CandidateRules {
    pub(crate) fn new(
        candidate: &str,
        support_templates: &[String],
        lexical_templates: &[String],
        c_filter: usize,
        p_filter: usize,
    ) -> Result<Self, AlignmentError> {
        let support = support_templates
            .iter()
            .map(|t| compile_template(t, candidate))
            .collect::<Result<Vec<_>, _>>()?;
        let lexical = lexical_templates
            .iter()
            .map(|t| compile_template(t, candidate))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self {
            candidate: candidate.to_string(),
            support,
            lexical,
            support_count: 0,
            lexical_count: 0,
            // Counting past these values cannot change the verdict.
            support_cap: c_filter,
            lexical_cap: p_filter.saturating_add(1),
        })
    }

    /// Count every (pattern, line) match until the verdict is settled.
    pub(crate) fn observe(&mut self, line: &str) {
        if self.support_count < self.support_cap {
            self.support_count += self.support.iter().filter(|re| re.is_match(line)).count();
        }
        if self.lexical_count < self.lexical_cap {
            self.lexical_count += self.lexical.iter().filter(|re| re.is_match(line)).count();
        }
    }

    pub(crate) fn lacks_support(&self) -> bool {
        self.support_count < self.support_cap
    }

    pub(crate) fn is_lexical(&self) -> bool {
        self.lexical_count >= self.lexical_cap
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn candidate_is_escaped_inside_template() {
        let re = compile_template(", {}", "a.b").expect("valid template");
        assert!(re.is_match("x, a.b y"));
        assert!(!re.is_match("x, axb y"));
    }

    #[test]
    fn templates_match_case_insensitively() {
        let re = compile_template("{},", "however").expect("valid template");
        assert!(re.is_match("However, it failed."));
    }

    #[test]
    fn invalid_template_is_a_pattern_error() {
        let err = compile_template("[{}", "but").unwrap_err();
        assert!(matches!(err, AlignmentError::Pattern { .. }));
    }

    #[test]
    fn counts_stop_once_verdict_is_settled() {
        let mut rules = CandidateRules::new(
            "but",
            &[", {}".to_string()],
            &["[a-zA-Z] {} [a-zA-Z]".to_string()],
            2,
            0,
        )
        .expect("valid templates");
        assert!(rules.lacks_support());
        for _ in 0..5 {
            rules.observe("tired, but happy and sad but well");
        }
        assert_eq!(rules.support_count, 2);
        assert_eq!(rules.lexical_count, 1);
        assert!(!rules.lacks_support());
        assert!(rules.is_lexical());
    }
}
