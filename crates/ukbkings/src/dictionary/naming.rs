//! Variable-name derivation from field descriptions.
//!
//! A name is built from the lower-cased description and the raw field code,
//! `<description>_f<udi>`, then rewritten by an ordered list of rules. Rule
//! order is significant: the coding boilerplate rules match text produced by
//! the earlier separator rules.

use once_cell::sync::Lazy;
use regex::Regex;

/// Name every participant-id field is published under.
pub const PARTICIPANT_ID_NAME: &str = "eid";

/// Derived name of the participant-id field before the override.
const PARTICIPANT_ID_DERIVED: &str = "encoded_anonymised_participant_id_feid";

/// One text rewrite applied to a candidate name.
#[derive(Debug, Clone)]
pub struct NameRule {
    /// Short label used in diagnostics.
    pub label: &'static str,
    pub pattern: Regex,
    pub replacement: &'static str,
}

impl NameRule {
    pub fn new(
        label: &'static str,
        pattern: &str,
        replacement: &'static str,
    ) -> Result<Self, regex::Error> {
        Ok(Self {
            label,
            pattern: Regex::new(pattern)?,
            replacement,
        })
    }

    /// Rewrite every non-overlapping match.
    pub fn apply(&self, input: &str) -> String {
        self.pattern
            .replace_all(input, self.replacement)
            .into_owned()
    }
}

static DEFAULT_RULES: Lazy<Vec<NameRule>> = Lazy::new(|| {
    vec![
        NameRule::new("spaced_dash", r" - ", "_"),
        NameRule::new("dash", r"-", "_"),
        NameRule::new("space", r" ", "_"),
        NameRule::new("double_underscore", r"__", "_"),
        NameRule::new("comma_pipe", r"[,|]", ""),
        NameRule::new("dot", r"\.", "_"),
        NameRule::new("simple_list", r"uses_data.coding.*simple_list.", ""),
        NameRule::new("hierarchical_tree", r"uses_data.coding.*hierarchical_tree.", ""),
    ]
    .into_iter()
    .map(|rule| rule.unwrap())
    .collect()
});

/// Applies the ordered rewrite rules and the participant-id override.
#[derive(Debug, Clone)]
pub struct NameNormalizer {
    rules: Vec<NameRule>,
}

impl NameNormalizer {
    /// Create a normalizer with the standard rule order.
    pub fn new() -> Self {
        Self {
            rules: DEFAULT_RULES.clone(),
        }
    }

    /// Create a normalizer with a custom rule order.
    pub fn with_rules(rules: Vec<NameRule>) -> Self {
        Self { rules }
    }

    pub fn rules(&self) -> &[NameRule] {
        &self.rules
    }

    /// Derive the variable name for a field.
    pub fn normalize(&self, description: &str, raw_identifier: &str) -> String {
        let candidate = format!("{}_f{}", description.to_lowercase(), raw_identifier);

        let name = self
            .rules
            .iter()
            .fold(candidate, |name, rule| rule.apply(&name));

        if name == PARTICIPANT_ID_DERIVED {
            PARTICIPANT_ID_NAME.to_string()
        } else {
            name
        }
    }
}

impl Default for NameNormalizer {
    fn default() -> Self {
        Self::new()
    }
}

/// Derive a variable name with the standard rules.
pub fn normalize_name(description: &str, raw_identifier: &str) -> String {
    static NORMALIZER: Lazy<NameNormalizer> = Lazy::new(NameNormalizer::new);
    NORMALIZER.normalize(description, raw_identifier)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_simple_field() {
        assert_eq!(normalize_name("Sex", "31-0.0"), "sex_f31_0_0");
    }

    #[test]
    fn test_participant_id_override() {
        assert_eq!(normalize_name("Encoded anonymised participant ID", "eid"), "eid");
    }

    #[test]
    fn test_override_is_exact_match() {
        assert_eq!(
            normalize_name("Encoded anonymised participant ID", "eid-0.0"),
            "encoded_anonymised_participant_id_feid_0_0"
        );
    }

    #[test]
    fn test_spaced_dash_before_dash() {
        assert_eq!(
            normalize_name("Year of birth - estimated", "34-0.0"),
            "year_of_birth_estimated_f34_0_0"
        );
    }

    #[test]
    fn test_commas_and_pipes_removed() {
        assert_eq!(
            normalize_name("Weight, height|method", "50-0.0"),
            "weight_heightmethod_f50_0_0"
        );
    }

    #[test]
    fn test_simple_list_boilerplate_stripped() {
        // The boilerplate leaves a doubled separator: the collapse rule ran earlier.
        assert_eq!(
            normalize_name("Sex Uses data-coding 9 simple list.", "31-0.0"),
            "sex__f31_0_0"
        );
    }

    #[test]
    fn test_hierarchical_tree_boilerplate_stripped() {
        assert_eq!(
            normalize_name(
                "Diagnoses - main ICD10 Uses data-coding 19 hierarchical tree.",
                "41202-0.0"
            ),
            "diagnoses_main_icd10__f41202_0_0"
        );
    }

    #[test]
    fn test_other_punctuation_left_as_is() {
        assert_eq!(
            normalize_name("Body mass index (BMI)", "21001-0.0"),
            "body_mass_index_(bmi)_f21001_0_0"
        );
    }

    #[test]
    fn test_rule_order_matters() {
        let reversed: Vec<NameRule> = NameNormalizer::new().rules().iter().rev().cloned().collect();
        let normalizer = NameNormalizer::with_rules(reversed);

        // Reversed, spaces are rewritten before " - " can match.
        assert_ne!(
            normalizer.normalize("Year of birth - estimated", "34-0.0"),
            normalize_name("Year of birth - estimated", "34-0.0")
        );
    }

    #[test]
    fn test_deterministic() {
        let normalizer = NameNormalizer::new();
        let first = normalizer.normalize("Standing height", "50-0.0");
        let second = normalizer.normalize("Standing height", "50-0.0");
        assert_eq!(first, second);
    }
}
