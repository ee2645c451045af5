//! Rewriter configuration.

use mcrelax_rules::RuleOptions;

/// Configuration for the rewriter.
#[derive(Clone, Debug, PartialEq)]
pub struct RewriteConfig {
    /// Base name of auxiliary symbols; the n-th one is `<prefix><n>`.
    pub aux_prefix: String,
    /// Intersect every relaxation with its interval bounds.
    pub cut_to_interval: bool,
    /// Smallest interval width a secant divides by.
    pub min_width: f64,
}

impl Default for RewriteConfig {
    fn default() -> Self {
        let rules = RuleOptions::default();
        Self {
            aux_prefix: "aux".to_string(),
            cut_to_interval: rules.cut_to_interval,
            min_width: rules.min_width,
        }
    }
}

impl RewriteConfig {
    /// Sets the auxiliary name prefix.
    #[must_use]
    pub fn with_aux_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.aux_prefix = prefix.into();
        self
    }

    /// Enables or disables the interval cut.
    #[must_use]
    pub fn with_cuts(mut self, enabled: bool) -> Self {
        self.cut_to_interval = enabled;
        self
    }

    /// The options handed to each rule.
    #[must_use]
    pub fn rule_options(&self) -> RuleOptions {
        RuleOptions {
            cut_to_interval: self.cut_to_interval,
            min_width: self.min_width,
        }
    }
}
