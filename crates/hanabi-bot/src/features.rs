/// Toggles for the clue evaluation harness, read from the environment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct EvalFeatures {
    skip_bad_touch: bool,
    log_reports: bool,
}

impl EvalFeatures {
    pub const fn new(skip_bad_touch: bool, log_reports: bool) -> Self {
        Self {
            skip_bad_touch,
            log_reports,
        }
    }

    pub fn from_env() -> Self {
        Self::from_reader(|key| std::env::var(key).ok())
    }

    pub const fn skip_bad_touch(self) -> bool {
        self.skip_bad_touch
    }

    pub const fn log_reports(self) -> bool {
        self.log_reports
    }

    pub fn with_logging(mut self, enabled: bool) -> Self {
        self.log_reports = enabled;
        self
    }

    fn from_reader<F>(mut read: F) -> Self
    where
        F: FnMut(&str) -> Option<String>,
    {
        let flag = |raw: String| matches!(raw.trim(), "1" | "true" | "TRUE" | "on" | "ON");

        Self {
            skip_bad_touch: read("HANABI_EVAL_SKIP_BAD_TOUCH")
                .map(flag)
                .unwrap_or(false),
            log_reports: read("HANABI_EVAL_LOG").map(flag).unwrap_or(false),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::EvalFeatures;
    use std::collections::HashMap;

    #[test]
    fn eval_features_default_fallbacks() {
        let features = EvalFeatures::from_reader(|_| None);
        assert!(!features.skip_bad_touch());
        assert!(!features.log_reports());
        assert_eq!(features, EvalFeatures::default());
    }

    #[test]
    fn eval_features_respect_flags() {
        let mut vars = HashMap::new();
        vars.insert("HANABI_EVAL_SKIP_BAD_TOUCH".to_string(), "on".to_string());
        vars.insert("HANABI_EVAL_LOG".to_string(), "nope".to_string());

        let features = EvalFeatures::from_reader(|key| vars.get(key).cloned());
        assert!(features.skip_bad_touch());
        assert!(!features.log_reports());
        assert!(features.with_logging(true).log_reports());
    }
}
