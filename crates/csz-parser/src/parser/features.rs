//! Feature-availability oracle.
//!
//! Optional grammar productions are gated on a language version. Unavailable
//! constructs still parse - error tolerance applies to versioning too - but
//! emit a feature diagnostic.

#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord)]
pub enum LanguageVersion {
    V7,
    V8,
    V9,
    V10,
    Latest,
}

impl Default for LanguageVersion {
    fn default() -> LanguageVersion {
        LanguageVersion::Latest
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum LanguageFeature {
    RangeOperator,
    SwitchExpressions,
    NullCoalescingAssignment,
    Records,
    WithExpressions,
    PatternCombinators,
    ImplicitObjectCreation,
    FileScopedNamespaces,
}

impl LanguageFeature {
    pub fn required_version(self) -> LanguageVersion {
        use LanguageFeature::*;
        match self {
            RangeOperator | SwitchExpressions | NullCoalescingAssignment => LanguageVersion::V8,
            Records | WithExpressions | PatternCombinators | ImplicitObjectCreation => {
                LanguageVersion::V9
            }
            FileScopedNamespaces => LanguageVersion::V10,
        }
    }

    pub fn display_name(self) -> &'static str {
        use LanguageFeature::*;
        match self {
            RangeOperator => "range operators",
            SwitchExpressions => "switch expressions",
            NullCoalescingAssignment => "coalescing assignment",
            Records => "records",
            WithExpressions => "with expressions",
            PatternCombinators => "and/or/not patterns",
            ImplicitObjectCreation => "target-typed new",
            FileScopedNamespaces => "file-scoped namespaces",
        }
    }
}

impl LanguageVersion {
    pub fn supports(self, feature: LanguageFeature) -> bool {
        self >= feature.required_version()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn version_ordering_gates_features() {
        assert!(LanguageVersion::V8.supports(LanguageFeature::RangeOperator));
        assert!(!LanguageVersion::V7.supports(LanguageFeature::RangeOperator));
        assert!(LanguageVersion::Latest.supports(LanguageFeature::FileScopedNamespaces));
        assert!(!LanguageVersion::V9.supports(LanguageFeature::FileScopedNamespaces));
    }
}
