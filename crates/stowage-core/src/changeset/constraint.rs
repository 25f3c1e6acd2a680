use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ConstraintKind {
    Unique,
    ForeignKey,
    Check,
    Exclusion,
}

/// How a declared constraint name is compared with the reported one.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Match {
    #[default]
    Exact,
    Suffix,
    Prefix,
}

/// A storage constraint the caller expects may be violated, and the field
/// error to report when it is.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Constraint {
    pub kind: ConstraintKind,
    pub name: String,
    pub field: String,
    pub message: String,
    pub matching: Match,
}

impl Constraint {
    pub fn new(kind: ConstraintKind, name: impl Into<String>, field: impl Into<String>) -> Self {
        Constraint {
            kind,
            name: name.into(),
            field: field.into(),
            message: kind.default_message().to_string(),
            matching: Match::Exact,
        }
    }

    pub fn message(mut self, message: impl Into<String>) -> Self {
        self.message = message.into();
        self
    }

    pub fn matching(mut self, matching: Match) -> Self {
        self.matching = matching;
        self
    }

    /// Returns `true` if a violation reported by storage corresponds to this
    /// declaration.
    pub fn matches(&self, kind: ConstraintKind, name: &str) -> bool {
        if self.kind != kind {
            return false;
        }

        match self.matching {
            Match::Exact => self.name == name,
            Match::Suffix => name.ends_with(&self.name),
            Match::Prefix => name.starts_with(&self.name),
        }
    }
}

impl ConstraintKind {
    pub fn default_message(&self) -> &'static str {
        match self {
            ConstraintKind::Unique => "has already been taken",
            ConstraintKind::ForeignKey => "does not exist",
            ConstraintKind::Check => "is invalid",
            ConstraintKind::Exclusion => "violates an exclusion constraint",
        }
    }
}

impl fmt::Display for ConstraintKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            ConstraintKind::Unique => "unique",
            ConstraintKind::ForeignKey => "foreign_key",
            ConstraintKind::Check => "check",
            ConstraintKind::Exclusion => "exclusion",
        })
    }
}
