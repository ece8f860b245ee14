use thiserror::Error;

/// Route pattern could not be compiled
///
/// Always a programming or configuration mistake: the pattern text has to be
/// fixed, retrying never helps.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    /// Empty pattern, consecutive slashes, or a parameter without a name
    #[error("malformed route pattern '{pattern}': {reason}")]
    Malformed {
        /// The offending pattern
        pattern: String,
        /// What is wrong with it
        reason: &'static str,
    },
    /// `:name:type` with a type other than `int`, `float` or `path`
    #[error("unknown parameter constraint '{constraint}' in route pattern '{pattern}'")]
    UnknownConstraint {
        pattern: String,
        constraint: String,
    },
    /// The same parameter name appears twice in one pattern
    #[error("duplicate parameter name '{name}' in route pattern '{pattern}'")]
    DuplicateParam { pattern: String, name: String },
    /// A wildcard followed by more segments
    #[error("wildcard '*{name}' must be the last segment of route pattern '{pattern}'")]
    WildcardNotTerminal { pattern: String, name: String },
}

/// Two registrations collide exactly
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConflictError {
    /// Same method, host and segment shape registered twice
    ///
    /// Identifiers are rendered with their `Debug` representation.
    #[error(
        "route {incoming} ({method} {pattern}) conflicts with already registered route {existing} ({existing_pattern})"
    )]
    DuplicateRoute {
        method: String,
        host: Option<String>,
        pattern: String,
        existing_pattern: String,
        existing: String,
        incoming: String,
    },
}

/// Everything `RouterBuilder::register` can fail with
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RegisterError {
    #[error(transparent)]
    Parse(#[from] ParseError),
    #[error(transparent)]
    Conflict(#[from] ConflictError),
    #[error("route method must not be empty (pattern '{pattern}')")]
    EmptyMethod { pattern: String },
}
