use std::path::PathBuf;

/// Failure taxonomy shared by every phase of skill loading.
///
/// Parse and validation failures are recoverable during a multi-skill
/// scan (the broken skill is skipped); containment and size violations
/// are security failures and always fail closed.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("{}: {message}", .path.display())]
    Parse { path: PathBuf, message: String },
    #[error("skill at {} failed validation: {}", .skill_dir.display(), .violations.join("; "))]
    Validation {
        skill_dir: PathBuf,
        violations: Vec<String>,
    },
    #[error("skill '{name}' not found (available: {})", .available.join(", "))]
    SkillNotFound {
        name: String,
        available: Vec<String>,
    },
    #[error("failed to activate skill '{name}': {source}")]
    Activation {
        name: String,
        #[source]
        source: Box<Error>,
    },
    #[error("path '{}' resolves outside skill directory {}", .requested.display(), .skill_dir.display())]
    PathViolation {
        skill_dir: PathBuf,
        requested: PathBuf,
    },
    #[error("{} is {size} bytes, over the {limit}-byte ceiling", .path.display())]
    FileTooLarge { path: PathBuf, size: u64, limit: u64 },
    #[error("cannot discover skills under {}: {message}", .root.display())]
    Discovery { root: PathBuf, message: String },
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl Error {
    #[must_use]
    pub fn parse(path: impl Into<PathBuf>, message: impl Into<String>) -> Self {
        Self::Parse {
            path: path.into(),
            message: message.into(),
        }
    }

    #[must_use]
    pub fn validation(skill_dir: impl Into<PathBuf>, violations: Vec<String>) -> Self {
        Self::Validation {
            skill_dir: skill_dir.into(),
            violations,
        }
    }

    #[must_use]
    pub fn not_found(name: impl Into<String>, available: Vec<String>) -> Self {
        Self::SkillNotFound {
            name: name.into(),
            available,
        }
    }

    #[must_use]
    pub fn activation(name: impl Into<String>, source: Error) -> Self {
        Self::Activation {
            name: name.into(),
            source: Box::new(source),
        }
    }

    #[must_use]
    pub fn discovery(root: impl Into<PathBuf>, message: impl Into<String>) -> Self {
        Self::Discovery {
            root: root.into(),
            message: message.into(),
        }
    }

    /// True for failures of the security contract (containment, size
    /// ceiling). These are never downgraded to warnings.
    #[must_use]
    pub fn is_security_violation(&self) -> bool {
        matches!(self, Self::PathViolation { .. } | Self::FileTooLarge { .. })
    }
}

pub type Result<T> = std::result::Result<T, Error>;
