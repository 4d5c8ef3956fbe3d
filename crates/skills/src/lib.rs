//! Progressive-disclosure loading engine for Agent Skills.
//!
//! Skills are directories containing a `SKILL.md` file with YAML frontmatter
//! and markdown instructions, following the Agent Skills open standard.
//! Loading happens in three phases: discovery returns metadata only,
//! activation loads the instruction body, and individual resource files
//! are read on demand — each phase bounded by the same containment and
//! size rules.

pub mod discover;
pub mod error;
pub mod parse;
pub mod prompt_gen;
pub mod registry;
pub mod resource;
pub mod types;
pub mod validate;

/// Ceiling on any single file read by the engine (10 MiB). Oversized
/// files fail closed before any content is returned.
pub const MAX_FILE_SIZE: u64 = 10 * 1024 * 1024;
