use std::collections::HashSet;
use std::path::PathBuf;

use crate::models::snapshot::Skill;

/// Directory names starting with this character are never skills.
pub const RESERVED_PREFIX: char = '.';

/// List the skills installed under the given roots.
///
/// Each immediate subdirectory is one skill. Roots are visited in order and
/// the first occurrence of a name wins; within a root names are sorted.
/// Missing or unreadable roots are skipped.
pub fn scan_skills(roots: &[PathBuf]) -> Vec<Skill> {
    let mut seen = HashSet::new();
    let mut skills = Vec::new();

    for root in roots {
        if !root.is_dir() {
            log::debug!("skills root {} not present", root.display());
            continue;
        }
        let entries = match std::fs::read_dir(root) {
            Ok(entries) => entries,
            Err(e) => {
                log::warn!("skills root {} unreadable: {e}", root.display());
                continue;
            }
        };

        let mut names: Vec<String> = entries
            .flatten()
            .filter(|entry| entry.path().is_dir())
            .map(|entry| entry.file_name().to_string_lossy().to_string())
            .filter(|name| !name.starts_with(RESERVED_PREFIX))
            .collect();
        names.sort();

        for name in names {
            if seen.insert(name.clone()) {
                skills.push(Skill { name });
            }
        }
    }

    skills
}
