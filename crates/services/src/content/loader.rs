use std::path::{Path, PathBuf};

use serde::Deserialize;
use track_core::model::{ContentBundle, Flashcard, QuestionDraft, Quiz, TrackInfo};

use super::registry::ContentRegistry;
use crate::error::RegistryError;

/// On-disk shape of one track file.
///
/// Top-level strings must precede the `[track]` table in TOML.
#[derive(Debug, Deserialize)]
struct TrackFile {
    track: TrackInfo,
    #[serde(default)]
    overview: String,
    #[serde(default)]
    labs: String,
    #[serde(default)]
    diagram: String,
    #[serde(default)]
    questions: Vec<QuestionDraft>,
    #[serde(default)]
    flashcards: Vec<Flashcard>,
}

impl ContentRegistry {
    /// Loads every `*.toml` track file in `dir`, in file-name order.
    ///
    /// Other files are skipped. The first invalid file aborts the load.
    ///
    /// # Errors
    ///
    /// Returns `RegistryError` if `dir` is not a directory, a file cannot be
    /// read or parsed, its content breaks an authoring rule, or two files
    /// declare the same track id.
    pub fn load_dir(dir: &Path) -> Result<Self, RegistryError> {
        if !dir.is_dir() {
            return Err(RegistryError::NotADirectory(dir.to_path_buf()));
        }

        let mut paths = Vec::new();
        let entries = std::fs::read_dir(dir).map_err(|source| RegistryError::Io {
            path: dir.to_path_buf(),
            source,
        })?;
        for entry in entries {
            let path = entry
                .map_err(|source| RegistryError::Io {
                    path: dir.to_path_buf(),
                    source,
                })?
                .path();
            if path.is_file() && path.extension().is_some_and(|ext| ext == "toml") {
                paths.push(path);
            } else {
                tracing::debug!(path = %path.display(), "skipping non-track entry");
            }
        }
        paths.sort();

        let mut registry = Self::new();
        for path in paths {
            let (info, bundle) = load_track_file(&path)?;
            registry.register(info, bundle)?;
        }
        tracing::info!(dir = %dir.display(), tracks = registry.len(), "content loaded");
        Ok(registry)
    }
}

fn load_track_file(path: &Path) -> Result<(TrackInfo, ContentBundle), RegistryError> {
    let raw = std::fs::read_to_string(path).map_err(|source| RegistryError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    parse_track_file(path.to_path_buf(), &raw)
}

fn parse_track_file(path: PathBuf, raw: &str) -> Result<(TrackInfo, ContentBundle), RegistryError> {
    let file: TrackFile = match toml::from_str(raw) {
        Ok(file) => file,
        Err(source) => return Err(RegistryError::Parse { path, source }),
    };

    let invalid = |path: PathBuf, source: track_core::Error| RegistryError::Invalid { path, source };

    let quiz = match Quiz::from_drafts(file.questions) {
        Ok(quiz) => quiz,
        Err(err) => return Err(invalid(path, err.into())),
    };
    let bundle = match ContentBundle::new(file.overview, quiz, file.labs, file.flashcards, file.diagram) {
        Ok(bundle) => bundle,
        Err(err) => return Err(invalid(path, err.into())),
    };
    Ok((file.track, bundle))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::content::ContentProvider;
    use track_core::model::{Difficulty, QuizError, TrackId};

    const FOUNDATIONS: &str = r##"
overview = """
# GitHub Foundations
## Repositories
A repository holds your project files and history.
"""
labs = "# Lab 1\nCreate a repository."
diagram = "mindmap\n  root((GitHub))"

[track]
id = "foundations"
title = "GitHub Foundations"
duration = "8 hours"
modules = 6
difficulty = "Beginner"

[[questions]]
id = 1
question = "What is a repository?"
options = ["A project folder", "A user account"]
correct_answer = 0
explanation = "Repositories store code and history."

[[flashcards]]
term = "Repository"
definition = "A project's files and revision history."
"##;

    #[test]
    fn parses_full_track_file() {
        let (info, bundle) = parse_track_file(PathBuf::from("foundations.toml"), FOUNDATIONS).unwrap();

        assert_eq!(info.id.as_str(), "foundations");
        assert_eq!(info.difficulty, Difficulty::Beginner);
        assert_eq!(info.modules, 6);
        assert_eq!(bundle.quiz().len(), 1);
        assert!(bundle.overview().contains("## Repositories"));
        assert!(bundle.has_term("Repository"));
    }

    #[test]
    fn empty_quiz_is_invalid() {
        let raw = "[track]\nid = \"empty\"\ntitle = \"Empty\"\ndifficulty = \"Advanced\"\n";
        let err = parse_track_file(PathBuf::from("empty.toml"), raw).unwrap_err();
        assert!(matches!(
            err,
            RegistryError::Invalid {
                source: track_core::Error::Quiz(QuizError::Empty),
                ..
            }
        ));
    }

    #[test]
    fn unknown_difficulty_is_a_parse_error() {
        let raw = FOUNDATIONS.replace("\"Beginner\"", "\"Expert\"");
        let err = parse_track_file(PathBuf::from("foundations.toml"), &raw).unwrap_err();
        assert!(matches!(err, RegistryError::Parse { .. }));
    }

    #[test]
    fn load_dir_reads_toml_files_in_name_order() {
        let dir = tempfile::tempdir().unwrap();
        let actions = FOUNDATIONS
            .replace("id = \"foundations\"", "id = \"actions\"")
            .replace("title = \"GitHub Foundations\"", "title = \"GitHub Actions\"");
        std::fs::write(dir.path().join("b-foundations.toml"), FOUNDATIONS).unwrap();
        std::fs::write(dir.path().join("a-actions.toml"), actions).unwrap();
        std::fs::write(dir.path().join("README.md"), "not a track").unwrap();

        let registry = ContentRegistry::load_dir(dir.path()).unwrap();

        let ids: Vec<_> = registry.tracks().into_iter().map(|t| t.id.to_string()).collect();
        assert_eq!(ids, ["actions", "foundations"]);
        assert!(registry.get(&TrackId::new("actions").unwrap()).is_some());
    }

    #[test]
    fn load_dir_rejects_duplicate_ids() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("one.toml"), FOUNDATIONS).unwrap();
        std::fs::write(dir.path().join("two.toml"), FOUNDATIONS).unwrap();

        let err = ContentRegistry::load_dir(dir.path()).unwrap_err();
        assert!(matches!(err, RegistryError::DuplicateTrack(_)));
    }

    #[test]
    fn load_dir_requires_directory() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("missing");
        assert!(matches!(
            ContentRegistry::load_dir(&missing).unwrap_err(),
            RegistryError::NotADirectory(_)
        ));
    }
}
