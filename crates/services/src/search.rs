//! Full-text search across every registered track.

use track_core::model::{ContentBundle, TrackId, TrackInfo};

use crate::content::ContentProvider;

/// Queries shorter than this (after trimming) return nothing.
pub const MIN_QUERY_CHARS: usize = 2;
/// Upper bound on returned hits.
pub const MAX_RESULTS: usize = 20;

const TITLE_CHARS: usize = 60;
const EXCERPT_CHARS: usize = 150;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchHit {
    pub track_id: TrackId,
    pub track_title: String,
    /// Overview heading the match sits under, or "Flashcards" / "Quizzes".
    pub section: String,
    pub title: String,
    pub excerpt: String,
}

/// Case-insensitive substring search over overviews, flashcards and quiz
/// prompts. Hits come back in catalog order.
#[must_use]
pub fn search(provider: &dyn ContentProvider, query: &str) -> Vec<SearchHit> {
    let query = query.trim();
    if query.chars().count() < MIN_QUERY_CHARS {
        return Vec::new();
    }
    let needle = query.to_lowercase();

    let mut hits = Vec::new();
    for info in provider.tracks() {
        let Some(bundle) = provider.get(&info.id) else {
            tracing::debug!(track = %info.id, "catalog entry without content");
            continue;
        };
        search_track(&info, &bundle, &needle, &mut hits);
        if hits.len() >= MAX_RESULTS {
            break;
        }
    }
    hits.truncate(MAX_RESULTS);
    hits
}

fn search_track(info: &TrackInfo, bundle: &ContentBundle, needle: &str, hits: &mut Vec<SearchHit>) {
    let hit = |section: &str, title: String, excerpt: String| SearchHit {
        track_id: info.id.clone(),
        track_title: info.title.clone(),
        section: section.to_owned(),
        title,
        excerpt,
    };

    let lines: Vec<&str> = bundle.overview().split('\n').collect();
    let mut section = "";
    let mut excerpts_seen: Vec<String> = Vec::new();
    for (index, line) in lines.iter().enumerate() {
        if let Some(heading) = line.strip_prefix("# ").or_else(|| line.strip_prefix("## ")) {
            section = heading.trim();
        }
        if !contains(line, needle) {
            continue;
        }

        let start = index.saturating_sub(1);
        let end = (index + 2).min(lines.len());
        let excerpt = truncate(strip_markup(&lines[start..end].join(" ")).trim(), EXCERPT_CHARS);
        if excerpts_seen.contains(&excerpt) {
            continue;
        }
        excerpts_seen.push(excerpt.clone());

        let section = if section.is_empty() { "Overview" } else { section };
        let title = truncate(strip_markup(line).trim(), TITLE_CHARS);
        hits.push(hit(section, title, excerpt));
    }

    for card in bundle.flashcards() {
        if contains(&card.term, needle) || contains(&card.definition, needle) {
            hits.push(hit(
                "Flashcards",
                truncate(&card.term, TITLE_CHARS),
                truncate(&card.definition, EXCERPT_CHARS),
            ));
        }
    }

    for question in bundle.quiz().questions() {
        if contains(question.prompt(), needle) {
            hits.push(hit(
                "Quizzes",
                truncate(question.prompt(), TITLE_CHARS),
                truncate(question.prompt(), EXCERPT_CHARS),
            ));
        }
    }
}

fn contains(haystack: &str, needle: &str) -> bool {
    haystack.to_lowercase().contains(needle)
}

fn strip_markup(text: &str) -> String {
    text.chars().filter(|c| !matches!(c, '#' | '*' | '`')).collect()
}

fn truncate(text: &str, max_chars: usize) -> String {
    text.chars().take(max_chars).collect()
}
