use std::path::Path;

use services::{AppServices, ServiceConfig};
use track_core::model::{PerformanceBand, QuizStep, TrackId};
use track_core::time::fixed_clock;

const SCENARIO_TRACK: &str = r##"
overview = """
# GitHub Actions
## Workflows
Workflows are YAML files in .github/workflows.
"""
labs = "# Lab\nWrite your first workflow."
diagram = "mindmap\n  root((Actions))"

[track]
id = "actions"
title = "GitHub Actions"
duration = "10 hours"
modules = 8
difficulty = "Intermediate"

[[questions]]
id = 1
question = "Which event runs a workflow on push?"
options = ["pull_request", "push", "schedule", "release"]
correct_answer = 1

[[questions]]
id = 2
question = "Where do workflow files live?"
options = [".github/workflows", ".github/actions", "workflows/", "ci/"]
correct_answer = 0

[[questions]]
id = 3
question = "Which keyword defines job dependencies?"
options = ["requires", "after", "needs", "depends"]
correct_answer = 2

[[questions]]
id = 4
question = "What runs a job?"
options = ["A step", "A runner", "An action", "A matrix"]
correct_answer = 1

[[questions]]
id = 5
question = "Which context holds encrypted values?"
options = ["env", "github", "vars", "secrets"]
correct_answer = 3

[[flashcards]]
term = "Workflow"
definition = "An automated process made of jobs."

[[flashcards]]
term = "Runner"
definition = "A machine that executes jobs."
"##;

fn write_content(dir: &Path) {
    std::fs::write(dir.join("actions.toml"), SCENARIO_TRACK).expect("write track");
}

fn services_for(root: &Path) -> AppServices {
    let content_dir = root.join("content");
    std::fs::create_dir_all(&content_dir).expect("create content dir");
    write_content(&content_dir);
    let config = ServiceConfig {
        database_path: Some(root.join("progress.db")),
        content_dir: Some(content_dir),
        ..ServiceConfig::default()
    };
    AppServices::from_config(&config, fixed_clock()).expect("build services")
}

fn run_quiz(services: &mut AppServices, answers: [usize; 5]) -> QuizStep {
    let track = TrackId::new("actions").expect("track id");
    let mut page = services.open_track(&track).expect("open track");
    page.start_quiz();

    let mut last = None;
    for answer in answers {
        page.select_answer(answer).expect("select");
        last = Some(page.advance().expect("advance"));
    }
    last.expect("quiz has questions")
}

#[test]
fn perfect_run_scores_full_marks_and_persists() {
    let root = tempfile::tempdir().expect("tempdir");
    let mut services = services_for(root.path());

    let QuizStep::Complete(result) = run_quiz(&mut services, [1, 0, 2, 1, 3]) else {
        panic!("quiz should be complete");
    };
    assert_eq!((result.score, result.total, result.percentage), (5, 5, 100));
    assert_eq!(result.band(), PerformanceBand::Excellent);

    drop(services);
    let reopened = services_for(root.path());
    let catalog = reopened.catalog();
    assert_eq!(catalog.len(), 1);
    assert_eq!(catalog[0].percentage, 20);
}

#[test]
fn all_first_options_score_one() {
    let root = tempfile::tempdir().expect("tempdir");
    let mut services = services_for(root.path());

    let QuizStep::Complete(result) = run_quiz(&mut services, [0; 5]) else {
        panic!("quiz should be complete");
    };
    assert_eq!((result.score, result.percentage), (1, 20));
    assert_eq!(result.band(), PerformanceBand::KeepStudying);

    let stored = services
        .progress()
        .get_progress(&TrackId::new("actions").expect("track id"));
    assert_eq!((stored.quiz_score(), stored.quiz_total()), (1, 5));
}

#[test]
fn every_section_completes_the_track() {
    let root = tempfile::tempdir().expect("tempdir");
    let mut services = services_for(root.path());
    let track = TrackId::new("actions").expect("track id");

    run_quiz(&mut services, [0; 5]);
    let mut page = services.open_track(&track).expect("open track");
    page.open_section(services::Section::Modules);
    page.open_section(services::Section::Labs);
    page.open_section(services::Section::Diagram);
    page.view_flashcard("Workflow").expect("known term");
    assert_eq!(page.overall_percentage(), 80);
    page.view_flashcard("Runner").expect("known term");
    assert_eq!(page.overall_percentage(), 100);

    let hits = services.search("workflow");
    assert!(hits.iter().any(|hit| hit.section == "Workflows"));
    assert!(hits.iter().any(|hit| hit.section == "Flashcards"));
    assert!(hits.iter().any(|hit| hit.section == "Quizzes"));
}
