use lab_buddy::catalog::{ALL, EXPERIMENTS, filter};
use lab_buddy::{Difficulty, ExperimentQuery};

#[test]
fn no_selectors_return_full_catalog_in_order() {
    let all = filter(&EXPERIMENTS, "", ALL, ALL);
    let ids: Vec<_> = all.iter().map(|e| e.id).collect();
    assert_eq!(ids, ["1", "2", "3", "4", "5", "6", "7", "8"]);
}

#[test]
fn search_matches_title_or_description() {
    let hits = filter(&EXPERIMENTS, "oscilloscope", ALL, ALL);
    assert_eq!(hits.len(), 1);
    assert_eq!(hits[0].title, "Oscilloscope Waveform Analysis");

    let hits = filter(&EXPERIMENTS, "CAPACITORS", ALL, ALL);
    assert_eq!(hits.len(), 1);
    assert_eq!(hits[0].id, "3");
}

#[test]
fn category_and_difficulty_combine() {
    let hits = filter(&EXPERIMENTS, "", "Chemistry", "Beginner");
    assert_eq!(hits.len(), 1);
    assert_eq!(hits[0].title, "pH Measurement & Buffers");

    assert!(filter(&EXPERIMENTS, "", "Chemistry", "Advanced").is_empty());

    let advanced = filter(&EXPERIMENTS, "", "Electronics", "Advanced");
    assert!(advanced.iter().all(|e| e.difficulty == Difficulty::Advanced));
    assert_eq!(advanced.len(), 2);
}

#[test]
fn all_three_predicates_are_anded() {
    assert!(filter(&EXPERIMENTS, "microscope", "Chemistry", ALL).is_empty());
    assert_eq!(filter(&EXPERIMENTS, "microscope", "Biology", "Beginner").len(), 1);
}

#[test]
fn filtering_is_idempotent() {
    let q = ExperimentQuery {
        search: "analy".into(),
        ..ExperimentQuery::default()
    };
    assert_eq!(q.apply(&EXPERIMENTS), q.apply(&EXPERIMENTS));
    assert_eq!(q.apply(&EXPERIMENTS).len(), 3);
}
