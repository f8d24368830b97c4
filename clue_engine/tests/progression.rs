use std::cell::RefCell;
use std::collections::BTreeSet;
use std::rc::Rc;

use clue_engine::{
    validate, FeedbackConfig, Investigation, StoryEvent, UnlockEngine, UnlockSource,
};
use proptest::prelude::*;
use story_model::{ClueDefinition, ClueId, ClusterDefinition, DeductionSolution, StoryDefinition};

const CASE_JSON: &str = r#"{
    "caseId": "case-01",
    "caseTitle": "The Tear",
    "introText": "The curator is dead. The gallery is sealed.",
    "victim": "Curator Hale",
    "culprits": ["Ellis", "Mara", "Quinn"],
    "methods": ["Knife", "Poison"],
    "motives": ["Greed", "Revenge"],
    "solution": { "culprit": "Mara", "method": "Poison", "motive": "Revenge" },
    "essentials": ["C4"],
    "objects": [
        { "id": "desk", "label": "Desk", "startsVisible": true, "localPosition": [0.0, 0.0, 1.0] },
        { "id": "vial", "label": "Vial" },
        { "id": "frame", "label": "Frame", "startsVisible": true }
    ],
    "clusters": [
        {
            "id": "K1",
            "title": "The Study",
            "description": "Something happened at the desk.",
            "clueIds": ["C1", "C2", "C3"]
        }
    ],
    "clues": [
        { "id": "C1", "title": "Torn Letter", "objectId": "desk", "revealsObjectIds": ["vial"], "clusterId": "K1" },
        { "id": "C2", "title": "Vial", "objectId": "vial", "prerequisites": ["C1"], "clusterId": "K1" },
        { "id": "C3", "title": "Residue", "description": "Bitter almonds.", "prerequisites": ["C2"], "clusterId": "K1" },
        { "id": "C4", "title": "Torn Canvas", "objectId": "frame" }
    ]
}"#;

fn record(engine: &mut UnlockEngine) -> Rc<RefCell<Vec<StoryEvent>>> {
    let log = Rc::new(RefCell::new(Vec::new()));
    let sink = Rc::clone(&log);
    engine.subscribe(move |event| sink.borrow_mut().push(event.clone()));
    log
}

fn count(log: &Rc<RefCell<Vec<StoryEvent>>>, event_type: &str) -> usize {
    log.borrow()
        .iter()
        .filter(|event| event.event_type() == event_type)
        .count()
}

fn case() -> StoryDefinition {
    StoryDefinition::from_json_str(CASE_JSON).unwrap()
}

#[test]
fn test_case_file_validates() {
    let report = validate(&case());
    assert!(report.is_empty(), "{}", report);
}

#[test]
fn test_two_clue_scenario() {
    let story = StoryDefinition::from_json_str(
        r#"{"clues": [{"id": "C1", "prerequisites": []}, {"id": "C2", "prerequisites": ["C1"]}]}"#,
    )
    .unwrap();
    let mut engine = UnlockEngine::new(story);

    assert!(!engine.is_eligible("C2"));
    assert!(engine.try_unlock("C1", UnlockSource::Tap));
    assert!(engine.is_eligible("C2"));
    assert!(engine.try_unlock("C2", UnlockSource::Tap));
}

#[test]
fn test_idempotent_unlock() {
    let mut engine = UnlockEngine::new(case());
    let log = record(&mut engine);

    assert!(engine.try_unlock("C1", UnlockSource::Tap));
    assert!(!engine.try_unlock("C1", UnlockSource::Tap));
    assert_eq!(count(&log, "clue.unlocked"), 1);
}

#[test]
fn test_cycle_rejection() {
    let cyclic = StoryDefinition::new()
        .with_clue(ClueDefinition::new("A").requires("B"))
        .with_clue(ClueDefinition::new("B").requires("A"));
    let report = validate(&cyclic);
    assert!(report.issues().iter().any(|issue| issue.contains("cycle")));

    let mut acyclic = cyclic.clone();
    acyclic.clues[1].prerequisites.clear();
    let report = validate(&acyclic);
    assert!(!report.issues().iter().any(|issue| issue.contains("cycle")));
}

#[test]
fn test_cycle_free_story_has_zero_issues() {
    let story = case();
    let mut cyclic = story.clone();
    cyclic.clues[0].prerequisites.insert(ClueId::from("C3"));

    assert!(validate(&story).is_empty());
    let report = validate(&cyclic);
    assert!(report
        .issues()
        .iter()
        .any(|issue| issue.starts_with("Clue graph contains a cycle")));
}

#[test]
fn test_cluster_one_shot() {
    let mut engine = UnlockEngine::new(case());
    let log = record(&mut engine);

    for id in ["C1", "C2", "C3"] {
        assert!(engine.try_unlock(id, UnlockSource::Tap));
    }
    assert_eq!(count(&log, "cluster.completed"), 1);

    assert!(engine.try_unlock("C4", UnlockSource::Tap));
    assert_eq!(count(&log, "cluster.completed"), 1);
}

#[test]
fn test_essentials_path_flips_once() {
    let mut engine = UnlockEngine::new(case());
    let log = record(&mut engine);

    assert!(engine.try_unlock("C4", UnlockSource::Tap));
    assert!(!engine.is_deduction_available());
    for id in ["C1", "C2", "C3"] {
        engine.try_unlock(id, UnlockSource::Tap);
    }

    assert!(engine.is_deduction_available());
    assert_eq!(count(&log, "deduction.availability_changed"), 1);
}

#[test]
fn test_full_playthrough() {
    let mut game = Investigation::from_json_str(CASE_JSON, FeedbackConfig::default()).unwrap();
    assert_eq!(
        game.start_investigation().as_deref(),
        Some("The curator is dead. The gallery is sealed.")
    );

    assert!(!game.tap_object("vial"));
    assert!(game.tap_object("desk"));
    assert!(game.tap_object("vial"));
    assert!(game.advance_from_journal().is_none());
    assert!(game.tap_object("frame"));
    assert!(game.engine().is_deduction_available());

    let journal = game.journal().render();
    assert!(journal.starts_with("# The Tear"));
    assert!(journal.contains("The Study [K1] 3/3"));
    assert!(journal.contains("[x] C3 Residue - Bitter almonds."));

    assert!(game.open_deduction());
    game.cycle_culprit();
    game.cycle_method();
    assert!(!game.submit_deduction().success);
    game.cycle_motive();
    assert!(game.submit_deduction().success);

    let toasts = game.take_toasts();
    assert_eq!(toasts.first().map(String::as_str), Some("Clue unlocked: Torn Letter"));
    assert!(toasts.iter().any(|toast| toast == "Cluster complete: The Study"));
    assert_eq!(toasts.last().map(String::as_str), Some("Correct! Case solved."));
}

#[test]
fn test_deduction_correctness() {
    let story = StoryDefinition::new()
        .with_suspects(["Ellis", "Mara"], ["Knife", "Poison"], ["Greed", "Revenge"])
        .with_solution(DeductionSolution::new("Mara", "Poison", "Revenge"));
    let mut game_board = clue_engine::DeductionEvaluator::new(&story);

    game_board.cycle_culprit();
    game_board.cycle_method();
    game_board.cycle_motive();
    assert!(game_board.submit().success);

    for mismatch in 0..3 {
        game_board.show();
        game_board.cycle_culprit();
        game_board.cycle_method();
        game_board.cycle_motive();
        match mismatch {
            0 => game_board.cycle_culprit(),
            1 => game_board.cycle_method(),
            _ => game_board.cycle_motive(),
        };
        assert!(!game_board.submit().success);
    }
}

#[test]
fn test_invalid_case_reports_every_issue() {
    let story = case()
        .with_clue(ClueDefinition::new("C5").requires("C9"))
        .with_cluster(ClusterDefinition::new("K2"));
    let report = Investigation::begin(story, FeedbackConfig::default()).unwrap_err();

    assert_eq!(report.len(), 2);
    assert!(report.render().starts_with("ERRORS:\n- "));
}

/// Random acyclic story: clue `i` may only require clues with a lower index.
fn build_story(size: usize, edges: &[(usize, usize)]) -> StoryDefinition {
    let mut clues: Vec<ClueDefinition> = (0..size)
        .map(|index| ClueDefinition::new(format!("C{}", index)))
        .collect();
    for &(a, b) in edges {
        let (low, high) = (a.min(b), a.max(b));
        if low != high {
            clues[high].prerequisites.insert(ClueId::from(format!("C{}", low)));
        }
    }

    let cluster = ClusterDefinition::new("K1")
        .with_clues((0..size.min(3)).map(|index| format!("C{}", index)));

    clues
        .into_iter()
        .fold(StoryDefinition::new(), StoryDefinition::with_clue)
        .with_cluster(cluster)
}

fn story_strategy() -> impl Strategy<Value = (usize, StoryDefinition)> {
    (2_usize..10).prop_flat_map(|size| {
        prop::collection::vec((0..size, 0..size), 0..size * 2)
            .prop_map(move |edges| (size, build_story(size, &edges)))
    })
}

fn apply(engine: &mut UnlockEngine, kind: u8, target: usize) {
    let id = format!("C{}", target);
    match kind {
        0 => {
            engine.try_unlock(&id, UnlockSource::Tap);
        }
        1 => {
            engine.try_unlock(&id, UnlockSource::Journal);
        }
        2 => {
            engine.unlock_first_eligible();
        }
        _ => {
            engine.force_unlock(&id);
        }
    }
}

fn check_eligibility(engine: &UnlockEngine) -> Result<(), TestCaseError> {
    let mut expected = BTreeSet::new();
    for clue in engine.clues() {
        let prereqs_met = clue
            .prerequisites
            .iter()
            .all(|prereq| engine.is_unlocked(prereq.as_str()));
        let eligible = prereqs_met && !engine.is_unlocked(clue.id.as_str());
        prop_assert_eq!(engine.is_eligible(clue.id.as_str()), eligible);
        if eligible {
            expected.insert(clue.id.clone());
        }
    }
    prop_assert_eq!(engine.eligible_clues(), &expected);
    Ok(())
}

proptest! {
    #[test]
    fn test_unlocked_set_only_grows(
        (size, story) in story_strategy(),
        ops in prop::collection::vec((0_u8..4, 0_usize..12), 0..30),
    ) {
        let mut engine = UnlockEngine::new(story);
        let log = record(&mut engine);
        let mut previous: BTreeSet<ClueId> = BTreeSet::new();

        for (kind, target) in ops {
            apply(&mut engine, kind, target);
            let current = engine.unlocked_clues().clone();
            prop_assert!(previous.is_subset(&current));
            prop_assert!(current.len() <= size);
            previous = current;
        }

        prop_assert!(count(&log, "cluster.completed") <= 1);
        prop_assert_eq!(count(&log, "clue.unlocked"), engine.unlocked_count());
        prop_assert_eq!(engine.unlock_history().len(), engine.unlocked_count());
    }

    #[test]
    fn test_eligibility_matches_prerequisites(
        (_size, story) in story_strategy(),
        ops in prop::collection::vec((0_u8..4, 0_usize..12), 0..30),
    ) {
        let mut engine = UnlockEngine::new(story);
        check_eligibility(&engine)?;

        for (kind, target) in ops {
            apply(&mut engine, kind, target);
            check_eligibility(&engine)?;
        }
    }

    #[test]
    fn test_journal_advance_unlocks_everything((size, story) in story_strategy()) {
        let mut engine = UnlockEngine::new(story);
        while engine.unlock_first_eligible() {}

        prop_assert_eq!(engine.unlocked_count(), size);
        prop_assert!(engine.is_cluster_completed("K1"));
        prop_assert!(engine.is_deduction_available());
    }
}
