//! End-to-end tests: scenario text in, rendered report out.

use duel_engine::prelude::*;

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Build scenario text from wizards, `(name, team, power, visible)` players
/// and command lines.
fn scenario_text(wizards: &[&str], players: &[(&str, u32, u32, bool)], commands: &[&str]) -> String {
    let mut text = format!("{}\n", wizards.len());
    for wizard in wizards {
        text.push_str(wizard);
        text.push('\n');
    }
    text.push_str(&format!("{}\n", players.len()));
    for (name, team, power, visible) in players {
        let visibility = if *visible { "True" } else { "False" };
        text.push_str(&format!("{name}\n{team}\n{power}\n{visibility}\n"));
    }
    for command in commands {
        text.push_str(command);
        text.push('\n');
    }
    text
}

fn output(text: &str) -> String {
    render_outcome(&run_match(text, &RunConfig::default()))
}

// ---------------------------------------------------------------------------
// Scoring scenarios
// ---------------------------------------------------------------------------

#[test]
fn equal_attack_leaves_a_tie() {
    let text = scenario_text(
        &["Gandalf", "Saruman"],
        &[("Frodo", 0, 500, true), ("Grima", 1, 500, true)],
        &["attack Frodo Grima"],
    );
    assert_eq!(output(&text), "It's a tie\n");
}

#[test]
fn odd_heal_creates_a_point() {
    let text = scenario_text(
        &["Gandalf", "Saruman"],
        &[
            ("Frodo", 0, 7, true),
            ("Sam", 0, 0, true),
            ("Grima", 1, 7, true),
        ],
        &["heal Frodo Sam"],
    );
    let report = run_match(&text, &RunConfig::default()).unwrap();

    assert_eq!(report.standings[0].score, 8);
    assert_eq!(report.render(), "The chosen wizard is Gandalf\n");
}

#[test]
fn mixed_match_reports_every_rejection_in_order() {
    let text = scenario_text(
        &["Lannister", "Stark"],
        &[
            ("Jaime", 0, 400, true),
            ("Tyrion", 0, 301, true),
            ("Arya", 1, 900, true),
            ("Bran", 1, 200, false),
        ],
        &[
            "heal Tyrion Jaime",
            "attack Bran Arya",
            "flip_visibility Bran",
            "attack Arya Jaime",
            "super Arya Bran",
            "attack Jaime S_0",
            "heal S_0 Tyrion",
            "heal Tyrion Tyrion",
            "super Tyrion Tyrion",
        ],
    );
    let report = run_match(&text, &RunConfig::default()).unwrap();

    assert_eq!(
        report.render(),
        "This player can't play\n\
         This player can't play\n\
         This player is frozen\n\
         Both players should be from the same team\n\
         The player cannot heal itself\n\
         The player cannot do super action with itself\n\
         The chosen wizard is Stark\n"
    );
    assert_eq!(report.commands_processed, 9);
    assert_eq!(report.standings[0].score, 151);
    assert_eq!(report.standings[1].score, 1000);
    assert_eq!(
        report
            .diagnostics
            .iter()
            .map(|d| d.command_index)
            .collect::<Vec<_>>(),
        vec![1, 2, 5, 6, 7, 8]
    );
}

#[test]
fn clamp_applies_to_both_players_of_a_command() {
    let text = scenario_text(
        &["Merlin"],
        &[("Arthur", 0, 800, true), ("Kay", 0, 900, true)],
        &["heal Arthur Kay", "super Kay Arthur"],
    );
    let (mut runner, commands) = MatchRunner::from_text(&text, &RunConfig::default()).unwrap();
    runner.run(&commands).unwrap();

    // heal: Arthur 400, Kay 1300 -> 1000 (score 1700 - 300).
    // super: S_0 = 1400 -> 1000 (score 1400 - 400).
    let s = runner.scenario();
    let leader = s.find_player("S_0").unwrap();
    assert_eq!(s[leader].power(), 1000);
    assert_eq!(s[TeamId(0)].score(), 1000);
    assert_eq!(runner.ledger().entries_by_cause(ScoreCause::Clamp).count(), 2);
}

// ---------------------------------------------------------------------------
// Fatal errors
// ---------------------------------------------------------------------------

#[test]
fn unknown_player_discards_earlier_output() {
    let text = scenario_text(
        &["Gandalf", "Saruman"],
        &[("Frodo", 0, 0, true), ("Grima", 1, 5, true)],
        &["attack Frodo Grima", "heal Gollum Frodo", "attack Grima Frodo"],
    );
    assert_eq!(output(&text), "Invalid inputs\n");
}

#[test]
fn absorbed_and_renamed_players_are_gone() {
    let players = [("Frodo", 0, 10, true), ("Sam", 0, 20, true)];
    let absorbed = scenario_text(&["Gandalf"], &players, &["super Frodo Sam", "heal Sam S_0"]);
    let renamed = scenario_text(&["Gandalf"], &players, &["super Frodo Sam", "heal Frodo S_0"]);
    let fine = scenario_text(&["Gandalf"], &players, &["super Frodo Sam", "flip_visibility S_0"]);

    assert_eq!(output(&absorbed), "Invalid inputs\n");
    assert_eq!(output(&renamed), "Invalid inputs\n");
    assert_eq!(output(&fine), "The chosen wizard is Gandalf\n");
}

#[test]
fn wizard_names_are_not_players() {
    let text = scenario_text(
        &["Gandalf"],
        &[("Frodo", 0, 10, true)],
        &["flip_visibility Gandalf"],
    );
    assert_eq!(output(&text), "Invalid inputs\n");
}

#[test]
fn malformed_setup_and_commands_are_invalid() {
    let good_players = [("Frodo", 0, 10, true), ("Sam", 0, 20, true)];
    let cases = [
        scenario_text(&["gandalf"], &good_players, &[]),
        scenario_text(&["Gandalf"], &[("Frodo", 1, 10, true)], &[]),
        scenario_text(&["Gandalf"], &[("Frodo", 0, 1001, true)], &[]),
        scenario_text(&["Gandalf"], &good_players, &["heal Frodo"]),
        scenario_text(&["Gandalf"], &good_players, &["flip_visibility Frodo Sam"]),
        scenario_text(&["Gandalf"], &good_players, &["dance Frodo Sam"]),
        scenario_text(&["Gandalf"], &good_players, &["heal Frodo  Sam"]),
        scenario_text(&["Gandalf"], &good_players, &["heal Frodo Sam", ""]),
        "1\nGandalf\n1\nFrodo\n0\n10\n".to_owned(),
    ];
    for text in &cases {
        assert_eq!(output(text), "Invalid inputs\n", "input:\n{text}");
    }
}

#[test]
fn command_limit_comes_from_config() {
    let lines = vec!["flip_visibility Frodo"; 4];
    let text = scenario_text(&["Gandalf"], &[("Frodo", 0, 10, true)], &lines);

    let loose = RunConfig::default();
    let tight = RunConfig {
        max_commands: 3,
        ..RunConfig::default()
    };
    assert!(run_match(&text, &loose).is_ok());
    assert!(matches!(
        run_match(&text, &tight),
        Err(RunError::Input(InputError::TooManyCommands { limit: 3 }))
    ));
}

// ---------------------------------------------------------------------------
// Report and snapshot serialization
// ---------------------------------------------------------------------------

#[test]
fn report_serializes_to_json() {
    let text = scenario_text(
        &["Gandalf", "Saruman"],
        &[("Frodo", 0, 10, true), ("Grima", 1, 5, false)],
        &["attack Grima Frodo"],
    );
    let report = run_match(&text, &RunConfig::default()).unwrap();
    let json = serde_json::to_value(&report).unwrap();

    assert_eq!(json["commands_processed"], 1);
    assert_eq!(json["standings"][0]["wizard"], "Gandalf");
    assert_eq!(json["diagnostics"][0]["rejection"], "CannotPlay");
    let back: MatchReport = serde_json::from_value(json).unwrap();
    assert_eq!(back, report);
}

#[test]
fn same_input_gives_the_same_hash() {
    let text = scenario_text(
        &["Gandalf", "Saruman"],
        &[
            ("Frodo", 0, 333, true),
            ("Sam", 0, 77, true),
            ("Grima", 1, 410, true),
        ],
        &["heal Frodo Sam", "attack Sam Grima", "super Frodo Sam"],
    );
    let hash = |text: &str| {
        let (mut runner, commands) = MatchRunner::from_text(text, &RunConfig::default()).unwrap();
        runner.run(&commands).unwrap();
        runner.capture_snapshot().unwrap().hash
    };
    assert_eq!(hash(&text), hash(&text));
}

#[test]
fn tampered_snapshot_cannot_be_resumed() {
    let text = scenario_text(&["Gandalf"], &[("Frodo", 0, 10, true)], &[]);
    let (runner, _) = MatchRunner::from_text(&text, &RunConfig::default()).unwrap();
    let json = runner.capture_snapshot().unwrap().to_json().unwrap();
    let tampered = json.replace("\"commands_processed\": 0", "\"commands_processed\": 7");

    assert_ne!(json, tampered);
    assert!(matches!(
        MatchSnapshot::from_json(&tampered),
        Err(RunError::SnapshotHash { .. })
    ));
}
