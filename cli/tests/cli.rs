use assert_cmd::Command;
use predicates::prelude::*;

#[test]
fn roll_prints_one_face_per_line() {
    let output = Command::cargo_bin("cli")
        .unwrap()
        .args(["roll", "--seed", "7", "--rolls", "5"])
        .assert()
        .success()
        .get_output()
        .stdout
        .clone();
    let text = String::from_utf8(output).unwrap();
    let faces: Vec<i32> = text.lines().map(|l| l.parse().unwrap()).collect();
    assert_eq!(faces.len(), 5);
    assert!(faces.iter().all(|f| (1..=20).contains(f)));
}

#[test]
fn roll_is_deterministic_per_seed() {
    let run = |seed: &str| {
        let output = Command::cargo_bin("cli")
            .unwrap()
            .args(["roll", "--seed", seed, "--rolls", "10"])
            .assert()
            .success()
            .get_output()
            .stdout
            .clone();
        String::from_utf8(output).unwrap()
    };
    assert_eq!(run("42"), run("42"));
    assert_ne!(run("42"), run("43"));
}

#[test]
fn roster_emits_a_json_array_sized_by_level() {
    let output = Command::cargo_bin("cli")
        .unwrap()
        .args(["roster", "--seed", "1", "--level", "5"])
        .assert()
        .success()
        .get_output()
        .stdout
        .clone();
    let roster: serde_json::Value = serde_json::from_slice(&output).unwrap();
    let roster = roster.as_array().unwrap();
    assert_eq!(roster.len(), 3);
    for enemy in roster {
        assert!(enemy["name"].is_string());
        assert!(enemy["damage_dice"].is_string());
        assert!(enemy["armor_class"].is_i64());
    }
}

#[test]
fn character_dump_round_trips_through_json() {
    let output = Command::cargo_bin("cli")
        .unwrap()
        .arg("character-dump")
        .assert()
        .success()
        .get_output()
        .stdout
        .clone();
    let character: serde_json::Value = serde_json::from_slice(&output).unwrap();
    assert_eq!(character["name"], "Theron");
    assert_eq!(character["level"], 1);
    assert_eq!(character["abilities"]["strength"], 14);
}

#[test]
fn battle_runs_to_a_report() {
    Command::cargo_bin("cli")
        .unwrap()
        .args(["battle", "--seed", "42", "--level", "3"])
        .assert()
        .success()
        .stdout(predicate::str::contains("outcome:"))
        .stdout(predicate::str::contains("xp gained:"));
}

#[test]
fn battle_reads_a_character_file() {
    let dir = std::env::temp_dir().join("dungeonroller-cli-test");
    std::fs::create_dir_all(&dir).unwrap();
    let path = dir.join("character.json");
    std::fs::write(
        &path,
        r#"{
            "name": "Mira",
            "race": "elf",
            "class": "ranger",
            "level": 2,
            "abilities": {
                "strength": 12, "dexterity": 16, "constitution": 12,
                "intelligence": 10, "wisdom": 14, "charisma": 10
            },
            "hit_points": 11,
            "max_hit_points": 11
        }"#,
    )
    .unwrap();

    Command::cargo_bin("cli")
        .unwrap()
        .args(["battle", "--seed", "42"])
        .arg("--file")
        .arg(&path)
        .assert()
        .success()
        .stdout(predicate::str::contains("Mira"));
}

#[test]
fn unknown_subcommand_fails() {
    Command::cargo_bin("cli")
        .unwrap()
        .arg("frobnicate")
        .assert()
        .failure();
}
