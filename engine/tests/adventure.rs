use engine::adventure::{
    roster_for_node, Choice, ChoiceKind, ChoiceTheme, EncounterType, GeneratedLayer, LayerError,
    NodeContent,
};
use engine::Dice;

fn node(scene: &str, encounter_type: EncounterType) -> NodeContent {
    NodeContent {
        scene_description: scene.to_string(),
        encounter_type,
        details: format!("{scene} details"),
    }
}

fn choice(label: &str, index: usize) -> Choice {
    Choice {
        label: label.to_string(),
        description: format!("{label} description"),
        kind: ChoiceKind::Balanced,
        theme: ChoiceTheme::Exploration,
        child_node_index: index,
    }
}

fn sample_layer() -> GeneratedLayer {
    GeneratedLayer {
        nodes: vec![
            node("A ruined shrine", EncounterType::Combat),
            node("A merchant caravan", EncounterType::Social),
            node("A collapsed tunnel", EncounterType::Exploration),
            node("A rune-locked door", EncounterType::Puzzle),
            node("A tripwire in the dark", EncounterType::Trap),
        ],
        choices: (0..5).map(|i| choice(&format!("choice {i}"), i)).collect(),
    }
}

#[test]
fn well_formed_layer_validates() {
    assert_eq!(sample_layer().validate(), Ok(()));
}

#[test]
fn node_count_is_enforced() {
    let mut layer = sample_layer();
    layer.nodes.pop();
    assert_eq!(layer.validate(), Err(LayerError::WrongNodeCount(4)));
}

#[test]
fn choice_count_is_enforced() {
    let mut layer = sample_layer();
    layer.choices.push(choice("extra", 0));
    assert_eq!(layer.validate(), Err(LayerError::WrongChoiceCount(6)));
}

#[test]
fn out_of_range_choice_is_named() {
    let mut layer = sample_layer();
    layer.choices[2].child_node_index = 9;
    assert_eq!(
        layer.validate(),
        Err(LayerError::ChoiceOutOfRange {
            label: "choice 2".to_string(),
            index: 9,
        })
    );
}

#[test]
fn two_choices_may_share_a_node_but_not_more_overlap() {
    let mut layer = sample_layer();
    // three distinct scenes across five nodes: still acceptable
    layer.nodes[1] = layer.nodes[0].clone();
    layer.nodes[3] = layer.nodes[2].clone();
    assert_eq!(layer.validate(), Ok(()));

    // collapsing to two distinct scenes crosses the line
    layer.nodes[4] = layer.nodes[0].clone();
    assert_eq!(layer.validate(), Err(LayerError::TooMuchOverlap(2)));
}

#[test]
fn combat_nodes_produce_a_roster() {
    let templates = engine::content::builtin_enemy_templates().unwrap();
    // level 3: two enemies, each drawing a template pick and a level variance
    let mut dice = Dice::from_scripted(vec![0, 1, 0, 1]);
    let roster = roster_for_node(
        &node("A ruined shrine", EncounterType::Combat),
        3,
        &templates,
        &mut dice,
    )
    .unwrap()
    .unwrap();
    assert_eq!(roster.len(), 2);
    assert!(roster.iter().all(|e| e.level == 3));
}

#[test]
fn non_combat_nodes_produce_none() {
    let templates = engine::content::builtin_enemy_templates().unwrap();
    let mut dice = Dice::from_scripted(vec![]);
    for encounter_type in [
        EncounterType::Social,
        EncounterType::Exploration,
        EncounterType::Puzzle,
        EncounterType::Trap,
        EncounterType::Resolution,
    ] {
        let roster =
            roster_for_node(&node("scene", encounter_type), 3, &templates, &mut dice).unwrap();
        assert!(roster.is_none());
    }
}

#[test]
fn layer_json_uses_type_for_choice_kind() {
    let json = r#"{
        "nodes": [
            {"scene_description": "a", "encounter_type": "combat", "details": "d"},
            {"scene_description": "b", "encounter_type": "social", "details": "d"},
            {"scene_description": "c", "encounter_type": "puzzle", "details": "d"},
            {"scene_description": "e", "encounter_type": "trap", "details": "d"},
            {"scene_description": "f", "encounter_type": "resolution", "details": "d"}
        ],
        "choices": [
            {"label": "l0", "description": "x", "type": "safe", "theme": "social", "child_node_index": 0},
            {"label": "l1", "description": "x", "type": "risky", "theme": "combat", "child_node_index": 1},
            {"label": "l2", "description": "x", "type": "balanced", "theme": "strategy", "child_node_index": 2},
            {"label": "l3", "description": "x", "type": "safe", "theme": "utility", "child_node_index": 3},
            {"label": "l4", "description": "x", "type": "risky", "theme": "exploration", "child_node_index": 4}
        ]
    }"#;
    let layer: GeneratedLayer = serde_json::from_str(json).unwrap();
    assert_eq!(layer.validate(), Ok(()));
    assert_eq!(layer.choices[1].kind, ChoiceKind::Risky);
    assert_eq!(layer.nodes[4].encounter_type, EncounterType::Resolution);

    let back = serde_json::to_string(&layer.choices[0]).unwrap();
    assert!(back.contains("\"type\":\"safe\""));
}
