use engine::{
    generate_roster, DamageFormula, Dice, Enemy, EnemyTemplate, FormulaError, RosterError,
};

#[test]
fn parses_dice_with_bonus() {
    let formula: DamageFormula = "2d6+3".parse().unwrap();
    assert_eq!(formula, DamageFormula::new(2, 6, 3));
}

#[test]
fn parses_dice_without_bonus() {
    let formula: DamageFormula = "1d8".parse().unwrap();
    assert_eq!(formula, DamageFormula::new(1, 8, 0));
}

#[test]
fn rejects_malformed_formulas() {
    assert!(matches!(
        "d6".parse::<DamageFormula>(),
        Err(FormulaError::Malformed(_))
    ));
    assert!(matches!(
        "2x6".parse::<DamageFormula>(),
        Err(FormulaError::Malformed(_))
    ));
    assert!(matches!(
        "two d6".parse::<DamageFormula>(),
        Err(FormulaError::Malformed(_))
    ));
}

#[test]
fn rejects_degenerate_formulas() {
    assert!(matches!(
        "0d6".parse::<DamageFormula>(),
        Err(FormulaError::Degenerate(_))
    ));
    assert!(matches!(
        "1d1".parse::<DamageFormula>(),
        Err(FormulaError::Degenerate(_))
    ));
}

#[test]
fn display_round_trips() {
    for text in ["1d6", "2d4+2", "3d8+1"] {
        let formula: DamageFormula = text.parse().unwrap();
        assert_eq!(formula.to_string(), text);
        assert_eq!(formula.to_string().parse::<DamageFormula>().unwrap(), formula);
    }
}

#[test]
fn formula_serializes_as_a_string() {
    let formula = DamageFormula::new(2, 6, 3);
    assert_eq!(serde_json::to_string(&formula).unwrap(), "\"2d6+3\"");
    let back: DamageFormula = serde_json::from_str("\"2d6+3\"").unwrap();
    assert_eq!(back, formula);
    assert!(serde_json::from_str::<DamageFormula>("\"0d6\"").is_err());
}

fn goblin_template() -> EnemyTemplate {
    EnemyTemplate {
        name: "Goblin Scout".to_string(),
        creature_type: "humanoid".to_string(),
        damage_dice: "1d6+1".parse().unwrap(),
    }
}

#[test]
fn stats_derive_from_level() {
    let goblin = Enemy::from_template(&goblin_template(), 3);
    assert_eq!(goblin.max_hit_points, 34);
    assert_eq!(goblin.armor_class, 13);
    assert_eq!(goblin.attack_bonus, 3);
    assert_eq!(goblin.damage_dice, "1d6+1".parse().unwrap());
}

#[test]
fn level_floors_at_one() {
    let goblin = Enemy::from_template(&goblin_template(), 0);
    assert_eq!(goblin.level, 1);
    assert_eq!(goblin.max_hit_points, 18);
    assert_eq!(goblin.armor_class, 11);
}

#[test]
fn roster_size_scales_with_level_and_caps_at_three() {
    let templates = vec![goblin_template()];
    for (level, expected) in [(1, 1usize), (3, 2), (5, 3), (10, 3)] {
        let mut dice = Dice::from_seed(7);
        let roster = generate_roster(&templates, level, &mut dice).unwrap();
        assert_eq!(roster.len(), expected, "level {level}");
    }
}

#[test]
fn roster_levels_stay_within_one_of_the_character() {
    let templates = vec![goblin_template()];
    for seed in 0..50 {
        let mut dice = Dice::from_seed(seed);
        let roster = generate_roster(&templates, 5, &mut dice).unwrap();
        for enemy in roster {
            assert!((4..=6).contains(&enemy.level));
        }
    }
}

#[test]
fn roster_at_level_one_never_drops_below_level_one() {
    let templates = vec![goblin_template()];
    for seed in 0..50 {
        let mut dice = Dice::from_seed(seed);
        let roster = generate_roster(&templates, 1, &mut dice).unwrap();
        for enemy in roster {
            assert!((1..=2).contains(&enemy.level));
        }
    }
}

#[test]
fn empty_template_list_is_an_error() {
    let mut dice = Dice::from_seed(1);
    let err = generate_roster(&[], 3, &mut dice).unwrap_err();
    assert_eq!(err, RosterError::NoTemplates);
}

#[test]
fn builtin_templates_load() {
    let templates = engine::content::builtin_enemy_templates().unwrap();
    assert_eq!(templates.len(), 5);
    let wolf = templates.iter().find(|t| t.name == "Wolf").unwrap();
    assert_eq!(wolf.damage_dice, DamageFormula::new(2, 4, 2));
}
