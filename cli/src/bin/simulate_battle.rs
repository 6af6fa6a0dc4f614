use clap::Parser;
use engine::{
    AbilityScores, ActionSlot, Character, CombatEngine, Dice, Outcome, Phase,
};

#[derive(Parser)]
#[command(name = "simulate-battle")]
#[command(about = "Monte Carlo sim: many auto-played battles vs generated rosters")]
struct Args {
    /// Number of trials
    #[arg(long, default_value_t = 1000)]
    trials: u32,

    /// Character level (drives roster size and enemy levels)
    #[arg(long, default_value_t = 3)]
    level: i32,

    /// Safety cap on rounds per trial
    #[arg(long, default_value_t = 50)]
    max_rounds: u32,

    /// RNG base seed (trial i uses seed+i)
    #[arg(long, default_value_t = 12345)]
    seed: u64,
}

fn sample_character(level: i32) -> Character {
    // same as main.rs sample
    let abilities = AbilityScores {
        strength: 14,
        dexterity: 12,
        constitution: 14,
        intelligence: 10,
        wisdom: 12,
        charisma: 8,
    };
    let mut character = Character::new("Theron", "human", "fighter", abilities);
    character.level = level.max(1);
    character
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    let templates = engine::content::builtin_enemy_templates()?;

    let mut victories = 0u32;
    let mut defeats = 0u32;
    let mut capped = 0u32;
    let mut rounds_total = 0u64;
    let mut dealt_total = 0i64;
    let mut taken_total = 0i64;

    for i in 0..args.trials {
        let trial_seed = args.seed.wrapping_add(u64::from(i));
        let mut dice = Dice::from_seed(trial_seed);
        let roster = engine::generate_roster(&templates, args.level, &mut dice)?;
        let mut battle = CombatEngine::new(sample_character(args.level), roster, dice)?;

        loop {
            match battle.phase() {
                Phase::Ended(_) => break,
                Phase::PlayerTurn => {
                    if battle.round() > args.max_rounds {
                        break;
                    }
                    if let Some(target) = battle.enemies().iter().position(|e| e.is_alive()) {
                        battle.attack(target, ActionSlot::Action);
                    }
                    if matches!(battle.phase(), Phase::Ended(_)) {
                        break;
                    }
                    battle.end_turn();
                }
                Phase::EnemyTurn => {
                    battle.resolve_enemy_turns();
                }
            }
        }

        match battle.report() {
            Some(report) => {
                match report.outcome {
                    Outcome::Victory => victories += 1,
                    Outcome::Defeat => defeats += 1,
                    Outcome::Fled => {}
                }
                rounds_total += u64::from(report.rounds);
                dealt_total += i64::from(report.total_damage_dealt);
                taken_total += i64::from(report.total_damage_taken);
            }
            None => capped += 1,
        }
    }

    let finished = (args.trials - capped).max(1);
    println!("simulate-battle results");
    println!("-----------------------");
    println!("trials:             {}", args.trials);
    println!("character level:    {}", args.level);
    println!(
        "victory rate:       {:.1}%",
        victories as f64 / args.trials as f64 * 100.0
    );
    println!(
        "defeat rate:        {:.1}%",
        defeats as f64 / args.trials as f64 * 100.0
    );
    println!("round-capped:       {}", capped);
    println!(
        "avg rounds:         {:.2}",
        rounds_total as f64 / f64::from(finished)
    );
    println!(
        "avg damage dealt:   {:.2}",
        dealt_total as f64 / f64::from(finished)
    );
    println!(
        "avg damage taken:   {:.2}",
        taken_total as f64 / f64::from(finished)
    );

    Ok(())
}
