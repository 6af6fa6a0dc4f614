use clap::{Parser, Subcommand, ValueEnum};
use encoding_rs::Encoding;
use engine::progression;
use engine::{AbilityScores, ActionSlot, Character, CombatEngine, Dice, Phase, RollMode};
use std::{fs, path::PathBuf, time::Duration};

#[derive(Copy, Clone, ValueEnum)]
enum Adv {
    Normal,
    Advantage,
    Disadvantage,
}

#[derive(Subcommand)]
enum Cmd {
    /// Roll a d20 multiple times with optional advantage/disadvantage
    Roll {
        /// RNG seed for determinism
        #[arg(long, default_value_t = 42)]
        seed: u64,
        /// Advantage mode
        #[arg(long, value_enum, default_value_t = Adv::Normal)]
        adv: Adv,
        /// Number of rolls
        #[arg(long, default_value_t = 5)]
        rolls: u32,
    },
    /// Generate an enemy roster for a character level (JSON to stdout)
    Roster {
        /// RNG seed for determinism
        #[arg(long, default_value_t = 42)]
        seed: u64,
        /// Character level driving roster size and enemy levels
        #[arg(long, default_value_t = 3)]
        level: i32,
        /// Pretty-print JSON
        #[arg(long, default_value_t = true)]
        pretty: bool,
    },
    /// Serialize the sample character to JSON (stdout)
    CharacterDump {
        /// Pretty-print JSON
        #[arg(long, default_value_t = true)]
        pretty: bool,
    },
    /// Run one automated battle and print the log, report, and XP update
    Battle {
        /// RNG seed for determinism
        #[arg(long, default_value_t = 42)]
        seed: u64,
        /// Character level if no file is given
        #[arg(long, default_value_t = 3)]
        level: i32,
        /// Path to a character JSON file (BOM tolerated)
        #[arg(long)]
        file: Option<PathBuf>,
        /// Presentation pause between resolution steps, in milliseconds
        #[arg(long, default_value_t = 0)]
        delay_ms: u64,
        /// Safety cap on rounds
        #[arg(long, default_value_t = 50)]
        max_rounds: u32,
    },
}

#[derive(Parser)]
#[command(name = "dungeonroller")]
#[command(about = "Dungeonroller combat harness")]
struct Cli {
    #[command(subcommand)]
    cmd: Cmd,
}

fn to_mode(a: Adv) -> RollMode {
    match a {
        Adv::Normal => RollMode::Normal,
        Adv::Advantage => RollMode::Advantage,
        Adv::Disadvantage => RollMode::Disadvantage,
    }
}

fn sample_character(level: i32) -> Character {
    // Fighter-ish adventurer: +2 STR mod, +1 DEX mod, 12 HP
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

fn read_text_auto(path: &std::path::Path) -> anyhow::Result<String> {
    let bytes = fs::read(path)?;
    if let Some((enc, bom_len)) = Encoding::for_bom(&bytes) {
        let (cow, _, _) = enc.decode(&bytes[bom_len..]);
        Ok(cow.into_owned())
    } else {
        Ok(String::from_utf8(bytes)?)
    }
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    match cli.cmd {
        Cmd::Roll { seed, adv, rolls } => {
            let mode = to_mode(adv);
            let mut dice = Dice::from_seed(seed);
            for _ in 0..rolls {
                println!("{}", dice.d20(mode));
            }
        }
        Cmd::Roster {
            seed,
            level,
            pretty,
        } => {
            let templates = engine::content::builtin_enemy_templates()?;
            let mut dice = Dice::from_seed(seed);
            let roster = engine::generate_roster(&templates, level, &mut dice)?;
            if pretty {
                println!("{}", serde_json::to_string_pretty(&roster)?);
            } else {
                println!("{}", serde_json::to_string(&roster)?);
            }
        }
        Cmd::CharacterDump { pretty } => {
            let character = sample_character(1);
            if pretty {
                println!("{}", serde_json::to_string_pretty(&character)?);
            } else {
                println!("{}", serde_json::to_string(&character)?);
            }
        }
        Cmd::Battle {
            seed,
            level,
            file,
            delay_ms,
            max_rounds,
        } => {
            let character: Character = if let Some(path) = file {
                serde_json::from_str(&read_text_auto(&path)?)?
            } else {
                sample_character(level)
            };
            run_battle(character, seed, delay_ms, max_rounds)?;
        }
    }
    Ok(())
}

/// Automated battle policy: attack the first living enemy with the action,
/// then end the turn. Pacing between steps lives here, not in the engine.
fn run_battle(character: Character, seed: u64, delay_ms: u64, max_rounds: u32) -> anyhow::Result<()> {
    let templates = engine::content::builtin_enemy_templates()?;
    let mut dice = Dice::from_seed(seed);
    let roster = engine::generate_roster(&templates, character.level, &mut dice)?;

    println!(
        "{} (AC {}, HP {}) vs:",
        character.name,
        character.armor_class(),
        character.hit_points
    );
    for enemy in &roster {
        println!(
            "  {} (L{}, AC {}, HP {}, {})",
            enemy.name, enemy.level, enemy.armor_class, enemy.max_hit_points, enemy.damage_dice
        );
    }

    let pause = || {
        if delay_ms > 0 {
            std::thread::sleep(Duration::from_millis(delay_ms));
        }
    };

    let mut battle = CombatEngine::new(character.clone(), roster, dice)?;
    loop {
        match battle.phase() {
            Phase::Ended(_) => break,
            Phase::PlayerTurn => {
                if battle.round() > max_rounds {
                    println!("(battle capped at {max_rounds} rounds)");
                    break;
                }
                if let Some(target) = battle.enemies().iter().position(|e| e.is_alive()) {
                    pause();
                    battle.attack(target, ActionSlot::Action);
                }
                if matches!(battle.phase(), Phase::Ended(_)) {
                    break;
                }
                battle.end_turn();
            }
            Phase::EnemyTurn => {
                pause();
                battle.step_enemy();
            }
        }
    }

    for entry in battle.log().entries() {
        println!("[R{}][{:?}] {}", entry.round, entry.kind, entry.message);
    }

    let Some(report) = battle.report() else {
        println!("outcome: unresolved (round cap reached)");
        return Ok(());
    };
    println!();
    println!("outcome:        {:?}", report.outcome);
    println!("rounds:         {}", report.rounds);
    println!("damage dealt:   {}", report.total_damage_dealt);
    println!("damage taken:   {}", report.total_damage_taken);
    println!("remaining HP:   {}", report.player_hp);

    let mut character = character;
    let mut level_dice = Dice::from_seed(seed.wrapping_add(1));
    let update = progression::apply_battle(&mut character, &report, &mut level_dice);
    println!(
        "xp gained:      {} ({} level(s), +{} HP)",
        update.xp_gained, update.levels_gained, update.hp_gained
    );
    println!("{}", serde_json::to_string_pretty(&character)?);
    Ok(())
}
