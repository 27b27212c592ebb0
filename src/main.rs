//! Headless runner: plays one seeded run with the autopilot and prints a summary.
//!
//! Usage:
//!   cargo run --release -- [--seed <n>] [--seconds <s>] [--data-dir <dir>] [--orbit-assist] [--quality low|med|high] [--report <file.json>]

use std::{env, fs, path::PathBuf};

use anyhow::{anyhow, Context, Result};
use tracing::info;

use conscious_particle::autopilot::Autopilot;
use conscious_particle::config;
use conscious_particle::game::{GameController, GameState};
use conscious_particle::reporting::RunRecorder;
use conscious_particle::settings::{Quality, Settings};
use conscious_particle::storage::JsonFileStorage;

#[derive(Debug)]
struct Cli {
    seed: u64,
    seconds: f32,
    data_dir: PathBuf,
    orbit_assist: bool,
    quality: Option<Quality>,
    report: Option<PathBuf>,
}

impl Cli {
    fn parse() -> Result<Self> {
        let mut args = env::args().skip(1);

        let mut seed = 42u64;
        let mut seconds = 120.0f32;
        let mut data_dir = PathBuf::from(".");
        let mut orbit_assist = false;
        let mut quality: Option<Quality> = None;
        let mut report: Option<PathBuf> = None;

        while let Some(arg) = args.next() {
            match arg.as_str() {
                "--seed" => {
                    let value = args
                        .next()
                        .ok_or_else(|| anyhow!("--seed requires a number"))?;
                    seed = value
                        .parse::<u64>()
                        .with_context(|| format!("invalid --seed value: {value}"))?;
                }
                "--seconds" => {
                    let value = args
                        .next()
                        .ok_or_else(|| anyhow!("--seconds requires a number"))?;
                    seconds = value
                        .parse::<f32>()
                        .with_context(|| format!("invalid --seconds value: {value}"))?;
                    if !(seconds.is_finite() && seconds > 0.0) {
                        return Err(anyhow!("--seconds must be positive, got {value}"));
                    }
                }
                "--data-dir" => {
                    let value = args
                        .next()
                        .ok_or_else(|| anyhow!("--data-dir requires a directory"))?;
                    data_dir = PathBuf::from(value);
                }
                "--orbit-assist" => {
                    orbit_assist = true;
                }
                "--quality" => {
                    let value = args
                        .next()
                        .ok_or_else(|| anyhow!("--quality requires low, med or high"))?;
                    quality = Some(
                        Quality::parse_cli(&value)
                            .ok_or_else(|| anyhow!("invalid --quality value: {value}"))?,
                    );
                }
                "--report" => {
                    let value = args
                        .next()
                        .ok_or_else(|| anyhow!("--report requires a file path"))?;
                    report = Some(PathBuf::from(value));
                }
                "-h" | "--help" => {
                    println!(
                        "Usage: conscious_particle [--seed <n>] [--seconds <s>] [--data-dir <dir>] [--orbit-assist] [--quality low|med|high] [--report <file.json>]"
                    );
                    std::process::exit(0);
                }
                other => return Err(anyhow!("unknown argument: {other}. Use --help for usage.")),
            }
        }

        Ok(Self {
            seed,
            seconds,
            data_dir,
            orbit_assist,
            quality,
            report,
        })
    }
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::filter::EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse()?;
    let storage = JsonFileStorage::new(&cli.data_dir);
    let mut game = GameController::new(Box::new(storage), cli.seed);
    let settings = Settings {
        orbit_assist: cli.orbit_assist || game.settings.orbit_assist,
        quality: cli.quality.unwrap_or(game.settings.quality),
        ..game.settings
    };
    if settings != game.settings {
        game.update_settings(settings);
    }

    let mut pilot = Autopilot::new();
    let mut recorder = RunRecorder::new();
    let max_ticks = (cli.seconds / config::FIXED_DT).ceil() as u64;

    game.start();
    info!(seed = cli.seed, max_ticks, "headless run");

    let mut steps = 0u64;
    while steps < max_ticks {
        match game.state {
            GameState::UpgradeSelection => {
                let Some(offer) = game.offers.first() else {
                    break;
                };
                let id = offer.upgrade.id;
                let form = offer.forms.first().copied();
                game.select_upgrade(0, form);
                recorder.record_upgrade(id);
            }
            GameState::Playing => {
                let input = pilot.decide(&game);
                game.tick(config::FIXED_DT, &input);
                recorder.sample(&game);
                steps += 1;
            }
            _ => break,
        }
    }

    let report = recorder.finish(cli.seed, &game);
    println!("=== RUN SUMMARY ===");
    println!("  Seed:       {}", report.seed);
    println!("  Survived:   {}", report.survived);
    println!("  Time:       {:.1}s", report.time);
    println!("  Level:      {}", report.level);
    println!("  Form:       {}", report.form);
    println!("  Peak mass:  {:.2}", report.mass.max);
    println!("  Absorbed:   {}", report.kills);
    println!("  Upgrades:   {}", report.upgrades.join(", "));
    println!(
        "  Best:       {:.1}s / mass {:.2} / level {} / {} absorbed",
        report.best.time, report.best.max_mass, report.best.level, report.best.kills
    );

    if let Some(path) = &cli.report {
        let json = serde_json::to_string_pretty(&report).context("serializing run report")?;
        fs::write(path, json).with_context(|| format!("failed to write report: {}", path.display()))?;
        info!(path = %path.display(), "wrote run report");
    }

    Ok(())
}
