mod simulation;

use clap::Parser;
use log::info;

use simulation::{Direction, Position, SimWorld};

#[derive(Parser)]
#[command(name = "city_sim")]
#[command(about = "City agent simulation, headless")]
struct Cli {
    /// Number of simulation ticks to run
    #[arg(long, default_value = "3000")]
    ticks: u64,

    /// Seed for a reproducible run
    #[arg(long)]
    seed: Option<u64>,

    /// Ticks between printed summaries
    #[arg(long, default_value = "300")]
    summary_every: u64,
}

fn main() -> anyhow::Result<()> {
    env_logger::init();
    let cli = Cli::parse();

    let mut world = match cli.seed {
        Some(seed) => SimWorld::create_city_world_with_seed(seed)?,
        None => SimWorld::create_city_world()?,
    };
    world.populate_pedestrians();

    info!(
        "starting run: {} ticks, {} pedestrians, seed {:?}",
        cli.ticks,
        world.pedestrians().len(),
        cli.seed
    );

    // A scripted player pacing the sidewalk along the first avenue, so the
    // blocking and lethal collision paths get exercised.
    let start = Position::new(500.0, 500.0);
    let mut player = start;
    let mut player_direction = Direction::Right;
    let mut deaths = 0u32;

    for tick in 1..=cli.ticks {
        let step = match player_direction {
            Direction::Right => Position::new(player.x + 1.0, player.y),
            _ => Position::new(player.x - 1.0, player.y),
        };

        // Turn around at the patrol ends; stand still when blocked.
        if step.x < 300.0 || step.x > 900.0 {
            player_direction = match player_direction {
                Direction::Right => Direction::Left,
                _ => Direction::Right,
            };
        } else if world.validate_player_move(step) {
            player = step;
        }

        let outcome = world.tick(player, player_direction);

        if outcome.player_collision {
            deaths += 1;
            info!("player struck by a vehicle at tick {}, respawning", tick);
            player = start;
        }

        if cli.summary_every > 0 && tick % cli.summary_every == 0 {
            world.print_summary();
        }
    }

    println!("=== SIMULATION COMPLETE ===");
    world.print_summary();
    info!(
        "Total vehicles spawned: {}",
        world.stats.vehicles_spawned
    );
    info!(
        "Total vehicles removed: {}",
        world.stats.vehicles_removed
    );
    info!("Total pedestrians hit: {}", world.stats.pedestrians_hit);
    info!("Player deaths: {}", deaths);

    Ok(())
}
