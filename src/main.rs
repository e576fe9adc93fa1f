use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

use tilegen::database::Database;
use tilegen::generator::run_pipeline;
use tilegen::Result;

#[derive(Parser, Debug)]
#[command(name = "tilegen")]
#[command(about = "Generate Wang tilesets of procedural biome transitions")]
struct Args {
    /// Biome database (JSON)
    config: PathBuf,

    /// Random seed (uses random seed if not specified)
    #[arg(short, long)]
    seed: Option<u64>,

    /// Output atlas image
    #[arg(long, default_value = "biomes.png")]
    image: PathBuf,

    /// Output Tiled tileset descriptor
    #[arg(long, default_value = "biomes.tsx")]
    tileset: PathBuf,

    /// Also emit a plain tileset for every biome
    #[arg(long)]
    plain: bool,
}

fn run(args: &Args) -> Result<()> {
    let db = Database::load(&args.config)?;

    let seed = args.seed.unwrap_or_else(rand::random);
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    log::info!("Generating tiles with seed: {}", seed);

    run_pipeline(&db, &mut rng, args.plain, &args.image, &args.tileset)
}

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .format_timestamp_millis()
        .init();

    let args = Args::parse();

    match run(&args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            log::error!("{}", e);
            ExitCode::FAILURE
        }
    }
}
