use clap::{Parser, Subcommand};
use rand::SeedableRng;
use rand::rngs::StdRng;
use ringkit::passivegram::{Mode, PassiveGram};
use ringkit::puzzle::{DEFAULT_RINGS, DEFAULT_SEGMENTS, Dimensions, Puzzle};
use ringkit::scene::{passivegram_scene, puzzle_scene};
use ringkit::svg;
use std::io::Write;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "ringkit", version, about = "Render ring puzzles as SVG", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Write the SVG here instead of stdout
    #[arg(short = 'o', long, global = true)]
    output: Option<PathBuf>,

    /// Seed for shuffles and draws
    #[arg(long, global = true)]
    seed: Option<u64>,
}

#[derive(Subcommand, Debug, Clone)]
enum Commands {
    /// Render the rotating ring puzzle.
    Puzzle {
        /// Number of rings (2-8)
        #[arg(short, long, default_value_t = DEFAULT_RINGS)]
        rings: usize,

        /// Segments per ring (2-12)
        #[arg(short, long, default_value_t = DEFAULT_SEGMENTS)]
        segments: usize,

        /// Rotate every ring to a random multiple of 15 degrees
        #[arg(long)]
        shuffle: bool,
    },
    /// Render the PassiveGram wheel.
    Passivegram {
        /// Grammar mode: standard, reporting or causative
        #[arg(short, long)]
        mode: Option<Mode>,

        /// Fill the wheel with a random draw
        #[arg(long, requires = "mode")]
        draw: bool,
    },
}

fn main() -> anyhow::Result<()> {
    env_logger::init();
    let cli = Cli::parse();

    let mut rng = match cli.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };

    let scene = match cli.command {
        Commands::Puzzle {
            rings,
            segments,
            shuffle,
        } => {
            let dims = Dimensions::new(rings, segments);
            if dims != (Dimensions { rings, segments }) {
                log::warn!(
                    "Clamped {}x{} to {}x{}",
                    rings,
                    segments,
                    dims.rings,
                    dims.segments
                );
            }
            let mut puzzle = Puzzle::new(dims);
            if shuffle {
                puzzle.shuffle(&mut rng);
            }
            puzzle_scene(&puzzle)
        }
        Commands::Passivegram { mode, draw } => {
            let mut wheel = PassiveGram::default();
            if let Some(mode) = mode {
                wheel.select_mode(mode, &mut rng)?;
            }
            if draw {
                if !wheel.begin_draw() {
                    anyhow::bail!("A draw needs a mode; pass --mode.");
                }
                wheel.reveal_draw(&mut rng)?;
                wheel.finish_draw();
            }
            passivegram_scene(&wheel, None)
        }
    };

    let document = svg::render(&scene);
    match cli.output {
        Some(path) => {
            fs_err::write(&path, document)?;
            log::info!("Wrote {}", path.display());
        }
        None => std::io::stdout().write_all(document.as_bytes())?,
    }
    Ok(())
}
