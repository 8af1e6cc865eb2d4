use anyhow::Result;
use clap::{Parser, Subcommand};
use feasample::{write_delimited, Delimiter, LinearConstraints, SamplerBuilder, SamplerConfig};
use feasample_doe::{to_standard_normal, Lhs, SamplingMethod};
use log::{error, info};
use ndarray_rand::rand::SeedableRng;
use rand_xoshiro::Xoshiro256Plus;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "feasample")]
#[command(version)]
#[command(about = "Space-filling sampling of constrained regions of the unit hypercube")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Unconstrained Latin Hypercube samples of the unit hypercube
    Lhs {
        /// Dimension of the samples
        #[arg(short, long, default_value_t = 2)]
        dim: usize,
        /// Number of samples
        #[arg(short = 'n', long, default_value_t = 20)]
        samples: usize,
        /// Nearest-neighbor criterion ratio
        #[arg(long, default_value_t = 1.0)]
        ratio: f64,
        /// Random generator seed
        #[arg(long)]
        seed: Option<u64>,
        /// Output file
        #[arg(short, long, default_value = "StandardUniform.csv")]
        output: PathBuf,
        /// Also write the samples mapped to N(0, 1) in StandardNormal.csv next to the output
        #[arg(long)]
        normal: bool,
        /// Field separator: comma or space
        #[arg(long, default_value = "comma")]
        delimiter: Delimiter,
    },
    /// Samples of the mixture region sum(x) <= max_sum
    Mixture {
        /// Dimension of the samples
        #[arg(short, long)]
        dim: usize,
        /// Number of feasible samples
        #[arg(short = 'n', long)]
        n_results: Option<usize>,
        /// Bound of the components sum
        #[arg(long, default_value_t = 1.0)]
        max_sum: f64,
        /// JSON sampler configuration
        #[arg(short, long)]
        config: Option<PathBuf>,
        /// Random generator seed
        #[arg(long)]
        seed: Option<u64>,
        /// Output file
        #[arg(short, long, default_value = "Mixture.csv")]
        output: PathBuf,
        /// Field separator: comma or space
        #[arg(long, default_value = "comma")]
        delimiter: Delimiter,
    },
}

fn init_logger() {
    let env = env_logger::Env::new().filter_or("FEASAMPLE_LOG", "info");
    let mut builder = env_logger::Builder::from_env(env);
    let builder = builder.target(env_logger::Target::Stdout);
    builder.try_init().ok();
}

fn run(cli: Cli) -> Result<()> {
    match cli.command {
        Commands::Lhs {
            dim,
            samples,
            ratio,
            seed,
            output,
            normal,
            delimiter,
        } => {
            let rng = seed.map_or_else(Xoshiro256Plus::from_entropy, Xoshiro256Plus::seed_from_u64);
            let doe = Lhs::unit(dim).ratio(ratio).with_rng(rng).sample(samples)?;
            write_delimited(&output, &doe, delimiter)?;
            info!("{} LHS samples written to {}", doe.nrows(), output.display());
            if normal {
                let path = output.with_file_name("StandardNormal.csv");
                write_delimited(&path, &to_standard_normal(&doe)?, delimiter)?;
                info!("Standard normal samples written to {}", path.display());
            }
        }
        Commands::Mixture {
            dim,
            n_results,
            max_sum,
            config,
            seed,
            output,
            delimiter,
        } => {
            let mut sampler_config = match config {
                Some(path) => SamplerConfig::from_json_file(path)?,
                None => SamplerConfig::default(),
            };
            if let Some(n) = n_results {
                sampler_config = sampler_config.n_results(n);
            }
            if let Some(seed) = seed {
                sampler_config = sampler_config.seed(seed);
            }
            let mixture = LinearConstraints::mixture(dim, max_sum)?;
            let res = SamplerBuilder::sample(mixture)
                .configure(|_| sampler_config)
                .build()?
                .run();
            match res {
                Ok(res) => {
                    write_delimited(&output, &res.candidates, delimiter)?;
                    info!(
                        "{} feasible samples ({:?} mode) written to {}",
                        res.candidates.nrows(),
                        res.mode,
                        output.display()
                    );
                }
                Err(err) => {
                    if let Some(partial) = err.partial().filter(|p| p.nrows() > 0) {
                        let path = output.with_extension("partial.csv");
                        write_delimited(&path, partial, delimiter)?;
                        error!(
                            "{} valid candidates found before failure written to {}",
                            partial.nrows(),
                            path.display()
                        );
                    }
                    return Err(err.into());
                }
            }
        }
    }
    Ok(())
}

fn main() -> Result<()> {
    init_logger();
    run(Cli::parse())
}
