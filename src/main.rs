use std::fs::File;
use std::io::{self, BufReader, BufWriter};
use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use rewire::prelude::*;

/// Everything one demo run needs, loadable from a JSON file.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
struct RunConfig {
    network: NetworkConfig,
    state: StateSpec,
    connectivity: ConnectivitySpec,
    steps: usize,
    sparse: bool,
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            network: NetworkConfig::default(),
            state: StateSpec::Zeros,
            connectivity: ConnectivitySpec::Random {
                p_plus: 0.01,
                p_minus: 0.01,
            },
            steps: 1000,
            sparse: false,
        }
    }
}

#[derive(Debug, Default)]
struct Args {
    config: Option<PathBuf>,
    steps: Option<usize>,
    seed: Option<u64>,
    sparse: bool,
    progress: bool,
    save_image: Option<PathBuf>,
}

#[derive(Serialize)]
struct RunReport<'a> {
    seed: u64,
    steps: usize,
    links: LinkCounts,
    series: &'a RunSeries,
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(io::stderr)
        .init();

    let args = match parse_args(std::env::args().skip(1)) {
        Ok(Some(args)) => args,
        Ok(None) => {
            print_help();
            return;
        }
        Err(msg) => {
            eprintln!("{msg}");
            print_help();
            std::process::exit(2);
        }
    };

    if let Err(e) = run(args) {
        error!(error = %e, "run failed");
        std::process::exit(2);
    }
}

fn run(args: Args) -> Result<(), Box<dyn std::error::Error>> {
    let mut cfg = match &args.config {
        Some(path) => {
            let file = BufReader::new(File::open(path)?);
            serde_json::from_reader::<_, RunConfig>(file)?
        }
        None => RunConfig::default(),
    };
    if let Some(steps) = args.steps {
        cfg.steps = steps;
    }
    if let Some(seed) = args.seed {
        cfg.network.seed = Some(seed);
    }
    cfg.sparse |= args.sparse;

    info!(
        n = cfg.network.n,
        steps = cfg.steps,
        sparse = cfg.sparse,
        "starting simulation"
    );

    if cfg.sparse {
        let net: Network<SparseMatrix> = Network::new(cfg.network, &cfg.state, &cfg.connectivity)?;
        simulate(net, cfg.steps, &args)
    } else {
        let net: Network<DenseMatrix> = Network::new(cfg.network, &cfg.state, &cfg.connectivity)?;
        simulate(net, cfg.steps, &args)
    }
}

fn simulate<M: Connectivity>(
    mut net: Network<M>,
    steps: usize,
    args: &Args,
) -> Result<(), Box<dyn std::error::Error>> {
    let series = net.run(steps, args.progress)?;

    if let Some(path) = &args.save_image {
        let mut w = BufWriter::new(File::create(path)?);
        net.save_image_to(&mut w)?;
        info!(path = %path.display(), "network image saved");
    }

    let report = RunReport {
        seed: net.seed(),
        steps,
        links: net.link_counts(),
        series: &series,
    };
    let stdout = io::stdout();
    serde_json::to_writer(stdout.lock(), &report)?;
    println!();
    Ok(())
}

fn parse_args<I: Iterator<Item = String>>(mut it: I) -> Result<Option<Args>, String> {
    let mut args = Args::default();
    while let Some(arg) = it.next() {
        match arg.as_str() {
            "-h" | "--help" | "help" => return Ok(None),
            "--config" => args.config = Some(PathBuf::from(value(&mut it, "--config")?)),
            "--steps" => {
                let v = value(&mut it, "--steps")?;
                args.steps = Some(v.parse().map_err(|_| format!("invalid --steps: {v}"))?);
            }
            "--seed" => {
                let v = value(&mut it, "--seed")?;
                args.seed = Some(v.parse().map_err(|_| format!("invalid --seed: {v}"))?);
            }
            "--sparse" => args.sparse = true,
            "--progress" => args.progress = true,
            "--save-image" => {
                args.save_image = Some(PathBuf::from(value(&mut it, "--save-image")?))
            }
            other => return Err(format!("Unknown argument: {other}")),
        }
    }
    Ok(Some(args))
}

fn value<I: Iterator<Item = String>>(it: &mut I, flag: &str) -> Result<String, String> {
    it.next().ok_or_else(|| format!("{flag} requires a value"))
}

fn print_help() {
    println!(
        "rewire: co-evolving activity and connectivity\n\n\
         Usage: rewire [options]\n\n\
         Options:\n  \
           --config <file.json>   run configuration (network, state, connectivity, steps, sparse)\n  \
           --steps <n>            number of macro-steps (default 1000)\n  \
           --seed <n>             RNG seed (default: from the clock)\n  \
           --sparse               use the sparse connectivity representation\n  \
           --progress             log progress every tenth of the run\n  \
           --save-image <file>    write a network image after the run\n  \
           -h, --help             show this help\n\n\
         The four time series are printed to stdout as JSON. Set RUST_LOG=info for logs."
    );
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> Result<Option<Args>, String> {
        parse_args(args.iter().map(|s| s.to_string()))
    }

    #[test]
    fn parses_flags() {
        let args = parse(&["--steps", "20", "--seed", "7", "--sparse", "--progress"])
            .unwrap()
            .unwrap();
        assert_eq!(args.steps, Some(20));
        assert_eq!(args.seed, Some(7));
        assert!(args.sparse);
        assert!(args.progress);
        assert!(args.config.is_none());
    }

    #[test]
    fn rejects_unknown_and_incomplete() {
        assert!(parse(&["--bogus"]).is_err());
        assert!(parse(&["--steps"]).is_err());
        assert!(parse(&["--steps", "x"]).is_err());
        assert!(parse(&["--help"]).unwrap().is_none());
    }

    #[test]
    fn run_config_fills_defaults() {
        let cfg: RunConfig =
            serde_json::from_str(r#"{"network": {"n": 10, "seed": 3}, "steps": 5}"#).unwrap();
        assert_eq!(cfg.network.n, 10);
        assert_eq!(cfg.network.tau, 10);
        assert_eq!(cfg.network.seed, Some(3));
        assert_eq!(cfg.steps, 5);
        assert_eq!(cfg.state, StateSpec::Zeros);
        assert!(!cfg.sparse);

        let cfg: RunConfig = serde_json::from_str(
            r#"{"state": {"kind": "random", "p": 0.3}, "connectivity": {"kind": "ones", "negative": true}}"#,
        )
        .unwrap();
        assert_eq!(cfg.state, StateSpec::Random { p: 0.3 });
        assert_eq!(cfg.connectivity, ConnectivitySpec::Ones { negative: true });
    }
}
