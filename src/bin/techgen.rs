//!
//! # techgen
//!
//! Writes the built-in process technologies to a target directory,
//! one `<process>_tech.pb.json` file per process.
//!

use std::env;
use std::path::{Path, PathBuf};
use std::process;

use tech21::{TechFormat, TechResult};

struct Config {
    output_directory: PathBuf,
}

impl Config {
    fn new(args: &[String]) -> Result<Config, String> {
        if args.len() < 2 {
            return Err(format!("Usage: {} <output-directory>", args[0]));
        }
        Ok(Config {
            output_directory: PathBuf::from(&args[1]),
        })
    }
}

fn run(cfg: &Config) -> TechResult<()> {
    std::fs::create_dir_all(&cfg.output_directory)?;
    for tech in tech21::pdk::technologies() {
        let fname = cfg.output_directory.join(format!("{}_tech.pb.json", tech.name));
        println!(
            "Writing technology protobuf message to file '{}' in {} format.",
            fname.display(),
            TechFormat::Json
        );
        tech.save(TechFormat::Json, fname)?;
    }
    Ok(())
}

fn main() {
    let args: Vec<String> = env::args().collect();
    let cfg = Config::new(&args).unwrap_or_else(|err| {
        eprintln!("{}", err);
        process::exit(1);
    });
    if cfg.output_directory.exists() && !Path::is_dir(&cfg.output_directory) {
        eprintln!("ERROR: Output directory path already exists, but is not a directory");
        process::exit(2);
    }
    run(&cfg).unwrap_or_else(|err| {
        eprintln!("Problem in techgen: {}", err);
        process::exit(1);
    });
}
