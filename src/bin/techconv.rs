//!
//! # techconv
//!
//! Technology-file format converter.
//! Reads a technology file in one of the three encodings
//! (binary, textual, json) and re-writes it in another.
//!

use clap::Parser;
use std::error::Error;

use tech21::{ser, TechFormat};

/// KPEX Technology-File Format Converter
#[derive(Parser)]
pub struct ProgramOptions {
    /// Input File
    #[clap(short = 'i', long, default_value = "")]
    pub inp: String,
    /// Input Format. One of ("binary", "textual", "json")
    #[clap(short = 'f', long, default_value = "")]
    pub infmt: String,
    /// Output File
    #[clap(short = 'o', long, default_value = "")]
    pub out: String,
    /// Output Format. One of ("binary", "textual", "json")
    #[clap(short = 't', long, default_value = "")]
    pub outfmt: String,
    /// Verbose Output Mode
    #[clap(short, long)]
    pub verbose: bool,
}

fn main() -> Result<(), Box<dyn Error>> {
    let options = ProgramOptions::parse();
    _main(&options)
}

fn _main(options: &ProgramOptions) -> Result<(), Box<dyn Error>> {
    let infmt = options.infmt.parse::<TechFormat>()?;
    let outfmt = options.outfmt.parse::<TechFormat>()?;
    if options.verbose {
        println!(
            "Reading technology protobuf message from file '{}' in {} format.",
            options.inp, infmt
        );
        println!(
            "Writing technology protobuf message to file '{}' in {} format.",
            options.out, outfmt
        );
    }
    ser::convert(&options.inp, infmt, &options.out, outfmt)?;
    Ok(())
}
