use std::error::Error;
use std::fs;
use std::path::PathBuf;

use clap::{ArgAction, Parser};
use env_logger::Env;

use vip8::{disassemble, Config, Quirks};

mod audio;
mod keymap;
mod run;

#[derive(Parser, Debug)]
#[command(name = "vip8")]
#[command(about = "A Chip-8 interpreter", long_about = None)]
struct Args {
    /// ROM image to run
    #[arg(value_name = "ROM")]
    rom: PathBuf,

    /// JSON config file; flags below override it
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Instructions executed per second
    #[arg(long)]
    rate: Option<u32>,

    /// Seed for the random number generator
    #[arg(long)]
    seed: Option<u64>,

    /// Use the quirks later interpreters settled on instead of the original hardware's
    #[arg(long, action = ArgAction::SetTrue)]
    modern: bool,

    /// Window pixels per Chip-8 pixel
    #[arg(long, default_value_t = 10)]
    scale: u32,

    /// Print a listing of the ROM and exit
    #[arg(long, action = ArgAction::SetTrue)]
    disassemble: bool,
}

impl Args {
    /// The config file, if any, with command line flags layered on top
    fn config(&self) -> Result<Config, Box<dyn Error>> {
        let mut config = match &self.config {
            Some(path) => Config::from_path(path)?,
            None => Config::default(),
        };
        if let Some(rate) = self.rate {
            config.instructions_per_second = rate;
        }
        if self.seed.is_some() {
            config.seed = self.seed;
        }
        if self.modern {
            config.quirks = Quirks::modern();
        }
        Ok(config)
    }
}

fn main() -> Result<(), Box<dyn Error>> {
    env_logger::Builder::from_env(Env::default().default_filter_or("info")).init();

    let args = Args::parse();
    let rom = fs::read(&args.rom)?;

    if args.disassemble {
        for (address, op, instruction) in disassemble(&rom) {
            match instruction {
                Some(instruction) => println!("{:03X}  {:04X}  {}", address, op, instruction),
                None => println!("{:03X}  {:04X}", address, op),
            }
        }
        return Ok(());
    }

    let config = args.config()?;
    log::debug!("{:?}", config);
    run::run(&rom, &config, args.scale)
}
