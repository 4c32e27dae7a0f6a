use clap::Parser;
use fccs2ef_core::{
    CoverTypeId, FuelbedId, LookupConfig, Phase, RegionId, ResolverRegistry, Subject, TableFiles,
};
use std::path::PathBuf;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

/// Emission factor lookup for FCCS fuelbeds and cover types
#[derive(Parser, Debug)]
#[command(name = "demo-lookup")]
#[command(about = "Look up emission factors by fuelbed or cover type", long_about = None)]
struct Args {
    /// Directory holding the four reference tables under their default names
    #[arg(short, long, required_unless_present = "config", conflicts_with = "config")]
    tables_dir: Option<PathBuf>,

    /// JSON config naming the reference tables
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Use prescribed-burn EF groups and regions (ignored with --config)
    #[arg(long)]
    rx: bool,

    /// FCCS fuelbed id
    #[arg(short, long, required_unless_present = "cover_type", conflicts_with = "cover_type")]
    fuelbed: Option<String>,

    /// Cover type id
    #[arg(long)]
    cover_type: Option<String>,

    /// Combustion phase (flaming, smoldering, residual)
    #[arg(short, long)]
    phase: Phase,

    /// Fuel category, e.g. "woody fuels"
    #[arg(long)]
    fuel_category: String,

    /// Fuel sub-category, e.g. "1000-hr fuels sound"
    #[arg(long)]
    fuel_sub_category: String,

    /// Species to look up; all species of the phase are listed when omitted
    #[arg(short, long)]
    species: Option<String>,
}

impl Args {
    fn lookup_config(&self) -> Result<LookupConfig, fccs2ef_core::ConfigError> {
        match (&self.config, &self.tables_dir) {
            (Some(path), _) => LookupConfig::load(path),
            (None, Some(dir)) => Ok(LookupConfig::new(TableFiles::in_dir(dir), self.rx)),
            // clap enforces one of the two
            (None, None) => Ok(LookupConfig::new(TableFiles::in_dir("."), self.rx)),
        }
    }

    fn subject(&self) -> Subject {
        match (&self.fuelbed, &self.cover_type) {
            (Some(fuelbed), _) => Subject::Fuelbed(FuelbedId::from(fuelbed.as_str())),
            (None, cover_type) => {
                Subject::CoverType(CoverTypeId::from(cover_type.as_deref().unwrap_or_default()))
            }
        }
    }
}

fn print_value(species: &str, value: Option<f64>) {
    match value {
        Some(value) => println!("  {species:<10} {value:>12.4}"),
        None => println!("  {species:<10} {:>12}", "-"),
    }
}

fn run(args: &Args) -> Result<(), Box<dyn std::error::Error>> {
    let registry = ResolverRegistry::from_config(&args.lookup_config()?)?;
    let subject = args.subject();
    let phase = args.phase.as_str();

    println!("{subject} ({:?}), {phase}", registry.burn_type());
    println!("  {} / {}", args.fuel_category, args.fuel_sub_category);

    if let Some(species) = &args.species {
        let value = registry.get(
            &subject,
            phase,
            &args.fuel_category,
            &args.fuel_sub_category,
            species,
        )?;
        print_value(species, value);
        return Ok(());
    }

    let resolver = registry.resolver(&subject)?;
    println!(
        "  cover type {}, EF group {}, region {}",
        resolver.cover_type_id(),
        resolver.ef_group(),
        resolver.region().map_or("-", RegionId::as_str)
    );
    for species in resolver.species(args.phase) {
        let value = resolver.get(phase, &args.fuel_category, &args.fuel_sub_category, species)?;
        print_value(species, value);
    }
    Ok(())
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();
    match run(&args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {e}");
            ExitCode::FAILURE
        }
    }
}
