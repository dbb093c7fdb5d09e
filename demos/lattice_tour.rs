use clap::{Parser, ValueEnum};
use log::info;
use simplelog::LevelFilter;

use pbound::bound::PBound;
use pbound::env::{Env, EnvConfig};
use pbound::pfloat::PFloat;

#[derive(Debug, Copy, Clone, ValueEnum)]
enum Preset {
    /// Stride 16, nodes {1, 2, 8/3, 3, 4, 16/3, 6, 8}.
    Sixteen,
    /// Stride 10, nodes {1, 2, sqrt(10), 5}.
    Decimal,
    /// Stride 4, nodes {1, 2}.
    Binary,
}

#[derive(Debug, Parser)]
#[command(author, version)]
struct Cli {
    /// Lattice preset.
    #[arg(value_enum, default_value = "sixteen")]
    preset: Preset,

    /// Print every float of the environment.
    #[clap(long)]
    floats: bool,

    /// Print the operator tables.
    #[clap(long)]
    tables: bool,

    /// Log level (`trace` shows every operator entry).
    #[clap(long, value_name = "LEVEL", default_value = "info")]
    log_level: LevelFilter,
}

fn main() -> color_eyre::Result<()> {
    color_eyre::install()?;

    let args = Cli::parse();

    simplelog::TermLogger::init(
        args.log_level,
        simplelog::Config::default(),
        simplelog::TerminalMode::Mixed,
        simplelog::ColorChoice::Auto,
    )?;

    println!("args = {:?}", args);

    let config = match args.preset {
        Preset::Sixteen => EnvConfig::default(),
        Preset::Decimal => EnvConfig::decimal(),
        Preset::Binary => EnvConfig::binary(),
    };
    let env = Env::new(config)?;
    println!("env = {:?}", env);

    if args.floats {
        for x in env.floats() {
            println!("  {} = {}", x, env.describe_float(x));
        }
    }

    if args.tables {
        print!("{}", env.dump_tables());
    }

    let one = env.bound_from_f64(1.0);
    let two = env.bound_from_f64(2.0);
    let three = env.bound_from_f64(3.0);
    let small = PBound::interval(env.from_i64(1), env.from_i64(2));
    let large = env.interval(env.from_i64(3), env.from_i64(4));
    let wrap = env.interval(env.from_i64(2), env.from_i64(-2));

    info!("Exact sums");
    println!("1 + 2 = {}", env.describe(&env.add(&one, &two)?));
    println!("2 - 3 = {}", env.describe(&env.sub(&two, &three)?));
    println!("{} + {} = {}", env.describe(&small), env.describe(&large), env.describe(&env.add(&small, &large)?));

    info!("Products and quotients");
    println!("2 * 3 = {}", env.describe(&env.mul(&two, &three)?));
    println!("1 / 3 = {}", env.describe(&env.div(&one, &three)?));
    println!("{} * 2 = {}", env.describe(&wrap), env.describe(&env.mul(&wrap, &two)?));
    println!("1 / {} = {}", env.describe(&small), env.describe(&env.div(&one, &small)?));

    info!("Saturation");
    let max = PBound::single(env.prev(env.prev(PFloat::INF)));
    println!("max = {}", env.describe(&max));
    println!("max + max = {}", env.describe(&env.add(&max, &max)?));

    info!("Unsupported regions");
    let big = env.bound_from_f64(env.stride());
    match env.add(&one, &big) {
        Ok(sum) => println!("1 + {} = {}", env.describe(&big), env.describe(&sum)),
        Err(e) => println!("1 + {} failed: {}", env.describe(&big), e),
    }

    Ok(())
}
