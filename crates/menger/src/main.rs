//! # MENGER
//!
//! Generates a Menger-style sponge and writes it as a MagicaVoxel file.
//!
//! ## Usage
//!
//! ```bash
//! menger --depth 4 --preset menger --output menger_pattern.vox
//! menger --depth 3 --lut 4,10,12,13,14,16,22 --inverse -o holes
//! menger --config sponge.toml --verify
//! ```

use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::time::Instant;

use menger_core::VoxelGrid;
use menger_procedural::{DeletionTable, Shading, SpongeConfig, SpongeError};
use menger_vox::{with_vox_extension, VoxLoader};

/// Settings collected from the command line, applied over the config file.
#[derive(Debug, Default)]
struct Options {
    config: Option<PathBuf>,
    depth: Option<i64>,
    lut: Option<Vec<i64>>,
    output: Option<PathBuf>,
    inverse: bool,
    leveled: bool,
    slice: Option<usize>,
    verify: bool,
}

fn print_help() {
    println!("Usage: menger [OPTIONS]");
    println!();
    println!("Options:");
    println!("  -c, --config <FILE>      Load settings from a TOML file");
    println!("  -d, --depth <N>          Recursion depth (default: 3)");
    println!("  -l, --lut <LIST>         Comma separated cell indices to carve (0-26)");
    println!("  -p, --preset <NAME>      menger | star | none");
    println!("  -o, --output <FILE>      Output path, .vox appended if missing (default: menger.vox)");
    println!("      --inverse            Write the carved-away voxels instead");
    println!("      --leveled            Shade each recursion level differently");
    println!("      --slice <CUT>        Also write the sponge minus CUT leading layers");
    println!("      --verify             Read the written file back and compare");
    println!("  -h, --help               Show this help");
}

fn parse_lut(list: &str) -> Result<Vec<i64>, String> {
    list.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(|s| s.parse().map_err(|_| format!("invalid table entry '{s}'")))
        .collect()
}

fn preset(name: &str) -> Result<Vec<i64>, String> {
    let table = match name {
        "menger" => DeletionTable::menger(),
        "star" => DeletionTable::menger_star(),
        "none" => DeletionTable::EMPTY,
        _ => return Err(format!("unknown preset '{name}'")),
    };
    // Indices are 0..27, so the conversion cannot fail.
    Ok(table.indices().filter_map(|i| i64::try_from(i).ok()).collect())
}

/// Returns `None` when help was printed.
fn parse_args(args: &[String]) -> Result<Option<Options>, String> {
    let mut opts = Options::default();
    let mut i = 0;

    while i < args.len() {
        let flag = args[i].as_str();
        let mut value = || {
            i += 1;
            args.get(i).cloned().ok_or_else(|| format!("{flag} needs a value"))
        };

        match flag {
            "--config" | "-c" => opts.config = Some(PathBuf::from(value()?)),
            "--depth" | "-d" => {
                let v = value()?;
                opts.depth = Some(v.parse().map_err(|_| format!("invalid depth '{v}'"))?);
            }
            "--lut" | "-l" => opts.lut = Some(parse_lut(&value()?)?),
            "--preset" | "-p" => opts.lut = Some(preset(&value()?)?),
            "--output" | "-o" => opts.output = Some(PathBuf::from(value()?)),
            "--slice" => {
                let v = value()?;
                opts.slice = Some(v.parse().map_err(|_| format!("invalid slice '{v}'"))?);
            }
            "--inverse" => opts.inverse = true,
            "--leveled" => opts.leveled = true,
            "--verify" => opts.verify = true,
            "--help" | "-h" => {
                print_help();
                return Ok(None);
            }
            other => return Err(format!("unknown option '{other}'")),
        }
        i += 1;
    }

    Ok(Some(opts))
}

fn resolve_config(opts: Options) -> Result<(SpongeConfig, bool), SpongeError> {
    let mut config = match &opts.config {
        Some(path) => SpongeConfig::load(path)?,
        None => SpongeConfig::default(),
    };

    if let Some(depth) = opts.depth {
        config.depth = depth;
    }
    if let Some(lut) = opts.lut {
        config.deletion_table = lut;
    }
    if let Some(output) = opts.output {
        config.output = output;
    }
    if let Some(cut) = opts.slice {
        config.slice = Some(cut);
    }
    config.inverse |= opts.inverse;
    if opts.leveled {
        config.shading = Shading::Leveled;
    }

    Ok((config, opts.verify))
}

/// `menger.vox` -> `menger_sliced.vox`
fn sliced_path(output: &Path) -> PathBuf {
    let stem = output
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("menger");
    output.with_file_name(format!("{stem}_sliced.vox"))
}

fn verify(path: &Path, expected: &VoxelGrid) -> Result<(), String> {
    let file = VoxLoader::load(path).map_err(|e| format!("{}: {e}", path.display()))?;
    let loaded = file.to_grid().map_err(|e| format!("{}: {e}", path.display()))?;

    let matches = loaded.side() == expected.side()
        && loaded
            .cells()
            .iter()
            .zip(expected.cells())
            .all(|(a, b)| (*a == 0) == (*b == 0));
    if matches {
        println!("│ Verified:           {} voxels match", file.voxel_count());
        Ok(())
    } else {
        Err(format!("{} does not match the generated grid", path.display()))
    }
}

fn run(config: &SpongeConfig, check: bool) -> Result<(), String> {
    let mut generator = config.build_generator().map_err(|e| e.to_string())?;
    let written = with_vox_extension(&config.output);

    println!("┌─ CONFIGURATION ─────────────────────────────────────────────────┐");
    println!("│ Depth:              {}", config.depth);
    println!("│ Deletion Table:     {}", generator.deletion_table());
    println!("│ Shading:            {:?}", config.shading);
    println!("│ Inverse:            {}", config.inverse);
    println!("│ Output:             {}", written.display());
    println!("└──────────────────────────────────────────────────────────────────┘");
    println!();

    let start = Instant::now();
    let grid = if config.inverse {
        generator.inverse_output(config.depth, &config.output)
    } else {
        generator.output(config.depth, &config.output).cloned()
    }
    .map_err(|e| e.to_string())?;
    let elapsed = start.elapsed();

    println!("┌─ RESULT ────────────────────────────────────────────────────────");
    println!("│ Side:               {}", grid.side());
    println!("│ Cells:              {}", grid.len());
    println!("│ Occupied:           {}", grid.occupied_count());
    println!("│ Time:               {elapsed:?}");

    if check {
        verify(&written, &grid)?;
    }

    // Slices the forward sponge, even after an inverse run.
    if let Some(cut) = config.slice {
        let path = sliced_path(&written);
        let sliced = generator
            .sliced(cut, Some(path.as_path()))
            .map_err(|e| e.to_string())?;
        println!("│ Sliced:             {} (side {})", path.display(), sliced.side());
        if check {
            verify(&path, &sliced)?;
        }
    }
    println!("└──────────────────────────────────────────────────────────────────");

    Ok(())
}

fn main() -> ExitCode {
    println!("╔══════════════════════════════════════════════════════════════════╗");
    println!("║         MENGER                                                   ║");
    println!("║         RECURSIVE VOXEL SPONGES                                  ║");
    println!("╚══════════════════════════════════════════════════════════════════╝");
    println!();

    let args: Vec<String> = std::env::args().skip(1).collect();
    let opts = match parse_args(&args) {
        Ok(Some(opts)) => opts,
        Ok(None) => return ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {e}");
            eprintln!("Run with --help for usage.");
            return ExitCode::FAILURE;
        }
    };

    let result = resolve_config(opts)
        .map_err(|e| e.to_string())
        .and_then(|(config, check)| run(&config, check));

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {e}");
            ExitCode::FAILURE
        }
    }
}
