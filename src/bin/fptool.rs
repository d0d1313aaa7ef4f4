use clap::{Parser, Subcommand};
use rust_minutiae::pipeline::{extract_batch, extract_stages};
use rust_minutiae::tools::{
    bench_limit_from_env, binary_stats, dataset_iter, dataset_root_from_env, grayscale_stats,
    load_bytes, load_gray,
};
use rust_minutiae::{MinutiaKind, MinutiaeSet, Result, Verifier, template};
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::time::Instant;

#[derive(Parser)]
#[command(name = "fptool", version, about = "RustMinutiae CLI tools")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Extract minutiae from an image and print or save the template
    Extract {
        #[arg(long)]
        image: PathBuf,
        /// Write the JSON template here instead of printing it
        #[arg(long)]
        output: Option<PathBuf>,
    },
    /// Compare two minutiae sets, each given as an image or a .json template
    Match {
        #[arg(long)]
        probe: PathBuf,
        #[arg(long)]
        reference: PathBuf,
    },
    /// Verify a probe image against a stored .json template
    Verify {
        #[arg(long)]
        image: PathBuf,
        #[arg(long)]
        template: PathBuf,
    },
    /// Print per-stage statistics for an image
    DebugExtract {
        #[arg(long)]
        image: PathBuf,
    },
    /// Extract every image of a dataset in parallel and report counts
    DatasetBench {
        #[arg(long)]
        root: Option<PathBuf>,
        #[arg(long)]
        limit: Option<usize>,
    },
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "warn".into()),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let outcome = Verifier::from_env().and_then(|verifier| match cli.command {
        Command::Extract { image, output } => extract_cmd(&verifier, &image, output.as_deref()),
        Command::Match { probe, reference } => match_cmd(&verifier, &probe, &reference),
        Command::Verify { image, template } => verify_cmd(&verifier, &image, &template),
        Command::DebugExtract { image } => debug_extract_cmd(&verifier, &image),
        Command::DatasetBench { root, limit } => dataset_bench_cmd(&verifier, root, limit),
    });

    match outcome {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("error: {err}");
            ExitCode::FAILURE
        }
    }
}

fn load_set(verifier: &Verifier, path: &Path) -> Result<MinutiaeSet> {
    let is_template = path
        .extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case("json"));
    if is_template {
        template::load(path)
    } else {
        verifier.extract(&load_bytes(path)?)
    }
}

fn extract_cmd(verifier: &Verifier, image: &Path, output: Option<&Path>) -> Result<()> {
    let set = verifier.extract(&load_bytes(image)?)?;
    match output {
        Some(path) => {
            template::save(&set, path)?;
            println!(
                "{}: {} endings, {} bifurcations -> {}",
                image.display(),
                set.count_kind(MinutiaKind::RidgeEnding),
                set.count_kind(MinutiaKind::Bifurcation),
                path.display()
            );
            println!("digest: {}", template::digest_hex(&set));
        }
        None => println!("{}", template::to_json(&set)?),
    }
    Ok(())
}

fn match_cmd(verifier: &Verifier, probe: &Path, reference: &Path) -> Result<()> {
    let probe_set = load_set(verifier, probe)?;
    let reference_set = load_set(verifier, reference)?;
    let result = verifier.compare(&probe_set, &reference_set);
    println!(
        "probe={} reference={} matched={} score={:.3} decision={}",
        probe_set.len(),
        reference_set.len(),
        result.matched_pairs,
        result.score,
        if result.decision { "accept" } else { "reject" }
    );
    if let Some(alignment) = result.alignment {
        println!(
            "alignment: rotation={:.1}deg dx={:.1} dy={:.1}",
            alignment.rotation.to_degrees(),
            alignment.dx,
            alignment.dy
        );
    }
    Ok(())
}

fn verify_cmd(verifier: &Verifier, image: &Path, template_path: &Path) -> Result<()> {
    let reference = template::load(template_path)?;
    let result = verifier.verify(&load_bytes(image)?, &reference)?;
    let json = serde_json::to_string_pretty(&result)
        .map_err(|e| rust_minutiae::MinutiaeError::Template(e.to_string()))?;
    println!("{json}");
    Ok(())
}

fn debug_extract_cmd(verifier: &Verifier, image: &Path) -> Result<()> {
    let config = verifier.extract_config();
    let start = Instant::now();
    let gray = load_gray(image, config)?;
    println!("Image: {} ({}x{})", image.display(), gray.width(), gray.height());

    let gray_stats = grayscale_stats(&gray);
    println!(
        "Normalized range: {}-{}, average: {}",
        gray_stats.min, gray_stats.max, gray_stats.avg
    );

    let stages = extract_stages(gray, config)?;
    let binary = binary_stats(&stages.binary);
    println!(
        "Binary: ridge_pixels={} total={} ridge_ratio={:.2}%",
        binary.ridge_pixels,
        binary.total_pixels,
        binary.ridge_ratio * 100.0
    );
    let skeleton = binary_stats(stages.skeleton.as_matrix());
    println!(
        "Skeleton: ridge_pixels={} iterations={}",
        skeleton.ridge_pixels,
        stages.skeleton.iterations()
    );
    println!(
        "Minutiae: {} endings, {} bifurcations",
        stages.minutiae.count_kind(MinutiaKind::RidgeEnding),
        stages.minutiae.count_kind(MinutiaKind::Bifurcation)
    );
    for (i, m) in stages.minutiae.iter().take(10).enumerate() {
        println!(
            "  Minutia {}: ({}, {}) angle={:.1}deg kind={:?}",
            i,
            m.x,
            m.y,
            m.angle.to_degrees(),
            m.kind
        );
    }
    println!("Elapsed: {:.2} ms", start.elapsed().as_secs_f64() * 1000.0);
    Ok(())
}

fn dataset_bench_cmd(
    verifier: &Verifier,
    root: Option<PathBuf>,
    limit: Option<usize>,
) -> Result<()> {
    let root = root.unwrap_or_else(dataset_root_from_env);
    let limit = limit.or_else(bench_limit_from_env);

    let mut paths = Vec::new();
    let mut images = Vec::new();
    for path in dataset_iter(&root, limit) {
        match load_bytes(&path) {
            Ok(bytes) => {
                paths.push(path);
                images.push(bytes);
            }
            Err(err) => tracing::warn!(path = %path.display(), %err, "skipping unreadable file"),
        }
    }
    if images.is_empty() {
        println!("No images found under {}", root.display());
        return Ok(());
    }

    let start = Instant::now();
    let results = extract_batch(&images, verifier.extract_config());
    let elapsed = start.elapsed();

    let mut failed = 0usize;
    let mut total_minutiae = 0usize;
    for (path, result) in paths.iter().zip(&results) {
        match result {
            Ok(set) => total_minutiae += set.len(),
            Err(err) => {
                failed += 1;
                tracing::warn!(path = %path.display(), %err, "extraction failed");
            }
        }
    }

    let succeeded = images.len() - failed;
    println!("Dataset: {} ({} images)", root.display(), images.len());
    println!("Extracted: {succeeded} ok, {failed} failed");
    if succeeded > 0 {
        println!(
            "Average minutiae per image: {:.1}",
            total_minutiae as f64 / succeeded as f64
        );
    }
    println!(
        "Total time: {:.2} s ({:.2} ms/image)",
        elapsed.as_secs_f64(),
        elapsed.as_secs_f64() * 1000.0 / images.len() as f64
    );
    Ok(())
}
