//! Character and background art

use super::Context;
use anyhow::Result;
use artgen_asset_gen::providers::maginary::{self, MaginaryClient};
use artgen_asset_gen::{generate_art, generate_batch, ArtOutcome, JobPoller};

pub fn run(ctx: &Context, asset_type: Option<&str>, all: bool) -> Result<()> {
    if asset_type.is_none() && !all {
        println!("Usage: artgen art --type <NAME> | --all");
        println!("\nAvailable asset types:");
        for name in ctx.catalog.art_names() {
            println!("  - {}", name);
        }
        return Ok(());
    }

    // Resolve the entry before touching the network or the filesystem
    let single = asset_type.map(|name| ctx.catalog.art(name)).transpose()?;

    if !ctx.config.is_enabled(maginary::PROVIDER_NAME) {
        anyhow::bail!("Provider '{}' is disabled in config", maginary::PROVIDER_NAME);
    }
    let client = MaginaryClient::from_config(&ctx.config)?;
    let poller = JobPoller::new(client, ctx.config.poll_settings());
    ctx.layout.ensure_directories()?;

    let settings = poller.settings();
    log::info!(
        "Polling up to {} time(s), {}s apart",
        settings.max_attempts,
        settings.delay.as_secs()
    );

    match single {
        Some(entry) => {
            println!("Generating: {}", entry.name);
            let outcome = generate_art(&poller, entry, &ctx.layout)?;
            print_outcome(&outcome);
            Ok(())
        }
        None => {
            let results = generate_batch(&poller, ctx.catalog.art_entries(), &ctx.layout);
            let mut failed = 0;
            let mut local_failures = 0;
            for (name, result) in &results {
                match result {
                    Ok(outcome) => print_outcome(outcome),
                    Err(e) => {
                        failed += 1;
                        if e.is_remote() {
                            eprintln!("  ERROR {}: {}", name, e);
                        } else {
                            local_failures += 1;
                            eprintln!("  ERROR {} (local): {}", name, e);
                        }
                    }
                }
            }

            println!(
                "\n{} of {} asset(s) generated",
                results.len() - failed,
                results.len()
            );
            if local_failures > 0 {
                eprintln!("{} failure(s) were local; check the output directory", local_failures);
            }
            if failed > 0 {
                anyhow::bail!("{} asset(s) failed", failed);
            }
            Ok(())
        }
    }
}

fn print_outcome(outcome: &ArtOutcome) {
    println!("  {} (job {})", outcome.name, outcome.job_id);
    println!("    Saved: {} ({} bytes)", outcome.image_path.display(), outcome.size_bytes);
    println!("    Metadata: {}", outcome.metadata_path.display());
    println!("    Hash: {}", outcome.digest);
}
