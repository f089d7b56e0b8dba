//! Pixel-art walk-cycle sprite sheets

use super::Context;
use anyhow::Result;
use artgen_asset_gen::generate_sprite_sheet;
use artgen_asset_gen::providers::pixellab::{self, PixellabClient};

pub fn run(ctx: &Context, name: Option<&str>, size: Option<u32>) -> Result<()> {
    let entries = match name {
        Some(n) => vec![ctx.catalog.sprite(n)?],
        None => ctx.catalog.sprites().iter().collect(),
    };

    let frame_size = size.unwrap_or(ctx.config.sprites.frame_size);
    if frame_size == 0 {
        anyhow::bail!("Frame size must be at least 1 pixel");
    }

    if !ctx.config.is_enabled(pixellab::PROVIDER_NAME) {
        anyhow::bail!("Provider '{}' is disabled in config", pixellab::PROVIDER_NAME);
    }
    let client = PixellabClient::from_config(&ctx.config)?;

    match client.balance() {
        Ok(balance) => match balance.amount {
            Some(amount) => println!("API Balance: ${:.2}", amount),
            None => println!("API Balance: unknown"),
        },
        Err(e) => eprintln!("Failed to check balance: {}", e),
    }

    let mut failed = 0;
    for entry in &entries {
        println!("\nGenerating sprites: {}", entry.name);
        match generate_sprite_sheet(&client, entry, frame_size, &ctx.layout) {
            Ok(outcome) => {
                println!("  Saved: {}", outcome.image_path.display());
                println!("  Saved: {}", outcome.metadata_path.display());
                println!("  Success! Generated {} frames", outcome.frame_count);
            }
            Err(e) => {
                failed += 1;
                eprintln!("  Failed: {}", e);
            }
        }
    }

    println!("\nOutput directory: {}", ctx.layout.sprites_dir().display());
    if failed > 0 {
        anyhow::bail!("{} of {} sprite sheet(s) failed", failed, entries.len());
    }
    Ok(())
}
