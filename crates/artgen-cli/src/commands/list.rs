//! Catalog listing

use super::Context;
use anyhow::Result;

const PREVIEW_CHARS: usize = 60;

pub fn run(ctx: &Context) -> Result<()> {
    println!("Art ({}):", ctx.layout.root().display());
    for entry in ctx.catalog.art_entries() {
        println!(
            "  {:<12} {:<11} {}",
            entry.name,
            entry.category.to_string(),
            preview(&entry.prompt)
        );
    }

    println!("\nSprites ({}):", ctx.layout.sprites_dir().display());
    for entry in ctx.catalog.sprites() {
        println!("  {:<12} {}", entry.name, preview(&entry.description));
    }
    Ok(())
}

fn preview(text: &str) -> String {
    if text.chars().count() <= PREVIEW_CHARS {
        text.to_string()
    } else {
        let cut: String = text.chars().take(PREVIEW_CHARS).collect();
        format!("{}...", cut)
    }
}
