//! Sprite API balance

use super::Context;
use anyhow::Result;
use artgen_asset_gen::providers::pixellab::PixellabClient;

pub fn run(ctx: &Context) -> Result<()> {
    let client = PixellabClient::from_config(&ctx.config)?;
    let balance = client.balance()?;

    match balance.amount {
        Some(amount) => println!("API Balance: ${:.2}", amount),
        None => println!("{}", serde_json::to_string_pretty(&balance.raw)?),
    }
    Ok(())
}
