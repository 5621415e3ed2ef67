use anyhow::Context;
use clap::Parser;

use carelink_risk::synth::{self, SynthConfig};

fn main() -> anyhow::Result<()> {
    let config = SynthConfig::parse();
    carelink_risk::init_tracing();

    tracing::info!(rows = config.rows, seed = config.seed, "Generating dataset");
    let dataset = synth::generate(&config)?;
    synth::write_csv(&dataset, &config.output)
        .with_context(|| format!("writing {}", config.output.display()))?;

    tracing::info!("Dataset generated! No-show rate: {:.3}", dataset.positive_rate());
    Ok(())
}
