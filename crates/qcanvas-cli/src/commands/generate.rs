//! Generate command implementation.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use console::style;
use tracing::debug;

use qcanvas::{
    BackendKind, Canvas, CanvasConfig, DEFAULT_HARDWARE_MAP_PATH, save_result,
};

use super::common::{SpinnerSink, print_banner, print_footer, print_result, spinner};

/// Command-line overrides applied on top of the loaded configuration.
#[derive(Debug, Default, Clone, Copy)]
pub struct Overrides {
    pub qubits: Option<u32>,
    pub layers: Option<u32>,
    pub shots: Option<u32>,
}

impl Overrides {
    fn apply(self, mut config: CanvasConfig) -> Result<CanvasConfig> {
        if let Some(qubits) = self.qubits {
            config.num_qubits = qubits;
        }
        if let Some(layers) = self.layers {
            config.layers = layers;
        }
        if let Some(shots) = self.shots {
            config.shots = shots;
        }
        config.validate()?;
        Ok(config)
    }
}

#[derive(Debug)]
pub struct GenerateOptions {
    pub cloud: bool,
    pub batch: bool,
    pub output: PathBuf,
    pub full_meta: bool,
    pub overrides: Overrides,
    pub config: Option<PathBuf>,
    pub simulator_seed: Option<u64>,
}

/// Execute the generate command.
pub async fn execute(names: &[String], options: &GenerateOptions) -> Result<()> {
    let config = CanvasConfig::load(options.config.as_deref())
        .context("failed to load configuration")
        .and_then(|config| options.overrides.apply(config))?;
    debug!(?config, ?options, "generate");

    let (kind, mode) = if options.cloud {
        (BackendKind::Ibm, "IBM Quantum Cloud")
    } else {
        (BackendKind::Local, "Local Simulator")
    };
    print_banner(mode, names);
    println!(
        "  {} qubits, {} layers, {} shots, {} parameters",
        config.num_qubits,
        config.layers,
        config.shots,
        config.num_parameters()
    );

    let progress = spinner();
    let mut canvas =
        Canvas::new(config, kind)?.with_events(Arc::new(SpinnerSink::new(progress.clone())));
    if let Some(seed) = options.simulator_seed {
        canvas = canvas.with_simulator_seed(seed);
    }

    let outcome = if options.batch && names.len() > 1 {
        canvas.generate_batch(names).await
    } else {
        match names.first() {
            Some(name) => canvas.generate(name).await.map(|r| vec![r]),
            None => anyhow::bail!("at least one name is required"),
        }
    };
    progress.finish_and_clear();
    let results = outcome?;

    for result in &results {
        print_result(result);
    }

    // batch mode keeps the first name's universe, like single mode
    let Some(first) = results.first() else {
        anyhow::bail!("no results were produced");
    };
    let saved = save_result(first, &options.output, options.full_meta)
        .with_context(|| format!("failed to save {}", options.output.display()))?;
    println!("\n{} Saved: {}", style("✓").green().bold(), saved.display());

    if options.cloud {
        match canvas.export_hardware_map(DEFAULT_HARDWARE_MAP_PATH).await? {
            Some(path) => println!(
                "{} Hardware map saved: {}",
                style("✓").green().bold(),
                path.display()
            ),
            None => println!(
                "{} Hardware map only available for cloud backends",
                style("!").yellow().bold()
            ),
        }
    }

    print_footer();
    Ok(())
}
