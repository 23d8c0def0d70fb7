use anyhow::Context;
use clap::{Parser, Subcommand};
use generator::spillage::{build_spillage_csv, GeneratorConfig};
use log::{info, warn};
use spillcore::ingest::ResourceRef;
use spillcore::view::ViewPreset;
use std::fs;
use std::net::SocketAddr;
use std::path::PathBuf;
use tokio::runtime::Builder as TokioBuilder;
use workflow::config::WorkflowConfig;
use workflow::runner::{OutputFormat, Runner};

mod generator;
mod host;
mod workflow;

#[derive(Parser)]
#[command(author, version, about = "Offline driver for the milk-spillage wastage charts")]
struct Args {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Write a synthetic detector export
    Generate {
        #[arg(long, default_value_t = 2000)]
        rows: usize,
        #[arg(long, default_value_t = 0)]
        seed: u64,
        /// Corrupt the wastage cell of every n-th row (0 = never)
        #[arg(long, default_value_t = 0)]
        invalid_every: usize,
        /// Store wastage as a fraction instead of a percentage
        #[arg(long, default_value_t = false)]
        fractional: bool,
        #[arg(long, default_value = "data/milk_spillage.csv")]
        out: PathBuf,
    },
    /// Build views from a source file or URL and write one chart per view
    Render {
        /// Local path or http(s) URL of the source file
        #[arg(long)]
        source: Option<String>,
        /// Load source, timeout and views from YAML
        #[arg(long)]
        workflow: Option<PathBuf>,
        /// Preset to render; repeat for several, omit for all
        #[arg(long = "view")]
        views: Vec<ViewPreset>,
        /// Fetch timeout; overrides the workflow value when given
        #[arg(long)]
        timeout_secs: Option<u64>,
        #[arg(long, value_enum, default_value_t = OutputFormat::Svg)]
        format: OutputFormat,
        #[arg(long, default_value = "charts")]
        out_dir: PathBuf,
    },
    /// Host the source file as a static resource for the visualizer
    Serve {
        #[arg(long, default_value = "data/milk_spillage.csv")]
        source: PathBuf,
        #[arg(long, default_value_t = 9000)]
        port: u16,
    },
}

fn main() -> anyhow::Result<()> {
    env_logger::init();
    let args = Args::parse();

    match args.command {
        Command::Generate {
            rows,
            seed,
            invalid_every,
            fractional,
            out,
        } => {
            let config = GeneratorConfig {
                rows,
                seed,
                invalid_every,
                fractional,
                ..Default::default()
            };
            let csv = build_spillage_csv(&config)?;
            if let Some(parent) = out.parent().filter(|p| !p.as_os_str().is_empty()) {
                fs::create_dir_all(parent)
                    .with_context(|| format!("creating {}", parent.display()))?;
            }
            fs::write(&out, csv).with_context(|| format!("writing {}", out.display()))?;
            println!("Wrote {rows} rows to {}", out.display());
        }
        Command::Render {
            source,
            workflow,
            views,
            timeout_secs,
            format,
            out_dir,
        } => {
            let mut config = match workflow {
                Some(path) => WorkflowConfig::load(path)?,
                None => WorkflowConfig::default(),
            };
            config.apply_overrides(source, timeout_secs, &views);
            let resource: ResourceRef = config
                .source
                .as_deref()
                .context("no source given; pass --source or set `source` in the workflow")?
                .parse()?;

            let runtime = TokioBuilder::new_multi_thread()
                .enable_all()
                .build()
                .context("creating runtime for render")?;
            let runner = Runner::new(config);
            let reports = runtime.block_on(runner.execute(&resource, &out_dir, format))?;

            for report in &reports {
                if report.state == "error" {
                    warn!("view {} failed to load", report.name);
                }
                println!(
                    "{:<14} {:<10} points {:>6} -> {}",
                    report.name,
                    report.state,
                    report.points,
                    report.path.display()
                );
            }
        }
        Command::Serve { source, port } => {
            let addr = SocketAddr::from(([127, 0, 0, 1], port));
            let runtime = TokioBuilder::new_multi_thread()
                .enable_all()
                .build()
                .context("creating runtime for static host")?;
            info!("press Ctrl+C to stop");
            runtime.block_on(host::static_file::serve(source, addr, async {
                if let Err(err) = tokio::signal::ctrl_c().await {
                    warn!("awaiting Ctrl+C failed: {err}");
                }
            }))?;
        }
    }

    Ok(())
}
