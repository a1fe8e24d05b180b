use std::fs;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{ArgAction, Parser, Subcommand};
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use mdsite::Config;

#[derive(Parser)]
#[command(name = "mdsite")]
#[command(about = "Build a static site from Markdown files")]
#[command(version)]
struct Cli {
    /// Site configuration file
    #[arg(short, long, global = true, default_value = "mdsite.toml")]
    config: PathBuf,

    /// Increase log verbosity (-v debug, -vv trace)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate every page of the site
    Build {
        /// Prefix for root-relative links (overrides the config file)
        base_path: Option<String>,

        /// Directory holding the Markdown sources
        #[arg(long)]
        content: Option<PathBuf>,

        /// Directory of static assets copied as-is
        #[arg(long = "static")]
        static_dir: Option<PathBuf>,

        /// HTML page template
        #[arg(long)]
        template: Option<PathBuf>,

        /// Output directory
        #[arg(long)]
        output: Option<PathBuf>,
    },
    /// Convert a single Markdown file to an HTML fragment
    Convert {
        /// Input Markdown file
        input: PathBuf,

        /// Output HTML file (prints to stdout when omitted)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Print the title of a Markdown file
    Title {
        /// Input Markdown file
        input: PathBuf,
    },
}

fn main() {
    let cli = Cli::parse();

    let config = match Config::load(&cli.config) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Error: {}", e);
            std::process::exit(1);
        }
    };

    init_logging(cli.verbose, &config.site.log_level);

    if let Err(e) = run(cli.command, config) {
        error!("{:#}", e);
        std::process::exit(1);
    }
}

fn init_logging(verbose: u8, configured: &str) {
    let level = match verbose {
        0 => configured,
        1 => "debug",
        _ => "trace",
    };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level)))
        .with_writer(std::io::stderr)
        .init();
}

fn run(command: Commands, mut config: Config) -> Result<()> {
    match command {
        Commands::Build {
            base_path,
            content,
            static_dir,
            template,
            output,
        } => {
            if let Some(base_path) = base_path {
                config.site.base_path = base_path;
            }
            let paths = &mut config.paths;
            if let Some(content) = content {
                paths.content = content;
            }
            if let Some(static_dir) = static_dir {
                paths.static_dir = static_dir;
            }
            if let Some(template) = template {
                paths.template = template;
            }
            if let Some(output) = output {
                paths.output = output;
            }

            let summary = mdsite::site::build_site(&config)?;
            println!(
                "Built {} pages and copied {} assets into {}",
                summary.pages,
                summary.assets,
                config.paths.output.display()
            );
        }
        Commands::Convert { input, output } => {
            let markdown = fs::read_to_string(&input)
                .with_context(|| format!("reading {}", input.display()))?;
            let html = mdsite::markdown_to_html(&markdown)
                .with_context(|| format!("converting {}", input.display()))?;

            match output {
                Some(output) => {
                    fs::write(&output, html)
                        .with_context(|| format!("writing {}", output.display()))?;
                    info!(input = %input.display(), output = %output.display(), "converted");
                    println!("Created {}", output.display());
                }
                None => println!("{html}"),
            }
        }
        Commands::Title { input } => {
            let markdown = fs::read_to_string(&input)
                .with_context(|| format!("reading {}", input.display()))?;
            println!("{}", mdsite::extract_title(&markdown)?);
        }
    }
    Ok(())
}
