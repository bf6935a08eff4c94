use clap::{Parser, Subcommand};
use std::path::PathBuf;
use titanium_site::{config, generate, output};

fn version_string() -> &'static str {
    let on_tag = env!("ON_RELEASE_TAG");
    if on_tag == "true" {
        env!("CARGO_PKG_VERSION")
    } else {
        let hash = env!("GIT_HASH");
        if hash.is_empty() {
            "dev@unknown"
        } else {
            // Leaked once at startup — trivial, called exactly once
            Box::leak(format!("dev@{hash}").into_boxed_str())
        }
    }
}

#[derive(Parser)]
#[command(name = "titanium-site")]
#[command(about = "Static landing page generator for a 3D printing studio")]
#[command(long_about = "\
Static landing page generator for a 3D printing studio

Renders a single index.html: header, hero, services, differentiators,
process steps, a portfolio of videos, a final call to action and a footer.
Portfolio videos are deferred: each card shows a placeholder until it
scrolls into view, then its <video> is swapped in.

Content structure:

  content/
  ├── config.toml      # Texts, contact, portfolio entries, colors (optional)
  └── assets/          # Copied to the output root (favicon, posters)

Run 'titanium-site gen-config' to print every option with its default.")]
#[command(version = version_string())]
struct Cli {
    /// Content directory
    #[arg(long, default_value = "content", global = true)]
    source: PathBuf,

    /// Output directory
    #[arg(long, default_value = "dist", global = true)]
    output: PathBuf,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Render the landing page and copy assets
    Build,
    /// Validate the configuration without writing anything
    Check,
    /// Print a stock config.toml with every option
    GenConfig,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    match cli.command {
        Command::Build => {
            println!(
                "==> Building {} → {}",
                cli.source.display(),
                cli.output.display()
            );
            let report = generate::generate(&cli.source, &cli.output)?;
            output::print_generate_output(&report);
            println!("==> Build complete: {}", report.output_dir.display());
        }
        Command::Check => {
            println!("==> Checking {}", cli.source.display());
            let (site_config, gallery) = generate::load_site(&cli.source)?;
            output::print_check_output(&site_config, &gallery);
            println!("==> Content is valid");
        }
        Command::GenConfig => {
            print!("{}", config::stock_config_toml());
        }
    }

    Ok(())
}
