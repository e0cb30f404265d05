use clap::{Parser, Subcommand};
use covergrid::catalog::{Catalog, GroupFilter, ItemResolver, ManifestCatalog};
use covergrid::{config, output, run, schedule};
use rand::SeedableRng;
use rand::rngs::StdRng;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "covergrid")]
#[command(about = "Generates grid-collage cover art for media collections that lack one")]
#[command(version)]
#[command(long_about = "\
Generates grid-collage cover art for media collections that lack one

The catalog manifest is the data source: a JSON file listing groups, their
storage directories, and each member's cached thumbnail path. For every
group without a cover, covergrid samples a few thumbnails, composites them
into a 1000x1500 grid poster, and publishes it at <group>/folder/poster.jpg.

Manifest structure:

  {
    \"groups\": [
      {
        \"id\": \"b1946ac9\",
        \"name\": \"Action Movies\",
        \"path\": \"/library/collections/Action Movies\",
        \"cover\": null,
        \"items\": [
          { \"id\": \"4b227777\", \"name\": \"Die Hard\",
            \"thumbnail\": \"/library/cache/4b227777-poster.jpg\" }
        ]
      }
    ]
  }

Groups with a non-empty \"cover\" are left untouched. Items whose thumbnail
is missing on disk are excluded from sampling; a group with no usable
thumbnails is skipped without error.

Run 'covergrid gen-config' to generate a documented config.toml.")]
struct Cli {
    /// Catalog manifest file
    #[arg(long, default_value = "catalog.json", global = true)]
    manifest: PathBuf,

    /// Configuration file
    #[arg(long, default_value = "config.toml", global = true)]
    config: PathBuf,

    /// Directory for in-flight staging files
    #[arg(long, default_value = ".covergrid-staging", global = true)]
    staging_dir: PathBuf,

    /// Only process groups of this kind (e.g. "collection")
    #[arg(long, global = true)]
    kind: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Generate covers for all groups lacking one
    Run,
    /// Report what a run would do, without writing anything
    Check,
    /// Print the next scheduled run time from config
    Schedule,
    /// Print a stock config.toml with all options documented
    GenConfig,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let filter = match &cli.kind {
        Some(kind) => GroupFilter::kind(kind.clone()),
        None => GroupFilter::all(),
    };

    match cli.command {
        Command::Run => {
            let config = config::Config::load(&cli.config)?;
            let catalog = ManifestCatalog::load(&cli.manifest)?;

            let (tx, rx) = std::sync::mpsc::channel();
            let printer = std::thread::spawn(move || {
                for event in rx {
                    output::print_run_event(&event);
                }
            });

            let ctx = run::RunContext::with_events(tx);
            let mut rng = StdRng::from_entropy();
            let report = run::run(
                &catalog,
                &catalog,
                &filter,
                &config,
                &cli.staging_dir,
                &ctx,
                &mut rng,
            )?;
            drop(ctx);
            printer.join().expect("printer thread panicked");

            println!();
            println!("{}", output::format_run_summary(&report));
        }
        Command::Check => {
            let catalog = ManifestCatalog::load(&cli.manifest)?;
            let groups = catalog.list_groups(&filter)?;
            println!("{} groups in catalog", groups.len());

            for group in &groups {
                if group.has_cover() {
                    println!("{}: has cover art", group.name);
                    continue;
                }
                let usable = group
                    .items
                    .iter()
                    .filter_map(|item| catalog.thumbnail_path(item))
                    .filter(|p| p.is_file())
                    .count();
                if usable == 0 {
                    println!("{}: no usable images, would skip", group.name);
                } else {
                    println!(
                        "{}: would generate from {usable} usable of {} items",
                        group.name,
                        group.items.len()
                    );
                }
            }
        }
        Command::Schedule => {
            let config = config::Config::load(&cli.config)?;
            if !config.schedule_enabled {
                println!("Scheduled runs are disabled");
            } else {
                let time = schedule::parse_time_of_day(&config.schedule_time_of_day);
                let next = schedule::next_run_after(chrono::Local::now().naive_local(), time);
                println!("Next run: {}", next.format("%Y-%m-%d %H:%M"));
            }
        }
        Command::GenConfig => {
            print!("{}", config::stock_config_toml());
        }
    }

    Ok(())
}
