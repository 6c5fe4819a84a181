use clap::{Parser, Subcommand};
use nft_forge::asset::{Asset, AssetId, AspectRatio, decode_data_uri};
use nft_forge::compositing::{RasterCompositor, Rotation};
use nft_forge::config::Config;
use nft_forge::generation::GeminiBackend;
use nft_forge::session::{Session, ViewMode};
use nft_forge::share::{SharePlatform, download_filename, share_url};
use nft_forge::store::StateStore;
use std::path::PathBuf;

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
#[command(name = "nft-forge")]
#[command(about = "Generate, edit, and list AI images from the command line")]
#[command(long_about = "\
Generate, edit, and list AI images from the command line

Assets live in a local history capped at 12: generating a 13th evicts the
oldest (and unlists it). Every command persists state before it returns, so
runs compose naturally:

  nft-forge generate \"a golden dragon\" --aspect-ratio 16:9
  nft-forge history
  nft-forge edit 3f2a --grayscale 100 --rotation 90
  nft-forge share 3f2a x
  nft-forge download 3f2a --out ~/Pictures

Asset ids may be abbreviated to any unique prefix (the first 8 characters
shown by 'history' always work).

The generate command calls the Gemini API and needs a credential: set
GEMINI_API_KEY, or api_key in <config dir>/nft-forge/config.toml.")]
#[command(version = version_string())]
struct Cli {
    /// Config file (default: <config dir>/nft-forge/config.toml if present)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Directory holding history.json and listed.json
    #[arg(long, global = true)]
    state_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Generate a new asset from a text prompt
    Generate {
        prompt: String,
        #[arg(long, default_value = "1:1", value_parser = parse_aspect_ratio)]
        aspect_ratio: AspectRatio,
    },
    /// Show the asset history, newest first
    History,
    /// Show one asset in detail
    Show { id: String },
    /// Apply filters and rotation to an asset, in place
    Edit {
        id: String,
        /// Brightness percentage, 0-200 (100 = unchanged)
        #[arg(long, default_value_t = 100)]
        brightness: u32,
        /// Contrast percentage, 0-200 (100 = unchanged)
        #[arg(long, default_value_t = 100)]
        contrast: u32,
        /// Grayscale percentage, 0-100 (0 = unchanged)
        #[arg(long, default_value_t = 0)]
        grayscale: u32,
        /// Sepia percentage, 0-100 (0 = unchanged)
        #[arg(long, default_value_t = 0)]
        sepia: u32,
        /// Rotation in degrees, any multiple of 90
        #[arg(long, default_value_t = 0, allow_hyphen_values = true)]
        rotation: i32,
    },
    /// Delete an asset (also unlists and deselects it)
    Delete { id: String },
    /// Mark an asset as listed on the marketplace
    List { id: String },
    /// Show the marketplace (listed assets only)
    Marketplace,
    /// Print the share URL for an asset and mark it listed
    Share {
        id: String,
        #[arg(value_parser = parse_share_platform)]
        platform: SharePlatform,
        /// Address the share links point back to
        #[arg(long, default_value = "https://nft-forge.example/")]
        page_url: String,
    },
    /// Save an asset's raster as a PNG file
    Download {
        id: String,
        /// Output directory (default: current directory)
        #[arg(long)]
        out: Option<PathBuf>,
    },
}

fn parse_aspect_ratio(s: &str) -> Result<AspectRatio, String> {
    s.parse()
        .map_err(|e: nft_forge::asset::ParseAspectRatioError| e.to_string())
}

fn parse_share_platform(s: &str) -> Result<SharePlatform, String> {
    s.parse()
        .map_err(|e: nft_forge::share::ParseSharePlatformError| e.to_string())
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let config = Config::load(cli.config.as_deref(), cli.state_dir.as_deref())?;
    let mut session = Session::open(StateStore::new(&config.state_dir));

    match cli.command {
        Command::Generate {
            prompt,
            aspect_ratio,
        } => {
            let backend = GeminiBackend::new(&config)?;
            let runtime = tokio::runtime::Builder::new_current_thread()
                .enable_all()
                .build()?;
            let id = runtime.block_on(session.generate(&backend, &prompt, aspect_ratio))?;
            let asset = session
                .selected_asset()
                .ok_or("generated asset missing from history")?;
            println!("Generated {} ({})", id.short(), asset.aspect_ratio);
        }
        Command::History => {
            if session.history().is_empty() {
                println!("No assets yet. Try: nft-forge generate \"a golden dragon\"");
            }
            for asset in session.history().iter() {
                println!("{}", history_line(asset, session.is_listed(&asset.id)));
            }
        }
        Command::Show { id } => {
            let id = resolve_id(&session, &id)?;
            let asset = session
                .history()
                .get(&id)
                .ok_or("asset disappeared mid-command")?;
            println!("id:           {}", asset.id);
            println!("prompt:       {}", asset.prompt);
            println!("aspect ratio: {}", asset.aspect_ratio);
            println!(
                "created:      {}",
                asset.created_at.format("%Y-%m-%d %H:%M:%S UTC")
            );
            println!(
                "listed:       {}",
                if session.is_listed(&asset.id) { "yes" } else { "no" }
            );
            println!(
                "image:        {} bytes (PNG)",
                decode_data_uri(&asset.image_data)?.len()
            );
        }
        Command::Edit {
            id,
            brightness,
            contrast,
            grayscale,
            sepia,
            rotation,
        } => {
            let rotation = Rotation::from_degrees(rotation)
                .ok_or("rotation must be a multiple of 90 degrees")?;
            let id = resolve_id(&session, &id)?;
            session.select(&id)?;
            session.enter_edit()?;
            {
                let params = session.edit_params_mut()?;
                params.set_brightness(brightness);
                params.set_contrast(contrast);
                params.set_grayscale(grayscale);
                params.set_sepia(sepia);
                params.rotation = rotation;
            }
            session.save_edit(&RasterCompositor::new())?;
            println!("Edited {}", id.short());
        }
        Command::Delete { id } => {
            let id = resolve_id(&session, &id)?;
            session.delete(&id)?;
            println!("Deleted {}", id.short());
        }
        Command::List { id } => {
            let id = resolve_id(&session, &id)?;
            session.mark_listed(&id)?;
            println!("Listed {}", id.short());
        }
        Command::Marketplace => {
            session.switch_view(ViewMode::Marketplace);
            let mut any = false;
            for asset in session.listed_assets() {
                println!("{}", history_line(asset, true));
                any = true;
            }
            if !any {
                println!("Nothing listed yet. Try: nft-forge list <id>");
            }
        }
        Command::Share {
            id,
            platform,
            page_url,
        } => {
            let id = resolve_id(&session, &id)?;
            let asset = session
                .history()
                .get(&id)
                .ok_or("asset disappeared mid-command")?;
            let url = share_url(platform, asset, &page_url);
            println!("{url}");
            // Sharing implies listing, via the same idempotent path as `list`.
            session.mark_listed(&id)?;
        }
        Command::Download { id, out } => {
            let id = resolve_id(&session, &id)?;
            let asset = session
                .history()
                .get(&id)
                .ok_or("asset disappeared mid-command")?;
            let bytes = decode_data_uri(&asset.image_data)?;
            let dir = out.unwrap_or_else(|| PathBuf::from("."));
            std::fs::create_dir_all(&dir)?;
            let path = dir.join(download_filename(&asset.prompt));
            std::fs::write(&path, bytes)?;
            println!("Saved {}", path.display());
        }
    }

    Ok(())
}

/// One history line: short id, aspect ratio, listed marker, prompt.
fn history_line(asset: &Asset, listed: bool) -> String {
    format!(
        "{}  {:>5}  {}  {}",
        asset.id.short(),
        asset.aspect_ratio,
        if listed { "[listed]" } else { "        " },
        asset.prompt
    )
}

/// Resolve an id or unique id prefix against the history.
fn resolve_id(session: &Session, prefix: &str) -> Result<AssetId, String> {
    let matches: Vec<&Asset> = session
        .history()
        .iter()
        .filter(|a| a.id.as_str().starts_with(prefix))
        .collect();
    match matches.len() {
        0 => Err(format!("no asset matches id '{prefix}'")),
        1 => Ok(matches[0].id.clone()),
        n => Err(format!("id '{prefix}' is ambiguous ({n} matches)")),
    }
}
