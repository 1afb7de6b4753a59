use clap::{Parser, Subcommand};
use pixel_stego::config::{Config, DEFAULT_LOG_FILTER, STORE_ENV};
use pixel_stego::{
    calculate_capacity, embed_to_png, extract_message, resolve_length, text_from_units,
    units_from_text, CarrierStore, LengthSource,
};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{error, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// pixel-stego - hide a message in the channel samples of an image
///
/// The carrier must stay byte-identical between embed and extract. The
/// message length is recorded in a local carrier store, or passed by hand.
#[derive(Parser)]
#[command(name = "pixel-stego")]
#[command(version)]
#[command(about = "Channel-sample steganography", long_about = None)]
struct Cli {
    /// Carrier store file
    #[arg(long, global = true, env = STORE_ENV)]
    store: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Embed a secret message into an image
    Embed {
        /// Input carrier image path
        #[arg(short, long)]
        input: PathBuf,

        /// Output stego image path (PNG)
        #[arg(short, long)]
        output: PathBuf,

        /// Secret message (text)
        #[arg(short, long, conflicts_with = "file")]
        message: Option<String>,

        /// Secret message file path (raw units, each byte must be below 255)
        #[arg(short, long)]
        file: Option<PathBuf>,

        /// Do not record the carrier in the store
        #[arg(long)]
        no_store: bool,
    },
    /// Extract a hidden message from a stego image
    Extract {
        /// Stego image with hidden data
        #[arg(short, long)]
        stego: PathBuf,

        /// Message length; skips the store lookup
        #[arg(short, long)]
        length: Option<usize>,

        /// Output file for extracted message (optional)
        #[arg(short = 'O', long)]
        output: Option<PathBuf>,
    },
    /// Show image capacity information
    Info {
        /// Image file path
        #[arg(short, long)]
        image: PathBuf,
    },
    /// List carriers recorded in the store
    List,
}

fn print_banner() {
    println!("╔══════════════════════════════════════════╗");
    println!("║   pixel-stego v{:<26}║", pixel_stego::VERSION);
    println!("║   Channel-Sample Carrier Codec           ║");
    println!("╚══════════════════════════════════════════╝");
    println!();
}

/// Validate that the output format is lossless (not JPEG)
fn validate_lossless_format(path: &Path) -> anyhow::Result<()> {
    let Some(ext) = path.extension() else {
        return Err(anyhow::anyhow!("Output file must have an extension (e.g., .png)"));
    };
    let ext_lower = ext.to_string_lossy().to_lowercase();
    match ext_lower.as_str() {
        "jpg" | "jpeg" => Err(anyhow::anyhow!(
            "JPEG is a lossy format and will destroy hidden data!\n\
             Use PNG instead, e.g. change 'stego.jpg' to 'stego.png'"
        )),
        "png" => Ok(()),
        _ => {
            warn!(extension = %ext_lower, "carrier is always written as PNG data");
            Ok(())
        }
    }
}

fn init_tracing() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| DEFAULT_LOG_FILTER.into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

fn main() -> anyhow::Result<()> {
    init_tracing();
    print_banner();

    let cli = Cli::parse();
    let config = Config::resolve(cli.store);

    match cli.command {
        Commands::Embed {
            input,
            output,
            message,
            file,
            no_store,
        } => {
            validate_lossless_format(&output)?;

            println!("[*] Loading carrier image: {}", input.display());
            let carrier = image::open(&input)?;
            println!("[✓] Image loaded: {}x{}", carrier.width(), carrier.height());

            let units = if let Some(msg) = message {
                units_from_text(&msg)?
            } else if let Some(file_path) = file {
                println!("[*] Reading message from file: {}", file_path.display());
                fs::read(file_path)?
            } else {
                return Err(anyhow::anyhow!("Please provide either --message or --file"));
            };
            println!("[*] Message length: {} units", units.len());

            let capacity = calculate_capacity(&carrier);
            println!("[*] Collision-free capacity: {} units", capacity);
            if units.len() > capacity {
                warn!(
                    units = units.len(),
                    capacity,
                    "message exceeds capacity; extraction will not reproduce it"
                );
            }

            println!("[*] Embedding message...");
            let stego = embed_to_png(&carrier, &units)?;

            println!("[*] Saving stego image to: {}", output.display());
            fs::write(&output, &stego)?;

            if no_store {
                println!("[!] Not recorded; pass --length {} to extract", units.len());
            } else {
                let mut store = CarrierStore::open(&config.store_path)?;
                let id = store.insert(&stego, units.len()).id;
                store.save()?;
                println!("[✓] Carrier recorded as {} in {}", id, store.path().display());
            }

            println!("[✓] Success! Message embedded.");
        }

        Commands::Extract {
            stego,
            length,
            output,
        } => {
            println!("[*] Loading stego image: {}", stego.display());
            let carrier = fs::read(&stego)?;

            let extracted = resolve_length(length, &config.store_path, &carrier)
                .and_then(|(length, source)| {
                    if let LengthSource::Record(id) = source {
                        println!("[✓] Carrier matches record {}", id);
                    }
                    println!("[*] Extracting {} units...", length);
                    extract_message(&carrier, length)
                });
            let extracted = match extracted {
                Ok(units) => units,
                Err(e) => {
                    error!("{e}");
                    println!("{}", e.user_message());
                    return Err(e.into());
                }
            };
            println!("[✓] Extraction successful! {} units extracted", extracted.len());

            if let Some(out_path) = output {
                println!("[*] Saving extracted message to: {}", out_path.display());
                fs::write(out_path, &extracted)?;
                println!("[✓] Message saved to file");
            } else {
                println!("\n╔═══════════════════════════════════════╗");
                println!("║         Extracted Message:            ║");
                println!("╚═══════════════════════════════════════╝");
                println!("{}", text_from_units(&extracted));
            }
        }

        Commands::Info { image } => {
            println!("[*] Analyzing image: {}", image.display());
            let img = image::open(&image)?;
            let capacity = calculate_capacity(&img);

            println!("\n╔═══════════════════════════════════════╗");
            println!("║         Image Information:            ║");
            println!("╠═══════════════════════════════════════╣");
            println!("║ Dimensions: {}x{}", img.width(), img.height());
            println!("║ Samples:    {}", img.width() as u64 * img.height() as u64 * 3);
            println!("║ Capacity:   {} units", capacity);
            println!("╚═══════════════════════════════════════╝");
        }

        Commands::List => {
            let store = CarrierStore::open(&config.store_path)?;
            println!("[*] Store: {}", store.path().display());
            if store.records().is_empty() {
                println!("[!] No carriers recorded");
            }
            for record in store.records() {
                println!(
                    "{}  {}  {:>6} units  {}",
                    record.id,
                    record.created_at.to_rfc3339(),
                    record.message_length,
                    record.short_digest()
                );
            }
        }
    }

    Ok(())
}
