use clap::{Parser, Subcommand};
use kaos::cli::{
    decrypt_file, dump_keystream, encrypt_file, export_trace, generate_key_file, EncryptOptions,
    KeystreamOptions, TraceOptions,
};
use kaos::trace::TRACE_WARMUP_DEFAULT;
use std::path::PathBuf;
use std::process::ExitCode;
use tracing_subscriber::filter::LevelFilter;
use tracing_subscriber::EnvFilter;

/// Version info from build.rs
const VERSION: &str = env!("KAOS_VERSION");
const BUILD: &str = env!("KAOS_BUILD");
const PROFILE: &str = env!("KAOS_PROFILE");
const GIT_HASH: &str = env!("KAOS_GIT_HASH");

fn get_version() -> &'static str {
    use std::sync::OnceLock;
    static VERSION_STRING: OnceLock<String> = OnceLock::new();
    VERSION_STRING.get_or_init(|| format!("{} {} build {} ({})", PROFILE, VERSION, BUILD, GIT_HASH))
}

#[derive(Parser)]
#[command(name = "kaos")]
#[command(about = "Stream cipher driven by a Lorenz chaotic attractor", long_about = None)]
struct Cli {
    /// Print version
    #[arg(short = 'V', long)]
    version: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate a key file (32-byte key followed by 12-byte nonce)
    #[command(alias = "k")]
    Keygen {
        /// Key file to create
        output: PathBuf,
    },

    /// Encrypt a file
    #[command(alias = "e")]
    Encrypt {
        /// Key file
        #[arg(long, required = true)]
        key: PathBuf,

        /// Encrypt under a fresh nonce and write the new key material here
        /// (the input key file is left untouched)
        #[arg(long)]
        key_out: Option<PathBuf>,

        /// Input file
        input: PathBuf,

        /// Output file
        output: PathBuf,
    },

    /// Decrypt a file
    #[command(alias = "d")]
    Decrypt {
        /// Key file
        #[arg(long, required = true)]
        key: PathBuf,

        /// Input file
        input: PathBuf,

        /// Output file
        output: PathBuf,
    },

    /// Dump raw keystream for external test suites
    Keystream {
        /// Number of bytes to generate
        size: usize,

        /// Output file
        output: PathBuf,

        /// Key file (default: fixed test key 0x42.., nonce 0x99..)
        #[arg(long)]
        key: Option<PathBuf>,
    },

    /// Export the attractor trajectory as JSON
    Trace {
        /// Output JSON file
        output: PathBuf,

        /// Message whose keystream is traced
        #[arg(long, default_value = "Hello KAOS")]
        text: String,

        /// Key file (default: random key material)
        #[arg(long)]
        key: Option<PathBuf>,

        /// Warmup steps to capture
        #[arg(long, default_value_t = TRACE_WARMUP_DEFAULT)]
        warmup: u32,
    },
}

fn main() -> ExitCode {
    let filter = EnvFilter::builder()
        .with_default_directive(LevelFilter::WARN.into())
        .from_env_lossy();
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    if cli.version {
        println!("kaos {}", get_version());
        return ExitCode::SUCCESS;
    }

    let command = match cli.command {
        Some(cmd) => cmd,
        None => {
            use clap::CommandFactory;
            if Cli::command().print_help().is_err() {
                return ExitCode::FAILURE;
            }
            println!();
            return ExitCode::SUCCESS;
        }
    };

    let result = match command {
        Commands::Keygen { output } => generate_key_file(&output).map(|material| {
            println!("Key written to {}", output.display());
            println!("Fingerprint: {}", material.fingerprint());
        }),

        Commands::Encrypt {
            key,
            key_out,
            input,
            output,
        } => {
            let options = EncryptOptions {
                key_file: key,
                key_out,
            };
            encrypt_file(&input, &output, &options).map(|bytes| {
                println!("Encrypted {} bytes to {}", bytes, output.display());
                if let Some(key_out) = &options.key_out {
                    println!("Key material written to {}", key_out.display());
                }
            })
        }

        Commands::Decrypt { key, input, output } => {
            decrypt_file(&input, &output, &key).map(|bytes| {
                println!("Decrypted {} bytes to {}", bytes, output.display());
            })
        }

        Commands::Keystream { size, output, key } => {
            let options = KeystreamOptions {
                size,
                key_file: key,
            };
            dump_keystream(&output, &options).map(|report| print!("{}", report))
        }

        Commands::Trace {
            output,
            text,
            key,
            warmup,
        } => {
            let options = TraceOptions {
                text,
                key_file: key,
                warmup,
            };
            export_trace(&output, &options).map(|report| print!("{}", report))
        }
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {}", e);
            ExitCode::FAILURE
        }
    }
}
