use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
mod auth;
mod io;
mod logging;
use crypter::crypto::AeadPrimitive;
use crypter::{Crypter, DirectEngine, Engine, KdfParams, Layout, SubtleEngine, format};
use std::path::PathBuf;
use tracing::debug;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum EngineKind {
    /// Detached-tag cipher API
    Direct,
    /// Combined-output cipher API
    Subtle,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum LayoutArg {
    /// salt | nonce | tag | ciphertext
    Detached,
    /// salt | nonce | ciphertext | tag
    Combined,
}

impl From<LayoutArg> for Layout {
    fn from(arg: LayoutArg) -> Self {
        match arg {
            LayoutArg::Detached => Layout::Detached,
            LayoutArg::Combined => Layout::Combined,
        }
    }
}

#[derive(Debug, clap::Args)]
struct CipherArgs {
    /// Cipher backend
    #[arg(long, value_enum, default_value_t = EngineKind::Direct)]
    engine: EngineKind,

    /// Envelope layout (default: the engine's native layout)
    #[arg(long, value_enum)]
    layout: Option<LayoutArg>,

    /// Additional authenticated data; must be repeated on decrypt
    #[arg(long)]
    aad: Option<String>,

    /// PBKDF2 iteration count (default: 100000)
    #[arg(long, env = "CRYPTER_ITERATIONS")]
    iterations: Option<u32>,

    /// Read the secret from this file instead of CRYPTER_SECRET or a prompt
    #[arg(long, value_name = "PATH")]
    secret_file: Option<PathBuf>,
}

impl CipherArgs {
    fn to_kdf_params(&self) -> Result<KdfParams> {
        match self.iterations {
            Some(iterations) => Ok(KdfParams::new(iterations)?),
            None => Ok(KdfParams::default()),
        }
    }

    fn build(&self) -> Result<Box<dyn Crypter>> {
        let secret = auth::read_secret(self.secret_file.as_deref())?;
        let kdf = self.to_kdf_params()?;
        let layout = self.layout.map(Layout::from);

        match self.engine {
            EngineKind::Direct => configure(DirectEngine::with_kdf(&*secret, kdf)?, layout),
            EngineKind::Subtle => configure(SubtleEngine::with_kdf(&*secret, kdf)?, layout),
        }
    }

    fn aad(&self) -> Option<&[u8]> {
        self.aad.as_deref().map(str::as_bytes)
    }
}

fn configure<P: AeadPrimitive + 'static>(
    engine: Engine<P>,
    layout: Option<Layout>,
) -> Result<Box<dyn Crypter>> {
    let engine = match layout {
        Some(layout) => engine.with_layout(layout),
        None => engine,
    };
    debug!(layout = %engine.layout(), iterations = engine.kdf().iterations(), "engine ready");
    Ok(Box::new(engine))
}

#[derive(Debug, clap::Args)]
struct IoArgs {
    /// Input file (default: stdin)
    #[arg(short, long, value_name = "PATH")]
    input: Option<PathBuf>,

    /// Output file, written atomically (default: stdout)
    #[arg(short, long, value_name = "PATH")]
    output: Option<PathBuf>,
}

#[derive(Debug, Parser)]
#[command(name = "crypter")]
#[command(
    version,
    about = "Seal and open password-based AES-256-GCM envelopes."
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Encrypts a payload into an envelope
    Encrypt {
        #[command(flatten)]
        cipher: CipherArgs,
        #[command(flatten)]
        io: IoArgs,
    },

    /// Decrypts an envelope back into the payload
    Decrypt {
        #[command(flatten)]
        cipher: CipherArgs,
        #[command(flatten)]
        io: IoArgs,
    },

    /// Prints the fields of an envelope as JSON
    Inspect {
        /// Layout the envelope was written in
        #[arg(long, value_enum, default_value_t = LayoutArg::Detached)]
        layout: LayoutArg,

        /// Input file (default: stdin)
        #[arg(short, long, value_name = "PATH")]
        input: Option<PathBuf>,
    },

    /// Moves the tag of an envelope to the other layout
    Relayout {
        #[arg(long, value_enum)]
        from: LayoutArg,

        #[arg(long, value_enum)]
        to: LayoutArg,

        #[command(flatten)]
        io: IoArgs,
    },
}

fn main() -> Result<()> {
    let args = Cli::parse();
    logging::init()?;

    match args.command {
        Commands::Encrypt { cipher, io: files } => {
            let engine = cipher.build()?;
            let plaintext = io::read_input(files.input.as_deref())?;
            let envelope = engine.encrypt(&plaintext, cipher.aad())?;
            io::write_output(files.output.as_deref(), &envelope)?;
        }
        Commands::Decrypt { cipher, io: files } => {
            let engine = cipher.build()?;
            let envelope = io::read_input(files.input.as_deref())?;
            let plaintext = engine.decrypt(&envelope, cipher.aad())?;
            io::write_output(files.output.as_deref(), &plaintext)?;
        }
        Commands::Inspect { layout, input } => {
            let data = io::read_input(input.as_deref())?;
            let envelope = format::decode(&data, layout.into())?;
            let info = serde_json::to_string_pretty(&envelope.info())
                .context("failed to serialize envelope info")?;
            println!("{info}");
        }
        Commands::Relayout { from, to, io: files } => {
            let data = io::read_input(files.input.as_deref())?;
            let converted = format::relayout(&data, from.into(), to.into())?;
            io::write_output(files.output.as_deref(), &converted)?;
        }
    }

    Ok(())
}
