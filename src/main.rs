use anyhow::Context;
use clap::{Parser, Subcommand};
use parley::audio::{MicCapture, MicListener};
use parley::dispatch::DispatcherBuilder;
use parley::services::SystemOpener;
use parley::speech::{ProcessSynthesizer, WakeWords, WhisperClient};
use parley::telemetry::TelemetryRecorder;
use parley::voice::{VoiceLoop, VoiceTimings};
use parley::web::{self, AppState};
use parley::{demo, AssistantConfig};
use ringbuf::traits::Split;
use ringbuf::HeapRb;
use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::io::BufReader;
use tokio_util::sync::CancellationToken;
use tracing_subscriber::{EnvFilter, FmtSubscriber};

/// Room for a few seconds of 48kHz mono while a command is being handled.
const RING_CAPACITY: usize = 48_000 * 4;

#[derive(Parser, Debug)]
#[command(name = "parley")]
#[command(about = "Voice and text command assistant")]
struct Args {
    /// TOML config file (defaults to $PARLEY_CONFIG, then built-in defaults)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Type commands instead of speaking them
    Demo {
        /// Actually open websites in the system browser
        #[arg(long)]
        open_browser: bool,
    },
    /// Run a fixed script of commands and print the results
    Auto {
        /// Pause between scripted commands, in milliseconds
        #[arg(long, default_value_t = 500)]
        pause_ms: u64,
    },
    /// Serve the browser chat API
    Serve {
        /// Listen address, overrides the config file
        #[arg(short, long)]
        bind: Option<String>,
    },
    /// Wake-word voice loop on the default microphone
    Voice,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // 1. Setup Logging (stderr, so demo output stays clean)
    let subscriber = FmtSubscriber::builder()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .finish();
    tracing::subscriber::set_global_default(subscriber).context("setting default subscriber failed")?;

    // 2. Load Config
    let args = Args::parse();
    let config = AssistantConfig::resolve(args.config.as_deref())?;

    // 3. Run Front-end
    match args.command {
        Command::Demo { open_browser } => {
            let mut builder = DispatcherBuilder::from_config(&config);
            if open_browser {
                builder = builder.opener(Arc::new(SystemOpener));
            }
            let dispatcher = builder.build()?;

            let input = BufReader::new(tokio::io::stdin());
            let mut out = std::io::stdout();
            demo::run_interactive(&dispatcher, input, &mut out).await?;
        }
        Command::Auto { pause_ms } => {
            let dispatcher = DispatcherBuilder::from_config(&config).build()?;
            let mut out = std::io::stdout();
            demo::run_auto(&dispatcher, &mut out, Duration::from_millis(pause_ms)).await?;
        }
        Command::Serve { bind } => {
            let bind = bind.unwrap_or_else(|| config.server.bind.clone());
            let addr: SocketAddr = bind.parse().with_context(|| format!("invalid bind address '{}'", bind))?;

            let dispatcher = Arc::new(DispatcherBuilder::from_config(&config).build()?);
            let state = Arc::new(AppState::new(dispatcher));
            let shutdown = shutdown_on_ctrl_c();
            web::serve(addr, state, shutdown).await?;
        }
        Command::Voice => run_voice(&config).await?,
    }

    Ok(())
}

async fn run_voice(config: &AssistantConfig) -> anyhow::Result<()> {
    tracing::info!("Starting voice assistant...");

    // Audio Stack: mic -> ring buffer -> listener
    let rb = HeapRb::<f32>::new(RING_CAPACITY);
    let (producer, consumer) = rb.split();

    // The capture holds the stream; it must stay alive for the whole loop
    let capture = MicCapture::open(producer).context("Failed to initialize audio capture")?;
    tracing::info!("Audio capture initialized at {}Hz", capture.sample_rate);

    let transcriber = WhisperClient::new(
        config.speech.transcription_url.clone(),
        Duration::from_millis(config.speech.transcription_timeout_ms),
    );
    let listener = Arc::new(MicListener::new(consumer, capture.sample_rate, transcriber));
    let synth = Arc::new(ProcessSynthesizer::spawn(&config.tts).await);

    let dispatcher = Arc::new(
        DispatcherBuilder::from_config(config)
            .opener(Arc::new(SystemOpener))
            .build()?,
    );

    let telemetry = Arc::new(Mutex::new(TelemetryRecorder::new()));
    let voice = VoiceLoop::new(
        dispatcher,
        listener,
        synth,
        WakeWords::from_config(config),
        VoiceTimings::from_config(config),
    )
    .with_telemetry(telemetry.clone());

    voice.run(shutdown_on_ctrl_c()).await;
    voice.drain_speech(Duration::from_secs(5)).await;

    let snapshot = telemetry.lock().unwrap_or_else(|poisoned| poisoned.into_inner()).snapshot();
    tracing::info!(
        wakes = snapshot.voice_stats.wakes,
        commands = snapshot.dispatch_stats.total,
        missed = snapshot.voice_stats.missed,
        "Voice session ended"
    );

    drop(capture);
    Ok(())
}

fn shutdown_on_ctrl_c() -> CancellationToken {
    let token = CancellationToken::new();
    let trigger = token.clone();
    tokio::spawn(async move {
        match tokio::signal::ctrl_c().await {
            Ok(()) => {
                tracing::info!("Ctrl+C received, shutting down");
                trigger.cancel();
            }
            Err(e) => tracing::warn!("Ctrl+C handler unavailable: {}", e),
        }
    });
    token
}
