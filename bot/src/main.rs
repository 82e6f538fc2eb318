use std::path::{Path, PathBuf};

use anyhow::{Context, anyhow};
use clap::{Parser, Subcommand};
use futures::StreamExt;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use voice_bot::config::BotConfig;
use voice_bot::core::audio::pcm16_to_wav;
use voice_bot::core::bot::BotPlan;
use voice_bot::core::prompt::{KnowledgeBase, SystemPrompt};
use voice_bot::core::tts::{BaseTTS, MurfTTS, TTSEvent};

/// Voice bot - STT / LLM / TTS configuration and Murf speech adapter
#[derive(Parser, Debug)]
#[command(name = "voice-bot")]
#[command(version, about, long_about = None)]
struct Cli {
    /// Path to configuration file (YAML)
    #[arg(short = 'c', long = "config", value_name = "FILE")]
    config: Option<PathBuf>,

    /// Subcommand to run
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Synthesize text with Murf and write the audio to a file
    Speak {
        /// Text to speak
        text: String,

        /// Output file; a `.wav` extension writes a WAV container, anything else raw PCM16
        #[arg(short = 'o', long = "output", default_value = "speech.pcm")]
        output: PathBuf,
    },

    /// Print the rendered system prompt
    Prompt,

    /// Resolve the bot plan and print the selected providers
    Check,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env file if it exists (must be done before config loading)
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();

    let config = if let Some(config_path) = cli.config.as_ref() {
        info!("Loading configuration from {}", config_path.display());
        BotConfig::from_file(config_path)?
    } else {
        BotConfig::from_env()?
    };

    match cli.command {
        Commands::Speak { text, output } => speak(&config, &text, &output).await,
        Commands::Prompt => {
            let knowledge = KnowledgeBase::load(&config.knowledge_file)?;
            println!("{}", SystemPrompt::render(&knowledge, &config.bot_language));
            Ok(())
        }
        Commands::Check => {
            let plan = BotPlan::from_config(&config)?;
            println!("{}", serde_json::to_string_pretty(&plan.summary())?);
            Ok(())
        }
    }
}

async fn speak(config: &BotConfig, text: &str, output: &Path) -> anyhow::Result<()> {
    let tts = MurfTTS::new(config.murf_tts_config()?)?;

    let mut pcm = Vec::new();
    let mut format = None;
    let mut events = tts.synthesize(text);

    while let Some(event) = events.next().await {
        match event {
            TTSEvent::Started => info!("Synthesis started"),
            TTSEvent::AudioChunk(frame) => {
                format.get_or_insert((frame.sample_rate, frame.channels));
                pcm.extend_from_slice(&frame.data);
            }
            TTSEvent::Stopped => info!(audio_bytes = pcm.len(), "Synthesis stopped"),
            TTSEvent::Error(e) => {
                warn!(kind = %e.kind(), "Synthesis failed");
                return Err(anyhow!("{}: {e}", e.kind()));
            }
        }
    }

    let (sample_rate, channels) = format.context("Murf returned no audio")?;

    let is_wav = output
        .extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case("wav"));
    let bytes = if is_wav {
        pcm16_to_wav(&pcm, sample_rate, channels)?
    } else {
        pcm
    };

    tokio::fs::write(output, &bytes)
        .await
        .with_context(|| format!("Failed to write {}", output.display()))?;

    println!(
        "Wrote {} bytes ({} Hz, {} channel(s)) to {}",
        bytes.len(),
        sample_rate,
        channels,
        output.display()
    );
    Ok(())
}
