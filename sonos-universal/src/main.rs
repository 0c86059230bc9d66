use anyhow::{anyhow, bail, Context, Result};
use clap::{Parser, Subcommand};
use sonos_api::SonosClient;
use sonos_universal::{
    commands, discovery, init_logging, init_logging_from_env, message, LoggingMode, Outcome,
    SsdpScanner, UniversalConfig, UniversalNode,
};
use std::io::Read;
use std::path::PathBuf;
use std::time::Duration;

/// Sonos Universal
///
/// Sends one JSON message through a node bound to a Sonos player and prints
/// the outbound message.
#[derive(Parser, Debug)]
#[command(name = "sonos-universal")]
#[command(about = "Control Sonos groups, players and the household with JSON messages")]
#[command(version)]
struct Args {
    /// Log mode (silent, development, debug, json); falls back to SONOS_LOG_MODE
    #[arg(long, global = true)]
    log_mode: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Process one message
    Run {
        /// JSON configuration file
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Player IP address
        #[arg(long)]
        ip: Option<String>,

        /// Player serial number, used when no valid IP address is given
        #[arg(long)]
        serial: Option<String>,

        /// Fixed command instead of the one in the message
        #[arg(long = "cmd")]
        fixed_command: Option<String>,

        /// Command in `payload`, value in `topic`
        #[arg(long)]
        compatibility: bool,

        /// The message as JSON, `-` reads it from stdin
        message: String,
    },

    /// List the players of the household
    Discover {
        /// Label players by serial number instead of IP address
        #[arg(long)]
        serial: bool,

        /// Search window in milliseconds
        #[arg(short, long, default_value = "4000")]
        timeout: u64,
    },

    /// List every supported command
    Commands,
}

fn main() -> Result<()> {
    let args = Args::parse();

    match args.log_mode.as_deref() {
        Some(name) => {
            let mode = LoggingMode::from_name(name)
                .ok_or_else(|| anyhow!("unknown log mode {}", name))?;
            init_logging(mode)?;
        }
        None => init_logging_from_env()?,
    }

    match args.command {
        Command::Run {
            config,
            ip,
            serial,
            fixed_command,
            compatibility,
            message,
        } => {
            let mut config = match config {
                Some(path) => UniversalConfig::from_file(&path)?,
                None => UniversalConfig::default(),
            };
            if ip.is_some() {
                config.ip_address = ip;
            }
            if serial.is_some() {
                config.serial_number = serial;
            }
            if let Some(command) = fixed_command {
                config.command = command;
            }
            config.compatibility_mode |= compatibility;

            run(config, &message)
        }
        Command::Discover { serial, timeout } => discover(serial, Duration::from_millis(timeout)),
        Command::Commands => {
            for name in commands::command_names() {
                println!("{}", name);
            }
            Ok(())
        }
    }
}

fn run(config: UniversalConfig, raw_message: &str) -> Result<()> {
    let text = if raw_message == "-" {
        let mut buffer = String::new();
        std::io::stdin()
            .read_to_string(&mut buffer)
            .context("Failed to read message from stdin")?;
        buffer
    } else {
        raw_message.to_string()
    };
    let value = serde_json::from_str(&text).context("Message is not valid JSON")?;
    let msg = message::from_value(value)?;

    let node = UniversalNode::setup(config, &SsdpScanner, Box::new(SonosClient::new()))?;
    match node.process(msg) {
        Outcome::Sent { message, .. } => {
            println!("{}", serde_json::to_string_pretty(&message)?);
            Ok(())
        }
        Outcome::Failed { failure, status } => {
            eprintln!("{}", serde_json::to_string(&status)?);
            bail!("{} ({})", failure.short, failure.details)
        }
    }
}

fn discover(by_serial: bool, window: Duration) -> Result<()> {
    let client = SonosClient::new();
    let choices = if by_serial {
        discovery::discover_all_with_serial(&SsdpScanner, &client, window)?
    } else {
        discovery::discover_all_with_host(&SsdpScanner, &client, window)?
    };

    if choices.is_empty() {
        println!("No players found");
    }
    for choice in choices {
        println!("{}", choice.label);
    }
    Ok(())
}
