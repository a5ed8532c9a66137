// SPDX-License-Identifier: Apache-2.0 OR MIT

//! mtrack-echo - Echo tracking frames in real-time
//!
//! Listens on a UDP data port (or connects to a controller and starts
//! measurement) and prints each decoded frame.

use chrono::Local;
use clap::Parser;
use colored::*;
use mtrack::{ChannelStatus, Config, Error, Tracker};
use std::io::{self, IsTerminal, Write};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// Echo tracking frames in real-time
#[derive(Parser, Debug)]
#[command(name = "mtrack-echo")]
#[command(version = "0.1.0")]
#[command(about = "Echo decoded tracking frames from a controller data stream")]
struct Args {
    /// Local UDP data port (0 = auto-assign)
    port: u16,

    /// Controller host; when set, measurement is started over the
    /// control channel before listening
    #[arg(short, long)]
    server: Option<String>,

    /// Output format: pretty, compact
    #[arg(short, long, default_value = "pretty")]
    format: OutputFormat,

    /// Maximum number of frames to print (0 = unlimited)
    #[arg(short = 'n', long, default_value = "0")]
    count: u64,

    /// Print every record, not just per-type counts
    #[arg(short, long)]
    verbose: bool,

    /// Disable colored output
    #[arg(long)]
    no_color: bool,

    /// Quiet mode - only output frames, no headers
    #[arg(short = 'q', long)]
    quiet: bool,
}

#[derive(Clone, Debug, PartialEq)]
enum OutputFormat {
    Pretty,
    Compact,
}

impl std::str::FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "pretty" | "p" => Ok(OutputFormat::Pretty),
            "compact" | "c" => Ok(OutputFormat::Compact),
            _ => Err(format!("Unknown format: {}", s)),
        }
    }
}

fn main() {
    let args = Args::parse();

    if args.no_color || !io::stdout().is_terminal() {
        colored::control::set_override(false);
    }

    if let Err(e) = run_echo(&args) {
        eprintln!("{}: {}", "Error".red().bold(), e);
        std::process::exit(1);
    }
}

fn run_echo(args: &Args) -> Result<(), Box<dyn std::error::Error>> {
    let running = Arc::new(AtomicBool::new(true));
    let r = running.clone();
    ctrlc::set_handler(move || {
        r.store(false, Ordering::SeqCst);
    })?;

    let config = match &args.server {
        Some(host) => Config::with_server(host.clone(), args.port),
        None => Config::listen(args.port),
    };
    let mut tracker = Tracker::new(config)?;

    if !args.quiet {
        print_header(args, &tracker)?;
    }

    if args.server.is_some() {
        tracker.start_measurement()?;
    }

    let mut printed: u64 = 0;
    while running.load(Ordering::SeqCst) {
        if args.count > 0 && printed >= args.count {
            break;
        }
        match tracker.receive() {
            Ok(()) => {
                printed += 1;
                print_frame(&tracker, args, printed);
                let _ = io::stdout().flush();
            }
            Err(Error::Transport(e)) if tracker.data_status() == ChannelStatus::Timeout => {
                if !args.quiet {
                    eprintln!("{}: {}", "Warning".yellow(), e);
                }
            }
            Err(e) => {
                eprintln!("{}: {}", "Warning".yellow(), e);
            }
        }
    }

    if args.server.is_some() {
        tracker.stop_measurement()?;
    }

    if !args.quiet {
        eprintln!("\n{} Received {} frame(s)", "---".dimmed(), printed);
    }

    Ok(())
}

fn print_header(args: &Args, tracker: &Tracker) -> Result<(), Box<dyn std::error::Error>> {
    eprintln!(
        "{} {} port {} (server={}, format={:?})",
        ">>>".green().bold(),
        "Listening on".bold(),
        tracker.data_port()?.to_string().cyan(),
        args.server.as_deref().unwrap_or("-"),
        args.format
    );
    eprintln!("{}", "Press Ctrl+C to stop".dimmed());
    eprintln!();
    Ok(())
}

fn print_frame(tracker: &Tracker, args: &Args, seq: u64) {
    match args.format {
        OutputFormat::Pretty => print_pretty(tracker, args.verbose, seq),
        OutputFormat::Compact => print_compact(tracker, seq),
    }
}

fn print_pretty(tracker: &Tracker, verbose: bool, seq: u64) {
    let timestamp = Local::now().format("%Y-%m-%d %H:%M:%S%.3f");
    println!(
        "{} {} frame={} ts={:.3}",
        format!("[{}]", timestamp).dimmed(),
        format!("#{}", seq).yellow(),
        tracker.frame_counter(),
        tracker.timestamp()
    );
    println!(
        "  bodies={} flysticks={} tools={} hands={} humans={} inertial={} markers={}",
        tracker.num_bodies(),
        tracker.num_flysticks(),
        tracker.num_tools(),
        tracker.num_hands(),
        tracker.num_humans(),
        tracker.num_inertial_bodies(),
        tracker.num_markers()
    );
    if verbose {
        for id in 0..tracker.num_bodies() {
            let body = tracker.body(id);
            if body.pose.is_tracked() {
                let [x, y, z] = body.pose.loc();
                println!(
                    "  body {} qu={:.2} loc=({:.1}, {:.1}, {:.1})",
                    id.to_string().cyan(),
                    body.pose.quality(),
                    x,
                    y,
                    z
                );
            } else {
                println!("  body {} {}", id.to_string().cyan(), "untracked".dimmed());
            }
        }
        for id in 0..tracker.num_flysticks() {
            let fly = tracker.flystick(id);
            let pressed: Vec<String> = fly
                .buttons
                .iter()
                .enumerate()
                .filter(|(_, b)| **b)
                .map(|(i, _)| i.to_string())
                .collect();
            println!(
                "  flystick {} buttons=[{}] joysticks={:?}",
                id.to_string().cyan(),
                pressed.join(","),
                fly.joysticks
            );
        }
        if let Some(status) = tracker.system_status() {
            println!(
                "  status: cameras={} tracked_bodies={} errors={}",
                status.num_cameras, status.num_tracked_bodies, status.msg_errors
            );
        }
    }
    println!();
}

fn print_compact(tracker: &Tracker, seq: u64) {
    println!(
        "#{} frame={} ts={:.3} bod={} fly={} hnd={} mrk={}",
        seq,
        tracker.frame_counter(),
        tracker.timestamp(),
        tracker.num_bodies(),
        tracker.num_flysticks(),
        tracker.num_hands(),
        tracker.num_markers()
    );
}
