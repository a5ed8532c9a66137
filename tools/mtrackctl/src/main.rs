// SPDX-License-Identifier: Apache-2.0 OR MIT

//! mtrackctl - command-line control of a tracking controller.
//!
//! Sends single commands, gets/sets parameters, drains event messages,
//! or runs a line-delimited script of raw commands.

use mtrack::{CommandResponse, Config, Tracker};
use std::fs;

const USAGE: &str = "mtrackctl: tracking controller CLI

Usage: mtrackctl <host> <command> [args]

Commands:
  start                  start measurement
  stop                   stop measurement
  get <param...>         query a parameter
  set <param...> <value> set a parameter
  cmd <raw command>      send a raw command line
  messages               drain pending controller event messages
  script <file>          send each line of <file> as a raw command";

fn main() {
    let args: Vec<String> = std::env::args().collect();
    if args.len() < 3 {
        eprintln!("{}", USAGE);
        std::process::exit(2);
    }
    let host = &args[1];
    let command = &args[2];
    let rest = &args[3..];

    if let Err(e) = run(host, command, rest) {
        eprintln!("[FAIL] {}", e);
        std::process::exit(1);
    }
}

fn run(host: &str, command: &str, rest: &[String]) -> Result<(), Box<dyn std::error::Error>> {
    let mut tracker = Tracker::new(Config::with_server(host, 0))?;
    println!("[OK] Connected to {}", host);

    match command {
        "start" => {
            tracker.start_measurement()?;
            println!("measurement started");
        }
        "stop" => {
            tracker.stop_measurement()?;
            println!("measurement stopped");
        }
        "get" => {
            let param = require(rest, "get <param...>")?.join(" ");
            let value = tracker.get_param(&param)?;
            println!("{} = {}", param, value);
        }
        "set" => {
            let parts = require(rest, "set <param...> <value>")?;
            if parts.len() < 2 {
                return Err("set needs a parameter and a value".into());
            }
            let (param, value) = parts.split_at(parts.len() - 1);
            tracker.set_param(&param.join(" "), &value[0])?;
            println!("ok");
        }
        "cmd" => {
            let line = require(rest, "cmd <raw command>")?.join(" ");
            print_response(tracker.send_command(&line)?);
            drain_local(&mut tracker);
        }
        "messages" => {
            let mut total = 0;
            while let Some(msg) = tracker.request_message()? {
                println!(
                    "[{}] {} frame={} id={:#010x} {}",
                    msg.status, msg.origin, msg.frame_nr, msg.error_id, msg.message
                );
                total += 1;
            }
            println!("--- {} message(s)", total);
        }
        "script" => {
            let path = &require(rest, "script <file>")?[0];
            let text = fs::read_to_string(path)?;
            for line in text.lines() {
                let line = line.trim();
                if line.is_empty() || line.starts_with('#') {
                    continue;
                }
                println!("> {}", line);
                print_response(tracker.send_command(line)?);
            }
            drain_local(&mut tracker);
        }
        _ => {
            eprintln!("{}", USAGE);
            std::process::exit(2);
        }
    }
    Ok(())
}

fn require<'a>(rest: &'a [String], usage: &str) -> Result<&'a [String], String> {
    if rest.is_empty() {
        Err(format!("missing arguments: {}", usage))
    } else {
        Ok(rest)
    }
}

fn print_response(response: CommandResponse) {
    match response {
        CommandResponse::Ok => println!("ok"),
        CommandResponse::DeviceError { code, description } => {
            println!("device error {}: {}", code, description);
        }
        CommandResponse::Answer(text) => println!("{}", text),
    }
}

/// Print messages that arrived interleaved with command replies.
fn drain_local(tracker: &mut Tracker) {
    while let Some(msg) = tracker.poll_message() {
        println!(
            "[{}] {} frame={} id={:#010x} {}",
            msg.status, msg.origin, msg.frame_nr, msg.error_id, msg.message
        );
    }
}
