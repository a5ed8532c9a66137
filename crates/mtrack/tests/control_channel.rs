// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Command/response correlation against a scripted fake controller.

use mtrack::{ChannelStatus, CommandResponse, Config, Error, Tracker};
use std::io::{BufRead, BufReader, Write};
use std::net::{TcpListener, TcpStream};
use std::thread::JoinHandle;
use std::time::Duration;

/// Spawn a TCP server that answers each received line by running `script`.
/// Returns the port and the server thread handle.
fn fake_controller(
    script: impl Fn(&str, &mut TcpStream) -> bool + Send + 'static,
) -> (u16, JoinHandle<()>) {
    let listener = TcpListener::bind("127.0.0.1:0").expect("bind fake controller");
    let port = listener.local_addr().unwrap().port();
    let handle = std::thread::spawn(move || {
        let (stream, _) = listener.accept().expect("accept");
        let mut writer = stream.try_clone().expect("clone stream");
        let reader = BufReader::new(stream);
        for line in reader.lines() {
            let Ok(line) = line else { break };
            if !script(&line, &mut writer) {
                break;
            }
        }
    });
    (port, handle)
}

fn connect(port: u16) -> Tracker {
    let config = Config::with_server("127.0.0.1", 0)
        .with_command_port(port)
        .with_command_timeout(Duration::from_millis(500));
    Tracker::new(config).expect("connect to fake controller")
}

#[test]
fn ok_reply_resolves_command() {
    let (port, server) = fake_controller(|line, out| {
        assert_eq!(line, "dtrack2 tracking start");
        out.write_all(b"dtrack2 ok\n").unwrap();
        false
    });
    let mut t = connect(port);
    t.start_measurement().unwrap();
    assert_eq!(t.control_status(), ChannelStatus::None);
    drop(t);
    server.join().unwrap();
}

#[test]
fn err_reply_carries_device_error() {
    let (port, server) = fake_controller(|_, out| {
        out.write_all(b"dtrack2 err 12 \"bad parameter\"\n").unwrap();
        false
    });
    let mut t = connect(port);
    let response = t.send_command("dtrack2 set bogus 1").unwrap();
    assert_eq!(
        response,
        CommandResponse::DeviceError {
            code: 12,
            description: "bad parameter".into()
        }
    );
    // a device error is a resolved reply, not a channel failure
    assert_eq!(t.control_status(), ChannelStatus::None);
    assert_eq!(t.last_device_error(), Some((12, "bad parameter")));
    drop(t);
    server.join().unwrap();
}

#[test]
fn interleaved_messages_are_queued_not_mistaken_for_replies() {
    let (port, server) = fake_controller(|_, out| {
        out.write_all(
            b"dtrack2 msg cam2 warning 100 0x0a \"sync drift\"\n\
              dtrack2 msg cam3 error 101 0x0b \"sync lost\"\n\
              dtrack2 ok\n",
        )
        .unwrap();
        false
    });
    let mut t = connect(port);
    let response = t.send_command("dtrack2 tracking stop").unwrap();
    assert_eq!(response, CommandResponse::Ok);

    let first = t.poll_message().unwrap();
    assert_eq!(first.origin, "cam2");
    assert_eq!(first.frame_nr, 100);
    assert_eq!(first.error_id, 0x0a);
    let second = t.poll_message().unwrap();
    assert_eq!(second.status, "error");
    assert_eq!(second.message, "sync lost");
    assert!(t.poll_message().is_none());
    drop(t);
    server.join().unwrap();
}

#[test]
fn get_param_extracts_echoed_value() {
    let (port, server) = fake_controller(|line, out| {
        assert_eq!(line, "dtrack2 get config active_room");
        out.write_all(b"dtrack2 set config active_room lab_b\n")
            .unwrap();
        false
    });
    let mut t = connect(port);
    let value = t.get_param("config active_room").unwrap();
    assert_eq!(value, "lab_b");
    drop(t);
    server.join().unwrap();
}

#[test]
fn reply_timeout_classifies_and_channel_survives() {
    let (port, server) = fake_controller(|line, out| {
        // stay silent on the first command, answer the second
        if line.ends_with("second") {
            out.write_all(b"dtrack2 ok\n").unwrap();
            return false;
        }
        true
    });
    let mut t = connect(port);

    let err = t.send_command("dtrack2 first").unwrap_err();
    assert!(matches!(err, Error::Control(_)));
    assert_eq!(t.control_status(), ChannelStatus::Timeout);

    // the stale reply never arrives, so the channel is still usable
    t.send_command("dtrack2 second").unwrap();
    assert_eq!(t.control_status(), ChannelStatus::None);
    drop(t);
    server.join().unwrap();
}

#[test]
fn closed_stream_classifies_as_transport() {
    let (port, server) = fake_controller(|_, _| false);
    let mut t = connect(port);
    let err = t.send_command("dtrack2 anything").unwrap_err();
    assert!(matches!(err, Error::Control(_)));
    assert_eq!(t.control_status(), ChannelStatus::Transport);
    drop(t);
    server.join().unwrap();
}

#[test]
fn protocol_token_must_be_a_whole_word() {
    let (port, server) = fake_controller(|_, out| {
        // missing space after the protocol token: not an acknowledgement
        out.write_all(b"dtrack2ok\ndtrack2 ok\n").unwrap();
        false
    });
    let mut t = connect(port);
    let response = t.send_command("dtrack2 tracking start").unwrap();
    assert_eq!(response, CommandResponse::Ok);
    let raw = t.poll_message().unwrap();
    assert_eq!(raw.status, "raw");
    assert_eq!(raw.message, "dtrack2ok");
    drop(t);
    server.join().unwrap();
}

#[test]
fn unclassifiable_line_is_preserved_in_queue() {
    let (port, server) = fake_controller(|_, out| {
        out.write_all(b"spurious vendor banner\ndtrack2 ok\n").unwrap();
        false
    });
    let mut t = connect(port);
    t.send_command("dtrack2 hello").unwrap();
    let raw = t.poll_message().unwrap();
    assert_eq!(raw.status, "raw");
    assert_eq!(raw.message, "spurious vendor banner");
    drop(t);
    server.join().unwrap();
}
