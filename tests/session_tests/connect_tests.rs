//! Connect Tests
//!
//! End-to-end over a real socket against a single-connection test server.

use std::io::{Read, Write};
use std::net::{TcpListener, TcpStream};
use std::thread;

use cachelink::protocol::{decode_command, Command};
use cachelink::{CacheError, ClientConfig, Session};
use crossbeam::channel::{self, Receiver};

const PASSWORD: &str = "123456";
const KEY: &str = "SJL *loves* ZHH-";
const CREDENTIAL: &[u8] = b"L88lZ47nokoHxjRvhtfyzA==";

// =============================================================================
// Test Server
// =============================================================================

/// What the test server saw
#[derive(Debug, PartialEq)]
enum Seen {
    Credential(Vec<u8>),
    Command(Command),
    Closed,
}

/// Accept one connection, run the handshake, then answer every command
/// with a single zero status byte until the client goes away.
fn spawn_server(require_auth: bool, verdict: u8) -> (u16, Receiver<Seen>) {
    let listener = TcpListener::bind("127.0.0.1:0").unwrap();
    let port = listener.local_addr().unwrap().port();
    let (tx, rx) = channel::unbounded();

    thread::spawn(move || {
        let (mut stream, _) = listener.accept().unwrap();
        let mut buf = [0u8; 4096];

        stream.write_all(&[u8::from(require_auth)]).unwrap();
        if require_auth {
            let n = stream.read(&mut buf).unwrap();
            tx.send(Seen::Credential(buf[..n].to_vec())).unwrap();
            stream.write_all(&[verdict]).unwrap();
            if verdict != 0 {
                let n = stream.read(&mut buf).unwrap_or(0);
                assert_eq!(n, 0);
                tx.send(Seen::Closed).unwrap();
                return;
            }
        }

        loop {
            let n = match stream.read(&mut buf) {
                Ok(0) | Err(_) => break,
                Ok(n) => n,
            };
            let command = decode_command(&buf[..n]).unwrap();
            let done = matches!(command, Command::Exit | Command::Quit);
            tx.send(Seen::Command(command)).unwrap();
            if !done {
                stream.write_all(&[0]).unwrap();
            }
        }
        tx.send(Seen::Closed).unwrap();
    });

    (port, rx)
}

// =============================================================================
// Connect Tests
// =============================================================================

#[test]
fn test_connect_without_auth() {
    let (port, rx) = spawn_server(false, 0);

    let session = Session::connect("127.0.0.1", port, "", "").unwrap();
    session.set("name", "sjl").unwrap();
    session.del("name").unwrap();
    session.shutdown().unwrap();

    assert_eq!(
        rx.recv().unwrap(),
        Seen::Command(Command::Set {
            key: "name".to_string(),
            value: "sjl".to_string(),
        })
    );
    assert_eq!(
        rx.recv().unwrap(),
        Seen::Command(Command::Del {
            key: "name".to_string()
        })
    );
    assert_eq!(rx.recv().unwrap(), Seen::Command(Command::Exit));
    assert_eq!(rx.recv().unwrap(), Seen::Closed);
}

#[test]
fn test_connect_with_auth() {
    let (port, rx) = spawn_server(true, 0);

    let session = Session::connect("127.0.0.1", port, PASSWORD, KEY).unwrap();

    assert_eq!(rx.recv().unwrap(), Seen::Credential(CREDENTIAL.to_vec()));

    session.set("me", "Jack").unwrap();
    session.close().unwrap();

    assert!(matches!(rx.recv().unwrap(), Seen::Command(Command::Set { .. })));
    assert_eq!(rx.recv().unwrap(), Seen::Command(Command::Quit));
    assert_eq!(rx.recv().unwrap(), Seen::Closed);
}

#[test]
fn test_connect_auth_rejected_closes_socket() {
    let (port, rx) = spawn_server(true, 1);

    let result = Session::connect("127.0.0.1", port, "wrong", KEY);

    assert!(matches!(result, Err(CacheError::AuthRejected)));
    assert!(matches!(rx.recv().unwrap(), Seen::Credential(_)));
    assert_eq!(rx.recv().unwrap(), Seen::Closed);
}

#[test]
fn test_connect_with_config_and_timeouts() {
    let (port, rx) = spawn_server(false, 0);
    let config = ClientConfig::builder()
        .host("127.0.0.1")
        .port(port)
        .read_timeout_ms(5_000)
        .write_timeout_ms(5_000)
        .build();

    let session = Session::connect_with(&config).unwrap();
    session.clear().unwrap();
    session.shutdown().unwrap();

    assert_eq!(rx.recv().unwrap(), Seen::Command(Command::Cls));
}

#[test]
fn test_connect_refused() {
    let port = {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        listener.local_addr().unwrap().port()
    };

    let result = Session::connect("127.0.0.1", port, "", "");

    assert!(matches!(result, Err(CacheError::Io(_))));
}

#[test]
fn test_connect_invalid_config() {
    let config = ClientConfig::builder().host("").port(8448).build();
    assert!(matches!(
        Session::connect_with(&config),
        Err(CacheError::Config(_))
    ));

    let config = ClientConfig::builder().port(0).build();
    assert!(matches!(
        Session::<TcpStream>::connect_with(&config),
        Err(CacheError::Config(_))
    ));
}

#[test]
fn test_config_debug_redacts_secrets() {
    let config = ClientConfig::builder()
        .password("hunter2")
        .cipher_key(KEY)
        .build();
    let text = format!("{:?}", config);

    assert!(!text.contains("hunter2"));
    assert!(!text.contains("loves"));
    assert_eq!(config.addr(), "127.0.0.1:8448");
}
