//! Client Tests
//!
//! End-to-end sessions between `DictClient` and a scripted local server.

#[path = "../common/mod.rs"]
mod common;

use std::time::Duration;

use common::{wire, ScriptedServer, BANNER};
use dictclient::config::{DEFAULT_HOST, DEFAULT_PORT};
use dictclient::{ClientInfo, Config, DictClient, DictError};

fn client_line() -> String {
    format!("CLIENT dictclient {}", dictclient::VERSION)
}

/// Start a server that accepts CLIENT, then plays `replies`
fn session(replies: Vec<String>) -> ScriptedServer {
    let mut all = vec![wire(&["250 ok"])];
    all.extend(replies);
    ScriptedServer::start(BANNER, all)
}

// =============================================================================
// Config Tests
// =============================================================================

#[test]
fn test_config_defaults() {
    let config = Config::default();

    assert_eq!(config.host, DEFAULT_HOST);
    assert_eq!(config.port, DEFAULT_PORT);
    assert_eq!(config.read_timeout(), Some(Duration::from_millis(5000)));
    assert_eq!(config.client.name, "dictclient");
    assert_eq!(
        config.client.client_string(),
        format!("dictclient {}", dictclient::VERSION)
    );
    assert!(config.validate().is_ok());
}

#[test]
fn test_config_zero_timeout_means_none() {
    let config = Config::builder()
        .timeout_ms(1000)
        .read_timeout_ms(0)
        .build();

    assert_eq!(config.connect_timeout(), Some(Duration::from_millis(1000)));
    assert_eq!(config.read_timeout(), None);
    assert_eq!(config.write_timeout(), Some(Duration::from_millis(1000)));
}

// =============================================================================
// Handshake Tests
// =============================================================================

#[test]
fn test_connect_sends_client() {
    let server = session(vec![wire(&["221 bye"])]);
    let client = DictClient::connect(server.config()).unwrap();

    assert_eq!(client.banner().unwrap().connection_id, "<100@dictd.org>");
    assert!(client.connection().is_connected());
    assert_eq!(client.config().port, server.port);

    client.close().unwrap();
    assert_eq!(server.finish(), vec![client_line(), "QUIT".to_string()]);
}

#[test]
fn test_connect_with_custom_client_info() {
    let server = ScriptedServer::start(BANNER, vec![wire(&["250 ok"]), wire(&["221 bye"])]);
    let config = Config::builder()
        .host("127.0.0.1")
        .port(server.port)
        .client(ClientInfo::new("lookup", "2.1", "acme"))
        .build();

    let client = DictClient::connect(config).unwrap();
    client.close().unwrap();

    assert_eq!(server.finish(), vec!["CLIENT lookup 2.1", "QUIT"]);
}

#[test]
fn test_connect_rejects_failure_greeting() {
    let server = ScriptedServer::start("420 Server temporarily unavailable", vec![]);

    match DictClient::connect(server.config()) {
        Err(DictError::Status { code, message }) => {
            assert_eq!(code, 420);
            assert_eq!(message, "Server temporarily unavailable");
        }
        other => panic!("Expected Status error, got {:?}", other.err()),
    }
    assert!(server.finish().is_empty());
}

#[test]
fn test_connect_rejects_refused_client() {
    let server = ScriptedServer::start(BANNER, vec![wire(&["502 Command not implemented"])]);

    match DictClient::connect(server.config()) {
        Err(DictError::Status { code, .. }) => assert_eq!(code, 502),
        other => panic!("Expected Status error, got {:?}", other.err()),
    }
    assert_eq!(server.finish(), vec![client_line()]);
}

#[test]
fn test_connect_rejects_invalid_config() {
    let config = Config::builder().host("").build();
    assert!(matches!(DictClient::connect(config), Err(DictError::Config(_))));

    let config = Config::builder().port(0).build();
    assert!(matches!(DictClient::connect(config), Err(DictError::Config(_))));
}

// =============================================================================
// Lookup Tests
// =============================================================================

#[test]
fn test_define() {
    let server = session(vec![
        wire(&[
            "150 2 definitions retrieved",
            "151 \"lattice\" wn \"WordNet (r) 3.0 (2006)\"",
            "lattice",
            "    n 1: an arrangement of points",
            ".",
            "151 \"lattice\" gcide \"The Collaborative International Dictionary of English\"",
            "Lattice \\Lat\"tice\\, n.",
            "..and more",
            ".",
            "250 ok [d/m/c = 2/0/20; 0.000r 0.000u 0.000s]",
        ]),
        wire(&["221 bye"]),
    ]);
    let mut client = DictClient::connect(server.config()).unwrap();

    let definitions = client.define("lattice").unwrap();

    assert_eq!(definitions.len(), 2);
    assert_eq!(definitions[0].word, "lattice");
    assert_eq!(definitions[0].database, "wn");
    assert_eq!(definitions[0].database_description, "WordNet (r) 3.0 (2006)");
    assert_eq!(definitions[0].text, "lattice\n    n 1: an arrangement of points");
    assert_eq!(definitions[1].database, "gcide");
    assert_eq!(definitions[1].text, "Lattice \\Lat\"tice\\, n.\n.and more");

    client.close().unwrap();
    assert_eq!(
        server.finish(),
        vec![client_line(), "DEFINE * \"lattice\"".to_string(), "QUIT".to_string()]
    );
}

#[test]
fn test_define_no_match_is_empty() {
    let server = session(vec![wire(&["552 no match"]), wire(&["221 bye"])]);
    let mut client = DictClient::connect(server.config()).unwrap();

    assert!(client.define_in("wn", "zzyzx").unwrap().is_empty());

    client.close().unwrap();
    assert_eq!(
        server.finish(),
        vec![client_line(), "DEFINE wn \"zzyzx\"".to_string(), "QUIT".to_string()]
    );
}

#[test]
fn test_define_invalid_database_is_error() {
    let server = session(vec![wire(&["550 invalid database"]), wire(&["221 bye"])]);
    let mut client = DictClient::connect(server.config()).unwrap();

    match client.define_in("nope", "word") {
        Err(DictError::Status { code, .. }) => assert_eq!(code, 550),
        other => panic!("Expected Status error, got {:?}", other),
    }

    client.close().unwrap();
    server.finish();
}

#[test]
fn test_match() {
    let server = session(vec![
        wire(&[
            "152 3 matches found",
            "wn \"lattice\"",
            "gcide \"lattice\"",
            "wn \"latticed\"",
            ".",
            "250 ok",
        ]),
        wire(&["552 no match"]),
        wire(&["221 bye"]),
    ]);
    let mut client = DictClient::connect(server.config()).unwrap();

    let matches = client.match_word("prefix", "lattic").unwrap();
    assert_eq!(matches.len(), 2);
    assert_eq!(matches[0].word, "lattice");
    assert_eq!(matches[0].databases, vec!["wn", "gcide"]);
    assert_eq!(matches[1].word, "latticed");

    assert!(client.match_in("wn", "exact", "zzz").unwrap().is_empty());

    client.close().unwrap();
    assert_eq!(
        server.finish(),
        vec![
            client_line(),
            "MATCH * prefix \"lattic\"".to_string(),
            "MATCH wn exact \"zzz\"".to_string(),
            "QUIT".to_string(),
        ]
    );
}

#[test]
fn test_invalid_arguments_are_not_sent() {
    let server = session(vec![wire(&["221 bye"])]);
    let mut client = DictClient::connect(server.config()).unwrap();

    assert!(matches!(client.define(""), Err(DictError::InvalidCommand(_))));
    assert!(matches!(
        client.match_in("two words", "exact", "x"),
        Err(DictError::InvalidCommand(_))
    ));

    client.close().unwrap();
    assert_eq!(server.finish(), vec![client_line(), "QUIT".to_string()]);
}

// =============================================================================
// Listing and Information Tests
// =============================================================================

#[test]
fn test_databases_and_strategies() {
    let server = session(vec![
        wire(&[
            "110 2 databases present",
            "wn \"WordNet (r) 3.0 (2006)\"",
            "gcide \"The Collaborative International Dictionary of English\"",
            ".",
            "250 ok",
        ]),
        wire(&[
            "111 2 strategies available",
            "exact \"Match headwords exactly\"",
            "prefix \"Match prefixes\"",
            ".",
            "250 ok",
        ]),
        wire(&["221 bye"]),
    ]);
    let mut client = DictClient::connect(server.config()).unwrap();

    let databases = client.databases().unwrap();
    assert_eq!(databases.len(), 2);
    assert_eq!(databases[0].key, "wn");
    assert_eq!(databases[0].value, "WordNet (r) 3.0 (2006)");
    assert_eq!(databases[1].key, "gcide");

    let strategies = client.strategies().unwrap();
    let names: Vec<&str> = strategies.iter().map(|s| s.key.as_str()).collect();
    assert_eq!(names, vec!["exact", "prefix"]);

    client.close().unwrap();
    assert_eq!(
        server.finish(),
        vec![
            client_line(),
            "SHOW DATABASES".to_string(),
            "SHOW STRATEGIES".to_string(),
            "QUIT".to_string(),
        ]
    );
}

#[test]
fn test_empty_listings() {
    let server = session(vec![
        wire(&["554 No databases present"]),
        wire(&["555 No strategies available"]),
        wire(&["221 bye"]),
    ]);
    let mut client = DictClient::connect(server.config()).unwrap();

    assert!(client.databases().unwrap().is_empty());
    assert!(client.strategies().unwrap().is_empty());

    client.close().unwrap();
    server.finish();
}

#[test]
fn test_information_commands() {
    let server = session(vec![
        wire(&["114 server information", "dictd 1.12 on Linux", ".", "250 ok"]),
        wire(&["113 help text follows", "DEFINE database word", "MATCH database strategy word", ".", "250 ok"]),
        wire(&["112 database information follows", "WordNet 3.0", ".", "250 ok"]),
        wire(&["221 bye"]),
    ]);
    let mut client = DictClient::connect(server.config()).unwrap();

    assert_eq!(client.server_info().unwrap(), "dictd 1.12 on Linux");
    assert_eq!(
        client.help().unwrap(),
        "DEFINE database word\nMATCH database strategy word"
    );
    assert_eq!(client.database_info("wn").unwrap(), "WordNet 3.0");

    client.close().unwrap();
    assert_eq!(
        server.finish(),
        vec![
            client_line(),
            "SHOW SERVER".to_string(),
            "HELP".to_string(),
            "SHOW INFO wn".to_string(),
            "QUIT".to_string(),
        ]
    );
}

// =============================================================================
// Authentication Tests
// =============================================================================

#[test]
fn test_authenticate_accepted() {
    let server = session(vec![wire(&["230 Authentication successful"]), wire(&["221 bye"])]);
    let mut client = DictClient::connect(server.config()).unwrap();

    assert!(client.authenticate("joe", "secret").unwrap());

    client.close().unwrap();
    assert_eq!(
        server.finish(),
        vec![
            client_line(),
            "AUTH joe e5601ee15e18f8687dfedd36a51b405a".to_string(),
            "QUIT".to_string(),
        ]
    );
}

#[test]
fn test_authenticate_rejected() {
    let server = session(vec![wire(&["531 Access denied"]), wire(&["221 bye"])]);
    let mut client = DictClient::connect(server.config()).unwrap();

    assert!(!client.authenticate("joe", "wrong").unwrap());
    assert!(client.connection().is_connected());

    client.close().unwrap();
    server.finish();
}

// =============================================================================
// Close Tests
// =============================================================================

#[test]
fn test_close_requires_221() {
    let server = session(vec![wire(&["500 unknown command"])]);
    let client = DictClient::connect(server.config()).unwrap();

    match client.close() {
        Err(DictError::Status { code, .. }) => assert_eq!(code, 500),
        other => panic!("Expected Status error, got {:?}", other),
    }
    // Socket is closed regardless
    assert_eq!(server.finish(), vec![client_line(), "QUIT".to_string()]);
}
