use std::path::PathBuf;
use std::time::Duration;

use plainweb::config::Config;
use plainweb::routing::Router;
use plainweb::server::ServerContext;

#[test]
fn test_config_defaults() {
    let cfg = Config::default();

    assert_eq!(cfg.server.listen_addr, "127.0.0.1:8080");
    assert_eq!(cfg.server.max_connections, 256);
    assert_eq!(cfg.server.read_buffer_size, 4096);
    assert_eq!(cfg.server.read_timeout(), Duration::from_secs(30));
    assert_eq!(cfg.server.server_name, "PlainWeb/0.1");
    assert_eq!(cfg.static_files.root, PathBuf::from("static"));
    assert!(cfg.mime.is_empty());
    assert!(cfg.validate().is_ok());
}

#[test]
fn test_config_from_yaml() {
    let cfg = Config::from_yaml_str(
        r#"
server:
  listen_addr: "0.0.0.0:3000"
  max_connections: 8
static_files:
  root: "/srv/www"
mime:
  wasm: "application/wasm"
"#,
    )
    .unwrap();

    assert_eq!(cfg.server.listen_addr, "0.0.0.0:3000");
    assert_eq!(cfg.server.max_connections, 8);
    // Unspecified keys keep their defaults
    assert_eq!(cfg.server.read_buffer_size, 4096);
    assert_eq!(cfg.static_files.root, PathBuf::from("/srv/www"));
    assert_eq!(cfg.mime.get("wasm").unwrap(), "application/wasm");
}

#[test]
fn test_config_empty_yaml_is_default() {
    let cfg = Config::from_yaml_str("").unwrap();

    assert_eq!(cfg.server.listen_addr, "127.0.0.1:8080");
}

#[test]
fn test_config_rejects_invalid_yaml() {
    assert!(Config::from_yaml_str("server: [not, a, map]").is_err());
}

#[test]
fn test_config_validation() {
    let mut cfg = Config::default();
    cfg.server.max_connections = 0;
    assert!(cfg.validate().is_err());

    let mut cfg = Config::default();
    cfg.server.max_request_size = 10;
    assert!(cfg.validate().is_err());
}

#[test]
fn test_config_mime_overrides_reach_encoder() {
    let cfg = Config::from_yaml_str("mime:\n  css: \"text/x-css\"\n").unwrap();
    let ctx = ServerContext::from_config(&cfg, Router::default());

    assert_eq!(ctx.encoder.mime().lookup("css"), "text/x-css");
    assert_eq!(ctx.encoder.mime().lookup("png"), "image/png");
    assert_eq!(ctx.limits.read_buffer_size, 4096);
}

// Environment variables are process-wide, so every env case runs in this
// one test.
#[test]
fn test_config_env_overrides() {
    unsafe {
        std::env::remove_var("PLAINWEB_CONFIG");
        std::env::set_var("LISTEN", "0.0.0.0:5000");
        std::env::set_var("STATIC_ROOT", "/tmp/site");
    }
    let cfg = Config::load().unwrap();
    assert_eq!(cfg.server.listen_addr, "0.0.0.0:5000");
    assert_eq!(cfg.static_files.root, PathBuf::from("/tmp/site"));

    unsafe {
        std::env::remove_var("LISTEN");
        std::env::remove_var("STATIC_ROOT");
        std::env::set_var("PLAINWEB_CONFIG", "/definitely/missing/plainweb.yaml");
    }
    assert!(Config::load().is_err());

    unsafe {
        std::env::remove_var("PLAINWEB_CONFIG");
    }
    let cfg = Config::load().unwrap();
    assert_eq!(cfg.server.listen_addr, "127.0.0.1:8080");
}
