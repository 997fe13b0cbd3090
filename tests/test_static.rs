use std::path::PathBuf;

use plainweb::static_files::{StaticFileNotFound, StaticFiles};

fn fixtures() -> StaticFiles {
    StaticFiles::new(PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("tests/static"))
}

#[tokio::test]
async fn test_reads_file_under_root() {
    let body = fixtures().resolve("/hello.txt").await.unwrap();

    assert_eq!(body, b"hello static\n".to_vec());
}

#[tokio::test]
async fn test_reads_nested_file() {
    let body = fixtures().resolve("/css/site.css").await.unwrap();

    assert!(String::from_utf8(body).unwrap().contains("color"));
}

#[tokio::test]
async fn test_missing_file_is_not_found() {
    let err = fixtures().resolve("/missing.txt").await.unwrap_err();

    assert!(matches!(err, StaticFileNotFound::Io { .. }));
}

#[tokio::test]
async fn test_directory_is_not_found() {
    assert!(fixtures().resolve("/").await.is_err());
    assert!(fixtures().resolve("/css").await.is_err());
}

#[tokio::test]
async fn test_parent_traversal_rejected() {
    // tests/test_static.rs exists one level above the root
    for path in ["/../test_static.rs", "/css/../../test_static.rs", "/./../Cargo.toml"] {
        let err = fixtures().resolve(path).await.unwrap_err();
        assert!(
            matches!(err, StaticFileNotFound::OutsideRoot { .. }),
            "{path} should be rejected, got {err}"
        );
    }
}

#[tokio::test]
async fn test_absolute_path_after_slash_rejected() {
    let err = fixtures().resolve("//etc/hostname").await.unwrap_err();

    assert!(matches!(err, StaticFileNotFound::OutsideRoot { .. }));
}

#[tokio::test]
async fn test_missing_root_is_not_found() {
    let files = StaticFiles::new("/definitely/not/a/real/static/root");

    assert!(files.resolve("/index.html").await.is_err());
}
