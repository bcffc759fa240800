use std::io::{Read, Write};
use std::net::TcpListener;
use std::path::Path;
use std::thread;

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

const SPACE_PARTY: &str = "How do you organize a space party? You planet.";

fn dadjokes_cmd(favourites: &Path, endpoint: &str) -> Command {
    let mut cmd = Command::cargo_bin("dadjokes").unwrap();
    cmd.env("DADJOKES_FAVOURITES_PATH", favourites.to_str().unwrap())
        .env("DADJOKES_ENDPOINT", endpoint)
        .env("DADJOKES_HTTP_TIMEOUT_SECS", "5");
    cmd
}

/// Answer a single request with `body` and return the endpoint URL
fn serve_once(body: &'static str) -> String {
    let listener = TcpListener::bind("127.0.0.1:0").unwrap();
    let endpoint = format!("http://{}/", listener.local_addr().unwrap());

    thread::spawn(move || {
        if let Ok((mut stream, _)) = listener.accept() {
            let mut request = Vec::new();
            let mut buf = [0u8; 1024];
            while !request.windows(4).any(|w| w == b"\r\n\r\n") {
                match stream.read(&mut buf) {
                    Ok(0) | Err(_) => break,
                    Ok(n) => request.extend_from_slice(&buf[..n]),
                }
            }
            let response = format!(
                "HTTP/1.1 200 OK\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
                body.len(),
                body
            );
            stream.write_all(response.as_bytes()).ok();
        }
    });

    endpoint
}

/// An endpoint nothing is listening on
fn refused_endpoint() -> String {
    let listener = TcpListener::bind("127.0.0.1:0").unwrap();
    format!("http://{}/", listener.local_addr().unwrap())
}

fn read_favourites(path: &Path) -> serde_json::Value {
    serde_json::from_str(&std::fs::read_to_string(path).unwrap()).unwrap()
}

#[test]
fn test_help_lists_commands() {
    Command::cargo_bin("dadjokes")
        .unwrap()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("fetch"))
        .stdout(predicate::str::contains("list"))
        .stdout(predicate::str::contains("run"));
}

#[test]
fn test_fetch_help_shows_save_flag() {
    Command::cargo_bin("dadjokes")
        .unwrap()
        .args(["fetch", "--help"])
        .assert()
        .success()
        .stdout(predicate::str::contains("--save"));
}

#[test]
fn test_list_without_favourites() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("favourites.json");

    dadjokes_cmd(&path, &refused_endpoint())
        .arg("list")
        .assert()
        .success()
        .stdout(predicate::str::contains("No favourites saved."));
}

#[test]
fn test_list_shows_favourites_in_order() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("favourites.json");
    std::fs::write(
        &path,
        r#"[{"id":"1","joke":"A","status":200},{"id":"2","joke":"B","status":200}]"#,
    )
    .unwrap();

    dadjokes_cmd(&path, &refused_endpoint())
        .arg("list")
        .assert()
        .success()
        .stdout(predicate::str::contains("1. A\n  2. B"));
}

#[test]
fn test_path_prints_configured_location() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("favourites.json");

    dadjokes_cmd(&path, &refused_endpoint())
        .arg("path")
        .assert()
        .success()
        .stdout(predicate::str::contains(path.to_str().unwrap()));
}

#[test]
fn test_log_filter_read_from_dotenv() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("favourites.json");
    std::fs::write(temp_dir.path().join(".env"), "RUST_LOG=dadjokes=debug\n").unwrap();

    dadjokes_cmd(&path, &refused_endpoint())
        .current_dir(temp_dir.path())
        .env_remove("RUST_LOG")
        .arg("fetch")
        .assert()
        .failure()
        .stderr(predicate::str::contains("requesting joke"));
}

#[test]
fn test_invalid_endpoint_is_config_error() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("favourites.json");

    dadjokes_cmd(&path, "not a url")
        .arg("list")
        .assert()
        .failure()
        .stderr(predicate::str::contains("Configuration error"));
}

mod fetch {
    use super::*;

    #[test]
    fn test_fetch_prints_joke() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("favourites.json");
        let endpoint = serve_once(
            r#"{"id":"eNuHJBQCdFd","joke":"How do you organize a space party? You planet.","status":200}"#,
        );

        dadjokes_cmd(&path, &endpoint)
            .arg("fetch")
            .assert()
            .success()
            .stdout(predicate::str::contains(SPACE_PARTY));

        assert!(!path.exists());
    }

    #[test]
    fn test_fetch_save_writes_one_element_array() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("favourites.json");
        let endpoint = serve_once(
            r#"{"id":"eNuHJBQCdFd","joke":"How do you organize a space party? You planet.","status":200}"#,
        );

        dadjokes_cmd(&path, &endpoint)
            .args(["fetch", "--save"])
            .assert()
            .success()
            .stdout(predicate::str::contains("Saved to favourites."));

        assert_eq!(
            read_favourites(&path),
            serde_json::json!([{ "id": "eNuHJBQCdFd", "joke": SPACE_PARTY, "status": 200 }])
        );
    }

    #[test]
    fn test_fetch_save_skips_existing_favourite() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("favourites.json");
        std::fs::write(
            &path,
            r#"[{"id":"older","joke":"How do you organize a space party? You planet.","status":200}]"#,
        )
        .unwrap();
        let endpoint = serve_once(
            r#"{"id":"eNuHJBQCdFd","joke":"How do you organize a space party? You planet.","status":200}"#,
        );

        dadjokes_cmd(&path, &endpoint)
            .args(["fetch", "--save"])
            .assert()
            .success()
            .stdout(predicate::str::contains("Already in favourites."));

        assert_eq!(read_favourites(&path)[0]["id"], "older");
    }

    #[test]
    fn test_fetch_malformed_body_fails() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("favourites.json");
        let endpoint = serve_once(r#"{"message":"rate limited"}"#);

        dadjokes_cmd(&path, &endpoint)
            .args(["fetch", "--save"])
            .assert()
            .failure()
            .stderr(predicate::str::contains("Joke decoding failed"));

        assert!(!path.exists());
    }

    #[test]
    fn test_fetch_unreachable_endpoint_fails() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("favourites.json");

        dadjokes_cmd(&path, &refused_endpoint())
            .arg("fetch")
            .assert()
            .failure()
            .stderr(predicate::str::contains("HTTP request failed"));
    }
}

mod session {
    use super::*;

    #[test]
    fn test_quit_writes_favourites_file() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("favourites.json");

        dadjokes_cmd(&path, &refused_endpoint())
            .arg("run")
            .write_stdin("q\n")
            .assert()
            .success()
            .stdout(predicate::str::contains("Commands:"));

        assert_eq!(read_favourites(&path), serde_json::json!([]));
    }

    #[test]
    fn test_saved_favourites_survive_a_session() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("favourites.json");
        std::fs::write(
            &path,
            r#"[{"id":"1","joke":"A","status":200},{"id":"2","joke":"B","status":200}]"#,
        )
        .unwrap();

        dadjokes_cmd(&path, &refused_endpoint())
            .arg("run")
            .write_stdin("l\nf\n")
            .assert()
            .success()
            .stdout(predicate::str::contains("1. A\n  2. B"));

        assert_eq!(
            read_favourites(&path),
            serde_json::json!([
                { "id": "1", "joke": "A", "status": 200 },
                { "id": "2", "joke": "B", "status": 200 }
            ])
        );
    }

    #[test]
    fn test_unreadable_favourites_are_moved_aside_not_overwritten() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("favourites.json");
        let damaged = r#"[{"id":"1","joke":"A","status":200},{"id":"2","joke":"B","#;
        std::fs::write(&path, damaged).unwrap();

        dadjokes_cmd(&path, &refused_endpoint())
            .arg("run")
            .write_stdin("q\n")
            .assert()
            .success();

        let backup = temp_dir.path().join("favourites.json.bak");
        assert_eq!(std::fs::read_to_string(&backup).unwrap(), damaged);
        assert_eq!(read_favourites(&path), serde_json::json!([]));
    }

    #[test]
    fn test_unreachable_endpoint_does_not_end_session() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("favourites.json");

        dadjokes_cmd(&path, &refused_endpoint())
            .arg("run")
            .write_stdin("n\nn\nq\n")
            .assert()
            .success();

        assert!(path.exists());
    }
}
