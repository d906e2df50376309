//! Integration tests that run the CLI binary.

use std::io::{BufRead, BufReader, Read, Write};
use std::net::TcpListener;
use std::process::{Command, Output, Stdio};
use std::thread;

/// Command with isolated data/config dirs and no inherited TEXCHAT_* settings.
fn bin(tmp: &tempfile::TempDir) -> Command {
    let mut cmd = Command::new(env!("CARGO_BIN_EXE_texchat"));
    for key in [
        "TEXCHAT_BACKEND_URL",
        "TEXCHAT_USER_ID",
        "TEXCHAT_PROVIDER",
        "TEXCHAT_MATH_POLICY",
        "TEXCHAT_MAX_SESSIONS",
        "TEXCHAT_TIMEOUT_SECS",
    ] {
        cmd.env_remove(key);
    }
    // Run from temp dir so dotenv() won't load .env from project root
    cmd.current_dir(tmp.path())
        .env("TEST_DATA_DIR", tmp.path().join("data"))
        .env("TEST_CONFIG_DIR", tmp.path().join("config"));
    cmd
}

fn run_with_stdin(mut cmd: Command, input: &str) -> Output {
    let mut child = cmd
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .expect("binary not found - run cargo build first");
    child
        .stdin
        .take()
        .expect("stdin")
        .write_all(input.as_bytes())
        .expect("write stdin");
    child.wait_with_output().expect("wait")
}

/// Serve one HTTP request with a JSON reply; returns the base URL and the request body.
fn mock_backend(reply: &'static str) -> (String, thread::JoinHandle<String>) {
    let listener = TcpListener::bind("127.0.0.1:0").expect("bind");
    let url = format!("http://{}/", listener.local_addr().expect("addr"));
    let handle = thread::spawn(move || {
        let (stream, _) = listener.accept().expect("accept");
        let mut reader = BufReader::new(stream);
        let mut content_length = 0;
        loop {
            let mut line = String::new();
            reader.read_line(&mut line).expect("read header");
            let line = line.trim_end();
            if line.is_empty() {
                break;
            }
            if let Some((name, value)) = line.split_once(':')
                && name.eq_ignore_ascii_case("content-length")
            {
                content_length = value.trim().parse().expect("length");
            }
        }
        let mut body = vec![0; content_length];
        reader.read_exact(&mut body).expect("read body");
        let response = format!(
            "HTTP/1.1 200 OK\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
            reply.len(),
            reply
        );
        reader
            .get_mut()
            .write_all(response.as_bytes())
            .expect("write response");
        String::from_utf8(body).expect("utf8 body")
    });
    (url, handle)
}

#[test]
fn cli_help_succeeds_and_outputs_usage() {
    let tmp = tempfile::TempDir::new().expect("temp dir");
    let output = bin(&tmp).arg("--help").output().expect("run");

    assert!(
        output.status.success(),
        "stderr: {}",
        String::from_utf8_lossy(&output.stderr)
    );
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("normalize"));
    assert!(stdout.contains("texchat -p"));
}

#[test]
fn cli_version_succeeds() {
    let tmp = tempfile::TempDir::new().expect("temp dir");
    let output = bin(&tmp).arg("--version").output().expect("run");

    assert!(output.status.success());
    assert!(String::from_utf8_lossy(&output.stdout).contains("texchat"));
}

#[test]
fn normalize_reads_stdin() {
    let tmp = tempfile::TempDir::new().expect("temp dir");
    let mut cmd = bin(&tmp);
    cmd.arg("normalize");
    let output = run_with_stdin(cmd, "Energy: (E = mc^2)\n[ a + b = c ]\n");

    assert!(output.status.success());
    assert_eq!(
        String::from_utf8_lossy(&output.stdout),
        "Energy: $E = mc^2$\n$$a + b = c$$\n"
    );
}

#[test]
fn normalize_leaves_code_alone() {
    let tmp = tempfile::TempDir::new().expect("temp dir");
    let path = tmp.path().join("reply.md");
    std::fs::write(&path, "```\nf(x^2)\n```\n").expect("write");
    let output = bin(&tmp).arg("normalize").arg(&path).output().expect("run");

    assert!(output.status.success());
    assert_eq!(String::from_utf8_lossy(&output.stdout), "```\nf(x^2)\n```\n");
}

#[test]
fn prompt_against_unreachable_backend_exits_with_error() {
    let tmp = tempfile::TempDir::new().expect("temp dir");
    let output = bin(&tmp)
        .env("TEXCHAT_BACKEND_URL", "http://127.0.0.1:9/")
        .env("TEXCHAT_TIMEOUT_SECS", "5")
        .args(["-p", "hello"])
        .output()
        .expect("run");

    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(
        stderr.contains("Unable to connect to backend"),
        "got: {}",
        stderr
    );
}

#[test]
fn prompt_prints_normalized_reply() {
    let tmp = tempfile::TempDir::new().expect("temp dir");
    let (url, server) = mock_backend(r#"{"response":"So \\( x^2 \\) it is."}"#);
    let output = bin(&tmp)
        .env("TEXCHAT_BACKEND_URL", &url)
        .env("TEXCHAT_USER_ID", "tester")
        .args(["-p", "square it", "--provider", "gemini"])
        .output()
        .expect("run");

    assert!(
        output.status.success(),
        "stderr: {}",
        String::from_utf8_lossy(&output.stderr)
    );
    assert_eq!(String::from_utf8_lossy(&output.stdout).trim(), "So $x^2$ it is.");

    let body: serde_json::Value =
        serde_json::from_str(&server.join().expect("server")).expect("json body");
    assert_eq!(body["prompt"], "square it");
    assert_eq!(body["provider"], "gemini");
    assert_eq!(body["user_id"], "tester");
    assert!(body.get("session_id").is_none());
}

#[test]
fn raw_prompt_skips_normalization() {
    let tmp = tempfile::TempDir::new().expect("temp dir");
    let (url, server) = mock_backend(r#"{"response":"[ a = b ]"}"#);
    let output = bin(&tmp)
        .env("TEXCHAT_BACKEND_URL", &url)
        .args(["-p", "q", "--raw"])
        .output()
        .expect("run");

    assert!(output.status.success());
    assert_eq!(String::from_utf8_lossy(&output.stdout).trim(), "[ a = b ]");
    server.join().expect("server");
}

#[test]
fn history_list_is_empty_in_fresh_data_dir() {
    let tmp = tempfile::TempDir::new().expect("temp dir");
    let output = bin(&tmp).args(["history", "list"]).output().expect("run");

    assert!(output.status.success());
    assert!(String::from_utf8_lossy(&output.stdout).trim().is_empty());
}

#[test]
fn bad_backend_url_is_a_config_error() {
    let tmp = tempfile::TempDir::new().expect("temp dir");
    let output = bin(&tmp)
        .env("TEXCHAT_BACKEND_URL", "ftp://example.com")
        .arg("config")
        .output()
        .expect("run");

    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("TEXCHAT_BACKEND_URL"));
}
