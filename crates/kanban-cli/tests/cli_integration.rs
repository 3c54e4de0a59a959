use assert_cmd::Command;
use predicates::prelude::*;
use serde_json::{json, Value};
use tempfile::{tempdir, TempDir};
use wiremock::matchers::{body_json, header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Binary isolated from the developer's config, session and environment.
fn kanban(home: &TempDir) -> Command {
    let mut cmd = Command::cargo_bin("kanban").unwrap();
    cmd.env_remove("KANBAN_TOKEN")
        .env_remove("KANBAN_API_URL")
        .env_remove("KANBAN_SESSION_FILE")
        .env_remove("KANBAN_PRODUCTION_COLUMN")
        .env_remove("KANBAN_DEBUG_LOG")
        .env("XDG_CONFIG_HOME", home.path())
        .env("HOME", home.path())
        .arg("--session")
        .arg(home.path().join("session.json"));
    cmd
}

fn authed(home: &TempDir, server: &MockServer) -> Command {
    let mut cmd = kanban(home);
    cmd.args(["--api-url", &server.uri(), "--token", "abc"]);
    cmd
}

fn parse_json_output(output: &[u8]) -> Value {
    serde_json::from_slice(output).expect("Failed to parse JSON output")
}

fn board_columns() -> Value {
    json!([
        {"id": 10, "board": 1, "name": "Todo", "order": 1, "cards": [
            {"id": 100, "column": 10, "title": "X", "delivery_date": "10/04/2025",
             "status": "pending", "assignee": null, "assignee_email": null,
             "created_at": null, "order": 1},
            {"id": 101, "column": 10, "title": "Y", "delivery_date": "11/04/2025",
             "status": "late", "assignee": null, "assignee_email": null,
             "created_at": null, "order": 2}
        ]},
        {"id": 20, "board": 1, "name": "Producao", "order": 2, "cards": []}
    ])
}

async fn mount_board(server: &MockServer) {
    Mock::given(method("GET"))
        .and(path("/api/v1/columns/"))
        .and(query_param("board", "1"))
        .and(header("authorization", "Token abc"))
        .respond_with(ResponseTemplate::new(200).set_body_json(board_columns()))
        .mount(server)
        .await;
}

mod general_tests {
    use super::*;

    #[test]
    fn test_help_lists_commands() {
        let home = tempdir().unwrap();
        kanban(&home)
            .arg("--help")
            .assert()
            .success()
            .stdout(predicate::str::contains("login"))
            .stdout(predicate::str::contains("board"))
            .stdout(predicate::str::contains("card"));
    }

    #[test]
    fn test_completions() {
        let home = tempdir().unwrap();
        kanban(&home)
            .args(["completions", "bash"])
            .assert()
            .success()
            .stdout(predicate::str::contains("kanban"));
    }

    #[test]
    fn test_requires_login() {
        let home = tempdir().unwrap();
        let output = kanban(&home)
            .args(["--api-url", "http://127.0.0.1:9", "board", "list"])
            .assert()
            .failure()
            .get_output()
            .stderr
            .clone();

        let json = parse_json_output(&output);
        assert_eq!(json["success"], false);
        assert!(json["error"].as_str().unwrap().contains("kanban login"));
    }
}

mod auth_tests {
    use super::*;

    #[tokio::test(flavor = "multi_thread")]
    async fn test_login_then_logout() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/v1/rest-auth/login/"))
            .and(body_json(json!({"username": "ana", "password": "pw"})))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"token": "t-1"})))
            .expect(1)
            .mount(&server)
            .await;
        let home = tempdir().unwrap();
        let session_file = home.path().join("session.json");

        kanban(&home)
            .args(["--api-url", &server.uri()])
            .args(["login", "--username", "ana", "--password", "pw"])
            .assert()
            .success();
        let saved: Value =
            serde_json::from_str(&std::fs::read_to_string(&session_file).unwrap()).unwrap();
        assert_eq!(saved["token"], "t-1");

        kanban(&home).arg("logout").assert().success();
        assert!(!session_file.exists());
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn test_bad_credentials_show_server_message() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/v1/rest-auth/login/"))
            .respond_with(ResponseTemplate::new(400).set_body_json(
                json!({"non_field_errors": ["Unable to log in with provided credentials."]}),
            ))
            .mount(&server)
            .await;
        let home = tempdir().unwrap();

        kanban(&home)
            .args(["--api-url", &server.uri()])
            .args(["login", "--username", "ana", "--password", "wrong"])
            .assert()
            .failure()
            .stderr(predicate::str::contains("Unable to log in"));
    }
}

mod board_tests {
    use super::*;

    #[tokio::test(flavor = "multi_thread")]
    async fn test_board_list() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/v1/boards/"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([
                {"id": 1, "name": "Launch", "active": true},
                {"id": 2, "name": "Old", "active": false}
            ])))
            .mount(&server)
            .await;
        let home = tempdir().unwrap();

        let output = authed(&home, &server)
            .args(["board", "list"])
            .assert()
            .success()
            .get_output()
            .stdout
            .clone();

        let json = parse_json_output(&output);
        assert_eq!(json["success"], true);
        assert_eq!(json["data"]["count"], 2);
        assert_eq!(json["data"]["items"][0]["name"], "Launch");
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn test_board_show_sorts_columns() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/v1/boards/"))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(json!([{"id": 1, "name": "Launch"}])),
            )
            .mount(&server)
            .await;
        mount_board(&server).await;
        let home = tempdir().unwrap();

        let output = authed(&home, &server)
            .args(["board", "show", "--id", "1"])
            .assert()
            .success()
            .get_output()
            .stdout
            .clone();

        let json = parse_json_output(&output);
        assert_eq!(json["data"]["columns"][0]["name"], "Todo");
        assert_eq!(json["data"]["columns"][0]["cards"][1]["id"], 101);
    }
}

mod card_tests {
    use super::*;

    #[tokio::test(flavor = "multi_thread")]
    async fn test_card_move_into_production() {
        let server = MockServer::start().await;
        mount_board(&server).await;
        Mock::given(method("PATCH"))
            .and(path("/api/v1/cards/100/"))
            .and(body_json(json!({"column": 20, "order": 1, "status": "done"})))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({})))
            .expect(1)
            .mount(&server)
            .await;
        let home = tempdir().unwrap();

        let output = authed(&home, &server)
            .args([
                "card",
                "move",
                "--board-id",
                "1",
                "--id",
                "100",
                "--to-column",
                "20",
            ])
            .assert()
            .success()
            .get_output()
            .stdout
            .clone();

        let json = parse_json_output(&output);
        assert_eq!(json["data"]["moved"], true);
        assert_eq!(json["data"]["status_changed"], true);
        assert_eq!(json["notices"][0]["severity"], "success");
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn test_rejected_card_move_fails() {
        let server = MockServer::start().await;
        mount_board(&server).await;
        Mock::given(method("PATCH"))
            .and(path("/api/v1/cards/101/"))
            .respond_with(
                ResponseTemplate::new(400).set_body_json(json!({"detail": "Column is locked"})),
            )
            .mount(&server)
            .await;
        let home = tempdir().unwrap();

        let output = authed(&home, &server)
            .args([
                "card",
                "move",
                "--board-id",
                "1",
                "--id",
                "101",
                "--to-column",
                "20",
                "--index",
                "0",
            ])
            .assert()
            .failure()
            .get_output()
            .stderr
            .clone();

        let json = parse_json_output(&output);
        assert_eq!(json["success"], false);
        assert_eq!(json["error"], "Column is locked");
        assert_eq!(json["notices"][0]["severity"], "error");
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn test_card_create_requires_title() {
        let server = MockServer::start().await;
        mount_board(&server).await;
        Mock::given(method("POST"))
            .and(path("/api/v1/cards/"))
            .respond_with(ResponseTemplate::new(201))
            .expect(0)
            .mount(&server)
            .await;
        let home = tempdir().unwrap();

        authed(&home, &server)
            .args([
                "card",
                "create",
                "--board-id",
                "1",
                "--column-id",
                "10",
                "--title",
                "  ",
                "--delivery-date",
                "2025-04-10",
            ])
            .assert()
            .failure()
            .stderr(predicate::str::contains("title is required"));
    }
}
