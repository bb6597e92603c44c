use once_cell::sync::Lazy;
use reqwest::{Client, StatusCode};
use serde_json::{json, Value};
use std::net::TcpListener;
use std::process::{Child, Command, Stdio};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::Mutex;
use tokio::time::sleep;

struct TestServer {
    base_url: String,
    child: Child,
}

impl Drop for TestServer {
    fn drop(&mut self) {
        let _ = self.child.kill();
        let _ = self.child.wait();
    }
}

static TEST_LOCK: Lazy<Mutex<()>> = Lazy::new(|| Mutex::new(()));
static SERVER: Lazy<Mutex<Option<Arc<TestServer>>>> = Lazy::new(|| Mutex::new(None));

#[cfg(unix)]
mod cleanup {
    use std::sync::atomic::{AtomicI32, Ordering};
    use std::sync::Once;

    static REGISTER: Once = Once::new();
    static PID: AtomicI32 = AtomicI32::new(0);

    pub fn register(pid: u32) {
        REGISTER.call_once(|| {
            PID.store(pid as i32, Ordering::SeqCst);
            unsafe {
                libc::atexit(on_exit);
            }
        });
    }

    extern "C" fn on_exit() {
        let pid = PID.load(Ordering::SeqCst);
        if pid > 0 {
            unsafe {
                libc::kill(pid, libc::SIGTERM);
            }
        }
    }
}

fn pick_free_port() -> u16 {
    let listener = TcpListener::bind("127.0.0.1:0").expect("bind random port");
    let port = listener.local_addr().unwrap().port();
    drop(listener);
    port
}

fn unique_data_path() -> String {
    let nanos = std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .unwrap()
        .as_nanos();
    let mut path = std::env::temp_dir();
    path.push(format!("spooly_http_{}_{}.json", std::process::id(), nanos));
    path.to_string_lossy().to_string()
}

async fn wait_until_ready(base_url: &str) {
    let client = Client::new();
    let deadline = Instant::now() + Duration::from_secs(3);
    loop {
        if let Ok(resp) = client.get(format!("{base_url}/api/filaments")).send().await {
            if resp.status().is_success() {
                return;
            }
        }
        if Instant::now() > deadline {
            panic!("server did not become ready");
        }
        sleep(Duration::from_millis(100)).await;
    }
}

async fn spawn_server(data_path: &str) -> TestServer {
    let port = pick_free_port();
    let child = Command::new(env!("CARGO_BIN_EXE_spooly"))
        .env("PORT", port.to_string())
        .env("APP_DATA_PATH", data_path)
        .env("RUST_LOG", "info")
        .stdout(Stdio::inherit())
        .stderr(Stdio::inherit())
        .spawn()
        .expect("failed to spawn server");

    #[cfg(unix)]
    cleanup::register(child.id());

    let base_url = format!("http://127.0.0.1:{port}");
    wait_until_ready(&base_url).await;

    TestServer { base_url, child }
}

async fn shared_server() -> Arc<TestServer> {
    let mut guard = SERVER.lock().await;
    if let Some(server) = guard.as_ref() {
        return Arc::clone(server);
    }
    let server = Arc::new(spawn_server(&unique_data_path()).await);
    *guard = Some(Arc::clone(&server));
    server
}

async fn import(client: &Client, base_url: &str, records: &Value) -> reqwest::Response {
    client
        .post(format!("{base_url}/api/filaments/import"))
        .json(records)
        .send()
        .await
        .unwrap()
}

async fn list(client: &Client, base_url: &str) -> Vec<Value> {
    client
        .get(format!("{base_url}/api/filaments"))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap()
}

async fn create(client: &Client, base_url: &str, draft: &Value) -> (StatusCode, Value) {
    let response = client
        .post(format!("{base_url}/api/filaments"))
        .json(draft)
        .send()
        .await
        .unwrap();
    let status = response.status();
    (status, response.json().await.unwrap())
}

#[tokio::test]
async fn create_assigns_fresh_ids_and_prepends() {
    let _guard = TEST_LOCK.lock().await;
    let server = shared_server().await;
    let client = Client::new();
    import(&client, &server.base_url, &json!([])).await;

    let (status, first) = create(
        &client,
        &server.base_url,
        &json!({ "name": "PLA Red", "brand": "Prusament", "startMass": 1000.0, "currentMass": 1000.0 }),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    let (_, second) = create(&client, &server.base_url, &json!({ "name": "PETG Blue" })).await;

    assert!(first["id"].as_i64().unwrap() > 0);
    assert_ne!(first["id"], second["id"]);
    assert_eq!(first["name"], "PLA Red");
    assert_eq!(first["brand"], "Prusament");
    assert_eq!(first["currentMass"].as_f64(), Some(1000.0));

    let records = list(&client, &server.base_url).await;
    assert_eq!(records.len(), 2);
    assert_eq!(records[0]["name"], "PETG Blue");
    assert_eq!(records[1]["name"], "PLA Red");
}

#[tokio::test]
async fn create_ignores_caller_supplied_id() {
    let _guard = TEST_LOCK.lock().await;
    let server = shared_server().await;
    let client = Client::new();
    import(&client, &server.base_url, &json!([])).await;

    let (_, created) = create(
        &client,
        &server.base_url,
        &json!({ "id": 1, "name": "Sneaky" }),
    )
    .await;
    assert_ne!(created["id"].as_i64(), Some(1));
}

#[tokio::test]
async fn update_changes_only_the_patched_field() {
    let _guard = TEST_LOCK.lock().await;
    let server = shared_server().await;
    let client = Client::new();
    import(&client, &server.base_url, &json!([])).await;

    let (_, created) = create(
        &client,
        &server.base_url,
        &json!({
            "name": "PLA Red",
            "brand": "Prusament",
            "material": "PLA",
            "color": "#ff0000",
            "notes": "first spool",
            "copies": 2,
            "startMass": 1000.0,
            "currentMass": 500.0
        }),
    )
    .await;
    let id = created["id"].as_i64().unwrap();

    let updated: Value = client
        .put(format!("{}/api/filaments/{id}", server.base_url))
        .json(&json!({ "currentMass": 300.0 }))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();

    assert_eq!(updated["currentMass"].as_f64(), Some(300.0));
    for field in ["id", "name", "brand", "material", "color", "notes", "copies", "startMass"] {
        assert_eq!(updated[field], created[field], "field {field} drifted");
    }

    let records = list(&client, &server.base_url).await;
    assert_eq!(records[0], updated);
}

#[tokio::test]
async fn update_missing_id_is_404_and_collection_untouched() {
    let _guard = TEST_LOCK.lock().await;
    let server = shared_server().await;
    let client = Client::new();
    import(&client, &server.base_url, &json!([])).await;

    let response = client
        .put(format!("{}/api/filaments/123456", server.base_url))
        .json(&json!({ "name": "ghost" }))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    let body: Value = response.json().await.unwrap();
    assert_eq!(body, json!({ "error": "Filament not found" }));

    assert!(list(&client, &server.base_url).await.is_empty());
}

#[tokio::test]
async fn delete_acks_then_404_on_repeat() {
    let _guard = TEST_LOCK.lock().await;
    let server = shared_server().await;
    let client = Client::new();
    import(&client, &server.base_url, &json!([])).await;

    let (_, created) = create(&client, &server.base_url, &json!({ "name": "Short lived" })).await;
    let id = created["id"].as_i64().unwrap();

    let response = client
        .delete(format!("{}/api/filaments/{id}", server.base_url))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body: Value = response.json().await.unwrap();
    assert_eq!(body, json!({ "success": true }));

    let repeat = client
        .delete(format!("{}/api/filaments/{id}", server.base_url))
        .send()
        .await
        .unwrap();
    assert_eq!(repeat.status(), StatusCode::NOT_FOUND);
    let body: Value = repeat.json().await.unwrap();
    assert_eq!(body, json!({ "error": "Filament not found" }));
}

#[tokio::test]
async fn import_replaces_the_whole_collection() {
    let _guard = TEST_LOCK.lock().await;
    let server = shared_server().await;
    let client = Client::new();
    import(&client, &server.base_url, &json!([])).await;
    create(&client, &server.base_url, &json!({ "name": "Leftover" })).await;

    let replacement = json!([
        {
            "id": 10,
            "name": "PLA Red",
            "brand": "Prusament",
            "material": "PLA",
            "color": "#ff0000",
            "notes": "imported",
            "copies": 1,
            "startMass": 1000.0,
            "currentMass": 800.0
        },
        {
            "id": 11,
            "name": "ABS Black",
            "brand": "",
            "material": "ABS",
            "color": "#000000",
            "startMass": 750.0,
            "currentMass": 0.0
        }
    ]);

    let response = import(&client, &server.base_url, &replacement).await;
    assert_eq!(response.status(), StatusCode::OK);
    let body: Value = response.json().await.unwrap();
    assert_eq!(body, json!({ "success": true }));

    let records = list(&client, &server.base_url).await;
    assert_eq!(Value::Array(records), replacement);
}

#[tokio::test]
async fn import_round_trips_records_verbatim() {
    let _guard = TEST_LOCK.lock().await;
    let server = shared_server().await;
    let client = Client::new();

    // Unknown fields survive, absent fields stay absent, and integer masses
    // come back as integers.
    let replacement = json!([
        { "name": "A", "vendorCode": "XYZ" },
        { "name": "B", "startMass": 750, "currentMass": 750, "spoolWeight": 212 }
    ]);

    let response = import(&client, &server.base_url, &replacement).await;
    assert_eq!(response.status(), StatusCode::OK);

    let records = list(&client, &server.base_url).await;
    assert_eq!(Value::Array(records), replacement);
}

#[tokio::test]
async fn import_rejects_non_array_payload() {
    let _guard = TEST_LOCK.lock().await;
    let server = shared_server().await;
    let client = Client::new();
    import(&client, &server.base_url, &json!([])).await;
    create(&client, &server.base_url, &json!({ "name": "Survivor" })).await;

    let response = import(&client, &server.base_url, &json!({ "name": "not a list" })).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body: Value = response.json().await.unwrap();
    assert_eq!(body, json!({ "error": "Invalid data" }));

    let records = list(&client, &server.base_url).await;
    assert_eq!(records.len(), 1);
    assert_eq!(records[0]["name"], "Survivor");
}

#[tokio::test]
async fn create_list_delete_round_trip() {
    let _guard = TEST_LOCK.lock().await;
    let server = shared_server().await;
    let client = Client::new();
    import(&client, &server.base_url, &json!([])).await;

    let (status, created) = create(
        &client,
        &server.base_url,
        &json!({ "name": "X", "startMass": 1000.0 }),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    // Create echoes only what the caller sent plus the assigned id.
    assert!(created.get("currentMass").is_none());
    assert!(created.get("color").is_none());
    assert!(created.get("brand").is_none());
    assert_eq!(created["startMass"].as_f64(), Some(1000.0));

    let records = list(&client, &server.base_url).await;
    assert_eq!(records.len(), 1);

    let id = created["id"].as_i64().unwrap();
    let response = client
        .delete(format!("{}/api/filaments/{id}", server.base_url))
        .send()
        .await
        .unwrap();
    assert!(response.status().is_success());

    assert!(list(&client, &server.base_url).await.is_empty());
}

#[tokio::test]
async fn use_endpoint_clamps_and_skips_invalid_amounts() {
    let _guard = TEST_LOCK.lock().await;
    let server = shared_server().await;
    let client = Client::new();
    import(&client, &server.base_url, &json!([])).await;

    let (_, created) = create(
        &client,
        &server.base_url,
        &json!({ "name": "Spool", "startMass": 500.0, "currentMass": 500.0 }),
    )
    .await;
    let id = created["id"].as_i64().unwrap();

    let after_use: Value = client
        .post(format!("{}/api/filaments/{id}/use", server.base_url))
        .json(&json!({ "grams": 200.0 }))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(after_use["currentMass"].as_f64(), Some(300.0));

    // A non-positive amount changes nothing.
    let unchanged: Value = client
        .post(format!("{}/api/filaments/{id}/use", server.base_url))
        .json(&json!({ "grams": -5.0 }))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(unchanged["currentMass"].as_f64(), Some(300.0));

    // Overdrawing clamps at zero.
    let drained: Value = client
        .post(format!("{}/api/filaments/{id}/use", server.base_url))
        .json(&json!({ "grams": 9000.0 }))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(drained["currentMass"].as_f64(), Some(0.0));

    let records = list(&client, &server.base_url).await;
    assert_eq!(records[0]["currentMass"].as_f64(), Some(0.0));

    let missing = client
        .post(format!("{}/api/filaments/999/use", server.base_url))
        .json(&json!({ "grams": 10.0 }))
        .send()
        .await
        .unwrap();
    assert_eq!(missing.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn index_serves_the_ui() {
    let _guard = TEST_LOCK.lock().await;
    let server = shared_server().await;
    let client = Client::new();

    let response = client
        .get(format!("{}/", server.base_url))
        .send()
        .await
        .unwrap();
    assert!(response.status().is_success());
    let html = response.text().await.unwrap();
    assert!(html.contains("Spooly"));
    assert!(html.contains("Available Filaments"));
    assert!(html.contains("Empty Filaments"));
}

#[tokio::test]
async fn corrupt_data_file_loads_as_empty_collection() {
    let _guard = TEST_LOCK.lock().await;
    let data_path = unique_data_path();
    std::fs::write(&data_path, b"{ not json").unwrap();

    let server = spawn_server(&data_path).await;
    let client = Client::new();
    assert!(list(&client, &server.base_url).await.is_empty());
}
