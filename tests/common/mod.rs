//! Shared fixtures for the tracker integration tests.
//!
//! Provides temp-directory vault/store constructors, JSON builders for
//! catalog payloads, and a minimal canned-response HTTP stub the blocking
//! catalog client can be pointed at.

#![allow(dead_code)]

use std::collections::{BTreeSet, HashMap};
use std::io::{Read, Write};
use std::net::TcpListener;
use std::path::PathBuf;
use std::sync::{Arc, Mutex};
use std::thread;

use poketcg_tracker::{CollectionStore, Vault};
use tempfile::TempDir;

// ---------------------------------------------------------------------------
// Store fixtures
// ---------------------------------------------------------------------------

/// A collection store backed by a fresh temp directory. Keep the `TempDir`
/// alive for the duration of the test.
pub fn temp_store() -> (CollectionStore, TempDir) {
    let tmp = tempfile::tempdir().unwrap();
    let vault = Vault::new(tmp.path()).unwrap();
    (CollectionStore::new(vault), tmp)
}

pub fn id_set(ids: &[&str]) -> BTreeSet<String> {
    ids.iter().map(|s| s.to_string()).collect()
}

pub fn id_vec(ids: &[&str]) -> Vec<String> {
    ids.iter().map(|s| s.to_string()).collect()
}

/// Path of the persisted record for `set_id` inside a vault directory.
pub fn record_path(dir: &TempDir, set_id: &str) -> PathBuf {
    dir.path()
        .join(format!("poketcg-tracker-{}.json", set_id))
}

/// Read and parse the persisted record for `set_id`.
pub fn read_record(dir: &TempDir, set_id: &str) -> Vec<String> {
    let raw = std::fs::read_to_string(record_path(dir, set_id)).unwrap();
    serde_json::from_str(&raw).unwrap()
}

/// Write a persisted record directly, bypassing the store.
pub fn write_record(dir: &TempDir, set_id: &str, content: &str) {
    std::fs::write(record_path(dir, set_id), content).unwrap();
}

// ---------------------------------------------------------------------------
// Catalog payload builders
// ---------------------------------------------------------------------------

/// A card object as the catalog's `/cards` endpoint returns it.
pub fn card_json(id: &str, name: &str, number: &str) -> serde_json::Value {
    serde_json::json!({
        "id": id,
        "name": name,
        "number": number,
        "supertype": "Pokémon",
        "rarity": "Common",
        "images": {
            "small": format!("https://images.example/{id}.png"),
            "large": format!("https://images.example/{id}_hires.png"),
        },
    })
}

/// One page of the `/cards` listing.
pub fn card_page_json(
    cards: &[serde_json::Value],
    page: u32,
    page_size: u32,
    total_count: u32,
) -> String {
    serde_json::json!({
        "data": cards,
        "page": page,
        "pageSize": page_size,
        "count": cards.len(),
        "totalCount": total_count,
    })
    .to_string()
}

pub fn set_json(id: &str, name: &str, series: &str, release_date: &str) -> serde_json::Value {
    serde_json::json!({
        "id": id,
        "name": name,
        "series": series,
        "releaseDate": release_date,
        "printedTotal": 102,
        "total": 102,
    })
}

pub fn set_detail_body(set: serde_json::Value) -> String {
    serde_json::json!({ "data": set }).to_string()
}

pub fn set_list_body(sets: &[serde_json::Value]) -> String {
    serde_json::json!({ "data": sets }).to_string()
}

// ---------------------------------------------------------------------------
// Canned-response HTTP stub
// ---------------------------------------------------------------------------

/// A tiny single-purpose HTTP stub: maps exact path-and-query strings to
/// canned `(status, body)` responses and records every path it serves.
pub struct StubCatalog {
    base_url: String,
    hits: Arc<Mutex<Vec<String>>>,
}

impl StubCatalog {
    /// Serve `routes` on an ephemeral local port. Unknown paths get a 404.
    pub fn serve(routes: HashMap<String, (u16, String)>) -> Self {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();
        let routes = Arc::new(routes);
        let hits: Arc<Mutex<Vec<String>>> = Arc::new(Mutex::new(Vec::new()));

        let thread_hits = Arc::clone(&hits);
        thread::spawn(move || {
            for stream in listener.incoming() {
                let Ok(stream) = stream else { continue };
                let routes = Arc::clone(&routes);
                let hits = Arc::clone(&thread_hits);
                thread::spawn(move || handle(stream, &routes, &hits));
            }
        });

        Self {
            base_url: format!("http://{}", addr),
            hits,
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Every path-and-query string served so far, in order.
    pub fn hits(&self) -> Vec<String> {
        self.hits.lock().unwrap().clone()
    }

    pub fn hit_count(&self) -> usize {
        self.hits.lock().unwrap().len()
    }
}

fn handle(
    mut stream: std::net::TcpStream,
    routes: &HashMap<String, (u16, String)>,
    hits: &Mutex<Vec<String>>,
) {
    let mut request = Vec::new();
    let mut buf = [0u8; 4096];
    loop {
        match stream.read(&mut buf) {
            Ok(0) => break,
            Ok(n) => {
                request.extend_from_slice(&buf[..n]);
                if request.windows(4).any(|w| w == b"\r\n\r\n") {
                    break;
                }
            }
            Err(_) => return,
        }
    }

    let request = String::from_utf8_lossy(&request);
    let path = request
        .lines()
        .next()
        .and_then(|line| line.split_whitespace().nth(1))
        .unwrap_or("/")
        .to_string();

    hits.lock().unwrap().push(path.clone());

    let (status, body) = routes
        .get(&path)
        .cloned()
        .unwrap_or((404, r#"{"error":"not found"}"#.to_string()));
    let reason = match status {
        200 => "OK",
        404 => "Not Found",
        500 => "Internal Server Error",
        _ => "Error",
    };

    let response = format!(
        "HTTP/1.1 {} {}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
        status,
        reason,
        body.len(),
        body
    );
    let _ = stream.write_all(response.as_bytes());
}

// ---------------------------------------------------------------------------
// Route-path helpers (must mirror the URLs the catalog client builds)
// ---------------------------------------------------------------------------

pub fn sets_path() -> String {
    "/sets?orderBy=releaseDate".to_string()
}

pub fn set_detail_path(set_id: &str) -> String {
    format!("/sets/{}", set_id)
}

pub fn cards_path(set_id: &str, page: u32) -> String {
    format!(
        "/cards?q=set.id:{}&page={}&pageSize={}&orderBy=number",
        set_id,
        page,
        poketcg_tracker::config::PAGE_SIZE
    )
}
