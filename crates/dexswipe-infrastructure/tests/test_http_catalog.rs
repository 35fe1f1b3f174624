use dexswipe_core::FetchCause;
use dexswipe_core::pokemon::PokemonCatalog;
use dexswipe_infrastructure::HttpPokemonCatalog;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;

/// Minimal HTTP/1.1 server answering `/api/v2/pokemon/{id}` requests.
///
/// ID 1 and 5 return JSON, ID 7 stalls past any test timeout, ID 8 returns an
/// undecodable body, anything else is 404. Request paths are recorded.
async fn spawn_catalog_server() -> (String, Arc<Mutex<Vec<String>>>) {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let seen = Arc::new(Mutex::new(Vec::new()));
    let seen_by_server = seen.clone();

    tokio::spawn(async move {
        loop {
            let Ok((mut socket, _)) = listener.accept().await else {
                break;
            };
            let seen = seen_by_server.clone();
            tokio::spawn(async move {
                let mut buf = vec![0u8; 4096];
                let mut read = 0;
                loop {
                    let n = socket.read(&mut buf[read..]).await.unwrap_or(0);
                    if n == 0 {
                        return;
                    }
                    read += n;
                    if buf[..read].windows(4).any(|w| w == b"\r\n\r\n") {
                        break;
                    }
                }
                let request = String::from_utf8_lossy(&buf[..read]).to_string();
                let path = request
                    .split_whitespace()
                    .nth(1)
                    .unwrap_or_default()
                    .to_string();
                seen.lock().unwrap().push(path.clone());

                let (status, body) = match path.as_str() {
                    "/api/v2/pokemon/1" => (
                        "200 OK",
                        r#"{"id":1,"name":"bulbasaur","height":7,"weight":69,"sprites":{"other":{"dream_world":{"front_default":"url"}}},"abilities":[],"types":[{"slot":1,"type":{"name":"grass","url":""}}],"stats":[]}"#,
                    ),
                    "/api/v2/pokemon/5" => (
                        "200 OK",
                        r#"{"id":5,"name":"charmeleon","sprites":{"other":{"dream_world":{"front_default":"url"}}},"abilities":[],"types":[]}"#,
                    ),
                    "/api/v2/pokemon/7" => {
                        tokio::time::sleep(Duration::from_secs(5)).await;
                        ("200 OK", "{}")
                    }
                    "/api/v2/pokemon/8" => ("200 OK", "<html>maintenance</html>"),
                    _ => ("404 Not Found", "Not Found"),
                };

                let response = format!(
                    "HTTP/1.1 {}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
                    status,
                    body.len(),
                    body
                );
                let _ = socket.write_all(response.as_bytes()).await;
                let _ = socket.shutdown().await;
            });
        }
    });

    (format!("http://{}/api/v2", addr), seen)
}

#[tokio::test]
async fn test_fetches_a_pokemon_by_id() {
    let (base_url, seen) = spawn_catalog_server().await;
    let catalog = HttpPokemonCatalog::new(base_url, Duration::from_secs(2)).unwrap();

    let pokemon = catalog.fetch_pokemon(1).await.expect("Should fetch bulbasaur");

    assert_eq!(pokemon.id, 1);
    assert_eq!(pokemon.name, "bulbasaur");
    assert_eq!(pokemon.primary_type(), Some("grass"));
    assert_eq!(seen.lock().unwrap().as_slice(), ["/api/v2/pokemon/1"]);
}

#[tokio::test]
async fn test_sparse_payload_decodes() {
    let (base_url, _) = spawn_catalog_server().await;
    let catalog = HttpPokemonCatalog::new(base_url, Duration::from_secs(2)).unwrap();

    let pokemon = catalog.fetch_pokemon(5).await.unwrap();
    assert_eq!(pokemon.name, "charmeleon");
    assert!(pokemon.stats.is_empty());
}

#[tokio::test]
async fn test_non_success_status_is_fetch_error() {
    let (base_url, _) = spawn_catalog_server().await;
    let catalog = HttpPokemonCatalog::new(base_url, Duration::from_secs(2)).unwrap();

    let err = catalog.fetch_pokemon(9999).await.unwrap_err();

    assert_eq!(err.id, 9999);
    assert_eq!(err.cause, FetchCause::Status(404));
    assert!(err.to_string().contains("Failed to fetch Pokémon with ID 9999"));
}

#[tokio::test]
async fn test_slow_response_times_out() {
    let (base_url, _) = spawn_catalog_server().await;
    let catalog = HttpPokemonCatalog::new(base_url, Duration::from_millis(200)).unwrap();

    let err = catalog.fetch_pokemon(7).await.unwrap_err();

    assert_eq!(err.id, 7);
    assert_eq!(err.cause, FetchCause::Timeout);
}

#[tokio::test]
async fn test_invalid_body_is_decode_error() {
    let (base_url, _) = spawn_catalog_server().await;
    let catalog = HttpPokemonCatalog::new(base_url, Duration::from_secs(2)).unwrap();

    let err = catalog.fetch_pokemon(8).await.unwrap_err();
    assert!(matches!(err.cause, FetchCause::Decode(_)), "got {:?}", err.cause);
}

#[tokio::test]
async fn test_unreachable_host_is_transport_error() {
    // Bind then drop to get a port nothing listens on.
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let catalog =
        HttpPokemonCatalog::new(format!("http://{}/api/v2", addr), Duration::from_secs(2)).unwrap();
    let err = catalog.fetch_pokemon(1).await.unwrap_err();
    assert!(matches!(err.cause, FetchCause::Transport(_)), "got {:?}", err.cause);
}
