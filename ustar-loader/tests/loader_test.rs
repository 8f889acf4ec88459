//! Integration tests for the caching loader.

use std::sync::Arc;
use std::time::Duration;
use ustar::FileFilter;
use ustar_loader::{ArchiveLoader, Error};
use wiremock::{
    Mock, MockServer, ResponseTemplate,
    matchers::{method, path},
};

/// Builds a small tar buffer with one file per `(name, content, mtime)`.
fn tar_fixture(entries: &[(&str, &[u8], u64)]) -> Vec<u8> {
    let mut builder = tar::Builder::new(Vec::new());
    for (name, content, mtime) in entries {
        let mut header = tar::Header::new_ustar();
        header.set_size(content.len() as u64);
        header.set_mtime(*mtime);
        header.set_entry_type(tar::EntryType::Regular);
        header.set_mode(0o644);
        builder
            .append_data(&mut header, name, &content[..])
            .unwrap();
    }
    builder.into_inner().unwrap()
}

#[tokio::test]
async fn loads_and_caches_an_archive() {
    let server = MockServer::start().await;
    let body = tar_fixture(&[("app.js", b"app();", 1_600_000_000)]);

    Mock::given(method("GET"))
        .and(path("/bundle.tar"))
        .respond_with(ResponseTemplate::new(200).set_body_bytes(body))
        .expect(1)
        .mount(&server)
        .await;

    let loader = ArchiveLoader::new().unwrap();
    let url = format!("{}/bundle.tar", server.uri());

    let first = loader.get_or_load(&url).await.unwrap();
    assert_eq!(first.len(), 1);
    assert_eq!(first.files()[0].name(), "app.js");
    assert!(loader.is_loaded(&url));

    // Second call resolves from the cache; expect(1) verifies one request.
    let second = loader.get_or_load(&url).await.unwrap();
    assert!(Arc::ptr_eq(&first, &second));
}

#[tokio::test]
async fn concurrent_callers_share_one_fetch() {
    let server = MockServer::start().await;
    let body = tar_fixture(&[("index.html", b"<html>", 1_500_000_000)]);

    Mock::given(method("GET"))
        .and(path("/slow.tar"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_bytes(body)
                .set_delay(Duration::from_millis(100)),
        )
        .expect(1)
        .mount(&server)
        .await;

    let loader = Arc::new(ArchiveLoader::new().unwrap());
    let url = format!("{}/slow.tar", server.uri());

    let a = {
        let loader = Arc::clone(&loader);
        let url = url.clone();
        tokio::spawn(async move { loader.get_or_load(&url).await })
    };
    let b = {
        let loader = Arc::clone(&loader);
        let url = url.clone();
        tokio::spawn(async move { loader.get_or_load(&url).await })
    };

    let first = a.await.unwrap().unwrap();
    let second = b.await.unwrap().unwrap();
    assert!(Arc::ptr_eq(&first, &second));
}

#[tokio::test]
async fn url_spelling_variants_share_one_entry() {
    let server = MockServer::start().await;
    let body = tar_fixture(&[("a.txt", b"a", 0)]);

    Mock::given(method("GET"))
        .and(path("/bundle.tar"))
        .respond_with(ResponseTemplate::new(200).set_body_bytes(body))
        .expect(1)
        .mount(&server)
        .await;

    let loader = ArchiveLoader::new().unwrap();
    let first = loader
        .get_or_load(&format!("{}/x/../bundle.tar", server.uri()))
        .await
        .unwrap();
    let second = loader
        .get_or_load(&format!("{}/bundle.tar", server.uri()))
        .await
        .unwrap();
    assert!(Arc::ptr_eq(&first, &second));
}

#[tokio::test]
async fn fetch_failure_does_not_wedge_the_entry() {
    let server = MockServer::start().await;
    let body = tar_fixture(&[("a.txt", b"a", 0)]);

    // First request fails, the next one succeeds.
    Mock::given(method("GET"))
        .and(path("/retry.tar"))
        .respond_with(ResponseTemplate::new(404))
        .up_to_n_times(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/retry.tar"))
        .respond_with(ResponseTemplate::new(200).set_body_bytes(body))
        .mount(&server)
        .await;

    let loader = ArchiveLoader::new().unwrap();
    let url = format!("{}/retry.tar", server.uri());

    let err = loader.get_or_load(&url).await.unwrap_err();
    assert!(matches!(err, Error::Client(_)));
    assert!(!loader.is_loaded(&url));

    // A fresh caller-initiated load may proceed.
    let archive = loader.get_or_load(&url).await.unwrap();
    assert_eq!(archive.len(), 1);
}

#[tokio::test]
async fn garbage_body_surfaces_a_decode_error() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/garbage.tar"))
        .respond_with(ResponseTemplate::new(200).set_body_bytes(vec![b'x'; 512]))
        .mount(&server)
        .await;

    let loader = ArchiveLoader::new().unwrap();
    let err = loader
        .get_or_load(&format!("{}/garbage.tar", server.uri()))
        .await
        .unwrap_err();
    assert!(matches!(err, Error::Format(ustar::Error::MalformedHeader { .. })));
}

#[tokio::test]
async fn queued_waiters_observe_the_failure() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/fail.tar"))
        .respond_with(ResponseTemplate::new(500).set_delay(Duration::from_millis(100)))
        .expect(1)
        .mount(&server)
        .await;

    let loader = Arc::new(ArchiveLoader::new().unwrap());
    let url = format!("{}/fail.tar", server.uri());

    let a = {
        let loader = Arc::clone(&loader);
        let url = url.clone();
        tokio::spawn(async move { loader.get_or_load(&url).await })
    };
    tokio::time::sleep(Duration::from_millis(50)).await;
    let b = {
        let loader = Arc::clone(&loader);
        let url = url.clone();
        tokio::spawn(async move { loader.get_or_load(&url).await })
    };

    let results = [a.await.unwrap(), b.await.unwrap()];
    // Exactly one caller initiated the load and gets the typed transport
    // error; the queued one gets the LoadFailed summary.
    let mut typed = 0;
    let mut summary = 0;
    for result in &results {
        match result {
            Err(Error::Client(_)) => typed += 1,
            Err(Error::LoadFailed { .. }) => summary += 1,
            other => panic!("unexpected result: {other:?}"),
        }
    }
    assert_eq!((typed, summary), (1, 1));
    assert!(!loader.is_loaded(&url));
}

#[tokio::test]
async fn cancelled_initial_load_does_not_wedge_the_entry() {
    let server = MockServer::start().await;
    let body = tar_fixture(&[("a.txt", b"a", 0)]);

    Mock::given(method("GET"))
        .and(path("/cancel.tar"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_bytes(body)
                .set_delay(Duration::from_millis(300)),
        )
        .mount(&server)
        .await;

    let loader = Arc::new(ArchiveLoader::new().unwrap());
    let url = format!("{}/cancel.tar", server.uri());

    let initiator = {
        let loader = Arc::clone(&loader);
        let url = url.clone();
        tokio::spawn(async move { loader.get_or_load(&url).await })
    };
    tokio::time::sleep(Duration::from_millis(50)).await;

    // Queued behind the in-flight load.
    let waiter = {
        let loader = Arc::clone(&loader);
        let url = url.clone();
        tokio::spawn(async move { loader.get_or_load(&url).await })
    };
    tokio::time::sleep(Duration::from_millis(50)).await;

    initiator.abort();
    assert!(initiator.await.unwrap_err().is_cancelled());

    // The queued waiter must be resolved with an error, not left hanging.
    let err = waiter.await.unwrap().unwrap_err();
    assert!(matches!(err, Error::LoadFailed { .. }));
    assert!(!loader.is_loaded(&url));

    // The entry is gone, so a fresh caller-initiated load still works.
    let archive = loader.get_or_load(&url).await.unwrap();
    assert_eq!(archive.len(), 1);
    assert!(loader.is_loaded(&url));
}

#[tokio::test]
async fn get_time_returns_filtered_timestamps() {
    let server = MockServer::start().await;
    let body = tar_fixture(&[
        ("a.js", b"a", 100),
        ("b.css", b"b", 200),
        ("c.js", b"c", 300),
    ]);

    Mock::given(method("GET"))
        .and(path("/times.tar"))
        .respond_with(ResponseTemplate::new(200).set_body_bytes(body))
        .mount(&server)
        .await;

    let loader = ArchiveLoader::new().unwrap();
    let url = format!("{}/times.tar", server.uri());

    let filter = FileFilter::Pattern(regex::Regex::new(r"\.js$").unwrap());
    let times = loader.get_time(&url, &filter).await.unwrap();
    let secs: Vec<i64> = times.iter().map(chrono::DateTime::timestamp).collect();
    assert_eq!(secs, [100, 300]);
}
