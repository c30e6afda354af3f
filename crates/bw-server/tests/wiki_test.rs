//! Wiki page flow over HTTP: view, edit, save and the listing page.

mod common;

use common::{client, TestHarness};
use reqwest::StatusCode;

fn location(resp: &reqwest::Response) -> &str {
    resp.headers()[reqwest::header::LOCATION].to_str().unwrap()
}

// ---------------------------------------------------------------------------
// View / edit of missing pages
// ---------------------------------------------------------------------------

#[tokio::test]
async fn view_missing_page_redirects_to_edit() {
    let (_harness, addr) = TestHarness::with_server().await;

    let resp = client()
        .get(format!("http://{addr}/view/Missing"))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::FOUND);
    assert_eq!(location(&resp), "/edit/Missing");
}

#[tokio::test]
async fn head_view_missing_page_redirects() {
    let (_harness, addr) = TestHarness::with_server().await;

    let resp = client()
        .head(format!("http://{addr}/view/Missing"))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::FOUND);
}

#[tokio::test]
async fn edit_missing_page_shows_empty_form() {
    let (_harness, addr) = TestHarness::with_server().await;

    let resp = client()
        .get(format!("http://{addr}/edit/Missing"))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);

    let html = resp.text().await.unwrap();
    assert!(html.contains("Editing Missing"));
    assert!(html.contains("action=\"/save/Missing\""));
    assert!(html.contains("cols=\"80\"></textarea>"));
}

// ---------------------------------------------------------------------------
// Save
// ---------------------------------------------------------------------------

#[tokio::test]
async fn save_writes_file_and_redirects_to_view() {
    let (harness, addr) = TestHarness::with_server().await;
    let client = client();

    let resp = client
        .post(format!("http://{addr}/save/Hello"))
        .form(&[("body", "hello")])
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::FOUND);
    assert_eq!(location(&resp), "/view/Hello");

    let stored = std::fs::read_to_string(harness.pages_dir().join("Hello.txt")).unwrap();
    assert_eq!(stored, "hello");

    let resp = client
        .get(format!("http://{addr}/view/Hello"))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let html = resp.text().await.unwrap();
    assert!(html.contains("<h1>Hello</h1>"));
    assert!(html.contains("<div>hello</div>"));
}

#[tokio::test]
async fn save_overwrites_previous_body() {
    let (harness, addr) = TestHarness::with_server().await;
    let client = client();

    for body in ["first version", "second"] {
        client
            .post(format!("http://{addr}/save/Page1"))
            .form(&[("body", body)])
            .send()
            .await
            .unwrap();
    }

    let stored = std::fs::read_to_string(harness.pages_dir().join("Page1.txt")).unwrap();
    assert_eq!(stored, "second");
}

#[tokio::test]
async fn save_without_body_field_stores_empty_page() {
    let (harness, addr) = TestHarness::with_server().await;

    let resp = client()
        .post(format!("http://{addr}/save/Blank"))
        .form(&[("other", "ignored")])
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::FOUND);

    let stored = std::fs::read(harness.pages_dir().join("Blank.txt")).unwrap();
    assert!(stored.is_empty());
}

#[tokio::test]
async fn save_reads_body_from_query_string() {
    let (harness, addr) = TestHarness::with_server().await;

    let resp = client()
        .post(format!("http://{addr}/save/Q?body=hello"))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::FOUND);
    assert_eq!(location(&resp), "/view/Q");

    let stored = std::fs::read_to_string(harness.pages_dir().join("Q.txt")).unwrap();
    assert_eq!(stored, "hello");
}

#[tokio::test]
async fn save_failure_is_500_with_message() {
    let pages = tempfile::tempdir().unwrap();
    let missing = pages.path().join("does-not-exist");
    let (_harness, addr) = TestHarness::with_pages_dir(pages, missing.clone())
        .serve()
        .await;

    let resp = client()
        .post(format!("http://{addr}/save/Foo"))
        .form(&[("body", "lost")])
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);
    assert!(resp.headers().get(reqwest::header::LOCATION).is_none());
    let content_type = resp.headers()[reqwest::header::CONTENT_TYPE]
        .to_str()
        .unwrap()
        .to_owned();
    assert!(content_type.starts_with("text/plain"));
    assert!(resp.text().await.unwrap().contains("IO error"));
    assert!(!missing.exists());
}

#[tokio::test]
async fn edit_existing_page_prefills_body() {
    let (_harness, addr) = TestHarness::with_server().await;
    let client = client();

    client
        .post(format!("http://{addr}/save/Draft"))
        .form(&[("body", "work in progress")])
        .send()
        .await
        .unwrap();

    let html = client
        .get(format!("http://{addr}/edit/Draft"))
        .send()
        .await
        .unwrap()
        .text()
        .await
        .unwrap();
    assert!(html.contains(">work in progress</textarea>"));
}

#[tokio::test]
async fn markup_in_body_is_escaped() {
    let (_harness, addr) = TestHarness::with_server().await;
    let client = client();

    client
        .post(format!("http://{addr}/save/Xss"))
        .form(&[("body", "<script>alert(1)</script>")])
        .send()
        .await
        .unwrap();

    let html = client
        .get(format!("http://{addr}/view/Xss"))
        .send()
        .await
        .unwrap()
        .text()
        .await
        .unwrap();
    assert!(!html.contains("<script>"));
    assert!(html.contains("&lt;script&gt;alert(1)&lt;/script&gt;"));
}

// ---------------------------------------------------------------------------
// Listing
// ---------------------------------------------------------------------------

#[tokio::test]
async fn listing_renders_every_page_in_title_order() {
    let (_harness, addr) = TestHarness::with_server().await;
    let client = client();

    for (title, body) in [("Zeta", "last"), ("Alpha", "first")] {
        client
            .post(format!("http://{addr}/save/{title}"))
            .form(&[("body", body)])
            .send()
            .await
            .unwrap();
    }

    let resp = client.get(format!("http://{addr}/")).send().await.unwrap();
    assert_eq!(resp.status(), StatusCode::OK);

    let html = resp.text().await.unwrap();
    let alpha = html.find("<h1>Alpha</h1>").expect("Alpha rendered");
    let zeta = html.find("<h1>Zeta</h1>").expect("Zeta rendered");
    assert!(alpha < zeta);
}

#[cfg(target_os = "linux")]
#[tokio::test]
async fn listing_skips_pages_that_fail_to_load() {
    let (harness, addr) = TestHarness::with_server().await;
    let client = client();

    client
        .post(format!("http://{addr}/save/Good"))
        .form(&[("body", "readable")])
        .send()
        .await
        .unwrap();
    // A regular file as far as `list` can tell, but reading it fails.
    std::os::unix::fs::symlink("/proc/self/mem", harness.pages_dir().join("Broken.txt"))
        .unwrap();

    let resp = client.get(format!("http://{addr}/")).send().await.unwrap();
    assert_eq!(resp.status(), StatusCode::OK);

    let html = resp.text().await.unwrap();
    assert!(html.contains("<h1>Good</h1>"));
    assert!(!html.contains("Broken"));
}

#[tokio::test]
async fn listing_of_empty_wiki_is_empty() {
    let (_harness, addr) = TestHarness::with_server().await;

    let resp = client().get(format!("http://{addr}/")).send().await.unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(resp.text().await.unwrap(), "");
}

// ---------------------------------------------------------------------------
// Path and method validation
// ---------------------------------------------------------------------------

#[tokio::test]
async fn malformed_paths_are_404() {
    let (harness, addr) = TestHarness::with_server().await;
    let client = client();

    for path in [
        "/view/",
        "/view/foo.bar",
        "/view/a%2Fb",
        "/edit/has-dash",
        "/save/",
        "/view/Nested/Page",
        "/nothing/here",
    ] {
        let resp = client
            .get(format!("http://{addr}{path}"))
            .send()
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::NOT_FOUND, "{path}");
        assert_eq!(resp.text().await.unwrap(), "404 page not found");
    }

    let resp = client
        .post(format!("http://{addr}/save/bad.name"))
        .form(&[("body", "x")])
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    assert_eq!(std::fs::read_dir(harness.pages_dir()).unwrap().count(), 0);
}

#[tokio::test]
async fn save_rejects_get() {
    let (_harness, addr) = TestHarness::with_server().await;

    let resp = client()
        .get(format!("http://{addr}/save/Foo"))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::METHOD_NOT_ALLOWED);
    assert_eq!(resp.headers()[reqwest::header::ALLOW], "POST");
}

#[tokio::test]
async fn view_rejects_post() {
    let (_harness, addr) = TestHarness::with_server().await;

    let resp = client()
        .post(format!("http://{addr}/view/Foo"))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::METHOD_NOT_ALLOWED);
}

#[tokio::test]
async fn health_check_returns_ok() {
    let (_harness, addr) = TestHarness::with_server().await;

    let resp = reqwest::get(format!("http://{addr}/health")).await.unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(resp.text().await.unwrap(), "ok");
}
