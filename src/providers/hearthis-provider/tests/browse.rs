//! End-to-end catalog behavior against a mock hearthis.at API.

use hearthis_provider::cache::MaxAgePolicy;
use hearthis_provider::client::Credentials;
use hearthis_provider::{HearthisBackend, FEED_LABEL};
use hearthis_core::{MediaLibrary, PlaybackTranslator};
use mockito::{Matcher, Mock, Server};

const LOGIN_BODY: &str =
    r#"{"secret":"s","key":"k","username":"alice","avatar_url":"http://a"}"#;

const FOLLOWING_BODY: &str =
    r#"[{"permalink":"bob","username":"Bob","avatar_url":"http://b"}]"#;

fn feed_body(title: &str) -> String {
    format!(
        r#"[{{
            "title": "{title}",
            "stream_url": "http://x/1.mp3",
            "artwork_url": null,
            "user": {{"permalink": "bob", "username": "Bob"}},
            "created_at": "2020-01-01 00:00:00",
            "duration": "180"
        }}]"#
    )
}

fn mock_login(server: &mut Server) -> Mock {
    server
        .mock("POST", "/login/")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(LOGIN_BODY)
        .create()
}

fn session_query(page: &str) -> Matcher {
    Matcher::AllOf(vec![
        Matcher::UrlEncoded("secret".into(), "s".into()),
        Matcher::UrlEncoded("key".into(), "k".into()),
        Matcher::UrlEncoded("count".into(), "20".into()),
        Matcher::UrlEncoded("page".into(), page.into()),
    ])
}

fn connect(server: &Server) -> HearthisBackend {
    let credentials = Credentials {
        username: "alice".into(),
        password: "pw".into(),
    };
    HearthisBackend::with_policy(
        &server.url(),
        &credentials,
        Box::new(MaxAgePolicy::from_minutes(1440)),
    )
    .expect("backend should build")
}

#[test]
fn root_lists_feed_and_followed_users() {
    let mut server = Server::new();
    let _login = mock_login(&mut server);
    let _following = server
        .mock("GET", "/alice/following/")
        .match_query(session_query("1"))
        .with_status(200)
        .with_body(FOLLOWING_BODY)
        .create();

    let mut backend = connect(&server);
    assert!(backend.is_authenticated());

    let listing = backend.browse("hearthissimple:root");
    assert_eq!(listing.len(), 2);
    assert_eq!(listing[0].name(), format!("{FEED_LABEL}alice"));
    assert_eq!(listing[0].uri(), "hearthissimple:feed:1");
    assert!(listing[0].is_directory());
    assert_eq!(listing[1].name(), "Bob");
    assert_eq!(listing[1].uri(), "hearthissimple:user:bob:1");

    let images = backend.get_images(&[
        "hearthissimple:feed:1".to_string(),
        "hearthissimple:user:bob:1".to_string(),
        "hearthissimple:user:nobody:1".to_string(),
    ]);
    assert_eq!(images["hearthissimple:feed:1"][0].as_ref(), "http://a");
    assert_eq!(images["hearthissimple:user:bob:1"][0].as_ref(), "http://b");
    assert!(!images.contains_key("hearthissimple:user:nobody:1"));
}

#[test]
fn feed_page_materializes_tracks_and_next_page_link() {
    let mut server = Server::new();
    let _login = mock_login(&mut server);
    let _feed = server
        .mock("GET", "/feed")
        .match_query(session_query("1"))
        .with_status(200)
        .with_body(feed_body("Song"))
        .create();

    let mut backend = connect(&server);
    let listing = backend.browse("hearthissimple:feed:1");
    assert_eq!(listing.len(), 2);

    let track_ref = &listing[0];
    assert!(!track_ref.is_directory());
    assert_eq!(track_ref.name(), "01. Song");
    assert!(track_ref.uri().starts_with("hearthissimple:feed:1:"));

    assert_eq!(listing[1].name(), "Page 2");
    assert_eq!(listing[1].uri(), "hearthissimple:feed:2");

    let records = backend.lookup(track_ref.uri());
    assert_eq!(records.len(), 1);
    let record = &records[0];
    assert_eq!(record.name, "01. Song");
    assert_eq!(record.length_ms, 180_000);
    assert_eq!(record.date, "2020-01-01");
    assert_eq!(record.track_no, 1);
    assert_eq!(record.artist.name, "Bob");
    assert_eq!(record.album.name, "Bob");

    let stream = backend.translate_uri(track_ref.uri()).unwrap();
    assert_eq!(stream.as_ref(), "http://x/1.mp3");
}

#[test]
fn page_two_ordinals_continue_the_sequence() {
    let mut server = Server::new();
    let _login = mock_login(&mut server);
    let _feed = server
        .mock("GET", "/feed")
        .match_query(session_query("2"))
        .with_status(200)
        .with_body(feed_body("Deep Cut"))
        .create();

    let mut backend = connect(&server);
    let listing = backend.browse("hearthissimple:feed:2");
    assert_eq!(listing[0].name(), "21. Deep Cut");
    assert_eq!(listing[1].name(), "Page 3");
    assert_eq!(listing[1].uri(), "hearthissimple:feed:3");

    let record = &backend.lookup(listing[0].uri())[0];
    assert_eq!(record.track_no, 21);
}

#[test]
fn second_browse_serves_the_cache_without_a_request() {
    let mut server = Server::new();
    let _login = mock_login(&mut server);
    let feed = server
        .mock("GET", "/feed")
        .match_query(session_query("1"))
        .with_status(200)
        .with_body(feed_body("Song"))
        .expect(1)
        .create();

    let mut backend = connect(&server);
    let first = backend.browse("hearthissimple:feed:1");
    let second = backend.browse("hearthissimple:feed:1");
    assert_eq!(first, second);
    feed.assert();
}

#[test]
fn user_listing_uses_the_tracks_endpoint() {
    let mut server = Server::new();
    let _login = mock_login(&mut server);
    let _tracks = server
        .mock("GET", "/bob")
        .match_query(Matcher::AllOf(vec![
            Matcher::UrlEncoded("type".into(), "tracks".into()),
            Matcher::UrlEncoded("page".into(), "1".into()),
            Matcher::UrlEncoded("count".into(), "20".into()),
        ]))
        .with_status(200)
        .with_body(feed_body("B Side"))
        .create();

    let mut backend = connect(&server);
    let listing = backend.browse("hearthissimple:user:bob:1");
    assert_eq!(listing.len(), 2);
    assert_eq!(listing[0].name(), "01. B Side");
    assert!(listing[0].uri().starts_with("hearthissimple:user:bob:1:"));
    assert_eq!(listing[1].uri(), "hearthissimple:user:bob:2");
}

#[test]
fn full_refresh_flushes_listings_and_records() {
    let mut server = Server::new();
    let _login = mock_login(&mut server);
    let feed = server
        .mock("GET", "/feed")
        .match_query(session_query("1"))
        .with_status(200)
        .with_body(feed_body("Song"))
        .expect(2)
        .create();

    let mut backend = connect(&server);
    let listing = backend.browse("hearthissimple:feed:1");
    let track_uri = listing[0].uri().to_string();
    assert_eq!(backend.lookup(&track_uri).len(), 1);

    backend.refresh("");
    assert!(backend.lookup(&track_uri).is_empty());

    // Cache is empty again, so the next browse refetches.
    backend.browse("hearthissimple:feed:1");
    feed.assert();
}

#[test]
fn single_address_refresh_keeps_track_records() {
    let mut server = Server::new();
    let _login = mock_login(&mut server);
    let feed = server
        .mock("GET", "/feed")
        .match_query(session_query("1"))
        .with_status(200)
        .with_body(feed_body("Song"))
        .expect(2)
        .create();

    let mut backend = connect(&server);
    let listing = backend.browse("hearthissimple:feed:1");
    let track_uri = listing[0].uri().to_string();

    backend.refresh("hearthissimple:feed:1");
    // Lazy invalidation: the record survives until a full flush.
    assert_eq!(backend.lookup(&track_uri).len(), 1);

    backend.browse("hearthissimple:feed:1");
    feed.assert();
}

#[test]
fn expired_cache_is_flushed_before_serving() {
    let mut server = Server::new();
    let _login = mock_login(&mut server);
    let feed = server
        .mock("GET", "/feed")
        .match_query(session_query("1"))
        .with_status(200)
        .with_body(feed_body("Song"))
        .expect(2)
        .create();

    let credentials = Credentials {
        username: "alice".into(),
        password: "pw".into(),
    };
    // Zero max age: every browse pays the flush-and-refetch cost.
    let mut backend = HearthisBackend::with_policy(
        &server.url(),
        &credentials,
        Box::new(MaxAgePolicy::new(std::time::Duration::ZERO)),
    )
    .unwrap();

    backend.browse("hearthissimple:feed:1");
    backend.browse("hearthissimple:feed:1");
    feed.assert();
}

#[test]
fn bad_track_is_skipped_but_page_survives() {
    let mut server = Server::new();
    let _login = mock_login(&mut server);
    let body = r#"[
        {
            "title": "Broken",
            "stream_url": "http://x/0.mp3",
            "user": {"permalink": "bob", "username": "Bob"},
            "created_at": "not a date",
            "duration": "180"
        },
        {
            "title": "Fine",
            "stream_url": "http://x/1.mp3",
            "user": {"permalink": "bob", "username": "Bob"},
            "created_at": "2020-01-01 00:00:00",
            "duration": "180"
        }
    ]"#;
    let _feed = server
        .mock("GET", "/feed")
        .match_query(session_query("1"))
        .with_status(200)
        .with_body(body)
        .create();

    let mut backend = connect(&server);
    let listing = backend.browse("hearthissimple:feed:1");
    // Broken track dropped; ordinal 2 is kept for the surviving one.
    assert_eq!(listing.len(), 2);
    assert_eq!(listing[0].name(), "02. Fine");
    assert_eq!(listing[1].name(), "Page 2");
}

#[test]
fn rejected_login_degrades_to_empty_listings() {
    let mut server = Server::new();
    let _login = server
        .mock("POST", "/login/")
        .with_status(403)
        .with_body("nope")
        .create();
    let following = server
        .mock("GET", "/alice/following/")
        .match_query(Matcher::Any)
        .expect(0)
        .create();

    let mut backend = connect(&server);
    assert!(!backend.is_authenticated());
    assert!(backend.browse("hearthissimple:root").is_empty());
    assert!(backend.browse("hearthissimple:feed:1").is_empty());
    following.assert();
}

#[test]
fn failed_root_fetch_serves_partial_listing_and_retries() {
    let mut server = Server::new();
    let _login = mock_login(&mut server);
    let following = server
        .mock("GET", "/alice/following/")
        .match_query(session_query("1"))
        .with_status(500)
        .with_body("boom")
        .expect(2)
        .create();

    let mut backend = connect(&server);
    let listing = backend.browse("hearthissimple:root");
    assert_eq!(listing.len(), 1);
    assert_eq!(listing[0].uri(), "hearthissimple:feed:1");

    // The failed listing was not cached, so browsing retries.
    backend.browse("hearthissimple:root");
    following.assert();
}
