//! Integration tests for the cached users collection

use std::io::Write;
use std::time::Duration;

use client::{AuthenticatedClient, ClientError, SessionStore, UserDirectory};
use mockito::{Matcher, Server};
use serde_json::{Value, json};
use types::auth::TokenPair;
use types::user::{CreateUser, UpdateUser, UserId};
use url::Url;

fn user_json(id: u64, created: &str) -> Value {
    json!({
        "id": id,
        "email": format!("user{id}@mail.com"),
        "password": "changeme",
        "name": format!("User {id}"),
        "role": "customer",
        "avatar": "https://i.imgur.com/LDOO4Qs.jpg",
        "creationAt": created,
        "updatedAt": created,
    })
}

async fn directory(server: &Server) -> UserDirectory {
    let session = SessionStore::in_memory();
    session.set_tokens(TokenPair::new("A1", "R1")).await.unwrap();
    UserDirectory::new(AuthenticatedClient::new(
        Url::parse(&server.url()).unwrap(),
        session,
    ))
}

#[tokio::test]
async fn fresh_listing_is_served_from_cache() {
    //* Given
    let mut server = Server::new_async().await;

    let list_mock = server
        .mock("GET", "/users")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(json!([user_json(1, "2024-01-10T12:00:00.000Z")]).to_string())
        .expect(1)
        .create_async()
        .await;

    let directory = directory(&server).await;

    //* When
    let first = directory.list().await.expect("first listing failed");
    let second = directory.list().await.expect("second listing failed");

    //* Then
    list_mock.assert_async().await;
    assert_eq!(first, second);
}

#[tokio::test]
async fn stale_listing_is_refetched() {
    //* Given
    let mut server = Server::new_async().await;

    let list_mock = server
        .mock("GET", "/users")
        .with_status(200)
        .with_body("[]")
        .expect(2)
        .create_async()
        .await;

    let directory = directory(&server).await.stale_after(Duration::ZERO);

    //* When
    directory.list().await.unwrap();
    directory.list().await.unwrap();

    //* Then
    list_mock.assert_async().await;
}

#[tokio::test]
async fn listing_is_newest_first_and_paged() {
    //* Given
    let mut server = Server::new_async().await;

    let users: Vec<Value> = (1..=23)
        .map(|id| user_json(id, &format!("2024-01-{id:02}T00:00:00.000Z")))
        .collect();
    let _list_mock = server
        .mock("GET", "/users")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(Value::Array(users).to_string())
        .create_async()
        .await;

    let directory = directory(&server).await;

    //* When
    let first = directory.page(1).await.expect("page 1 failed");
    let last = directory.page(3).await.expect("page 3 failed");
    let zero = directory.page(0).await;

    //* Then
    assert_eq!(first.items.len(), 10);
    assert_eq!(first.items[0].id, UserId(23));
    assert_eq!(first.total_pages, 3);
    assert!(first.has_next());

    let ids: Vec<_> = last.items.iter().map(|user| user.id).collect();
    assert_eq!(ids, [UserId(3), UserId(2), UserId(1)]);
    assert!(!last.has_next());

    assert!(matches!(zero, Err(ClientError::Paging(_))));
}

#[tokio::test]
async fn successful_writes_invalidate_the_cache() {
    //* Given
    let mut server = Server::new_async().await;

    let list_mock = server
        .mock("GET", "/users")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body("[]")
        .expect(4)
        .create_async()
        .await;

    let create_mock = server
        .mock("POST", "/users")
        .match_header("authorization", "Bearer A1")
        .match_body(Matcher::Json(json!({
            "name": "Nicolas",
            "email": "nico@gmail.com",
            "password": "1234567",
            "avatar": "https://picsum.photos/800",
        })))
        .with_status(201)
        .with_header("content-type", "application/json")
        .with_body(user_json(40, "2024-02-01T00:00:00.000Z").to_string())
        .expect(1)
        .create_async()
        .await;

    let update_mock = server
        .mock("PUT", "/users/40")
        .match_body(Matcher::Json(json!({ "name": "Change name" })))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(user_json(40, "2024-02-01T00:00:00.000Z").to_string())
        .expect(1)
        .create_async()
        .await;

    let delete_mock = server
        .mock("DELETE", "/users/40")
        .with_status(200)
        .with_body("true")
        .expect(1)
        .create_async()
        .await;

    let directory = directory(&server).await;

    //* When
    directory.list().await.unwrap();
    directory
        .create(&CreateUser {
            name: "Nicolas".into(),
            email: "nico@gmail.com".into(),
            password: "1234567".to_string().into(),
            avatar: Url::parse("https://picsum.photos/800").unwrap(),
        })
        .await
        .expect("create failed");
    directory.list().await.unwrap();
    directory
        .update(
            UserId(40),
            &UpdateUser {
                name: Some("Change name".into()),
                ..Default::default()
            },
        )
        .await
        .expect("update failed");
    directory.list().await.unwrap();
    directory.delete(UserId(40)).await.expect("delete failed");
    directory.list().await.unwrap();

    //* Then
    create_mock.assert_async().await;
    update_mock.assert_async().await;
    delete_mock.assert_async().await;
    list_mock.assert_async().await;
}

#[tokio::test]
async fn failed_write_keeps_the_cache() {
    //* Given
    let mut server = Server::new_async().await;

    let list_mock = server
        .mock("GET", "/users")
        .with_status(200)
        .with_body("[]")
        .expect(1)
        .create_async()
        .await;

    let delete_mock = server
        .mock("DELETE", "/users/99")
        .with_status(404)
        .expect(1)
        .create_async()
        .await;

    let directory = directory(&server).await;

    //* When
    directory.list().await.unwrap();
    let result = directory.delete(UserId(99)).await;
    directory.list().await.unwrap();

    //* Then
    delete_mock.assert_async().await;
    list_mock.assert_async().await;
    assert!(matches!(result, Err(ClientError::Status { .. })));
}

#[tokio::test]
async fn invalid_input_is_rejected_locally() {
    //* Given
    let mut server = Server::new_async().await;

    let update_mock = server
        .mock("PUT", Matcher::Any)
        .expect(0)
        .create_async()
        .await;

    let directory = directory(&server).await;

    //* When
    let result = directory.update(UserId(1), &UpdateUser::default()).await;

    //* Then
    update_mock.assert_async().await;
    assert!(matches!(result, Err(ClientError::Validation(_))));
}

#[tokio::test]
async fn listing_fetched_before_a_write_is_not_cached() {
    //* Given
    let mut server = Server::new_async().await;

    let list_mock = server
        .mock("GET", "/users")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_chunked_body(|writer| {
            std::thread::sleep(Duration::from_millis(400));
            writer.write_all(b"[]")
        })
        .expect(2)
        .create_async()
        .await;

    let delete_mock = server
        .mock("DELETE", "/users/40")
        .with_status(200)
        .with_body("true")
        .expect(1)
        .create_async()
        .await;

    let directory = directory(&server).await;

    //* When
    let (listed, deleted) = tokio::join!(directory.list(), async {
        tokio::time::sleep(Duration::from_millis(100)).await;
        directory.delete(UserId(40)).await
    });
    directory.list().await.expect("listing after delete failed");

    //* Then
    listed.expect("listing during delete failed");
    deleted.expect("delete failed");
    delete_mock.assert_async().await;
    list_mock.assert_async().await;
}
