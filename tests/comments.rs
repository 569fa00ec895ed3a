mod common;

use axum::http::StatusCode;
use common::TestApp;
use newsroom::db;

#[tokio::test]
async fn detail_renders_article_with_empty_comment_form() {
    let app = TestApp::new().await;
    let (alice, token) = app.user("alice").await;
    let article = app.article(&alice, "Hello", "World").await;

    let response = app
        .get(&format!("/articles/{}/", article.id), Some(&token))
        .await;

    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body["article"]["id"], article.id);
    assert_eq!(response.body["article"]["title"], "Hello");
    assert_eq!(response.body["article"]["author"], "alice");
    assert_eq!(response.body["comments"].as_array().unwrap().len(), 0);
    assert_eq!(response.body["form"]["data"]["content"], "");
    assert!(response.body["form"]["errors"].as_object().unwrap().is_empty());
}

#[tokio::test]
async fn comment_goes_to_the_article_in_the_url() {
    let app = TestApp::new().await;
    let (alice, _) = app.user("alice").await;
    let (_, reader) = app.user("reader").await;
    let target = app.article(&alice, "Target", "here").await;
    let decoy = app.article(&alice, "Decoy", "there").await;

    let response = app
        .post_form(
            &format!("/articles/{}/", target.id),
            Some(&reader),
            &format!("content=Nice+post&article={0}&article_id={0}", decoy.id),
        )
        .await;

    assert_eq!(response.status, StatusCode::FOUND);
    assert_eq!(response.location(), format!("/articles/{}/", target.id));

    let comments = db::list_comments(&app.state.pool, target.id).await.unwrap();
    assert_eq!(comments.len(), 1);
    assert_eq!(comments[0].article_id, target.id);
    assert_eq!(comments[0].content, "Nice post");
    assert!(db::list_comments(&app.state.pool, decoy.id)
        .await
        .unwrap()
        .is_empty());
}

#[tokio::test]
async fn posted_comments_show_on_the_detail_page() {
    let app = TestApp::new().await;
    let (alice, token) = app.user("alice").await;
    let article = app.article(&alice, "Hello", "World").await;
    let path = format!("/articles/{}/", article.id);

    for content in ["first", "second"] {
        let response = app
            .post_form(&path, Some(&token), &format!("content={content}"))
            .await;
        assert_eq!(response.status, StatusCode::FOUND);
    }

    let response = app.get(&path, Some(&token)).await;
    let comments = response.body["comments"].as_array().unwrap();
    assert_eq!(comments.len(), 2);
    assert_eq!(comments[0]["content"], "first");
    assert_eq!(comments[1]["content"], "second");
    assert_eq!(comments[1]["article_id"], article.id);
}

#[tokio::test]
async fn invalid_comment_is_rerendered_with_errors() {
    let app = TestApp::new().await;
    let (alice, token) = app.user("alice").await;
    let article = app.article(&alice, "Hello", "World").await;
    let path = format!("/articles/{}/", article.id);

    let blank = app.post_form(&path, Some(&token), "content=").await;
    assert_eq!(blank.status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(
        blank.body["form"]["errors"]["content"][0],
        "comment can't be blank"
    );
    assert_eq!(blank.body["article"]["id"], article.id);

    let missing = app.post_form(&path, Some(&token), "").await;
    assert_eq!(missing.status, StatusCode::UNPROCESSABLE_ENTITY);

    let long = app
        .post_form(&path, Some(&token), &format!("content={}", "a".repeat(141)))
        .await;
    assert_eq!(long.status, StatusCode::UNPROCESSABLE_ENTITY);

    assert!(db::list_comments(&app.state.pool, article.id)
        .await
        .unwrap()
        .is_empty());
}

#[tokio::test]
async fn comment_on_missing_article_is_not_found() {
    let app = TestApp::new().await;
    let (_, token) = app.user("alice").await;

    let response = app
        .post_form("/articles/7/", Some(&token), "content=hello")
        .await;

    assert_eq!(response.status, StatusCode::NOT_FOUND);
    assert_eq!(response.body["error"], "Not Found");
}
