//! HttpQuizApi against a wiremock backend.

use quiz_progress::models::{QuestionKind, Selection};
use quiz_progress::protocol::{FlagsUpdate, StartRequest};
use quiz_progress::session::{Mode, Screen, Session, TagKind};
use quiz_progress::{ApiError, ClientConfig, HttpQuizApi, QuizApi};
use serde_json::json;
use wiremock::matchers::{body_json, header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn question_body(uid: &str, answer: Option<&str>) -> serde_json::Value {
    let mut body = json!({
        "uid": uid,
        "question": format!("Prompt {uid}"),
        "type": "单选题",
        "options": {"A": "yes", "B": "no"},
        "explanation": "because"
    });
    if let Some(answer) = answer {
        body["answer"] = json!(answer);
    }
    body
}

#[tokio::test]
async fn test_user_data_keeps_progress_order() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/user/data"))
        .respond_with(ResponseTemplate::new(200).set_body_raw(
            r#"{
                "last_choice": {"1-1": {"correct": false, "selected": ["A", "C"]}},
                "global": {"wrong": ["1-1"], "star": []},
                "progress": {
                    "wrong": {"list": ["1-1"], "pos": 0},
                    "sequential": {"list": ["1-1", "1-2"], "pos": 1, "reveal": false}
                },
                "current_progress_key": null
            }"#,
            "application/json",
        ))
        .expect(1)
        .mount(&server)
        .await;

    let api = HttpQuizApi::with_base_url(server.uri());
    let data = api.user_data().await.unwrap();

    assert_eq!(data.progress.keys().next().map(String::as_str), Some("wrong"));
    assert_eq!(data.progress.get("sequential").unwrap().pos, 1);
    assert_eq!(
        data.last_choice["1-1"].selected,
        Selection::many(["A", "C"])
    );
    assert!(data.global.is_wrong("1-1"));
}

#[tokio::test]
async fn test_question_requests_disclosure_with_reveal_param() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/question"))
        .and(query_param("uid", "1-1"))
        .and(query_param("reveal", "1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(question_body("1-1", Some("B"))))
        .expect(1)
        .mount(&server)
        .await;

    let api = HttpQuizApi::with_base_url(server.uri());
    let question = api.question("1-1", true).await.unwrap();

    assert_eq!(question.kind, QuestionKind::SingleChoice);
    assert_eq!(question.prompt, "Prompt 1-1");
    assert_eq!(question.options.keys().collect::<Vec<_>>(), ["A", "B"]);
    assert_eq!(question.answer, Some(Selection::one("B")));
}

#[tokio::test]
async fn test_answer_posts_selection() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/answer"))
        .and(body_json(json!({"uid": "1-1", "selected": ["A", "B"]})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "correct": false,
            "answer": ["A", "C"]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let api = HttpQuizApi::with_base_url(server.uri());
    let verdict = api
        .answer("1-1", &Selection::many(["B", "A"]))
        .await
        .unwrap();

    assert!(!verdict.correct);
    assert_eq!(verdict.answer, Some(Selection::many(["A", "C"])));
}

#[tokio::test]
async fn test_star_and_progress_bodies() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/star"))
        .and(body_json(json!({"uid": "1-2", "action": "toggle"})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"starred": true})))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/api/progress/save"))
        .and(body_json(json!({"key": "sequential:1", "pos": 4})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"ok": true})))
        .expect(1)
        .mount(&server)
        .await;

    let api = HttpQuizApi::with_base_url(server.uri());
    assert!(api.toggle_star("1-2").await.unwrap());
    api.save_progress("sequential:1", 4).await.unwrap();
}

#[tokio::test]
async fn test_flags_update_sends_only_set_fields() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/flags"))
        .and(body_json(json!({"show_explanations": true})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "show_explanations": true,
            "reveal_mode": false
        })))
        .expect(1)
        .mount(&server)
        .await;

    let api = HttpQuizApi::with_base_url(server.uri());
    let flags = api
        .update_flags(FlagsUpdate {
            show_explanations: Some(true),
            reveal_mode: None,
        })
        .await
        .unwrap();
    assert!(flags.show_explanations);
    assert!(!flags.reveal_mode);
}

#[tokio::test]
async fn test_error_status_carries_backend_message() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/question"))
        .respond_with(ResponseTemplate::new(404).set_body_json(json!({"error": "not found"})))
        .mount(&server)
        .await;

    let api = HttpQuizApi::with_base_url(server.uri());
    let err = api.question("nope", false).await.unwrap_err();

    assert_eq!(err.status(), Some(404));
    match err {
        ApiError::Status {
            endpoint, message, ..
        } => {
            assert_eq!(endpoint, "/api/question");
            assert_eq!(message, "not found");
        }
        other => panic!("unexpected error: {other:?}"),
    }
}

#[tokio::test]
async fn test_malformed_body_is_decode_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/flags"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>"))
        .mount(&server)
        .await;

    let api = HttpQuizApi::with_base_url(server.uri());
    let err = api.flags().await.unwrap_err();
    assert!(matches!(err, ApiError::Decode { endpoint: "/api/flags", .. }));
}

#[tokio::test]
async fn test_session_cookie_is_sent() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/clear_unit"))
        .and(header("cookie", "session=abc"))
        .and(body_json(json!({"unit": "3"})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"ok": true})))
        .expect(1)
        .mount(&server)
        .await;

    let config = ClientConfig::default()
        .with_base_url(server.uri())
        .with_session_cookie("session=abc");
    let api = HttpQuizApi::new(&config).unwrap();
    api.clear_unit("3").await.unwrap();
}

#[tokio::test]
async fn test_tag_session_over_http() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/start"))
        .and(body_json(json!({"mode": "tag", "tag": "wrong"})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "list": ["1-1"], "pos": 0, "reveal": false, "key": "tag:wrong"
        })))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/user/data"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "last_choice": {"1-1": {"correct": false, "selected": "B"}},
            "global": {"wrong": ["1-1"], "star": []},
            "progress": {"tag:wrong": {"list": ["1-1"], "pos": 0, "reveal": false}},
            "current_progress_key": "tag:wrong"
        })))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/flags"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({})))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/question"))
        .respond_with(ResponseTemplate::new(200).set_body_json(question_body("1-1", None)))
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/api/answer"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "correct": true, "answer": "A"
        })))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/api/progress/save"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"ok": true})))
        .mount(&server)
        .await;

    let api = HttpQuizApi::with_base_url(server.uri());
    let mut session = Session::begin(api, &StartRequest::tag("wrong")).await.unwrap();
    session.load_current().await.unwrap();
    assert_eq!(session.mode(), &Mode::TagFiltered(TagKind::Wrong));

    let Screen::Question(view) = session.screen() else {
        panic!("question expected");
    };
    assert!(view.interactive);

    let outcome = session.choose("A").await.unwrap();
    assert!(outcome.verdict.correct);
    assert!(!session.cache().is_wrong("1-1"));
    assert!(!session.availability().is_available("1-1"));
}

#[tokio::test]
async fn test_session_starts_despite_backend_nulls() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/user/data"))
        .respond_with(ResponseTemplate::new(200).set_body_raw(
            r#"{
                "last_choice": {"1-1": {"correct": false, "selected": null}},
                "global": {"wrong": ["1-1"], "star": []},
                "progress": {"sequential:1": {"list": ["1-1"], "pos": 0, "reveal": false}},
                "current_progress_key": "sequential:1"
            }"#,
            "application/json",
        ))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/flags"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({})))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/question"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "uid": "1-1",
            "question": null,
            "type": null,
            "options": {"A": "yes", "B": "no"},
            "answer": "A"
        })))
        .mount(&server)
        .await;

    let api = HttpQuizApi::with_base_url(server.uri());
    let mut session = Session::start(api).await.unwrap();
    session.load_current().await.unwrap();

    let Screen::Question(view) = session.screen() else {
        panic!("question expected");
    };
    assert_eq!(view.kind, QuestionKind::SingleChoice);
    assert!(!view.interactive);
    assert!(view.options.iter().all(|o| !o.marks.selected));
    assert!(view.feedback.as_ref().is_some_and(|f| !f.correct));
}
