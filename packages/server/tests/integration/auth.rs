use serde_json::json;

use crate::common::{TestApp, TestResponse, routes};

fn signup_body(username: &str, password: &str, repeat: &str) -> serde_json::Value {
    json!({
        "username": username,
        "email": "alice@example.com",
        "password": password,
        "repeat_password": repeat,
    })
}

mod signup {
    use super::*;

    #[tokio::test]
    async fn new_user_can_sign_up_and_is_signed_in() {
        let app = TestApp::spawn().await;

        let res = app
            .post_without_token(
                routes::SIGNUP,
                &signup_body("alice", "securepass", "securepass"),
            )
            .await;

        assert_eq!(res.status, 201, "Signup failed: {}", res.text);
        assert!(res.body["id"].is_number());
        assert_eq!(res.body["username"], "alice");

        let token = res.body["token"].as_str().expect("token");
        let me = app.get_with_token(routes::ME, token).await;
        assert_eq!(me.status, 200);
        assert_eq!(me.body["username"], "alice");
    }

    #[tokio::test]
    async fn cannot_sign_up_with_an_already_taken_username() {
        let app = TestApp::spawn().await;
        let body = signup_body("alice", "securepass", "securepass");

        let first = app.post_without_token(routes::SIGNUP, &body).await;
        assert_eq!(first.status, 201, "First signup failed: {}", first.text);

        let res = app.post_without_token(routes::SIGNUP, &body).await;

        assert_eq!(res.status, 409);
        assert_eq!(res.body["code"], "USERNAME_TAKEN");
    }

    #[tokio::test]
    async fn cannot_sign_up_when_passwords_differ() {
        let app = TestApp::spawn().await;

        let res = app
            .post_without_token(
                routes::SIGNUP,
                &signup_body("alice", "securepass", "securepasz"),
            )
            .await;

        assert_eq!(res.status, 400);
        assert_eq!(res.body["code"], "PASSWORD_MISMATCH");
        assert_eq!(res.body["error"], "Passwords do not match");
    }

    #[tokio::test]
    async fn cannot_sign_up_with_a_password_that_is_too_short() {
        let app = TestApp::spawn().await;

        let res = app
            .post_without_token(routes::SIGNUP, &signup_body("alice", "short", "short"))
            .await;

        assert_eq!(res.status, 400);
        assert_eq!(res.body["code"], "VALIDATION_ERROR");
    }

    #[tokio::test]
    async fn cannot_sign_up_with_an_invalid_username() {
        let app = TestApp::spawn().await;

        let res = app
            .post_without_token(
                routes::SIGNUP,
                &signup_body("no spaces!", "securepass", "securepass"),
            )
            .await;

        assert_eq!(res.status, 400);
        assert_eq!(res.body["code"], "VALIDATION_ERROR");
    }

    #[tokio::test]
    async fn signup_sets_the_session_cookie() {
        let app = TestApp::spawn().await;
        let client = app.session_client();

        let res = client
            .post(app.url(routes::SIGNUP))
            .json(&signup_body("alice", "securepass", "securepass"))
            .send()
            .await
            .expect("Failed to send request");
        assert_eq!(res.status(), 201);

        let me = client
            .get(app.url(routes::ME))
            .send()
            .await
            .expect("Failed to send request");
        assert_eq!(me.status(), 200);
    }
}

mod login {
    use super::*;

    #[tokio::test]
    async fn registered_user_can_login_and_receives_token() {
        let app = TestApp::spawn().await;
        app.create_authenticated_user("alice", "securepass").await;

        let res = app
            .post_without_token(
                routes::LOGIN,
                &json!({"username": "alice", "password": "securepass"}),
            )
            .await;

        assert_eq!(res.status, 200);
        assert!(res.body["token"].is_string());
        assert_eq!(res.body["username"], "alice");
    }

    #[tokio::test]
    async fn cannot_login_with_wrong_password() {
        let app = TestApp::spawn().await;
        app.create_authenticated_user("alice", "securepass").await;

        let res = app
            .post_without_token(
                routes::LOGIN,
                &json!({"username": "alice", "password": "wrongpass"}),
            )
            .await;

        assert_eq!(res.status, 401);
        assert_eq!(res.body["code"], "INVALID_CREDENTIALS");
        assert_eq!(res.body["error"], "Credentials not correct");
    }

    #[tokio::test]
    async fn cannot_login_with_nonexistent_username() {
        let app = TestApp::spawn().await;

        let res = app
            .post_without_token(
                routes::LOGIN,
                &json!({"username": "nobody", "password": "securepass"}),
            )
            .await;

        assert_eq!(res.status, 401);
        assert_eq!(res.body["code"], "INVALID_CREDENTIALS");
    }
}

mod session_cookie {
    use super::*;

    #[tokio::test]
    async fn login_cookie_authenticates_until_logout() {
        let app = TestApp::spawn().await;
        app.create_authenticated_user("alice", "securepass").await;
        let client = app.session_client();

        let login = client
            .post(app.url(routes::LOGIN))
            .json(&json!({"username": "alice", "password": "securepass"}))
            .send()
            .await
            .expect("Failed to send request");
        assert_eq!(login.status(), 200);

        let me = client.get(app.url(routes::ME)).send().await.unwrap();
        let me = TestResponse::from_response(me).await;
        assert_eq!(me.status, 200);
        assert_eq!(me.body["username"], "alice");

        let logout = client.post(app.url(routes::LOGOUT)).send().await.unwrap();
        assert_eq!(logout.status(), 204);

        let me = client.get(app.url(routes::ME)).send().await.unwrap();
        let me = TestResponse::from_response(me).await;
        assert_eq!(me.status, 401);
        assert_eq!(me.body["code"], "TOKEN_MISSING");
    }
}

mod request_validation {
    use super::*;

    #[tokio::test]
    async fn malformed_json_body_returns_validation_error() {
        let app = TestApp::spawn().await;

        let res = app
            .client
            .post(app.url(routes::SIGNUP))
            .header("Content-Type", "application/json")
            .body("not valid json")
            .send()
            .await
            .expect("Failed to send request");

        let res = TestResponse::from_response(res).await;
        assert_eq!(res.status, 400);
        assert_eq!(res.body["code"], "VALIDATION_ERROR");
    }

    #[tokio::test]
    async fn missing_required_fields_returns_validation_error() {
        let app = TestApp::spawn().await;

        let res = app
            .post_without_token(routes::SIGNUP, &json!({"username": "alice"}))
            .await;

        assert_eq!(res.status, 400);
        assert_eq!(res.body["code"], "VALIDATION_ERROR");
    }
}

mod authenticated_access {
    use super::*;

    #[tokio::test]
    async fn request_without_token_is_rejected() {
        let app = TestApp::spawn().await;

        let res = app.get_without_token(routes::ME).await;

        assert_eq!(res.status, 401);
        assert_eq!(res.body["code"], "TOKEN_MISSING");
    }

    #[tokio::test]
    async fn request_with_malformed_token_is_rejected() {
        let app = TestApp::spawn().await;

        let res = app.get_with_token(routes::ME, "not-a-valid-jwt").await;

        assert_eq!(res.status, 401);
        assert_eq!(res.body["code"], "TOKEN_INVALID");
    }

    #[tokio::test]
    async fn request_with_non_bearer_auth_scheme_is_rejected() {
        let app = TestApp::spawn().await;

        let res = app
            .client
            .get(app.url(routes::ME))
            .header("Authorization", "Basic abc123")
            .send()
            .await
            .expect("Failed to send request");

        let res = TestResponse::from_response(res).await;
        assert_eq!(res.status, 401);
        assert_eq!(res.body["code"], "TOKEN_INVALID");
    }
}
