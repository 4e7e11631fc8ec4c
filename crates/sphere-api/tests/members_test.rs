//! Integration tests for business and member management.

mod common;

use axum::http::{Method, StatusCode};
use serde_json::json;

use common::{unique_email, TestApp};

#[tokio::test]
async fn test_get_and_rename_business() {
    let app = TestApp::new();
    let owner = app.create_business().await;

    let (status, body) = app
        .request(Method::PUT, "/api/business", Some(&owner.token), Some(json!({"name": " Renamed "})))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["name"], "Renamed");
    assert_eq!(body["businessCode"], owner.business_code.as_str());

    let (status, body) = app.request(Method::GET, "/api/business", Some(&owner.token), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["name"], "Renamed");
    assert_eq!(body["id"], owner.business_id.as_str());
}

#[tokio::test]
async fn test_rename_requires_admin_and_valid_name() {
    let app = TestApp::new();
    let owner = app.create_business().await;
    let manager = app.join(&owner, "manager").await;

    let (status, body) = app
        .request(Method::PUT, "/api/business", Some(&manager.token), Some(json!({"name": "Nope"})))
        .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["error"], "FORBIDDEN");

    let (status, body) = app
        .request(Method::PUT, "/api/business", Some(&owner.token), Some(json!({"name": "x".repeat(101)})))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "VALIDATION_ERROR");
}

#[tokio::test]
async fn test_members_are_scoped_to_their_business() {
    let app = TestApp::new();
    let first = app.create_business().await;
    let second = app.create_business().await;
    let outsider = app.join(&second, "user").await;

    let (status, body) = app.request(Method::GET, "/api/users", Some(&first.token), None).await;
    assert_eq!(status, StatusCode::OK);
    let members = body.as_array().unwrap();
    assert_eq!(members.len(), 1);
    assert_eq!(members[0]["id"], first.user_id.as_str());
    assert!(members[0].get("passwordHash").is_none());

    // Another tenant's user looks exactly like a missing one
    let (status, body) = app
        .request(
            Method::PUT,
            &format!("/api/users/{}/role", outsider.user_id),
            Some(&first.token),
            Some(json!({"role": "admin"})),
        )
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "USER_NOT_FOUND");

    let (status, _) = app
        .request(Method::DELETE, &format!("/api/users/{}", outsider.user_id), Some(&first.token), None)
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (_, body) = app.request(Method::GET, "/api/users", Some(&second.token), None).await;
    assert_eq!(body.as_array().unwrap().len(), 2);
}

#[tokio::test]
async fn test_role_guards() {
    let app = TestApp::new();
    let owner = app.create_business().await;
    let manager = app.join(&owner, "manager").await;
    let user = app.join(&owner, "user").await;

    let invite = json!({"email": unique_email()});
    let (status, _) = app
        .request(Method::POST, "/api/users/invite", Some(&manager.token), Some(invite.clone()))
        .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    let (status, _) = app
        .request(Method::POST, "/api/users/invite", Some(&user.token), Some(invite))
        .await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, _) = app
        .request(Method::GET, "/api/users/invitations", Some(&manager.token), None)
        .await;
    assert_eq!(status, StatusCode::OK);
    let (status, _) = app
        .request(Method::GET, "/api/users/invitations", Some(&user.token), None)
        .await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    // Every member may list colleagues
    let (status, body) = app.request(Method::GET, "/api/users", Some(&user.token), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body.as_array().unwrap().len(), 3);
}

#[tokio::test]
async fn test_invite_defaults_and_reuse() {
    let app = TestApp::new();
    let owner = app.create_business().await;
    let email = unique_email();

    let (status, first) = app
        .request(Method::POST, "/api/users/invite", Some(&owner.token), Some(json!({"email": email})))
        .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(first["role"], "user");
    assert!(first["expiresAt"].is_string());
    let code = first["invitationCode"].as_str().unwrap();
    assert!(sphere_security::codes::is_invitation_code(code));

    let (status, second) = app
        .request(
            Method::POST,
            "/api/users/invite",
            Some(&owner.token),
            Some(json!({"email": email.to_uppercase(), "role": "manager"})),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(second["id"], first["id"]);
    assert_eq!(second["invitationCode"], first["invitationCode"]);
    assert_eq!(second["role"], "manager");

    let (_, pending) = app
        .request(Method::GET, "/api/users/invitations", Some(&owner.token), None)
        .await;
    assert_eq!(pending.as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn test_invite_rejects_registered_email_and_bad_role() {
    let app = TestApp::new();
    let owner = app.create_business().await;
    let other = app.create_business().await;

    let (status, body) = app
        .request(Method::POST, "/api/users/invite", Some(&owner.token), Some(json!({"email": other.email})))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "EMAIL_IN_USE");

    let (status, body) = app
        .request(
            Method::POST,
            "/api/users/invite",
            Some(&owner.token),
            Some(json!({"email": unique_email(), "role": "superuser"})),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "VALIDATION_ERROR");

    let (status, body) = app
        .request(
            Method::POST,
            "/api/users/invite",
            Some(&owner.token),
            Some(json!({"email": common::overlong_email()})),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "VALIDATION_ERROR");
}

#[tokio::test]
async fn test_change_member_role() {
    let app = TestApp::new();
    let owner = app.create_business().await;
    let member = app.join(&owner, "user").await;

    let (status, body) = app
        .request(
            Method::PUT,
            &format!("/api/users/{}/role", member.user_id),
            Some(&owner.token),
            Some(json!({"role": "manager"})),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["id"], member.user_id.as_str());
    assert_eq!(body["role"], "manager");
}

#[tokio::test]
async fn test_owner_is_protected() {
    let app = TestApp::new();
    let owner = app.create_business().await;
    let second_admin = app.join(&owner, "admin").await;

    let (status, body) = app
        .request(
            Method::PUT,
            &format!("/api/users/{}/role", owner.user_id),
            Some(&second_admin.token),
            Some(json!({"role": "user"})),
        )
        .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["error"], "OWNER_ROLE_IMMUTABLE");

    let (status, body) = app
        .request(Method::DELETE, &format!("/api/users/{}", owner.user_id), Some(&second_admin.token), None)
        .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["error"], "CANNOT_REMOVE_OWNER");

    let (status, body) = app
        .request(
            Method::DELETE,
            &format!("/api/users/{}", second_admin.user_id),
            Some(&second_admin.token),
            None,
        )
        .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["error"], "CANNOT_REMOVE_SELF");
}

#[tokio::test]
async fn test_remove_member() {
    let app = TestApp::new();
    let owner = app.create_business().await;
    let member = app.join(&owner, "user").await;

    let (status, body) = app
        .request(Method::DELETE, &format!("/api/users/{}", member.user_id), Some(&owner.token), None)
        .await;
    assert_eq!(status, StatusCode::OK);
    assert!(body["message"].is_string());

    let (_, body) = app.request(Method::GET, "/api/users", Some(&owner.token), None).await;
    assert_eq!(body.as_array().unwrap().len(), 1);

    let (status, _) = app.login(&member.email, common::PASSWORD, &owner.business_code).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_malformed_user_id_is_not_found() {
    let app = TestApp::new();
    let owner = app.create_business().await;

    let (status, body) = app
        .request(Method::DELETE, "/api/users/not-a-uuid", Some(&owner.token), None)
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "USER_NOT_FOUND");
}

#[tokio::test]
async fn test_invitations_path_is_not_a_user_id() {
    let app = TestApp::new();
    let owner = app.create_business().await;

    // The static route wins over `{user_id}` and only serves GET
    let (status, _) = app
        .request(Method::DELETE, "/api/users/invitations", Some(&owner.token), None)
        .await;
    assert_eq!(status, StatusCode::METHOD_NOT_ALLOWED);

    let (status, body) = app
        .request(Method::GET, "/api/users/invitations", Some(&owner.token), None)
        .await;
    assert_eq!(status, StatusCode::OK);
    assert!(body.as_array().unwrap().is_empty());
}

#[tokio::test]
async fn test_demoted_admin_token_loses_admin_rights() {
    let app = TestApp::new();
    let owner = app.create_business().await;
    let admin = app.join(&owner, "admin").await;

    let (status, _) = app
        .request(
            Method::PUT,
            &format!("/api/users/{}/role", admin.user_id),
            Some(&owner.token),
            Some(json!({"role": "user"})),
        )
        .await;
    assert_eq!(status, StatusCode::OK);

    // The old token still claims admin; the stored role decides
    let (status, body) = app
        .request(Method::POST, "/api/users/invite", Some(&admin.token), Some(json!({"email": unique_email()})))
        .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["error"], "FORBIDDEN");
}
