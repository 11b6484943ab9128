//! Integration tests for the ARM client using wiremock
//!
//! These tests run the client and the long-running-operation poller against
//! mocked endpoints, covering error envelopes and every polling strategy.

use azurerm_provider::azure::ArmClient;
use azurerm_provider::config::ProviderConfig;
use azurerm_provider::Error;
use serde_json::{json, Value};
use std::time::Duration;
use wiremock::matchers::{bearer_token, body_json, header, header_exists, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

const SUBSCRIPTION: &str = "00000000-0000-0000-0000-000000000000";
const API_VERSION: &str = "2020-03-20";

fn resource_path() -> String {
    format!(
        "/subscriptions/{}/resourceGroups/rg1/providers/Microsoft.AVS/privateClouds/pc1",
        SUBSCRIPTION
    )
}

fn client(server: &MockServer) -> ArmClient {
    let config = ProviderConfig {
        subscription_id: Some(SUBSCRIPTION.to_string()),
        endpoint: Some(server.uri()),
        access_token: Some("test-token".to_string()),
        ..ProviderConfig::default()
    };
    ArmClient::new(&config)
        .expect("valid config")
        .with_poll_interval(Duration::from_millis(10))
}

mod request_tests {
    use super::*;

    #[tokio::test]
    async fn test_get_sends_token_version_and_request_id() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path(resource_path()))
            .and(query_param("api-version", API_VERSION))
            .and(bearer_token("test-token"))
            .and(header_exists("x-ms-client-request-id"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "name": "pc1",
                "properties": {"provisioningState": "Succeeded"}
            })))
            .expect(1)
            .mount(&server)
            .await;

        let body: Value = client(&server)
            .get_json(&resource_path(), API_VERSION)
            .await
            .expect("GET should succeed");

        assert_eq!(body["name"], "pc1");
    }

    #[tokio::test]
    async fn test_extra_query_parameters_are_appended() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path(resource_path()))
            .and(query_param("api-version", API_VERSION))
            .and(query_param("$expand", "transformation"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"name": "pc1"})))
            .expect(1)
            .mount(&server)
            .await;

        let body: Value = client(&server)
            .get_json_with_query(&resource_path(), API_VERSION, &[("$expand", "transformation")])
            .await
            .expect("GET should succeed");

        assert_eq!(body["name"], "pc1");
    }

    #[tokio::test]
    async fn test_put_if_none_match_sends_precondition() {
        let server = MockServer::start().await;

        Mock::given(method("PUT"))
            .and(path("/providers/Microsoft.Portal/tenantConfigurations/default"))
            .and(header("If-None-Match", "*"))
            .and(body_json(json!({"properties": {"enforcePrivateMarkdownStorage": true}})))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({})))
            .expect(1)
            .mount(&server)
            .await;

        let response = client(&server)
            .put_if_none_match(
                "/providers/Microsoft.Portal/tenantConfigurations/default",
                "2020-09-01-preview",
                &json!({"properties": {"enforcePrivateMarkdownStorage": true}}),
            )
            .await
            .expect("PUT should succeed");

        assert_eq!(response.status, 200);
    }

    #[tokio::test]
    async fn test_post_without_body() {
        let server = MockServer::start().await;
        let list_keys = format!(
            "/subscriptions/{}/resourceGroups/rg1/providers/Microsoft.Search/searchServices/s1/listAdminKeys",
            SUBSCRIPTION
        );

        Mock::given(method("POST"))
            .and(path(list_keys.as_str()))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "primaryKey": "p",
                "secondaryKey": "s"
            })))
            .expect(1)
            .mount(&server)
            .await;

        let response = client(&server)
            .post(&list_keys, "2020-03-13", None)
            .await
            .expect("POST should succeed");

        assert_eq!(response.body["primaryKey"], "p");
    }

    #[tokio::test]
    async fn test_decode_failure_reports_url() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path(resource_path()))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"count": "three"})))
            .mount(&server)
            .await;

        #[derive(Debug, serde::Deserialize)]
        struct Counted {
            #[allow(dead_code)]
            count: u32,
        }

        let err = client(&server)
            .get_json::<Counted>(&resource_path(), API_VERSION)
            .await
            .unwrap_err();

        match err {
            Error::Deserialization { message, body } => {
                assert!(message.contains("privateClouds/pc1"));
                assert!(body.contains("three"));
            },
            other => panic!("expected a deserialization error, got {:?}", other),
        }
    }
}

mod error_tests {
    use super::*;

    #[tokio::test]
    async fn test_404_is_not_found_with_envelope() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path(resource_path()))
            .respond_with(ResponseTemplate::new(404).set_body_json(json!({
                "error": {
                    "code": "ResourceNotFound",
                    "message": "The Resource 'Microsoft.AVS/privateClouds/pc1' was not found."
                }
            })))
            .mount(&server)
            .await;

        let err = client(&server)
            .get_json::<Value>(&resource_path(), API_VERSION)
            .await
            .unwrap_err();

        assert!(err.is_not_found());
        match err {
            Error::Api {
                method,
                status,
                code,
                message,
                ..
            } => {
                assert_eq!(method, "GET");
                assert_eq!(status, 404);
                assert_eq!(code, "ResourceNotFound");
                assert!(message.contains("was not found"));
            },
            other => panic!("expected an API error, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_conflict_statuses() {
        let server = MockServer::start().await;

        Mock::given(method("PUT"))
            .respond_with(ResponseTemplate::new(412).set_body_json(json!({
                "error": {"code": "PreconditionFailed", "message": "exists"}
            })))
            .mount(&server)
            .await;

        let err = client(&server)
            .put(&resource_path(), API_VERSION, &json!({}))
            .await
            .unwrap_err();

        assert!(err.is_conflict());
        assert!(!err.is_not_found());
    }

    #[tokio::test]
    async fn test_plain_text_error_body_becomes_message() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(502).set_body_string("Bad Gateway"))
            .mount(&server)
            .await;

        let err = client(&server)
            .get_json::<Value>(&resource_path(), API_VERSION)
            .await
            .unwrap_err();

        assert_eq!(err.status(), Some(502));
        assert!(err.to_string().contains("Bad Gateway"));
        assert!(err.hint().is_some());
    }

    #[tokio::test]
    async fn test_401_has_authentication_hint() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(401).set_body_json(json!({
                "error": {"code": "InvalidAuthenticationToken", "message": "The access token is invalid."}
            })))
            .mount(&server)
            .await;

        let err = client(&server)
            .get_json::<Value>(&resource_path(), API_VERSION)
            .await
            .unwrap_err();

        assert!(err.hint().unwrap_or_default().contains("ARM_ACCESS_TOKEN"));
    }
}

mod polling_tests {
    use super::*;

    #[tokio::test]
    async fn test_async_operation_polled_until_succeeded() {
        let server = MockServer::start().await;
        let status_url = format!("{}/operations/op1", server.uri());

        Mock::given(method("PUT"))
            .and(path(resource_path()))
            .respond_with(
                ResponseTemplate::new(201)
                    .insert_header("Azure-AsyncOperation", status_url.as_str())
                    .set_body_json(json!({"properties": {"provisioningState": "Updating"}})),
            )
            .expect(1)
            .mount(&server)
            .await;

        Mock::given(method("GET"))
            .and(path("/operations/op1"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"status": "InProgress"})))
            .up_to_n_times(2)
            .expect(2)
            .mount(&server)
            .await;

        Mock::given(method("GET"))
            .and(path("/operations/op1"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"status": "Succeeded"})))
            .expect(1)
            .mount(&server)
            .await;

        let client = client(&server);
        let deadline = client.deadline(Duration::from_secs(10), "create");
        client
            .put_then_poll(&resource_path(), API_VERSION, &json!({}), &deadline)
            .await
            .expect("operation should succeed");
    }

    #[tokio::test]
    async fn test_relative_async_operation_url() {
        let server = MockServer::start().await;

        Mock::given(method("PATCH"))
            .respond_with(
                ResponseTemplate::new(200).insert_header("Azure-AsyncOperation", "/operations/op2"),
            )
            .mount(&server)
            .await;

        Mock::given(method("GET"))
            .and(path("/operations/op2"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"status": "Succeeded"})))
            .expect(1)
            .mount(&server)
            .await;

        let client = client(&server);
        let deadline = client.deadline(Duration::from_secs(10), "update");
        client
            .patch_then_poll(&resource_path(), API_VERSION, &json!({}), &deadline)
            .await
            .expect("operation should succeed");
    }

    #[tokio::test]
    async fn test_failed_operation_carries_error() {
        let server = MockServer::start().await;
        let status_url = format!("{}/operations/op3", server.uri());

        Mock::given(method("PUT"))
            .respond_with(
                ResponseTemplate::new(201).insert_header("Azure-AsyncOperation", status_url.as_str()),
            )
            .mount(&server)
            .await;

        Mock::given(method("GET"))
            .and(path("/operations/op3"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "status": "Failed",
                "error": {"code": "QuotaExceeded", "message": "Not enough hosts"}
            })))
            .mount(&server)
            .await;

        let client = client(&server);
        let deadline = client.deadline(Duration::from_secs(10), "create");
        let err = client
            .put_then_poll(&resource_path(), API_VERSION, &json!({}), &deadline)
            .await
            .unwrap_err();

        match err {
            Error::OperationFailed {
                status,
                code,
                message,
            } => {
                assert_eq!(status, "Failed");
                assert_eq!(code, "QuotaExceeded");
                assert_eq!(message, "Not enough hosts");
            },
            other => panic!("expected OperationFailed, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_location_polled_while_accepted() {
        let server = MockServer::start().await;
        let location = format!("{}/operationResults/op4", server.uri());

        Mock::given(method("DELETE"))
            .and(path(resource_path()))
            .respond_with(ResponseTemplate::new(202).insert_header("Location", location.as_str()))
            .expect(1)
            .mount(&server)
            .await;

        Mock::given(method("GET"))
            .and(path("/operationResults/op4"))
            .respond_with(ResponseTemplate::new(202).insert_header("Retry-After", "0"))
            .up_to_n_times(1)
            .expect(1)
            .mount(&server)
            .await;

        Mock::given(method("GET"))
            .and(path("/operationResults/op4"))
            .respond_with(ResponseTemplate::new(204))
            .expect(1)
            .mount(&server)
            .await;

        let client = client(&server);
        let deadline = client.deadline(Duration::from_secs(10), "delete");
        client
            .delete_then_poll(&resource_path(), API_VERSION, &deadline)
            .await
            .expect("delete should finish");
    }

    #[tokio::test]
    async fn test_accepted_delete_without_location_waits_for_404() {
        let server = MockServer::start().await;

        Mock::given(method("DELETE"))
            .and(path(resource_path()))
            .respond_with(ResponseTemplate::new(202))
            .mount(&server)
            .await;

        Mock::given(method("GET"))
            .and(path(resource_path()))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "properties": {"provisioningState": "Deleting"}
            })))
            .up_to_n_times(1)
            .expect(1)
            .mount(&server)
            .await;

        Mock::given(method("GET"))
            .and(path(resource_path()))
            .respond_with(ResponseTemplate::new(404))
            .expect(1)
            .mount(&server)
            .await;

        let client = client(&server);
        let deadline = client.deadline(Duration::from_secs(10), "delete");
        client
            .delete_then_poll(&resource_path(), API_VERSION, &deadline)
            .await
            .expect("delete should finish");
    }

    #[tokio::test]
    async fn test_provisioning_state_polled_on_resource() {
        let server = MockServer::start().await;

        Mock::given(method("PUT"))
            .and(path(resource_path()))
            .respond_with(ResponseTemplate::new(201).set_body_json(json!({
                "properties": {"provisioningState": "Building"}
            })))
            .mount(&server)
            .await;

        Mock::given(method("GET"))
            .and(path(resource_path()))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "properties": {"provisioningState": "Building"}
            })))
            .up_to_n_times(1)
            .expect(1)
            .mount(&server)
            .await;

        Mock::given(method("GET"))
            .and(path(resource_path()))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "properties": {"provisioningState": "Succeeded"}
            })))
            .expect(1)
            .mount(&server)
            .await;

        let client = client(&server);
        let deadline = client.deadline(Duration::from_secs(10), "create");
        client
            .put_then_poll(&resource_path(), API_VERSION, &json!({}), &deadline)
            .await
            .expect("operation should succeed");
    }

    #[tokio::test]
    async fn test_synchronous_success_needs_no_polling() {
        let server = MockServer::start().await;

        Mock::given(method("PUT"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "properties": {"provisioningState": "Succeeded"}
            })))
            .expect(1)
            .mount(&server)
            .await;

        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200))
            .expect(0)
            .mount(&server)
            .await;

        let client = client(&server);
        let deadline = client.deadline(Duration::from_secs(10), "create");
        client
            .put_then_poll(&resource_path(), API_VERSION, &json!({}), &deadline)
            .await
            .expect("operation should succeed");
    }

    #[tokio::test]
    async fn test_deadline_expires_while_in_progress() {
        let server = MockServer::start().await;
        let status_url = format!("{}/operations/op5", server.uri());

        Mock::given(method("PUT"))
            .respond_with(
                ResponseTemplate::new(201).insert_header("Azure-AsyncOperation", status_url.as_str()),
            )
            .mount(&server)
            .await;

        Mock::given(method("GET"))
            .and(path("/operations/op5"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"status": "InProgress"})))
            .mount(&server)
            .await;

        let client = client(&server);
        let deadline = client.deadline(Duration::from_millis(200), "creation of test");
        let err = client
            .put_then_poll(&resource_path(), API_VERSION, &json!({}), &deadline)
            .await
            .unwrap_err();

        assert!(err.is_timeout());
        assert!(err.to_string().contains("creation of test"));
    }
}
