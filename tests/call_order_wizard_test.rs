use admin_console::core::order_form::OrderDraft;
use admin_console::core::wizard::{LookupState, SubmissionState, WizardStep};
use admin_console::{AdminError, ApiClient, CallOrderWizard};
use httpmock::prelude::*;
use std::time::Duration;

fn draft() -> OrderDraft {
    OrderDraft {
        product_id: "maize-50kg".to_string(),
        quantity: "10".to_string(),
        unit_price: "95.00".to_string(),
        delivery_address: "Kejetia, Kumasi".to_string(),
        notes: String::new(),
    }
}

fn buyers_body() -> serde_json::Value {
    serde_json::json!({
        "status": 200,
        "data": [
            {"id": "b-17", "name": "Ama Mensah", "phone": "+233241234567", "region": "Ashanti"}
        ]
    })
}

#[tokio::test]
async fn test_end_to_end_call_order_with_real_http() {
    let server = MockServer::start();

    let lookup = server.mock(|when, then| {
        when.method(GET)
            .path("/buyers")
            .query_param("search", "2412")
            .header("Authorization", "Bearer agent-token");
        then.status(200)
            .header("Content-Type", "application/json")
            .json_body(buyers_body());
    });

    let submit = server.mock(|when, then| {
        when.method(POST)
            .path("/call-orders")
            .json_body(serde_json::json!({
                "buyerId": "b-17",
                "productId": "maize-50kg",
                "quantity": 10,
                "unitPrice": 95.0,
                "deliveryAddress": "Kejetia, Kumasi"
            }));
        then.status(201).json_body(serde_json::json!({
            "status": 201,
            "message": "Call order created",
            "data": {
                "id": "co-501",
                "buyerId": "b-17",
                "productId": "maize-50kg",
                "quantity": 10,
                "unitPrice": 95.0,
                "deliveryAddress": "Kejetia, Kumasi",
                "status": "pending"
            }
        }));
    });

    let client = ApiClient::new(&server.base_url())
        .unwrap()
        .with_token("agent-token");
    let mut wizard = CallOrderWizard::new(client);

    assert_eq!(wizard.search("2412").await.unwrap(), 1);
    wizard.select_customer(0).unwrap();
    wizard.confirm_customer().unwrap();
    wizard.submit_details(draft()).unwrap();
    assert_eq!(wizard.step().number(), 4);

    let created = wizard.submit().await.unwrap();

    lookup.assert();
    submit.assert();
    assert_eq!(created.id, "co-501");
    assert_eq!(created.status.as_deref(), Some("pending"));
    assert_eq!(wizard.step(), &WizardStep::default());
}

#[tokio::test]
async fn test_lookup_without_match_shows_empty_state() {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(GET).path("/buyers").query_param("search", "9999");
        then.status(200)
            .json_body(serde_json::json!({"status": 200, "data": []}));
    });

    let client = ApiClient::new(&server.base_url()).unwrap();
    let mut wizard = CallOrderWizard::new(client);

    assert_eq!(wizard.search("9999").await.unwrap(), 0);
    match wizard.step() {
        WizardStep::SearchCustomer { search, lookup } => {
            assert_eq!(search.query, "9999");
            assert_eq!(*lookup, LookupState::Empty);
        }
        other => panic!("unexpected step {:?}", other),
    }
    assert!(matches!(
        wizard.select_customer(0),
        Err(AdminError::InvalidTransition { .. })
    ));
}

#[tokio::test]
async fn test_lookup_failure_is_reported_and_wizard_stays_put() {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(GET).path("/buyers");
        then.status(500);
    });

    let client = ApiClient::new(&server.base_url()).unwrap();
    let mut wizard = CallOrderWizard::new(client);

    let err = wizard.search("0241").await.unwrap_err();
    assert!(matches!(err, AdminError::Api { status: 500, .. }));
    assert!(matches!(
        wizard.step(),
        WizardStep::SearchCustomer {
            lookup: LookupState::Failed { .. },
            ..
        }
    ));
}

#[tokio::test]
async fn test_failed_submission_can_be_retried_without_reentry() {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(GET).path("/buyers");
        then.status(200).json_body(buyers_body());
    });
    let mut failing = server.mock(|when, then| {
        when.method(POST).path("/call-orders");
        then.status(503)
            .json_body(serde_json::json!({"status": 503, "message": "Order service is busy"}));
    });

    let client = ApiClient::new(&server.base_url()).unwrap();
    let mut wizard = CallOrderWizard::new(client);
    wizard.search("2412").await.unwrap();
    wizard.select_customer(0).unwrap();
    wizard.confirm_customer().unwrap();
    wizard.submit_details(draft()).unwrap();

    let err = wizard.submit().await.unwrap_err();
    assert_eq!(err.user_friendly_message(), "Order service is busy");
    assert_eq!(
        wizard.step().customer().map(|b| b.id.as_str()),
        Some("b-17")
    );
    assert!(matches!(
        wizard.step(),
        WizardStep::ReviewAndSubmit {
            submission: SubmissionState::Failed { .. },
            ..
        }
    ));

    failing.delete();
    server.mock(|when, then| {
        when.method(POST).path("/call-orders");
        then.status(201).json_body(serde_json::json!({
            "status": 201,
            "data": {
                "id": "co-502",
                "buyerId": "b-17",
                "productId": "maize-50kg",
                "quantity": 10,
                "unitPrice": 95.0,
                "deliveryAddress": "Kejetia, Kumasi"
            }
        }));
    });

    let created = wizard.submit().await.unwrap();
    assert_eq!(created.id, "co-502");
    assert_eq!(wizard.step().number(), 1);
}

#[tokio::test]
async fn test_timed_out_submission_can_be_retried() {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(GET).path("/buyers");
        then.status(200).json_body(buyers_body());
    });
    let mut slow = server.mock(|when, then| {
        when.method(POST).path("/call-orders");
        then.status(201)
            .delay(Duration::from_millis(500))
            .json_body(serde_json::json!({"status": 201, "data": null}));
    });

    let client = ApiClient::new(&server.base_url()).unwrap();
    let mut wizard = CallOrderWizard::new(client);
    wizard.search("2412").await.unwrap();
    wizard.select_customer(0).unwrap();
    wizard.confirm_customer().unwrap();
    wizard.submit_details(draft()).unwrap();

    let timed_out = tokio::time::timeout(Duration::from_millis(50), wizard.submit()).await;
    assert!(timed_out.is_err());
    assert!(matches!(
        wizard.step(),
        WizardStep::ReviewAndSubmit {
            submission: SubmissionState::Ready,
            ..
        }
    ));

    wizard.back().unwrap();
    assert_eq!(wizard.step().number(), 3);
    wizard.submit_details(draft()).unwrap();

    slow.delete();
    server.mock(|when, then| {
        when.method(POST).path("/call-orders");
        then.status(201).json_body(serde_json::json!({
            "status": 201,
            "data": {
                "id": "co-503",
                "buyerId": "b-17",
                "productId": "maize-50kg",
                "quantity": 10,
                "unitPrice": 95.0,
                "deliveryAddress": "Kejetia, Kumasi"
            }
        }));
    });

    let created = wizard.submit().await.unwrap();
    assert_eq!(created.id, "co-503");
    assert_eq!(wizard.step().number(), 1);
}

#[tokio::test]
async fn test_invalid_details_never_reach_the_backend() {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(GET).path("/buyers");
        then.status(200).json_body(buyers_body());
    });
    let submit = server.mock(|when, then| {
        when.method(POST).path("/call-orders");
        then.status(201);
    });

    let client = ApiClient::new(&server.base_url()).unwrap();
    let mut wizard = CallOrderWizard::new(client);
    wizard.search("2412").await.unwrap();
    wizard.select_customer(0).unwrap();
    wizard.confirm_customer().unwrap();

    let mut bad = draft();
    bad.unit_price = "0".to_string();
    let err = wizard.submit_details(bad).unwrap_err();

    assert!(matches!(err, AdminError::ValidationError { .. }));
    assert!(wizard.submit().await.is_err());
    submit.assert_hits(0);
}
