// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Integration tests for the HTTP transport and coordinator using wiremock.

use std::time::Duration;

use pelican_lib::coordinator::{CycleOutcome, CyclePhase, ThermostatConfig, ThermostatCoordinator};
use pelican_lib::protocol::{HttpTransport, Transport};
use pelican_lib::types::SystemMode;
use pelican_lib::{Error, ParseError, ProtocolError};
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

const CORE_FIELDS: &str = "temperature;humidity;co2Level";
const OPTIONAL_FIELDS: &str = "system;heatSetting;coolSetting";

fn xml(success: u8, thermostat: &str) -> String {
    format!(
        "<?xml version=\"1.0\" encoding=\"UTF-8\"?>\
         <response><success>{success}</success>\
         <Thermostat>{thermostat}</Thermostat></response>"
    )
}

fn config(server: &MockServer) -> ThermostatConfig {
    ThermostatConfig::new("demo@example.com", "pelican", "Lobby")
        .with_base_url(format!("{}/api.cgi", server.uri()))
}

async fn mount_get(server: &MockServer, fields: &str, response: ResponseTemplate) {
    Mock::given(method("GET"))
        .and(path("/api.cgi"))
        .and(query_param("request", "get"))
        .and(query_param("value", fields))
        .respond_with(response)
        .mount(server)
        .await;
}

// ============================================================================
// HttpTransport Tests
// ============================================================================

mod http_transport {
    use super::*;

    #[tokio::test]
    async fn sends_all_query_parameters() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/api.cgi"))
            .and(query_param("username", "demo@example.com"))
            .and(query_param("password", "p&ss word"))
            .and(query_param("request", "get"))
            .and(query_param("object", "Thermostat"))
            .and(query_param("selection", "name:Lobby;"))
            .and(query_param("value", CORE_FIELDS))
            .respond_with(ResponseTemplate::new(200).set_body_string(xml(1, "")))
            .expect(1)
            .mount(&server)
            .await;

        let transport = HttpTransport::new().unwrap();
        let params = vec![
            ("username", "demo@example.com".to_string()),
            ("password", "p&ss word".to_string()),
            ("request", "get".to_string()),
            ("object", "Thermostat".to_string()),
            ("selection", "name:Lobby;".to_string()),
            ("value", CORE_FIELDS.to_string()),
        ];

        let body = transport
            .fetch(
                &format!("{}/api.cgi", server.uri()),
                &params,
                Duration::from_secs(5),
            )
            .await
            .unwrap();
        assert!(body.contains("<success>1</success>"));
    }

    #[tokio::test]
    async fn non_success_status_is_error() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(500))
            .mount(&server)
            .await;

        let transport = HttpTransport::new().unwrap();
        let err = transport
            .fetch(&server.uri(), &[], Duration::from_secs(5))
            .await
            .unwrap_err();

        assert!(matches!(err, ProtocolError::HttpStatus { status: 500 }));
    }

    #[tokio::test]
    async fn slow_reply_is_timeout() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_string(xml(1, ""))
                    .set_delay(Duration::from_secs(3)),
            )
            .mount(&server)
            .await;

        let transport = HttpTransport::new().unwrap();
        let err = transport
            .fetch(&server.uri(), &[], Duration::from_millis(200))
            .await
            .unwrap_err();

        assert!(matches!(err, ProtocolError::Timeout(200)));
    }
}

// ============================================================================
// Poll Cycle Tests
// ============================================================================

mod poll_cycle {
    use super::*;

    #[tokio::test]
    async fn merges_core_and_optional_replies() {
        let server = MockServer::start().await;
        mount_get(
            &server,
            CORE_FIELDS,
            ResponseTemplate::new(200).set_body_string(xml(
                1,
                "<temperature>71</temperature><humidity>40</humidity>",
            )),
        )
        .await;
        mount_get(
            &server,
            OPTIONAL_FIELDS,
            ResponseTemplate::new(200)
                .set_body_string(xml(1, "<system>Heat</system><heatSetting>68</heatSetting>")),
        )
        .await;

        let coordinator = ThermostatCoordinator::new(config(&server)).unwrap();
        let outcome = coordinator.refresh_now().await.unwrap();
        let snapshot = coordinator.snapshot();

        assert_eq!(outcome, CycleOutcome::Updated);
        assert_eq!(snapshot.temperature(), Some(71.0));
        assert_eq!(snapshot.humidity(), Some(40.0));
        assert_eq!(snapshot.system_mode(), Some(SystemMode::Heat));
        assert_eq!(snapshot.heat_setting(), Some(68.0));
        assert!(snapshot.co2_level().is_none());
        assert!(snapshot.last_update_succeeded());
        assert!(snapshot.last_success().is_some());
        assert_eq!(coordinator.phase(), CyclePhase::Published);
    }

    #[tokio::test]
    async fn core_timeout_keeps_values_and_marks_stale() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(query_param("value", CORE_FIELDS))
            .respond_with(
                ResponseTemplate::new(200).set_body_string(xml(1, "<temperature>70</temperature>")),
            )
            .up_to_n_times(1)
            .with_priority(1)
            .mount(&server)
            .await;
        mount_get(
            &server,
            CORE_FIELDS,
            ResponseTemplate::new(200)
                .set_body_string(xml(1, "<temperature>90</temperature>"))
                .set_delay(Duration::from_secs(3)),
        )
        .await;
        mount_get(
            &server,
            OPTIONAL_FIELDS,
            ResponseTemplate::new(200).set_body_string(xml(1, "<system>Cool</system>")),
        )
        .await;

        let config = config(&server).with_core_timeout(Duration::from_millis(300));
        let coordinator = ThermostatCoordinator::new(config).unwrap();

        coordinator.refresh_now().await.unwrap();
        let before = coordinator.snapshot();

        let outcome = coordinator.refresh_now().await.unwrap();
        let after = coordinator.snapshot();

        assert_eq!(outcome, CycleOutcome::Stale);
        assert_eq!(after.temperature(), Some(70.0));
        assert_eq!(after.system_mode(), Some(SystemMode::Cool));
        assert_eq!(after.last_success(), before.last_success());
        assert!(!after.last_update_succeeded());
        assert!(!coordinator.last_update_succeeded());
    }

    #[tokio::test]
    async fn core_decode_error_fails_cycle() {
        let server = MockServer::start().await;
        mount_get(
            &server,
            CORE_FIELDS,
            ResponseTemplate::new(200).set_body_string("<html><body>Maintenance"),
        )
        .await;

        let coordinator = ThermostatCoordinator::new(config(&server)).unwrap();
        let err = coordinator.refresh_now().await.unwrap_err();

        match err {
            Error::UpdateFailed(inner) => {
                assert!(matches!(*inner, Error::Parse(ParseError::Xml(_))));
            }
            other => panic!("unexpected error: {other:?}"),
        }
        assert!(coordinator.snapshot().is_empty());
        assert!(!coordinator.last_update_succeeded());
        assert_eq!(coordinator.phase(), CyclePhase::Idle);
    }

    #[tokio::test]
    async fn optional_decode_error_is_ignored() {
        let server = MockServer::start().await;
        mount_get(
            &server,
            CORE_FIELDS,
            ResponseTemplate::new(200).set_body_string(xml(1, "<co2Level>812</co2Level>")),
        )
        .await;
        mount_get(
            &server,
            OPTIONAL_FIELDS,
            ResponseTemplate::new(200).set_body_string("garbled"),
        )
        .await;

        let coordinator = ThermostatCoordinator::new(config(&server)).unwrap();
        let outcome = coordinator.refresh_now().await.unwrap();

        assert_eq!(outcome, CycleOutcome::Updated);
        assert_eq!(coordinator.snapshot().co2_level(), Some(812));
        assert!(coordinator.snapshot().system_mode().is_none());
        assert!(coordinator.last_update_succeeded());
    }

    #[tokio::test]
    async fn poll_loop_publishes_on_start() {
        let server = MockServer::start().await;
        mount_get(
            &server,
            CORE_FIELDS,
            ResponseTemplate::new(200).set_body_string(xml(1, "<temperature>69.5</temperature>")),
        )
        .await;
        mount_get(
            &server,
            OPTIONAL_FIELDS,
            ResponseTemplate::new(200).set_body_string(xml(1, "<system>Off</system>")),
        )
        .await;

        let coordinator = ThermostatCoordinator::new(config(&server)).unwrap();
        let mut updates = coordinator.subscribe();
        coordinator.start();

        tokio::time::timeout(Duration::from_secs(5), updates.changed())
            .await
            .expect("poll loop should publish")
            .unwrap();

        let snapshot = updates.borrow().clone();
        assert_eq!(snapshot.temperature(), Some(69.5));
        assert_eq!(snapshot.system_mode(), Some(SystemMode::Off));

        coordinator.shutdown();
        assert!(!coordinator.is_running());
    }
}

// ============================================================================
// Command Tests
// ============================================================================

mod commands {
    use super::*;

    async fn mount_set(server: &MockServer, value: &str, response: ResponseTemplate) {
        Mock::given(method("GET"))
            .and(path("/api.cgi"))
            .and(query_param("request", "set"))
            .and(query_param("object", "Thermostat"))
            .and(query_param("selection", "name:Lobby;"))
            .and(query_param("value", value))
            .respond_with(response)
            .expect(1)
            .mount(server)
            .await;
    }

    #[tokio::test]
    async fn acknowledged_set_succeeds() {
        let server = MockServer::start().await;
        mount_set(
            &server,
            "system:Heat",
            ResponseTemplate::new(200).set_body_string("<response><success>1</success></response>"),
        )
        .await;

        let coordinator = ThermostatCoordinator::new(config(&server)).unwrap();

        assert!(coordinator.set_system_mode(SystemMode::Heat).await);
        assert!(coordinator.refresh_handle().is_pending());
    }

    #[tokio::test]
    async fn setpoint_keeps_one_decimal() {
        let server = MockServer::start().await;
        mount_set(
            &server,
            "coolSetting:75.0",
            ResponseTemplate::new(200).set_body_string("<response><success>1</success></response>"),
        )
        .await;

        let coordinator = ThermostatCoordinator::new(config(&server)).unwrap();
        assert!(coordinator.set_cool_setting(75.0).await);
    }

    #[tokio::test]
    async fn non_xml_ack_counts_as_success() {
        let server = MockServer::start().await;
        mount_set(
            &server,
            "heatSetting:68.5",
            ResponseTemplate::new(200).set_body_string("OK"),
        )
        .await;

        let coordinator = ThermostatCoordinator::new(config(&server)).unwrap();
        assert!(coordinator.set_heat_setting(68.5).await);
    }

    #[tokio::test]
    async fn rejected_set_fails() {
        let server = MockServer::start().await;
        mount_set(
            &server,
            "system:Auto",
            ResponseTemplate::new(200).set_body_string("<response><success>0</success></response>"),
        )
        .await;

        let coordinator = ThermostatCoordinator::new(config(&server)).unwrap();

        assert!(!coordinator.set_system_mode(SystemMode::Auto).await);
        assert!(!coordinator.refresh_handle().is_pending());
    }

    #[tokio::test]
    async fn timed_out_set_counts_as_success() {
        let server = MockServer::start().await;
        mount_set(
            &server,
            "heatSetting:70.0",
            ResponseTemplate::new(200)
                .set_body_string("<response><success>1</success></response>")
                .set_delay(Duration::from_secs(3)),
        )
        .await;

        let config = config(&server).with_command_timeout(Duration::from_millis(200));
        let coordinator = ThermostatCoordinator::new(config).unwrap();

        assert!(coordinator.set_heat_setting(70.0).await);
        assert!(coordinator.refresh_handle().is_pending());
    }

    #[tokio::test]
    async fn server_error_fails() {
        let server = MockServer::start().await;
        mount_set(&server, "system:Off", ResponseTemplate::new(503)).await;

        let coordinator = ThermostatCoordinator::new(config(&server)).unwrap();
        assert!(!coordinator.set_system_mode(SystemMode::Off).await);
    }

    #[tokio::test]
    async fn command_triggers_extra_cycle() {
        let server = MockServer::start().await;
        mount_get(
            &server,
            CORE_FIELDS,
            ResponseTemplate::new(200).set_body_string(xml(1, "<temperature>70</temperature>")),
        )
        .await;
        mount_get(
            &server,
            OPTIONAL_FIELDS,
            ResponseTemplate::new(200).set_body_string(xml(1, "<system>Heat</system>")),
        )
        .await;
        mount_set(
            &server,
            "system:Heat",
            ResponseTemplate::new(200).set_body_string("<response><success>1</success></response>"),
        )
        .await;

        let coordinator = ThermostatCoordinator::new(config(&server)).unwrap();
        let mut updates = coordinator.subscribe();
        coordinator.start();

        // Scheduled first cycle
        tokio::time::timeout(Duration::from_secs(5), updates.changed())
            .await
            .expect("first cycle should publish")
            .unwrap();
        updates.borrow_and_update();

        // Out-of-cycle refresh long before the 70s interval elapses
        assert!(coordinator.set_system_mode(SystemMode::Heat).await);
        tokio::time::timeout(Duration::from_secs(5), updates.changed())
            .await
            .expect("command should trigger a refresh")
            .unwrap();

        assert_eq!(updates.borrow().system_mode(), Some(SystemMode::Heat));
    }
}

// ============================================================================
// Connection Check Tests
// ============================================================================

mod connection_check {
    use super::*;

    #[tokio::test]
    async fn accepts_successful_reply() {
        let server = MockServer::start().await;
        mount_get(
            &server,
            CORE_FIELDS,
            ResponseTemplate::new(200).set_body_string(xml(1, "<temperature>70</temperature>")),
        )
        .await;

        let coordinator = ThermostatCoordinator::new(config(&server)).unwrap();
        coordinator.check_connection().await.unwrap();
        assert!(coordinator.snapshot().is_empty());
    }

    #[tokio::test]
    async fn rejects_unsuccessful_reply() {
        let server = MockServer::start().await;
        mount_get(
            &server,
            CORE_FIELDS,
            ResponseTemplate::new(200)
                .set_body_string("<response><success>0</success><message>Bad login</message></response>"),
        )
        .await;

        let coordinator = ThermostatCoordinator::new(config(&server)).unwrap();
        let err = coordinator.check_connection().await.unwrap_err();
        assert!(matches!(err, Error::Device(_)));
    }

    #[tokio::test]
    async fn rejects_http_error() {
        let server = MockServer::start().await;
        mount_get(&server, CORE_FIELDS, ResponseTemplate::new(401)).await;

        let coordinator = ThermostatCoordinator::new(config(&server)).unwrap();
        let err = coordinator.check_connection().await.unwrap_err();
        assert!(matches!(
            err,
            Error::Protocol(ProtocolError::HttpStatus { status: 401 })
        ));
    }
}
