use std::sync::{Arc, OnceLock};
use std::time::Duration;

use bonsai_diagnose::{
    ContainerGroups, ContainerInstanceClient, Error, GroupRestarts, LogAnalyticsClient, LogQuery,
};
use bonsai_test_utils::{FakeServer, Reply};
use pretty_assertions::assert_eq;
use serde_json::json;

const TIMEOUT: Duration = Duration::from_secs(5);

fn logs_client(server: &FakeServer) -> LogAnalyticsClient {
    LogAnalyticsClient::new("law-1", "tok", TIMEOUT)
        .unwrap()
        .with_base_url(server.url())
        .unwrap()
}

fn containers_client(server: &FakeServer) -> ContainerInstanceClient {
    ContainerInstanceClient::new("sub-1", "tok", TIMEOUT)
        .unwrap()
        .with_base_url(server.url())
        .unwrap()
}

#[test]
fn query_posts_kql_with_bearer_token() {
    let server = FakeServer::always(Reply::json(
        200,
        json!({"tables": [{
            "name": "PrimaryResult",
            "columns": [{"name": "Message", "type": "string"}],
            "rows": [["hello"], ["hello"], ["bye"]]
        }]}),
    ));

    let outcome = logs_client(&server)
        .query("EpisodeLog_CL\n| limit 1", Duration::from_secs(60))
        .unwrap();

    assert_eq!(outcome.table.columns, vec!["Message"]);
    assert_eq!(outcome.table.rows, vec![vec![json!("hello")], vec![json!("bye")]]);
    assert_eq!(outcome.partial_error, None);

    let request = server.single_request();
    assert_eq!(request.method, "POST");
    assert_eq!(request.url, "/v1/workspaces/law-1/query");
    assert_eq!(request.header("Authorization"), Some("Bearer tok"));
    assert_eq!(
        request.body_json(),
        json!({"query": "EpisodeLog_CL\n| limit 1", "timespan": "PT60S"})
    );
}

#[test]
fn missing_table_is_an_empty_result() {
    let server = FakeServer::always(Reply::json(
        400,
        json!({"error": {"code": "BadArgumentError", "message": "Failed to resolve table or column expression named 'EpisodeLog_CL'"}}),
    ));

    let outcome = logs_client(&server).query("EpisodeLog_CL", TIMEOUT).unwrap();
    assert!(outcome.table.is_empty());
}

#[test]
fn partial_results_are_returned_with_the_error() {
    let server = FakeServer::always(Reply::json(
        200,
        json!({
            "tables": [{"name": "PrimaryResult", "columns": [{"name": "Message"}], "rows": [["a"]]}],
            "error": {"code": "PartialError", "message": "query exceeded limits"}
        }),
    ));

    let outcome = logs_client(&server).query("x", TIMEOUT).unwrap();
    assert_eq!(outcome.table.len(), 1);
    assert_eq!(outcome.partial_error.as_deref(), Some("query exceeded limits"));
}

#[test]
fn other_query_failures_are_errors() {
    let server = FakeServer::always(Reply::json(
        403,
        json!({"error": {"code": "InsufficientAccessError", "message": "no access"}}),
    ));

    let err = logs_client(&server).query("x", TIMEOUT).unwrap_err();
    match err {
        Error::Service {
            service,
            status,
            message,
        } => {
            assert_eq!(service, "Log Analytics");
            assert_eq!(status, 403);
            assert_eq!(message, "no access");
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn container_groups_follow_next_link() {
    // nextLink is absolute, so the handler needs the server's own url
    let base = Arc::new(OnceLock::<String>::new());
    let server = FakeServer::start({
        let base = Arc::clone(&base);
        move |req| {
            if req.url.starts_with("/page2") {
                Reply::json(200, json!({"value": [{"name": "bv-1_c1-1"}]}))
            } else {
                let next = format!("{}/page2", base.get().cloned().unwrap_or_default());
                Reply::json(200, json!({"value": [{"name": "bv-1_c1-0"}], "nextLink": next}))
            }
        }
    });
    base.set(server.url().to_string()).unwrap();

    let names = containers_client(&server).list_groups("rg-1").unwrap();

    assert_eq!(names, vec!["bv-1_c1-0", "bv-1_c1-1"]);
    let requests = server.requests();
    assert_eq!(requests.len(), 2);
    assert_eq!(
        requests[0].url,
        "/subscriptions/sub-1/resourceGroups/rg-1/providers/Microsoft.ContainerInstance/containerGroups?api-version=2021-09-01"
    );
    assert_eq!(requests[0].header("Authorization"), Some("Bearer tok"));
    assert_eq!(requests[1].url, "/page2");
}

#[test]
fn group_restarts_sum_container_counts() {
    let server = FakeServer::always(Reply::json(
        200,
        json!({"name": "bv-1_c1-0", "properties": {"containers": [
            {"properties": {"instanceView": {"restartCount": 1}}},
            {"properties": {"instanceView": {"restartCount": 4}}}
        ]}}),
    ));

    let restarts = containers_client(&server)
        .group_restarts("rg-1", "bv-1_c1-0")
        .unwrap();

    assert_eq!(
        restarts,
        GroupRestarts {
            restarts: 5,
            instances: 2
        }
    );
    assert!(
        server
            .single_request()
            .url
            .ends_with("/containerGroups/bv-1_c1-0?api-version=2021-09-01")
    );
}

#[test]
fn malformed_group_list_is_rejected() {
    let server = FakeServer::always(Reply::json(200, json!({"items": []})));
    let err = containers_client(&server).list_groups("rg-1").unwrap_err();
    assert!(matches!(err, Error::InvalidResponse { .. }));
}
