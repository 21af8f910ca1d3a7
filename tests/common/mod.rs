#![allow(dead_code)]

use serde_json::{Value, json};
use teamgroups::args::Arguments;
use wiremock::matchers::{body_string_contains, header, method, path, query_param};
use wiremock::{Mock, MockBuilder, MockServer, ResponseTemplate};

pub const TENANT_ID: &str = "test-tenant";
pub const APP_ID: &str = "test-app";
pub const CLIENT_SECRET: &str = "test-secret";
pub const ACCESS_TOKEN: &str = "test-access-token";
pub const SITE_GROUP_ID: &str = "site-group";

const LIST_PATH: &str = "/v1.0/groups/site-group/sites/root/lists/nytt%20team/items";

pub fn arguments(server: &MockServer) -> Arguments {
    Arguments {
        tenant_id: TENANT_ID.to_owned(),
        app_id: APP_ID.to_owned(),
        client_secret: Some(CLIENT_SECRET.to_owned()),
        authority_host: server.uri(),
        graph_url: format!("{}/v1.0", server.uri()),
        site_group_id: SITE_GROUP_ID.to_owned(),
        ..Default::default()
    }
}

fn bearer() -> String {
    format!("Bearer {}", ACCESS_TOKEN)
}

/// Form-encoded `scope` of a token for `https://graph.microsoft.com`.
pub const GRAPH_SCOPE_PARAM: &str = "scope=https%3A%2F%2Fgraph.microsoft.com%2F.default";

pub fn token_request() -> MockBuilder {
    token_request_with_scope(GRAPH_SCOPE_PARAM)
}

pub fn token_request_with_scope(scope_param: &str) -> MockBuilder {
    Mock::given(method("POST"))
        .and(path(format!("/{}/oauth2/v2.0/token", TENANT_ID)))
        .and(body_string_contains("grant_type=client_credentials"))
        .and(body_string_contains(scope_param))
        .and(body_string_contains(format!("client_id={}", APP_ID)))
        .and(body_string_contains(format!("client_secret={}", CLIENT_SECRET)))
}

pub fn token_endpoint() -> Mock {
    token_granted(token_request())
}

pub fn token_granted(request: MockBuilder) -> Mock {
    request.respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "access_token": ACCESS_TOKEN,
            "token_type": "Bearer",
            "expires_in": 3599
        })))
}

pub fn list_items(response: ResponseTemplate) -> Mock {
    Mock::given(method("GET"))
        .and(path(LIST_PATH))
        .and(query_param("expand", "fields"))
        .and(header("authorization", bearer().as_str()))
        .respond_with(response)
}

pub fn group(group_id: &str, response: ResponseTemplate) -> Mock {
    Mock::given(method("GET"))
        .and(path(format!("/v1.0/groups/{}", group_id)))
        .and(header("authorization", bearer().as_str()))
        .respond_with(response)
}

pub fn json(body: Value) -> ResponseTemplate {
    ResponseTemplate::new(200).set_body_json(body)
}

pub fn group_with_mail(mail: &str) -> ResponseTemplate {
    json(json!({ "mail": mail, "displayName": mail }))
}
