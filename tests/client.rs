use pretty_assertions::assert_eq;
use serde_json::json;
use uuid::Uuid;
use wiremock::matchers::{body_json, body_partial_json, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use nebclient::{
    CreateSnapshotInput, CreateVolumeInput, DeleteNPodInput, NebClient, NebClientError, PageInput,
    StringFilter, VolumeFilter,
};

const TWO_TIB: u64 = 2_199_023_255_552;

fn volume_reply(uuid: &str, name: &str) -> serde_json::Value {
    json!({
        "uuid": uuid,
        "nPod": {"uuid": "5f0b4dbd-5a2c-4697-b4ce-a7da5f5e8a6f"},
        "wwn": "6f:bb:24:of:73:a3:97",
        "name": name,
        "sizeBytes": TWO_TIB,
        "creationTime": "2026-08-30T10:15:00Z",
        "expirationTime": null,
        "readOnlySnapshot": false,
        "snapshots": [],
        "syncState": "InSync",
        "boot": false,
        "luns": []
    })
}

async fn client_for(server: &MockServer) -> NebClient {
    NebClient::builder()
        .with_endpoint(server.uri())
        .with_session_token("session-token")
        .build()
        .expect("client")
}

#[tokio::test]
async fn delete_volume_posts_expected_document() {
    let server = MockServer::start().await;
    let uuid = Uuid::parse_str("59964d0c-c5a7-4b17-a22d-0bd43b2f2bbb").unwrap();

    let expected_body = json!({
        "query": "mutation($uuid:UUID!){deleteVolume(uuid: $uuid)}",
        "variables": {"uuid": "59964d0c-c5a7-4b17-a22d-0bd43b2f2bbb"},
    });

    Mock::given(method("POST"))
        .and(path("/"))
        .and(body_json(&expected_body))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": {"deleteVolume": true}
        })))
        .expect(1)
        .mount(&server)
        .await;

    let client = client_for(&server).await;
    let deleted = client.delete_volume(uuid).await.expect("delete");
    assert!(deleted);
}

#[tokio::test]
async fn create_snapshot_posts_expected_document() {
    let server = MockServer::start().await;
    let parent = Uuid::parse_str("59964d0c-c5a7-4b17-a22d-0bd43b2f2bbb").unwrap();

    let expected_body = json!({
        "query": "mutation($parentVvUID:[String!]!,$snapNamePattern:[String!]!,\
                  $expirationSec:Int){createSnap(parentVvUID: $parentVvUID, \
                  snapNamePattern: $snapNamePattern, expirationSec: $expirationSec)}",
        "variables": {
            "parentVvUID": ["59964d0c-c5a7-4b17-a22d-0bd43b2f2bbb"],
            "snapNamePattern": ["%v_%y%m%d"],
            "expirationSec": 172_800
        },
    });

    Mock::given(method("POST"))
        .and(path("/"))
        .and(body_json(&expected_body))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": {"createSnap": true}
        })))
        .expect(1)
        .mount(&server)
        .await;

    let client = client_for(&server).await;
    let input = CreateSnapshotInput::new(vec![parent], vec!["%v_%y%m%d".into()])
        .expect("input")
        .with_expiration_sec(172_800);
    let created = client.create_snapshot(input).await.expect("snapshot");
    assert!(created);
}

#[tokio::test]
async fn delete_npod_posts_expected_document() {
    let server = MockServer::start().await;
    let uuid = Uuid::parse_str("5f0b4dbd-5a2c-4697-b4ce-a7da5f5e8a6f").unwrap();

    let expected_body = json!({
        "query": "mutation($uid:String!,$secureErase:Boolean)\
                  {delPod(uid: $uid, secureErase: $secureErase)}",
        "variables": {
            "uid": "5f0b4dbd-5a2c-4697-b4ce-a7da5f5e8a6f",
            "secureErase": true
        },
    });

    Mock::given(method("POST"))
        .and(path("/"))
        .and(body_json(&expected_body))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": {"delPod": true}
        })))
        .expect(1)
        .mount(&server)
        .await;

    let client = client_for(&server).await;
    let deleted = client
        .delete_npod(uuid, DeleteNPodInput::default().with_secure_erase(true))
        .await
        .expect("delete");
    assert!(deleted);
}

#[tokio::test]
async fn get_volumes_returns_checked_list() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/"))
        .and(body_partial_json(json!({
            "variables": {
                "page": {"page": 1, "count": 100},
                "filter": {"name": {"beginsWith": "db-"}}
            }
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": {
                "getVolumes": {
                    "items": [
                        volume_reply("005297b5-1023-43b8-b5a4-f697e85a9601", "db-data"),
                        volume_reply("5c6a3cf2-4b96-44f4-9f9f-18c291a59cc3", "db-log")
                    ],
                    "more": false,
                    "totalCount": 7,
                    "filteredCount": 2
                }
            }
        })))
        .mount(&server)
        .await;

    let client = client_for(&server).await;
    let filter = VolumeFilter::default().with_name(StringFilter::default().begins_with("db-"));
    let list = client
        .get_volumes(Some(PageInput::default()), Some(filter), None)
        .await
        .expect("list");

    assert_eq!(list.items.len(), 2);
    assert_eq!(list.items[0].name, "db-data");
    assert_eq!(list.total_count, 7);
    assert!(!list.more);
}

#[tokio::test]
async fn empty_list_is_not_an_error() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": {
                "getVolumes": {
                    "items": [],
                    "more": false,
                    "totalCount": 7,
                    "filteredCount": 0
                }
            }
        })))
        .mount(&server)
        .await;

    let client = client_for(&server).await;
    let list = client.get_volumes(None, None, None).await.expect("list");
    assert!(list.items.is_empty());
    assert_eq!(list.filtered_count, 0);
}

#[tokio::test]
async fn inconsistent_counts_are_a_protocol_error() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": {
                "getVolumes": {
                    "items": [volume_reply("005297b5-1023-43b8-b5a4-f697e85a9601", "db-data")],
                    "more": false,
                    "totalCount": 0,
                    "filteredCount": 0
                }
            }
        })))
        .mount(&server)
        .await;

    let client = client_for(&server).await;
    let err = client.get_volumes(None, None, None).await.unwrap_err();
    assert!(matches!(err, NebClientError::Protocol { .. }), "{err:?}");
}

#[tokio::test]
async fn create_volume_materializes_the_new_resource() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/"))
        .and(body_partial_json(json!({
            "variables": {
                "input": {"name": "db-data", "sizeBytes": TWO_TIB}
            }
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": {
                "createVolume": volume_reply("005297b5-1023-43b8-b5a4-f697e85a9601", "db-data")
            }
        })))
        .mount(&server)
        .await;

    let client = client_for(&server).await;
    let input = CreateVolumeInput::new("db-data", TWO_TIB).expect("input");
    let volume = client.create_volume(input).await.expect("create");

    assert_eq!(volume.name, "db-data");
    assert_eq!(volume.size_bytes, TWO_TIB);
    assert!(volume.expiration_time.is_null());
}

#[tokio::test]
async fn graphql_errors_surface_with_their_message() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": null,
            "errors": [{
                "message": "volume is in use",
                "path": ["deleteVolume"]
            }]
        })))
        .mount(&server)
        .await;

    let client = client_for(&server).await;
    let err = client.delete_volume(Uuid::nil()).await.unwrap_err();
    match err {
        NebClientError::Graphql { errors } => {
            assert_eq!(errors.len(), 1);
            assert_eq!(errors[0].message, "volume is in use");
        }
        other => panic!("unexpected error: {other:?}"),
    }
}

#[tokio::test]
async fn http_failure_carries_status_and_body() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/"))
        .respond_with(ResponseTemplate::new(503).set_body_string("upstream unavailable"))
        .mount(&server)
        .await;

    let client = client_for(&server).await;
    let err = client.delete_volume(Uuid::nil()).await.unwrap_err();
    match err {
        NebClientError::HttpStatus { status, body } => {
            assert_eq!(status.as_u16(), 503);
            assert_eq!(body, "upstream unavailable");
        }
        other => panic!("unexpected error: {other:?}"),
    }
}

#[tokio::test]
async fn reply_without_operation_result_is_a_protocol_error() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": {"somethingElse": true}
        })))
        .mount(&server)
        .await;

    let client = client_for(&server).await;
    let err = client.delete_volume(Uuid::nil()).await.unwrap_err();
    assert!(matches!(err, NebClientError::Protocol { .. }), "{err:?}");
}

#[tokio::test]
async fn session_token_is_sent_as_bearer_header() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": {"deleteVolume": true}
        })))
        .mount(&server)
        .await;

    let client = client_for(&server).await;
    client.delete_volume(Uuid::nil()).await.expect("delete");

    let requests = server.received_requests().await.expect("requests");
    assert_eq!(requests.len(), 1);
    let auth = requests[0]
        .headers
        .get("authorization")
        .expect("authorization header");
    assert_eq!(auth.to_str().unwrap(), "Bearer session-token");
    assert!(requests[0].headers.contains_key("nebulon-client-app"));
    assert!(requests[0].headers.contains_key("nebulon-client-platform"));
}
