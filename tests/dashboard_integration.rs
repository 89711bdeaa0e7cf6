//! Integration tests for visits and dashboard assembly.
//!
//! Run with: cargo test --features mock --test dashboard_integration

use serde_json::json;
use sharetree::core::ListItem;
use sharetree::mock::{MockPresenter, MockRequest, MockTransport, PresenterEvent};
use sharetree::models::{DashboardSection, RenderHandle, VisitFailure, VisitState};
use sharetree::{
    ContentClient, ContentError, Deployment, MemoryStore, ModeOptions, NavOptions, NodeKind,
    VisitOutcome,
};

const HOST: &str = "https://example.test";
const STORAGE_ROOT: &str = "https://example.test/storage/ABCDEFG/";
const DEVICES_URL: &str = "https://example.test/storage/ABCDEFG/?device_info=yes";
const ORIGINAL_ROOT: &str = "https://example.test/storage/ABCDEFG/shares";

type TestClient = ContentClient<MockTransport, MemoryStore, MockPresenter>;

fn client(transport: MockTransport) -> TestClient {
    ContentClient::new(
        Deployment::for_host(HOST),
        transport,
        MemoryStore::new(),
        MockPresenter::new(),
    )
}

/// Client with alice's storage account registered.
fn logged_in(transport: MockTransport) -> TestClient {
    let mut client = client(transport);
    client
        .tree_mut()
        .register_storage_account("alice", HOST, "/storage/ABCDEFG/")
        .unwrap();
    client
}

fn devices_json() -> serde_json::Value {
    json!({
        "stats": {"size": 2048},
        "devices": [
            {"encoded": "laptop", "name": "Laptop", "lastlogin": 10, "lastcommit": 11}
        ]
    })
}

fn original_shares_json() -> serde_json::Value {
    json!({
        "share_id_b32": "MFWGSY3F",
        "share_rooms": [
            {"room_key": "kitchen", "room_name": "Kitchen", "room_description": "Recipes"}
        ]
    })
}

async fn visit_dashboard(client: &mut TestClient) -> VisitOutcome {
    client
        .visit("dashboard", &NavOptions::default(), &ModeOptions::default())
        .await
        .unwrap()
}

// =============================================================================
// Dashboard
// =============================================================================

#[tokio::test]
async fn test_dashboard_without_identity_shows_login_form() {
    let mut client = client(MockTransport::new());

    assert_eq!(visit_dashboard(&mut client).await, VisitOutcome::Shown);

    assert!(client.transport().requests().is_empty());
    let events = client.presenter().events();
    assert!(events.contains(&PresenterEvent::LoginForm(None)));
    assert_eq!(events.last(), Some(&PresenterEvent::ShowDashboard));

    let state = client.tree().node("dashboard").and_then(|n| n.dashboard()).unwrap();
    assert_eq!(state.authenticated, Some(false));
}

#[tokio::test]
async fn test_dashboard_issues_storage_then_original_shares() {
    let transport = MockTransport::new()
        .with_json(DEVICES_URL, devices_json())
        .with_json(ORIGINAL_ROOT, original_shares_json());
    let mut client = logged_in(transport);

    assert_eq!(visit_dashboard(&mut client).await, VisitOutcome::Shown);

    assert_eq!(
        client.transport().requests(),
        vec![
            MockRequest::GetJson(DEVICES_URL.to_string()),
            MockRequest::GetJson(ORIGINAL_ROOT.to_string()),
        ]
    );

    let events = client.presenter().events();
    assert!(events.contains(&PresenterEvent::Splice(
        DashboardSection::Storage,
        RenderHandle {
            id: 1,
            url: STORAGE_ROOT.to_string()
        },
    )));
    assert!(events.contains(&PresenterEvent::Splice(
        DashboardSection::OriginalShares,
        RenderHandle {
            id: 2,
            url: ORIGINAL_ROOT.to_string()
        },
    )));
    assert_eq!(events.last(), Some(&PresenterEvent::ShowDashboard));

    let state = client.tree().node("dashboard").and_then(|n| n.dashboard()).unwrap();
    assert_eq!(state.authenticated, Some(true));
    assert!(state.storage_confirmed);
    assert_eq!(state.storage_devices, vec![format!("{STORAGE_ROOT}laptop/")]);
    assert_eq!(
        state.original_shares,
        vec!["https://example.test/share/MFWGSY3F/kitchen/".to_string()]
    );

    let room = client
        .tree()
        .node("https://example.test/share/MFWGSY3F/kitchen/")
        .unwrap();
    assert_eq!(room.kind(), NodeKind::ShareRoom);
    assert_eq!(room.name, "Kitchen");
}

#[tokio::test]
async fn test_storage_failure_skips_original_shares() {
    let transport = MockTransport::new()
        .with_status(DEVICES_URL, 500)
        .with_json(ORIGINAL_ROOT, original_shares_json());
    let mut client = logged_in(transport);

    visit_dashboard(&mut client).await;

    assert!(client.transport().was_requested(DEVICES_URL));
    assert!(!client.transport().was_requested(ORIGINAL_ROOT));

    let events = client.presenter().events();
    assert!(events.contains(&PresenterEvent::LoginForm(Some(VisitFailure::new(
        500,
        "Server Error"
    )))));
    assert!(!events
        .iter()
        .any(|e| matches!(e, PresenterEvent::Splice(..))));

    let state = client.tree().node("dashboard").and_then(|n| n.dashboard()).unwrap();
    assert_eq!(state.authenticated, Some(false));
    assert!(!state.storage_confirmed);
    // Non-401 failures keep the account.
    assert_eq!(client.session().username(), Some("alice"));
}

#[tokio::test]
async fn test_storage_unauthorized_clears_session() {
    let transport = MockTransport::new().with_status(DEVICES_URL, 401);
    let mut client = logged_in(transport);

    visit_dashboard(&mut client).await;

    assert!(!client.session().has_login_identity());
    assert_eq!(client.session().storage_root_url(), None);
    assert!(client.tree().node(STORAGE_ROOT).is_none());
    assert!(!client.transport().was_requested(ORIGINAL_ROOT));
    assert!(client
        .presenter()
        .events()
        .contains(&PresenterEvent::LoginForm(Some(VisitFailure::new(
            401,
            "Unauthorized"
        )))));
}

#[tokio::test]
async fn test_original_shares_failure_shows_empty_section() {
    let transport = MockTransport::new()
        .with_json(DEVICES_URL, devices_json())
        .with_status(ORIGINAL_ROOT, 404);
    let mut client = logged_in(transport);

    visit_dashboard(&mut client).await;

    let events = client.presenter().events();
    assert!(events.contains(&PresenterEvent::EmptySection(
        DashboardSection::OriginalShares
    )));
    let state = client.tree().node("dashboard").and_then(|n| n.dashboard()).unwrap();
    assert_eq!(state.authenticated, Some(true));
    assert!(state.original_shares.is_empty());
    assert!(client.presenter().alerts().is_empty());
}

#[tokio::test]
async fn test_passive_dashboard_is_not_shown() {
    let mut client = client(MockTransport::new());
    let mode = ModeOptions {
        passive: true,
        ..Default::default()
    };

    client
        .visit("dashboard", &NavOptions::default(), &mode)
        .await
        .unwrap();

    assert!(!client
        .presenter()
        .events()
        .contains(&PresenterEvent::ShowDashboard));
}

#[tokio::test]
async fn test_revisit_refetches_dashboard() {
    let transport = MockTransport::new()
        .with_json(DEVICES_URL, devices_json())
        .with_json(ORIGINAL_ROOT, original_shares_json());
    let mut client = logged_in(transport);

    visit_dashboard(&mut client).await;
    visit_dashboard(&mut client).await;

    assert_eq!(client.transport().requests().len(), 4);
    let state = client.tree().node("dashboard").and_then(|n| n.dashboard()).unwrap();
    assert_eq!(state.storage_devices.len(), 1);
    assert_eq!(state.original_shares.len(), 1);
}

// =============================================================================
// Node Visits
// =============================================================================

#[tokio::test]
async fn test_folder_visit_renders_listing() {
    let folder = format!("{STORAGE_ROOT}laptop/docs/");
    let transport = MockTransport::new().with_json(
        folder.clone(),
        json!({
            "dirs": [["Old", "old/"]],
            "files": [{"url": "notes.txt", "name": "notes.txt", "size": 2048,
                       "ctime": 1, "mtime": 2, "versions": 1}]
        }),
    );
    let mut client = logged_in(transport);

    let outcome = client
        .visit(&folder, &NavOptions::default(), &ModeOptions::default())
        .await
        .unwrap();
    assert_eq!(outcome, VisitOutcome::Shown);

    let node = client.tree().node(&folder).unwrap();
    assert_eq!(node.kind(), NodeKind::StorageFolder);
    assert_eq!(node.state, VisitState::Provisioned);
    assert_eq!(node.parent_url(), Some(format!("{STORAGE_ROOT}laptop/").as_str()));
    assert_eq!(
        node.presentation().map(|h| h.url.as_str()),
        Some(folder.as_str())
    );

    let layout = client.presenter().layouts().last().unwrap();
    assert_eq!(layout.url, folder);
    assert!(layout.header.is_some());
    assert!(layout.items.iter().any(|item| matches!(
        item,
        ListItem::Folder { name, .. } if name == "Old"
    )));
    assert!(layout.items.iter().any(|item| matches!(
        item,
        ListItem::File { name, .. } if name == "notes.txt"
    )));
    assert_eq!(
        client.presenter().events().last(),
        Some(&PresenterEvent::ShowPage(folder.clone()))
    );
}

#[tokio::test]
async fn test_revisit_releases_previous_presentation() {
    let folder = format!("{STORAGE_ROOT}laptop/docs/");
    let transport =
        MockTransport::new().with_json(folder.clone(), json!({"dirs": [], "files": []}));
    let mut client = logged_in(transport);
    let nav = NavOptions::default();
    let mode = ModeOptions::default();

    client.visit(&folder, &nav, &mode).await.unwrap();
    client.visit(&folder, &nav, &mode).await.unwrap();

    assert!(client
        .presenter()
        .events()
        .contains(&PresenterEvent::Release(RenderHandle {
            id: 1,
            url: folder.clone()
        })));
    assert_eq!(
        client.tree().node(&folder).and_then(|n| n.presentation()).map(|h| h.id),
        Some(2)
    );
}

#[tokio::test]
async fn test_failed_visit_alerts_and_goes_to_parent() {
    let folder = format!("{STORAGE_ROOT}laptop/docs/");
    let transport = MockTransport::new().with_status(folder.clone(), 500);
    let mut client = logged_in(transport);

    let outcome = client
        .visit(&folder, &NavOptions::default(), &ModeOptions::default())
        .await
        .unwrap();

    assert_eq!(
        outcome,
        VisitOutcome::Failed(VisitFailure::new(500, "Server Error"))
    );
    assert_eq!(client.tree().node(&folder).unwrap().state, VisitState::Failed);
    let alerts = client.presenter().alerts();
    assert_eq!(alerts.len(), 1);
    assert!(alerts[0].starts_with(&format!("Failure reaching {folder}")));
    assert_eq!(
        client.presenter().navigations(),
        vec![format!("{STORAGE_ROOT}laptop/").as_str()]
    );
}

#[tokio::test]
async fn test_unauthorized_visit_clears_session() {
    let folder = format!("{STORAGE_ROOT}laptop/docs/");
    let transport = MockTransport::new().with_status(folder.clone(), 401);
    let mut client = logged_in(transport);

    let outcome = client
        .visit(&folder, &NavOptions::default(), &ModeOptions::default())
        .await
        .unwrap();

    assert_eq!(outcome, VisitOutcome::Unauthorized);
    assert!(!client.session().has_login_identity());
    assert!(client.tree().node(&folder).is_none());
    assert_eq!(client.presenter().navigations(), vec!["dashboard"]);
    assert!(client.presenter().alerts().is_empty());
}

#[tokio::test]
async fn test_malformed_listing_is_a_failure() {
    let folder = format!("{STORAGE_ROOT}laptop/docs/");
    let transport =
        MockTransport::new().with_json(folder.clone(), json!({"dirs": "not a list"}));
    let mut client = logged_in(transport);

    let outcome = client
        .visit(&folder, &NavOptions::default(), &ModeOptions::default())
        .await
        .unwrap();

    assert!(matches!(outcome, VisitOutcome::Failed(VisitFailure { status: 0, .. })));
    assert_eq!(client.presenter().alerts().len(), 1);
}

#[tokio::test]
async fn test_file_visit_not_implemented() {
    let file = format!("{STORAGE_ROOT}laptop/notes.txt");
    let mut client = logged_in(MockTransport::new());

    let outcome = client
        .visit(&file, &NavOptions::default(), &ModeOptions::default())
        .await
        .unwrap();

    assert_eq!(outcome, VisitOutcome::NotImplemented("File preview".into()));
    assert_eq!(
        client.presenter().alerts(),
        vec!["Not yet implemented: File preview"]
    );
    assert!(client.transport().requests().is_empty());
}

#[tokio::test]
async fn test_public_share_root_merges_listing_with_known_rooms() {
    let transport = MockTransport::new().with_json(
        "https://example.test/share/",
        json!({"dirs": [["Carol's Trip", "MNQXE33M/trip/"]], "files": []}),
    );
    let mut client = client(transport);
    let known = client.visit_public_share_room("bob", "pw").unwrap();

    client
        .visit(
            "https://example.test/share/",
            &NavOptions::default(),
            &ModeOptions::default(),
        )
        .await
        .unwrap();

    assert!(client.transport().was_requested("https://example.test/share/"));
    let listed = "https://example.test/share/MNQXE33M/trip/";
    let root = client.tree().node("https://example.test/share/").unwrap();
    assert_eq!(root.kind(), NodeKind::PublicSharesRoot);
    assert_eq!(root.subdirs().unwrap(), [known, listed.to_string()]);
    assert!(client.session().public_share_room_urls.contains(listed));

    let room = client.tree().node(listed).unwrap();
    assert_eq!(room.kind(), NodeKind::ShareRoom);
    assert_eq!(room.name, "Carol's Trip");
}

#[tokio::test]
async fn test_visit_refuses_foreign_url() {
    let mut client = logged_in(MockTransport::new());

    let err = client
        .visit(
            "https://elsewhere.test/x/",
            &NavOptions::default(),
            &ModeOptions::default(),
        )
        .await
        .unwrap_err();

    assert_eq!(
        err,
        ContentError::UnknownNode("https://elsewhere.test/x/".into())
    );
    assert!(client.tree().node("https://elsewhere.test/x/").is_none());
    assert!(client.transport().requests().is_empty());
}

// =============================================================================
// Navigation Hook
// =============================================================================

#[tokio::test]
async fn test_handle_content_visit_ignores_foreign_urls() {
    let mut client = logged_in(MockTransport::new());
    let nav = NavOptions::default();

    assert!(client
        .handle_content_visit("https://elsewhere.test/page", &nav)
        .await
        .is_none());
    assert!(client.transport().requests().is_empty());
}

#[tokio::test]
async fn test_handle_content_visit_reads_mode_from_query() {
    let folder = format!("{STORAGE_ROOT}laptop/");
    let transport =
        MockTransport::new().with_json(folder.clone(), json!({"dirs": [], "files": []}));
    let mut client = logged_in(transport);

    let outcome = client
        .handle_content_visit(&format!("{folder}?passive=true"), &NavOptions::default())
        .await
        .unwrap()
        .unwrap();

    assert_eq!(outcome, VisitOutcome::Shown);
    assert!(client.transport().was_requested(&folder));
    assert!(!client
        .presenter()
        .events()
        .iter()
        .any(|e| matches!(e, PresenterEvent::ShowPage(_))));
}
