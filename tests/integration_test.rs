// Integration tests for svcpkg-manager
// The sync lifecycle is driven through the public API against an in-memory collection.

use std::sync::{Arc, Mutex};
use std::time::Duration;

use svcpkg_manager::api::{FetchError, ServiceApi, WriteError};
use svcpkg_manager::app::settings::Settings;
use svcpkg_manager::app::sync::{self, Request, Response};
use svcpkg_manager::app::worker::Worker;
use svcpkg_manager::app::{AppState, DialogMode, NoticeKind};
use svcpkg_manager::model::{Draft, FieldValue, ServiceId, ServicePackage};

#[derive(Clone, Debug, PartialEq)]
enum Call {
    List,
    Create(Draft),
    Update(String, Draft),
    Delete(String),
}

/// Records every call and answers from a scripted collection.
#[derive(Default)]
struct FakeApi {
    items: Mutex<Vec<ServicePackage>>,
    calls: Mutex<Vec<Call>>,
    fail_list: Mutex<bool>,
    fail_writes: Mutex<bool>,
    next_id: Mutex<u32>,
}

impl FakeApi {
    fn with_items(items: Vec<ServicePackage>) -> Self {
        Self {
            items: Mutex::new(items),
            next_id: Mutex::new(100),
            ..Default::default()
        }
    }

    fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }

    fn clear_calls(&self) {
        self.calls.lock().unwrap().clear();
    }

    fn set_fail_list(&self, v: bool) {
        *self.fail_list.lock().unwrap() = v;
    }

    fn set_fail_writes(&self, v: bool) {
        *self.fail_writes.lock().unwrap() = v;
    }
}

fn record(draft: &Draft, id: String) -> ServicePackage {
    ServicePackage {
        id: ServiceId::new(id),
        name: draft.name.clone(),
        price: FieldValue::Text(draft.price.clone()),
        duration: FieldValue::Text(draft.duration.clone()),
        accuracy: FieldValue::Text(draft.accuracy.clone()),
    }
}

impl ServiceApi for FakeApi {
    fn list_all(&self) -> Result<Vec<ServicePackage>, FetchError> {
        self.calls.lock().unwrap().push(Call::List);
        if *self.fail_list.lock().unwrap() {
            return Err(FetchError::Status(500));
        }
        Ok(self.items.lock().unwrap().clone())
    }

    fn create(&self, draft: &Draft) -> Result<(), WriteError> {
        self.calls.lock().unwrap().push(Call::Create(draft.clone()));
        if *self.fail_writes.lock().unwrap() {
            return Err(WriteError::Status(400));
        }
        let mut next = self.next_id.lock().unwrap();
        *next += 1;
        self.items.lock().unwrap().push(record(draft, next.to_string()));
        Ok(())
    }

    fn update(&self, id: &ServiceId, draft: &Draft) -> Result<(), WriteError> {
        self.calls
            .lock()
            .unwrap()
            .push(Call::Update(id.to_string(), draft.clone()));
        if *self.fail_writes.lock().unwrap() {
            return Err(WriteError::Status(500));
        }
        let mut items = self.items.lock().unwrap();
        match items.iter_mut().find(|s| &s.id == id) {
            Some(slot) => {
                *slot = record(draft, id.to_string());
                Ok(())
            }
            None => Err(WriteError::NotFound(id.clone())),
        }
    }

    fn delete(&self, id: &ServiceId) -> Result<(), WriteError> {
        self.calls.lock().unwrap().push(Call::Delete(id.to_string()));
        if *self.fail_writes.lock().unwrap() {
            return Err(WriteError::Status(500));
        }
        let mut items = self.items.lock().unwrap();
        let before = items.len();
        items.retain(|s| &s.id != id);
        if items.len() == before {
            Err(WriteError::NotFound(id.clone()))
        } else {
            Ok(())
        }
    }
}

fn pkg(id: &str, name: &str, price: i64, duration: &str, accuracy: FieldValue) -> ServicePackage {
    ServicePackage {
        id: ServiceId::new(id),
        name: name.to_string(),
        price: FieldValue::from(price),
        duration: FieldValue::from(duration),
        accuracy,
    }
}

fn seed() -> Vec<ServicePackage> {
    vec![
        pkg("7", "Basic", 10, "5", FieldValue::from(95i64)),
        pkg("42", "Premium", 250, "2 days", FieldValue::Text("99.9".into())),
        pkg("3", "Express", 99, "1", FieldValue::Null),
    ]
}

/// Run `first` and every follow-up request it produces, like the event loop does.
fn drive(app: &mut AppState, api: &FakeApi, first: Request) {
    let mut next = Some(first);
    while let Some(req) = next.take() {
        let resp = sync::execute(api, req);
        next = app.apply_response(resp);
    }
}

fn mounted(api: &FakeApi) -> AppState {
    let mut app = AppState::with_settings(Settings::default());
    let req = app.mount();
    drive(&mut app, api, req);
    api.clear_calls();
    app
}

fn notice(app: &AppState) -> (NoticeKind, String) {
    let n = app.notifier.current.as_ref().expect("a notice was shown");
    (n.kind, n.message.clone())
}

#[test]
fn initial_state_is_loading_and_empty() {
    let app = AppState::with_settings(Settings::default());
    assert!(app.list.loading);
    assert!(app.list.items.is_empty());
    assert!(app.dialog.is_none());
    assert_eq!(app.mount(), Request::List);
}

#[test]
fn initial_load_mirrors_server_order() {
    let api = FakeApi::with_items(seed());
    let mut app = AppState::with_settings(Settings::default());
    let req = app.mount();
    drive(&mut app, &api, req);
    assert!(!app.list.loading);
    assert_eq!(app.list.items, seed());
    assert_eq!(api.calls(), vec![Call::List]);
    assert!(app.notifier.current.is_none());
}

#[test]
fn failed_initial_load_leaves_empty_list_and_notifies() {
    let api = FakeApi::with_items(seed());
    api.set_fail_list(true);
    let mut app = AppState::with_settings(Settings::default());
    let req = app.mount();
    drive(&mut app, &api, req);
    assert!(!app.list.loading);
    assert!(app.list.items.is_empty());
    assert_eq!(
        notice(&app),
        (NoticeKind::Error, sync::MSG_FETCH_FAILED.to_string())
    );
}

#[test]
fn edit_prefills_fields_as_text() {
    let api = FakeApi::with_items(seed());
    let mut app = mounted(&api);
    app.selected_index = 1;
    app.open_edit_selected();
    let dialog = app.dialog.as_ref().unwrap();
    assert_eq!(dialog.mode, DialogMode::Edit(seed()[1].clone()));
    assert_eq!(
        dialog.draft,
        Draft {
            name: "Premium".into(),
            price: "250".into(),
            duration: "2 days".into(),
            accuracy: "99.9".into(),
        }
    );
    assert_eq!(dialog.title(), "Edit Service");
    assert_eq!(dialog.submit_label(), "Update");
}

#[test]
fn create_opens_with_empty_fields() {
    let api = FakeApi::with_items(seed());
    let mut app = mounted(&api);
    app.open_edit_selected();
    app.close_dialog();
    app.open_create();
    let dialog = app.dialog.as_ref().unwrap();
    assert_eq!(dialog.mode, DialogMode::Create);
    assert_eq!(dialog.draft, Draft::default());
    assert_eq!(dialog.title(), "Add Service");
}

#[test]
fn submit_create_posts_once_then_relists_once() {
    let api = FakeApi::with_items(seed());
    let mut app = mounted(&api);
    app.open_create();
    let draft = Draft {
        name: "X".into(),
        price: "10".into(),
        duration: "5".into(),
        accuracy: "99".into(),
    };
    app.dialog.as_mut().unwrap().draft = draft.clone();

    let req = app.submit().expect("create request");
    assert_eq!(req, Request::Create(draft.clone()));
    drive(&mut app, &api, req);

    assert_eq!(api.calls(), vec![Call::Create(draft), Call::List]);
    assert!(app.dialog.is_none());
    assert_eq!(app.list.items.len(), 4);
    assert_eq!(app.list.items[3].name, "X");
    assert_eq!(
        notice(&app),
        (NoticeKind::Success, sync::MSG_CREATED.to_string())
    );
}

#[test]
fn submit_update_puts_full_draft_then_relists() {
    let api = FakeApi::with_items(seed());
    let mut app = mounted(&api);
    app.selected_index = 1;
    app.open_edit_selected();
    app.edit_dialog(|d| {
        d.draft.name.push_str(" Plus");
    });
    let expected = Draft {
        name: "Premium Plus".into(),
        price: "250".into(),
        duration: "2 days".into(),
        accuracy: "99.9".into(),
    };

    let req = app.submit().expect("update request");
    assert_eq!(req, Request::Update(ServiceId::new("42"), expected.clone()));
    drive(&mut app, &api, req);

    assert_eq!(
        api.calls(),
        vec![Call::Update("42".into(), expected), Call::List]
    );
    assert!(app.dialog.is_none());
    assert_eq!(app.list.items[1].name, "Premium Plus");
    assert_eq!(
        notice(&app),
        (NoticeKind::Success, sync::MSG_UPDATED.to_string())
    );
}

#[test]
fn delete_patches_locally_without_relisting() {
    let api = FakeApi::with_items(seed());
    let mut app = mounted(&api);
    let before = app.list.items.len();

    let req = app.delete_selected().expect("delete request");
    assert_eq!(req, Request::Delete(ServiceId::new("7")));
    drive(&mut app, &api, req);

    assert_eq!(api.calls(), vec![Call::Delete("7".into())]);
    assert_eq!(app.list.items.len(), before - 1);
    assert!(app.list.items.iter().all(|s| s.id.as_str() != "7"));
    assert_eq!(
        notice(&app),
        (NoticeKind::Success, sync::MSG_DELETED.to_string())
    );
}

#[test]
fn failed_save_keeps_dialog_and_draft() {
    let api = FakeApi::with_items(seed());
    api.set_fail_writes(true);
    let mut app = mounted(&api);

    app.open_create();
    app.edit_dialog(|d| d.push_char('Z'));
    let snapshot = app.dialog.clone();
    let req = app.submit().unwrap();
    drive(&mut app, &api, req);
    assert_eq!(app.dialog, snapshot);
    assert_eq!(api.calls().len(), 1);
    assert_eq!(
        notice(&app),
        (NoticeKind::Error, sync::MSG_SAVE_FAILED.to_string())
    );

    app.close_dialog();
    app.open_edit_selected();
    let snapshot = app.dialog.clone();
    let req = app.submit().unwrap();
    drive(&mut app, &api, req);
    assert_eq!(app.dialog, snapshot);
}

#[test]
fn update_of_vanished_record_is_a_save_failure() {
    let api = FakeApi::with_items(seed());
    let mut app = mounted(&api);
    app.open_edit(&pkg("999", "Ghost", 1, "1", FieldValue::Null));
    let req = app.submit().unwrap();
    drive(&mut app, &api, req);
    assert!(app.dialog.is_some());
    assert_eq!(notice(&app).0, NoticeKind::Error);
}

#[test]
fn failed_delete_leaves_list_unchanged() {
    let api = FakeApi::with_items(seed());
    let mut app = mounted(&api);
    // gone server-side already: the row stays visible
    api.items.lock().unwrap().retain(|s| s.id.as_str() != "7");
    let req = app.delete_selected().unwrap();
    drive(&mut app, &api, req);
    assert_eq!(app.list.items, seed());
    assert_eq!(
        notice(&app),
        (NoticeKind::Error, sync::MSG_DELETE_FAILED.to_string())
    );
}

#[test]
fn worker_runs_requests_in_order_off_thread() {
    let api = Arc::new(FakeApi::with_items(seed()));
    let worker = Worker::spawn(Box::new(Arc::clone(&api))).expect("spawn worker");
    let mut app = AppState::with_settings(Settings::default());

    worker.submit(app.mount());
    worker.submit(Request::Delete(ServiceId::new("3")));

    let first = worker.next_timeout(Duration::from_secs(5)).expect("list response");
    assert!(matches!(first, Response::Listed(Ok(_))));
    assert!(app.apply_response(first).is_none());
    assert_eq!(app.list.items.len(), 3);

    let second = worker.next_timeout(Duration::from_secs(5)).expect("delete response");
    assert!(app.apply_response(second).is_none());
    assert_eq!(app.list.items.len(), 2);
    assert_eq!(api.calls(), vec![Call::List, Call::Delete("3".into())]);
}
