//! Client-side synchronization lifecycle for the services collection.
//!
//! User actions produce a [`Request`]; the worker runs it against a
//! [`ServiceApi`] and hands back a [`Response`]; applying the response to
//! [`AppState`] may in turn produce a follow-up request (the refetch after a
//! create or update). Nothing here touches the network directly.
//!
use tracing::{error, info, warn};

use super::{AppState, DialogMode, InputMode};
use crate::api::{FetchError, ServiceApi, WriteError};
use crate::model::{Draft, ServiceId, ServicePackage};

pub const MSG_FETCH_FAILED: &str = "Failed to fetch services";
pub const MSG_CREATED: &str = "Service created successfully";
pub const MSG_UPDATED: &str = "Service updated successfully";
pub const MSG_SAVE_FAILED: &str = "Failed to save service";
pub const MSG_DELETED: &str = "Service deleted successfully";
pub const MSG_DELETE_FAILED: &str = "Failed to delete service";

#[derive(Clone, Debug, PartialEq)]
pub enum Request {
    List,
    Create(Draft),
    Update(ServiceId, Draft),
    Delete(ServiceId),
}

#[derive(Debug)]
pub enum Response {
    Listed(Result<Vec<ServicePackage>, FetchError>),
    Created(Result<(), WriteError>),
    Updated(ServiceId, Result<(), WriteError>),
    Deleted(ServiceId, Result<(), WriteError>),
}

/// Run one request to completion.
pub fn execute(api: &dyn ServiceApi, request: Request) -> Response {
    match request {
        Request::List => Response::Listed(api.list_all()),
        Request::Create(draft) => Response::Created(api.create(&draft)),
        Request::Update(id, draft) => {
            let res = api.update(&id, &draft);
            Response::Updated(id, res)
        }
        Request::Delete(id) => {
            let res = api.delete(&id);
            Response::Deleted(id, res)
        }
    }
}

impl AppState {
    /// Initial fetch. The list starts in the loading state, so this only issues the request.
    pub fn mount(&self) -> Request {
        info!("loading services");
        Request::List
    }

    /// Manual refetch; the table stays visible while it runs.
    pub fn refresh(&self) -> Request {
        Request::List
    }

    /// Turn the open dialog into a create or update request.
    ///
    /// With strict number checking enabled, an invalid draft is reported and no request is made.
    pub fn submit(&mut self) -> Option<Request> {
        let dialog = self.dialog.as_ref()?;
        if self.settings.strict_numbers {
            if let Err(e) = dialog.draft.validate() {
                warn!(error = %e, "draft rejected");
                self.notifier.error(e.to_string());
                self.mark_dirty();
                return None;
            }
        }
        let draft = dialog.draft.clone();
        Some(match &dialog.mode {
            DialogMode::Create => Request::Create(draft),
            DialogMode::Edit(record) => Request::Update(record.id.clone(), draft),
        })
    }

    /// Delete the selected row straight away, without confirmation.
    pub fn delete_selected(&self) -> Option<Request> {
        self.selected_service()
            .map(|s| Request::Delete(s.id.clone()))
    }

    /// Apply a server response. Returns the follow-up request, if any.
    ///
    /// Failures are logged and notified; they never propagate.
    pub fn apply_response(&mut self, response: Response) -> Option<Request> {
        self.mark_dirty();
        match response {
            Response::Listed(Ok(items)) => {
                info!(count = items.len(), "services loaded");
                self.list.items = items;
                self.list.loading = false;
                self.clamp_selection();
                None
            }
            Response::Listed(Err(e)) => {
                error!(error = %e, "error fetching services");
                self.list.loading = false;
                self.notifier.error(MSG_FETCH_FAILED);
                None
            }
            Response::Created(res) => self.after_save(res, MSG_CREATED),
            Response::Updated(_, res) => self.after_save(res, MSG_UPDATED),
            Response::Deleted(id, Ok(())) => {
                info!(%id, "service deleted");
                self.notifier.success(MSG_DELETED);
                if self.settings.refetch_after_delete {
                    return Some(Request::List);
                }
                self.list.items.retain(|s| s.id != id);
                self.clamp_selection();
                None
            }
            Response::Deleted(id, Err(e)) => {
                error!(%id, error = %e, "error deleting service");
                self.notifier.error(MSG_DELETE_FAILED);
                None
            }
        }
    }

    fn after_save(&mut self, res: Result<(), WriteError>, ok_message: &str) -> Option<Request> {
        match res {
            Ok(()) => {
                info!("{ok_message}");
                self.notifier.success(ok_message);
                self.close_dialog();
                Some(Request::List)
            }
            Err(e) => {
                error!(error = %e, "error saving service");
                self.notifier.error(MSG_SAVE_FAILED);
                // keep the dialog and its draft as they are
                if self.dialog.is_some() {
                    self.input_mode = InputMode::Dialog;
                }
                None
            }
        }
    }
}
