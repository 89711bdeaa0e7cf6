//! Mock collaborators for testing.
//!
//! [`MockTransport`] serves canned replies and records every request;
//! [`MockPresenter`] records what the client asked it to show.

use std::cell::RefCell;
use std::collections::{HashMap, VecDeque};

use serde_json::Value;

use crate::core::error::FetchError;
use crate::core::{HeaderFields, PageLayout, Presenter};
use crate::models::{DashboardSection, NavOptions, RenderHandle, Slot, VisitFailure};
use crate::utils::Transport;

// =============================================================================
// Transport
// =============================================================================

/// One request seen by [`MockTransport`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum MockRequest {
    GetJson(String),
    PostForm {
        url: String,
        fields: Vec<(String, String)>,
    },
    GetText(String),
}

impl MockRequest {
    pub fn url(&self) -> &str {
        match self {
            Self::GetJson(url) | Self::GetText(url) => url,
            Self::PostForm { url, .. } => url,
        }
    }
}

/// Transport serving canned replies by URL.
///
/// Unconfigured URLs answer 404. Form replies queued for the same URL are
/// served in order, the last one repeating.
#[derive(Debug, Default)]
pub struct MockTransport {
    json: HashMap<String, Result<Value, FetchError>>,
    text: HashMap<String, Result<String, FetchError>>,
    forms: RefCell<HashMap<String, VecDeque<Result<String, FetchError>>>>,
    requests: RefCell<Vec<MockRequest>>,
}

fn http_error(status: u16) -> FetchError {
    let status_text = match status {
        401 => "Unauthorized",
        403 => "Forbidden",
        404 => "Not Found",
        _ => "Server Error",
    };
    FetchError::HttpError {
        status,
        status_text: status_text.to_string(),
    }
}

impl MockTransport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Answer GETs of `url` with `data`.
    pub fn with_json(mut self, url: impl Into<String>, data: Value) -> Self {
        self.json.insert(url.into(), Ok(data));
        self
    }

    /// Answer GETs of `url` with an HTTP error.
    pub fn with_status(mut self, url: impl Into<String>, status: u16) -> Self {
        let url = url.into();
        self.json.insert(url.clone(), Err(http_error(status)));
        self.text.insert(url, Err(http_error(status)));
        self
    }

    /// Answer text GETs of `url` with `body`.
    pub fn with_text(mut self, url: impl Into<String>, body: impl Into<String>) -> Self {
        self.text.insert(url.into(), Ok(body.into()));
        self
    }

    /// Queue `body` as the next reply to a form POST to `url`.
    pub fn with_form_reply(self, url: impl Into<String>, body: impl Into<String>) -> Self {
        self.forms
            .borrow_mut()
            .entry(url.into())
            .or_default()
            .push_back(Ok(body.into()));
        self
    }

    /// Queue an HTTP error as the next reply to a form POST to `url`.
    pub fn with_form_status(self, url: impl Into<String>, status: u16) -> Self {
        self.forms
            .borrow_mut()
            .entry(url.into())
            .or_default()
            .push_back(Err(http_error(status)));
        self
    }

    /// Every request so far, in order.
    pub fn requests(&self) -> Vec<MockRequest> {
        self.requests.borrow().clone()
    }

    /// URLs requested so far, in order.
    pub fn requested_urls(&self) -> Vec<String> {
        self.requests
            .borrow()
            .iter()
            .map(|r| r.url().to_string())
            .collect()
    }

    pub fn was_requested(&self, url: &str) -> bool {
        self.requests.borrow().iter().any(|r| r.url() == url)
    }

    fn record(&self, request: MockRequest) {
        self.requests.borrow_mut().push(request);
    }
}

impl Transport for MockTransport {
    async fn get_json(&self, url: &str) -> Result<Value, FetchError> {
        self.record(MockRequest::GetJson(url.to_string()));
        self.json
            .get(url)
            .cloned()
            .unwrap_or_else(|| Err(http_error(404)))
    }

    async fn post_form(&self, url: &str, fields: &[(&str, &str)]) -> Result<String, FetchError> {
        self.record(MockRequest::PostForm {
            url: url.to_string(),
            fields: fields
                .iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect(),
        });
        let mut forms = self.forms.borrow_mut();
        let Some(queue) = forms.get_mut(url) else {
            return Err(http_error(404));
        };
        match queue.len() {
            0 => Err(http_error(404)),
            1 => queue.front().cloned().unwrap_or_else(|| Err(http_error(404))),
            _ => queue.pop_front().unwrap_or_else(|| Err(http_error(404))),
        }
    }

    async fn get_text(&self, url: &str) -> Result<String, FetchError> {
        self.record(MockRequest::GetText(url.to_string()));
        self.text
            .get(url)
            .cloned()
            .unwrap_or_else(|| Err(http_error(404)))
    }
}

// =============================================================================
// Presenter
// =============================================================================

/// One call seen by [`MockPresenter`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum PresenterEvent {
    Render { url: String, slot: Slot },
    ShowPage(String),
    NavigateTo(String),
    Alert(String),
    Release(RenderHandle),
    ConcealDashboard,
    DashboardHeader(HeaderFields),
    Splice(DashboardSection, RenderHandle),
    EmptySection(DashboardSection),
    LoginForm(Option<VisitFailure>),
    ShowDashboard,
}

/// Presenter that records calls and hands out sequential handles.
#[derive(Debug, Default)]
pub struct MockPresenter {
    events: Vec<PresenterEvent>,
    layouts: Vec<PageLayout>,
    next_id: u64,
}

impl MockPresenter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn events(&self) -> &[PresenterEvent] {
        &self.events
    }

    /// Layouts rendered so far, in order.
    pub fn layouts(&self) -> &[PageLayout] {
        &self.layouts
    }

    pub fn alerts(&self) -> Vec<&str> {
        self.events
            .iter()
            .filter_map(|e| match e {
                PresenterEvent::Alert(msg) => Some(msg.as_str()),
                _ => None,
            })
            .collect()
    }

    pub fn navigations(&self) -> Vec<&str> {
        self.events
            .iter()
            .filter_map(|e| match e {
                PresenterEvent::NavigateTo(url) => Some(url.as_str()),
                _ => None,
            })
            .collect()
    }

    pub fn clear(&mut self) {
        self.events.clear();
        self.layouts.clear();
    }
}

impl Presenter for MockPresenter {
    fn render(&mut self, layout: &PageLayout, slot: &Slot) -> RenderHandle {
        self.next_id += 1;
        self.events.push(PresenterEvent::Render {
            url: layout.url.clone(),
            slot: slot.clone(),
        });
        self.layouts.push(layout.clone());
        RenderHandle {
            id: self.next_id,
            url: layout.url.clone(),
        }
    }

    fn show_page(&mut self, url: &str, _nav: &NavOptions) {
        self.events.push(PresenterEvent::ShowPage(url.to_string()));
    }

    fn navigate_to(&mut self, url: &str) {
        self.events.push(PresenterEvent::NavigateTo(url.to_string()));
    }

    fn alert(&mut self, message: &str) {
        self.events.push(PresenterEvent::Alert(message.to_string()));
    }

    fn release(&mut self, handle: RenderHandle) {
        self.events.push(PresenterEvent::Release(handle));
    }

    fn conceal_dashboard(&mut self) {
        self.events.push(PresenterEvent::ConcealDashboard);
    }

    fn layout_dashboard_header(&mut self, header: &HeaderFields) {
        self.events.push(PresenterEvent::DashboardHeader(header.clone()));
    }

    fn splice_section(&mut self, section: DashboardSection, handle: &RenderHandle) {
        self.events
            .push(PresenterEvent::Splice(section, handle.clone()));
    }

    fn show_empty_section(&mut self, section: DashboardSection) {
        self.events.push(PresenterEvent::EmptySection(section));
    }

    fn show_login_form(&mut self, failure: Option<&VisitFailure>) {
        self.events
            .push(PresenterEvent::LoginForm(failure.cloned()));
    }

    fn show_dashboard(&mut self, _nav: &NavOptions) {
        self.events.push(PresenterEvent::ShowDashboard);
    }
}
