//! Contact form submission with a simulated transport.
//!
//! The form moves through `Idle -> Pending -> {Success, Error} -> Idle`.
//! Pending always lasts the configured delay; the submit control is given
//! back exactly once when the submission settles, whatever the result.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::config::ContactConfig;
use crate::context::{ContactElements, PageContext};
use crate::error::{PageError, PageResult};
use crate::event::{EventKind, Outcome, PageEvent, TimerTask};
use crate::page::{Page, Subscription};

use super::Controller;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FormState {
    #[default]
    Idle,
    Pending,
    Success,
    Error,
}

/// Field values collected from the form, keyed by control name.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContactMessage {
    pub fields: BTreeMap<String, String>,
}

impl ContactMessage {
    pub fn from_fields(fields: impl IntoIterator<Item = (String, String)>) -> Self {
        Self {
            fields: fields.into_iter().collect(),
        }
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.fields.get(name).map(String::as_str)
    }
}

/// Delivers a settled submission.
pub trait Transport {
    fn send(&mut self, message: &ContactMessage) -> PageResult<()>;
}

/// Accepts every message. There is no backend behind the form.
#[derive(Debug, Default)]
pub struct SimulatedTransport {
    sent: usize,
}

impl SimulatedTransport {
    pub fn sent(&self) -> usize {
        self.sent
    }
}

impl Transport for SimulatedTransport {
    fn send(&mut self, message: &ContactMessage) -> PageResult<()> {
        self.sent += 1;
        debug!(fields = message.fields.len(), sent = self.sent, "Simulated delivery");
        Ok(())
    }
}

pub struct ContactController {
    config: ContactConfig,
    elements: Option<ContactElements>,
    transport: Box<dyn Transport>,
    state: FormState,
    pending: Option<ContactMessage>,
    /// Submit label saved while pending; taken when restored.
    saved_label: Option<String>,
}

impl ContactController {
    pub fn new(context: &PageContext, config: ContactConfig) -> Self {
        Self::with_transport(context, config, Box::new(SimulatedTransport::default()))
    }

    pub fn with_transport(
        context: &PageContext,
        config: ContactConfig,
        transport: Box<dyn Transport>,
    ) -> Self {
        Self {
            config,
            elements: context.contact.clone(),
            transport,
            state: FormState::Idle,
            pending: None,
            saved_label: None,
        }
    }

    pub fn state(&self) -> FormState {
        self.state
    }

    fn on_submit<P: Page>(&mut self, page: &mut P, elements: &ContactElements) {
        if self.state == FormState::Pending {
            debug!("Submission already pending");
            return;
        }

        let message = ContactMessage::from_fields(page.form_fields(elements.form));
        if let Some(submit) = elements.submit {
            self.saved_label = Some(page.text(submit));
            page.set_text(submit, &self.config.busy_label);
            page.set_disabled(submit, true);
        }

        self.state = FormState::Pending;
        self.pending = Some(message);
        page.schedule(self.config.submit_delay_ms, TimerTask::SubmissionSettled);
        info!(state = ?self.state, "Contact form submitted");
    }

    fn on_settled<P: Page>(&mut self, page: &mut P, elements: &ContactElements) {
        let Some(message) = self.pending.take() else {
            return;
        };

        let result = self
            .transport
            .send(&message)
            .and_then(|()| page.reset_form(elements.form));

        let (text, class) = match result {
            Ok(()) => {
                self.state = FormState::Success;
                (&self.config.success_message, &self.config.success_class)
            }
            Err(e) => {
                warn!(error = %e, "Contact submission failed");
                self.state = FormState::Error;
                (&self.config.error_message, &self.config.error_class)
            }
        };

        if let Some(status) = elements.status {
            page.remove_class(status, &self.config.success_class);
            page.remove_class(status, &self.config.error_class);
            page.add_class(status, class);
            page.set_text(status, text);
            page.set_style(status, "display", "block");
        }

        if let (Some(submit), Some(label)) = (elements.submit, self.saved_label.take()) {
            page.set_text(submit, &label);
            page.set_disabled(submit, false);
        }

        page.schedule(self.config.status_display_ms, TimerTask::HideStatus);
        info!(state = ?self.state, "Contact submission settled");
    }

    fn on_hide_status<P: Page>(&mut self, page: &mut P, elements: &ContactElements) {
        if let Some(status) = elements.status {
            page.set_style(status, "display", "none");
        }
        if matches!(self.state, FormState::Success | FormState::Error) {
            self.state = FormState::Idle;
        }
    }
}

impl<P: Page> Controller<P> for ContactController {
    fn name(&self) -> &'static str {
        "contact"
    }

    fn install(&mut self, _page: &mut P) -> PageResult<Vec<Subscription>> {
        let elements = self
            .elements
            .as_ref()
            .ok_or_else(|| PageError::missing("contact", "contact form"))?;
        Ok(vec![Subscription::node(elements.form, EventKind::Submit)])
    }

    fn handle(&mut self, page: &mut P, event: &PageEvent) -> PageResult<Outcome> {
        let Some(elements) = self.elements.clone() else {
            return Ok(Outcome::Ignored);
        };

        match event {
            PageEvent::Dom(dom) if dom.kind == EventKind::Submit => {
                self.on_submit(page, &elements);
                Ok(Outcome::PreventDefault)
            }
            PageEvent::Timer(TimerTask::SubmissionSettled) => {
                self.on_settled(page, &elements);
                Ok(Outcome::Handled)
            }
            PageEvent::Timer(TimerTask::HideStatus) => {
                self.on_hide_status(page, &elements);
                Ok(Outcome::Handled)
            }
            _ => Ok(Outcome::Ignored),
        }
    }
}
