//! Four-step farmer KYC registration wizard
//!
//! Navigation is never gated: the user may move through every step with
//! empty fields. The whole draft is validated once, on submit.

use shared::{
    validate_registration, DocumentFile, DocumentKey, DraftField, RegistrationDraft, WizardStep,
    REVIEW_WINDOW,
};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Mutex, MutexGuard};

use crate::error::ClientResult;
use crate::external::KycApi;
use crate::guard::InFlight;

/// Confirmation shown after the backend accepts an application
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubmissionReceipt {
    /// Opaque identifier issued by the backend
    pub application_id: String,
    /// Expected review turnaround
    pub review_window: &'static str,
}

#[derive(Debug, Default)]
struct WizardState {
    draft: RegistrationDraft,
    step: WizardStep,
}

/// Registration wizard state machine
#[derive(Debug, Default)]
pub struct RegistrationWizard {
    state: Mutex<WizardState>,
    submitting: AtomicBool,
}

impl RegistrationWizard {
    /// Open the wizard with an empty draft on step 1
    pub fn new() -> Self {
        Self::default()
    }

    /// Open the wizard on step 1 with a previously saved draft
    pub fn with_draft(draft: RegistrationDraft) -> Self {
        Self {
            state: Mutex::new(WizardState {
                draft,
                step: WizardStep::Personal,
            }),
            submitting: AtomicBool::new(false),
        }
    }

    pub fn step(&self) -> WizardStep {
        self.lock().step
    }

    pub fn draft(&self) -> RegistrationDraft {
        self.lock().draft.clone()
    }

    pub fn is_submitting(&self) -> bool {
        self.submitting.load(Ordering::Acquire)
    }

    /// Advance one step; stays put on the review step
    pub fn next(&self) -> WizardStep {
        let mut state = self.lock();
        state.step = state.step.next();
        state.step
    }

    /// Go back one step; stays put on the first step
    pub fn previous(&self) -> WizardStep {
        let mut state = self.lock();
        state.step = state.step.previous();
        state.step
    }

    /// Update one field of the personal or farm section
    pub fn set_field(&self, field: impl Into<DraftField>, value: &str) -> ClientResult<()> {
        self.lock().draft.set_field(field.into(), value)?;
        Ok(())
    }

    /// Attach or clear a document. Type and size are not checked here.
    pub fn set_document(&self, key: DocumentKey, file: Option<DocumentFile>) {
        match &file {
            Some(file) => tracing::debug!(document = %key, size = file.size(), "Document attached"),
            None => tracing::debug!(document = %key, "Document cleared"),
        }
        self.lock().draft.documents.set(key, file);
    }

    /// Discard the draft and return to step 1, as when the modal is closed
    pub fn reset(&self) {
        *self.lock() = WizardState::default();
    }

    /// Validate the draft and send it to the backend.
    ///
    /// Validation failures never reach the network. Any failure leaves the
    /// draft and step untouched so the user can correct and resubmit; a
    /// successful submission resets the wizard.
    pub async fn submit<A>(&self, api: &A) -> ClientResult<SubmissionReceipt>
    where
        A: KycApi + ?Sized,
    {
        let _in_flight = InFlight::acquire(&self.submitting)?;

        let draft = {
            let state = self.lock();
            if let Err(e) = validate_registration(&state.draft) {
                tracing::debug!(code = e.code(), "Registration draft rejected locally");
                return Err(e.into());
            }
            state.draft.clone()
        };

        let receipt = match api.submit_application(&draft).await {
            Ok(receipt) => receipt,
            Err(e) => {
                tracing::warn!(code = e.code(), error = %e, "Registration submission failed");
                return Err(e);
            }
        };

        self.reset();
        tracing::info!(application_id = %receipt.id, "Registration submitted");

        Ok(SubmissionReceipt {
            application_id: receipt.id,
            review_window: REVIEW_WINDOW,
        })
    }

    fn lock(&self) -> MutexGuard<'_, WizardState> {
        self.state.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}
