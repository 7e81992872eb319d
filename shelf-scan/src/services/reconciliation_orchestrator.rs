//! Reconciliation orchestrator
//!
//! Sequences normalize → resolve → store for each scan event, falling back to
//! a manual-entry request when the catalog has nothing. Reading-state
//! changes bypass the pipeline and go straight to the store's patch.
//!
//! See [`ReconcileState`] for the state progression. Only one scan session is
//! in flight at a time: a scan arriving while a manual entry is pending is
//! rejected with [`ReconcileError::Busy`].

use crate::error::ReconcileError;
use crate::models::{ManualEntryForm, ReadingAction, ReconcileState, StateTransition};
use crate::services::isbn_normalizer::{normalize, Isbn};
use crate::services::metadata_resolver::MetadataResolver;
use chrono::Utc;
use shelf_common::{BookMetadata, BookRecord, BookStore, ReadingFields};
use std::sync::Arc;
use tracing::{debug, info, warn};

const INVALID_CODE_MESSAGE: &str = "Scanned code is not a valid ISBN/EAN.";

/// Result of a scan or manual submission
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScanOutcome {
    /// Code did not normalize to an ISBN; nothing was stored
    InvalidCode { message: String },
    /// Record stored under `id`
    Saved {
        id: i64,
        metadata: BookMetadata,
        message: String,
    },
    /// Catalog lookup failed; the form awaits the user's details
    NeedsManualEntry {
        form: ManualEntryForm,
        message: String,
    },
}

impl ScanOutcome {
    pub fn message(&self) -> &str {
        match self {
            ScanOutcome::InvalidCode { message }
            | ScanOutcome::Saved { message, .. }
            | ScanOutcome::NeedsManualEntry { message, .. } => message,
        }
    }
}

/// Reconciliation orchestrator service
pub struct ReconciliationOrchestrator<'a> {
    store: &'a BookStore,
    resolver: Arc<dyn MetadataResolver>,
    state: ReconcileState,
    pending_entry: Option<ManualEntryForm>,
    transitions: Vec<StateTransition>,
}

impl<'a> ReconciliationOrchestrator<'a> {
    pub fn new(store: &'a BookStore, resolver: Arc<dyn MetadataResolver>) -> Self {
        Self {
            store,
            resolver,
            state: ReconcileState::Idle,
            pending_entry: None,
            transitions: Vec::new(),
        }
    }

    pub fn state(&self) -> ReconcileState {
        self.state
    }

    /// Form waiting for user details, if any
    pub fn pending_entry(&self) -> Option<&ManualEntryForm> {
        self.pending_entry.as_ref()
    }

    /// Transitions taken by the most recent event
    pub fn transitions(&self) -> &[StateTransition] {
        &self.transitions
    }

    fn transition_to(&mut self, new_state: ReconcileState) {
        debug!(from = %self.state, to = %new_state, "Reconcile state transition");
        self.transitions.push(StateTransition {
            old_state: self.state,
            new_state,
            transitioned_at: Utc::now(),
        });
        self.state = new_state;
    }

    fn begin_event(&mut self) {
        self.transitions.clear();
    }

    /// Run one scan event through the pipeline
    ///
    /// # Errors
    /// `Busy` if a previous scan is still awaiting manual input, `Store` if
    /// the final write fails. Invalid codes and catalog misses are reported
    /// through [`ScanOutcome`].
    pub async fn handle_scan(&mut self, raw_code: &str) -> Result<ScanOutcome, ReconcileError> {
        if !self.state.accepts_scan() {
            return Err(ReconcileError::Busy);
        }
        self.begin_event();

        self.transition_to(ReconcileState::Normalizing);
        let isbn = match normalize(raw_code) {
            Some(isbn) => isbn,
            None => {
                info!(raw = %raw_code, "Rejected scanned code");
                self.transition_to(ReconcileState::Idle);
                return Ok(ScanOutcome::InvalidCode {
                    message: INVALID_CODE_MESSAGE.to_string(),
                });
            }
        };

        self.transition_to(ReconcileState::Resolving);
        info!(isbn = %isbn, resolver = self.resolver.name(), "Looking up metadata");

        let resolved = self.resolver.resolve(&isbn).await;
        match resolved {
            Ok(metadata) => {
                let id = self.persist(&metadata).await?;
                let message = format!("Book saved: {}", display_name(&metadata));
                Ok(ScanOutcome::Saved {
                    id,
                    metadata,
                    message,
                })
            }
            Err(e) => {
                warn!(isbn = %isbn, error = %e, "Metadata lookup failed, requesting manual entry");
                Ok(self.await_manual_input(isbn))
            }
        }
    }

    /// Start a manual entry without a catalog lookup
    ///
    /// Returns `InvalidCode` when `raw_isbn` does not normalize.
    pub fn begin_manual_entry(&mut self, raw_isbn: &str) -> Result<ScanOutcome, ReconcileError> {
        if !self.state.accepts_scan() {
            return Err(ReconcileError::Busy);
        }
        self.begin_event();

        self.transition_to(ReconcileState::Normalizing);
        match normalize(raw_isbn) {
            Some(isbn) => Ok(self.await_manual_input(isbn)),
            None => {
                self.transition_to(ReconcileState::Idle);
                Ok(ScanOutcome::InvalidCode {
                    message: INVALID_CODE_MESSAGE.to_string(),
                })
            }
        }
    }

    fn await_manual_input(&mut self, isbn: Isbn) -> ScanOutcome {
        let form = ManualEntryForm::prefilled(isbn.as_str());
        self.pending_entry = Some(form.clone());
        self.transition_to(ReconcileState::AwaitingManualInput);

        ScanOutcome::NeedsManualEntry {
            form,
            message: format!(
                "No metadata found for ISBN {}. Please complete the details manually.",
                isbn
            ),
        }
    }

    /// Store the user's details for the pending manual entry
    ///
    /// The ISBN always comes from the pending request, whatever the submitted
    /// form says.
    pub async fn submit_manual(
        &mut self,
        form: ManualEntryForm,
    ) -> Result<ScanOutcome, ReconcileError> {
        if self.state != ReconcileState::AwaitingManualInput {
            return Err(ReconcileError::NoPendingEntry);
        }
        let isbn = match &self.pending_entry {
            Some(pending) => pending.isbn.clone(),
            None => return Err(ReconcileError::NoPendingEntry),
        };
        self.begin_event();

        let metadata = ManualEntryForm { isbn, ..form }.into_metadata();

        let id = match self.persist(&metadata).await {
            Ok(id) => id,
            Err(e) => {
                // Form stays pending so the user can resubmit
                self.transition_to(ReconcileState::AwaitingManualInput);
                return Err(e);
            }
        };
        self.pending_entry = None;
        let message = format!("Book saved manually: {}", display_name(&metadata));
        Ok(ScanOutcome::Saved {
            id,
            metadata,
            message,
        })
    }

    /// Drop a pending manual entry and return to idle
    pub fn cancel_manual(&mut self) {
        if self.pending_entry.take().is_some() {
            self.begin_event();
            self.transition_to(ReconcileState::Idle);
        }
    }

    async fn persist(&mut self, metadata: &BookMetadata) -> Result<i64, ReconcileError> {
        self.transition_to(ReconcileState::Persisting);
        let result = self.store.upsert(metadata, &ReadingFields::default()).await;
        self.transition_to(ReconcileState::Idle);

        result.map_err(|e| {
            warn!(isbn = %metadata.isbn, error = %e, "Saving book failed");
            ReconcileError::Store(e)
        })
    }

    /// Apply one reading-state control to record `id`
    ///
    /// Reads the current row so the fields the action does not touch keep
    /// their values. Returns the updated record, or `None` if `id` is unknown.
    pub async fn apply_reading_action(
        &mut self,
        id: i64,
        action: ReadingAction,
    ) -> Result<Option<BookRecord>, ReconcileError> {
        let record = match self.store.get(id).await? {
            Some(record) => record,
            None => {
                debug!(id, "Reading action on unknown record ignored");
                return Ok(None);
            }
        };

        let fields = action.apply(&record);
        self.update_reading(id, &fields).await?;

        Ok(self.store.get(id).await?)
    }

    /// Patch reading fields of record `id` as given
    ///
    /// Fields left `None` are reset to defaults by the store.
    pub async fn update_reading(
        &mut self,
        id: i64,
        fields: &ReadingFields,
    ) -> Result<(), ReconcileError> {
        // A pending manual entry survives a patch
        let resume = self.state;
        self.begin_event();

        self.transition_to(ReconcileState::Patching);
        let result = self.store.patch(id, fields).await;
        self.transition_to(resume);

        result.map_err(ReconcileError::Store)
    }
}

fn display_name(metadata: &BookMetadata) -> &str {
    metadata.title.as_deref().unwrap_or(&metadata.isbn)
}
