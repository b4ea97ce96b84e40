//! Per-product layout edit session.
//!
//! The store only ever sees server-confirmed layouts. Edits live in a draft
//! owned by the session until a save succeeds.

use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::catalog::{LayoutPatch, PresentationOverride, ProductStore};
use crate::error::CatalogError;
use crate::ids::ProductId;
use crate::service::{LayoutPersistenceService, ServiceError};

/// Phases of a layout edit session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EditPhase {
    /// Editor not open.
    Closed,
    /// Editor open with a draft.
    Editing,
    /// Draft submitted, waiting for the server.
    Saving,
}

impl EditPhase {
    pub fn as_str(&self) -> &'static str {
        match self {
            EditPhase::Closed => "closed",
            EditPhase::Editing => "editing",
            EditPhase::Saving => "saving",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
enum State {
    Closed,
    Editing { draft: PresentationOverride },
    Saving { draft: PresentationOverride },
}

impl State {
    fn phase(&self) -> EditPhase {
        match self {
            State::Closed => EditPhase::Closed,
            State::Editing { .. } => EditPhase::Editing,
            State::Saving { .. } => EditPhase::Saving,
        }
    }
}

/// Persistence call the caller must make for a save.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LayoutSaveRequest {
    pub product_id: ProductId,
    pub layout: PresentationOverride,
}

/// First half of a save.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SaveStep {
    /// Nothing changed; the editor closed without a network call.
    Close,
    /// Send this request, then report the result to `complete_save`.
    Persist(LayoutSaveRequest),
}

/// Successful end of a save.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SaveOutcome {
    /// The draft matched the baseline; no call was made.
    Skipped,
    /// The server stored the draft.
    Saved(PresentationOverride),
    /// The server already held the draft.
    NotModified(PresentationOverride),
}

/// Optimistic layout edit state for one product.
#[derive(Debug, Clone)]
pub struct LayoutEditSession {
    product_id: ProductId,
    baseline: PresentationOverride,
    state: State,
    last_error: Option<String>,
}

impl LayoutEditSession {
    /// Create a closed session.
    pub fn new(product_id: impl Into<ProductId>) -> Self {
        Self {
            product_id: product_id.into(),
            baseline: PresentationOverride::default(),
            state: State::Closed,
            last_error: None,
        }
    }

    pub fn product_id(&self) -> &ProductId {
        &self.product_id
    }

    pub fn phase(&self) -> EditPhase {
        self.state.phase()
    }

    /// Last confirmed layout.
    pub fn baseline(&self) -> PresentationOverride {
        self.baseline
    }

    /// Current draft, while the editor is open.
    pub fn draft(&self) -> Option<PresentationOverride> {
        match &self.state {
            State::Editing { draft } | State::Saving { draft } => Some(*draft),
            State::Closed => None,
        }
    }

    /// Check if the draft differs from the baseline.
    pub fn is_dirty(&self) -> bool {
        self.draft().is_some_and(|draft| draft != self.baseline)
    }

    /// Error from the last failed save, cleared by the next save attempt.
    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }

    /// Open the editor on the product's current override.
    pub fn open(&mut self, current: Option<PresentationOverride>) -> Result<(), CatalogError> {
        if self.state != State::Closed {
            return Err(self.transition_error(EditPhase::Editing));
        }
        let baseline = current.unwrap_or_default();
        self.baseline = baseline;
        self.state = State::Editing { draft: baseline };
        self.last_error = None;
        debug!(product_id = %self.product_id, "Layout editor opened");
        Ok(())
    }

    /// Merge a patch into the draft. Returns whether the draft is now dirty.
    pub fn update(&mut self, patch: &LayoutPatch) -> Result<bool, CatalogError> {
        match &mut self.state {
            State::Editing { draft } => {
                patch.apply_to(draft);
                Ok(self.is_dirty())
            }
            _ => Err(self.transition_error(EditPhase::Editing)),
        }
    }

    /// Discard the draft. No network call is made.
    pub fn cancel(&mut self) -> Result<(), CatalogError> {
        match self.state {
            State::Editing { .. } => {
                self.state = State::Closed;
                self.last_error = None;
                Ok(())
            }
            _ => Err(self.transition_error(EditPhase::Closed)),
        }
    }

    /// Start a save.
    ///
    /// A clean draft closes the editor immediately. A second call while a
    /// save is outstanding is rejected with [`CatalogError::SaveInFlight`].
    pub fn begin_save(&mut self) -> Result<SaveStep, CatalogError> {
        match self.state {
            State::Editing { draft } if draft == self.baseline => {
                self.state = State::Closed;
                debug!(product_id = %self.product_id, "Layout unchanged, editor closed");
                Ok(SaveStep::Close)
            }
            State::Editing { draft } => {
                self.state = State::Saving { draft };
                self.last_error = None;
                Ok(SaveStep::Persist(LayoutSaveRequest {
                    product_id: self.product_id.clone(),
                    layout: draft,
                }))
            }
            State::Saving { .. } => Err(CatalogError::SaveInFlight(self.product_id.to_string())),
            State::Closed => Err(self.transition_error(EditPhase::Saving)),
        }
    }

    /// Finish a save with the persistence result.
    ///
    /// Success and "not modified" both commit the draft to the store and
    /// close the editor. Not-found closes the editor and is terminal. Any
    /// other failure returns to editing with the draft intact.
    pub fn complete_save(
        &mut self,
        result: Result<PresentationOverride, ServiceError>,
        store: &mut ProductStore,
    ) -> Result<SaveOutcome, CatalogError> {
        let draft = match self.state {
            State::Saving { draft } => draft,
            _ => return Err(self.transition_error(EditPhase::Closed)),
        };

        match result {
            Ok(_) => {
                self.commit(draft, store);
                Ok(SaveOutcome::Saved(draft))
            }
            Err(ServiceError::NotModified) => {
                self.commit(draft, store);
                Ok(SaveOutcome::NotModified(draft))
            }
            Err(ServiceError::NotFound(_)) => {
                self.state = State::Closed;
                warn!(product_id = %self.product_id, "Layout save target no longer exists");
                Err(CatalogError::ProductNotFound(self.product_id.to_string()))
            }
            Err(e) => {
                self.state = State::Editing { draft };
                self.last_error = Some(e.to_string());
                warn!(product_id = %self.product_id, error = %e, "Layout save failed, draft kept");
                Err(CatalogError::LayoutSaveFailed {
                    product_id: self.product_id.to_string(),
                    reason: e.to_string(),
                })
            }
        }
    }

    /// Run a full save against `service`.
    pub async fn save<S>(
        &mut self,
        service: &S,
        store: &mut ProductStore,
    ) -> Result<SaveOutcome, CatalogError>
    where
        S: LayoutPersistenceService + ?Sized,
    {
        match self.begin_save()? {
            SaveStep::Close => Ok(SaveOutcome::Skipped),
            SaveStep::Persist(request) => {
                let result = service
                    .save_layout(&request.product_id, &request.layout)
                    .await;
                self.complete_save(result, store)
            }
        }
    }

    fn commit(&mut self, draft: PresentationOverride, store: &mut ProductStore) {
        self.baseline = draft;
        self.state = State::Closed;
        if !store.apply_confirmed_layout(&self.product_id, draft) {
            warn!(product_id = %self.product_id, "Saved layout for a product no longer in the store");
        }
        info!(product_id = %self.product_id, "Layout saved");
    }

    fn transition_error(&self, to: EditPhase) -> CatalogError {
        CatalogError::InvalidTransition {
            from: self.phase().as_str().to_string(),
            to: to.as_str().to_string(),
        }
    }
}
