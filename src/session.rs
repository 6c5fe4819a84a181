//! Session state machine: the asset lifecycle core.
//!
//! A [`Session`] owns the asset history, the listing set, the current
//! selection, and the view/edit mode, and keeps them consistent as one
//! unit: every mutation is atomic with respect to the others, and the
//! durable records are rewritten after each one. There is a single
//! logical thread of control; `&mut self` on every transition is what
//! enforces it.
//!
//! ## Generation is two-phase
//!
//! The only operation that suspends on an external result is generation.
//! It is split so the session never blocks and never races itself:
//!
//! 1. [`Session::begin_generation`] validates the prompt and takes the
//!    single-flight slot, returning a [`GenerationTicket`]. A second
//!    begin while a ticket is outstanding is rejected — an explicit
//!    guard, not a disabled button.
//! 2. The caller drives the collaborator with the ticket's prompt.
//! 3. [`Session::complete_generation`] accepts only the outstanding
//!    ticket. A stale ticket (the session gave up on it, or it was
//!    abandoned after a failure) is discarded without touching state, so
//!    a late-arriving result can never resurrect anything.
//!
//! [`Session::generate`] packages the three steps for callers with an
//! async runtime at hand.
//!
//! ## Cascades
//!
//! Removing an asset — explicit [`Session::delete`] or capacity eviction
//! during [`Session::complete_generation`] — always cascades: the id is
//! unlisted and the selection is cleared if it pointed there. The history
//! never holds an asset that listings or selection can't resolve, and
//! vice versa.

use crate::asset::{Asset, AssetId, AspectRatio};
use crate::compositing::{Compositor, CompositingError, EditParams};
use crate::generation::{
    GeneratedImage, GenerationBackend, GenerationError, build_asset, validate_prompt,
};
use crate::store::{AssetHistory, ListingSet, StateStore};
use thiserror::Error;
use uuid::Uuid;

#[derive(Error, Debug)]
pub enum SessionError {
    #[error("a generation is already in flight")]
    GenerationInFlight,
    #[error("no asset is selected")]
    NoSelection,
    #[error("an edit is already in progress")]
    AlreadyEditing,
    #[error("no edit is in progress")]
    NotEditing,
    #[error("no asset with id {0}")]
    UnknownAsset(AssetId),
    #[error("only available in the forge view")]
    WrongView,
    #[error(transparent)]
    Generation(#[from] GenerationError),
    #[error(transparent)]
    Compositing(#[from] CompositingError),
    #[error("failed to persist session state: {0}")]
    Persist(#[from] std::io::Error),
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ViewMode {
    #[default]
    Forge,
    Marketplace,
}

/// Edit mode carries the transient params; leaving it drops them.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum EditMode {
    #[default]
    Idle,
    Editing(EditParams),
}

/// Proof that a generation was admitted. Holds everything the caller
/// needs to drive the collaborator; the token ties the eventual result
/// back to the slot it was issued for.
#[derive(Debug)]
pub struct GenerationTicket {
    token: Uuid,
    prompt: String,
    aspect_ratio: AspectRatio,
}

impl GenerationTicket {
    pub fn prompt(&self) -> &str {
        &self.prompt
    }

    pub fn aspect_ratio(&self) -> AspectRatio {
        self.aspect_ratio
    }
}

pub struct Session {
    history: AssetHistory,
    listings: ListingSet,
    selection: Option<AssetId>,
    view: ViewMode,
    edit: EditMode,
    in_flight: Option<Uuid>,
    store: StateStore,
}

impl Session {
    /// Restore a session from durable storage. Initial state: forge view,
    /// idle, the newest history entry selected (none if the history is
    /// empty).
    pub fn open(store: StateStore) -> Self {
        let (history, listings) = store.load();
        let selection = history.newest().map(|a| a.id.clone());
        Self {
            history,
            listings,
            selection,
            view: ViewMode::Forge,
            edit: EditMode::Idle,
            in_flight: None,
            store,
        }
    }

    pub fn history(&self) -> &AssetHistory {
        &self.history
    }

    pub fn selection(&self) -> Option<&AssetId> {
        self.selection.as_ref()
    }

    pub fn selected_asset(&self) -> Option<&Asset> {
        self.selection.as_ref().and_then(|id| self.history.get(id))
    }

    pub fn view(&self) -> ViewMode {
        self.view
    }

    pub fn edit_mode(&self) -> EditMode {
        self.edit
    }

    pub fn is_generating(&self) -> bool {
        self.in_flight.is_some()
    }

    fn persist(&self) -> Result<(), SessionError> {
        self.store.persist(&self.history, &self.listings)?;
        Ok(())
    }

    // =========================================================================
    // View and selection
    // =========================================================================

    /// Always legal; clears no state.
    pub fn switch_view(&mut self, view: ViewMode) {
        self.view = view;
    }

    /// Select an asset. Forge view only; exits editing.
    pub fn select(&mut self, id: &AssetId) -> Result<(), SessionError> {
        if self.view != ViewMode::Forge {
            return Err(SessionError::WrongView);
        }
        if !self.history.contains(id) {
            return Err(SessionError::UnknownAsset(id.clone()));
        }
        self.edit = EditMode::Idle;
        self.selection = Some(id.clone());
        Ok(())
    }

    // =========================================================================
    // Editing
    // =========================================================================

    /// Start editing the selected asset with default params. Forge view
    /// only — the marketplace shows assets, it never edits them.
    pub fn enter_edit(&mut self) -> Result<(), SessionError> {
        if self.view != ViewMode::Forge {
            return Err(SessionError::WrongView);
        }
        if matches!(self.edit, EditMode::Editing(_)) {
            return Err(SessionError::AlreadyEditing);
        }
        if self.selection.is_none() {
            return Err(SessionError::NoSelection);
        }
        self.edit = EditMode::Editing(EditParams::default());
        Ok(())
    }

    /// The transient params of the edit in progress.
    pub fn edit_params_mut(&mut self) -> Result<&mut EditParams, SessionError> {
        match &mut self.edit {
            EditMode::Editing(params) => Ok(params),
            EditMode::Idle => Err(SessionError::NotEditing),
        }
    }

    /// Render the edit and replace the selected asset's image in place
    /// (same id, same history position), then return to idle.
    ///
    /// On a compositing failure the session STAYS in edit mode with the
    /// asset untouched — the user can adjust or cancel.
    pub fn save_edit(&mut self, compositor: &impl Compositor) -> Result<(), SessionError> {
        let params = match self.edit {
            EditMode::Editing(params) => params,
            EditMode::Idle => return Err(SessionError::NotEditing),
        };
        let id = self.selection.clone().ok_or(SessionError::NoSelection)?;
        let source = self
            .history
            .get(&id)
            .ok_or_else(|| SessionError::UnknownAsset(id.clone()))?;

        let rendered = compositor.apply(&source.image_data, &params)?;

        if let Some(asset) = self.history.get_mut(&id) {
            asset.image_data = rendered;
        }
        self.edit = EditMode::Idle;
        self.persist()
    }

    /// Discard the edit in progress without touching the asset.
    pub fn cancel_edit(&mut self) -> Result<(), SessionError> {
        match self.edit {
            EditMode::Editing(_) => {
                self.edit = EditMode::Idle;
                Ok(())
            }
            EditMode::Idle => Err(SessionError::NotEditing),
        }
    }

    // =========================================================================
    // Deletion and listing
    // =========================================================================

    /// Remove an asset and cascade in one atomic step: unlist it and
    /// clear the selection (and any edit on it) if it was selected.
    /// Unknown ids are a no-op. Legal in any state.
    pub fn delete(&mut self, id: &AssetId) -> Result<(), SessionError> {
        if self.history.remove(id).is_none() {
            return Ok(());
        }
        self.listings.unlist(id);
        if self.selection.as_ref() == Some(id) {
            self.selection = None;
            self.edit = EditMode::Idle;
        }
        self.persist()
    }

    /// Idempotent listing. The asset must currently exist.
    pub fn mark_listed(&mut self, id: &AssetId) -> Result<(), SessionError> {
        if !self.history.contains(id) {
            return Err(SessionError::UnknownAsset(id.clone()));
        }
        if self.listings.mark_listed(id.clone()) {
            self.persist()?;
        }
        Ok(())
    }

    pub fn is_listed(&self, id: &AssetId) -> bool {
        self.listings.is_listed(id)
    }

    pub fn listed_assets(&self) -> impl Iterator<Item = &Asset> {
        self.history.iter().filter(|a| self.listings.is_listed(&a.id))
    }

    // =========================================================================
    // Generation
    // =========================================================================

    /// Admit a generation: validate the prompt, take the single-flight
    /// slot, exit editing (uncommitted params are discarded, per the
    /// edit/generate exclusivity rule).
    ///
    /// No state is persisted and no asset exists until the matching
    /// [`Session::complete_generation`].
    pub fn begin_generation(
        &mut self,
        prompt: &str,
        aspect_ratio: AspectRatio,
    ) -> Result<GenerationTicket, SessionError> {
        let prompt = validate_prompt(prompt)?;
        if self.in_flight.is_some() {
            return Err(SessionError::GenerationInFlight);
        }
        self.edit = EditMode::Idle;
        let token = Uuid::new_v4();
        self.in_flight = Some(token);
        Ok(GenerationTicket {
            token,
            prompt: prompt.to_string(),
            aspect_ratio,
        })
    }

    /// Deliver a generation result. Returns the new asset's id, or
    /// `Ok(None)` if the ticket is stale and the result was discarded.
    pub fn complete_generation(
        &mut self,
        ticket: GenerationTicket,
        image: GeneratedImage,
    ) -> Result<Option<AssetId>, SessionError> {
        if self.in_flight != Some(ticket.token) {
            tracing::debug!(prompt = %ticket.prompt, "discarding stale generation result");
            return Ok(None);
        }
        self.in_flight = None;
        self.admit_generated(ticket, image).map(Some)
    }

    /// Release the single-flight slot after a failed round trip.
    pub fn abandon_generation(&mut self, ticket: &GenerationTicket) {
        if self.in_flight == Some(ticket.token) {
            self.in_flight = None;
        }
    }

    /// Full round trip against a backend. Holding `&mut self` across the
    /// await means no other transition can interleave, so the ticket
    /// issued here can never go stale.
    pub async fn generate(
        &mut self,
        backend: &impl GenerationBackend,
        prompt: &str,
        aspect_ratio: AspectRatio,
    ) -> Result<AssetId, SessionError> {
        let ticket = self.begin_generation(prompt, aspect_ratio)?;
        match backend.generate_image(&ticket.prompt, ticket.aspect_ratio).await {
            Ok(image) => {
                self.in_flight = None;
                self.admit_generated(ticket, image)
            }
            Err(e) => {
                self.abandon_generation(&ticket);
                Err(e.into())
            }
        }
    }

    /// Build the asset, insert it (cascading evictions), select it,
    /// persist. The in-flight slot must already be cleared.
    fn admit_generated(
        &mut self,
        ticket: GenerationTicket,
        image: GeneratedImage,
    ) -> Result<AssetId, SessionError> {
        // Never admit an asset with empty image data.
        if image.data_uri.is_empty() {
            return Err(GenerationError::NoImagePayload.into());
        }
        let asset = build_asset(&ticket.prompt, ticket.aspect_ratio, image);
        let id = asset.id.clone();
        for evicted in self.history.insert(asset) {
            self.listings.unlist(&evicted.id);
            if self.selection.as_ref() == Some(&evicted.id) {
                self.selection = None;
            }
        }
        self.selection = Some(id.clone());
        self.persist()?;
        tracing::info!(id = %id, prompt = %ticket.prompt, "asset generated");
        Ok(id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::compositing::Rotation;
    use crate::compositing::backend::tests::{MockCompositor, RecordedOp};
    use crate::generation::tests::StubBackend;
    use crate::store::HISTORY_CAPACITY;
    use tempfile::TempDir;

    fn session(tmp: &TempDir) -> Session {
        Session::open(StateStore::new(tmp.path()))
    }

    fn image(data: &str) -> GeneratedImage {
        GeneratedImage {
            data_uri: format!("data:image/png;base64,{data}"),
        }
    }

    /// Drive one full generation through the ticket protocol.
    fn generate_one(session: &mut Session, prompt: &str) -> AssetId {
        let ticket = session
            .begin_generation(prompt, AspectRatio::Square)
            .unwrap();
        session
            .complete_generation(ticket, image("QUJD"))
            .unwrap()
            .unwrap()
    }

    // =========================================================================
    // Initial state
    // =========================================================================

    #[test]
    fn fresh_session_is_forge_idle_unselected() {
        let tmp = TempDir::new().unwrap();
        let s = session(&tmp);
        assert_eq!(s.view(), ViewMode::Forge);
        assert_eq!(s.edit_mode(), EditMode::Idle);
        assert!(s.selection().is_none());
        assert!(!s.is_generating());
    }

    #[test]
    fn reopened_session_selects_newest() {
        let tmp = TempDir::new().unwrap();
        let mut s = session(&tmp);
        generate_one(&mut s, "older");
        let newest = generate_one(&mut s, "newest");
        drop(s);

        let s = session(&tmp);
        assert_eq!(s.selection(), Some(&newest));
        assert_eq!(s.selected_asset().unwrap().prompt, "newest");
    }

    // =========================================================================
    // Generation
    // =========================================================================

    #[test]
    fn generation_selects_the_new_asset() {
        let tmp = TempDir::new().unwrap();
        let mut s = session(&tmp);
        let id = generate_one(&mut s, "golden dragon");
        assert_eq!(s.selection(), Some(&id));
        assert_eq!(s.history().len(), 1);
        assert_eq!(s.history().newest().unwrap().prompt, "golden dragon");
    }

    #[test]
    fn empty_prompt_rejected_before_ticket() {
        let tmp = TempDir::new().unwrap();
        let mut s = session(&tmp);
        let result = s.begin_generation("   ", AspectRatio::Square);
        assert!(matches!(
            result,
            Err(SessionError::Generation(GenerationError::EmptyPrompt))
        ));
        assert!(!s.is_generating());
        assert!(s.history().is_empty());
    }

    #[test]
    fn second_begin_is_rejected_while_in_flight() {
        let tmp = TempDir::new().unwrap();
        let mut s = session(&tmp);
        let ticket = s.begin_generation("first", AspectRatio::Square).unwrap();
        assert!(matches!(
            s.begin_generation("second", AspectRatio::Square),
            Err(SessionError::GenerationInFlight)
        ));
        // Completing the first releases the slot.
        s.complete_generation(ticket, image("QQ==")).unwrap();
        assert!(s.begin_generation("third", AspectRatio::Square).is_ok());
    }

    #[test]
    fn stale_ticket_result_is_discarded() {
        let tmp = TempDir::new().unwrap();
        let mut s = session(&tmp);
        let ticket = s.begin_generation("doomed", AspectRatio::Square).unwrap();
        s.abandon_generation(&ticket);

        let outcome = s.complete_generation(ticket, image("QQ==")).unwrap();
        assert_eq!(outcome, None);
        assert!(s.history().is_empty());
        assert!(s.selection().is_none());
    }

    #[test]
    fn empty_image_data_is_an_error_not_an_asset() {
        let tmp = TempDir::new().unwrap();
        let mut s = session(&tmp);
        let ticket = s.begin_generation("prompt", AspectRatio::Square).unwrap();
        let result = s.complete_generation(
            ticket,
            GeneratedImage {
                data_uri: String::new(),
            },
        );
        assert!(matches!(
            result,
            Err(SessionError::Generation(GenerationError::NoImagePayload))
        ));
        assert!(s.history().is_empty());
        assert!(!s.is_generating());
    }

    #[test]
    fn begin_generation_exits_editing() {
        let tmp = TempDir::new().unwrap();
        let mut s = session(&tmp);
        generate_one(&mut s, "base");
        s.enter_edit().unwrap();
        s.edit_params_mut().unwrap().set_sepia(50);

        let ticket = s.begin_generation("next", AspectRatio::Square).unwrap();
        assert_eq!(s.edit_mode(), EditMode::Idle);
        s.complete_generation(ticket, image("QQ==")).unwrap();
        // Re-entering starts from defaults; the sepia tweak is gone.
        s.enter_edit().unwrap();
        assert!(s.edit_params_mut().unwrap().is_identity());
    }

    #[test]
    fn thirteen_generations_keep_twelve_newest_first() {
        let tmp = TempDir::new().unwrap();
        let mut s = session(&tmp);
        let first = generate_one(&mut s, "prompt 0");
        for i in 1..13 {
            generate_one(&mut s, &format!("prompt {i}"));
        }
        assert_eq!(s.history().len(), HISTORY_CAPACITY);
        assert_eq!(s.history().newest().unwrap().prompt, "prompt 12");
        assert!(!s.history().contains(&first));
    }

    #[test]
    fn eviction_cascades_to_listings_and_selection() {
        let tmp = TempDir::new().unwrap();
        let mut s = session(&tmp);
        let first = generate_one(&mut s, "evicted soon");
        s.mark_listed(&first).unwrap();
        s.select(&first).unwrap();

        for i in 0..HISTORY_CAPACITY {
            generate_one(&mut s, &format!("filler {i}"));
        }

        assert!(!s.history().contains(&first));
        assert!(!s.is_listed(&first));
        // Selection moved to the newest generated asset, not left dangling.
        assert!(s.selection().is_some_and(|id| s.history().contains(id)));
    }

    #[tokio::test]
    async fn generate_round_trip_with_stub() {
        let tmp = TempDir::new().unwrap();
        let mut s = session(&tmp);
        let backend = StubBackend::returning("data:image/png;base64,QUJD");

        let id = s
            .generate(&backend, "  golden dragon  ", AspectRatio::Square)
            .await
            .unwrap();

        assert_eq!(backend.call_count(), 1);
        let (prompt, ratio) = backend.calls.lock().unwrap()[0].clone();
        assert_eq!(prompt, "golden dragon"); // trimmed before the call
        assert_eq!(ratio, AspectRatio::Square);
        assert_eq!(s.selection(), Some(&id));
        assert!(!s.is_generating());
    }

    #[tokio::test]
    async fn generate_failure_leaves_state_unchanged() {
        let tmp = TempDir::new().unwrap();
        let mut s = session(&tmp);
        let keep = generate_one(&mut s, "keeper");
        let backend = StubBackend::failing();

        let result = s.generate(&backend, "doomed", AspectRatio::Square).await;

        assert!(matches!(
            result,
            Err(SessionError::Generation(GenerationError::NoImagePayload))
        ));
        assert_eq!(s.history().len(), 1);
        assert_eq!(s.selection(), Some(&keep));
        assert!(!s.is_generating()); // slot released, next attempt allowed
    }

    #[tokio::test]
    async fn empty_prompt_never_reaches_the_backend() {
        let tmp = TempDir::new().unwrap();
        let mut s = session(&tmp);
        let backend = StubBackend::returning("data:image/png;base64,QQ==");

        let result = s.generate(&backend, "", AspectRatio::Square).await;

        assert!(matches!(
            result,
            Err(SessionError::Generation(GenerationError::EmptyPrompt))
        ));
        assert_eq!(backend.call_count(), 0);
    }

    // =========================================================================
    // View and selection
    // =========================================================================

    #[test]
    fn select_requires_forge_view() {
        let tmp = TempDir::new().unwrap();
        let mut s = session(&tmp);
        let id = generate_one(&mut s, "asset");
        s.switch_view(ViewMode::Marketplace);
        assert!(matches!(s.select(&id), Err(SessionError::WrongView)));
        s.switch_view(ViewMode::Forge);
        assert!(s.select(&id).is_ok());
    }

    #[test]
    fn enter_edit_requires_forge_view() {
        let tmp = TempDir::new().unwrap();
        let mut s = session(&tmp);
        generate_one(&mut s, "asset");
        s.switch_view(ViewMode::Marketplace);
        // The selection survives the view switch, but editing is still
        // out of reach until back in the forge.
        assert!(s.selection().is_some());
        assert!(matches!(s.enter_edit(), Err(SessionError::WrongView)));
        assert_eq!(s.edit_mode(), EditMode::Idle);
        s.switch_view(ViewMode::Forge);
        assert!(s.enter_edit().is_ok());
    }

    #[test]
    fn switch_view_clears_nothing() {
        let tmp = TempDir::new().unwrap();
        let mut s = session(&tmp);
        let id = generate_one(&mut s, "asset");
        s.enter_edit().unwrap();
        s.switch_view(ViewMode::Marketplace);
        assert_eq!(s.selection(), Some(&id));
        assert!(matches!(s.edit_mode(), EditMode::Editing(_)));
    }

    #[test]
    fn select_unknown_asset_fails() {
        let tmp = TempDir::new().unwrap();
        let mut s = session(&tmp);
        assert!(matches!(
            s.select(&AssetId::from("ghost")),
            Err(SessionError::UnknownAsset(_))
        ));
    }

    #[test]
    fn select_exits_editing() {
        let tmp = TempDir::new().unwrap();
        let mut s = session(&tmp);
        let a = generate_one(&mut s, "a");
        let b = generate_one(&mut s, "b");
        s.select(&a).unwrap();
        s.enter_edit().unwrap();
        s.select(&b).unwrap();
        assert_eq!(s.edit_mode(), EditMode::Idle);
    }

    // =========================================================================
    // Editing
    // =========================================================================

    #[test]
    fn enter_edit_requires_selection() {
        let tmp = TempDir::new().unwrap();
        let mut s = session(&tmp);
        assert!(matches!(s.enter_edit(), Err(SessionError::NoSelection)));
    }

    #[test]
    fn enter_edit_twice_fails() {
        let tmp = TempDir::new().unwrap();
        let mut s = session(&tmp);
        generate_one(&mut s, "asset");
        s.enter_edit().unwrap();
        assert!(matches!(s.enter_edit(), Err(SessionError::AlreadyEditing)));
    }

    #[test]
    fn save_edit_replaces_image_in_place() {
        let tmp = TempDir::new().unwrap();
        let mut s = session(&tmp);
        generate_one(&mut s, "older");
        let id = generate_one(&mut s, "edited");
        let compositor = MockCompositor::with_apply_results(vec!["data:image/png;base64,TkVX".into()]);

        s.enter_edit().unwrap();
        s.edit_params_mut().unwrap().rotation = Rotation::R90;
        s.save_edit(&compositor).unwrap();

        assert_eq!(s.edit_mode(), EditMode::Idle);
        assert_eq!(
            s.history().get(&id).unwrap().image_data,
            "data:image/png;base64,TkVX"
        );
        // Edit does not reorder: the edited asset is still the head.
        assert_eq!(s.history().newest().unwrap().id, id);

        // The compositor saw the original image and the tweaked params.
        let ops = compositor.get_operations();
        assert!(matches!(
            &ops[0],
            RecordedOp::Apply { params, .. } if params.rotation == Rotation::R90
        ));
    }

    #[test]
    fn save_edit_failure_keeps_editing_and_asset() {
        let tmp = TempDir::new().unwrap();
        let mut s = session(&tmp);
        let id = generate_one(&mut s, "asset");
        let original = s.history().get(&id).unwrap().image_data.clone();
        let compositor = MockCompositor::failing();

        s.enter_edit().unwrap();
        let result = s.save_edit(&compositor);

        assert!(matches!(result, Err(SessionError::Compositing(_))));
        assert!(matches!(s.edit_mode(), EditMode::Editing(_)));
        assert_eq!(s.history().get(&id).unwrap().image_data, original);
    }

    #[test]
    fn cancel_edit_discards_params_without_rendering() {
        let tmp = TempDir::new().unwrap();
        let mut s = session(&tmp);
        let id = generate_one(&mut s, "asset");
        let original = s.history().get(&id).unwrap().image_data.clone();

        s.enter_edit().unwrap();
        s.edit_params_mut().unwrap().set_grayscale(100);
        s.cancel_edit().unwrap();

        assert_eq!(s.edit_mode(), EditMode::Idle);
        assert_eq!(s.history().get(&id).unwrap().image_data, original);
        assert!(matches!(s.cancel_edit(), Err(SessionError::NotEditing)));
    }

    // =========================================================================
    // Deletion and listing
    // =========================================================================

    #[test]
    fn delete_cascades_atomically() {
        let tmp = TempDir::new().unwrap();
        let mut s = session(&tmp);
        let id = generate_one(&mut s, "doomed");
        s.mark_listed(&id).unwrap();

        s.delete(&id).unwrap();

        assert!(!s.history().contains(&id));
        assert!(!s.is_listed(&id));
        assert!(s.selection().is_none());
        // With no selection, editing is unreachable until a new select.
        assert!(matches!(s.enter_edit(), Err(SessionError::NoSelection)));
    }

    #[test]
    fn delete_of_unselected_asset_keeps_selection() {
        let tmp = TempDir::new().unwrap();
        let mut s = session(&tmp);
        let a = generate_one(&mut s, "a");
        let b = generate_one(&mut s, "b");
        s.delete(&a).unwrap();
        assert_eq!(s.selection(), Some(&b));
    }

    #[test]
    fn delete_unknown_is_a_noop() {
        let tmp = TempDir::new().unwrap();
        let mut s = session(&tmp);
        generate_one(&mut s, "survivor");
        s.delete(&AssetId::from("ghost")).unwrap();
        assert_eq!(s.history().len(), 1);
    }

    #[test]
    fn delete_while_editing_the_victim_exits_edit() {
        let tmp = TempDir::new().unwrap();
        let mut s = session(&tmp);
        let id = generate_one(&mut s, "doomed");
        s.enter_edit().unwrap();
        s.delete(&id).unwrap();
        assert_eq!(s.edit_mode(), EditMode::Idle);
        assert!(s.selection().is_none());
    }

    #[test]
    fn listing_is_idempotent_across_repeated_share_actions() {
        let tmp = TempDir::new().unwrap();
        let mut s = session(&tmp);
        let id = generate_one(&mut s, "shared twice");
        // e.g. shared on X, then on LinkedIn
        s.mark_listed(&id).unwrap();
        s.mark_listed(&id).unwrap();
        assert_eq!(s.listed_assets().count(), 1);
    }

    #[test]
    fn mark_listed_requires_live_asset() {
        let tmp = TempDir::new().unwrap();
        let mut s = session(&tmp);
        assert!(matches!(
            s.mark_listed(&AssetId::from("ghost")),
            Err(SessionError::UnknownAsset(_))
        ));
    }
}
