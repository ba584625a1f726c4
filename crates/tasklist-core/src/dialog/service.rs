//! DialogService - 単一フライトのダイアログ状態機械
//!
//! # 状態遷移
//! - Created: overlay を非表示で挿入した直後
//! - Visible: 次の tick で show（トランジション開始）
//! - Dismissed: ボタン / overlay クリック / Escape / Enter で確定
//!
//! Dismissed の後は非表示にし、トランジション時間を待ってから
//! overlay を削除し、最後に結果を呼び出し側へ返します。

use std::rc::Rc;
use std::sync::{Mutex, MutexGuard, PoisonError};
use tokio::sync::{oneshot, watch};
use tracing::debug;

use super::DialogView;
use crate::config::DialogConfig;
use crate::domain::{
    DialogAction, DialogError, DialogEvent, DialogId, DialogKind, DialogOutcome, DialogRequest, Key,
};
use crate::ports::{DialogHost, Timer};

/// `dispatch` の弱参照ハンドル。host が持つ event listener から呼ぶ
pub type Dispatcher = Rc<dyn Fn(DialogEvent) -> bool>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DialogPhase {
    Created,
    Visible,
    Dismissed,
}

/// Public view of the in-flight dialog.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DialogSnapshot {
    pub id: DialogId,
    pub kind: DialogKind,
    pub phase: DialogPhase,
}

struct ActiveDialog {
    id: DialogId,
    kind: DialogKind,
    phase: DialogPhase,
    mounted: bool,
    responder: Option<oneshot::Sender<DialogOutcome>>,
}

impl ActiveDialog {
    fn snapshot(&self) -> DialogSnapshot {
        DialogSnapshot {
            id: self.id,
            kind: self.kind,
            phase: self.phase,
        }
    }
}

/// Presents alert / confirm / prompt and resolves once the user dismisses.
///
/// At most one dialog is in flight. A request made while another dialog is
/// open fails with `DialogError::Busy` instead of stacking a second overlay.
/// There is no timeout and no programmatic cancel: only the user closes a
/// dialog.
pub struct DialogService<H, T> {
    host: H,
    timer: T,
    config: DialogConfig,
    active: Mutex<Option<ActiveDialog>>,
    state: watch::Sender<Option<DialogSnapshot>>,
}

/// Releases the single-flight slot even if the `show` future is dropped.
struct Flight<'a, H: DialogHost, T> {
    service: &'a DialogService<H, T>,
    id: DialogId,
}

impl<H: DialogHost, T> Drop for Flight<'_, H, T> {
    fn drop(&mut self) {
        self.service.release(self.id);
    }
}

impl<H: DialogHost, T: Timer> DialogService<H, T> {
    pub fn new(host: H, timer: T, config: DialogConfig) -> Self {
        let (state, _) = watch::channel(None);
        Self {
            host,
            timer,
            config,
            active: Mutex::new(None),
            state,
        }
    }

    pub fn host(&self) -> &H {
        &self.host
    }

    pub fn config(&self) -> &DialogConfig {
        &self.config
    }

    /// The in-flight dialog, if any.
    pub fn active(&self) -> Option<DialogSnapshot> {
        *self.state.borrow()
    }

    /// Follow dialog state changes.
    pub fn subscribe(&self) -> watch::Receiver<Option<DialogSnapshot>> {
        self.state.subscribe()
    }

    /// Show a message with a single OK button.
    pub async fn alert(&self, message: &str, title: Option<&str>) -> Result<(), DialogError> {
        let title = title.unwrap_or(self.config.titles.alert.as_str());
        self.show(DialogRequest::alert(message, title)).await?;
        Ok(())
    }

    /// `true` only when the user picked the affirmative action.
    pub async fn confirm(&self, message: &str, title: Option<&str>) -> Result<bool, DialogError> {
        let title = title.unwrap_or(self.config.titles.confirm.as_str());
        let outcome = self.show(DialogRequest::confirm(message, title)).await?;
        Ok(outcome.is_confirmed())
    }

    /// The input text at the moment of an affirmative dismissal, else `None`.
    pub async fn prompt(
        &self,
        message: &str,
        title: Option<&str>,
        placeholder: &str,
    ) -> Result<Option<String>, DialogError> {
        let title = title.unwrap_or(self.config.titles.prompt.as_str());
        let outcome = self
            .show(DialogRequest::prompt(message, title, placeholder))
            .await?;
        Ok(outcome.into_input())
    }

    /// Run one dialog through `Created -> Visible -> Dismissed`.
    pub async fn show(&self, request: DialogRequest) -> Result<DialogOutcome, DialogError> {
        let (id, receiver) = self.begin(request.kind)?;
        let _flight = Flight { service: self, id };

        let view = DialogView::from_request(id, &request, &self.config.labels);
        self.host.mount(id, &view);
        self.update(id, |d| d.mounted = true);
        debug!(%id, kind = ?request.kind, "dialog mounted");

        self.timer.sleep(self.config.show_delay()).await;
        if self.advance(id, DialogPhase::Created, DialogPhase::Visible) {
            self.host.set_visible(id, true);
            if request.has_input() {
                self.host.focus_input(id);
            }
            debug!(%id, "dialog visible");
        }

        let outcome = receiver.await.map_err(|_| DialogError::Abandoned);

        self.host.set_visible(id, false);
        self.timer.sleep(self.config.transition()).await;
        self.release(id);
        debug!(%id, ?outcome, "dialog removed");

        outcome
    }

    /// Route user input to the in-flight dialog.
    ///
    /// Returns `true` when the event dismissed it. Events with no dialog
    /// open, after dismissal, or that the dialog ignores return `false`.
    pub fn dispatch(&self, event: DialogEvent) -> bool {
        let mut active = self.lock();
        let Some(dialog) = active.as_mut() else {
            return false;
        };
        if dialog.phase == DialogPhase::Dismissed {
            return false;
        }

        let outcome = match event {
            DialogEvent::ActionClicked(action) => self.action_outcome(dialog, action),
            DialogEvent::OverlayClicked => self.action_outcome(dialog, DialogAction::Cancel),
            DialogEvent::KeyPressed(Key::Escape) => DialogOutcome::Closed,
            DialogEvent::KeyPressed(Key::Enter) if dialog.kind == DialogKind::Prompt => {
                self.action_outcome(dialog, DialogAction::Confirm)
            }
            DialogEvent::KeyPressed(_) => return false,
        };

        dialog.phase = DialogPhase::Dismissed;
        let snapshot = dialog.snapshot();
        if let Some(responder) = dialog.responder.take() {
            // The receiver only disappears when `show` was dropped; the
            // flight guard cleans up in that case.
            let _ = responder.send(outcome);
        }
        drop(active);

        debug!(id = %snapshot.id, "dialog dismissed");
        self.state.send_replace(Some(snapshot));
        true
    }

    fn action_outcome(&self, dialog: &ActiveDialog, action: DialogAction) -> DialogOutcome {
        let input = if dialog.kind == DialogKind::Prompt && action == DialogAction::Confirm {
            Some(self.host.input_value(dialog.id).unwrap_or_default())
        } else {
            None
        };
        DialogOutcome::Action { action, input }
    }
}

impl<H: DialogHost + 'static, T: Timer + 'static> DialogService<H, T> {
    /// Hand `dispatch` to listeners the host owns.
    ///
    /// Holds the service weakly, so a host storing it inside the service
    /// does not keep the service alive. Once the service is gone every
    /// call returns `false`.
    pub fn dispatcher(self: &Rc<Self>) -> Dispatcher {
        let service = Rc::downgrade(self);
        Rc::new(move |event: DialogEvent| service.upgrade().is_some_and(|s| s.dispatch(event)))
    }
}

impl<H: DialogHost, T> DialogService<H, T> {
    fn lock(&self) -> MutexGuard<'_, Option<ActiveDialog>> {
        self.active.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn begin(
        &self,
        kind: DialogKind,
    ) -> Result<(DialogId, oneshot::Receiver<DialogOutcome>), DialogError> {
        let mut active = self.lock();
        if let Some(current) = active.as_ref() {
            debug!(busy = %current.id, "dialog request rejected");
            return Err(DialogError::Busy(current.id));
        }

        let id = DialogId::generate();
        let (responder, receiver) = oneshot::channel();
        let dialog = ActiveDialog {
            id,
            kind,
            phase: DialogPhase::Created,
            mounted: false,
            responder: Some(responder),
        };
        let snapshot = dialog.snapshot();
        *active = Some(dialog);
        drop(active);

        self.state.send_replace(Some(snapshot));
        Ok((id, receiver))
    }

    fn update(&self, id: DialogId, f: impl FnOnce(&mut ActiveDialog)) {
        if let Some(dialog) = self.lock().as_mut().filter(|d| d.id == id) {
            f(dialog);
        }
    }

    fn advance(&self, id: DialogId, from: DialogPhase, to: DialogPhase) -> bool {
        let mut active = self.lock();
        let Some(dialog) = active.as_mut().filter(|d| d.id == id && d.phase == from) else {
            return false;
        };
        dialog.phase = to;
        let snapshot = dialog.snapshot();
        drop(active);

        self.state.send_replace(Some(snapshot));
        true
    }

    /// Unmount (if still mounted) and free the slot. Idempotent.
    fn release(&self, id: DialogId) {
        let mut active = self.lock();
        if !active.as_ref().is_some_and(|d| d.id == id) {
            return;
        }
        let mounted = active.take().is_some_and(|d| d.mounted);
        drop(active);

        if mounted {
            self.host.unmount(id);
        }
        self.state.send_replace(None);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::impls::{HostCall, ImmediateTimer, RecordingDialogHost};

    type Service = DialogService<Rc<RecordingDialogHost>, ImmediateTimer>;

    fn service() -> (Rc<Service>, Rc<RecordingDialogHost>) {
        let host = Rc::new(RecordingDialogHost::new());
        let svc = Rc::new(DialogService::new(
            host.clone(),
            ImmediateTimer,
            DialogConfig::default(),
        ));
        (svc, host)
    }

    /// Wait until a dialog is visible, then feed it one event.
    async fn answer(svc: &Service, event: DialogEvent) {
        let mut rx = svc.subscribe();
        rx.wait_for(|s| matches!(s, Some(s) if s.phase == DialogPhase::Visible))
            .await
            .unwrap();
        assert!(svc.dispatch(event));
    }

    #[tokio::test]
    async fn confirm_true_only_for_confirm_action() {
        let (svc, _) = service();
        let (result, _) = tokio::join!(
            svc.confirm("Delete?", None),
            answer(&svc, DialogEvent::ActionClicked(DialogAction::Confirm)),
        );
        assert_eq!(result, Ok(true));
    }

    #[rstest::rstest]
    #[case::cancel_button(DialogEvent::ActionClicked(DialogAction::Cancel))]
    #[case::outside_click(DialogEvent::OverlayClicked)]
    #[case::escape(DialogEvent::KeyPressed(Key::Escape))]
    #[tokio::test]
    async fn confirm_false_for_every_other_dismissal(#[case] event: DialogEvent) {
        let (svc, _) = service();
        let (result, _) = tokio::join!(svc.confirm("Delete?", None), answer(&svc, event));
        assert_eq!(result, Ok(false));
    }

    #[tokio::test]
    async fn enter_does_not_dismiss_confirm() {
        let (svc, _) = service();
        let (result, _) = tokio::join!(svc.confirm("Delete?", None), async {
            let mut rx = svc.subscribe();
            rx.wait_for(|s| s.is_some_and(|s| s.phase == DialogPhase::Visible))
                .await
                .unwrap();
            assert!(!svc.dispatch(DialogEvent::KeyPressed(Key::Enter)));
            assert!(svc.dispatch(DialogEvent::ActionClicked(DialogAction::Confirm)));
        });
        assert_eq!(result, Ok(true));
    }

    #[tokio::test]
    async fn prompt_returns_text_at_affirmative_dismissal() {
        let (svc, host) = service();
        let (result, _) = tokio::join!(svc.prompt("Type it", None, "DELETE ALL"), async {
            let mut rx = svc.subscribe();
            rx.wait_for(|s| s.is_some_and(|s| s.phase == DialogPhase::Visible))
                .await
                .unwrap();
            host.type_text("DELETE");
            host.type_text("DELETE ALL");
            assert!(svc.dispatch(DialogEvent::KeyPressed(Key::Enter)));
            // Typing after dismissal does not change the result.
            host.type_text("too late");
        });
        assert_eq!(result, Ok(Some("DELETE ALL".to_string())));
    }

    #[rstest::rstest]
    #[case::cancel_button(DialogEvent::ActionClicked(DialogAction::Cancel))]
    #[case::outside_click(DialogEvent::OverlayClicked)]
    #[case::escape(DialogEvent::KeyPressed(Key::Escape))]
    #[tokio::test]
    async fn prompt_none_for_every_other_dismissal(#[case] event: DialogEvent) {
        let (svc, host) = service();
        let (result, _) = tokio::join!(svc.prompt("Type it", None, ""), async {
            let mut rx = svc.subscribe();
            rx.wait_for(|s| s.is_some_and(|s| s.phase == DialogPhase::Visible))
                .await
                .unwrap();
            host.type_text("DELETE ALL");
            assert!(svc.dispatch(event));
        });
        assert_eq!(result, Ok(None));
    }

    #[tokio::test]
    async fn alert_resolves_on_ok_and_uses_default_title() {
        let (svc, host) = service();
        let (result, _) = tokio::join!(
            svc.alert("Saved", None),
            answer(&svc, DialogEvent::ActionClicked(DialogAction::Ok)),
        );
        assert_eq!(result, Ok(()));
        let views = host.views();
        assert_eq!(views.len(), 1);
        assert_eq!(views[0].title, "Notice");
    }

    #[tokio::test]
    async fn lifecycle_calls_host_in_order() {
        let (svc, host) = service();
        let (_, _) = tokio::join!(
            svc.prompt("Name?", Some("Rename"), ""),
            answer(&svc, DialogEvent::ActionClicked(DialogAction::Cancel)),
        );

        let id = host.views()[0].id;
        assert_eq!(
            host.calls(),
            vec![
                HostCall::Mount(id),
                HostCall::Show(id),
                HostCall::Focus(id),
                HostCall::Hide(id),
                HostCall::Unmount(id),
            ]
        );
        assert_eq!(host.mounted_count(), 0);
        assert_eq!(svc.active(), None);
    }

    #[tokio::test]
    async fn second_request_while_open_is_rejected() {
        let (svc, host) = service();
        let (first, _) = tokio::join!(svc.confirm("first", None), async {
            let mut rx = svc.subscribe();
            rx.wait_for(|s| s.is_some_and(|s| s.phase == DialogPhase::Visible))
                .await
                .unwrap();

            let busy = svc.confirm("second", None).await;
            assert!(matches!(busy, Err(DialogError::Busy(_))));
            assert_eq!(host.mounted_count(), 1);

            assert!(svc.dispatch(DialogEvent::ActionClicked(DialogAction::Confirm)));
        });
        assert_eq!(first, Ok(true));
    }

    #[tokio::test]
    async fn slot_is_free_again_after_dismissal() {
        let (svc, _) = service();
        for _ in 0..2 {
            let (result, _) = tokio::join!(
                svc.confirm("again?", None),
                answer(&svc, DialogEvent::ActionClicked(DialogAction::Confirm)),
            );
            assert_eq!(result, Ok(true));
        }
    }

    #[tokio::test]
    async fn dropped_show_future_frees_slot_and_overlay() {
        let (svc, host) = service();
        {
            let pending = svc.confirm("abandon me", None);
            tokio::pin!(pending);
            // Poll until the dialog waits on the user, then drop it.
            let _ = tokio::time::timeout(std::time::Duration::from_millis(5), &mut pending).await;
            assert_eq!(host.mounted_count(), 1);
        }
        assert_eq!(svc.active(), None);
        assert_eq!(host.mounted_count(), 0);
        assert!(!svc.dispatch(DialogEvent::KeyPressed(Key::Escape)));
    }

    #[test]
    fn dispatch_without_dialog_is_ignored() {
        let (svc, _) = service();
        assert!(!svc.dispatch(DialogEvent::OverlayClicked));
    }

    #[tokio::test]
    async fn dispatcher_routes_to_open_dialog() {
        let (svc, _) = service();
        let dispatch = svc.dispatcher();
        let wait_and_escape = async {
            let mut rx = svc.subscribe();
            rx.wait_for(|s| matches!(s, Some(s) if s.phase == DialogPhase::Visible))
                .await
                .unwrap();
            assert!(dispatch(DialogEvent::KeyPressed(Key::Escape)));
        };
        let (result, _) = tokio::join!(svc.confirm("Delete?", None), wait_and_escape);
        assert_eq!(result, Ok(false));
    }

    #[test]
    fn dispatcher_does_not_keep_service_alive() {
        let (svc, _) = service();
        let dispatch = svc.dispatcher();
        let weak = Rc::downgrade(&svc);
        drop(svc);
        assert!(weak.upgrade().is_none());
        assert!(!dispatch(DialogEvent::OverlayClicked));
    }
}
