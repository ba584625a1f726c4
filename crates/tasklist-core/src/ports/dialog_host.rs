//! DialogHost port - オーバーレイの描画先
//!
//! DialogService は状態遷移だけを持ち、描画はすべてこの trait に委譲します。
//! ユーザー操作は host 側で拾って `DialogService::dispatch` に渡します。

use crate::dialog::DialogView;
use crate::domain::DialogId;

/// Renders dialog overlays.
///
/// Every call is keyed by the dialog id, so a host never has to look an
/// overlay up by a shared element id.
pub trait DialogHost {
    /// Insert the overlay in its hidden state.
    fn mount(&self, id: DialogId, view: &DialogView);

    /// Toggle the visible (`show`) state that drives the CSS transition.
    fn set_visible(&self, id: DialogId, visible: bool);

    fn focus_input(&self, id: DialogId);

    /// Current text of the dialog's input field, if it has one.
    fn input_value(&self, id: DialogId) -> Option<String>;

    /// Remove the overlay from the document.
    fn unmount(&self, id: DialogId);
}

impl<H: DialogHost + ?Sized> DialogHost for std::rc::Rc<H> {
    fn mount(&self, id: DialogId, view: &DialogView) {
        (**self).mount(id, view)
    }

    fn set_visible(&self, id: DialogId, visible: bool) {
        (**self).set_visible(id, visible)
    }

    fn focus_input(&self, id: DialogId) {
        (**self).focus_input(id)
    }

    fn input_value(&self, id: DialogId) -> Option<String> {
        (**self).input_value(id)
    }

    fn unmount(&self, id: DialogId) {
        (**self).unmount(id)
    }
}
