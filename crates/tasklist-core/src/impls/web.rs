//! Browser adapters (`web` feature, wasm32)
//!
//! 各 adapter は呼び出しのたびに `window()` から API を取り直します。
//! アクセス自体が例外を投げる環境（sandbox iframe など）では
//! それが AccessError になり、selector が次の候補へ進みます。

use async_trait::async_trait;
use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;
use std::time::Duration;
use tracing::warn;
use wasm_bindgen::closure::Closure;
use wasm_bindgen::{JsCast, JsValue};
use web_sys::{
    Document, Element, HtmlDocument, HtmlInputElement, KeyboardEvent, MouseEvent, Storage, Window,
};

use crate::config::{DialogConfig, StorageConfig};
use crate::dialog::{DialogService, DialogView, Dispatcher};
use crate::domain::{DialogAction, DialogEvent, DialogId, Key};
use crate::ports::{
    AccessError, CookieJar, DialogHost, FragmentSlot, KeyValueArea, SystemClock, Timer,
};
use crate::storage::StorageSelector;

fn window() -> Result<Window, AccessError> {
    web_sys::window().ok_or_else(|| AccessError::new("no window object"))
}

fn js_error(err: JsValue) -> AccessError {
    AccessError::new(format!("{err:?}"))
}

fn html_document() -> Result<HtmlDocument, AccessError> {
    window()?
        .document()
        .ok_or_else(|| AccessError::new("no document"))?
        .dyn_into::<HtmlDocument>()
        .map_err(|_| AccessError::new("document is not an HTML document"))
}

/// The standard priority list over the real browser APIs.
pub fn browser_selector(config: &StorageConfig) -> StorageSelector {
    StorageSelector::standard(
        WebStorageArea::local(),
        WebStorageArea::session(),
        DocumentCookieJar,
        LocationFragment,
        SystemClock,
        config,
    )
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum AreaKind {
    Local,
    Session,
}

/// `window.localStorage` or `window.sessionStorage`.
#[derive(Debug, Clone, Copy)]
pub struct WebStorageArea {
    kind: AreaKind,
}

impl WebStorageArea {
    pub fn local() -> Self {
        Self {
            kind: AreaKind::Local,
        }
    }

    pub fn session() -> Self {
        Self {
            kind: AreaKind::Session,
        }
    }

    fn storage(&self) -> Result<Storage, AccessError> {
        let window = window()?;
        let storage = match self.kind {
            AreaKind::Local => window.local_storage(),
            AreaKind::Session => window.session_storage(),
        }
        .map_err(js_error)?;
        storage.ok_or_else(|| AccessError::new("storage is not available"))
    }
}

impl KeyValueArea for WebStorageArea {
    fn get_item(&self, key: &str) -> Result<Option<String>, AccessError> {
        self.storage()?.get_item(key).map_err(js_error)
    }

    fn set_item(&self, key: &str, value: &str) -> Result<(), AccessError> {
        self.storage()?.set_item(key, value).map_err(js_error)
    }

    fn remove_item(&self, key: &str) -> Result<(), AccessError> {
        self.storage()?.remove_item(key).map_err(js_error)
    }
}

/// `document.cookie` and `navigator.cookieEnabled`.
#[derive(Debug, Clone, Copy, Default)]
pub struct DocumentCookieJar;

impl CookieJar for DocumentCookieJar {
    fn enabled(&self) -> bool {
        web_sys::window().is_some_and(|w| w.navigator().cookie_enabled())
    }

    fn cookie_string(&self) -> Result<String, AccessError> {
        html_document()?.cookie().map_err(js_error)
    }

    fn set_cookie(&self, raw: &str) -> Result<(), AccessError> {
        html_document()?.set_cookie(raw).map_err(js_error)
    }
}

/// `location.hash`.
#[derive(Debug, Clone, Copy, Default)]
pub struct LocationFragment;

impl FragmentSlot for LocationFragment {
    fn hash(&self) -> Result<String, AccessError> {
        let hash = window()?.location().hash().map_err(js_error)?;
        Ok(hash.trim_start_matches('#').to_string())
    }

    fn set_hash(&self, value: &str) -> Result<(), AccessError> {
        window()?.location().set_hash(value).map_err(js_error)
    }
}

/// `setTimeout` wrapped in a promise.
#[derive(Debug, Clone, Copy, Default)]
pub struct WebTimer;

#[async_trait(?Send)]
impl Timer for WebTimer {
    async fn sleep(&self, duration: Duration) {
        let ms = i32::try_from(duration.as_millis()).unwrap_or(i32::MAX);
        let promise = js_sys::Promise::new(&mut |resolve, _reject| {
            let scheduled = web_sys::window().and_then(|w| {
                w.set_timeout_with_callback_and_timeout_and_arguments_0(&resolve, ms)
                    .ok()
            });
            if scheduled.is_none() {
                let _ = resolve.call0(&JsValue::NULL);
            }
        });
        let _ = wasm_bindgen_futures::JsFuture::from(promise).await;
    }
}

fn element(id: &str) -> Option<Element> {
    web_sys::window()?.document()?.get_element_by_id(id)
}

fn input(id: DialogId) -> Option<HtmlInputElement> {
    element(&format!("{id}-input"))?.dyn_into::<HtmlInputElement>().ok()
}

/// The dialog service over the real DOM, with listeners wired to it.
pub fn browser_dialogs(config: DialogConfig) -> Rc<DialogService<WebDialogHost, WebTimer>> {
    let service = Rc::new(DialogService::new(WebDialogHost::default(), WebTimer, config));
    service.host().connect(service.dispatcher());
    service
}

/// 1 つの overlay に登録した click / keydown listener
struct Listeners {
    id: DialogId,
    document: Document,
    overlay: Element,
    on_click: Closure<dyn FnMut(MouseEvent)>,
    on_key: Closure<dyn FnMut(KeyboardEvent)>,
}

impl Listeners {
    fn attach(
        id: DialogId,
        document: Document,
        overlay: Element,
        dispatch: Dispatcher,
    ) -> Result<Self, JsValue> {
        let clicked_overlay = overlay.clone();
        let click_dispatch = dispatch.clone();
        let on_click = Closure::<dyn FnMut(MouseEvent)>::new(move |event: MouseEvent| {
            let target = event.target().and_then(|t| t.dyn_into::<Element>().ok());
            if let Some(dialog_event) = target.and_then(|t| event_for_click(&t, &clicked_overlay)) {
                click_dispatch(dialog_event);
            }
        });
        let on_key = Closure::<dyn FnMut(KeyboardEvent)>::new(move |event: KeyboardEvent| {
            dispatch(event_for_key(&event.key()));
        });

        overlay.add_event_listener_with_callback("click", on_click.as_ref().unchecked_ref())?;
        if let Err(err) =
            document.add_event_listener_with_callback("keydown", on_key.as_ref().unchecked_ref())
        {
            let _ = overlay
                .remove_event_listener_with_callback("click", on_click.as_ref().unchecked_ref());
            return Err(err);
        }

        Ok(Self {
            id,
            document,
            overlay,
            on_click,
            on_key,
        })
    }

    fn detach(&self) {
        let _ = self
            .overlay
            .remove_event_listener_with_callback("click", self.on_click.as_ref().unchecked_ref());
        let _ = self
            .document
            .remove_event_listener_with_callback("keydown", self.on_key.as_ref().unchecked_ref());
    }
}

/// Draws overlays into `document.body` and listens for dismissal.
///
/// Each mounted overlay gets a click listener on itself and a `keydown`
/// listener on the document, both feeding the connected [`Dispatcher`].
/// They are removed on unmount. Detached closures are dropped at the next
/// mount, never from inside their own callback.
#[derive(Clone, Default)]
pub struct WebDialogHost {
    dispatch: Rc<RefCell<Option<Dispatcher>>>,
    listeners: Rc<RefCell<Option<Listeners>>>,
    retired: Rc<RefCell<Vec<Listeners>>>,
}

impl fmt::Debug for WebDialogHost {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WebDialogHost")
            .field("connected", &self.dispatch.borrow().is_some())
            .field("listening", &self.listeners.borrow().as_ref().map(|l| l.id))
            .finish()
    }
}

impl WebDialogHost {
    /// Route overlay events to `dispatch` from now on.
    pub fn connect(&self, dispatch: Dispatcher) {
        *self.dispatch.borrow_mut() = Some(dispatch);
    }
}

impl DialogHost for WebDialogHost {
    fn mount(&self, id: DialogId, view: &DialogView) {
        self.retired.borrow_mut().clear();

        let Some(document) = web_sys::window().and_then(|w| w.document()) else {
            return;
        };
        let Some(body) = document.body() else {
            return;
        };
        if let Err(err) = body.insert_adjacent_html("beforeend", &view.to_markup()) {
            warn!(%id, error = ?err, "failed to insert dialog overlay");
            return;
        }

        let Some(dispatch) = self.dispatch.borrow().clone() else {
            warn!(%id, "dialog host is not connected; overlay cannot be dismissed");
            return;
        };
        let Some(overlay) = document.get_element_by_id(&view.element_id()) else {
            return;
        };
        match Listeners::attach(id, document, overlay, dispatch) {
            Ok(listeners) => *self.listeners.borrow_mut() = Some(listeners),
            Err(err) => warn!(%id, error = ?err, "failed to attach dialog listeners"),
        }
    }

    fn set_visible(&self, id: DialogId, visible: bool) {
        if let Some(overlay) = element(&id.to_string()) {
            let _ = overlay.class_list().toggle_with_force("show", visible);
        }
    }

    fn focus_input(&self, id: DialogId) {
        if let Some(input) = input(id) {
            let _ = input.focus();
        }
    }

    fn input_value(&self, id: DialogId) -> Option<String> {
        input(id).map(|i| i.value())
    }

    fn unmount(&self, id: DialogId) {
        let listeners = self.listeners.borrow_mut().take_if(|l| l.id == id);
        if let Some(listeners) = listeners {
            listeners.detach();
            self.retired.borrow_mut().push(listeners);
        }
        if let Some(overlay) = element(&id.to_string()) {
            overlay.remove();
        }
    }
}

/// Map a click inside an overlay to a dialog event.
pub fn event_for_click(target: &Element, overlay: &Element) -> Option<DialogEvent> {
    if target == overlay {
        return Some(DialogEvent::OverlayClicked);
    }
    if !target.class_list().contains("modal-button") {
        return None;
    }
    let action = target.get_attribute("data-action")?;
    Some(DialogEvent::ActionClicked(DialogAction::from_attr(&action)))
}

pub fn event_for_key(key: &str) -> DialogEvent {
    DialogEvent::KeyPressed(Key::from_dom(key))
}
