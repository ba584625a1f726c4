//! DialogView - host に渡す描画内容

use html_escape::{encode_double_quoted_attribute, encode_text};

use crate::config::DialogLabels;
use crate::domain::{DialogAction, DialogId, DialogKind, DialogRequest};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DialogButton {
    pub label: String,
    pub action: DialogAction,
    pub primary: bool,
}

/// Everything a host needs to draw one overlay.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DialogView {
    pub id: DialogId,
    pub kind: DialogKind,
    pub title: String,
    pub message: String,
    /// Placeholder of the text field; `Some` exactly for prompts.
    pub input_placeholder: Option<String>,
    pub buttons: Vec<DialogButton>,
}

impl DialogView {
    pub fn from_request(id: DialogId, request: &DialogRequest, labels: &DialogLabels) -> Self {
        let ok = |action| DialogButton {
            label: labels.ok.clone(),
            action,
            primary: true,
        };
        let cancel = DialogButton {
            label: labels.cancel.clone(),
            action: DialogAction::Cancel,
            primary: false,
        };

        let buttons = match request.kind {
            DialogKind::Alert => vec![ok(DialogAction::Ok)],
            DialogKind::Confirm | DialogKind::Prompt => vec![cancel, ok(DialogAction::Confirm)],
        };
        let input_placeholder = match request.kind {
            DialogKind::Prompt => Some(request.placeholder.clone().unwrap_or_default()),
            _ => None,
        };

        Self {
            id,
            kind: request.kind,
            title: request.title.clone(),
            message: request.message.clone(),
            input_placeholder,
            buttons,
        }
    }

    /// Element id of the overlay root. Unique per dialog.
    pub fn element_id(&self) -> String {
        self.id.to_string()
    }

    pub fn input_element_id(&self) -> String {
        format!("{}-input", self.id)
    }

    /// Overlay markup, inserted hidden. Text is HTML-escaped.
    pub fn to_markup(&self) -> String {
        let mut html = format!(
            r#"<div class="modal-overlay" id="{}"><div class="modal"><h3>{}</h3><p>{}</p>"#,
            self.element_id(),
            encode_text(&self.title),
            encode_text(&self.message),
        );
        if let Some(placeholder) = &self.input_placeholder {
            html.push_str(&format!(
                r#"<input type="text" class="modal-input" id="{}" placeholder="{}" value="">"#,
                self.input_element_id(),
                encode_double_quoted_attribute(placeholder),
            ));
        }
        html.push_str(r#"<div class="modal-buttons">"#);
        for button in &self.buttons {
            let class = if button.primary {
                "modal-button primary"
            } else {
                "modal-button"
            };
            html.push_str(&format!(
                r#"<button class="{class}" data-action="{}">{}</button>"#,
                encode_double_quoted_attribute(button.action.as_str()),
                encode_text(&button.label),
            ));
        }
        html.push_str("</div></div></div>");
        html
    }
}
