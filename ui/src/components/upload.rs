use std::sync::Arc;

use dioxus::html::{FileEngine, HasFileData};
use dioxus::prelude::*;

use crate::{
    t,
    workflow::{UploadState, UploadStatus},
};

/// Last path segment, so desktop paths and browser names look the same.
pub fn file_name(path: &str) -> String {
    path.rsplit(['/', '\\']).next().unwrap_or(path).to_string()
}

fn status_icon(status: UploadStatus) -> Element {
    match status {
        UploadStatus::Completed => rsx! { span { class: "dropzone__icon dropzone__icon--done", "✔" } },
        UploadStatus::Error => rsx! { span { class: "dropzone__icon dropzone__icon--error", "!" } },
        UploadStatus::Uploading | UploadStatus::Processing => {
            rsx! { span { class: "spinner", role: "progressbar" } }
        }
        UploadStatus::Idle => rsx! { span { class: "dropzone__icon", "⇪" } },
    }
}

fn status_message(upload: &UploadState) -> String {
    match upload.status {
        UploadStatus::Uploading => format!("{} {}%", t!("upload-uploading"), upload.progress_percent),
        UploadStatus::Processing => t!("upload-processing"),
        UploadStatus::Completed => t!("upload-completed"),
        UploadStatus::Error => upload
            .error_message
            .clone()
            .unwrap_or_else(|| t!("upload-failed")),
        UploadStatus::Idle => t!("upload-prompt"),
    }
}

fn zone_class(status: UploadStatus, drag_active: bool, disabled: bool) -> String {
    let mut class = String::from("dropzone");
    if drag_active {
        class.push_str(" dropzone--active");
    }
    if disabled {
        class.push_str(" dropzone--disabled");
    }
    match status {
        UploadStatus::Error => class.push_str(" dropzone--error"),
        UploadStatus::Completed => class.push_str(" dropzone--done"),
        UploadStatus::Uploading | UploadStatus::Processing => class.push_str(" dropzone--busy"),
        UploadStatus::Idle => {}
    }
    class
}

/// Drag-and-drop target with a file picker fallback. Only the first file of a
/// drop is used.
#[component]
pub fn UploadDropzone(
    upload: UploadState,
    disabled: bool,
    on_files: EventHandler<Arc<dyn FileEngine>>,
) -> Element {
    let mut drag_active = use_signal(|| false);
    let busy = upload.status.is_busy();
    let blocked = disabled || busy;

    rsx! {
        div { class: "upload",
            label {
                class: zone_class(upload.status, drag_active(), disabled),
                r#for: "dataset-input",
                ondragover: move |evt| {
                    evt.prevent_default();
                    if !blocked {
                        drag_active.set(true);
                    }
                },
                ondragleave: move |_| drag_active.set(false),
                ondrop: move |evt| {
                    evt.prevent_default();
                    drag_active.set(false);
                    if blocked {
                        return;
                    }
                    if let Some(files) = evt.files() {
                        on_files.call(files);
                    }
                },

                input {
                    id: "dataset-input",
                    class: "visually-hidden",
                    r#type: "file",
                    accept: ".csv,text/csv",
                    multiple: false,
                    disabled: blocked,
                    onchange: move |evt| {
                        if let Some(files) = evt.files() {
                            on_files.call(files);
                        }
                    },
                }

                div { class: "dropzone__body",
                    {status_icon(upload.status)}
                    p { class: "dropzone__message", {status_message(&upload)} }
                    if upload.status == UploadStatus::Idle {
                        p { class: "dropzone__hint", {t!("upload-hint")} }
                    }
                    if upload.status == UploadStatus::Error {
                        p { class: "dropzone__hint dropzone__hint--error", {t!("upload-retry-hint")} }
                    }
                    if busy {
                        div { class: "progress",
                            div {
                                class: "progress__bar",
                                style: "width: {upload.progress_percent}%",
                            }
                        }
                    }
                }
            }
            p { class: "upload__privacy", {t!("upload-privacy")} }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn file_name_strips_directories() {
        assert_eq!(file_name("/home/ana/data/iris.csv"), "iris.csv");
        assert_eq!(file_name("C:\\Users\\ana\\sales.csv"), "sales.csv");
        assert_eq!(file_name("plain.csv"), "plain.csv");
    }

    #[test]
    fn dropped_items_expose_their_files() {
        fn carries_files<T: HasFileData>() {}
        carries_files::<dioxus::html::DragData>();
    }

    #[test]
    fn zone_class_reflects_state() {
        assert_eq!(zone_class(UploadStatus::Idle, false, false), "dropzone");
        assert_eq!(
            zone_class(UploadStatus::Uploading, true, false),
            "dropzone dropzone--active dropzone--busy"
        );
        assert_eq!(
            zone_class(UploadStatus::Error, false, true),
            "dropzone dropzone--disabled dropzone--error"
        );
    }
}
