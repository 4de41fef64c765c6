#![cfg_attr(all(windows, not(debug_assertions)), windows_subsystem = "windows")]

#[cfg(feature = "desktop")]
use std::path::PathBuf;

#[cfg(feature = "desktop")]
use dioxus::desktop::{tao::window::WindowBuilder, Config};
use dioxus::logger::tracing::info;
use dioxus::prelude::*;

use ui::components::AppHeader;
use ui::views::Dashboard;

const MAIN_CSS_INLINE: &str = include_str!(concat!(
    env!("CARGO_MANIFEST_DIR"),
    "/../ui/assets/theme/main.css"
)); // Embedded shared theme (ui/assets/theme/main.css); no separate desktop /assets needed.

#[cfg(feature = "desktop")]
fn main() {
    let resource_dir = resolve_resource_dir();

    LaunchBuilder::desktop()
        .with_cfg(
            Config::new()
                .with_window(
                    WindowBuilder::new()
                        .with_title(format!("ML Models Comparator – v{}", env!("CARGO_PKG_VERSION")))
                        .with_maximized(true),
                )
                .with_resource_directory(resource_dir),
        )
        .launch(App);
}

#[cfg(all(feature = "server", not(feature = "desktop")))]
fn main() {
    LaunchBuilder::server().launch(App);
}

#[component]
fn App() -> Element {
    ui::i18n::init();

    // AppHeader writes the chosen locale here; keying the tree on it remounts
    // everything with the new strings.
    let lang_code = use_signal(|| "en-US".to_string());
    use_context_provider(|| lang_code);

    use_hook(|| info!(version = env!("CARGO_PKG_VERSION"), "desktop app started"));

    // Runtime maximize fallback (in case initial builder maximize is ignored by WM)
    #[cfg(feature = "desktop")]
    {
        let win = dioxus::desktop::use_window();
        use_effect(move || {
            win.set_maximized(true);
        });
    }

    rsx! {
        document::Style { "{MAIN_CSS_INLINE}" }

        div {
            key: "{lang_code()}",
            div { style: "display:none", "{lang_code()}" }
            AppHeader {}
            Dashboard {}
        }
    }
}

#[cfg(feature = "desktop")]
fn resolve_resource_dir() -> PathBuf {
    #[cfg(debug_assertions)]
    {
        // During `cargo run` / `dx serve` load directly from the crate.
        PathBuf::from(concat!(env!("CARGO_MANIFEST_DIR"), "/assets"))
    }

    #[cfg(not(debug_assertions))]
    {
        std::env::current_exe()
            .ok()
            .and_then(|exe| exe.parent().map(|dir| dir.join("assets")))
            .unwrap_or_else(|| PathBuf::from("assets"))
    }
}
