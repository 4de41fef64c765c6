use crate::i18n;
use crate::t;
use dioxus::prelude::*;

/// Application header: brand, tagline and the locale switcher.
///
/// Platforms provide a `Signal<String>` language code through context; the
/// header writes the chosen locale into it so the launcher can remount the
/// tree with fresh strings. Without a provider the switch still applies to
/// the loader but only the header re-renders.
#[component]
pub fn AppHeader() -> Element {
    i18n::init();

    let mut current_lang = use_signal(|| "en-US".to_string());
    let langs = use_signal(i18n::available_languages);
    let show_switcher = langs().len() > 1;
    let lang_code_ctx: Option<Signal<String>> = try_use_context::<Signal<String>>();
    // Reactive dependency on the shared language code, when provided.
    let _lang_marker = lang_code_ctx.as_ref().map(|c| c()).unwrap_or_default();

    let on_change = move |evt: dioxus::events::FormEvent| {
        let val = evt.value();
        match i18n::set_language(&val) {
            Ok(()) => {
                current_lang.set(val.clone());
                if let Some(mut code) = lang_code_ctx {
                    code.set(val);
                }
            }
            Err(err) => tracing::warn!(%err, locale = %val, "language switch failed"),
        }
    };

    rsx! {
        header { id: "app-header", class: "app-header",
            div { style: "display:none", "{_lang_marker}" }
            div { class: "app-header__inner",
                div { class: "app-header__brand",
                    span { class: "app-header__logo", aria_hidden: "true", "◆" }
                    div {
                        h1 { class: "app-header__title", {t!("app-title")} }
                        p { class: "app-header__tagline", {t!("app-tagline")} }
                    }
                }

                if show_switcher {
                    div { class: "app-header__locale",
                        label {
                            class: "visually-hidden",
                            r#for: "locale-select",
                            {t!("header-language-label")}
                        }
                        select {
                            id: "locale-select",
                            value: "{current_lang()}",
                            oninput: on_change,
                            { langs().iter().map(|code| {
                                let c = code.clone();
                                rsx! {
                                    option { key: "{c}", value: "{c}", "{c}" }
                                }
                            })}
                        }
                    }
                }
            }
        }
    }
}
