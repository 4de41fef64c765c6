//! Internationalization (i18n) support for `mlcompare-ui`.
//!
//! This module wires together:
//! - `i18n-embed` (language selection + asset loading)
//! - `fluent` (message formatting)
//! - `rust-embed` (compile-time embedding of `.ftl` files)
//! - `i18n-embed-fl` (`fl!` macro for compile‑time checked lookups)
//!
//! Folder layout (relative to this crate root):
//! ```text
//! i18n.toml
//! i18n/
//!   en-US/mlcompare-ui.ftl   (fallback/reference)
//!   es-ES/mlcompare-ui.ftl
//! ```
//!
//! Usage in a component:
//! ```ignore
//! use crate::t;
//! crate::i18n::init(); // idempotent
//! let title = t!("app-title");
//! ```
//!
//! Desktop reads the OS locale list, web reads `navigator.languages`. On WASM
//! the assets are always embedded (`debug-embed`).
use std::sync::Once;

use i18n_embed::fluent::FluentLanguageLoader;
use once_cell::sync::Lazy;
use rust_embed::Embed;
use tracing::warn;
use unic_langid::{langid, LanguageIdentifier};

pub use i18n_embed_fl::fl;

/// Translation lookup through the shared [`LOADER`].
///
/// `t!("app-title")`; Fluent arguments follow the key as `name = value` pairs.
#[macro_export]
macro_rules! t {
    ($key:literal) => {
        $crate::i18n::fl!(&*$crate::i18n::LOADER, $key)
    };
    ($key:literal, $( $arg:ident = $value:expr ),+ $(,)?) => {
        $crate::i18n::fl!(&*$crate::i18n::LOADER, $key, $( $arg = $value ),+ )
    };
}

/// Fluent domain. The fallback file must be `i18n/en-US/{DOMAIN}.ftl`.
const DOMAIN: &str = "mlcompare-ui";

#[derive(Embed)]
#[folder = "i18n"]
struct Localizations;

/// Global language loader used with the `fl!` macro.
pub static LOADER: Lazy<FluentLanguageLoader> =
    Lazy::new(|| FluentLanguageLoader::new(DOMAIN, langid!("en-US")));

static INIT: Once = Once::new();

/// Load the bundles for the user's preferred languages (idempotent).
pub fn init() {
    INIT.call_once(|| {
        let requested = requested_languages();
        if let Err(err) = i18n_embed::select(&*LOADER, &Localizations, &requested) {
            warn!(%err, "selecting languages failed; continuing with fallback");
        }
    });
}

/// Switch language at runtime. Unparseable tags are ignored.
pub fn set_language(tag: &str) -> Result<(), i18n_embed::I18nEmbedError> {
    let Ok(lang) = tag.parse::<LanguageIdentifier>() else {
        return Ok(());
    };
    i18n_embed::select(&*LOADER, &Localizations, &[lang]).map(|_| ())
}

/// Embedded language identifiers, sorted.
pub fn available_languages() -> Vec<String> {
    let mut langs = Localizations::iter()
        .filter_map(|path| path.split('/').next().map(|s| s.to_string()))
        .collect::<Vec<_>>();
    langs.sort();
    langs.dedup();
    langs
}

#[cfg(target_arch = "wasm32")]
fn requested_languages() -> Vec<LanguageIdentifier> {
    i18n_embed::WebLanguageRequester::requested_languages()
}

#[cfg(not(target_arch = "wasm32"))]
fn requested_languages() -> Vec<LanguageIdentifier> {
    i18n_embed::DesktopLanguageRequester::requested_languages()
}
