use dioxus::logger::tracing::info;
use dioxus::prelude::*;

use ui::components::AppHeader;
use ui::views::Dashboard;

// The web build shares the desktop theme instead of keeping its own copy.
const MAIN_CSS: &str = include_str!(concat!(
    env!("CARGO_MANIFEST_DIR"),
    "/../ui/assets/theme/main.css"
));

fn main() {
    dioxus::launch(App);
}

#[component]
fn App() -> Element {
    ui::i18n::init();

    let lang_code = use_signal(|| "en-US".to_string());
    use_context_provider(|| lang_code);

    use_hook(|| info!(version = env!("CARGO_PKG_VERSION"), "web app started"));

    rsx! {
        document::Title { "ML Models Comparator" }
        document::Style { "{MAIN_CSS}" }

        div {
            key: "{lang_code()}",
            div { style: "display:none", "{lang_code()}" }
            AppHeader {}
            Dashboard {}
        }
    }
}
