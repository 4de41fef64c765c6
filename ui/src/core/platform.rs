//! Platform glue for running futures off the render path.

use std::future::Future;

/// Spawn a detached future on the UI executor.
pub fn spawn_future<F>(fut: F)
where
    F: Future<Output = ()> + 'static,
{
    #[cfg(target_arch = "wasm32")]
    {
        wasm_bindgen_futures::spawn_local(fut);
    }

    #[cfg(not(target_arch = "wasm32"))]
    {
        dioxus::prelude::spawn(fut);
    }
}
