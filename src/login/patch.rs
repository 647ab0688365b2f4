//! Fragment patching port.
//!
//! The server names a region by bare id in `HX-Retarget`. Patchers receive an
//! id selector: a bare name gets a `#` prefix, a value that already starts
//! with `#` is used as is.

use std::{
    fmt,
    io::Write,
    sync::{Arc, Mutex},
};
use tracing::{debug, error};

/// How the fragment is inserted into the target.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SwapStyle {
    /// Replace the target's inner content.
    InnerHtml,
}

impl fmt::Display for SwapStyle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InnerHtml => write!(f, "innerHTML"),
        }
    }
}

/// External DOM patching capability.
pub trait PatchPort: Send + Sync {
    fn swap(&self, selector: &str, html: &str, style: SwapStyle);
}

impl<P: PatchPort + ?Sized> PatchPort for Arc<P> {
    fn swap(&self, selector: &str, html: &str, style: SwapStyle) {
        (**self).swap(selector, html, style);
    }
}

/// Turn a header target into an id selector.
#[must_use]
pub fn normalize_target(target: &str) -> String {
    if target.starts_with('#') {
        target.to_string()
    } else {
        format!("#{target}")
    }
}

/// Replace the inner content of `target` with `html`.
pub fn apply<P: PatchPort + ?Sized>(patcher: &P, target: &str, html: &str) {
    let selector = normalize_target(target);
    debug!(%selector, bytes = html.len(), "applying fragment patch");
    patcher.swap(&selector, html, SwapStyle::InnerHtml);
}

/// Renders fragments as `[selector] html` lines on a writer, for terminal hosts.
pub struct WriterPatcher<W> {
    out: Mutex<W>,
}

impl<W: Write + Send> WriterPatcher<W> {
    pub fn new(out: W) -> Self {
        Self {
            out: Mutex::new(out),
        }
    }

    pub fn into_inner(self) -> W {
        self.out
            .into_inner()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
    }
}

impl<W: Write + Send> PatchPort for WriterPatcher<W> {
    fn swap(&self, selector: &str, html: &str, style: SwapStyle) {
        let mut out = self
            .out
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner);
        if let Err(e) = writeln!(out, "[{selector}] ({style}) {html}") {
            error!("Error writing fragment: {:?}", e);
        }
    }
}
