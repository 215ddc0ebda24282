use facegate_flow::{Navigator, StatusSurface, Tone};
use facegate_verify::Url;
use std::cell::{Cell, RefCell};
use std::io::Write;

/// Status surface printing to a terminal (or any writer).
///
/// Empty text clears the status and prints nothing.
pub struct TerminalStatus<W: Write> {
    out: RefCell<W>,
    text: RefCell<String>,
    tone: Cell<Tone>,
    trigger_enabled: Cell<bool>,
}

impl<W: Write> TerminalStatus<W> {
    pub fn new(out: W) -> Self {
        Self {
            out: RefCell::new(out),
            text: RefCell::new(String::new()),
            tone: Cell::new(Tone::Neutral),
            trigger_enabled: Cell::new(true),
        }
    }

    pub fn text(&self) -> String {
        self.text.borrow().clone()
    }

    pub fn tone(&self) -> Tone {
        self.tone.get()
    }

    pub fn trigger_enabled(&self) -> bool {
        self.trigger_enabled.get()
    }

    pub fn into_inner(self) -> W {
        self.out.into_inner()
    }

    fn write_line(&self, line: &str) {
        let mut out = self.out.borrow_mut();
        if let Err(e) = writeln!(out, "{line}").and_then(|_| out.flush()) {
            log::debug!("status write failed: {e}");
        }
    }
}

impl<W: Write> StatusSurface for TerminalStatus<W> {
    fn show(&self, text: &str, tone: Tone) {
        *self.text.borrow_mut() = text.to_string();
        self.tone.set(tone);
        if text.is_empty() {
            return;
        }
        let prefix = match tone {
            Tone::Neutral => "",
            Tone::Success => "[ok] ",
            Tone::Error => "[error] ",
        };
        self.write_line(&format!("{prefix}{text}"));
    }

    fn set_trigger_enabled(&self, enabled: bool) {
        let was = self.trigger_enabled.replace(enabled);
        if enabled && !was {
            self.write_line("Press Enter to capture, r to restart the camera, q to quit.");
        }
    }
}

/// Resolves redirect targets against the verification page and remembers
/// where the flow wants to go next.
#[derive(Debug)]
pub struct RedirectNavigator {
    page_url: Url,
    target: RefCell<Option<String>>,
}

impl RedirectNavigator {
    pub fn new(page_url: Url) -> Self {
        Self {
            page_url,
            target: RefCell::new(None),
        }
    }

    /// The last navigation target, absolute when it could be resolved.
    pub fn target(&self) -> Option<String> {
        self.target.borrow().clone()
    }
}

impl Navigator for RedirectNavigator {
    fn navigate(&self, target: &str) {
        let resolved = match self.page_url.join(target) {
            Ok(url) => url.to_string(),
            Err(e) => {
                log::warn!("cannot resolve redirect {target:?}: {e}");
                target.to_string()
            }
        };
        log::info!("navigating to {resolved}");
        *self.target.borrow_mut() = Some(resolved);
    }
}
