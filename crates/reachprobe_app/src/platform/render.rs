use std::io::{self, Write};

use engine_logging::engine_debug;
use reachprobe_core::ScreenViewModel;

/// Prints the transcript as a growing log: when the new text extends what is
/// already on screen only the new tail is written, otherwise the whole text.
pub(crate) struct TranscriptPrinter<W: Write> {
    out: W,
    shown: String,
    control: Option<(&'static str, bool)>,
}

impl<W: Write> TranscriptPrinter<W> {
    pub(crate) fn new(out: W) -> Self {
        Self {
            out,
            shown: String::new(),
            control: None,
        }
    }

    pub(crate) fn render(&mut self, view: &ScreenViewModel) -> io::Result<()> {
        match view.transcript.strip_prefix(self.shown.as_str()) {
            Some(tail) => self.out.write_all(tail.as_bytes())?,
            None => {
                if !self.shown.is_empty() && !self.shown.ends_with('\n') {
                    self.out.write_all(b"\n")?;
                }
                self.out.write_all(view.transcript.as_bytes())?;
            }
        }
        self.out.flush()?;
        self.shown.clone_from(&view.transcript);

        let control = (view.button_label, view.button_enabled);
        if self.control != Some(control) {
            engine_debug!("control label={:?} enabled={}", control.0, control.1);
            self.control = Some(control);
        }
        Ok(())
    }

    #[cfg(test)]
    pub(crate) fn into_inner(self) -> W {
        self.out
    }
}
