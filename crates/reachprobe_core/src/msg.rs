#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Msg {
    /// Operator pressed the test control.
    TestClicked,
    /// Cumulative transcript after another probe finished.
    ProbeProgress {
        run_id: crate::RunId,
        transcript: String,
    },
    /// Final report, summary included.
    ProbeFinished {
        run_id: crate::RunId,
        report: String,
    },
    /// Operator left the diagnostic screen.
    ScreenClosed,
    /// Render tick.
    Tick,
}
