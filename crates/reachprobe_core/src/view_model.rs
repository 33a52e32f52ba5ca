pub const BUTTON_IDLE_LABEL: &str = "Test All Connections";
pub const BUTTON_RUNNING_LABEL: &str = "Testing...";

/// What the host renders: one transcript and one trigger control.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScreenViewModel {
    pub transcript: String,
    pub button_label: &'static str,
    pub button_enabled: bool,
    pub running: bool,
    pub dirty: bool,
}
