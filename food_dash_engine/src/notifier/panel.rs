use serde::Serialize;

/// The notification dropdown.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PanelState {
    #[default]
    Closed,
    Open,
}

impl PanelState {
    /// The bell was clicked.
    pub fn toggle(self) -> Self {
        match self {
            PanelState::Closed => PanelState::Open,
            PanelState::Open => PanelState::Closed,
        }
    }

    pub fn close(self) -> Self {
        PanelState::Closed
    }

    /// An order was successfully opened from the panel.
    pub fn order_selected(self) -> Self {
        PanelState::Closed
    }

    pub fn is_open(&self) -> bool {
        matches!(self, PanelState::Open)
    }
}
