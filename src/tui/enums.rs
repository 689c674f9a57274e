//! Enumerations for TUI state management.

/// Application state for the terminal user interface.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum AppState {
    Browse,
    AddTask,
    EditTask,
    Help,
    Confirm,
}

/// Input mode for the browse screens.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum InputMode {
    None,
    Search,
}

/// Top-level views, switched like the sidebar entries of a dashboard.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Tab {
    Dashboard,
    Tasks,
}

impl Tab {
    pub const ALL: [Tab; 2] = [Tab::Dashboard, Tab::Tasks];

    pub fn title(self) -> &'static str {
        match self {
            Tab::Dashboard => "Dashboard",
            Tab::Tasks => "Tasks",
        }
    }

    pub fn index(self) -> usize {
        match self {
            Tab::Dashboard => 0,
            Tab::Tasks => 1,
        }
    }

    pub fn next(self) -> Tab {
        match self {
            Tab::Dashboard => Tab::Tasks,
            Tab::Tasks => Tab::Dashboard,
        }
    }
}

/// Step to the next (or previous) entry of a fixed option list, wrapping.
pub fn cycle<T: Copy + PartialEq>(options: &[T], current: T, forward: bool) -> T {
    let len = options.len();
    let idx = options.iter().position(|o| *o == current).unwrap_or(0);
    let next = if forward { (idx + 1) % len } else { (idx + len - 1) % len };
    options[next]
}
