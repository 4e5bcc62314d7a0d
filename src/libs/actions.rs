//! Key bindings of the day view and the sync view.
//!
//! Each view has one static table of [`Action`]s. The footer is rendered
//! from it and key presses are matched against it, so an action disabled
//! in the footer can never be triggered from the keyboard.

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ActionKey {
    Char(char),
    Enter,
    Esc,
}

impl ActionKey {
    pub fn label(&self) -> String {
        match self {
            ActionKey::Char(c) => c.to_string(),
            ActionKey::Enter => "Enter".to_string(),
            ActionKey::Esc => "Esc".to_string(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ActionKind {
    Quit,
    PrevDay,
    NextDay,
    Today,
    NextTask,
    PrevTask,
    New,
    StartStop,
    Duplicate,
    Modify,
    Delete,
    Sync,
    Summary,
    Report,
    CloseSync,
    SubmitSync,
    SelectActivity,
}

/// What enablement depends on, captured at render time.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ActionContext {
    /// `Some(reported)` for the selected task.
    pub selection: Option<bool>,
    pub can_go_forward: bool,
    pub sync_count: usize,
    pub sync_locked: bool,
    pub all_resolved: bool,
    pub selected_row_has_activities: bool,
}

impl ActionKind {
    pub fn is_enabled(&self, ctx: &ActionContext) -> bool {
        match self {
            ActionKind::Quit
            | ActionKind::PrevDay
            | ActionKind::Today
            | ActionKind::NextTask
            | ActionKind::PrevTask
            | ActionKind::New
            | ActionKind::Summary => true,
            ActionKind::NextDay => ctx.can_go_forward,
            ActionKind::StartStop | ActionKind::Duplicate | ActionKind::Modify | ActionKind::Delete => ctx.selection.is_some(),
            ActionKind::Report => ctx.selection == Some(false),
            ActionKind::Sync => ctx.sync_count > 0,
            ActionKind::CloseSync => !ctx.sync_locked,
            ActionKind::SubmitSync => !ctx.sync_locked && ctx.all_resolved,
            ActionKind::SelectActivity => !ctx.sync_locked && ctx.selected_row_has_activities,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Action {
    pub label: &'static str,
    pub key: ActionKey,
    pub kind: ActionKind,
}

impl Action {
    const fn new(label: &'static str, key: ActionKey, kind: ActionKind) -> Self {
        Action { label, key, kind }
    }

    pub fn is_enabled(&self, ctx: &ActionContext) -> bool {
        self.kind.is_enabled(ctx)
    }

    /// Label as shown in the footer, with the batch count for Sync.
    pub fn label(&self, ctx: &ActionContext) -> String {
        match self.kind {
            ActionKind::Sync => format!("{} ({})", self.label, ctx.sync_count),
            _ => self.label.to_string(),
        }
    }
}

const HOME_ACTIONS: [Action; 14] = [
    Action::new("Quit", ActionKey::Char('q'), ActionKind::Quit),
    Action::new("Prev Day", ActionKey::Char('h'), ActionKind::PrevDay),
    Action::new("Next Day", ActionKey::Char('l'), ActionKind::NextDay),
    Action::new("Today", ActionKey::Char('t'), ActionKind::Today),
    Action::new("Next Task", ActionKey::Char('j'), ActionKind::NextTask),
    Action::new("Prev Task", ActionKey::Char('k'), ActionKind::PrevTask),
    Action::new("New", ActionKey::Char('n'), ActionKind::New),
    Action::new("Start/Stop", ActionKey::Enter, ActionKind::StartStop),
    Action::new("Duplicate", ActionKey::Char('d'), ActionKind::Duplicate),
    Action::new("Modify", ActionKey::Char('m'), ActionKind::Modify),
    Action::new("Delete", ActionKey::Char('x'), ActionKind::Delete),
    Action::new("Sync", ActionKey::Char('s'), ActionKind::Sync),
    Action::new("Summary", ActionKey::Char('y'), ActionKind::Summary),
    Action::new("Report", ActionKey::Char('r'), ActionKind::Report),
];

const SYNC_ACTIONS: [Action; 5] = [
    Action::new("Close", ActionKey::Esc, ActionKind::CloseSync),
    Action::new("Next Task", ActionKey::Char('j'), ActionKind::NextTask),
    Action::new("Prev Task", ActionKey::Char('k'), ActionKind::PrevTask),
    Action::new("Sync", ActionKey::Char('s'), ActionKind::SubmitSync),
    Action::new("Select Activity", ActionKey::Char('a'), ActionKind::SelectActivity),
];

pub fn home_actions() -> &'static [Action] {
    &HOME_ACTIONS
}

pub fn sync_actions() -> &'static [Action] {
    &SYNC_ACTIONS
}

/// The enabled action bound to `key`, if any.
pub fn find(actions: &[Action], key: ActionKey, ctx: &ActionContext) -> Option<ActionKind> {
    actions
        .iter()
        .find(|action| action.key == key && action.is_enabled(ctx))
        .map(|action| action.kind)
}
