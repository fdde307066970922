//! Command table and settings lifecycle.
//!
//! [`ProblemNavigation`] is what a host embeds. It exposes five zero-argument commands per
//! navigation set, owns the settings snapshot, the configuration cache and the peek controller,
//! and forwards host events to the peek.

use crate::config::ConfigCache;
use crate::host::{EditorHost, SelectionChangeKind};
use crate::navigator::Navigator;
use crate::peek::Peek;
use crate::search::Direction;
use crate::settings::{Environment, NUMBER_OF_SETS, SETTINGS_SECTION, Settings};
use serde_json::Value;
use std::fmt;
use tracing::{debug, info, warn};

/// What a command does.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CommandKind {
    /// Next problem in the active document.
    Next,
    /// Next problem in the workspace.
    NextInWorkspace,
    /// Previous problem in the active document.
    Prev,
    /// Previous problem in the workspace.
    PrevInWorkspace,
    /// Open every file with problems.
    OpenAll,
}

impl CommandKind {
    /// Every kind, in registration order.
    pub const ALL: [Self; 5] = [
        Self::Next,
        Self::NextInWorkspace,
        Self::Prev,
        Self::PrevInWorkspace,
        Self::OpenAll,
    ];

    /// Last segment of the command id.
    pub fn name(self) -> &'static str {
        match self {
            Self::Next => "next",
            Self::NextInWorkspace => "nextInWorkspace",
            Self::Prev => "prev",
            Self::PrevInWorkspace => "prevInWorkspace",
            Self::OpenAll => "openAll",
        }
    }

    fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|kind| kind.name() == name)
    }

    /// Direction of travel. Open-all walks forward.
    pub fn direction(self) -> Direction {
        match self {
            Self::Prev | Self::PrevInWorkspace => Direction::Backward,
            _ => Direction::Forward,
        }
    }
}

/// A command: a navigation set and what to do with it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CommandId {
    /// Navigation set (1-based).
    pub set: usize,
    /// What the command does.
    pub kind: CommandKind,
}

impl CommandId {
    /// Create a command id.
    pub fn new(set: usize, kind: CommandKind) -> Self {
        Self { set, kind }
    }

    /// Full command name, e.g. `goToProblem.1.nextInWorkspace`.
    pub fn name(&self) -> String {
        self.to_string()
    }

    /// Parse a full command name. Unknown sets and kinds yield `None`.
    pub fn parse(name: &str) -> Option<Self> {
        let rest = name.strip_prefix(SETTINGS_SECTION)?.strip_prefix('.')?;
        let (set, kind) = rest.split_once('.')?;
        let set: usize = set.parse().ok()?;
        if !(1..=NUMBER_OF_SETS).contains(&set) {
            return None;
        }
        Some(Self::new(set, CommandKind::from_name(kind)?))
    }
}

impl fmt::Display for CommandId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{SETTINGS_SECTION}.{}.{}", self.set, self.kind.name())
    }
}

/// The problem navigation engine.
#[derive(Debug)]
pub struct ProblemNavigation {
    settings: Settings,
    configs: ConfigCache,
    peek: Peek,
    navigators: Vec<Navigator>,
}

impl Default for ProblemNavigation {
    fn default() -> Self {
        Self::new(Settings::default())
    }
}

impl ProblemNavigation {
    /// Create the engine from a validated settings snapshot.
    pub fn new(settings: Settings) -> Self {
        let navigators = (1..=NUMBER_OF_SETS)
            .flat_map(|set| {
                [Direction::Forward, Direction::Backward]
                    .map(|direction| Navigator::new(set, direction))
            })
            .collect();

        Self {
            peek: Peek::new(&settings),
            settings,
            configs: ConfigCache::new(),
            navigators,
        }
    }

    /// Create the engine from a raw settings section.
    pub fn from_value(section: &Value, environment: Environment) -> Self {
        Self::new(Settings::from_value(section, environment))
    }

    /// Current settings snapshot.
    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    /// Configuration cache.
    pub fn config_cache(&self) -> &ConfigCache {
        &self.configs
    }

    /// Peek controller.
    pub fn peek(&self) -> &Peek {
        &self.peek
    }

    /// Every command, five per navigation set.
    pub fn commands(&self) -> Vec<CommandId> {
        (1..=NUMBER_OF_SETS)
            .flat_map(|set| CommandKind::ALL.map(|kind| CommandId::new(set, kind)))
            .collect()
    }

    /// Run `command`. Failures are logged, never returned.
    pub fn execute<H: EditorHost + ?Sized>(&mut self, command: CommandId, host: &mut H) {
        let direction = command.kind.direction();
        let Some(navigator) = self
            .navigators
            .iter()
            .find(|n| n.set() == command.set && n.direction() == direction)
            .copied()
        else {
            warn!(%command, "unknown navigation set");
            return;
        };
        let Some(settings) = self.settings.navigation_set(command.set) else {
            return;
        };
        let config = self
            .configs
            .get(settings, &self.settings.environment.workspace_folders);

        debug!(%command, "executing");
        let result = match command.kind {
            CommandKind::Next | CommandKind::Prev => {
                navigator.navigate(&config, &mut self.peek, host)
            }
            CommandKind::NextInWorkspace | CommandKind::PrevInWorkspace => {
                navigator.navigate_in_workspace(&config, &mut self.peek, host)
            }
            CommandKind::OpenAll => navigator.open_all(&config, &self.settings.general, host),
        };

        if let Err(err) = result {
            warn!(%command, %err, "command failed");
        }
    }

    /// Run the command called `name`. Returns `false` if no such command exists.
    pub fn execute_named<H: EditorHost + ?Sized>(&mut self, name: &str, host: &mut H) -> bool {
        match CommandId::parse(name) {
            Some(command) => {
                self.execute(command, host);
                true
            }
            None => false,
        }
    }

    /// Adopt a new settings section.
    ///
    /// Shuts the peek down and drops every cached configuration and filter.
    pub fn on_configuration_changed<H: EditorHost + ?Sized>(
        &mut self,
        section: &Value,
        environment: Environment,
        host: &mut H,
    ) {
        self.peek.shutdown(host);
        self.settings = Settings::from_value(section, environment);
        self.configs.clear();
        self.peek.configure(&self.settings);
        info!("settings reloaded");
    }

    /// The active document was edited.
    pub fn on_document_edited<H: EditorHost + ?Sized>(&mut self, host: &mut H) {
        self.peek.on_document_edited(host);
    }

    /// The selection of the active editor changed.
    pub fn on_selection_changed<H: EditorHost + ?Sized>(
        &mut self,
        host: &mut H,
        kind: SelectionChangeKind,
    ) {
        self.peek.on_selection_changed(host, kind);
    }

    /// The active editor changed.
    pub fn on_active_editor_changed<H: EditorHost + ?Sized>(&mut self, host: &mut H) {
        self.peek.on_active_editor_changed(host);
    }

    /// Timer tick; see [`crate::peek::HOVER_TICK_INTERVAL`].
    pub fn tick<H: EditorHost + ?Sized>(&mut self, host: &mut H) {
        self.peek.tick(host);
    }

    /// Returns `true` while the host should keep ticking.
    pub fn needs_tick(&self) -> bool {
        self.peek.is_hover_pending()
    }

    /// Release all peek state.
    pub fn shutdown<H: EditorHost + ?Sized>(&mut self, host: &mut H) {
        self.peek.shutdown(host);
    }
}
