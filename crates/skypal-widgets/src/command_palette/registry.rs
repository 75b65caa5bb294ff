#![forbid(unsafe_code)]

//! Commands and the fixed, ordered command registry.

use std::borrow::Cow;

use skypal_core::lang::Localized;

/// Position of a command in its registry.
pub type CommandId = usize;

/// A setting surface owned by the extension runtime.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HostSetting {
    /// The keyboard shortcut that opens the palette.
    KeyboardShortcut,
}

impl HostSetting {
    /// Identifier used on the wire.
    #[must_use]
    pub const fn id(self) -> &'static str {
        match self {
            Self::KeyboardShortcut => "edit-shortcut",
        }
    }
}

/// Effect of confirming a command.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum CommandAction {
    /// Client-side route change to a path inside the host app.
    Navigate(Cow<'static, str>),
    /// Ask the extension runtime to open one of its settings surfaces.
    OpenHostSetting(HostSetting),
}

impl CommandAction {
    /// Navigation action to a static path.
    #[must_use]
    pub const fn navigate(path: &'static str) -> Self {
        Self::Navigate(Cow::Borrowed(path))
    }
}

/// A single command that can be invoked from the palette.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Command {
    name: Localized,
    description: Option<Cow<'static, str>>,
    action: CommandAction,
}

impl Command {
    /// Create a command without description.
    #[must_use]
    pub const fn new(name: Localized, action: CommandAction) -> Self {
        Self {
            name,
            description: None,
            action,
        }
    }

    /// Create a command with a static description.
    #[must_use]
    pub const fn described(
        name: Localized,
        description: &'static str,
        action: CommandAction,
    ) -> Self {
        Self {
            name,
            description: Some(Cow::Borrowed(description)),
            action,
        }
    }

    /// Set a static description (builder).
    #[must_use]
    pub fn with_description(mut self, description: &'static str) -> Self {
        self.description = Some(Cow::Borrowed(description));
        self
    }

    /// Set an owned description (builder).
    #[must_use]
    pub fn with_owned_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(Cow::Owned(description.into()));
        self
    }

    /// Localized display name.
    #[must_use]
    pub const fn name(&self) -> &Localized {
        &self.name
    }

    /// Optional description shown under the name.
    #[must_use]
    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    /// Effect of confirming this command.
    #[must_use]
    pub const fn action(&self) -> &CommandAction {
        &self.action
    }
}

static BUILTIN: [Command; 10] = [
    Command::new(Localized::new("Home", "ホーム"), CommandAction::navigate("/")),
    Command::new(
        Localized::new("Explore", "検索"),
        CommandAction::navigate("/search"),
    ),
    Command::new(
        Localized::new("Notifications", "通知"),
        CommandAction::navigate("/notifications"),
    ),
    Command::new(
        Localized::new("Chat", "チャット"),
        CommandAction::navigate("/messages"),
    ),
    Command::new(
        Localized::new("Feeds", "フィード"),
        CommandAction::navigate("/feeds"),
    ),
    Command::new(
        Localized::new("Lists", "リスト"),
        CommandAction::navigate("/lists"),
    ),
    Command::new(
        Localized::new("Saved", "保存済み"),
        CommandAction::navigate("/saved"),
    ),
    Command::new(
        Localized::new("Settings", "設定"),
        CommandAction::navigate("/settings"),
    ),
    Command::described(
        Localized::new("App Passwords", "アプリパスワード"),
        "Settings > Privacy and Security",
        CommandAction::navigate("/settings/app-passwords"),
    ),
    Command::described(
        Localized::new("Keyboard Shortcut", "パレットを開くショートカットを編集"),
        "Customize the keyboard shortcut to open this palette",
        CommandAction::OpenHostSetting(HostSetting::KeyboardShortcut),
    ),
];

/// Fixed, ordered list of commands.
///
/// Order is significant: it is the default display order and the order the
/// filtered list preserves. There is no mutation API.
#[derive(Debug, Clone)]
pub struct Registry {
    commands: Cow<'static, [Command]>,
}

impl Registry {
    /// The built-in commands for the Bluesky web app.
    #[must_use]
    pub fn builtin() -> Self {
        Self {
            commands: Cow::Borrowed(&BUILTIN),
        }
    }

    /// A registry over a custom command list.
    #[must_use]
    pub fn from_commands(commands: Vec<Command>) -> Self {
        Self {
            commands: Cow::Owned(commands),
        }
    }

    /// All commands in registry order.
    #[must_use]
    pub fn all(&self) -> &[Command] {
        &self.commands
    }

    /// Command by id.
    #[must_use]
    pub fn get(&self, id: CommandId) -> Option<&Command> {
        self.commands.get(id)
    }

    /// Number of commands.
    #[must_use]
    pub fn len(&self) -> usize {
        self.commands.len()
    }

    /// Whether the registry has no commands.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }
}

impl Default for Registry {
    fn default() -> Self {
        Self::builtin()
    }
}
