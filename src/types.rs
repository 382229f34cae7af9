//! Domain types for simple-term-menu.
//!
//! Codenames, style sets and the typed menu configuration. Pure data:
//! nothing in here touches the terminal.

use std::fmt;

use crate::error::MenuError;

// ============================================================================
// DEFAULTS
// ============================================================================

/// Cursor glyph drawn in front of the selected entry.
pub const DEFAULT_MENU_CURSOR: &str = "> ";

/// Style applied to the cursor glyph.
pub const DEFAULT_MENU_CURSOR_STYLE: &[Codename] = &[Codename::FgRed, Codename::Bold];

/// Style applied to the selected entry text.
pub const DEFAULT_MENU_HIGHLIGHT_STYLE: &[Codename] = &[Codename::Standout];

/// Wrap around at the ends of the menu.
pub const DEFAULT_CYCLE_CURSOR: bool = true;

/// Largest entry count whose 1-based index still fits an 8-bit exit code.
///
/// Exit code 0 is reserved for "no selection"; entry 254 reports 255.
pub const MAX_MENU_ENTRIES: usize = 255;

// ============================================================================
// CODENAMES
// ============================================================================

/// Symbolic name for a terminal capability.
///
/// Independent of any concrete terminal: the capability resolver maps each
/// codename to the raw escape sequence of the running terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Codename {
    BgBlack,
    BgBlue,
    BgCyan,
    BgGray,
    BgGreen,
    BgPurple,
    BgRed,
    BgYellow,
    Bold,
    CursorDown,
    CursorInvisible,
    CursorUp,
    CursorVisible,
    DeleteLine,
    /// Key sequence emitted by the down arrow in application mode.
    Down,
    EnterApplicationMode,
    ExitApplicationMode,
    FgBlack,
    FgBlue,
    FgCyan,
    FgGray,
    FgGreen,
    FgPurple,
    FgRed,
    FgYellow,
    Italics,
    ResetAttributes,
    Standout,
    Underline,
    /// Key sequence emitted by the up arrow in application mode.
    Up,
    /// Control character: line feed.
    Enter,
    /// Control character: escape.
    Escape,
}

impl Codename {
    /// Every codename, capability-backed ones first, control characters last.
    pub const ALL: [Codename; 32] = [
        Codename::BgBlack,
        Codename::BgBlue,
        Codename::BgCyan,
        Codename::BgGray,
        Codename::BgGreen,
        Codename::BgPurple,
        Codename::BgRed,
        Codename::BgYellow,
        Codename::Bold,
        Codename::CursorDown,
        Codename::CursorInvisible,
        Codename::CursorUp,
        Codename::CursorVisible,
        Codename::DeleteLine,
        Codename::Down,
        Codename::EnterApplicationMode,
        Codename::ExitApplicationMode,
        Codename::FgBlack,
        Codename::FgBlue,
        Codename::FgCyan,
        Codename::FgGray,
        Codename::FgGreen,
        Codename::FgPurple,
        Codename::FgRed,
        Codename::FgYellow,
        Codename::Italics,
        Codename::ResetAttributes,
        Codename::Standout,
        Codename::Underline,
        Codename::Up,
        Codename::Enter,
        Codename::Escape,
    ];

    /// The stable symbolic name, as accepted on the command line.
    pub fn as_str(self) -> &'static str {
        match self {
            Codename::BgBlack => "bg_black",
            Codename::BgBlue => "bg_blue",
            Codename::BgCyan => "bg_cyan",
            Codename::BgGray => "bg_gray",
            Codename::BgGreen => "bg_green",
            Codename::BgPurple => "bg_purple",
            Codename::BgRed => "bg_red",
            Codename::BgYellow => "bg_yellow",
            Codename::Bold => "bold",
            Codename::CursorDown => "cursor_down",
            Codename::CursorInvisible => "cursor_invisible",
            Codename::CursorUp => "cursor_up",
            Codename::CursorVisible => "cursor_visible",
            Codename::DeleteLine => "delete_line",
            Codename::Down => "down",
            Codename::EnterApplicationMode => "enter_application_mode",
            Codename::ExitApplicationMode => "exit_application_mode",
            Codename::FgBlack => "fg_black",
            Codename::FgBlue => "fg_blue",
            Codename::FgCyan => "fg_cyan",
            Codename::FgGray => "fg_gray",
            Codename::FgGreen => "fg_green",
            Codename::FgPurple => "fg_purple",
            Codename::FgRed => "fg_red",
            Codename::FgYellow => "fg_yellow",
            Codename::Italics => "italics",
            Codename::ResetAttributes => "reset_attributes",
            Codename::Standout => "standout",
            Codename::Underline => "underline",
            Codename::Up => "up",
            Codename::Enter => "enter",
            Codename::Escape => "escape",
        }
    }

    /// Look a codename up by its symbolic name.
    pub fn from_name(name: &str) -> Option<Codename> {
        Codename::ALL.into_iter().find(|c| c.as_str() == name)
    }

    /// terminfo capability name plus parameters, as passed to `tput`.
    ///
    /// None for control characters, which have fixed sequences.
    pub fn capname(self) -> Option<&'static str> {
        let capname = match self {
            Codename::BgBlack => "setab 0",
            Codename::BgRed => "setab 1",
            Codename::BgGreen => "setab 2",
            Codename::BgYellow => "setab 3",
            Codename::BgBlue => "setab 4",
            Codename::BgPurple => "setab 5",
            Codename::BgCyan => "setab 6",
            Codename::BgGray => "setab 7",
            Codename::FgBlack => "setaf 0",
            Codename::FgRed => "setaf 1",
            Codename::FgGreen => "setaf 2",
            Codename::FgYellow => "setaf 3",
            Codename::FgBlue => "setaf 4",
            Codename::FgPurple => "setaf 5",
            Codename::FgCyan => "setaf 6",
            Codename::FgGray => "setaf 7",
            Codename::Bold => "bold",
            Codename::CursorDown => "cud1",
            Codename::CursorInvisible => "civis",
            Codename::CursorUp => "cuu1",
            Codename::CursorVisible => "cnorm",
            Codename::DeleteLine => "dl1",
            Codename::Down => "kcud1",
            Codename::EnterApplicationMode => "smkx",
            Codename::ExitApplicationMode => "rmkx",
            Codename::Italics => "sitm",
            Codename::ResetAttributes => "sgr0",
            Codename::Standout => "smso",
            Codename::Underline => "smul",
            Codename::Up => "kcuu1",
            Codename::Enter | Codename::Escape => return None,
        };
        Some(capname)
    }

    /// Fixed byte sequence of a control character codename.
    pub fn control_sequence(self) -> Option<&'static str> {
        match self {
            Codename::Enter => Some("\n"),
            Codename::Escape => Some("\x1b"),
            _ => None,
        }
    }

    /// Foreground or background color; degrades to nothing on terminals
    /// with fewer than 8 colors.
    pub fn is_color(self) -> bool {
        let name = self.as_str();
        name.starts_with("fg_") || name.starts_with("bg_")
    }

    /// Codenames that arrive as input rather than being written as output.
    pub fn is_input_key(self) -> bool {
        matches!(
            self,
            Codename::Up | Codename::Down | Codename::Enter | Codename::Escape
        )
    }
}

impl fmt::Display for Codename {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ============================================================================
// STYLES
// ============================================================================

/// Ordered set of codenames applied together (cursor or highlight style).
///
/// Only capability-backed codenames qualify; construction from raw names
/// fails before anything touches the terminal.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct StyleSet(Vec<Codename>);

impl StyleSet {
    /// A style that writes nothing.
    pub fn none() -> Self {
        StyleSet(Vec::new())
    }

    /// Build from already-typed codenames.
    pub fn from_codenames(codenames: &[Codename]) -> Self {
        let mut set = StyleSet::none();
        for &codename in codenames {
            set.push(codename);
        }
        set
    }

    /// Parse a comma separated list such as `"fg_red,bold"`.
    ///
    /// The empty string means no style.
    ///
    /// # Errors
    /// Returns `MenuError::InvalidStyle` listing every unknown name.
    pub fn parse(raw: &str) -> Result<Self, MenuError> {
        if raw.is_empty() {
            return Ok(StyleSet::none());
        }
        Self::from_names(raw.split(','))
    }

    /// Validate style names against the codename vocabulary.
    ///
    /// # Errors
    /// Returns `MenuError::InvalidStyle` listing every unknown name.
    pub fn from_names<'a, I>(names: I) -> Result<Self, MenuError>
    where
        I: IntoIterator<Item = &'a str>,
    {
        let mut set = StyleSet::none();
        let mut invalid = Vec::new();

        for name in names {
            match Codename::from_name(name).filter(|c| c.capname().is_some()) {
                Some(codename) => set.push(codename),
                None => invalid.push(name.to_string()),
            }
        }

        if invalid.is_empty() {
            Ok(set)
        } else {
            Err(MenuError::InvalidStyle(invalid))
        }
    }

    pub fn codenames(&self) -> &[Codename] {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    fn push(&mut self, codename: Codename) {
        if !self.0.contains(&codename) {
            self.0.push(codename);
        }
    }
}

// ============================================================================
// CONFIGURATION
// ============================================================================

/// Validated menu configuration, built once from raw option strings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MenuConfig {
    /// Line printed above the entries, if any.
    pub title: Option<String>,
    /// Glyph drawn in front of the selected entry.
    pub cursor: String,
    /// Style of the cursor glyph.
    pub cursor_style: StyleSet,
    /// Style of the selected entry text.
    pub highlight_style: StyleSet,
    /// Wrap around at the ends instead of clamping.
    pub cycle: bool,
    /// Fold literal key input to lower case (`K` works like `k`).
    pub ignore_case: bool,
}

impl Default for MenuConfig {
    fn default() -> Self {
        Self {
            title: None,
            cursor: DEFAULT_MENU_CURSOR.to_string(),
            cursor_style: StyleSet::from_codenames(DEFAULT_MENU_CURSOR_STYLE),
            highlight_style: StyleSet::from_codenames(DEFAULT_MENU_HIGHLIGHT_STYLE),
            cycle: DEFAULT_CYCLE_CURSOR,
            ignore_case: true,
        }
    }
}

impl MenuConfig {
    /// Build a configuration from raw option strings.
    ///
    /// Both style lists are validated together so a single error names
    /// every unknown codename.
    ///
    /// # Errors
    /// Returns `MenuError::InvalidStyle` for unknown style names.
    pub fn from_raw(
        title: Option<String>,
        cursor: String,
        cursor_style: &str,
        highlight_style: &str,
        cycle: bool,
    ) -> Result<Self, MenuError> {
        let cursor_result = StyleSet::parse(cursor_style);
        let highlight_result = StyleSet::parse(highlight_style);

        let (cursor_style, highlight_style) = match (cursor_result, highlight_result) {
            (Ok(c), Ok(h)) => (c, h),
            (Err(MenuError::InvalidStyle(mut a)), Err(MenuError::InvalidStyle(b))) => {
                a.extend(b);
                return Err(MenuError::InvalidStyle(a));
            }
            (Err(e), _) | (_, Err(e)) => return Err(e),
        };

        Ok(Self {
            title,
            cursor,
            cursor_style,
            highlight_style,
            cycle,
            ..Default::default()
        })
    }
}

// ============================================================================
// ENTRIES
// ============================================================================

/// Validate the raw entry list before a session may start.
///
/// # Errors
/// `NoEntries` for an empty list, `TooManyEntries` when the selection could
/// not be reported through an 8-bit exit code.
pub fn validate_entries(entries: &[String]) -> Result<(), MenuError> {
    if entries.is_empty() {
        return Err(MenuError::NoEntries);
    }
    if entries.len() > MAX_MENU_ENTRIES {
        return Err(MenuError::TooManyEntries {
            count: entries.len(),
            max: MAX_MENU_ENTRIES,
        });
    }
    Ok(())
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn codename_names_round_trip_through_lookup() {
        for codename in Codename::ALL {
            assert_eq!(Codename::from_name(codename.as_str()), Some(codename));
        }
        assert_eq!(Codename::from_name("blinking"), None);
    }

    #[test]
    fn control_characters_have_no_capname() {
        assert_eq!(Codename::Enter.capname(), None);
        assert_eq!(Codename::Escape.capname(), None);
        assert_eq!(Codename::Enter.control_sequence(), Some("\n"));
        assert_eq!(Codename::Escape.control_sequence(), Some("\x1b"));
        assert_eq!(Codename::Bold.control_sequence(), None);
    }

    #[test]
    fn colors_are_detected_by_prefix() {
        assert!(Codename::FgRed.is_color());
        assert!(Codename::BgGray.is_color());
        assert!(!Codename::Bold.is_color());
        assert!(!Codename::Standout.is_color());
    }

    #[test]
    fn style_parse_accepts_known_names_in_order() {
        let style = StyleSet::parse("bold,fg_red").unwrap();
        assert_eq!(style.codenames(), &[Codename::Bold, Codename::FgRed]);
    }

    #[test]
    fn style_parse_empty_string_is_no_style() {
        assert!(StyleSet::parse("").unwrap().is_empty());
    }

    #[test]
    fn style_parse_collapses_duplicates() {
        let style = StyleSet::parse("bold,bold").unwrap();
        assert_eq!(style.codenames(), &[Codename::Bold]);
    }

    #[test]
    fn style_parse_rejects_unknown_names() {
        match StyleSet::parse("bold,blink,sparkle") {
            Err(MenuError::InvalidStyle(names)) => assert_eq!(names, vec!["blink", "sparkle"]),
            other => panic!("Expected InvalidStyle, got {:?}", other),
        }
    }

    #[test]
    fn style_parse_rejects_control_characters() {
        assert!(matches!(
            StyleSet::parse("enter"),
            Err(MenuError::InvalidStyle(_))
        ));
    }

    #[test]
    fn config_collects_invalid_names_from_both_styles() {
        let result = MenuConfig::from_raw(None, "> ".into(), "nope", "bold,also_nope", true);
        match result {
            Err(MenuError::InvalidStyle(names)) => assert_eq!(names, vec!["nope", "also_nope"]),
            other => panic!("Expected InvalidStyle, got {:?}", other),
        }
    }

    #[test]
    fn config_defaults_match_constants() {
        let config = MenuConfig::default();
        assert_eq!(config.cursor, "> ");
        assert_eq!(config.cursor_style.codenames(), &[Codename::FgRed, Codename::Bold]);
        assert_eq!(config.highlight_style.codenames(), &[Codename::Standout]);
        assert!(config.cycle);
        assert!(config.title.is_none());
    }

    #[test]
    fn validate_entries_rejects_empty_list() {
        assert!(matches!(validate_entries(&[]), Err(MenuError::NoEntries)));
    }

    #[test]
    fn validate_entries_rejects_lists_beyond_exit_code_range() {
        let entries: Vec<String> = (0..256).map(|i| i.to_string()).collect();
        assert!(matches!(
            validate_entries(&entries),
            Err(MenuError::TooManyEntries { count: 256, max: 255 })
        ));
        assert!(validate_entries(&entries[..255]).is_ok());
    }
}
