//! Keyboard commands understood at the move prompt.
//!
//! Each command is a single key. Anything that is not a command is handed
//! to the rules engine as a move.

/// One line of player input, resolved.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Help,
    LegalMoves,
    History,
    OpenBrowser,
    ShowBoard,
    /// Enter the pick-a-random-move submode.
    ToggleRandom,
    /// Play a random legal move right away.
    ForceRandom,
    Resign,
    OfferDraw,
    ClearScreen,
    /// Blank line.
    Empty,
    /// Not a command: a candidate move in SAN.
    Move(String),
}

/// Key and description, in the order shown by `?`.
pub const COMMANDS: &[(&str, &str)] = &[
    ("?", "Show this message"),
    ("l", "Show legal moves"),
    ("h", "Show history"),
    ("o", "Open game in browser"),
    ("b", "Show ASCII board"),
    ("r", "Toggle random moves (y accept, n reroll, q back)"),
    ("R", "Use a random legal move (use at your own risk)"),
    ("q", "Quit/Resign"),
    ("d", "Draw/Offer draw"),
    ("c", "Clear screen"),
];

impl Command {
    pub fn parse(line: &str) -> Self {
        match line.trim() {
            "" => Self::Empty,
            "?" => Self::Help,
            "l" => Self::LegalMoves,
            "h" => Self::History,
            "o" => Self::OpenBrowser,
            "b" => Self::ShowBoard,
            "r" => Self::ToggleRandom,
            "R" => Self::ForceRandom,
            "q" => Self::Resign,
            "d" => Self::OfferDraw,
            "c" => Self::ClearScreen,
            other => Self::Move(other.to_string()),
        }
    }
}

/// The command table printed by `?`.
pub fn help_text() -> String {
    let mut text = String::from("Options:");
    for (key, description) in COMMANDS {
        text.push_str(&format!("\n  {}  {}", key, description));
    }
    text
}

/// Answer at the `Accept? (y/n/q)` prompt of the random submode.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RandomChoice {
    Accept,
    Reroll,
    Back,
    Unknown,
}

impl RandomChoice {
    pub fn parse(line: &str) -> Self {
        match line.trim() {
            "y" => Self::Accept,
            "n" => Self::Reroll,
            "q" => Self::Back,
            _ => Self::Unknown,
        }
    }
}
