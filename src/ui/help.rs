//! Help texts and scroll geometry.

use crate::fsm::context::InverterProfile;

pub const EMBRACO_HELP: &[&str] = &[
    "Connect wires as follows:",
    "",
    "GPIO4     -> inverter +",
    "(usually RED wire)",
    "GND       -> inverter -",
    "(usually WHITE wire)",
    "",
    "Note:",
    "This tool provides",
    "3 test speeds:",
    "",
    "Low speed:",
    "2000 RPM (VNE)",
    "1800 RPM (VEG, FMF)",
    "",
    "Mid speed:",
    "3000 RPM",
    "(VNE, VEG, FMF)",
    "",
    "Max speed:",
    "4500 RPM",
    "(VNE, VEG, FMF)",
    "",
    "Embraco compressors",
    "support many speeds",
    "with 30 RPM steps.",
    "",
    "Each speed stops by",
    "itself after its time",
    "budget unless the limit",
    "is turned off in",
    "Settings.",
    "",
    "----------------",
    "",
    "Press BACK to start.",
];

pub const SAMSUNG_HELP: &[&str] = &["In development"];

/// Help text for `profile`.
pub fn lines(profile: InverterProfile) -> &'static [&'static str] {
    match profile {
        InverterProfile::Embraco => EMBRACO_HELP,
        InverterProfile::Samsung => SAMSUNG_HELP,
    }
}

/// How many help lines fit and how far the text can scroll.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HelpLayout {
    pub lines_that_fit: u8,
    pub max_top_line: u8,
}

impl HelpLayout {
    /// `lines_that_fit = max(1, (screen_h - top) / line_h)`;
    /// `max_top_line = total - lines_that_fit` when the text overflows.
    pub fn compute(total_lines: usize, screen_h: u8, top: u8, line_h: u8) -> Self {
        let lines_that_fit = (screen_h.saturating_sub(top) / line_h.max(1)).max(1);
        let total = u8::try_from(total_lines).unwrap_or(u8::MAX);
        let max_top_line = total.saturating_sub(lines_that_fit);
        Self { lines_that_fit, max_top_line }
    }
}
