/// ANSI color helper utilities for terminal output.
use crate::models::status::DutyState;

pub const RESET: &str = "\x1b[0m";

pub const GREY: &str = "\x1b[90m";
pub const RED: &str = "\x1b[31m";
pub const GREEN: &str = "\x1b[32m";
pub const YELLOW: &str = "\x1b[33m";
pub const CYAN: &str = "\x1b[36m";

/// Duty state color: green on duty, yellow when stale, grey off duty.
pub fn color_for_state(state: DutyState) -> &'static str {
    match state {
        DutyState::OnDuty => GREEN,
        DutyState::StaleOnDuty => YELLOW,
        DutyState::OffDuty => GREY,
    }
}

pub fn colorize_state(state: DutyState) -> String {
    format!("{}{}{}", color_for_state(state), state.label(), RESET)
}

pub fn colorize_in_out(value: &str, is_in: bool) -> String {
    if is_in {
        format!("{GREEN}{value}{RESET}")
    } else {
        format!("{RED}{value}{RESET}")
    }
}
