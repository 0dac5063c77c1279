//! Binary entrypoint that launches the meeting assistant terminal chat.

use std::process::ExitCode;

use meeting_assistant::start_assistant;

/// Start the chat with seeded conversations and simulated replies.
fn main() -> ExitCode {
    start_assistant::run()
}
