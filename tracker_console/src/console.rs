// THEORY:
// The command listener is the only input the tracker accepts while running. It
// owns the `StopHandle`; the frame cycle owns the matching `StopToken` and checks
// it once per frame. Nothing else crosses between the two.
//
// Reading stdin blocks and cannot be cancelled, so the listener runs on a plain
// detached thread: the process can exit while it is still waiting for a line.

use green_tracker::frame_cycle::StopHandle;
use std::io::{self, BufRead, Write};
use std::thread::JoinHandle;

pub const PROMPT: &str = "playground> ";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ListenerExit {
    /// The user asked to stop.
    StopRequested,
    /// Input closed without a stop command.
    InputClosed,
}

/// Reads whitespace-separated commands until `exit` or end of input.
pub fn run_command_loop<R: BufRead, W: Write>(
    input: R,
    mut output: W,
    stop: &StopHandle,
) -> io::Result<ListenerExit> {
    let mut lines = input.lines();
    loop {
        write!(output, "{PROMPT}")?;
        output.flush()?;

        let Some(line) = lines.next() else {
            return Ok(ListenerExit::InputClosed);
        };
        for command in line?.split_whitespace() {
            match command {
                "exit" => {
                    stop.request_stop();
                    return Ok(ListenerExit::StopRequested);
                }
                "help" => writeln!(output, "commands: exit, help")?,
                other => writeln!(output, "unknown command: {other}")?,
            }
        }
    }
}

/// Spawns the stdin listener on its own thread.
pub fn spawn_stdin_listener(stop: StopHandle) -> io::Result<JoinHandle<()>> {
    std::thread::Builder::new()
        .name("command-listener".to_string())
        .spawn(move || {
            let stdin = io::stdin();
            match run_command_loop(stdin.lock(), io::stdout(), &stop) {
                Ok(ListenerExit::StopRequested) => tracing::info!("Stop requested from console"),
                Ok(ListenerExit::InputClosed) => tracing::debug!("Console input closed"),
                Err(e) => tracing::warn!("Command listener failed: {}", e),
            }
        })
}
