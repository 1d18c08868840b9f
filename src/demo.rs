use std::io::Write;
use std::time::Duration;
use tokio::io::{AsyncBufRead, AsyncBufReadExt};
use tracing::{debug, info};

use crate::dispatch::Dispatcher;
use crate::telemetry::{TelemetryEvent, TelemetryRecorder, TelemetrySnapshot};

pub const DEMO_GREETING: &str = "Hello! I'm your voice assistant. Type your commands below.";
pub const DEMO_FAREWELL: &str = "Goodbye! Thanks for trying the voice assistant demo!";

const DEMO_EXIT_WORDS: [&str; 4] = ["exit", "quit", "goodbye", "stop"];

const RULE: &str = "============================================================";

/// Commands the automatic demo walks through, with what each one shows.
pub const AUTO_SCRIPT: [(&str, &str); 6] = [
    ("what time is it", "Getting current time"),
    ("what date is it", "Getting current date"),
    ("search wikipedia for python programming", "Searching Wikipedia"),
    ("open google", "Opening website"),
    ("hello", "Basic greeting"),
    ("help", "Showing help information"),
];

/// Whole-line match only; "stop the music" is a command, "stop" ends the demo.
pub fn is_demo_exit(line: &str) -> bool {
    let line = line.trim();
    DEMO_EXIT_WORDS.iter().any(|word| line.eq_ignore_ascii_case(word))
}

fn say<W: Write>(out: &mut W, text: &str) -> std::io::Result<()> {
    writeln!(out, "🔊 Assistant says: {}", text)
}

/// Text-driven stand-in for the voice loop. Returns the number of commands dispatched.
pub async fn run_interactive<R, W>(dispatcher: &Dispatcher, input: R, out: &mut W) -> anyhow::Result<usize>
where
    R: AsyncBufRead + Unpin,
    W: Write,
{
    writeln!(out, "{}", RULE)?;
    writeln!(out, "🎤 VOICE ASSISTANT DEMO MODE")?;
    writeln!(out, "{}", RULE)?;
    writeln!(out, "Available commands:")?;
    writeln!(out, "- 'what time is it' - Get current time")?;
    writeln!(out, "- 'what date is it' - Get current date")?;
    writeln!(out, "- 'search wikipedia for [topic]' - Wikipedia search")?;
    writeln!(out, "- 'open [website]' - Open websites")?;
    writeln!(out, "- 'hello' - Greeting")?;
    writeln!(out, "- 'help' - Show available commands")?;
    writeln!(out, "- 'exit' - Stop the demo")?;
    writeln!(out, "{}", RULE)?;
    say(out, DEMO_GREETING)?;

    let mut lines = input.lines();
    let mut handled = 0;

    loop {
        write!(out, "\n💬 You: ")?;
        out.flush()?;

        let Some(line) = lines.next_line().await? else {
            writeln!(out)?;
            info!("Input closed, leaving demo");
            break;
        };

        let line = line.trim();
        if line.is_empty() {
            continue;
        }

        if is_demo_exit(line) {
            say(out, DEMO_FAREWELL)?;
            break;
        }

        debug!("Processing command: {}", line);
        let response = dispatcher.process_command(line).await;
        say(out, &response.text)?;
        handled += 1;
    }

    Ok(handled)
}

/// Plays `AUTO_SCRIPT` with a pause between commands and reports telemetry for the run.
pub async fn run_auto<W: Write>(dispatcher: &Dispatcher, out: &mut W, pause: Duration) -> anyhow::Result<TelemetrySnapshot> {
    let mut recorder = TelemetryRecorder::new();

    writeln!(out, "{}", RULE)?;
    writeln!(out, "🎤 VOICE ASSISTANT - AUTOMATIC DEMONSTRATION")?;
    writeln!(out, "{}", RULE)?;
    writeln!(out, "Demonstrating voice assistant capabilities:\n")?;

    for (i, (command, description)) in AUTO_SCRIPT.iter().enumerate() {
        writeln!(out, "{}. {}", i + 1, description)?;
        writeln!(out, "   Command: '{}'", command)?;

        let dispatched = dispatcher.dispatch(command).await;
        recorder.record(TelemetryEvent::from(&dispatched));
        writeln!(out, "   🔊 Assistant: {}", dispatched.response.text)?;
        writeln!(out)?;

        tokio::time::sleep(pause).await;
    }

    let snapshot = recorder.snapshot();
    let stats = &snapshot.dispatch_stats;

    writeln!(out, "{}", RULE)?;
    writeln!(out, "✅ DEMONSTRATION COMPLETE!")?;
    writeln!(out, "{}", RULE)?;
    writeln!(
        out,
        "Commands: {} | answered: {} | recovered: {} | avg latency: {:.1}ms (max {}ms)",
        stats.total,
        stats.answered,
        stats.failures.values().sum::<u64>(),
        stats.avg_latency_ms,
        stats.max_latency_ms,
    )?;
    for (intent, count) in &stats.by_intent {
        writeln!(out, "  {:<10} {}", intent.label(), count)?;
    }

    Ok(snapshot)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn exit_words_match_whole_line_only() {
        assert!(is_demo_exit("exit"));
        assert!(is_demo_exit("  QUIT "));
        assert!(is_demo_exit("Goodbye"));
        assert!(!is_demo_exit("stop the music"));
        assert!(!is_demo_exit("exit now please"));
    }
}
