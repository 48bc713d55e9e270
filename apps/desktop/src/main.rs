use std::{
    io::{self, BufRead, Write},
    path::PathBuf,
};

use anyhow::Result;
use clap::Parser;
use shared::domain::{SessionPhase, SessionSnapshot, SubmitOutcome};
use support_core::{config, SupportController};

#[derive(Parser, Debug)]
struct Args {
    /// Settings file to read instead of ./support.toml.
    #[arg(long)]
    config: Option<PathBuf>,
    #[arg(long)]
    target_count: Option<u32>,
    #[arg(long)]
    recipient: Option<String>,
}

const BAR_WIDTH: usize = 24;

fn render(snapshot: &SessionSnapshot) {
    let filled = (snapshot.progress() * BAR_WIDTH as f64).round() as usize;
    let bar = format!("{}{}", "#".repeat(filled), "-".repeat(BAR_WIDTH - filled));
    println!();
    println!("Consumer demand proposal");
    println!(
        "Supporters gathered: {} / {}",
        snapshot.count, snapshot.target_count
    );
    println!("[{bar}]");
    let label = match snapshot.phase() {
        SessionPhase::Idle => "Back this proposal",
        SessionPhase::Submitting => "Sending...",
        SessionPhase::Supported => "Support recorded, notification sent automatically",
    };
    println!("( {label} )");
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt().init();
    let args = Args::parse();

    let mut settings = match &args.config {
        Some(path) => config::load_settings_from(path),
        None => config::load_settings(),
    };
    if let Some(target_count) = args.target_count {
        settings.target_count = target_count.max(1);
    }
    if let Some(recipient) = args.recipient {
        settings.notify_recipient = recipient;
    }

    let notifier = emailjs_integration::notifier_from_config(&settings.emailjs());
    let controller =
        SupportController::new(settings.target_count, settings.notify_recipient, notifier);

    render(&controller.snapshot().await);
    print!("Press Enter to back this proposal: ");
    io::stdout().flush()?;
    let mut line = String::new();
    io::stdin().lock().read_line(&mut line)?;

    match controller.submit().await {
        SubmitOutcome::Accepted { count, notified } => {
            println!("Your support has been recorded ({count} so far). Thank you!");
            if notified {
                println!("The proposer has been notified in the background.");
            }
        }
        SubmitOutcome::Rejected(_) => {}
        SubmitOutcome::Failed(err) => {
            eprintln!("Sending the notification failed: {err}");
            eprintln!("Your support was not recorded; please try again.");
        }
    }

    render(&controller.snapshot().await);
    Ok(())
}
