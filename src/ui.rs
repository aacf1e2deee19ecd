//! Terminal output for the CLI `run` path — spinner and colored summary.

use console::Style;
use indicatif::{ProgressBar, ProgressStyle};

use crate::coordinator::{FinalOutput, RunStatus};
use crate::workflow::AuditStatus;

/// Visual progress indicator for a single pipeline run in the terminal.
pub struct RunProgress {
    pb: ProgressBar,
    green: Style,
    red: Style,
    dim: Style,
}

impl RunProgress {
    /// Start the spinner with a description of what is being processed.
    pub fn start(label: &str) -> Self {
        let pb = ProgressBar::new_spinner();
        pb.set_style(
            ProgressStyle::default_spinner()
                .template("{spinner:.cyan} {msg}")
                .expect("invalid template"),
        );
        pb.set_message(format!("Processing {label}"));
        pb.enable_steady_tick(std::time::Duration::from_millis(100));

        Self {
            pb,
            green: Style::new().green().bold(),
            red: Style::new().red().bold(),
            dim: Style::new().dim(),
        }
    }

    /// Stop the spinner and print the run result.
    ///
    /// Image payloads are summarized, not dumped; the audit trail is printed
    /// as pretty JSON.
    pub fn finish(&self, output: &FinalOutput) {
        self.pb.finish_and_clear();

        match output.status {
            RunStatus::Success => {
                println!("  {} Workflow completed", self.green.apply_to("✓"));
            }
            RunStatus::Error => {
                println!(
                    "  {} Workflow failed: {}",
                    self.red.apply_to("✗"),
                    output.error.as_deref().unwrap_or("unknown error")
                );
            }
        }

        if let Some(article) = &output.article {
            println!();
            println!("  Article: {}", article.title);
            if let Some(author) = &article.author {
                println!("  Author:  {author}");
            }
        }

        if let Some(posts) = &output.posts {
            println!();
            println!("{}", self.dim.apply_to("─── LinkedIn ───"));
            println!("{}", posts.linkedin);
            println!();
            println!("{}", self.dim.apply_to("─── X/Twitter ───"));
            println!("{}", posts.twitter);
            if !posts.key_insights.is_empty() {
                println!();
                println!("{}", self.dim.apply_to("─── Key insights ───"));
                for insight in &posts.key_insights {
                    println!("  • {insight}");
                }
            }
        }

        if let Some(images) = &output.images {
            println!();
            println!(
                "  Infographic image: {}",
                describe_image(images.infographic.as_deref())
            );
            println!(
                "  Social image:      {}",
                describe_image(images.social.as_deref())
            );
        }

        println!();
        println!("{}", self.dim.apply_to("─── Audit trail ───"));
        for entry in &output.audit_trail {
            let status = match entry.status {
                AuditStatus::Success => self.green.apply_to("success"),
                AuditStatus::Error => self.red.apply_to("error"),
            };
            println!(
                "  {:<20} {:<10} {:>8.1}ms",
                entry.step, status, entry.duration_ms
            );
        }
    }
}

fn describe_image(image: Option<&str>) -> String {
    match image {
        Some(data) => format!("{} base64 chars", data.len()),
        None => "absent".to_string(),
    }
}
