//! Email and chart rendering over a [`DailyReport`]. Wording is fixed
//! boilerplate: one bullet per task, status, or contractor note, in report
//! order.

use super::report::{DailyReport, TaskCount};
use std::fmt::Write;

/// Daily activity breakdown addressed to the maintenance manager.
pub fn technician_activity_email(report: &DailyReport, recipient: &str, sender: &str) -> String {
    let mut email = format!(
        "Subject: Technician Activity Report\n\nHi {recipient},\n\nHere's today's breakdown of technician activity:\n\n"
    );

    for entry in &report.technicians {
        let _ = writeln!(email, "{}", entry.name);
        if entry.tasks.is_empty() {
            email.push_str("• No tasks recorded.\n");
        } else {
            for task in &entry.tasks {
                let _ = writeln!(email, "• {task}");
            }
        }
        email.push('\n');
    }

    for name in &report.suspended {
        let _ = writeln!(email, "{name}\n• Suspended\n");
    }
    for name in &report.on_leave {
        let _ = writeln!(email, "{name}\n• PTO\n");
    }
    for name in &report.in_training {
        let _ = writeln!(email, "{name}\n• Completed training or tests\n");
    }

    email.push_str("Contractor Updates:\n");
    if report.contractor_notes.is_empty() {
        email.push_str("• No contractor updates today.\n");
    } else {
        for note in &report.contractor_notes {
            let _ = writeln!(email, "• {note}");
        }
    }

    let _ = write!(email, "\nBest,\n{sender}");
    email
}

/// Department-wide summary for upper management and peers.
pub fn department_update_email(report: &DailyReport, sender: &str) -> String {
    let mut email = String::from("Subject: Maintenance Department Update\n\nHello Team,\n\n");
    email.push_str(
        "Today's work focused on system reliability and operational improvements. \
         Tasks included water sampling, equipment troubleshooting, electrical checks, \
         air system work, piping changes, and filter installations. \
         Material planning and valve replacements were also completed. \
         Training and onboarding progressed with new hire check-offs and scheduled \
         equipment certifications.\n\n",
    );

    if !report.contractor_notes.is_empty() {
        email.push_str("Contractor support included:\n");
        for note in &report.contractor_notes {
            let _ = writeln!(email, "• {note}");
        }
    }

    email.push_str(
        "\nGreat job by the maintenance team for staying focused and collaborating \
         across departments to keep operations running smoothly.\n\n",
    );
    let _ = write!(email, "Best regards,\n{sender}");
    email
}

/// Plain-text bar chart of technician productivity.
pub fn task_count_chart(counts: &[TaskCount]) -> String {
    if counts.is_empty() {
        return String::new();
    }

    let name_width = counts
        .iter()
        .map(|entry| entry.technician.len())
        .max()
        .unwrap_or(0);

    let mut chart = String::from("Technician productivity for today\n");
    for entry in counts {
        let _ = writeln!(
            chart,
            "{:name_width$}  {} {}",
            entry.technician,
            "#".repeat(entry.count),
            entry.count
        );
    }
    chart
}
