//! Terminal rendering for analyzed resumes.
//!
//! A full record renders as a vertical card grouped into sections; the
//! history list renders as a fixed-width table. Everything is built into a
//! `String` first so the layout can be tested without a terminal.

use std::fmt::Write;

use resumeview_core::{DateStyle, RatingBand, Record, Summary, display_or, format_upload_date};

const NOT_DETECTED: &str = "Not detected";
const FILENAME_WIDTH: usize = 28;
const NAME_WIDTH: usize = 22;
const CONTACT_WIDTH: usize = 28;

// ── Public API ──

/// Print a full record as a card, headed by `title`.
pub fn print_record_card(title: &str, record: &Record) {
    print!("{}", record_card(title, record));
}

/// Print the history list, or the empty-state message when there is nothing.
pub fn print_history(summaries: &[Summary]) {
    print!("{}", history_table(summaries));
}

// ── Card ──

pub fn record_card(title: &str, record: &Record) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "=== {title} ===");
    let _ = writeln!(out, "File: {}", record.filename);
    if let Some(raw) = record.upload_date.as_deref() {
        let _ = writeln!(
            out,
            "Uploaded on {}",
            format_upload_date(raw, DateStyle::Long)
        );
    }
    let _ = writeln!(out);

    section(&mut out, "Contact Information");
    field(&mut out, "Name", display_or(record.name.as_deref(), NOT_DETECTED));
    field(&mut out, "Email", display_or(record.email.as_deref(), NOT_DETECTED));
    field(&mut out, "Phone", display_or(record.phone.as_deref(), NOT_DETECTED));
    let _ = writeln!(out);

    section(&mut out, "Resume Rating");
    field(&mut out, "Score", &rating_label(record.resume_rating));
    let _ = writeln!(out);

    section(&mut out, "Technical Skills");
    skill_list(&mut out, &record.technical_skills, "No technical skills detected");
    let _ = writeln!(out);

    section(&mut out, "Soft Skills");
    skill_list(&mut out, &record.soft_skills, "No soft skills detected");
    let _ = writeln!(out);

    section(&mut out, "Areas for Improvement");
    paragraph(&mut out, &record.improvement_areas);
    let _ = writeln!(out);

    section(&mut out, "Upskilling Suggestions");
    paragraph(&mut out, &record.upskill_suggestions);
    out
}

fn section(out: &mut String, header: &str) {
    let _ = writeln!(out, "{header}");
}

fn field(out: &mut String, label: &str, value: &str) {
    let _ = writeln!(out, "  {label:<26} {value}");
}

fn skill_list(out: &mut String, skills: &[String], empty: &str) {
    let items: Vec<&str> = skills
        .iter()
        .map(String::as_str)
        .filter(|s| !s.trim().is_empty())
        .collect();
    if items.is_empty() {
        let _ = writeln!(out, "  {empty}");
    } else {
        let _ = writeln!(out, "  {}", items.join(", "));
    }
}

fn paragraph(out: &mut String, text: &str) {
    let text = display_or(Some(text), "None provided");
    for line in text.lines() {
        let _ = writeln!(out, "  {line}");
    }
}

fn rating_label(rating: resumeview_core::Rating) -> String {
    let band = match rating.band() {
        RatingBand::High => "high",
        RatingBand::Medium => "medium",
        RatingBand::Low => "low",
    };
    format!("{rating} ({band})")
}

// ── History table ──

pub fn history_table(summaries: &[Summary]) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "Resume History");
    let plural = if summaries.len() == 1 { "" } else { "s" };
    let _ = writeln!(out, "{} resume{plural} processed", summaries.len());
    let _ = writeln!(out);

    if summaries.is_empty() {
        let _ = writeln!(out, "No resumes yet");
        let _ = writeln!(
            out,
            "Upload your first resume to get started with analysis."
        );
        return out;
    }

    let _ = writeln!(
        out,
        "{:>5}  {:<fw$}  {:<nw$}  {:<cw$}  {:<13}  {}",
        "ID",
        "File Name",
        "Candidate",
        "Contact Info",
        "Rating",
        "Upload Date",
        fw = FILENAME_WIDTH,
        nw = NAME_WIDTH,
        cw = CONTACT_WIDTH,
    );
    for summary in summaries {
        let date = summary
            .upload_date
            .as_deref()
            .map(|raw| format_upload_date(raw, DateStyle::Short))
            .unwrap_or_default();
        let _ = writeln!(
            out,
            "{:>5}  {:<fw$}  {:<nw$}  {:<cw$}  {:<13}  {}",
            summary.id,
            truncate(&summary.filename, FILENAME_WIDTH),
            truncate(summary.display_name(), NAME_WIDTH),
            truncate(&contact_line(summary), CONTACT_WIDTH),
            rating_label(summary.resume_rating),
            date,
            fw = FILENAME_WIDTH,
            nw = NAME_WIDTH,
            cw = CONTACT_WIDTH,
        );
    }
    out
}

fn contact_line(summary: &Summary) -> String {
    let parts: Vec<&str> = [summary.email.as_deref(), summary.phone.as_deref()]
        .into_iter()
        .flatten()
        .filter(|s| !s.trim().is_empty())
        .collect();
    if parts.is_empty() {
        "No contact info".to_string()
    } else {
        parts.join(" / ")
    }
}

fn truncate(text: &str, width: usize) -> String {
    if text.chars().count() <= width {
        return text.to_string();
    }
    let kept: String = text.chars().take(width - 3).collect();
    format!("{kept}...")
}
