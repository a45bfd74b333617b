//! Terminal rendering of a session view.

use std::io::Write;
use std::process::ExitCode;

use crossterm::{
    queue,
    style::{Attribute, Color, Print, ResetColor, SetAttribute, SetForegroundColor},
};
use pedscribe_core::AppStatus;
use pedscribe_session::{AnalysisView, ScoreBand, SessionView};

/// Color scheme for terminal output.
struct Colors;

impl Colors {
    const HEADER: Color = Color::Magenta;
    const ORIGINAL: Color = Color::Red;
    const REPLACEMENT: Color = Color::Green;
    const CATEGORY: Color = Color::Yellow;
    const ERROR: Color = Color::Red;
    const WARN: Color = Color::DarkYellow;
    const DIM: Color = Color::DarkGrey;
}

fn band_color(band: ScoreBand) -> Color {
    match band {
        ScoreBand::Strong => Color::Green,
        ScoreBand::NeedsRevision => Color::Yellow,
        ScoreBand::MajorRevision => Color::Red,
    }
}

/// Write the whole view: status line, messages, and result tabs on success.
pub fn render_view<W: Write>(out: &mut W, view: &SessionView) -> std::io::Result<()> {
    queue!(
        out,
        SetForegroundColor(Colors::DIM),
        Print(format!("status: {}\n", view.status)),
        ResetColor,
    )?;

    if let Some(notice) = &view.notice {
        queue!(
            out,
            SetForegroundColor(Colors::WARN),
            Print(format!("{notice}\n")),
            ResetColor,
        )?;
    }

    if view.status == AppStatus::Error {
        if let Some(error) = &view.error {
            queue!(
                out,
                SetForegroundColor(Colors::ERROR),
                Print(format!("Error: {error}\n")),
                ResetColor,
            )?;
        }
    }

    if let Some(analysis) = &view.analysis {
        render_analysis(out, analysis)?;
    }

    out.flush()
}

/// Process status for `analyze`: failure when the session ended in `Error`.
pub fn exit_code(view: &SessionView) -> ExitCode {
    if view.status == AppStatus::Error {
        ExitCode::FAILURE
    } else {
        ExitCode::SUCCESS
    }
}

fn section<W: Write>(out: &mut W, title: &str) -> std::io::Result<()> {
    queue!(
        out,
        Print("\n"),
        SetForegroundColor(Colors::HEADER),
        SetAttribute(Attribute::Bold),
        Print(format!("== {title} ==\n")),
        SetAttribute(Attribute::Reset),
        ResetColor,
    )
}

fn render_analysis<W: Write>(out: &mut W, a: &AnalysisView) -> std::io::Result<()> {
    section(out, "Review")?;
    queue!(
        out,
        SetForegroundColor(band_color(a.review.band)),
        Print(format!("{:.0}/100 ", a.review.score)),
        ResetColor,
        Print(format!("({})\n", a.review.band.label())),
        Print(format!("{}\n", a.review.explanation)),
    )?;

    for s in &a.review.suggestions {
        queue!(
            out,
            Print("\n"),
            SetForegroundColor(Colors::CATEGORY),
            Print(format!("[{}]\n", s.category)),
            SetForegroundColor(Colors::ORIGINAL),
            Print(format!("  - {}\n", s.original)),
            SetForegroundColor(Colors::REPLACEMENT),
            Print(format!("  + {}\n", s.replacement)),
            SetForegroundColor(Colors::DIM),
            Print(format!("  {}\n", s.explanation)),
            ResetColor,
        )?;
    }

    section(out, "Manuscript")?;
    queue!(out, Print(format!("{}\n", a.manuscript.improved_text)))?;

    section(out, "Tables")?;
    if a.tables.extracted.is_empty() {
        queue!(
            out,
            SetForegroundColor(Colors::DIM),
            Print("No numeric tables found in the case.\n"),
            ResetColor,
        )?;
    }
    for t in &a.tables.extracted {
        queue!(
            out,
            SetAttribute(Attribute::Bold),
            Print(format!("{}\n", t.title)),
            SetAttribute(Attribute::Reset),
            Print(format!("{}\n", t.headers.join(" | "))),
        )?;
        for row in &t.rows {
            queue!(out, Print(format!("{}\n", row.join(" | "))))?;
        }
        queue!(out, Print("\n"))?;
    }
    for idea in &a.tables.ideas {
        queue!(
            out,
            SetForegroundColor(Colors::CATEGORY),
            Print(format!("Idea: {}\n", idea.title)),
            ResetColor,
            Print(format!("  {}\n", idea.rational)),
            SetForegroundColor(Colors::DIM),
            Print(format!("  columns: {}\n", idea.suggested_columns.join(", "))),
            ResetColor,
        )?;
    }

    section(out, "Discussion")?;
    for (i, point) in a.discussion.points.iter().enumerate() {
        queue!(out, Print(format!("{}. {point}\n", i + 1)))?;
    }

    if !a.warnings.is_empty() {
        queue!(out, Print("\n"))?;
        for w in &a.warnings {
            queue!(
                out,
                SetForegroundColor(Colors::WARN),
                Print(format!("warning: {w}\n")),
                ResetColor,
            )?;
        }
    }

    Ok(())
}
