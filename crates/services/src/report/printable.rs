use std::fmt::Write as _;

use quiz_core::model::{ProgressEntry, Subject};

use super::ExportContext;
use super::aggregate::{ReportSummary, aggregate};

const STYLE: &str = "\
body { font-family: Arial, sans-serif; margin: 40px; line-height: 1.6; }
.header { text-align: center; border-bottom: 2px solid #333; padding-bottom: 20px; margin-bottom: 30px; }
.section { margin-bottom: 30px; }
.stats { display: grid; grid-template-columns: repeat(auto-fit, minmax(200px, 1fr)); gap: 20px; margin: 20px 0; }
.stat-card { border: 1px solid #ddd; padding: 15px; border-radius: 8px; text-align: center; }
.progress-item { padding: 10px; border-bottom: 1px solid #eee; }
.recommendations { background: #f8f9fa; padding: 20px; border-radius: 8px; }
h1, h2 { color: #333; }
.score { font-weight: bold; color: #007bff; }
@media print { body { margin: 0; } }
";

fn subject_heading(subject: Subject) -> &'static str {
    match subject {
        Subject::Reading => "📚 Reading",
        Subject::Spelling => "✏️ Spelling",
        Subject::Grammar => "📝 Grammar",
        Subject::Math => "🔢 Math",
    }
}

/// Escape text for an HTML element body. Only markup-significant
/// characters change; spaces and punctuation stay readable in the source.
fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '&' => out.push_str("&amp;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            other => out.push(other),
        }
    }
    out
}

fn stat_card(out: &mut String, title: &str, value: &str) {
    let _ = write!(
        out,
        "<div class=\"stat-card\"><h3>{title}</h3><div class=\"score\">{value}</div></div>"
    );
}

/// Render the history as a standalone, print-friendly HTML page.
///
/// Deterministic for a given history and context.
#[must_use]
pub fn to_printable_document(entries: &[ProgressEntry], ctx: &ExportContext) -> String {
    render(&aggregate(entries), entries, ctx)
}

pub(crate) fn render(summary: &ReportSummary, entries: &[ProgressEntry], ctx: &ExportContext) -> String {
    let mut out = String::with_capacity(4096);
    out.push_str("<!DOCTYPE html>\n<html>\n<head>\n<meta charset=\"utf-8\">\n");
    out.push_str("<title>Learning Progress Report</title>\n<style>\n");
    out.push_str(STYLE);
    out.push_str("</style>\n</head>\n<body>\n");

    let _ = write!(
        out,
        "<div class=\"header\"><h1>📚 Learning Progress Report</h1><p>Week {} | Generated on {}</p></div>\n",
        ctx.current_week,
        ctx.exported_at.format("%Y-%m-%d"),
    );

    out.push_str("<div class=\"section\"><h2>📊 Overall Progress</h2><div class=\"stats\">");
    stat_card(&mut out, "Total Sessions", &summary.total_sessions.to_string());
    stat_card(&mut out, "Total Questions", &summary.total_questions.to_string());
    stat_card(
        &mut out,
        "Overall Accuracy",
        &format!("{:.1}%", summary.overall_accuracy),
    );
    out.push_str("</div></div>\n");

    out.push_str("<div class=\"section\"><h2>📈 Subject Performance</h2><div class=\"stats\">");
    for subject in Subject::ALL {
        stat_card(
            &mut out,
            subject_heading(subject),
            &format!("{:.1}%", summary.subject_averages.get(subject)),
        );
    }
    out.push_str("</div></div>\n");

    out.push_str("<div class=\"section\"><h2>📅 Weekly Progress</h2>");
    for entry in entries {
        let _ = write!(
            out,
            "<div class=\"progress-item\"><strong>Week {} - {}</strong> | {}<br>\
             Accuracy: {:.1}% ({}/{})<br>Focus Area: {}</div>",
            entry.week(),
            escape(entry.theme_name()),
            entry.date().format("%Y-%m-%d"),
            entry.accuracy(),
            entry.correct_answers(),
            entry.total_questions(),
            entry.focus_area().label(),
        );
    }
    out.push_str("</div>\n");

    if !summary.recommendations.is_empty() {
        out.push_str(
            "<div class=\"section\"><h2>💡 Recommendations</h2><div class=\"recommendations\">",
        );
        for line in summary.recommendation_lines() {
            let _ = write!(out, "<p>• {}</p>", escape(&line));
        }
        out.push_str("</div></div>\n");
    }

    out.push_str("</body>\n</html>\n");
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use quiz_core::model::QuizSummary;
    use quiz_core::time::fixed_now;

    fn ctx() -> ExportContext {
        ExportContext {
            exported_at: fixed_now(),
            current_week: 4,
        }
    }

    fn entry(theme: &str, subject: Subject, correct: u32) -> ProgressEntry {
        let summary = QuizSummary::from_counts(subject, correct, 5).unwrap();
        ProgressEntry::from_summary(
            &summary,
            4,
            theme,
            NaiveDate::from_ymd_opt(2024, 6, 3).unwrap(),
        )
    }

    #[test]
    fn page_renders_all_sections() {
        let html = to_printable_document(&[entry("Space Adventure", Subject::Math, 5)], &ctx());
        assert!(html.starts_with("<!DOCTYPE html>"));
        assert!(html.contains("<style>"));
        assert!(html.contains("Week 4 | Generated on 2023-11-14"));
        assert!(html.contains("<h3>Total Sessions</h3><div class=\"score\">1</div>"));
        assert!(html.contains("<h3>🔢 Math</h3><div class=\"score\">100.0%</div>"));
        assert!(html.contains("<h3>📚 Reading</h3><div class=\"score\">0.0%</div>"));
        assert!(html.contains("Accuracy: 100.0% (5/5)"));
        assert!(html.contains("Focus Area: Math"));
        assert!(html.contains("💡 Recommendations"));
    }

    #[test]
    fn recommendations_section_is_omitted_when_empty() {
        let html = to_printable_document(&[entry("Ocean Depths", Subject::Grammar, 4)], &ctx());
        assert!(!html.contains("Recommendations"));
    }

    #[test]
    fn theme_names_are_escaped() {
        let html = to_printable_document(&[entry("<script>x</script>", Subject::Reading, 4)], &ctx());
        assert!(!html.contains("<script>"));
        assert!(html.contains("&lt;script&gt;"));
    }

    #[test]
    fn plain_text_is_left_readable() {
        let entries = [entry("Taylor's \"Era\" & Co", Subject::Math, 2)];
        let html = to_printable_document(&entries, &ctx());
        assert!(html.contains("<p>• Focus more practice on math (current average: 40.0%)</p>"));
        assert!(html.contains("Week 4 - Taylor&#39;s &quot;Era&quot; &amp; Co</strong>"));
        assert!(!html.contains("&#32;"));
    }

    #[test]
    fn rendering_is_deterministic() {
        let entries = [entry("Magical Castle", Subject::Spelling, 2)];
        assert_eq!(
            to_printable_document(&entries, &ctx()),
            to_printable_document(&entries, &ctx())
        );
    }
}
