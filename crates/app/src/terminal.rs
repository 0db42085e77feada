//! Line-based quiz runner for a terminal.

use std::sync::{Arc, Mutex};
use std::time::Duration;

use quiz_core::catalog::Theme;
use quiz_core::model::{Locale, QuestionKind, Subject};
use services::{AppServices, Countdown, QuizSession};
use tokio::io::{AsyncBufReadExt, BufReader};

/// What the learner typed on one line.
#[derive(Debug, Clone, PartialEq, Eq)]
enum Input {
    Answer(String),
    Skip,
    Back,
    Submit,
    Restart,
}

fn parse_input(line: &str, options: &[&str]) -> Input {
    match line.trim() {
        "" => Input::Skip,
        "<" | ":back" => Input::Back,
        ":submit" => Input::Submit,
        ":restart" => Input::Restart,
        trimmed => {
            let picked = trimmed
                .strip_prefix('#')
                .and_then(|number| number.parse::<usize>().ok())
                .and_then(|n| n.checked_sub(1))
                .and_then(|index| options.get(index));
            match picked {
                Some(option) => Input::Answer((*option).to_owned()),
                None => Input::Answer(line.to_owned()),
            }
        }
    }
}

fn render_question(session: &QuizSession, locale: Locale) {
    let Some(question) = session.current_question() else {
        return;
    };
    let remaining = session.remaining_seconds();
    println!();
    println!(
        "Question {}/{}  ({}:{:02} left)",
        session.position() + 1,
        session.questions().len(),
        remaining / 60,
        remaining % 60
    );
    println!("{}", question.prompt_in(locale));
    match question.kind() {
        QuestionKind::FreeInput => println!("  (type your answer)"),
        _ => {
            for (index, option) in question.options().iter().enumerate() {
                println!("  #{} {option}", index + 1);
            }
        }
    }
    if let Some(previous) = session.answer_at(session.position()) {
        println!("  current answer: {previous}");
    }
}

fn render_results(session: &QuizSession, locale: Locale) {
    println!();
    for review in session.review() {
        let mark = if review.is_correct { "✓" } else { "✗" };
        println!(
            "{mark} {}. {}",
            review.position + 1,
            review.question.prompt_in(locale)
        );
        if !review.is_correct {
            println!(
                "    your answer: {} | correct: {}",
                review.answer.unwrap_or("-"),
                review.question.correct_answer()
            );
            if let Some(explanation) = review.question.explanation() {
                println!("    {}", explanation.get(locale));
            }
        }
    }
    if let Some(summary) = session.summary() {
        println!();
        println!(
            "Score: {}/{} ({:.1}%)",
            summary.correct_answers(),
            summary.total_questions(),
            summary.accuracy()
        );
    }
}

/// Run one timed session on stdin/stdout and record the result.
///
/// # Errors
///
/// Returns an error if stdin cannot be read, the session cannot be started,
/// or the result cannot be stored.
pub async fn run_quiz(
    app: &mut AppServices,
    week: u32,
    theme: &'static Theme,
    subject: Subject,
    locale: Locale,
) -> Result<(), Box<dyn std::error::Error>> {
    let session = Arc::new(Mutex::new(app.start(week, theme, subject)?));
    println!(
        "{} {} | Week {week} | {}",
        theme.emoji,
        theme.name,
        subject.label()
    );
    println!("Type an answer, or `#2` to pick option 2. Empty line skips, `<` goes back, `:submit` finishes.");

    let mut countdown = Countdown::start(Arc::clone(&session), Duration::from_secs(1));
    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    loop {
        {
            let guard = session.lock().map_err(|_| "session lock poisoned")?;
            if guard.is_submitted() {
                break;
            }
            render_question(&guard, locale);
        }

        tokio::select! {
            line = lines.next_line() => {
                let mut guard = session.lock().map_err(|_| "session lock poisoned")?;
                let Some(line) = line? else {
                    guard.submit();
                    break;
                };
                let options = guard
                    .current_question()
                    .map(|q| q.options().into_iter().map(str::to_owned).collect::<Vec<_>>())
                    .unwrap_or_default();
                let options: Vec<&str> = options.iter().map(String::as_str).collect();
                match parse_input(&line, &options) {
                    Input::Answer(text) => {
                        guard.select_answer(text);
                        guard.next();
                    }
                    Input::Skip => {
                        guard.next();
                    }
                    Input::Back => guard.previous(),
                    Input::Submit => {
                        guard.submit();
                    }
                    Input::Restart => guard.restart(),
                }
            }
            expired = countdown.expired() => {
                if expired.is_some() {
                    println!();
                    println!("⏰ Time is up!");
                }
                break;
            }
        }
    }

    countdown.stop().await;
    let mut session = Arc::try_unwrap(session)
        .map_err(|_| "session still shared after countdown stopped")?
        .into_inner()
        .map_err(|_| "session lock poisoned")?;

    render_results(&session, locale);
    let entry = app.record(week, theme, &mut session).await?;
    println!("Focus area: {}", entry.focus_area().label());
    println!("{}", theme.motivational(locale));
    Ok(())
}
