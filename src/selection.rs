//! Interactive shortcut selection for the command line

use crate::settings::Settings;
use crate::shortcuts::{self, MuteShortcut};
use anyhow::{Context, Result};
use std::io::{BufRead, Write};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SelectionOutcome {
    Selected(MuteShortcut),
    /// The user declined after reading the selection notice
    Cancelled,
}

/// One line per shortcut, the selected one marked with `*`
pub fn format_shortcut_list(selected: MuteShortcut) -> String {
    shortcuts::all()
        .iter()
        .map(|spec| {
            let marker = if spec.id == selected { "*" } else { " " };
            format!("{} {:<8} {}\n", marker, spec.id.as_str(), spec.display_name)
        })
        .collect()
}

/// Ask a yes/no question; an empty answer or end of input picks `default`
pub fn prompt_yes_no(
    input: &mut impl BufRead,
    output: &mut impl Write,
    prompt: &str,
    default: bool,
) -> Result<bool> {
    write!(output, "{}", prompt)?;
    output.flush()?;

    let mut answer = String::new();
    input
        .read_line(&mut answer)
        .context("Failed to read answer")?;

    Ok(match answer.trim().to_ascii_lowercase().as_str() {
        "" => default,
        "y" | "yes" => true,
        _ => false,
    })
}

/// Persist `shortcut`, showing its selection notice first if it has one
///
/// The notice is skipped once dismissed. A "don't show again" answer is
/// saved even when the user then declines the selection.
pub fn select_shortcut(
    settings: &mut Settings,
    shortcut: MuteShortcut,
    input: &mut impl BufRead,
    output: &mut impl Write,
) -> Result<SelectionOutcome> {
    if let Some(notice) = shortcut.selection_notice() {
        if !settings.zoom_alert_dismissed() {
            writeln!(output, "{}\n", notice)?;
            let proceed = prompt_yes_no(input, output, "Use Zoom's shortcut? [Y/n] ", true)?;
            let dismiss = prompt_yes_no(input, output, "Don't show this again? [y/N] ", false)?;

            if dismiss {
                settings
                    .set_zoom_alert_dismissed(true)
                    .context("Failed to save settings")?;
            }
            if !proceed {
                writeln!(output, "Selection unchanged: {}", settings.selected_shortcut())?;
                return Ok(SelectionOutcome::Cancelled);
            }
        }
    }

    settings
        .set_selected_shortcut(shortcut)
        .context("Failed to save settings")?;
    writeln!(output, "Selected {}", shortcut.spec().display_name)?;
    Ok(SelectionOutcome::Selected(shortcut))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::settings::InMemoryBackend;
    use std::io::Cursor;

    fn run(settings: &mut Settings, shortcut: MuteShortcut, answers: &str) -> (SelectionOutcome, String) {
        let mut input = Cursor::new(answers.as_bytes().to_vec());
        let mut output = Vec::new();
        let outcome = select_shortcut(settings, shortcut, &mut input, &mut output).unwrap();
        (outcome, String::from_utf8(output).unwrap())
    }

    #[test]
    fn test_shortcut_without_notice_is_saved_without_prompting() {
        let mut settings = Settings::new(InMemoryBackend::new());

        let (outcome, output) = run(&mut settings, MuteShortcut::Meet, "");

        assert_eq!(outcome, SelectionOutcome::Selected(MuteShortcut::Meet));
        assert_eq!(settings.selected_shortcut(), MuteShortcut::Meet);
        assert!(!output.contains("[Y/n]"));
    }

    #[test]
    fn test_zoom_notice_accepted_with_defaults() {
        let mut settings = Settings::new(InMemoryBackend::new());

        let (outcome, output) = run(&mut settings, MuteShortcut::Zoom, "\n\n");

        assert_eq!(outcome, SelectionOutcome::Selected(MuteShortcut::Zoom));
        assert!(output.contains("Mute/Unmute My Audio"));
        assert_eq!(settings.selected_shortcut(), MuteShortcut::Zoom);
        assert!(!settings.zoom_alert_dismissed());
    }

    #[test]
    fn test_cancel_keeps_previous_selection_and_flag() {
        let mut settings = Settings::new(InMemoryBackend::new());
        settings.set_selected_shortcut(MuteShortcut::Meet).unwrap();

        let (outcome, output) = run(&mut settings, MuteShortcut::Zoom, "n\nn\n");

        assert_eq!(outcome, SelectionOutcome::Cancelled);
        assert_eq!(settings.selected_shortcut(), MuteShortcut::Meet);
        assert!(!settings.zoom_alert_dismissed());
        assert!(output.contains("Selection unchanged: meet"));
    }

    #[test]
    fn test_dismiss_is_saved_even_when_cancelled() {
        let mut settings = Settings::new(InMemoryBackend::new());

        let (outcome, _) = run(&mut settings, MuteShortcut::Zoom, "n\ny\n");

        assert_eq!(outcome, SelectionOutcome::Cancelled);
        assert_eq!(settings.selected_shortcut(), MuteShortcut::Tandem);
        assert!(settings.zoom_alert_dismissed());
    }

    #[test]
    fn test_dismissed_notice_is_skipped() {
        let mut settings = Settings::new(InMemoryBackend::new());
        settings.set_zoom_alert_dismissed(true).unwrap();

        // "n" would cancel if the notice were still shown
        let (outcome, output) = run(&mut settings, MuteShortcut::Zoom, "n\nn\n");

        assert_eq!(outcome, SelectionOutcome::Selected(MuteShortcut::Zoom));
        assert!(!output.contains("Mute/Unmute My Audio"));
        assert_eq!(settings.selected_shortcut(), MuteShortcut::Zoom);
    }

    #[test]
    fn test_prompt_answers() {
        let mut output = Vec::new();
        for (answer, default, expected) in [
            ("y\n", false, true),
            ("YES\n", false, true),
            ("no\n", true, false),
            ("\n", true, true),
            ("", false, false),
            ("maybe\n", true, false),
        ] {
            let mut input = Cursor::new(answer.as_bytes().to_vec());
            assert_eq!(
                prompt_yes_no(&mut input, &mut output, "? ", default).unwrap(),
                expected,
                "answer {:?}",
                answer
            );
        }
    }

    #[test]
    fn test_list_marks_selected_shortcut() {
        let list = format_shortcut_list(MuteShortcut::Zoom);
        let lines: Vec<&str> = list.lines().collect();

        assert_eq!(lines.len(), 3);
        assert!(lines[0].starts_with("  tandem"));
        assert!(lines[1].starts_with("* zoom"));
        assert!(lines[2].starts_with("  meet"));
    }
}
