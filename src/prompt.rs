use anyhow::{bail, Context, Result};
use percent_gauge::input::MAX_LABEL_LINES;
use percent_gauge::{Label, Percentage, Submission};
use std::io::{BufRead, Write};

/// Ask for up to three label lines and a percentage, re-asking until the
/// percentage validates. An empty label line ends the label early.
pub fn prompt_submission<R: BufRead, W: Write>(input: &mut R, output: &mut W) -> Result<Submission> {
    writeln!(
        output,
        "Enter a label (up to {MAX_LABEL_LINES} lines, empty line to finish):"
    )?;
    let mut lines = Vec::new();
    for i in 0..MAX_LABEL_LINES {
        write!(output, "Line {}: ", i + 1)?;
        output.flush()?;
        match read_line(input)? {
            Some(line) if !line.trim().is_empty() => lines.push(line),
            _ => break,
        }
    }
    let label = Label::from_lines_or_default(&lines);

    loop {
        write!(output, "Enter percentage (0-100): ")?;
        output.flush()?;
        let Some(line) = read_line(input)? else {
            bail!("input closed before a percentage was entered");
        };
        match line.parse::<Percentage>() {
            Ok(percentage) => return Ok(Submission { label, percentage }),
            Err(err) => {
                tracing::debug!(%err, "re-prompting percentage");
                writeln!(output, "{err}")?;
            }
        }
    }
}

fn read_line<R: BufRead>(input: &mut R) -> Result<Option<String>> {
    let mut line = String::new();
    let read = input.read_line(&mut line).context("failed to read stdin")?;
    if read == 0 {
        return Ok(None);
    }
    Ok(Some(line.trim_end_matches(['\r', '\n']).to_string()))
}
