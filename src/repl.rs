//! Interactive shell
//!
//! One line per turn. `exit` and `:switch_db` are handled here and never
//! reach the pipeline.

use crate::db::{SchemaColumn, StatementExecutor};
use crate::intent::IntentClass;
use crate::pipeline::{Admission, Pipeline};
use crate::render::render_outcome;
use std::io::{self, BufRead, Write};
use std::sync::Arc;

pub const PROMPT: &str = "SnapBase> ";
pub const EXIT_COMMAND: &str = "exit";
pub const SWITCH_DB_COMMAND: &str = ":switch_db";

const BANNER: &str = r"
==========================================================
   _____                               ____
  / ___/ ____   ____ _ ____           / __ ) ____ _ _____ ___
  \__ \ / __ \ / __ `// __ \         / __  |/ __ `// ___// _ \
 ___/ // / / // /_/ // /_/ /        / /_/ // /_/ /(__  )/  __/
/____//_/ /_/ \__,_// .___/        /_____/ \__,_//____/ \___/
                   /_/
==========================================================
";

pub fn banner() -> &'static str {
    BANNER
}

fn separator() -> String {
    "-".repeat(58)
}

/// What the caller should do after a turn.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Control {
    Continue,
    Exit,
    SwitchDatabase,
}

pub struct Session {
    pipeline: Pipeline,
    executor: Arc<dyn StatementExecutor>,
    schema: Vec<SchemaColumn>,
}

impl Session {
    pub fn new(
        pipeline: Pipeline,
        executor: Arc<dyn StatementExecutor>,
        schema: Vec<SchemaColumn>,
    ) -> Self {
        Self {
            pipeline,
            executor,
            schema,
        }
    }

    /// Handle one input line, writing everything user-visible to `out`.
    pub async fn handle_line<W: Write>(&self, line: &str, out: &mut W) -> io::Result<Control> {
        let input = line.trim();

        if input.eq_ignore_ascii_case(EXIT_COMMAND) {
            return Ok(Control::Exit);
        }
        if input == SWITCH_DB_COMMAND {
            return Ok(Control::SwitchDatabase);
        }
        if input.is_empty() {
            return Ok(Control::Continue);
        }

        let admission = self.pipeline.admit(input, &self.schema).await;
        let intent = match &admission {
            Admission::Admitted { intent, .. } | Admission::Blocked { intent, .. } => *intent,
            Admission::NoCandidate { .. } => IntentClass::NaturalLanguage,
        };
        match intent {
            IntentClass::DirectSql => writeln!(out, "Detected direct SQL input")?,
            IntentClass::NaturalLanguage => writeln!(out, "Detected natural language input")?,
        }

        match admission {
            Admission::NoCandidate {
                model_output,
                failure,
            } => {
                if let Some(failure) = failure {
                    writeln!(out, "LLM error: {}", failure)?;
                    for hint in failure.hints() {
                        writeln!(out, "   {}", hint)?;
                    }
                } else if let Some(output) = model_output {
                    writeln!(out, "Could not extract valid SQL from LLM output.")?;
                    writeln!(out, "LLM response was:")?;
                    writeln!(out, "{}", output)?;
                }
            }
            Admission::Blocked { sql, rejection, .. } => {
                write_generated(out, &sql)?;
                writeln!(out, "SECURITY BLOCK: {}", rejection)?;
                writeln!(
                    out,
                    "\nOnly read-only queries (SELECT, SHOW, DESCRIBE, EXPLAIN) are allowed."
                )?;
                writeln!(
                    out,
                    "Destructive operations (DROP, DELETE, UPDATE, INSERT, etc.) are blocked."
                )?;
            }
            Admission::Admitted { sql, batch, .. } => {
                write_generated(out, &sql)?;
                for statement in batch.iter() {
                    let outcome = self.executor.execute(statement).await;
                    if batch.len() > 1 {
                        writeln!(out, "> {}", statement)?;
                    }
                    write!(out, "{}", render_outcome(&outcome))?;
                }
            }
        }

        Ok(Control::Continue)
    }

    /// Read lines from `input` until `exit`, `:switch_db` or end of input.
    pub async fn run<R: BufRead, W: Write>(&self, input: &mut R, out: &mut W) -> io::Result<Control> {
        loop {
            writeln!(out, "{}", separator())?;
            let Some(line) = read_prompted(input, out, PROMPT)? else {
                return Ok(Control::Exit);
            };
            writeln!(out, "{}", separator())?;

            match self.handle_line(&line, out).await? {
                Control::Continue => continue,
                other => return Ok(other),
            }
        }
    }
}

fn write_generated<W: Write>(out: &mut W, sql: &str) -> io::Result<()> {
    if sql.is_empty() {
        return Ok(());
    }
    writeln!(out, "\nGenerated SQL:")?;
    writeln!(out, "{}", sql)?;
    writeln!(out, "{}", separator())
}

/// Print `prompt`, read one line. `None` at end of input.
pub fn read_prompted<R: BufRead, W: Write>(
    input: &mut R,
    out: &mut W,
    prompt: &str,
) -> io::Result<Option<String>> {
    write!(out, "{}", prompt)?;
    out.flush()?;
    let mut line = String::new();
    if input.read_line(&mut line)? == 0 {
        return Ok(None);
    }
    Ok(Some(line.trim().to_string()))
}

/// Let the user pick a database by number or name. `None` at end of input.
pub fn choose_database<R: BufRead, W: Write>(
    databases: &[String],
    input: &mut R,
    out: &mut W,
) -> io::Result<Option<String>> {
    writeln!(out, "Available databases:")?;
    for (idx, name) in databases.iter().enumerate() {
        writeln!(out, "  {}. {}", idx + 1, name)?;
    }

    loop {
        let Some(choice) = read_prompted(input, out, "Select database (number or name): ")? else {
            return Ok(None);
        };
        if let Some(name) = resolve_choice(databases, &choice) {
            return Ok(Some(name));
        }
        writeln!(out, "Invalid choice: {}", choice)?;
    }
}

fn resolve_choice(databases: &[String], choice: &str) -> Option<String> {
    if let Ok(number) = choice.parse::<usize>() {
        return number
            .checked_sub(1)
            .and_then(|idx| databases.get(idx))
            .cloned();
    }
    databases.iter().find(|name| name.as_str() == choice).cloned()
}
