//! Text front end for the provider directory.
//!
//! Reads one command per line and renders views as plain text. Rows are
//! referenced by their 1-based number in the last rendered list, or by id.
//! Errors are printed and the loop continues; when the error says a record
//! no longer exists the list is rendered again.
//!
//! Only the command word and references are trimmed. `set` values are kept
//! as typed after the single space that follows the field name.

use std::io::{self, BufRead, Write};

use crate::commands::providers::{self, CommandError, FieldView, ProviderListView};
use crate::core_state::CoreState;

const HELP: &str = "\
Commands:
  list                  show providers matching the current search
  search [text]         filter by name or specialty (empty clears)
  new                   open a blank provider form
  edit <row|id>         open the form for an existing provider
  set <field> <value>   fill a form field (name, specialty, address, phone, email, fax, notes)
  form                  show the open form
  submit                save the open form
  cancel                discard the open form
  show <row|id>         show every field of a provider
  close                 close the detail view
  delete <row|id>       ask to delete a provider
  yes | no              confirm or keep the pending delete
  json                  print the current list as JSON
  help                  show this message
  quit                  leave";

pub struct Shell {
    state: CoreState,
    /// Provider ids in the order of the last rendered list.
    rows: Vec<String>,
}

impl Shell {
    pub fn new(state: CoreState) -> Self {
        Self {
            state,
            rows: Vec::new(),
        }
    }

    pub fn state(&self) -> &CoreState {
        &self.state
    }

    /// Process commands until `quit` or end of input.
    ///
    /// A line that is not valid UTF-8 is reported and skipped.
    pub fn run<R: BufRead, W: Write>(&mut self, mut input: R, mut out: W) -> io::Result<()> {
        writeln!(out, "Providers. Type 'help' for commands.")?;
        let mut buf = Vec::new();
        loop {
            buf.clear();
            if input.read_until(b'\n', &mut buf)? == 0 {
                break;
            }
            let line = match std::str::from_utf8(&buf) {
                Ok(line) => line.trim_end_matches(['\n', '\r']),
                Err(_) => {
                    tracing::warn!(bytes = buf.len(), "Skipped input line, invalid UTF-8");
                    report("input is not valid UTF-8", &mut out)?;
                    continue;
                }
            };
            if !self.execute(line, &mut out)? {
                break;
            }
        }
        out.flush()
    }

    /// Run one command line. Returns false when the user asked to quit.
    pub fn execute<W: Write>(&mut self, line: &str, out: &mut W) -> io::Result<bool> {
        let line = line.trim_start();
        let (command, raw_rest) = line.split_once(char::is_whitespace).unwrap_or((line, ""));
        let rest = raw_rest.trim();
        if command.is_empty() {
            return Ok(true);
        }
        tracing::debug!(command, "Shell command");

        match command.to_ascii_lowercase().as_str() {
            "quit" | "exit" => return Ok(false),
            "help" => writeln!(out, "{HELP}")?,
            "list" => {
                let view = providers::list_providers(&self.state);
                self.render_list(&view, out)?;
            }
            "search" => {
                let view = providers::search_providers(&mut self.state, rest);
                self.render_list(&view, out)?;
            }
            "json" => {
                let view = providers::list_providers(&self.state);
                let json = serde_json::to_string_pretty(&view).map_err(io::Error::other)?;
                writeln!(out, "{json}")?;
            }
            "new" => match providers::begin_add_provider(&mut self.state) {
                Ok(form) => render_fields(&form.title, &form.fields, true, out)?,
                Err(e) => self.fail(&e, out)?,
            },
            "edit" => {
                let result = self
                    .resolve(rest)
                    .and_then(|id| providers::begin_edit_provider(&mut self.state, &id));
                match result {
                    Ok(form) => render_fields(&form.title, &form.fields, true, out)?,
                    Err(e) => self.fail(&e, out)?,
                }
            }
            "set" => {
                let raw = raw_rest.trim_start();
                let (field, value) = raw.split_once(char::is_whitespace).unwrap_or((raw, ""));
                match providers::set_provider_field(&mut self.state, field, value) {
                    Ok(_) => writeln!(out, "ok")?,
                    Err(e) => self.fail(&e, out)?,
                }
            }
            "form" => match providers::get_provider_form(&self.state) {
                Some(form) => render_fields(&form.title, &form.fields, true, out)?,
                None => report("No provider form is open", out)?,
            },
            "submit" => match providers::submit_provider_form(&mut self.state) {
                Ok(card) => {
                    writeln!(out, "Saved {}.", card.name)?;
                    let view = providers::list_providers(&self.state);
                    self.render_list(&view, out)?;
                }
                Err(e) => self.fail(&e, out)?,
            },
            "cancel" => {
                if providers::cancel_provider_form(&mut self.state) {
                    writeln!(out, "Form discarded.")?;
                } else {
                    writeln!(out, "No form is open.")?;
                }
            }
            "show" => {
                let result = self
                    .resolve(rest)
                    .and_then(|id| providers::get_provider_detail(&mut self.state, &id));
                match result {
                    Ok(detail) => render_fields("Provider", &detail.fields, false, out)?,
                    Err(e) => self.fail(&e, out)?,
                }
            }
            "close" => providers::close_provider_detail(&mut self.state),
            "delete" => {
                let result = self
                    .resolve(rest)
                    .and_then(|id| providers::request_provider_delete(&mut self.state, &id));
                match result {
                    Ok(prompt) => {
                        writeln!(out, "{}", prompt.prompt)?;
                        writeln!(out, "Type 'yes' to delete or 'no' to keep it.")?;
                    }
                    Err(e) => self.fail(&e, out)?,
                }
            }
            "yes" => match providers::confirm_provider_delete(&mut self.state) {
                Ok(card) => {
                    writeln!(out, "Deleted {}.", card.name)?;
                    let view = providers::list_providers(&self.state);
                    self.render_list(&view, out)?;
                }
                Err(e) => self.fail(&e, out)?,
            },
            "no" => {
                if providers::cancel_provider_delete(&mut self.state) {
                    writeln!(out, "Kept.")?;
                } else {
                    writeln!(out, "Nothing to confirm.")?;
                }
            }
            other => report(&format!("Unknown command: {other} (type 'help')"), out)?,
        }
        Ok(true)
    }

    /// Map a row number or raw id to a provider id string.
    fn resolve(&self, reference: &str) -> Result<String, CommandError> {
        if reference.is_empty() {
            return Err(CommandError::invalid("Which provider? Give a row number or id"));
        }
        match reference.parse::<usize>() {
            Ok(row) => row
                .checked_sub(1)
                .and_then(|i| self.rows.get(i))
                .cloned()
                .ok_or_else(|| CommandError::invalid(format!("No row {row} in the current list"))),
            Err(_) => Ok(reference.to_string()),
        }
    }

    fn render_list<W: Write>(&mut self, view: &ProviderListView, out: &mut W) -> io::Result<()> {
        self.rows = view.rows.iter().map(|r| r.id.clone()).collect();

        if view.rows.is_empty() {
            if view.total == 0 {
                return writeln!(out, "No providers yet. Type 'new' to add one.");
            }
            return writeln!(out, "No providers match \"{}\".", view.query);
        }

        if view.query.is_empty() {
            writeln!(out, "Providers ({}):", view.total)?;
        } else {
            writeln!(
                out,
                "Providers matching \"{}\" ({} of {}):",
                view.query,
                view.rows.len(),
                view.total
            )?;
        }
        for (i, row) in view.rows.iter().enumerate() {
            if row.specialty.is_empty() {
                writeln!(out, "  {}. {}", i + 1, row.name)?;
            } else {
                writeln!(out, "  {}. {} ({})", i + 1, row.name, row.specialty)?;
            }
        }
        Ok(())
    }

    /// Print the error. A vanished record also re-renders the list.
    fn fail<W: Write>(&mut self, err: &CommandError, out: &mut W) -> io::Result<()> {
        report(&err.message, out)?;
        if err.is_not_found() {
            let view = providers::list_providers(&self.state);
            self.render_list(&view, out)?;
        }
        Ok(())
    }
}

fn report<W: Write>(message: &str, out: &mut W) -> io::Result<()> {
    writeln!(out, "error: {message}")
}

fn render_fields<W: Write>(
    title: &str,
    fields: &[FieldView],
    editing: bool,
    out: &mut W,
) -> io::Result<()> {
    writeln!(out, "{title}")?;
    for f in fields {
        let marker = if editing && f.required { "*" } else { "" };
        writeln!(out, "  {}{}: {}", f.label, marker, f.value)?;
    }
    if editing {
        writeln!(out, "Use 'set <field> <value>', then 'submit' or 'cancel'.")?;
    }
    Ok(())
}
