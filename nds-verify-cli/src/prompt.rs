//! Interactive collection of [`UserInput`].
//!
//! Every answer goes through the library predicate for its field and is
//! asked again until it passes, so the input handed to the reconciler only
//! fails on things the user cannot fix.

use std::io::{self, BufRead, Write};

use nds_verify_core::Vocabulary;
use nds_verify_dat::CatalogMatch;
use nds_verify_lib::input::{
    check_box_barcode, check_front_serial, check_game_name, check_region, parse_language_checked,
    parse_languages, tag_languages,
};
use nds_verify_lib::{LanguageChecked, LogFields, ReconciliationError, UserInput};
use owo_colors::OwoColorize;
use owo_colors::Stream::Stdout;

pub(crate) struct Prompter<R, W> {
    input: R,
    output: W,
}

impl Prompter<io::StdinLock<'static>, io::Stdout> {
    pub(crate) fn stdio() -> Self {
        Self::new(io::stdin().lock(), io::stdout())
    }
}

impl<R: BufRead, W: Write> Prompter<R, W> {
    pub(crate) fn new(input: R, output: W) -> Self {
        Self { input, output }
    }

    /// Read one line without its line ending. End of input is an error,
    /// since every question needs an answer.
    fn read_line(&mut self) -> io::Result<String> {
        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            return Err(io::Error::new(
                io::ErrorKind::UnexpectedEof,
                "input ended before all questions were answered",
            ));
        }
        Ok(line.trim_end_matches(['\r', '\n']).to_string())
    }

    pub(crate) fn line(&mut self, question: &str) -> io::Result<String> {
        write!(self.output, "{} ", question)?;
        self.output.flush()?;
        self.read_line()
    }

    /// Ask until `check` accepts the answer.
    pub(crate) fn ask<T>(
        &mut self,
        question: &str,
        check: impl Fn(&str) -> Result<T, ReconciliationError>,
    ) -> io::Result<T> {
        loop {
            let answer = self.line(question)?;
            match check(&answer) {
                Ok(value) => return Ok(value),
                Err(e) => writeln!(
                    self.output,
                    "  {} {}",
                    "\u{26A0}".if_supports_color(Stdout, |t| t.yellow()),
                    e.reason
                )?,
            }
        }
    }

    pub(crate) fn yes_no(&mut self, question: &str) -> io::Result<bool> {
        let answer = self.line(&format!("{question} (y/n)"))?;
        Ok(answer.trim().to_ascii_lowercase().starts_with('y'))
    }

    /// Read pasted lines until a blank line.
    pub(crate) fn pasted_block(&mut self, instructions: &str) -> io::Result<String> {
        writeln!(self.output, "{instructions}")?;
        self.output.flush()?;
        let mut block = String::new();
        loop {
            let line = self.read_line()?;
            if line.trim().is_empty() {
                if block.is_empty() {
                    continue;
                }
                return Ok(block);
            }
            block.push_str(&line);
            block.push('\n');
        }
    }

    /// Ask for every value the reconciler will need for this dump.
    pub(crate) fn collect_input(
        &mut self,
        vocab: &Vocabulary,
        fields: &LogFields,
        catalog_match: Option<&CatalogMatch>,
    ) -> io::Result<UserInput> {
        let mut input = UserInput::default();

        match catalog_match {
            None => {
                writeln!(
                    self.output,
                    "{}",
                    "No match found in the DAT. Please enter data manually."
                        .if_supports_color(Stdout, |t| t.yellow())
                )?;
                input.game_name = Some(self.ask("Enter game name:", check_game_name)?);
                input.region =
                    Some(self.ask("Enter region:", |s| check_region(vocab, "region", s))?);
            }
            Some(m) if vocab.must_disambiguate(&m.name.region) => {
                let question = format!(
                    "The DAT lists region {}. Enter the region of this cart:",
                    m.name.region
                );
                input.dump_region =
                    Some(self.ask(&question, |s| check_region(vocab, "dump_region", s))?);
            }
            Some(_) => {}
        }

        let tag = catalog_match
            .and_then(|m| m.name.language_tag.as_deref())
            .and_then(|t| tag_languages(vocab, t));

        match catalog_match {
            None => {
                input.languages = Some(self.ask("Enter languages (e.g. En,Fr,De):", |s| {
                    parse_languages(vocab, s).map(|_| s.to_string())
                })?);
            }
            Some(_) => {
                let checked =
                    parse_language_checked(&self.line("Did you check the languages? (y/n)")?);
                input.language_checked = Some(checked);
                if tag.is_none() {
                    if checked == LanguageChecked::No {
                        let answer = self.ask("Enter languages (blank to leave unset):", |s| {
                            if s.trim().is_empty() {
                                Ok(String::new())
                            } else {
                                parse_languages(vocab, s).map(|_| s.to_string())
                            }
                        })?;
                        input.languages = (!answer.is_empty()).then_some(answer);
                    } else {
                        input.languages =
                            Some(self.ask("Enter languages (e.g. En,Fr,De):", |s| {
                                parse_languages(vocab, s).map(|_| s.to_string())
                            })?);
                    }
                }
            }
        }

        let prefixes = vocab.front_serial_prefixes.join("/");
        input.front_serial = self.ask(
            &format!("Enter front serial (starts with {prefixes}):"),
            |s| check_front_serial(vocab, s),
        )?;
        input.back_serial = self.line(&format!(
            "Enter back serial (starts with {}):",
            fields.internal_serial
        ))?;
        input.pcb_serial = self.line("Enter PCB serial:")?;

        input.is_loose = self.yes_no("Is this a loose cart?")?;
        if !input.is_loose {
            input.box_serial = self.line("Enter box serials (comma-separated):")?;
            input.box_barcode =
                self.ask("Enter box barcode (include spaces):", check_box_barcode)?;
            input.manual_serials = self.line("Enter manual serials (comma-separated):")?;
        }

        Ok(input)
    }
}
