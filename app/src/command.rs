//! Console command parsing

use std::str::FromStr;

use anyhow::{anyhow, bail};

use citi_core::domain::{AgeBand, Gender, RecordField, SignupMethod};

pub const HELP: &str = "\
Commands:
  signup <google|apple|form>     choose how to sign up
  set first <name>               first name
  set last <name>                last name
  set email <address>            e-mail address
  set postcode <postcode>        postcode
  set gender <option>            man, woman, non-binary, prefer-not-to-say,
                                 self-describe:<text>
  set age <band>                 Under 18, 18-24, ... 65-69, 70+
  set phone <number>             UK number, 10 or 11 digits
  next                           continue to the next step
  back                           go back one step
  code <digits>                  type digits into the code field
  clear                          empty the code field
  resend                         request a new code
  edit-phone                     change the phone number
  status                         show the current step
  abandon                        discard everything and start over
  help                           show this help
  quit                           exit";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Signup(SignupMethod),
    Set(RecordField),
    Next,
    Back,
    Code(String),
    ClearCode,
    Resend,
    EditPhone,
    Status,
    Abandon,
    Help,
    Quit,
}

impl FromStr for Command {
    type Err = anyhow::Error;

    fn from_str(line: &str) -> Result<Self, Self::Err> {
        let line = line.trim();
        let (verb, rest) = match line.split_once(char::is_whitespace) {
            Some((verb, rest)) => (verb, rest.trim()),
            None => (line, ""),
        };

        let command = match verb.to_lowercase().as_str() {
            "signup" => Command::Signup(parse_method(rest)?),
            "set" => Command::Set(parse_field(rest)?),
            "next" | "continue" => Command::Next,
            "back" => Command::Back,
            "code" if !rest.is_empty() => Command::Code(rest.to_string()),
            "code" => bail!("usage: code <digits>"),
            "clear" => Command::ClearCode,
            "resend" => Command::Resend,
            "edit-phone" => Command::EditPhone,
            "status" | "" => Command::Status,
            "abandon" => Command::Abandon,
            "help" | "?" => Command::Help,
            "quit" | "exit" => Command::Quit,
            other => bail!("unknown command: {} (try `help`)", other),
        };
        Ok(command)
    }
}

fn parse_method(value: &str) -> anyhow::Result<SignupMethod> {
    match value.to_lowercase().as_str() {
        "google" => Ok(SignupMethod::Google),
        "apple" => Ok(SignupMethod::Apple),
        "form" | "" => Ok(SignupMethod::RegistrationForm),
        other => bail!("unknown signup method: {}", other),
    }
}

fn parse_field(rest: &str) -> anyhow::Result<RecordField> {
    let (name, value) = rest
        .split_once(char::is_whitespace)
        .map(|(name, value)| (name, value.trim()))
        .unwrap_or((rest, ""));

    let field = match name.to_lowercase().as_str() {
        "first" => RecordField::FirstName(value.to_string()),
        "last" => RecordField::LastName(value.to_string()),
        "email" => RecordField::Email(value.to_string()),
        "postcode" => RecordField::Postcode(value.to_string()),
        "gender" => RecordField::Gender(value.parse::<Gender>().map_err(|e| anyhow!(e))?),
        "age" => RecordField::AgeBand(value.parse::<AgeBand>().map_err(|e| anyhow!(e))?),
        "phone" => RecordField::PhoneNumber(value.to_string()),
        other => bail!("unknown field: {}", other),
    };
    Ok(field)
}
