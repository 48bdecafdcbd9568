//! Interactive questionnaire and menu loop.
//!
//! Both are generic over the reader and writer so the binary can hand
//! them stdin/stdout while tests can script a whole session.

use chrono::NaiveDate;
use quitlog_core::input::{self as answers, DATE_PATTERN};
use quitlog_core::view::{render_profile, render_status};
use quitlog_core::{
    Clock, Error, InputProfile, JournalEvent, MenuCommand, Plan, Result, UserData,
};
use std::io::{BufRead, Write};

/// Presentation settings taken from the pricing config
pub struct MenuSettings<'a> {
    pub spend_unit: i64,
    pub currency: &'a str,
}

/// Read one line; `None` at end of input.
fn read_line<R: BufRead>(input: &mut R) -> Result<Option<String>> {
    let mut line = String::new();
    if input.read_line(&mut line)? == 0 {
        return Ok(None);
    }
    Ok(Some(line))
}

/// Prompt until `parse` accepts the answer.
fn ask<R, W, T, F>(input: &mut R, out: &mut W, prompt: &str, parse: F) -> Result<T>
where
    R: BufRead,
    W: Write,
    F: Fn(&str) -> Result<T>,
{
    loop {
        writeln!(out, "{}", prompt)?;
        out.flush()?;

        let line = read_line(input)?.ok_or_else(|| {
            Error::Input("input ended before the questionnaire was finished".into())
        })?;

        match parse(&line) {
            Ok(value) => return Ok(value),
            Err(e) => {
                tracing::debug!("Rejected answer {:?}: {}", line.trim(), e);
                writeln!(out, "  {}", e)?;
            }
        }
    }
}

/// Run the new-profile questionnaire.
///
/// `today` bounds the answers: the birthday must be at least a year
/// back and a duration may not reach the user's age.
pub fn ask_input_profile<R: BufRead, W: Write>(
    input: &mut R,
    out: &mut W,
    today: NaiveDate,
) -> Result<InputProfile> {
    let sex = ask(input, out, "Sex (m: male, f: female)?", answers::parse_sex)?;
    let birth_day = ask(
        input,
        out,
        &format!("Birthday ({})?", DATE_PATTERN),
        |line| answers::parse_birth_day_before(line, today),
    )?;
    let age = answers::age_on(birth_day.date(), today);

    let smoking_duration = ask(
        input,
        out,
        "How long have you been smoking (years months)?",
        |line| answers::parse_duration(line, age),
    )?;
    let cigarettes_per_day = ask(
        input,
        out,
        "How many cigarettes do you smoke a day?",
        answers::parse_cigarettes_per_day,
    )?;
    let plan = ask(
        input,
        out,
        "Are you going to quit?\n\t1. Yes, this time for real\n\t2. No, not yet\n\t3. I already quit",
        answers::parse_plan,
    )?;

    let non_smoking_duration = match plan {
        Plan::AlreadyAbstaining => ask(
            input,
            out,
            "How long have you been abstaining (years months)?",
            |line| answers::parse_duration(line, age),
        )?,
        Plan::StartAbstention | Plan::KeepSmoking => chrono::Duration::zero(),
    };

    Ok(InputProfile {
        sex,
        birth_day,
        plan,
        cigarettes_per_day,
        smoking_duration,
        non_smoking_duration,
    })
}

/// Render the status and handle menu keys until quit or end of input.
///
/// `on_change` is called after every successful mutation so the caller
/// can persist the profile and journal the event.
pub fn run_menu<C, R, W, F>(
    user: &mut UserData<C>,
    input: &mut R,
    out: &mut W,
    settings: &MenuSettings<'_>,
    mut on_change: F,
) -> Result<()>
where
    C: Clock,
    R: BufRead,
    W: Write,
    F: FnMut(&UserData<C>, JournalEvent) -> Result<()>,
{
    loop {
        writeln!(out, "=======================================")?;
        write!(out, "{}", render_status(user, settings.currency))?;
        writeln!(out, ".......................................")?;
        writeln!(out, "What would you like to do?")?;

        let offered = MenuCommand::available(user);
        for command in &offered {
            writeln!(
                out,
                "\t{}. {}",
                command.key(),
                command.label(settings.spend_unit, settings.currency)
            )?;
        }
        out.flush()?;

        let Some(line) = read_line(input)? else {
            tracing::debug!("End of input, leaving menu");
            break;
        };

        match MenuCommand::parse(&line, &offered) {
            Some(MenuCommand::Refresh) => {}
            Some(MenuCommand::Profile) => write!(out, "{}", render_profile(user))?,
            Some(MenuCommand::StartAbstention) => {
                user.start_abstention()?;
                on_change(&*user, JournalEvent::AbstentionStarted)?;
            }
            Some(MenuCommand::Relapse) => {
                user.relapse()?;
                on_change(&*user, JournalEvent::Relapsed)?;
            }
            Some(MenuCommand::Spend) => {
                if user.spend(settings.spend_unit) {
                    on_change(
                        &*user,
                        JournalEvent::Spent {
                            amount: settings.spend_unit,
                        },
                    )?;
                }
            }
            Some(MenuCommand::Quit) => break,
            None => writeln!(out, "Unknown command: {}", line.trim())?,
        }
    }

    Ok(())
}
