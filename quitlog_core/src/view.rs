//! Text rendering for the session: status view, profile view and the
//! single-key command menu.

use crate::input::DATE_FORMAT;
use crate::{Clock, Sex, UserData};
use chrono::Duration;
use std::fmt::Write;

/// Format an elapsed duration.
///
/// `minus` renders the short `-D Days` form used for the smoking side.
pub fn format_duration(minus: bool, duration: Duration) -> String {
    let days = duration.num_days();
    let hours = duration.num_hours() - days * 24;
    let minutes = duration.num_minutes() - duration.num_hours() * 60;
    let seconds = duration.num_seconds() - duration.num_minutes() * 60;

    if minus {
        format!("-{} Days", days)
    } else {
        format!("{} Days, {}h {}m {}s", days, hours, minutes, seconds)
    }
}

/// Current-state banner, elapsed time and savings
pub fn render_status<C: Clock>(user: &UserData<C>, currency: &str) -> String {
    let mut out = String::new();
    if user.is_smoking() {
        let _ = writeln!(out, "Time to start your abstention");
        let _ = writeln!(out, "{}", format_duration(true, user.smoking_duration()));
    } else {
        let _ = writeln!(
            out,
            "start: {}",
            user.last_segment().start_time.format(DATE_FORMAT)
        );
        let _ = writeln!(
            out,
            "{}",
            format_duration(false, user.non_smoking_duration())
        );
    }
    let _ = writeln!(out, "{} {}", user.saving(), currency);
    out
}

pub fn render_profile<C: Clock>(user: &UserData<C>) -> String {
    let sex = match user.sex() {
        Sex::Male => "Male",
        Sex::Female => "Female",
    };

    let mut out = String::new();
    let _ = writeln!(out, "+++++++++++++++++++++++++");
    let _ = writeln!(out, "Sex: {}", sex);
    let _ = writeln!(out, "Birthday: {}", user.birth_day().format(DATE_FORMAT));
    let _ = writeln!(out, "Age: {}", user.age());
    let _ = writeln!(
        out,
        "Cigarettes per day: {}",
        user.cigarettes_per_day()
    );
    out
}

/// Single-key commands offered by the interactive menu
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MenuCommand {
    Refresh,
    Profile,
    StartAbstention,
    Relapse,
    Spend,
    Quit,
}

impl MenuCommand {
    pub fn key(self) -> char {
        match self {
            MenuCommand::Refresh => 'r',
            MenuCommand::Profile => 'p',
            MenuCommand::StartAbstention => 's',
            MenuCommand::Relapse => 'e',
            MenuCommand::Spend => 'c',
            MenuCommand::Quit => 'q',
        }
    }

    pub fn label(self, spend_unit: i64, currency: &str) -> String {
        match self {
            MenuCommand::Refresh => "Refresh".into(),
            MenuCommand::Profile => "Show profile".into(),
            MenuCommand::StartAbstention => "Start abstention".into(),
            MenuCommand::Relapse => "I smoked".into(),
            MenuCommand::Spend => format!("Spend {} {}", spend_unit, currency),
            MenuCommand::Quit => "Quit".into(),
        }
    }

    /// Commands that make sense in the user's current state
    pub fn available<C: Clock>(user: &UserData<C>) -> Vec<MenuCommand> {
        let mut commands = vec![MenuCommand::Refresh, MenuCommand::Profile];
        if user.is_smoking() {
            commands.push(MenuCommand::StartAbstention);
        } else {
            commands.push(MenuCommand::Relapse);
            if user.saving() > 0 {
                commands.push(MenuCommand::Spend);
            }
        }
        commands.push(MenuCommand::Quit);
        commands
    }

    /// Match a typed key against the offered commands
    pub fn parse(input: &str, offered: &[MenuCommand]) -> Option<MenuCommand> {
        let mut chars = input.trim().chars();
        let key = chars.next()?.to_ascii_lowercase();
        if chars.next().is_some() {
            return None;
        }
        offered.iter().copied().find(|c| c.key() == key)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{InputProfile, ManualClock, Plan};
    use chrono::{NaiveDate, NaiveDateTime};
    use std::rc::Rc;

    fn datetime(y: i32, m: u32, d: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(y, m, d)
            .unwrap()
            .and_hms_opt(0, 0, 0)
            .unwrap()
    }

    fn user(plan: Plan, clock: &Rc<ManualClock>) -> UserData<Rc<ManualClock>> {
        let input = InputProfile {
            sex: Sex::Female,
            birth_day: datetime(1979, 6, 29),
            plan,
            cigarettes_per_day: 5,
            smoking_duration: Duration::days(10),
            non_smoking_duration: Duration::days(1),
        };
        UserData::from_input(Rc::clone(clock), &input).unwrap()
    }

    #[test]
    fn test_format_duration() {
        let d = Duration::days(2)
            + Duration::hours(3)
            + Duration::minutes(4)
            + Duration::seconds(5)
            + Duration::milliseconds(900);
        assert_eq!(format_duration(false, d), "2 Days, 3h 4m 5s");
        assert_eq!(format_duration(true, d), "-2 Days");
        assert_eq!(format_duration(false, Duration::zero()), "0 Days, 0h 0m 0s");
    }

    #[test]
    fn test_render_status_smoking() {
        let clock = Rc::new(ManualClock::new(datetime(2019, 1, 1)));
        let user = user(Plan::KeepSmoking, &clock);
        let view = render_status(&user, "won");

        assert!(view.contains("Time to start your abstention"));
        assert!(view.contains("-10 Days"));
        assert!(view.contains("-12500 won"));
    }

    #[test]
    fn test_render_status_abstaining() {
        let clock = Rc::new(ManualClock::new(datetime(2019, 1, 1)));
        let user = user(Plan::AlreadyAbstaining, &clock);
        clock.advance(Duration::hours(1));
        let view = render_status(&user, "won");

        assert!(view.contains("start: 2018-12-31"));
        assert!(view.contains("1 Days, 1h 0m 0s"));
        assert!(view.contains("1302 won"));
    }

    #[test]
    fn test_render_profile() {
        let clock = Rc::new(ManualClock::new(datetime(2019, 1, 1)));
        let view = render_profile(&user(Plan::KeepSmoking, &clock));

        assert!(view.contains("Sex: Female"));
        assert!(view.contains("Birthday: 1979-06-29"));
        assert!(view.contains("Age: 39"));
        assert!(view.contains("Cigarettes per day: 5"));
    }

    #[test]
    fn test_available_commands_follow_state() {
        let clock = Rc::new(ManualClock::new(datetime(2019, 1, 1)));
        let mut user = user(Plan::KeepSmoking, &clock);

        let smoking = MenuCommand::available(&user);
        assert!(smoking.contains(&MenuCommand::StartAbstention));
        assert!(!smoking.contains(&MenuCommand::Relapse));
        assert!(!smoking.contains(&MenuCommand::Spend));

        user.start_abstention().unwrap();
        let fresh = MenuCommand::available(&user);
        assert!(fresh.contains(&MenuCommand::Relapse));
        assert!(!fresh.contains(&MenuCommand::Spend)); // nothing saved yet

        clock.advance(Duration::days(1));
        let saved = MenuCommand::available(&user);
        assert!(saved.contains(&MenuCommand::Spend));
        assert_eq!(saved.last(), Some(&MenuCommand::Quit));
    }

    #[test]
    fn test_parse_only_offered_commands() {
        let offered = [MenuCommand::Refresh, MenuCommand::Relapse, MenuCommand::Quit];
        assert_eq!(MenuCommand::parse("e\n", &offered), Some(MenuCommand::Relapse));
        assert_eq!(MenuCommand::parse("Q", &offered), Some(MenuCommand::Quit));
        assert_eq!(MenuCommand::parse("s", &offered), None);
        assert_eq!(MenuCommand::parse("", &offered), None);
        assert_eq!(MenuCommand::parse("quit", &offered), None);
    }
}
