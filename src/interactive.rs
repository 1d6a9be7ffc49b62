//! Prompt-driven front end: ask for a selection, print the reports, page raw
//! records on request, then offer a restart.

use anyhow::Result;
use bikeshare_stats::analyzers::analyzer::analyze;
use bikeshare_stats::dataset::{Dataset, weekday_name};
use bikeshare_stats::filter::{ALL, weekdays};
use bikeshare_stats::loader::{Loader, Selection};
use bikeshare_stats::output::{print_pretty, render_chunk, render_report};
use bikeshare_stats::registry::CityRegistry;
use bikeshare_stats::session::{ContinueOrStop, SessionState, parse_choice};
use bikeshare_stats::viewer::RecordPager;
use std::io::{BufRead, Write};
use tracing::{error, info};

const YES_NO: [&str; 4] = ["yes", "y", "no", "n"];

struct Prompter<R, W> {
    input: R,
    out: W,
}

impl<R: BufRead, W: Write> Prompter<R, W> {
    /// Asks until the answer is one of `options`. `None` once input is closed.
    fn choose<S: AsRef<str>>(&mut self, message: &str, options: &[S]) -> Result<Option<String>> {
        loop {
            let Some(answer) = self.ask(message)? else {
                return Ok(None);
            };
            if let Some(choice) = parse_choice(&answer, options) {
                return Ok(Some(choice));
            }
            writeln!(self.out, "\nNot a valid option. Please try again.\n")?;
        }
    }

    fn ask(&mut self, message: &str) -> Result<Option<String>> {
        write!(self.out, "{message}")?;
        self.out.flush()?;

        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            return Ok(None);
        }
        Ok(Some(line))
    }

    fn selection(&mut self, registry: &CityRegistry) -> Result<Option<Selection>> {
        writeln!(self.out, "Hello! Let's explore some US bikeshare data!")?;

        let cities: Vec<String> = registry.city_ids().map(str::to_lowercase).collect();
        let Some(city) = self.choose(
            &format!("Please choose a city ({}):\n", cities.join(", ")),
            &cities[..],
        )?
        else {
            return Ok(None);
        };

        let mut months = vec![ALL.to_string()];
        months.extend(registry.months().iter().map(|m| m.to_lowercase()));
        let Some(month) = self.choose(
            &format!("Please choose a month ({}):\n", months.join(", ")),
            &months[..],
        )?
        else {
            return Ok(None);
        };

        let mut days = vec![ALL.to_string()];
        days.extend(weekdays().map(|d| weekday_name(d).to_lowercase()));
        let Some(day) = self.choose(
            &format!("Please choose a day of the week ({}):\n", days.join(", ")),
            &days[..],
        )?
        else {
            return Ok(None);
        };

        writeln!(self.out, "----------------------------------------")?;
        Ok(Some(Selection::parse(registry, &city, &month, &day)?))
    }

    /// Pages through raw records five at a time while the user keeps saying yes.
    fn view_raw(&mut self, dataset: &Dataset) -> Result<()> {
        let message = "Would you like to view trip data? yes/no\n";
        let mut pager = RecordPager::new(dataset);

        loop {
            let Some(answer) = self.choose(message, &YES_NO[..])? else {
                return Ok(());
            };
            if ContinueOrStop::from_answer(&answer) == ContinueOrStop::Stop {
                return Ok(());
            }
            let offset = pager.position();
            match pager.next_chunk() {
                Some(chunk) => write!(self.out, "{}", render_chunk(chunk, offset))?,
                None => {
                    writeln!(self.out, "No more trips to show.")?;
                    return Ok(());
                }
            }
        }
    }
}

/// Runs analysis rounds until the user declines to restart or input ends.
pub fn run<R: BufRead, W: Write>(
    registry: &CityRegistry,
    loader: &Loader,
    input: R,
    out: W,
) -> Result<()> {
    let mut prompter = Prompter { input, out };
    let mut state = SessionState::Prompting;

    while !state.is_terminated() {
        let Some(selection) = prompter.selection(registry)? else {
            break;
        };

        match loader.load_selection(&selection) {
            Ok(dataset) => {
                let report = analyze(&selection, &dataset, registry.months());
                print_pretty(&report);
                write!(prompter.out, "{}", render_report(&report))?;
                prompter.view_raw(&dataset)?;
            }
            Err(e) => {
                error!(error = %e, "Failed to load trip data");
                writeln!(prompter.out, "\nCould not load trip data: {e}\n")?;
            }
        }

        let decision = match prompter.ask("\nWould you like to restart? Enter yes or no.\n")? {
            Some(answer) => ContinueOrStop::from_answer(&answer),
            None => ContinueOrStop::Stop,
        };
        state = state.advance(decision);
    }

    info!("Session ended");
    Ok(())
}
