mod app;
mod help;
mod jumpto;
mod theme;
mod widget;
use crate::app::App;
use anyhow::Context;
use crossterm::{
    event::{DisableMouseCapture, EnableMouseCapture},
    execute,
};
use lexopt::{Arg, Parser, ValueExt};
use rangepick::{Part, PickerConfig, Range};
use ratatui::DefaultTerminal;
use std::fs::File;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use time::{Date, OffsetDateTime};
use tracing_subscriber::EnvFilter;

/// Environment variable holding the log filter directives
const LOG_ENV: &str = "RANGEPICK_LOG";

#[derive(Clone, Debug, Eq, PartialEq)]
enum Command {
    Run(Overrides),
    Help,
    Version,
}

/// Settings given on the command line, applied on top of the config file
#[derive(Clone, Debug, Default, Eq, PartialEq)]
struct Overrides {
    config: Option<PathBuf>,
    months: Option<usize>,
    week_start: Option<u8>,
    min_date: Option<String>,
    max_date: Option<String>,
    disabled_dates: Vec<String>,
    disabled_weekdays: Vec<String>,
    no_drag: bool,
    move_range: bool,
    retain_end: bool,
    focus: Option<Part>,
    no_preview: bool,
    adjacent: bool,
    start_date: Option<String>,
    end_date: Option<String>,
    log_file: Option<PathBuf>,
}

impl Overrides {
    fn apply(self, cfg: &mut PickerConfig) {
        if let Some(months) = self.months {
            cfg.months = months;
        }
        if let Some(week_start) = self.week_start {
            cfg.week_start = week_start;
        }
        if self.min_date.is_some() {
            cfg.min_date = self.min_date;
        }
        if self.max_date.is_some() {
            cfg.max_date = self.max_date;
        }
        cfg.disabled_dates.extend(self.disabled_dates);
        cfg.disabled_weekdays.extend(self.disabled_weekdays);
        if self.no_drag {
            cfg.drag_selection = false;
        }
        if self.move_range {
            cfg.move_range_on_first_selection = true;
        }
        if self.retain_end {
            cfg.retain_end_date_on_first_selection = true;
        }
        if let Some(part) = self.focus {
            cfg.focused_part = part;
        }
        if self.no_preview {
            cfg.show_preview = false;
        }
        if self.adjacent {
            cfg.adjacent_days_selectable = true;
        }
        if self.start_date.is_some() {
            cfg.start_date = self.start_date;
        }
        if self.end_date.is_some() {
            cfg.end_date = self.end_date;
        }
        if self.log_file.is_some() {
            cfg.log_file = self.log_file;
        }
    }
}

impl Command {
    fn from_parser(mut parser: Parser) -> Result<Command, lexopt::Error> {
        let mut opts = Overrides::default();
        while let Some(arg) = parser.next()? {
            match arg {
                Arg::Short('h') | Arg::Long("help") => return Ok(Command::Help),
                Arg::Short('V') | Arg::Long("version") => return Ok(Command::Version),
                Arg::Short('c') | Arg::Long("config") => {
                    opts.config = Some(PathBuf::from(parser.value()?));
                }
                Arg::Short('m') | Arg::Long("months") => {
                    opts.months = Some(parser.value()?.parse()?);
                }
                Arg::Short('w') | Arg::Long("week-start") => {
                    opts.week_start = Some(parser.value()?.parse()?);
                }
                Arg::Long("min") => opts.min_date = Some(parser.value()?.string()?),
                Arg::Long("max") => opts.max_date = Some(parser.value()?.string()?),
                Arg::Long("disable") => opts.disabled_dates.push(parser.value()?.string()?),
                Arg::Long("disable-weekday") => {
                    opts.disabled_weekdays.push(parser.value()?.string()?);
                }
                Arg::Long("no-drag") => opts.no_drag = true,
                Arg::Long("move-range") => opts.move_range = true,
                Arg::Long("retain-end") => opts.retain_end = true,
                Arg::Long("focus") => {
                    opts.focus = Some(parser.value()?.parse_with(|s| match s {
                        "start" => Ok(Part::Start),
                        "end" => Ok(Part::End),
                        _ => Err("expected \"start\" or \"end\""),
                    })?);
                }
                Arg::Long("no-preview") => opts.no_preview = true,
                Arg::Long("adjacent") => opts.adjacent = true,
                Arg::Long("start") => opts.start_date = Some(parser.value()?.string()?),
                Arg::Long("end") => opts.end_date = Some(parser.value()?.string()?),
                Arg::Long("log-file") => opts.log_file = Some(PathBuf::from(parser.value()?)),
                _ => return Err(arg.unexpected()),
            }
        }
        Ok(Command::Run(opts))
    }

    fn run(self) -> anyhow::Result<()> {
        match self {
            Command::Run(opts) => {
                // Determine the local offset before anything might spawn a
                // thread
                let today = OffsetDateTime::now_local()
                    .context("failed to determine local date")?
                    .date();
                let mut cfg = match opts.config {
                    Some(ref path) => PickerConfig::from_file(path)
                        .with_context(|| format!("failed to load {}", path.display()))?,
                    None => PickerConfig::default(),
                };
                opts.apply(&mut cfg);
                if let Some(ref path) = cfg.log_file {
                    init_logging(path)?;
                }
                let picker = cfg.build(today).context("invalid settings")?;
                let accepted = with_terminal(|terminal| {
                    App::new(picker, today)
                        .run(terminal)
                        .context("error running picker")
                })?;
                if let Some(range) = accepted {
                    println!("{}", show_range(&range));
                }
                Ok(())
            }
            Command::Help => {
                println!("Usage: rangepick [<options>]");
                println!();
                println!("Pick a range of dates in a terminal calendar");
                println!();
                println!("Options:");
                println!("  -c, --config FILE        Read settings from a TOML file");
                println!("  -m, --months N           Show N months side by side [default: 2]");
                println!("  -w, --week-start N       First day of the week, 0 = Sunday [default: 0]");
                println!("      --min DATE           Earliest selectable date");
                println!("      --max DATE           Latest selectable date");
                println!("      --disable DATE       Make a date unselectable (repeatable)");
                println!("      --disable-weekday DAY");
                println!("                           Make a weekday unselectable (repeatable)");
                println!("      --no-drag            Select by clicking only");
                println!("      --move-range         Picking a new start clears the end");
                println!("      --retain-end         Keep the end even with --move-range");
                println!("      --focus start|end    Which end the first pick sets");
                println!("      --no-preview         Don't preview the range under the mouse");
                println!("      --adjacent           Allow picking days of neighboring months");
                println!("      --start DATE         Initial start of the range");
                println!("      --end DATE           Initial end of the range");
                println!("      --log-file FILE      Write logs to FILE (filter with ${LOG_ENV})");
                println!("  -h, --help               Display this help message and exit");
                println!("  -V, --version            Show the program version and exit");
                println!();
                println!("On ENTER, the selected range is printed as \"START END\", with \"-\" for");
                println!("a missing endpoint.");
                Ok(())
            }
            Command::Version => {
                println!("{} {}", env!("CARGO_PKG_NAME"), env!("CARGO_PKG_VERSION"));
                Ok(())
            }
        }
    }
}

fn main() -> anyhow::Result<()> {
    Command::from_parser(Parser::from_env())?.run()
}

fn init_logging(path: &Path) -> anyhow::Result<()> {
    let file = File::create(path)
        .with_context(|| format!("failed to open log file {}", path.display()))?;
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .init();
    Ok(())
}

fn with_terminal<F, T>(func: F) -> anyhow::Result<T>
where
    F: FnOnce(DefaultTerminal) -> anyhow::Result<T>,
{
    let terminal = ratatui::init();
    let r = execute!(std::io::stdout(), EnableMouseCapture)
        .context("failed to enable mouse capture")
        .and_then(|()| func(terminal));
    // Best effort; the terminal is being torn down either way
    let _ = execute!(std::io::stdout(), DisableMouseCapture);
    ratatui::restore();
    r
}

fn show_range(range: &Range) -> String {
    let show = |d: Option<Date>| d.map_or_else(|| String::from("-"), |d| d.to_string());
    format!("{} {}", show(range.start), show(range.end))
}
