use std::fmt::{Display, Write};

use chrono::format::{Item, StrftimeItems};
use chrono::{Duration, NaiveDate, NaiveDateTime, NaiveTime};
use rand::{Rng, RngCore};
use serde_json::Value;

use forgery_core::value::parse_date_value;
use forgery_core::{Error, Result, ValueKind};

use crate::catalogue::{DirectiveCatalogue, Generator, GeneratorContext};
use crate::params::{Args, ParamKind};

const DATE_FORMAT: &str = "%Y-%m-%d";
const TIME_FORMAT: &str = "%H:%M:%S";
const DATETIME_FORMAT: &str = "%Y-%m-%dT%H:%M:%S";

static NONE: [ParamKind; 0] = [];
static FORMAT: [ParamKind; 1] = [ParamKind::Text];
static RANGE: [ParamKind; 2] = [ParamKind::Text, ParamKind::Text];

pub fn register(catalogue: &mut DirectiveCatalogue) {
    for params in [&NONE[..], &FORMAT[..], &RANGE[..]] {
        catalogue.register(Box::new(DateGenerator { params }));
    }
    for params in [&NONE[..], &FORMAT[..]] {
        catalogue.register(Box::new(TimeGenerator { params }));
        catalogue.register(Box::new(DateTimeGenerator { params }));
    }
    catalogue.register(Box::new(TimestampGenerator));
}

fn default_window() -> (NaiveDate, NaiveDate) {
    let min = NaiveDate::from_ymd_opt(2000, 1, 1).unwrap_or_default();
    let max = NaiveDate::from_ymd_opt(2030, 12, 31).unwrap_or_default();
    (min, max)
}

fn check_format(directive: &'static str, format: &str) -> Result<()> {
    if StrftimeItems::new(format).any(|item| matches!(item, Item::Error)) {
        return Err(Error::invalid_argument(
            directive,
            format!("invalid format '{format}'"),
        ));
    }
    Ok(())
}

/// Render a formatted chrono value; specifiers the value cannot satisfy
/// (a date field on a time, for instance) surface as an error.
fn render(directive: &'static str, formatted: impl Display) -> Result<String> {
    let mut out = String::new();
    write!(out, "{formatted}").map_err(|_| {
        Error::invalid_argument(directive, "format does not apply to this value")
    })?;
    Ok(out)
}

fn random_date(min: NaiveDate, max: NaiveDate, rng: &mut dyn RngCore) -> NaiveDate {
    let span = (max - min).num_days().max(0);
    let offset = rng.random_range(0..=span);
    min + Duration::days(offset)
}

fn random_time(rng: &mut dyn RngCore) -> NaiveTime {
    let seconds = rng.random_range(0..86_400_u32);
    NaiveTime::from_num_seconds_from_midnight_opt(seconds, 0).unwrap_or_default()
}

fn random_datetime(rng: &mut dyn RngCore) -> NaiveDateTime {
    let (min, max) = default_window();
    NaiveDateTime::new(random_date(min, max, rng), random_time(rng))
}

struct DateGenerator {
    params: &'static [ParamKind],
}

impl DateGenerator {
    fn window(&self, args: &Args) -> Result<(NaiveDate, NaiveDate)> {
        if args.len() < 2 {
            return Ok(default_window());
        }
        let parse = |idx: usize| -> Result<NaiveDate> {
            let raw = args.text(idx)?;
            parse_date_value(raw).ok_or_else(|| {
                Error::invalid_argument("date", format!("'{raw}' is not a YYYY-MM-DD date"))
            })
        };
        let (min, max) = (parse(0)?, parse(1)?);
        if min > max {
            return Err(Error::invalid_argument(
                "date",
                format!("min must be <= max, got {min} > {max}"),
            ));
        }
        Ok((min, max))
    }
}

impl Generator for DateGenerator {
    fn name(&self) -> &'static str {
        "date"
    }

    fn params(&self) -> &'static [ParamKind] {
        self.params
    }

    fn output(&self) -> ValueKind {
        if self.params.len() == 1 {
            ValueKind::Text
        } else {
            ValueKind::Date
        }
    }

    fn description(&self) -> &'static str {
        "calendar date: (), (format) or (min, max) as YYYY-MM-DD"
    }

    fn validate(&self, args: &Args, _ctx: &GeneratorContext<'_>) -> Result<()> {
        if self.params.len() == 1 {
            let format = args.text(0)?;
            check_format("date", format)?;
            return render("date", NaiveDate::default().format(format)).map(|_| ());
        }
        self.window(args).map(|_| ())
    }

    fn generate(
        &self,
        args: &Args,
        _ctx: &GeneratorContext<'_>,
        rng: &mut dyn RngCore,
    ) -> Result<Value> {
        let (min, max) = self.window(args)?;
        let date = random_date(min, max, rng);
        let format = if self.params.len() == 1 {
            args.text(0)?
        } else {
            DATE_FORMAT
        };
        Ok(Value::String(render("date", date.format(format))?))
    }
}

struct TimeGenerator {
    params: &'static [ParamKind],
}

impl Generator for TimeGenerator {
    fn name(&self) -> &'static str {
        "time"
    }

    fn params(&self) -> &'static [ParamKind] {
        self.params
    }

    fn output(&self) -> ValueKind {
        if self.params.is_empty() {
            ValueKind::Time
        } else {
            ValueKind::Text
        }
    }

    fn description(&self) -> &'static str {
        "time of day, HH:MM:SS or a custom format"
    }

    fn validate(&self, args: &Args, _ctx: &GeneratorContext<'_>) -> Result<()> {
        if args.is_empty() {
            return Ok(());
        }
        let format = args.text(0)?;
        check_format("time", format)?;
        render("time", NaiveTime::default().format(format)).map(|_| ())
    }

    fn generate(
        &self,
        args: &Args,
        _ctx: &GeneratorContext<'_>,
        rng: &mut dyn RngCore,
    ) -> Result<Value> {
        let format = if args.is_empty() {
            TIME_FORMAT
        } else {
            args.text(0)?
        };
        Ok(Value::String(render("time", random_time(rng).format(format))?))
    }
}

struct DateTimeGenerator {
    params: &'static [ParamKind],
}

impl Generator for DateTimeGenerator {
    fn name(&self) -> &'static str {
        "datetime"
    }

    fn params(&self) -> &'static [ParamKind] {
        self.params
    }

    fn output(&self) -> ValueKind {
        if self.params.is_empty() {
            ValueKind::Timestamp
        } else {
            ValueKind::Text
        }
    }

    fn description(&self) -> &'static str {
        "date and time, ISO 8601 or a custom format"
    }

    fn validate(&self, args: &Args, _ctx: &GeneratorContext<'_>) -> Result<()> {
        if args.is_empty() {
            return Ok(());
        }
        let format = args.text(0)?;
        check_format("datetime", format)?;
        render("datetime", NaiveDateTime::default().format(format)).map(|_| ())
    }

    fn generate(
        &self,
        args: &Args,
        _ctx: &GeneratorContext<'_>,
        rng: &mut dyn RngCore,
    ) -> Result<Value> {
        let format = if args.is_empty() {
            DATETIME_FORMAT
        } else {
            args.text(0)?
        };
        Ok(Value::String(render(
            "datetime",
            random_datetime(rng).format(format),
        )?))
    }
}

struct TimestampGenerator;

impl Generator for TimestampGenerator {
    fn name(&self) -> &'static str {
        "timestamp"
    }

    fn params(&self) -> &'static [ParamKind] {
        &NONE
    }

    fn output(&self) -> ValueKind {
        ValueKind::Int
    }

    fn description(&self) -> &'static str {
        "unix epoch milliseconds"
    }

    fn generate(
        &self,
        _args: &Args,
        _ctx: &GeneratorContext<'_>,
        rng: &mut dyn RngCore,
    ) -> Result<Value> {
        let millis = random_datetime(rng).and_utc().timestamp_millis();
        Ok(Value::Number(millis.into()))
    }
}
