// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Command-line interface code.
//!
//! All booleans must have `#[serde(default)]` annotated, and anything that
//! isn't a boolean must be optional. This allows all arguments to be optional
//! *and* usable in an arguments file.
//!
//! Only 3 things should be public in this module: `FreqUnits`,
//! `FreqUnits::run`, and `FreqUnitsError`.

#[macro_use]
mod common;
mod error;
mod printers;
mod script;

pub use error::FreqUnitsError;

use std::{borrow::Cow, path::PathBuf};

use clap::{AppSettings, Args, Parser};
use crossbeam_channel::Receiver;
use log::{debug, info, trace};
use serde::{Deserialize, Serialize};

use common::{
    ARG_FILE_HELP, CONFIG_HELP, FMT_HELP, N_FFT_HELP, OUTPUT_HELP, RANGE_HELP, SCRIPT_HELP,
    UNIT_HELP,
};
use printers::{display_warnings, InfoPrinter, Warn};
use script::Script;

use crate::{
    config::{ConfigFile, FilterConfig},
    eval::{safe_eval, EvalError, Sign},
    format::full_precision,
    notify::Notification,
    selector::FrequencyUnitSelector,
    unit_parsing::{parse_freq, parse_freq_in_unit, parse_freq_unit, parse_range_type},
    units::RangeType,
};

// Add build-time information from the "built" crate.
include!(concat!(env!("OUT_DIR"), "/built.rs"));

#[derive(Debug, Parser)]
#[clap(
    version,
    author,
    about = r#"Select frequency units, the sampling frequency and the frequency-axis range of a filter design.
Changes are made the way a user would make them, and every resulting notification is reported."#
)]
#[clap(global_setting(AppSettings::DeriveDisplayOrder))]
#[clap(infer_long_args = true)]
pub struct FreqUnits {
    #[clap(flatten)]
    global_opts: GlobalArgs,

    #[clap(flatten)]
    args: FreqUnitsArgs,
}

#[derive(Debug, Args)]
struct GlobalArgs {
    /// The verbosity of the program. Increase by specifying multiple times
    /// (e.g. -vv). The default is to print only high-level information.
    #[clap(short, long, parse(from_occurrences))]
    verbosity: u8,

    /// Only verify that arguments were correctly ingested and print out
    /// high-level information.
    #[clap(long)]
    dry_run: bool,

    /// Save the input arguments into a new TOML file that can be used to
    /// reproduce this run.
    #[clap(long)]
    save_toml: Option<PathBuf>,
}

#[derive(Parser, Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
struct FreqUnitsArgs {
    #[clap(name = "ARGUMENTS_FILE", help = ARG_FILE_HELP.as_str(), parse(from_os_str))]
    #[serde(skip)]
    args_file: Option<PathBuf>,

    #[clap(short, long, help = CONFIG_HELP.as_str(), help_heading = "INPUT FILES")]
    config: Option<PathBuf>,

    #[clap(short, long, help = SCRIPT_HELP.as_str(), help_heading = "INPUT FILES")]
    script: Option<PathBuf>,

    #[clap(short, long, help = UNIT_HELP.as_str(), help_heading = "SELECTIONS")]
    unit: Option<String>,

    #[clap(short, long, help = RANGE_HELP.as_str(), help_heading = "SELECTIONS")]
    range: Option<String>,

    /// The sampling frequency, entered as it would be typed into the
    /// sampling-frequency field. Simple arithmetic is allowed (e.g. 2*24e3).
    /// A unit may be attached (e.g. 48kHz), in which case the value is
    /// converted to the selected unit.
    #[clap(long, allow_hyphen_values = true, help_heading = "SELECTIONS")]
    fs: Option<String>,

    /// Lock the sampling frequency after everything else has been applied.
    #[clap(long, help_heading = "SELECTIONS")]
    #[serde(default)]
    lock: bool,

    /// Unlock the sampling frequency.
    #[clap(long, help_heading = "SELECTIONS")]
    #[serde(default)]
    unlock: bool,

    /// Sort frequency specifications.
    #[clap(long, help_heading = "SELECTIONS")]
    #[serde(default)]
    sort: bool,

    /// Don't sort frequency specifications.
    #[clap(long, help_heading = "SELECTIONS")]
    #[serde(default)]
    no_sort: bool,

    #[clap(long, help = N_FFT_HELP.as_str(), help_heading = "DISPLAY")]
    n_fft: Option<usize>,

    #[clap(long, help = FMT_HELP.as_str(), help_heading = "DISPLAY")]
    fmt: Option<String>,

    #[clap(short, long, help = OUTPUT_HELP.as_str(), help_heading = "OUTPUT FILES")]
    output: Option<PathBuf>,
}

impl FreqUnits {
    pub fn run(self) -> Result<(), FreqUnitsError> {
        let GlobalArgs {
            verbosity,
            dry_run,
            save_toml,
        } = self.global_opts;
        setup_logging(verbosity)
            .map_err(|e| FreqUnitsError::Generic(format!("Failed to initialise logging: {e}")))?;

        info!("freq-units {}", env!("CARGO_PKG_VERSION"));
        display_build_info();

        let args = self.args.merge()?;
        if let Some(toml) = save_toml {
            use std::{
                fs::File,
                io::{BufWriter, Write},
            };

            let mut f = BufWriter::new(File::create(toml)?);
            let toml_str = toml::to_string(&args)?;
            f.write_all(toml_str.as_bytes())?;
            f.flush()?;
        }
        args.run(dry_run)?;

        info!("freq-units complete.");
        Ok(())
    }
}

impl FreqUnitsArgs {
    /// Both command-line and file arguments overlap in terms of what is
    /// available; this function consolidates everything that was specified
    /// into a single struct. Where applicable, it will prefer CLI parameters
    /// over those in the file.
    ///
    /// This function should only ever merge arguments, and not try to make
    /// sense of them.
    fn merge(self) -> Result<FreqUnitsArgs, FreqUnitsError> {
        debug!("Merging command-line arguments with the argument file");

        let cli_args = self;

        if let Some(arg_file) = cli_args.args_file {
            // Read in the file arguments. Ensure all of the file args are
            // accounted for by pattern matching.
            let FreqUnitsArgs {
                args_file: _,
                config,
                script,
                unit,
                range,
                fs,
                lock,
                unlock,
                sort,
                no_sort,
                n_fft,
                fmt,
                output,
            } = unpack_arg_file!(arg_file);

            // Merge all the arguments, preferring the CLI args when available.
            Ok(FreqUnitsArgs {
                args_file: None,
                config: cli_args.config.or(config),
                script: cli_args.script.or(script),
                unit: cli_args.unit.or(unit),
                range: cli_args.range.or(range),
                fs: cli_args.fs.or(fs),
                lock: cli_args.lock || lock,
                unlock: cli_args.unlock || unlock,
                sort: cli_args.sort || sort,
                no_sort: cli_args.no_sort || no_sort,
                n_fft: cli_args.n_fft.or(n_fft),
                fmt: cli_args.fmt.or(fmt),
                output: cli_args.output.or(output),
            })
        } else {
            Ok(cli_args)
        }
    }

    /// Read the files and check the arguments. Nothing is applied to the
    /// filter configuration yet.
    fn parse(self) -> Result<Session, FreqUnitsError> {
        debug!("{:#?}", self);

        let FreqUnitsArgs {
            args_file: _,
            config,
            script,
            unit,
            range,
            fs,
            lock,
            unlock,
            sort,
            no_sort,
            n_fft,
            fmt,
            output,
        } = self;

        if lock && unlock {
            return Err(FreqUnitsError::Args(
                "The sampling frequency can't be both locked and unlocked".to_string(),
            ));
        }
        if sort && no_sort {
            return Err(FreqUnitsError::Args(
                "Frequency specifications can't be both sorted and unsorted".to_string(),
            ));
        }

        let ConfigFile {
            filter,
            params: mut display_params,
        } = match &config {
            Some(path) => ConfigFile::read(path)?,
            None => ConfigFile::default(),
        };
        if let Some(n_fft) = n_fft {
            if n_fft == 0 {
                return Err(FreqUnitsError::Args(
                    "The number of FFT points must be positive".to_string(),
                ));
            }
            display_params.n_fft = n_fft;
        }
        if let Some(fmt) = fmt {
            display_params.fmt = fmt.parse()?;
        }

        let script = match &script {
            Some(path) => Script::read(path)?,
            None => Script::default(),
        };

        let range = range.as_deref().map(parse_range_type).transpose()?;
        if let Some(fs) = &fs {
            // Only plain numbers may carry a unit; anything else must be an
            // expression the field accepts.
            match parse_freq(fs) {
                Ok((f, Some(_))) if !f.is_finite() => {
                    return Err(EvalError::NonFinite(fs.clone()).into())
                }
                Ok((f, Some(_))) if f <= 0.0 => return Err(EvalError::NotPositive(f).into()),
                Ok((_, Some(_))) => (),
                _ => {
                    safe_eval(fs, filter.f_s(), Sign::Pos)?;
                }
            }
        }
        if let Some(u) = &unit {
            if parse_freq_unit(u).is_err() {
                format!("Unknown frequency unit '{u}'; frequencies will be treated like Hz")
                    .warn();
            }
        }

        let lock = match (lock, unlock) {
            (true, _) => Some(true),
            (_, true) => Some(false),
            _ => None,
        };
        let sort = match (sort, no_sort) {
            (true, _) => Some(true),
            (_, true) => Some(false),
            _ => None,
        };

        let selector = FrequencyUnitSelector::new(&filter, display_params);
        Ok(Session {
            cfg: filter,
            selector,
            script,
            unit,
            range,
            fs,
            lock,
            sort,
            output,
            config,
        })
    }

    fn run(self, dry_run: bool) -> Result<FilterConfig, FreqUnitsError> {
        debug!("Converting arguments into parameters");
        trace!("{:#?}", self);
        let mut session = self.parse()?;
        session.print_inputs();

        if dry_run {
            display_warnings();
            info!("Dry run -- exiting now.");
            return Ok(session.cfg);
        }

        session.run()?;
        Ok(session.cfg)
    }
}

/// Everything needed to replay a run against a filter configuration.
struct Session {
    cfg: FilterConfig,
    selector: FrequencyUnitSelector,
    script: Script,
    unit: Option<String>,
    range: Option<RangeType>,
    fs: Option<String>,
    lock: Option<bool>,
    sort: Option<bool>,
    output: Option<PathBuf>,
    config: Option<PathBuf>,
}

impl Session {
    fn print_inputs(&self) {
        let mut printer = InfoPrinter::new("Inputs".into());
        printer.push_line(match &self.config {
            Some(c) => format!("Filter configuration: {}", c.display()).into(),
            None => "Filter configuration: defaults".into(),
        });
        printer.push_line(format!("Script actions: {}", self.script.actions.len()).into());

        let mut selections: Vec<Cow<'static, str>> = vec![];
        if let Some(u) = &self.unit {
            selections.push(format!("Unit: {u}").into());
        }
        if let Some(r) = self.range {
            selections.push(format!("Range: {r} ({})", r.display_text()).into());
        }
        if let Some(fs) = &self.fs {
            selections.push(format!("f_S: {fs}").into());
        }
        if let Some(l) = self.lock {
            selections.push(format!("Lock f_S: {l}").into());
        }
        if let Some(s) = self.sort {
            selections.push(format!("Sort specs: {s}").into());
        }
        if !selections.is_empty() {
            printer.push_block(selections);
        }

        let params = self.selector.params();
        printer.push_block(vec![
            format!("N_FFT: {}", params.n_fft).into(),
            format!("FMT: {}", params.fmt).into(),
        ]);
        printer.display();

        print_state("Initial state", &self.cfg, &self.selector);
    }

    fn run(&mut self) -> Result<(), FreqUnitsError> {
        let Session {
            cfg,
            selector,
            script,
            unit,
            range,
            fs,
            lock,
            sort,
            output,
            config: _,
        } = self;
        let rx = selector.subscribe();

        selector.initialize(cfg);
        report_notifications(&rx)?;

        for action in &script.actions {
            action.apply(selector, cfg)?;
            report_notifications(&rx)?;
        }

        if let Some(u) = unit {
            selector.select_unit_name(cfg, u);
        }
        if let Some(r) = range {
            selector.select_range_type(cfg, *r);
        }
        if let Some(fs) = fs {
            if cfg.is_normalized() {
                format!(
                    "Ignoring f_S = {fs}; the sampling frequency can't be changed while frequencies are normalized ({})",
                    cfg.freq_specs_unit()
                )
                .warn();
            } else {
                // A unit on the value is converted to the selected unit.
                let text = match parse_freq(fs) {
                    Ok((_, Some(_))) => {
                        full_precision(parse_freq_in_unit(fs, cfg.freq_specs_unit())?)
                    }
                    _ => fs.clone(),
                };
                selector.enter_fs(cfg, &text)?;
            }
        }
        if let Some(l) = lock {
            selector.toggle_lock(cfg, *l);
        }
        if let Some(s) = sort {
            selector.set_sort_flag(cfg, *s);
        }
        report_notifications(&rx)?;

        display_warnings();
        print_state("Final state", cfg, selector);

        if let Some(output) = output {
            let file = ConfigFile {
                filter: cfg.clone(),
                params: selector.params().clone(),
            };
            file.write(output)?;
            info!("Wrote {}", output.display());
        }
        Ok(())
    }
}

/// Log every notification received so far, one json object per line.
fn report_notifications(rx: &Receiver<Notification>) -> Result<(), FreqUnitsError> {
    for n in rx.try_iter() {
        info!("Notification: {}", serde_json::to_string(&n)?);
    }
    Ok(())
}

fn print_state(title: &'static str, cfg: &FilterConfig, selector: &FrequencyUnitSelector) {
    let controls = selector.controls();
    let mut printer = InfoPrinter::new(title.into());
    printer.push_block(vec![
        format!("Unit: {}", cfg.freq_specs_unit()).into(),
        format!("f_S: {} (shown as {})", cfg.f_s(), controls.fs_text).into(),
        format!("f_max: {}", cfg.f_max()).into(),
        format!("T_S: {}", cfg.t_s()).into(),
        format!("f_S scale: {}", cfg.f_s_scale()).into(),
    ]);
    printer.push_line(match cfg.f_s_locked() {
        Some(f) => format!("f_S locked at {f}").into(),
        None => "f_S unlocked".into(),
    });
    let [lo, hi] = cfg.freq_specs_range();
    printer.push_line(
        format!(
            "Range: {} ({}) = [{lo}, {hi}]",
            cfg.freq_specs_range_type(),
            cfg.freq_specs_range_type().display_text()
        )
        .into(),
    );
    printer.push_line(format!("Sorted specs: {}", cfg.freq_specs_sort()).into());
    printer.push_block(vec![
        format!("Frequency label: {}", cfg.plt_f_label()).into(),
        format!("Time label: {}", cfg.plt_t_label()).into(),
    ]);
    printer.display();
}

/// Activate a logger. All log messages are put onto `stdout`. `env_logger`
/// automatically only uses colours and fancy symbols if we're on a tty (e.g. a
/// terminal); piped output will be formatted sensibly. Source code lines are
/// displayed in log messages when verbosity >= 3.
fn setup_logging(verbosity: u8) -> Result<(), log::SetLoggerError> {
    let mut builder = env_logger::Builder::from_default_env();
    builder.target(env_logger::Target::Stdout);
    builder.format_target(false);
    match verbosity {
        0 => builder.filter_level(log::LevelFilter::Info),
        1 => builder.filter_level(log::LevelFilter::Debug),
        2 => builder.filter_level(log::LevelFilter::Trace),
        _ => {
            builder.filter_level(log::LevelFilter::Trace);
            builder.format(|buf, record| {
                use std::io::Write;

                let timestamp = buf.timestamp();
                let level = record.level();
                let target = record.target();
                let line = record.line().unwrap_or(0);
                let message = record.args();

                writeln!(buf, "[{timestamp} {level} {target}:{line}] {message}")
            })
        }
    };
    builder.try_init()
}

/// Write many info-level log lines of how this executable was compiled.
fn display_build_info() {
    let dirty = match GIT_DIRTY {
        Some(true) => " (dirty)",
        _ => "",
    };
    match GIT_COMMIT_HASH_SHORT {
        Some(hash) => {
            info!("Compiled on git commit hash: {hash}{dirty}");
        }
        None => info!("Compiled on git commit hash: <no git info>"),
    }
    if let Some(hr) = GIT_HEAD_REF {
        info!("            git head ref: {}", hr);
    }
    info!("            {}", BUILT_TIME_UTC);
    info!("         with compiler {}", RUSTC_VERSION);
    info!("");
}
