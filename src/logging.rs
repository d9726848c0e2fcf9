use std::io::Write;

use colored::Colorize;
use env_logger::Builder;
use log::{Level, LevelFilter};

/// Set up logging for the binary. Only epiclog's own records follow
/// `verbosity`; HTTP internals stay at warn until -vvv.
pub fn init_logger(verbosity: u8) {
    let level = match verbosity {
        0 => LevelFilter::Warn,  // default: skipped themes and other warnings
        1 => LevelFilter::Info,  // -v: loaded themes, backend calls
        2 => LevelFilter::Debug, // -vv: prompts and sampling parameters
        _ => LevelFilter::Trace, // -vvv: raw responses, everything
    };
    let deps_level = if verbosity >= 3 {
        LevelFilter::Trace
    } else {
        LevelFilter::Warn
    };

    let mut builder = Builder::new();
    builder.filter_level(deps_level);
    builder.filter_module("epiclog", level);

    builder.format(move |buf, record| {
        let level_label = match record.level() {
            Level::Error => "ERROR".red().bold(),
            Level::Warn  => "WARN ".yellow().bold(),
            Level::Info  => "INFO ".white().bold(),
            Level::Debug => "DEBUG".bright_black(),
            Level::Trace => "TRACE".bright_black(),
        };

        if verbosity >= 2 {
            let target = record.target().bright_black();
            writeln!(buf, "{} {} {}", level_label, target, record.args())
        } else {
            writeln!(buf, "{} {}", level_label, record.args())
        }
    });

    // A second init keeps the first logger.
    let _ = builder.try_init();
}
