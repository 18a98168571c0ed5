use env_logger::{Builder, Env};
use log::LevelFilter;

/// map repeated `-v` flags onto a log level; warnings are always on
pub fn level_for(verbosity: u8) -> LevelFilter {
    match verbosity {
        0 => LevelFilter::Warn,
        1 => LevelFilter::Info,
        2 => LevelFilter::Debug,
        _ => LevelFilter::Trace,
    }
}

/// Send log records to stderr, so they never mix with what the VM prints.
/// `RUST_LOG` wins over the flag when it is set.
pub fn init(verbosity: u8) {
    let mut builder = Builder::new();
    builder.filter_level(level_for(verbosity));
    builder.parse_env(Env::default());
    builder.format_timestamp(None);
    // a second init (tests) is harmless
    let _ = builder.try_init();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_levels() {
        assert_eq!(level_for(0), LevelFilter::Warn);
        assert_eq!(level_for(1), LevelFilter::Info);
        assert_eq!(level_for(2), LevelFilter::Debug);
        assert_eq!(level_for(3), LevelFilter::Trace);
        assert_eq!(level_for(200), LevelFilter::Trace);
    }

    #[test]
    fn test_init_twice_ok() {
        init(0);
        init(0);
    }
}
