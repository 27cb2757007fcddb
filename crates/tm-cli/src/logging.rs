//! Logger setup for the `tm` binary.
//!
//! Library crates log through the `log` facade with structured key-values;
//! this installs `env_logger` and renders those pairs after the message.

use env_logger::{Builder, Env};
use log::kv::{Key, Source, Value, VisitSource};
use std::io::Write;

/// Environment variable holding the log filter, e.g. `TIDEMARK_LOG=debug`
pub(crate) const LOG_ENV: &str = "TIDEMARK_LOG";

/// Install the global logger. `verbose` forces `debug` regardless of the environment.
pub(crate) fn init(verbose: bool) {
    let mut builder = Builder::from_env(Env::default().filter_or(LOG_ENV, "info"));
    if verbose {
        builder.filter_level(log::LevelFilter::Debug);
    }
    builder.format(|buf, record| {
        let mut fields = Fields::default();
        let _ = record.key_values().visit(&mut fields);
        writeln!(
            buf,
            "{} {}: {}{}",
            buf.timestamp_seconds(),
            record.level(),
            record.args(),
            fields.render()
        )
    });
    // Already installed when called twice, e.g. from tests.
    let _ = builder.try_init();
}

#[derive(Default)]
struct Fields(Vec<String>);

impl Fields {
    fn render(&self) -> String {
        if self.0.is_empty() {
            String::new()
        } else {
            format!(" {{{}}}", self.0.join(", "))
        }
    }
}

impl<'kvs> VisitSource<'kvs> for Fields {
    fn visit_pair(&mut self, key: Key<'kvs>, value: Value<'kvs>) -> Result<(), log::kv::Error> {
        self.0.push(format!("{key}={value}"));
        Ok(())
    }
}
