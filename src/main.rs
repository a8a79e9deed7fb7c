// SPDX-License-Identifier: MPL-2.0
use dropplay::app::{self, paths, Flags};
use std::path::PathBuf;

const HELP: &str = "\
DropPlay: drag-and-drop video viewer

USAGE:
  dropplay [OPTIONS] [FILE]

OPTIONS:
  -h, --help               Print this help
  --lang <LOCALE>          UI language (e.g. en-US, ja)
  --config-dir <DIR>       Directory holding settings.toml

KEYS:
  h / l   seek back / forward
  j / k   volume down / up
  space   play / pause
  f       toggle fullscreen
  r       rotate 90 degrees
";

fn main() -> iced::Result {
    let mut args = pico_args::Arguments::from_env();

    if args.contains(["-h", "--help"]) {
        print!("{HELP}");
        return Ok(());
    }

    dropplay::logging::init();

    let lang: Option<String> = args.opt_value_from_str("--lang").unwrap_or_else(|e| {
        tracing::warn!(error = %e, "ignoring --lang");
        None
    });
    let config_dir: Option<String> = args.opt_value_from_str("--config-dir").unwrap_or_else(|e| {
        tracing::warn!(error = %e, "ignoring --config-dir");
        None
    });
    let file_path = args
        .finish()
        .into_iter()
        .next()
        .map(PathBuf::from);

    paths::init_cli_override(config_dir);

    app::run(Flags { lang, file_path })
}
